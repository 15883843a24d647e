//! Синхронизация остатков и цен с Ozon.
//!
//! Учётные данные: SELLER_TOKEN, CLIENT_ID (окружение или .env).

use contracts::enums::MarketplaceType;
use std::process::ExitCode;
use stock_sync::shared::api_log::ApiLog;
use stock_sync::shared::config::{self, Config, OzonCredentials};
use stock_sync::system;
use stock_sync::usecases::u601_stock_report::StockReportClient;
use stock_sync::usecases::u602_sync_ozon::OzonApiClient;
use stock_sync::usecases::u604_sync_marketplace::SyncExecutor;
use stock_sync::SyncResult;

#[tokio::main]
async fn main() -> ExitCode {
    config::load_dotenv();

    if let Err(e) = system::tracing::initialize() {
        eprintln!("Failed to initialize logging: {}", e);
        return ExitCode::from(1);
    }

    let config = match config::load_config() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            eprintln!("Ошибка конфигурации: {}", e);
            return ExitCode::from(1);
        }
    };

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Ozon sync failed: {}", e);
            eprintln!("{}", e.user_message());
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run(config: Config) -> SyncResult<()> {
    let credentials = OzonCredentials::from_env()?;
    let log = ApiLog::for_marketplace(&config.logging, MarketplaceType::Ozon);
    let client = OzonApiClient::new(credentials, config.ozon, &config.http, log)?;

    let source = StockReportClient::new(config.stock_report, &config.http)?;
    let executor = SyncExecutor::new(source);

    let report = executor.sync_channel(&client).await?;
    println!(
        "Ozon: остатков {} (в наличии {}), цен {}",
        report.stocks.len(),
        report.in_stock.len(),
        report.prices.len()
    );
    Ok(())
}
