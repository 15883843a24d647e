//! Синхронизация остатков и цен с Яндекс Маркетом, кампании FBS и DBS.
//!
//! Учётные данные: MARKET_TOKEN, FBS_ID, DBS_ID, WAREHOUSE_FBS_ID,
//! WAREHOUSE_DBS_ID (окружение или .env).

use contracts::enums::{MarketplaceType, SalesChannel};
use std::process::ExitCode;
use stock_sync::shared::api_log::ApiLog;
use stock_sync::shared::config::{self, Config, MarketCredentials};
use stock_sync::shared::marketplaces::CatalogClient;
use stock_sync::system;
use stock_sync::usecases::u601_stock_report::StockReportClient;
use stock_sync::usecases::u603_sync_yandex::{YandexApiClient, YandexCampaign};
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
            tracing::error!("Yandex Market sync failed: {}", e);
            eprintln!("{}", e.user_message());
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run(config: Config) -> SyncResult<()> {
    let credentials = MarketCredentials::from_env()?;
    let log = ApiLog::for_marketplace(&config.logging, MarketplaceType::YandexMarket);

    let fbs = YandexApiClient::new(
        credentials.market_token.clone(),
        YandexCampaign {
            channel: SalesChannel::Fbs,
            campaign_id: credentials.fbs_id,
            warehouse_id: credentials.warehouse_fbs_id,
        },
        config.yandex_market.clone(),
        &config.http,
        log.clone(),
    )?;
    let dbs = YandexApiClient::new(
        credentials.market_token,
        YandexCampaign {
            channel: SalesChannel::Dbs,
            campaign_id: credentials.dbs_id,
            warehouse_id: credentials.warehouse_dbs_id,
        },
        config.yandex_market,
        &config.http,
        log,
    )?;

    let source = StockReportClient::new(config.stock_report, &config.http)?;
    let executor = SyncExecutor::new(source);

    let clients: [&dyn CatalogClient; 2] = [&fbs, &dbs];
    for report in executor.sync_all(&clients).await? {
        println!(
            "Яндекс Маркет {}: остатков {} (в наличии {}), цен {}",
            report.channel,
            report.stocks.len(),
            report.in_stock.len(),
            report.prices.len()
        );
    }
    Ok(())
}
