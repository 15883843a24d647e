use super::error::{SyncError, SyncResult};
use serde::Deserialize;
use std::env::VarError;
use std::num::NonZeroUsize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub stock_report: StockReportConfig,
    pub http: HttpConfig,
    pub ozon: MarketplaceApiConfig,
    pub yandex_market: MarketplaceApiConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Источник отчёта об остатках поставщика
#[derive(Debug, Deserialize, Clone)]
pub struct StockReportConfig {
    pub url: String,
    /// Номер строки заголовка (с нуля)
    pub header_row: u32,
    pub code_column: String,
    pub quantity_column: String,
    pub price_column: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    pub timeout_secs: u64,
}

/// Параметры API маркетплейса: адрес, размер страницы каталога и пакетов обновлений
#[derive(Debug, Deserialize, Clone)]
pub struct MarketplaceApiConfig {
    pub base_url: String,
    pub page_limit: NonZeroUsize,
    pub stock_batch: NonZeroUsize,
    pub price_batch: NonZeroUsize,
    /// Предел числа страниц при выгрузке каталога
    pub max_pages: NonZeroUsize,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct LoggingConfig {
    /// Писать тела запросов и ответов в logs/<marketplace>_api_requests.log
    #[serde(default)]
    pub api_log: bool,
}

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r#"
[stock_report]
url = "https://timeworld.ru/upload/files/ostatki.zip"
header_row = 17
code_column = "Код"
quantity_column = "Количество"
price_column = "Цена"

[http]
timeout_secs = 30

[ozon]
base_url = "https://api-seller.ozon.ru"
page_limit = 1000
stock_batch = 100
price_batch = 1000
max_pages = 10000

[yandex_market]
base_url = "https://api.partner.market.yandex.ru"
page_limit = 200
stock_batch = 2000
price_batch = 500
max_pages = 10000

[logging]
api_log = false
"#;

/// Load configuration from config.toml file
///
/// Search order:
/// 1. Next to the executable (for production)
/// 2. Falls back to embedded default config
pub fn load_config() -> anyhow::Result<Config> {
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let config_path = exe_dir.join("config.toml");

            if config_path.exists() {
                tracing::info!("Loading config from: {}", config_path.display());
                let contents = std::fs::read_to_string(&config_path)?;
                return parse_config(&contents);
            } else {
                tracing::debug!("config.toml not found at: {}", config_path.display());
            }
        }
    }

    tracing::info!("Using default embedded configuration");
    default_config()
}

/// Встроенная конфигурация по умолчанию
pub fn default_config() -> anyhow::Result<Config> {
    parse_config(DEFAULT_CONFIG)
}

pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    Ok(toml::from_str(contents)?)
}

/// Подгрузить переменные окружения из .env, если файл есть
pub fn load_dotenv() {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("Warning: Failed to load .env file: {}", e);
        }
    }
}

/// Учётные данные Ozon Seller API
#[derive(Debug, Clone, Deserialize)]
pub struct OzonCredentials {
    /// Api-Key
    pub seller_token: String,
    /// Client-Id
    pub client_id: String,
}

impl OzonCredentials {
    const VARS: [&'static str; 2] = ["SELLER_TOKEN", "CLIENT_ID"];

    pub fn from_env() -> SyncResult<Self> {
        Self::from_vars(collect_vars(&Self::VARS, |name| std::env::var(name))?)
    }

    pub fn from_vars<I>(vars: I) -> SyncResult<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let creds: Self = envy::from_iter(vars).map_err(|e| SyncError::config(e.to_string()))?;
        require("SELLER_TOKEN", &creds.seller_token)?;
        require("CLIENT_ID", &creds.client_id)?;
        Ok(creds)
    }
}

/// Учётные данные Яндекс Маркета: токен и пары кампания/склад для FBS и DBS
#[derive(Debug, Clone, Deserialize)]
pub struct MarketCredentials {
    pub market_token: String,
    pub fbs_id: String,
    pub dbs_id: String,
    pub warehouse_fbs_id: String,
    pub warehouse_dbs_id: String,
}

impl MarketCredentials {
    const VARS: [&'static str; 5] = [
        "MARKET_TOKEN",
        "FBS_ID",
        "DBS_ID",
        "WAREHOUSE_FBS_ID",
        "WAREHOUSE_DBS_ID",
    ];

    pub fn from_env() -> SyncResult<Self> {
        Self::from_vars(collect_vars(&Self::VARS, |name| std::env::var(name))?)
    }

    pub fn from_vars<I>(vars: I) -> SyncResult<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let creds: Self = envy::from_iter(vars).map_err(|e| SyncError::config(e.to_string()))?;
        require("MARKET_TOKEN", &creds.market_token)?;
        require("FBS_ID", &creds.fbs_id)?;
        require("DBS_ID", &creds.dbs_id)?;
        require("WAREHOUSE_FBS_ID", &creds.warehouse_fbs_id)?;
        require("WAREHOUSE_DBS_ID", &creds.warehouse_dbs_id)?;
        Ok(creds)
    }
}

/// Прочитать только нужные переменные. Отсутствующие пропускаются,
/// значение не в UTF-8 считается ошибкой конфигурации.
fn collect_vars<F>(names: &[&str], lookup: F) -> SyncResult<Vec<(String, String)>>
where
    F: Fn(&str) -> Result<String, VarError>,
{
    let mut vars = Vec::with_capacity(names.len());
    for name in names {
        match lookup(name) {
            Ok(value) => vars.push((name.to_string(), value)),
            Err(VarError::NotPresent) => {}
            Err(VarError::NotUnicode(_)) => {
                return Err(SyncError::config(format!("{} is not valid UTF-8", name)));
            }
        }
    }
    Ok(vars)
}

fn require(name: &str, value: &str) -> SyncResult<()> {
    if value.trim().is_empty() {
        return Err(SyncError::config(format!("{} must not be empty", name)));
    }
    Ok(())
}
