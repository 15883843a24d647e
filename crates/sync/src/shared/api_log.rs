use super::config::LoggingConfig;
use contracts::enums::MarketplaceType;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

/// Журнал сырых запросов и ответов API маркетплейса.
///
/// Выключенный журнал ничего не пишет. Ключи API в журнал не попадают,
/// вызывающий код подставляет `****`.
#[derive(Debug, Clone)]
pub struct ApiLog {
    path: Option<PathBuf>,
}

impl ApiLog {
    pub fn disabled() -> Self {
        Self { path: None }
    }

    /// Журнал в `logs/<prefix>_api_requests.log` рядом с исполняемым файлом
    pub fn for_prefix(prefix: &str) -> Self {
        Self {
            path: Some(crate::system::tracing::log_dir().join(format!("{}_api_requests.log", prefix))),
        }
    }

    /// Журнал маркетплейса, если он включён в конфигурации
    pub fn for_marketplace(config: &LoggingConfig, marketplace: MarketplaceType) -> Self {
        if config.api_log {
            Self::for_prefix(marketplace.log_prefix())
        } else {
            Self::disabled()
        }
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// Записать в лог-файл
    pub fn write(&self, message: &str) {
        let Some(path) = &self.path else {
            return;
        };
        if let Ok(mut file) = OpenOptions::new().create(true).append(true).open(path) {
            let timestamp = chrono::Utc::now().format("%Y-%m-%d %H:%M:%S%.3f");
            let _ = writeln!(file, "[{}] {}", timestamp, message);
        }
    }
}
