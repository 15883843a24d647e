use reqwest::StatusCode;
use thiserror::Error;

/// Ошибки синхронизации остатков и цен
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Authentication rejected (HTTP {status}): {body}")]
    Auth { status: u16, body: String },

    #[error("Rate limit exceeded: {body}")]
    RateLimit { body: String },

    #[error("Remote API error (HTTP {status}): {body}")]
    Remote { status: u16, body: String },

    #[error("Format error: {0}")]
    Format(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type SyncResult<T> = Result<T, SyncError>;

impl SyncError {
    pub fn format(message: impl Into<String>) -> Self {
        SyncError::Format(message.into())
    }

    pub fn config(message: impl Into<String>) -> Self {
        SyncError::Config(message.into())
    }

    /// Классификация неуспешного HTTP-ответа
    pub fn from_status(status: StatusCode, body: String) -> Self {
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => SyncError::Auth {
                status: status.as_u16(),
                body,
            },
            StatusCode::TOO_MANY_REQUESTS => SyncError::RateLimit { body },
            _ => SyncError::Remote {
                status: status.as_u16(),
                body,
            },
        }
    }

    /// Код завершения процесса для каждого вида ошибки
    pub fn exit_code(&self) -> u8 {
        match self {
            SyncError::Config(_) => 2,
            SyncError::Network(_) => 3,
            SyncError::Timeout(_) => 4,
            SyncError::Auth { .. } => 5,
            SyncError::RateLimit { .. } => 6,
            SyncError::Remote { .. } => 7,
            SyncError::Format(_) => 8,
        }
    }

    /// Сообщение для оператора
    pub fn user_message(&self) -> String {
        match self {
            SyncError::Timeout(_) => "Превышено время ожидания...".to_string(),
            SyncError::Network(e) => format!("Ошибка соединения: {}", e),
            SyncError::Auth { status, .. } => format!(
                "Маркетплейс отклонил учётные данные (HTTP {}). Проверьте токены",
                status
            ),
            SyncError::RateLimit { .. } => {
                "Маркетплейс ограничил частоту запросов, повторите позже".to_string()
            }
            SyncError::Remote { status, body } => {
                format!("Маркетплейс вернул ошибку (HTTP {}): {}", status, body)
            }
            SyncError::Format(e) => format!("Неожиданный формат данных: {}", e),
            SyncError::Config(e) => format!("Ошибка конфигурации: {}", e),
        }
    }
}

impl From<reqwest::Error> for SyncError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            SyncError::Timeout(e.to_string())
        } else if e.is_decode() {
            SyncError::Format(e.to_string())
        } else if let Some(status) = e.status() {
            SyncError::from_status(status, e.to_string())
        } else {
            SyncError::Network(e.to_string())
        }
    }
}

impl From<serde_json::Error> for SyncError {
    fn from(e: serde_json::Error) -> Self {
        SyncError::Format(e.to_string())
    }
}

impl From<zip::result::ZipError> for SyncError {
    fn from(e: zip::result::ZipError) -> Self {
        SyncError::Format(format!("archive: {}", e))
    }
}

impl From<calamine::Error> for SyncError {
    fn from(e: calamine::Error) -> Self {
        SyncError::Format(format!("spreadsheet: {}", e))
    }
}
