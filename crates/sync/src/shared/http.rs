use super::api_log::ApiLog;
use super::error::{SyncError, SyncResult};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// HTTP-клиент с таймаутом из конфигурации
pub fn build_client(timeout_secs: u64) -> SyncResult<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| SyncError::config(format!("Failed to create HTTP client: {}", e)))
}

/// Проверить статус ответа и разобрать JSON-тело.
///
/// Неуспешный статус превращается в `Auth`, `RateLimit` или `Remote`,
/// непарсящееся тело в `Format`.
pub async fn read_json<T: DeserializeOwned>(
    response: reqwest::Response,
    api: &str,
    log: &ApiLog,
) -> SyncResult<T> {
    let status = response.status();
    log.write(&format!("Response status: {}", status));

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        log.write(&format!("ERROR Response body:\n{}", body));
        tracing::error!("{} request failed with status {}: {}", api, status, body);
        return Err(SyncError::from_status(status, body));
    }

    let body = response.text().await?;
    log.write(&format!("=== RESPONSE BODY ===\n{}\n", body));
    tracing::debug!("{} response preview: {}", api, preview(&body));

    serde_json::from_str::<T>(&body).map_err(|e| {
        tracing::error!("Failed to parse {} response. Error: {}", api, e);
        SyncError::format(format!(
            "Failed to parse {} JSON: {}. Response: {}",
            api,
            e,
            preview(&body)
        ))
    })
}

/// Первые 500 символов тела ответа
pub fn preview(body: &str) -> String {
    let preview: String = body.chars().take(500).collect();
    if preview.len() < body.len() {
        format!("{}...", preview)
    } else {
        preview
    }
}
