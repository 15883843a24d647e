use super::{sheet_parser, StockSource};
use crate::shared::config::{HttpConfig, StockReportConfig};
use crate::shared::error::{SyncError, SyncResult};
use crate::shared::http;
use async_trait::async_trait;
use contracts::domain::a001_stock_record::StockRecord;
use std::io::{Cursor, Read};

const SPREADSHEET_EXTENSIONS: [&str; 4] = [".xls", ".xlsx", ".xlsm", ".ods"];

/// Предел размера распакованной таблицы
pub const MAX_SPREADSHEET_BYTES: u64 = 64 << 20;

/// Загрузка архива с отчётом об остатках поставщика
pub struct StockReportClient {
    client: reqwest::Client,
    config: StockReportConfig,
}

impl StockReportClient {
    pub fn new(config: StockReportConfig, http_config: &HttpConfig) -> SyncResult<Self> {
        Ok(Self {
            client: http::build_client(http_config.timeout_secs)?,
            config,
        })
    }

    /// Скачать архив целиком
    pub async fn download(&self) -> SyncResult<Vec<u8>> {
        tracing::info!("Downloading stock report from {}", self.config.url);
        let response = self.client.get(&self.config.url).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!("Stock report download failed with status {}", status);
            return Err(SyncError::from_status(status, http::preview(&body)));
        }

        let bytes = response.bytes().await?;
        tracing::info!("Stock report archive downloaded: {} bytes", bytes.len());
        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl StockSource for StockReportClient {
    async fn fetch(&self) -> SyncResult<Vec<StockRecord>> {
        let archive = self.download().await?;
        let (name, spreadsheet) = extract_spreadsheet(&archive)?;
        let records = sheet_parser::parse_workbook(spreadsheet, &self.config)?;
        tracing::info!("Parsed {} stock records from {}", records.len(), name);
        Ok(records)
    }
}

/// Достать из zip-архива единственную таблицу.
///
/// Файл читается в память, на диск ничего не распаковывается.
pub fn extract_spreadsheet(archive: &[u8]) -> SyncResult<(String, Vec<u8>)> {
    extract_with_limit(archive, MAX_SPREADSHEET_BYTES)
}

fn extract_with_limit(archive: &[u8], limit: u64) -> SyncResult<(String, Vec<u8>)> {
    let mut zip = zip::ZipArchive::new(Cursor::new(archive))?;

    let mut candidates: Vec<(usize, String)> = Vec::new();
    for index in 0..zip.len() {
        let entry = zip.by_index(index)?;
        if entry.is_dir() {
            continue;
        }
        let name = entry.name().to_string();
        let lower = name.to_lowercase();
        if SPREADSHEET_EXTENSIONS.iter().any(|ext| lower.ends_with(ext)) {
            candidates.push((index, name));
        }
    }

    let (index, name) = match candidates.len() {
        1 => candidates.remove(0),
        0 => return Err(SyncError::format("archive contains no spreadsheet")),
        n => {
            let names: Vec<&str> = candidates.iter().map(|(_, name)| name.as_str()).collect();
            return Err(SyncError::format(format!(
                "archive contains {} spreadsheets, expected one: {}",
                n,
                names.join(", ")
            )));
        }
    };

    let entry = zip.by_index(index)?;
    // Размер из заголовка архива только подсказка, ему нельзя доверять
    let declared = entry.size();
    if declared > limit {
        return Err(SyncError::format(format!(
            "{} declares {} bytes, limit is {}",
            name, declared, limit
        )));
    }

    let mut contents = Vec::with_capacity(declared as usize);
    entry
        .take(limit + 1)
        .read_to_end(&mut contents)
        .map_err(|e| SyncError::format(format!("cannot read {} from archive: {}", name, e)))?;
    if contents.len() as u64 > limit {
        return Err(SyncError::format(format!(
            "{} exceeds {} bytes when unpacked",
            name, limit
        )));
    }

    tracing::debug!("Extracted {} ({} bytes)", name, contents.len());
    Ok((name, contents))
}
