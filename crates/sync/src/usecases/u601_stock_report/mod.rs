pub mod report_client;
pub mod sheet_parser;

use crate::shared::error::SyncResult;
use async_trait::async_trait;
use contracts::domain::a001_stock_record::StockRecord;

pub use report_client::StockReportClient;

/// Источник остатков поставщика
#[async_trait]
pub trait StockSource: Send + Sync {
    async fn fetch(&self) -> SyncResult<Vec<StockRecord>>;
}
