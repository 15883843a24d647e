use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Обновление остатка одного товара на маркетплейсе
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockUpdate {
    pub identifier: String,
    pub quantity: u32,
    /// Склад маркетплейса (только для Яндекс Маркета)
    pub warehouse: Option<String>,
    /// Момент актуальности остатка (только для Яндекс Маркета)
    pub timestamp: Option<DateTime<Utc>>,
}

impl StockUpdate {
    pub fn is_in_stock(&self) -> bool {
        self.quantity != 0
    }
}
