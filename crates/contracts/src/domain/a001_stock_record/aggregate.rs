use serde::{Deserialize, Serialize};

/// Строка отчёта об остатках поставщика.
///
/// Значения хранятся как текст из ячеек: количество бывает вида `">10"`,
/// цена вида `"5'990.00 руб."`. Нормализация выполняется при сверке
/// с каталогом маркетплейса.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockRecord {
    /// Код товара (артикул), совпадает с offer_id / shopSku на маркетплейсе
    pub code: String,
    pub quantity_text: String,
    pub price_text: String,
}

impl StockRecord {
    pub fn new(
        code: impl Into<String>,
        quantity_text: impl Into<String>,
        price_text: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            quantity_text: quantity_text.into(),
            price_text: price_text.into(),
        }
    }
}
