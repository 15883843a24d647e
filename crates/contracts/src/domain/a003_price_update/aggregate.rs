use serde::{Deserialize, Serialize};

/// Валюта цены
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Currency {
    #[default]
    Rub,
}

impl Currency {
    /// ISO 4217 код
    pub fn code(&self) -> &'static str {
        match self {
            Currency::Rub => "RUB",
        }
    }
}

/// Обновление цены одного товара на маркетплейсе
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceUpdate {
    pub identifier: String,
    /// Цена в целых рублях
    pub price: u64,
    pub currency: Currency,
}
