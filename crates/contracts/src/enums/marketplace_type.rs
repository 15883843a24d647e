use serde::{Deserialize, Serialize};

/// Маркетплейсы, с которыми синхронизируются остатки и цены
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MarketplaceType {
    Ozon,
    YandexMarket,
}

impl MarketplaceType {
    /// Получить человекочитаемое название
    pub fn display_name(&self) -> &'static str {
        match self {
            MarketplaceType::Ozon => "Ozon",
            MarketplaceType::YandexMarket => "Яндекс Маркет",
        }
    }

    /// Префикс для файлов журнала API-запросов
    pub fn log_prefix(&self) -> &'static str {
        match self {
            MarketplaceType::Ozon => "ozon",
            MarketplaceType::YandexMarket => "yandex",
        }
    }
}

impl std::fmt::Display for MarketplaceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}
