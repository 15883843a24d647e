use super::error::SyncResult;
use async_trait::async_trait;
use contracts::domain::a002_stock_update::StockUpdate;
use contracts::domain::a003_price_update::PriceUpdate;
use contracts::enums::{MarketplaceType, SalesChannel};
use std::num::NonZeroUsize;

/// Максимальные размеры пакетов обновлений за один вызов API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchLimits {
    pub stock: NonZeroUsize,
    pub price: NonZeroUsize,
}

/// Как маркетплейс адресует остатки: склад и отметка времени
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StockTarget {
    pub warehouse_id: Option<String>,
    /// Проставлять ли время актуальности в каждом обновлении
    pub timestamped: bool,
}

/// Трейт для клиента каталога маркетплейса.
///
/// Один экземпляр обслуживает один канал продаж (кабинет Ozon или кампанию
/// Яндекс Маркета) и несёт его учётные данные.
#[async_trait]
pub trait CatalogClient: Send + Sync {
    fn marketplace(&self) -> MarketplaceType;

    fn channel(&self) -> SalesChannel;

    fn limits(&self) -> BatchLimits;

    fn stock_target(&self) -> StockTarget;

    /// Все артикулы, зарегистрированные в канале (полная постраничная выгрузка)
    async fn list_identifiers(&self) -> SyncResult<Vec<String>>;

    /// Отправить один пакет остатков
    async fn submit_stocks(&self, batch: &[StockUpdate]) -> SyncResult<serde_json::Value>;

    /// Отправить один пакет цен
    async fn submit_prices(&self, batch: &[PriceUpdate]) -> SyncResult<serde_json::Value>;
}
