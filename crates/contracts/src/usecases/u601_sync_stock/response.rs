use crate::domain::a002_stock_update::StockUpdate;
use crate::domain::a003_price_update::PriceUpdate;
use crate::enums::{MarketplaceType, SalesChannel};
use serde::{Deserialize, Serialize};

/// Итог синхронизации одного канала маркетплейса
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncReport {
    pub marketplace: MarketplaceType,
    pub channel: SalesChannel,
    /// Все отправленные остатки, включая обнулённые
    pub stocks: Vec<StockUpdate>,
    /// Только товары с ненулевым остатком
    pub in_stock: Vec<StockUpdate>,
    pub prices: Vec<PriceUpdate>,
    pub stock_batches: usize,
    pub price_batches: usize,
}

impl SyncReport {
    pub fn new(
        marketplace: MarketplaceType,
        channel: SalesChannel,
        stocks: Vec<StockUpdate>,
        prices: Vec<PriceUpdate>,
    ) -> Self {
        let in_stock = stocks.iter().filter(|s| s.is_in_stock()).cloned().collect();
        Self {
            marketplace,
            channel,
            stocks,
            in_stock,
            prices,
            stock_batches: 0,
            price_batches: 0,
        }
    }
}
