pub mod u601_stock_report;
pub mod u602_sync_ozon;
pub mod u603_sync_yandex;
pub mod u604_sync_marketplace;
