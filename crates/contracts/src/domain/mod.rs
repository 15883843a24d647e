pub mod a001_stock_record;
pub mod a002_stock_update;
pub mod a003_price_update;
