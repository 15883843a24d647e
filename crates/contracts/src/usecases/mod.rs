pub mod u601_sync_stock;
