pub mod aggregate;

pub use aggregate::StockRecord;
