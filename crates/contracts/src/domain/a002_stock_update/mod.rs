pub mod aggregate;

pub use aggregate::StockUpdate;
