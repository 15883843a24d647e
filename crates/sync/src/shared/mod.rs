pub mod api_log;
pub mod batch;
pub mod config;
pub mod error;
pub mod http;
pub mod marketplaces;
pub mod price;
