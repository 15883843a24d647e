pub mod marketplace_type;
pub mod sales_channel;

pub use marketplace_type::MarketplaceType;
pub use sales_channel::SalesChannel;
