pub mod aggregate;

pub use aggregate::{Currency, PriceUpdate};
