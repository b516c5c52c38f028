//! Domain records produced by normalization and consumed by aggregation.

pub mod industry;
pub mod status;
pub mod stock;

pub use industry::IndustryRecord;
pub use status::BuyPressureStatus;
pub use stock::{StockRecord, UNKNOWN_SECTOR};
