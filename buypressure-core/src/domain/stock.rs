use serde::{Deserialize, Serialize};

use crate::classify::classify;
use crate::domain::BuyPressureStatus;

/// Sector assigned to industries with no observed sector value.
pub const UNKNOWN_SECTOR: &str = "Unknown";

/// One stock row of a screening snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockRecord {
    pub symbol: String,
    pub industry: String,
    pub technical_score: i64,
    pub screening_score: f64,
    pub buy_pressure: f64,
    pub company_name: String,
    /// Raw sector cell from the results sheet, if the column exists.
    pub raw_sector: Option<String>,
    /// Sector resolved through the industry → sector map after load.
    pub sector: Option<String>,
}

impl StockRecord {
    /// Screening minus technical score.
    pub fn fundamental_score(&self) -> f64 {
        self.screening_score - self.technical_score as f64
    }

    pub fn status(&self) -> BuyPressureStatus {
        classify(self.buy_pressure)
    }

    pub fn sector_or_unknown(&self) -> &str {
        self.sector.as_deref().unwrap_or(UNKNOWN_SECTOR)
    }
}
