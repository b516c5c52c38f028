use serde::{Deserialize, Serialize};

use crate::classify::classify;
use crate::domain::BuyPressureStatus;

/// One industry row of a snapshot.
///
/// Only rows whose rating and pressure both coerced to numbers are ever
/// constructed by the normalizer, so both fields are plain floats here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndustryRecord {
    pub industry: String,
    pub rs_rating: f64,
    pub buy_pressure: f64,
}

impl IndustryRecord {
    pub fn new(industry: impl Into<String>, rs_rating: f64, buy_pressure: f64) -> Self {
        Self {
            industry: industry.into(),
            rs_rating,
            buy_pressure,
        }
    }

    pub fn status(&self) -> BuyPressureStatus {
        classify(self.buy_pressure)
    }
}
