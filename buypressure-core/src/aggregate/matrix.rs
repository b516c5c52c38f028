//! Industry × stock matrix: industries by descending RS rating, each with its
//! top stocks by a chosen score.
//!
//! All sorts are stable, so equal keys keep their input order.

use serde::{Deserialize, Serialize};

use crate::domain::{IndustryRecord, StockRecord};

/// Score used to rank stocks inside an industry group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    Technical,
    Screening,
    BuyPressure,
}

impl SortKey {
    pub fn value(self, stock: &StockRecord) -> f64 {
        match self {
            SortKey::Technical => stock.technical_score as f64,
            SortKey::Screening => stock.screening_score,
            SortKey::BuyPressure => stock.buy_pressure,
        }
    }
}

/// One industry row of the matrix. `stocks` is never empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndustryGroup {
    pub industry: IndustryRecord,
    pub stocks: Vec<StockRecord>,
}

/// Industries by descending RS rating; ties keep input order.
pub fn order_industries(industries: &[IndustryRecord]) -> Vec<IndustryRecord> {
    let mut ordered = industries.to_vec();
    ordered.sort_by(|a, b| b.rs_rating.total_cmp(&a.rs_rating));
    ordered
}

/// Build the matrix. Industries without any matching stock are omitted and
/// every group holds at most `max_per_group` stocks.
pub fn build_matrix(
    stocks: &[StockRecord],
    industries: &[IndustryRecord],
    sort_key: SortKey,
    max_per_group: usize,
) -> Vec<IndustryGroup> {
    order_industries(industries)
        .into_iter()
        .filter_map(|industry| {
            let mut members: Vec<StockRecord> = stocks
                .iter()
                .filter(|s| s.industry == industry.industry)
                .cloned()
                .collect();
            members.sort_by(|a, b| sort_key.value(b).total_cmp(&sort_key.value(a)));
            members.truncate(max_per_group);
            (!members.is_empty()).then_some(IndustryGroup {
                industry,
                stocks: members,
            })
        })
        .collect()
}
