//! Industry → sector lookup and the sector rollup.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::{IndustryRecord, StockRecord, UNKNOWN_SECTOR};

/// RS rating at or above which an industry counts as highly rated.
pub const HIGH_RATING_THRESHOLD: f64 = 80.0;

/// Industry → sector, taken as the most frequent sector observed for the
/// industry. Equal counts resolve to the lexicographically smallest sector.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IndustrySectorMap {
    map: BTreeMap<String, String>,
}

impl IndustrySectorMap {
    /// Build from `(industry, sector)` observations.
    pub fn from_observations<I>(observations: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut counts: BTreeMap<String, BTreeMap<String, usize>> = BTreeMap::new();
        for (industry, sector) in observations {
            *counts.entry(industry).or_default().entry(sector).or_default() += 1;
        }

        let map = counts
            .into_iter()
            .filter_map(|(industry, sectors)| {
                // Highest count first, then the smallest name.
                let (sector, _) = sectors
                    .into_iter()
                    .max_by_key(|(name, n)| (*n, std::cmp::Reverse(name.clone())))?;
                Some((industry, sector))
            })
            .collect();
        Self { map }
    }

    pub fn sector_for(&self, industry: &str) -> &str {
        self.map.get(industry).map(String::as_str).unwrap_or(UNKNOWN_SECTOR)
    }

    pub fn get(&self, industry: &str) -> Option<&str> {
        self.map.get(industry).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.map.iter().map(|(i, s)| (i.as_str(), s.as_str()))
    }

    /// Set each stock's `sector` from its industry.
    pub fn assign(&self, stocks: &mut [StockRecord]) {
        for stock in stocks {
            stock.sector = Some(self.sector_for(&stock.industry).to_string());
        }
    }
}

/// One sector of the rollup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectorSummary {
    pub sector: String,
    /// Member industries by ascending RS rating.
    pub industries: Vec<IndustryRecord>,
    pub mean_buy_pressure: f64,
    pub high_rating_count: usize,
}

impl SectorSummary {
    pub fn member_count(&self) -> usize {
        self.industries.len()
    }

    /// Share of member industries rated at or above [`HIGH_RATING_THRESHOLD`].
    pub fn high_rating_ratio(&self) -> f64 {
        match self.member_count() {
            0 => 0.0,
            n => self.high_rating_count as f64 / n as f64,
        }
    }
}

/// Group industries by sector.
///
/// Sectors come out by descending mean buy pressure (ties keep first-seen
/// order); members within a sector by ascending RS rating.
pub fn rollup(all_industries: &[IndustryRecord], sector_map: &IndustrySectorMap) -> Vec<SectorSummary> {
    let mut order: Vec<String> = Vec::new();
    let mut groups: BTreeMap<String, Vec<IndustryRecord>> = BTreeMap::new();
    for record in all_industries {
        let sector = sector_map.sector_for(&record.industry);
        if !groups.contains_key(sector) {
            order.push(sector.to_string());
        }
        groups.entry(sector.to_string()).or_default().push(record.clone());
    }

    let mut summaries: Vec<SectorSummary> = order
        .into_iter()
        .filter_map(|sector| {
            let mut industries = groups.remove(&sector)?;
            industries.sort_by(|a, b| a.rs_rating.total_cmp(&b.rs_rating));
            let n = industries.len();
            let mean_buy_pressure = if n == 0 {
                0.0
            } else {
                industries.iter().map(|i| i.buy_pressure).sum::<f64>() / n as f64
            };
            let high_rating_count = industries
                .iter()
                .filter(|i| i.rs_rating >= HIGH_RATING_THRESHOLD)
                .count();
            Some(SectorSummary {
                sector,
                industries,
                mean_buy_pressure,
                high_rating_count,
            })
        })
        .collect();

    summaries.sort_by(|a, b| b.mean_buy_pressure.total_cmp(&a.mean_buy_pressure));
    summaries
}
