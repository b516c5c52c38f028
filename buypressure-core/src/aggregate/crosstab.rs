//! Industry × technical score × fundamental score cross-tabulation.
//!
//! The grid is dense: every (technical, fundamental) pair present anywhere in
//! the industry gets a cell, empty or not.

use serde::{Deserialize, Serialize};

use super::matrix::order_industries;
use crate::domain::{IndustryRecord, StockRecord};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Crosstab {
    pub industry: String,
    /// Distinct technical scores, descending. One row each.
    pub technical_scores: Vec<i64>,
    /// Distinct fundamental scores, descending. One column each.
    pub fundamental_scores: Vec<f64>,
    /// `cells[row][col]`, stocks sorted by descending buy pressure.
    pub cells: Vec<Vec<Vec<StockRecord>>>,
}

impl Crosstab {
    pub fn cell(&self, technical: i64, fundamental: f64) -> Option<&[StockRecord]> {
        let row = self.technical_scores.iter().position(|&t| t == technical)?;
        let col = self
            .fundamental_scores
            .iter()
            .position(|f| f.total_cmp(&fundamental).is_eq())?;
        Some(&self.cells[row][col])
    }

    pub fn stock_count(&self) -> usize {
        self.cells.iter().flatten().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.technical_scores.is_empty()
    }
}

/// Cross-tab of one industry's stocks.
pub fn build_crosstab(stocks: &[StockRecord], industry: &str) -> Crosstab {
    let members: Vec<&StockRecord> = stocks.iter().filter(|s| s.industry == industry).collect();

    let mut technical_scores: Vec<i64> = members.iter().map(|s| s.technical_score).collect();
    technical_scores.sort_by(|a, b| b.cmp(a));
    technical_scores.dedup();

    let mut fundamental_scores: Vec<f64> = members.iter().map(|s| s.fundamental_score()).collect();
    fundamental_scores.sort_by(|a, b| b.total_cmp(a));
    fundamental_scores.dedup_by(|a, b| a.total_cmp(b).is_eq());

    let cells = technical_scores
        .iter()
        .map(|&tech| {
            fundamental_scores
                .iter()
                .map(|fund| {
                    let mut cell: Vec<StockRecord> = members
                        .iter()
                        .filter(|s| {
                            s.technical_score == tech && s.fundamental_score().total_cmp(fund).is_eq()
                        })
                        .map(|s| (*s).clone())
                        .collect();
                    cell.sort_by(|a, b| b.buy_pressure.total_cmp(&a.buy_pressure));
                    cell
                })
                .collect()
        })
        .collect();

    Crosstab {
        industry: industry.to_string(),
        technical_scores,
        fundamental_scores,
        cells,
    }
}

/// Cross-tabs for the given industries, by descending RS rating, skipping
/// industries without stocks.
pub fn build_crosstabs(stocks: &[StockRecord], industries: &[IndustryRecord]) -> Vec<Crosstab> {
    order_industries(industries)
        .iter()
        .map(|i| build_crosstab(stocks, &i.industry))
        .filter(|c| !c.is_empty())
        .collect()
}
