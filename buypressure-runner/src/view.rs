//! Post-load filtering into the structures the display layer renders.
//!
//! Loading takes no parameters; everything a user can change (minimum
//! technical score, group size, sort key, industry selection) is applied
//! here on top of the cached [`LoadedData`].

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use buypressure_core::aggregate::{build_crosstabs, order_industries};
use buypressure_core::data::filter_min_technical;
use buypressure_core::{
    build_matrix, classify, color_for, rollup, BuyPressureStatus, Crosstab, IndustryGroup,
    IndustryRecord, SectorSummary, SortKey, StockRecord,
};

use crate::loader::LoadedData;

/// User-adjustable filters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ViewOptions {
    /// Stocks below this technical score are excluded.
    pub min_technical_score: i64,
    /// Maximum stocks shown per industry in the matrix.
    pub max_per_group: usize,
    pub sort_key: SortKey,
    /// Industries shown in the matrix and cross-tabs. Empty means all.
    pub industries: Vec<String>,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            min_technical_score: 0,
            max_per_group: 10,
            sort_key: SortKey::Technical,
            industries: Vec::new(),
        }
    }
}

/// An industry with its display classification.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassifiedIndustry {
    #[serde(flatten)]
    pub record: IndustryRecord,
    pub sector: String,
    pub status: BuyPressureStatus,
    pub rank: Option<u8>,
    pub color: String,
}

/// A stock with its derived fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassifiedStock {
    #[serde(flatten)]
    pub record: StockRecord,
    pub fundamental_score: f64,
    pub status: BuyPressureStatus,
    pub color: String,
}

/// Everything the dashboard renders for one set of filters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub reporting_date: String,
    pub dataset_hash: String,
    /// Qualifying industries by descending RS rating.
    pub qualifying: Vec<ClassifiedIndustry>,
    /// Full population by descending RS rating.
    pub all_industries: Vec<ClassifiedIndustry>,
    /// Qualifying industries per status bucket.
    pub status_counts: BTreeMap<BuyPressureStatus, usize>,
    /// Stocks passing the technical-score minimum, in sheet order.
    pub stocks: Vec<ClassifiedStock>,
    pub matrix: Vec<IndustryGroup>,
    pub crosstabs: Vec<Crosstab>,
    pub sectors: Vec<SectorSummary>,
}

impl DashboardView {
    pub fn stock_count(&self) -> usize {
        self.stocks.len()
    }
}

/// Apply `opts` to loaded data.
pub fn build_view(data: &LoadedData, opts: &ViewOptions) -> DashboardView {
    let filtered = filter_min_technical(&data.stocks, opts.min_technical_score);

    let selection: BTreeSet<&str> = opts.industries.iter().map(String::as_str).collect();
    let selected: Vec<IndustryRecord> = data
        .qualifying
        .iter()
        .filter(|i| selection.is_empty() || selection.contains(i.industry.as_str()))
        .cloned()
        .collect();

    let matrix = build_matrix(&filtered, &selected, opts.sort_key, opts.max_per_group);
    let crosstabs = build_crosstabs(&filtered, &selected);
    let sectors = rollup(&data.all_industries, &data.sector_map);

    let qualifying = classify_industries(data, &data.qualifying);
    let mut status_counts = BTreeMap::new();
    for industry in &qualifying {
        *status_counts.entry(industry.status).or_insert(0) += 1;
    }

    tracing::debug!(
        min_technical = opts.min_technical_score,
        stocks = filtered.len(),
        groups = matrix.len(),
        "built dashboard view"
    );

    DashboardView {
        reporting_date: data.reporting_date.clone(),
        dataset_hash: data.dataset_hash.clone(),
        all_industries: classify_industries(data, &data.all_industries),
        qualifying,
        status_counts,
        stocks: filtered.into_iter().map(classify_stock).collect(),
        matrix,
        crosstabs,
        sectors,
    }
}

fn classify_industries(data: &LoadedData, industries: &[IndustryRecord]) -> Vec<ClassifiedIndustry> {
    order_industries(industries)
        .into_iter()
        .map(|record| {
            let status = classify(record.buy_pressure);
            ClassifiedIndustry {
                sector: data.sector_map.sector_for(&record.industry).to_string(),
                status,
                rank: status.rank(),
                color: color_for(record.buy_pressure).hex(),
                record,
            }
        })
        .collect()
}

fn classify_stock(record: StockRecord) -> ClassifiedStock {
    let status = classify(record.buy_pressure);
    ClassifiedStock {
        fundamental_score: record.fundamental_score(),
        status,
        color: color_for(record.buy_pressure).hex(),
        record,
    }
}
