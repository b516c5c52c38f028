//! The top-level load: resolve both snapshots, normalize them and derive
//! the sector lookup.
//!
//! A load is all-or-nothing. Resolution and schema failures abort it and
//! nothing partial is returned; rows that fail numeric coercion are dropped
//! and only show up as smaller counts.

use serde::Serialize;
use thiserror::Error;

use buypressure_core::data::{
    normalize_industries, read_stock_sheet, reporting_date, DataError, NormalizeReport,
    SnapshotFile, SnapshotResolver, XlsxWorkbook,
};
use buypressure_core::{IndustryRecord, IndustrySectorMap, StockRecord};

use crate::config::PipelineConfig;

/// Errors from the load layer.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("industry snapshot: {0}")]
    Industry(#[source] DataError),

    #[error("screening snapshot: {0}")]
    Screening(#[source] DataError),
}

impl LoadError {
    pub fn data_error(&self) -> &DataError {
        match self {
            LoadError::Industry(e) | LoadError::Screening(e) => e,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.data_error().is_not_found()
    }

    pub fn is_schema(&self) -> bool {
        self.data_error().is_schema()
    }
}

/// Normalized output of one load. Never mutated after construction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadedData {
    pub industry_snapshot: SnapshotFile,
    pub screening_snapshot: SnapshotFile,
    /// Industries that passed the multi-condition screen.
    pub qualifying: Vec<IndustryRecord>,
    /// Full population, or a copy of `qualifying` when unavailable.
    pub all_industries: Vec<IndustryRecord>,
    pub full_population_found: bool,
    /// Every coerced stock row with its sector assigned. The minimum
    /// technical score is applied later, per view.
    pub stocks: Vec<StockRecord>,
    pub sector_map: IndustrySectorMap,
    /// `YYYY-MM-DD`, one day before the screening snapshot's timestamp.
    pub reporting_date: String,
    pub industry_report: NormalizeReport,
    pub stock_report: NormalizeReport,
    /// BLAKE3 over all normalized records.
    pub dataset_hash: String,
}

/// Run the full load against `config.data_dir`.
pub fn load_snapshot_data(config: &PipelineConfig) -> Result<LoadedData, LoadError> {
    let resolver = SnapshotResolver::new(&config.data_dir, &config.extension);

    let industry_snapshot = resolver
        .resolve_latest(&config.industry_prefix)
        .map_err(LoadError::Industry)?;
    let screening_snapshot = resolver
        .resolve_latest(&config.screening_prefix)
        .map_err(LoadError::Screening)?;

    let industry_tables = XlsxWorkbook::open(&industry_snapshot.path)
        .and_then(|mut wb| normalize_industries(&mut wb, &config.sheets.industry_sheets()))
        .map_err(LoadError::Industry)?;

    let stock_sheet = XlsxWorkbook::open(&screening_snapshot.path)
        .and_then(|mut wb| read_stock_sheet(&mut wb, &config.sheets.results))
        .map_err(LoadError::Screening)?;

    let mut stocks = stock_sheet.stocks;
    stock_sheet.sector_map.assign(&mut stocks);

    let dataset_hash = compute_dataset_hash(
        &industry_tables.qualifying,
        &industry_tables.all,
        &stocks,
    );

    let data = LoadedData {
        reporting_date: reporting_date(&screening_snapshot.path),
        industry_snapshot,
        screening_snapshot,
        qualifying: industry_tables.qualifying,
        all_industries: industry_tables.all,
        full_population_found: industry_tables.full_population_found,
        stocks,
        sector_map: stock_sheet.sector_map,
        industry_report: industry_tables.report,
        stock_report: stock_sheet.report,
        dataset_hash,
    };

    tracing::info!(
        reporting_date = %data.reporting_date,
        qualifying = data.qualifying.len(),
        industries = data.all_industries.len(),
        stocks = data.stocks.len(),
        "snapshot data loaded"
    );

    Ok(data)
}

/// Deterministic hash over every normalized record, in table order.
fn compute_dataset_hash(
    qualifying: &[IndustryRecord],
    all: &[IndustryRecord],
    stocks: &[StockRecord],
) -> String {
    let mut hasher = blake3::Hasher::new();

    for table in [qualifying, all] {
        hasher.update(&(table.len() as u64).to_le_bytes());
        for r in table {
            update_str(&mut hasher, &r.industry);
            hasher.update(&r.rs_rating.to_le_bytes());
            hasher.update(&r.buy_pressure.to_le_bytes());
        }
    }

    hasher.update(&(stocks.len() as u64).to_le_bytes());
    for s in stocks {
        update_str(&mut hasher, &s.symbol);
        update_str(&mut hasher, &s.industry);
        hasher.update(&s.technical_score.to_le_bytes());
        hasher.update(&s.screening_score.to_le_bytes());
        hasher.update(&s.buy_pressure.to_le_bytes());
        update_str(&mut hasher, &s.company_name);
        update_str(&mut hasher, s.sector_or_unknown());
    }

    hasher.finalize().to_hex().to_string()
}

/// Length-prefixed so adjacent fields cannot shift bytes between them.
fn update_str(hasher: &mut blake3::Hasher, s: &str) {
    hasher.update(&(s.len() as u64).to_le_bytes());
    hasher.update(s.as_bytes());
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::NaiveDateTime;
    use std::path::PathBuf;

    fn snapshot(prefix: &str, token: &str) -> SnapshotFile {
        SnapshotFile {
            logical_name: prefix.into(),
            path: PathBuf::from(format!("data/{prefix}{token}.xlsx")),
            token: token.into(),
            timestamp: NaiveDateTime::parse_from_str(token, "%Y%m%d_%H%M%S").unwrap(),
        }
    }

    fn stock(symbol: &str, industry: &str, tech: i64, screening: f64, bp: f64) -> StockRecord {
        StockRecord {
            symbol: symbol.into(),
            industry: industry.into(),
            technical_score: tech,
            screening_score: screening,
            buy_pressure: bp,
            company_name: format!("{symbol} Corp"),
            raw_sector: None,
            sector: None,
        }
    }

    /// In-memory load result shared by view and export tests.
    pub(crate) fn sample_data() -> LoadedData {
        let qualifying = vec![
            IndustryRecord::new("Banks", 60.0, 0.41),
            IndustryRecord::new("Semis", 95.0, 0.70),
            IndustryRecord::new("Software", 88.0, 0.58),
        ];
        let mut all = qualifying.clone();
        all.push(IndustryRecord::new("Utilities", 20.0, 0.30));

        let sector_map = IndustrySectorMap::from_observations(
            [
                ("Semis", "Technology"),
                ("Software", "Technology"),
                ("Banks", "Financials"),
            ]
            .into_iter()
            .map(|(i, s)| (i.to_string(), s.to_string())),
        );

        let mut stocks = vec![
            stock("A", "Semis", 14, 20.0, 0.70),
            stock("B", "Semis", 14, 18.0, 0.62),
            stock("C", "Semis", 10, 25.0, 0.52),
            stock("D", "Software", 12, 19.0, 0.48),
            stock("E", "Banks", 9, 12.0, 0.35),
        ];
        sector_map.assign(&mut stocks);

        let dataset_hash = compute_dataset_hash(&qualifying, &all, &stocks);
        LoadedData {
            industry_snapshot: snapshot("industry_multicondition_", "20260211_090000"),
            screening_snapshot: snapshot("integrated_screening_", "20260211_090000"),
            industry_report: NormalizeReport::new(qualifying.len(), qualifying.len()),
            stock_report: NormalizeReport::new(stocks.len(), stocks.len()),
            qualifying,
            all_industries: all,
            full_population_found: true,
            stocks,
            sector_map,
            reporting_date: "2026-02-10".into(),
            dataset_hash,
        }
    }

    #[test]
    fn dataset_hash_is_deterministic() {
        assert_eq!(sample_data().dataset_hash, sample_data().dataset_hash);
        assert_eq!(sample_data().dataset_hash.len(), 64);
    }

    #[test]
    fn dataset_hash_changes_with_data() {
        let a = sample_data();
        let mut stocks = a.stocks.clone();
        stocks[0].buy_pressure = 0.71;
        let changed = compute_dataset_hash(&a.qualifying, &a.all_industries, &stocks);
        assert_ne!(a.dataset_hash, changed);
    }

    #[test]
    fn dataset_hash_separates_adjacent_fields() {
        let a = vec![stock("AB", "C", 14, 20.0, 0.70)];
        let b = vec![stock("A", "BC", 14, 20.0, 0.70)];
        assert_ne!(
            compute_dataset_hash(&[], &[], &a),
            compute_dataset_hash(&[], &[], &b)
        );

        let mut c = stock("A", "Semis", 14, 20.0, 0.70);
        c.company_name = "Acme T".into();
        c.sector = Some("ech".into());
        let mut d = c.clone();
        d.company_name = "Acme".into();
        d.sector = Some(" Tech".into());
        assert_ne!(
            compute_dataset_hash(&[], &[], &[c]),
            compute_dataset_hash(&[], &[], &[d])
        );
    }

    #[test]
    fn missing_directory_fails_on_industry() {
        let config = PipelineConfig::with_data_dir("does/not/exist");
        let err = load_snapshot_data(&config).unwrap_err();
        assert!(err.is_not_found());
        assert!(matches!(err, LoadError::Industry(DataError::NoMatchingFiles { .. })));
    }

    #[test]
    fn error_classification_passes_through() {
        let err = LoadError::Screening(DataError::MissingSheet {
            sheet: "Results".into(),
            available: vec![],
        });
        assert!(err.is_schema());
        assert!(!err.is_not_found());
        assert!(err.to_string().starts_with("screening snapshot:"));
    }
}
