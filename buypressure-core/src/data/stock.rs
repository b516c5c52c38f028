//! Screening snapshot normalization: per-stock scores plus the modal
//! industry → sector lookup.

use serde::{Deserialize, Serialize};

use super::table::{coerce_f64, locate_table, text_column, Table};
use super::workbook::{Cell, SheetSource};
use super::{DataError, NormalizeReport};
use crate::aggregate::IndustrySectorMap;
use crate::domain::StockRecord;

pub const SYMBOL_COLUMN: &str = "Symbol";
pub const STOCK_INDUSTRY_COLUMN: &str = "Industry";
pub const TECHNICAL_SCORE_COLUMN: &str = "Technical_Score";
pub const SCREENING_SCORE_COLUMN: &str = "Screening_Score";
pub const STOCK_BUY_PRESSURE_COLUMN: &str = "Buy_Pressure";
pub const COMPANY_NAME_COLUMN: &str = "Company Name";
pub const SECTOR_COLUMN: &str = "Sector";

const REQUIRED: [&str; 6] = [
    SYMBOL_COLUMN,
    STOCK_INDUSTRY_COLUMN,
    TECHNICAL_SCORE_COLUMN,
    SCREENING_SCORE_COLUMN,
    STOCK_BUY_PRESSURE_COLUMN,
    COMPANY_NAME_COLUMN,
];

/// Default name of the results sheet in a screening snapshot.
pub const DEFAULT_RESULTS_SHEET: &str = "Results";

/// All coerced stock rows of one screening snapshot, before any score filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockSheet {
    pub stocks: Vec<StockRecord>,
    pub sector_map: IndustrySectorMap,
    pub report: NormalizeReport,
}

impl StockSheet {
    /// Stocks whose technical score is at least `min_technical`, in sheet order.
    pub fn filter_min_technical(&self, min_technical: i64) -> Vec<StockRecord> {
        filter_min_technical(&self.stocks, min_technical)
    }
}

pub fn filter_min_technical(stocks: &[StockRecord], min_technical: i64) -> Vec<StockRecord> {
    stocks
        .iter()
        .filter(|s| s.technical_score >= min_technical)
        .cloned()
        .collect()
}

/// Read the results sheet and return the stocks passing `min_technical`.
pub fn normalize_stocks<S: SheetSource + ?Sized>(
    source: &mut S,
    results_sheet: &str,
    min_technical: i64,
) -> Result<Vec<StockRecord>, DataError> {
    Ok(read_stock_sheet(source, results_sheet)?.filter_min_technical(min_technical))
}

/// Read the results sheet without score filtering.
pub fn read_stock_sheet<S: SheetSource + ?Sized>(
    source: &mut S,
    results_sheet: &str,
) -> Result<StockSheet, DataError> {
    let missing_sheet = |available: Vec<String>| DataError::MissingSheet {
        sheet: results_sheet.to_string(),
        available,
    };
    if !source.has_sheet(results_sheet) {
        return Err(missing_sheet(source.sheet_names()));
    }
    let grid = source
        .read_grid(results_sheet)
        .ok_or_else(|| missing_sheet(source.sheet_names()))?;
    let table = locate_table(results_sheet, &grid, SYMBOL_COLUMN).ok_or_else(|| {
        DataError::MissingColumn {
            sheet: results_sheet.to_string(),
            column: SYMBOL_COLUMN.to_string(),
        }
    })?;

    let (stocks, report) = stock_records(&table)?;
    let sector_map = sector_map_from_table(&table);

    tracing::info!(
        sheet = results_sheet,
        kept = stocks.len(),
        dropped = report.rows_dropped,
        industries = sector_map.len(),
        "normalized screening stocks"
    );

    Ok(StockSheet {
        stocks,
        sector_map,
        report,
    })
}

fn stock_records(table: &Table) -> Result<(Vec<StockRecord>, NormalizeReport), DataError> {
    let df = table.project(&REQUIRED)?;
    let symbols = text_column(&df, SYMBOL_COLUMN)?;
    let industries = text_column(&df, STOCK_INDUSTRY_COLUMN)?;
    let companies = text_column(&df, COMPANY_NAME_COLUMN)?;
    let technical = coerce_f64(&df, TECHNICAL_SCORE_COLUMN)?;
    let screening = coerce_f64(&df, SCREENING_SCORE_COLUMN)?;
    let pressure = coerce_f64(&df, STOCK_BUY_PRESSURE_COLUMN)?;
    let sectors = table.column_index(SECTOR_COLUMN);

    let mut stocks = Vec::with_capacity(df.height());
    for i in 0..df.height() {
        let (Some(symbol), Some(industry)) = (symbols.get(i), industries.get(i)) else {
            continue;
        };
        let (Some(tech), Some(scr), Some(bp)) = (technical.get(i), screening.get(i), pressure.get(i))
        else {
            continue;
        };
        if !(tech.is_finite() && scr.is_finite()) || bp.is_nan() {
            continue;
        }
        // Technical scores are integers; anything else is malformed.
        if tech.fract() != 0.0 {
            continue;
        }
        stocks.push(StockRecord {
            symbol: symbol.to_string(),
            industry: industry.to_string(),
            technical_score: tech as i64,
            screening_score: scr,
            buy_pressure: bp,
            company_name: companies.get(i).unwrap_or_default().to_string(),
            raw_sector: sectors.and_then(|idx| cell_text(&table.rows[i], idx)),
            sector: None,
        });
    }

    let report = NormalizeReport::new(df.height(), stocks.len());
    if report.rows_dropped > 0 {
        tracing::debug!(sheet = %table.sheet, dropped = report.rows_dropped, "dropped incomplete stock rows");
    }
    Ok((stocks, report))
}

/// Modal sector per industry over every raw row, scores notwithstanding.
fn sector_map_from_table(table: &Table) -> IndustrySectorMap {
    let (Some(ind_idx), Some(sec_idx)) = (
        table.column_index(STOCK_INDUSTRY_COLUMN),
        table.column_index(SECTOR_COLUMN),
    ) else {
        return IndustrySectorMap::default();
    };
    IndustrySectorMap::from_observations(
        table
            .rows
            .iter()
            .filter_map(|row| Some((cell_text(row, ind_idx)?, cell_text(row, sec_idx)?))),
    )
}

fn cell_text(row: &[Cell], idx: usize) -> Option<String> {
    row.get(idx).and_then(Cell::as_text)
}
