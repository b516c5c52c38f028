//! Industry snapshot normalization.
//!
//! Produces the qualifying industry table and, best effort, the full
//! industry population used for sector ranking.

use serde::{Deserialize, Serialize};

use super::table::{coerce_f64, locate_table, text_column, Table};
use super::workbook::SheetSource;
use super::{DataError, NormalizeReport};
use crate::domain::IndustryRecord;

pub const INDUSTRY_COLUMN: &str = "Industry";
pub const RS_RATING_COLUMN: &str = "RS_Rating";
pub const BUY_PRESSURE_COLUMN: &str = "Buy_Pressure";

/// Sheet names inside an industry snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndustrySheets {
    /// Industries that passed the multi-condition screen.
    pub qualified: String,
    /// Every industry, qualified or not. Optional in older snapshots.
    pub full_population: String,
}

impl Default for IndustrySheets {
    fn default() -> Self {
        Self {
            qualified: "Qualified_Industries".into(),
            full_population: "All_Industries".into(),
        }
    }
}

/// Normalized industry tables of one snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct IndustryTables {
    pub qualifying: Vec<IndustryRecord>,
    /// Full population; equal to `qualifying` when the snapshot has no
    /// usable full-population sheet.
    pub all: Vec<IndustryRecord>,
    pub report: NormalizeReport,
    pub full_population_found: bool,
}

/// Extract both industry tables from a snapshot workbook.
pub fn normalize_industries<S: SheetSource + ?Sized>(
    source: &mut S,
    sheets: &IndustrySheets,
) -> Result<IndustryTables, DataError> {
    let table = locate_qualifying(source, &sheets.qualified)?;
    let (qualifying, report) = industry_records(&table)?;

    tracing::info!(
        sheet = %table.sheet,
        layout = table.layout.name(),
        kept = qualifying.len(),
        dropped = report.rows_dropped,
        "normalized qualifying industries"
    );

    let (all, full_population_found) = match read_full_population(source, &sheets.full_population)
    {
        Some(all) => (all, true),
        None => {
            tracing::warn!(
                sheet = %sheets.full_population,
                "full-population sheet unavailable, using qualifying industries"
            );
            (qualifying.clone(), false)
        }
    };

    Ok(IndustryTables {
        qualifying,
        all,
        report,
        full_population_found,
    })
}

/// Find the qualifying table: the named sheet when present, otherwise the
/// first sheet where any layout finds an "Industry" header.
fn locate_qualifying<S: SheetSource + ?Sized>(
    source: &mut S,
    preferred: &str,
) -> Result<Table, DataError> {
    let names = source.sheet_names();
    let candidates: Vec<String> = if names.iter().any(|n| n == preferred) {
        vec![preferred.to_string()]
    } else {
        names.clone()
    };

    for sheet in &candidates {
        let Some(grid) = source.read_grid(sheet) else {
            continue;
        };
        if let Some(table) = locate_table(sheet, &grid, INDUSTRY_COLUMN) {
            return Ok(table);
        }
    }

    Err(DataError::MissingHeader { sheets: names })
}

fn read_full_population<S: SheetSource + ?Sized>(
    source: &mut S,
    sheet: &str,
) -> Option<Vec<IndustryRecord>> {
    if !source.has_sheet(sheet) {
        return None;
    }
    let grid = source.read_grid(sheet)?;
    let table = locate_table(sheet, &grid, INDUSTRY_COLUMN)?;
    match industry_records(&table) {
        Ok((records, report)) => {
            tracing::debug!(sheet, kept = records.len(), dropped = report.rows_dropped, "full population");
            Some(records)
        }
        Err(e) => {
            tracing::debug!(sheet, error = %e, "full-population sheet rejected");
            None
        }
    }
}

/// Keep industry, rating and pressure; drop rows where any is missing or
/// non-numeric.
pub fn industry_records(table: &Table) -> Result<(Vec<IndustryRecord>, NormalizeReport), DataError> {
    let df = table.project(&[INDUSTRY_COLUMN, RS_RATING_COLUMN, BUY_PRESSURE_COLUMN])?;
    let names = text_column(&df, INDUSTRY_COLUMN)?;
    let ratings = coerce_f64(&df, RS_RATING_COLUMN)?;
    let pressures = coerce_f64(&df, BUY_PRESSURE_COLUMN)?;

    let records: Vec<IndustryRecord> = names
        .into_iter()
        .zip(&ratings)
        .zip(&pressures)
        .filter_map(|((name, rs), bp)| match (name, rs, bp) {
            (Some(name), Some(rs), Some(bp)) if !rs.is_nan() && !bp.is_nan() => {
                Some(IndustryRecord::new(name, rs, bp))
            }
            _ => None,
        })
        .collect();

    let report = NormalizeReport::new(df.height(), records.len());
    if report.rows_dropped > 0 {
        tracing::debug!(sheet = %table.sheet, dropped = report.rows_dropped, "dropped non-numeric industry rows");
    }
    Ok((records, report))
}
