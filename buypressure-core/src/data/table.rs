//! Locating a header row inside a sheet and projecting the table below it.
//!
//! Snapshot generations differ in how the table sits in its sheet, so
//! locating it is an ordered list of [`Layout`] strategies. Each either finds
//! the marker column or misses; the caller decides what a total miss means.

use polars::prelude::*;

use super::workbook::{Cell, Grid};
use super::DataError;

/// A header row plus the data rows beneath it.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub sheet: String,
    pub layout: Layout,
    pub header: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

/// How a table is laid out in its sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// Row 1 is the header and contains the marker column.
    HeaderFirstRow,
    /// Metadata rows come first; the header is the first row whose first
    /// cell equals the marker.
    HeaderMarkerRow,
}

impl Layout {
    /// Strategies in the order they are tried.
    pub const ORDERED: [Layout; 2] = [Layout::HeaderFirstRow, Layout::HeaderMarkerRow];

    pub fn name(self) -> &'static str {
        match self {
            Layout::HeaderFirstRow => "header-first-row",
            Layout::HeaderMarkerRow => "header-marker-row",
        }
    }

    /// Try to locate a table whose header contains `marker`.
    pub fn locate(self, sheet: &str, grid: &Grid, marker: &str) -> Option<Table> {
        let header_idx = match self {
            Layout::HeaderFirstRow => {
                let first = grid.first()?;
                first
                    .iter()
                    .any(|c| c.as_text().as_deref() == Some(marker))
                    .then_some(0)?
            }
            Layout::HeaderMarkerRow => grid.iter().position(|row| {
                row.first().and_then(Cell::as_text).as_deref() == Some(marker)
            })?,
        };
        Some(Table::from_header_row(sheet, self, grid, header_idx))
    }
}

/// Try every layout in order against one sheet.
pub fn locate_table(sheet: &str, grid: &Grid, marker: &str) -> Option<Table> {
    Layout::ORDERED.iter().find_map(|layout| {
        let found = layout.locate(sheet, grid, marker);
        if found.is_none() {
            tracing::debug!(sheet, layout = layout.name(), marker, "layout did not match");
        }
        found
    })
}

impl Table {
    fn from_header_row(sheet: &str, layout: Layout, grid: &Grid, header_idx: usize) -> Self {
        let header = grid[header_idx]
            .iter()
            .map(|c| c.as_text().unwrap_or_default())
            .collect();
        let rows = grid[header_idx + 1..]
            .iter()
            .filter(|row| row.iter().any(|c| !c.is_empty()))
            .cloned()
            .collect();
        Self {
            sheet: sheet.to_string(),
            layout,
            header,
            rows,
        }
    }

    /// Index of the first header cell named `column`.
    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.header.iter().position(|h| h == column)
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.column_index(column).is_some()
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Project the named columns into a string-typed frame.
    ///
    /// Fails with [`DataError::MissingColumn`] on the first absent column.
    pub fn project(&self, columns: &[&str]) -> Result<DataFrame, DataError> {
        let mut out = Vec::with_capacity(columns.len());
        for &name in columns {
            let idx = self.column_index(name).ok_or_else(|| DataError::MissingColumn {
                sheet: self.sheet.clone(),
                column: name.to_string(),
            })?;
            let values: Vec<Option<String>> = self
                .rows
                .iter()
                .map(|row| row.get(idx).and_then(Cell::as_text))
                .collect();
            out.push(Column::new(name.into(), values));
        }
        Ok(DataFrame::new(out)?)
    }
}

/// Coerce a projected column to `Float64`; unparseable values become null.
pub fn coerce_f64(df: &DataFrame, column: &str) -> Result<Float64Chunked, DataError> {
    let cast = df.column(column)?.cast(&DataType::Float64)?;
    Ok(cast.f64()?.clone())
}

/// Borrow a projected text column.
pub fn text_column<'a>(df: &'a DataFrame, column: &str) -> Result<&'a StringChunked, DataError> {
    Ok(df.column(column)?.str()?)
}
