//! Workbook access behind the [`SheetSource`] trait.
//!
//! The normalizer only needs sheet names and a dense cell grid per sheet, so
//! the calamine-backed reader and the in-memory workbook used in tests share
//! one small interface.

use calamine::{open_workbook_auto, Data, Range, Reader, Sheets};
use std::collections::BTreeMap;
use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use super::DataError;

/// A single spreadsheet cell, reduced to what normalization cares about.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
}

impl Cell {
    pub fn text(s: impl Into<String>) -> Self {
        Cell::Text(s.into())
    }

    /// Trimmed textual form; `None` for empty cells and blank text.
    pub fn as_text(&self) -> Option<String> {
        match self {
            Cell::Empty => None,
            Cell::Text(s) => {
                let t = s.trim();
                (!t.is_empty()).then(|| t.to_string())
            }
            Cell::Number(n) => Some(n.to_string()),
            Cell::Bool(b) => Some(b.to_string()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.as_text().is_none()
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Empty => Ok(()),
            Cell::Text(s) => f.write_str(s),
            Cell::Number(n) => write!(f, "{n}"),
            Cell::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<f64> for Cell {
    fn from(n: f64) -> Self {
        Cell::Number(n)
    }
}

/// Row-major cell grid. Row 0 is spreadsheet row 1 and column 0 is column A.
pub type Grid = Vec<Vec<Cell>>;

/// Anything that can hand out sheets by name.
pub trait SheetSource {
    /// Sheet names in workbook order.
    fn sheet_names(&self) -> Vec<String>;

    /// The full grid of a sheet, or `None` if the sheet does not exist or
    /// cannot be read.
    fn read_grid(&mut self, sheet: &str) -> Option<Grid>;

    fn has_sheet(&self, sheet: &str) -> bool {
        self.sheet_names().iter().any(|s| s == sheet)
    }
}

// ── In-memory workbook ──────────────────────────────────────────────

/// Workbook held in memory; keeps insertion order of sheets.
#[derive(Debug, Clone, Default)]
pub struct MemoryWorkbook {
    order: Vec<String>,
    sheets: BTreeMap<String, Grid>,
}

impl MemoryWorkbook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) a sheet.
    pub fn with_sheet(mut self, name: &str, grid: Grid) -> Self {
        if !self.sheets.contains_key(name) {
            self.order.push(name.to_string());
        }
        self.sheets.insert(name.to_string(), grid);
        self
    }
}

impl SheetSource for MemoryWorkbook {
    fn sheet_names(&self) -> Vec<String> {
        self.order.clone()
    }

    fn read_grid(&mut self, sheet: &str) -> Option<Grid> {
        self.sheets.get(sheet).cloned()
    }
}

// ── xlsx via calamine ───────────────────────────────────────────────

/// Snapshot workbook on disk, read with calamine.
pub struct XlsxWorkbook {
    path: PathBuf,
    inner: Sheets<BufReader<File>>,
}

impl XlsxWorkbook {
    pub fn open(path: &Path) -> Result<Self, DataError> {
        let inner = open_workbook_auto(path).map_err(|e| DataError::Workbook {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            path: path.to_path_buf(),
            inner,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SheetSource for XlsxWorkbook {
    fn sheet_names(&self) -> Vec<String> {
        self.inner.sheet_names()
    }

    fn read_grid(&mut self, sheet: &str) -> Option<Grid> {
        match self.inner.worksheet_range(sheet) {
            Ok(range) => Some(range_to_grid(&range)),
            Err(e) => {
                tracing::debug!(sheet, path = %self.path.display(), error = %e, "sheet unreadable");
                None
            }
        }
    }
}

/// Convert a calamine range into a grid anchored at A1.
///
/// calamine trims leading empty rows and columns; they are padded back so
/// row and column indices match the sheet.
fn range_to_grid(range: &Range<Data>) -> Grid {
    let (row_off, col_off) = range
        .start()
        .map(|(r, c)| (r as usize, c as usize))
        .unwrap_or((0, 0));

    let mut grid: Grid = vec![Vec::new(); row_off];
    for row in range.rows() {
        let mut cells = vec![Cell::Empty; col_off];
        cells.extend(row.iter().map(convert_cell));
        grid.push(cells);
    }
    grid
}

fn convert_cell(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Float(f) => Cell::Number(*f),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Bool(b) => Cell::Bool(*b),
        Data::Error(_) => Cell::Empty,
        other => Cell::Text(other.to_string()),
    }
}
