//! Snapshot resolution and spreadsheet normalization.

pub mod error;
pub mod industry;
pub mod snapshot;
pub mod stock;
pub mod table;
pub mod workbook;

pub use error::DataError;
pub use industry::{normalize_industries, IndustrySheets, IndustryTables};
pub use snapshot::{reporting_date, SnapshotFile, SnapshotResolver};
pub use stock::{filter_min_technical, normalize_stocks, read_stock_sheet, StockSheet};
pub use table::{Layout, Table};
pub use workbook::{Cell, Grid, MemoryWorkbook, SheetSource, XlsxWorkbook};

use serde::{Deserialize, Serialize};

/// Row counts from one normalization pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizeReport {
    /// Non-blank data rows under the header.
    pub rows_read: usize,
    /// Rows excluded for missing or non-numeric fields.
    pub rows_dropped: usize,
}

impl NormalizeReport {
    pub fn new(rows_read: usize, kept: usize) -> Self {
        Self {
            rows_read,
            rows_dropped: rows_read.saturating_sub(kept),
        }
    }

    pub fn kept(&self) -> usize {
        self.rows_read - self.rows_dropped
    }
}
