//! Buy-pressure core: the ingestion, normalization, classification and
//! aggregation pipeline behind the industry buy-pressure dashboard.
//!
//! - Snapshot resolution (newest dated workbook per dataset prefix)
//! - Spreadsheet normalization tolerant of layout drift between snapshot
//!   generations
//! - Six-bucket buy-pressure classification and gradient coloring
//! - Industry matrix, score cross-tabs and sector rollup

pub mod aggregate;
pub mod classify;
pub mod data;
pub mod domain;

pub use aggregate::{
    build_crosstab, build_matrix, rollup, Crosstab, IndustryGroup, IndustrySectorMap,
    SectorSummary, SortKey,
};
pub use classify::{classify, color_for, Rgb};
pub use data::{DataError, SnapshotFile, SnapshotResolver};
pub use domain::{BuyPressureStatus, IndustryRecord, StockRecord};

#[cfg(test)]
mod tests {
    use super::*;

    /// Loaded data is handed to display threads, so records must stay
    /// `Send + Sync`.
    #[test]
    fn records_are_send_sync() {
        fn require<T: Send + Sync>() {}
        require::<IndustryRecord>();
        require::<StockRecord>();
        require::<BuyPressureStatus>();
        require::<IndustrySectorMap>();
        require::<SectorSummary>();
        require::<IndustryGroup>();
        require::<Crosstab>();
        require::<SnapshotFile>();
        require::<DataError>();
    }
}
