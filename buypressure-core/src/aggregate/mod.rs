//! Grouping of normalized records into industry and sector views.

pub mod crosstab;
pub mod matrix;
pub mod sector;

pub use crosstab::{build_crosstab, build_crosstabs, Crosstab};
pub use matrix::{build_matrix, order_industries, IndustryGroup, SortKey};
pub use sector::{rollup, IndustrySectorMap, SectorSummary, HIGH_RATING_THRESHOLD};
