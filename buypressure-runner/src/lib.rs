//! Buy-pressure runner: snapshot loading, the memoized load cache, filtered
//! dashboard views and their export.
//!
//! This crate builds on `buypressure-core` to provide:
//! - Configuration of the data directory, file prefixes and sheet names
//! - The all-or-nothing snapshot load with a dataset fingerprint
//! - A single-slot cache shared by display-layer readers
//! - Post-load filtering into matrix, cross-tab and sector structures
//! - JSON and CSV export

pub mod cache;
pub mod config;
pub mod export;
pub mod loader;
pub mod telemetry;
pub mod view;

pub use cache::{LoadCache, Memoized};
pub use config::{ConfigError, PipelineConfig, SheetConfig};
pub use export::{export_matrix_csv, export_sectors_csv, export_view_json, save_view_json};
pub use loader::{load_snapshot_data, LoadError, LoadedData};
pub use telemetry::init_tracing;
pub use view::{build_view, ClassifiedIndustry, ClassifiedStock, DashboardView, ViewOptions};
