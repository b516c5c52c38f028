//! Snapshot resolution: pick the newest `<prefix><YYYYMMDD_HHMMSS>.<ext>` file.
//!
//! The timestamp token is fixed-width and zero-padded, so the lexicographic
//! maximum is also the chronological maximum. Files that match the prefix
//! but carry no valid timestamp are skipped; they only matter when they are
//! the sole matches, which is reported as its own error.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use super::DataError;

pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Trailing `YYYYMMDD_HHMMSS` token of a file stem.
static TIMESTAMP_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{8}_\d{6})$").unwrap());

/// Returned by [`reporting_date`] when the file name carries no timestamp.
pub const UNKNOWN_DATE: &str = "unknown";

/// A resolved snapshot file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotFile {
    /// Logical dataset name, i.e. the prefix it was resolved from.
    pub logical_name: String,
    pub path: PathBuf,
    /// Raw `YYYYMMDD_HHMMSS` token.
    pub token: String,
    pub timestamp: NaiveDateTime,
}

impl SnapshotFile {
    /// Business date of the snapshot: the day before generation.
    pub fn reporting_date(&self) -> NaiveDate {
        self.timestamp.date() - Duration::days(1)
    }
}

/// Scans a directory for dated snapshot files.
pub struct SnapshotResolver {
    dir: PathBuf,
    extension: String,
}

impl SnapshotResolver {
    pub fn new(dir: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            extension: extension.into().trim_start_matches('.').to_string(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Resolve the newest file for `prefix`.
    ///
    /// A data directory that does not exist holds no snapshots and is
    /// reported as [`DataError::NoMatchingFiles`].
    pub fn resolve_latest(&self, prefix: &str) -> Result<SnapshotFile, DataError> {
        let names = match self.list_names() {
            Ok(names) => names,
            Err(DataError::Io { source, .. }) if source.kind() == ErrorKind::NotFound => {
                tracing::warn!(dir = %self.dir.display(), "data directory does not exist");
                Vec::new()
            }
            Err(e) => return Err(e),
        };
        resolve_from_names(&self.dir, &names, prefix, &self.extension)
    }

    fn list_names(&self) -> Result<Vec<String>, DataError> {
        let io_err = |source| DataError::Io {
            path: self.dir.clone(),
            source,
        };
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.dir).map_err(io_err)? {
            let entry = entry.map_err(io_err)?;
            if !entry.path().is_file() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                names.push(name.to_string());
            }
        }
        Ok(names)
    }
}

/// Resolve the newest snapshot among `names` (bare file names inside `dir`).
pub fn resolve_from_names(
    dir: &Path,
    names: &[String],
    prefix: &str,
    extension: &str,
) -> Result<SnapshotFile, DataError> {
    let suffix = format!(".{extension}");
    let matching: Vec<&String> = names
        .iter()
        .filter(|n| n.starts_with(prefix) && n.ends_with(&suffix))
        .collect();

    if matching.is_empty() {
        return Err(DataError::NoMatchingFiles {
            dir: dir.to_path_buf(),
            prefix: prefix.to_string(),
            extension: extension.to_string(),
        });
    }

    let best = matching
        .iter()
        .filter_map(|name| parse_timestamp(name, extension).map(|(tok, ts)| (tok, ts, *name)))
        .max_by(|a, b| a.0.cmp(&b.0));

    let Some((token, timestamp, name)) = best else {
        return Err(DataError::NoTimestampedFiles {
            dir: dir.to_path_buf(),
            prefix: prefix.to_string(),
            extension: extension.to_string(),
            count: matching.len(),
        });
    };

    tracing::info!(prefix, file = %name, candidates = matching.len(), "resolved snapshot");

    Ok(SnapshotFile {
        logical_name: prefix.to_string(),
        path: dir.join(name),
        token,
        timestamp,
    })
}

/// Extract the trailing `YYYYMMDD_HHMMSS` token just before `.{extension}`.
///
/// The token must also be a real calendar timestamp.
pub fn parse_timestamp(file_name: &str, extension: &str) -> Option<(String, NaiveDateTime)> {
    let stem = file_name.strip_suffix(extension)?.strip_suffix('.')?;
    let token = TIMESTAMP_TOKEN.captures(stem)?.get(1)?.as_str().to_string();
    let ts = NaiveDateTime::parse_from_str(&token, TIMESTAMP_FORMAT).ok()?;
    Some((token, ts))
}

/// Reporting date (`YYYY-MM-DD`, one day before the embedded timestamp) for a
/// file path, or `"unknown"` when the name carries no timestamp.
pub fn reporting_date(path: &Path) -> String {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return UNKNOWN_DATE.to_string();
    };
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    match parse_timestamp(name, extension) {
        Some((_, ts)) => (ts.date() - Duration::days(1)).format("%Y-%m-%d").to_string(),
        None => UNKNOWN_DATE.to_string(),
    }
}
