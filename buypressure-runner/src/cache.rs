//! Single-slot memoization of the loaded snapshot data.
//!
//! The cache is keyed by nothing: new snapshot files are only picked up
//! after [`LoadCache::invalidate`]. Readers share one `Arc<LoadedData>`.

use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::config::PipelineConfig;
use crate::loader::{load_snapshot_data, LoadError, LoadedData};

/// One lazily computed value, shared behind an `Arc`.
///
/// Errors from the loader are returned to the caller and leave the slot
/// empty, so the next call retries.
#[derive(Debug)]
pub struct Memoized<T> {
    slot: Mutex<Option<Arc<T>>>,
}

impl<T> Default for Memoized<T> {
    fn default() -> Self {
        Self {
            slot: Mutex::new(None),
        }
    }
}

impl<T> Memoized<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached value or run `load` to fill the slot.
    ///
    /// The lock is held across `load`, so concurrent callers wait for the
    /// first load instead of starting their own.
    pub fn get_or_try_load<E, F>(&self, load: F) -> Result<Arc<T>, E>
    where
        F: FnOnce() -> Result<T, E>,
    {
        let mut slot = self.slot.lock();
        if let Some(value) = slot.as_ref() {
            return Ok(Arc::clone(value));
        }
        let value = Arc::new(load()?);
        *slot = Some(Arc::clone(&value));
        Ok(value)
    }

    /// The cached value, without loading.
    pub fn peek(&self) -> Option<Arc<T>> {
        self.slot.lock().clone()
    }

    /// Drop the cached value. Returns whether one was present.
    pub fn invalidate(&self) -> bool {
        self.slot.lock().take().is_some()
    }
}

/// Memoized [`load_snapshot_data`] for one configuration.
#[derive(Debug)]
pub struct LoadCache {
    config: PipelineConfig,
    memo: Memoized<LoadedData>,
    loads: AtomicUsize,
}

impl LoadCache {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            memo: Memoized::new(),
            loads: AtomicUsize::new(0),
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Loaded data, reading the snapshots only on the first call after
    /// construction or invalidation.
    pub fn get(&self) -> Result<Arc<LoadedData>, LoadError> {
        self.memo.get_or_try_load(|| {
            self.loads.fetch_add(1, Ordering::Relaxed);
            load_snapshot_data(&self.config)
        })
    }

    pub fn is_loaded(&self) -> bool {
        self.memo.peek().is_some()
    }

    /// Forget the cached data so the next [`get`](Self::get) re-reads the
    /// data directory.
    pub fn invalidate(&self) {
        if self.memo.invalidate() {
            tracing::info!("load cache invalidated");
        }
    }

    /// Number of loads attempted, successful or not.
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn value_computed_once() {
        let memo = Memoized::new();
        let calls = Cell::new(0);
        let load = || -> Result<u32, ()> {
            calls.set(calls.get() + 1);
            Ok(7)
        };
        let a = memo.get_or_try_load(load).unwrap();
        let b = memo.get_or_try_load(load).unwrap();
        assert_eq!(*a, 7);
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn errors_are_not_cached() {
        let memo: Memoized<u32> = Memoized::new();
        assert_eq!(memo.get_or_try_load(|| Err("boom")), Err("boom"));
        assert!(memo.peek().is_none());
        assert_eq!(*memo.get_or_try_load(|| Ok::<_, &str>(3)).unwrap(), 3);
    }

    #[test]
    fn invalidate_forces_reload() {
        let memo = Memoized::new();
        memo.get_or_try_load(|| Ok::<_, ()>(1)).unwrap();
        assert!(memo.invalidate());
        assert!(!memo.invalidate());
        let v = memo.get_or_try_load(|| Ok::<_, ()>(2)).unwrap();
        assert_eq!(*v, 2);
    }

    #[test]
    fn failed_load_counts_but_stays_empty() {
        let cache = LoadCache::new(PipelineConfig::with_data_dir("does/not/exist"));
        assert!(cache.get().is_err());
        assert!(cache.get().is_err());
        assert_eq!(cache.load_count(), 2);
        assert!(!cache.is_loaded());
    }
}
