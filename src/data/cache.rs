use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::error::LoadError;
use super::loader::load_dataset;
use super::model::Dataset;

/// Process-lifetime memo of loaded datasets, keyed by the path as given.
///
/// Files are assumed static while the process runs, so entries are never
/// invalidated. Failed loads are not stored and will be retried.
#[derive(Debug, Default)]
pub struct DatasetCache {
    entries: HashMap<PathBuf, Arc<Dataset>>,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached dataset for `path`, loading it on first use.
    pub fn load(&mut self, path: &Path) -> Result<Arc<Dataset>, LoadError> {
        if let Some(dataset) = self.entries.get(path) {
            log::debug!("Cache hit for {}", path.display());
            return Ok(Arc::clone(dataset));
        }
        let dataset = Arc::new(load_dataset(path)?);
        self.entries.insert(path.to_path_buf(), Arc::clone(&dataset));
        Ok(dataset)
    }

    /// Number of distinct paths loaded so far.
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_load_is_served_from_memory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("budget.csv");
        std::fs::write(&path, "Name;2019;2020\nMoscow;10;20\n").unwrap();

        let mut cache = DatasetCache::new();
        let first = cache.load(&path).unwrap();

        // The file is gone; only the cache can answer now.
        std::fs::remove_file(&path).unwrap();
        let second = cache.load(&path).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(*first, *second);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn distinct_paths_get_distinct_entries() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.csv");
        let b = dir.path().join("b.csv");
        std::fs::write(&a, "Name;2019\nA;1\n").unwrap();
        std::fs::write(&b, "Name;2019\nB;2\n").unwrap();

        let mut cache = DatasetCache::new();
        let da = cache.load(&a).unwrap();
        let db = cache.load(&b).unwrap();

        assert!(!Arc::ptr_eq(&da, &db));
        assert_eq!(da.regions(), vec!["A"]);
        assert_eq!(db.regions(), vec!["B"]);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn failed_loads_are_not_cached() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("late.csv");

        let mut cache = DatasetCache::new();
        assert!(cache.load(&path).is_err());
        assert_eq!(cache.len(), 0);

        std::fs::write(&path, "Name;2019\nLate;1\n").unwrap();
        let ds = cache.load(&path).unwrap();
        assert_eq!(ds.regions(), vec!["Late"]);
    }
}
