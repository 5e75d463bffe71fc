//! Content-keyed memoization of table loads.
//!
//! A load is keyed by the BLAKE3 digest of the raw file bytes plus the
//! `LoadOptions` that shape the result. New content means a new key; entries
//! are never evicted. Each key is parsed at most once, even when several
//! callers ask for it at the same time, and every caller gets the same
//! `Arc<RecordTable>`.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex, OnceLock};

use crate::domain::RecordTable;
use crate::error::AnalysisError;
use crate::io::ingest::{LoadOptions, load_table, read_source, source_label};

type LoadResult = Result<Arc<RecordTable>, AnalysisError>;

/// Identity of one load: file content + options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheKey {
    digest: [u8; 32],
    options: LoadOptions,
}

impl CacheKey {
    pub fn new(bytes: &[u8], options: LoadOptions) -> Self {
        Self {
            digest: *blake3::hash(bytes).as_bytes(),
            options,
        }
    }
}

#[derive(Debug, Default)]
pub struct LoadCache {
    entries: Mutex<HashMap<CacheKey, Arc<OnceLock<LoadResult>>>>,
}

impl LoadCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-wide cache shared by every session.
    pub fn global() -> &'static LoadCache {
        static GLOBAL: OnceLock<LoadCache> = OnceLock::new();
        GLOBAL.get_or_init(LoadCache::new)
    }

    /// Read `path` and load it through the cache.
    ///
    /// The file is always re-read (that is how changed content is noticed);
    /// only parsing is skipped on a hit.
    pub fn load_path(&self, path: &Path, options: LoadOptions) -> LoadResult {
        let bytes = read_source(path)?;
        self.load_bytes(&bytes, &source_label(path), options)
    }

    /// Load `bytes` through the cache.
    ///
    /// `source` only labels a fresh parse; a hit returns the table under the
    /// label it was first loaded with. Failed parses are cached too.
    pub fn load_bytes(&self, bytes: &[u8], source: &str, options: LoadOptions) -> LoadResult {
        let key = CacheKey::new(bytes, options);
        let cell = {
            let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
            Arc::clone(entries.entry(key).or_default())
        };

        let mut parsed = false;
        let result = cell.get_or_init(|| {
            parsed = true;
            load_table(bytes, source, options).map(Arc::new)
        });
        if parsed {
            log::debug!("load cache miss for {source}");
        } else {
            log::debug!("load cache hit for {source}");
        }
        result.clone()
    }

    /// Number of distinct keys seen so far.
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PartialRange;

    const CSV_A: &[u8] = b"Job Title;Company Score;Location;Salary\nA;4.5;X;$1 - $3\n";
    const CSV_B: &[u8] = b"Job Title;Company Score;Location;Salary\nB;3.5;Y;$5 - N/A\n";

    #[test]
    fn same_content_is_parsed_once() {
        let cache = LoadCache::new();
        let first = cache.load_bytes(CSV_A, "a.csv", LoadOptions::default()).unwrap();
        let second = cache.load_bytes(CSV_A, "renamed.csv", LoadOptions::default()).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.source, "a.csv");
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn new_content_gets_a_new_entry() {
        let cache = LoadCache::new();
        let a = cache.load_bytes(CSV_A, "a.csv", LoadOptions::default()).unwrap();
        let b = cache.load_bytes(CSV_B, "b.csv", LoadOptions::default()).unwrap();
        assert!(!Arc::ptr_eq(&a, &b));
        assert_eq!(b.records[0].job_title.as_deref(), Some("B"));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn options_are_part_of_the_key() {
        let cache = LoadCache::new();
        let strict = cache.load_bytes(CSV_B, "b.csv", LoadOptions::default()).unwrap();
        let lenient = cache
            .load_bytes(
                CSV_B,
                "b.csv",
                LoadOptions {
                    partial_range: PartialRange::KnownHalf,
                },
            )
            .unwrap();
        assert_eq!(strict.records[0].avg_salary, None);
        assert_eq!(lenient.records[0].avg_salary, Some(5.0));
    }

    #[test]
    fn failures_are_cached() {
        let cache = LoadCache::new();
        let bad = b"Salary\n$1 - $2\n";
        assert!(cache.load_bytes(bad, "bad.csv", LoadOptions::default()).is_err());
        assert!(cache.load_bytes(bad, "bad.csv", LoadOptions::default()).is_err());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn concurrent_callers_share_one_table() {
        let cache = LoadCache::new();
        let tables: Vec<Arc<RecordTable>> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..4)
                .map(|_| s.spawn(|| cache.load_bytes(CSV_A, "a.csv", LoadOptions::default()).unwrap()))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });
        for t in &tables[1..] {
            assert!(Arc::ptr_eq(&tables[0], t));
        }
        assert_eq!(cache.len(), 1);
    }
}
