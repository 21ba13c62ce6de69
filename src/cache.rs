// 🗃️ Dataset Cache - load once, reuse for the whole session
//
// The raw load is the expensive step; every per-filer table is cheap to
// recompute. The cache owns the loaded + resolved relations and a
// SHA-256 fingerprint of the four source files. It is only ever
// refreshed through the explicit reload hook - never implicitly.

use crate::error::PipelineError;
use crate::loader::{load_dataset, SourcePaths};
use crate::records::Dataset;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;

#[derive(Debug)]
pub struct DatasetCache {
    paths: SourcePaths,
    fingerprint: String,
    dataset: Dataset,
}

impl DatasetCache {
    /// Load all four relations, run identity resolution, and record the
    /// source fingerprint.
    pub fn load(paths: SourcePaths) -> Result<Self, PipelineError> {
        let fingerprint = fingerprint_sources(&paths)?;
        let mut dataset = load_dataset(&paths)?;
        dataset.resolve_identities();

        Ok(DatasetCache {
            paths,
            fingerprint,
            dataset,
        })
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn paths(&self) -> &SourcePaths {
        &self.paths
    }

    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    /// True when any source file changed since the cache was built.
    pub fn is_stale(&self) -> Result<bool, PipelineError> {
        Ok(fingerprint_sources(&self.paths)? != self.fingerprint)
    }

    /// Invalidation hook: re-read the source files unconditionally.
    pub fn reload(&mut self) -> Result<(), PipelineError> {
        let reloaded = DatasetCache::load(self.paths.clone())?;
        *self = reloaded;
        Ok(())
    }
}

fn hash_file(hasher: &mut Sha256, path: &Path) -> Result<(), PipelineError> {
    let bytes = fs::read(path).map_err(|source| PipelineError::DataUnavailable {
        path: path.to_path_buf(),
        source,
    })?;
    hasher.update(&bytes);
    Ok(())
}

fn fingerprint_sources(paths: &SourcePaths) -> Result<String, PipelineError> {
    let mut hasher = Sha256::new();
    for path in paths.all() {
        hash_file(&mut hasher, path)?;
    }
    Ok(format!("{:x}", hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::tests::write_fixture_dir;
    use std::io::Write;

    #[test]
    fn test_load_resolves_identities() {
        let dir = tempfile::tempdir().unwrap();
        write_fixture_dir(dir.path());

        let cache = DatasetCache::load(SourcePaths::in_dir(dir.path())).unwrap();

        // names are canonical after load: uppercase, overrides applied
        let expenses = &cache.dataset().expenses;
        assert!(expenses
            .iter()
            .any(|r| r.filing_org.as_deref() == Some("ILLINOIS POLICY INSTITUTE")));
        assert!(expenses
            .iter()
            .any(|r| r.filing_org.as_deref() == Some("THE COMMON GOOD INSTITUTE INC")));
    }

    #[test]
    fn test_fingerprint_is_stable_until_files_change() {
        let dir = tempfile::tempdir().unwrap();
        write_fixture_dir(dir.path());

        let cache = DatasetCache::load(SourcePaths::in_dir(dir.path())).unwrap();
        assert_eq!(cache.fingerprint().len(), 64);
        assert!(!cache.is_stale().unwrap());

        // append a row to one source file
        let mut f = fs::OpenOptions::new()
            .append(true)
            .open(dir.path().join(crate::loader::PART_VII_B_FILE))
            .unwrap();
        f.write_all(b"366304585,2024-12-31,Illinois Policy Institute,NEW CO,1\n")
            .unwrap();
        drop(f);

        assert!(cache.is_stale().unwrap());
    }

    #[test]
    fn test_reload_picks_up_changes() {
        let dir = tempfile::tempdir().unwrap();
        write_fixture_dir(dir.path());

        let mut cache = DatasetCache::load(SourcePaths::in_dir(dir.path())).unwrap();
        let before = cache.dataset().contractors.len();

        let mut f = fs::OpenOptions::new()
            .append(true)
            .open(dir.path().join(crate::loader::PART_VII_B_FILE))
            .unwrap();
        f.write_all(b"366304585,2024-12-31,Illinois Policy Institute,NEW CO,1\n")
            .unwrap();
        drop(f);

        cache.reload().unwrap();
        assert_eq!(cache.dataset().contractors.len(), before + 1);
        assert!(!cache.is_stale().unwrap());
    }

    #[test]
    fn test_missing_file_fails_load() {
        let dir = tempfile::tempdir().unwrap();
        // no fixture files written
        let err = DatasetCache::load(SourcePaths::in_dir(dir.path())).unwrap_err();
        assert!(matches!(err, PipelineError::DataUnavailable { .. }));
    }
}
