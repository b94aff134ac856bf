//! Content-keyed dataset cache
//!
//! Holds the most recently loaded dataset together with the identity of the
//! bytes it came from. Loading the same bytes again returns the cached
//! `Arc` without parsing; loading different bytes replaces the entry.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use super::dataset::{load_dataset, Dataset, LoaderOptions};
use crate::error::{KardexError, KardexResult};

/// Identity of a file's content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FileIdentity {
    len: usize,
    digest: u64,
}

impl FileIdentity {
    /// Compute the identity of some bytes
    pub fn of(bytes: &[u8]) -> Self {
        let mut hasher = DefaultHasher::new();
        bytes.hash(&mut hasher);
        Self {
            len: bytes.len(),
            digest: hasher.finish(),
        }
    }
}

/// Single-entry dataset cache
#[derive(Debug)]
pub struct DatasetCache {
    options: LoaderOptions,
    entry: Option<(FileIdentity, Arc<Dataset>)>,
    parse_count: usize,
}

impl DatasetCache {
    /// Create an empty cache that parses with the given options
    pub fn new(options: LoaderOptions) -> Self {
        Self {
            options,
            entry: None,
            parse_count: 0,
        }
    }

    /// Return the dataset for these bytes, parsing only on a cache miss
    ///
    /// A failed parse leaves the previous entry in place.
    pub fn get_or_load(&mut self, bytes: &[u8]) -> KardexResult<Arc<Dataset>> {
        let identity = FileIdentity::of(bytes);

        if let Some((cached, dataset)) = &self.entry {
            if *cached == identity {
                debug!(bytes = bytes.len(), "dataset cache hit");
                return Ok(Arc::clone(dataset));
            }
        }

        debug!(bytes = bytes.len(), "dataset cache miss");
        self.parse_count += 1;
        let dataset = Arc::new(load_dataset(bytes, &self.options)?);
        self.entry = Some((identity, Arc::clone(&dataset)));
        Ok(dataset)
    }

    /// Read a file and return its dataset through the cache
    pub fn load_path(&mut self, path: &Path) -> KardexResult<Arc<Dataset>> {
        let bytes = std::fs::read(path)
            .map_err(|e| KardexError::Io(format!("Failed to read {}: {}", path.display(), e)))?;
        self.get_or_load(&bytes)
    }

    /// The currently cached dataset, if any
    pub fn current(&self) -> Option<Arc<Dataset>> {
        self.entry.as_ref().map(|(_, dataset)| Arc::clone(dataset))
    }

    /// Number of parses performed (cache misses)
    pub fn parse_count(&self) -> usize {
        self.parse_count
    }
}

impl Default for DatasetCache {
    fn default() -> Self {
        Self::new(LoaderOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FILE_A: &str = "NROEMPRESA;CODGERALOPER;SEQPRODUTO;DTAENTRADASAIDA;QTDLANCTO;VALORVLRNF;LOCAL;TIPLANCTO;GERALTERACAOESTQ;GERALTERACAOESTQFISC\n1;1;1;01/01/2024;10;1;A;E;S;S";

    #[test]
    fn test_same_bytes_hit_the_cache() {
        let mut cache = DatasetCache::default();

        let first = cache.get_or_load(FILE_A.as_bytes()).unwrap();
        let second = cache.get_or_load(FILE_A.as_bytes().to_vec().as_slice()).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.parse_count(), 1);
    }

    #[test]
    fn test_new_content_replaces_entry() {
        let mut cache = DatasetCache::default();
        let file_b = format!("{}\n2;1;1;02/01/2024;5;1;A;S;S;S", FILE_A);

        let first = cache.get_or_load(FILE_A.as_bytes()).unwrap();
        let second = cache.get_or_load(file_b.as_bytes()).unwrap();

        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(second.len(), 2);
        assert_eq!(cache.parse_count(), 2);
        assert!(Arc::ptr_eq(&cache.current().unwrap(), &second));
    }

    #[test]
    fn test_failed_load_keeps_previous_entry() {
        let mut cache = DatasetCache::default();
        let good = cache.get_or_load(FILE_A.as_bytes()).unwrap();

        assert!(cache.get_or_load(b"A;B\n1;2").is_err());
        assert!(Arc::ptr_eq(&cache.current().unwrap(), &good));
    }

    #[test]
    fn test_load_path_uses_content_identity() {
        let dir = tempfile::TempDir::new().unwrap();
        let a = dir.path().join("a.csv");
        let b = dir.path().join("b.csv");
        std::fs::write(&a, FILE_A).unwrap();
        std::fs::write(&b, FILE_A).unwrap();

        let mut cache = DatasetCache::default();
        let first = cache.load_path(&a).unwrap();
        let second = cache.load_path(&b).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.parse_count(), 1);
    }

    #[test]
    fn test_identity_depends_on_content() {
        assert_eq!(FileIdentity::of(b"abc"), FileIdentity::of(b"abc"));
        assert_ne!(FileIdentity::of(b"abc"), FileIdentity::of(b"abd"));
    }
}
