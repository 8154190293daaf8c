//! Bounded program store keyed by fingerprint.
//!
//! A least-recently-used mapping from code fingerprint to compiled program.
//! Lookups bump recency; inserting at capacity evicts the coldest entry.
//! Capacity is fixed at construction; there is no dynamic resize, so the
//! store is safe for concurrent lookups and inserts for its whole lifetime.
//! A process-wide default instance is available through
//! [`ProgramStore::global`], but every operation also accepts an explicit,
//! caller-owned store.

use crate::types::hash::Hash;
use crate::virtual_machine::program::{Program, ProgramStatus};
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, OnceLock};

/// Default number of cached programs.
pub const DEFAULT_CACHE_CAPACITY: usize = 1024;

/// Program-store configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
    /// Maximum number of cached programs.
    pub capacity: NonZeroUsize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            // DEFAULT_CACHE_CAPACITY is non-zero.
            capacity: NonZeroUsize::new(DEFAULT_CACHE_CAPACITY).unwrap(),
        }
    }
}

/// Fingerprint-to-program cache with LRU eviction.
///
/// The LRU order lives under a single mutex: individual lookups and inserts
/// are atomic, consecutive operations are not.
#[derive(Debug)]
pub struct ProgramStore {
    inner: Mutex<LruCache<Hash, Arc<Program>>>,
}

impl ProgramStore {
    /// Creates a store holding at most `capacity` programs.
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            inner: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Creates a store from a [`CacheConfig`].
    pub fn with_config(config: CacheConfig) -> Self {
        Self::new(config.capacity)
    }

    /// The process-wide default store at [`DEFAULT_CACHE_CAPACITY`].
    pub fn global() -> &'static ProgramStore {
        static GLOBAL: OnceLock<ProgramStore> = OnceLock::new();
        GLOBAL.get_or_init(ProgramStore::default)
    }

    /// Looks up a program by fingerprint, marking it most recently used.
    pub fn get(&self, id: &Hash) -> Option<Arc<Program>> {
        self.inner.lock().unwrap().get(id).cloned()
    }

    /// Inserts a program under its fingerprint, evicting the least recently
    /// used entry when at capacity.
    pub fn insert(&self, program: Arc<Program>) {
        self.inner.lock().unwrap().put(program.id, program);
    }

    /// Status of the program with the given fingerprint; `Unknown` for
    /// absent entries.
    pub fn status(&self, id: &Hash) -> ProgramStatus {
        match self.get(id) {
            Some(program) => program.status(),
            None => ProgramStatus::Unknown,
        }
    }

    /// Returns true if a program with this fingerprint is cached. Does not
    /// touch recency.
    pub fn contains(&self, id: &Hash) -> bool {
        self.inner.lock().unwrap().contains(id)
    }

    /// Number of cached programs.
    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().len()
    }

    /// Returns true if no programs are cached.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ProgramStore {
    fn default() -> Self {
        Self::with_config(CacheConfig::default())
    }
}
