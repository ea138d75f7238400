//! Registry of hash algorithm implementations
//!
//! The registry is built once at configuration time and shared read-only
//! with the manager; there is no process-wide instance.

use super::AlgorithmId;
use super::traits::HashAlgorithmImpl;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Lookup table from [`AlgorithmId`] to implementation
#[derive(Clone)]
pub struct AlgorithmRegistry {
    algorithms: HashMap<AlgorithmId, Arc<dyn HashAlgorithmImpl>>,
}

impl AlgorithmRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            algorithms: HashMap::new(),
        }
    }

    /// Create a registry holding every built-in algorithm
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        super::algorithms::register_all(&mut registry);
        registry
    }

    /// Register a new algorithm, replacing any previous one with the same id
    pub fn register(&mut self, algorithm: impl HashAlgorithmImpl + 'static) {
        self.algorithms.insert(algorithm.id(), Arc::new(algorithm));
    }

    /// Get algorithm by ID
    pub fn get(&self, id: &AlgorithmId) -> Option<Arc<dyn HashAlgorithmImpl>> {
        self.algorithms.get(id).cloned()
    }

    pub fn contains(&self, id: &AlgorithmId) -> bool {
        self.algorithms.contains_key(id)
    }

    /// List all registered algorithms, sorted
    pub fn list(&self) -> Vec<AlgorithmId> {
        let mut ids: Vec<_> = self.algorithms.keys().cloned().collect();
        ids.sort();
        ids
    }
}

impl Default for AlgorithmRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl fmt::Debug for AlgorithmRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlgorithmRegistry")
            .field("algorithms", &self.list())
            .finish()
    }
}
