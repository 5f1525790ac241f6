//! Versioned record store
//!
//! Shared character/territory records are read and written through
//! compare-and-swap on a monotonically increasing version. Conflicting
//! writers re-read and retry; lost updates cannot occur.

use std::hash::Hash;
use std::sync::RwLock;

use ahash::AHashMap;

use crate::core::error::{HiveError, Result};

/// A record paired with its store version
#[derive(Debug, Clone, PartialEq)]
pub struct Versioned<T> {
    pub version: u64,
    pub value: T,
}

/// Outcome of a compare-and-swap attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CasOutcome {
    /// Write committed; the new version
    Committed(u64),
    /// Version mismatch; the version currently in the store
    Conflict(u64),
}

/// Read / compare-and-swap access to shared records
///
/// The collaborator persistence layer implements this against its own
/// storage; the in-memory implementation below backs tests and the demo
/// binary.
pub trait RecordStore<K, T>: Send + Sync {
    fn read(&self, id: &K) -> Option<Versioned<T>>;

    /// Write `value` only if the stored version still equals `expected`
    fn compare_and_swap(&self, id: &K, expected: u64, value: T) -> Result<CasOutcome>;

    /// Insert a fresh record at version 1, replacing any existing entry
    fn insert(&self, id: K, value: T);
}

/// Lock-per-store in-memory implementation
#[derive(Debug, Default)]
pub struct InMemoryStore<K, T> {
    records: RwLock<AHashMap<K, Versioned<T>>>,
}

impl<K, T> InMemoryStore<K, T>
where
    K: Hash + Eq + Clone,
    T: Clone,
{
    pub fn new() -> Self {
        Self {
            records: RwLock::new(AHashMap::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.records.read().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<K, T> RecordStore<K, T> for InMemoryStore<K, T>
where
    K: Hash + Eq + Clone + Send + Sync,
    T: Clone + Send + Sync,
{
    fn read(&self, id: &K) -> Option<Versioned<T>> {
        self.records.read().ok()?.get(id).cloned()
    }

    fn compare_and_swap(&self, id: &K, expected: u64, value: T) -> Result<CasOutcome> {
        let mut records = self
            .records
            .write()
            .map_err(|_| HiveError::PersistenceFailure("record store lock poisoned".into()))?;

        match records.get_mut(id) {
            Some(record) if record.version == expected => {
                record.version += 1;
                record.value = value;
                Ok(CasOutcome::Committed(record.version))
            }
            Some(record) => Ok(CasOutcome::Conflict(record.version)),
            None => {
                // Absent record: treat expected version 0 as an upsert
                if expected == 0 {
                    records.insert(id.clone(), Versioned { version: 1, value });
                    Ok(CasOutcome::Committed(1))
                } else {
                    Ok(CasOutcome::Conflict(0))
                }
            }
        }
    }

    fn insert(&self, id: K, value: T) {
        if let Ok(mut records) = self.records.write() {
            records.insert(id, Versioned { version: 1, value });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cas_commits_on_matching_version() {
        let store: InMemoryStore<u32, String> = InMemoryStore::new();
        store.insert(1, "first".into());

        let outcome = store.compare_and_swap(&1, 1, "second".into()).unwrap();
        assert_eq!(outcome, CasOutcome::Committed(2));
        assert_eq!(store.read(&1).unwrap().value, "second");
    }

    #[test]
    fn test_cas_conflicts_on_stale_version() {
        let store: InMemoryStore<u32, String> = InMemoryStore::new();
        store.insert(1, "first".into());
        store.compare_and_swap(&1, 1, "second".into()).unwrap();

        // Stale writer still holds version 1
        let outcome = store.compare_and_swap(&1, 1, "stale".into()).unwrap();
        assert_eq!(outcome, CasOutcome::Conflict(2));
        assert_eq!(store.read(&1).unwrap().value, "second");
    }

    #[test]
    fn test_cas_upsert_at_version_zero() {
        let store: InMemoryStore<u32, String> = InMemoryStore::new();
        let outcome = store.compare_and_swap(&7, 0, "fresh".into()).unwrap();
        assert_eq!(outcome, CasOutcome::Committed(1));
    }
}
