use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::errors::{HopError, HopResult};

/// One link record: a short key mapped to a destination URL.
///
/// `created_at` is the Unix timestamp (seconds since epoch) at which the key
/// first appeared and never changes afterwards; `updated_at` moves on every
/// rewrite. On the first write both carry the same value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub key: String,
    pub url: String,
    pub created_at: i64,
    pub updated_at: i64,
}

/// The authoritative in-memory map of all links.
///
/// Readers take a shared lock and clone entries out; the persistence worker
/// is the only caller of [`LinkStore::commit`]. Cloning the store is cheap,
/// all clones share the same map.
#[derive(Clone, Default)]
pub struct LinkStore {
    inner: Arc<RwLock<HashMap<String, Entry>>>,
}

impl LinkStore {
    /// Create a new, empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look a key up. Absence is a normal outcome, not an error.
    pub fn lookup(&self, key: &str) -> Option<Entry> {
        self.inner.read().get(key).cloned()
    }

    /// Build the entry a write for `key` should commit, without touching the
    /// map: an existing key keeps its `created_at`, a new key gets
    /// `created_at == updated_at == now`.
    pub fn upsert(&self, key: &str, url: String, now: i64) -> HopResult<Entry> {
        if key.is_empty() {
            return Err(HopError::EmptyKey);
        }
        let created_at = self
            .inner
            .read()
            .get(key)
            .map(|e| e.created_at)
            .unwrap_or(now);
        Ok(Entry {
            key: key.to_string(),
            url,
            created_at,
            updated_at: now,
        })
    }

    /// Write `entry` into the map under `entry.key`, replacing any previous
    /// value. Exclusive lock; only the persistence worker calls this while
    /// the server runs.
    pub fn commit(&self, entry: Entry) {
        self.inner.write().insert(entry.key.clone(), entry);
    }

    /// Full copy of the map for serialization. Taken under the shared lock,
    /// so it never observes a half-written entry.
    pub fn snapshot_copy(&self) -> HashMap<String, Entry> {
        self.inner.read().clone()
    }

    /// Number of stored links.
    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_upsert_sets_both_timestamps() {
        let store = LinkStore::new();
        let e = store.upsert("go", "example.com/docs".into(), 1000).unwrap();
        assert_eq!(e.key, "go");
        assert_eq!(e.url, "example.com/docs");
        assert_eq!(e.created_at, 1000);
        assert_eq!(e.updated_at, 1000);
    }

    #[test]
    fn rewrite_preserves_created_at() {
        let store = LinkStore::new();
        let first = store.upsert("go", "example.com/docs".into(), 1000).unwrap();
        store.commit(first);

        let second = store.upsert("go", "example.org".into(), 2000).unwrap();
        assert_eq!(second.created_at, 1000);
        assert_eq!(second.updated_at, 2000);
        assert_eq!(second.url, "example.org");

        store.commit(second);
        let seen = store.lookup("go").unwrap();
        assert_eq!(seen.created_at, 1000);
        assert_eq!(seen.updated_at, 2000);
    }

    #[test]
    fn empty_key_is_rejected() {
        let store = LinkStore::new();
        assert!(matches!(
            store.upsert("", "example.com".into(), 1),
            Err(HopError::EmptyKey)
        ));
    }

    #[test]
    fn lookup_miss_is_none() {
        let store = LinkStore::new();
        assert!(store.lookup("nope").is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn commit_overwrites_by_key() {
        let store = LinkStore::new();
        store.commit(Entry {
            key: "go".into(),
            url: "a".into(),
            created_at: 1,
            updated_at: 1,
        });
        store.commit(Entry {
            key: "go".into(),
            url: "b".into(),
            created_at: 1,
            updated_at: 2,
        });
        assert_eq!(store.len(), 1);
        assert_eq!(store.lookup("go").unwrap().url, "b");
    }

    #[test]
    fn concurrent_writers_on_disjoint_keys() {
        let store = LinkStore::new();
        let mut handles = Vec::new();

        for i in 0..8u32 {
            let s = store.clone();
            handles.push(std::thread::spawn(move || {
                let key = format!("k{i}");
                for n in 0..100i64 {
                    let e = s.upsert(&key, format!("url{n}"), n).unwrap();
                    s.commit(e);
                    // interleave reads of a neighbouring key
                    let _ = s.lookup(&format!("k{}", (i + 1) % 8));
                }
            }));
        }
        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(store.len(), 8);
        for i in 0..8u32 {
            let e = store.lookup(&format!("k{i}")).unwrap();
            assert_eq!(e.url, "url99", "last committed value wins");
            assert_eq!(e.created_at, 0);
            assert_eq!(e.updated_at, 99);
        }
    }
}
