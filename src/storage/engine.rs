//! Thread-Safe Key-Value Store
//!
//! This module implements the shared store behind every connection.
//!
//! ## Design Decisions
//!
//! 1. **Sharded Locks**: Keys are spread over independent shards, so writers
//!    on different keys rarely touch the same lock.
//! 2. **RwLock per Shard**: Many concurrent readers, one writer at a time.
//! 3. **Whole-Value Replacement**: `set` swaps the entry under the write lock,
//!    so a reader sees either the old value or the new one.
//!
//! ## Concurrency Model
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                          Store                              │
//! │  ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌─────────┐           │
//! │  │ Shard 0 │ │ Shard 1 │ │ Shard 2 │ │ Shard N │           │
//! │  │ RwLock  │ │ RwLock  │ │ RwLock  │ │ RwLock  │           │
//! │  │ HashMap │ │ HashMap │ │ HashMap │ │ HashMap │           │
//! │  └─────────┘ └─────────┘ └─────────┘ └─────────┘           │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! No lock is held across a whole command, only across the single key access.

use crate::storage::value::Value;
use std::collections::HashMap;
use std::hash::{DefaultHasher, Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Number of shards for the store.
const NUM_SHARDS: usize = 64;

/// A single shard containing a portion of the key-value pairs.
#[derive(Debug, Default)]
struct Shard {
    data: RwLock<HashMap<String, Value>>,
}

impl Shard {
    // A panic while holding the lock cannot leave a half-written Value
    // behind (insert is all-or-nothing), so a poisoned map is still usable.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, Value>> {
        self.data.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, Value>> {
        self.data.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// The shared key-value store.
///
/// Created once at startup and handed to every connection worker by `Arc`.
/// All operations are thread-safe; callers never lock anything themselves.
///
/// # Example
///
/// ```
/// use emberkv::storage::{Store, Value};
///
/// let store = Store::new();
/// store.set("name", Value::from("Ariz"));
/// assert_eq!(store.get("name"), Some(Value::from("Ariz")));
/// assert_eq!(store.get("missing"), None);
/// ```
pub struct Store {
    /// Sharded storage for reduced lock contention
    shards: Vec<Shard>,

    /// Statistics: total GET operations
    get_count: AtomicU64,

    /// Statistics: total SET operations
    set_count: AtomicU64,
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("shards", &self.shards.len())
            .field("get_count", &self.get_count.load(Ordering::Relaxed))
            .field("set_count", &self.set_count.load(Ordering::Relaxed))
            .finish()
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl Store {
    /// Creates an empty store.
    pub fn new() -> Self {
        let shards = (0..NUM_SHARDS).map(|_| Shard::default()).collect();

        Self {
            shards,
            get_count: AtomicU64::new(0),
            set_count: AtomicU64::new(0),
        }
    }

    /// Determines which shard a key belongs to.
    #[inline]
    fn shard_index(&self, key: &str) -> usize {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        (hasher.finish() as usize) % NUM_SHARDS
    }

    #[inline]
    fn get_shard(&self, key: &str) -> &Shard {
        &self.shards[self.shard_index(key)]
    }

    /// Binds `value` to `key`, replacing any previous value.
    ///
    /// # Returns
    ///
    /// Returns `true` if a new key was created, `false` if an existing key was updated.
    pub fn set(&self, key: impl Into<String>, value: Value) -> bool {
        self.set_count.fetch_add(1, Ordering::Relaxed);

        let key = key.into();
        let mut data = self.get_shard(&key).write();
        data.insert(key, value).is_none()
    }

    /// Returns a copy of the value bound to `key`, if any.
    pub fn get(&self, key: &str) -> Option<Value> {
        self.get_count.fetch_add(1, Ordering::Relaxed);

        self.get_shard(key).read().get(key).cloned()
    }

    /// Returns the number of keys currently stored.
    pub fn len(&self) -> usize {
        self.shards.iter().map(|shard| shard.read().len()).sum()
    }

    /// Returns true if no key is stored.
    pub fn is_empty(&self) -> bool {
        self.shards.iter().all(|shard| shard.read().is_empty())
    }

    /// Returns a snapshot of the store's counters.
    pub fn stats(&self) -> StoreStats {
        StoreStats {
            keys: self.len(),
            get_ops: self.get_count.load(Ordering::Relaxed),
            set_ops: self.set_count.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time store statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreStats {
    pub keys: usize,
    pub get_ops: u64,
    pub set_ops: u64,
}
