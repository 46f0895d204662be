//! Storage Module
//!
//! This module provides the in-memory key-value store shared by all
//! connections.
//!
//! ## Features
//!
//! - **Sharded Storage**: 64 independent shards reduce lock contention
//! - **RwLock**: Multiple concurrent readers, exclusive writers
//! - **Typed Values**: Each key holds a string or an integer
//!
//! Entries live until overwritten or process exit; there is no deletion,
//! expiry, eviction or persistence.
//!
//! ## Example
//!
//! ```
//! use emberkv::storage::{Store, Value};
//! use std::sync::Arc;
//!
//! let store = Arc::new(Store::new());
//!
//! store.set("counter", Value::Integer(10));
//! assert_eq!(store.get("counter"), Some(Value::Integer(10)));
//! ```

pub mod engine;
pub mod value;

// Re-export commonly used types
pub use engine::{Store, StoreStats};
pub use value::Value;
