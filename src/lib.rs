//! # EmberKV - A Minimal In-Memory Key-Value Server
//!
//! EmberKV accepts concurrent client connections speaking a subset of the
//! Redis Serialization Protocol, decodes each request into a command and its
//! arguments, runs it against a shared store, and writes one reply back.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                              EmberKV                                │
//! │                                                                     │
//! │  ┌─────────────┐    ┌─────────────┐    ┌─────────────┐              │
//! │  │ TCP Server  │───>│ Connection  │───>│  Command    │              │
//! │  │ (Listener)  │    │  Handler    │    │  Handler    │              │
//! │  └─────────────┘    └──────┬──────┘    └──────┬──────┘              │
//! │                            │                  │                     │
//! │                            ▼                  ▼                     │
//! │                     ┌─────────────┐   ┌───────────────────────────┐ │
//! │                     │  Decoder /  │   │          Store            │ │
//! │                     │  Encoder    │   │ ┌───────┐ ┌───────┐       │ │
//! │                     └─────────────┘   │ │Shard 0│ │Shard 1│ ...64 │ │
//! │                                       │ │RwLock │ │RwLock │       │ │
//! │                                       │ └───────┘ └───────┘       │ │
//! │                                       └───────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Per request: raw bytes → decode → tokens → dispatch (reads/writes the
//! store) → reply bytes → socket write → close.
//!
//! ## Quick Start
//!
//! ```ignore
//! use emberkv::commands::CommandHandler;
//! use emberkv::connection::{handle_connection, ConnectionStats, DEFAULT_READ_BUFFER_SIZE};
//! use emberkv::storage::Store;
//! use std::sync::Arc;
//! use tokio::net::TcpListener;
//!
//! #[tokio::main]
//! async fn main() {
//!     let store = Arc::new(Store::new());
//!     let stats = Arc::new(ConnectionStats::new());
//!     let listener = TcpListener::bind("127.0.0.1:6379").await.unwrap();
//!
//!     loop {
//!         let (stream, addr) = listener.accept().await.unwrap();
//!         let handler = CommandHandler::new(Arc::clone(&store));
//!         let stats = Arc::clone(&stats);
//!
//!         tokio::spawn(handle_connection(stream, addr, handler, stats, DEFAULT_READ_BUFFER_SIZE));
//!     }
//! }
//! ```
//!
//! ## Supported Commands
//!
//! - `PING` - replies `+PONG`, extra arguments are ignored
//! - `ECHO message`
//! - `GET key`
//! - `SET key value` - a value written as `:<n>` is stored as the integer `n`
//!
//! Command names are case-insensitive; keys and values are not.
//!
//! ## Module Overview
//!
//! - [`protocol`]: Request decoder, reply types and encoder
//! - [`storage`]: Thread-safe sharded store and the `Value` type
//! - [`commands`]: Command dispatch and execution
//! - [`connection`]: Per-connection worker
//! - [`config`]: Command-line / environment configuration

pub mod commands;
pub mod config;
pub mod connection;
pub mod protocol;
pub mod storage;

// Re-export commonly used types for convenience
pub use commands::{CommandError, CommandHandler, IntegerPolicy};
pub use config::Config;
pub use connection::{handle_connection, ConnectionStats};
pub use protocol::{decode, DecodeError, Reply};
pub use storage::{Store, Value};

/// The default port EmberKV listens on (same as Redis)
pub const DEFAULT_PORT: u16 = 6379;

/// The default host EmberKV binds to
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Version of EmberKV
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
