//! Command Handler Module
//!
//! This module implements the command processing layer for EmberKV.
//! It receives decoded request tokens, executes them against the store,
//! and returns the reply to encode.
//!
//! ## Architecture
//!
//! ```text
//! Client Request
//!       │
//!       ▼
//! ┌─────────────────┐
//! │    Decoder      │  (protocol module)
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ CommandHandler  │  (this module)
//! │                 │
//! │  - Dispatch     │
//! │  - Validate     │
//! │  - Execute      │
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │     Store       │  (storage module)
//! └─────────────────┘
//! ```
//!
//! ## Supported Commands
//!
//! - `PING`, `ECHO`, `GET`, `SET`

pub mod handler;

// Re-export the main command handler
pub use handler::{CommandError, CommandHandler, IntegerPolicy};
