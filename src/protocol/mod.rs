//! Wire Protocol
//!
//! EmberKV speaks a line-oriented subset of the Redis Serialization Protocol.
//! Requests arrive as an array of bulk strings; replies go out as a status,
//! error, integer, bulk string or null.
//!
//! ## Modules
//!
//! - `types`: Defines the `Reply` enum and its encoding
//! - `parser`: Request decoder plus a reply reader for clients
//!
//! ## Example
//!
//! ```
//! use emberkv::protocol::{decode, encode_command, Reply};
//!
//! // Decoding an incoming request
//! let request = encode_command(&["GET", "name"]);
//! let args = decode(&request).unwrap();
//! assert_eq!(args, vec!["GET".to_string(), "name".to_string()]);
//!
//! // Encoding a reply
//! let bytes = Reply::bulk_string("Ariz").serialize();
//! assert_eq!(bytes, b"$4\r\nAriz\r\n");
//! ```

pub mod parser;
pub mod types;

// Re-export commonly used types for convenience
pub use parser::{decode, parse_reply, DecodeError, DecodeResult};
pub use types::{encode_command, Reply};
