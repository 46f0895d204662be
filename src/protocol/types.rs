//! Reply Types and Wire Encoding
//!
//! This module defines the replies EmberKV sends back to clients and the
//! encoding of those replies onto the wire.
//!
//! ## Protocol Format
//!
//! Each reply starts with a type prefix byte:
//! - `+` Status
//! - `-` Error
//! - `:` Integer
//! - `$` Bulk String
//!
//! Requests are arrays (`*`) of bulk strings. All lines end with CRLF.
//!
//! ## Examples
//!
//! Status: `+OK\r\n`
//! Error: `-ERR unknown command 'FOO'\r\n`
//! Integer: `:1000\r\n`
//! Bulk String: `$5\r\nhello\r\n`
//! Null: `$-1\r\n`
//! Request: `*2\r\n$3\r\nGET\r\n$4\r\nname\r\n`

use std::fmt;

/// The CRLF terminator used in the protocol
pub const CRLF: &[u8] = b"\r\n";

/// Protocol type prefixes
pub mod prefix {
    pub const STATUS: u8 = b'+';
    pub const ERROR: u8 = b'-';
    pub const INTEGER: u8 = b':';
    pub const BULK_STRING: u8 = b'$';
    pub const ARRAY: u8 = b'*';
}

/// A reply produced by the command handler.
///
/// Replies are transient: they are built per request, encoded, and dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Short status line such as `OK` or `PONG`.
    /// Format: `+<text>\r\n`
    Status(String),

    /// Error line.
    /// Format: `-<message>\r\n`
    Error(String),

    /// 64-bit signed integer.
    /// Format: `:<integer>\r\n`
    Integer(i64),

    /// Length-prefixed string.
    /// Format: `$<length>\r\n<data>\r\n`
    BulkString(String),

    /// Absent value.
    /// Format: `$-1\r\n`
    Null,
}

impl Reply {
    /// Creates a new status reply.
    ///
    /// # Example
    /// ```
    /// use emberkv::protocol::types::Reply;
    /// assert_eq!(Reply::status("OK").serialize(), b"+OK\r\n");
    /// ```
    pub fn status(s: impl Into<String>) -> Self {
        Reply::Status(s.into())
    }

    /// Creates a new error reply.
    pub fn error(s: impl Into<String>) -> Self {
        Reply::Error(s.into())
    }

    /// Creates a new integer reply.
    pub fn integer(n: i64) -> Self {
        Reply::Integer(n)
    }

    /// Creates a new bulk string reply.
    ///
    /// # Example
    /// ```
    /// use emberkv::protocol::types::Reply;
    /// assert_eq!(Reply::bulk_string("foo").serialize(), b"$3\r\nfoo\r\n");
    /// ```
    pub fn bulk_string(s: impl Into<String>) -> Self {
        Reply::BulkString(s.into())
    }

    /// Creates a null reply.
    pub fn null() -> Self {
        Reply::Null
    }

    /// Common reply for successful writes
    pub fn ok() -> Self {
        Reply::Status("OK".to_string())
    }

    /// Common reply for PING
    pub fn pong() -> Self {
        Reply::Status("PONG".to_string())
    }

    /// Serializes the reply to bytes for sending over the wire.
    pub fn serialize(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        self.serialize_into(&mut buf);
        buf
    }

    /// Serializes the reply into an existing buffer.
    ///
    /// Never fails: every `Reply` is well-formed by construction.
    pub fn serialize_into(&self, buf: &mut Vec<u8>) {
        match self {
            Reply::Status(s) => {
                buf.push(prefix::STATUS);
                buf.extend_from_slice(s.as_bytes());
                buf.extend_from_slice(CRLF);
            }
            Reply::Error(s) => {
                buf.push(prefix::ERROR);
                buf.extend_from_slice(s.as_bytes());
                buf.extend_from_slice(CRLF);
            }
            Reply::Integer(n) => {
                buf.push(prefix::INTEGER);
                buf.extend_from_slice(n.to_string().as_bytes());
                buf.extend_from_slice(CRLF);
            }
            Reply::BulkString(s) => write_bulk(buf, s),
            Reply::Null => {
                buf.push(prefix::BULK_STRING);
                buf.extend_from_slice(b"-1");
                buf.extend_from_slice(CRLF);
            }
        }
    }

    /// Returns true if this reply is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Reply::Null)
    }

    /// Returns true if this reply is an error.
    pub fn is_error(&self) -> bool {
        matches!(self, Reply::Error(_))
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reply::Status(s) => write!(f, "{}", s),
            Reply::Error(s) => write!(f, "(error) {}", s),
            Reply::Integer(n) => write!(f, "(integer) {}", n),
            Reply::BulkString(s) => write!(f, "\"{}\"", s),
            Reply::Null => write!(f, "(nil)"),
        }
    }
}

/// Encodes a command as a request frame: an array of bulk strings.
///
/// This is what a client puts on the wire, e.g. `["GET", "name"]` becomes
/// `*2\r\n$3\r\nGET\r\n$4\r\nname\r\n`.
pub fn encode_command<S: AsRef<str>>(args: &[S]) -> Vec<u8> {
    let mut buf = Vec::new();
    buf.push(prefix::ARRAY);
    buf.extend_from_slice(args.len().to_string().as_bytes());
    buf.extend_from_slice(CRLF);
    for arg in args {
        write_bulk(&mut buf, arg.as_ref());
    }
    buf
}

#[inline]
fn write_bulk(buf: &mut Vec<u8>, s: &str) {
    buf.push(prefix::BULK_STRING);
    buf.extend_from_slice(s.len().to_string().as_bytes());
    buf.extend_from_slice(CRLF);
    buf.extend_from_slice(s.as_bytes());
    buf.extend_from_slice(CRLF);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serialize() {
        assert_eq!(Reply::status("OK").serialize(), b"+OK\r\n");
        assert_eq!(Reply::pong().serialize(), b"+PONG\r\n");
    }

    #[test]
    fn test_error_serialize() {
        let value = Reply::error("ERR unknown command 'FOO'");
        assert_eq!(value.serialize(), b"-ERR unknown command 'FOO'\r\n");
    }

    #[test]
    fn test_integer_serialize() {
        assert_eq!(Reply::integer(1000).serialize(), b":1000\r\n");
        assert_eq!(Reply::integer(-42).serialize(), b":-42\r\n");
    }

    #[test]
    fn test_bulk_string_serialize() {
        assert_eq!(Reply::bulk_string("foo").serialize(), b"$3\r\nfoo\r\n");
        assert_eq!(Reply::bulk_string("").serialize(), b"$0\r\n\r\n");
    }

    #[test]
    fn test_bulk_string_length_is_in_bytes() {
        // "é" is two bytes in UTF-8
        assert_eq!(Reply::bulk_string("é").serialize(), "$2\r\né\r\n".as_bytes());
    }

    #[test]
    fn test_null_serialize() {
        assert_eq!(Reply::null().serialize(), b"$-1\r\n");
    }

    #[test]
    fn test_serialize_into_appends() {
        let mut buf = b"prefix".to_vec();
        Reply::ok().serialize_into(&mut buf);
        assert_eq!(buf, b"prefix+OK\r\n");
    }

    #[test]
    fn test_encode_command() {
        assert_eq!(
            encode_command(&["GET", "name"]),
            b"*2\r\n$3\r\nGET\r\n$4\r\nname\r\n"
        );
        assert_eq!(encode_command(&["PING"]), b"*1\r\n$4\r\nPING\r\n");
    }

    #[test]
    fn test_display() {
        assert_eq!(Reply::Null.to_string(), "(nil)");
        assert_eq!(Reply::integer(7).to_string(), "(integer) 7");
        assert_eq!(Reply::bulk_string("v").to_string(), "\"v\"");
    }
}
