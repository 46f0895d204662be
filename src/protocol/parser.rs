//! Request Decoder and Reply Reader
//!
//! This module turns raw request bytes into the token sequence the command
//! handler works on, and (for clients and tests) reads encoded replies back.
//!
//! ## How Requests Are Decoded
//!
//! A request is one complete buffer holding an array frame:
//!
//! ```text
//! *2\r\n$3\r\nGET\r\n$4\r\nname\r\n
//! ```
//!
//! The decoder splits the buffer on CRLF and walks the lines:
//! 1. The first line must start with `*`, otherwise the request is rejected.
//! 2. Lines starting with `*` or `$` are framing lines and are skipped.
//! 3. Every other line is a literal argument, kept in order.
//!
//! Declared `$`-lengths are trusted, not cross-checked against the payload.
//! A consequence is that an argument whose text itself starts with `$` or `*`
//! is taken for a framing line and dropped.
//!
//! A request split across several socket reads is not reassembled; the caller
//! hands over one complete buffer per request.

use crate::protocol::types::{prefix, Reply, CRLF};
use std::num::ParseIntError;
use thiserror::Error;

/// Errors that can occur while decoding requests or reading replies.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DecodeError {
    /// No lines left once the trailing terminator is trimmed
    #[error("empty request")]
    Empty,

    /// The first line is not an array header
    #[error("expected request to be array type")]
    NotAnArray,

    /// Argument text is not valid UTF-8
    #[error("invalid UTF-8: {0}")]
    InvalidUtf8(String),

    /// Unknown reply type prefix byte
    #[error("unknown type prefix: {0:#04x}")]
    UnknownPrefix(u8),

    /// Invalid integer format in a reply
    #[error("invalid integer: {0}")]
    InvalidInteger(String),

    /// Bulk string length is negative (but not -1 for null)
    #[error("invalid bulk string length: {0}")]
    InvalidBulkLength(i64),

    /// Generic framing violation
    #[error("protocol error: {0}")]
    ProtocolError(String),
}

/// Result type for decoding operations.
pub type DecodeResult<T> = Result<T, DecodeError>;

/// Decodes one request buffer into its command name and arguments.
///
/// # Example
///
/// ```
/// use emberkv::protocol::decode;
///
/// let args = decode(b"*1\r\n$4\r\nPING\r\n").unwrap();
/// assert_eq!(args, vec!["PING".to_string()]);
/// ```
pub fn decode(buf: &[u8]) -> DecodeResult<Vec<String>> {
    let mut lines = split_lines(buf);

    // A buffer ending in CRLF leaves one empty segment behind
    if lines.last().is_some_and(|line| line.is_empty()) {
        lines.pop();
    }

    let header = lines.first().ok_or(DecodeError::Empty)?;
    if header.first() != Some(&prefix::ARRAY) {
        return Err(DecodeError::NotAnArray);
    }

    let mut args = Vec::with_capacity(lines.len() / 2);
    for line in lines {
        match line.first() {
            Some(&prefix::ARRAY) | Some(&prefix::BULK_STRING) => continue,
            _ => {
                let arg = std::str::from_utf8(line)
                    .map_err(|e| DecodeError::InvalidUtf8(e.to_string()))?;
                args.push(arg.to_string());
            }
        }
    }

    Ok(args)
}

/// Splits the buffer on CRLF, keeping empty segments.
fn split_lines(buf: &[u8]) -> Vec<&[u8]> {
    let mut lines = Vec::new();
    let mut rest = buf;
    while let Some(pos) = find_crlf(rest) {
        lines.push(&rest[..pos]);
        rest = &rest[pos + CRLF.len()..];
    }
    lines.push(rest);
    lines
}

/// Reads one encoded reply from the buffer.
///
/// This is the client side of the wire format, used to check what the
/// server sent back.
///
/// # Returns
///
/// - `Ok(Some((reply, consumed)))` - Successfully read a reply
/// - `Ok(None)` - Incomplete data, need more bytes
/// - `Err(e)` - Malformed reply
pub fn parse_reply(buf: &[u8]) -> DecodeResult<Option<(Reply, usize)>> {
    let Some(&first) = buf.first() else {
        return Ok(None);
    };

    let line_end = match find_crlf(&buf[1..]) {
        Some(pos) => pos,
        None => return Ok(None),
    };
    let line = std::str::from_utf8(&buf[1..1 + line_end])
        .map_err(|e| DecodeError::InvalidUtf8(e.to_string()))?;
    // prefix + line + CRLF
    let consumed = 1 + line_end + 2;

    match first {
        prefix::STATUS => Ok(Some((Reply::Status(line.to_string()), consumed))),
        prefix::ERROR => Ok(Some((Reply::Error(line.to_string()), consumed))),
        prefix::INTEGER => {
            let n: i64 = line
                .parse()
                .map_err(|e: ParseIntError| DecodeError::InvalidInteger(e.to_string()))?;
            Ok(Some((Reply::Integer(n), consumed)))
        }
        prefix::BULK_STRING => {
            let length: i64 = line
                .parse()
                .map_err(|e: ParseIntError| DecodeError::InvalidInteger(e.to_string()))?;

            if length == -1 {
                return Ok(Some((Reply::Null, consumed)));
            }
            if length < 0 {
                return Err(DecodeError::InvalidBulkLength(length));
            }

            let length = length as usize;
            let total_needed = consumed + length + 2;
            if buf.len() < total_needed {
                return Ok(None);
            }

            if &buf[consumed + length..total_needed] != CRLF {
                return Err(DecodeError::ProtocolError(
                    "bulk string missing trailing CRLF".to_string(),
                ));
            }

            let data = std::str::from_utf8(&buf[consumed..consumed + length])
                .map_err(|e| DecodeError::InvalidUtf8(e.to_string()))?;
            Ok(Some((Reply::BulkString(data.to_string()), total_needed)))
        }
        other => Err(DecodeError::UnknownPrefix(other)),
    }
}

/// Finds the position of CRLF in the buffer.
///
/// Returns the position of `\r` if found, or None if CRLF is not present.
#[inline]
fn find_crlf(buf: &[u8]) -> Option<usize> {
    buf.windows(2).position(|w| w == CRLF)
}
