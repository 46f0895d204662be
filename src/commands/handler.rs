//! Command Handler
//!
//! This module maps a decoded token sequence to one of the supported
//! commands, checks its arguments, runs it against the store and builds the
//! reply.
//!
//! ## Supported Commands
//!
//! - `PING [ignored ...]` - Replies `PONG`
//! - `ECHO message` - Replies the message as a bulk string
//! - `GET key` - Replies the stored value, or null
//! - `SET key value` - Stores a value; `:<n>` stores the integer `n`
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     CommandHandler                          │
//! │                                                             │
//! │  ┌─────────────┐    ┌─────────────┐    ┌─────────────┐     │
//! │  │  execute()  │───>│  dispatch() │───>│   cmd_*()   │     │
//! │  └─────────────┘    └─────────────┘    └─────────────┘     │
//! │                                               │             │
//! │                                               ▼             │
//! │                                             Store           │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every call produces exactly one reply. Failures become error replies,
//! they never panic the connection worker.

use crate::protocol::types::prefix;
use crate::protocol::Reply;
use crate::storage::{Store, Value};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, trace, warn};

/// What SET does with a `:`-prefixed value that is not a valid integer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum IntegerPolicy {
    /// Store nothing and reply with a type error.
    #[default]
    Reject,
    /// Store nothing, log the failure and still reply `OK`.
    Ignore,
}

/// Errors a command can fail with. Each one is sent to the client as an
/// error reply carrying its display text.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("ERR empty command")]
    EmptyCommand,

    #[error("ERR unknown command '{0}'")]
    UnknownCommand(String),

    #[error("ERR wrong number of arguments for '{0}' command")]
    WrongArity(&'static str),

    #[error("ERR value is not an integer or out of range")]
    NotAnInteger,
}

impl From<CommandError> for Reply {
    fn from(err: CommandError) -> Self {
        Reply::Error(err.to_string())
    }
}

impl From<Value> for Reply {
    fn from(value: Value) -> Self {
        match value {
            Value::String(s) => Reply::BulkString(s),
            Value::Integer(n) => Reply::Integer(n),
        }
    }
}

/// Executes commands against the shared store.
///
/// Cheap to clone: every connection gets its own handle to the same store.
#[derive(Debug, Clone)]
pub struct CommandHandler {
    /// The shared store
    store: Arc<Store>,
    /// How SET treats malformed integers
    integer_policy: IntegerPolicy,
}

impl CommandHandler {
    /// Creates a new command handler with the given store.
    pub fn new(store: Arc<Store>) -> Self {
        Self {
            store,
            integer_policy: IntegerPolicy::default(),
        }
    }

    /// Sets how SET treats a malformed `:`-prefixed integer.
    pub fn with_integer_policy(mut self, policy: IntegerPolicy) -> Self {
        self.integer_policy = policy;
        self
    }

    /// Executes a command and returns the reply.
    ///
    /// # Arguments
    ///
    /// * `args` - The decoded tokens: command name first, then its arguments
    pub fn execute(&self, args: &[String]) -> Reply {
        match self.dispatch(args) {
            Ok(reply) => reply,
            Err(e) => {
                debug!(error = %e, "Command failed");
                e.into()
            }
        }
    }

    /// Dispatches a command to its handler.
    fn dispatch(&self, args: &[String]) -> Result<Reply, CommandError> {
        let (name, rest) = args.split_first().ok_or(CommandError::EmptyCommand)?;
        let cmd = name.to_uppercase();
        trace!(command = %cmd, argc = rest.len(), "Dispatching command");

        match cmd.as_str() {
            "PING" => Ok(self.cmd_ping(rest)),
            "ECHO" => self.cmd_echo(rest),
            "GET" => self.cmd_get(rest),
            "SET" => self.cmd_set(rest),
            _ => Err(CommandError::UnknownCommand(name.clone())),
        }
    }

    /// PING [ignored ...]
    fn cmd_ping(&self, _args: &[String]) -> Reply {
        Reply::pong()
    }

    /// ECHO message
    fn cmd_echo(&self, args: &[String]) -> Result<Reply, CommandError> {
        match args {
            [message] => Ok(Reply::bulk_string(message.as_str())),
            _ => Err(CommandError::WrongArity("ECHO")),
        }
    }

    /// GET key
    fn cmd_get(&self, args: &[String]) -> Result<Reply, CommandError> {
        let [key] = args else {
            return Err(CommandError::WrongArity("GET"));
        };

        Ok(match self.store.get(key) {
            Some(value) => value.into(),
            None => Reply::null(),
        })
    }

    /// SET key value
    fn cmd_set(&self, args: &[String]) -> Result<Reply, CommandError> {
        let [key, token] = args else {
            return Err(CommandError::WrongArity("SET"));
        };

        let value = match token.strip_prefix(prefix::INTEGER as char) {
            Some(digits) => match digits.parse::<i64>() {
                Ok(n) => Value::Integer(n),
                Err(e) => {
                    return match self.integer_policy {
                        IntegerPolicy::Reject => Err(CommandError::NotAnInteger),
                        IntegerPolicy::Ignore => {
                            warn!(key = %key, value = %token, error = %e, "Failed to convert value to integer, nothing stored");
                            Ok(Reply::ok())
                        }
                    };
                }
            },
            None => Value::String(token.clone()),
        };

        let kind = value.type_name();
        let created = self.store.set(key.as_str(), value);
        trace!(key = %key, kind, created, "Stored value");

        Ok(Reply::ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{decode, encode_command, parse_reply};

    fn create_handler() -> CommandHandler {
        let store = Arc::new(Store::new());
        CommandHandler::new(store)
    }

    fn make_command(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_ping() {
        let handler = create_handler();

        let response = handler.execute(&make_command(&["PING"]));
        assert_eq!(response, Reply::pong());

        // Extra arguments are ignored
        let response = handler.execute(&make_command(&["PING", "hello", "there"]));
        assert_eq!(response.serialize(), b"+PONG\r\n");
    }

    #[test]
    fn test_command_name_is_case_insensitive() {
        let handler = create_handler();

        assert_eq!(handler.execute(&make_command(&["ping"])), Reply::pong());
        assert_eq!(
            handler.execute(&make_command(&["eChO", "x"])),
            Reply::bulk_string("x")
        );
    }

    #[test]
    fn test_echo() {
        let handler = create_handler();

        let response = handler.execute(&make_command(&["ECHO", "foo"]));
        assert_eq!(response.serialize(), b"$3\r\nfoo\r\n");
    }

    #[test]
    fn test_echo_wrong_arity() {
        let handler = create_handler();

        let response = handler.execute(&make_command(&["ECHO"]));
        assert_eq!(
            response,
            Reply::error("ERR wrong number of arguments for 'ECHO' command")
        );

        let response = handler.execute(&make_command(&["ECHO", "a", "b"]));
        assert!(response.is_error());
    }

    #[test]
    fn test_set_get() {
        let handler = create_handler();

        let response = handler.execute(&make_command(&["SET", "key", "value"]));
        assert_eq!(response, Reply::ok());

        let response = handler.execute(&make_command(&["GET", "key"]));
        assert_eq!(response, Reply::bulk_string("value"));
    }

    #[test]
    fn test_set_integer() {
        let handler = create_handler();

        handler.execute(&make_command(&["SET", "n", ":-12"]));
        let response = handler.execute(&make_command(&["GET", "n"]));
        assert_eq!(response, Reply::integer(-12));
        assert_eq!(response.serialize(), b":-12\r\n");
    }

    #[test]
    fn test_get_nonexistent() {
        let handler = create_handler();

        let response = handler.execute(&make_command(&["GET", "nonexistent"]));
        assert_eq!(response.serialize(), b"$-1\r\n");
    }

    #[test]
    fn test_keys_and_values_are_case_sensitive() {
        let handler = create_handler();

        handler.execute(&make_command(&["set", "Name", "Ariz"]));
        assert_eq!(
            handler.execute(&make_command(&["GET", "name"])),
            Reply::null()
        );
        assert_eq!(
            handler.execute(&make_command(&["get", "Name"])),
            Reply::bulk_string("Ariz")
        );
    }

    #[test]
    fn test_get_set_wrong_arity() {
        let handler = create_handler();

        for args in [
            &["GET"][..],
            &["GET", "a", "b"][..],
            &["SET"][..],
            &["SET", "k"][..],
            &["SET", "k", "v", "extra"][..],
        ] {
            let response = handler.execute(&make_command(args));
            assert!(response.is_error(), "{:?} should fail", args);
        }
    }

    #[test]
    fn test_set_malformed_integer_rejected() {
        let handler = create_handler();

        let response = handler.execute(&make_command(&["SET", "n", ":12abc"]));
        assert_eq!(
            response,
            Reply::error("ERR value is not an integer or out of range")
        );
        assert_eq!(handler.execute(&make_command(&["GET", "n"])), Reply::null());
    }

    #[test]
    fn test_set_malformed_integer_ignored() {
        let handler = create_handler().with_integer_policy(IntegerPolicy::Ignore);

        handler.execute(&make_command(&["SET", "n", "old"]));
        let response = handler.execute(&make_command(&["SET", "n", ":"]));
        assert_eq!(response, Reply::ok());

        // Nothing was stored, the previous value survives
        assert_eq!(
            handler.execute(&make_command(&["GET", "n"])),
            Reply::bulk_string("old")
        );
    }

    #[test]
    fn test_unknown_command() {
        let handler = create_handler();

        let response = handler.execute(&make_command(&["FLY", "away"]));
        assert_eq!(response, Reply::error("ERR unknown command 'FLY'"));
    }

    #[test]
    fn test_empty_command() {
        let handler = create_handler();
        assert_eq!(handler.execute(&[]), Reply::error("ERR empty command"));
    }

    #[test]
    fn test_shared_store_between_handlers() {
        let store = Arc::new(Store::new());
        let first = CommandHandler::new(Arc::clone(&store));
        let second = first.clone();

        first.execute(&make_command(&["SET", "k", "v"]));
        assert_eq!(
            second.execute(&make_command(&["GET", "k"])),
            Reply::bulk_string("v")
        );
        assert_eq!(store.len(), 1);
    }

    /// Full pipeline: client encodes, server decodes and dispatches,
    /// client reads the reply back.
    fn round_trip(handler: &CommandHandler, args: &[&str]) -> Reply {
        let request = encode_command(args);
        let tokens = decode(&request).unwrap();
        let bytes = handler.execute(&tokens).serialize();
        let (reply, consumed) = parse_reply(&bytes).unwrap().unwrap();
        assert_eq!(consumed, bytes.len());
        reply
    }

    #[test]
    fn test_round_trip_strings() {
        let handler = create_handler();

        for value in ["plain", "with spaces", "", "ünïcödé", "12"] {
            assert_eq!(round_trip(&handler, &["SET", "k", value]), Reply::ok());
            assert_eq!(
                round_trip(&handler, &["GET", "k"]),
                Reply::bulk_string(value)
            );
        }
    }

    #[test]
    fn test_round_trip_integers() {
        let handler = create_handler();

        for n in [0, 1, -1, 42, i64::MAX, i64::MIN] {
            let token = format!(":{}", n);
            assert_eq!(round_trip(&handler, &["SET", "n", token.as_str()]), Reply::ok());
            assert_eq!(round_trip(&handler, &["GET", "n"]), Reply::integer(n));
        }
    }
}
