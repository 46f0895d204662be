//! Server Configuration
//!
//! Settings come from command-line flags, each of which can also be set
//! through an `EMBERKV_*` environment variable.

use crate::commands::IntegerPolicy;
use crate::connection::DEFAULT_READ_BUFFER_SIZE;
use crate::{DEFAULT_HOST, DEFAULT_PORT};
use clap::builder::TypedValueParser;
use clap::Parser;

/// Server configuration
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "emberkv", author, version, about, long_about = None)]
pub struct Config {
    /// Host to bind to
    #[arg(short = 'H', long, env = "EMBERKV_HOST", default_value = DEFAULT_HOST)]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, env = "EMBERKV_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Size of the single read performed per connection, in bytes
    #[arg(
        long,
        env = "EMBERKV_READ_BUFFER_SIZE",
        default_value_t = DEFAULT_READ_BUFFER_SIZE,
        value_parser = clap::value_parser!(u32).range(16..).map(|n| n as usize)
    )]
    pub read_buffer_size: usize,

    /// Log level (trace, debug, info, warn, error); RUST_LOG takes precedence
    #[arg(long, env = "EMBERKV_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Reply OK to `SET key :<not-a-number>` instead of an error (nothing is stored either way)
    #[arg(long, env = "EMBERKV_LENIENT_INTEGERS")]
    pub lenient_integers: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            read_buffer_size: DEFAULT_READ_BUFFER_SIZE,
            log_level: "info".to_string(),
            lenient_integers: false,
        }
    }
}

impl Config {
    /// Returns the bind address as a string
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// How SET treats malformed `:`-prefixed integers
    pub fn integer_policy(&self) -> IntegerPolicy {
        if self.lenient_integers {
            IntegerPolicy::Ignore
        } else {
            IntegerPolicy::Reject
        }
    }
}
