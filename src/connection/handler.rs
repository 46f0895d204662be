//! Connection Handler Module
//!
//! This module handles individual client connections to EmberKV.
//! Each accepted connection gets its own task, which serves exactly one
//! request and then closes the connection.
//!
//! ## Connection Lifecycle
//!
//! ```text
//! 1. Client connects (TCP handshake)
//!        │
//!        ▼
//! 2. ConnectionHandler spawned
//!        │
//!        ▼
//! 3. ┌──────────────────────────────┐
//!    │  Read one buffer (≤ 4 KB)    │
//!    └──────────────┬───────────────┘
//!                   ▼
//!    ┌──────────────────────────────┐
//!    │  Decode request tokens       │──── error ──> close, no reply
//!    └──────────────┬───────────────┘
//!                   ▼
//!    ┌──────────────────────────────┐
//!    │  Execute command             │
//!    └──────────────┬───────────────┘
//!                   ▼
//!    ┌──────────────────────────────┐
//!    │  Write reply                 │
//!    └──────────────┬───────────────┘
//!                   ▼
//! 4. Shut down the write half, handler task ends
//! ```
//!
//! ## One Buffer, One Request
//!
//! The handler performs a single read. A request split across several reads
//! is not reassembled, and a second command in the same buffer is not served.
//! There is no timeout: a client that never sends anything keeps its own task
//! waiting, without affecting any other connection.

use crate::commands::CommandHandler;
use crate::protocol::{decode, DecodeError, Reply};
use bytes::BytesMut;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, trace, warn};

/// Default size of the single read performed per connection (4 KB)
pub const DEFAULT_READ_BUFFER_SIZE: usize = 4096;

/// Statistics for connection handling
#[derive(Debug, Default)]
pub struct ConnectionStats {
    /// Total number of connections accepted
    pub connections_accepted: AtomicU64,
    /// Currently active connections
    pub active_connections: AtomicU64,
    /// Total commands processed
    pub commands_processed: AtomicU64,
    /// Requests dropped because they could not be decoded
    pub decode_failures: AtomicU64,
    /// Total bytes read
    pub bytes_read: AtomicU64,
    /// Total bytes written
    pub bytes_written: AtomicU64,
}

impl ConnectionStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn connection_opened(&self) {
        self.connections_accepted.fetch_add(1, Ordering::Relaxed);
        self.active_connections.fetch_add(1, Ordering::Relaxed);
    }

    pub fn connection_closed(&self) {
        self.active_connections.fetch_sub(1, Ordering::Relaxed);
    }

    pub fn command_processed(&self) {
        self.commands_processed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn decode_failed(&self) {
        self.decode_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn bytes_read(&self, count: usize) {
        self.bytes_read.fetch_add(count as u64, Ordering::Relaxed);
    }

    pub fn bytes_written(&self, count: usize) {
        self.bytes_written
            .fetch_add(count as u64, Ordering::Relaxed);
    }
}

/// Handles a single client connection.
///
/// Generic over the byte stream so it can run on a `TcpStream` or on any
/// other `AsyncRead + AsyncWrite` transport.
pub struct ConnectionHandler<S> {
    /// The client stream
    stream: S,

    /// Client's address (for logging)
    addr: SocketAddr,

    /// Upper bound on the single read
    read_buffer_size: usize,

    /// The command handler (shares the store with all connections)
    command_handler: CommandHandler,

    /// Connection statistics (shared)
    stats: Arc<ConnectionStats>,
}

impl<S> ConnectionHandler<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Creates a new connection handler.
    ///
    /// # Arguments
    ///
    /// * `stream` - The client stream
    /// * `addr` - The client's socket address
    /// * `command_handler` - The command handler for executing commands
    /// * `stats` - Shared connection statistics
    pub fn new(
        stream: S,
        addr: SocketAddr,
        command_handler: CommandHandler,
        stats: Arc<ConnectionStats>,
    ) -> Self {
        stats.connection_opened();

        Self {
            stream,
            addr,
            read_buffer_size: DEFAULT_READ_BUFFER_SIZE,
            command_handler,
            stats,
        }
    }

    /// Sets the upper bound on the single read.
    pub fn with_read_buffer_size(mut self, size: usize) -> Self {
        self.read_buffer_size = size;
        self
    }

    /// Serves one request and closes the connection.
    pub async fn run(mut self) -> Result<(), ConnectionError> {
        info!(client = %self.addr, "Client connected");

        let result = self.serve_request().await;

        match &result {
            Ok(()) => debug!(client = %self.addr, "Request served, closing connection"),
            Err(ConnectionError::ClientDisconnected) => {
                debug!(client = %self.addr, "Client disconnected before sending a request")
            }
            Err(ConnectionError::IoError(io_err))
                if io_err.kind() == std::io::ErrorKind::ConnectionReset =>
            {
                debug!(client = %self.addr, "Connection reset by client")
            }
            Err(ConnectionError::DecodeError(e)) => {
                warn!(client = %self.addr, error = %e, "Malformed request, closing without reply")
            }
            Err(e) => warn!(client = %self.addr, error = %e, "Connection error"),
        }

        self.stats.connection_closed();
        result
    }

    /// Read, decode, execute, respond.
    async fn serve_request(&mut self) -> Result<(), ConnectionError> {
        let request = self.read_request().await?;

        let args = decode(&request).inspect_err(|_| self.stats.decode_failed())?;
        trace!(client = %self.addr, args = ?args, "Decoded request");

        let reply = self.command_handler.execute(&args);
        self.stats.command_processed();

        self.send_reply(&reply).await?;
        self.stream.shutdown().await?;
        Ok(())
    }

    /// Performs the single read for this connection.
    async fn read_request(&mut self) -> Result<BytesMut, ConnectionError> {
        let mut buffer = BytesMut::zeroed(self.read_buffer_size);
        let n = self.stream.read(&mut buffer).await?;

        if n == 0 {
            return Err(ConnectionError::ClientDisconnected);
        }

        buffer.truncate(n);
        self.stats.bytes_read(n);
        trace!(client = %self.addr, bytes = n, "Read request");

        Ok(buffer)
    }

    /// Sends a reply to the client.
    async fn send_reply(&mut self, reply: &Reply) -> Result<(), ConnectionError> {
        let bytes = reply.serialize();
        self.stream.write_all(&bytes).await?;
        self.stream.flush().await?;
        self.stats.bytes_written(bytes.len());
        trace!(
            client = %self.addr,
            bytes = bytes.len(),
            "Sent reply"
        );
        Ok(())
    }
}

/// Errors that can occur while handling a connection.
#[derive(Debug, thiserror::Error)]
pub enum ConnectionError {
    /// I/O error (network issue)
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// The request could not be decoded
    #[error("Decode error: {0}")]
    DecodeError(#[from] DecodeError),

    /// Client closed the connection without sending anything
    #[error("Client disconnected")]
    ClientDisconnected,
}

/// Handles a client connection.
///
/// This is a convenience function that creates a ConnectionHandler and runs
/// it to completion. Failures are logged and stay scoped to this connection.
///
/// # Arguments
///
/// * `stream` - The client stream
/// * `addr` - The client's socket address
/// * `command_handler` - The command handler for executing commands
/// * `stats` - Shared connection statistics
/// * `read_buffer_size` - Upper bound on the single request read
pub async fn handle_connection<S>(
    stream: S,
    addr: SocketAddr,
    command_handler: CommandHandler,
    stats: Arc<ConnectionStats>,
    read_buffer_size: usize,
) where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let handler = ConnectionHandler::new(stream, addr, command_handler, stats)
        .with_read_buffer_size(read_buffer_size);
    // run() already logged the outcome
    let _ = handler.run().await;
}
