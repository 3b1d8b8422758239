//! Channel-specific error types.

use std::io;
use thiserror::Error;

/// Result type for channel operations.
pub type ChannelResult<T> = Result<T, ChannelError>;

/// Errors that can occur while talking to the engine over a channel.
#[derive(Error, Debug)]
pub enum ChannelError {
    /// Failed to hand a command to the transport.
    #[error("failed to send command: {0}")]
    SendFailed(#[source] io::Error),

    /// Failed to read a response from the transport.
    #[error("failed to receive response: {0}")]
    ReceiveFailed(#[source] io::Error),

    /// The channel was closed by the peer or by the transport.
    #[error("channel closed")]
    Closed,
}

impl ChannelError {
    /// Check if this error indicates the channel is gone for good.
    pub fn is_closed(&self) -> bool {
        matches!(self, Self::Closed)
    }
}
