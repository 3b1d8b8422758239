//! Context error types.

use std::time::Duration;

use thiserror::Error;

use crate::channel::{ChannelError, RequestId};
use crate::select::ResultError;

/// Result type for context operations.
pub type ContextResult<T> = Result<T, ContextError>;

/// Errors that can occur while executing a command.
#[derive(Error, Debug)]
pub enum ContextError {
    /// The transport failed.
    #[error(transparent)]
    Channel(#[from] ChannelError),

    /// The channel closed before the matching response arrived.
    #[error("channel closed before response to request {0} arrived")]
    ChannelClosed(RequestId),

    /// No matching response within the configured timeout.
    #[error("request timed out after {} seconds", .0.as_secs_f64())]
    Timeout(Duration),

    /// A response for a request that was never sent on this context.
    #[error("unexpected response {received} while waiting for {expected}")]
    UnexpectedResponse {
        expected: RequestId,
        received: RequestId,
    },

    /// The response could not be parsed.
    #[error(transparent)]
    Result(#[from] ResultError),
}

impl ContextError {
    /// Check if the channel is gone.
    pub fn is_closed(&self) -> bool {
        match self {
            Self::ChannelClosed(_) => true,
            Self::Channel(err) => err.is_closed(),
            _ => false,
        }
    }

    /// Check if retrying the command may succeed.
    pub fn is_retriable(&self) -> bool {
        matches!(self, Self::Timeout(_) | Self::UnexpectedResponse { .. })
    }
}
