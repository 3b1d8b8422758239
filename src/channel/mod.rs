//! Channel to the search engine.
//!
//! The engine runs outside this crate. All the binding needs from it is a
//! request/response channel: commands go out as text and come back as
//! `(request id, payload)` pairs, possibly interleaved with responses to
//! other requests.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                     Context (Async)                      │
//! │  - Sends one command at a time                           │
//! │  - Filters responses by request id                       │
//! │  - Bounds the wait with a timeout                        │
//! └──────────────────────────────────────────────────────────┘
//!                  │ send(command)      ▲ receive()
//!                  ▼                    │
//! ┌──────────────────────────────────────────────────────────┐
//! │            Channel (transport, engine-defined)           │
//! └──────────────────────────────────────────────────────────┘
//! ```

mod error;
mod id;
mod memory;

use async_trait::async_trait;

pub use error::{ChannelError, ChannelResult};
pub use id::{RequestId, RequestIdGenerator};
pub use memory::MemoryChannel;

/// Request/response transport to the engine.
///
/// Implementations must hand out a fresh, increasing [`RequestId`] on
/// every `send`, also when called concurrently.
#[async_trait]
pub trait Channel: Send + Sync {
    /// Send a command and return the id its response will carry.
    async fn send(&self, command: &str) -> ChannelResult<RequestId>;

    /// Wait for the next response. `None` means the channel is closed.
    async fn receive(&self) -> ChannelResult<Option<(RequestId, String)>>;
}
