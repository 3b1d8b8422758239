//! Command execution over a channel.
//!
//! A [`Context`] owns a [`Channel`] and runs one request/response exchange
//! at a time on it: send the command, then read responses until one
//! carries the request's id.
//!
//! # Example
//!
//! ```ignore
//! use grnbind::channel::MemoryChannel;
//! use grnbind::context::Context;
//! use grnbind::select::SelectCommand;
//!
//! let context = Context::new(channel);
//! let result = context
//!     .select(&SelectCommand::new("Entries").option("drill-down", "tag"))
//!     .await?;
//! for record in result.records() {
//!     println!("{:?}", record.get("_key"));
//! }
//! ```

mod error;

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::channel::{Channel, RequestId};
use crate::config::ClientSettings;
use crate::logging::QUERY_LOG_TARGET;
use crate::schema::{SchemaDefinition, TableHandle};
use crate::select::{Coercions, SelectCommand, SelectResult};

pub use error::{ContextError, ContextResult};

/// Default timeout for a request (30 seconds).
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// What to do with a response whose id is not the one being waited for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchPolicy {
    /// Drop every non-matching response.
    Discard,
    /// Drop stale responses (lower id); fail on ids from the future.
    #[default]
    Strict,
}

/// Executes commands on a channel.
pub struct Context<C: Channel> {
    channel: C,
    /// Held for the whole send/receive exchange.
    exchange: Mutex<()>,
    timeout: Duration,
    policy: MatchPolicy,
    coercions: Arc<Coercions>,
    schema: Option<SchemaDefinition>,
}

impl<C: Channel> Context<C> {
    /// Create a context with the default timeout and strict matching.
    pub fn new(channel: C) -> Self {
        Self {
            channel,
            exchange: Mutex::new(()),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            policy: MatchPolicy::default(),
            coercions: Arc::new(Coercions::default()),
            schema: None,
        }
    }

    /// Create a context configured from client settings.
    pub fn with_settings(channel: C, settings: &ClientSettings) -> Self {
        Self::new(channel)
            .with_timeout(settings.timeout())
            .with_match_policy(settings.match_policy)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_match_policy(mut self, policy: MatchPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Replace the value coercions used for records.
    pub fn with_coercions(mut self, coercions: Coercions) -> Self {
        self.coercions = Arc::new(coercions);
        self
    }

    /// Attach a schema so tables can be looked up by name.
    pub fn with_schema(mut self, schema: SchemaDefinition) -> Self {
        self.schema = Some(schema);
        self
    }

    pub fn channel(&self) -> &C {
        &self.channel
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn match_policy(&self) -> MatchPolicy {
        self.policy
    }

    pub fn schema(&self) -> Option<&SchemaDefinition> {
        self.schema.as_ref()
    }

    /// Handle for a table of the attached schema.
    pub fn table(&self, name: &str) -> Option<TableHandle> {
        self.schema.as_ref().and_then(|schema| schema.handle(name))
    }

    /// Send `command` and wait for its response payload.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The channel fails or closes before the response arrives
    /// - No matching response arrives within the timeout
    /// - A response from the future arrives under [`MatchPolicy::Strict`]
    pub async fn execute(&self, command: &str) -> ContextResult<String> {
        let exchange = async {
            let _guard = self.exchange.lock().await;
            self.round_trip(command).await
        };

        match tokio::time::timeout(self.timeout, exchange).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(timeout = ?self.timeout, "request timed out");
                Err(ContextError::Timeout(self.timeout))
            }
        }
    }

    async fn round_trip(&self, command: &str) -> ContextResult<String> {
        let request_id = self.channel.send(command).await?;
        tracing::info!(target: QUERY_LOG_TARGET, id = %request_id, "{}", command);

        loop {
            let Some((response_id, payload)) = self.channel.receive().await? else {
                return Err(ContextError::ChannelClosed(request_id));
            };

            if response_id == request_id {
                return Ok(payload);
            }
            self.check_mismatch(request_id, response_id)?;
        }
    }

    fn check_mismatch(&self, expected: RequestId, received: RequestId) -> ContextResult<()> {
        if self.policy == MatchPolicy::Strict && received > expected {
            return Err(ContextError::UnexpectedResponse { expected, received });
        }
        tracing::debug!(%expected, %received, "discarding response for another request");
        Ok(())
    }

    /// Execute a `select` and parse its result.
    pub async fn select(&self, command: &SelectCommand) -> ContextResult<SelectResult> {
        let raw = self.execute(&command.to_command_string()).await?;
        let keys = command.drilldown_keys();
        Ok(SelectResult::parse_with(&raw, &keys, self.coercions.clone())?)
    }
}
