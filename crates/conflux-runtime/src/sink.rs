//! Configuration sink contract.
//!
//! The sink is the external collaborator that durably persists and
//! activates configuration. The processor invokes it strictly one command
//! at a time, in coalesced FIFO order, so sinks carry no concurrency
//! obligations of their own.

use async_trait::async_trait;
use thiserror::Error;

use conflux_core::domain::{ConfigDictionary, Identity};

/// Errors a sink may report back to the processor.
///
/// The processor logs them and moves on; retry policy belongs to the sink,
/// not to the pipeline.
#[derive(Debug, Clone, Error)]
pub enum SinkError {
    /// The sink rejected the command.
    #[error("sink rejected the command: {0}")]
    Rejected(String),

    /// The sink is not currently able to apply commands.
    #[error("sink unavailable: {0}")]
    Unavailable(String),
}

/// Result type for sink operations.
pub type SinkResult<T> = Result<T, SinkError>;

/// The configuration store commands are applied to.
///
/// Both calls are invoked from the processor's single consumer task and
/// are expected to be short-running; an in-flight call is allowed to
/// complete even while the processor is stopping.
#[async_trait]
pub trait ConfigurationSink: Send + Sync {
    /// Applies (creates or updates) the configuration for a target.
    async fn apply_update(
        &self,
        identity: &Identity,
        properties: &ConfigDictionary,
    ) -> SinkResult<()>;

    /// Removes the configuration for a target.
    async fn apply_delete(&self, identity: &Identity) -> SinkResult<()>;
}
