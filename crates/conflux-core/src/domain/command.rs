//! Queued configuration intents.

use crate::domain::{ConfigurationSource, Identity};

/// A typed intent queued for the configuration sink.
///
/// Commands are immutable and queued by value; the queue owns them from
/// enqueue until the single consumer drains them.
#[derive(Debug, Clone)]
pub enum Command {
    /// Apply the configuration carried by a source.
    Update(ConfigurationSource),
    /// Remove the configuration addressed by an identity.
    Delete(Identity),
}

impl Command {
    /// Returns the identity this command targets.
    ///
    /// Used by the queue to coalesce superseded commands.
    pub fn identity(&self) -> &Identity {
        match self {
            Self::Update(source) => source.identity(),
            Self::Delete(identity) => identity,
        }
    }

    /// Returns a short name for log output.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Update(_) => "update",
            Self::Delete(_) => "delete",
        }
    }
}
