//! Configuration sources: the result of a detector observation.

use tracing::trace;

use crate::domain::{Identity, Metadata};
use crate::payload::Payload;

/// An observed configuration source: a target identity plus the payload
/// and metadata captured at observation time.
///
/// The payload is the raw object prior to adaptation (or an
/// already-canonical dictionary); adaptation happens later, on the
/// processor's consumer task. Sources are immutable once constructed and
/// are dropped when superseded by a later command for the same identity
/// or once the processor drains them.
#[derive(Debug, Clone)]
pub struct ConfigurationSource {
    identity: Identity,
    payload: Payload,
    metadata: Metadata,
}

impl ConfigurationSource {
    /// Creates a source for a known identity.
    pub fn new(identity: Identity, payload: Payload, metadata: Metadata) -> Self {
        Self {
            identity,
            payload,
            metadata,
        }
    }

    /// Builds a source by extracting the target identity from metadata.
    ///
    /// Returns `None` when the metadata does not address any configuration
    /// target (see [`Identity::from_metadata`]); the observation is then
    /// ignored without producing a command.
    pub fn from_metadata(payload: Payload, metadata: Metadata) -> Option<Self> {
        match Identity::from_metadata(&metadata) {
            Some(identity) => Some(Self::new(identity, payload, metadata)),
            None => {
                trace!(
                    object_type = payload.type_name(),
                    "Observation does not address a configuration target, ignoring"
                );
                None
            }
        }
    }

    /// Returns the target identity.
    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    /// Returns the raw payload.
    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    /// Returns the captured metadata.
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Splits the source into its parts.
    pub fn into_parts(self) -> (Identity, Payload, Metadata) {
        (self.identity, self.payload, self.metadata)
    }
}
