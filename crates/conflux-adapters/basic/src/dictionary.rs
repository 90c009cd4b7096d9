//! Dictionary → dictionary passthrough.

use conflux_core::adapter::{Adapted, Adapter};
use conflux_core::domain::{ConfigDictionary, Metadata};
use conflux_core::error::AdaptResult;
use conflux_core::payload::Payload;
use conflux_core::spec::{Specification, TypeSpec};

/// Accepts an already-canonical [`ConfigDictionary`] payload and passes it
/// through unchanged.
///
/// Exists so canonical payloads still travel the adapter chain and receive
/// the provenance stamp like everything else.
pub struct DictionaryAdapter {
    spec: TypeSpec,
}

impl DictionaryAdapter {
    /// Creates the passthrough adapter.
    pub fn new() -> Self {
        Self {
            spec: TypeSpec::of::<ConfigDictionary>(),
        }
    }
}

impl Default for DictionaryAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl Adapter for DictionaryAdapter {
    fn id(&self) -> &str {
        "basic.dictionary"
    }

    fn specification(&self) -> &dyn Specification {
        &self.spec
    }

    fn adapt(&self, payload: &Payload, _metadata: &Metadata) -> AdaptResult<Adapted> {
        // specification guarantees the downcast
        let dictionary = payload
            .downcast_ref::<ConfigDictionary>()
            .cloned()
            .unwrap_or_default();
        Ok(Adapted::new(Payload::new(dictionary)))
    }
}
