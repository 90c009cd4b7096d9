//! Adapter registry and chain resolver.
//!
//! The registry holds every adapter known to the pipeline and resolves,
//! for an arbitrary object plus metadata, the chain of adapters that
//! converts it into a [`ConfigDictionary`].
//!
//! Resolution is iterative fixpoint chaining: starting from the raw
//! object, query all registered adapters against the *current*
//! object + metadata, apply the first match (registration order,
//! predictable beats clever), and repeat until a dictionary terminal is
//! reached, no adapter matches, or the hop bound trips.
//!
//! Registration is write-rare, read-many: adapters are registered during
//! system bring-up through `&mut self`, after which the registry is shared
//! immutably (`Arc<AdapterRegistry>`). Registration completing before any
//! resolution call is established by construction order, not by locking.
//!
//! # Example
//!
//! ```rust,ignore
//! use conflux_core::registry::AdapterRegistry;
//!
//! let mut registry = AdapterRegistry::new();
//! registry.register(FileAdapter::new());
//! registry.register(PropertiesAdapter::new()?);
//! let registry = Arc::new(registry);
//!
//! let adaptation = registry.adapt_fully(payload, metadata)?;
//! println!("{} properties via {:?}", adaptation.properties.len(), adaptation.chain);
//! ```

use tracing::{debug, trace};

use crate::adapter::{Adapter, Stamped};
use crate::domain::{ConfigDictionary, Metadata};
use crate::error::{AdaptError, AdaptResult};
use crate::payload::Payload;

/// Default bound on adapter chain length.
///
/// Chains are expected to be short (file → bytes → dictionary); a chain
/// this long is a misconfigured adapter re-matching its own output.
pub const DEFAULT_MAX_CHAIN_HOPS: usize = 8;

/// The result of fully adapting an object to its canonical form.
#[derive(Debug)]
pub struct Adaptation {
    /// The canonical configuration properties.
    pub properties: ConfigDictionary,
    /// The metadata accumulated across all hops.
    pub metadata: Metadata,
    /// Ids of the adapters applied, in application order.
    pub chain: Vec<String>,
}

/// Holds all registered adapters and resolves chains over them.
pub struct AdapterRegistry {
    adapters: Vec<Stamped>,
    max_chain_hops: usize,
}

impl AdapterRegistry {
    /// Creates an empty registry with the default hop bound.
    pub fn new() -> Self {
        Self {
            adapters: Vec::new(),
            max_chain_hops: DEFAULT_MAX_CHAIN_HOPS,
        }
    }

    /// Creates an empty registry with a custom hop bound.
    pub fn with_max_chain_hops(max_chain_hops: usize) -> Self {
        Self {
            adapters: Vec::new(),
            max_chain_hops,
        }
    }

    /// Registers an adapter, wrapping it with the provenance stamp.
    ///
    /// Expected to be called only during system bring-up, before the
    /// registry is shared.
    pub fn register(&mut self, adapter: impl Adapter + 'static) {
        let stamped = Stamped::new(adapter);
        debug!(adapter = stamped.id(), "Registered adapter");
        self.adapters.push(stamped);
    }

    /// Returns the number of registered adapters.
    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    /// Returns `true` if no adapters are registered.
    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }

    /// Returns the ids of all registered adapters in registration order.
    pub fn adapter_ids(&self) -> Vec<&str> {
        self.adapters.iter().map(|a| a.id()).collect()
    }

    /// Finds the first registered adapter accepting the candidate object.
    pub fn resolve(&self, payload: &Payload, metadata: &Metadata) -> Option<&Stamped> {
        self.adapters
            .iter()
            .find(|adapter| adapter.can_adapt(payload, metadata))
    }

    /// Adapts an object until a dictionary terminal is reached.
    ///
    /// Each hop merges the adapter's added metadata over the inherited
    /// metadata (added keys win) and stamps provenance last. Terminates
    /// when a hop produces a [`ConfigDictionary`], when no adapter matches
    /// a dictionary that is already canonical (success), when no adapter
    /// matches anything else ([`AdaptError::NotAdaptable`]), or when the
    /// hop bound trips ([`AdaptError::ChainOverflow`]).
    pub fn adapt_fully(&self, payload: Payload, metadata: Metadata) -> AdaptResult<Adaptation> {
        let mut current = payload;
        let mut metadata = metadata;
        let mut chain = Vec::new();

        loop {
            // a dictionary reached through at least one hop is terminal
            if !chain.is_empty()
                && let Some(dictionary) = current.downcast_ref::<ConfigDictionary>()
            {
                trace!(chain = ?chain, properties = dictionary.len(), "Adaptation complete");
                return Ok(Adaptation {
                    properties: dictionary.clone(),
                    metadata,
                    chain,
                });
            }

            if chain.len() >= self.max_chain_hops {
                return Err(AdaptError::ChainOverflow {
                    max_hops: self.max_chain_hops,
                });
            }

            let Some(adapter) = self.resolve(&current, &metadata) else {
                // nothing registered to re-shape an already-canonical dictionary
                if let Some(dictionary) = current.downcast_ref::<ConfigDictionary>() {
                    return Ok(Adaptation {
                        properties: dictionary.clone(),
                        metadata,
                        chain,
                    });
                }
                return Err(AdaptError::NotAdaptable {
                    object_type: current.type_name().to_string(),
                });
            };

            trace!(
                adapter = adapter.id(),
                object_type = current.type_name(),
                hop = chain.len(),
                "Applying adapter"
            );
            let adapted = adapter.adapt(&current, &metadata)?;
            metadata.merge(adapted.metadata);
            chain.push(adapter.id().to_string());
            current = adapted.payload;
        }
    }
}

impl Default for AdapterRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::Adapted;
    use crate::error::AdaptResult;
    use crate::keys;
    use crate::spec::{AllOf, Specification, TypeSpec};

    /// String payload → byte payload.
    struct TextToBytes {
        spec: TypeSpec,
    }

    impl TextToBytes {
        fn new() -> Self {
            Self {
                spec: TypeSpec::of::<String>(),
            }
        }
    }

    impl Adapter for TextToBytes {
        fn id(&self) -> &str {
            "test.text"
        }

        fn specification(&self) -> &dyn Specification {
            &self.spec
        }

        fn adapt(&self, payload: &Payload, _metadata: &Metadata) -> AdaptResult<Adapted> {
            let text = payload.downcast_ref::<String>().unwrap();
            Ok(Adapted::new(Payload::new(text.clone().into_bytes()))
                .with_metadata(Metadata::new().with("test.hop", "text")))
        }
    }

    /// Byte payload → single-property dictionary.
    struct BytesToDictionary {
        spec: TypeSpec,
    }

    impl BytesToDictionary {
        fn new() -> Self {
            Self {
                spec: TypeSpec::of::<Vec<u8>>(),
            }
        }
    }

    impl Adapter for BytesToDictionary {
        fn id(&self) -> &str {
            "test.bytes"
        }

        fn specification(&self) -> &dyn Specification {
            &self.spec
        }

        fn adapt(&self, payload: &Payload, _metadata: &Metadata) -> AdaptResult<Adapted> {
            let bytes = payload.downcast_ref::<Vec<u8>>().unwrap();
            let dictionary =
                ConfigDictionary::new().with("content", String::from_utf8_lossy(bytes).to_string());
            Ok(Adapted::new(Payload::new(dictionary)))
        }
    }

    /// Matches everything, always outputs its own input type. Never terminates.
    struct SelfFeeding {
        spec: AllOf,
    }

    impl Adapter for SelfFeeding {
        fn id(&self) -> &str {
            "test.cycle"
        }

        fn specification(&self) -> &dyn Specification {
            &self.spec
        }

        fn adapt(&self, _payload: &Payload, _metadata: &Metadata) -> AdaptResult<Adapted> {
            Ok(Adapted::new(Payload::new(0u64)))
        }
    }

    fn chained_registry() -> AdapterRegistry {
        let mut registry = AdapterRegistry::new();
        registry.register(TextToBytes::new());
        registry.register(BytesToDictionary::new());
        registry
    }

    #[test]
    fn test_two_hop_chain_reaches_dictionary() {
        let registry = chained_registry();
        let adaptation = registry
            .adapt_fully(Payload::new(String::from("payload")), Metadata::new())
            .unwrap();

        assert_eq!(adaptation.chain, vec!["test.text", "test.bytes"]);
        assert_eq!(adaptation.properties.get_str("content"), Some("payload"));
        // provenance names the last adapter applied
        assert_eq!(
            adaptation.properties.get_str(keys::INFO_ADAPTER),
            Some("test.bytes")
        );
        assert_eq!(
            adaptation.metadata.get_str(keys::INFO_ADAPTER),
            Some("test.bytes")
        );
        // intermediate hop metadata survives the merge
        assert_eq!(adaptation.metadata.get_str("test.hop"), Some("text"));
    }

    #[test]
    fn test_adaptation_is_idempotent() {
        let registry = chained_registry();
        let run = |registry: &AdapterRegistry| {
            registry
                .adapt_fully(Payload::new(String::from("same")), Metadata::new())
                .unwrap()
        };
        let first = run(&registry);
        let second = run(&registry);
        assert_eq!(first.properties, second.properties);
        assert_eq!(first.chain, second.chain);
    }

    #[test]
    fn test_unmatched_object_is_not_adaptable() {
        let registry = chained_registry();
        let err = registry
            .adapt_fully(Payload::new(3.14f64), Metadata::new())
            .unwrap_err();
        assert!(matches!(err, AdaptError::NotAdaptable { .. }));
    }

    #[test]
    fn test_cycle_guard_trips_instead_of_looping() {
        let mut registry = AdapterRegistry::with_max_chain_hops(4);
        registry.register(SelfFeeding { spec: AllOf::new() });

        let err = registry
            .adapt_fully(Payload::new(String::from("spin")), Metadata::new())
            .unwrap_err();
        assert!(matches!(err, AdaptError::ChainOverflow { max_hops: 4 }));
    }

    #[test]
    fn test_registration_order_decides_ambiguity() {
        struct Named(&'static str, AllOf);
        impl Adapter for Named {
            fn id(&self) -> &str {
                self.0
            }
            fn specification(&self) -> &dyn Specification {
                &self.1
            }
            fn adapt(&self, _: &Payload, _: &Metadata) -> AdaptResult<Adapted> {
                Ok(Adapted::new(Payload::new(ConfigDictionary::new())))
            }
        }

        let mut registry = AdapterRegistry::new();
        registry.register(Named("first", AllOf::new()));
        registry.register(Named("second", AllOf::new()));

        let resolved = registry.resolve(&Payload::new(()), &Metadata::new()).unwrap();
        assert_eq!(resolved.id(), "first");
    }

    #[test]
    fn test_raw_dictionary_without_adapters_passes_through() {
        let registry = AdapterRegistry::new();
        let dictionary = ConfigDictionary::new().with("a", 1);
        let adaptation = registry
            .adapt_fully(Payload::new(dictionary.clone()), Metadata::new())
            .unwrap();
        assert_eq!(adaptation.properties, dictionary);
        assert!(adaptation.chain.is_empty());
    }
}
