//! Adapter trait and provenance stamping.
//!
//! An adapter is a capability unit: it advertises what it can convert
//! through a [`Specification`] and transforms one payload representation
//! into another. Adapters are stateless and own no configuration sources;
//! chains of them are composed by the registry until a
//! [`ConfigDictionary`] terminal is reached (e.g. file → bytes →
//! dictionary).
//!
//! Provenance is handled by explicit composition rather than inheritance:
//! [`AdapterRegistry::register`] wraps every adapter in a [`Stamped`]
//! decorator that overwrites the [`keys::INFO_ADAPTER`] metadata key
//! *after* the inner `adapt` call, so the last-applied adapter's stamp
//! always wins and cannot be spoofed by an upstream hop.
//!
//! [`AdapterRegistry::register`]: crate::registry::AdapterRegistry::register

use serde_json::Value;

use crate::domain::{ConfigDictionary, Metadata};
use crate::error::AdaptResult;
use crate::keys;
use crate::payload::Payload;
use crate::spec::Specification;

/// The output of one adaptation hop: a new payload plus the metadata
/// entries the adapter wants to add.
///
/// Added entries are merged over the inherited metadata by the resolver;
/// adapter-added keys win at the same key.
#[derive(Debug)]
pub struct Adapted {
    /// The transformed payload.
    pub payload: Payload,
    /// Metadata entries to add at this hop.
    pub metadata: Metadata,
}

impl Adapted {
    /// Creates an adaptation result with no added metadata.
    pub fn new(payload: Payload) -> Self {
        Self {
            payload,
            metadata: Metadata::new(),
        }
    }

    /// Attaches metadata to add at this hop (builder pattern).
    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }
}

/// A stateless transformation from one payload representation to another.
pub trait Adapter: Send + Sync {
    /// Returns the stable identity of this adapter, recorded as provenance
    /// on everything it produces.
    fn id(&self) -> &str;

    /// Returns the specification describing what this adapter accepts.
    fn specification(&self) -> &dyn Specification;

    /// Returns `true` if this adapter can convert the candidate object.
    ///
    /// Delegates to [`specification`](Self::specification); total, never
    /// fails.
    fn can_adapt(&self, payload: &Payload, metadata: &Metadata) -> bool {
        self.specification().matches(payload, metadata)
    }

    /// Converts the payload into a new representation.
    ///
    /// Only called after [`can_adapt`](Self::can_adapt) returned `true`.
    /// A matching adapter may still fail on malformed content; the
    /// resolver logs the failure and discards the source.
    fn adapt(&self, payload: &Payload, metadata: &Metadata) -> AdaptResult<Adapted>;
}

impl Adapter for Box<dyn Adapter> {
    fn id(&self) -> &str {
        (**self).id()
    }

    fn specification(&self) -> &dyn Specification {
        (**self).specification()
    }

    fn adapt(&self, payload: &Payload, metadata: &Metadata) -> AdaptResult<Adapted> {
        (**self).adapt(payload, metadata)
    }
}

// =============================================================================
// Closure Adapters
// =============================================================================

/// An adapter assembled from a specification and a transform closure.
///
/// The lightweight way for providers to register a capability without
/// defining a type:
///
/// ```rust,ignore
/// registry.register(FnAdapter::new(
///     "custom.reverse",
///     TypeSpec::of::<String>(),
///     |payload, _metadata| {
///         let text = payload.downcast_ref::<String>().unwrap();
///         Ok(Adapted::new(Payload::new(text.chars().rev().collect::<String>())))
///     },
/// ));
/// ```
pub struct FnAdapter<F> {
    id: String,
    spec: Box<dyn Specification>,
    transform: F,
}

impl<F> FnAdapter<F>
where
    F: Fn(&Payload, &Metadata) -> AdaptResult<Adapted> + Send + Sync,
{
    /// Creates an adapter from a specification and a transform function.
    pub fn new(id: impl Into<String>, spec: impl Specification + 'static, transform: F) -> Self {
        Self {
            id: id.into(),
            spec: Box::new(spec),
            transform,
        }
    }
}

impl<F> Adapter for FnAdapter<F>
where
    F: Fn(&Payload, &Metadata) -> AdaptResult<Adapted> + Send + Sync,
{
    fn id(&self) -> &str {
        &self.id
    }

    fn specification(&self) -> &dyn Specification {
        self.spec.as_ref()
    }

    fn adapt(&self, payload: &Payload, metadata: &Metadata) -> AdaptResult<Adapted> {
        (self.transform)(payload, metadata)
    }
}

// =============================================================================
// Provenance Stamp
// =============================================================================

/// Decorator composing an adapter with a provenance stamp.
///
/// `Stamped` delegates to the inner adapter, then overwrites
/// [`keys::INFO_ADAPTER`] in the hop's added metadata (and, when the hop
/// produced a dictionary terminal, in the dictionary itself) with the
/// inner adapter's id. The stamp is applied after the inner `adapt` call:
/// ordered function composition, base transform first, stamp last.
pub struct Stamped {
    inner: Box<dyn Adapter>,
}

impl Stamped {
    /// Wraps an adapter with the provenance stamp.
    pub fn new(inner: impl Adapter + 'static) -> Self {
        Self {
            inner: Box::new(inner),
        }
    }
}

impl Adapter for Stamped {
    fn id(&self) -> &str {
        self.inner.id()
    }

    fn specification(&self) -> &dyn Specification {
        self.inner.specification()
    }

    fn adapt(&self, payload: &Payload, metadata: &Metadata) -> AdaptResult<Adapted> {
        let Adapted {
            payload,
            metadata: mut added,
        } = self.inner.adapt(payload, metadata)?;

        let stamp = Value::from(self.inner.id());
        added.insert(keys::INFO_ADAPTER, stamp.clone());

        // dictionary terminals carry the stamp in the properties as well
        let payload = match payload.downcast_ref::<ConfigDictionary>() {
            Some(dictionary) => {
                let mut stamped = dictionary.clone();
                stamped.insert(keys::INFO_ADAPTER, stamp);
                Payload::new(stamped)
            }
            None => payload,
        };

        Ok(Adapted {
            payload,
            metadata: added,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::AllOf;

    /// Adapter that tries to claim someone else's provenance.
    struct Spoofing {
        spec: AllOf,
    }

    impl Adapter for Spoofing {
        fn id(&self) -> &str {
            "spoofing"
        }

        fn specification(&self) -> &dyn Specification {
            &self.spec
        }

        fn adapt(&self, _payload: &Payload, _metadata: &Metadata) -> AdaptResult<Adapted> {
            let dictionary = ConfigDictionary::new().with(keys::INFO_ADAPTER, "someone-else");
            let metadata = Metadata::new().with(keys::INFO_ADAPTER, "someone-else");
            Ok(Adapted::new(Payload::new(dictionary)).with_metadata(metadata))
        }
    }

    #[test]
    fn test_stamp_cannot_be_spoofed() {
        let stamped = Stamped::new(Spoofing { spec: AllOf::new() });
        let adapted = stamped.adapt(&Payload::new(()), &Metadata::new()).unwrap();

        assert_eq!(adapted.metadata.get_str(keys::INFO_ADAPTER), Some("spoofing"));
        let dictionary = adapted.payload.downcast_ref::<ConfigDictionary>().unwrap();
        assert_eq!(dictionary.get_str(keys::INFO_ADAPTER), Some("spoofing"));
    }

    #[test]
    fn test_fn_adapter() {
        use crate::spec::TypeSpec;

        let adapter = FnAdapter::new("fn.upper", TypeSpec::of::<String>(), |payload, _| {
            let text = payload.downcast_ref::<String>().cloned().unwrap_or_default();
            Ok(Adapted::new(Payload::new(text.to_uppercase())))
        });

        assert_eq!(adapter.id(), "fn.upper");
        assert!(adapter.can_adapt(&Payload::new(String::from("x")), &Metadata::new()));
        assert!(!adapter.can_adapt(&Payload::new(1u8), &Metadata::new()));

        let adapted = adapter
            .adapt(&Payload::new(String::from("quiet")), &Metadata::new())
            .unwrap();
        assert_eq!(adapted.payload.downcast_ref::<String>().unwrap(), "QUIET");
    }
}
