//! # Conflux Core
//!
//! The core engine of the Conflux configuration provisioning pipeline.
//!
//! Conflux detects configuration-bearing artifacts scattered across a
//! running component ecosystem (files, byte streams, in-registry objects)
//! and converts them into canonical key/value configuration sets applied to
//! a central configuration store. This crate provides the resolution half
//! of that pipeline; the queueing half lives in `conflux-runtime`.
//!
//! ## Architecture Layers
//!
//! - **Domain model** ([`domain`]): [`Identity`], [`Metadata`],
//!   [`ConfigDictionary`], [`ConfigurationSource`], [`Command`], the
//!   vocabulary shared by detectors, adapters and the sink.
//! - **Specification algebra** ([`spec`]): composable predicates
//!   ([`TypeSpec`], [`FilterSpec`], [`AllOf`], [`AnyOf`], [`Not`]) that
//!   adapters use to advertise what they accept.
//! - **Adapters** ([`adapter`], [`registry`]): stateless transformations
//!   selected and chained by the [`AdapterRegistry`] until a payload
//!   becomes a [`ConfigDictionary`].
//!
//! ## Data Flow
//!
//! ```text
//! ┌──────────┐    ┌───────────────────┐    ┌─────────────────┐
//! │ Detector │───▶│ AdapterRegistry   │───▶│ ConfigDictionary│
//! │ (files,  │    │ spec match + chain│    │ + provenance    │
//! │ registry)│    └───────────────────┘    └─────────────────┘
//! └──────────┘         file → bytes → dictionary
//! ```
//!
//! Detectors produce a [`ConfigurationSource`]; the registry resolves an
//! adapter chain for its payload; the resulting dictionary is applied to
//! the configuration sink by the command processor in `conflux-runtime`.

pub mod adapter;
pub mod domain;
pub mod error;
pub mod keys;
pub mod payload;
pub mod registry;
pub mod spec;

// Re-export domain types
pub use domain::{Command, ConfigDictionary, ConfigurationSource, Identity, IdentityKind, Metadata};

// Re-export pipeline types
pub use adapter::{Adapted, Adapter, FnAdapter, Stamped};
pub use error::{AdaptError, AdaptResult, SpecError, SpecResult};
pub use payload::Payload;
pub use registry::{Adaptation, AdapterRegistry, DEFAULT_MAX_CHAIN_HOPS};
pub use spec::{AllOf, AnyOf, BoxedSpecification, FilterSpec, Not, Specification, TypeSpec};

/// Prelude for common imports.
pub mod prelude {
    pub use super::adapter::{Adapted, Adapter, FnAdapter};
    pub use super::domain::{
        Command, ConfigDictionary, ConfigurationSource, Identity, IdentityKind, Metadata,
    };
    pub use super::payload::Payload;
    pub use super::registry::{Adaptation, AdapterRegistry};
    pub use super::spec::{AllOf, AnyOf, FilterSpec, Not, Specification, TypeSpec};
}
