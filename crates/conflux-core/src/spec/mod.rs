//! Specification algebra for adapter selection.
//!
//! A [`Specification`] is a stateless, composable predicate over a payload
//! plus its metadata. Adapters advertise what they can convert through a
//! specification; the registry evaluates them at resolution time.
//!
//! Matching is total: a specification never fails, it only answers `false`
//! for objects it does not understand. Everything that *can* fail
//! (parsing a filter expression) fails at construction time instead.
//!
//! # Example
//!
//! ```rust,ignore
//! use conflux_core::spec::{AllOf, FilterSpec, TypeSpec};
//!
//! // bytes carrying a properties mime type
//! let spec = AllOf::new()
//!     .with(TypeSpec::of::<Vec<u8>>())
//!     .with(FilterSpec::parse("(config.mime=extension/properties)")?);
//! ```

use std::any::{Any, TypeId, type_name};

use crate::domain::Metadata;
use crate::error::SpecResult;
use crate::payload::Payload;

mod filter;

use filter::FilterExpr;

/// A composable predicate deciding whether an adapter applies to an object.
///
/// Implementations must be stateless and side-effect-free; they own none
/// of the objects they inspect.
pub trait Specification: Send + Sync {
    /// Returns `true` if the candidate object satisfies this specification.
    fn matches(&self, payload: &Payload, metadata: &Metadata) -> bool;
}

/// A boxed specification trait object.
pub type BoxedSpecification = Box<dyn Specification>;

// =============================================================================
// Leaf Specifications
// =============================================================================

/// Matches payloads whose runtime type is `T`.
///
/// Dynamic `instanceof`-style checks are expressed as an explicit type
/// identifier comparison against the type-erased [`Payload`].
#[derive(Debug, Clone)]
pub struct TypeSpec {
    target: TypeId,
    type_name: &'static str,
}

impl TypeSpec {
    /// Creates a specification matching payloads of type `T`.
    pub fn of<T: Any>() -> Self {
        Self {
            target: TypeId::of::<T>(),
            type_name: type_name::<T>(),
        }
    }

    /// Returns the name of the targeted type.
    pub fn target_name(&self) -> &'static str {
        self.type_name
    }
}

impl Specification for TypeSpec {
    fn matches(&self, payload: &Payload, _metadata: &Metadata) -> bool {
        payload.type_id() == self.target
    }
}

/// Matches payloads whose metadata satisfies an LDAP-style filter.
///
/// The expression is parsed once at construction (grammar documented in
/// the filter submodule). Construction is the only fallible step; a
/// `FilterSpec` that exists always evaluates.
#[derive(Debug, Clone)]
pub struct FilterSpec {
    expr: FilterExpr,
    expression: String,
}

impl FilterSpec {
    /// Parses a filter expression into a specification.
    pub fn parse(expression: &str) -> SpecResult<Self> {
        Ok(Self {
            expr: FilterExpr::parse(expression)?,
            expression: expression.to_string(),
        })
    }

    /// Returns the original filter text.
    pub fn expression(&self) -> &str {
        &self.expression
    }
}

impl Specification for FilterSpec {
    fn matches(&self, _payload: &Payload, metadata: &Metadata) -> bool {
        self.expr.matches(metadata)
    }
}

// =============================================================================
// Combinators
// =============================================================================

/// Matches when every child specification matches.
///
/// An empty `AllOf` is the identity element: it matches everything.
#[derive(Default)]
pub struct AllOf {
    children: Vec<BoxedSpecification>,
}

impl AllOf {
    /// Creates an empty conjunction.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a child specification.
    pub fn with(mut self, spec: impl Specification + 'static) -> Self {
        self.children.push(Box::new(spec));
        self
    }
}

impl Specification for AllOf {
    fn matches(&self, payload: &Payload, metadata: &Metadata) -> bool {
        self.children.iter().all(|c| c.matches(payload, metadata))
    }
}

/// Matches when at least one child specification matches.
#[derive(Default)]
pub struct AnyOf {
    children: Vec<BoxedSpecification>,
}

impl AnyOf {
    /// Creates an empty disjunction (matches nothing).
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a child specification.
    pub fn with(mut self, spec: impl Specification + 'static) -> Self {
        self.children.push(Box::new(spec));
        self
    }
}

impl Specification for AnyOf {
    fn matches(&self, payload: &Payload, metadata: &Metadata) -> bool {
        self.children.iter().any(|c| c.matches(payload, metadata))
    }
}

/// Inverts a child specification.
pub struct Not {
    inner: BoxedSpecification,
}

impl Not {
    /// Wraps a specification to negate it.
    pub fn new(spec: impl Specification + 'static) -> Self {
        Self {
            inner: Box::new(spec),
        }
    }
}

impl Specification for Not {
    fn matches(&self, payload: &Payload, metadata: &Metadata) -> bool {
        !self.inner.matches(payload, metadata)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ConfigDictionary;
    use crate::keys;

    #[test]
    fn test_type_spec_checks_runtime_type() {
        let spec = TypeSpec::of::<ConfigDictionary>();
        let meta = Metadata::new();
        assert!(spec.matches(&Payload::new(ConfigDictionary::new()), &meta));
        assert!(!spec.matches(&Payload::new(String::from("nope")), &meta));
    }

    #[test]
    fn test_empty_all_of_matches_everything() {
        let spec = AllOf::new();
        assert!(spec.matches(&Payload::new(()), &Metadata::new()));
    }

    #[test]
    fn test_composed_type_and_filter() {
        let spec = AllOf::new()
            .with(TypeSpec::of::<Vec<u8>>())
            .with(FilterSpec::parse("(config.mime=extension/*)").unwrap());

        let meta = Metadata::new().with(keys::MIME_TYPE, "extension/cfg");
        assert!(spec.matches(&Payload::new(Vec::<u8>::new()), &meta));
        // wrong type
        assert!(!spec.matches(&Payload::new(String::new()), &meta));
        // wrong mime
        let meta = Metadata::new().with(keys::MIME_TYPE, "application/json");
        assert!(!spec.matches(&Payload::new(Vec::<u8>::new()), &meta));
    }

    #[test]
    fn test_any_of_and_not() {
        let meta = Metadata::new().with(keys::MIME_TYPE, "extension/cfg");
        let payload = Payload::new(());

        let any = AnyOf::new()
            .with(FilterSpec::parse("(config.mime=application/json)").unwrap())
            .with(FilterSpec::parse("(config.mime=extension/cfg)").unwrap());
        assert!(any.matches(&payload, &meta));
        assert!(!AnyOf::new().matches(&payload, &meta));

        let not = Not::new(FilterSpec::parse("(config.mime=extension/cfg)").unwrap());
        assert!(!not.matches(&payload, &meta));
    }

    #[test]
    fn test_malformed_filter_rejected_at_construction() {
        assert!(FilterSpec::parse("(config.mime=").is_err());
        assert!(FilterSpec::parse("whatever").is_err());
    }
}
