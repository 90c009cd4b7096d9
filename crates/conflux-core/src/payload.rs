//! Type-erased payload container.
//!
//! Configuration sources carry arbitrary objects: a file path handed over by
//! a directory watcher, the raw bytes of a packaged artifact, an in-registry
//! object, or an already-canonical [`ConfigDictionary`]. The adapter chain
//! needs to pass these around without knowing their concrete types, and
//! specifications need to test type membership at match time.
//!
//! [`Payload`] wraps any `'static` value behind `Arc<dyn Any>` and captures
//! its type name, so specifications can do explicit type-identifier checks
//! instead of reflection.
//!
//! # Example
//!
//! ```rust,ignore
//! use conflux_core::Payload;
//!
//! let payload = Payload::new(vec![0u8; 4]);
//! assert!(payload.is::<Vec<u8>>());
//! assert_eq!(payload.downcast_ref::<Vec<u8>>().unwrap().len(), 4);
//! ```
//!
//! [`ConfigDictionary`]: crate::domain::ConfigDictionary

use std::any::{Any, TypeId, type_name};
use std::sync::Arc;

/// A type-erased, cheaply clonable object handed through adapter chains.
///
/// The contained value is immutable; adapters produce new payloads rather
/// than mutating their input.
#[derive(Clone)]
pub struct Payload {
    inner: Arc<dyn Any + Send + Sync>,
    type_name: &'static str,
}

impl Payload {
    /// Wraps a value into a payload.
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self {
            inner: Arc::new(value),
            type_name: type_name::<T>(),
        }
    }

    /// Returns the type name of the contained value.
    ///
    /// Intended for diagnostics and log output, not for matching; use
    /// [`type_id`](Self::type_id) or [`is`](Self::is) for that.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Returns the `TypeId` of the contained value.
    pub fn type_id(&self) -> TypeId {
        (*self.inner).type_id()
    }

    /// Returns `true` if the contained value is of type `T`.
    pub fn is<T: Any>(&self) -> bool {
        self.inner.is::<T>()
    }

    /// Attempts to borrow the contained value as `T`.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }
}

impl std::fmt::Debug for Payload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Payload")
            .field("type_name", &self.type_name)
            .finish()
    }
}
