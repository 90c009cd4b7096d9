//! Canonical addressing of configuration targets.

use crate::domain::Metadata;
use crate::keys;

/// What a configuration addresses: a singleton target or a named instance
/// of a factory target.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IdentityKind {
    /// A singleton configuration target.
    Singleton {
        /// Persistent identifier of the target.
        pid: String,
    },
    /// A named instance of a templated (factory) configuration target.
    Factory {
        /// Persistent identifier of the factory.
        factory_pid: String,
        /// Name of this instance.
        instance: String,
    },
}

/// Canonical address of a configuration target.
///
/// Exactly one of singleton-pid or factory-pid+instance is set, optionally
/// scoped to an origin `location` (which deploying unit owns this
/// configuration).
///
/// # Equality
///
/// `Identity` equality (and therefore hashing and queue coalescing)
/// covers the [`IdentityKind`] only: the sink addresses configurations by
/// pid or factory identity alone. The location only matters when comparing
/// source provenance; use [`same_provenance`](Self::same_provenance) for
/// that.
#[derive(Debug, Clone)]
pub struct Identity {
    kind: IdentityKind,
    location: Option<String>,
}

impl Identity {
    /// Creates a singleton identity.
    pub fn singleton(pid: impl Into<String>) -> Self {
        Self {
            kind: IdentityKind::Singleton { pid: pid.into() },
            location: None,
        }
    }

    /// Creates a factory identity.
    pub fn factory(factory_pid: impl Into<String>, instance: impl Into<String>) -> Self {
        Self {
            kind: IdentityKind::Factory {
                factory_pid: factory_pid.into(),
                instance: instance.into(),
            },
            location: None,
        }
    }

    /// Scopes this identity to an origin location.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Builds an identity from well-known metadata keys.
    ///
    /// Precedence: a plain pid key yields a singleton identity (factory
    /// keys, if present, are ignored); otherwise a complete factory
    /// pid + instance pair yields a factory identity; otherwise the
    /// metadata does not address any configuration target and `None` is
    /// returned. Not an error: the observation is simply ignored.
    pub fn from_metadata(metadata: &Metadata) -> Option<Self> {
        let location = metadata.get_str(keys::TARGET_LOCATION);

        let identity = if let Some(pid) = metadata.get_str(keys::TARGET_PID) {
            Self::singleton(pid)
        } else {
            let factory_pid = metadata.get_str(keys::TARGET_FACTORY_PID)?;
            let instance = metadata.get_str(keys::TARGET_FACTORY_INSTANCE)?;
            Self::factory(factory_pid, instance)
        };

        Some(match location {
            Some(location) => identity.with_location(location),
            None => identity,
        })
    }

    /// Returns the identity kind.
    pub fn kind(&self) -> &IdentityKind {
        &self.kind
    }

    /// Returns the singleton pid, if this is a singleton identity.
    pub fn pid(&self) -> Option<&str> {
        match &self.kind {
            IdentityKind::Singleton { pid } => Some(pid),
            IdentityKind::Factory { .. } => None,
        }
    }

    /// Returns the origin location, if scoped.
    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    /// Returns `true` if the other identity addresses the same target
    /// *and* comes from the same origin location.
    pub fn same_provenance(&self, other: &Identity) -> bool {
        self.kind == other.kind && self.location == other.location
    }
}

// Routing equality: the sink addresses by pid / factory identity alone,
// so location is deliberately excluded here.
impl PartialEq for Identity {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
    }
}

impl Eq for Identity {}

impl std::hash::Hash for Identity {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.kind.hash(state);
    }
}

impl std::fmt::Display for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            IdentityKind::Singleton { pid } => write!(f, "{pid}"),
            IdentityKind::Factory {
                factory_pid,
                instance,
            } => write!(f, "{factory_pid}~{instance}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pid_only_builds_singleton() {
        let meta = Metadata::new().with(keys::TARGET_PID, "net.example.http");
        let identity = Identity::from_metadata(&meta).unwrap();
        assert_eq!(identity.pid(), Some("net.example.http"));
    }

    #[test]
    fn test_pid_takes_precedence_over_factory_keys() {
        let meta = Metadata::new()
            .with(keys::TARGET_PID, "plain")
            .with(keys::TARGET_FACTORY_PID, "factory")
            .with(keys::TARGET_FACTORY_INSTANCE, "a");
        let identity = Identity::from_metadata(&meta).unwrap();
        assert_eq!(identity, Identity::singleton("plain"));
    }

    #[test]
    fn test_complete_factory_pair_builds_factory() {
        let meta = Metadata::new()
            .with(keys::TARGET_FACTORY_PID, "net.example.worker")
            .with(keys::TARGET_FACTORY_INSTANCE, "pool-1");
        let identity = Identity::from_metadata(&meta).unwrap();
        assert_eq!(identity, Identity::factory("net.example.worker", "pool-1"));
    }

    #[test]
    fn test_incomplete_factory_pair_is_no_identity() {
        let meta = Metadata::new().with(keys::TARGET_FACTORY_PID, "net.example.worker");
        assert!(Identity::from_metadata(&meta).is_none());
        assert!(Identity::from_metadata(&Metadata::new()).is_none());
    }

    #[test]
    fn test_non_string_pid_is_ignored() {
        let meta = Metadata::new().with(keys::TARGET_PID, 17);
        assert!(Identity::from_metadata(&meta).is_none());
    }

    #[test]
    fn test_routing_equality_ignores_location() {
        let global = Identity::singleton("net.example.http");
        let scoped = Identity::singleton("net.example.http").with_location("unit-a");
        assert_eq!(global, scoped);
        assert!(!global.same_provenance(&scoped));
        assert!(scoped.same_provenance(&scoped.clone()));
    }

    #[test]
    fn test_factory_and_singleton_never_equal() {
        let singleton = Identity::singleton("x");
        let factory = Identity::factory("x", "x");
        assert_ne!(singleton, factory);
    }
}
