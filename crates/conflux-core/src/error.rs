//! Unified error types for the Conflux core.
//!
//! Construction-time failures (malformed filter expressions) are kept
//! separate from resolution-time failures (no usable adapter chain):
//! the former are fatal to the registration that caused them, the latter
//! are logged and the offending source is discarded.

use thiserror::Error;

// =============================================================================
// Specification Errors
// =============================================================================

/// Errors raised while constructing a specification.
///
/// Matching itself is total and never fails; everything that can go wrong
/// goes wrong here, at registration time.
#[derive(Debug, Clone, Error)]
pub enum SpecError {
    /// The filter expression could not be parsed.
    #[error("invalid filter expression at offset {position}: {reason} in `{expression}`")]
    InvalidFilter {
        /// The full expression that failed to parse.
        expression: String,
        /// Byte offset of the failure.
        position: usize,
        /// What went wrong.
        reason: String,
    },
}

// =============================================================================
// Adaptation Errors
// =============================================================================

/// Errors raised while resolving or applying an adapter chain.
///
/// All variants are non-fatal to the pipeline: the processor logs them and
/// discards the source.
#[derive(Debug, Clone, Error)]
pub enum AdaptError {
    /// No registered adapter chain reaches a dictionary terminal.
    #[error("no adapter chain reaches a configuration dictionary from {object_type}")]
    NotAdaptable {
        /// Type of the object that could not be adapted.
        object_type: String,
    },

    /// The chain exceeded the hop bound without reaching a dictionary.
    ///
    /// Usually an adapter misconfigured to re-match its own output type.
    #[error("adapter chain exceeded {max_hops} hops without reaching a dictionary")]
    ChainOverflow {
        /// The configured hop bound.
        max_hops: usize,
    },

    /// An adapter matched but failed to transform its input.
    #[error("adapter '{adapter}' failed: {reason}")]
    AdapterFailed {
        /// Identity of the failing adapter.
        adapter: String,
        /// What went wrong.
        reason: String,
    },
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for specification construction.
pub type SpecResult<T> = Result<T, SpecError>;

/// Result type for adaptation operations.
pub type AdaptResult<T> = Result<T, AdaptError>;
