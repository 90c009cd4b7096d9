//! Runtime error types.

use thiserror::Error;

/// Errors that can occur while assembling or running the pipeline.
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// Configuration loading or validation failed.
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// An adapter specification failed to construct.
    #[error("Specification error: {0}")]
    Spec(#[from] conflux_core::error::SpecError),

    /// The builder was not given a configuration sink.
    #[error("No configuration sink was provided")]
    MissingSink,
}

/// Result type for runtime operations.
pub type RuntimeResult<T> = Result<T, RuntimeError>;
