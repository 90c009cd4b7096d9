//! Configuration module for the Conflux runtime.
//!
//! TOML + environment based loading and validation for the pipeline's
//! runtime settings (logging, resolver bounds).

pub mod error;
pub mod loader;
pub mod schema;
pub mod validation;

pub use error::{ConfigError, ConfigResult};
pub use loader::{ConfigLoader, load_config, load_config_from_file};
pub use schema::{ConfluxConfig, LogFormat, LogLevel, LoggingConfig, ResolverConfig};
pub use validation::validate_config;
