//! Configuration schema definitions.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use conflux_core::registry::DEFAULT_MAX_CHAIN_HOPS;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConfluxConfig {
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Adapter chain resolution settings.
    #[serde(default)]
    pub resolver: ResolverConfig,
}

/// Adapter chain resolution settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Bound on adapter chain length before resolution gives up.
    #[serde(default = "default_max_chain_hops")]
    pub max_chain_hops: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            max_chain_hops: default_max_chain_hops(),
        }
    }
}

fn default_max_chain_hops() -> usize {
    DEFAULT_MAX_CHAIN_HOPS
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Base log level.
    #[serde(default)]
    pub level: LogLevel,

    /// Output format.
    #[serde(default)]
    pub format: LogFormat,

    /// Per-module level overrides (`module = "debug"`).
    #[serde(default)]
    pub filters: HashMap<String, LogLevel>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            format: LogFormat::Compact,
            filters: HashMap::new(),
        }
    }
}

/// Log severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Trace level.
    Trace,
    /// Debug level.
    Debug,
    /// Info level (default).
    #[default]
    Info,
    /// Warn level.
    Warn,
    /// Error level.
    Error,
}

impl LogLevel {
    /// Returns the level as a lowercase directive string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }

    /// Converts to a `tracing` level.
    pub fn to_tracing_level(self) -> tracing::Level {
        match self {
            Self::Trace => tracing::Level::TRACE,
            Self::Debug => tracing::Level::DEBUG,
            Self::Info => tracing::Level::INFO,
            Self::Warn => tracing::Level::WARN,
            Self::Error => tracing::Level::ERROR,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Single-line compact output (default).
    #[default]
    Compact,
    /// Full fields on one line.
    Full,
    /// Multi-line human-oriented output.
    Pretty,
    /// Newline-delimited JSON (requires the `json-log` feature).
    #[cfg(feature = "json-log")]
    Json,
}
