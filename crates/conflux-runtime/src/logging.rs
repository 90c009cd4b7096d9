//! Logging setup for the Conflux runtime.
//!
//! Unified `tracing` + `tracing-subscriber` initialization, driven by the
//! runtime configuration.
//!
//! ```rust,ignore
//! use conflux_runtime::{config::load_config, logging};
//!
//! let config = load_config()?;
//! logging::init_from_config(&config.logging);
//! ```

use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::config::schema::{LogFormat, LoggingConfig};

/// Initialize logging from a [`LoggingConfig`].
///
/// Safe to call more than once; a subscriber that is already installed
/// wins.
pub fn init_from_config(config: &LoggingConfig) {
    let _ = LoggingBuilder::from_config(config).try_init();
}

/// A builder for configuring logging by hand.
///
/// ```rust,ignore
/// use conflux_runtime::logging::LoggingBuilder;
///
/// LoggingBuilder::new()
///     .level(tracing::Level::DEBUG)
///     .directive("conflux_runtime=trace")
///     .init();
/// ```
#[derive(Default)]
pub struct LoggingBuilder {
    level: Option<tracing::Level>,
    directives: Vec<String>,
    format: LogFormat,
}

impl LoggingBuilder {
    /// Creates a new logging builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder from a [`LoggingConfig`].
    pub fn from_config(config: &LoggingConfig) -> Self {
        let mut builder = Self::new();
        builder.level = Some(config.level.to_tracing_level());
        builder.format = config.format;
        for (module, level) in &config.filters {
            builder.directives.push(format!("{module}={}", level.as_str()));
        }
        builder
    }

    /// Sets the base log level.
    pub fn level(mut self, level: tracing::Level) -> Self {
        self.level = Some(level);
        self
    }

    /// Adds a filter directive (e.g. `conflux_core=debug`).
    pub fn directive(mut self, directive: impl Into<String>) -> Self {
        self.directives.push(directive.into());
        self
    }

    /// Sets the output format.
    pub fn format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    fn build_filter(&self) -> EnvFilter {
        let base_level = self.level.unwrap_or(tracing::Level::INFO);
        let base_filter = base_level.to_string().to_lowercase();

        // RUST_LOG wins over configured levels
        let mut filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&base_filter));
        for directive in &self.directives {
            if let Ok(d) = directive.parse() {
                filter = filter.add_directive(d);
            }
        }
        filter
    }

    /// Initialize the logging system.
    pub fn init(self) {
        let _ = self.try_init();
    }

    /// Try to initialize the logging system, returning an error on failure.
    pub fn try_init(self) -> Result<(), TryInitError> {
        let filter = self.build_filter();
        let registry = tracing_subscriber::registry().with(filter);

        match self.format {
            LogFormat::Compact => registry.with(fmt::layer().compact()).try_init(),
            LogFormat::Full => registry.with(fmt::layer()).try_init(),
            LogFormat::Pretty => registry.with(fmt::layer().pretty()).try_init(),
            #[cfg(feature = "json-log")]
            LogFormat::Json => registry.with(fmt::layer().json()).try_init(),
        }
    }
}
