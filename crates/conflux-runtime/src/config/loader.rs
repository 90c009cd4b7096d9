//! Configuration loader using figment.
//!
//! Sources are layered, later ones overriding earlier ones:
//!
//! 1. Built-in defaults
//! 2. The main config file (`conflux.toml` in the search paths, or an
//!    explicitly given file)
//! 3. Environment variables (`CONFLUX_*`)
//! 4. Programmatic overrides
//!
//! # Environment Variable Mapping
//!
//! Environment variables use the `CONFLUX_` prefix with `__` as the
//! nesting separator:
//!
//! - `CONFLUX_LOGGING__LEVEL=debug` → `logging.level = "debug"`
//! - `CONFLUX_RESOLVER__MAX_CHAIN_HOPS=4` → `resolver.max_chain_hops = 4`
//!
//! # Example
//!
//! ```rust,ignore
//! use conflux_runtime::config::ConfigLoader;
//!
//! // default locations + environment
//! let config = ConfigLoader::new().with_current_dir().load()?;
//!
//! // a specific file, environment ignored
//! let config = ConfigLoader::new()
//!     .file("deploy/conflux.toml")
//!     .without_env()
//!     .load()?;
//! ```

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use tracing::debug;

use super::error::ConfigResult;
use super::schema::ConfluxConfig;
use super::validation::validate_config;

/// Default configuration file name.
const CONFIG_FILE: &str = "conflux.toml";

/// Configuration loader with figment-based multi-source support.
pub struct ConfigLoader {
    explicit_file: Option<PathBuf>,
    search_paths: Vec<PathBuf>,
    use_env: bool,
    overrides: Option<ConfluxConfig>,
}

impl ConfigLoader {
    /// Creates a loader with defaults and environment enabled.
    pub fn new() -> Self {
        Self {
            explicit_file: None,
            search_paths: Vec::new(),
            use_env: true,
            overrides: None,
        }
    }

    /// Adds the current directory to the search paths.
    pub fn with_current_dir(mut self) -> Self {
        self.search_paths.push(PathBuf::from("."));
        self
    }

    /// Adds a search path for `conflux.toml`.
    pub fn search_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.search_paths.push(path.as_ref().to_path_buf());
        self
    }

    /// Sets a specific configuration file to load.
    pub fn file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.explicit_file = Some(path.as_ref().to_path_buf());
        self
    }

    /// Enables environment variable loading (enabled by default).
    pub fn with_env(mut self) -> Self {
        self.use_env = true;
        self
    }

    /// Disables environment variable loading.
    pub fn without_env(mut self) -> Self {
        self.use_env = false;
        self
    }

    /// Merges programmatic overrides on top of every other source.
    pub fn merge(mut self, config: ConfluxConfig) -> Self {
        self.overrides = Some(config);
        self
    }

    /// Loads and validates the configuration.
    pub fn load(self) -> ConfigResult<ConfluxConfig> {
        let mut figment = Figment::from(Serialized::defaults(ConfluxConfig::default()));

        if let Some(file) = &self.explicit_file {
            debug!(file = %file.display(), "Loading configuration file");
            figment = figment.merge(Toml::file(file));
        } else {
            for dir in &self.search_paths {
                let candidate = dir.join(CONFIG_FILE);
                if candidate.is_file() {
                    debug!(file = %candidate.display(), "Found configuration file");
                    figment = figment.merge(Toml::file(candidate));
                    break;
                }
            }
        }

        if self.use_env {
            figment = figment.merge(Env::prefixed("CONFLUX_").split("__"));
        }

        if let Some(overrides) = self.overrides {
            figment = figment.merge(Serialized::defaults(overrides));
        }

        let config: ConfluxConfig = figment.extract()?;
        validate_config(&config)?;
        Ok(config)
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Loads configuration from default locations.
pub fn load_config() -> ConfigResult<ConfluxConfig> {
    ConfigLoader::new().with_current_dir().load()
}

/// Loads configuration from a specific file.
pub fn load_config_from_file<P: AsRef<Path>>(path: P) -> ConfigResult<ConfluxConfig> {
    ConfigLoader::new().file(path).load()
}

// =============================================================================
// Tests
// =============================================================================
