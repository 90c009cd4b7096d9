//! Configuration validation utilities.

use super::error::{ConfigError, ConfigResult};
use super::schema::ConfluxConfig;

/// Validates the entire configuration.
pub fn validate_config(config: &ConfluxConfig) -> ConfigResult<()> {
    if config.resolver.max_chain_hops == 0 {
        return Err(ConfigError::validation(
            "resolver.max_chain_hops must be greater than 0",
        ));
    }

    for module in config.logging.filters.keys() {
        if module.is_empty() {
            return Err(ConfigError::validation(
                "logging.filters contains an empty module name",
            ));
        }
    }

    Ok(())
}
