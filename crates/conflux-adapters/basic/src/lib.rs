//! # Conflux Basic Adapters
//!
//! The stock adapter set for the Conflux configuration pipeline. These
//! adapters cover the common shapes a configuration artifact arrives in:
//!
//! - [`DictionaryAdapter`] - an already-canonical [`ConfigDictionary`],
//!   passed through (and provenance-stamped) unchanged
//! - [`PropertiesAdapter`] - raw bytes in `key=value` properties format
//! - [`JsonAdapter`] - raw bytes carrying a JSON object
//! - [`FileAdapter`] - a file path, read into bytes with a mime stamp
//!   derived from the extension
//!
//! Together they form the canonical chain `file → bytes → dictionary`:
//! the file adapter turns a `PathBuf` into bytes and stamps
//! `config.mime`, which the properties or JSON adapter then picks up.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use conflux_adapter_basic::register_basic_adapters;
//! use conflux_core::AdapterRegistry;
//!
//! let mut registry = AdapterRegistry::new();
//! register_basic_adapters(&mut registry)?;
//! ```
//!
//! [`ConfigDictionary`]: conflux_core::ConfigDictionary

mod dictionary;
mod file;
mod json;
mod properties;

pub use dictionary::DictionaryAdapter;
pub use file::FileAdapter;
pub use json::JsonAdapter;
pub use properties::PropertiesAdapter;

use conflux_core::error::SpecResult;
use conflux_core::registry::AdapterRegistry;
use tracing::debug;

/// Registers the basic adapter set.
///
/// Registration order matters: the dictionary passthrough goes first so a
/// canonical payload never takes a longer chain than necessary.
pub fn register_basic_adapters(registry: &mut AdapterRegistry) -> SpecResult<()> {
    registry.register(DictionaryAdapter::new());
    registry.register(PropertiesAdapter::new()?);
    registry.register(JsonAdapter::new()?);
    registry.register(FileAdapter::new());
    debug!("Registered basic adapters");
    Ok(())
}
