//! Properties bytes → dictionary.

use conflux_core::adapter::{Adapted, Adapter};
use conflux_core::domain::{ConfigDictionary, Metadata};
use conflux_core::error::{AdaptError, AdaptResult, SpecResult};
use conflux_core::payload::Payload;
use conflux_core::spec::{AllOf, FilterSpec, Specification, TypeSpec};

const ID: &str = "basic.properties";

/// Converts raw bytes in properties format (`key=value` lines) into a
/// [`ConfigDictionary`].
///
/// Accepts byte payloads whose metadata carries a properties mime type
/// (`extension/properties` or `extension/cfg`). Keys keep file order.
///
/// The format is deliberately forgiving: blank lines and `#`/`!` comments
/// are skipped, `=` and `:` both separate key from value, and a line
/// without a separator becomes a key with an empty value.
pub struct PropertiesAdapter {
    spec: AllOf,
}

impl PropertiesAdapter {
    /// Creates the properties adapter.
    pub fn new() -> SpecResult<Self> {
        let spec = AllOf::new()
            .with(TypeSpec::of::<Vec<u8>>())
            .with(FilterSpec::parse(
                "(|(config.mime=extension/properties)(config.mime=extension/cfg))",
            )?);
        Ok(Self { spec })
    }
}

impl Adapter for PropertiesAdapter {
    fn id(&self) -> &str {
        ID
    }

    fn specification(&self) -> &dyn Specification {
        &self.spec
    }

    fn adapt(&self, payload: &Payload, _metadata: &Metadata) -> AdaptResult<Adapted> {
        let bytes = payload.downcast_ref::<Vec<u8>>().cloned().unwrap_or_default();
        let text = String::from_utf8(bytes).map_err(|e| AdaptError::AdapterFailed {
            adapter: ID.to_string(),
            reason: format!("payload is not valid UTF-8: {e}"),
        })?;

        let mut dictionary = ConfigDictionary::new();
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
                continue;
            }
            match line.split_once(['=', ':']) {
                Some((key, value)) => dictionary.insert(key.trim(), value.trim()),
                None => dictionary.insert(line, ""),
            }
        }

        Ok(Adapted::new(Payload::new(dictionary)))
    }
}
