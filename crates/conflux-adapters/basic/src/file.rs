//! File path → bytes.

use std::path::PathBuf;

use conflux_core::adapter::{Adapted, Adapter};
use conflux_core::domain::Metadata;
use conflux_core::error::{AdaptError, AdaptResult};
use conflux_core::keys;
use conflux_core::payload::Payload;
use conflux_core::spec::{Specification, TypeSpec};

const ID: &str = "basic.file";

/// Reads a `PathBuf` payload into raw bytes and stamps `config.mime` from
/// the file extension, so a downstream content adapter can pick the bytes
/// up: the first hop of the `file → bytes → dictionary` chain.
///
/// Extension mapping: `json` becomes `application/json`, anything else
/// becomes `extension/<ext>` (which is how `properties` and `cfg` files
/// reach [`PropertiesAdapter`]).
///
/// [`PropertiesAdapter`]: crate::PropertiesAdapter
pub struct FileAdapter {
    spec: TypeSpec,
}

impl FileAdapter {
    /// Creates the file adapter.
    pub fn new() -> Self {
        Self {
            spec: TypeSpec::of::<PathBuf>(),
        }
    }
}

impl Default for FileAdapter {
    fn default() -> Self {
        Self::new()
    }
}

fn mime_for_extension(extension: &str) -> String {
    match extension {
        "json" => "application/json".to_string(),
        other => format!("extension/{other}"),
    }
}

impl Adapter for FileAdapter {
    fn id(&self) -> &str {
        ID
    }

    fn specification(&self) -> &dyn Specification {
        &self.spec
    }

    fn adapt(&self, payload: &Payload, _metadata: &Metadata) -> AdaptResult<Adapted> {
        let Some(path) = payload.downcast_ref::<PathBuf>() else {
            return Err(AdaptError::AdapterFailed {
                adapter: ID.to_string(),
                reason: "payload is not a file path".to_string(),
            });
        };

        let bytes = std::fs::read(path).map_err(|e| AdaptError::AdapterFailed {
            adapter: ID.to_string(),
            reason: format!("cannot read {}: {e}", path.display()),
        })?;

        let mut metadata = Metadata::new();
        if let Some(extension) = path.extension().and_then(|e| e.to_str()) {
            metadata.insert(keys::MIME_TYPE, mime_for_extension(extension));
        }

        Ok(Adapted::new(Payload::new(bytes)).with_metadata(metadata))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use conflux_core::domain::ConfigDictionary;
    use conflux_core::registry::AdapterRegistry;

    fn write_temp(name: &str, content: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("conflux-basic-{}-{name}", std::process::id()));
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_file_to_dictionary_chain() {
        let path = write_temp("chain.properties", "host=localhost\n");

        let mut registry = AdapterRegistry::new();
        crate::register_basic_adapters(&mut registry).unwrap();

        let adaptation = registry
            .adapt_fully(Payload::new(path.clone()), Metadata::new())
            .unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(adaptation.chain, vec!["basic.file", "basic.properties"]);
        assert_eq!(adaptation.properties.get_str("host"), Some("localhost"));
        assert_eq!(
            adaptation.metadata.get_str(keys::MIME_TYPE),
            Some("extension/properties")
        );
    }

    #[test]
    fn test_json_file_mime() {
        let path = write_temp("mime.json", r#"{"a": 1}"#);

        let mut registry = AdapterRegistry::new();
        crate::register_basic_adapters(&mut registry).unwrap();

        let adaptation = registry
            .adapt_fully(Payload::new(path.clone()), Metadata::new())
            .unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(adaptation.chain, vec!["basic.file", "basic.json"]);
        assert_eq!(
            adaptation.properties,
            ConfigDictionary::new()
                .with("a", 1)
                .with(keys::INFO_ADAPTER, "basic.json")
        );
    }

    #[test]
    fn test_missing_file_fails() {
        let adapter = FileAdapter::new();
        let err = adapter
            .adapt(
                &Payload::new(PathBuf::from("/nonexistent/conflux.properties")),
                &Metadata::new(),
            )
            .unwrap_err();
        assert!(matches!(err, AdaptError::AdapterFailed { .. }));
    }
}
