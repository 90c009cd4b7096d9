//! JSON bytes → dictionary.

use conflux_core::adapter::{Adapted, Adapter};
use conflux_core::domain::{ConfigDictionary, Metadata};
use conflux_core::error::{AdaptError, AdaptResult, SpecResult};
use conflux_core::payload::Payload;
use conflux_core::spec::{AllOf, FilterSpec, Specification, TypeSpec};

const ID: &str = "basic.json";

/// Converts raw bytes carrying a JSON object into a [`ConfigDictionary`].
///
/// Accepts byte payloads with an `application/json` mime type. The root
/// must be an object; member order is preserved as property order, values
/// are carried over as-is (scalars, arrays, nested structures).
pub struct JsonAdapter {
    spec: AllOf,
}

impl JsonAdapter {
    /// Creates the JSON adapter.
    pub fn new() -> SpecResult<Self> {
        let spec = AllOf::new()
            .with(TypeSpec::of::<Vec<u8>>())
            .with(FilterSpec::parse("(config.mime=application/json)")?);
        Ok(Self { spec })
    }
}

impl Adapter for JsonAdapter {
    fn id(&self) -> &str {
        ID
    }

    fn specification(&self) -> &dyn Specification {
        &self.spec
    }

    fn adapt(&self, payload: &Payload, _metadata: &Metadata) -> AdaptResult<Adapted> {
        let bytes = payload.downcast_ref::<Vec<u8>>().cloned().unwrap_or_default();
        let value: serde_json::Value =
            serde_json::from_slice(&bytes).map_err(|e| AdaptError::AdapterFailed {
                adapter: ID.to_string(),
                reason: format!("malformed JSON: {e}"),
            })?;

        let serde_json::Value::Object(members) = value else {
            return Err(AdaptError::AdapterFailed {
                adapter: ID.to_string(),
                reason: "JSON root is not an object".to_string(),
            });
        };

        let dictionary: ConfigDictionary = members.into_iter().collect();
        Ok(Adapted::new(Payload::new(dictionary)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_members_become_properties() {
        let adapter = JsonAdapter::new().unwrap();
        let bytes = br#"{"host": "localhost", "port": 8080, "tags": ["a", "b"]}"#.to_vec();
        let adapted = adapter.adapt(&Payload::new(bytes), &Metadata::new()).unwrap();

        let dictionary = adapted.payload.downcast_ref::<ConfigDictionary>().unwrap();
        assert_eq!(dictionary.get_str("host"), Some("localhost"));
        assert_eq!(dictionary.get("port"), Some(&8080.into()));
        assert_eq!(dictionary.get("tags"), Some(&serde_json::json!(["a", "b"])));
    }

    #[test]
    fn test_non_object_root_fails() {
        let adapter = JsonAdapter::new().unwrap();
        for bad in [&b"[1, 2]"[..], b"42", b"not json"] {
            let err = adapter
                .adapt(&Payload::new(bad.to_vec()), &Metadata::new())
                .unwrap_err();
            assert!(matches!(err, AdaptError::AdapterFailed { .. }));
        }
    }
}
