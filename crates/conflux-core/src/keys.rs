//! Well-known metadata keys.
//!
//! Detectors and adapters communicate through metadata attached to a
//! payload. The keys below are the shared vocabulary: target addressing
//! keys are read by the identity builder, info keys record provenance,
//! and `MIME_TYPE` drives filter-based adapter selection.

/// Persistent identifier of a singleton configuration target.
pub const TARGET_PID: &str = "config.target.pid";

/// Factory identifier of a templated configuration target.
pub const TARGET_FACTORY_PID: &str = "config.target.factory.pid";

/// Named instance of a factory configuration target.
pub const TARGET_FACTORY_INSTANCE: &str = "config.target.factory.instance";

/// Origin scope owning the configuration (absent means global).
pub const TARGET_LOCATION: &str = "config.target.location";

/// Identity of the last adapter applied in a chain.
///
/// Stamped after every adaptation step; the last-applied adapter always
/// wins this key.
pub const INFO_ADAPTER: &str = "config.info.adapter";

/// Identity of the detector agent that produced the observation.
pub const INFO_AGENT: &str = "config.info.agent";

/// Observation timestamp, set by detectors that track one.
pub const INFO_TIMESTAMP: &str = "config.info.timestamp";

/// Mime type describing a raw payload (e.g. `extension/properties`).
pub const MIME_TYPE: &str = "config.mime";
