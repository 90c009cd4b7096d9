//! # Conflux
//!
//! A configuration provisioning pipeline for component ecosystems:
//! detect configuration-bearing artifacts wherever they appear (files,
//! byte streams, in-registry objects), convert them into canonical
//! key/value configuration sets, and apply them to a central
//! configuration store.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────┐   ┌──────────────────────┐   ┌────────────────────┐
//! │ Detectors │──▶│ Adapter resolution   │──▶│ Command processor  │──▶ sink
//! │ (watchers)│   │ (spec match + chain) │   │ (coalescing queue) │
//! └───────────┘   └──────────────────────┘   └────────────────────┘
//! ```
//!
//! - **Detectors**: external watchers reporting observe/remove events
//! - **Adapters**: stateless transforms selected by composable
//!   specifications and chained until a dictionary terminal is reached
//! - **Processor**: an ordered, identity-coalescing queue with a single
//!   consumer, so the sink never sees concurrent commands
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use conflux::prelude::*;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let runtime = ConfluxRuntime::builder()
//!         .config_file("conflux.toml")
//!         .sink(Arc::new(MyStore::new()))
//!         .build()?;
//!
//!     let (events, receiver) = detector_channel();
//!     runtime.attach_detector("scanner.directory", receiver);
//!
//!     runtime.run().await;
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - `json-log`: newline-delimited JSON log output

pub use conflux_adapter_basic as adapters;
pub use conflux_core as core;
pub use conflux_runtime as runtime;

/// Prelude module for convenient imports.
///
/// ```rust,ignore
/// use conflux::prelude::*;
/// ```
pub mod prelude {
    // Runtime - main entry point
    pub use conflux_runtime::{ConfluxRuntime, RuntimeBuilder};

    // Detector boundary
    pub use conflux_runtime::{DetectorEvent, detector_channel};

    // Sink contract
    pub use conflux_runtime::{ConfigurationSink, SinkError, SinkResult};

    // Processor types
    pub use conflux_runtime::{CommandProcessor, ProcessorState};

    // Domain model
    pub use conflux_core::{
        Command, ConfigDictionary, ConfigurationSource, Identity, IdentityKind, Metadata, Payload,
    };

    // Adapter system - for custom adapter implementations
    pub use conflux_core::{
        Adapted, Adapter, AdapterRegistry, AllOf, AnyOf, FilterSpec, FnAdapter, Not,
        Specification, TypeSpec,
    };

    // Stock adapters
    pub use conflux_adapter_basic::{
        DictionaryAdapter, FileAdapter, JsonAdapter, PropertiesAdapter, register_basic_adapters,
    };
}
