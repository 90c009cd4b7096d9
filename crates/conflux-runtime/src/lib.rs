//! # Conflux Runtime
//!
//! The runtime layer of the Conflux configuration provisioning pipeline:
//! the asynchronous command dispatch half of the system, plus the ambient
//! concerns (configuration loading, logging, orchestration).
//!
//! ## Components
//!
//! - **Command processor** ([`processor`]): the ordered,
//!   identity-coalescing queue between concurrent detectors and the
//!   serial configuration sink.
//! - **Sink contract** ([`sink`]): the single-consumer interface the
//!   external configuration store implements.
//! - **Detector boundary** ([`detector`]): the channel bridge turning
//!   observe/remove events into update/delete commands.
//! - **Configuration** ([`config`]) and **logging** ([`logging`]): figment
//!   TOML + environment loading, tracing-subscriber setup.
//! - **Orchestration** ([`runtime`]): [`ConfluxRuntime`] wiring it all
//!   together.
//!
//! ## Data Flow
//!
//! ```text
//! detector ──▶ DetectorEvent ──▶ Command ──▶ coalescing queue ──▶ sink
//!   (many, concurrent)                        (one consumer task)
//! ```

pub mod config;
pub mod detector;
pub mod error;
pub mod logging;
pub mod processor;
pub mod runtime;
pub mod sink;

pub use config::{ConfigError, ConfigLoader, ConfigResult, ConfluxConfig};
pub use detector::{DetectorEvent, DetectorSender, detector_channel, spawn_detector_bridge};
pub use error::{RuntimeError, RuntimeResult};
pub use processor::{CommandProcessor, ProcessorState};
pub use runtime::{ConfluxRuntime, RuntimeBuilder};
pub use sink::{ConfigurationSink, SinkError, SinkResult};
