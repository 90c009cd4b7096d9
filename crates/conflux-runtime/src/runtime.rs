//! Pipeline orchestration.
//!
//! [`ConfluxRuntime`] wires the pieces together: configuration loading,
//! logging initialization, adapter registration, the command processor and
//! the detector bridges. Nothing here adds pipeline semantics; it is the
//! bring-up and tear-down shell around the core contracts.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use conflux_runtime::ConfluxRuntime;
//!
//! let runtime = ConfluxRuntime::builder()
//!     .config_file("conflux.toml")
//!     .sink(Arc::new(MySink::new()))
//!     .build()?;
//!
//! let (events, receiver) = detector_channel();
//! runtime.attach_detector("scanner.directory", receiver);
//!
//! runtime.run().await;
//! ```

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::signal;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use conflux_adapter_basic::register_basic_adapters;
use conflux_core::adapter::Adapter;
use conflux_core::registry::AdapterRegistry;

use crate::config::{ConfigLoader, ConfluxConfig};
use crate::detector::{DetectorEvent, spawn_detector_bridge};
use crate::error::{RuntimeError, RuntimeResult};
use crate::logging;
use crate::processor::CommandProcessor;
use crate::sink::ConfigurationSink;

/// The assembled configuration provisioning pipeline.
pub struct ConfluxRuntime {
    config: ConfluxConfig,
    processor: Arc<CommandProcessor>,
    detectors: Mutex<Vec<JoinHandle<()>>>,
}

impl ConfluxRuntime {
    /// Creates a runtime builder.
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Returns the loaded configuration.
    pub fn config(&self) -> &ConfluxConfig {
        &self.config
    }

    /// Returns the command processor.
    ///
    /// Detectors that manage their own tasks can call
    /// [`CommandProcessor::add`] on it directly.
    pub fn processor(&self) -> &Arc<CommandProcessor> {
        &self.processor
    }

    /// Bridges a detector event channel into the processor.
    ///
    /// The bridge task lives until the detector drops its sender; stopping
    /// the runtime does not tear detectors down, it only stops command
    /// consumption.
    pub fn attach_detector(
        &self,
        agent: impl Into<String>,
        events: mpsc::UnboundedReceiver<DetectorEvent>,
    ) {
        let handle = spawn_detector_bridge(agent, events, Arc::clone(&self.processor));
        self.detectors.lock().push(handle);
    }

    /// Starts command consumption.
    pub fn start(&self) {
        self.processor.start();
    }

    /// Stops command consumption, preserving buffered commands.
    pub async fn stop(&self) {
        self.processor.stop().await;
    }

    /// Runs until a shutdown signal is received.
    pub async fn run(&self) {
        self.start();
        info!("Conflux runtime is now running. Press Ctrl+C to stop.");
        wait_for_shutdown().await;
        self.stop().await;
    }

    /// Runs until the given future completes.
    pub async fn run_until<F>(&self, shutdown: F)
    where
        F: std::future::Future<Output = ()>,
    {
        self.start();
        shutdown.await;
        self.stop().await;
    }
}

/// Waits for shutdown signals (Ctrl+C or SIGTERM).
async fn wait_for_shutdown() {
    #[cfg(unix)]
    {
        let mut sigterm = signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to register SIGTERM handler");

        tokio::select! {
            _ = signal::ctrl_c() => {
                info!("Received Ctrl+C, shutting down");
            }
            _ = sigterm.recv() => {
                info!("Received SIGTERM, shutting down");
            }
        }
    }

    #[cfg(not(unix))]
    {
        signal::ctrl_c().await.expect("Failed to listen for Ctrl+C");
        info!("Received Ctrl+C, shutting down");
    }
}

// =============================================================================
// RuntimeBuilder
// =============================================================================

/// Builder assembling a [`ConfluxRuntime`].
///
/// The configuration sink is the one mandatory piece; everything else has
/// defaults (configuration from `conflux.toml` + environment, the basic
/// adapter set registered first).
pub struct RuntimeBuilder {
    loader: ConfigLoader,
    adapters: Vec<Box<dyn Adapter>>,
    basic_adapters: bool,
    sink: Option<Arc<dyn ConfigurationSink>>,
}

impl RuntimeBuilder {
    /// Creates a new runtime builder.
    pub fn new() -> Self {
        Self {
            loader: ConfigLoader::new().with_current_dir(),
            adapters: Vec::new(),
            basic_adapters: true,
            sink: None,
        }
    }

    /// Sets a specific configuration file to load.
    pub fn config_file<P: AsRef<std::path::Path>>(mut self, path: P) -> Self {
        self.loader = self.loader.file(path);
        self
    }

    /// Disables environment variable configuration.
    pub fn without_env(mut self) -> Self {
        self.loader = self.loader.without_env();
        self
    }

    /// Merges configuration programmatically.
    pub fn merge(mut self, config: ConfluxConfig) -> Self {
        self.loader = self.loader.merge(config);
        self
    }

    /// Sets the configuration sink commands are applied to. Required.
    pub fn sink(mut self, sink: Arc<dyn ConfigurationSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Registers an additional adapter, after the basic set.
    pub fn adapter(mut self, adapter: impl Adapter + 'static) -> Self {
        self.adapters.push(Box::new(adapter));
        self
    }

    /// Skips registration of the basic adapter set.
    pub fn without_basic_adapters(mut self) -> Self {
        self.basic_adapters = false;
        self
    }

    /// Loads configuration, initializes logging and assembles the pipeline.
    pub fn build(self) -> RuntimeResult<ConfluxRuntime> {
        let sink = self.sink.ok_or(RuntimeError::MissingSink)?;

        let config = self.loader.load()?;
        logging::init_from_config(&config.logging);

        let mut registry = AdapterRegistry::with_max_chain_hops(config.resolver.max_chain_hops);
        if self.basic_adapters {
            register_basic_adapters(&mut registry)?;
        }
        for adapter in self.adapters {
            registry.register(adapter);
        }
        debug!(
            adapters = registry.len(),
            max_chain_hops = config.resolver.max_chain_hops,
            "Adapter registry assembled"
        );

        let processor = Arc::new(CommandProcessor::new(Arc::new(registry), sink));

        info!(
            log_level = config.logging.level.as_str(),
            "Runtime initialized from configuration"
        );

        Ok(ConfluxRuntime {
            config,
            processor,
            detectors: Mutex::new(Vec::new()),
        })
    }
}

impl Default for RuntimeBuilder {
    fn default() -> Self {
        Self::new()
    }
}
