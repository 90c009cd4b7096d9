//! Detector boundary.
//!
//! Detectors (a directory watcher over packaged artifacts, a registry
//! watcher over live objects) are external collaborators with one
//! contract: on observe, produce zero-or-one configuration source; on
//! remove, produce zero-or-one delete. Their internal polling or callback
//! mechanism is irrelevant here; they talk to the pipeline through a
//! channel feeding the processor.
//!
//! # Example
//!
//! ```rust,ignore
//! use conflux_runtime::detector::{DetectorEvent, detector_channel, spawn_detector_bridge};
//!
//! let (events, receiver) = detector_channel();
//! let bridge = spawn_detector_bridge("scanner.directory", receiver, processor);
//!
//! // inside the watcher callback:
//! events.send(DetectorEvent::Observed { payload, metadata }).ok();
//! ```

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, trace};

use conflux_core::domain::{Command, ConfigurationSource, Identity, Metadata};
use conflux_core::keys;
use conflux_core::payload::Payload;

use crate::processor::CommandProcessor;

/// An observation reported by a detector.
#[derive(Debug)]
pub enum DetectorEvent {
    /// A configuration-bearing object appeared or changed.
    Observed {
        /// The raw object.
        payload: Payload,
        /// Descriptive metadata captured at observation time.
        metadata: Metadata,
    },
    /// A previously observed object disappeared.
    Removed {
        /// The metadata identifying what disappeared.
        metadata: Metadata,
    },
}

/// Sender half handed to a detector.
pub type DetectorSender = mpsc::UnboundedSender<DetectorEvent>;

/// Creates the channel connecting a detector to the pipeline.
///
/// Unbounded on purpose: a detector callback must never block.
pub fn detector_channel() -> (DetectorSender, mpsc::UnboundedReceiver<DetectorEvent>) {
    mpsc::unbounded_channel()
}

/// Spawns the task bridging detector events into processor commands.
///
/// Target identity extraction reads the well-known metadata keys: an
/// event whose metadata addresses no configuration target produces no
/// command and is dropped with a trace log. The `agent` name is stamped
/// into observation metadata (under [`keys::INFO_AGENT`]) when the
/// detector did not set one itself.
///
/// The task ends when the detector drops its sender.
pub fn spawn_detector_bridge(
    agent: impl Into<String>,
    mut events: mpsc::UnboundedReceiver<DetectorEvent>,
    processor: Arc<CommandProcessor>,
) -> JoinHandle<()> {
    let agent = agent.into();
    tokio::spawn(async move {
        debug!(agent = %agent, "Detector bridge started");
        while let Some(event) = events.recv().await {
            match event {
                DetectorEvent::Observed {
                    payload,
                    mut metadata,
                } => {
                    if !metadata.contains_key(keys::INFO_AGENT) {
                        metadata.insert(keys::INFO_AGENT, agent.clone());
                    }
                    if let Some(source) = ConfigurationSource::from_metadata(payload, metadata) {
                        processor.add(Command::Update(source));
                    }
                }
                DetectorEvent::Removed { metadata } => match Identity::from_metadata(&metadata) {
                    Some(identity) => processor.add(Command::Delete(identity)),
                    None => trace!(
                        agent = %agent,
                        "Removal does not address a configuration target, ignoring"
                    ),
                },
            }
        }
        debug!(agent = %agent, "Detector bridge ended");
    })
}
