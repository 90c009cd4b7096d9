//! Ordered, coalescing command processor.
//!
//! The processor decouples "a configuration source appeared/disappeared"
//! events, produced concurrently by independent detectors, from "apply
//! this configuration" effects, consumed serially by the configuration
//! sink.
//!
//! # Ordering & Coalescing
//!
//! Commands are delivered in enqueue (FIFO) order, except that a pending
//! `Update` is dropped when a newer `Update` for the same identity
//! arrives before it is drained (latest-value-wins, the survivor takes the
//! new tail position), and a `Delete` purges every still-pending command
//! for its identity ahead of it. A `Delete` followed by an `Update` for
//! the same identity is *not* coalesced: delete-then-recreate is an
//! observable sequence.
//!
//! # Concurrency
//!
//! [`add`](CommandProcessor::add) is non-blocking and safe for any number
//! of concurrent producers; it only ever takes the queue mutex, which is
//! never held across an `.await`. Exactly one consumer task exists while
//! the processor is `Running`; the sink call happens after the queue lock
//! is released, so a slow sink cannot stall producers.
//!
//! # Lifecycle
//!
//! ```text
//! Stopped ──start()──▶ Starting ──▶ Running ──stop()──▶ Stopping ──▶ Stopped
//! ```
//!
//! `add` is legal in every state and buffers even while stopped.
//! `stop()` lets the in-flight sink call finish and **preserves** the
//! remaining buffered commands for a future `start()`; silently losing
//! an update or delete would be an observable correctness bug.

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, trace, warn};

use conflux_core::domain::Command;
use conflux_core::registry::AdapterRegistry;

use crate::sink::ConfigurationSink;

/// Lifecycle state of the processor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessorState {
    /// No consumer task; commands buffer.
    Stopped,
    /// Consumer task being brought up.
    Starting,
    /// Consumer task draining the queue.
    Running,
    /// Consumer task finishing its in-flight command.
    Stopping,
}

struct Inner {
    queue: Mutex<VecDeque<Command>>,
    notify: Notify,
    state: Mutex<ProcessorState>,
    registry: Arc<AdapterRegistry>,
    sink: Arc<dyn ConfigurationSink>,
}

/// The ordered, identity-coalescing command queue and its consumer.
///
/// # Example
///
/// ```rust,ignore
/// use conflux_runtime::processor::CommandProcessor;
///
/// let processor = Arc::new(CommandProcessor::new(registry, sink));
/// processor.start();
/// processor.add(Command::Update(source));
/// // ...
/// processor.stop().await;
/// ```
pub struct CommandProcessor {
    inner: Arc<Inner>,
    worker: Mutex<Option<(CancellationToken, JoinHandle<()>)>>,
}

impl CommandProcessor {
    /// Creates a stopped processor over a registry and a sink.
    ///
    /// The registry is expected to be fully populated: registration
    /// completes before any resolution by construction order.
    pub fn new(registry: Arc<AdapterRegistry>, sink: Arc<dyn ConfigurationSink>) -> Self {
        Self {
            inner: Arc::new(Inner {
                queue: Mutex::new(VecDeque::new()),
                notify: Notify::new(),
                state: Mutex::new(ProcessorState::Stopped),
                registry,
                sink,
            }),
            worker: Mutex::new(None),
        }
    }

    /// Returns the current lifecycle state.
    pub fn state(&self) -> ProcessorState {
        *self.inner.state.lock()
    }

    /// Returns the number of buffered commands.
    pub fn pending(&self) -> usize {
        self.inner.queue.lock().len()
    }

    /// Enqueues a command.
    ///
    /// Non-blocking and safe for concurrent callers in every lifecycle
    /// state; while the processor is not running the command is buffered
    /// until [`start`](Self::start).
    pub fn add(&self, command: Command) {
        {
            let mut queue = self.inner.queue.lock();
            Self::coalesce(&mut queue, &command);
            trace!(
                kind = command.kind_name(),
                identity = %command.identity(),
                pending = queue.len() + 1,
                "Enqueued command"
            );
            queue.push_back(command);
        }
        self.inner.notify.notify_one();
    }

    /// Drops queued commands superseded by `incoming`.
    fn coalesce(queue: &mut VecDeque<Command>, incoming: &Command) {
        let identity = incoming.identity();
        let before = queue.len();
        match incoming {
            // a newer update supersedes older pending updates for the
            // same target; pending deletes stay where they are
            Command::Update(_) => {
                queue.retain(|queued| {
                    !(matches!(queued, Command::Update(_)) && queued.identity() == identity)
                });
            }
            // a delete makes everything still pending for the target moot
            Command::Delete(_) => {
                queue.retain(|queued| queued.identity() != identity);
            }
        }
        let dropped = before - queue.len();
        if dropped > 0 {
            trace!(identity = %identity, dropped, "Coalesced superseded commands");
        }
    }

    /// Starts the consumer task.
    ///
    /// Must be called from within a Tokio runtime. Draining resumes with
    /// whatever commands are buffered, in their original order.
    pub fn start(&self) {
        {
            let mut state = self.inner.state.lock();
            if *state != ProcessorState::Stopped {
                warn!(state = ?*state, "Processor already started");
                return;
            }
            *state = ProcessorState::Starting;
        }

        let token = CancellationToken::new();
        let handle = tokio::spawn(drain_loop(Arc::clone(&self.inner), token.clone()));
        *self.worker.lock() = Some((token, handle));
        *self.inner.state.lock() = ProcessorState::Running;

        info!(pending = self.pending(), "Command processor started");
    }

    /// Stops the consumer task.
    ///
    /// The in-flight sink call, if any, is allowed to complete; buffered
    /// commands are preserved for a future [`start`](Self::start).
    pub async fn stop(&self) {
        {
            let mut state = self.inner.state.lock();
            if *state != ProcessorState::Running {
                warn!(state = ?*state, "Processor is not running");
                return;
            }
            *state = ProcessorState::Stopping;
        }

        let worker = self.worker.lock().take();
        if let Some((token, handle)) = worker {
            token.cancel();
            if let Err(e) = handle.await {
                error!(error = %e, "Consumer task terminated abnormally");
            }
        }

        *self.inner.state.lock() = ProcessorState::Stopped;
        info!(pending = self.pending(), "Command processor stopped");
    }
}

/// Consumer loop: drain one command at a time, sleep while empty.
async fn drain_loop(inner: Arc<Inner>, token: CancellationToken) {
    debug!("Consumer task entered");
    loop {
        if token.is_cancelled() {
            break;
        }
        let command = inner.queue.lock().pop_front();
        match command {
            Some(command) => apply(&inner, command).await,
            None => {
                tokio::select! {
                    _ = inner.notify.notified() => {}
                    _ = token.cancelled() => break,
                }
            }
        }
    }
    debug!("Consumer task exited");
}

/// Applies one command to the sink.
///
/// Resolution happens here, on the consumer task: a source that cannot be
/// adapted is logged and discarded without stopping the pipeline, and the
/// sink only ever sees canonical dictionaries.
async fn apply(inner: &Inner, command: Command) {
    match command {
        Command::Update(source) => {
            let (identity, payload, metadata) = source.into_parts();
            match inner.registry.adapt_fully(payload, metadata) {
                Ok(adaptation) => {
                    debug!(
                        identity = %identity,
                        chain = ?adaptation.chain,
                        properties = adaptation.properties.len(),
                        "Applying update"
                    );
                    if let Err(e) = inner.sink.apply_update(&identity, &adaptation.properties).await
                    {
                        warn!(identity = %identity, error = %e, "Sink rejected update");
                    }
                }
                Err(e) => {
                    warn!(identity = %identity, error = %e, "Discarding unadaptable source");
                }
            }
        }
        Command::Delete(identity) => {
            debug!(identity = %identity, "Applying delete");
            if let Err(e) = inner.sink.apply_delete(&identity).await {
                warn!(identity = %identity, error = %e, "Sink rejected delete");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use conflux_core::domain::{ConfigDictionary, ConfigurationSource, Identity, Metadata};
    use conflux_core::payload::Payload;
    use tokio::sync::mpsc;

    use crate::sink::{SinkError, SinkResult};

    #[derive(Debug, PartialEq)]
    enum SinkCall {
        Update(String, ConfigDictionary),
        Delete(String),
    }

    struct RecordingSink {
        calls: mpsc::UnboundedSender<SinkCall>,
        fail: bool,
    }

    #[async_trait]
    impl ConfigurationSink for RecordingSink {
        async fn apply_update(
            &self,
            identity: &Identity,
            properties: &ConfigDictionary,
        ) -> SinkResult<()> {
            self.calls
                .send(SinkCall::Update(identity.to_string(), properties.clone()))
                .ok();
            if self.fail {
                return Err(SinkError::Rejected("store is read-only".into()));
            }
            Ok(())
        }

        async fn apply_delete(&self, identity: &Identity) -> SinkResult<()> {
            self.calls.send(SinkCall::Delete(identity.to_string())).ok();
            Ok(())
        }
    }

    fn processor(fail: bool) -> (CommandProcessor, mpsc::UnboundedReceiver<SinkCall>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let processor = CommandProcessor::new(
            Arc::new(AdapterRegistry::new()),
            Arc::new(RecordingSink { calls: tx, fail }),
        );
        (processor, rx)
    }

    fn update(pid: &str, marker: i64) -> Command {
        let dictionary = ConfigDictionary::new().with("marker", marker);
        Command::Update(ConfigurationSource::new(
            Identity::singleton(pid),
            Payload::new(dictionary),
            Metadata::new(),
        ))
    }

    fn dictionary(marker: i64) -> ConfigDictionary {
        ConfigDictionary::new().with("marker", marker)
    }

    #[tokio::test]
    async fn test_delete_purges_pending_updates() {
        let (processor, mut rx) = processor(false);

        processor.add(update("a", 1));
        processor.add(update("a", 2));
        processor.add(Command::Delete(Identity::singleton("a")));
        assert_eq!(processor.pending(), 1);

        processor.start();
        assert_eq!(rx.recv().await.unwrap(), SinkCall::Delete("a".into()));

        processor.stop().await;
        assert_eq!(processor.pending(), 0);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_superseded_update_keeps_relative_order() {
        let (processor, mut rx) = processor(false);

        processor.add(update("a", 1));
        processor.add(update("b", 1));
        processor.add(update("a", 2));
        assert_eq!(processor.pending(), 2);

        processor.start();
        assert_eq!(
            rx.recv().await.unwrap(),
            SinkCall::Update("b".into(), dictionary(1))
        );
        assert_eq!(
            rx.recv().await.unwrap(),
            SinkCall::Update("a".into(), dictionary(2))
        );
        processor.stop().await;
    }

    #[tokio::test]
    async fn test_delete_then_update_is_not_coalesced() {
        let (processor, mut rx) = processor(false);

        processor.add(Command::Delete(Identity::singleton("a")));
        processor.add(update("a", 1));
        assert_eq!(processor.pending(), 2);

        processor.start();
        assert_eq!(rx.recv().await.unwrap(), SinkCall::Delete("a".into()));
        assert_eq!(
            rx.recv().await.unwrap(),
            SinkCall::Update("a".into(), dictionary(1))
        );
        processor.stop().await;
    }

    #[tokio::test]
    async fn test_stop_preserves_buffered_commands() {
        let (processor, mut rx) = processor(false);

        processor.start();
        processor.add(update("a", 1));
        assert_eq!(
            rx.recv().await.unwrap(),
            SinkCall::Update("a".into(), dictionary(1))
        );

        processor.stop().await;
        assert_eq!(processor.state(), ProcessorState::Stopped);

        // buffered while stopped, drained after restart, order intact
        processor.add(update("b", 1));
        processor.add(update("c", 1));
        assert_eq!(processor.pending(), 2);

        processor.start();
        assert_eq!(
            rx.recv().await.unwrap(),
            SinkCall::Update("b".into(), dictionary(1))
        );
        assert_eq!(
            rx.recv().await.unwrap(),
            SinkCall::Update("c".into(), dictionary(1))
        );
        processor.stop().await;
    }

    #[tokio::test]
    async fn test_sink_errors_do_not_stop_the_pipeline() {
        let (processor, mut rx) = processor(true);

        processor.add(update("a", 1));
        processor.add(update("b", 2));
        processor.start();

        // both commands reach the sink despite every update being rejected
        assert_eq!(
            rx.recv().await.unwrap(),
            SinkCall::Update("a".into(), dictionary(1))
        );
        assert_eq!(
            rx.recv().await.unwrap(),
            SinkCall::Update("b".into(), dictionary(2))
        );
        processor.stop().await;
    }

    #[tokio::test]
    async fn test_unadaptable_source_is_discarded() {
        let (processor, mut rx) = processor(false);

        // no adapter accepts a float payload; the empty registry only
        // passes dictionaries through
        processor.add(Command::Update(ConfigurationSource::new(
            Identity::singleton("bad"),
            Payload::new(3.14f64),
            Metadata::new(),
        )));
        processor.add(update("good", 1));

        processor.start();
        assert_eq!(
            rx.recv().await.unwrap(),
            SinkCall::Update("good".into(), dictionary(1))
        );
        processor.stop().await;
        assert!(rx.try_recv().is_err());
    }

    struct GatedSink {
        calls: mpsc::UnboundedSender<SinkCall>,
        gate: Arc<tokio::sync::Semaphore>,
    }

    #[async_trait]
    impl ConfigurationSink for GatedSink {
        async fn apply_update(
            &self,
            identity: &Identity,
            properties: &ConfigDictionary,
        ) -> SinkResult<()> {
            self.calls
                .send(SinkCall::Update(identity.to_string(), properties.clone()))
                .ok();
            self.gate.acquire().await.expect("gate closed").forget();
            Ok(())
        }

        async fn apply_delete(&self, identity: &Identity) -> SinkResult<()> {
            self.calls.send(SinkCall::Delete(identity.to_string())).ok();
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_stop_mid_queue_finishes_in_flight_and_preserves_rest() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let gate = Arc::new(tokio::sync::Semaphore::new(0));
        let processor = Arc::new(CommandProcessor::new(
            Arc::new(AdapterRegistry::new()),
            Arc::new(GatedSink {
                calls: tx,
                gate: Arc::clone(&gate),
            }),
        ));

        processor.add(update("a", 1));
        processor.add(update("b", 1));
        processor.add(update("c", 1));
        processor.start();

        // the consumer is now blocked inside the sink call for `a`
        assert_eq!(
            rx.recv().await.unwrap(),
            SinkCall::Update("a".into(), dictionary(1))
        );

        let stopper = tokio::spawn({
            let processor = Arc::clone(&processor);
            async move { processor.stop().await }
        });
        // wait until stop() has signalled the consumer, then release the
        // in-flight call it is waiting on
        while processor.state() != ProcessorState::Stopping {
            tokio::task::yield_now().await;
        }
        gate.add_permits(1);
        stopper.await.unwrap();

        // `a` completed, `b` and `c` survived the stop
        assert_eq!(processor.state(), ProcessorState::Stopped);
        assert_eq!(processor.pending(), 2);

        gate.add_permits(8);
        processor.start();
        assert_eq!(
            rx.recv().await.unwrap(),
            SinkCall::Update("b".into(), dictionary(1))
        );
        assert_eq!(
            rx.recv().await.unwrap(),
            SinkCall::Update("c".into(), dictionary(1))
        );
        processor.stop().await;
    }

    #[tokio::test]
    async fn test_double_start_is_harmless() {
        let (processor, mut rx) = processor(false);
        processor.start();
        processor.start();

        processor.add(update("a", 1));
        assert_eq!(
            rx.recv().await.unwrap(),
            SinkCall::Update("a".into(), dictionary(1))
        );
        processor.stop().await;
        processor.stop().await;
    }

    #[tokio::test]
    async fn test_concurrent_producers() {
        let (processor, mut rx) = processor(false);
        let processor = Arc::new(processor);
        processor.start();

        let mut handles = Vec::new();
        for producer in 0..8 {
            let processor = Arc::clone(&processor);
            handles.push(tokio::spawn(async move {
                for i in 0..16 {
                    processor.add(update(&format!("pid-{producer}-{i}"), i));
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        // distinct identities never coalesce: all 128 updates arrive
        for _ in 0..128 {
            assert!(rx.recv().await.is_some());
        }
        processor.stop().await;
        assert!(rx.try_recv().is_err());
    }
}
