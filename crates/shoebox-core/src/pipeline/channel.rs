//! Worker-to-consumer event channel.
//!
//! The import worker only ever talks to the consumer through this channel.
//! Progress events may arrive in any number; exactly one terminal event
//! (`Delivered` or `Failed`) closes the stream.

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::config::PipelineConfig;
use crate::error::ImportError;
use crate::types::{ImportStats, TimelineEntry};

/// Events emitted by an import job, in order.
#[derive(Debug)]
pub enum ImportEvent {
    /// Progress label. Uses `{pos}` / `{len}` placeholders for the current
    /// and maximum progress values.
    ProgressLabel(String),
    /// Total number of progress increments to expect
    ProgressMax(usize),
    /// One file attempted
    ProgressIncrement,
    /// The complete, ordered timeline (terminal)
    Delivered(Vec<TimelineEntry>),
    /// The job aborted (terminal)
    Failed(ImportError),
}

impl ImportEvent {
    /// Whether this event ends the stream.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ImportEvent::Delivered(_) | ImportEvent::Failed(_))
    }
}

/// Create a bounded event channel with the configured buffer size.
///
/// When the buffer is full the worker blocks until the consumer catches up.
pub fn bounded_channel<T>(config: &PipelineConfig) -> (mpsc::Sender<T>, mpsc::Receiver<T>) {
    mpsc::channel(config.buffer_size)
}

/// Sending half held by the worker.
#[derive(Debug, Clone)]
pub struct EventSink {
    tx: mpsc::Sender<ImportEvent>,
}

impl EventSink {
    pub fn new(tx: mpsc::Sender<ImportEvent>) -> Self {
        Self { tx }
    }

    /// Send an event from a blocking context.
    ///
    /// A consumer that went away is not an error: the job keeps running and
    /// its events are discarded.
    pub fn emit(&self, event: ImportEvent) {
        if self.tx.blocking_send(event).is_err() {
            tracing::trace!("Import consumer dropped; discarding event");
        }
    }
}

/// Consumer side of a running import.
pub struct ImportHandle {
    events: mpsc::Receiver<ImportEvent>,
    worker: JoinHandle<ImportStats>,
}

impl ImportHandle {
    pub(crate) fn new(
        events: mpsc::Receiver<ImportEvent>,
        worker: JoinHandle<ImportStats>,
    ) -> Self {
        Self { events, worker }
    }

    /// Receive the next event, or `None` once the worker has finished.
    pub async fn next_event(&mut self) -> Option<ImportEvent> {
        self.events.recv().await
    }

    /// Drain the stream, ignoring progress, and return the terminal outcome.
    pub async fn finish(mut self) -> Result<Vec<TimelineEntry>, ImportError> {
        while let Some(event) = self.events.recv().await {
            match event {
                ImportEvent::Delivered(entries) => return Ok(entries),
                ImportEvent::Failed(err) => return Err(err),
                _ => {}
            }
        }
        self.closed_without_terminal().await
    }

    /// Wait for the worker and return its run statistics.
    ///
    /// Call after the terminal event; pending progress events are discarded.
    pub async fn stats(self) -> Result<ImportStats, ImportError> {
        drop(self.events);
        self.worker
            .await
            .map_err(|e| ImportError::Worker(e.to_string()))
    }

    /// The channel closed with no terminal event: the worker panicked.
    async fn closed_without_terminal(self) -> Result<Vec<TimelineEntry>, ImportError> {
        match self.worker.await {
            Ok(_) => Err(ImportError::Worker(
                "worker exited without delivering a result".into(),
            )),
            Err(e) => Err(ImportError::Worker(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_bounded_channel() {
        let config = PipelineConfig { buffer_size: 10 };

        let (tx, mut rx) = bounded_channel::<i32>(&config);

        tx.send(42).await.unwrap();
        assert_eq!(rx.recv().await, Some(42));
    }

    #[tokio::test]
    async fn test_sink_from_blocking_worker() {
        let (tx, rx) = bounded_channel(&PipelineConfig { buffer_size: 1 });
        let sink = EventSink::new(tx);

        let worker = tokio::task::spawn_blocking(move || {
            sink.emit(ImportEvent::ProgressMax(2));
            sink.emit(ImportEvent::ProgressIncrement);
            sink.emit(ImportEvent::ProgressIncrement);
            sink.emit(ImportEvent::Delivered(vec![]));
            ImportStats::default()
        });
        let mut handle = ImportHandle::new(rx, worker);

        assert!(matches!(
            handle.next_event().await,
            Some(ImportEvent::ProgressMax(2))
        ));
        let entries = handle.finish().await.unwrap();
        assert!(entries.is_empty());
    }

    #[tokio::test]
    async fn test_sink_survives_dropped_consumer() {
        let (tx, rx) = bounded_channel(&PipelineConfig { buffer_size: 1 });
        drop(rx);
        let sink = EventSink::new(tx);

        tokio::task::spawn_blocking(move || {
            sink.emit(ImportEvent::ProgressIncrement);
            sink.emit(ImportEvent::ProgressIncrement);
        })
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_worker_panic_surfaces_as_error() {
        let (tx, rx) = bounded_channel::<ImportEvent>(&PipelineConfig { buffer_size: 4 });
        let worker = tokio::task::spawn_blocking(move || -> ImportStats {
            let _tx = tx;
            panic!("decoder exploded");
        });
        let handle = ImportHandle::new(rx, worker);

        assert!(matches!(
            handle.finish().await,
            Err(ImportError::Worker(_))
        ));
    }

    #[tokio::test]
    async fn test_stats_after_terminal_event() {
        let (tx, rx) = bounded_channel(&PipelineConfig { buffer_size: 1 });
        let sink = EventSink::new(tx);

        let worker = tokio::task::spawn_blocking(move || {
            sink.emit(ImportEvent::ProgressIncrement);
            sink.emit(ImportEvent::Delivered(vec![]));
            ImportStats {
                eligible: 1,
                attempted: 1,
                skipped: 1,
                ..ImportStats::default()
            }
        });
        let mut handle = ImportHandle::new(rx, worker);

        while let Some(event) = handle.next_event().await {
            if event.is_terminal() {
                break;
            }
        }
        let stats = handle.stats().await.unwrap();
        assert_eq!((stats.eligible, stats.skipped), (1, 1));
    }

    #[test]
    fn test_terminal_events() {
        assert!(ImportEvent::Delivered(vec![]).is_terminal());
        assert!(ImportEvent::Failed(ImportError::Worker("x".into())).is_terminal());
        assert!(!ImportEvent::ProgressIncrement.is_terminal());
    }
}
