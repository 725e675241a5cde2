//! Background reconstruction worker.
//!
//! All reconstruction happens on one thread that owns the [`SurfaceState`].
//! Snapshots and queries travel over a single command channel, so they are
//! handled strictly in submission order and never overlap.

use std::sync::mpsc::{
    self, Receiver, RecvTimeoutError, Sender, SyncSender, TryRecvError, TrySendError,
};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::config::PipelineConfig;
use crate::error::{Result, ScanError};
use crate::ingest::Snapshot;
use crate::surface::BoundaryPolygon;

use super::cycle::CycleResult;
use super::state::SurfaceState;

enum Command {
    Ingest(Snapshot),
    CurrentPolygon(Sender<Option<BoundaryPolygon>>),
    Shutdown,
}

enum CommandSender {
    Bounded { tx: SyncSender<Command>, capacity: usize },
    Unbounded(Sender<Command>),
}

impl CommandSender {
    /// Queue a snapshot without blocking.
    fn try_submit(&self, snapshot: Snapshot) -> Result<()> {
        match self {
            CommandSender::Bounded { tx, capacity } => match tx.try_send(Command::Ingest(snapshot)) {
                Ok(()) => Ok(()),
                Err(TrySendError::Full(_)) => Err(ScanError::WorkerBusy {
                    capacity: *capacity,
                }),
                Err(TrySendError::Disconnected(_)) => Err(ScanError::WorkerDisconnected),
            },
            CommandSender::Unbounded(tx) => tx
                .send(Command::Ingest(snapshot))
                .map_err(|_| ScanError::WorkerDisconnected),
        }
    }

    /// Queue a command, waiting for room if the queue is bounded.
    fn send(&self, command: Command) -> Result<()> {
        let sent = match self {
            CommandSender::Bounded { tx, .. } => tx.send(command).is_ok(),
            CommandSender::Unbounded(tx) => tx.send(command).is_ok(),
        };
        if sent {
            Ok(())
        } else {
            Err(ScanError::WorkerDisconnected)
        }
    }
}

/// Handle to the reconstruction thread.
///
/// # Example
///
/// ```
/// use scanmesh::config::PipelineConfig;
/// use scanmesh::ingest::Snapshot;
/// use scanmesh::pipeline::ReconstructionWorker;
///
/// let mut worker = ReconstructionWorker::spawn(PipelineConfig::default()).unwrap();
/// worker.submit(Snapshot::default()).unwrap();
/// let result = worker.recv().unwrap();
/// assert_eq!(result.sequence, 1);
/// worker.shutdown().unwrap();
/// ```
pub struct ReconstructionWorker {
    commands: Option<CommandSender>,
    results: Receiver<CycleResult>,
    handle: Option<JoinHandle<()>>,
}

impl ReconstructionWorker {
    /// Start the worker thread.
    pub fn spawn(config: PipelineConfig) -> Result<Self> {
        let (result_tx, results) = mpsc::channel();

        let (commands, command_rx) = match config.queue_capacity {
            Some(capacity) => {
                let (tx, rx) = mpsc::sync_channel(capacity);
                (CommandSender::Bounded { tx, capacity }, rx)
            }
            None => {
                let (tx, rx) = mpsc::channel();
                (CommandSender::Unbounded(tx), rx)
            }
        };

        let state = SurfaceState::new(config);
        let handle = thread::Builder::new()
            .name("scanmesh-reconstruction".to_string())
            .spawn(move || run(state, command_rx, result_tx))?;

        Ok(Self {
            commands: Some(commands),
            results,
            handle: Some(handle),
        })
    }

    /// Queue a snapshot for processing.
    ///
    /// # Errors
    ///
    /// [`ScanError::WorkerBusy`] when the bounded queue is full; the snapshot
    /// is dropped. [`ScanError::WorkerDisconnected`] after shutdown.
    pub fn submit(&self, snapshot: Snapshot) -> Result<()> {
        let commands = self.commands.as_ref().ok_or(ScanError::WorkerDisconnected)?;
        let submitted = commands.try_submit(snapshot);
        if let Err(ScanError::WorkerBusy { capacity }) = &submitted {
            log::warn!(
                "reconstruction queue full ({} pending), dropping snapshot",
                capacity
            );
        }
        submitted
    }

    /// The ceiling boundary as of every command queued before this call.
    ///
    /// Blocks until the worker has processed the earlier commands.
    pub fn current_polygon(&self) -> Result<Option<BoundaryPolygon>> {
        let commands = self.commands.as_ref().ok_or(ScanError::WorkerDisconnected)?;
        let (reply_tx, reply_rx) = mpsc::channel();
        commands.send(Command::CurrentPolygon(reply_tx))?;
        reply_rx.recv().map_err(|_| ScanError::WorkerDisconnected)
    }

    /// A finished result, if one is ready.
    pub fn try_recv(&self) -> Result<Option<CycleResult>> {
        match self.results.try_recv() {
            Ok(result) => Ok(Some(result)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(ScanError::WorkerDisconnected),
        }
    }

    /// Wait for the next finished result.
    pub fn recv(&self) -> Result<CycleResult> {
        self.results.recv().map_err(|_| ScanError::WorkerDisconnected)
    }

    /// Wait up to `timeout` for the next finished result.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<Option<CycleResult>> {
        match self.results.recv_timeout(timeout) {
            Ok(result) => Ok(Some(result)),
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(RecvTimeoutError::Disconnected) => Err(ScanError::WorkerDisconnected),
        }
    }

    /// Results that finished and have not been received yet.
    pub fn drain(&self) -> Vec<CycleResult> {
        self.results.try_iter().collect()
    }

    /// Stop the worker after it finishes every queued snapshot.
    ///
    /// Results of the queued work stay available through [`recv`](Self::recv)
    /// and [`drain`](Self::drain). Calling this twice is a no-op.
    pub fn shutdown(&mut self) -> Result<()> {
        if let Some(commands) = self.commands.take() {
            // A send failure means the thread is already gone; join reports why.
            let _ = commands.send(Command::Shutdown);
        }
        match self.handle.take() {
            Some(handle) => handle.join().map_err(|_| {
                log::error!("reconstruction worker panicked");
                ScanError::WorkerDisconnected
            }),
            None => Ok(()),
        }
    }

    /// Whether the worker still accepts commands.
    pub fn is_running(&self) -> bool {
        self.commands.is_some()
    }
}

impl Drop for ReconstructionWorker {
    fn drop(&mut self) {
        let _ = self.shutdown();
    }
}

fn run(mut state: SurfaceState, commands: Receiver<Command>, results: Sender<CycleResult>) {
    log::debug!("reconstruction worker started");
    for command in commands {
        match command {
            Command::Ingest(snapshot) => {
                let result = state.ingest_snapshot(&snapshot);
                if results.send(result).is_err() {
                    log::debug!("result receiver dropped, discarding cycle");
                }
            }
            Command::CurrentPolygon(reply) => {
                let _ = reply.send(state.current_polygon().cloned());
            }
            Command::Shutdown => break,
        }
    }
    log::debug!("reconstruction worker stopped after {} cycles", state.cycles());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_results_in_submission_order() {
        let config = PipelineConfig {
            queue_capacity: None,
            ..PipelineConfig::default()
        };
        let mut worker = ReconstructionWorker::spawn(config).unwrap();
        for _ in 0..5 {
            worker.submit(Snapshot::default()).unwrap();
        }
        worker.shutdown().unwrap();

        let sequences: Vec<u64> = worker.drain().iter().map(|r| r.sequence).collect();
        assert_eq!(sequences, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_submit_after_shutdown() {
        let mut worker = ReconstructionWorker::spawn(PipelineConfig::default()).unwrap();
        worker.shutdown().unwrap();
        assert!(!worker.is_running());
        assert!(matches!(
            worker.submit(Snapshot::default()),
            Err(ScanError::WorkerDisconnected)
        ));
        assert!(matches!(
            worker.current_polygon(),
            Err(ScanError::WorkerDisconnected)
        ));
        worker.shutdown().unwrap();
    }

    #[test]
    fn test_full_bounded_queue_rejects() {
        let (tx, _rx) = mpsc::sync_channel(1);
        let commands = CommandSender::Bounded { tx, capacity: 1 };
        commands.try_submit(Snapshot::default()).unwrap();
        assert!(matches!(
            commands.try_submit(Snapshot::default()),
            Err(ScanError::WorkerBusy { capacity: 1 })
        ));
    }

    #[test]
    fn test_no_polygon_before_first_surface() {
        let worker = ReconstructionWorker::spawn(PipelineConfig::default()).unwrap();
        worker.submit(Snapshot::default()).unwrap();
        assert_eq!(worker.current_polygon().unwrap(), None);
    }
}
