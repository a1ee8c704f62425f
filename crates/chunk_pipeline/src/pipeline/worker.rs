//! Background generation worker.
//!
//! Owns a bound [`ChunkGenerator`] on a dedicated thread and drains batches
//! sent over a channel. Between batches it checks the tree's shutdown flag
//! and stops taking work once it is raised.
//!
//! ```text
//! submit(nodes) ──► [requests] ──► worker thread ──► process_queue
//!                                                        │
//! poll() / recv_timeout() ◄── [results] ◄── WorkerOutput ┘
//! ```

use std::sync::atomic::Ordering;
use std::thread::JoinHandle;
use std::time::Duration;

use crossbeam_channel::{bounded, unbounded, Receiver, RecvTimeoutError, Sender, TrySendError};

use super::generator::ChunkGenerator;
use super::types::PassReport;
use crate::error::GeneratorError;
use crate::world::{ChunkTree, WorldNode};

/// How long the worker waits for a batch before re-checking shutdown.
const IDLE_POLL: Duration = Duration::from_millis(10);

/// A processed batch: the nodes handed back plus the pass result.
#[derive(Debug)]
pub struct WorkerOutput {
  pub nodes: Vec<WorldNode>,
  pub report: Result<PassReport, GeneratorError>,
}

pub struct GenerationWorker {
  requests: Option<Sender<Vec<WorldNode>>>,
  results: Receiver<WorkerOutput>,
  handle: Option<JoinHandle<()>>,
}

impl GenerationWorker {
  /// Move `generator` onto a new thread. At most `queue_depth` batches wait
  /// in the request channel.
  pub fn spawn<T: ChunkTree + 'static>(
    mut generator: ChunkGenerator<T>,
    queue_depth: usize,
  ) -> Result<Self, GeneratorError> {
    let tree = generator
      .tree()
      .cloned()
      .ok_or(GeneratorError::NotInitialized)?;

    let (request_tx, request_rx) = bounded::<Vec<WorldNode>>(queue_depth.max(1));
    let (result_tx, result_rx) = unbounded();

    let handle = std::thread::Builder::new()
      .name("chunk-generator".into())
      .spawn(move || {
        loop {
          if tree.generator_shutdown().load(Ordering::Acquire) {
            tracing::debug!("generator shutdown flag raised, worker stopping");
            break;
          }
          match request_rx.recv_timeout(IDLE_POLL) {
            Ok(mut nodes) => {
              let report = {
                let mut batch: Vec<&mut WorldNode> = nodes.iter_mut().collect();
                generator.process_queue(&mut batch)
              };
              if result_tx.send(WorkerOutput { nodes, report }).is_err() {
                break;
              }
            }
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => break,
          }
        }
      })
      .map_err(|e| GeneratorError::WorkerSpawn(e.to_string()))?;

    Ok(Self {
      requests: Some(request_tx),
      results: result_rx,
      handle: Some(handle),
    })
  }

  /// Queue a batch without blocking. Hands the nodes back when the queue is
  /// full or the worker has stopped.
  pub fn submit(&self, nodes: Vec<WorldNode>) -> Result<(), Vec<WorldNode>> {
    let Some(requests) = self.requests.as_ref() else {
      return Err(nodes);
    };
    requests.try_send(nodes).map_err(|e| match e {
      TrySendError::Full(nodes) | TrySendError::Disconnected(nodes) => nodes,
    })
  }

  /// Next finished batch, if any.
  pub fn poll(&self) -> Option<WorkerOutput> {
    self.results.try_recv().ok()
  }

  /// Wait up to `timeout` for the next finished batch.
  pub fn recv_timeout(&self, timeout: Duration) -> Option<WorkerOutput> {
    self.results.recv_timeout(timeout).ok()
  }

  pub fn is_running(&self) -> bool {
    self.handle.as_ref().is_some_and(|h| !h.is_finished())
  }

  /// Stop taking work, let queued batches finish and join the thread.
  /// Returns every result not yet polled.
  pub fn shutdown(mut self) -> Vec<WorkerOutput> {
    self.stop();
    self.results.try_iter().collect()
  }

  fn stop(&mut self) {
    self.requests.take();
    if let Some(handle) = self.handle.take() {
      if handle.join().is_err() {
        tracing::warn!("generation worker panicked");
      }
    }
  }
}

impl Drop for GenerationWorker {
  fn drop(&mut self) {
    self.stop();
  }
}

#[cfg(test)]
#[path = "worker_test.rs"]
mod worker_test;
