//! Error types for the chunk pipeline.
//!
//! Expected empty results (no surface, no mesh) are not errors; they short
//! circuit the remaining stages. Errors cover invalid invocation and resource
//! exhaustion only.

use thiserror::Error;

use crate::arena::BlockKind;

/// Arena pool failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArenaError {
  #[error("{kind:?} pool exhausted ({capacity} blocks in flight)")]
  Exhausted { kind: BlockKind, capacity: usize },
}

/// GPU budget failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GpuError {
  #[error("gpu budget exceeded: requested {requested_vertices} vertices / {requested_indices} indices, {available_vertices} / {available_indices} available")]
  BudgetExceeded {
    requested_vertices: usize,
    requested_indices: usize,
    available_vertices: usize,
    available_indices: usize,
  },
}

/// Per-chunk stage failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChunkError {
  #[error(transparent)]
  Arena(#[from] ArenaError),

  #[error(transparent)]
  Gpu(#[from] GpuError),

  /// Samples were leased in a different pass than the one consuming them.
  #[error("samples belong to pass {found}, current pass is {expected}")]
  StaleSamples { expected: u64, found: u64 },

  /// A stage ran before the samples it depends on were produced.
  #[error("stage requires samples that were not extracted this pass")]
  MissingSamples,
}

/// Invalid use of the generator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeneratorError {
  #[error("generator is not bound to a tree; call init first")]
  NotInitialized,

  #[error("process_queue called with an empty batch")]
  EmptyBatch,

  #[error("failed to build worker thread pool: {0}")]
  ThreadPool(String),

  #[error("failed to spawn generation worker: {0}")]
  WorkerSpawn(String),
}
