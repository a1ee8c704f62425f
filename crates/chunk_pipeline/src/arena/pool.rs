//! Block pools, leases and pass scoping.

use std::fmt;
use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use super::blocks::{BinaryBlock, CellBlock, FloatBlock, IndexBlock, VertexInfoBlock};
use super::{Block, PassId};
use crate::error::ArenaError;

// =============================================================================
// Lease
// =============================================================================

/// Exclusive ownership of one pooled block for the duration of a pass.
pub struct Lease<B: Block> {
  block: Box<B>,
  pass: PassId,
}

impl<B: Block> Lease<B> {
  /// The pass this block was leased in.
  #[inline]
  pub fn pass(&self) -> PassId {
    self.pass
  }
}

impl<B: Block> Deref for Lease<B> {
  type Target = B;

  fn deref(&self) -> &B {
    &self.block
  }
}

impl<B: Block> DerefMut for Lease<B> {
  fn deref_mut(&mut self) -> &mut B {
    &mut self.block
  }
}

impl<B: Block> fmt::Debug for Lease<B> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Lease")
      .field("kind", &B::KIND)
      .field("pass", &self.pass)
      .finish()
  }
}

// =============================================================================
// BlockPool
// =============================================================================

/// Thread-safe pool of one block type.
///
/// `outstanding` counts leases handed out in the current pass and never
/// exceeds `capacity`. Returned blocks go to the free list and are reset when
/// they are handed out again.
pub struct BlockPool<B: Block> {
  free: Mutex<Vec<Box<B>>>,
  outstanding: AtomicUsize,
  capacity: usize,
}

impl<B: Block> BlockPool<B> {
  pub fn new(capacity: usize) -> Self {
    Self {
      free: Mutex::new(Vec::new()),
      outstanding: AtomicUsize::new(0),
      capacity,
    }
  }

  /// Maximum number of blocks in flight per pass.
  pub fn capacity(&self) -> usize {
    self.capacity
  }

  /// Blocks currently leased in this pass.
  pub fn outstanding(&self) -> usize {
    self.outstanding.load(Ordering::Acquire)
  }

  /// Blocks waiting in the free list.
  pub fn free_blocks(&self) -> usize {
    self.free.lock().unwrap_or_else(PoisonError::into_inner).len()
  }

  fn acquire(&self, pass: PassId) -> Result<Lease<B>, ArenaError> {
    let capacity = self.capacity;
    self
      .outstanding
      .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| {
        (n < capacity).then_some(n + 1)
      })
      .map_err(|_| ArenaError::Exhausted {
        kind: B::KIND,
        capacity,
      })?;

    let recycled = self
      .free
      .lock()
      .unwrap_or_else(PoisonError::into_inner)
      .pop();

    let block = match recycled {
      Some(mut block) => {
        block.reset();
        block
      }
      None => B::allocate(),
    };

    Ok(Lease { block, pass })
  }

  fn release(&self, lease: Lease<B>, current: PassId) {
    // Leases from an earlier pass were already written off by end_pass.
    if lease.pass == current {
      self.outstanding.fetch_sub(1, Ordering::AcqRel);
    }
    self
      .free
      .lock()
      .unwrap_or_else(PoisonError::into_inner)
      .push(lease.block);
  }

  /// Close the pass, returning how many leases were never released.
  fn end_pass(&self) -> usize {
    self.outstanding.swap(0, Ordering::AcqRel)
  }
}

// =============================================================================
// ArenaSet
// =============================================================================

/// The five pools used by chunk extraction.
pub struct ArenaSet {
  pub(super) binary: BlockPool<BinaryBlock>,
  pub(super) float: BlockPool<FloatBlock>,
  pub(super) vertex_info: BlockPool<VertexInfoBlock>,
  pub(super) cells: BlockPool<CellBlock>,
  pub(super) indexes: BlockPool<IndexBlock>,
  last_pass: u64,
}

impl ArenaSet {
  /// Create a set where every pool allows `capacity` blocks in flight.
  pub fn new(capacity: usize) -> Self {
    Self {
      binary: BlockPool::new(capacity),
      float: BlockPool::new(capacity),
      vertex_info: BlockPool::new(capacity),
      cells: BlockPool::new(capacity),
      indexes: BlockPool::new(capacity),
      last_pass: 0,
    }
  }

  /// Open a new pass. The set stays borrowed until the pass is dropped.
  pub fn begin_pass(&mut self) -> PassArenas<'_> {
    self.last_pass += 1;
    PassArenas {
      id: PassId(self.last_pass),
      set: self,
    }
  }

  /// The pool for block type `B`.
  pub fn pool<B: Block>(&self) -> &BlockPool<B> {
    B::pool(self)
  }

  /// Leases in flight across all pools.
  pub fn outstanding(&self) -> usize {
    self.binary.outstanding()
      + self.float.outstanding()
      + self.vertex_info.outstanding()
      + self.cells.outstanding()
      + self.indexes.outstanding()
  }

  /// Id of the most recently opened pass (`PassId(0)` before the first).
  pub fn last_pass(&self) -> PassId {
    PassId(self.last_pass)
  }

  fn end_pass(&self) -> usize {
    self.binary.end_pass()
      + self.float.end_pass()
      + self.vertex_info.end_pass()
      + self.cells.end_pass()
      + self.indexes.end_pass()
  }
}

// =============================================================================
// PassArenas
// =============================================================================

/// Shared handle to an open pass. Safe to use from many workers at once.
///
/// Dropping it ends the pass. Leases still outstanding at that point are
/// logged and written off; they return to their pool when released later.
pub struct PassArenas<'a> {
  set: &'a ArenaSet,
  id: PassId,
}

impl PassArenas<'_> {
  #[inline]
  pub fn id(&self) -> PassId {
    self.id
  }

  /// Lease a block of type `B` for this pass.
  pub fn acquire<B: Block>(&self) -> Result<Lease<B>, ArenaError> {
    B::pool(self.set).acquire(self.id)
  }

  /// Return a block to its pool.
  pub fn release<B: Block>(&self, lease: Lease<B>) {
    B::pool(self.set).release(lease, self.id)
  }

  /// Leases in flight across all pools.
  pub fn outstanding(&self) -> usize {
    self.set.outstanding()
  }
}

impl Drop for PassArenas<'_> {
  fn drop(&mut self) {
    let leaked = self.set.end_pass();
    if leaked > 0 {
      tracing::warn!(pass = self.id.0, leaked, "arena pass ended with outstanding leases");
    }
  }
}
