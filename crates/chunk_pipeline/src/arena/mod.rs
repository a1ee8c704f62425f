//! Pass-scoped block arenas for chunk extraction.
//!
//! Extraction needs several fixed-size scratch blocks per chunk. Instead of
//! allocating them per chunk, each block type has a pool of boxed blocks that
//! are leased to a chunk for one `process_queue` pass and returned at the end
//! of it.
//!
//! # Lifecycle
//!
//! ```text
//! ┌──────────────┐  begin_pass   ┌─────────────┐   acquire    ┌────────────┐
//! │   ArenaSet   │──────────────►│ PassArenas  │─────────────►│  Lease<B>  │
//! │ (5 pools)    │   (&mut)      │ (PassId n)  │◄─────────────│ (Box<B>,n) │
//! └──────────────┘               └─────────────┘   release    └────────────┘
//!        ▲                              │
//!        └────────── drop: end pass ────┘  (leaked leases are written off)
//! ```
//!
//! - `begin_pass` borrows the set exclusively, so passes never overlap.
//! - A lease owns its block. Two chunks can never share a region.
//! - Each pool bounds blocks in flight by its capacity; exhaustion is an
//!   `ArenaError::Exhausted`, never a silent reallocation.
//! - Every lease carries the `PassId` it was taken in. Consumers compare it
//!   against the current pass to refuse data produced in another pass.

mod blocks;
mod pool;

pub use blocks::{BinaryBlock, CellBlock, CellRecord, FloatBlock, IndexBlock, VertexInfoBlock};
pub use pool::{ArenaSet, BlockPool, Lease, PassArenas};

/// Identifier of one arena pass. Zero is never issued.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PassId(pub u64);

/// Block type tag, used for diagnostics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BlockKind {
  Binary,
  Float,
  VertexInfo,
  Cell,
  Index,
}

/// A fixed-layout scratch block managed by a [`BlockPool`].
pub trait Block: Send + Sized + 'static {
  const KIND: BlockKind;

  /// Allocate a fresh block on the heap.
  fn allocate() -> Box<Self>;

  /// Restore the block to its freshly allocated state, keeping any heap
  /// capacity it owns.
  fn reset(&mut self);

  /// The pool for this block type within a set.
  fn pool(set: &ArenaSet) -> &BlockPool<Self>;
}

#[cfg(test)]
#[path = "arena_test.rs"]
mod arena_test;
