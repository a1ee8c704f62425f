//! The five block types leased per chunk.

use super::{ArenaSet, Block, BlockKind, BlockPool};
use crate::constants::{BINARY_WORDS, NO_VERTEX, SAMPLE_SIZE_CB};
use crate::types::Vertex;

// =============================================================================
// Binary signs
// =============================================================================

/// One inside/outside bit per sample (bit set = inside, value < 0).
pub struct BinaryBlock {
  pub words: [u64; BINARY_WORDS],
}

impl BinaryBlock {
  #[inline]
  pub fn is_inside(&self, index: usize) -> bool {
    (self.words[index >> 6] >> (index & 63)) & 1 == 1
  }

  #[inline]
  pub fn set_inside(&mut self, index: usize, inside: bool) {
    let bit = 1u64 << (index & 63);
    if inside {
      self.words[index >> 6] |= bit;
    } else {
      self.words[index >> 6] &= !bit;
    }
  }

  /// Number of inside samples.
  pub fn count_inside(&self) -> u32 {
    self.words.iter().map(|w| w.count_ones()).sum()
  }
}

impl Block for BinaryBlock {
  const KIND: BlockKind = BlockKind::Binary;

  fn allocate() -> Box<Self> {
    Box::new(Self {
      words: [0; BINARY_WORDS],
    })
  }

  fn reset(&mut self) {
    self.words.fill(0);
  }

  fn pool(set: &ArenaSet) -> &BlockPool<Self> {
    &set.binary
  }
}

// =============================================================================
// Float samples
// =============================================================================

/// Raw field values for the 16³ sample lattice.
pub struct FloatBlock {
  pub values: [f32; SAMPLE_SIZE_CB],
}

impl Block for FloatBlock {
  const KIND: BlockKind = BlockKind::Float;

  fn allocate() -> Box<Self> {
    Box::new(Self {
      values: [0.0; SAMPLE_SIZE_CB],
    })
  }

  fn reset(&mut self) {
    self.values.fill(0.0);
  }

  fn pool(set: &ArenaSet) -> &BlockPool<Self> {
    &set.float
  }
}

// =============================================================================
// Vertex info
// =============================================================================

/// Dual vertices and the mesh built from them.
///
/// `vertices` holds one entry per active cell after dual-vertex extraction.
/// `mesh_indexes` holds the base mesh (quads) and is later overwritten with
/// the optimized output.
#[derive(Default)]
pub struct VertexInfoBlock {
  pub vertices: Vec<Vertex>,
  pub mesh_indexes: Vec<u32>,
}

impl Block for VertexInfoBlock {
  const KIND: BlockKind = BlockKind::VertexInfo;

  fn allocate() -> Box<Self> {
    Box::default()
  }

  fn reset(&mut self) {
    self.vertices.clear();
    self.mesh_indexes.clear();
  }

  fn pool(set: &ArenaSet) -> &BlockPool<Self> {
    &set.vertex_info
  }
}

// =============================================================================
// Active cells
// =============================================================================

/// An active (surface-crossing) cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellRecord {
  /// Cell minimum corner in sample coordinates.
  pub coord: [u8; 3],

  /// Inside bit per corner (corner order as in `constants`).
  pub corner_mask: u8,
}

/// Active cells in extraction order. Entry `i` owns vertex `i`.
#[derive(Default)]
pub struct CellBlock {
  pub cells: Vec<CellRecord>,
}

impl Block for CellBlock {
  const KIND: BlockKind = BlockKind::Cell;

  fn allocate() -> Box<Self> {
    Box::default()
  }

  fn reset(&mut self) {
    self.cells.clear();
  }

  fn pool(set: &ArenaSet) -> &BlockPool<Self> {
    &set.cells
  }
}

// =============================================================================
// Cell -> vertex map
// =============================================================================

/// Dense map from cell index to vertex index (`NO_VERTEX` when inactive).
pub struct IndexBlock {
  pub vertex_of: [u32; SAMPLE_SIZE_CB],
}

impl IndexBlock {
  #[inline]
  pub fn get(&self, cell_index: usize) -> Option<u32> {
    match self.vertex_of[cell_index] {
      NO_VERTEX => None,
      v => Some(v),
    }
  }
}

impl Block for IndexBlock {
  const KIND: BlockKind = BlockKind::Index;

  fn allocate() -> Box<Self> {
    Box::new(Self {
      vertex_of: [NO_VERTEX; SAMPLE_SIZE_CB],
    })
  }

  fn reset(&mut self) {
    self.vertex_of.fill(NO_VERTEX);
  }

  fn pool(set: &ArenaSet) -> &BlockPool<Self> {
    &set.indexes
  }
}
