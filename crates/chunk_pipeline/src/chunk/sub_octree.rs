//! Per-chunk sub-octree over the 16³ cell region.
//!
//! ```text
//!            root (16)
//!      ┌──────┴──────┐
//!   branch (8)     empty (8)      regions without active cells stop early
//!   ┌──┴──┐
//!  ...   leaf (1)                 a leaf is exactly one active cell
//! ```
//!
//! Cells live in a flat arena and are addressed by [`CellId`]. The root is
//! always `CellId(0)`. The root is a leaf exactly when the chunk has no
//! active cells.

use crate::arena::CellRecord;
use crate::constants::SAMPLE_SIZE;

/// Index of a cell in a [`SubOctree`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellId(pub u32);

impl CellId {
  pub const ROOT: CellId = CellId(0);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellKind {
  /// Region with no active cells.
  Empty,
  /// One active cell and the dual vertex it owns.
  Leaf { vertex: u32 },
  /// Eight child regions in octant order (bit 0 = +X, bit 1 = +Y, bit 2 = +Z).
  Branch { children: [CellId; 8] },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OctreeCell {
  /// Minimum corner in cell coordinates.
  pub min: [u8; 3],
  /// Edge length in cells (power of two).
  pub size: u8,
  pub kind: CellKind,
}

impl OctreeCell {
  #[inline]
  pub fn is_leaf(&self) -> bool {
    !matches!(self.kind, CellKind::Branch { .. })
  }
}

/// Flat octree arena. Reused across passes; `build` clears it first.
#[derive(Clone, Debug, Default)]
pub struct SubOctree {
  cells: Vec<OctreeCell>,
}

impl SubOctree {
  pub fn new() -> Self {
    Self::default()
  }

  /// Rebuild from the active cells of a chunk. Entry `i` of `active` owns
  /// vertex `i`.
  pub fn build(&mut self, active: &[CellRecord]) {
    self.cells.clear();
    let members: Vec<u32> = (0..active.len() as u32).collect();
    self.build_region([0; 3], SAMPLE_SIZE as u8, &members, active);
  }

  fn build_region(&mut self, min: [u8; 3], size: u8, members: &[u32], active: &[CellRecord]) -> CellId {
    let id = CellId(self.cells.len() as u32);

    if members.is_empty() {
      self.cells.push(OctreeCell {
        min,
        size,
        kind: CellKind::Empty,
      });
      return id;
    }

    if size == 1 {
      self.cells.push(OctreeCell {
        min,
        size,
        kind: CellKind::Leaf { vertex: members[0] },
      });
      return id;
    }

    // Placeholder, patched once the children exist.
    self.cells.push(OctreeCell {
      min,
      size,
      kind: CellKind::Empty,
    });

    let half = size / 2;
    let mut buckets: [Vec<u32>; 8] = Default::default();
    for &m in members {
      let c = active[m as usize].coord;
      let octant = (((c[0] - min[0]) >= half) as usize)
        | ((((c[1] - min[1]) >= half) as usize) << 1)
        | ((((c[2] - min[2]) >= half) as usize) << 2);
      buckets[octant].push(m);
    }

    let mut children = [CellId::ROOT; 8];
    for (octant, bucket) in buckets.iter().enumerate() {
      let child_min = [
        min[0] + half * (octant & 1) as u8,
        min[1] + half * ((octant >> 1) & 1) as u8,
        min[2] + half * ((octant >> 2) & 1) as u8,
      ];
      children[octant] = self.build_region(child_min, half, bucket, active);
    }

    self.cells[id.0 as usize].kind = CellKind::Branch { children };
    id
  }

  pub fn clear(&mut self) {
    self.cells.clear();
  }

  pub fn len(&self) -> usize {
    self.cells.len()
  }

  /// True before the first build.
  pub fn is_empty(&self) -> bool {
    self.cells.is_empty()
  }

  pub fn get(&self, id: CellId) -> Option<&OctreeCell> {
    self.cells.get(id.0 as usize)
  }

  pub fn root(&self) -> Option<&OctreeCell> {
    self.get(CellId::ROOT)
  }

  pub fn root_is_leaf(&self) -> bool {
    self.root().map_or(true, OctreeCell::is_leaf)
  }

  /// Child ids of the root when it is a branch.
  pub fn root_children(&self) -> Option<[CellId; 8]> {
    match self.root()?.kind {
      CellKind::Branch { children } => Some(children),
      _ => None,
    }
  }

  /// Number of leaves that own a vertex.
  pub fn vertex_leaf_count(&self) -> usize {
    self
      .cells
      .iter()
      .filter(|c| matches!(c.kind, CellKind::Leaf { .. }))
      .count()
  }

  pub fn iter(&self) -> impl Iterator<Item = &OctreeCell> {
    self.cells.iter()
  }
}

#[cfg(test)]
#[path = "sub_octree_test.rs"]
mod sub_octree_test;
