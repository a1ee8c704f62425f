//! OctreeNode - immutable value type identifying a node of the outer tree.
//!
//! Nodes are identified by their grid coordinates at their LOD level.
//! LOD 0 = finest detail, higher LOD = coarser.

/// Octree node position key.
///
/// Grid coordinates are at the node's own LOD level, not the finest level.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct OctreeNode {
  pub x: i32,
  pub y: i32,
  pub z: i32,
  /// Level of detail (0 = finest, higher = coarser)
  pub lod: i32,
}

impl OctreeNode {
  pub fn new(x: i32, y: i32, z: i32, lod: i32) -> Self {
    Self { x, y, z, lod }
  }

  /// Child node one LOD finer.
  ///
  /// Octant bits: bit 0 = +X, bit 1 = +Y, bit 2 = +Z.
  /// Returns None at LOD 0.
  pub fn get_child(&self, octant: u8) -> Option<Self> {
    if self.lod <= 0 {
      return None;
    }
    Some(Self {
      x: self.x * 2 + (octant & 1) as i32,
      y: self.y * 2 + ((octant >> 1) & 1) as i32,
      z: self.z * 2 + ((octant >> 2) & 1) as i32,
      lod: self.lod - 1,
    })
  }

  /// All eight children in octant order, or None at LOD 0.
  pub fn children(&self) -> Option<[Self; 8]> {
    if self.lod <= 0 {
      return None;
    }
    let mut out = [*self; 8];
    for (octant, child) in out.iter_mut().enumerate() {
      *child = self.get_child(octant as u8)?;
    }
    Some(out)
  }

  /// Parent node one LOD coarser, or None at `max_lod`.
  ///
  /// Uses floor division so negative coordinates map to the enclosing
  /// parent.
  pub fn get_parent(&self, max_lod: i32) -> Option<Self> {
    if self.lod >= max_lod {
      return None;
    }
    Some(Self {
      x: self.x.div_euclid(2),
      y: self.y.div_euclid(2),
      z: self.z.div_euclid(2),
      lod: self.lod + 1,
    })
  }

  /// Which octant of its parent this node occupies.
  #[inline]
  pub fn octant(&self) -> u8 {
    (self.x.rem_euclid(2) | (self.y.rem_euclid(2) << 1) | (self.z.rem_euclid(2) << 2)) as u8
  }
}

#[cfg(test)]
#[path = "node_test.rs"]
mod node_test;
