//! Core data types shared by extraction, optimization and formatting.

use glam::Vec3;

/// Polygon layout of optimized chunk meshes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum MeshTopology {
  /// Quads are flattened to triangles before optimization (3 indices per
  /// face).
  #[default]
  Triangles,

  /// Quads are optimized and emitted as-is (4 indices per face).
  Quads,
}

impl MeshTopology {
  /// Number of indices per face.
  #[inline]
  pub const fn sides(self) -> usize {
    match self {
      MeshTopology::Triangles => 3,
      MeshTopology::Quads => 4,
    }
  }
}

/// Mesh vertex in world space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vertex {
  /// Vertex position in world units.
  pub position: Vec3,

  /// Surface normal (unit vector).
  pub normal: Vec3,
}

impl Vertex {
  pub fn new(position: Vec3, normal: Vec3) -> Self {
    Self { position, normal }
  }
}

impl Default for Vertex {
  fn default() -> Self {
    Self {
      position: Vec3::ZERO,
      normal: Vec3::Y,
    }
  }
}

/// Axis-aligned bounding box.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MinMaxAABB {
  pub min: [f32; 3],
  pub max: [f32; 3],
}

impl MinMaxAABB {
  /// Create AABB with inverted extents (ready for encapsulation).
  pub fn empty() -> Self {
    Self {
      min: [f32::INFINITY; 3],
      max: [f32::NEG_INFINITY; 3],
    }
  }

  /// Create AABB from min/max corners.
  pub fn new(min: [f32; 3], max: [f32; 3]) -> Self {
    Self { min, max }
  }

  /// Expand AABB to include a point.
  #[inline]
  pub fn encapsulate(&mut self, point: [f32; 3]) {
    for i in 0..3 {
      self.min[i] = self.min[i].min(point[i]);
      self.max[i] = self.max[i].max(point[i]);
    }
  }

  /// Check if AABB is valid (min <= max on all axes).
  pub fn is_valid(&self) -> bool {
    self.min[0] <= self.max[0] && self.min[1] <= self.max[1] && self.min[2] <= self.max[2]
  }
}

impl Default for MinMaxAABB {
  fn default() -> Self {
    Self::empty()
  }
}

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;
