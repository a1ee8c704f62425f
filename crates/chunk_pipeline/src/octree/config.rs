//! OctreeConfig - world coordinate mapping for the outer tree.

use glam::{DVec3, Vec3};

use super::OctreeNode;
use crate::constants::CELLS_PER_AXIS;

/// Number of voxels (cells) spanned by one node per axis.
pub const VOXELS_PER_NODE: usize = CELLS_PER_AXIS; // 15

/// Coordinate mapping and split thresholds for the outer tree.
#[derive(Clone, Debug, PartialEq)]
pub struct OctreeConfig {
  /// Base voxel size in world units.
  pub voxel_size: f64,

  /// World-space origin for coordinate calculations.
  pub world_origin: DVec3,

  /// Finest LOD level. Typically 0.
  pub min_lod: i32,

  /// Coarsest LOD level allowed.
  pub max_lod: i32,

  /// Scales split distance thresholds.
  /// threshold = node_size * 2^lod_exponent
  pub lod_exponent: f64,
}

impl OctreeConfig {
  pub fn with_voxel_size(mut self, voxel_size: f64) -> Self {
    self.voxel_size = voxel_size;
    self
  }

  pub fn with_world_origin(mut self, origin: DVec3) -> Self {
    self.world_origin = origin;
    self
  }

  pub fn with_lod_range(mut self, min_lod: i32, max_lod: i32) -> Self {
    self.min_lod = min_lod;
    self.max_lod = max_lod;
    self
  }

  pub fn with_lod_exponent(mut self, exponent: f64) -> Self {
    self.lod_exponent = exponent;
    self
  }

  /// node_size = voxel_size * VOXELS_PER_NODE * 2^LOD
  #[inline]
  pub fn get_node_size(&self, lod: i32) -> f64 {
    self.get_voxel_size(lod) * VOXELS_PER_NODE as f64
  }

  /// voxel_at_lod = voxel_size * 2^LOD
  #[inline]
  pub fn get_voxel_size(&self, lod: i32) -> f64 {
    self.voxel_size * (1u64 << lod.max(0)) as f64
  }

  /// Split distance threshold for LOD.
  #[inline]
  pub fn get_threshold(&self, lod: i32) -> f64 {
    self.get_node_size(lod) * 2.0_f64.powf(self.lod_exponent)
  }

  /// World-space minimum corner of a node.
  #[inline]
  pub fn get_node_min(&self, node: &OctreeNode) -> DVec3 {
    let size = self.get_node_size(node.lod);
    self.world_origin + DVec3::new(node.x as f64, node.y as f64, node.z as f64) * size
  }

  /// World-space center of a node.
  #[inline]
  pub fn get_node_center(&self, node: &OctreeNode) -> DVec3 {
    self.get_node_min(node) + DVec3::splat(self.get_node_size(node.lod) * 0.5)
  }

  /// Sampling origin and voxel size for a node's chunk, in f32 world units.
  pub fn chunk_frame(&self, node: &OctreeNode) -> (Vec3, f32) {
    (
      self.get_node_min(node).as_vec3(),
      self.get_voxel_size(node.lod) as f32,
    )
  }
}

impl Default for OctreeConfig {
  fn default() -> Self {
    Self {
      voxel_size: 1.0,
      world_origin: DVec3::ZERO,
      min_lod: 0,
      max_lod: 30,
      lod_exponent: 0.0,
    }
  }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;
