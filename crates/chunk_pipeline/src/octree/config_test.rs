use glam::{DVec3, Vec3};

use super::*;

#[test]
fn test_node_size_at_lod_0() {
  let config = OctreeConfig::default();
  assert_eq!(config.get_node_size(0), 15.0);
}

#[test]
fn test_node_size_doubles_per_lod() {
  let config = OctreeConfig::default();
  let size_0 = config.get_node_size(0);

  assert_eq!(config.get_node_size(1), size_0 * 2.0);
  assert_eq!(config.get_node_size(5), size_0 * 32.0);
}

#[test]
fn test_voxel_size_at_lod() {
  let config = OctreeConfig::default().with_voxel_size(0.5);

  assert_eq!(config.get_voxel_size(0), 0.5);
  assert_eq!(config.get_voxel_size(3), 4.0);
}

#[test]
fn test_node_min_with_world_origin() {
  let config = OctreeConfig::default().with_world_origin(DVec3::new(100.0, 200.0, 300.0));

  let origin_node = OctreeNode::new(0, 0, 0, 0);
  assert_eq!(config.get_node_min(&origin_node), config.world_origin);

  let shifted = OctreeNode::new(1, 0, -1, 0);
  assert_eq!(
    config.get_node_min(&shifted),
    config.world_origin + DVec3::new(15.0, 0.0, -15.0)
  );
}

#[test]
fn test_node_center() {
  let config = OctreeConfig::default();
  let node = OctreeNode::new(0, 0, 0, 1);
  assert_eq!(config.get_node_center(&node), DVec3::splat(15.0));
}

#[test]
fn test_threshold_scales_with_exponent() {
  let config = OctreeConfig::default();
  assert_eq!(config.get_threshold(0), config.get_node_size(0));

  let config = config.with_lod_exponent(1.0);
  assert_eq!(config.get_threshold(0), config.get_node_size(0) * 2.0);
}

#[test]
fn test_chunk_frame_tiles_neighbours() {
  let config = OctreeConfig::default();
  let (origin_a, voxel_a) = config.chunk_frame(&OctreeNode::new(0, 0, 0, 0));
  let (origin_b, _) = config.chunk_frame(&OctreeNode::new(1, 0, 0, 0));

  // Last sample plane of A coincides with the first sample plane of B.
  assert_eq!(origin_a + Vec3::X * voxel_a * VOXELS_PER_NODE as f32, origin_b);
}
