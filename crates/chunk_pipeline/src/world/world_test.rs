use std::sync::atomic::Ordering;

use super::*;
use crate::sdf_samplers::ConstantSampler;

fn world() -> VoxelWorld<ConstantSampler> {
  VoxelWorld::new(
    OctreeConfig::default().with_lod_range(0, 8),
    GeneratorConfig::default(),
    ConstantSampler::all_air(),
  )
}

#[test]
fn test_world_id_is_unique() {
  let a = WorldId::new();
  let b = WorldId::new();
  assert_ne!(a, b);
  assert!(b.raw() > a.raw());
}

#[test]
fn test_make_node_sets_parent() {
  let world = world();
  let node = world.make_node(OctreeNode::new(3, -1, 2, 1));

  assert_eq!(node.parent, Some(OctreeNode::new(1, -1, 1, 2)));
  assert_eq!(node.stage(), GenerationStage::Generating);
  assert!(node.leaf);
  assert!(node.chunk.is_none());

  let root = world.make_node(OctreeNode::new(0, 0, 0, 8));
  assert!(root.parent.is_none());
}

#[test]
fn test_create_chunk_is_idempotent() {
  let world = world();
  let mut node = world.make_node(OctreeNode::new(1, 0, 0, 0));

  {
    let mut registry = world.lock_chunks();
    world.create_chunk(&mut registry, &mut node);
    world.create_chunk(&mut registry, &mut node);
    assert_eq!(registry.issued(), 1);
  }

  let chunk = node.chunk.as_ref().unwrap();
  assert_eq!(chunk.node(), node.key);
  assert_eq!(chunk.origin(), glam::Vec3::new(15.0, 0.0, 0.0));
  assert_eq!(chunk.voxel_size(), 1.0);
  assert_eq!(world.chunk_count(), 1);
}

#[test]
fn test_children_of_marks_split() {
  let world = world();
  let mut parent = world.make_node(OctreeNode::new(0, 0, 0, 2));
  assert!(!world.is_split(&parent.key));

  let children = world.children_of(&mut parent).unwrap();
  assert_eq!(children.len(), 8);
  assert!(children.iter().all(|c| c.parent == Some(parent.key)));
  assert!(world.is_split(&parent.key));
  assert!(parent.flags.contains(NodeFlags::SPLIT));

  world.clear_split(&parent.key);
  assert!(!world.is_split(&parent.key));
}

#[test]
fn test_node_needs_split_by_distance() {
  let world = world();
  let node = OctreeNode::new(0, 0, 0, 2);
  let center = world.config.get_node_center(&node);
  let threshold = world.config.get_threshold(2);

  assert!(world.node_needs_split(center, &node));
  assert!(!world.node_needs_split(center + DVec3::X * (threshold * 2.0), &node));

  // Finest LOD never splits.
  let finest = OctreeNode::new(0, 0, 0, 0);
  assert!(!world.node_needs_split(world.config.get_node_center(&finest), &finest));
}

#[test]
fn test_focus_and_shutdown_flag() {
  let world = world();
  world.set_focus(DVec3::new(1.0, 2.0, 3.0));
  assert_eq!(world.focus_position(), DVec3::new(1.0, 2.0, 3.0));
  assert!(!world.generator_shutdown().load(Ordering::Acquire));
}

#[test]
fn test_node_lifecycle_helpers() {
  let world = world();
  let mut node = world.make_node(OctreeNode::new(0, 0, 0, 0));

  assert!(!node.mark_uploaded());
  node.set_stage(GenerationStage::NeedsUpload);
  assert!(node.mark_uploaded());
  assert_eq!(node.stage(), GenerationStage::Uploaded);

  node.request_generation();
  assert_eq!(node.stage(), GenerationStage::Generating);
  assert!(node.is_dirty());
  assert_eq!(format!("{:?}", node.flags), "{\"DIRTY\"}");
}
