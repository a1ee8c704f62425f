//! VoxelWorld - the crate's concrete tree collaborator.
//!
//! Holds the world's coordinate mapping, field sampler, split set, viewer
//! focus, chunk registry and GPU budget. Multiple worlds can exist side by
//! side; each owns its own generator.

mod node;
mod registry;
mod tree;

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError, RwLock};

use glam::DVec3;
pub use node::{GenerationStage, NodeFlags, WorldNode};
pub use registry::ChunkRegistry;
pub use tree::ChunkTree;

use crate::chunk::Chunk;
use crate::config::GeneratorConfig;
use crate::field::FieldSampler;
use crate::gpu::GpuAllocator;
use crate::octree::{OctreeConfig, OctreeNode};

// =============================================================================
// WorldId - unique identifier
// =============================================================================

static WORLD_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Opaque world identifier, unique within the process.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct WorldId(u64);

impl WorldId {
  pub fn new() -> Self {
    Self(WORLD_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
  }

  pub fn raw(&self) -> u64 {
    self.0
  }
}

impl Default for WorldId {
  fn default() -> Self {
    Self::new()
  }
}

// =============================================================================
// VoxelWorld<S>
// =============================================================================

/// Per-world state, generic over the field sampler.
///
/// Use `Box<dyn FieldSampler>` for runtime-selected fields.
pub struct VoxelWorld<S: FieldSampler> {
  pub id: WorldId,
  pub config: OctreeConfig,
  properties: GeneratorConfig,
  sampler: S,
  chunks: Mutex<ChunkRegistry>,
  split: RwLock<HashSet<OctreeNode>>,
  focus: RwLock<DVec3>,
  gpu: GpuAllocator,
  shutdown: AtomicBool,
}

impl<S: FieldSampler> VoxelWorld<S> {
  pub fn new(config: OctreeConfig, properties: GeneratorConfig, sampler: S) -> Self {
    let gpu = GpuAllocator::new(properties.gpu_vertex_budget, properties.gpu_index_budget);
    Self {
      id: WorldId::new(),
      config,
      properties,
      sampler,
      chunks: Mutex::new(ChunkRegistry::new()),
      split: RwLock::new(HashSet::new()),
      focus: RwLock::new(DVec3::ZERO),
      gpu,
      shutdown: AtomicBool::new(false),
    }
  }

  pub fn set_focus(&self, focus: DVec3) {
    *self.focus.write().unwrap_or_else(PoisonError::into_inner) = focus;
  }

  pub fn mark_split(&self, node: OctreeNode) {
    self
      .split
      .write()
      .unwrap_or_else(PoisonError::into_inner)
      .insert(node);
  }

  pub fn clear_split(&self, node: &OctreeNode) {
    self
      .split
      .write()
      .unwrap_or_else(PoisonError::into_inner)
      .remove(node);
  }

  /// A fresh node for `key`, with its parent key filled in.
  pub fn make_node(&self, key: OctreeNode) -> WorldNode {
    WorldNode::new(key, key.get_parent(self.config.max_lod))
  }

  /// Split `parent`: record it as split and return its eight children.
  ///
  /// Returns None at LOD 0.
  pub fn children_of(&self, parent: &mut WorldNode) -> Option<Vec<WorldNode>> {
    let keys = parent.key.children()?;
    parent.flags.insert(NodeFlags::SPLIT);
    self.mark_split(parent.key);
    Some(
      keys
        .into_iter()
        .map(|key| WorldNode::new(key, Some(parent.key)))
        .collect(),
    )
  }

  /// Chunks created so far.
  pub fn chunk_count(&self) -> usize {
    self.lock_chunks().len()
  }
}

impl<S: FieldSampler> ChunkTree for VoxelWorld<S> {
  fn lock_chunks(&self) -> MutexGuard<'_, ChunkRegistry> {
    self.chunks.lock().unwrap_or_else(PoisonError::into_inner)
  }

  fn create_chunk(&self, registry: &mut ChunkRegistry, node: &mut WorldNode) {
    if node.chunk.is_some() {
      return;
    }
    let id = registry.register(node.key);
    let (origin, voxel_size) = self.config.chunk_frame(&node.key);
    node.chunk = Some(Chunk::new(id, node.key, origin, voxel_size));
  }

  fn is_split(&self, node: &OctreeNode) -> bool {
    self
      .split
      .read()
      .unwrap_or_else(PoisonError::into_inner)
      .contains(node)
  }

  fn node_needs_split(&self, focus: DVec3, node: &OctreeNode) -> bool {
    if node.lod <= self.config.min_lod {
      return false;
    }
    let distance = (focus - self.config.get_node_center(node)).length();
    distance < self.config.get_threshold(node.lod)
  }

  fn focus_position(&self) -> DVec3 {
    *self.focus.read().unwrap_or_else(PoisonError::into_inner)
  }

  fn sampler(&self) -> &dyn FieldSampler {
    &self.sampler
  }

  fn gpu_allocator(&self) -> &GpuAllocator {
    &self.gpu
  }

  fn properties(&self) -> &GeneratorConfig {
    &self.properties
  }

  fn generator_shutdown(&self) -> &AtomicBool {
    &self.shutdown
  }
}

#[cfg(test)]
#[path = "world_test.rs"]
mod world_test;
