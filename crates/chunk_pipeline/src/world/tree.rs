//! ChunkTree - what the generator needs from the tree that owns the nodes.

use std::sync::atomic::AtomicBool;
use std::sync::MutexGuard;

use glam::DVec3;

use super::{ChunkRegistry, WorldNode};
use crate::config::GeneratorConfig;
use crate::field::FieldSampler;
use crate::gpu::GpuAllocator;
use crate::octree::OctreeNode;

/// Tree collaborator consumed by [`crate::pipeline::ChunkGenerator`].
///
/// Implementations are shared across the generator's workers and must be
/// thread-safe. The chunk lock is the only cross-node mutation point.
pub trait ChunkTree: Send + Sync {
  /// Take the tree-wide chunk lock.
  fn lock_chunks(&self) -> MutexGuard<'_, ChunkRegistry>;

  /// Give `node` a chunk. Called with the chunk lock held, only for nodes
  /// without one.
  fn create_chunk(&self, registry: &mut ChunkRegistry, node: &mut WorldNode);

  fn is_split(&self, node: &OctreeNode) -> bool;

  /// Whether `node` should be split for a viewer at `focus`.
  fn node_needs_split(&self, focus: DVec3, node: &OctreeNode) -> bool;

  /// Current viewer position.
  fn focus_position(&self) -> DVec3;

  fn sampler(&self) -> &dyn FieldSampler;

  fn gpu_allocator(&self) -> &GpuAllocator;

  fn properties(&self) -> &GeneratorConfig;

  /// Set when the generator shuts down. Workers stop scheduling batches once
  /// it is raised.
  fn generator_shutdown(&self) -> &AtomicBool;
}
