//! Test utilities for pipeline tests.
//!
//! World fixtures, node batches, a bound generator and warning capture.

use std::fmt;
use std::sync::{Arc, Mutex};

use glam::Vec3;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

use super::generator::ChunkGenerator;
use crate::config::GeneratorConfig;
use crate::field::FieldSampler;
use crate::octree::{OctreeConfig, OctreeNode};
use crate::sdf_samplers::SphereSampler;
use crate::world::{VoxelWorld, WorldNode};

/// The LOD 1 node whose eight children form the standard test batch.
pub const PARENT: OctreeNode = OctreeNode {
  x: 0,
  y: 0,
  z: 0,
  lod: 1,
};

/// 1-unit voxels, LODs 0..=8.
pub fn octree_config() -> OctreeConfig {
  OctreeConfig::default().with_lod_range(0, 8)
}

pub fn world_with<S: FieldSampler>(sampler: S, config: GeneratorConfig) -> Arc<VoxelWorld<S>> {
  Arc::new(VoxelWorld::new(octree_config(), config, sampler))
}

/// Sphere centered on the corner shared by the eight children of
/// [`PARENT`], so every child contains surface.
pub fn sphere_sampler() -> SphereSampler {
  SphereSampler::new(10.0).with_center(Vec3::splat(15.0))
}

pub fn sphere_world(config: GeneratorConfig) -> Arc<VoxelWorld<SphereSampler>> {
  world_with(sphere_sampler(), config)
}

/// Fresh nodes for the eight children of [`PARENT`].
pub fn octant_nodes<S: FieldSampler>(world: &VoxelWorld<S>) -> Vec<WorldNode> {
  PARENT
    .children()
    .map(|keys| keys.into_iter().map(|key| world.make_node(key)).collect())
    .unwrap_or_default()
}

/// Borrow nodes as a `process_queue` batch.
pub fn as_batch(nodes: &mut [WorldNode]) -> Vec<&mut WorldNode> {
  nodes.iter_mut().collect()
}

/// A generator already bound to `world`.
pub fn bound_generator<S: FieldSampler>(
  world: &Arc<VoxelWorld<S>>,
) -> ChunkGenerator<VoxelWorld<S>> {
  let mut generator = ChunkGenerator::new();
  generator
    .init(Arc::clone(world))
    .expect("thread pool should build");
  generator
}

/// Run one pass over `nodes`, panicking on invalid invocation.
pub fn run_pass<S: FieldSampler>(
  generator: &mut ChunkGenerator<VoxelWorld<S>>,
  nodes: &mut [WorldNode],
) -> super::types::PassReport {
  let mut batch = as_batch(nodes);
  generator
    .process_queue(&mut batch)
    .expect("batch should be valid")
}

/// Collects the messages of `WARN` events emitted on the current thread.
#[derive(Clone, Default)]
pub struct WarnCapture {
  messages: Arc<Mutex<Vec<String>>>,
}

impl WarnCapture {
  /// Run `f` with this capture installed as the thread's subscriber.
  pub fn run<R>(&self, f: impl FnOnce() -> R) -> R {
    let subscriber = tracing_subscriber::registry().with(self.clone());
    tracing::subscriber::with_default(subscriber, f)
  }

  pub fn count(&self, message: &str) -> usize {
    self
      .messages
      .lock()
      .unwrap()
      .iter()
      .filter(|m| m.as_str() == message)
      .count()
  }
}

struct MessageVisitor(String);

impl Visit for MessageVisitor {
  fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
    if field.name() == "message" {
      self.0 = format!("{value:?}");
    }
  }
}

impl<S: Subscriber> Layer<S> for WarnCapture {
  fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
    if *event.metadata().level() != Level::WARN {
      return;
    }
    let mut visitor = MessageVisitor(String::new());
    event.record(&mut visitor);
    self.messages.lock().unwrap().push(visitor.0);
  }
}
