//! ChunkGenerator - runs one batch of nodes through every stage.
//!
//! # Usage
//!
//! ```ignore
//! let world = Arc::new(VoxelWorld::new(octree_config, generator_config, sampler));
//! let mut generator = ChunkGenerator::new();
//! generator.init(Arc::clone(&world))?;
//!
//! let mut nodes: Vec<WorldNode> = keys.into_iter().map(|k| world.make_node(k)).collect();
//! let mut batch: Vec<&mut WorldNode> = nodes.iter_mut().collect();
//! let report = generator.process_queue(&mut batch)?;
//!
//! // Every node is now NeedsUpload; upload and acknowledge:
//! for node in &mut nodes {
//!     upload(node.chunk.as_ref().map(|c| c.formatted()));
//!     node.mark_uploaded();
//! }
//! ```

use std::sync::atomic::Ordering;
use std::sync::Arc;

use rayon::prelude::*;
use rayon::ThreadPool;
use web_time::Instant;

use super::format::{MeshFormatter, PackedFormatter};
use super::predicate::update_still_needed;
use super::stitch::SeamStitcher;
use super::types::{NodeFailure, NodeStatus, PassReport, StageKind, StageTimings};
use crate::arena::ArenaSet;
use crate::error::{ChunkError, GeneratorError};
use crate::metrics::GeneratorMetrics;
use crate::world::{ChunkTree, GenerationStage, NodeFlags, WorldNode};

/// Which nodes a stage visits.
#[derive(Clone, Copy, PartialEq, Eq)]
enum StageScope {
  Active,
  All,
}

/// Drives batches of nodes through extraction, optimization and formatting.
///
/// Unbound until [`ChunkGenerator::init`] hands it a tree. Owns its worker
/// pool and arena pools; dropping it raises the tree's shutdown flag.
pub struct ChunkGenerator<T: ChunkTree> {
  tree: Option<Arc<T>>,
  pool: Option<ThreadPool>,
  arenas: ArenaSet,
  stitcher: SeamStitcher,
  formatter: Box<dyn MeshFormatter>,
  metrics: GeneratorMetrics,
}

impl<T: ChunkTree> ChunkGenerator<T> {
  pub fn new() -> Self {
    Self {
      tree: None,
      pool: None,
      arenas: ArenaSet::new(0),
      stitcher: SeamStitcher::new(),
      formatter: Box::new(PackedFormatter),
      metrics: GeneratorMetrics::default(),
    }
  }

  /// Replace the format stage.
  pub fn with_formatter(mut self, formatter: impl MeshFormatter + 'static) -> Self {
    self.formatter = Box::new(formatter);
    self
  }

  /// Bind to `tree`: size the arena pools and worker pool from its
  /// properties, initialize the stitcher and clear the tree's shutdown flag.
  pub fn init(&mut self, tree: Arc<T>) -> Result<(), GeneratorError> {
    let properties = tree.properties();
    let pool = rayon::ThreadPoolBuilder::new()
      .num_threads(properties.worker_threads)
      .thread_name(|i| format!("chunk-stage-{i}"))
      .build()
      .map_err(|e| GeneratorError::ThreadPool(e.to_string()))?;

    self.arenas = ArenaSet::new(properties.arena_capacity);
    self.pool = Some(pool);
    self.stitcher.init();
    tree.generator_shutdown().store(false, Ordering::Release);
    self.tree = Some(tree);
    Ok(())
  }

  pub fn tree(&self) -> Option<&Arc<T>> {
    self.tree.as_ref()
  }

  pub fn is_initialized(&self) -> bool {
    self.tree.is_some()
  }

  pub fn stitcher(&self) -> &SeamStitcher {
    &self.stitcher
  }

  pub fn arenas(&self) -> &ArenaSet {
    &self.arenas
  }

  pub fn metrics(&self) -> &GeneratorMetrics {
    &self.metrics
  }

  /// Run every stage over `batch`.
  ///
  /// Per-node failures do not abort the pass: the node skips its remaining
  /// stages, ends up with an empty mesh and is listed in the report. Every
  /// batch member leaves as `NeedsUpload`.
  #[tracing::instrument(skip_all, fields(nodes = batch.len()))]
  pub fn process_queue(
    &mut self,
    batch: &mut [&mut WorldNode],
  ) -> Result<PassReport, GeneratorError> {
    let (Some(tree), Some(pool)) = (self.tree.clone(), self.pool.as_ref()) else {
      return Err(GeneratorError::NotInitialized);
    };
    if batch.is_empty() {
      return Err(GeneratorError::EmptyBatch);
    }

    let total_start = Instant::now();
    let tree = tree.as_ref();
    let config = tree.properties();
    let mut timings = StageTimings::default();
    let mut failures = Vec::new();

    // 1. Chunk creation, serialized under the tree's chunk lock.
    {
      let _span = tracing::info_span!("create_chunks").entered();
      let start = Instant::now();
      let mut registry = tree.lock_chunks();
      for node in batch.iter_mut() {
        if node.chunk.is_none() {
          tree.create_chunk(&mut registry, node);
        }
      }
      timings.create_us = start.elapsed().as_micros() as u64;
    }

    // 2. Pass setup.
    let pass = self.arenas.begin_pass();
    let mut statuses: Vec<NodeStatus> = batch
      .iter()
      .map(|node| {
        let eligible = node.stage() == GenerationStage::Generating && node.chunk.is_some();
        if eligible && update_still_needed(tree, node, config.regeneration) {
          NodeStatus::Active
        } else {
          NodeStatus::Retained
        }
      })
      .collect();

    // 3. Samples.
    let sampler = tree.sampler();
    let us = run_stage(
      pool,
      batch,
      &mut statuses,
      StageKind::Samples,
      StageScope::Active,
      &mut failures,
      |node, _| match node.chunk.as_mut() {
        Some(chunk) => chunk.generate_samples(&pass, sampler),
        None => Ok(()),
      },
    );
    timings.set_stage_us(StageKind::Samples, us);

    // 4. Dual vertices.
    let us = run_stage(
      pool,
      batch,
      &mut statuses,
      StageKind::DualVertices,
      StageScope::Active,
      &mut failures,
      |node, _| match node.chunk.as_mut() {
        Some(chunk) => chunk.generate_dual_vertices(&pass),
        None => Ok(()),
      },
    );
    timings.set_stage_us(StageKind::DualVertices, us);

    // 5. Sub-octrees.
    let us = run_stage(
      pool,
      batch,
      &mut statuses,
      StageKind::SubOctree,
      StageScope::Active,
      &mut failures,
      |node, _| {
        let Some(chunk) = node.chunk.as_mut() else {
          return Ok(());
        };
        match chunk.generate_octree().root_children() {
          Some(children) => {
            node.children = children.map(Some);
            node.leaf = false;
          }
          None => {
            node.children = [None; 8];
            node.leaf = true;
          }
        }
        Ok(())
      },
    );
    timings.set_stage_us(StageKind::SubOctree, us);
    for (node, status) in batch.iter().zip(&statuses) {
      if *status == NodeStatus::Active && node.leaf {
        tracing::warn!(node = ?node.key, "sub-octree root is a leaf, child slots left unset");
      }
    }

    // 6. Base mesh + optimization.
    let us = run_stage(
      pool,
      batch,
      &mut statuses,
      StageKind::Mesh,
      StageScope::Active,
      &mut failures,
      |node, _| {
        let Some(chunk) = node.chunk.as_mut() else {
          return Ok(());
        };
        chunk.generate_base_mesh()?;
        chunk.optimize_mesh(config, sampler);
        Ok(())
      },
    );
    timings.set_stage_us(StageKind::Mesh, us);

    // 7. Format, for every node.
    let formatter = self.formatter.as_ref();
    let gpu = tree.gpu_allocator();
    let us = run_stage(
      pool,
      batch,
      &mut statuses,
      StageKind::Format,
      StageScope::All,
      &mut failures,
      |node, status| {
        if let Some(chunk) = node.chunk.as_mut() {
          chunk.set_retain_output(status == NodeStatus::Retained);
          if matches!(status, NodeStatus::Failed(_)) {
            chunk.discard_mesh();
          }
        }
        formatter.format(node, gpu).map_err(ChunkError::from)
      },
    );
    timings.set_stage_us(StageKind::Format, us);

    // 8. Teardown.
    for node in batch.iter_mut() {
      if let Some(chunk) = node.chunk.as_mut() {
        chunk.release_blocks(&pass);
      }
    }
    let pass_id = pass.id();
    drop(pass);

    // 9. Hand everything to upload.
    let mut meshes = 0;
    let mut retained = 0;
    for (node, status) in batch.iter_mut().zip(&statuses) {
      match status {
        NodeStatus::Active => {
          if let Some(chunk) = node.chunk.as_mut() {
            chunk.finish_pass();
            if !chunk.formatted().is_empty() {
              meshes += 1;
            }
          }
          node.flags.remove(NodeFlags::DIRTY);
        }
        NodeStatus::Retained => {
          retained += 1;
          if let Some(chunk) = node.chunk.as_mut() {
            chunk.set_retain_output(false);
          }
        }
        NodeStatus::Failed(_) => {}
      }
      node.set_stage(GenerationStage::NeedsUpload);
    }

    timings.total_us = total_start.elapsed().as_micros() as u64;
    tracing::debug!(
      pass = pass_id.0,
      create_us = timings.create_us,
      samples_us = timings.samples_us,
      dual_vertices_us = timings.dual_vertices_us,
      sub_octree_us = timings.sub_octree_us,
      mesh_us = timings.mesh_us,
      format_us = timings.format_us,
      total_us = timings.total_us,
      meshes,
      retained,
      failed = failures.len(),
      "pass complete"
    );

    let report = PassReport {
      pass: pass_id,
      nodes: batch.len(),
      meshes,
      retained,
      failures,
      timings,
    };
    self.metrics.record_pass(&report);
    Ok(report)
  }
}

impl<T: ChunkTree> Default for ChunkGenerator<T> {
  fn default() -> Self {
    Self::new()
  }
}

impl<T: ChunkTree> Drop for ChunkGenerator<T> {
  fn drop(&mut self) {
    if let Some(tree) = self.tree.as_ref() {
      tree.generator_shutdown().store(true, Ordering::Release);
    }
  }
}

/// Run `f` over the nodes in `scope` in parallel and record failures.
///
/// The collect at the end is the stage barrier. Returns elapsed microseconds.
fn run_stage<F>(
  pool: &ThreadPool,
  batch: &mut [&mut WorldNode],
  statuses: &mut [NodeStatus],
  stage: StageKind,
  scope: StageScope,
  failures: &mut Vec<NodeFailure>,
  f: F,
) -> u64
where
  F: Fn(&mut WorldNode, NodeStatus) -> Result<(), ChunkError> + Sync,
{
  let _span = tracing::info_span!("stage", stage = stage.name()).entered();
  let start = Instant::now();

  let errors: Vec<(usize, ChunkError)> = pool.install(|| {
    batch
      .par_iter_mut()
      .zip(statuses.par_iter_mut())
      .enumerate()
      .filter_map(|(i, (node, status))| {
        if scope == StageScope::Active && *status != NodeStatus::Active {
          return None;
        }
        match f(&mut **node, *status) {
          Ok(()) => None,
          Err(error) => {
            *status = NodeStatus::Failed(stage);
            Some((i, error))
          }
        }
      })
      .collect()
  });

  for (i, error) in errors {
    let node = batch[i].key;
    tracing::warn!(?node, stage = stage.name(), %error, "chunk stage failed");
    failures.push(NodeFailure { node, stage, error });
  }

  start.elapsed().as_micros() as u64
}

#[cfg(test)]
#[path = "generator_test.rs"]
mod generator_test;
