//! Generator configuration.
//!
//! Plain structs with `Default` and `with_*` builders. The tree collaborator
//! owns a `GeneratorConfig` and exposes it through `ChunkTree::properties`.

use crate::types::MeshTopology;

/// Whether retained nodes may skip regeneration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RegenerationPolicy {
  /// Every node in a batch is regenerated.
  #[default]
  Always,

  /// Skip children of a split parent that no longer needs to be split.
  /// Nodes without output yet, dirty nodes and roots are always regenerated.
  SplitAware,
}

/// Tuning for the mesh optimizer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OptimizerSettings {
  /// Newton steps used to project a point onto the isosurface.
  pub projection_steps: u32,

  /// Pull toward the current position in the vertex QEF solve
  /// (relative to the number of planes).
  pub regularization: f32,

  /// Maximum vertex displacement per dual iteration, in voxels.
  pub max_step: f32,

  /// Face normal spread (degrees) above which a vertex counts as a feature
  /// when sharpening.
  pub feature_angle_degrees: f32,

  /// Laplacian smoothing weight in [0, 1] used by primal smoothing.
  pub smoothing_factor: f32,
}

impl Default for OptimizerSettings {
  fn default() -> Self {
    Self {
      projection_steps: 4,
      regularization: 0.1,
      max_step: 0.5,
      feature_angle_degrees: 30.0,
      smoothing_factor: 0.5,
    }
  }
}

impl OptimizerSettings {
  pub fn with_projection_steps(mut self, steps: u32) -> Self {
    self.projection_steps = steps;
    self
  }

  pub fn with_regularization(mut self, regularization: f32) -> Self {
    self.regularization = regularization;
    self
  }

  pub fn with_max_step(mut self, max_step: f32) -> Self {
    self.max_step = max_step;
    self
  }

  pub fn with_feature_angle_degrees(mut self, degrees: f32) -> Self {
    self.feature_angle_degrees = degrees;
    self
  }

  pub fn with_smoothing_factor(mut self, factor: f32) -> Self {
    self.smoothing_factor = factor.clamp(0.0, 1.0);
    self
  }
}

/// Configuration for chunk generation.
#[derive(Clone, Debug, PartialEq)]
pub struct GeneratorConfig {
  /// Dual grid iterations per chunk. Zero disables optimization entirely.
  pub process_iters: u32,

  /// Polygon layout of the optimized mesh.
  pub topology: MeshTopology,

  /// Use field-gradient normals at flush instead of geometry normals.
  pub smooth_normals: bool,

  /// Blocks per arena pool (upper bound on chunks in flight per pass).
  pub arena_capacity: usize,

  /// Worker threads for the generator pool. Zero uses rayon's default.
  pub worker_threads: usize,

  /// Recomputation-avoidance policy.
  pub regeneration: RegenerationPolicy,

  /// Optimizer tuning.
  pub optimizer: OptimizerSettings,

  /// Total GPU vertex budget shared by all chunks.
  pub gpu_vertex_budget: usize,

  /// Total GPU index budget shared by all chunks.
  pub gpu_index_budget: usize,
}

impl Default for GeneratorConfig {
  fn default() -> Self {
    Self {
      process_iters: 2,
      topology: MeshTopology::Triangles,
      smooth_normals: true,
      arena_capacity: 512,
      worker_threads: 0,
      regeneration: RegenerationPolicy::Always,
      optimizer: OptimizerSettings::default(),
      gpu_vertex_budget: 16 * 1024 * 1024,
      gpu_index_budget: 64 * 1024 * 1024,
    }
  }
}

impl GeneratorConfig {
  pub fn with_process_iters(mut self, iters: u32) -> Self {
    self.process_iters = iters;
    self
  }

  pub fn with_topology(mut self, topology: MeshTopology) -> Self {
    self.topology = topology;
    self
  }

  pub fn with_smooth_normals(mut self, smooth: bool) -> Self {
    self.smooth_normals = smooth;
    self
  }

  pub fn with_arena_capacity(mut self, capacity: usize) -> Self {
    self.arena_capacity = capacity;
    self
  }

  pub fn with_worker_threads(mut self, threads: usize) -> Self {
    self.worker_threads = threads;
    self
  }

  pub fn with_regeneration(mut self, policy: RegenerationPolicy) -> Self {
    self.regeneration = policy;
    self
  }

  pub fn with_optimizer(mut self, settings: OptimizerSettings) -> Self {
    self.optimizer = settings;
    self
  }

  pub fn with_gpu_budget(mut self, vertices: usize, indices: usize) -> Self {
    self.gpu_vertex_budget = vertices;
    self.gpu_index_budget = indices;
    self
  }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;
