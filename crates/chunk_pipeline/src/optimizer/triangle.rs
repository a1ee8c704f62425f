//! Triangle optimizer.

use super::poly::PolyMesh;
use super::MeshOptimizer;
use crate::config::OptimizerSettings;
use crate::field::FieldSampler;
use crate::types::Vertex;

/// Optimizer over triangle faces (3 indices per face).
pub struct TriangleOptimizer<'s> {
  mesh: PolyMesh<'s>,
}

impl<'s> TriangleOptimizer<'s> {
  pub fn new(settings: OptimizerSettings, voxel_size: f32, field_normals: bool) -> Self {
    Self {
      mesh: PolyMesh::new(3, settings, voxel_size, field_normals),
    }
  }
}

impl<'s> MeshOptimizer<'s> for TriangleOptimizer<'s> {
  fn init(&mut self, vertices: &[Vertex], indices: &[u32], sampler: &'s dyn FieldSampler) {
    self.mesh.init(vertices, indices, sampler);
  }

  fn optimize_dual_grid(&mut self, iterations: u32) {
    self.mesh.optimize_dual_grid(iterations);
  }

  fn optimize_primal_grid(&mut self, sharpen: bool, smooth: bool) {
    self.mesh.optimize_primal_grid(sharpen, smooth);
  }

  fn flush(&mut self, vertices: &mut Vec<Vertex>, indices: &mut Vec<u32>) {
    self.mesh.flush(vertices, indices);
  }

  fn sides(&self) -> usize {
    self.mesh.sides()
  }
}
