//! Quad optimizer.

use super::poly::PolyMesh;
use super::MeshOptimizer;
use crate::config::OptimizerSettings;
use crate::field::FieldSampler;
use crate::types::Vertex;

/// Optimizer over quad faces (4 indices per face).
pub struct QuadOptimizer<'s> {
  mesh: PolyMesh<'s>,
}

impl<'s> QuadOptimizer<'s> {
  /// `voxel_size` scales projection and step limits. `field_normals` picks
  /// field-gradient normals over geometry normals at flush.
  pub fn new(settings: OptimizerSettings, voxel_size: f32, field_normals: bool) -> Self {
    Self {
      mesh: PolyMesh::new(4, settings, voxel_size, field_normals),
    }
  }

  /// Flush as triangles: every quad splits along its shorter diagonal,
  /// keeping its orientation. Quads with repeated corners collapse to one
  /// triangle or vanish.
  pub fn flush_to_triangles(&mut self, vertices: &mut Vec<Vertex>, indices: &mut Vec<u32>) {
    let positions = self.mesh.positions();
    let mut triangles = Vec::with_capacity(self.mesh.faces().len() / 4 * 6);

    for quad in self.mesh.faces().chunks_exact(4) {
      let mut corners: [u32; 4] = [quad[0], quad[1], quad[2], quad[3]];
      let mut count = 4;

      // Drop cyclically repeated corners.
      let mut k = 0;
      while k < count && count > 0 {
        if corners[k] == corners[(k + 1) % count] {
          corners.copy_within(k + 1..count, k);
          count -= 1;
        } else {
          k += 1;
        }
      }

      match count {
        4 => {
          let [a, b, c, d] = corners;
          let p = |i: u32| positions[i as usize];
          let ac = p(a).distance_squared(p(c));
          let bd = p(b).distance_squared(p(d));
          if ac <= bd {
            triangles.extend_from_slice(&[a, b, c, a, c, d]);
          } else {
            triangles.extend_from_slice(&[a, b, d, b, c, d]);
          }
        }
        3 => triangles.extend_from_slice(&corners[..3]),
        _ => {}
      }
    }

    self.mesh.emit(&triangles, 3, vertices, indices);
  }

  #[cfg(test)]
  pub(crate) fn positions(&self) -> &[glam::Vec3] {
    self.mesh.positions()
  }
}

impl<'s> MeshOptimizer<'s> for QuadOptimizer<'s> {
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
