//! Base mesh extraction and optimization.
//!
//! # Quad Emission
//!
//! Every sample edge with a sign change is shared by four cells. Their four
//! vertices form one quad. Edges are visited from the cell at their lower
//! endpoint, so each is seen once:
//!
//! ```text
//!  X edge at (x,y,z): cells (x, y-1, z-1) (x, y, z-1) (x, y, z) (x, y-1, z)
//!  Y edge at (x,y,z): cells (x-1, y, z-1) (x-1, y, z) (x, y, z) (x, y, z-1)
//!  Z edge at (x,y,z): cells (x-1, y-1, z) (x, y-1, z) (x, y, z) (x-1, y, z)
//! ```
//!
//! The order above faces +axis. It is kept when the lower endpoint is inside
//! (field increases along the edge) and reversed otherwise, so every quad
//! faces toward positive field.

use super::Chunk;
use crate::config::GeneratorConfig;
use crate::constants::{coord_to_index, CELLS_PER_AXIS};
use crate::error::ChunkError;
use crate::field::FieldSampler;
use crate::optimizer::{MeshOptimizer, QuadOptimizer, TriangleOptimizer};
use crate::types::MeshTopology;

/// Sample step along each edge axis.
const AXIS_STEP: [[usize; 3]; 3] = [[1, 0, 0], [0, 1, 0], [0, 0, 1]];

impl Chunk {
  /// Build the base quad mesh from the dual vertices.
  ///
  /// Clears the index buffer first; sets `contains_mesh` when at least one
  /// quad was emitted. Requires dual-vertex extraction to have run this pass.
  pub fn generate_base_mesh(&mut self) -> Result<(), ChunkError> {
    self.contains_mesh = false;

    let (Some(vi), Some(cells), Some(indexes), Some(binary)) = (
      self.vertex_info.as_deref_mut(),
      self.cells.as_deref(),
      self.indexes.as_deref(),
      self.binary.as_deref(),
    ) else {
      // No surface: nothing was extracted.
      return Ok(());
    };

    vi.mesh_indexes.clear();
    self.mesh_sides = 4;
    let last = CELLS_PER_AXIS - 1;

    for record in &cells.cells {
      let [x, y, z] = record.coord.map(usize::from);
      let lower = coord_to_index(x, y, z);
      let lower_inside = binary.is_inside(lower);

      for (axis, step) in AXIS_STEP.iter().enumerate() {
        let upper = coord_to_index(x + step[0], y + step[1], z + step[2]);
        if binary.is_inside(upper) == lower_inside {
          continue;
        }

        let quad_cells = match axis {
          0 if (1..=last).contains(&y) && (1..=last).contains(&z) => [
            (x, y - 1, z - 1),
            (x, y, z - 1),
            (x, y, z),
            (x, y - 1, z),
          ],
          1 if (1..=last).contains(&x) && (1..=last).contains(&z) => [
            (x - 1, y, z - 1),
            (x - 1, y, z),
            (x, y, z),
            (x, y, z - 1),
          ],
          2 if (1..=last).contains(&x) && (1..=last).contains(&y) => [
            (x - 1, y - 1, z),
            (x, y - 1, z),
            (x, y, z),
            (x - 1, y, z),
          ],
          _ => continue,
        };

        let mut quad = [0u32; 4];
        let mut complete = true;
        for (slot, &(cx, cy, cz)) in quad.iter_mut().zip(&quad_cells) {
          match indexes.get(coord_to_index(cx, cy, cz)) {
            Some(v) => *slot = v,
            None => complete = false,
          }
        }
        if !complete {
          continue;
        }

        if !lower_inside {
          quad.reverse();
        }
        vi.mesh_indexes.extend_from_slice(&quad);
      }
    }

    self.contains_mesh = !vi.mesh_indexes.is_empty();
    Ok(())
  }

  /// Optimize the base mesh in place.
  ///
  /// Skipped when `process_iters` is zero, when there is no mesh, or when
  /// either buffer is empty. Output topology follows `config.topology`.
  pub fn optimize_mesh(&mut self, config: &GeneratorConfig, sampler: &dyn FieldSampler) {
    let iters = config.process_iters;
    if iters == 0 || !self.contains_mesh {
      return;
    }
    let Some(vi) = self.vertex_info.as_deref_mut() else {
      return;
    };
    if vi.vertices.is_empty() || vi.mesh_indexes.is_empty() {
      return;
    }

    let settings = config.optimizer;
    let field_normals = config.smooth_normals;

    let mut quads = QuadOptimizer::new(settings, self.voxel_size, field_normals);
    quads.init(&vi.vertices, &vi.mesh_indexes, sampler);

    match config.topology {
      MeshTopology::Triangles => {
        vi.vertices.clear();
        vi.mesh_indexes.clear();
        quads.flush_to_triangles(&mut vi.vertices, &mut vi.mesh_indexes);

        let mut tris = TriangleOptimizer::new(settings, self.voxel_size, field_normals);
        tris.init(&vi.vertices, &vi.mesh_indexes, sampler);
        tris.optimize_dual_grid(iters);
        tris.optimize_primal_grid(false, false);
        vi.vertices.clear();
        vi.mesh_indexes.clear();
        tris.flush(&mut vi.vertices, &mut vi.mesh_indexes);
        self.mesh_sides = 3;
      }
      MeshTopology::Quads => {
        quads.optimize_dual_grid(iters);
        quads.optimize_primal_grid(false, false);
        vi.vertices.clear();
        vi.mesh_indexes.clear();
        quads.flush(&mut vi.vertices, &mut vi.mesh_indexes);
      }
    }

    self.contains_mesh = !vi.mesh_indexes.is_empty();
  }
}
