//! Dual-vertex extraction: one vertex per active cell.

use glam::Vec3A;

use super::{cell, Chunk};
use crate::arena::{CellBlock, CellRecord, IndexBlock, PassArenas, VertexInfoBlock};
use crate::constants::{coord_to_index, CELLS_PER_AXIS, CORNER_OFFSETS};
use crate::error::ChunkError;
use crate::types::Vertex;

impl Chunk {
  /// Place a vertex in every cell whose corners disagree in sign.
  ///
  /// The vertex sits at the centroid of the cell's edge crossings and its
  /// normal is the cell's stencil gradient. Cells are visited in index order
  /// and entry `i` of the cell block owns vertex `i`.
  ///
  /// Refuses samples that were leased in another pass. Chunks without
  /// surface take no blocks and produce no vertices.
  pub fn generate_dual_vertices(&mut self, arenas: &PassArenas<'_>) -> Result<(), ChunkError> {
    let (Some(field), Some(binary)) = (self.field.as_ref(), self.binary.as_ref()) else {
      return Err(ChunkError::MissingSamples);
    };
    for pass in [field.pass(), binary.pass()] {
      if pass != arenas.id() {
        return Err(ChunkError::StaleSamples {
          expected: arenas.id().0,
          found: pass.0,
        });
      }
    }

    if !self.contains_surface {
      return Ok(());
    }

    let mut vi = arenas.acquire::<VertexInfoBlock>()?;
    let mut cells = match arenas.acquire::<CellBlock>() {
      Ok(cells) => cells,
      Err(e) => {
        arenas.release(vi);
        return Err(e.into());
      }
    };
    let mut indexes = match arenas.acquire::<IndexBlock>() {
      Ok(indexes) => indexes,
      Err(e) => {
        arenas.release(vi);
        arenas.release(cells);
        return Err(e.into());
      }
    };

    let origin = Vec3A::from(self.origin);
    let voxel_size = self.voxel_size;

    for x in 0..CELLS_PER_AXIS {
      for y in 0..CELLS_PER_AXIS {
        for z in 0..CELLS_PER_AXIS {
          let base = coord_to_index(x, y, z);

          let mask = cell::corner_mask(|corner| binary.is_inside(base + CORNER_OFFSETS[corner]));
          if !cell::is_active(mask) {
            continue;
          }

          let samples: [f32; 8] = CORNER_OFFSETS.map(|offset| field.values[base + offset]);
          let local = cell::vertex_position(&samples);
          let position = origin + (Vec3A::new(x as f32, y as f32, z as f32) + local) * voxel_size;
          let normal = cell::gradient_normal(&samples);

          indexes.vertex_of[base] = vi.vertices.len() as u32;
          vi.vertices.push(Vertex::new(position.into(), normal.into()));
          cells.cells.push(CellRecord {
            coord: [x as u8, y as u8, z as u8],
            corner_mask: mask,
          });
        }
      }
    }

    self.vertex_info = Some(vi);
    self.cells = Some(cells);
    self.indexes = Some(indexes);
    Ok(())
  }
}
