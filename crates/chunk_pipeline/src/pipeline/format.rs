//! Format stage: turn a chunk's mesh buffers into its upload-ready mesh.

use crate::error::GpuError;
use crate::gpu::{GpuAllocator, GpuVertex};
use crate::world::WorldNode;

/// Prepares a node's chunk output for upload.
///
/// Called once per batch member and pass, whatever the node's status. A
/// chunk flagged to retain its output keeps the previous formatted mesh.
pub trait MeshFormatter: Send + Sync {
  fn format(&self, node: &mut WorldNode, gpu: &GpuAllocator) -> Result<(), GpuError>;
}

/// Packs vertices into [`GpuVertex`] and copies indices verbatim.
///
/// The previous mesh (and its budget) is released first, so a chunk without a
/// mesh this pass ends up empty.
#[derive(Clone, Copy, Debug, Default)]
pub struct PackedFormatter;

impl MeshFormatter for PackedFormatter {
  fn format(&self, node: &mut WorldNode, gpu: &GpuAllocator) -> Result<(), GpuError> {
    let Some(chunk) = node.chunk.as_mut() else {
      return Ok(());
    };
    if chunk.retain_output() {
      return Ok(());
    }

    let (mesh, sides, out) = chunk.format_parts();
    out.clear(gpu);

    let Some(vi) = mesh else {
      return Ok(());
    };
    if vi.mesh_indexes.is_empty() {
      return Ok(());
    }

    let allocation = gpu.reserve(vi.vertices.len(), vi.mesh_indexes.len())?;

    out.vertices.reserve(vi.vertices.len());
    for vertex in &vi.vertices {
      out.bounds.encapsulate(vertex.position.to_array());
      out.vertices.push(GpuVertex::from(vertex));
    }
    out.indices.extend_from_slice(&vi.mesh_indexes);
    out.sides = sides;
    out.set_allocation(allocation);
    Ok(())
  }
}
