//! GPU-side collaborator: upload budget and packed mesh buffers.
//!
//! The real upload path lives outside the crate. The pipeline only needs to
//! reserve room in a shared budget and leave a ready-to-copy byte layout on
//! each node.

use std::sync::atomic::{AtomicUsize, Ordering};

use bytemuck::{Pod, Zeroable};

use crate::error::GpuError;
use crate::types::{MinMaxAABB, Vertex};

/// Packed vertex as uploaded.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct GpuVertex {
  pub position: [f32; 3],
  pub normal: [f32; 3],
}

impl From<&Vertex> for GpuVertex {
  fn from(v: &Vertex) -> Self {
    Self {
      position: v.position.to_array(),
      normal: v.normal.to_array(),
    }
  }
}

/// Budget slice held by one formatted mesh. Returned through
/// [`GpuAllocator::release`].
#[derive(Debug, PartialEq, Eq)]
pub struct GpuAllocation {
  vertices: usize,
  indices: usize,
}

impl GpuAllocation {
  pub fn vertices(&self) -> usize {
    self.vertices
  }

  pub fn indices(&self) -> usize {
    self.indices
  }
}

/// Shared vertex/index budget. Thread-safe; reservations never exceed the
/// budget.
#[derive(Debug)]
pub struct GpuAllocator {
  vertex_budget: usize,
  index_budget: usize,
  used_vertices: AtomicUsize,
  used_indices: AtomicUsize,
}

impl GpuAllocator {
  pub fn new(vertex_budget: usize, index_budget: usize) -> Self {
    Self {
      vertex_budget,
      index_budget,
      used_vertices: AtomicUsize::new(0),
      used_indices: AtomicUsize::new(0),
    }
  }

  pub fn reserve(&self, vertices: usize, indices: usize) -> Result<GpuAllocation, GpuError> {
    let exceeded = |used_v: usize, used_i: usize| GpuError::BudgetExceeded {
      requested_vertices: vertices,
      requested_indices: indices,
      available_vertices: self.vertex_budget.saturating_sub(used_v),
      available_indices: self.index_budget.saturating_sub(used_i),
    };

    let budget = self.vertex_budget;
    self
      .used_vertices
      .fetch_update(Ordering::AcqRel, Ordering::Acquire, |used| {
        used.checked_add(vertices).filter(|&n| n <= budget)
      })
      .map_err(|used_v| exceeded(used_v, self.used_indices()))?;

    let budget = self.index_budget;
    if let Err(used_i) = self
      .used_indices
      .fetch_update(Ordering::AcqRel, Ordering::Acquire, |used| {
        used.checked_add(indices).filter(|&n| n <= budget)
      })
    {
      self.used_vertices.fetch_sub(vertices, Ordering::AcqRel);
      return Err(exceeded(self.used_vertices(), used_i));
    }

    Ok(GpuAllocation { vertices, indices })
  }

  pub fn release(&self, allocation: GpuAllocation) {
    self
      .used_vertices
      .fetch_sub(allocation.vertices, Ordering::AcqRel);
    self.used_indices.fetch_sub(allocation.indices, Ordering::AcqRel);
  }

  pub fn used_vertices(&self) -> usize {
    self.used_vertices.load(Ordering::Acquire)
  }

  pub fn used_indices(&self) -> usize {
    self.used_indices.load(Ordering::Acquire)
  }

  pub fn vertex_budget(&self) -> usize {
    self.vertex_budget
  }

  pub fn index_budget(&self) -> usize {
    self.index_budget
  }
}

/// Upload-ready mesh for one node.
#[derive(Debug, Default)]
pub struct FormattedMesh {
  pub vertices: Vec<GpuVertex>,
  pub indices: Vec<u32>,
  /// Indices per face (3 or 4). Zero for an empty mesh.
  pub sides: usize,
  pub bounds: MinMaxAABB,
  allocation: Option<GpuAllocation>,
}

impl FormattedMesh {
  pub fn is_empty(&self) -> bool {
    self.indices.is_empty()
  }

  pub fn vertex_count(&self) -> usize {
    self.vertices.len()
  }

  pub fn index_count(&self) -> usize {
    self.indices.len()
  }

  pub fn face_count(&self) -> usize {
    match self.sides {
      0 => 0,
      s => self.indices.len() / s,
    }
  }

  pub fn vertex_bytes(&self) -> &[u8] {
    bytemuck::cast_slice(&self.vertices)
  }

  pub fn index_bytes(&self) -> &[u8] {
    bytemuck::cast_slice(&self.indices)
  }

  pub fn allocation(&self) -> Option<&GpuAllocation> {
    self.allocation.as_ref()
  }

  pub(crate) fn set_allocation(&mut self, allocation: GpuAllocation) {
    self.allocation = Some(allocation);
  }

  /// Empty the mesh and hand its budget back.
  pub fn clear(&mut self, gpu: &GpuAllocator) {
    if let Some(allocation) = self.allocation.take() {
      gpu.release(allocation);
    }
    self.vertices.clear();
    self.indices.clear();
    self.sides = 0;
    self.bounds = MinMaxAABB::empty();
  }
}
