//! Chunk: per-node extraction state.
//!
//! A chunk is owned by its world node and carries everything the per-node
//! stages produce:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────────┐
//! │ samples        BinaryBlock (signs) + FloatBlock (values)    [lease]  │
//! │ dual vertices  CellBlock + IndexBlock + VertexInfoBlock     [lease]  │
//! │ sub-octree     SubOctree                                   [owned]  │
//! │ base mesh      VertexInfoBlock::mesh_indexes (quads)        [lease]  │
//! │ optimized      VertexInfoBlock vertices + indices           [lease]  │
//! │ formatted      FormattedMesh                               [owned]  │
//! └──────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Leases live for one pass: they are taken by the extraction stages and
//! returned by [`Chunk::release_blocks`] after formatting. Only the
//! sub-octree and the formatted mesh survive between passes.

mod base_mesh;
pub mod cell;
mod dual_vertices;
mod samples;
pub mod sub_octree;

use glam::Vec3;
pub use sub_octree::{CellId, CellKind, OctreeCell, SubOctree};

use crate::arena::{
  BinaryBlock, Block, CellBlock, FloatBlock, IndexBlock, Lease, PassArenas, VertexInfoBlock,
};
use crate::gpu::FormattedMesh;
use crate::octree::OctreeNode;

/// Identifier issued by the tree when a chunk is created.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkId(pub u64);

pub struct Chunk {
  id: ChunkId,
  node: OctreeNode,
  origin: Vec3,
  voxel_size: f32,

  binary: Option<Lease<BinaryBlock>>,
  field: Option<Lease<FloatBlock>>,
  cells: Option<Lease<CellBlock>>,
  indexes: Option<Lease<IndexBlock>>,
  vertex_info: Option<Lease<VertexInfoBlock>>,

  octree: SubOctree,
  contains_surface: bool,
  contains_mesh: bool,
  mesh_sides: usize,
  retain_output: bool,
  formatted: FormattedMesh,
  generation: u32,
}

impl Chunk {
  /// `origin` is the world position of sample (0, 0, 0); samples are spaced
  /// `voxel_size` apart.
  pub fn new(id: ChunkId, node: OctreeNode, origin: Vec3, voxel_size: f32) -> Self {
    Self {
      id,
      node,
      origin,
      voxel_size,
      binary: None,
      field: None,
      cells: None,
      indexes: None,
      vertex_info: None,
      octree: SubOctree::new(),
      contains_surface: false,
      contains_mesh: false,
      mesh_sides: 4,
      retain_output: false,
      formatted: FormattedMesh::default(),
      generation: 0,
    }
  }

  pub fn id(&self) -> ChunkId {
    self.id
  }

  pub fn node(&self) -> OctreeNode {
    self.node
  }

  pub fn origin(&self) -> Vec3 {
    self.origin
  }

  pub fn voxel_size(&self) -> f32 {
    self.voxel_size
  }

  /// The sampled field has both inside and outside samples.
  pub fn contains_surface(&self) -> bool {
    self.contains_surface
  }

  /// The current mesh buffers hold at least one face.
  pub fn contains_mesh(&self) -> bool {
    self.contains_mesh
  }

  /// Indices per face of the current mesh buffers: 4 for the base mesh,
  /// then whatever the optimizer emitted.
  pub fn mesh_sides(&self) -> usize {
    self.mesh_sides
  }

  pub fn octree(&self) -> &SubOctree {
    &self.octree
  }

  pub fn formatted(&self) -> &FormattedMesh {
    &self.formatted
  }

  /// Completed passes. Zero until the chunk is first formatted.
  pub fn generation(&self) -> u32 {
    self.generation
  }

  pub fn field(&self) -> Option<&FloatBlock> {
    self.field.as_deref()
  }

  pub fn signs(&self) -> Option<&BinaryBlock> {
    self.binary.as_deref()
  }

  pub fn active_cells(&self) -> Option<&CellBlock> {
    self.cells.as_deref()
  }

  pub fn vertex_info(&self) -> Option<&VertexInfoBlock> {
    self.vertex_info.as_deref()
  }

  /// Mesh buffers (vertices, indices) if this pass produced any.
  pub fn mesh(&self) -> Option<(&[crate::types::Vertex], &[u32])> {
    self
      .vertex_info
      .as_deref()
      .map(|vi| (vi.vertices.as_slice(), vi.mesh_indexes.as_slice()))
  }

  /// Mesh buffers (when this pass produced a mesh), their face size, and
  /// the formatted output to write.
  pub(crate) fn format_parts(&mut self) -> (Option<&VertexInfoBlock>, usize, &mut FormattedMesh) {
    let mesh = match self.contains_mesh {
      true => self.vertex_info.as_deref(),
      false => None,
    };
    (mesh, self.mesh_sides, &mut self.formatted)
  }

  /// Keep the previous formatted mesh for this pass.
  pub(crate) fn set_retain_output(&mut self, retain: bool) {
    self.retain_output = retain;
  }

  pub(crate) fn retain_output(&self) -> bool {
    self.retain_output
  }

  /// Drop any mesh produced this pass (used when a stage fails).
  pub(crate) fn discard_mesh(&mut self) {
    self.contains_mesh = false;
    if let Some(vi) = self.vertex_info.as_deref_mut() {
      vi.vertices.clear();
      vi.mesh_indexes.clear();
    }
  }

  pub(crate) fn finish_pass(&mut self) {
    self.generation = self.generation.wrapping_add(1).max(1);
    self.retain_output = false;
  }

  /// Rebuild the sub-octree from this pass's active cells. A chunk without
  /// active cells gets a single-leaf tree.
  pub fn generate_octree(&mut self) -> &SubOctree {
    match self.cells.as_deref() {
      Some(cells) => self.octree.build(&cells.cells),
      None => self.octree.build(&[]),
    }
    &self.octree
  }

  /// Return every lease to its pool.
  pub fn release_blocks(&mut self, arenas: &PassArenas<'_>) {
    release(arenas, &mut self.binary);
    release(arenas, &mut self.field);
    release(arenas, &mut self.cells);
    release(arenas, &mut self.indexes);
    release(arenas, &mut self.vertex_info);
  }

  /// Leases currently held.
  pub fn held_blocks(&self) -> usize {
    self.binary.is_some() as usize
      + self.field.is_some() as usize
      + self.cells.is_some() as usize
      + self.indexes.is_some() as usize
      + self.vertex_info.is_some() as usize
  }
}

impl std::fmt::Debug for Chunk {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Chunk")
      .field("id", &self.id)
      .field("node", &self.node)
      .field("contains_surface", &self.contains_surface)
      .field("contains_mesh", &self.contains_mesh)
      .field("generation", &self.generation)
      .field("held_blocks", &self.held_blocks())
      .finish()
  }
}

#[inline]
fn release<B: Block>(arenas: &PassArenas<'_>, slot: &mut Option<Lease<B>>) {
  if let Some(lease) = slot.take() {
    arenas.release(lease);
  }
}

#[cfg(test)]
#[path = "chunk_test.rs"]
mod chunk_test;
