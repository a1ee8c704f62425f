//! Mesh optimization: dual/primal grid relaxation against the field.
//!
//! # Flow
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  init(vertices, indices, sampler)                                 │
//! │    copy positions + faces, build vertex → face adjacency          │
//! ├───────────────────────────────────────────────────────────────────┤
//! │  optimize_dual_grid(iters)        (per iteration)                 │
//! │    1. project every face centroid onto the isosurface             │
//! │    2. move every vertex to the QEF point of its faces' planes     │
//! ├───────────────────────────────────────────────────────────────────┤
//! │  optimize_primal_grid(sharpen, smooth)                            │
//! │    optional tangential smoothing → projection → optional sharpen  │
//! ├───────────────────────────────────────────────────────────────────┤
//! │  flush / flush_to_triangles                                       │
//! │    compact in first-use order, write normals, drop state          │
//! └───────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Two concrete optimizers share one polygon core and differ only in face
//! size: [`QuadOptimizer`] (4 indices per face, also flattens to triangles)
//! and [`TriangleOptimizer`] (3 indices per face).
//!
//! Every loop runs sequentially in a fixed order, so the same input always
//! produces bit-identical output.

mod poly;
pub mod normals;
mod quad;
mod triangle;

pub use quad::QuadOptimizer;
pub use triangle::TriangleOptimizer;

use crate::field::FieldSampler;
use crate::types::Vertex;

/// Common optimizer interface.
///
/// `'s` is the lifetime of the field sampler borrowed by `init`.
pub trait MeshOptimizer<'s> {
  /// Load a mesh. Trailing indices that do not form a whole face are
  /// ignored.
  fn init(&mut self, vertices: &[Vertex], indices: &[u32], sampler: &'s dyn FieldSampler);

  /// Run `iterations` dual grid passes. Topology is unchanged.
  fn optimize_dual_grid(&mut self, iterations: u32);

  /// Run one primal grid pass.
  fn optimize_primal_grid(&mut self, sharpen: bool, smooth: bool);

  /// Write the mesh out (both buffers are cleared first) and discard state.
  fn flush(&mut self, vertices: &mut Vec<Vertex>, indices: &mut Vec<u32>);

  /// Indices per face.
  fn sides(&self) -> usize;
}
