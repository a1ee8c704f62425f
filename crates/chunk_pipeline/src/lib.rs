//! chunk_pipeline - Multi-stage voxel chunk generation
//!
//! Turns batches of octree nodes into upload-ready meshes. Each node owns a
//! chunk of 16³ field samples (15³ cells) and goes through:
//!
//! - **Samples**: field values plus bit-packed inside/outside signs
//! - **Dual vertices**: one surface-nets vertex per active cell
//! - **Sub-octree**: a small octree over the active cells
//! - **Base mesh**: one quad per sign-changing sample edge
//! - **Optimization**: dual/primal grid relaxation onto the isosurface, in
//!   quad or triangle topology
//! - **Format**: packed GPU vertices within a shared budget
//!
//! Per-pass scratch memory comes from bounded arena pools and is returned
//! when the pass ends.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use chunk_pipeline::{ChunkGenerator, GeneratorConfig, OctreeConfig, OctreeNode, VoxelWorld};
//! use chunk_pipeline::sdf_samplers::SphereSampler;
//!
//! let world = Arc::new(VoxelWorld::new(
//!     OctreeConfig::default(),
//!     GeneratorConfig::default(),
//!     SphereSampler::new(20.0),
//! ));
//! let mut generator = ChunkGenerator::new();
//! generator.init(Arc::clone(&world))?;
//!
//! let mut node = world.make_node(OctreeNode::new(0, 0, 0, 0));
//! let report = generator.process_queue(&mut [&mut node])?;
//!
//! let mesh = node.chunk.as_ref().unwrap().formatted();
//! println!("{} faces in {}us", mesh.face_count(), report.timings.total_us);
//! ```

pub mod constants;
pub mod error;
pub mod types;

// Re-export commonly used items
pub use constants::{
  coord_to_index, index_to_coord, CELLS_PER_AXIS, CORNER_OFFSETS, NO_VERTEX, SAMPLE_SIZE,
  SAMPLE_SIZE_CB, SAMPLE_SIZE_SQ,
};
pub use error::{ArenaError, ChunkError, GeneratorError, GpuError};
pub use types::{MeshTopology, MinMaxAABB, Vertex};

// Configuration
pub mod config;
pub use config::{GeneratorConfig, OptimizerSettings, RegenerationPolicy};

// Field sampling collaborator and analytic fields
pub mod field;
pub mod sdf_samplers;
pub use field::FieldSampler;

// Pass-scoped block pools
pub mod arena;
pub use arena::{ArenaSet, PassArenas, PassId};

// Per-node extraction state
pub mod chunk;
pub use chunk::{Chunk, ChunkId, SubOctree};

// Mesh optimization
pub mod optimizer;
pub use optimizer::{MeshOptimizer, QuadOptimizer, TriangleOptimizer};

// GPU budget and packed output
pub mod gpu;
pub use gpu::{FormattedMesh, GpuAllocator, GpuVertex};

// Outer tree keys and coordinate mapping
pub mod octree;
pub use octree::{OctreeConfig, OctreeNode};

// Tree collaborator
pub mod world;
pub use world::{ChunkTree, GenerationStage, NodeFlags, VoxelWorld, WorldId, WorldNode};

// Generation pipeline
pub mod pipeline;
pub use pipeline::{ChunkGenerator, GenerationWorker, PassReport};

// Engine-agnostic metrics collection
pub mod metrics;
