//! Chunk generation pipeline.
//!
//! One `process_queue` call is one pass over a batch of nodes. Stages run in
//! a fixed order; each is a parallel loop over the batch whose collect is the
//! barrier before the next stage.
//!
//! ```text
//! ┌──────────┐   ┌──────────┐   ┌──────────┐   ┌────────────┐   ┌────────┐   ┌────────┐
//! │  create  ├──►│ samples  ├──►│   dual   ├──►│ sub-octree ├──►│  mesh  ├──►│ format │
//! │ (locked) │   │          │   │ vertices │   │            │   │ + opt  │   │  (all) │
//! └──────────┘   └──────────┘   └──────────┘   └────────────┘   └────────┘   └────────┘
//!      │              │               │               │              │            │
//!  ChunkRegistry  Binary+Float   VertexInfo+     SubOctree +     quads →     FormattedMesh
//!                   leases      Cell+Index       child slots    optimized    → NeedsUpload
//! ```
//!
//! # Node status
//!
//! - `Active`: runs every stage.
//! - `Retained`: skipped by the regeneration predicate (or not `Generating`);
//!   keeps its previous formatted mesh.
//! - `Failed(stage)`: a stage returned an error; remaining stages are skipped
//!   and the node is formatted empty.
//!
//! Every batch member is formatted and leaves the pass as `NeedsUpload`.

pub mod format;
pub mod generator;
pub mod predicate;
pub mod stitch;
pub mod types;
pub mod worker;

// Test utilities
#[cfg(test)]
pub mod test_utils;


// Re-exports
pub use format::{MeshFormatter, PackedFormatter};
pub use generator::ChunkGenerator;
pub use predicate::update_still_needed;
pub use stitch::{SeamStitcher, StitchStage};
pub use types::{NodeFailure, NodeStatus, PassReport, StageKind, StageTimings};
pub use worker::{GenerationWorker, WorkerOutput};
