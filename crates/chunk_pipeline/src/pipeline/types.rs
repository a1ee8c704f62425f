//! Pipeline types: per-node status, stage identifiers and pass reports.

use crate::arena::PassId;
use crate::error::ChunkError;
use crate::octree::OctreeNode;

/// Per-node stages of a pass, in execution order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StageKind {
  Samples,
  DualVertices,
  SubOctree,
  Mesh,
  Format,
}

impl StageKind {
  pub const ALL: [StageKind; 5] = [
    StageKind::Samples,
    StageKind::DualVertices,
    StageKind::SubOctree,
    StageKind::Mesh,
    StageKind::Format,
  ];

  pub fn name(self) -> &'static str {
    match self {
      StageKind::Samples => "samples",
      StageKind::DualVertices => "dual_vertices",
      StageKind::SubOctree => "sub_octree",
      StageKind::Mesh => "mesh",
      StageKind::Format => "format",
    }
  }
}

/// Where a node stands within the current pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NodeStatus {
  /// Runs every remaining stage.
  #[default]
  Active,
  /// Skips the per-node stages and keeps its previous output.
  Retained,
  /// A stage failed; later stages skip the node and its mesh is empty.
  Failed(StageKind),
}

/// A node-level failure recorded during a pass.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NodeFailure {
  pub node: OctreeNode,
  pub stage: StageKind,
  pub error: ChunkError,
}

/// Wall time per stage of one pass, in microseconds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StageTimings {
  pub create_us: u64,
  pub samples_us: u64,
  pub dual_vertices_us: u64,
  pub sub_octree_us: u64,
  pub mesh_us: u64,
  pub format_us: u64,
  pub total_us: u64,
}

impl StageTimings {
  pub fn stage_us(&self, stage: StageKind) -> u64 {
    match stage {
      StageKind::Samples => self.samples_us,
      StageKind::DualVertices => self.dual_vertices_us,
      StageKind::SubOctree => self.sub_octree_us,
      StageKind::Mesh => self.mesh_us,
      StageKind::Format => self.format_us,
    }
  }

  pub(crate) fn set_stage_us(&mut self, stage: StageKind, us: u64) {
    match stage {
      StageKind::Samples => self.samples_us = us,
      StageKind::DualVertices => self.dual_vertices_us = us,
      StageKind::SubOctree => self.sub_octree_us = us,
      StageKind::Mesh => self.mesh_us = us,
      StageKind::Format => self.format_us = us,
    }
  }
}

/// Outcome of one `process_queue` call.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PassReport {
  pub pass: PassId,
  /// Nodes in the batch.
  pub nodes: usize,
  /// Nodes that ended the pass with a non-empty formatted mesh produced
  /// this pass.
  pub meshes: usize,
  /// Nodes that kept their previous output.
  pub retained: usize,
  pub failures: Vec<NodeFailure>,
  pub timings: StageTimings,
}

impl PassReport {
  pub fn failed(&self) -> usize {
    self.failures.len()
  }

  pub fn is_clean(&self) -> bool {
    self.failures.is_empty()
  }
}
