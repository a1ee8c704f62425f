//! WorldNode - a node of the outer tree as seen by the generator.

use std::fmt;

use crate::chunk::{CellId, Chunk};
use crate::octree::OctreeNode;

/// Where a node is in its generate → upload cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum GenerationStage {
  /// Waiting for, or inside, a `process_queue` pass. Never uploaded.
  #[default]
  Generating,
  /// Every stage ran; the formatted mesh is ready to upload.
  NeedsUpload,
  /// The upload collaborator acknowledged the mesh.
  Uploaded,
}

/// Node state bits.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct NodeFlags(u8);

impl NodeFlags {
  /// The node has been split into children.
  pub const SPLIT: NodeFlags = NodeFlags(1 << 0);
  /// Node content changed; the next pass must regenerate it.
  pub const DIRTY: NodeFlags = NodeFlags(1 << 1);

  pub const fn empty() -> Self {
    NodeFlags(0)
  }

  #[inline]
  pub const fn contains(self, other: NodeFlags) -> bool {
    self.0 & other.0 == other.0
  }

  #[inline]
  pub fn insert(&mut self, other: NodeFlags) {
    self.0 |= other.0;
  }

  #[inline]
  pub fn remove(&mut self, other: NodeFlags) {
    self.0 &= !other.0;
  }

  pub const fn bits(self) -> u8 {
    self.0
  }
}

impl fmt::Debug for NodeFlags {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let mut set = f.debug_set();
    if self.contains(Self::SPLIT) {
      set.entry(&"SPLIT");
    }
    if self.contains(Self::DIRTY) {
      set.entry(&"DIRTY");
    }
    set.finish()
  }
}

/// A tree node handed to the generator in a batch.
#[derive(Debug)]
pub struct WorldNode {
  pub key: OctreeNode,
  pub parent: Option<OctreeNode>,
  pub flags: NodeFlags,
  /// Cleared when the chunk's sub-octree root is a branch.
  pub leaf: bool,
  /// Sub-octree child slots, filled from the chunk's root branch.
  pub children: [Option<CellId>; 8],
  pub chunk: Option<Chunk>,
  stage: GenerationStage,
}

impl WorldNode {
  pub fn new(key: OctreeNode, parent: Option<OctreeNode>) -> Self {
    Self {
      key,
      parent,
      flags: NodeFlags::empty(),
      leaf: true,
      children: [None; 8],
      chunk: None,
      stage: GenerationStage::Generating,
    }
  }

  pub fn stage(&self) -> GenerationStage {
    self.stage
  }

  pub(crate) fn set_stage(&mut self, stage: GenerationStage) {
    self.stage = stage;
  }

  /// Upload acknowledgement: `NeedsUpload → Uploaded`. Returns false (and
  /// leaves the stage alone) from any other stage.
  pub fn mark_uploaded(&mut self) -> bool {
    if self.stage != GenerationStage::NeedsUpload {
      return false;
    }
    self.stage = GenerationStage::Uploaded;
    true
  }

  /// Queue the node again without marking it dirty. Under a split-aware
  /// policy it may keep its previous output.
  pub fn requeue(&mut self) {
    self.stage = GenerationStage::Generating;
  }

  /// Queue the node for regeneration and mark it dirty.
  pub fn request_generation(&mut self) {
    self.stage = GenerationStage::Generating;
    self.flags.insert(NodeFlags::DIRTY);
  }

  pub fn is_dirty(&self) -> bool {
    self.flags.contains(NodeFlags::DIRTY)
  }

  /// Formatted triangle/quad count of this node's chunk (zero without one).
  pub fn face_count(&self) -> usize {
    self.chunk.as_ref().map_or(0, |c| c.formatted().face_count())
  }
}
