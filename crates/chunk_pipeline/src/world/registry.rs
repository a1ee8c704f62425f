//! Chunk registry - the tree-wide state guarded by the chunk lock.

use std::collections::HashMap;

use crate::chunk::ChunkId;
use crate::octree::OctreeNode;

/// Tracks which nodes own a chunk and issues chunk ids.
///
/// Lives behind the tree's chunk mutex. Holding `&mut ChunkRegistry` is
/// proof the lock is held.
#[derive(Debug, Default)]
pub struct ChunkRegistry {
  next_id: u64,
  chunks: HashMap<OctreeNode, ChunkId>,
}

impl ChunkRegistry {
  pub fn new() -> Self {
    Self::default()
  }

  /// Issue a fresh id for `key`, replacing any previous registration.
  pub fn register(&mut self, key: OctreeNode) -> ChunkId {
    self.next_id += 1;
    let id = ChunkId(self.next_id);
    self.chunks.insert(key, id);
    id
  }

  pub fn get(&self, key: &OctreeNode) -> Option<ChunkId> {
    self.chunks.get(key).copied()
  }

  pub fn len(&self) -> usize {
    self.chunks.len()
  }

  pub fn is_empty(&self) -> bool {
    self.chunks.is_empty()
  }

  /// Total ids issued since creation.
  pub fn issued(&self) -> u64 {
    self.next_id
  }
}
