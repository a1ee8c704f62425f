//! Recomputation avoidance.

use crate::config::RegenerationPolicy;
use crate::world::{ChunkTree, WorldNode};

/// Whether `node` must be regenerated this pass.
///
/// Under [`RegenerationPolicy::Always`] every node is. Under
/// [`RegenerationPolicy::SplitAware`] a node with previous output that is
/// not dirty and whose parent is split is only regenerated while that parent
/// still needs to be split for the current focus. Once the parent no longer
/// needs it the children are on their way out and keep what they have.
pub fn update_still_needed<T: ChunkTree + ?Sized>(
  tree: &T,
  node: &WorldNode,
  policy: RegenerationPolicy,
) -> bool {
  if policy == RegenerationPolicy::Always {
    return true;
  }

  let Some(chunk) = node.chunk.as_ref() else {
    return true;
  };
  if chunk.generation() == 0 || node.is_dirty() {
    return true;
  }

  let Some(parent) = node.parent else {
    return true;
  };
  if !tree.is_split(&parent) {
    return true;
  }

  tree.node_needs_split(tree.focus_position(), &parent)
}
