//! Node position model for the outer space-partitioning tree.
//!
//! Nodes are addressed by grid coordinates at their own LOD. Parent/child
//! relationships are pure coordinate math; the tree collaborator decides
//! which nodes exist and which are split.
//!
//! # LOD Convention
//!
//! LOD 0 = finest detail (smallest nodes), higher LOD = coarser.
//!
//! ```text
//! Node Size = VOXELS_PER_NODE * voxel_size * 2^LOD
//!           = 15 * voxel_size * 2^LOD
//! ```
//!
//! A node's 16 samples per axis span its 15 cells, so neighbouring nodes at
//! the same LOD share their boundary sample planes.

pub mod config;
pub mod node;

pub use config::OctreeConfig;
pub use node::OctreeNode;
