//! Grid layout constants for 16³ sample chunks.
//!
//! Every chunk samples the field on a 16×16×16 lattice. Adjacent samples form
//! cells, so a chunk has 15 cells per axis. Cells reuse the sample indexing
//! (a cell is addressed by its minimum corner), which keeps every lookup a
//! pair of shifts.
//!
//! # Sample Layout
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Sample index:  0     1     2    ...    13    14    15                  │
//! │                 │     │                        │     │                  │
//! │                 └─────┴──── 15 cells ──────────┴─────┘                  │
//! │                                                                         │
//! │  cell (x,y,z) spans samples x..=x+1, y..=y+1, z..=z+1                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Memory Layout
//!
//! ```text
//! index = x << 8 | y << 4 | z
//!       = x * 256 + y * 16 + z
//! ```
//!
//! Z is innermost, X is outermost.
//!
//! # Corner Order
//!
//! ```text
//! Cell corner indices (binary: ZYX):
//!   0 = (0,0,0)    4 = (0,0,1)
//!   1 = (1,0,0)    5 = (1,0,1)
//!   2 = (0,1,0)    6 = (0,1,1)
//!   3 = (1,1,0)    7 = (1,1,1)
//! ```

/// Number of samples per axis (power of two for shift indexing).
pub const SAMPLE_SIZE: usize = 16;

/// Samples squared (16² = 256)
pub const SAMPLE_SIZE_SQ: usize = SAMPLE_SIZE * SAMPLE_SIZE;

/// Total samples in a chunk (16³ = 4096)
pub const SAMPLE_SIZE_CB: usize = SAMPLE_SIZE * SAMPLE_SIZE * SAMPLE_SIZE;

/// Cells per axis. A cell needs its +1 corner, so the last sample starts none.
pub const CELLS_PER_AXIS: usize = SAMPLE_SIZE - 1;

/// Number of u64 words holding one sign bit per sample.
pub const BINARY_WORDS: usize = SAMPLE_SIZE_CB / 64;

/// Bit shift for Y coordinate indexing (log2(16) = 4)
pub const Y_SHIFT: u32 = 4;

/// Bit shift for X coordinate indexing (log2(256) = 8)
pub const X_SHIFT: u32 = 8;

/// Mask for extracting single axis from index (0xF = 15)
pub const INDEX_MASK: usize = 0xF;

/// Marker for "no vertex" in cell → vertex tables.
pub const NO_VERTEX: u32 = u32::MAX;

/// Convert 3D coordinates to linear index using bit shifts.
///
/// Layout: X is major axis (stride 256), Y is middle (stride 16), Z is minor
/// (stride 1)
#[inline(always)]
pub const fn coord_to_index(x: usize, y: usize, z: usize) -> usize {
  (x << X_SHIFT) | (y << Y_SHIFT) | z
}

/// Convert linear index to 3D coordinates.
#[inline(always)]
pub const fn index_to_coord(idx: usize) -> (usize, usize, usize) {
  let x = idx >> X_SHIFT;
  let y = (idx >> Y_SHIFT) & INDEX_MASK;
  let z = idx & INDEX_MASK;
  (x, y, z)
}

/// Volume index offsets for 8 cube corners relative to base position.
pub const CORNER_OFFSETS: [usize; 8] = [
  0,                                   // (0,0,0)
  1 << X_SHIFT,                        // (1,0,0)
  1 << Y_SHIFT,                        // (0,1,0)
  (1 << X_SHIFT) | (1 << Y_SHIFT),     // (1,1,0)
  1,                                   // (0,0,1)
  (1 << X_SHIFT) | 1,                  // (1,0,1)
  (1 << Y_SHIFT) | 1,                  // (0,1,1)
  (1 << X_SHIFT) | (1 << Y_SHIFT) | 1, // (1,1,1)
];

#[cfg(test)]
#[path = "constants_test.rs"]
mod constants_test;
