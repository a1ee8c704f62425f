//! Per-cell math for dual-vertex placement.
//!
//! A cell is the 2x2x2 sample stencil at its minimum corner. Corner order
//! follows the bit layout used everywhere in the crate:
//!
//! ```text
//! 0: (0,0,0)  4: (0,0,1)
//! 1: (1,0,0)  5: (1,0,1)
//! 2: (0,1,0)  6: (0,1,1)
//! 3: (1,1,0)  7: (1,1,1)
//! ```

use glam::Vec3A;

/// Corner positions within the unit cube, indexed by corner bits.
pub const CORNER_POSITIONS: [Vec3A; 8] = [
  Vec3A::new(0.0, 0.0, 0.0),
  Vec3A::new(1.0, 0.0, 0.0),
  Vec3A::new(0.0, 1.0, 0.0),
  Vec3A::new(1.0, 1.0, 0.0),
  Vec3A::new(0.0, 0.0, 1.0),
  Vec3A::new(1.0, 0.0, 1.0),
  Vec3A::new(0.0, 1.0, 1.0),
  Vec3A::new(1.0, 1.0, 1.0),
];

/// The 12 cube edges as corner pairs.
pub const CUBE_EDGES: [[usize; 2]; 12] = [
  [0, 1],
  [0, 2],
  [0, 4],
  [1, 3],
  [1, 5],
  [2, 3],
  [2, 6],
  [3, 7],
  [4, 5],
  [4, 6],
  [5, 7],
  [6, 7],
];

/// Mask of inside corners: bit `i` is set when corner `i` is inside.
#[inline]
pub fn corner_mask(inside: impl Fn(usize) -> bool) -> u8 {
  (0..8).fold(0u8, |mask, corner| mask | ((inside(corner) as u8) << corner))
}

/// A cell with mixed corner signs contains surface.
#[inline]
pub fn is_active(mask: u8) -> bool {
  mask != 0 && mask != 0xFF
}

/// Vertex position within the unit cell: centroid of edge crossings.
///
/// Falls back to the cell center when no edge crosses.
#[inline]
pub fn vertex_position(samples: &[f32; 8]) -> Vec3A {
  let mut sum = Vec3A::ZERO;
  let mut count = 0u32;

  for &[c0, c1] in &CUBE_EDGES {
    let s0 = samples[c0];
    let s1 = samples[c1];

    if (s0 < 0.0) != (s1 < 0.0) {
      let t = s0 / (s0 - s1);
      let p0 = CORNER_POSITIONS[c0];
      let p1 = CORNER_POSITIONS[c1];
      sum += p0 + t * (p1 - p0);
      count += 1;
    }
  }

  if count == 0 {
    return Vec3A::splat(0.5);
  }

  sum / count as f32
}

/// Unit gradient of the 2x2x2 stencil (points toward positive field).
///
/// Degenerate stencils fall back to +Y.
#[inline]
pub fn gradient_normal(samples: &[f32; 8]) -> Vec3A {
  let gx = (samples[1] + samples[3] + samples[5] + samples[7])
    - (samples[0] + samples[2] + samples[4] + samples[6]);
  let gy = (samples[2] + samples[3] + samples[6] + samples[7])
    - (samples[0] + samples[1] + samples[4] + samples[5]);
  let gz = (samples[4] + samples[5] + samples[6] + samples[7])
    - (samples[0] + samples[1] + samples[2] + samples[3]);

  let gradient = Vec3A::new(gx, gy, gz);
  let len_sq = gradient.length_squared();
  if len_sq < 1e-8 {
    return Vec3A::Y;
  }
  gradient * len_sq.sqrt().recip()
}

#[cfg(test)]
#[path = "cell_test.rs"]
mod cell_test;
