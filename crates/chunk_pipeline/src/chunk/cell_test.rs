use super::*;

#[test]
fn test_corner_positions_match_bit_layout() {
  for (i, p) in CORNER_POSITIONS.iter().enumerate() {
    assert_eq!(p.x, (i & 1) as f32, "corner {i} x");
    assert_eq!(p.y, ((i >> 1) & 1) as f32, "corner {i} y");
    assert_eq!(p.z, ((i >> 2) & 1) as f32, "corner {i} z");
  }
}

#[test]
fn test_cube_edges_are_axis_aligned() {
  for &[c0, c1] in &CUBE_EDGES {
    let diff = (c0 ^ c1) as u32;
    assert_eq!(diff.count_ones(), 1, "edge {c0}-{c1} must differ in one axis");
  }
}

fn sign_mask(samples: &[f32; 8]) -> u8 {
  corner_mask(|corner| samples[corner] < 0.0)
}

#[test]
fn test_corner_mask() {
  let samples = [-1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, -0.5];
  assert_eq!(sign_mask(&samples), 0b1000_0001);
  assert!(is_active(sign_mask(&samples)));

  assert_eq!(sign_mask(&[1.0; 8]), 0);
  assert!(!is_active(0));
  assert_eq!(sign_mask(&[-1.0; 8]), 0xFF);
  assert!(!is_active(0xFF));
}

#[test]
fn test_zero_counts_as_outside() {
  let samples = [0.0, -1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0];
  assert_eq!(sign_mask(&samples), 0b10);
}

#[test]
fn test_vertex_position_interpolates_crossings() {
  // Corner 0 at -3, rest at +1: crossings at t = 0.75 on edges 0, 1, 2.
  let samples = [-3.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0];
  let pos = vertex_position(&samples);

  assert!((pos.x - 0.25).abs() < 1e-5);
  assert!((pos.y - 0.25).abs() < 1e-5);
  assert!((pos.z - 0.25).abs() < 1e-5);
}

#[test]
fn test_vertex_position_half_solid() {
  let samples = [-1.0, -1.0, -1.0, -1.0, 1.0, 1.0, 1.0, 1.0];
  let pos = vertex_position(&samples);

  assert!((pos.z - 0.5).abs() < 1e-5);
  assert!((pos.x - 0.5).abs() < 1e-5);
  assert!((pos.y - 0.5).abs() < 1e-5);
}

#[test]
fn test_vertex_position_fallback() {
  assert_eq!(vertex_position(&[1.0; 8]), Vec3A::splat(0.5));
}

#[test]
fn test_gradient_normal_axes() {
  let x = gradient_normal(&[-1.0, 1.0, -1.0, 1.0, -1.0, 1.0, -1.0, 1.0]);
  assert!((x - Vec3A::X).length() < 1e-5);

  let y = gradient_normal(&[-1.0, -1.0, 1.0, 1.0, -1.0, -1.0, 1.0, 1.0]);
  assert!((y - Vec3A::Y).length() < 1e-5);

  let z = gradient_normal(&[-1.0, -1.0, -1.0, -1.0, 1.0, 1.0, 1.0, 1.0]);
  assert!((z - Vec3A::Z).length() < 1e-5);
}

#[test]
fn test_gradient_normal_degenerate() {
  assert_eq!(gradient_normal(&[0.0; 8]), Vec3A::Y);
}
