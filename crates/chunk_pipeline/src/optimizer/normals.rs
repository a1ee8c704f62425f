//! Geometry normals for triangle and quad meshes.
//!
//! Uses Thürmer & Wüthrich's "Mean Weighted by Angle": each face contributes
//! its unit normal to a vertex weighted by the interior angle at that
//! vertex. Quads contribute as the two triangles of their (a, b, c) /
//! (a, c, d) fan.

use glam::Vec3;

use crate::types::Vertex;

/// Recompute `vertices[*].normal` from the faces in `indices`.
///
/// Vertices not referenced by any non-degenerate face get +Y.
pub fn angle_weighted(vertices: &mut [Vertex], indices: &[u32], sides: usize) {
  for vertex in vertices.iter_mut() {
    vertex.normal = Vec3::ZERO;
  }

  if sides >= 3 {
    for face in indices.chunks_exact(sides) {
      for k in 1..sides - 1 {
        accumulate_triangle(vertices, [face[0], face[k], face[k + 1]]);
      }
    }
  }

  for vertex in vertices.iter_mut() {
    vertex.normal = vertex.normal.try_normalize().unwrap_or(Vec3::Y);
  }
}

fn accumulate_triangle(vertices: &mut [Vertex], tri: [u32; 3]) {
  let [i0, i1, i2] = tri.map(|i| i as usize);
  if i0.max(i1).max(i2) >= vertices.len() {
    return;
  }

  let p0 = vertices[i0].position;
  let p1 = vertices[i1].position;
  let p2 = vertices[i2].position;

  let e01 = p1 - p0;
  let e02 = p2 - p0;
  let e12 = p2 - p1;

  let Some(face_normal) = e01.cross(e02).try_normalize() else {
    return;
  };

  vertices[i0].normal += face_normal * vertex_angle(e01, e02);
  vertices[i1].normal += face_normal * vertex_angle(-e01, e12);
  vertices[i2].normal += face_normal * vertex_angle(-e02, -e12);
}

/// Angle between two edge vectors, in radians.
#[inline]
fn vertex_angle(a: Vec3, b: Vec3) -> f32 {
  let len_sq = a.length_squared() * b.length_squared();
  if len_sq < 1e-24 {
    return 0.0;
  }
  (a.dot(b) / len_sq.sqrt()).clamp(-1.0, 1.0).acos()
}

/// Unit normal of a planar or near-planar polygon (Newell's method).
pub fn polygon_normal(face: &[u32], positions: &[Vec3]) -> Vec3 {
  let mut normal = Vec3::ZERO;
  for (k, &i) in face.iter().enumerate() {
    let a = positions[i as usize];
    let b = positions[face[(k + 1) % face.len()] as usize];
    normal += Vec3::new(
      (a.y - b.y) * (a.z + b.z),
      (a.z - b.z) * (a.x + b.x),
      (a.x - b.x) * (a.y + b.y),
    );
  }
  normal.normalize_or_zero()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn flat_triangle_points_up() {
    let mut vertices = vec![
      Vertex::new(Vec3::ZERO, Vec3::ZERO),
      Vertex::new(Vec3::Z, Vec3::ZERO),
      Vertex::new(Vec3::X, Vec3::ZERO),
    ];
    angle_weighted(&mut vertices, &[0, 1, 2], 3);

    for v in &vertices {
      assert!((v.normal - Vec3::Y).length() < 1e-5, "{:?}", v.normal);
    }
  }

  #[test]
  fn quad_matches_polygon_normal() {
    let positions = [Vec3::ZERO, Vec3::X, Vec3::new(1.0, 1.0, 0.0), Vec3::Y];
    let mut vertices: Vec<Vertex> = positions.iter().map(|&p| Vertex::new(p, Vec3::ZERO)).collect();
    angle_weighted(&mut vertices, &[0, 1, 2, 3], 4);

    let expected = polygon_normal(&[0, 1, 2, 3], &positions);
    assert!((expected - Vec3::Z).length() < 1e-6);
    for v in &vertices {
      assert!((v.normal - expected).length() < 1e-5);
    }
  }

  #[test]
  fn degenerate_faces_fall_back_to_up() {
    let mut vertices = vec![Vertex::new(Vec3::ZERO, Vec3::ZERO); 3];
    angle_weighted(&mut vertices, &[0, 1, 2], 3);
    assert!(vertices.iter().all(|v| v.normal == Vec3::Y));
  }
}
