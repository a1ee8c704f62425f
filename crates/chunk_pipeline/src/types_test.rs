use super::*;

#[test]
fn test_topology_sides() {
  assert_eq!(MeshTopology::Triangles.sides(), 3);
  assert_eq!(MeshTopology::Quads.sides(), 4);
  assert_eq!(MeshTopology::default(), MeshTopology::Triangles);
}

#[test]
fn test_aabb_encapsulate() {
  let mut aabb = MinMaxAABB::empty();
  aabb.encapsulate([1.0, 2.0, 3.0]);
  aabb.encapsulate([-1.0, -2.0, -3.0]);

  assert_eq!(aabb.min, [-1.0, -2.0, -3.0]);
  assert_eq!(aabb.max, [1.0, 2.0, 3.0]);
  assert!(aabb.is_valid());
}

#[test]
fn test_empty_aabb_is_invalid() {
  assert!(!MinMaxAABB::empty().is_valid());
  assert!(!MinMaxAABB::default().is_valid());
}

#[test]
fn test_vertex_default_points_up() {
  let v = Vertex::default();
  assert_eq!(v.position, Vec3::ZERO);
  assert_eq!(v.normal, Vec3::Y);
}
