use glam::Vec3;

use super::*;
use crate::arena::ArenaSet;
use crate::config::GeneratorConfig;
use crate::constants::{CELLS_PER_AXIS, SAMPLE_SIZE_CB};
use crate::error::ChunkError;
use crate::field::FieldSampler;
use crate::sdf_samplers::{ConstantSampler, PlaneSampler, SphereSampler};
use crate::types::MeshTopology;

fn chunk_at(origin: Vec3) -> Chunk {
  Chunk::new(ChunkId(1), OctreeNode::new(0, 0, 0, 0), origin, 1.0)
}

/// Sphere of radius 5 centered in the chunk.
fn sphere() -> SphereSampler {
  SphereSampler::new(5.0).with_center(Vec3::splat(7.5))
}

#[test]
fn test_samples_detect_surface() {
  let mut arenas = ArenaSet::new(4);
  let pass = arenas.begin_pass();

  let mut chunk = chunk_at(Vec3::ZERO);
  chunk.generate_samples(&pass, &sphere()).unwrap();
  assert!(chunk.contains_surface());
  assert_eq!(chunk.held_blocks(), 2);

  let field = chunk.field().unwrap();
  let signs = chunk.signs().unwrap();
  for i in 0..SAMPLE_SIZE_CB {
    assert_eq!(signs.is_inside(i), field.values[i] < 0.0, "sample {i}");
  }

  let mut empty = chunk_at(Vec3::ZERO);
  empty.generate_samples(&pass, &ConstantSampler::all_air()).unwrap();
  assert!(!empty.contains_surface());

  chunk.release_blocks(&pass);
  empty.release_blocks(&pass);
  assert_eq!(pass.outstanding(), 0);
}

#[test]
fn test_dual_vertices_stay_in_their_cells() {
  let mut arenas = ArenaSet::new(4);
  let pass = arenas.begin_pass();

  let origin = Vec3::new(-2.0, 1.0, 0.5);
  let mut chunk = chunk_at(origin);
  let field = SphereSampler::new(5.0).with_center(origin + Vec3::splat(7.5));
  chunk.generate_samples(&pass, &field).unwrap();
  chunk.generate_dual_vertices(&pass).unwrap();

  let vi = chunk.vertex_info().unwrap();
  let cells = chunk.active_cells().unwrap();
  assert!(!cells.cells.is_empty());
  assert_eq!(vi.vertices.len(), cells.cells.len());

  for (i, (vertex, record)) in vi.vertices.iter().zip(&cells.cells).enumerate() {
    let min = origin + Vec3::from(record.coord.map(f32::from));
    let local = vertex.position - min;
    let inside_cell = local.cmpge(Vec3::splat(-1e-4)).all() && local.cmple(Vec3::splat(1.0 + 1e-4)).all();
    assert!(inside_cell, "vertex {i}: {local:?}");
    assert!(cell::is_active(record.corner_mask));
    assert!((vertex.normal.length() - 1.0).abs() < 1e-4);
  }

  chunk.release_blocks(&pass);
}

#[test]
fn test_dual_vertices_refuse_samples_from_another_pass() {
  let mut arenas = ArenaSet::new(4);
  let mut chunk = chunk_at(Vec3::ZERO);

  let first = {
    let pass = arenas.begin_pass();
    chunk.generate_samples(&pass, &sphere()).unwrap();
    pass.id()
  };

  let pass = arenas.begin_pass();
  let err = chunk.generate_dual_vertices(&pass).unwrap_err();
  assert_eq!(
    err,
    ChunkError::StaleSamples {
      expected: pass.id().0,
      found: first.0,
    }
  );
  assert!(chunk.vertex_info().is_none());
  chunk.release_blocks(&pass);
}

#[test]
fn test_dual_vertices_require_samples() {
  let mut arenas = ArenaSet::new(4);
  let pass = arenas.begin_pass();
  let mut chunk = chunk_at(Vec3::ZERO);

  assert_eq!(chunk.generate_dual_vertices(&pass), Err(ChunkError::MissingSamples));
}

#[test]
fn test_no_surface_takes_no_extraction_blocks() {
  let mut arenas = ArenaSet::new(4);
  let pass = arenas.begin_pass();
  let mut chunk = chunk_at(Vec3::ZERO);

  chunk.generate_samples(&pass, &ConstantSampler::all_solid()).unwrap();
  chunk.generate_dual_vertices(&pass).unwrap();
  chunk.generate_base_mesh().unwrap();

  assert!(chunk.vertex_info().is_none());
  assert!(!chunk.contains_mesh());
  assert!(chunk.generate_octree().root_is_leaf());
  chunk.release_blocks(&pass);
}

#[test]
fn test_base_mesh_faces_toward_air() {
  let mut arenas = ArenaSet::new(4);
  let pass = arenas.begin_pass();
  let mut chunk = chunk_at(Vec3::ZERO);

  chunk.generate_samples(&pass, &PlaneSampler::ground(7.5)).unwrap();
  chunk.generate_dual_vertices(&pass).unwrap();
  chunk.generate_base_mesh().unwrap();
  assert!(chunk.contains_mesh());

  let (vertices, indices) = chunk.mesh().unwrap();
  let interior = CELLS_PER_AXIS - 1;
  assert_eq!(indices.len(), interior * interior * 4);

  for quad in indices.chunks_exact(4) {
    let [a, b, c, _] = [quad[0], quad[1], quad[2], quad[3]].map(|i| vertices[i as usize].position);
    let n = (b - a).cross(c - a);
    assert!(n.y > 0.0, "quad {quad:?} faces {n:?}");
  }

  chunk.release_blocks(&pass);
}

#[test]
fn test_base_mesh_winding_flips_for_inverted_field() {
  let mut arenas = ArenaSet::new(4);
  let pass = arenas.begin_pass();
  let mut chunk = chunk_at(Vec3::ZERO);

  // Solid above, air below.
  let ceiling = PlaneSampler::new(Vec3::new(0.0, 7.5, 0.0), -Vec3::Y);
  chunk.generate_samples(&pass, &ceiling).unwrap();
  chunk.generate_dual_vertices(&pass).unwrap();
  chunk.generate_base_mesh().unwrap();

  let (vertices, indices) = chunk.mesh().unwrap();
  for quad in indices.chunks_exact(4) {
    let [a, b, c, _] = [quad[0], quad[1], quad[2], quad[3]].map(|i| vertices[i as usize].position);
    assert!((b - a).cross(c - a).y < 0.0);
  }

  chunk.release_blocks(&pass);
}

#[test]
fn test_octree_from_surface_is_branch() {
  let mut arenas = ArenaSet::new(4);
  let pass = arenas.begin_pass();
  let mut chunk = chunk_at(Vec3::ZERO);

  chunk.generate_samples(&pass, &sphere()).unwrap();
  chunk.generate_dual_vertices(&pass).unwrap();
  let vertex_count = chunk.vertex_info().unwrap().vertices.len();

  let octree = chunk.generate_octree();
  assert!(!octree.root_is_leaf());
  assert_eq!(octree.vertex_leaf_count(), vertex_count);

  chunk.release_blocks(&pass);
}

#[test]
fn test_zero_iterations_keep_base_mesh() {
  let mut arenas = ArenaSet::new(4);
  let pass = arenas.begin_pass();
  let mut chunk = chunk_at(Vec3::ZERO);
  let field = sphere();

  chunk.generate_samples(&pass, &field).unwrap();
  chunk.generate_dual_vertices(&pass).unwrap();
  chunk.generate_base_mesh().unwrap();
  let (v, i) = chunk.mesh().unwrap();
  let (base_v, base_i) = (v.to_vec(), i.to_vec());

  chunk.optimize_mesh(&GeneratorConfig::default().with_process_iters(0), &field);

  let (v, i) = chunk.mesh().unwrap();
  assert_eq!(v, base_v.as_slice());
  assert_eq!(i, base_i.as_slice());
  assert_eq!(i.len() % 4, 0);

  chunk.release_blocks(&pass);
}

#[test]
fn test_optimize_topologies() {
  let field = sphere();

  for (topology, sides) in [(MeshTopology::Triangles, 3), (MeshTopology::Quads, 4)] {
    let mut arenas = ArenaSet::new(4);
    let pass = arenas.begin_pass();
    let mut chunk = chunk_at(Vec3::ZERO);

    chunk.generate_samples(&pass, &field).unwrap();
    chunk.generate_dual_vertices(&pass).unwrap();
    chunk.generate_base_mesh().unwrap();
    let base_quads = chunk.mesh().unwrap().1.len() / 4;

    let config = GeneratorConfig::default().with_topology(topology).with_process_iters(2);
    chunk.optimize_mesh(&config, &field);

    let (vertices, indices) = chunk.mesh().unwrap();
    assert!(chunk.contains_mesh());
    assert_eq!(indices.len() % sides, 0, "{topology:?}");
    match topology {
      MeshTopology::Triangles => assert_eq!(indices.len() / 3, base_quads * 2),
      MeshTopology::Quads => assert_eq!(indices.len() / 4, base_quads),
    }
    for v in vertices {
      assert!(field.sample(v.position).abs() < 0.05, "{:?}", v.position);
    }

    chunk.release_blocks(&pass);
  }
}

#[test]
fn test_release_returns_every_lease() {
  let mut arenas = ArenaSet::new(4);
  let pass = arenas.begin_pass();
  let mut chunk = chunk_at(Vec3::ZERO);

  chunk.generate_samples(&pass, &sphere()).unwrap();
  chunk.generate_dual_vertices(&pass).unwrap();
  assert_eq!(chunk.held_blocks(), 5);
  assert_eq!(pass.outstanding(), 5);

  chunk.release_blocks(&pass);
  assert_eq!(chunk.held_blocks(), 0);
  assert_eq!(pass.outstanding(), 0);
}
