use super::*;
use crate::constants::NO_VERTEX;
use crate::error::ArenaError;
use crate::types::Vertex;

#[test]
fn test_pass_ids_increase() {
  let mut set = ArenaSet::new(4);
  assert_eq!(set.last_pass(), PassId(0));

  let first = set.begin_pass().id();
  let second = set.begin_pass().id();
  assert!(second > first);
  assert_eq!(set.last_pass(), second);
}

#[test]
fn test_acquire_release_tracks_outstanding() {
  let mut set = ArenaSet::new(4);
  let pass = set.begin_pass();

  let a = pass.acquire::<FloatBlock>().unwrap();
  let b = pass.acquire::<BinaryBlock>().unwrap();
  assert_eq!(pass.outstanding(), 2);
  assert_eq!(a.pass(), pass.id());

  pass.release(a);
  pass.release(b);
  assert_eq!(pass.outstanding(), 0);
}

#[test]
fn test_exhaustion_is_reported() {
  let mut set = ArenaSet::new(2);
  let pass = set.begin_pass();

  let _a = pass.acquire::<CellBlock>().unwrap();
  let _b = pass.acquire::<CellBlock>().unwrap();
  let err = pass.acquire::<CellBlock>().unwrap_err();

  assert_eq!(
    err,
    ArenaError::Exhausted {
      kind: BlockKind::Cell,
      capacity: 2
    }
  );

  // Other pools are unaffected.
  assert!(pass.acquire::<IndexBlock>().is_ok());
}

#[test]
fn test_released_blocks_are_reused_and_reset() {
  let mut set = ArenaSet::new(1);
  {
    let pass = set.begin_pass();
    let mut vi = pass.acquire::<VertexInfoBlock>().unwrap();
    vi.vertices.push(Vertex::default());
    vi.mesh_indexes.extend_from_slice(&[0, 1, 2, 3]);
    let capacity = vi.mesh_indexes.capacity();
    pass.release(vi);

    let vi = pass.acquire::<VertexInfoBlock>().unwrap();
    assert!(vi.vertices.is_empty());
    assert!(vi.mesh_indexes.is_empty());
    assert_eq!(vi.mesh_indexes.capacity(), capacity);
    pass.release(vi);
  }
  assert_eq!(set.pool::<VertexInfoBlock>().free_blocks(), 1);
}

#[test]
fn test_index_block_resets_to_no_vertex() {
  let mut set = ArenaSet::new(1);
  let pass = set.begin_pass();

  let mut idx = pass.acquire::<IndexBlock>().unwrap();
  assert_eq!(idx.get(0), None);
  idx.vertex_of[0] = 7;
  assert_eq!(idx.get(0), Some(7));
  pass.release(idx);

  let idx = pass.acquire::<IndexBlock>().unwrap();
  assert_eq!(idx.vertex_of[0], NO_VERTEX);
  pass.release(idx);
}

#[test]
fn test_binary_block_bits() {
  let mut set = ArenaSet::new(1);
  let pass = set.begin_pass();
  let mut bits = pass.acquire::<BinaryBlock>().unwrap();

  bits.set_inside(0, true);
  bits.set_inside(63, true);
  bits.set_inside(64, true);
  bits.set_inside(4095, true);
  assert!(bits.is_inside(63));
  assert!(bits.is_inside(64));
  assert!(!bits.is_inside(65));
  assert_eq!(bits.count_inside(), 4);

  bits.set_inside(63, false);
  assert!(!bits.is_inside(63));
  assert_eq!(bits.count_inside(), 3);
  pass.release(bits);
}

#[test]
fn test_leaked_lease_is_written_off() {
  let mut set = ArenaSet::new(1);

  let leaked = {
    let pass = set.begin_pass();
    pass.acquire::<FloatBlock>().unwrap()
  };
  // Pass ended: counter reset even though the lease is still alive.
  assert_eq!(set.outstanding(), 0);

  let pass = set.begin_pass();
  let fresh = pass.acquire::<FloatBlock>().unwrap();
  assert_eq!(pass.outstanding(), 1);

  // A lease from an old pass does not decrement the new pass's count.
  pass.release(leaked);
  assert_eq!(pass.outstanding(), 1);
  pass.release(fresh);
  assert_eq!(pass.outstanding(), 0);
}

#[test]
fn test_parallel_acquire_never_exceeds_capacity() {
  use rayon::prelude::*;

  let mut set = ArenaSet::new(8);
  let pass = set.begin_pass();

  let leases: Vec<_> = (0..64)
    .into_par_iter()
    .map(|_| pass.acquire::<BinaryBlock>())
    .collect();

  let granted = leases.iter().filter(|l| l.is_ok()).count();
  assert_eq!(granted, 8);
  assert_eq!(pass.outstanding(), 8);

  for lease in leases.into_iter().flatten() {
    pass.release(lease);
  }
  assert_eq!(pass.outstanding(), 0);
}
