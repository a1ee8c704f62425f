use super::*;

#[test]
fn test_sample_size_is_power_of_two() {
  assert!(SAMPLE_SIZE.is_power_of_two());
  assert_eq!(1 << Y_SHIFT, SAMPLE_SIZE);
  assert_eq!(1 << X_SHIFT, SAMPLE_SIZE_SQ);
}

#[test]
fn test_coord_to_index_roundtrip() {
  for x in 0..SAMPLE_SIZE {
    for y in 0..SAMPLE_SIZE {
      for z in 0..SAMPLE_SIZE {
        let idx = coord_to_index(x, y, z);
        assert!(idx < SAMPLE_SIZE_CB);
        assert_eq!((x, y, z), index_to_coord(idx), "roundtrip failed for ({x}, {y}, {z})");
      }
    }
  }
}

#[test]
fn test_corner_offsets() {
  assert_eq!(CORNER_OFFSETS[0], 0);

  let expected = coord_to_index(1, 0, 0) + coord_to_index(0, 1, 0) + 1;
  assert_eq!(CORNER_OFFSETS[7], expected);

  // Highest cell's far corner stays inside the volume.
  let last_cell = coord_to_index(CELLS_PER_AXIS - 1, CELLS_PER_AXIS - 1, CELLS_PER_AXIS - 1);
  assert_eq!(last_cell + CORNER_OFFSETS[7], SAMPLE_SIZE_CB - 1);
}

#[test]
fn test_binary_words_cover_all_samples() {
  assert_eq!(BINARY_WORDS * 64, SAMPLE_SIZE_CB);
}
