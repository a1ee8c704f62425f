//! Sample extraction: field values plus packed inside/outside signs.

use super::Chunk;
use crate::arena::{BinaryBlock, FloatBlock, PassArenas};
use crate::constants::SAMPLE_SIZE_CB;
use crate::error::ChunkError;
use crate::field::FieldSampler;

impl Chunk {
  /// Sample the field over the chunk's 16³ lattice.
  ///
  /// Leases a binary and a float block for this pass and records whether the
  /// chunk contains surface (both inside and outside samples). Clears any
  /// per-pass state left from an earlier pass.
  pub fn generate_samples(
    &mut self,
    arenas: &PassArenas<'_>,
    sampler: &dyn FieldSampler,
  ) -> Result<(), ChunkError> {
    self.release_blocks(arenas);
    self.contains_surface = false;
    self.contains_mesh = false;

    let mut field = arenas.acquire::<FloatBlock>()?;
    let mut binary = match arenas.acquire::<BinaryBlock>() {
      Ok(binary) => binary,
      Err(e) => {
        arenas.release(field);
        return Err(e.into());
      }
    };

    sampler.sample_volume(self.origin, self.voxel_size, &mut field.values);

    for (word, values) in binary.words.iter_mut().zip(field.values.chunks_exact(64)) {
      *word = values
        .iter()
        .enumerate()
        .fold(0u64, |bits, (i, &v)| bits | (((v < 0.0) as u64) << i));
    }

    let inside = binary.count_inside() as usize;
    self.contains_surface = inside > 0 && inside < SAMPLE_SIZE_CB;

    self.field = Some(field);
    self.binary = Some(binary);
    Ok(())
  }
}
