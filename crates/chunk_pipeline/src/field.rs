//! Field sampling collaborator.
//!
//! The volumetric field is owned by the surrounding application. The pipeline
//! only needs point queries: whole-chunk sampling during extraction and
//! scattered queries while the optimizer pulls vertices onto the isosurface.
//!
//! Sign convention (same as the rest of the crate): negative = inside/solid,
//! positive = outside/air, zero = on the surface.

use glam::Vec3;

use crate::constants::{coord_to_index, SAMPLE_SIZE, SAMPLE_SIZE_CB};

/// Scalar field queried by sampling and mesh optimization.
///
/// Implementations must be deterministic: the same point always yields the
/// same value, which keeps optimizer output reproducible.
pub trait FieldSampler: Send + Sync {
  /// Signed field value at a world-space point.
  fn sample(&self, point: Vec3) -> f32;

  /// Field gradient at a world-space point.
  ///
  /// Defaults to central differences with step `h`.
  fn gradient(&self, point: Vec3, h: f32) -> Vec3 {
    let dx = Vec3::new(h, 0.0, 0.0);
    let dy = Vec3::new(0.0, h, 0.0);
    let dz = Vec3::new(0.0, 0.0, h);
    Vec3::new(
      self.sample(point + dx) - self.sample(point - dx),
      self.sample(point + dy) - self.sample(point - dy),
      self.sample(point + dz) - self.sample(point - dz),
    ) / (2.0 * h)
  }

  /// Sample a 16³ lattice starting at `origin` with spacing `voxel_size`.
  ///
  /// # Memory Layout
  /// X-slowest, Z-fastest: `index = x * 16² + y * 16 + z`
  ///
  /// Sample `(x, y, z)` is taken at `origin + [x, y, z] * voxel_size`.
  fn sample_volume(&self, origin: Vec3, voxel_size: f32, out: &mut [f32; SAMPLE_SIZE_CB]) {
    for x in 0..SAMPLE_SIZE {
      for y in 0..SAMPLE_SIZE {
        for z in 0..SAMPLE_SIZE {
          let offset = Vec3::new(x as f32, y as f32, z as f32) * voxel_size;
          out[coord_to_index(x, y, z)] = self.sample(origin + offset);
        }
      }
    }
  }
}

/// Blanket impl for boxed trait objects.
impl FieldSampler for Box<dyn FieldSampler> {
  fn sample(&self, point: Vec3) -> f32 {
    (**self).sample(point)
  }

  fn gradient(&self, point: Vec3, h: f32) -> Vec3 {
    (**self).gradient(point, h)
  }

  fn sample_volume(&self, origin: Vec3, voxel_size: f32, out: &mut [f32; SAMPLE_SIZE_CB]) {
    (**self).sample_volume(origin, voxel_size, out)
  }
}
