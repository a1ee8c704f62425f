//! Analytic SDF samplers.
//!
//! Deterministic fields that are easy to reason about. They back the tests
//! and benches and are handy for checking chunk tiling without noise.
//!
//! All samplers follow the crate sign convention: negative inside.

use glam::Vec3;

use crate::field::FieldSampler;

/// Sphere: `|p - center| - radius`.
#[derive(Clone, Debug)]
pub struct SphereSampler {
  pub center: Vec3,
  pub radius: f32,
}

impl Default for SphereSampler {
  fn default() -> Self {
    Self {
      center: Vec3::ZERO,
      radius: 20.0,
    }
  }
}

impl SphereSampler {
  pub fn new(radius: f32) -> Self {
    Self {
      center: Vec3::ZERO,
      radius,
    }
  }

  pub fn with_center(mut self, center: Vec3) -> Self {
    self.center = center;
    self
  }
}

impl FieldSampler for SphereSampler {
  fn sample(&self, point: Vec3) -> f32 {
    (point - self.center).length() - self.radius
  }

  fn gradient(&self, point: Vec3, _h: f32) -> Vec3 {
    (point - self.center).normalize_or_zero()
  }
}

/// Plane through `point`, solid on the side opposite to `normal`.
#[derive(Clone, Debug)]
pub struct PlaneSampler {
  pub point: Vec3,
  /// Unit normal, pointing toward air.
  pub normal: Vec3,
}

impl PlaneSampler {
  pub fn new(point: Vec3, normal: Vec3) -> Self {
    Self {
      point,
      normal: normal.try_normalize().unwrap_or(Vec3::Y),
    }
  }

  /// Horizontal ground at `height`.
  pub fn ground(height: f32) -> Self {
    Self::new(Vec3::new(0.0, height, 0.0), Vec3::Y)
  }

  /// Plane through the origin tilted around Z by `degrees`.
  pub fn tilted(degrees: f32) -> Self {
    let angle = degrees.to_radians();
    Self::new(Vec3::ZERO, Vec3::new(-angle.sin(), angle.cos(), 0.0))
  }
}

impl FieldSampler for PlaneSampler {
  fn sample(&self, point: Vec3) -> f32 {
    (point - self.point).dot(self.normal)
  }

  fn gradient(&self, _point: Vec3, _h: f32) -> Vec3 {
    self.normal
  }
}

/// Axis-aligned box.
#[derive(Clone, Debug)]
pub struct BoxSampler {
  pub center: Vec3,
  pub half_extents: Vec3,
}

impl Default for BoxSampler {
  fn default() -> Self {
    Self {
      center: Vec3::ZERO,
      half_extents: Vec3::splat(10.0),
    }
  }
}

impl BoxSampler {
  pub fn new(half_extents: Vec3) -> Self {
    Self {
      center: Vec3::ZERO,
      half_extents,
    }
  }

  pub fn with_center(mut self, center: Vec3) -> Self {
    self.center = center;
    self
  }
}

impl FieldSampler for BoxSampler {
  fn sample(&self, point: Vec3) -> f32 {
    let d = (point - self.center).abs() - self.half_extents;
    let outside = d.max(Vec3::ZERO).length();
    let inside = d.max_element().min(0.0);
    outside + inside
  }
}

/// Same value everywhere. Positive = all air, negative = all solid.
#[derive(Clone, Copy, Debug)]
pub struct ConstantSampler {
  pub value: f32,
}

impl ConstantSampler {
  pub fn all_air() -> Self {
    Self { value: 1.0 }
  }

  pub fn all_solid() -> Self {
    Self { value: -1.0 }
  }
}

impl FieldSampler for ConstantSampler {
  fn sample(&self, _point: Vec3) -> f32 {
    self.value
  }

  fn gradient(&self, _point: Vec3, _h: f32) -> Vec3 {
    Vec3::ZERO
  }
}

/// Union (minimum) of several fields.
#[derive(Default)]
pub struct UnionSampler {
  pub parts: Vec<Box<dyn FieldSampler>>,
}

impl UnionSampler {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with(mut self, part: impl FieldSampler + 'static) -> Self {
    self.parts.push(Box::new(part));
    self
  }
}

impl FieldSampler for UnionSampler {
  fn sample(&self, point: Vec3) -> f32 {
    self
      .parts
      .iter()
      .map(|p| p.sample(point))
      .fold(f32::INFINITY, f32::min)
  }
}
