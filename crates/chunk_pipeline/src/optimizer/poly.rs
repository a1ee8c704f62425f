//! Shared polygon core for the quad and triangle optimizers.

use glam::{Mat3, Vec3};
use smallvec::SmallVec;

use super::normals;
use crate::config::OptimizerSettings;
use crate::constants::NO_VERTEX;
use crate::field::FieldSampler;
use crate::types::Vertex;

/// Gradient step relative to the voxel size.
const GRADIENT_STEP: f32 = 0.05;

/// Polygon mesh with fixed face size and vertex → face adjacency.
pub(super) struct PolyMesh<'s> {
  sides: usize,
  settings: OptimizerSettings,
  voxel_size: f32,
  field_normals: bool,
  sampler: Option<&'s dyn FieldSampler>,

  positions: Vec<Vec3>,
  faces: Vec<u32>,

  // CSR adjacency: faces of vertex v are
  // vertex_faces[face_start[v]..face_start[v + 1]].
  face_start: Vec<u32>,
  vertex_faces: Vec<u32>,

  // Dual pass scratch, one entry per face.
  face_points: Vec<Vec3>,
  face_normals: Vec<Vec3>,
  scratch: Vec<Vec3>,
}

impl<'s> PolyMesh<'s> {
  pub fn new(sides: usize, settings: OptimizerSettings, voxel_size: f32, field_normals: bool) -> Self {
    Self {
      sides,
      settings,
      voxel_size: voxel_size.max(f32::EPSILON),
      field_normals,
      sampler: None,
      positions: Vec::new(),
      faces: Vec::new(),
      face_start: Vec::new(),
      vertex_faces: Vec::new(),
      face_points: Vec::new(),
      face_normals: Vec::new(),
      scratch: Vec::new(),
    }
  }

  #[inline]
  pub fn sides(&self) -> usize {
    self.sides
  }

  pub fn positions(&self) -> &[Vec3] {
    &self.positions
  }

  pub fn faces(&self) -> &[u32] {
    &self.faces
  }

  // ===========================================================================
  // Setup
  // ===========================================================================

  pub fn init(&mut self, vertices: &[Vertex], indices: &[u32], sampler: &'s dyn FieldSampler) {
    self.sampler = Some(sampler);

    self.positions.clear();
    self.positions.extend(vertices.iter().map(|v| v.position));

    let whole = indices.len() - indices.len() % self.sides;
    self.faces.clear();
    self.faces.extend(
      indices[..whole]
        .chunks_exact(self.sides)
        .filter(|face| face.iter().all(|&i| (i as usize) < vertices.len()))
        .flatten()
        .copied(),
    );

    self.build_adjacency();
  }

  fn build_adjacency(&mut self) {
    let vertex_count = self.positions.len();
    self.face_start.clear();
    self.face_start.resize(vertex_count + 1, 0);

    for &i in &self.faces {
      self.face_start[i as usize + 1] += 1;
    }
    for v in 0..vertex_count {
      self.face_start[v + 1] += self.face_start[v];
    }

    self.vertex_faces.clear();
    self.vertex_faces.resize(self.faces.len(), 0);
    let mut cursor: Vec<u32> = self.face_start[..vertex_count].to_vec();
    for (face, chunk) in self.faces.chunks_exact(self.sides).enumerate() {
      for &i in chunk {
        let slot = &mut cursor[i as usize];
        self.vertex_faces[*slot as usize] = face as u32;
        *slot += 1;
      }
    }
  }

  #[inline]
  fn faces_of(&self, vertex: usize) -> &[u32] {
    let start = self.face_start[vertex] as usize;
    let end = self.face_start[vertex + 1] as usize;
    &self.vertex_faces[start..end]
  }

  #[inline]
  fn face(&self, face: usize) -> &[u32] {
    &self.faces[face * self.sides..(face + 1) * self.sides]
  }

  fn face_centroid(&self, face: usize) -> Vec3 {
    let sum: Vec3 = self
      .face(face)
      .iter()
      .map(|&i| self.positions[i as usize])
      .sum();
    sum / self.sides as f32
  }

  fn face_count(&self) -> usize {
    self.faces.len() / self.sides
  }

  // ===========================================================================
  // Field queries
  // ===========================================================================

  /// Damped Newton projection onto the zero set. Returns the projected point
  /// and the unit field normal there (zero if the gradient vanishes).
  fn project(&self, sampler: &dyn FieldSampler, point: Vec3) -> (Vec3, Vec3) {
    let h = self.voxel_size * GRADIENT_STEP;
    let max_move = self.voxel_size;
    let mut x = point;

    for _ in 0..self.settings.projection_steps {
      let d = sampler.sample(x);
      let g = sampler.gradient(x, h);
      let g2 = g.length_squared();
      if g2 < 1e-12 || !d.is_finite() {
        break;
      }
      x -= (g * (d / g2)).clamp_length_max(max_move);
      if d.abs() < 1e-6 * self.voxel_size {
        break;
      }
    }

    (x, sampler.gradient(x, h).normalize_or_zero())
  }

  /// Regularized least-squares point of a set of planes.
  ///
  /// Solves `(Σ n nᵀ + λk I) x = Σ n (n · q) + λk p`, with `k` the plane
  /// count, and clamps the move from `current` to the configured max step.
  fn solve_qef<I>(&self, current: Vec3, planes: I) -> Vec3
  where
    I: IntoIterator<Item = (Vec3, Vec3)>,
  {
    let mut ata = Mat3::ZERO;
    let mut atb = Vec3::ZERO;
    let mut count = 0u32;

    for (point, normal) in planes {
      if normal == Vec3::ZERO {
        continue;
      }
      ata += Mat3::from_cols(normal * normal.x, normal * normal.y, normal * normal.z);
      atb += normal * normal.dot(point);
      count += 1;
    }

    if count == 0 {
      return current;
    }

    let lambda = self.settings.regularization.max(1e-4) * count as f32;
    ata += Mat3::from_diagonal(Vec3::splat(lambda));
    atb += current * lambda;

    if ata.determinant().abs() < 1e-12 {
      return current;
    }

    let target = ata.inverse() * atb;
    if !target.is_finite() {
      return current;
    }
    current + (target - current).clamp_length_max(self.settings.max_step * self.voxel_size)
  }

  // ===========================================================================
  // Dual grid
  // ===========================================================================

  pub fn optimize_dual_grid(&mut self, iterations: u32) {
    let Some(sampler) = self.sampler else {
      return;
    };
    if self.faces.is_empty() {
      return;
    }

    for _ in 0..iterations {
      self.face_points.clear();
      self.face_normals.clear();
      for face in 0..self.face_count() {
        let (point, normal) = self.project(sampler, self.face_centroid(face));
        self.face_points.push(point);
        self.face_normals.push(normal);
      }

      self.scratch.clear();
      for v in 0..self.positions.len() {
        let planes = self
          .faces_of(v)
          .iter()
          .map(|&f| (self.face_points[f as usize], self.face_normals[f as usize]));
        let moved = self.solve_qef(self.positions[v], planes);
        self.scratch.push(moved);
      }
      std::mem::swap(&mut self.positions, &mut self.scratch);
    }
  }

  // ===========================================================================
  // Primal grid
  // ===========================================================================

  pub fn optimize_primal_grid(&mut self, sharpen: bool, smooth: bool) {
    let Some(sampler) = self.sampler else {
      return;
    };
    if self.faces.is_empty() {
      return;
    }

    if smooth {
      self.smooth_tangential(sampler);
    }

    for v in 0..self.positions.len() {
      if self.faces_of(v).is_empty() {
        continue;
      }
      self.positions[v] = self.project(sampler, self.positions[v]).0;
    }

    if sharpen {
      self.sharpen_features();
    }
  }

  fn smooth_tangential(&mut self, sampler: &dyn FieldSampler) {
    let h = self.voxel_size * GRADIENT_STEP;
    let factor = self.settings.smoothing_factor;

    self.scratch.clear();
    for v in 0..self.positions.len() {
      let p = self.positions[v];
      let mut neighbours: SmallVec<[u32; 16]> = SmallVec::new();
      for &f in self.faces_of(v) {
        let face = self.face(f as usize);
        let Some(k) = face.iter().position(|&i| i as usize == v) else {
          continue;
        };
        let prev = face[(k + self.sides - 1) % self.sides];
        let next = face[(k + 1) % self.sides];
        for n in [prev, next] {
          if n as usize != v && !neighbours.contains(&n) {
            neighbours.push(n);
          }
        }
      }

      if neighbours.is_empty() {
        self.scratch.push(p);
        continue;
      }

      let sum: Vec3 = neighbours.iter().map(|&n| self.positions[n as usize]).sum();
      let delta = sum / neighbours.len() as f32 - p;
      let normal = sampler.gradient(p, h).normalize_or_zero();
      let tangential = delta - normal * normal.dot(delta);
      self.scratch.push(p + tangential * factor);
    }
    std::mem::swap(&mut self.positions, &mut self.scratch);
  }

  fn sharpen_features(&mut self) {
    let cos_limit = self.settings.feature_angle_degrees.to_radians().cos();

    self.face_points.clear();
    self.face_normals.clear();
    for face in 0..self.face_count() {
      let centroid = self.face_centroid(face);
      let normal = normals::polygon_normal(self.face(face), &self.positions);
      self.face_points.push(centroid);
      self.face_normals.push(normal);
    }

    self.scratch.clear();
    for v in 0..self.positions.len() {
      let faces = self.faces_of(v);
      let is_feature = faces.iter().enumerate().any(|(i, &a)| {
        faces[i + 1..].iter().any(|&b| {
          self.face_normals[a as usize].dot(self.face_normals[b as usize]) < cos_limit
        })
      });

      let p = self.positions[v];
      if !is_feature {
        self.scratch.push(p);
        continue;
      }
      let planes = faces
        .iter()
        .map(|&f| (self.face_points[f as usize], self.face_normals[f as usize]));
      let sharpened = self.solve_qef(p, planes);
      self.scratch.push(sharpened);
    }
    std::mem::swap(&mut self.positions, &mut self.scratch);
  }

  // ===========================================================================
  // Output
  // ===========================================================================

  /// Compact `faces` (in this mesh's vertex ids) into the output buffers in
  /// first-use order and write normals, then drop all state.
  pub fn emit(&mut self, faces: &[u32], sides: usize, out_vertices: &mut Vec<Vertex>, out_indices: &mut Vec<u32>) {
    out_vertices.clear();
    out_indices.clear();

    let mut remap = vec![NO_VERTEX; self.positions.len()];
    for &i in faces {
      let slot = &mut remap[i as usize];
      if *slot == NO_VERTEX {
        *slot = out_vertices.len() as u32;
        out_vertices.push(Vertex::new(self.positions[i as usize], Vec3::Y));
      }
      out_indices.push(*slot);
    }

    match (self.field_normals, self.sampler) {
      (true, Some(sampler)) => {
        let h = self.voxel_size * GRADIENT_STEP;
        for vertex in out_vertices.iter_mut() {
          vertex.normal = sampler
            .gradient(vertex.position, h)
            .try_normalize()
            .unwrap_or(Vec3::Y);
        }
      }
      _ => normals::angle_weighted(out_vertices, out_indices, sides),
    }

    self.reset();
  }

  pub fn flush(&mut self, out_vertices: &mut Vec<Vertex>, out_indices: &mut Vec<u32>) {
    let faces = std::mem::take(&mut self.faces);
    self.emit(&faces, self.sides, out_vertices, out_indices);
  }

  fn reset(&mut self) {
    self.sampler = None;
    self.positions.clear();
    self.faces.clear();
    self.face_start.clear();
    self.vertex_faces.clear();
    self.face_points.clear();
    self.face_normals.clear();
    self.scratch.clear();
  }
}
