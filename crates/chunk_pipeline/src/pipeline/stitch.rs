//! Seam stitching between neighbouring chunks.
//!
//! Only lifecycle tracking exists so far: the stitcher is bound alongside the
//! generator and reports where it is. Meshes are not modified.

/// Stitcher lifecycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StitchStage {
  #[default]
  Uninitialized,
  Ready,
  /// Stitched seams are waiting for upload.
  NeedsUpload,
}

#[derive(Debug, Default)]
pub struct SeamStitcher {
  stage: StitchStage,
}

impl SeamStitcher {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn init(&mut self) {
    self.stage = StitchStage::Ready;
  }

  pub fn stage(&self) -> StitchStage {
    self.stage
  }

  pub fn is_ready(&self) -> bool {
    self.stage == StitchStage::Ready
  }
}
