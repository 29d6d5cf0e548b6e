//! Binary edge masks for the split-color modes.
//!
//! The fitting core only consumes an [`EdgeMask`]; [`EdgeProvider`] is the
//! seam through which it is produced. The bundled [`GradientEdgeDetector`] is a
//! small Canny-style pipeline:
//!
//! 1. Luminance on the `0..=255` scale, smoothed with a 5-tap Gaussian.
//! 2. Sobel (or Scharr) gradients with replicate borders.
//! 3. Direction-aligned non-maximum suppression.
//! 4. Hysteresis between `low_threshold` and `low_threshold · ratio`.
//!
//! [`EmptyEdges`] returns a mask without edges, which makes both split modes
//! degrade to constant colors.

pub mod grad;
pub mod nms;

pub use grad::{image_gradients, Grad, GradientKernel};
pub use nms::{hysteresis, suppress_non_maxima, EDGE_VALUE};

use crate::image::{EdgeMask, ImageF32, ImageView, RgbImage};
use crate::saliency::filters::{apply, GAUSSIAN_5TAP};
use serde::{Deserialize, Serialize};

/// Source of the edge mask for an image.
pub trait EdgeProvider: Send + Sync {
    /// Mask of `image`'s size, same row order; `> 0` marks an edge.
    fn detect(&self, image: &RgbImage) -> EdgeMask;
}

/// Canny-style detector; thresholds apply to the unnormalized gradient
/// magnitude of 8-bit luminance.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GradientEdgeDetector {
    pub low_threshold: f32,
    /// `high = low_threshold · ratio`.
    pub ratio: f32,
    pub kernel: GradientKernel,
    /// Gaussian pre-smoothing.
    pub blur: bool,
}

impl Default for GradientEdgeDetector {
    fn default() -> Self {
        Self {
            low_threshold: 59.0,
            ratio: 3.0,
            kernel: GradientKernel::Sobel,
            blur: true,
        }
    }
}

impl GradientEdgeDetector {
    pub fn with_threshold(low_threshold: f32) -> Self {
        Self {
            low_threshold,
            ..Self::default()
        }
    }

    pub fn high_threshold(&self) -> f32 {
        self.low_threshold * self.ratio
    }
}

impl EdgeProvider for GradientEdgeDetector {
    fn detect(&self, image: &RgbImage) -> EdgeMask {
        let luma = luma_image(image);
        let smoothed = if self.blur {
            apply(&GAUSSIAN_5TAP, &luma)
        } else {
            luma
        };
        let grad = image_gradients(&smoothed, self.kernel);
        let thin = suppress_non_maxima(&grad, self.low_threshold);
        hysteresis(&thin, self.low_threshold, self.high_threshold())
    }
}

/// Provider that never reports an edge.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EmptyEdges;

impl EdgeProvider for EmptyEdges {
    fn detect(&self, image: &RgbImage) -> EdgeMask {
        EdgeMask::empty(image.width(), image.height())
    }
}

/// Rec.601 luminance on the `0..=255` scale.
pub fn luma_image(image: &RgbImage) -> ImageF32 {
    let (w, h) = image.dims();
    let mut out = ImageF32::new(w, h);
    for y in 0..h {
        for x in 0..w {
            out.set(x, y, image.luma(x, y));
        }
    }
    out
}
