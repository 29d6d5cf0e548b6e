//! Per-pixel saliency maps used to weight the color fits.
//!
//! The fitting core only needs *some* `[0, 1]` importance map of the same size
//! as the image; [`SaliencyProvider`] is that seam. Two reference algorithms
//! are bundled and selected by [`SaliencyMethod`]:
//!
//! - `CenterSurround`: multi-scale difference between a lightly blurred and
//!   heavily blurred version of luminance and two color-opponent channels.
//! - `GradientEnergy`: smoothed Sobel magnitude of the luminance.
//!
//! [`UniformSaliency`] returns a constant map (handy for tests and for turning
//! the weighting into a plain mean).
pub mod filters;

use crate::edges::grad::{image_gradients, GradientKernel};
use crate::image::{ImageF32, ImageView, RgbImage};
use filters::{apply, apply_repeated, GAUSSIAN_5TAP};
use serde::{Deserialize, Serialize};

/// Source of the saliency map for an image.
pub trait SaliencyProvider: Send + Sync {
    /// Map of `image`'s size with values in `[0, 1]`, same row order.
    fn compute(&self, image: &RgbImage) -> ImageF32;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaliencyMethod {
    #[default]
    CenterSurround,
    GradientEnergy,
}

impl SaliencyProvider for SaliencyMethod {
    fn compute(&self, image: &RgbImage) -> ImageF32 {
        match self {
            SaliencyMethod::CenterSurround => center_surround(image),
            SaliencyMethod::GradientEnergy => gradient_energy(image),
        }
    }
}

/// Constant saliency everywhere.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UniformSaliency(pub f32);

impl Default for UniformSaliency {
    fn default() -> Self {
        Self(1.0)
    }
}

impl SaliencyProvider for UniformSaliency {
    fn compute(&self, image: &RgbImage) -> ImageF32 {
        ImageF32::filled(image.width(), image.height(), self.0)
    }
}

/// Blur passes for the centre and for each surround scale.
const CENTER_PASSES: usize = 1;
const SURROUND_PASSES: [usize; 2] = [4, 16];

/// Raw responses whose maximum stays below this are rounding noise of a flat
/// image; such maps are reported as all zero.
const MIN_RESPONSE: f32 = 1e-4;

fn normalize_response(mut map: ImageF32) -> ImageF32 {
    if map.max_value() < MIN_RESPONSE {
        map.data.fill(0.0);
    } else {
        map.normalize_max();
    }
    map
}

/// Luminance, red–green and blue–yellow planes scaled to `[0, 1]`-ish.
fn opponent_channels(image: &RgbImage) -> [ImageF32; 3] {
    let (w, h) = image.dims();
    let mut luma = ImageF32::new(w, h);
    let mut rg = ImageF32::new(w, h);
    let mut by = ImageF32::new(w, h);
    for (i, px) in image.pixels().iter().enumerate() {
        let [r, g, b] = [px[0] as f32 / 255.0, px[1] as f32 / 255.0, px[2] as f32 / 255.0];
        luma.data[i] = 0.299 * r + 0.587 * g + 0.114 * b;
        rg.data[i] = r - g;
        by.data[i] = b - 0.5 * (r + g);
    }
    [luma, rg, by]
}

/// Multi-scale centre–surround contrast, normalized to a maximum of 1.
pub fn center_surround(image: &RgbImage) -> ImageF32 {
    let (w, h) = image.dims();
    let mut out = ImageF32::new(w, h);
    for channel in opponent_channels(image) {
        let center = apply_repeated(&GAUSSIAN_5TAP, &channel, CENTER_PASSES);
        let mut surround = center.clone();
        let mut done = CENTER_PASSES;
        for passes in SURROUND_PASSES {
            surround = apply_repeated(&GAUSSIAN_5TAP, &surround, passes - done);
            done = passes;
            for ((o, c), s) in out.data.iter_mut().zip(&center.data).zip(&surround.data) {
                *o += (c - s).abs();
            }
        }
    }
    normalize_response(out)
}

/// Smoothed gradient magnitude of the luminance, normalized to a maximum of 1.
pub fn gradient_energy(image: &RgbImage) -> ImageF32 {
    let [luma, _, _] = opponent_channels(image);
    let grad = image_gradients(&apply(&GAUSSIAN_5TAP, &luma), GradientKernel::Sobel);
    normalize_response(apply_repeated(&GAUSSIAN_5TAP, &grad.mag, 2))
}
