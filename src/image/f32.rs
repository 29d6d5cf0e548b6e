//! Owned single-channel f32 raster (stride == width).
//!
//! Carries saliency maps and the intermediate luminance/gradient buffers used
//! by the reference providers.
use super::traits::{ImageView, ImageViewMut};

#[derive(Clone, Debug)]
pub struct ImageF32 {
    /// Image width in pixels
    pub w: usize,
    /// Image height in pixels
    pub h: usize,
    /// Backing storage in row-major order, row 0 at the bottom
    pub data: Vec<f32>,
}

impl ImageF32 {
    /// Zero-initialized buffer of size `w × h`.
    pub fn new(w: usize, h: usize) -> Self {
        Self::filled(w, h, 0.0)
    }

    /// Buffer of size `w × h` with every pixel set to `value`.
    pub fn filled(w: usize, h: usize, value: f32) -> Self {
        Self {
            w,
            h,
            data: vec![value; w * h],
        }
    }

    #[inline]
    pub fn idx(&self, x: usize, y: usize) -> usize {
        y * self.w + x
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> f32 {
        self.data[self.idx(x, y)]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, v: f32) {
        let i = self.idx(x, y);
        self.data[i] = v;
    }

    /// Largest finite value, `0.0` for an empty buffer.
    pub fn max_value(&self) -> f32 {
        self.data
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold(0.0f32, f32::max)
    }

    /// Rescale in place so the maximum becomes 1. A flat-zero map is left alone.
    pub fn normalize_max(&mut self) {
        let max = self.max_value();
        if max <= f32::EPSILON {
            return;
        }
        let inv = 1.0 / max;
        for v in &mut self.data {
            *v = (*v * inv).clamp(0.0, 1.0);
        }
    }
}

impl ImageView for ImageF32 {
    type Pixel = f32;

    #[inline]
    fn width(&self) -> usize {
        self.w
    }
    #[inline]
    fn height(&self) -> usize {
        self.h
    }
    #[inline]
    fn row(&self, y: usize) -> &[f32] {
        let start = y * self.w;
        &self.data[start..start + self.w]
    }
}

impl ImageViewMut for ImageF32 {
    #[inline]
    fn row_mut(&mut self, y: usize) -> &mut [f32] {
        let start = y * self.w;
        let end = start + self.w;
        &mut self.data[start..end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_max_scales_to_unit_peak() {
        let mut img = ImageF32::new(2, 2);
        img.set(1, 1, 4.0);
        img.set(0, 1, 2.0);
        img.normalize_max();
        assert_eq!(img.get(1, 1), 1.0);
        assert_eq!(img.get(0, 1), 0.5);
        assert_eq!(img.get(0, 0), 0.0);
    }

    #[test]
    fn clamped_reads_stay_inside() {
        let mut img = ImageF32::new(3, 2);
        img.set(2, 1, 7.0);
        assert_eq!(img.get_clamped(5, 9), 7.0);
        assert_eq!(img.get_clamped(-3, -1), 0.0);
    }
}
