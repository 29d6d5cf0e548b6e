//! Separable smoothing filters with replicate borders.
use crate::image::{ImageF32, ImageView, ImageViewMut};

/// Trait implemented by separable 1D filters.
pub trait SeparableFilter {
    /// Return the 1D taps (in left-to-right order). The kernel is assumed to be
    /// symmetric around its centre, but the implementation does not rely on it.
    fn taps(&self) -> &[f32];
}

/// Simple wrapper around a static filter kernel.
#[derive(Clone, Copy, Debug)]
pub struct StaticSeparableFilter {
    taps: &'static [f32],
}

impl Default for StaticSeparableFilter {
    fn default() -> Self {
        GAUSSIAN_5TAP
    }
}

impl StaticSeparableFilter {
    pub const fn new(taps: &'static [f32]) -> Self {
        Self { taps }
    }
}

impl SeparableFilter for StaticSeparableFilter {
    #[inline]
    fn taps(&self) -> &[f32] {
        self.taps
    }
}

/// Normalised 5-tap Gaussian filter `[1, 4, 6, 4, 1] / 16`.
pub const GAUSSIAN_5TAP: StaticSeparableFilter =
    StaticSeparableFilter::new(&[0.0625, 0.25, 0.375, 0.25, 0.0625]);

#[inline]
fn clamp_index(idx: isize, upper: usize) -> usize {
    idx.clamp(0, upper as isize - 1) as usize
}

/// Convolve `src` with `filter` horizontally, then vertically.
pub fn apply(filter: &impl SeparableFilter, src: &ImageF32) -> ImageF32 {
    let taps = filter.taps();
    let (w, h) = src.dims();
    if taps.is_empty() || w == 0 || h == 0 {
        return src.clone();
    }
    let radius = (taps.len() / 2) as isize;

    let mut horiz = ImageF32::new(w, h);
    for y in 0..h {
        let row = src.row(y);
        let out = horiz.row_mut(y);
        for (x, dst) in out.iter_mut().enumerate() {
            let mut acc = 0.0;
            for (k, &tap) in taps.iter().enumerate() {
                acc += tap * row[clamp_index(x as isize + k as isize - radius, w)];
            }
            *dst = acc;
        }
    }

    let mut out = ImageF32::new(w, h);
    for y in 0..h {
        let dst = out.row_mut(y);
        for (k, &tap) in taps.iter().enumerate() {
            let src_row = horiz.row(clamp_index(y as isize + k as isize - radius, h));
            for (d, &s) in dst.iter_mut().zip(src_row) {
                *d += tap * s;
            }
        }
    }
    out
}

/// Apply `filter` `passes` times; repeated 5-tap Gaussians approximate a wider
/// Gaussian (variance grows linearly with the pass count).
pub fn apply_repeated(filter: &impl SeparableFilter, src: &ImageF32, passes: usize) -> ImageF32 {
    let mut img = src.clone();
    for _ in 0..passes {
        img = apply(filter, &img);
    }
    img
}
