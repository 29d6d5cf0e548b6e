//! Pixel sampling inside the triangles of a cell.
//!
//! - [`sample_triangle`] collects color/saliency samples of one triangle in
//!   cell-local coordinates, offset by half a pixel so no sample sits on the
//!   diagonal or on the image border by accident.
//! - [`barycentric`] maps cell-local samples into each triangle's `(s, t, u)`
//!   frame.
//! - [`edge_points`] buckets edge-mask pixels of a cell into both triangles.

pub mod barycentric;
pub mod edge_points;

pub use barycentric::{to_barycentric, BarycentricCoord};
pub use edge_points::{extract_edge_points, EdgePoints};

use crate::grid::{CellBox, TriangleSlot};
use crate::image::{ImageF32, ImageView, RgbImage};

/// Added to every saliency read so no pixel ends up with zero weight.
pub const SALIENCY_BIAS: f32 = 0.1;

/// One sampled pixel. `color` stays on the 0–255 scale.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sample {
    pub color: [f32; 3],
    pub saliency: f32,
    /// Cell-local position in `(0, 1)`.
    pub x: f32,
    pub y: f32,
}

/// Shared read-only inputs of a fitting pass.
#[derive(Clone, Copy)]
pub struct SourceMaps<'a> {
    pub image: &'a RgbImage,
    pub saliency: &'a ImageF32,
}

impl<'a> SourceMaps<'a> {
    pub fn new(image: &'a RgbImage, saliency: &'a ImageF32) -> Self {
        Self { image, saliency }
    }

    /// Sample every pixel of `cell` accepted by `keep(x, y)`.
    ///
    /// The loop visits integer offsets `(i, j)` while `i < cell.w` and
    /// `j < cell.h`; sample positions are pixel centres normalized by the
    /// fractional box size.
    pub fn sample_where(&self, cell: &CellBox, mut keep: impl FnMut(f32, f32) -> bool) -> Vec<Sample> {
        if cell.is_empty() {
            return Vec::new();
        }
        let cols = cell.w.ceil() as usize;
        let rows = cell.h.ceil() as usize;
        let mut out = Vec::with_capacity(cols * rows / 2 + cols);
        for j in 0..rows {
            let y = (j as f32 + 0.5) / cell.h;
            let py = (j as f32 + cell.y).floor() as isize;
            for i in 0..cols {
                let x = (i as f32 + 0.5) / cell.w;
                if !keep(x, y) {
                    continue;
                }
                let px = (i as f32 + cell.x).floor() as isize;
                let [r, g, b] = self.image.get_clamped(px, py);
                let saliency = self.saliency.get_clamped(px, py) + SALIENCY_BIAS;
                out.push(Sample {
                    color: [r as f32, g as f32, b as f32],
                    saliency,
                    x,
                    y,
                });
            }
        }
        out
    }
}

/// Samples of the `slot` triangle of `cell`.
pub fn sample_triangle(maps: &SourceMaps<'_>, cell: &CellBox, slot: TriangleSlot) -> Vec<Sample> {
    maps.sample_where(cell, |x, y| slot.contains(x, y))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(w: f32, h: f32) -> CellBox {
        CellBox { x: 0.0, y: 0.0, w, h }
    }

    #[test]
    fn samples_are_pixel_centres() {
        let img = RgbImage::uniform(4, 4, [10, 20, 30]);
        let sal = ImageF32::filled(4, 4, 0.5);
        let maps = SourceMaps::new(&img, &sal);
        let lower = sample_triangle(&maps, &cell(4.0, 4.0), TriangleSlot::Lower);
        // Pixel centres with x + y <= 1 on a 4x4 box: 4 + 3 + 2 + 1 = 10.
        assert_eq!(lower.len(), 10);
        for s in &lower {
            assert!(s.x > 0.0 && s.x < 1.0 && s.y > 0.0 && s.y < 1.0);
            assert_eq!(s.color, [10.0, 20.0, 30.0]);
            assert!((s.saliency - 0.6).abs() < 1e-6);
        }
    }

    #[test]
    fn slots_cover_every_pixel_and_share_the_diagonal() {
        let img = RgbImage::uniform(4, 4, [0, 0, 0]);
        let sal = ImageF32::new(4, 4);
        let maps = SourceMaps::new(&img, &sal);
        let c = cell(4.0, 4.0);
        let all = maps.sample_where(&c, |_, _| true);
        let lower = sample_triangle(&maps, &c, TriangleSlot::Lower);
        let upper = sample_triangle(&maps, &c, TriangleSlot::Upper);
        for s in &all {
            let in_lower = lower.iter().any(|l| l.x == s.x && l.y == s.y);
            let in_upper = upper.iter().any(|u| u.x == s.x && u.y == s.y);
            assert!(in_lower || in_upper);
            if s.x + s.y == 1.0 {
                assert!(in_lower && in_upper);
            }
        }
        assert_eq!(lower.len() + upper.len(), all.len() + 4);
    }

    #[test]
    fn empty_box_yields_no_samples() {
        let img = RgbImage::uniform(2, 2, [1, 2, 3]);
        let sal = ImageF32::new(2, 2);
        let maps = SourceMaps::new(&img, &sal);
        assert!(sample_triangle(&maps, &cell(0.0, 2.0), TriangleSlot::Lower).is_empty());
    }
}
