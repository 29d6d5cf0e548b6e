//! Constant-color estimators: averages, triangle centres and lattice vertices.
use crate::grid::{CellBox, GridSize, TriangleSlot, VertexBuffer};
use crate::image::{ImageView, RgbImage};
use crate::sampling::Sample;

pub type Color = [f32; 3];

/// Cell-local position of the lower triangle's sampling centre; the upper
/// triangle mirrors it through the cell centre.
pub const CENTER_OFFSET: f32 = 0.35355;

/// Mean color of `samples` in `[0, 1]`, weighted by saliency when asked.
///
/// Returns `None` when there is nothing to average (no samples, or a zero
/// total weight).
pub fn weighted_mean(samples: &[Sample], use_saliency: bool) -> Option<Color> {
    let mut acc = [0.0f64; 3];
    let mut total = 0.0f64;
    for p in samples {
        let w = if use_saliency { p.saliency as f64 } else { 1.0 };
        acc[0] += p.color[0] as f64 * w;
        acc[1] += p.color[1] as f64 * w;
        acc[2] += p.color[2] as f64 * w;
        total += w;
    }
    if total <= 0.0 || !total.is_finite() {
        return None;
    }
    let norm = total * 255.0;
    let mean = [
        (acc[0] / norm) as f32,
        (acc[1] / norm) as f32,
        (acc[2] / norm) as f32,
    ];
    mean.iter().all(|c| c.is_finite()).then_some(mean)
}

/// Color of the single pixel near the centroid of the `slot` triangle.
pub fn center_color(image: &RgbImage, cell: &CellBox, slot: TriangleSlot) -> Color {
    let offset = match slot {
        TriangleSlot::Lower => CENTER_OFFSET,
        TriangleSlot::Upper => 1.0 - CENTER_OFFSET,
    };
    let (px, py) = cell.pixel_at(offset, offset);
    normalize(image.get_clamped(px, py))
}

/// Image color under every lattice vertex, three floats per vertex in vertex
/// order. Vertices on the far edges read the last row/column.
pub fn vertex_colors(image: &RgbImage, vertices: &VertexBuffer) -> Vec<f32> {
    let mut out = Vec::with_capacity(vertices.positions.len() * 3);
    let (w, h) = image.dims();
    for pos in &vertices.positions {
        let px = (pos[0] * w as f32).floor() as isize;
        let py = (pos[1] * h as f32).floor() as isize;
        out.extend_from_slice(&normalize(image.get_clamped(px, py)));
    }
    out
}

/// Length of the buffer produced by [`vertex_colors`].
pub fn vertex_color_len(grid: GridSize) -> usize {
    let (vx, vy) = grid.vertex_dims();
    vx * vy * 3
}

#[inline]
fn normalize(px: [u8; 3]) -> Color {
    [px[0] as f32 / 255.0, px[1] as f32 / 255.0, px[2] as f32 / 255.0]
}
