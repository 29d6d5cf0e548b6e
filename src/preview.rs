//! CPU reconstruction of fitted buffers and the error metric used to compare
//! modes.
//!
//! [`render`] evaluates, for every pixel centre, what the renderer would draw
//! from a [`CoefficientBuffers`]: constants, the side of a split curve, a
//! Bezier patch, or vertex colors blended across each triangle.
//! [`mean_squared_error`] compares two rasters per channel on the `0..=255`
//! scale.
use crate::driver::{CoefficientBuffers, InterpolationMode};
use crate::error::FitError;
use crate::fit::{evaluate, Color, SplitBoundary};
use crate::grid::{CellBox, TriangleSlot, VertexBuffer};
use crate::image::{ImageView, RgbImage};
use crate::sampling::BarycentricCoord;

/// Reconstruct a `width × height` image from fitted buffers.
pub fn render(buffers: &CoefficientBuffers, width: usize, height: usize) -> RgbImage {
    let grid = buffers.grid;
    let vertices = VertexBuffer::build(grid);
    let mut out = RgbImage::uniform(width, height, [0, 0, 0]);
    if width == 0 || height == 0 {
        return out;
    }
    for py in 0..height {
        let cy = cell_of(py, height, grid.cells_y());
        for px in 0..width {
            let cx = cell_of(px, width, grid.cells_x());
            let cell = vertices.cell_box(width, height, cx, cy);
            let (x, y) = local_position(&cell, px, py);
            let slot = if x + y <= 1.0 {
                TriangleSlot::Lower
            } else {
                TriangleSlot::Upper
            };
            let color = shade(buffers, &vertices, cx, cy, slot, x, y);
            out.set(px, py, to_rgb8(color));
        }
    }
    out
}

/// Cell whose fractional box holds the centre of pixel `p`.
#[inline]
fn cell_of(p: usize, extent: usize, cells: usize) -> usize {
    let c = ((p as f32 + 0.5) * cells as f32 / extent as f32).floor() as usize;
    c.min(cells - 1)
}

/// Cell-local position of the centre of pixel `(px, py)`.
fn local_position(cell: &CellBox, px: usize, py: usize) -> (f32, f32) {
    (
        ((px as f32 + 0.5 - cell.x) / cell.w).clamp(0.0, 1.0),
        ((py as f32 + 0.5 - cell.y) / cell.h).clamp(0.0, 1.0),
    )
}

fn shade(
    buffers: &CoefficientBuffers,
    vertices: &VertexBuffer,
    cx: usize,
    cy: usize,
    slot: TriangleSlot,
    x: f32,
    y: f32,
) -> Color {
    let read = |buffer: usize| buffers.get(buffer, cx, cy, slot).unwrap_or([0.0; 3]);
    match buffers.mode {
        InterpolationMode::ConstantAverage | InterpolationMode::ConstantCenter => read(0),
        InterpolationMode::LinearSplit | InterpolationMode::QuadraticSplit => {
            let quadratic = buffers.mode == InterpolationMode::QuadraticSplit;
            let boundary = SplitBoundary::from_params(read(2), quadratic);
            if boundary.on_side_a(x, y) {
                read(0)
            } else {
                read(1)
            }
        }
        InterpolationMode::Barycentric { degree } => {
            let coord = BarycentricCoord::from_local(slot, x, y);
            let count = buffers.buffers.len();
            let mut color = [0.0; 3];
            for (c, out) in color.iter_mut().enumerate() {
                let coeffs: Vec<f32> = (0..count).map(|i| read(i)[c]).collect();
                *out = evaluate(degree, &coeffs, coord);
            }
            color
        }
        InterpolationMode::VertexBilinear => {
            let corners = match slot {
                TriangleSlot::Lower => [(cx, cy), (cx + 1, cy), (cx, cy + 1)],
                TriangleSlot::Upper => [(cx + 1, cy), (cx, cy + 1), (cx + 1, cy + 1)],
            };
            let coord = BarycentricCoord::from_local(slot, x, y);
            let weights = [coord.s, coord.t, coord.u];
            let mut color = [0.0; 3];
            for ((vx, vy), w) in corners.into_iter().zip(weights) {
                let base = vertices.vertex_index(vx, vy) * 3;
                if let Some(rgb) = buffers.vertex_colors.get(base..base + 3) {
                    for c in 0..3 {
                        color[c] += w * rgb[c];
                    }
                }
            }
            color
        }
    }
}

#[inline]
fn to_rgb8(color: Color) -> [u8; 3] {
    color.map(|c| (c * 255.0).round().clamp(0.0, 255.0) as u8)
}

/// Mean squared error over all pixels and channels, on the `0..=255` scale.
pub fn mean_squared_error(a: &RgbImage, b: &RgbImage) -> Result<f64, FitError> {
    if a.dims() != b.dims() {
        return Err(FitError::SizeMismatch {
            what: "reconstruction",
            expected: a.dims(),
            actual: b.dims(),
        });
    }
    let (w, h) = a.dims();
    if w == 0 || h == 0 {
        return Err(FitError::EmptyImage {
            width: w,
            height: h,
        });
    }
    let sum: f64 = a
        .pixels()
        .iter()
        .zip(b.pixels())
        .flat_map(|(pa, pb)| (0..3).map(move |c| pa[c] as f64 - pb[c] as f64))
        .map(|d| d * d)
        .sum();
    Ok(sum / (w * h * 3) as f64)
}
