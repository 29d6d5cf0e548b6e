//! Flat output buffers handed to the renderer.
//!
//! Every per-triangle buffer holds `cells_x · cells_y · 6` floats; cell
//! `(x, y)` owns the block starting at `(x + y · cells_x) · 6`, lower triangle
//! first. What a buffer means depends on the mode:
//!
//! | mode                 | buffers                                        |
//! |----------------------|------------------------------------------------|
//! | constant (avg/center)| `[colors]`                                     |
//! | vertex-bilinear      | none; `vertex_colors` holds 3 floats per vertex|
//! | linear/quadratic split | `[color_a, color_b, curve params]`           |
//! | barycentric degree n | one buffer per control point, RGB per triangle |
use super::mode::InterpolationMode;
use crate::fit::Color;
use crate::grid::{GridSize, TriangleSlot, FLOATS_PER_CELL};
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoefficientBuffers {
    pub grid: GridSize,
    pub mode: InterpolationMode,
    /// Renderer-facing selector, see [`InterpolationMode::mode_index`].
    pub mode_index: u32,
    pub buffers: Vec<Vec<f32>>,
    pub vertex_colors: Vec<f32>,
}

impl CoefficientBuffers {
    /// Zeroed buffers sized for `mode` on `grid`.
    pub fn new(grid: GridSize, mode: InterpolationMode) -> Self {
        Self {
            grid,
            mode,
            mode_index: mode.mode_index(),
            buffers: vec![vec![0.0; grid.buffer_len()]; mode.buffer_count()],
            vertex_colors: Vec::new(),
        }
    }

    /// Offset of the first channel of `slot` in cell `(cx, cy)`.
    #[inline]
    pub fn index(&self, cx: usize, cy: usize, slot: TriangleSlot) -> usize {
        self.grid.cell_index(cx, cy) * FLOATS_PER_CELL + slot.offset()
    }

    pub fn buffer(&self, buffer: usize) -> Option<&[f32]> {
        self.buffers.get(buffer).map(Vec::as_slice)
    }

    /// RGB triple of `slot` in cell `(cx, cy)` from `buffer`.
    pub fn get(&self, buffer: usize, cx: usize, cy: usize, slot: TriangleSlot) -> Option<Color> {
        let base = self.index(cx, cy, slot);
        let data = self.buffers.get(buffer)?;
        Some([data[base], data[base + 1], data[base + 2]])
    }

    /// Write an RGB triple. Panics if `buffer` does not exist for this mode.
    pub fn set(&mut self, buffer: usize, cx: usize, cy: usize, slot: TriangleSlot, value: Color) {
        let base = self.index(cx, cy, slot);
        self.buffers[buffer][base..base + 3].copy_from_slice(&value);
    }

    /// Whether any stored float is NaN or infinite.
    pub fn has_non_finite(&self) -> bool {
        self.buffers
            .iter()
            .flatten()
            .chain(&self.vertex_colors)
            .any(|v| !v.is_finite())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_follows_cell_then_slot() {
        let grid = GridSize::new(3, 2).unwrap();
        let mut b = CoefficientBuffers::new(grid, InterpolationMode::LinearSplit);
        assert_eq!(b.buffers.len(), 3);
        assert_eq!(b.buffer(0).unwrap().len(), 36);
        assert_eq!(b.index(1, 1, TriangleSlot::Upper), (1 + 3) * 6 + 3);
        b.set(2, 2, 1, TriangleSlot::Lower, [0.1, 0.2, 0.3]);
        assert_eq!(&b.buffers[2][30..33], &[0.1, 0.2, 0.3]);
        assert_eq!(b.get(2, 2, 1, TriangleSlot::Lower), Some([0.1, 0.2, 0.3]));
        assert_eq!(b.get(3, 0, 0, TriangleSlot::Lower), None);
        assert!(!b.has_non_finite());
    }

    #[test]
    fn bezier_mode_allocates_one_buffer_per_control_point() {
        let grid = GridSize::new(2, 2).unwrap();
        let b = CoefficientBuffers::new(grid, InterpolationMode::Barycentric { degree: 4 });
        assert_eq!(b.buffers.len(), 15);
        assert_eq!(b.mode_index, 8);
        let v = CoefficientBuffers::new(grid, InterpolationMode::VertexBilinear);
        assert!(v.buffers.is_empty());
    }
}
