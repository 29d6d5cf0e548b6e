//! Vertex/index layout of the triangulation and per-cell pixel boxes.
//!
//! Vertex positions are normalized to `[0, 1]²` with `(0, 0)` at the bottom
//! left of the image. The renderer uploads these buffers as-is; the fitting
//! driver only reads the bottom-left vertex of each cell back.
use super::GridSize;
use serde::Serialize;

/// Normalized `(x, y, z)` vertex positions, `(cells_x + 1) · (cells_y + 1)`
/// of them, row by row from the bottom.
#[derive(Clone, Debug, Serialize)]
pub struct VertexBuffer {
    pub grid: GridSize,
    pub positions: Vec<[f32; 3]>,
}

impl VertexBuffer {
    pub fn build(grid: GridSize) -> Self {
        let (vx, vy) = grid.vertex_dims();
        let x_step = 1.0 / grid.cells_x() as f32;
        let y_step = 1.0 / grid.cells_y() as f32;
        let mut positions = Vec::with_capacity(vx * vy);
        for y in 0..vy {
            for x in 0..vx {
                positions.push([x as f32 * x_step, y as f32 * y_step, 0.0]);
            }
        }
        Self { grid, positions }
    }

    /// Index of the vertex at lattice position `(vx, vy)`.
    #[inline]
    pub fn vertex_index(&self, vx: usize, vy: usize) -> usize {
        let (row_len, _) = self.grid.vertex_dims();
        row_len * vy + vx
    }

    /// Bottom-left vertex of cell `(cx, cy)`.
    #[inline]
    pub fn cell_origin(&self, cx: usize, cy: usize) -> [f32; 3] {
        self.positions[self.vertex_index(cx, cy)]
    }

    /// Pixel-space box of cell `(cx, cy)` on an image of `width × height`.
    pub fn cell_box(&self, width: usize, height: usize, cx: usize, cy: usize) -> CellBox {
        let origin = self.cell_origin(cx, cy);
        CellBox {
            x: origin[0] * width as f32,
            y: origin[1] * height as f32,
            w: width as f32 / self.grid.cells_x() as f32,
            h: height as f32 / self.grid.cells_y() as f32,
        }
    }
}

/// Triangle list indices into a [`VertexBuffer`]: per cell the lower triangle
/// `(bl, br, tl)` followed by the upper triangle `(br, tl, tr)`.
#[derive(Clone, Debug, Serialize)]
pub struct IndexBuffer {
    pub indices: Vec<u32>,
}

impl IndexBuffer {
    pub fn build(grid: GridSize) -> Self {
        let row_len = grid.cells_x() + 1;
        let mut indices = Vec::with_capacity(grid.triangle_count() * 3);
        for y in 0..grid.cells_y() {
            for x in 0..grid.cells_x() {
                let bottom_left = (row_len * y + x) as u32;
                let bottom_right = bottom_left + 1;
                let top_left = (row_len * (y + 1) + x) as u32;
                let top_right = top_left + 1;
                indices.extend_from_slice(&[bottom_left, bottom_right, top_left]);
                indices.extend_from_slice(&[bottom_right, top_left, top_right]);
            }
        }
        Self { indices }
    }
}

/// Pixel-space footprint of one cell. The origin is the bottom-left corner;
/// width and height are fractional in general.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellBox {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl CellBox {
    #[inline]
    pub fn is_empty(&self) -> bool {
        !(self.w > 0.0 && self.h > 0.0)
    }

    /// Integer pixel span `[start, end)` covered by the box along x and y,
    /// with both ends floored.
    #[inline]
    pub fn pixel_span(&self) -> ((isize, isize), (isize, isize)) {
        let x0 = self.x.floor() as isize;
        let y0 = self.y.floor() as isize;
        let x1 = (self.x + self.w).floor() as isize;
        let y1 = (self.y + self.h).floor() as isize;
        ((x0, x1), (y0, y1))
    }

    /// Pixel containing the cell-local point `(lx, ly) ∈ [0, 1]²`.
    #[inline]
    pub fn pixel_at(&self, lx: f32, ly: f32) -> (isize, isize) {
        (
            (lx * self.w + self.x).floor() as isize,
            (ly * self.h + self.y).floor() as isize,
        )
    }
}
