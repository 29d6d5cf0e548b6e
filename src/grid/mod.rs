//! Regular triangulation of the image plane.
//!
//! A grid of `cells_x × cells_y` axis-aligned cells covers the image; every
//! cell is cut along its bottom-right → top-left diagonal into a lower and an
//! upper triangle. Cell and vertex numbering runs left to right, then bottom
//! to top, in the bottom-left-origin vertex space.
//!
//! - [`GridSize`] validates the cell counts against the renderer's capacity.
//! - [`geometry`] lays out the normalized vertex and index buffers.
//! - [`CellBox`] is a cell's pixel-space footprint.
//! - [`TriangleSlot`] selects one of the two triangles of a cell.

pub mod geometry;

pub use geometry::{CellBox, IndexBuffer, VertexBuffer};

use crate::error::FitError;
use serde::{Deserialize, Serialize};

/// Largest number of cells per side the consuming renderer can bind
/// (its uniform buffers hold `52 · 52 · 6` floats).
pub const MAX_CELLS_PER_SIDE: usize = 52;

/// Number of floats a per-triangle buffer holds per cell (2 triangles × RGB).
pub const FLOATS_PER_CELL: usize = 6;

/// Validated grid dimensions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawGridSize", into = "RawGridSize")]
pub struct GridSize {
    cells_x: usize,
    cells_y: usize,
}

impl GridSize {
    pub fn new(cells_x: usize, cells_y: usize) -> Result<Self, FitError> {
        let range = 1..=MAX_CELLS_PER_SIDE;
        if !range.contains(&cells_x) || !range.contains(&cells_y) {
            return Err(FitError::GridOutOfRange {
                cells_x,
                cells_y,
                max: MAX_CELLS_PER_SIDE,
            });
        }
        Ok(Self { cells_x, cells_y })
    }

    /// Square grid with `cells` cells per side.
    pub fn square(cells: usize) -> Result<Self, FitError> {
        Self::new(cells, cells)
    }

    #[inline]
    pub fn cells_x(&self) -> usize {
        self.cells_x
    }

    #[inline]
    pub fn cells_y(&self) -> usize {
        self.cells_y
    }

    #[inline]
    pub fn cell_count(&self) -> usize {
        self.cells_x * self.cells_y
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.cell_count() * 2
    }

    /// Length of one flat per-triangle coefficient buffer.
    #[inline]
    pub fn buffer_len(&self) -> usize {
        self.cell_count() * FLOATS_PER_CELL
    }

    /// Vertices per row and per column of the vertex lattice.
    #[inline]
    pub fn vertex_dims(&self) -> (usize, usize) {
        (self.cells_x + 1, self.cells_y + 1)
    }

    #[inline]
    pub fn cell_index(&self, cx: usize, cy: usize) -> usize {
        debug_assert!(cx < self.cells_x && cy < self.cells_y);
        cx + cy * self.cells_x
    }

    /// Inverse of [`GridSize::cell_index`].
    #[inline]
    pub fn cell_coords(&self, index: usize) -> (usize, usize) {
        (index % self.cells_x, index / self.cells_x)
    }
}

impl Default for GridSize {
    fn default() -> Self {
        Self {
            cells_x: MAX_CELLS_PER_SIDE,
            cells_y: MAX_CELLS_PER_SIDE,
        }
    }
}

#[derive(Clone, Copy, Serialize, Deserialize)]
struct RawGridSize {
    cells_x: usize,
    cells_y: usize,
}

impl TryFrom<RawGridSize> for GridSize {
    type Error = FitError;

    fn try_from(raw: RawGridSize) -> Result<Self, Self::Error> {
        GridSize::new(raw.cells_x, raw.cells_y)
    }
}

impl From<GridSize> for RawGridSize {
    fn from(size: GridSize) -> Self {
        Self {
            cells_x: size.cells_x,
            cells_y: size.cells_y,
        }
    }
}

/// One of the two triangles of a cell.
///
/// In cell-local coordinates `(x, y) ∈ [0, 1]²` the lower triangle spans
/// `(0,0), (1,0), (0,1)` and the upper one `(1,0), (0,1), (1,1)`. The shared
/// diagonal `x + y == 1` belongs to both.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriangleSlot {
    Lower,
    Upper,
}

impl TriangleSlot {
    pub const BOTH: [TriangleSlot; 2] = [TriangleSlot::Lower, TriangleSlot::Upper];

    #[inline]
    pub fn contains(self, x: f32, y: f32) -> bool {
        match self {
            TriangleSlot::Lower => x + y <= 1.0,
            TriangleSlot::Upper => x + y >= 1.0,
        }
    }

    /// Offset of this triangle's RGB triple inside a cell's 6-float block.
    #[inline]
    pub fn offset(self) -> usize {
        match self {
            TriangleSlot::Lower => 0,
            TriangleSlot::Upper => 3,
        }
    }

    #[inline]
    pub fn sibling(self) -> Self {
        match self {
            TriangleSlot::Lower => TriangleSlot::Upper,
            TriangleSlot::Upper => TriangleSlot::Lower,
        }
    }
}
