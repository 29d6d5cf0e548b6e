use thiserror::Error;

/// Preconditions rejected before any fitting work starts.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum FitError {
    #[error("grid {cells_x}x{cells_y} outside 1..={max} cells per side")]
    GridOutOfRange {
        cells_x: usize,
        cells_y: usize,
        max: usize,
    },

    #[error("image has zero area ({width}x{height})")]
    EmptyImage { width: usize, height: usize },

    #[error("{what} is {actual:?} but the image is {expected:?}")]
    SizeMismatch {
        what: &'static str,
        expected: (usize, usize),
        actual: (usize, usize),
    },

    #[error("barycentric degree {0} is not in 1..=4")]
    InvalidDegree(usize),
}
