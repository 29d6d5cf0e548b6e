#![doc = include_str!("../README.md")]

// Public modules (stable-ish surface)
pub mod config;
pub mod diagnostics;
pub mod driver;
pub mod error;
pub mod grid;
pub mod image;
pub mod preview;

// Building blocks used by the driver; public for tools and custom pipelines.
pub mod edges;
pub mod fit;
pub mod saliency;
pub mod sampling;

// --- High-level re-exports -------------------------------------------------

pub use crate::driver::{
    fit_grid, CoefficientBuffers, FitDriver, FitOutcome, FitParams, InterpolationMode,
};
pub use crate::error::FitError;
pub use crate::grid::{GridSize, TriangleSlot};

// Providers that can be swapped into a `FitDriver`.
pub use crate::edges::{EdgeProvider, EmptyEdges, GradientEdgeDetector};
pub use crate::saliency::{SaliencyMethod, SaliencyProvider, UniformSaliency};

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```no_run
/// use tri_fit::prelude::*;
///
/// # fn main() -> Result<(), FitError> {
/// let img = RgbImage::from_fn(256, 256, |x, y| [x as u8, y as u8, 128]);
/// let mut driver = FitDriver::new(img)?;
/// let params = FitParams {
///     grid: GridSize::square(16)?,
///     mode: InterpolationMode::Barycentric { degree: 2 },
///     ..Default::default()
/// };
/// driver.update(&params)?;
/// if let Some(buffers) = driver.buffers() {
///     println!("mode={} buffers={}", buffers.mode_index, buffers.buffers.len());
/// }
/// # Ok(())
/// # }
/// ```
pub mod prelude {
    pub use crate::image::{ImageView, RgbImage};
    pub use crate::{FitDriver, FitError, FitParams, GridSize, InterpolationMode};
}
