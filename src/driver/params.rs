//! Parameters of a fitting pass.
use super::mode::InterpolationMode;
use crate::error::FitError;
use crate::fit::bezier::UnderdeterminedPolicy;
use crate::grid::GridSize;
use crate::saliency::SaliencyMethod;
use serde::{Deserialize, Serialize};

/// Accepted range for the minimum number of edge points of a linear split.
pub const MIN_EDGE_POINTS_RANGE: (usize, usize) = (2, 20);

/// Controls whether the cell loop runs sequentially or with Rayon.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParallelOptions {
    pub enabled: bool,
    pub min_cells_for_parallel: usize,
}

impl ParallelOptions {
    pub fn new(enabled: bool, min_cells_for_parallel: usize) -> Self {
        Self {
            enabled,
            min_cells_for_parallel: min_cells_for_parallel.max(1),
        }
    }

    pub fn disabled() -> Self {
        Self {
            enabled: false,
            min_cells_for_parallel: usize::MAX,
        }
    }

    /// Returns true when the loop over `cell_count` cells should use Rayon.
    pub fn should_parallelize(&self, cell_count: usize) -> bool {
        self.enabled && cell_count >= self.min_cells_for_parallel.max(1)
    }
}

impl Default for ParallelOptions {
    fn default() -> Self {
        Self {
            enabled: cfg!(feature = "parallel"),
            min_cells_for_parallel: 64,
        }
    }
}

/// Every knob of a fitting pass.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FitParams {
    pub grid: GridSize,
    /// Force `cells_y = cells_x`.
    pub square_grid: bool,
    pub mode: InterpolationMode,
    /// Weight color means by saliency.
    pub use_saliency: bool,
    pub saliency_method: SaliencyMethod,
    /// Low hysteresis threshold of the edge detector (gradient magnitude of
    /// 8-bit luminance).
    pub edge_threshold: f32,
    /// Edge points a triangle needs before the linear split is attempted.
    /// Clamped to `2..=20`.
    pub min_edge_points: usize,
    pub underdetermined: UnderdeterminedPolicy,
    pub parallel: ParallelOptions,
}

impl Default for FitParams {
    fn default() -> Self {
        Self {
            grid: GridSize::default(),
            square_grid: true,
            mode: InterpolationMode::default(),
            use_saliency: true,
            saliency_method: SaliencyMethod::CenterSurround,
            edge_threshold: 59.0,
            min_edge_points: 4,
            underdetermined: UnderdeterminedPolicy::default(),
            parallel: ParallelOptions::default(),
        }
    }
}

impl FitParams {
    /// Grid actually used, after applying `square_grid`.
    pub fn effective_grid(&self) -> Result<GridSize, FitError> {
        if self.square_grid {
            GridSize::square(self.grid.cells_x())
        } else {
            Ok(self.grid)
        }
    }

    pub fn effective_min_edge_points(&self) -> usize {
        let (lo, hi) = MIN_EDGE_POINTS_RANGE;
        self.min_edge_points.clamp(lo, hi)
    }

    /// The tuple whose change triggers a recompute.
    pub fn trigger(&self) -> Result<RecomputeTrigger, FitError> {
        self.mode.validate()?;
        Ok(RecomputeTrigger {
            grid: self.effective_grid()?,
            mode: self.mode,
            use_saliency: self.use_saliency,
            saliency_method: self.saliency_method,
            edge_threshold: self.edge_threshold,
            min_edge_points: self.effective_min_edge_points(),
            underdetermined: self.underdetermined,
        })
    }
}

/// Snapshot of the parameters that influence the fitted buffers. The driver
/// keeps the last one and skips work while it is unchanged.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RecomputeTrigger {
    pub grid: GridSize,
    pub mode: InterpolationMode,
    pub use_saliency: bool,
    pub saliency_method: SaliencyMethod,
    pub edge_threshold: f32,
    pub min_edge_points: usize,
    pub underdetermined: UnderdeterminedPolicy,
}

impl RecomputeTrigger {
    /// Whether a pass with these parameters weights samples by saliency.
    pub fn reads_saliency(&self) -> bool {
        self.use_saliency && self.mode.uses_saliency()
    }

    /// Whether a pass with these parameters reads the edge mask.
    pub fn reads_edges(&self) -> bool {
        self.mode.uses_edges()
    }
}
