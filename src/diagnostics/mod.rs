//! Diagnostics reported alongside fitted buffers.
//!
//! [`TimingBreakdown`] records how long each stage of a recompute took
//! (saliency map, edge mask, cell fits); [`FitReport`] bundles it with a few
//! counters for the tools.

pub mod timing;

pub use timing::{StageTiming, TimingBreakdown};

use serde::Serialize;

/// Summary of one recompute.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FitReport {
    pub image_width: usize,
    pub image_height: usize,
    pub cells_x: usize,
    pub cells_y: usize,
    pub mode_index: u32,
    /// Edge pixels in the mask used by the split modes (0 otherwise).
    pub edge_pixels: usize,
    /// Triangles whose own samples could not determine a fit.
    pub fallback_triangles: usize,
    pub timing: TimingBreakdown,
}
