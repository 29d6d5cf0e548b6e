//! Fitting of one cell: both triangles under the selected mode.
use super::mode::InterpolationMode;
use super::params::RecomputeTrigger;
use crate::fit::{
    center_color, control_point_count, fit_bezier_rgb, fit_linear_split, fit_quadratic_split,
    weighted_mean, Color, SplitFit, UnderdeterminedPolicy,
};
use crate::grid::{CellBox, TriangleSlot};
use crate::image::EdgeMask;
use crate::sampling::{
    extract_edge_points, sample_triangle, to_barycentric, EdgePoints, SourceMaps,
};

/// Result for one triangle, ready to be written into the mode's buffers.
#[derive(Clone, Debug, PartialEq)]
pub enum TriangleFit {
    Constant(Color),
    Split(SplitFit),
    /// Control points per channel.
    Patch([Vec<f32>; 3]),
}

/// Both triangles of a cell plus how many of them needed a fallback color.
#[derive(Clone, Debug, PartialEq)]
pub struct CellFit {
    pub triangles: [TriangleFit; 2],
    pub fallbacks: usize,
}

/// Read-only inputs shared by every cell of a pass.
#[derive(Clone, Copy)]
pub struct CellFitter<'a> {
    pub maps: SourceMaps<'a>,
    pub edges: &'a EdgeMask,
    pub mode: InterpolationMode,
    pub use_saliency: bool,
    pub min_edge_points: usize,
    pub policy: UnderdeterminedPolicy,
}

impl<'a> CellFitter<'a> {
    pub fn new(maps: SourceMaps<'a>, edges: &'a EdgeMask, trigger: &RecomputeTrigger) -> Self {
        Self {
            maps,
            edges,
            mode: trigger.mode,
            use_saliency: trigger.use_saliency,
            min_edge_points: trigger.min_edge_points,
            policy: trigger.underdetermined,
        }
    }

    /// Fit the lower and upper triangle of `cell`.
    ///
    /// A triangle whose own samples cannot determine the model gets the
    /// fallback color in the mode's shape (see [`CellFitter::fallback_color`]).
    pub fn fit_cell(&self, cell: &CellBox) -> CellFit {
        let points = self
            .mode
            .uses_edges()
            .then(|| extract_edge_points(cell, self.edges));
        let mut fallbacks = 0;
        let triangles = TriangleSlot::BOTH.map(|slot| {
            self.fit_triangle(cell, slot, points.as_ref())
                .unwrap_or_else(|| {
                    fallbacks += 1;
                    self.fallback_fit(cell, slot)
                })
        });
        CellFit {
            triangles,
            fallbacks,
        }
    }

    fn fit_triangle(
        &self,
        cell: &CellBox,
        slot: TriangleSlot,
        points: Option<&EdgePoints>,
    ) -> Option<TriangleFit> {
        match self.mode {
            InterpolationMode::ConstantAverage | InterpolationMode::VertexBilinear => {
                let samples = sample_triangle(&self.maps, cell, slot);
                weighted_mean(&samples, self.use_saliency).map(TriangleFit::Constant)
            }
            InterpolationMode::ConstantCenter => Some(TriangleFit::Constant(center_color(
                self.maps.image,
                cell,
                slot,
            ))),
            InterpolationMode::LinearSplit | InterpolationMode::QuadraticSplit => {
                let pts: &[[f32; 2]] = match (points, slot) {
                    (Some(p), TriangleSlot::Lower) => &p.lower,
                    (Some(p), TriangleSlot::Upper) => &p.upper,
                    (None, _) => &[],
                };
                let fit = if self.mode == InterpolationMode::QuadraticSplit {
                    fit_quadratic_split(&self.maps, cell, slot, pts, self.use_saliency)
                } else {
                    fit_linear_split(
                        &self.maps,
                        cell,
                        slot,
                        pts,
                        self.min_edge_points,
                        self.use_saliency,
                    )
                };
                fit.map(TriangleFit::Split)
            }
            InterpolationMode::Barycentric { degree } => {
                let samples = sample_triangle(&self.maps, cell, slot);
                let bary = to_barycentric(&samples, slot);
                fit_bezier_rgb(degree, &samples, &bary, self.policy).map(TriangleFit::Patch)
            }
        }
    }

    fn fallback_fit(&self, cell: &CellBox, slot: TriangleSlot) -> TriangleFit {
        let color = self.fallback_color(cell, slot);
        match self.mode {
            InterpolationMode::LinearSplit | InterpolationMode::QuadraticSplit => {
                TriangleFit::Split(SplitFit::constant(color))
            }
            InterpolationMode::Barycentric { degree } => {
                let count = control_point_count(degree);
                TriangleFit::Patch([0, 1, 2].map(|c| vec![color[c]; count]))
            }
            _ => TriangleFit::Constant(color),
        }
    }

    /// Color for a triangle whose own fit had nothing to work with: the
    /// sibling triangle's mean, else the whole cell's mean, else black.
    pub fn fallback_color(&self, cell: &CellBox, slot: TriangleSlot) -> Color {
        let sibling = sample_triangle(&self.maps, cell, slot.sibling());
        weighted_mean(&sibling, self.use_saliency)
            .or_else(|| weighted_mean(&self.maps.sample_where(cell, |_, _| true), self.use_saliency))
            .unwrap_or([0.0; 3])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::{ImageF32, RgbImage};

    fn fitter<'a>(
        maps: SourceMaps<'a>,
        edges: &'a EdgeMask,
        mode: InterpolationMode,
    ) -> CellFitter<'a> {
        CellFitter {
            maps,
            edges,
            mode,
            use_saliency: false,
            min_edge_points: 4,
            policy: UnderdeterminedPolicy::LeastNorm,
        }
    }

    #[test]
    fn sliver_cell_falls_back_to_sibling() {
        // A box narrower than a pixel: the only sample sits at x = 0.5 / 0.4,
        // outside the lower triangle.
        let img = RgbImage::uniform(2, 2, [0, 255, 0]);
        let sal = ImageF32::new(2, 2);
        let edges = EdgeMask::empty(2, 2);
        let maps = SourceMaps::new(&img, &sal);
        let cell = CellBox { x: 0.0, y: 0.0, w: 0.4, h: 0.4 };
        assert!(sample_triangle(&maps, &cell, TriangleSlot::Lower).is_empty());
        for mode in [
            InterpolationMode::ConstantAverage,
            InterpolationMode::LinearSplit,
            InterpolationMode::Barycentric { degree: 3 },
        ] {
            let fit = fitter(maps, &edges, mode).fit_cell(&cell);
            assert_eq!(fit.fallbacks, 1);
            let [lower, _] = fit.triangles;
            match lower {
                TriangleFit::Constant(c) => assert_eq!(c, [0.0, 1.0, 0.0]),
                TriangleFit::Split(s) => {
                    assert_eq!(s.color_a, [0.0, 1.0, 0.0]);
                    assert_eq!(s.color_b, [0.0, 1.0, 0.0]);
                }
                TriangleFit::Patch(p) => {
                    assert_eq!(p[1].len(), 10);
                    assert!(p[1].iter().all(|&v| v == 1.0));
                }
            }
        }
    }

    #[test]
    fn center_mode_reads_single_pixels() {
        let img = RgbImage::from_fn(8, 8, |x, y| [x as u8 * 30, y as u8 * 30, 0]);
        let sal = ImageF32::new(8, 8);
        let edges = EdgeMask::empty(8, 8);
        let maps = SourceMaps::new(&img, &sal);
        let cell = CellBox { x: 0.0, y: 0.0, w: 8.0, h: 8.0 };
        let fits = fitter(maps, &edges, InterpolationMode::ConstantCenter)
            .fit_cell(&cell)
            .triangles;
        assert_eq!(fits[0], TriangleFit::Constant(center_color(&img, &cell, TriangleSlot::Lower)));
        assert_eq!(fits[1], TriangleFit::Constant(center_color(&img, &cell, TriangleSlot::Upper)));
        assert_ne!(fits[0], fits[1]);
    }
}
