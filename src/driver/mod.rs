//! Grid driver: runs the selected interpolation mode over every cell.
//!
//! A pass is
//!
//! 1. saliency map and edge mask from the providers (skipped when the mode
//!    does not read them),
//! 2. for every cell `(x, y)`, the pixel box derived from the bottom-left
//!    vertex `vertex[(cells_x + 1) · y + x] · (width, height)` and the box size
//!    `(width / cells_x, height / cells_y)`,
//! 3. both triangles fitted by [`CellFitter`],
//! 4. results written into [`CoefficientBuffers`] by cell index.
//!
//! Cells are independent, so step 3 fans out over Rayon when the `parallel`
//! feature is on and [`ParallelOptions`] allow it. Buffers are written after
//! the loop, in cell order.
//!
//! [`FitDriver`] owns the image and keeps the last [`RecomputeTrigger`]; it
//! only redoes the pass when that tuple changes.

pub mod buffers;
pub mod cell;
pub mod mode;
pub mod params;

pub use buffers::CoefficientBuffers;
pub use cell::{CellFit, CellFitter, TriangleFit};
pub use mode::InterpolationMode;
pub use params::{FitParams, ParallelOptions, RecomputeTrigger, MIN_EDGE_POINTS_RANGE};

use crate::diagnostics::{FitReport, TimingBreakdown};
use crate::edges::{EdgeProvider, GradientEdgeDetector};
use crate::error::FitError;
use crate::fit::vertex_colors;
use crate::grid::{IndexBuffer, TriangleSlot, VertexBuffer};
use crate::image::{EdgeMask, ImageF32, ImageView, RgbImage};
use crate::saliency::SaliencyProvider;
use crate::sampling::SourceMaps;
use log::debug;
use std::borrow::Cow;
use std::time::Instant;

/// Buffers of one pass plus the number of triangles that needed a fallback.
#[derive(Clone, Debug)]
pub struct FitOutcome {
    pub buffers: CoefficientBuffers,
    pub fallback_triangles: usize,
}

/// Fit every cell of `image` with explicit maps.
///
/// `saliency` and `edges` must have the image's dimensions.
pub fn fit_grid(
    image: &RgbImage,
    saliency: &ImageF32,
    edges: &EdgeMask,
    params: &FitParams,
) -> Result<FitOutcome, FitError> {
    check_inputs(image, saliency, edges)?;
    let trigger = params.trigger()?;
    Ok(run_pass(image, saliency, edges, &trigger, params.parallel))
}

fn check_inputs(image: &RgbImage, saliency: &ImageF32, edges: &EdgeMask) -> Result<(), FitError> {
    let (width, height) = image.dims();
    if width == 0 || height == 0 {
        return Err(FitError::EmptyImage { width, height });
    }
    if saliency.dims() != (width, height) {
        return Err(FitError::SizeMismatch {
            what: "saliency map",
            expected: (width, height),
            actual: saliency.dims(),
        });
    }
    if edges.dims() != (width, height) {
        return Err(FitError::SizeMismatch {
            what: "edge mask",
            expected: (width, height),
            actual: edges.dims(),
        });
    }
    Ok(())
}

fn run_pass(
    image: &RgbImage,
    saliency: &ImageF32,
    edges: &EdgeMask,
    trigger: &RecomputeTrigger,
    parallel: ParallelOptions,
) -> FitOutcome {
    let grid = trigger.grid;
    let vertices = VertexBuffer::build(grid);
    let mut buffers = CoefficientBuffers::new(grid, trigger.mode);
    if trigger.mode == InterpolationMode::VertexBilinear {
        buffers.vertex_colors = vertex_colors(image, &vertices);
        return FitOutcome {
            buffers,
            fallback_triangles: 0,
        };
    }

    let fitter = CellFitter::new(SourceMaps::new(image, saliency), edges, trigger);
    let (width, height) = image.dims();
    let fit_one = |index: usize| {
        let (cx, cy) = grid.cell_coords(index);
        fitter.fit_cell(&vertices.cell_box(width, height, cx, cy))
    };
    let cells = collect_cells(grid.cell_count(), parallel, fit_one);

    let mut fallback_triangles = 0;
    for (index, cell) in cells.into_iter().enumerate() {
        let (cx, cy) = grid.cell_coords(index);
        fallback_triangles += cell.fallbacks;
        for (slot, fit) in TriangleSlot::BOTH.into_iter().zip(cell.triangles) {
            write_triangle(&mut buffers, cx, cy, slot, fit);
        }
    }
    FitOutcome {
        buffers,
        fallback_triangles,
    }
}

fn collect_cells<F>(count: usize, parallel: ParallelOptions, fit_one: F) -> Vec<CellFit>
where
    F: Fn(usize) -> CellFit + Sync + Send,
{
    if parallel.should_parallelize(count) {
        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            return (0..count).into_par_iter().map(&fit_one).collect();
        }
    }
    (0..count).map(fit_one).collect()
}

fn write_triangle(
    buffers: &mut CoefficientBuffers,
    cx: usize,
    cy: usize,
    slot: TriangleSlot,
    fit: TriangleFit,
) {
    match fit {
        TriangleFit::Constant(color) => buffers.set(0, cx, cy, slot, color),
        TriangleFit::Split(split) => {
            buffers.set(0, cx, cy, slot, split.color_a);
            buffers.set(1, cx, cy, slot, split.color_b);
            buffers.set(2, cx, cy, slot, split.boundary.params());
        }
        TriangleFit::Patch([r, g, b]) => {
            for (i, ((r, g), b)) in r.into_iter().zip(g).zip(b).enumerate() {
                buffers.set(i, cx, cy, slot, [r, g, b]);
            }
        }
    }
}

/// Owns an image and serves fitted buffers, recomputing only when the
/// parameters that influence them change.
pub struct FitDriver {
    image: RgbImage,
    saliency_provider: Option<Box<dyn SaliencyProvider>>,
    edge_provider: Option<Box<dyn EdgeProvider>>,
    last: Option<RecomputeTrigger>,
    vertices: Option<VertexBuffer>,
    indices: Option<IndexBuffer>,
    saliency: Option<ImageF32>,
    edges: Option<EdgeMask>,
    buffers: Option<CoefficientBuffers>,
    report: FitReport,
}

impl FitDriver {
    /// Image must already be in bottom-left row order.
    pub fn new(image: RgbImage) -> Result<Self, FitError> {
        let (width, height) = image.dims();
        if width == 0 || height == 0 {
            return Err(FitError::EmptyImage { width, height });
        }
        Ok(Self {
            image,
            saliency_provider: None,
            edge_provider: None,
            last: None,
            vertices: None,
            indices: None,
            saliency: None,
            edges: None,
            buffers: None,
            report: FitReport::default(),
        })
    }

    /// Use `provider` instead of the algorithm selected by
    /// [`FitParams::saliency_method`].
    pub fn with_saliency_provider(mut self, provider: impl SaliencyProvider + 'static) -> Self {
        self.saliency_provider = Some(Box::new(provider));
        self.last = None;
        self
    }

    /// Use `provider` instead of a [`GradientEdgeDetector`] at
    /// [`FitParams::edge_threshold`].
    pub fn with_edge_provider(mut self, provider: impl EdgeProvider + 'static) -> Self {
        self.edge_provider = Some(Box::new(provider));
        self.last = None;
        self
    }

    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    /// Recompute when `params` differ from the last pass. Returns whether a
    /// pass ran.
    pub fn update(&mut self, params: &FitParams) -> Result<bool, FitError> {
        let trigger = params.trigger()?;
        if self.last == Some(trigger) && self.buffers.is_some() {
            return Ok(false);
        }
        self.recompute(params)?;
        Ok(true)
    }

    /// Run a full pass with maps from the configured providers.
    pub fn recompute(&mut self, params: &FitParams) -> Result<&CoefficientBuffers, FitError> {
        let trigger = params.trigger()?;
        let mut timing = TimingBreakdown::default();
        let (width, height) = self.image.dims();

        let saliency = if trigger.reads_saliency() {
            timing.time("saliency", || self.saliency_from_provider(&trigger))
        } else {
            ImageF32::new(width, height)
        };
        let edges = if trigger.reads_edges() {
            timing.time("edges", || self.edges_from_provider(&trigger))
        } else {
            EdgeMask::empty(width, height)
        };

        self.finish_pass(params, trigger, saliency, edges, timing)
    }

    /// Saliency map of the image from the configured provider, whether or not
    /// the selected mode reads it.
    pub fn compute_saliency_map(&self, params: &FitParams) -> Result<ImageF32, FitError> {
        let trigger = params.trigger()?;
        Ok(self.saliency_from_provider(&trigger))
    }

    /// Edge mask of the image from the configured provider, whether or not
    /// the selected mode reads it.
    pub fn detect_edges(&self, params: &FitParams) -> Result<EdgeMask, FitError> {
        let trigger = params.trigger()?;
        Ok(self.edges_from_provider(&trigger))
    }

    /// The saliency map the last pass used when it read one for `params`,
    /// otherwise a freshly computed map.
    pub fn saliency_map_for(&self, params: &FitParams) -> Result<Cow<'_, ImageF32>, FitError> {
        let trigger = params.trigger()?;
        match &self.saliency {
            Some(map) if self.last == Some(trigger) && trigger.reads_saliency() => {
                Ok(Cow::Borrowed(map))
            }
            _ => Ok(Cow::Owned(self.saliency_from_provider(&trigger))),
        }
    }

    /// The edge mask the last pass used when it read one for `params`,
    /// otherwise a freshly detected mask.
    pub fn edge_mask_for(&self, params: &FitParams) -> Result<Cow<'_, EdgeMask>, FitError> {
        let trigger = params.trigger()?;
        match &self.edges {
            Some(mask) if self.last == Some(trigger) && trigger.reads_edges() => {
                Ok(Cow::Borrowed(mask))
            }
            _ => Ok(Cow::Owned(self.edges_from_provider(&trigger))),
        }
    }

    fn saliency_from_provider(&self, trigger: &RecomputeTrigger) -> ImageF32 {
        match self.saliency_provider.as_deref() {
            Some(p) => p.compute(&self.image),
            None => trigger.saliency_method.compute(&self.image),
        }
    }

    fn edges_from_provider(&self, trigger: &RecomputeTrigger) -> EdgeMask {
        match self.edge_provider.as_deref() {
            Some(p) => p.detect(&self.image),
            None => GradientEdgeDetector::with_threshold(trigger.edge_threshold).detect(&self.image),
        }
    }

    /// Run a full pass with caller-supplied maps.
    pub fn recompute_with_maps(
        &mut self,
        params: &FitParams,
        saliency: ImageF32,
        edges: EdgeMask,
    ) -> Result<&CoefficientBuffers, FitError> {
        let trigger = params.trigger()?;
        self.finish_pass(params, trigger, saliency, edges, TimingBreakdown::default())
    }

    fn finish_pass(
        &mut self,
        params: &FitParams,
        trigger: RecomputeTrigger,
        saliency: ImageF32,
        edges: EdgeMask,
        mut timing: TimingBreakdown,
    ) -> Result<&CoefficientBuffers, FitError> {
        check_inputs(&self.image, &saliency, &edges)?;

        let start = Instant::now();
        let outcome = run_pass(&self.image, &saliency, &edges, &trigger, params.parallel);
        timing.push("fit", start.elapsed().as_secs_f64() * 1000.0);
        timing.finish();

        let grid = trigger.grid;
        if self.vertices.as_ref().map(|v| v.grid) != Some(grid) {
            self.vertices = Some(VertexBuffer::build(grid));
            self.indices = Some(IndexBuffer::build(grid));
        }

        let (width, height) = self.image.dims();
        debug!(
            "recompute: {}x{} cells, mode {}, {} fallback triangles, {:.2} ms",
            grid.cells_x(),
            grid.cells_y(),
            trigger.mode.mode_index(),
            outcome.fallback_triangles,
            timing.total_ms
        );
        self.report = FitReport {
            image_width: width,
            image_height: height,
            cells_x: grid.cells_x(),
            cells_y: grid.cells_y(),
            mode_index: trigger.mode.mode_index(),
            edge_pixels: edges.edge_count(),
            fallback_triangles: outcome.fallback_triangles,
            timing,
        };
        self.saliency = Some(saliency);
        self.edges = Some(edges);
        self.last = Some(trigger);
        let buffers: &CoefficientBuffers = self.buffers.insert(outcome.buffers);
        Ok(buffers)
    }

    /// Buffers of the last pass.
    pub fn buffers(&self) -> Option<&CoefficientBuffers> {
        self.buffers.as_ref()
    }

    pub fn vertices(&self) -> Option<&VertexBuffer> {
        self.vertices.as_ref()
    }

    pub fn indices(&self) -> Option<&IndexBuffer> {
        self.indices.as_ref()
    }

    /// Saliency map used by the last pass (all zero when it was not needed).
    pub fn saliency_map(&self) -> Option<&ImageF32> {
        self.saliency.as_ref()
    }

    /// Edge mask used by the last pass (empty when it was not needed).
    pub fn edge_mask(&self) -> Option<&EdgeMask> {
        self.edges.as_ref()
    }

    pub fn report(&self) -> &FitReport {
        &self.report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edges::EmptyEdges;
    use crate::grid::GridSize;
    use crate::saliency::UniformSaliency;

    fn params(mode: InterpolationMode, cells: usize) -> FitParams {
        FitParams {
            grid: GridSize::square(cells).unwrap(),
            mode,
            ..FitParams::default()
        }
    }

    #[test]
    fn rejects_mismatched_maps() {
        let img = RgbImage::uniform(8, 8, [1, 2, 3]);
        let err = fit_grid(
            &img,
            &ImageF32::new(4, 8),
            &EdgeMask::empty(8, 8),
            &FitParams::default(),
        )
        .unwrap_err();
        assert!(matches!(err, FitError::SizeMismatch { what: "saliency map", .. }));
        assert!(FitDriver::new(RgbImage::uniform(0, 3, [0, 0, 0])).is_err());
    }

    #[test]
    fn update_skips_unchanged_parameters() {
        let img = RgbImage::from_fn(16, 16, |x, y| [x as u8 * 16, y as u8 * 16, 0]);
        let mut driver = FitDriver::new(img)
            .unwrap()
            .with_saliency_provider(UniformSaliency(1.0))
            .with_edge_provider(EmptyEdges);
        let p = params(InterpolationMode::ConstantAverage, 4);
        assert!(driver.update(&p).unwrap());
        assert!(!driver.update(&p).unwrap());
        let q = FitParams {
            min_edge_points: 7,
            ..p.clone()
        };
        assert!(driver.update(&q).unwrap());
        assert_eq!(driver.vertices().unwrap().positions.len(), 25);
        assert_eq!(driver.indices().unwrap().indices.len(), 4 * 4 * 6);
        assert_eq!(driver.report().cells_x, 4);
    }

    #[test]
    fn invalid_degree_is_rejected_before_fitting() {
        let mut driver = FitDriver::new(RgbImage::uniform(4, 4, [0, 0, 0])).unwrap();
        let p = params(InterpolationMode::Barycentric { degree: 7 }, 2);
        assert_eq!(driver.update(&p), Err(FitError::InvalidDegree(7)));
        assert!(driver.buffers().is_none());
    }

    #[test]
    fn sequential_and_parallel_loops_agree() {
        let img = RgbImage::from_fn(40, 40, |x, y| [(x * 6) as u8, (y * 6) as u8, ((x + y) * 3) as u8]);
        let sal = ImageF32::filled(40, 40, 0.5);
        let edges = EdgeMask::empty(40, 40);
        let mut p = params(InterpolationMode::Barycentric { degree: 2 }, 10);
        p.parallel = ParallelOptions::disabled();
        let seq = fit_grid(&img, &sal, &edges, &p).unwrap();
        p.parallel = ParallelOptions::new(true, 1);
        let par = fit_grid(&img, &sal, &edges, &p).unwrap();
        assert_eq!(seq.buffers, par.buffers);
    }

    #[test]
    fn debug_maps_are_computed_when_the_pass_skipped_them() {
        let img = RgbImage::from_fn(32, 32, |x, y| {
            if (12..20).contains(&x) && (12..20).contains(&y) {
                [250, 250, 250]
            } else {
                [30, 30, 30]
            }
        });
        let mut driver = FitDriver::new(img).unwrap();
        let p = params(InterpolationMode::Barycentric { degree: 4 }, 4);
        driver.update(&p).unwrap();
        assert_eq!(driver.saliency_map().unwrap().max_value(), 0.0);
        assert_eq!(driver.edge_mask().unwrap().edge_count(), 0);

        let saliency = driver.saliency_map_for(&p).unwrap();
        assert!(matches!(saliency, Cow::Owned(_)));
        assert!((saliency.max_value() - 1.0).abs() < 1e-6);
        let edges = driver.edge_mask_for(&p).unwrap();
        assert!(edges.edge_count() > 0);
        assert_eq!(edges.edge_count(), driver.detect_edges(&p).unwrap().edge_count());
        assert_eq!(saliency.data, driver.compute_saliency_map(&p).unwrap().data);
    }

    #[test]
    fn debug_maps_reuse_the_maps_a_pass_read() {
        let img = RgbImage::from_fn(16, 16, |x, _| if x < 8 { [0, 0, 0] } else { [255, 255, 255] });
        let mut driver = FitDriver::new(img)
            .unwrap()
            .with_saliency_provider(UniformSaliency(0.5));
        let p = params(InterpolationMode::LinearSplit, 2);
        driver.update(&p).unwrap();
        assert!(matches!(driver.saliency_map_for(&p).unwrap(), Cow::Borrowed(_)));
        let edges = driver.edge_mask_for(&p).unwrap();
        assert!(matches!(edges, Cow::Borrowed(_)));
        assert_eq!(edges.edge_count(), driver.report().edge_pixels);
    }

    #[test]
    fn vertex_bilinear_fills_vertex_colors_only() {
        let img = RgbImage::uniform(6, 6, [255, 0, 0]);
        let out = fit_grid(
            &img,
            &ImageF32::new(6, 6),
            &EdgeMask::empty(6, 6),
            &params(InterpolationMode::VertexBilinear, 3),
        )
        .unwrap();
        assert!(out.buffers.buffers.is_empty());
        assert_eq!(out.buffers.vertex_colors.len(), 16 * 3);
        assert_eq!(&out.buffers.vertex_colors[..3], &[1.0, 0.0, 0.0]);
    }
}
