use serde::Serialize;
use std::env;
use std::path::{Path, PathBuf};
use tri_fit::config::{load_config, RuntimeConfig};
use tri_fit::diagnostics::FitReport;
use tri_fit::driver::{CoefficientBuffers, FitDriver};
use tri_fit::grid::{IndexBuffer, VertexBuffer};
use tri_fit::image::io::{
    load_rgb_image, save_edge_mask, save_grayscale_f32, save_rgb_image, write_json_file,
};
use tri_fit::image::ImageView;
use tri_fit::preview::{mean_squared_error, render};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FitArtifacts<'a> {
    coefficients: &'a CoefficientBuffers,
    vertices: &'a VertexBuffer,
    indices: &'a IndexBuffer,
    report: &'a FitReport,
    mse: f64,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn usage() -> String {
    "Usage: tri_fit <config.json>\n       tri_fit <image> [coefficients.json]".to_string()
}

fn run() -> Result<(), String> {
    let first = env::args().nth(1).ok_or_else(usage)?;
    let config = resolve_config(Path::new(&first), env::args().nth(2))?;

    let image = load_rgb_image(&config.input)?;
    let (width, height) = image.dims();
    println!("Loaded {} ({width}x{height})", config.input.display());

    let mut driver = FitDriver::new(image).map_err(|e| e.to_string())?;
    driver.update(&config.params).map_err(|e| e.to_string())?;

    let buffers = driver
        .buffers()
        .ok_or_else(|| "Fit produced no buffers".to_string())?;
    let vertices = driver
        .vertices()
        .ok_or_else(|| "Fit produced no vertex buffer".to_string())?;
    let indices = driver
        .indices()
        .ok_or_else(|| "Fit produced no index buffer".to_string())?;

    let preview = render(buffers, width, height);
    let mse = mean_squared_error(driver.image(), &preview).map_err(|e| e.to_string())?;

    let report = driver.report();
    print_summary(report, mse);

    let artifacts = FitArtifacts {
        coefficients: buffers,
        vertices,
        indices,
        report,
        mse,
    };
    write_json_file(&config.output.coefficients_json, &artifacts)?;
    println!(
        "Coefficients written to {}",
        config.output.coefficients_json.display()
    );

    if let Some(path) = &config.output.preview_image {
        save_rgb_image(&preview, path)?;
        println!("Preview written to {}", path.display());
    }
    if let Some(path) = &config.output.saliency_image {
        let map = driver
            .saliency_map_for(&config.params)
            .map_err(|e| e.to_string())?;
        save_grayscale_f32(&map, path)?;
        println!("Saliency map written to {}", path.display());
    }
    if let Some(path) = &config.output.edges_image {
        let mask = driver
            .edge_mask_for(&config.params)
            .map_err(|e| e.to_string())?;
        save_edge_mask(&mask, path)?;
        println!("Edge mask written to {}", path.display());
    }
    Ok(())
}

/// A `.json` argument is a runtime config; anything else is an image fitted
/// with default parameters.
fn resolve_config(first: &Path, second: Option<String>) -> Result<RuntimeConfig, String> {
    let is_json = first
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        return load_config(first);
    }
    let output = second
        .map(PathBuf::from)
        .unwrap_or_else(|| first.with_extension("coefficients.json"));
    Ok(RuntimeConfig::for_image(first.to_path_buf(), output))
}

fn print_summary(report: &FitReport, mse: f64) {
    println!("Fit summary");
    println!("  image: {}x{}", report.image_width, report.image_height);
    println!("  grid: {}x{}", report.cells_x, report.cells_y);
    println!("  mode: {}", report.mode_index);
    println!("  edge pixels: {}", report.edge_pixels);
    println!("  fallback triangles: {}", report.fallback_triangles);
    for stage in &report.timing.stages {
        println!("  {}: {:.3} ms", stage.label, stage.elapsed_ms);
    }
    println!("  total: {:.3} ms", report.timing.total_ms);
    println!("  mse: {mse:.3}");
}
