//! I/O helpers for RGB rasters, debug maps and JSON.
//!
//! - `load_rgb_image`: read a PNG/JPEG into an [`RgbImage`] with bottom-left origin.
//! - `save_rgb_image`: write an [`RgbImage`] back with the usual top-left origin.
//! - `save_grayscale_f32` / `save_edge_mask`: dump saliency and edge maps.
//! - `write_json_file`: pretty-print a serializable value to disk.
use super::{EdgeMask, ImageF32, ImageView, RgbImage};
use image::{GrayImage, Luma, RgbImage as ImageRsRgb};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Load an image from disk as RGB8 and flip it to bottom-left origin.
pub fn load_rgb_image(path: &Path) -> Result<RgbImage, String> {
    let img = image::open(path)
        .map_err(|e| format!("Failed to open {}: {e}", path.display()))?
        .into_rgb8();
    let width = img.width() as usize;
    let height = img.height() as usize;
    let raw = img.into_raw();
    Ok(RgbImage::from_top_left_bytes(width, height, &raw))
}

/// Save an RGB raster, undoing the load-time flip.
pub fn save_rgb_image(image: &RgbImage, path: &Path) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let out = ImageRsRgb::from_raw(
        image.width() as u32,
        image.height() as u32,
        image.to_top_left_bytes(),
    )
    .ok_or_else(|| "Failed to create image buffer".to_string())?;
    out.save(path)
        .map_err(|e| format!("Failed to save {}: {e}", path.display()))
}

/// Save a float map to a grayscale PNG, mapping `[0, 1]` to `[0, 255]`.
pub fn save_grayscale_f32(image: &ImageF32, path: &Path) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let mut out = GrayImage::new(image.w as u32, image.h as u32);
    for (y, row) in image.rows().enumerate() {
        let dst_y = (image.h - 1 - y) as u32;
        for (x, &px) in row.iter().enumerate() {
            let v = (px * 255.0).clamp(0.0, 255.0);
            out.put_pixel(x as u32, dst_y, Luma([v as u8]));
        }
    }
    out.save(path)
        .map_err(|e| format!("Failed to save {}: {e}", path.display()))
}

/// Save an edge mask as a black/white PNG.
pub fn save_edge_mask(mask: &EdgeMask, path: &Path) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let mut out = GrayImage::new(mask.w as u32, mask.h as u32);
    for (y, row) in mask.rows().enumerate() {
        let dst_y = (mask.h - 1 - y) as u32;
        for (x, &px) in row.iter().enumerate() {
            let v = if px > 0 { 255 } else { 0 };
            out.put_pixel(x as u32, dst_y, Luma([v]));
        }
    }
    out.save(path)
        .map_err(|e| format!("Failed to save {}: {e}", path.display()))
}

/// Serialize a value as pretty JSON to `path`, creating parent directories.
pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| format!("Failed to serialize JSON for {}: {e}", path.display()))?;
    fs::write(path, json).map_err(|e| format!("Failed to write JSON {}: {e}", path.display()))
}

fn ensure_parent_dir(path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create {}: {e}", parent.display()))?;
        }
    }
    Ok(())
}
