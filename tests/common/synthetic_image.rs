use tri_fit::image::RgbImage;

/// Image filled with one color.
pub fn uniform_rgb(width: usize, height: usize, color: [u8; 3]) -> RgbImage {
    assert!(width > 0 && height > 0, "image dimensions must be positive");
    RgbImage::uniform(width, height, color)
}

/// Two flat halves: `left` for `x < split_x`, `right` elsewhere.
pub fn vertical_split_rgb(
    width: usize,
    height: usize,
    split_x: usize,
    left: [u8; 3],
    right: [u8; 3],
) -> RgbImage {
    assert!(split_x <= width, "split column must lie inside the image");
    RgbImage::from_fn(width, height, |x, _| if x < split_x { left } else { right })
}

/// Red grows with x and green with y by `step` per pixel, starting at
/// `step / 2` so pixel centres sample `step · (x + 0.5)`.
pub fn linear_ramp_rgb(width: usize, height: usize, step: u8) -> RgbImage {
    let half = step / 2;
    assert!(
        (width.max(height) - 1) * step as usize + half as usize <= 255,
        "ramp must stay inside 0..=255"
    );
    RgbImage::from_fn(width, height, |x, y| {
        [x as u8 * step + half, y as u8 * step + half, 0]
    })
}

/// Smooth but non-linear content for comparing modes.
pub fn radial_blob_rgb(width: usize, height: usize) -> RgbImage {
    let cx = width as f32 / 2.0;
    let cy = height as f32 / 2.0;
    let r = cx.min(cy);
    RgbImage::from_fn(width, height, |x, y| {
        let dx = (x as f32 - cx) / r;
        let dy = (y as f32 - cy) / r;
        let v = (1.0 - (dx * dx + dy * dy)).clamp(0.0, 1.0);
        [(v * 255.0) as u8, (x * 255 / width) as u8, 96]
    })
}
