use super::traits::ImageView;

pub type Rgb = [u8; 3];

/// Owned RGB8 raster with bottom-left origin.
#[derive(Clone, Debug)]
pub struct RgbImage {
    w: usize,
    h: usize,
    data: Vec<Rgb>,
}

impl RgbImage {
    /// Wrap pixels that are already in bottom-left row order.
    ///
    /// Panics when `data.len() != w * h`.
    pub fn from_pixels(w: usize, h: usize, data: Vec<Rgb>) -> Self {
        assert_eq!(data.len(), w * h, "pixel buffer does not match {w}x{h}");
        Self { w, h, data }
    }

    /// Build from a tightly packed RGB byte buffer in top-left row order,
    /// flipping rows so row 0 ends up at the bottom.
    pub fn from_top_left_bytes(w: usize, h: usize, raw: &[u8]) -> Self {
        assert_eq!(raw.len(), w * h * 3, "byte buffer does not match {w}x{h}");
        let mut data = Vec::with_capacity(w * h);
        for y in (0..h).rev() {
            let row = &raw[y * w * 3..(y + 1) * w * 3];
            data.extend(row.chunks_exact(3).map(|px| [px[0], px[1], px[2]]));
        }
        Self { w, h, data }
    }

    /// Single-color image.
    pub fn uniform(w: usize, h: usize, color: Rgb) -> Self {
        Self {
            w,
            h,
            data: vec![color; w * h],
        }
    }

    /// Build by evaluating `f(x, y)` for each pixel (bottom-left origin).
    pub fn from_fn(w: usize, h: usize, mut f: impl FnMut(usize, usize) -> Rgb) -> Self {
        let mut data = Vec::with_capacity(w * h);
        for y in 0..h {
            for x in 0..w {
                data.push(f(x, y));
            }
        }
        Self { w, h, data }
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Rgb {
        self.data[y * self.w + x]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, px: Rgb) {
        self.data[y * self.w + x] = px;
    }

    pub fn pixels(&self) -> &[Rgb] {
        &self.data
    }

    /// Rec.601 luma in `[0, 255]`.
    #[inline]
    pub fn luma(&self, x: usize, y: usize) -> f32 {
        let [r, g, b] = self.get(x, y);
        0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32
    }

    /// Copy out as tightly packed RGB bytes in top-left row order.
    pub fn to_top_left_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.w * self.h * 3);
        for y in (0..self.h).rev() {
            for px in self.row(y) {
                out.extend_from_slice(px);
            }
        }
        out
    }
}

impl ImageView for RgbImage {
    type Pixel = Rgb;

    #[inline]
    fn width(&self) -> usize {
        self.w
    }
    #[inline]
    fn height(&self) -> usize {
        self.h
    }
    #[inline]
    fn row(&self, y: usize) -> &[Rgb] {
        let start = y * self.w;
        &self.data[start..start + self.w]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn top_left_bytes_are_flipped_once() {
        // 1x2 image: top pixel red, bottom pixel blue.
        let raw = [255u8, 0, 0, 0, 0, 255];
        let img = RgbImage::from_top_left_bytes(1, 2, &raw);
        assert_eq!(img.get(0, 0), [0, 0, 255]);
        assert_eq!(img.get(0, 1), [255, 0, 0]);
        assert_eq!(img.to_top_left_bytes(), raw.to_vec());
    }
}
