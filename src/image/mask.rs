use super::traits::ImageView;

/// Binary edge mask: `> 0` marks an edge pixel.
#[derive(Clone, Debug)]
pub struct EdgeMask {
    pub w: usize,
    pub h: usize,
    pub data: Vec<u8>,
}

impl EdgeMask {
    /// Mask with no edge pixels.
    pub fn empty(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            data: vec![0; w * h],
        }
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.data[y * self.w + x]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, v: u8) {
        self.data[y * self.w + x] = v;
    }

    #[inline]
    pub fn is_edge(&self, x: usize, y: usize) -> bool {
        self.get(x, y) > 0
    }

    /// Number of edge pixels in the whole mask.
    pub fn edge_count(&self) -> usize {
        self.data.iter().filter(|&&v| v > 0).count()
    }
}

impl ImageView for EdgeMask {
    type Pixel = u8;

    #[inline]
    fn width(&self) -> usize {
        self.w
    }
    #[inline]
    fn height(&self) -> usize {
        self.h
    }
    #[inline]
    fn row(&self, y: usize) -> &[u8] {
        let start = y * self.w;
        &self.data[start..start + self.w]
    }
}
