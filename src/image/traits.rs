/// Read access to a row-major raster.
pub trait ImageView {
    type Pixel: Copy;

    fn width(&self) -> usize;
    fn height(&self) -> usize;

    fn row(&self, y: usize) -> &[Self::Pixel];

    fn rows(&self) -> Rows<'_, Self>
    where
        Self: Sized,
    {
        Rows { image: self, y: 0 }
    }

    /// Value at `(x, y)` with both coordinates clamped into the raster.
    ///
    /// Cell boxes are fractional, so a box touching the far edge of the image
    /// can address one pixel past the last row/column.
    #[inline]
    fn get_clamped(&self, x: isize, y: isize) -> Self::Pixel {
        let xi = x.clamp(0, self.width() as isize - 1) as usize;
        let yi = y.clamp(0, self.height() as isize - 1) as usize;
        self.row(yi)[xi]
    }

    fn dims(&self) -> (usize, usize) {
        (self.width(), self.height())
    }
}

pub trait ImageViewMut: ImageView {
    fn row_mut(&mut self, y: usize) -> &mut [Self::Pixel];
}

pub struct Rows<'a, I: ?Sized + ImageView> {
    image: &'a I,
    y: usize,
}

impl<'a, I: ImageView> Iterator for Rows<'a, I> {
    type Item = &'a [I::Pixel];

    fn next(&mut self) -> Option<Self::Item> {
        if self.y >= self.image.height() {
            return None;
        }
        let y = self.y;
        self.y += 1;
        Some(self.image.row(y))
    }
}
