//! Raster containers shared by the fitting core.
//!
//! All buffers are row-major with row 0 at the *bottom* of the picture, the
//! same orientation as the triangulation's vertex space. Decoders in [`io`]
//! flip once at load time; nothing downstream flips again.
pub mod f32;
pub mod io;
pub mod mask;
pub mod rgb;
pub mod traits;

pub use self::f32::ImageF32;
pub use self::mask::EdgeMask;
pub use self::rgb::RgbImage;
pub use self::traits::{ImageView, ImageViewMut, Rows};
