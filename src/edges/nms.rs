//! Non‑maximum suppression and hysteresis on gradient magnitude.
//!
//! NMS keeps a pixel only when its magnitude is strictly greater than both
//! neighbors along the quantized gradient direction (0°, 45°, 90°, 135°).
//! Hysteresis then keeps weak survivors (`>= low`) only when they are
//! 8‑connected to a strong one (`>= high`), the usual Canny linking.
//!
//! The outermost 1‑pixel frame is never marked so neighbor lookups need no
//! bounds checks.
use crate::edges::grad::Grad;
use crate::image::{EdgeMask, ImageF32, ImageView, ImageViewMut};

const TAN_22_5_DEG: f32 = 0.41421356237;

/// Value written to the mask for edge pixels.
pub const EDGE_VALUE: u8 = 255;

/// Magnitudes of the pixels that survive NMS and `mag >= low`; zero elsewhere.
pub fn suppress_non_maxima(grad: &Grad, low: f32) -> ImageF32 {
    let w = grad.gx.w;
    let h = grad.gx.h;
    let mut thin = ImageF32::new(w, h);
    if w < 3 || h < 3 {
        return thin;
    }

    for y in 1..h - 1 {
        let mag_prev = grad.mag.row(y - 1);
        let mag_row = grad.mag.row(y);
        let mag_next = grad.mag.row(y + 1);
        let gx_row = grad.gx.row(y);
        let gy_row = grad.gy.row(y);
        let out = thin.row_mut(y);

        for x in 1..w - 1 {
            let mag = mag_row[x];
            if mag < low || mag <= 0.0 {
                continue;
            }

            let gx = gx_row[x];
            let gy = gy_row[x];
            let abs_gx = gx.abs();
            let abs_gy = gy.abs();
            let same_sign = (gx >= 0.0 && gy >= 0.0) || (gx <= 0.0 && gy <= 0.0);

            let (neighbor1, neighbor2) = if abs_gx >= abs_gy {
                if abs_gy <= abs_gx * TAN_22_5_DEG {
                    (mag_row[x - 1], mag_row[x + 1])
                } else if same_sign {
                    (mag_prev[x - 1], mag_next[x + 1])
                } else {
                    (mag_prev[x + 1], mag_next[x - 1])
                }
            } else if abs_gx <= abs_gy * TAN_22_5_DEG {
                (mag_prev[x], mag_next[x])
            } else if same_sign {
                (mag_prev[x - 1], mag_next[x + 1])
            } else {
                (mag_prev[x + 1], mag_next[x - 1])
            };

            // Ties on the positive side keep plateaus one pixel wide.
            if mag < neighbor1 || mag <= neighbor2 {
                continue;
            }
            out[x] = mag;
        }
    }

    thin
}

/// Link NMS survivors into a binary mask: strong pixels seed, weak ones join
/// when 8‑connected to a seed.
pub fn hysteresis(thin: &ImageF32, low: f32, high: f32) -> EdgeMask {
    let (w, h) = thin.dims();
    let mut mask = EdgeMask::empty(w, h);
    let mut stack = Vec::new();
    for (i, &m) in thin.data.iter().enumerate() {
        if m > 0.0 && m >= high && mask.data[i] == 0 {
            mask.data[i] = EDGE_VALUE;
            stack.push(i);
        }
    }
    while let Some(i) = stack.pop() {
        let (x, y) = ((i % w) as isize, (i / w) as isize);
        for dy in -1..=1isize {
            for dx in -1..=1isize {
                let (nx, ny) = (x + dx, y + dy);
                if nx < 0 || ny < 0 || nx >= w as isize || ny >= h as isize {
                    continue;
                }
                let j = ny as usize * w + nx as usize;
                let m = thin.data[j];
                if mask.data[j] == 0 && m > 0.0 && m >= low {
                    mask.data[j] = EDGE_VALUE;
                    stack.push(j);
                }
            }
        }
    }
    mask
}
