//! Cell-local `(x, y)` → per-triangle barycentric `(s, t, u)`.
//!
//! The two triangles use mirrored frames so that control point index 0 of a
//! Bezier patch lands on the same physical corner role in both:
//!
//! - lower `(0,0), (1,0), (0,1)`: `t = x`, `u = y`, `s = 1 - t - u`
//! - upper `(1,0), (0,1), (1,1)`: `s = 1 - y`, `t = 1 - x`, `u = 1 - s - t`
use super::Sample;
use crate::grid::TriangleSlot;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BarycentricCoord {
    pub s: f32,
    pub t: f32,
    pub u: f32,
}

impl BarycentricCoord {
    #[inline]
    pub fn from_local(slot: TriangleSlot, x: f32, y: f32) -> Self {
        match slot {
            TriangleSlot::Lower => {
                let u = y;
                let t = x;
                Self { s: 1.0 - u - t, t, u }
            }
            TriangleSlot::Upper => {
                let s = 1.0 - y;
                let t = 1.0 - x;
                Self { s, t, u: 1.0 - s - t }
            }
        }
    }

    /// Inverse of [`BarycentricCoord::from_local`].
    #[inline]
    pub fn to_local(self, slot: TriangleSlot) -> (f32, f32) {
        match slot {
            TriangleSlot::Lower => (self.t, self.u),
            TriangleSlot::Upper => (1.0 - self.t, 1.0 - self.s),
        }
    }

    #[inline]
    pub fn sum(&self) -> f32 {
        self.s + self.t + self.u
    }
}

/// Barycentric coordinates of `samples` in the `slot` triangle's frame.
pub fn to_barycentric(samples: &[Sample], slot: TriangleSlot) -> Vec<BarycentricCoord> {
    samples
        .iter()
        .map(|p| BarycentricCoord::from_local(slot, p.x, p.y))
        .collect()
}
