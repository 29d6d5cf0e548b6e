//! Interpolation policies the driver can run.
use crate::error::FitError;
use crate::fit::bezier::{control_point_count, MAX_DEGREE};
use serde::{Deserialize, Serialize};

/// How each triangle's colors are modelled.
///
/// Serialized as `{"kind": "constant_average"}` or
/// `{"kind": "barycentric", "degree": 3}`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InterpolationMode {
    /// Saliency-weighted mean color.
    ConstantAverage,
    /// Color of one pixel near the triangle's centroid.
    ConstantCenter,
    /// No fit: every lattice vertex takes the color underneath it.
    VertexBilinear,
    /// Two constant colors split by a line through the cell's edge pixels.
    LinearSplit,
    /// Two constant colors split by a parabola through the cell's edge pixels.
    QuadraticSplit,
    /// Triangular Bezier patch of degree 1..=4.
    Barycentric { degree: usize },
}

impl Default for InterpolationMode {
    fn default() -> Self {
        InterpolationMode::Barycentric { degree: MAX_DEGREE }
    }
}

impl InterpolationMode {
    /// Bezier mode of `degree`, validated.
    pub fn barycentric(degree: usize) -> Result<Self, FitError> {
        let mode = InterpolationMode::Barycentric { degree };
        mode.validate()?;
        Ok(mode)
    }

    pub fn validate(&self) -> Result<(), FitError> {
        match *self {
            InterpolationMode::Barycentric { degree } if !(1..=MAX_DEGREE).contains(&degree) => {
                Err(FitError::InvalidDegree(degree))
            }
            _ => Ok(()),
        }
    }

    /// Selector the renderer switches its shader path on.
    pub fn mode_index(&self) -> u32 {
        match *self {
            InterpolationMode::ConstantAverage => 0,
            InterpolationMode::ConstantCenter => 1,
            InterpolationMode::VertexBilinear => 2,
            InterpolationMode::LinearSplit => 3,
            InterpolationMode::QuadraticSplit => 4,
            InterpolationMode::Barycentric { degree } => 4 + degree as u32,
        }
    }

    /// Inverse of [`InterpolationMode::mode_index`].
    pub fn from_mode_index(index: u32) -> Option<Self> {
        Some(match index {
            0 => InterpolationMode::ConstantAverage,
            1 => InterpolationMode::ConstantCenter,
            2 => InterpolationMode::VertexBilinear,
            3 => InterpolationMode::LinearSplit,
            4 => InterpolationMode::QuadraticSplit,
            5..=8 => InterpolationMode::Barycentric {
                degree: index as usize - 4,
            },
            _ => return None,
        })
    }

    /// Number of per-triangle buffers the mode writes. Vertex-bilinear writes
    /// only the vertex color buffer.
    pub fn buffer_count(&self) -> usize {
        match *self {
            InterpolationMode::ConstantAverage | InterpolationMode::ConstantCenter => 1,
            InterpolationMode::VertexBilinear => 0,
            InterpolationMode::LinearSplit | InterpolationMode::QuadraticSplit => 3,
            InterpolationMode::Barycentric { degree } => control_point_count(degree),
        }
    }

    /// Whether the mode reads the edge mask.
    pub fn uses_edges(&self) -> bool {
        matches!(
            self,
            InterpolationMode::LinearSplit | InterpolationMode::QuadraticSplit
        )
    }

    /// Whether the mode reads the saliency map (when weighting is enabled).
    pub fn uses_saliency(&self) -> bool {
        matches!(
            self,
            InterpolationMode::ConstantAverage
                | InterpolationMode::LinearSplit
                | InterpolationMode::QuadraticSplit
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_indices_round_trip() {
        for index in 0..=8 {
            let mode = InterpolationMode::from_mode_index(index).unwrap();
            assert_eq!(mode.mode_index(), index);
            assert!(mode.validate().is_ok());
        }
        assert!(InterpolationMode::from_mode_index(9).is_none());
        assert_eq!(InterpolationMode::default().mode_index(), 8);
    }

    #[test]
    fn degree_is_validated() {
        assert_eq!(
            InterpolationMode::barycentric(0),
            Err(FitError::InvalidDegree(0))
        );
        assert_eq!(
            InterpolationMode::barycentric(5),
            Err(FitError::InvalidDegree(5))
        );
        assert_eq!(
            InterpolationMode::barycentric(3).unwrap().buffer_count(),
            10
        );
    }

    #[test]
    fn serde_uses_kind_tag() {
        let json = serde_json::to_string(&InterpolationMode::Barycentric { degree: 2 }).unwrap();
        assert_eq!(json, r#"{"kind":"barycentric","degree":2}"#);
        let mode: InterpolationMode = serde_json::from_str(r#"{"kind":"linear_split"}"#).unwrap();
        assert_eq!(mode, InterpolationMode::LinearSplit);
    }
}
