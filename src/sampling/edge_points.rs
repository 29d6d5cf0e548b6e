use crate::grid::CellBox;
use crate::image::EdgeMask;

/// Edge-mask pixels of one cell in cell-local coordinates, split by triangle.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EdgePoints {
    pub lower: Vec<[f32; 2]>,
    pub upper: Vec<[f32; 2]>,
}

/// Bucket the edge pixels inside `cell` into the lower/upper triangle.
///
/// Positions are normalized by the integer pixel extent of the box
/// (`floor(x + w) - floor(x)`), so they do not share the sampler's fractional
/// normalization. Pixels on the diagonal land in both lists.
pub fn extract_edge_points(cell: &CellBox, edges: &EdgeMask) -> EdgePoints {
    let mut out = EdgePoints::default();
    let ((x0, x1), (y0, y1)) = cell.pixel_span();
    let span_w = (x1 - x0) as f32;
    let span_h = (y1 - y0) as f32;
    if span_w <= 0.0 || span_h <= 0.0 {
        return out;
    }
    let max_x = edges.w as isize;
    let max_y = edges.h as isize;
    for py in y0.max(0)..y1.min(max_y) {
        for px in x0.max(0)..x1.min(max_x) {
            if !edges.is_edge(px as usize, py as usize) {
                continue;
            }
            let x = ((px - x0) as f32 + 0.5) / span_w;
            let y = ((py - y0) as f32 + 0.5) / span_h;
            let pos = x + y;
            if pos <= 1.0 {
                out.lower.push([x, y]);
            }
            if pos >= 1.0 {
                out.upper.push([x, y]);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagonal_pixels_go_to_both_triangles() {
        let mut mask = EdgeMask::empty(4, 4);
        // Anti-diagonal of a 4x4 box: (i + j) == 3 gives x + y == 1.
        for i in 0..4 {
            mask.set(i, 3 - i, 255);
        }
        mask.set(0, 0, 255);
        mask.set(3, 3, 255);
        let cell = CellBox { x: 0.0, y: 0.0, w: 4.0, h: 4.0 };
        let pts = extract_edge_points(&cell, &mask);
        assert_eq!(pts.lower.len(), 5);
        assert_eq!(pts.upper.len(), 5);
        assert!(pts.lower.contains(&[0.125, 0.125]));
        assert!(pts.upper.contains(&[0.875, 0.875]));
    }

    #[test]
    fn only_pixels_inside_the_box_are_scanned() {
        let mut mask = EdgeMask::empty(8, 4);
        mask.set(1, 1, 1);
        mask.set(5, 1, 1);
        let cell = CellBox { x: 4.0, y: 0.0, w: 4.0, h: 4.0 };
        let pts = extract_edge_points(&cell, &mask);
        assert_eq!(pts.lower, vec![[0.375, 0.375]]);
        assert!(pts.upper.is_empty());
    }
}
