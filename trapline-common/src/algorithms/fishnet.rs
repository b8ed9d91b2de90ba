/*
This code is part of the TraplineTools field-deployment library.
Authors: Vector Control Services
Created: 19/10/2026
Last Modified: 19/10/2026
License: MIT
*/

use crate::structures::{BoundingBox, Point2D, Polyline};

/// Number of fishnet columns needed for lines starting at `origin_x` to
/// reach the eastern edge of `extent`.
pub fn fishnet_columns(extent: &BoundingBox, origin_x: f64, spacing: f64) -> usize {
    if !(spacing > 0f64) || extent.is_empty() {
        return 0;
    }
    ((extent.max_x - origin_x) / spacing).ceil().max(0f64) as usize
}

/// The vertical (north-south) lines of a polyline fishnet. Line `k` sits at
/// `origin.x + k * spacing` and runs from the southern to the northern edge
/// of the extent, south to north. Line ids are assigned west to east,
/// starting at 1.
pub fn fishnet_lines(extent: &BoundingBox, origin: &Point2D, spacing: f64) -> Vec<Polyline> {
    if !(spacing > 0f64) || extent.is_empty() {
        return vec![];
    }
    let columns = fishnet_columns(extent, origin.x, spacing);
    let mut lines = Vec::with_capacity(columns + 1);
    for k in 0..=columns {
        let x = origin.x + k as f64 * spacing;
        lines.push(Polyline::new(
            &[Point2D::new(x, origin.y), Point2D::new(x, extent.max_y)],
            k + 1,
        ));
    }
    lines
}

#[cfg(test)]
mod test {
    use super::{fishnet_columns, fishnet_lines};
    use crate::structures::{BoundingBox, Point2D};

    #[test]
    fn test_fishnet_lines_cover_extent() {
        let extent = BoundingBox::new(-50.0, 1050.0, -50.0, 550.0);
        let origin = Point2D::new(-50.0, -50.0);
        let lines = fishnet_lines(&extent, &origin, 200.0);
        assert_eq!(fishnet_columns(&extent, origin.x, 200.0), 6);
        assert_eq!(lines.len(), 7);
        for (k, line) in lines.iter().enumerate() {
            assert_eq!(line.id, k + 1);
            assert_eq!(line[0].x, -50.0 + k as f64 * 200.0);
            assert_eq!(line[0].y, -50.0);
            assert_eq!(line[1].y, 550.0);
        }
        assert!(lines.last().unwrap()[0].x >= extent.max_x);
    }

    #[test]
    fn test_fishnet_rejects_bad_spacing() {
        let extent = BoundingBox::new(0.0, 10.0, 0.0, 10.0);
        assert!(fishnet_lines(&extent, &Point2D::new(0.0, 0.0), 0.0).is_empty());
        assert!(fishnet_lines(&extent, &Point2D::new(0.0, 0.0), -5.0).is_empty());
    }
}
