/*
This code is part of the TraplineTools field-deployment library.
Authors: Vector Control Services
Created: 19/10/2026
Last Modified: 19/10/2026
License: MIT
*/

use crate::na::{Point2, Rotation2, Translation2};
use crate::structures::Point2D;

/// Rotates a set of points clockwise (positive angles, compass sense) about
/// a pivot. A zero angle returns the input untouched so that unrotated
/// coordinates stay bit-exact.
pub fn rotate_points(points: &[Point2D], pivot: &Point2D, clockwise_degrees: f64) -> Vec<Point2D> {
    if clockwise_degrees % 360f64 == 0f64 {
        return points.to_vec();
    }
    // translate to the pivot, rotate, translate back
    let to_origin = Translation2::new(-pivot.x, -pivot.y);
    let back = Translation2::new(pivot.x, pivot.y);
    let rot = Rotation2::new(-clockwise_degrees.to_radians());
    points
        .iter()
        .map(|p| {
            let q = back * (rot * (to_origin * Point2::new(p.x, p.y)));
            Point2D::new(q.x, q.y)
        })
        .collect()
}

#[cfg(test)]
mod test {
    use super::rotate_points;
    use crate::structures::Point2D;

    #[test]
    fn test_rotate_north_south_line_to_east_west() {
        let pivot = Point2D::new(1_600_000.0, 5_000_000.0);
        let line = vec![
            Point2D::new(1_600_000.0, 4_999_000.0),
            Point2D::new(1_600_000.0, 5_001_000.0),
        ];
        let rotated = rotate_points(&line, &pivot, 90.0);
        // the southern end swings round to the west
        assert!((rotated[0].x - 1_599_000.0).abs() < 1e-6);
        assert!((rotated[0].y - 5_000_000.0).abs() < 1e-6);
        assert!((rotated[1].x - 1_601_000.0).abs() < 1e-6);
        assert!((rotated[1].y - 5_000_000.0).abs() < 1e-6);
    }

    #[test]
    fn test_rotation_preserves_distance_to_pivot() {
        let pivot = Point2D::new(3.0, -2.0);
        let pts = vec![
            Point2D::new(10.0, 4.0),
            Point2D::new(-7.5, 1.25),
            Point2D::new(3.0, 40.0),
        ];
        for angle in [17.0, -45.0, 123.4, 400.0] {
            let rotated = rotate_points(&pts, &pivot, angle);
            for (a, b) in pts.iter().zip(rotated.iter()) {
                assert!((a.distance(&pivot) - b.distance(&pivot)).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_zero_rotation_is_identity() {
        let pivot = Point2D::new(0.3, 0.7);
        let pts = vec![Point2D::new(1_480_000.0, 5_277_000.0)];
        assert_eq!(rotate_points(&pts, &pivot, 0.0), pts);
        assert_eq!(rotate_points(&pts, &pivot, 360.0), pts);
    }

    #[test]
    fn test_counter_clockwise_with_negative_angle() {
        // north of the pivot swings round to the west
        let pivot = Point2D::new(10.0, 10.0);
        let q = rotate_points(&[Point2D::new(10.0, 20.0)], &pivot, -90.0)[0];
        assert!(q.x.abs() < 1e-9);
        assert!((q.y - 10.0).abs() < 1e-9);
    }
}
