/*
This code is part of the TraplineTools field-deployment library.
Authors: Vector Control Services
Created: 19/10/2026
Last Modified: 19/10/2026
License: MIT
*/

use super::poly_ops::point_in_features;
use crate::structures::{BoundingBox, LineSegment, Point2D};

const MIN_RUN_LENGTH: f64 = 1e-6;

/// Clips a polyline against a polygon layer. Each feature is a set of rings
/// (outer rings and holes, any orientation) read with the even-odd rule,
/// and the layer is the union of its features. Every stretch of the line
/// lying inside the layer is returned as its own vertex list, ordered along
/// the line. Runs of (near) zero length are dropped.
pub fn clip_line_to_polygon(
    line: &[Point2D],
    features: &[Vec<Vec<Point2D>>],
) -> Vec<Vec<Point2D>> {
    let mut runs: Vec<Vec<Point2D>> = vec![];
    if line.len() < 2 || features.iter().all(|f| f.is_empty()) {
        return runs;
    }
    let line_box = BoundingBox::from_points(line);
    let mut poly_box = BoundingBox::default();
    for ring in features.iter().flatten() {
        poly_box.expand_to(BoundingBox::from_points(ring));
    }
    if !line_box.overlaps(poly_box) {
        return runs;
    }

    // Cut positions along the line as (segment index, parameter). Segment
    // ends are included so that interior vertices are preserved.
    let mut cuts: Vec<(usize, f64)> = vec![];
    for (i, w) in line.windows(2).enumerate() {
        let seg = LineSegment::new(w[0], w[1]);
        let seg_box = seg.get_bounding_box();
        cuts.push((i, 0f64));
        for ring in features.iter().flatten() {
            let n = ring.len();
            for k in 0..n {
                let edge = LineSegment::new(ring[k], ring[(k + 1) % n]);
                if !seg_box.overlaps(edge.get_bounding_box()) {
                    continue;
                }
                if let Some((t, _)) = seg.intersection_params(&edge) {
                    cuts.push((i, t));
                }
            }
        }
        cuts.push((i, 1f64));
    }
    cuts.sort_by(|a, b| {
        a.0.cmp(&b.0)
            .then(a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
    });

    let at = |c: &(usize, f64)| line[c.0].lerp(&line[c.0 + 1], c.1);
    let mut current: Vec<Point2D> = vec![];
    for pair in cuts.windows(2) {
        let pa = at(&pair[0]);
        let pb = at(&pair[1]);
        if pa.distance_squared(&pb) == 0f64 {
            continue;
        }
        if point_in_features(&Point2D::midpoint(&pa, &pb), features) {
            if current.is_empty() {
                current.push(pa);
            }
            current.push(pb);
        } else if !current.is_empty() {
            runs.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        runs.push(current);
    }
    runs.retain(|r| run_length(r) > MIN_RUN_LENGTH);
    runs
}

fn run_length(vertices: &[Point2D]) -> f64 {
    vertices.windows(2).map(|w| w[0].distance(&w[1])).sum()
}

#[cfg(test)]
mod test {
    use super::clip_line_to_polygon;
    use crate::structures::Point2D;

    fn square(x0: f64, y0: f64, size: f64) -> Vec<Point2D> {
        vec![
            Point2D::new(x0, y0),
            Point2D::new(x0, y0 + size),
            Point2D::new(x0 + size, y0 + size),
            Point2D::new(x0 + size, y0),
            Point2D::new(x0, y0),
        ]
    }

    #[test]
    fn test_clip_through_square() {
        let rings = vec![square(0.0, 0.0, 100.0)];
        let line = vec![Point2D::new(40.0, -50.0), Point2D::new(40.0, 150.0)];
        let runs = clip_line_to_polygon(&line, &[rings]);
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].len(), 2);
        assert!(runs[0][0].nearly_equals(&Point2D::new(40.0, 0.0)));
        assert!(runs[0][1].nearly_equals(&Point2D::new(40.0, 100.0)));
    }

    #[test]
    fn test_hole_splits_run() {
        let rings = vec![square(0.0, 0.0, 100.0), square(20.0, 40.0, 40.0)];
        let line = vec![Point2D::new(40.0, -10.0), Point2D::new(40.0, 110.0)];
        let runs = clip_line_to_polygon(&line, &[rings]);
        assert_eq!(runs.len(), 2);
        assert!(runs[0][0].nearly_equals(&Point2D::new(40.0, 0.0)));
        assert!(runs[0][1].nearly_equals(&Point2D::new(40.0, 40.0)));
        assert!(runs[1][0].nearly_equals(&Point2D::new(40.0, 80.0)));
        assert!(runs[1][1].nearly_equals(&Point2D::new(40.0, 100.0)));
    }

    #[test]
    fn test_line_outside_yields_nothing() {
        let rings = vec![square(0.0, 0.0, 100.0)];
        let line = vec![Point2D::new(140.0, -50.0), Point2D::new(140.0, 150.0)];
        assert!(clip_line_to_polygon(&line, &[rings]).is_empty());
        // overlapping boxes but no crossing
        let rings = vec![vec![
            Point2D::new(0.0, 0.0),
            Point2D::new(100.0, 100.0),
            Point2D::new(100.0, 0.0),
            Point2D::new(0.0, 0.0),
        ]];
        let line = vec![Point2D::new(10.0, 50.0), Point2D::new(40.0, 90.0)];
        assert!(clip_line_to_polygon(&line, &[rings]).is_empty());
    }

    #[test]
    fn test_concave_polygon_gives_two_runs() {
        // U shape opening to the north
        let rings = vec![vec![
            Point2D::new(0.0, 0.0),
            Point2D::new(0.0, 100.0),
            Point2D::new(30.0, 100.0),
            Point2D::new(30.0, 30.0),
            Point2D::new(70.0, 30.0),
            Point2D::new(70.0, 100.0),
            Point2D::new(100.0, 100.0),
            Point2D::new(100.0, 0.0),
            Point2D::new(0.0, 0.0),
        ]];
        let line = vec![Point2D::new(-10.0, 60.0), Point2D::new(110.0, 60.0)];
        let runs = clip_line_to_polygon(&line, &[rings]);
        assert_eq!(runs.len(), 2);
        assert!(runs[0][0].nearly_equals(&Point2D::new(0.0, 60.0)));
        assert!(runs[0][1].nearly_equals(&Point2D::new(30.0, 60.0)));
        assert!(runs[1][0].nearly_equals(&Point2D::new(70.0, 60.0)));
    }

    #[test]
    fn test_nested_feature_keeps_run_whole() {
        // a second feature inside the first is not a hole
        let features = vec![vec![square(0.0, 0.0, 100.0)], vec![square(20.0, 40.0, 40.0)]];
        let line = vec![Point2D::new(40.0, -10.0), Point2D::new(40.0, 110.0)];
        let runs = clip_line_to_polygon(&line, &features);
        assert_eq!(runs.len(), 1);
        assert!(runs[0][0].nearly_equals(&Point2D::new(40.0, 0.0)));
        assert!(runs[0][runs[0].len() - 1].nearly_equals(&Point2D::new(40.0, 100.0)));
    }

    #[test]
    fn test_overlapping_features_clip_to_union() {
        let features = vec![vec![square(0.0, 0.0, 100.0)], vec![square(60.0, 20.0, 100.0)]];
        let line = vec![Point2D::new(-10.0, 50.0), Point2D::new(200.0, 50.0)];
        let runs = clip_line_to_polygon(&line, &features);
        assert_eq!(runs.len(), 1);
        assert!(runs[0][0].nearly_equals(&Point2D::new(0.0, 50.0)));
        assert!(runs[0][runs[0].len() - 1].nearly_equals(&Point2D::new(160.0, 50.0)));
        let length: f64 = runs[0].windows(2).map(|w| w[0].distance(&w[1])).sum();
        assert!((length - 160.0).abs() < 1e-6);
    }

    #[test]
    fn test_interior_vertices_kept() {
        let rings = vec![square(0.0, 0.0, 100.0)];
        let line = vec![
            Point2D::new(-10.0, 50.0),
            Point2D::new(50.0, 50.0),
            Point2D::new(50.0, 120.0),
        ];
        let runs = clip_line_to_polygon(&line, &[rings]);
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].len(), 3);
        assert!(runs[0][1].nearly_equals(&Point2D::new(50.0, 50.0)));
        assert!(runs[0][2].nearly_equals(&Point2D::new(50.0, 100.0)));
    }
}
