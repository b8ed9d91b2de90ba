/*
This code is part of the TraplineTools field-deployment library.
Authors: Dr. John Lindsay (WhiteboxTools), Vector Control Services
Created: 19/10/2026
Last Modified: 19/10/2026
License: MIT
*/
use super::{BoundingBox, Point2D};

const EPSILON: f64 = 1e-12;

/// A data structure to hold line segments, defined by
/// starting and ending points.
#[derive(Default, Copy, Clone, Debug)]
pub struct LineSegment {
    pub p1: Point2D,
    pub p2: Point2D,
}

impl PartialEq for LineSegment {
    fn eq(&self, other: &Self) -> bool {
        (self.p1.nearly_equals(&other.p1) && self.p2.nearly_equals(&other.p2))
            || (self.p1.nearly_equals(&other.p2) && self.p2.nearly_equals(&other.p1))
    }
}

impl LineSegment {
    /// Creates a new LineSegment.
    pub fn new(p1: Point2D, p2: Point2D) -> LineSegment {
        LineSegment { p1, p2 }
    }

    pub fn length(&self) -> f64 {
        self.p1.distance(&self.p2)
    }

    pub fn get_bounding_box(&self) -> BoundingBox {
        BoundingBox::from_two_points(self.p1, self.p2)
    }

    /// Returns the parameters `(t, u)` at which this segment and another
    /// cross, where `t` runs from 0 at `self.p1` to 1 at `self.p2` and `u`
    /// likewise along `other`. Parallel and collinear segments return `None`.
    ///
    /// Based on https://en.wikipedia.org/wiki/Line%E2%80%93line_intersection
    pub fn intersection_params(&self, other: &Self) -> Option<(f64, f64)> {
        let r = self.p2 - self.p1;
        let s = other.p2 - other.p1;
        let denom = r.cross(s);
        if denom.abs() < EPSILON {
            return None;
        }
        let qp = other.p1 - self.p1;
        let t = qp.cross(s) / denom;
        let u = qp.cross(r) / denom;
        if t >= 0f64 && t <= 1f64 && u >= 0f64 && u <= 1f64 {
            return Some((t, u));
        }
        None
    }

    /// Finds the point at which two line segments cross, if they do.
    pub fn get_intersection(&self, other: &Self) -> Option<Point2D> {
        if !self.get_bounding_box().overlaps(other.get_bounding_box()) {
            return None;
        }
        self.intersection_params(other)
            .map(|(t, _)| self.p1.lerp(&self.p2, t))
    }

    /// Squared distance from a point to the closest point on the segment.
    pub fn dist_to_segment_squared(&self, p: Point2D) -> f64 {
        let l2 = self.p1.distance_squared(&self.p2);
        if l2 == 0.0 {
            return p.distance_squared(&self.p1);
        }
        let t = ((p - self.p1) * (self.p2 - self.p1) / l2).max(0f64).min(1f64);
        p.distance_squared(&self.p1.lerp(&self.p2, t))
    }

    pub fn dist_to_segment(&self, p: Point2D) -> f64 {
        self.dist_to_segment_squared(p).sqrt()
    }
}
