/*
This code is part of the TraplineTools field-deployment library.
Authors: Dr. John Lindsay (WhiteboxTools), Vector Control Services
Created: 19/10/2026
Last Modified: 19/10/2026
License: MIT
*/
use super::Point2D;
use std::f64;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Default for BoundingBox {
    /// An empty box; expanding it by anything yields the other box.
    fn default() -> BoundingBox {
        BoundingBox {
            min_x: f64::INFINITY,
            min_y: f64::INFINITY,
            max_x: f64::NEG_INFINITY,
            max_y: f64::NEG_INFINITY,
        }
    }
}

impl BoundingBox {
    pub fn new(min_x: f64, max_x: f64, min_y: f64, max_y: f64) -> BoundingBox {
        BoundingBox {
            min_x: min_x.min(max_x),
            min_y: min_y.min(max_y),
            max_x: max_x.max(min_x),
            max_y: max_y.max(min_y),
        }
    }

    pub fn from_two_points(p1: Point2D, p2: Point2D) -> BoundingBox {
        BoundingBox::new(p1.x, p2.x, p1.y, p2.y)
    }

    pub fn from_points(points: &[Point2D]) -> BoundingBox {
        let mut bb = BoundingBox::default();
        for p in points {
            bb.expand_to_point(p);
        }
        bb
    }

    pub fn is_empty(&self) -> bool {
        self.min_x > self.max_x || self.min_y > self.max_y
    }

    pub fn get_height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn get_width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn overlaps(&self, other: BoundingBox) -> bool {
        !(self.max_y < other.min_y
            || self.max_x < other.min_x
            || self.min_y > other.max_y
            || self.min_x > other.max_x)
    }

    pub fn is_point_in_box(&self, x: f64, y: f64) -> bool {
        !(self.max_y < y || self.max_x < x || self.min_y > y || self.min_x > x)
    }

    pub fn expand_to(&mut self, other: BoundingBox) {
        self.max_y = self.max_y.max(other.max_y);
        self.max_x = self.max_x.max(other.max_x);
        self.min_y = self.min_y.min(other.min_y);
        self.min_x = self.min_x.min(other.min_x);
    }

    pub fn expand_to_point(&mut self, p: &Point2D) {
        self.max_y = self.max_y.max(p.y);
        self.max_x = self.max_x.max(p.x);
        self.min_y = self.min_y.min(p.y);
        self.min_x = self.min_x.min(p.x);
    }

    pub fn expand_by(&mut self, value: f64) {
        self.max_y += value;
        self.max_x += value;
        self.min_y -= value;
        self.min_x -= value;
    }
}

#[cfg(test)]
mod test {
    use super::BoundingBox;
    use crate::structures::Point2D;

    #[test]
    fn test_from_points() {
        let bb = BoundingBox::from_points(&[
            Point2D::new(5.0, -1.0),
            Point2D::new(-2.0, 4.0),
            Point2D::new(1.0, 1.0),
        ]);
        assert_eq!(bb, BoundingBox::new(-2.0, 5.0, -1.0, 4.0));
        assert_eq!(bb.get_width(), 7.0);
        assert_eq!(bb.get_height(), 5.0);
        assert!(BoundingBox::default().is_empty());
    }

    #[test]
    fn test_overlaps_and_expand() {
        let mut a = BoundingBox::new(0.0, 10.0, 0.0, 10.0);
        let b = BoundingBox::new(10.0, 20.0, 5.0, 6.0);
        let c = BoundingBox::new(11.0, 20.0, 5.0, 6.0);
        assert!(a.overlaps(b));
        assert!(!a.overlaps(c));
        a.expand_to(c);
        assert_eq!(a.max_x, 20.0);
        a.expand_by(1.0);
        assert_eq!(a, BoundingBox::new(-1.0, 21.0, -1.0, 11.0));
    }
}
