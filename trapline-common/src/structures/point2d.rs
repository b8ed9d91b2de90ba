/*
This code is part of the TraplineTools field-deployment library.
Authors: Dr. John Lindsay (WhiteboxTools), Vector Control Services
Created: 19/10/2026
Last Modified: 19/10/2026
License: MIT
*/
use std::fmt;
use std::ops::{Add, Mul, Sub};

/// A 2-D point, with x and y fields. In projected space x is the easting
/// and y the northing; in geographic space x is longitude and y latitude.
#[derive(Default, Copy, Clone, Debug)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl fmt::Display for Point2D {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "(x: {}, y: {})", self.x, self.y)
    }
}

impl Point2D {
    /// Creates a new Point2D,
    pub fn new(x: f64, y: f64) -> Point2D {
        Point2D { x: x, y: y }
    }

    /// Calculates the midpoint between two Point2Ds.
    pub fn midpoint(p1: &Point2D, p2: &Point2D) -> Point2D {
        Point2D::new((p1.x + p2.x) / 2f64, (p1.y + p2.y) / 2f64)
    }

    /// Calculate Euclidean distance between the point and another.
    pub fn distance(&self, other: &Self) -> f64 {
        self.distance_squared(other).sqrt()
    }

    pub fn distance_squared(&self, other: &Self) -> f64 {
        (self.x - other.x) * (self.x - other.x) + (self.y - other.y) * (self.y - other.y)
    }

    /// z-component of the cross product of two vectors.
    pub fn cross(&self, other: Self) -> f64 {
        self.x * other.y - self.y * other.x
    }

    /// Linear interpolation between this point (t = 0) and another (t = 1).
    pub fn lerp(&self, other: &Self, t: f64) -> Point2D {
        Point2D::new(
            self.x + t * (other.x - self.x),
            self.y + t * (other.y - self.y),
        )
    }

    pub fn nearly_equals(&self, other: &Self) -> bool {
        (self.x - other.x).abs() < 1e-9 && (self.y - other.y).abs() < 1e-9
    }
}

impl PartialEq for Point2D {
    fn eq(&self, other: &Self) -> bool {
        self.x == other.x && self.y == other.y
    }
}

impl Add for Point2D {
    type Output = Point2D;
    fn add(self, rhs: Self) -> Point2D {
        Point2D {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
        }
    }
}

impl Sub for Point2D {
    type Output = Point2D;
    fn sub(self, rhs: Self) -> Point2D {
        Point2D {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
        }
    }
}

// dot product
impl Mul for Point2D {
    type Output = f64;
    fn mul(self, rhs: Self) -> f64 {
        self.x * rhs.x + self.y * rhs.y
    }
}

#[cfg(test)]
mod test {
    use super::Point2D;

    #[test]
    fn test_distance() {
        let p1 = Point2D::new(0.0, 0.0);
        let p2 = Point2D::new(3.0, 4.0);
        assert_eq!(p1.distance(&p2), 5.0);
        assert_eq!(p1.distance_squared(&p2), 25.0);
    }

    #[test]
    fn test_lerp_and_cross() {
        let p1 = Point2D::new(0.0, 0.0);
        let p2 = Point2D::new(10.0, 20.0);
        assert_eq!(p1.lerp(&p2, 0.25), Point2D::new(2.5, 5.0));
        assert_eq!(Point2D::new(1.0, 0.0).cross(Point2D::new(0.0, 1.0)), 1.0);
        assert_eq!(Point2D::new(1.0, 2.0) * Point2D::new(3.0, 4.0), 11.0);
    }
}
