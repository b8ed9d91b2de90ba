/*
This code is part of the TraplineTools field-deployment library.
Authors: Dr. John Lindsay (WhiteboxTools), Vector Control Services
Created: 19/10/2026
Last Modified: 19/10/2026
License: MIT
*/

use super::{BoundingBox, Point2D};
use std::ops::Index;

/// An ordered run of vertices, e.g. a single trap line.
#[derive(Default, Clone, Debug)]
pub struct Polyline {
    pub vertices: Vec<Point2D>,
    pub id: usize,
}

impl Index<usize> for Polyline {
    type Output = Point2D;

    fn index<'a>(&'a self, index: usize) -> &'a Point2D {
        &self.vertices[index]
    }
}

impl PartialEq for Polyline {
    // Equality is based on vertex coordinates only; the id doesn't matter.
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .vertices
                .iter()
                .zip(other.vertices.iter())
                .all(|(a, b)| a.nearly_equals(b))
    }
}

impl Polyline {
    /// Creates a new Polyline from vertices
    pub fn new(vertices: &[Point2D], id: usize) -> Polyline {
        Polyline {
            vertices: vertices.to_vec(),
            id: id,
        }
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Total length along all segments.
    pub fn length(&self) -> f64 {
        self.vertices
            .windows(2)
            .map(|w| w[0].distance(&w[1]))
            .sum()
    }

    pub fn get_bounding_box(&self) -> BoundingBox {
        BoundingBox::from_points(&self.vertices)
    }
}
