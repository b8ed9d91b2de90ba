/*
This code is part of the TraplineTools field-deployment library.
Authors: Dr. John Lindsay (WhiteboxTools), Vector Control Services
Created: 19/10/2026
Last Modified: 19/10/2026
License: MIT
*/

use crate::structures::{LineSegment, Point2D};
use std::cmp::Ordering;

const SLAB_EPSILON: f64 = 1e-9;

/// Tests if a point is Left|On|Right of an infinite line,
/// based on http://geomalgorithms.com/a03-_inclusion.html.
///
/// Return: > 0 for p2 left of the line through p0 and p1
///         = 0 for p2 on the line through p0 and p1
///         < 0 for p2 right of the line through p0 and p1
fn is_left(p0: &Point2D, p1: &Point2D, p2: &Point2D) -> f64 {
    (p1.x - p0.x) * (p2.y - p0.y) - (p2.x - p0.x) * (p1.y - p0.y)
}

/// Calculates the winding number of a ring about a point. Rings may be
/// given closed (last vertex repeating the first) or open; the closing
/// edge is implied either way.
pub fn winding_number(p: &Point2D, ring: &[Point2D]) -> i32 {
    let n = ring.len();
    if n < 3 {
        return 0;
    }
    let mut wn = 0i32;
    for i in 0..n {
        let a = &ring[i];
        let b = &ring[(i + 1) % n];
        if a.y <= p.y {
            if b.y > p.y && is_left(a, b, p) > 0f64 {
                // an upward crossing with p left of edge
                wn += 1;
            }
        } else if b.y <= p.y && is_left(a, b, p) < 0f64 {
            // a downward crossing with p right of edge
            wn -= 1;
        }
    }
    wn
}

/// Tests whether a point is within a single ring.
pub fn point_in_poly(p: &Point2D, ring: &[Point2D]) -> bool {
    winding_number(p, ring) % 2 != 0
}

/// Even-odd test over every ring of a (possibly multipart, holed) polygon
/// layer. A point inside a hole lies inside two rings and so is outside.
pub fn point_in_rings(p: &Point2D, rings: &[Vec<Point2D>]) -> bool {
    rings.iter().filter(|r| point_in_poly(p, r)).count() % 2 == 1
}

/// Inside test over a layer of features, each given as its own set of rings.
/// The even-odd rule applies within a feature; the layer is the union of
/// its features, so a feature nested in or overlapping another never acts
/// as a hole.
pub fn point_in_features(p: &Point2D, features: &[Vec<Vec<Point2D>>]) -> bool {
    features.iter().any(|rings| point_in_rings(p, rings))
}

/// Signed ring area; positive for counter-clockwise vertex order.
pub fn polygon_area(ring: &[Point2D]) -> f64 {
    let n = ring.len();
    if n < 3 {
        return 0f64;
    }
    let mut area = 0f64;
    for i in 0..n {
        let a = &ring[i];
        let b = &ring[(i + 1) % n];
        area += a.x * b.y - b.x * a.y;
    }
    area / 2f64
}

/// A ring is a hole when it sits inside an odd number of the other rings.
/// Ring orientation is not trusted; plenty of boundary files in the wild
/// get it wrong.
pub fn is_hole_ring(index: usize, rings: &[Vec<Point2D>]) -> bool {
    let first = match rings[index].first() {
        Some(p) => *p,
        None => return false,
    };
    let containing = rings
        .iter()
        .enumerate()
        .filter(|(j, r)| *j != index && point_in_poly(&first, r))
        .count();
    containing % 2 == 1
}

/// Area-weighted centroid of all rings, holes subtracted. Returns `None`
/// when the rings enclose no area.
pub fn polygon_centroid(rings: &[Vec<Point2D>]) -> Option<Point2D> {
    // Work relative to the first vertex to keep the products small; NZTM
    // coordinates are in the millions.
    let origin = rings.iter().find_map(|r| r.first().copied())?;
    let mut total_area = 0f64;
    let mut cx = 0f64;
    let mut cy = 0f64;
    for (i, ring) in rings.iter().enumerate() {
        let n = ring.len();
        if n < 3 {
            continue;
        }
        let mut a = 0f64;
        let mut x = 0f64;
        let mut y = 0f64;
        for k in 0..n {
            let p = ring[k] - origin;
            let q = ring[(k + 1) % n] - origin;
            let cross = p.x * q.y - q.x * p.y;
            a += cross;
            x += (p.x + q.x) * cross;
            y += (p.y + q.y) * cross;
        }
        // normalise orientation so every ring contributes positively,
        // then subtract holes
        let sign = if a < 0f64 { -1f64 } else { 1f64 };
        let weight = if is_hole_ring(i, rings) { -1f64 } else { 1f64 };
        total_area += weight * sign * a / 2f64;
        cx += weight * sign * x / 6f64;
        cy += weight * sign * y / 6f64;
    }
    if total_area.abs() < 1e-12 {
        return None;
    }
    Some(Point2D::new(
        origin.x + cx / total_area,
        origin.y + cy / total_area,
    ))
}

/// Area-weighted centroid of the union of several features, where
/// overlapping area counts once. Returns `None` when the union encloses no
/// area.
///
/// The plane is cut into vertical slabs at every vertex and every crossing
/// of two edges. No edge starts, ends or crosses another inside a slab, so
/// the union within a slab is a stack of trapezoids whose moments are
/// integrated exactly.
pub fn union_centroid(features: &[Vec<Vec<Point2D>>]) -> Option<Point2D> {
    if features.len() == 1 {
        return polygon_centroid(&features[0]);
    }
    let origin = features.iter().flatten().find_map(|r| r.first().copied())?;

    // (feature, left end, right end), relative to the origin
    let mut edges: Vec<(usize, Point2D, Point2D)> = vec![];
    for (f, rings) in features.iter().enumerate() {
        for ring in rings {
            let n = ring.len();
            if n < 3 {
                continue;
            }
            for k in 0..n {
                let a = ring[k] - origin;
                let b = ring[(k + 1) % n] - origin;
                if a.x < b.x {
                    edges.push((f, a, b));
                } else if b.x < a.x {
                    edges.push((f, b, a));
                }
                // vertical edges bound no slab
            }
        }
    }
    if edges.is_empty() {
        return None;
    }

    let mut xs: Vec<f64> = edges.iter().flat_map(|e| vec![e.1.x, e.2.x]).collect();
    for i in 0..edges.len() {
        for j in (i + 1)..edges.len() {
            let (_, a1, a2) = edges[i];
            let (_, b1, b2) = edges[j];
            if a2.x <= b1.x || b2.x <= a1.x {
                continue;
            }
            let s1 = LineSegment::new(a1, a2);
            if let Some(p) = s1.get_intersection(&LineSegment::new(b1, b2)) {
                xs.push(p.x);
            }
        }
    }
    xs.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    xs.dedup_by(|a, b| (*a - *b).abs() < SLAB_EPSILON);

    let y_at = |a: &Point2D, b: &Point2D, x: f64| a.y + (b.y - a.y) * (x - a.x) / (b.x - a.x);
    let mut inside = vec![false; features.len()];
    let mut area = 0f64;
    let mut mx = 0f64;
    let mut my = 0f64;
    for slab in xs.windows(2) {
        let (x0, x1) = (slab[0], slab[1]);
        let xm = (x0 + x1) / 2f64;
        let w = x1 - x0;
        // (feature, y at x0, y at xm, y at x1) of every edge spanning the slab
        let mut crossing: Vec<(usize, f64, f64, f64)> = edges
            .iter()
            .filter(|(_, a, b)| a.x < xm && xm < b.x)
            .map(|(f, a, b)| (*f, y_at(a, b, x0), y_at(a, b, xm), y_at(a, b, x1)))
            .collect();
        crossing.sort_by(|a, b| a.2.partial_cmp(&b.2).unwrap_or(Ordering::Equal));

        // walk up the slab toggling even-odd state per feature
        for v in inside.iter_mut() {
            *v = false;
        }
        let mut num_inside = 0usize;
        for k in 0..crossing.len().saturating_sub(1) {
            let f = crossing[k].0;
            inside[f] = !inside[f];
            if inside[f] {
                num_inside += 1;
            } else {
                num_inside -= 1;
            }
            if num_inside == 0 {
                continue;
            }
            let (_, l0, lm, l1) = crossing[k];
            let (_, u0, um, u1) = crossing[k + 1];
            // Simpson's rule is exact for these quadratic integrands
            let simpson = |f0: f64, fm: f64, f1: f64| w * (f0 + 4f64 * fm + f1) / 6f64;
            area += simpson(u0 - l0, um - lm, u1 - l1);
            mx += simpson(x0 * (u0 - l0), xm * (um - lm), x1 * (u1 - l1));
            my += simpson(
                (u0 * u0 - l0 * l0) / 2f64,
                (um * um - lm * lm) / 2f64,
                (u1 * u1 - l1 * l1) / 2f64,
            );
        }
    }
    if area < 1e-12 {
        return None;
    }
    Some(Point2D::new(origin.x + mx / area, origin.y + my / area))
}
