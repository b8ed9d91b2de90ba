/*
This code is part of the TraplineTools field-deployment library.
Authors: Dr. John Lindsay (WhiteboxTools), Vector Control Services
Created: 19/10/2026
Last Modified: 19/10/2026
License: MIT
*/

use crate::structures::Point2D;

const STATION_TOLERANCE: f64 = 1e-6;

/// Perpendicular distance from a point to a line
pub fn point_line_distance(point: &Point2D, start: &Point2D, end: &Point2D) -> f64 {
    if start == end {
        point.distance(start)
    } else {
        let numerator = ((end.x - start.x) * (start.y - point.y)
            - (start.x - point.x) * (end.y - start.y))
            .abs();
        let denominator = start.distance(end);
        numerator / denominator
    }
}

/// An implementation of the Ramer–Douglas–Peucker line-simplification algorithm.
///
/// References:
/// Douglas, D.H., Peucker, T.K., 1973. Algorithms for the reduction of the number of points required to
/// represent a digitized line or its caricature. Cartographica: The International Journal for Geographic
/// Information and Geovisualization 10, 112–122.
///
/// Ramer, U., 1972. An iterative procedure for the polygonal approximation of plane curves. Computer
/// Graphics and Image Processing 1, 244–256.
pub fn simplify_rdp(points: &[Point2D], epsilon: f64) -> Vec<Point2D> {
    let (first, last) = match (points.first(), points.last()) {
        (Some(f), Some(l)) if points.len() > 2 => (*f, *l),
        _ => return points.to_vec(),
    };
    let mut dmax = 0.0;
    let mut index: usize = 0;
    for (i, p) in points.iter().enumerate().take(points.len() - 1).skip(1) {
        let distance = point_line_distance(p, &first, &last);
        if distance > dmax {
            index = i;
            dmax = distance;
        }
    }
    if dmax > epsilon {
        let mut intermediate = simplify_rdp(&points[..index + 1], epsilon);
        intermediate.pop();
        // recur!
        intermediate.extend_from_slice(&simplify_rdp(&points[index..], epsilon));
        intermediate
    } else {
        vec![first, last]
    }
}

/// Places stations every `interval` map units along a polyline, starting
/// at its first vertex and measured along the cumulative length. The last
/// vertex is only added when `include_end` is set; a station falling on
/// the end already counts as the end point.
pub fn points_along_line(vertices: &[Point2D], interval: f64, include_end: bool) -> Vec<Point2D> {
    let mut ret = vec![];
    let first = match vertices.first() {
        Some(p) => *p,
        None => return ret,
    };
    if !(interval > 0f64) || !interval.is_finite() {
        return ret;
    }
    let total_length: f64 = vertices.windows(2).map(|w| w[0].distance(&w[1])).sum();

    ret.push(first);
    let mut next_station = interval;
    let mut walked = 0f64;
    for w in vertices.windows(2) {
        let seg_len = w[0].distance(&w[1]);
        if seg_len <= 0f64 {
            continue;
        }
        while next_station <= walked + seg_len
            && next_station < total_length - STATION_TOLERANCE
        {
            let t = (next_station - walked) / seg_len;
            ret.push(w[0].lerp(&w[1], t));
            next_station += interval;
        }
        walked += seg_len;
    }

    if include_end && total_length > STATION_TOLERANCE {
        if let Some(last) = vertices.last() {
            ret.push(*last);
        }
    }
    ret
}
