use crate::errors::{Error, Result};
use crate::point::Point;
use crate::rect::bounding_rect;

/// The furthest point in `points` from `reference`, by Euclidean distance.
/// Panics if `points` is empty; callers are expected to have already
/// validated the cloud via [`bounding_rect`].
pub fn furthest_point_from(points: &[Point], reference: Point) -> Point {
    points
        .iter()
        .copied()
        .max_by(|a, b| {
            a.distance(&reference)
                .partial_cmp(&b.distance(&reference))
                .unwrap()
        })
        .expect("point cloud must be non-empty")
}

/// Signed perpendicular distance of `p` from the line through `a` and `b`.
/// Positive on one side, negative on the other; the sign is consistent
/// across calls with the same `a`, `b`.
pub fn signed_distance_from_line(p: Point, a: Point, b: Point) -> f64 {
    let (ax, ay) = (a.x as f64, a.y as f64);
    let (bx, by) = (b.x as f64, b.y as f64);
    let (px, py) = (p.x as f64, p.y as f64);
    let num = (bx - ax) * (ay - py) - (ax - px) * (by - ay);
    let den = ((bx - ax).powi(2) + (by - ay).powi(2)).sqrt();
    if den == 0.0 {
        0.0
    } else {
        num / den
    }
}

/// The two points furthest from the line `a`-`b`, one on each side, along
/// with their signed perpendicular distance. `a` and `b` themselves are
/// excluded from the search. Either side may be empty (e.g. every other
/// point lies on one side of the line).
pub fn two_furthest_from_line(
    points: &[Point],
    a: Point,
    b: Point,
) -> (Option<(Point, f64)>, Option<(Point, f64)>) {
    let mut positive: Option<(Point, f64)> = None;
    let mut negative: Option<(Point, f64)> = None;
    for &p in points {
        if p == a || p == b {
            continue;
        }
        let d = signed_distance_from_line(p, a, b);
        if d >= 0.0 {
            if positive.map_or(true, |(_, cur)| d > cur) {
                positive = Some((p, d));
            }
        } else if negative.map_or(true, |(_, cur)| d < cur) {
            negative = Some((p, d));
        }
    }
    (positive, negative)
}

/// Find the 3 or 4 corners of a quadrilateral (or triangle) from an
/// unordered cloud of edge points. See module docs of the owning crate for
/// the algorithm.
pub fn find_quadrilateral_corners(points: &[Point]) -> Result<Vec<Point>> {
    if points.len() < 3 {
        return Err(Error::TooFewPoints);
    }
    let bbox = bounding_rect(points)?;
    let (cx, cy) = bbox.center();
    let centre = Point::new(cx.round() as i32, cy.round() as i32);
    let distortion_limit = 0.1 * (bbox.w as f64 + bbox.h as f64) / 2.0;

    let p1 = furthest_point_from(points, centre);
    let p2 = furthest_point_from(points, p1);

    let (pos, neg) = two_furthest_from_line(points, p1, p2);

    let corners = match (pos, neg) {
        (Some((p3, d3)), Some((p4, d4)))
            if d3.abs() >= distortion_limit && d4.abs() >= distortion_limit =>
        {
            vec![p1, p2, p3, p4]
        }
        _ => recover_trapezoid_or_triangle(points, p1, p2, pos, neg, distortion_limit)?,
    };

    Ok(order_corners(corners))
}

/// The cloud is (close to) a trapezoid or triangle: p1, p2 lie on the same
/// edge. Pick whichever of the two line-side candidates is the better
/// (larger magnitude) pivot, then search for a third corner off the line
/// formed by p1 (or p2) and that pivot.
fn recover_trapezoid_or_triangle(
    points: &[Point],
    p1: Point,
    p2: Point,
    pos: Option<(Point, f64)>,
    neg: Option<(Point, f64)>,
    distortion_limit: f64,
) -> Result<Vec<Point>> {
    let pivot = match (pos, neg) {
        (Some((p, d)), Some((q, e))) => {
            if d.abs() >= e.abs() {
                p
            } else {
                q
            }
        }
        (Some((p, _)), None) => p,
        (None, Some((q, _))) => q,
        (None, None) => return Err(Error::NoCornerFound),
    };

    let third = find_third_corner(points, p1, pivot, distortion_limit)
        .or_else(|| find_third_corner(points, p2, pivot, distortion_limit));

    let third = match third {
        Some(p) => p,
        None => return Ok(vec![p1, p2, pivot]),
    };

    // Look for a 4th corner using the newly found third point, preferring
    // the candidate farther from the un-used diagonal endpoint.
    let (pos2, neg2) = two_furthest_from_line(points, pivot, third);
    let fourth = match (pos2, neg2) {
        (Some((a, da)), Some((b, db))) => {
            let dist_a = a.distance(&p2);
            let dist_b = b.distance(&p2);
            if da.abs() < distortion_limit && db.abs() < distortion_limit {
                None
            } else if dist_a >= dist_b {
                Some(a)
            } else {
                Some(b)
            }
        }
        (Some((a, da)), None) if da.abs() >= distortion_limit => Some(a),
        (None, Some((b, db))) if db.abs() >= distortion_limit => Some(b),
        _ => None,
    };

    match fourth {
        Some(p4) if p4 != p1 && p4 != pivot && p4 != third => Ok(vec![p1, pivot, third, p4]),
        _ => Ok(vec![p1, pivot, third]),
    }
}

fn find_third_corner(
    points: &[Point],
    a: Point,
    pivot: Point,
    distortion_limit: f64,
) -> Option<Point> {
    let (pos, neg) = two_furthest_from_line(points, a, pivot);
    match (pos, neg) {
        (Some((p, d)), Some((q, e))) => {
            if d.abs() >= e.abs() && d.abs() >= distortion_limit * 0.5 {
                Some(p)
            } else if e.abs() >= distortion_limit * 0.5 {
                Some(q)
            } else {
                None
            }
        }
        (Some((p, d)), None) if d.abs() >= distortion_limit * 0.5 => Some(p),
        (None, Some((q, e))) if e.abs() >= distortion_limit * 0.5 => Some(q),
        _ => None,
    }
}

/// Reorder `corners` (3 or 4 points, no particular order) so the lowest-X
/// (tie: lowest-Y) point is first, and the remaining points follow in
/// counter-clockwise screen order.
fn order_corners(corners: Vec<Point>) -> Vec<Point> {
    let anchor_idx = corners
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| (a.x, a.y).cmp(&(b.x, b.y)))
        .map(|(i, _)| i)
        .unwrap();
    let anchor = corners[anchor_idx];

    let mut rest: Vec<Point> = corners
        .iter()
        .copied()
        .enumerate()
        .filter(|(i, _)| *i != anchor_idx)
        .map(|(_, p)| p)
        .collect();

    rest.sort_by(|a, b| slope_from(anchor, *a).total_cmp(&slope_from(anchor, *b)));

    let mut out = vec![anchor];
    out.extend(rest);
    out
}

fn slope_from(anchor: Point, p: Point) -> f64 {
    let dx = (p.x - anchor.x) as f64;
    let dy = (p.y - anchor.y) as f64;
    if dx == 0.0 {
        if dy >= 0.0 {
            f64::INFINITY
        } else {
            f64::NEG_INFINITY
        }
    } else {
        dy / dx
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_edge_points() -> Vec<Point> {
        let mut pts = Vec::new();
        for x in 100..=500 {
            pts.push(Point::new(x, 100));
            pts.push(Point::new(x, 400));
        }
        for y in 100..=400 {
            pts.push(Point::new(100, y));
            pts.push(Point::new(500, y));
        }
        pts
    }

    #[test]
    fn finds_square_corners_in_ccw_order() {
        let pts = square_edge_points();
        let corners = find_quadrilateral_corners(&pts).unwrap();
        assert_eq!(
            corners,
            vec![
                Point::new(100, 100),
                Point::new(500, 100),
                Point::new(500, 400),
                Point::new(100, 400),
            ]
        );
    }

    #[test]
    fn colinear_points_return_a_triangle() {
        let pts: Vec<Point> = (0..50).map(|x| Point::new(x, 0)).collect();
        let corners = find_quadrilateral_corners(&pts).unwrap();
        assert_eq!(corners.len(), 3);
    }

    #[test]
    fn too_few_points_errors() {
        let pts = vec![Point::new(0, 0), Point::new(1, 1)];
        assert_eq!(
            find_quadrilateral_corners(&pts).unwrap_err(),
            Error::TooFewPoints
        );
    }
}
