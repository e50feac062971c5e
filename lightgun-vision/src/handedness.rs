use lightgun_geometry::Point;
use lightgun_projective::get_xy_back;
use lightgun_proto::{Handedness, HandednessSetting};

/// Sorts `corners` (any order) into the canonical "leftmost-X, then Y"
/// order used as the basis for handedness classification. This is
/// independent of [`lightgun_geometry::find_quadrilateral_corners`]'s own
/// CCW convention — handedness only cares about a stable starting point.
pub fn canonical_order(mut corners: [Point; 4]) -> [Point; 4] {
    corners.sort_by_key(|p| (p.x, p.y));
    corners
}

/// Corner permutation applied after handedness is resolved, indexing into
/// the canonically sorted quad.
fn permutation(handedness: Handedness) -> [usize; 4] {
    match handedness {
        Handedness::None => [0, 1, 3, 2],
        Handedness::Left => [2, 0, 3, 1],
        Handedness::Right => [1, 3, 2, 0],
    }
}

/// Resolves handedness for the current frame (§4.5a) and returns the
/// permuted corner order ready for homography fitting.
///
/// `previous_point` is the last frame's accepted `(xPct, yPct)`, if any.
pub fn resolve(corners: [Point; 4], setting: HandednessSetting, previous_point: Option<(f64, f64)>) -> (Handedness, [Point; 4]) {
    let quad = canonical_order(corners);

    let handedness = if quad[0].distance(&quad[1]) > quad[0].distance(&quad[2]) {
        Handedness::None
    } else {
        match setting {
            HandednessSetting::Left => Handedness::Left,
            HandednessSetting::Right => Handedness::Right,
            HandednessSetting::Auto => resolve_auto(quad, previous_point),
        }
    };

    let perm = permutation(handedness);
    let permuted = [quad[perm[0]], quad[perm[1]], quad[perm[2]], quad[perm[3]]];
    (handedness, permuted)
}

fn resolve_auto(quad: [Point; 4], previous_point: Option<(f64, f64)>) -> Handedness {
    let prev = match previous_point {
        Some((x, y)) if x > 0.0 && x < 100.0 && y > 0.0 && y < 100.0 => (x, y),
        _ => return Handedness::Right,
    };

    let right_quad = {
        let perm = permutation(Handedness::Right);
        [quad[perm[0]], quad[perm[1]], quad[perm[2]], quad[perm[3]]]
    };
    let left_quad = {
        let perm = permutation(Handedness::Left);
        [quad[perm[0]], quad[perm[1]], quad[perm[2]], quad[perm[3]]]
    };

    let (rx, ry) = get_xy_back(right_quad, prev.0, prev.1, 0, 0);
    let (lx, ly) = get_xy_back(left_quad, prev.0, prev.1, 0, 0);

    // Disambiguate using whichever axis of the previous point sits outside
    // the dead zone around screen centre.
    let (axis_prev, axis_right, axis_left) = if (prev.0 - 50.0).abs() > 2.0 {
        (prev.0, rx, lx)
    } else {
        (prev.1, ry, ly)
    };

    if (axis_right - axis_prev).abs() <= (axis_left - axis_prev).abs() {
        Handedness::Right
    } else {
        Handedness::Left
    }
}
