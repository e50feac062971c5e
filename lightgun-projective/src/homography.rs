use lightgun_geometry::Point;

use crate::matrix::Matrix3;

/// Side length of the square used as the projective basis. `MapSquareToQuad`
/// maps `(0,0), (SQUARE_SIDE,0), (SQUARE_SIDE,SQUARE_SIDE), (0,SQUARE_SIDE)`
/// onto the destination quad.
pub const SQUARE_SIDE: f64 = 99.0;

/// Build the homography mapping the square `(0,0)-(99,0)-(99,99)-(0,99)`
/// onto `quad`, ordered the same way `lightgun_geometry::find_quadrilateral_corners`
/// orders its output (lowest-x-then-y first, then counter-clockwise).
///
/// Uses the standard closed-form solution for mapping a unit square to an
/// arbitrary quadrilateral (Heckbert). The affine case is detected when
/// `|x0 - x1 + x2 - x3| < 1e-13` on both axes, in which case the
/// perspective terms are zero and the top two rows alone describe the map.
pub fn map_square_to_quad(quad: [Point; 4]) -> Matrix3 {
    let xs = quad.map(|p| p.x as f64);
    let ys = quad.map(|p| p.y as f64);
    let (x0, x1, x2, x3) = (xs[0], xs[1], xs[2], xs[3]);
    let (y0, y1, y2, y3) = (ys[0], ys[1], ys[2], ys[3]);

    let dx1 = x1 - x2;
    let dx2 = x3 - x2;
    let dx3 = x0 - x1 + x2 - x3;
    let dy1 = y1 - y2;
    let dy2 = y3 - y2;
    let dy3 = y0 - y1 + y2 - y3;

    let (a, b, c, d, e, f, g, h, i);
    if dx3.abs() < 1e-13 && dy3.abs() < 1e-13 {
        a = x1 - x0;
        b = x2 - x1;
        c = x0;
        d = y1 - y0;
        e = y2 - y1;
        f = y0;
        g = 0.0;
        h = 0.0;
        i = 1.0;
    } else {
        let denom = dx1 * dy2 - dx2 * dy1;
        g = (dx3 * dy2 - dx2 * dy3) / denom;
        h = (dx1 * dy3 - dx3 * dy1) / denom;
        a = x1 - x0 + g * x1;
        b = x3 - x0 + h * x3;
        c = x0;
        d = y1 - y0 + g * y1;
        e = y3 - y0 + h * y3;
        f = y0;
        i = 1.0;
    }

    // The closed form above maps the *unit* square. Scale the first two
    // columns by 1/SQUARE_SIDE so the square (0,0)-(99,0)-(99,99)-(0,99)
    // maps onto `quad` instead.
    let s = SQUARE_SIDE;
    Matrix3([[a / s, b / s, c], [d / s, e / s, f], [g / s, h / s, i]])
}

/// Maps quad `a` onto quad `b`: `H_b . adj(H_a)`. `adj(H_a)` is proportional
/// to the inverse of `H_a` (square -> a), so the composite maps a -> square
/// -> b up to an overall scale that the perspective divide cancels.
pub fn map_quad_to_quad(a: [Point; 4], b: [Point; 4]) -> Matrix3 {
    let h_a = map_square_to_quad(a);
    let h_b = map_square_to_quad(b);
    h_b.mul(&h_a.adjugate())
}

/// Inverse map: the screen-space percentage (each axis 0..100) of the pixel
/// `(x, y)` inside the quad described by `corners`. `w` and `h` are accepted
/// for parity with the device driver's original signature but do not affect
/// the result; see DESIGN.md.
pub fn get_xy_back(corners: [Point; 4], x: f64, y: f64, _w: i32, _h: i32) -> (f64, f64) {
    let adj = map_square_to_quad(corners).adjugate();
    let (su, sv) = adj.apply(x, y);
    (su / SQUARE_SIDE * 100.0, sv / SQUARE_SIDE * 100.0)
}

/// Forward map: the camera-space pixel corresponding to the screen-space
/// percentage `(x, y)` (each axis 0..100) inside the quad described by
/// `corners`.
pub fn get_xy(corners: [Point; 4], x: f64, y: f64) -> (f64, f64) {
    let su = x / 100.0 * SQUARE_SIDE;
    let sv = y / 100.0 * SQUARE_SIDE;
    map_square_to_quad(corners).apply(su, sv)
}

/// Convenience wrapper matching the driver's "centred" calling convention:
/// `dx`, `dy` are offsets from the screen centre (nominally -50..50) rather
/// than an absolute 0..100 percentage.
pub fn get_xy_centered(corners: [Point; 4], dx: f64, dy: f64) -> (f64, f64) {
    get_xy(corners, dx + 50.0, dy + 50.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn rect_quad() -> [Point; 4] {
        [
            Point::new(100, 100),
            Point::new(500, 100),
            Point::new(500, 400),
            Point::new(100, 400),
        ]
    }

    #[test]
    fn centre_of_rect_maps_to_fifty_fifty() {
        let quad = rect_quad();
        let (px, py) = get_xy_back(quad, 300.0, 250.0, 0, 0);
        assert_relative_eq!(px, 50.0, epsilon = 1e-9);
        assert_relative_eq!(py, 50.0, epsilon = 1e-9);
    }

    #[test]
    fn corners_map_to_extremes() {
        let quad = rect_quad();
        let (px, py) = get_xy_back(quad, 100.0, 100.0, 0, 0);
        assert_relative_eq!(px, 0.0, epsilon = 1e-9);
        assert_relative_eq!(py, 0.0, epsilon = 1e-9);
        let (px, py) = get_xy_back(quad, 500.0, 400.0, 0, 0);
        assert_relative_eq!(px, 100.0, epsilon = 1e-9);
        assert_relative_eq!(py, 100.0, epsilon = 1e-9);
    }

    #[test]
    fn forward_then_inverse_is_identity() {
        let quad = rect_quad();
        for &(px, py) in &[(0.0, 0.0), (50.0, 50.0), (12.5, 87.0), (99.9, 0.1)] {
            let (cx, cy) = get_xy(quad, px, py);
            let (bx, by) = get_xy_back(quad, cx, cy, 0, 0);
            assert_relative_eq!(bx, px, epsilon = 1e-6);
            assert_relative_eq!(by, py, epsilon = 1e-6);
        }
    }

    #[test]
    fn forward_then_inverse_is_identity_for_perspective_quad() {
        // A genuinely non-affine quad (not a parallelogram).
        let quad = [
            Point::new(120, 80),
            Point::new(560, 140),
            Point::new(480, 420),
            Point::new(90, 380),
        ];
        for &(px, py) in &[(10.0, 10.0), (50.0, 50.0), (80.0, 20.0), (33.0, 66.0)] {
            let (cx, cy) = get_xy(quad, px, py);
            let (bx, by) = get_xy_back(quad, cx, cy, 0, 0);
            assert_relative_eq!(bx, px, epsilon = 1e-6);
            assert_relative_eq!(by, py, epsilon = 1e-6);
        }
    }
}
