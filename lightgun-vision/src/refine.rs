use lightgun_blobs::Image;
use lightgun_geometry::Point;

use crate::threshold::check_pixel;

fn safe_check(image: &Image, x: i64, y: i64, border_colour: (u8, u8, u8), filter_radius: f64) -> bool {
    if x < 0 || y < 0 || x as u32 >= image.width() || y as u32 >= image.height() {
        return false;
    }
    check_pixel(image, x as u32, y as u32, border_colour, filter_radius)
}

/// Buckets the (already roughly-axis-aligned) quad into top-left,
/// top-right, bottom-right, bottom-left by position relative to the
/// centroid — the ordering the corner-refinement policy table uses.
fn classify_corners(corners: &[Point; 4]) -> [Point; 4] {
    let cx = corners.iter().map(|p| p.x as f64).sum::<f64>() / 4.0;
    let cy = corners.iter().map(|p| p.y as f64).sum::<f64>() / 4.0;
    let mut out = [corners[0]; 4];
    let mut filled = [false; 4];
    for &p in corners {
        let idx = match ((p.x as f64) <= cx, (p.y as f64) <= cy) {
            (true, true) => 0,  // TL
            (false, true) => 1, // TR
            (false, false) => 2, // BR
            (true, false) => 3, // BL
        };
        out[idx] = p;
        filled[idx] = true;
    }
    debug_assert!(filled.iter().all(|&f| f), "degenerate quad: two corners landed in the same quadrant");
    out
}

/// Per-corner nudge policy from `pixelMap[i,j] = CheckPixel(cornerX+i,
/// cornerY+j)`, pushing each corner outward into foreground.
fn refine_offset(index: usize, m: [[bool; 2]; 2]) -> (i32, i32) {
    let p00 = m[0][0];
    let p10 = m[1][0];
    let p01 = m[0][1];
    let p11 = m[1][1];
    match index {
        0 => {
            // top-left
            if p00 || (p10 && p01) {
                (0, 0)
            } else if p10 {
                (1, 0)
            } else if p01 {
                (0, 1)
            } else {
                (1, 1)
            }
        }
        1 => {
            // top-right
            if p10 {
                (1, 0)
            } else if p00 && p11 {
                (1, 0)
            } else if p11 && (p00 || p11) {
                (1, 1)
            } else {
                (0, 1)
            }
        }
        2 => {
            // bottom-right
            if p11 {
                (1, 1)
            } else if p10 && p01 {
                (1, 1)
            } else if p10 {
                (1, 0)
            } else if p01 {
                (0, 1)
            } else {
                (0, 0)
            }
        }
        3 => {
            // bottom-left
            if p01 {
                (0, 1)
            } else if p00 && p11 {
                (0, 1)
            } else if p00 {
                (0, 0)
            } else if p11 {
                (1, 1)
            } else {
                (1, 0)
            }
        }
        _ => unreachable!("exactly 4 corners"),
    }
}

/// Sub-pixel corner refinement (step 4.5.6): buckets `corners` into
/// TL/TR/BR/BL order, then nudges each by 0 or 1 pixel in X and Y based
/// on which of its four neighbouring subpixels are foreground.
pub fn refine_corners(corners: [Point; 4], image: &Image, border_colour: (u8, u8, u8), filter_radius: f64) -> [Point; 4] {
    let mut classified = classify_corners(&corners);
    for (idx, corner) in classified.iter_mut().enumerate() {
        let x = corner.x as i64;
        let y = corner.y as i64;
        let m = [
            [safe_check(image, x, y, border_colour, filter_radius), safe_check(image, x, y + 1, border_colour, filter_radius)],
            [safe_check(image, x + 1, y, border_colour, filter_radius), safe_check(image, x + 1, y + 1, border_colour, filter_radius)],
        ];
        let (dx, dy) = refine_offset(idx, m);
        *corner = Point::new(corner.x + dx, corner.y + dy);
    }
    classified
}
