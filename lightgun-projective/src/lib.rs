//! Projective (homography) mapping between two arbitrary quadrilaterals,
//! used to convert camera-space screen-corner detections into screen-space
//! aim percentages and back.

mod homography;
mod matrix;

pub use homography::{get_xy, get_xy_back, get_xy_centered, map_quad_to_quad, map_square_to_quad, SQUARE_SIDE};
pub use matrix::Matrix3;
