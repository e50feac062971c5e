//! Real-time frame processing pipeline: thresholded blob detection, convex
//! quad fitting, sub-pixel corner refinement, handedness resolution, and
//! the centre-of-projection / jitter-suppression logic that turns a camera
//! frame into a cursor-offset update.

mod errors;
mod handedness;
mod history;
mod processor;
mod refine;
mod threshold;

pub use errors::{Error, Result};
pub use history::History;
pub use processor::{CursorUpdate, FrameProcessor};
pub use threshold::{check_pixel, downsample_thresholded};

pub use lightgun_blobs::Image;
