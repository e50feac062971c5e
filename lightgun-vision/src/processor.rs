use lightgun_blobs::{BlobCounter, FilterOptions, Thresholds};
use lightgun_geometry::{bounding_rect, Point, Rect};
use lightgun_projective::{get_xy_back, get_xy_centered};
use lightgun_proto::{DeviceInfo, Handedness, VideoSettings};

use crate::errors::Result;
use crate::handedness;
use crate::history::History;
use crate::refine::refine_corners;
use crate::threshold::downsample_thresholded;

type Image<'a> = lightgun_blobs::Image<'a>;

/// A computed cursor position ready for the protocol engine to transmit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CursorUpdate {
    pub x_pct: f64,
    pub y_pct: f64,
    pub x16: i16,
    pub y16: i16,
}

fn pct_to_i16(pct: f64) -> i16 {
    let raw = pct / 100.0 * 32767.0;
    raw.round().clamp(i16::MIN as f64, i16::MAX as f64) as i16
}

/// Per-session frame-processing state: the region of interest carried
/// between frames, the jitter-suppression history, and the current
/// handedness classification.
#[derive(Debug, Default)]
pub struct FrameProcessor {
    roi: Option<Rect>,
    history: History,
    last_accepted: Option<(f64, f64)>,
    handedness: Option<Handedness>,
    blob_counter: BlobCounter,
}

impl FrameProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handedness(&self) -> Option<Handedness> {
        self.handedness
    }

    pub fn roi(&self) -> Option<Rect> {
        self.roi
    }

    /// Runs the full per-frame pipeline (§4.5). Returns `Ok(None)` when no
    /// candidate blob is accepted this frame (detection failure, pointing
    /// filter, out-of-bounds aim, or jitter rejection) — not an error, the
    /// caller simply has nothing to transmit this frame.
    pub fn process_frame(&mut self, image: &Image, settings: &VideoSettings, device_info: &mut DeviceInfo) -> Result<Option<CursorUpdate>> {
        let frame_rect = Rect::new(0, 0, image.width() as i32, image.height() as i32);
        let roi = self.roi.unwrap_or(frame_rect);

        let (downsampled, out_w, out_h) = downsample_thresholded(
            image,
            roi.x as u32,
            roi.y as u32,
            roi.w as u32,
            roi.h as u32,
            settings.border_colour,
            settings.filter_radius,
        );
        let thresholded = Image::Gray8 { width: out_w, height: out_h, stride: out_w as usize, data: &downsampled };

        let min_size = if roi.w > 600 { 30 } else { 15 };
        let filter = FilterOptions { filter_blobs: true, coupled_size_filtering: true, min_w: min_size, min_h: min_size, max_w: i32::MAX, max_h: i32::MAX };
        let blobs = self.blob_counter.process_image(&thresholded, Thresholds::default(), filter)?;

        let mut best: Option<(i64, Vec<Point>)> = None;
        for blob in &blobs {
            let edges = self.blob_counter.edge_points(blob.id)?;
            let (fits, corners) = lightgun_shapes::is_convex_polygon(&edges);
            if !fits || corners.len() != 4 {
                tracing::debug!(blob_id = blob.id, "blob rejected by shape checker");
                continue;
            }
            if settings.only_match_where_pointing {
                let corners4: [Point; 4] = [corners[0], corners[1], corners[2], corners[3]];
                let centre = (out_w as f64 / 2.0, out_h as f64 / 2.0);
                let (px, py) = get_xy_back(corners4, centre.0, centre.1, 0, 0);
                if !(0.0..=100.0).contains(&px) || py < settings.y_sight_offset || py > 100.0 + settings.y_sight_offset {
                    tracing::debug!(blob_id = blob.id, "blob rejected by only-match-where-pointing");
                    continue;
                }
            }
            let area = blob.rect.area();
            if best.as_ref().map_or(true, |(best_area, _)| area > *best_area) {
                best = Some((area, corners));
            }
        }

        let Some((_, half_res_corners)) = best else {
            tracing::trace!("no candidate blob this frame, invalidating ROI");
            self.roi = None;
            return Ok(None);
        };

        let upscaled: Vec<Point> = half_res_corners.iter().map(|p| Point::new(p.x * 2 + roi.x, p.y * 2 + roi.y)).collect();
        let upscaled4: [Point; 4] = [upscaled[0], upscaled[1], upscaled[2], upscaled[3]];
        let refined = refine_corners(upscaled4, image, settings.border_colour, settings.filter_radius);

        let (new_handedness, quad) = handedness::resolve(refined, settings.handedness, self.last_accepted);
        self.handedness = Some(new_handedness);

        let w = image.width() as f64 / 2.0;
        let h = image.height() as f64 / 2.0;
        let calib_point = (w + device_info.calibration_x / 100.0 * 2.0 * w, h + device_info.calibration_y / 100.0 * 2.0 * h);
        let (x_pct, y_pct) = get_xy_back(quad, calib_point.0, calib_point.1, 0, 0);

        let (cam_x, cam_y) = get_xy_centered(quad, 0.0, settings.y_sight_offset);
        device_info.calibration_x = (cam_x - w) / (2.0 * w) * 100.0;
        device_info.calibration_y = (cam_y - h) / (2.0 * h) * 100.0;

        if !(-50.0..150.0).contains(&x_pct) || !(-50.0..150.0).contains(&y_pct) {
            tracing::trace!(x_pct, y_pct, "aim point outside acceptance bounds, ignoring frame");
            return Ok(None);
        }

        if settings.anti_jitter && !passes_jitter(&self.history, (x_pct, y_pct), settings.jitter_move_threshold) {
            tracing::trace!(x_pct, y_pct, "jitter suppressed");
            return Ok(None);
        }

        self.history.push((x_pct, y_pct));
        self.last_accepted = Some((x_pct, y_pct));

        self.roi = recompute_roi(&quad, &frame_rect);

        Ok(Some(CursorUpdate { x_pct, y_pct, x16: pct_to_i16(x_pct), y16: pct_to_i16(y_pct) }))
    }
}

/// Accepts `candidate` if history isn't yet full, or at least one of the
/// last five accepted points differs from it by more than `threshold` on
/// either axis.
fn passes_jitter(history: &History, candidate: (f64, f64), threshold: f64) -> bool {
    if !history.is_full() {
        return true;
    }
    history.iter().any(|(hx, hy)| (hx - candidate.0).abs() > threshold || (hy - candidate.1).abs() > threshold)
}

fn recompute_roi(quad: &[Point; 4], frame_rect: &Rect) -> Option<Rect> {
    let bbox = bounding_rect(quad).ok()?;
    let expanded = bbox.expanded(0.15).clamped_to(frame_rect);
    let min_area = (frame_rect.w as i64 / 8) * (frame_rect.h as i64 / 8);
    if expanded.area() >= min_area && frame_rect.contains_rect(&expanded) {
        Some(expanded)
    } else {
        None
    }
}
