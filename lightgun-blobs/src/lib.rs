//! Thresholded connected-component blob detection: labels foreground
//! pixels into blobs, filters them by size, and extracts the edge points
//! later fed into [`lightgun_geometry::find_quadrilateral_corners`].

mod blob;
mod errors;
mod image;
mod labeling;
mod union_find;

pub use blob::{Blob, FilterOptions};
pub use errors::{Error, Result};
pub use image::{Image, Thresholds};
pub use union_find::UnionFind;

use lightgun_geometry::Point;

/// Stateful entry point: holds the label image from the most recent
/// [`BlobCounter::process_image`] call so callers can look up edge points
/// per blob afterwards.
#[derive(Debug, Default)]
pub struct BlobCounter {
    labels: Vec<u32>,
    width: u32,
    height: u32,
    blobs: Vec<Blob>,
    has_processed: bool,
}

impl BlobCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Labels `image`, collects per-blob statistics, and applies `filter`.
    /// Returns the surviving blobs (renumbered to a dense `1..=N` range).
    pub fn process_image(&mut self, image: &Image, thresholds: Thresholds, filter: FilterOptions) -> Result<Vec<Blob>> {
        let (mut labels, width, height) = labeling::label_image(image, &thresholds)?;
        let num_labels = labels.iter().copied().max().unwrap_or(0);
        let collected = blob::collect_blobs(image, &labels, width, height, num_labels);
        let blobs = blob::filter_and_renumber(&mut labels, collected, &filter);

        self.labels = labels;
        self.width = width;
        self.height = height;
        self.blobs = blobs.clone();
        self.has_processed = true;

        Ok(blobs)
    }

    /// Edge points of `blob_id`, as found during the most recent
    /// [`process_image`](Self::process_image) call.
    pub fn edge_points(&self, blob_id: u32) -> Result<Vec<Point>> {
        if !self.has_processed {
            return Err(Error::NoImageProcessed);
        }
        let blob = self.blobs.iter().find(|b| b.id == blob_id).ok_or(Error::UnknownBlobId(blob_id))?;
        Ok(blob::edge_points(&self.labels, self.width, &blob.rect, blob_id))
    }
}
