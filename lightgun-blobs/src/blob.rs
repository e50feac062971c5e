use std::collections::{HashMap, HashSet};

use lightgun_geometry::{Point, Rect};

fn idx(x: u32, y: u32, width: u32) -> usize {
    (y * width + x) as usize
}

/// A single connected component surviving the labeling and filtering
/// passes.
#[derive(Debug, Clone, PartialEq)]
pub struct Blob {
    pub id: u32,
    pub rect: Rect,
    pub area: u32,
    /// `area / rect.area()`; how densely the blob fills its bounding box.
    pub fullness: f64,
    pub color_mean: (f64, f64, f64),
    pub color_stddev: (f64, f64, f64),
}

/// Size constraints applied by [`filter_and_renumber`].
#[derive(Debug, Clone, Copy)]
pub struct FilterOptions {
    pub filter_blobs: bool,
    pub coupled_size_filtering: bool,
    pub min_w: i32,
    pub max_w: i32,
    pub min_h: i32,
    pub max_h: i32,
}

impl Default for FilterOptions {
    fn default() -> Self {
        FilterOptions {
            filter_blobs: false,
            coupled_size_filtering: false,
            min_w: 0,
            max_w: i32::MAX,
            min_h: 0,
            max_h: i32::MAX,
        }
    }
}

struct Accumulator {
    min_x: i32,
    max_x: i32,
    min_y: i32,
    max_y: i32,
    area: u32,
    sum: [f64; 3],
    sumsq: [f64; 3],
}

/// Walks the label image once, accumulating bounding box and colour
/// statistics per label.
pub fn collect_blobs(
    image: &crate::image::Image,
    labels: &[u32],
    width: u32,
    height: u32,
    num_labels: u32,
) -> Vec<Blob> {
    let mut accs: HashMap<u32, Accumulator> = HashMap::new();

    for y in 0..height {
        for x in 0..width {
            let label = labels[idx(x, y, width)];
            if label == 0 {
                continue;
            }
            let (r, g, b) = image.rgb_at(x, y);
            let acc = accs.entry(label).or_insert_with(|| Accumulator {
                min_x: x as i32,
                max_x: x as i32,
                min_y: y as i32,
                max_y: y as i32,
                area: 0,
                sum: [0.0; 3],
                sumsq: [0.0; 3],
            });
            acc.min_x = acc.min_x.min(x as i32);
            acc.max_x = acc.max_x.max(x as i32);
            acc.min_y = acc.min_y.min(y as i32);
            acc.max_y = acc.max_y.max(y as i32);
            acc.area += 1;
            for (i, v) in [r, g, b].into_iter().enumerate() {
                acc.sum[i] += v as f64;
                acc.sumsq[i] += (v as f64) * (v as f64);
            }
        }
    }

    let mut blobs: Vec<Blob> = (1..=num_labels)
        .filter_map(|id| accs.remove(&id).map(|acc| build_blob(id, acc)))
        .collect();
    blobs.sort_by_key(|b| b.id);
    blobs
}

fn build_blob(id: u32, acc: Accumulator) -> Blob {
    let rect = Rect::new(acc.min_x, acc.min_y, acc.max_x - acc.min_x + 1, acc.max_y - acc.min_y + 1);
    let n = acc.area as f64;
    let mut mean = [0.0; 3];
    let mut stddev = [0.0; 3];
    for i in 0..3 {
        mean[i] = acc.sum[i] / n;
        let var = (acc.sumsq[i] / n - mean[i] * mean[i]).max(0.0);
        stddev[i] = var.sqrt();
    }
    Blob {
        id,
        rect,
        area: acc.area,
        fullness: acc.area as f64 / rect.area() as f64,
        color_mean: (mean[0], mean[1], mean[2]),
        color_stddev: (stddev[0], stddev[1], stddev[2]),
    }
}

fn passes_size(rect: &Rect, opts: &FilterOptions) -> bool {
    if opts.coupled_size_filtering {
        let both_too_small = rect.w < opts.min_w && rect.h < opts.min_h;
        let both_too_large = rect.w > opts.max_w && rect.h > opts.max_h;
        !(both_too_small || both_too_large)
    } else {
        rect.w >= opts.min_w && rect.w <= opts.max_w && rect.h >= opts.min_h && rect.h <= opts.max_h
    }
}

/// Drops blobs failing the size test and rewrites `labels` in place so
/// surviving blobs keep a dense `1..=N` id range.
pub fn filter_and_renumber(labels: &mut [u32], blobs: Vec<Blob>, opts: &FilterOptions) -> Vec<Blob> {
    if !opts.filter_blobs {
        return blobs;
    }
    let mut remap: HashMap<u32, u32> = HashMap::new();
    let mut next_id = 1u32;
    let mut survivors = Vec::with_capacity(blobs.len());
    for blob in blobs {
        if passes_size(&blob.rect, opts) {
            remap.insert(blob.id, next_id);
            survivors.push(Blob { id: next_id, ..blob });
            next_id += 1;
        }
    }
    for v in labels.iter_mut() {
        if *v == 0 {
            continue;
        }
        *v = *remap.get(v).unwrap_or(&0);
    }
    survivors
}

/// First/last foreground pixel on every row and column of `blob`'s
/// bounding box, deduplicated.
pub fn edge_points(labels: &[u32], width: u32, rect: &Rect, blob_id: u32) -> Vec<Point> {
    let mut set: HashSet<(i32, i32)> = HashSet::new();

    for y in rect.y..rect.bottom() {
        let mut first = None;
        let mut last = None;
        for x in rect.x..rect.right() {
            if labels[idx(x as u32, y as u32, width)] == blob_id {
                first.get_or_insert(x);
                last = Some(x);
            }
        }
        if let (Some(fx), Some(lx)) = (first, last) {
            set.insert((fx, y));
            set.insert((lx, y));
        }
    }

    for x in rect.x..rect.right() {
        let mut first = None;
        let mut last = None;
        for y in rect.y..rect.bottom() {
            if labels[idx(x as u32, y as u32, width)] == blob_id {
                first.get_or_insert(y);
                last = Some(y);
            }
        }
        if let (Some(fy), Some(ly)) = (first, last) {
            set.insert((x, fy));
            set.insert((x, ly));
        }
    }

    set.into_iter().map(|(x, y)| Point::new(x, y)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::Image;
    use crate::labeling::label_image;

    fn solid_square() -> (Vec<u8>, Image<'static>) {
        // Leaked on purpose: test-only, keeps the borrow trivial.
        let data: &'static [u8] = Box::leak(vec![255u8; 100].into_boxed_slice());
        (
            Vec::new(),
            Image::Gray8 { width: 10, height: 10, stride: 10, data },
        )
    }

    #[test]
    fn solid_square_has_full_fullness_and_matching_rect() {
        let (_owned, image) = solid_square();
        let (labels, w, h) = label_image(&image, &crate::image::Thresholds::default()).unwrap();
        let blobs = collect_blobs(&image, &labels, w, h, 1);
        assert_eq!(blobs.len(), 1);
        assert_eq!(blobs[0].rect, Rect::new(0, 0, 10, 10));
        assert_eq!(blobs[0].area, 100);
        assert!((blobs[0].fullness - 1.0).abs() < 1e-9);
        assert_eq!(blobs[0].color_mean, (255.0, 255.0, 255.0));
        assert_eq!(blobs[0].color_stddev, (0.0, 0.0, 0.0));
    }

    #[test]
    fn coupled_filter_rejects_only_uniformly_small_or_large_blobs() {
        let opts = FilterOptions {
            filter_blobs: true,
            coupled_size_filtering: true,
            min_w: 5,
            min_h: 5,
            max_w: 50,
            max_h: 50,
        };
        // Too small in both dimensions: dropped.
        assert!(!passes_size(&Rect::new(0, 0, 2, 2), &opts));
        // Too large in both dimensions: dropped.
        assert!(!passes_size(&Rect::new(0, 0, 60, 60), &opts));
        // Wide but short: only one dimension out of range, so it survives.
        assert!(passes_size(&Rect::new(0, 0, 60, 6), &opts));
    }

    #[test]
    fn edge_points_of_a_filled_square_are_its_four_sides() {
        let (_owned, image) = solid_square();
        let (labels, w, _h) = label_image(&image, &crate::image::Thresholds::default()).unwrap();
        let rect = Rect::new(0, 0, 10, 10);
        let points = edge_points(&labels, w, &rect, 1);
        // Every row contributes (0,y) and (9,y); every column (x,0) and (x,9).
        assert!(points.contains(&Point::new(0, 0)));
        assert!(points.contains(&Point::new(9, 0)));
        assert!(points.contains(&Point::new(0, 9)));
        assert!(points.contains(&Point::new(9, 9)));
        assert!(!points.contains(&Point::new(5, 5)));
    }
}
