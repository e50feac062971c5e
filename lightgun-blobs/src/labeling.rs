use std::collections::HashMap;

use crate::errors::Result;
use crate::image::{is_foreground, Image, Thresholds};
use crate::union_find::UnionFind;

fn idx(x: u32, y: u32, width: u32) -> usize {
    (y * width + x) as usize
}

/// Two-pass connected-component labeling. Returns a dense `1..=N` label
/// image (0 = background) alongside its dimensions.
pub fn label_image(image: &Image, thresholds: &Thresholds) -> Result<(Vec<u32>, u32, u32)> {
    image.validate()?;
    let width = image.width();
    let height = image.height();
    let mut labels = vec![0u32; (width * height) as usize];
    let mut uf = UnionFind::new();

    for y in 0..height {
        for x in 0..width {
            if !is_foreground(image, x, y, thresholds) {
                continue;
            }

            // Neighbour priority: left, upper-left, upper, upper-right.
            let mut neighbour_labels = [0u32; 4];
            let mut n = 0;
            if x > 0 {
                let l = labels[idx(x - 1, y, width)];
                if l != 0 {
                    neighbour_labels[n] = l;
                    n += 1;
                }
            }
            if x > 0 && y > 0 {
                let l = labels[idx(x - 1, y - 1, width)];
                if l != 0 {
                    neighbour_labels[n] = l;
                    n += 1;
                }
            }
            if y > 0 {
                let l = labels[idx(x, y - 1, width)];
                if l != 0 {
                    neighbour_labels[n] = l;
                    n += 1;
                }
            }
            if y > 0 && x + 1 < width {
                let l = labels[idx(x + 1, y - 1, width)];
                if l != 0 {
                    neighbour_labels[n] = l;
                    n += 1;
                }
            }

            let label = if n == 0 {
                uf.new_label()
            } else {
                let mut root = uf.find(neighbour_labels[0]);
                for &nl in &neighbour_labels[1..n] {
                    root = uf.union(root, nl);
                }
                root
            };
            labels[idx(x, y, width)] = label;
        }
    }

    // Compact to a dense 1..=N range, resolving every pixel to its root.
    let mut root_to_dense: HashMap<u32, u32> = HashMap::new();
    let mut next_dense = 1u32;
    for v in labels.iter_mut() {
        if *v == 0 {
            continue;
        }
        let root = uf.find(*v);
        let dense = *root_to_dense.entry(root).or_insert_with(|| {
            let d = next_dense;
            next_dense += 1;
            d
        });
        *v = dense;
    }

    Ok((labels, width, height))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::Image;

    #[test]
    fn two_separate_blobs_get_distinct_labels() {
        // 5x3 gray image, two 1x1 foreground blobs separated by background.
        let mut data = vec![0u8; 15];
        data[0] = 255; // (0,0)
        data[14] = 255; // (4,2)
        let image = Image::Gray8 {
            width: 5,
            height: 3,
            stride: 5,
            data: &data,
        };
        let (labels, w, h) = label_image(&image, &Thresholds::default()).unwrap();
        assert_eq!((w, h), (5, 3));
        assert_eq!(labels[0], 1);
        assert_eq!(labels[14], 2);
    }

    #[test]
    fn an_l_shaped_blob_merges_into_one_label() {
        // 3x3, foreground forms an L: (0,0),(0,1),(0,2),(1,2),(2,2)
        let mut data = vec![0u8; 9];
        for &(x, y) in &[(0, 0), (0, 1), (0, 2), (1, 2), (2, 2)] {
            data[y * 3 + x] = 255;
        }
        let image = Image::Gray8 {
            width: 3,
            height: 3,
            stride: 3,
            data: &data,
        };
        let (labels, _, _) = label_image(&image, &Thresholds::default()).unwrap();
        let l = labels[0 * 3 + 0];
        assert_ne!(l, 0);
        for &(x, y) in &[(0, 1), (0, 2), (1, 2), (2, 2)] {
            assert_eq!(labels[y * 3 + x], l);
        }
    }

    #[test]
    fn narrow_image_is_rejected() {
        let data = vec![0u8; 3];
        let image = Image::Gray8 {
            width: 1,
            height: 3,
            stride: 1,
            data: &data,
        };
        assert!(label_image(&image, &Thresholds::default()).is_err());
    }
}
