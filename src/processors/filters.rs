//! Local filters used by image normalization.
//!
//! These implement the two enhancement passes not provided by imageproc:
//! contrast-limited adaptive histogram equalization and non-local-means
//! denoising.

use image::{GrayImage, Luma};
use rayon::prelude::*;

/// Applies contrast-limited adaptive histogram equalization.
///
/// The image is divided into a `grid_size` x `grid_size` tile grid. Each
/// tile gets its own clipped histogram mapping; output pixels bilinearly
/// interpolate between the mappings of the four nearest tile centers to
/// avoid visible tile seams.
///
/// # Arguments
///
/// * `image` - The grayscale input image
/// * `clip_limit` - Histogram clip limit as a multiple of the uniform bin height
/// * `grid_size` - Number of tiles along each axis (minimum 1)
pub fn clahe(image: &GrayImage, clip_limit: f32, grid_size: u32) -> GrayImage {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return image.clone();
    }

    let grid = grid_size.max(1).min(width).min(height);
    let tile_w = width.div_ceil(grid);
    let tile_h = height.div_ceil(grid);

    // Per-tile lookup tables from clipped histograms.
    let mut tables = vec![[0u8; 256]; (grid * grid) as usize];
    for ty in 0..grid {
        for tx in 0..grid {
            let x0 = tx * tile_w;
            let y0 = ty * tile_h;
            let x1 = (x0 + tile_w).min(width);
            let y1 = (y0 + tile_h).min(height);

            let mut hist = [0u32; 256];
            for y in y0..y1 {
                for x in x0..x1 {
                    hist[image.get_pixel(x, y)[0] as usize] += 1;
                }
            }

            let pixels = ((x1 - x0) * (y1 - y0)).max(1);
            let limit = ((clip_limit * pixels as f32 / 256.0).ceil() as u32).max(1);

            // Clip and redistribute the excess uniformly.
            let mut excess = 0u32;
            for bin in hist.iter_mut() {
                if *bin > limit {
                    excess += *bin - limit;
                    *bin = limit;
                }
            }
            let bonus = excess / 256;
            let remainder = (excess % 256) as usize;
            for (i, bin) in hist.iter_mut().enumerate() {
                *bin += bonus + u32::from(i < remainder);
            }

            let table = &mut tables[(ty * grid + tx) as usize];
            let mut cdf = 0u32;
            for (value, &count) in hist.iter().enumerate() {
                cdf += count;
                table[value] = ((cdf as f32 / pixels as f32) * 255.0).round().min(255.0) as u8;
            }
        }
    }

    let table_at = |tx: u32, ty: u32| &tables[(ty * grid + tx) as usize];

    GrayImage::from_fn(width, height, |x, y| {
        let value = image.get_pixel(x, y)[0] as usize;

        // Position relative to tile centers, clamped at the borders.
        let fx = (x as f32 / tile_w as f32 - 0.5).clamp(0.0, (grid - 1) as f32);
        let fy = (y as f32 / tile_h as f32 - 0.5).clamp(0.0, (grid - 1) as f32);
        let tx0 = fx.floor() as u32;
        let ty0 = fy.floor() as u32;
        let tx1 = (tx0 + 1).min(grid - 1);
        let ty1 = (ty0 + 1).min(grid - 1);
        let wx = fx - tx0 as f32;
        let wy = fy - ty0 as f32;

        let top = table_at(tx0, ty0)[value] as f32 * (1.0 - wx)
            + table_at(tx1, ty0)[value] as f32 * wx;
        let bottom = table_at(tx0, ty1)[value] as f32 * (1.0 - wx)
            + table_at(tx1, ty1)[value] as f32 * wx;
        let mapped = top * (1.0 - wy) + bottom * wy;
        Luma([mapped.round().clamp(0.0, 255.0) as u8])
    })
}

/// Applies non-local-means denoising.
///
/// For each pixel, similar patches inside a search window are averaged with
/// weights that decay exponentially with patch distance. Rows are processed
/// in parallel; the filter is pure so the fan-out does not affect output.
///
/// # Arguments
///
/// * `image` - The grayscale input image
/// * `strength` - Filter strength `h`; larger removes more noise and detail
/// * `patch_radius` - Radius of the compared patches
/// * `search_radius` - Radius of the search window
pub fn nl_means(image: &GrayImage, strength: f32, patch_radius: u32, search_radius: u32) -> GrayImage {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 || strength <= 0.0 {
        return image.clone();
    }

    let pr = patch_radius as i64;
    let sr = search_radius as i64;
    let h2 = strength * strength;
    let patch_area = ((2 * pr + 1) * (2 * pr + 1)) as f32;

    let clamped = |x: i64, y: i64| -> f32 {
        let cx = x.clamp(0, width as i64 - 1) as u32;
        let cy = y.clamp(0, height as i64 - 1) as u32;
        image.get_pixel(cx, cy)[0] as f32
    };

    let patch_distance = |ax: i64, ay: i64, bx: i64, by: i64| -> f32 {
        let mut sum = 0.0f32;
        for dy in -pr..=pr {
            for dx in -pr..=pr {
                let diff = clamped(ax + dx, ay + dy) - clamped(bx + dx, by + dy);
                sum += diff * diff;
            }
        }
        sum / patch_area
    };

    let rows: Vec<Vec<u8>> = (0..height as i64)
        .into_par_iter()
        .map(|y| {
            let mut row = Vec::with_capacity(width as usize);
            for x in 0..width as i64 {
                let mut weight_sum = 0.0f32;
                let mut value_sum = 0.0f32;
                let mut max_weight = 0.0f32;
                for sy in -sr..=sr {
                    for sx in -sr..=sr {
                        if sx == 0 && sy == 0 {
                            continue;
                        }
                        let d2 = patch_distance(x, y, x + sx, y + sy);
                        let w = (-d2 / h2).exp();
                        max_weight = max_weight.max(w);
                        weight_sum += w;
                        value_sum += w * clamped(x + sx, y + sy);
                    }
                }
                // The center pixel gets the largest neighbor weight so a
                // noisy pixel cannot dominate its own estimate.
                let self_weight = if max_weight > 0.0 { max_weight } else { 1.0 };
                weight_sum += self_weight;
                value_sum += self_weight * clamped(x, y);
                let value = value_sum / weight_sum;
                row.push(value.round().clamp(0.0, 255.0) as u8);
            }
            row
        })
        .collect();

    let mut out = GrayImage::new(width, height);
    for (y, row) in rows.into_iter().enumerate() {
        for (x, value) in row.into_iter().enumerate() {
            out.put_pixel(x as u32, y as u32, Luma([value]));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_image(width: u32, height: u32, value: u8) -> GrayImage {
        GrayImage::from_pixel(width, height, Luma([value]))
    }

    #[test]
    fn clahe_preserves_dimensions() {
        let img = flat_image(32, 48, 128);
        let out = clahe(&img, 2.0, 8);
        assert_eq!(out.dimensions(), (32, 48));
    }

    #[test]
    fn clahe_spreads_bimodal_histogram() {
        // Dark text band on a bright background should end up more separated.
        let mut img = flat_image(32, 32, 180);
        for x in 0..32 {
            for y in 12..20 {
                img.put_pixel(x, y, Luma([60]));
            }
        }
        let out = clahe(&img, 2.0, 4);
        let dark = out.get_pixel(16, 16)[0];
        let bright = out.get_pixel(16, 4)[0];
        assert!(bright > dark);
    }

    #[test]
    fn nl_means_is_identity_on_flat_regions() {
        let img = flat_image(16, 16, 90);
        let out = nl_means(&img, 10.0, 1, 3);
        assert_eq!(out.get_pixel(8, 8)[0], 90);
    }

    #[test]
    fn nl_means_attenuates_isolated_speckle() {
        let mut img = flat_image(17, 17, 200);
        img.put_pixel(8, 8, Luma([0]));
        let out = nl_means(&img, 10.0, 1, 3);
        assert!(out.get_pixel(8, 8)[0] > 0);
    }

    #[test]
    fn zero_sized_inputs_pass_through() {
        let img = GrayImage::new(0, 0);
        assert_eq!(clahe(&img, 2.0, 8).dimensions(), (0, 0));
        assert_eq!(nl_means(&img, 10.0, 3, 10).dimensions(), (0, 0));
    }
}
