//! Normalization quality scoring.

use image::GrayImage;
use imageproc::edges::canny;
use imageproc::filter::box_filter;

/// Scores how much a normalization pass improved a page for recognition.
///
/// Combines three ratios between the post- and pre-normalization images:
/// contrast (intensity standard deviation), edge retention (Canny edge
/// pixel counts) and noise reduction (residual variance in locally
/// smoothed regions, capped at 2). The result is clamped to `[0, 1]`.
pub fn quality_score(pre: &GrayImage, post: &GrayImage) -> f32 {
    let pre_std = intensity_std(pre);
    let post_std = intensity_std(post);
    let contrast_ratio = if pre_std > 0.0 { post_std / pre_std } else { 1.0 };

    let pre_edges = edge_pixel_count(pre);
    let post_edges = edge_pixel_count(post);
    let edge_ratio = if pre_edges > 0 {
        post_edges as f64 / pre_edges as f64
    } else {
        1.0
    };

    let pre_noise = residual_noise_variance(pre);
    let post_noise = residual_noise_variance(post);
    let noise_reduction = if post_noise > 0.0 {
        pre_noise / post_noise
    } else {
        1.0
    };

    let score = 0.4 * contrast_ratio + 0.3 * edge_ratio + 0.3 * noise_reduction.min(2.0);
    score.clamp(0.0, 1.0) as f32
}

fn intensity_std(image: &GrayImage) -> f64 {
    let n = image.pixels().len();
    if n == 0 {
        return 0.0;
    }
    let mean = image.pixels().map(|p| p[0] as f64).sum::<f64>() / n as f64;
    let var = image
        .pixels()
        .map(|p| {
            let d = p[0] as f64 - mean;
            d * d
        })
        .sum::<f64>()
        / n as f64;
    var.sqrt()
}

fn edge_pixel_count(image: &GrayImage) -> usize {
    if image.width() < 3 || image.height() < 3 {
        return 0;
    }
    canny(image, 50.0, 150.0)
        .pixels()
        .filter(|p| p[0] > 0)
        .count()
}

/// Variance of the residual after 5x5 box smoothing; a proxy for noise.
fn residual_noise_variance(image: &GrayImage) -> f64 {
    let n = image.pixels().len();
    if n == 0 {
        return 0.0;
    }
    let smooth = box_filter(image, 2, 2);
    let residuals: Vec<f64> = image
        .pixels()
        .zip(smooth.pixels())
        .map(|(a, b)| a[0] as f64 - b[0] as f64)
        .collect();
    let mean = residuals.iter().sum::<f64>() / n as f64;
    residuals.iter().map(|r| (r - mean) * (r - mean)).sum::<f64>() / n as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn score_is_always_in_unit_interval() {
        let flat = GrayImage::from_pixel(16, 16, Luma([128]));
        let mut noisy = flat.clone();
        for (i, p) in noisy.pixels_mut().enumerate() {
            p[0] = if i % 2 == 0 { 0 } else { 255 };
        }
        for (pre, post) in [(&flat, &noisy), (&noisy, &flat), (&flat, &flat)] {
            let score = quality_score(pre, post);
            assert!((0.0..=1.0).contains(&score), "score {score} out of range");
        }
    }

    #[test]
    fn identical_images_score_high() {
        let mut img = GrayImage::from_pixel(32, 32, Luma([200]));
        for y in 10..20 {
            for x in 5..27 {
                img.put_pixel(x, y, Luma([30]));
            }
        }
        // All three ratios are 1, so the score is exactly the weight sum.
        let score = quality_score(&img, &img);
        assert!((score - 1.0).abs() < 1e-6);
    }

    #[test]
    fn zero_sized_images_do_not_panic() {
        let empty = GrayImage::new(0, 0);
        let score = quality_score(&empty, &empty);
        assert!((0.0..=1.0).contains(&score));
    }
}
