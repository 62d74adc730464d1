//! Skew detection and correction for binarized pages.

use image::{GrayImage, Luma};
use imageproc::geometric_transformations::{Interpolation, rotate_about_center};
use imageproc::geometry::min_area_rect;
use imageproc::point::Point;
use tracing::debug;

/// Estimates the page skew from the minimum-area bounding rectangle over
/// foreground pixels and rotates the image to correct it.
///
/// The rectangle angle is normalized the way the original heuristic does:
/// angles below -45 degrees fold to `90 + angle`, everything else is
/// negated. The image is only resampled when the corrective angle exceeds
/// `min_angle` (degrees), which also makes the operation idempotent: a
/// second pass over an already-corrected image measures an angle inside
/// the threshold and returns the input unchanged.
pub fn deskew(image: &GrayImage, min_angle: f32) -> GrayImage {
    let angle = match detect_skew_angle(image) {
        Some(angle) => angle,
        None => return image.clone(),
    };

    if angle.abs() <= min_angle {
        return image.clone();
    }

    debug!(angle, "correcting page skew");
    // In y-down image coordinates positive theta rotates clockwise; the
    // detected correction already carries the sign that undoes the tilt.
    rotate_about_center(
        image,
        angle.to_radians(),
        Interpolation::Bilinear,
        Luma([0u8]),
    )
}

/// Returns the corrective rotation angle in degrees, or `None` when the
/// image has no foreground pixels to measure.
pub fn detect_skew_angle(image: &GrayImage) -> Option<f32> {
    let points: Vec<Point<i32>> = image
        .enumerate_pixels()
        .filter(|(_, _, p)| p[0] > 0)
        .map(|(x, y, _)| Point::new(x as i32, y as i32))
        .collect();

    if points.is_empty() {
        return None;
    }

    let corners = min_area_rect(&points);
    let dx = (corners[1].x - corners[0].x) as f32;
    let dy = (corners[1].y - corners[0].y) as f32;
    if dx == 0.0 && dy == 0.0 {
        return Some(0.0);
    }

    // Fold the edge angle into [-90, 0); min_area_rect edges are
    // perpendicular, so either edge yields the same correction.
    let mut angle = dy.atan2(dx).to_degrees();
    while angle >= 0.0 {
        angle -= 90.0;
    }
    while angle < -90.0 {
        angle += 90.0;
    }

    let correction = if angle < -45.0 { -(90.0 + angle) } else { -angle };
    Some(correction)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Draws an axis-aligned horizontal bar of foreground pixels.
    fn straight_bar() -> GrayImage {
        let mut img = GrayImage::from_pixel(64, 64, Luma([0]));
        for y in 28..36 {
            for x in 8..56 {
                img.put_pixel(x, y, Luma([255]));
            }
        }
        img
    }

    /// Draws a thin bar tilted by roughly `angle_deg`.
    fn tilted_bar(angle_deg: f32) -> GrayImage {
        let mut img = GrayImage::from_pixel(96, 96, Luma([0]));
        let t = angle_deg.to_radians().tan();
        for x in 8..88 {
            let y_center = 48.0 + (x as f32 - 48.0) * t;
            for dy in -2..=2 {
                let y = (y_center as i32 + dy).clamp(0, 95) as u32;
                img.put_pixel(x, y, Luma([255]));
            }
        }
        img
    }

    #[test]
    fn straight_image_is_untouched() {
        let img = straight_bar();
        let out = deskew(&img, 0.5);
        assert_eq!(out, img);
    }

    #[test]
    fn empty_mask_is_untouched() {
        let img = GrayImage::from_pixel(32, 32, Luma([0]));
        assert_eq!(deskew(&img, 0.5), img);
        assert_eq!(detect_skew_angle(&img), None);
    }

    #[test]
    fn detects_tilt_direction_and_magnitude() {
        let angle = detect_skew_angle(&tilted_bar(8.0)).expect("foreground present");
        assert!(
            (angle.abs() - 8.0).abs() < 2.5,
            "expected roughly 8 degrees, got {angle}"
        );
    }

    #[test]
    fn second_pass_on_straight_image_is_identical() {
        let img = straight_bar();
        let once = deskew(&img, 0.5);
        let twice = deskew(&once, 0.5);
        assert_eq!(once, twice, "a second deskew pass must not rotate further");
    }

    #[test]
    fn correction_reduces_residual_skew() {
        let img = tilted_bar(6.0);
        let corrected = deskew(&img, 0.5);
        let residual = detect_skew_angle(&corrected).unwrap_or(0.0);
        assert!(
            residual.abs() < 2.0,
            "residual skew should be small after correction, got {residual}"
        );
    }

    #[test]
    fn single_pixel_mask_reports_zero_angle() {
        let mut img = GrayImage::from_pixel(16, 16, Luma([0]));
        img.put_pixel(8, 8, Luma([255]));
        assert_eq!(detect_skew_angle(&img), Some(0.0));
    }
}
