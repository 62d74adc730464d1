//! Image normalization for text recognition.
//!
//! Converts a page bitmap into a binarized, recognition-optimized image.
//! The four stages (contrast, denoise, binarization, morphology) run in
//! fixed order and are independently toggleable. Every stage fails soft:
//! an internal error leaves the stage input unchanged instead of aborting
//! the page, since normalization is a quality optimization rather than a
//! correctness requirement.

use crate::core::{NormalizerConfig, OcrError, OcrResult, ProcessingStage};
use crate::processors::filters::{clahe, nl_means};
use crate::processors::quality::quality_score;
use image::{GrayImage, Luma};
use imageproc::contrast::{ThresholdType, otsu_level, threshold};
use imageproc::distance_transform::Norm;
use imageproc::filter::{bilateral_filter, box_filter, gaussian_blur_f32};
use imageproc::morphology::{close, open};
use imageproc::region_labelling::{Connectivity, connected_components};
use tracing::{debug, warn};

/// Output of the normalization stage for one page.
///
/// The image is single-channel with foreground text pixels white (255).
/// It is ephemeral: owned by the normalization stage and consumed by the
/// recognition step.
#[derive(Debug, Clone)]
pub struct NormalizedPage {
    /// The recognition-optimized image.
    pub image: GrayImage,
    /// Quality score in `[0, 1]` comparing the output against the input.
    pub quality: f32,
}

/// Normalizes page bitmaps for text recognition.
#[derive(Debug, Clone, Default)]
pub struct ImageNormalizer {
    config: NormalizerConfig,
}

impl ImageNormalizer {
    /// Creates a normalizer with the given stage configuration.
    pub fn new(config: NormalizerConfig) -> Self {
        Self { config }
    }

    /// Runs the configured stages over a grayscale page bitmap.
    pub fn normalize(&self, gray: &GrayImage) -> NormalizedPage {
        let mut current = gray.clone();

        if self.config.enhance_contrast {
            current = run_stage(ProcessingStage::Contrast, current, |img| {
                self.enhance_contrast(img)
            });
        }
        if self.config.denoise {
            current = run_stage(ProcessingStage::Denoise, current, |img| self.denoise(img));
        }
        if self.config.adaptive_threshold {
            current = run_stage(ProcessingStage::Binarize, current, |img| self.binarize(img));
        }
        if self.config.morphological_cleanup {
            current = run_stage(ProcessingStage::Morphology, current, |img| {
                self.cleanup(img)
            });
        }

        let quality = quality_score(gray, &current);
        debug!(quality, "normalization finished");

        NormalizedPage {
            image: current,
            quality,
        }
    }

    /// Locally-adaptive histogram equalization followed by a fixed linear
    /// gain (1.2) and bias (10) pass.
    fn enhance_contrast(&self, image: &GrayImage) -> OcrResult<GrayImage> {
        check_dimensions(image)?;
        let equalized = clahe(image, self.config.clahe_clip_limit, self.config.clahe_grid_size);
        let adjusted = GrayImage::from_fn(equalized.width(), equalized.height(), |x, y| {
            let v = equalized.get_pixel(x, y)[0] as f32;
            Luma([(v * 1.2 + 10.0).round().clamp(0.0, 255.0) as u8])
        });
        Ok(adjusted)
    }

    /// Non-local-means, then light gaussian smoothing, then an
    /// edge-preserving bilateral pass, in that order.
    fn denoise(&self, image: &GrayImage) -> OcrResult<GrayImage> {
        check_dimensions(image)?;
        let denoised = nl_means(image, self.config.nl_means_strength, 3, 10);
        let smoothed = gaussian_blur_f32(&denoised, 0.8);
        Ok(bilateral_filter(&smoothed, 9, 75.0, 75.0))
    }

    /// Combines three candidate foreground masks as
    /// `(adaptiveGaussian AND adaptiveMean) OR otsu`.
    ///
    /// The OR with the Otsu mask biases the result toward recovering more
    /// candidate text pixels rather than fewer; recall matters more than
    /// precision for the downstream recognizer.
    fn binarize(&self, image: &GrayImage) -> OcrResult<GrayImage> {
        check_dimensions(image)?;
        let radius = self.config.threshold_block_radius;
        let offset = self.config.threshold_offset;

        // Gaussian-weighted local mean; sigma chosen to cover the block.
        let gaussian_mean = gaussian_blur_f32(image, (radius as f32).max(1.0) * 0.4);
        let box_mean = box_filter(image, radius, radius);
        let otsu = threshold(image, otsu_level(image), ThresholdType::BinaryInverted);

        let mask = GrayImage::from_fn(image.width(), image.height(), |x, y| {
            let v = image.get_pixel(x, y)[0] as i16;
            let fg_gaussian = v < gaussian_mean.get_pixel(x, y)[0] as i16 - offset;
            let fg_mean = v < box_mean.get_pixel(x, y)[0] as i16 - offset;
            let fg_otsu = otsu.get_pixel(x, y)[0] > 0;
            if (fg_gaussian && fg_mean) || fg_otsu {
                Luma([255u8])
            } else {
                Luma([0u8])
            }
        });
        Ok(mask)
    }

    /// Morphological opening (strip speckle), closing (reconnect strokes),
    /// then removal of connected components below the minimum area.
    fn cleanup(&self, image: &GrayImage) -> OcrResult<GrayImage> {
        check_dimensions(image)?;

        // 3x3 rectangular opening, then 3x3 elliptical closing.
        let opened = open(image, Norm::LInf, 1);
        let closed = close(&opened, Norm::L1, 1);

        // Re-binarize in case an upstream toggle left grey levels behind.
        let binary = GrayImage::from_fn(closed.width(), closed.height(), |x, y| {
            if closed.get_pixel(x, y)[0] > 127 {
                Luma([255u8])
            } else {
                Luma([0u8])
            }
        });

        let labels = connected_components(&binary, Connectivity::Eight, Luma([0u8]));
        let label_count = labels
            .pixels()
            .map(|p| p[0] as usize)
            .max()
            .unwrap_or(0);
        let mut areas = vec![0u32; label_count + 1];
        for p in labels.pixels() {
            areas[p[0] as usize] += 1;
        }

        let min_area = self.config.min_component_area;
        let cleaned = GrayImage::from_fn(binary.width(), binary.height(), |x, y| {
            let label = labels.get_pixel(x, y)[0] as usize;
            if label != 0 && areas[label] >= min_area {
                Luma([255u8])
            } else {
                Luma([0u8])
            }
        });
        Ok(cleaned)
    }
}

/// Applies one stage, returning its input unchanged when the stage fails.
fn run_stage<F>(stage: ProcessingStage, input: GrayImage, apply: F) -> GrayImage
where
    F: FnOnce(&GrayImage) -> OcrResult<GrayImage>,
{
    match apply(&input) {
        Ok(output) => output,
        Err(err) => {
            warn!(stage = %stage, error = %err, "stage failed, passing input through");
            input
        }
    }
}

fn check_dimensions(image: &GrayImage) -> OcrResult<()> {
    if image.width() == 0 || image.height() == 0 {
        return Err(OcrError::invalid_input("zero-sized image"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Synthesizes a flat page with a dark text-like bar.
    fn page_with_bar(width: u32, height: u32) -> GrayImage {
        let mut img = GrayImage::from_pixel(width, height, Luma([220]));
        for y in height / 3..height / 2 {
            for x in 4..width - 4 {
                img.put_pixel(x, y, Luma([40]));
            }
        }
        img
    }

    #[test]
    fn normalize_produces_binary_mask() {
        let normalizer = ImageNormalizer::new(NormalizerConfig::default());
        let page = normalizer.normalize(&page_with_bar(48, 48));
        assert!(page.image.pixels().all(|p| p[0] == 0 || p[0] == 255));
        assert!((0.0..=1.0).contains(&page.quality));
    }

    #[test]
    fn dark_bar_survives_as_foreground() {
        let normalizer = ImageNormalizer::new(NormalizerConfig::default());
        let page = normalizer.normalize(&page_with_bar(48, 48));
        let fg = page.image.pixels().filter(|p| p[0] == 255).count();
        assert!(fg > 0, "the text bar should survive normalization");
    }

    #[test]
    fn all_stages_disabled_is_identity() {
        let config = NormalizerConfig::new()
            .with_enhance_contrast(false)
            .with_denoise(false)
            .with_adaptive_threshold(false)
            .with_morphological_cleanup(false);
        let normalizer = ImageNormalizer::new(config);
        let input = page_with_bar(32, 32);
        let page = normalizer.normalize(&input);
        assert_eq!(page.image, input);
    }

    #[test]
    fn zero_sized_image_fails_soft() {
        let normalizer = ImageNormalizer::new(NormalizerConfig::default());
        let page = normalizer.normalize(&GrayImage::new(0, 0));
        assert_eq!(page.image.dimensions(), (0, 0));
    }

    #[test]
    fn small_speckle_removed_by_cleanup() {
        let config = NormalizerConfig::new()
            .with_enhance_contrast(false)
            .with_denoise(false)
            .with_adaptive_threshold(false)
            .with_min_component_area(10);
        let normalizer = ImageNormalizer::new(config);

        // A 3x3 speckle (area 9, below the minimum) and a 5x5 block (area 25).
        let mut mask = GrayImage::from_pixel(32, 32, Luma([0]));
        for y in 2..5 {
            for x in 2..5 {
                mask.put_pixel(x, y, Luma([255]));
            }
        }
        for y in 10..15 {
            for x in 10..15 {
                mask.put_pixel(x, y, Luma([255]));
            }
        }

        let page = normalizer.normalize(&mask);
        assert_eq!(page.image.get_pixel(3, 3)[0], 0, "speckle removed");
        assert_eq!(page.image.get_pixel(12, 12)[0], 255, "block survives");
    }
}
