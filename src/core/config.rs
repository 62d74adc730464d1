//! Pipeline configuration types.
//!
//! Configuration is loaded once and treated as read-only for the lifetime of
//! a pipeline; concurrent pipelines may share it freely.

use crate::recognition::RecognitionProfile;
use serde::{Deserialize, Serialize};

/// Configuration for the image normalizer.
///
/// The four stages are independently toggleable but always applied in fixed
/// order: contrast, denoise, binarization, morphological cleanup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizerConfig {
    /// Apply locally-adaptive histogram equalization plus a linear gain pass.
    #[serde(default = "NormalizerConfig::default_true")]
    pub enhance_contrast: bool,

    /// Apply the non-local-means / gaussian / bilateral denoising chain.
    #[serde(default = "NormalizerConfig::default_true")]
    pub denoise: bool,

    /// Apply combined adaptive/Otsu binarization.
    #[serde(default = "NormalizerConfig::default_true")]
    pub adaptive_threshold: bool,

    /// Apply morphological opening/closing and small-component removal.
    #[serde(default = "NormalizerConfig::default_true")]
    pub morphological_cleanup: bool,

    /// Clip limit for the adaptive histogram equalization.
    /// Default: 2.0
    #[serde(default = "NormalizerConfig::default_clahe_clip_limit")]
    pub clahe_clip_limit: f32,

    /// Tile grid side length for the adaptive histogram equalization.
    /// Default: 8
    #[serde(default = "NormalizerConfig::default_clahe_grid_size")]
    pub clahe_grid_size: u32,

    /// Filter strength for the non-local-means pass.
    /// Default: 10.0
    #[serde(default = "NormalizerConfig::default_nl_means_strength")]
    pub nl_means_strength: f32,

    /// Neighborhood radius for the adaptive thresholds (block = 2r + 1).
    /// Default: 5 (11x11 block)
    #[serde(default = "NormalizerConfig::default_threshold_block_radius")]
    pub threshold_block_radius: u32,

    /// Constant subtracted from the local mean in the adaptive thresholds.
    /// Default: 2
    #[serde(default = "NormalizerConfig::default_threshold_offset")]
    pub threshold_offset: i16,

    /// Minimum connected-component area (in pixels) to survive cleanup.
    /// Default: 10
    #[serde(default = "NormalizerConfig::default_min_component_area")]
    pub min_component_area: u32,
}

impl NormalizerConfig {
    /// Creates a configuration with all stages enabled and default tunables.
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggles the contrast enhancement stage.
    pub fn with_enhance_contrast(mut self, enable: bool) -> Self {
        self.enhance_contrast = enable;
        self
    }

    /// Toggles the denoising stage.
    pub fn with_denoise(mut self, enable: bool) -> Self {
        self.denoise = enable;
        self
    }

    /// Toggles the binarization stage.
    pub fn with_adaptive_threshold(mut self, enable: bool) -> Self {
        self.adaptive_threshold = enable;
        self
    }

    /// Toggles the morphological cleanup stage.
    pub fn with_morphological_cleanup(mut self, enable: bool) -> Self {
        self.morphological_cleanup = enable;
        self
    }

    /// Sets the minimum connected-component area kept by cleanup.
    pub fn with_min_component_area(mut self, area: u32) -> Self {
        self.min_component_area = area;
        self
    }

    fn default_true() -> bool {
        true
    }

    fn default_clahe_clip_limit() -> f32 {
        2.0
    }

    fn default_clahe_grid_size() -> u32 {
        8
    }

    fn default_nl_means_strength() -> f32 {
        10.0
    }

    fn default_threshold_block_radius() -> u32 {
        5
    }

    fn default_threshold_offset() -> i16 {
        2
    }

    fn default_min_component_area() -> u32 {
        10
    }
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            enhance_contrast: true,
            denoise: true,
            adaptive_threshold: true,
            morphological_cleanup: true,
            clahe_clip_limit: Self::default_clahe_clip_limit(),
            clahe_grid_size: Self::default_clahe_grid_size(),
            nl_means_strength: Self::default_nl_means_strength(),
            threshold_block_radius: Self::default_threshold_block_radius(),
            threshold_offset: Self::default_threshold_offset(),
            min_component_area: Self::default_min_component_area(),
        }
    }
}

/// Configuration for the document pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Image normalizer configuration.
    #[serde(default)]
    pub normalizer: NormalizerConfig,

    /// Recognition profiles to attempt per page, in order. At least 4
    /// distinct profiles are required.
    #[serde(default = "RecognitionProfile::all")]
    pub profiles: Vec<RecognitionProfile>,

    /// Minimum absolute skew angle, in degrees, required before the deskew
    /// step rotates the image. Avoids resampling already-straight pages.
    /// Default: 0.5
    #[serde(default = "PipelineConfig::default_deskew_min_angle")]
    pub deskew_min_angle: f32,

    /// Fan recognition profiles out across threads. Selection is a pure
    /// post-hoc comparison, so the transcript is identical either way.
    /// Default: true
    #[serde(default = "PipelineConfig::default_parallel_recognition")]
    pub parallel_recognition: bool,
}

impl PipelineConfig {
    /// Creates a configuration with default stages and the full profile set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the normalizer configuration.
    pub fn with_normalizer(mut self, normalizer: NormalizerConfig) -> Self {
        self.normalizer = normalizer;
        self
    }

    /// Sets the ordered recognition profile list.
    pub fn with_profiles(mut self, profiles: Vec<RecognitionProfile>) -> Self {
        self.profiles = profiles;
        self
    }

    /// Toggles the recognition-profile fan-out.
    pub fn with_parallel_recognition(mut self, enable: bool) -> Self {
        self.parallel_recognition = enable;
        self
    }

    fn default_deskew_min_angle() -> f32 {
        0.5
    }

    fn default_parallel_recognition() -> bool {
        true
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            normalizer: NormalizerConfig::default(),
            profiles: RecognitionProfile::all(),
            deskew_min_angle: Self::default_deskew_min_angle(),
            parallel_recognition: Self::default_parallel_recognition(),
        }
    }
}
