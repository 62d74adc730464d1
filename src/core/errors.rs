//! Core error types for the receipt processing pipeline.
//!
//! This module defines the error taxonomy used throughout the crate. Only
//! genuinely unreadable input produces a hard failure; recognition failures
//! and per-field parse failures degrade to empty transcripts and unset
//! fields respectively, and normalization-stage errors degrade to a
//! pass-through of the stage input.

use thiserror::Error;

/// Convenience alias for results produced by the pipeline.
pub type OcrResult<T> = Result<T, OcrError>;

/// Enum identifying the stage of the pipeline an error originated in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessingStage {
    /// Contrast enhancement.
    Contrast,
    /// Denoising.
    Denoise,
    /// Binarization.
    Binarize,
    /// Morphological cleanup.
    Morphology,
    /// Skew detection and correction.
    Deskew,
    /// External text recognition.
    Recognition,
    /// Page rasterization of a multi-page source.
    Rasterization,
    /// Field extraction from a transcript.
    Extraction,
    /// Generic processing error.
    Generic,
}

impl std::fmt::Display for ProcessingStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProcessingStage::Contrast => write!(f, "contrast enhancement"),
            ProcessingStage::Denoise => write!(f, "denoising"),
            ProcessingStage::Binarize => write!(f, "binarization"),
            ProcessingStage::Morphology => write!(f, "morphological cleanup"),
            ProcessingStage::Deskew => write!(f, "deskew"),
            ProcessingStage::Recognition => write!(f, "text recognition"),
            ProcessingStage::Rasterization => write!(f, "page rasterization"),
            ProcessingStage::Extraction => write!(f, "field extraction"),
            ProcessingStage::Generic => write!(f, "processing"),
        }
    }
}

/// Errors produced by the receipt processing pipeline.
#[derive(Error, Debug)]
pub enum OcrError {
    /// The input bitmap could not be decoded. Raised before normalization;
    /// never silently coerced into an empty result.
    #[error("malformed input image")]
    MalformedInput(#[source] image::ImageError),

    /// A processing stage failed with an underlying cause.
    #[error("{stage} failed: {context}")]
    Processing {
        /// The stage that failed.
        stage: ProcessingStage,
        /// Additional context about the failure.
        context: String,
        /// The underlying error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The input was structurally invalid (e.g. an empty page list).
    #[error("invalid input: {message}")]
    InvalidInput {
        /// A message describing the invalid input.
        message: String,
    },

    /// The pipeline configuration was invalid.
    #[error("configuration: {message}")]
    ConfigError {
        /// A message describing the configuration problem.
        message: String,
    },

    /// IO error.
    #[error("io")]
    Io(#[from] std::io::Error),
}

impl From<image::ImageError> for OcrError {
    fn from(error: image::ImageError) -> Self {
        Self::MalformedInput(error)
    }
}

impl OcrError {
    /// Creates an invalid-input error from a message.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Creates a configuration error from a message.
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Wraps an error that occurred in a specific processing stage.
    pub fn stage_error(
        stage: ProcessingStage,
        context: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Processing {
            stage,
            context: context.into(),
            source: Box::new(source),
        }
    }
}
