//! The core module of the receipt processing pipeline.
//!
//! This module contains the fundamental building blocks shared by every
//! pipeline stage:
//! - Error handling
//! - Configuration management
//!
//! It also re-exports the commonly used types for convenience.

pub mod config;
pub mod errors;

pub use config::{NormalizerConfig, PipelineConfig};
pub use errors::{OcrError, OcrResult, ProcessingStage};
