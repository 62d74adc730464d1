//! A receipt and invoice understanding pipeline.
//!
//! The crate turns page bitmaps (or encoded documents) into a structured
//! [`ConsolidatedRecord`]: merchant identity, transaction date and time,
//! monetary summary lines, purchased items, and a per-field confidence
//! breakdown.
//!
//! Processing runs in fixed stages per page:
//! 1. **Normalization** ([`processors`]): contrast enhancement, denoising,
//!    adaptive binarization, morphological cleanup, and skew correction.
//! 2. **Recognition** ([`recognition`]): the page is handed to a pluggable
//!    [`TextRecognizer`] under several layout profiles; the richest
//!    transcript wins.
//! 3. **Extraction** ([`extract`]): regex-driven parsing of the transcript
//!    into a [`CandidateRecord`].
//! 4. **Scoring** ([`scoring`]): deterministic per-field confidences and a
//!    weighted overall value.
//!
//! Multi-page documents are fused field-by-field ([`pipeline::fuse`]) into a
//! single record.
//!
//! # Example
//!
//! ```no_run
//! use receipt_ocr::{DocumentPipeline, OcrResult, RecognitionProfile, TextRecognizer};
//! use image::GrayImage;
//!
//! struct MyBackend;
//!
//! impl TextRecognizer for MyBackend {
//!     fn recognize(&self, image: &GrayImage, profile: RecognitionProfile) -> OcrResult<String> {
//!         // Hand the bitmap to an OCR engine configured for `profile`.
//!         Ok(String::new())
//!     }
//! }
//!
//! fn main() -> OcrResult<()> {
//!     let pipeline = DocumentPipeline::builder().recognizer(MyBackend).build()?;
//!     let result = pipeline.process_bytes(&std::fs::read("receipt.png")?)?;
//!     println!("{result}");
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod domain;
pub mod extract;
pub mod pipeline;
pub mod processors;
pub mod recognition;
pub mod scoring;

pub use crate::core::{NormalizerConfig, OcrError, OcrResult, PipelineConfig, ProcessingStage};
pub use crate::domain::{
    CandidateRecord, ConsolidatedRecord, FieldConfidence, LineItem, PageBreakdown, field,
};
pub use crate::pipeline::{DocumentPipeline, DocumentPipelineBuilder, PageRasterizer, PageSource};
pub use crate::recognition::{RecognitionProfile, TextRecognizer, Transcript};
