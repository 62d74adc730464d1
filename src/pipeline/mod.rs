//! End-to-end document pipeline: normalize, recognize, extract, score, fuse.

mod fusion;
mod page;

pub use fusion::fuse;
pub use page::{PageRasterizer, PageSource};

use image::DynamicImage;
use rayon::prelude::*;
use tracing::{debug, warn};

use crate::core::{OcrError, OcrResult, PipelineConfig};
use crate::domain::{CandidateRecord, ConsolidatedRecord, FieldConfidence, PageBreakdown, field};
use crate::extract::extract;
use crate::processors::{ImageNormalizer, deskew};
use crate::recognition::{RecognitionAdapter, TextRecognizer};
use crate::scoring::{overall_confidence, score};

/// Text quality assigned to pages served from native text, which never go
/// through recognition and so have no transcript-derived quality signal.
const NATIVE_TEXT_QUALITY: f64 = 0.7;

/// Builder for [`DocumentPipeline`].
pub struct DocumentPipelineBuilder {
    config: PipelineConfig,
    recognizer: Option<Box<dyn TextRecognizer>>,
}

impl DocumentPipelineBuilder {
    /// Starts a builder with the default configuration.
    pub fn new() -> Self {
        Self {
            config: PipelineConfig::default(),
            recognizer: None,
        }
    }

    /// Replaces the pipeline configuration.
    pub fn config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the text recognition backend. Required.
    pub fn recognizer(mut self, recognizer: impl TextRecognizer + 'static) -> Self {
        self.recognizer = Some(Box::new(recognizer));
        self
    }

    /// Validates the configuration and assembles the pipeline.
    pub fn build(self) -> OcrResult<DocumentPipeline> {
        let recognizer = self
            .recognizer
            .ok_or_else(|| OcrError::config_error("a text recognizer is required"))?;
        let adapter = RecognitionAdapter::new(self.config.profiles.clone())?
            .with_parallel(self.config.parallel_recognition);
        let normalizer = ImageNormalizer::new(self.config.normalizer.clone());
        Ok(DocumentPipeline {
            config: self.config,
            normalizer,
            adapter,
            recognizer,
        })
    }
}

impl Default for DocumentPipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// The receipt processing pipeline.
///
/// Stateless across documents; one instance can process any number of
/// documents, and pages of a document are processed in parallel.
pub struct DocumentPipeline {
    config: PipelineConfig,
    normalizer: ImageNormalizer,
    adapter: RecognitionAdapter,
    recognizer: Box<dyn TextRecognizer>,
}

impl std::fmt::Debug for DocumentPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentPipeline")
            .field("config", &self.config)
            .field("normalizer", &self.normalizer)
            .field("adapter", &self.adapter)
            .finish_non_exhaustive()
    }
}

impl DocumentPipeline {
    /// Starts building a pipeline.
    pub fn builder() -> DocumentPipelineBuilder {
        DocumentPipelineBuilder::new()
    }

    /// Processes a single decoded image.
    pub fn process(&self, image: DynamicImage) -> OcrResult<ConsolidatedRecord> {
        self.process_pages(vec![PageSource::from_image(image)])
    }

    /// Decodes an encoded image and processes it.
    pub fn process_bytes(&self, bytes: &[u8]) -> OcrResult<ConsolidatedRecord> {
        let image = image::load_from_memory(bytes)?;
        self.process(image)
    }

    /// Rasterizes a multi-page document and processes its pages.
    pub fn process_document(
        &self,
        rasterizer: &dyn PageRasterizer,
        bytes: &[u8],
    ) -> OcrResult<ConsolidatedRecord> {
        self.process_pages(rasterizer.rasterize(bytes)?)
    }

    /// Processes already-rasterized pages and fuses the results.
    pub fn process_pages(&self, pages: Vec<PageSource>) -> OcrResult<ConsolidatedRecord> {
        if pages.is_empty() {
            return Err(OcrError::invalid_input("document contains no pages"));
        }
        let mut outcomes: Vec<(CandidateRecord, PageBreakdown)> = pages
            .into_par_iter()
            .enumerate()
            .map(|(index, page)| self.process_page(index, &page))
            .collect();

        let records = outcomes.iter_mut().map(|(record, _)| std::mem::take(record));
        let record = fuse(records.collect());
        let pages: Vec<PageBreakdown> =
            outcomes.into_iter().map(|(_, breakdown)| breakdown).collect();
        let overall = fusion::overall_from_pages(&pages);
        debug!(
            pages = pages.len(),
            overall = format!("{overall:.3}"),
            "document processed"
        );
        Ok(ConsolidatedRecord {
            record,
            overall_confidence: overall,
            pages,
        })
    }

    fn process_page(&self, index: usize, page: &PageSource) -> (CandidateRecord, PageBreakdown) {
        if let Some(text) = page.usable_native_text() {
            debug!(page = index, "using native text, skipping recognition");
            let record = extract(text);
            let mut scores = score(&record);
            scores.set(field::TEXT_QUALITY, NATIVE_TEXT_QUALITY);
            let overall = overall_confidence(&scores);
            let breakdown = PageBreakdown {
                page_index: index,
                image_quality: None,
                scores,
                overall,
            };
            return (record, breakdown);
        }

        let gray = page.image.to_luma8();
        let normalized = self.normalizer.normalize(&gray);
        let straightened = deskew(&normalized.image, self.config.deskew_min_angle);
        let transcript = self.adapter.transcribe(self.recognizer.as_ref(), &straightened);

        let (record, scores) = if transcript.is_empty() {
            warn!(page = index, "no text recognized");
            (
                CandidateRecord::empty_with_note("no text could be recognized on this page"),
                FieldConfidence::new(),
            )
        } else {
            let record = extract(&transcript.text);
            let scores = score(&record);
            (record, scores)
        };
        let overall = overall_confidence(&scores);
        let breakdown = PageBreakdown {
            page_index: index,
            image_quality: Some(normalized.quality),
            scores,
            overall,
        };
        (record, breakdown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::OcrResult;
    use crate::recognition::RecognitionProfile;
    use image::GrayImage;

    /// Recognizer returning a canned transcript regardless of the bitmap.
    struct FixedRecognizer {
        text: &'static str,
    }

    impl TextRecognizer for FixedRecognizer {
        fn recognize(&self, _image: &GrayImage, profile: RecognitionProfile) -> OcrResult<String> {
            // Only one profile answers, so the longest-transcript pick is
            // unambiguous.
            if profile == RecognitionProfile::UniformBlock {
                Ok(self.text.to_string())
            } else {
                Ok(String::new())
            }
        }
    }

    fn pipeline(text: &'static str) -> DocumentPipeline {
        DocumentPipeline::builder()
            .recognizer(FixedRecognizer { text })
            .build()
            .unwrap()
    }

    fn blank_page() -> DynamicImage {
        DynamicImage::new_luma8(64, 64)
    }

    const RECEIPT: &str = "WALMART SUPERCENTER\n123 MAIN ST\nANYTOWN, ST 12345\n(555) 123-4567\n01/15/2024 14:30\nMILK 3.99\nBREAD 2.49\nSUBTOTAL 6.48\nTAX 0.52\nTOTAL 7.00";

    #[test]
    fn single_page_end_to_end() {
        let result = pipeline(RECEIPT).process(blank_page()).unwrap();
        assert_eq!(
            result.record.merchant_name.as_deref(),
            Some("WALMART SUPERCENTER")
        );
        assert_eq!(result.record.total_amount, Some(7.00));
        assert_eq!(result.pages.len(), 1);
        assert!(result.pages[0].image_quality.is_some());
        assert!(result.overall_confidence > 0.0);
    }

    #[test]
    fn empty_transcript_yields_empty_record_with_note() {
        let result = pipeline("   ").process(blank_page()).unwrap();
        assert!(result.record.is_empty());
        assert_eq!(result.overall_confidence, 0.0);
        assert!(result.pages[0].scores.is_empty());
        assert_eq!(result.scored_page_count(), 0);
        assert_eq!(
            result.record.notes,
            vec!["no text could be recognized on this page".to_string()]
        );
    }

    #[test]
    fn native_text_page_skips_recognition() {
        let page = PageSource::with_native_text(blank_page(), RECEIPT);
        // The recognizer would return nothing, so any extracted field proves
        // the native text path was taken.
        let result = pipeline("").process_pages(vec![page]).unwrap();
        assert_eq!(
            result.record.merchant_name.as_deref(),
            Some("WALMART SUPERCENTER")
        );
        assert!(result.pages[0].image_quality.is_none());
        assert_eq!(
            result.pages[0].scores.get(field::TEXT_QUALITY),
            Some(NATIVE_TEXT_QUALITY)
        );
    }

    #[test]
    fn no_pages_is_an_input_error() {
        let err = pipeline("").process_pages(Vec::new()).unwrap_err();
        assert!(matches!(err, OcrError::InvalidInput { .. }));
    }

    #[test]
    fn undecodable_bytes_are_malformed_input() {
        let err = pipeline("").process_bytes(b"not an image").unwrap_err();
        assert!(matches!(err, OcrError::MalformedInput(_)));
    }

    #[test]
    fn missing_recognizer_fails_the_build() {
        let err = DocumentPipeline::builder().build().unwrap_err();
        assert!(matches!(err, OcrError::ConfigError { .. }));
    }

    #[test]
    fn multi_page_results_are_fused_in_order() {
        let page_one = PageSource::with_native_text(blank_page(), "CORNER CAFE\nTOTAL 8.00");
        let page_two = PageSource::with_native_text(blank_page(), "TOTAL 12.39\nTAX 0.50");
        let result = pipeline("").process_pages(vec![page_one, page_two]).unwrap();
        assert_eq!(result.record.merchant_name.as_deref(), Some("CORNER CAFE"));
        assert_eq!(result.record.total_amount, Some(12.39));
        assert_eq!(result.record.tax_amount, Some(0.50));
        assert_eq!(result.pages[0].page_index, 0);
        assert_eq!(result.pages[1].page_index, 1);
    }
}
