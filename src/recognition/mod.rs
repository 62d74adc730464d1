//! Coordination with the external text-recognition capability.
//!
//! The pipeline does not ship a recognizer; it drives one through the
//! [`TextRecognizer`] trait, invoking it once per configured
//! [`RecognitionProfile`] and keeping the longest successful transcript.
//! For receipts, more recovered text generally beats a marginally cleaner
//! but shorter result, since truncation is worse than local noise.

use crate::core::{OcrError, OcrResult};
use image::GrayImage;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};

/// A named configuration of the recognition capability.
///
/// Profiles differ in the layout-segmentation assumption the recognizer
/// should make about the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecognitionProfile {
    /// Treat the page as a single uniform block of text.
    UniformBlock,
    /// Treat the page as a single word.
    SingleWord,
    /// Find sparse text without assuming a layout.
    SparseText,
    /// Treat the page as a single raw text line, bypassing layout analysis.
    RawLine,
}

impl RecognitionProfile {
    /// The default ordered profile list the adapter attempts per page.
    pub fn all() -> Vec<RecognitionProfile> {
        vec![
            RecognitionProfile::UniformBlock,
            RecognitionProfile::SingleWord,
            RecognitionProfile::SparseText,
            RecognitionProfile::RawLine,
        ]
    }
}

impl fmt::Display for RecognitionProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecognitionProfile::UniformBlock => write!(f, "uniform-block"),
            RecognitionProfile::SingleWord => write!(f, "single-word"),
            RecognitionProfile::SparseText => write!(f, "sparse-text"),
            RecognitionProfile::RawLine => write!(f, "raw-line"),
        }
    }
}

/// External text-recognition capability.
///
/// Implementations wrap whatever engine is available (a tesseract binding,
/// a remote service, a test mock). A failure and an empty success are
/// treated identically by the adapter, so implementations are free to
/// return either for unusable pages. Callers needing bounded latency must
/// wrap the call externally and surface a timeout as an error.
pub trait TextRecognizer: Send + Sync {
    /// Recognizes text in a normalized page image under the given profile.
    fn recognize(&self, image: &GrayImage, profile: RecognitionProfile) -> OcrResult<String>;
}

/// Text recovered from one page together with the profile that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transcript {
    /// The recognized text. Empty when no profile yielded usable text;
    /// that is a terminal signal for the page, not an error.
    pub text: String,
    /// The profile whose result was selected, when any succeeded.
    pub profile: Option<RecognitionProfile>,
}

impl Transcript {
    /// An empty transcript: the terminal signal for an unrecognizable page.
    pub fn empty() -> Self {
        Self {
            text: String::new(),
            profile: None,
        }
    }

    /// Returns true when no usable text was recovered.
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Drives a [`TextRecognizer`] across multiple profiles and selects the
/// canonical transcript.
#[derive(Debug, Clone)]
pub struct RecognitionAdapter {
    profiles: Vec<RecognitionProfile>,
    parallel: bool,
}

impl RecognitionAdapter {
    /// Creates an adapter over an ordered profile list.
    ///
    /// At least 4 distinct profiles are required.
    pub fn new(profiles: Vec<RecognitionProfile>) -> OcrResult<Self> {
        let mut distinct = profiles.clone();
        distinct.sort_by_key(|p| *p as u8);
        distinct.dedup();
        if distinct.len() < 4 {
            return Err(OcrError::config_error(format!(
                "at least 4 distinct recognition profiles are required, got {}",
                distinct.len()
            )));
        }
        Ok(Self {
            profiles,
            parallel: true,
        })
    }

    /// Toggles the profile fan-out; the selected transcript is unaffected.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// The configured profile order.
    pub fn profiles(&self) -> &[RecognitionProfile] {
        &self.profiles
    }

    /// Invokes the recognizer once per profile and returns the longest
    /// successful transcript.
    ///
    /// Profiles fan out in parallel; selection is a pure post-hoc length
    /// comparison over completed results, so the output is identical to a
    /// serial loop. Ties break toward the earlier profile in the
    /// configured order.
    pub fn transcribe(&self, recognizer: &dyn TextRecognizer, image: &GrayImage) -> Transcript {
        let run = |&profile: &RecognitionProfile| match recognizer.recognize(image, profile) {
            Ok(text) => (profile, Some(text)),
            Err(err) => {
                warn!(%profile, error = %err, "recognition profile failed");
                (profile, None)
            }
        };
        let results: Vec<(RecognitionProfile, Option<String>)> = if self.parallel {
            self.profiles.par_iter().map(run).collect()
        } else {
            self.profiles.iter().map(run).collect()
        };

        let mut best: Option<(RecognitionProfile, String)> = None;
        for (profile, text) in results {
            let Some(text) = text else { continue };
            if text.trim().is_empty() {
                continue;
            }
            let longer = best
                .as_ref()
                .map(|(_, current)| text.trim().len() > current.trim().len())
                .unwrap_or(true);
            if longer {
                best = Some((profile, text));
            }
        }

        match best {
            Some((profile, text)) => {
                debug!(%profile, chars = text.len(), "selected transcript");
                Transcript {
                    text,
                    profile: Some(profile),
                }
            }
            None => {
                debug!("no profile yielded usable text");
                Transcript::empty()
            }
        }
    }
}

impl Default for RecognitionAdapter {
    fn default() -> Self {
        Self {
            profiles: RecognitionProfile::all(),
            parallel: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Mock recognizer returning a fixed text per profile.
    struct MockRecognizer {
        outputs: Vec<(RecognitionProfile, OcrResult<String>)>,
    }

    impl TextRecognizer for MockRecognizer {
        fn recognize(&self, _image: &GrayImage, profile: RecognitionProfile) -> OcrResult<String> {
            for (p, result) in &self.outputs {
                if *p == profile {
                    return match result {
                        Ok(text) => Ok(text.clone()),
                        Err(_) => Err(OcrError::invalid_input("mock failure")),
                    };
                }
            }
            Ok(String::new())
        }
    }

    fn image() -> GrayImage {
        GrayImage::new(8, 8)
    }

    #[test]
    fn longest_transcript_wins() {
        let recognizer = MockRecognizer {
            outputs: vec![
                (RecognitionProfile::UniformBlock, Ok("short".to_string())),
                (
                    RecognitionProfile::SparseText,
                    Ok("a much longer transcript".to_string()),
                ),
            ],
        };
        let adapter = RecognitionAdapter::default();
        let transcript = adapter.transcribe(&recognizer, &image());
        assert_eq!(transcript.text, "a much longer transcript");
        assert_eq!(transcript.profile, Some(RecognitionProfile::SparseText));
    }

    #[test]
    fn failures_and_whitespace_results_are_skipped() {
        let recognizer = MockRecognizer {
            outputs: vec![
                (
                    RecognitionProfile::UniformBlock,
                    Err(OcrError::invalid_input("boom")),
                ),
                (RecognitionProfile::SingleWord, Ok("   \n  ".to_string())),
                (RecognitionProfile::RawLine, Ok("TOTAL 7.00".to_string())),
            ],
        };
        let adapter = RecognitionAdapter::default();
        let transcript = adapter.transcribe(&recognizer, &image());
        assert_eq!(transcript.text, "TOTAL 7.00");
        assert_eq!(transcript.profile, Some(RecognitionProfile::RawLine));
    }

    #[test]
    fn all_profiles_failing_yields_empty_transcript() {
        let recognizer = MockRecognizer {
            outputs: vec![
                (
                    RecognitionProfile::UniformBlock,
                    Err(OcrError::invalid_input("boom")),
                ),
                (
                    RecognitionProfile::SingleWord,
                    Err(OcrError::invalid_input("boom")),
                ),
                (
                    RecognitionProfile::SparseText,
                    Err(OcrError::invalid_input("boom")),
                ),
                (
                    RecognitionProfile::RawLine,
                    Err(OcrError::invalid_input("boom")),
                ),
            ],
        };
        let adapter = RecognitionAdapter::default();
        let transcript = adapter.transcribe(&recognizer, &image());
        assert!(transcript.is_empty());
        assert_eq!(transcript.profile, None);
    }

    #[test]
    fn fewer_than_four_distinct_profiles_is_rejected() {
        let result = RecognitionAdapter::new(vec![
            RecognitionProfile::UniformBlock,
            RecognitionProfile::UniformBlock,
            RecognitionProfile::RawLine,
            RecognitionProfile::RawLine,
        ]);
        assert!(matches!(result, Err(OcrError::ConfigError { .. })));
    }

    #[test]
    fn serial_fan_out_selects_the_same_transcript() {
        let recognizer = MockRecognizer {
            outputs: vec![
                (RecognitionProfile::UniformBlock, Ok("short".to_string())),
                (
                    RecognitionProfile::SparseText,
                    Ok("a much longer transcript".to_string()),
                ),
            ],
        };
        let adapter = RecognitionAdapter::default().with_parallel(false);
        let transcript = adapter.transcribe(&recognizer, &image());
        assert_eq!(transcript.text, "a much longer transcript");
    }

    #[test]
    fn equal_length_ties_break_toward_earlier_profile() {
        let recognizer = MockRecognizer {
            outputs: vec![
                (RecognitionProfile::UniformBlock, Ok("abcde".to_string())),
                (RecognitionProfile::SparseText, Ok("fghij".to_string())),
            ],
        };
        let adapter = RecognitionAdapter::default();
        let transcript = adapter.transcribe(&recognizer, &image());
        assert_eq!(transcript.profile, Some(RecognitionProfile::UniformBlock));
    }
}
