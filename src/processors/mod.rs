//! Image processing stages that prepare a page bitmap for recognition.
//!
//! The stages run in a fixed order: contrast enhancement, denoising,
//! binarization, morphological cleanup (see [`ImageNormalizer`]), followed
//! by skew correction ([`deskew`]) invoked by the pipeline.

pub mod deskew;
pub mod filters;
pub mod normalize;
pub mod quality;

pub use deskew::{deskew, detect_skew_angle};
pub use normalize::{ImageNormalizer, NormalizedPage};
pub use quality::quality_score;
