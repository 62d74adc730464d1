//! Data model for the receipt processing pipeline.
//!
//! Each stage produces a new immutable value; no stage mutates an upstream
//! value. See [`CandidateRecord`] for the per-page extraction result and
//! [`ConsolidatedRecord`] for the fused, document-level result.

pub mod confidence;
pub mod record;
pub mod result;

pub use confidence::{FieldConfidence, field};
pub use record::{CandidateRecord, LineItem};
pub use result::{ConsolidatedRecord, PageBreakdown};
