//! Consolidated result types for a (possibly multi-page) document.

use crate::domain::confidence::FieldConfidence;
use crate::domain::record::CandidateRecord;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Confidence breakdown for a single processed page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageBreakdown {
    /// Zero-based page index in source order.
    pub page_index: usize,
    /// Normalization quality score for the page bitmap, when the page went
    /// through image normalization (pages served from native text skip it).
    pub image_quality: Option<f32>,
    /// Per-field confidence scores for the page.
    pub scores: FieldConfidence,
    /// Weighted overall confidence for the page.
    pub overall: f64,
}

/// Final fused result for a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsolidatedRecord {
    /// The fused candidate record.
    pub record: CandidateRecord,
    /// Document-level confidence: the arithmetic mean of per-page overall
    /// confidences, excluding pages where no field was evaluated.
    pub overall_confidence: f64,
    /// Per-page confidence breakdown in page order.
    pub pages: Vec<PageBreakdown>,
}

impl ConsolidatedRecord {
    /// Number of pages that contributed an evaluated confidence map.
    pub fn scored_page_count(&self) -> usize {
        self.pages.iter().filter(|p| !p.scores.is_empty()).count()
    }
}

impl fmt::Display for ConsolidatedRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Merchant: {}",
            self.record.merchant_name.as_deref().unwrap_or("unknown")
        )?;
        match self.record.total_amount {
            Some(total) => writeln!(f, "Total: {:.2} {}", total, self.record.currency)?,
            None => writeln!(f, "Total: not detected")?,
        }
        match self.record.transaction_date {
            Some(date) => writeln!(f, "Date: {date}")?,
            None => writeln!(f, "Date: not detected")?,
        }
        writeln!(f, "Items: {}", self.record.items.len())?;
        writeln!(
            f,
            "Overall confidence: {:.3} ({} of {} pages scored)",
            self.overall_confidence,
            self.scored_page_count(),
            self.pages.len()
        )
    }
}
