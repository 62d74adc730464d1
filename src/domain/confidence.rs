//! Per-field confidence reporting.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Canonical field names used as confidence-map keys.
pub mod field {
    /// Merchant name.
    pub const MERCHANT_NAME: &str = "merchant_name";
    /// Merchant phone number.
    pub const MERCHANT_PHONE: &str = "merchant_phone";
    /// Transaction date.
    pub const TRANSACTION_DATE: &str = "transaction_date";
    /// Pre-tax subtotal.
    pub const SUBTOTAL: &str = "subtotal";
    /// Tax amount.
    pub const TAX_AMOUNT: &str = "tax_amount";
    /// Final total.
    pub const TOTAL_AMOUNT: &str = "total_amount";
    /// Parsed line items.
    pub const ITEMS: &str = "items";
    /// Transcript quality.
    pub const TEXT_QUALITY: &str = "text_quality";
}

/// Mapping from field name to a confidence value in `[0, 1]`.
///
/// An absent key means the field was never evaluated (e.g. the page had no
/// transcript), which is distinct from a present value of 0 for a field
/// that was looked for but not found.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldConfidence {
    scores: BTreeMap<String, f64>,
}

impl FieldConfidence {
    /// Creates an empty confidence map (no fields evaluated).
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a confidence value for a field, clamped to `[0, 1]`.
    pub fn set(&mut self, field: &str, score: f64) {
        self.scores.insert(field.to_string(), score.clamp(0.0, 1.0));
    }

    /// Returns the confidence for a field, or `None` if it was not evaluated.
    pub fn get(&self, field: &str) -> Option<f64> {
        self.scores.get(field).copied()
    }

    /// Returns true if no field was evaluated.
    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Number of evaluated fields.
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    /// Iterates over `(field, score)` pairs in field-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.scores.iter().map(|(k, v)| (k.as_str(), *v))
    }
}
