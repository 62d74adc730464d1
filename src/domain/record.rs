//! Structured extraction results for a single page.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single purchased item parsed from a receipt line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// Item name. Never empty and never purely numeric.
    pub name: String,
    /// Item price. Non-negative.
    pub price: f64,
    /// Purchased quantity. At least 1; defaults to 1 when the line carries
    /// no explicit quantity.
    #[serde(default = "LineItem::default_quantity")]
    pub quantity: u32,
}

impl LineItem {
    /// Creates a line item with an explicit quantity.
    pub fn new(name: impl Into<String>, price: f64, quantity: u32) -> Self {
        Self {
            name: name.into(),
            price,
            quantity: quantity.max(1),
        }
    }

    /// Creates a line item with the default quantity of 1.
    pub fn single(name: impl Into<String>, price: f64) -> Self {
        Self::new(name, price, 1)
    }

    fn default_quantity() -> u32 {
        1
    }
}

/// Structured, partially-populated extraction result for one page.
///
/// Optional fields are never fabricated: an unparsed field stays `None`
/// rather than becoming an empty string or zero. The sole hard default is
/// `currency`, which is always set and falls back to `"USD"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateRecord {
    /// Merchant name, usually from the top of the receipt.
    pub merchant_name: Option<String>,
    /// Merchant street address, concatenated in transcript order.
    pub merchant_address: Option<String>,
    /// Merchant phone number formatted as `(AAA) PPP-NNNN`.
    pub merchant_phone: Option<String>,
    /// Transaction date.
    pub transaction_date: Option<NaiveDate>,
    /// Transaction time as it appeared in the transcript (e.g. "14:30").
    pub transaction_time: Option<String>,
    /// Pre-tax subtotal.
    pub subtotal: Option<f64>,
    /// Tax amount.
    pub tax_amount: Option<f64>,
    /// Final total.
    pub total_amount: Option<f64>,
    /// ISO 4217 currency code. Always set; defaults to "USD".
    pub currency: String,
    /// Parsed line items in transcript order, duplicates preserved.
    pub items: Vec<LineItem>,
    /// The raw transcript the record was extracted from.
    pub raw_text: String,
    /// Human-readable diagnostics accumulated during processing.
    pub notes: Vec<String>,
}

impl CandidateRecord {
    /// Creates an empty record carrying only the raw transcript.
    pub fn from_raw_text(raw_text: impl Into<String>) -> Self {
        Self {
            raw_text: raw_text.into(),
            ..Self::default()
        }
    }

    /// Creates a fully empty record with a single diagnostic note.
    ///
    /// Used when no text could be recovered from a page: every field is
    /// unset, items is empty and the note explains why.
    pub fn empty_with_note(note: impl Into<String>) -> Self {
        Self {
            notes: vec![note.into()],
            ..Self::default()
        }
    }

    /// Returns true if no field was extracted and no items were found.
    pub fn is_empty(&self) -> bool {
        self.merchant_name.is_none()
            && self.merchant_address.is_none()
            && self.merchant_phone.is_none()
            && self.transaction_date.is_none()
            && self.transaction_time.is_none()
            && self.subtotal.is_none()
            && self.tax_amount.is_none()
            && self.total_amount.is_none()
            && self.items.is_empty()
    }
}

impl Default for CandidateRecord {
    fn default() -> Self {
        Self {
            merchant_name: None,
            merchant_address: None,
            merchant_phone: None,
            transaction_date: None,
            transaction_time: None,
            subtotal: None,
            tax_amount: None,
            total_amount: None,
            currency: "USD".to_string(),
            items: Vec::new(),
            raw_text: String::new(),
            notes: Vec::new(),
        }
    }
}
