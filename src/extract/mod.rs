//! Structured field extraction from recognized receipt text.
//!
//! The transcript is split into trimmed, non-empty lines once, and each
//! sub-extractor scans that line view with its own pattern tables. All
//! extraction is regex-driven and deterministic; see [`patterns`] for the
//! shared tables.

mod contact;
mod datetime;
mod financial;
mod items;
mod merchant;
pub(crate) mod patterns;

pub use financial::parse_last_amount;
pub use patterns::business_pattern_hits;

use tracing::debug;

use crate::domain::CandidateRecord;

use self::contact::extract_phone;
use self::datetime::{extract_date, extract_time};
use self::financial::{detect_currency, extract_financials};
use self::items::extract_items;
use self::merchant::{extract_address, extract_merchant_name};

/// Runs every field extractor over a transcript and assembles the result.
///
/// An empty or whitespace-only transcript yields an empty record carrying
/// the original text.
pub fn extract(raw_text: &str) -> CandidateRecord {
    let lines: Vec<&str> = raw_text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();
    if lines.is_empty() {
        return CandidateRecord::from_raw_text(raw_text.to_string());
    }

    let mut record = CandidateRecord::from_raw_text(raw_text.to_string());
    record.merchant_name = extract_merchant_name(&lines);
    record.merchant_address = extract_address(&lines);
    record.merchant_phone = extract_phone(&lines);
    record.transaction_date = extract_date(&lines);
    record.transaction_time = extract_time(&lines);

    let financials = extract_financials(&lines);
    record.subtotal = financials.subtotal;
    record.tax_amount = financials.tax_amount;
    record.total_amount = financials.total_amount;
    record.currency = detect_currency(raw_text);
    record.items = extract_items(&lines);

    debug!(
        merchant = record.merchant_name.as_deref().unwrap_or("-"),
        items = record.items.len(),
        total = ?record.total_amount,
        "extracted candidate record"
    );
    record
}
