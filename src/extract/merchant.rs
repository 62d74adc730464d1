//! Merchant name and address extraction.

use super::patterns::{BUSINESS_PATTERNS, CITY_STATE_ZIP, PHONE_LINE, STREET_ADDRESS};

/// How many leading lines are considered merchant-name candidates.
const HEADER_LINES: usize = 5;

/// Picks the merchant name from the receipt header.
///
/// Only the first few lines are scanned, skipping any line that looks like a
/// phone number or a street address. A business-pattern hit wins outright; a
/// mostly-alphabetic line is kept as a fallback that a later pattern hit in
/// the header window can still replace.
pub fn extract_merchant_name(lines: &[&str]) -> Option<String> {
    let mut fallback: Option<String> = None;
    for line in lines.iter().take(HEADER_LINES) {
        let line = line.trim();
        if line.is_empty() || PHONE_LINE.is_match(line) || STREET_ADDRESS.is_match(line) {
            continue;
        }
        if BUSINESS_PATTERNS.iter().any(|p| p.is_match(line)) {
            return Some(line.to_string());
        }
        if fallback.is_none() && line.len() > 3 && alphabetic_ratio(line) > 0.7 {
            fallback = Some(line.to_string());
        }
    }
    fallback
}

/// Collects every address-looking line into a single space-joined string.
pub fn extract_address(lines: &[&str]) -> Option<String> {
    let parts: Vec<&str> = lines
        .iter()
        .map(|line| line.trim())
        .filter(|line| STREET_ADDRESS.is_match(line) || CITY_STATE_ZIP.is_match(line))
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" "))
    }
}

fn alphabetic_ratio(line: &str) -> f64 {
    let total = line.chars().count();
    if total == 0 {
        return 0.0;
    }
    let alpha = line.chars().filter(|c| c.is_alphabetic()).count();
    alpha as f64 / total as f64
}
