//! Monetary field extraction: subtotal, tax, total, and currency.

use super::patterns::{
    AMOUNT_TOKEN, CURRENCY_MARKERS, SUBTOTAL_KEYWORDS, TAX_KEYWORDS, TOTAL_KEYWORDS,
};

/// Amounts recognised on summary lines.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct FinancialFields {
    pub subtotal: Option<f64>,
    pub tax_amount: Option<f64>,
    pub total_amount: Option<f64>,
}

/// Classifies each line by keyword and records its trailing amount.
///
/// Categories are tried in a fixed order per line (total, then subtotal,
/// then tax) and the first hit wins. When a category appears on multiple
/// lines the last amount seen replaces the earlier one.
pub fn extract_financials(lines: &[&str]) -> FinancialFields {
    let mut fields = FinancialFields::default();
    for line in lines {
        let amount = match parse_last_amount(line) {
            Some(amount) => amount,
            None => continue,
        };
        if TOTAL_KEYWORDS.is_match(line) {
            fields.total_amount = Some(amount);
        } else if SUBTOTAL_KEYWORDS.is_match(line) {
            fields.subtotal = Some(amount);
        } else if TAX_KEYWORDS.is_match(line) {
            fields.tax_amount = Some(amount);
        }
    }
    fields
}

/// Detects the currency from marker priority; defaults to USD.
pub fn detect_currency(text: &str) -> String {
    for (code, marker) in CURRENCY_MARKERS.iter() {
        if marker.is_match(text) {
            return (*code).to_string();
        }
    }
    "USD".to_string()
}

/// Parses the last numeric token on a line as an amount.
///
/// Thousands separators are stripped; a comma acts as the decimal point
/// only when no period is present.
pub fn parse_last_amount(line: &str) -> Option<f64> {
    let token = AMOUNT_TOKEN.find_iter(line).last()?.as_str();
    let normalized = if token.contains('.') {
        token.replace(',', "")
    } else {
        token.replace(',', ".")
    };
    normalized.parse::<f64>().ok()
}
