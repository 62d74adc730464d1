//! Read-only pattern tables for field extraction.
//!
//! All tables are process-wide immutable statics, loaded once and safe for
//! unrestricted concurrent reads.

use once_cell::sync::Lazy;
use regex::Regex;

/// Business-name indicator patterns: generic nouns, known brands, and
/// legal-entity suffixes. Kept as separate groups because the confidence
/// scorer counts how many groups a merchant name hits.
pub static BUSINESS_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(
            r"(?i)(?:store|shop|market|restaurant|cafe|bar|pub|hotel|gas|station|pharmacy|bank)",
        )
        .unwrap(),
        Regex::new(
            r"(?i)(?:walmart|target|costco|amazon|starbucks|mcdonalds|subway|cvs|walgreens)",
        )
        .unwrap(),
        Regex::new(r"(?i)(?:inc|llc|corp|ltd|co\.|company|enterprises|group)").unwrap(),
    ]
});

/// Street-address lines, e.g. "123 MAIN ST".
pub static STREET_ADDRESS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\d+\s+\w+\s+(?:st|street|ave|avenue|rd|road|blvd|boulevard|ln|lane|dr|drive|way|ct|court|pl|place)\b",
    )
    .unwrap()
});

/// "City, ST ZIP" lines, e.g. "ANYTOWN, ST 12345".
pub static CITY_STATE_ZIP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\w+,\s*[A-Z]{2}\s+\d{5}").unwrap());

/// A phone number embedded in a line, used to skip non-merchant lines.
pub static PHONE_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d{3}[-.\s]?\d{3}[-.\s]?\d{4}").unwrap());

/// Total-line keywords. "total" must not fire inside "subtotal" or
/// "sub-total", hence the leading character guard.
pub static TOTAL_KEYWORDS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:grand\s+total|final\s+total|amount\s+due|balance\s+due|(?:^|[^-\w])total\b)")
        .unwrap()
});

/// Subtotal-line keywords.
pub static SUBTOTAL_KEYWORDS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:sub[\s-]?total|subtotal|amount)\b").unwrap());

/// Tax-line keywords.
pub static TAX_KEYWORDS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:sales\s+tax|state\s+tax|tax|vat|gst|hst)\b").unwrap());

/// Summary/payment keywords that disqualify a line as an item line.
pub static PAYMENT_KEYWORDS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(?:total|subtotal|tax|change|cash|card)").unwrap());

/// A numeric amount token, with optional grouping or decimal separators.
pub static AMOUNT_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+(?:[.,]\d+)*").unwrap());

/// Currency markers in fixed detection priority.
pub static CURRENCY_MARKERS: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    vec![
        ("USD", Regex::new(r"(?i)(?:\$|USD|US\$|DOLLAR)").unwrap()),
        ("EUR", Regex::new(r"(?i)(?:€|EUR|EURO)").unwrap()),
        ("GBP", Regex::new(r"(?i)(?:£|GBP|POUND)").unwrap()),
        ("CAD", Regex::new(r"(?i)(?:CAD|C\$)").unwrap()),
    ]
});

/// Numeric date, day/month first: "01/15/2024", "15-01-24".
pub static DATE_NUMERIC_DMY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\d{1,2}[-/]\d{1,2}[-/]\d{2,4}\b").unwrap());

/// Numeric date, year first: "2024-01-15".
pub static DATE_NUMERIC_YMD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\d{2,4}[-/]\d{1,2}[-/]\d{1,2}\b").unwrap());

/// Textual month first: "January 15, 2024".
pub static DATE_TEXT_MDY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([A-Za-z]{3,9})\s+(\d{1,2}),?\s+(\d{2,4})").unwrap());

/// Day first with textual month: "15 January 2024".
pub static DATE_TEXT_DMY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{1,2})\s+([A-Za-z]{3,9})\s+(\d{2,4})").unwrap());

/// Time of day: "14:30", "2:30:05 PM".
pub static TIME_OF_DAY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d{1,2}:\d{2}(?::\d{2})?(?:\s*[AaPp][Mm])?").unwrap());

/// Phone candidates tried in order per line.
pub static PHONE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"\d{3}[-.\s]?\d{3}[-.\s]?\d{4}").unwrap(),
        Regex::new(r"\(\d{3}\)\s*\d{3}[-.\s]?\d{4}").unwrap(),
        Regex::new(r"\d{10}").unwrap(),
    ]
});

/// "qty x name price" item line, quantity explicit.
pub static ITEM_WITH_QUANTITY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+)\s*[xX]?\s*(.+?)\s+[\$€£]?\s*(\d+\.\d{2})$").unwrap());

/// "name price" item line.
pub static ITEM_PLAIN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(.+?)\s+[\$€£]?\s*(\d+\.\d{2})$").unwrap());

/// Purely numeric token, used to reject non-names.
pub static PURELY_NUMERIC: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+$").unwrap());

/// Counts how many business pattern groups a merchant name hits.
pub fn business_pattern_hits(name: &str) -> usize {
    BUSINESS_PATTERNS.iter().filter(|p| p.is_match(name)).count()
}
