//! Merchant phone extraction.

use super::patterns::PHONE_PATTERNS;

/// Finds the merchant phone number.
///
/// Each line is tried against the phone patterns in order; the first match
/// whose digits strip down to exactly ten is normalized to "(AAA) PPP-NNNN"
/// and stops the search.
pub fn extract_phone(lines: &[&str]) -> Option<String> {
    for line in lines {
        for pattern in PHONE_PATTERNS.iter() {
            if let Some(m) = pattern.find(line) {
                let digits: String = m.as_str().chars().filter(char::is_ascii_digit).collect();
                if digits.len() == 10 {
                    return Some(format!(
                        "({}) {}-{}",
                        &digits[..3],
                        &digits[3..6],
                        &digits[6..]
                    ));
                }
            }
        }
    }
    None
}
