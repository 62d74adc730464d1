//! Line item extraction.

use crate::domain::LineItem;

use super::patterns::{ITEM_PLAIN, ITEM_WITH_QUANTITY, PAYMENT_KEYWORDS, PURELY_NUMERIC};

/// Collects purchasable line items, skipping summary and payment lines.
///
/// The explicit-quantity form is preferred; at most one item is appended
/// per line. Duplicates are kept as-is. Names shorter than three characters
/// or made of digits only are rejected.
pub fn extract_items(lines: &[&str]) -> Vec<LineItem> {
    let mut items = Vec::new();
    for line in lines {
        let line = line.trim();
        if line.is_empty() || PAYMENT_KEYWORDS.is_match(line) {
            continue;
        }
        if let Some(caps) = ITEM_WITH_QUANTITY.captures(line) {
            let quantity: u32 = match caps[1].parse() {
                Ok(q) => q,
                Err(_) => continue,
            };
            if let Some(item) = build_item(&caps[2], &caps[3], quantity) {
                items.push(item);
                continue;
            }
        }
        if let Some(caps) = ITEM_PLAIN.captures(line) {
            if let Some(item) = build_item(&caps[1], &caps[2], 1) {
                items.push(item);
            }
        }
    }
    items
}

fn build_item(name: &str, price: &str, quantity: u32) -> Option<LineItem> {
    let name = name.trim();
    if name.len() < 3 || PURELY_NUMERIC.is_match(name) {
        return None;
    }
    let price: f64 = price.parse().ok()?;
    Some(LineItem::new(name.to_string(), price, quantity))
}
