//! Per-field confidence scoring and overall aggregation.
//!
//! Scores are deterministic functions of the extracted record and its
//! transcript, all clamped to `[0.0, 1.0]`. The overall score is a weighted
//! mean over the handful of fields that carry weights; subtotal and tax are
//! scored for reporting but do not influence the overall value.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;

use crate::domain::confidence::{field, FieldConfidence};
use crate::domain::CandidateRecord;
use crate::extract::business_pattern_hits;

/// Amounts outside this range are suspicious but not rejected.
const PLAUSIBLE_AMOUNT: std::ops::RangeInclusive<f64> = 0.01..=10_000.0;

static OVERALL_WEIGHTS: Lazy<BTreeMap<&'static str, f64>> = Lazy::new(|| {
    BTreeMap::from([
        (field::MERCHANT_NAME, 0.20),
        (field::TOTAL_AMOUNT, 0.25),
        (field::TRANSACTION_DATE, 0.15),
        (field::ITEMS, 0.20),
        (field::TEXT_QUALITY, 0.10),
        (field::MERCHANT_PHONE, 0.10),
    ])
});

/// Scores every extracted field of a record.
///
/// A blank transcript produces an empty map; otherwise all fields get an
/// entry, with zero marking an absent field.
pub fn score(record: &CandidateRecord) -> FieldConfidence {
    let mut scores = FieldConfidence::new();
    if record.raw_text.trim().is_empty() {
        return scores;
    }

    scores.set(field::MERCHANT_NAME, merchant_score(record));
    scores.set(field::MERCHANT_PHONE, phone_score(record));
    scores.set(field::TRANSACTION_DATE, date_score(record));
    scores.set(field::SUBTOTAL, amount_score(record.subtotal));
    scores.set(field::TAX_AMOUNT, amount_score(record.tax_amount));
    scores.set(field::TOTAL_AMOUNT, amount_score(record.total_amount));
    scores.set(field::ITEMS, items_score(record));
    scores.set(field::TEXT_QUALITY, text_quality_score(&record.raw_text));
    scores
}

/// Weighted mean over the fields that carry weights.
///
/// Fields present in the map but without a weight are ignored; an empty
/// map aggregates to zero.
pub fn overall_confidence(scores: &FieldConfidence) -> f64 {
    let mut weighted = 0.0;
    let mut weight_sum = 0.0;
    for (name, value) in scores.iter() {
        if let Some(weight) = OVERALL_WEIGHTS.get(name) {
            weighted += weight * value;
            weight_sum += weight;
        }
    }
    if weight_sum == 0.0 {
        0.0
    } else {
        weighted / weight_sum
    }
}

/// Base 0.5 when a name is present, plus 0.2 per business pattern group it
/// hits, capped at 0.9.
fn merchant_score(record: &CandidateRecord) -> f64 {
    match &record.merchant_name {
        Some(name) => {
            let hits = business_pattern_hits(name) as f64;
            (0.5 + 0.2 * hits).min(0.9)
        }
        None => 0.0,
    }
}

fn phone_score(record: &CandidateRecord) -> f64 {
    match &record.merchant_phone {
        Some(phone) => {
            let digits = phone.chars().filter(char::is_ascii_digit).count();
            if digits == 10 { 0.9 } else { 0.5 }
        }
        None => 0.0,
    }
}

fn date_score(record: &CandidateRecord) -> f64 {
    if record.transaction_date.is_some() { 0.8 } else { 0.0 }
}

fn amount_score(amount: Option<f64>) -> f64 {
    match amount {
        Some(value) if PLAUSIBLE_AMOUNT.contains(&value) => 0.8,
        Some(_) => 0.6,
        None => 0.0,
    }
}

/// Fraction of items with a positive price, scaled to 0.8 and capped at 0.9.
fn items_score(record: &CandidateRecord) -> f64 {
    if record.items.is_empty() {
        return 0.0;
    }
    let valid = record.items.iter().filter(|item| item.price > 0.0).count();
    let fraction = valid as f64 / record.items.len() as f64;
    (fraction * 0.8).min(0.9)
}

/// Length and character variety proxy for recognition quality.
fn text_quality_score(raw_text: &str) -> f64 {
    let trimmed = raw_text.trim();
    let total = raw_text.chars().count();
    if trimmed.is_empty() || total == 0 {
        return 0.0;
    }
    let length_score = (trimmed.chars().count() as f64 / 500.0).min(1.0) * 0.5;
    let unique: std::collections::BTreeSet<char> =
        raw_text.to_lowercase().chars().collect();
    let variety_score = (unique.len() as f64 / total as f64) * 0.4;
    (length_score + variety_score).min(0.9)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::extract;

    const RECEIPT: &str = "WALMART SUPERCENTER\n\
                           123 MAIN ST\n\
                           ANYTOWN, ST 12345\n\
                           (555) 123-4567\n\
                           01/15/2024 14:30\n\
                           MILK 3.99\n\
                           BREAD 2.49\n\
                           SUBTOTAL 6.48\n\
                           TAX 0.52\n\
                           TOTAL 7.00";

    #[test]
    fn scores_a_fully_extracted_receipt() {
        let record = extract(RECEIPT);
        let scores = score(&record);
        assert_eq!(scores.get(field::MERCHANT_NAME), Some(0.7));
        assert_eq!(scores.get(field::MERCHANT_PHONE), Some(0.9));
        assert_eq!(scores.get(field::TRANSACTION_DATE), Some(0.8));
        assert_eq!(scores.get(field::SUBTOTAL), Some(0.8));
        assert_eq!(scores.get(field::TAX_AMOUNT), Some(0.8));
        assert_eq!(scores.get(field::TOTAL_AMOUNT), Some(0.8));
        assert_eq!(scores.get(field::ITEMS), Some(0.8));
    }

    #[test]
    fn blank_transcript_scores_nothing() {
        let record = CandidateRecord::from_raw_text("   ".to_string());
        let scores = score(&record);
        assert!(scores.is_empty());
        assert_eq!(overall_confidence(&scores), 0.0);
    }

    #[test]
    fn overall_is_a_weighted_mean_over_weighted_fields() {
        let mut scores = FieldConfidence::new();
        scores.set(field::MERCHANT_NAME, 1.0);
        scores.set(field::TOTAL_AMOUNT, 0.0);
        // Unweighted field must not shift the mean.
        scores.set(field::SUBTOTAL, 1.0);
        let expected = 0.20 / (0.20 + 0.25);
        assert!((overall_confidence(&scores) - expected).abs() < 1e-9);
    }

    #[test]
    fn out_of_range_amounts_score_lower() {
        assert_eq!(amount_score(Some(50_000.0)), 0.6);
        assert_eq!(amount_score(Some(0.001)), 0.6);
        assert_eq!(amount_score(Some(5.0)), 0.8);
        assert_eq!(amount_score(None), 0.0);
    }

    #[test]
    fn malformed_phone_scores_half() {
        let mut record = extract(RECEIPT);
        record.merchant_phone = Some("(555) 123-456".to_string());
        let scores = score(&record);
        assert_eq!(scores.get(field::MERCHANT_PHONE), Some(0.5));
    }

    #[test]
    fn item_score_reflects_valid_fraction() {
        let mut record = CandidateRecord::from_raw_text("ITEMS".to_string());
        record.items = vec![
            crate::domain::LineItem::single("MILK".to_string(), 3.99),
            crate::domain::LineItem::single("VOID".to_string(), 0.0),
        ];
        let scores = score(&record);
        assert_eq!(scores.get(field::ITEMS), Some(0.4));
    }

    #[test]
    fn text_quality_is_capped() {
        let long: String = "abcdefghij".repeat(200);
        let record = CandidateRecord::from_raw_text(long);
        let scores = score(&record);
        assert!(scores.get(field::TEXT_QUALITY).unwrap() <= 0.9);
    }
}
