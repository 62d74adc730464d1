//! Merging per-page records into one document-level record.

use crate::domain::{CandidateRecord, PageBreakdown};

/// Fuses page records, in page order, into a single record.
///
/// Identity fields (merchant name, address, phone, date, time) and the tax
/// amount keep the first non-null value. Subtotal and total keep the
/// largest non-null value, since a later page of the same document can only
/// restate or extend the bill. The first non-USD currency wins over the
/// default. Items and notes are concatenated; transcripts are joined with a
/// blank line.
pub fn fuse(records: Vec<CandidateRecord>) -> CandidateRecord {
    let mut fused = CandidateRecord::default();
    let mut transcripts = Vec::with_capacity(records.len());
    for record in records {
        if fused.merchant_name.is_none() {
            fused.merchant_name = record.merchant_name;
        }
        if fused.merchant_address.is_none() {
            fused.merchant_address = record.merchant_address;
        }
        if fused.merchant_phone.is_none() {
            fused.merchant_phone = record.merchant_phone;
        }
        if fused.transaction_date.is_none() {
            fused.transaction_date = record.transaction_date;
        }
        if fused.transaction_time.is_none() {
            fused.transaction_time = record.transaction_time;
        }
        if fused.tax_amount.is_none() {
            fused.tax_amount = record.tax_amount;
        }
        fused.subtotal = max_amount(fused.subtotal, record.subtotal);
        fused.total_amount = max_amount(fused.total_amount, record.total_amount);
        if fused.currency == "USD" && record.currency != "USD" {
            fused.currency = record.currency;
        }
        fused.items.extend(record.items);
        fused.notes.extend(record.notes);
        transcripts.push(record.raw_text);
    }
    fused.raw_text = transcripts.join("\n\n");
    fused
}

/// Mean page confidence, ignoring pages that were never scored.
pub fn overall_from_pages(pages: &[PageBreakdown]) -> f64 {
    let scored: Vec<f64> = pages
        .iter()
        .filter(|page| !page.scores.is_empty())
        .map(|page| page.overall)
        .collect();
    if scored.is_empty() {
        0.0
    } else {
        scored.iter().sum::<f64>() / scored.len() as f64
    }
}

fn max_amount(current: Option<f64>, candidate: Option<f64>) -> Option<f64> {
    match (current, candidate) {
        (Some(a), Some(b)) => Some(a.max(b)),
        (Some(a), None) => Some(a),
        (None, b) => b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FieldConfidence, LineItem, field};

    fn record_with_total(total: Option<f64>) -> CandidateRecord {
        CandidateRecord {
            total_amount: total,
            ..CandidateRecord::default()
        }
    }

    #[test]
    fn largest_total_wins_across_pages() {
        let records = vec![
            record_with_total(None),
            record_with_total(Some(8.00)),
            record_with_total(Some(12.39)),
        ];
        assert_eq!(fuse(records).total_amount, Some(12.39));
    }

    #[test]
    fn first_tax_wins_across_pages() {
        let mut a = CandidateRecord::default();
        a.tax_amount = Some(0.50);
        let mut b = CandidateRecord::default();
        b.tax_amount = Some(0.60);
        let records = vec![CandidateRecord::default(), a, b];
        assert_eq!(fuse(records).tax_amount, Some(0.50));
    }

    #[test]
    fn first_merchant_identity_wins() {
        let mut a = CandidateRecord::default();
        a.merchant_name = Some("CORNER CAFE".to_string());
        let mut b = CandidateRecord::default();
        b.merchant_name = Some("OTHER SHOP".to_string());
        let fused = fuse(vec![a, b]);
        assert_eq!(fused.merchant_name.as_deref(), Some("CORNER CAFE"));
    }

    #[test]
    fn non_usd_currency_overrides_the_default() {
        let mut a = CandidateRecord::default();
        let mut b = CandidateRecord::default();
        b.currency = "EUR".to_string();
        let mut c = CandidateRecord::default();
        c.currency = "GBP".to_string();
        a.currency = "USD".to_string();
        assert_eq!(fuse(vec![a, b, c]).currency, "EUR");
    }

    #[test]
    fn items_and_transcripts_concatenate_in_page_order() {
        let mut a = CandidateRecord::from_raw_text("PAGE ONE");
        a.items.push(LineItem::single("MILK", 3.99));
        let mut b = CandidateRecord::from_raw_text("PAGE TWO");
        b.items.push(LineItem::single("BREAD", 2.49));
        let fused = fuse(vec![a, b]);
        assert_eq!(fused.items.len(), 2);
        assert_eq!(fused.raw_text, "PAGE ONE\n\nPAGE TWO");
    }

    #[test]
    fn unscored_pages_are_excluded_from_the_mean() {
        let scored = |overall: f64| {
            let mut scores = FieldConfidence::new();
            scores.set(field::TEXT_QUALITY, 0.5);
            PageBreakdown {
                page_index: 0,
                image_quality: None,
                scores,
                overall,
            }
        };
        let unscored = PageBreakdown {
            page_index: 1,
            image_quality: None,
            scores: FieldConfidence::new(),
            overall: 0.0,
        };
        let pages = vec![scored(0.8), unscored, scored(0.4)];
        assert!((overall_from_pages(&pages) - 0.6).abs() < 1e-9);
        assert_eq!(overall_from_pages(&[]), 0.0);
    }
}
