//! Bucket storage, sequence-range calculation, and the ranked summary.

use std::collections::HashMap;

use crate::models::bucket::{Bucket, BucketKey, SummaryRow, UNMATCHED_TEMPLATE};

use super::rules::run_value;
use super::rules::tokens::scan_number_tokens;

/// Maximum number of sample members kept per bucket.
pub const MAX_SAMPLES: usize = 5;

/// Insertion-ordered map of buckets for one classification run.
///
/// Keys are unique by construction (one bucket per (template, group-key)
/// partition plus the reserved unmatched key); iteration order is creation
/// order, which the summary relies on for stable tie-breaking.
#[derive(Debug, Default)]
pub struct BucketStore {
    buckets: HashMap<BucketKey, Bucket>,
    order: Vec<BucketKey>,
}

impl BucketStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a bucket under `key`. First insertion wins the ordering slot.
    pub fn insert(&mut self, key: BucketKey, bucket: Bucket) {
        if !self.buckets.contains_key(&key) {
            self.order.push(key.clone());
        }
        self.buckets.insert(key, bucket);
    }

    pub fn get(&self, key: &BucketKey) -> Option<&Bucket> {
        self.buckets.get(key)
    }

    /// Look a bucket up by its rendered `"template|group"` form.
    pub fn get_rendered(&self, rendered: &str) -> Option<(&BucketKey, &Bucket)> {
        self.order
            .iter()
            .find(|key| key.to_string() == rendered)
            .map(|key| (key, &self.buckets[key]))
    }

    /// Buckets in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&BucketKey, &Bucket)> {
        self.order.iter().map(|key| (key, &self.buckets[key]))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// One row per bucket, sorted by count descending; ties keep bucket
    /// creation order. The unmatched pool reports its alphabetic range.
    pub fn summary(&self) -> Vec<SummaryRow> {
        let mut rows: Vec<SummaryRow> = self
            .iter()
            .map(|(key, bucket)| {
                let unmatched = key.template == UNMATCHED_TEMPLATE;
                SummaryRow {
                    template: key.template.clone(),
                    sample_invoice: bucket
                        .sample_invoices
                        .first()
                        .cloned()
                        .unwrap_or_default(),
                    min_value: if unmatched {
                        bucket.alpha_from_value.clone()
                    } else {
                        bucket.from_value.clone()
                    },
                    max_value: if unmatched {
                        bucket.alpha_to_value.clone()
                    } else {
                        bucket.to_value.clone()
                    },
                    count: bucket.count,
                }
            })
            .collect();

        rows.sort_by_key(|row| std::cmp::Reverse(row.count));
        rows
    }
}

/// Sequence numbers of one document number: the original substrings of every
/// digit run the tokenizer does not flag as a year, leading zeros intact.
pub fn sequence_numbers_in(number: &str) -> Vec<String> {
    scan_number_tokens(number)
        .iter()
        .filter(|token| !token.is_year_range)
        .map(|token| token.text(number).to_string())
        .collect()
}

/// Collect a group's sequence numbers across its segmented members, deduped
/// by original substring in first-seen order.
pub fn collect_sequence_numbers<S: AsRef<str>>(members: &[S]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for member in members {
        for number in sequence_numbers_in(member.as_ref()) {
            if !seen.contains(&number) {
                seen.push(number);
            }
        }
    }
    seen
}

/// Numeric min/max of `sequence_numbers`, returned as the original strings.
///
/// Leading-zero-aware: comparison uses the numeric value while the result
/// keeps the substring as it appeared; the first occurrence wins on ties.
/// `("0", "0")` when no sequence numbers were extracted.
pub fn calculate_range(sequence_numbers: &[String]) -> (String, String) {
    let Some(first) = sequence_numbers.first() else {
        return ("0".to_string(), "0".to_string());
    };

    let mut min = (run_value(first), first);
    let mut max = (run_value(first), first);

    for number in &sequence_numbers[1..] {
        let value = run_value(number);
        if value < min.0 {
            min = (value, number);
        }
        if value > max.0 {
            max = (value, number);
        }
    }

    (min.1.clone(), max.1.clone())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::models::bucket::GroupKey;
    use std::collections::BTreeSet;

    fn bucket(count: usize, sample: &str) -> Bucket {
        Bucket {
            pattern: String::new(),
            smart_pattern: String::new(),
            from_value: "0".into(),
            to_value: "0".into(),
            alpha_from_value: String::new(),
            alpha_to_value: String::new(),
            count,
            sample_invoices: vec![sample.to_string()],
            years_found: BTreeSet::new(),
            prefixes_found: BTreeSet::new(),
        }
    }

    fn key(template: &str, prefix: &str) -> BucketKey {
        BucketKey::new(
            template,
            GroupKey::Prefixed {
                prefix: prefix.to_string(),
                year: None,
            },
        )
    }

    #[test]
    fn sequence_numbers_skip_year_flagged_tokens() {
        assert_eq!(sequence_numbers_in("ABC-2024-0001"), vec!["0001"]);
        assert_eq!(sequence_numbers_in("24-0015"), vec!["0015"]);
        assert!(sequence_numbers_in("AB-2024").is_empty());
    }

    #[test]
    fn group_collection_dedupes_by_original_string() {
        let members = ["A-001", "B-001", "A-002"];
        assert_eq!(collect_sequence_numbers(&members), vec!["001", "002"]);
        // Different paddings of the same value are distinct strings.
        let members = ["A-001", "A-01"];
        assert_eq!(collect_sequence_numbers(&members), vec!["001", "01"]);
    }

    #[test]
    fn range_is_numeric_but_preserves_originals() {
        let numbers: Vec<String> = ["0050", "0001", "0002"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(
            calculate_range(&numbers),
            ("0001".to_string(), "0050".to_string())
        );
    }

    #[test]
    fn range_ties_keep_first_occurrence() {
        let numbers: Vec<String> = ["01", "001"].iter().map(|s| s.to_string()).collect();
        assert_eq!(calculate_range(&numbers), ("01".to_string(), "01".to_string()));
    }

    #[test]
    fn empty_range_is_zero_zero() {
        assert_eq!(calculate_range(&[]), ("0".to_string(), "0".to_string()));
    }

    #[test]
    fn summary_sorts_by_count_descending_stable() {
        let mut store = BucketStore::new();
        store.insert(key("t1", "A"), bucket(2, "A-1"));
        store.insert(key("t2", "B"), bucket(5, "B-1"));
        store.insert(key("t3", "C"), bucket(2, "C-1"));

        let rows = store.summary();
        let order: Vec<&str> = rows.iter().map(|r| r.template.as_str()).collect();
        assert_eq!(order, vec!["t2", "t1", "t3"]);
        assert_eq!(rows[0].sample_invoice, "B-1");
    }

    #[test]
    fn rendered_lookup_round_trips() {
        let mut store = BucketStore::new();
        store.insert(key("t1", "A"), bucket(1, "A-1"));
        let (found_key, _) = store.get_rendered("t1|A").unwrap();
        assert_eq!(found_key.to_string(), "t1|A");
        assert!(store.get_rendered("t1|Z").is_none());
    }
}
