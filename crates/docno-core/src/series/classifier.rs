//! End-to-end classification pipeline.
//!
//! Flow per run: clean -> match against the template catalog -> group by
//! (template, group key) -> infer confirmed years per group -> segment
//! concatenated runs -> extract sequence ranges -> store buckets. All state
//! is scoped to the returned [`Classification`], so classifying the same
//! input twice yields structurally identical results.

use std::collections::{BTreeSet, HashMap};

use tracing::{debug, info};

use crate::models::bucket::{Bucket, BucketKey, GroupKey, ValidationReport, NOPFX};
use crate::models::template::TemplateCatalog;

use super::group_key::resolve_group_key;
use super::matcher::{CompiledTemplate, PatternMatcher};
use super::rules::patterns::SMART_PREFIX;
use super::rules::run_value;
use super::rules::segment::split_concatenated_numbers;
use super::rules::smart::build_smart_pattern;
use super::rules::tokens::scan_number_tokens;
use super::rules::years::infer_confirmed_years;
use super::store::{
    calculate_range, collect_sequence_numbers, sequence_numbers_in, BucketStore, MAX_SAMPLES,
};

/// Classifies document-number streams into pattern buckets.
///
/// Holds only the compiled catalog; every run's mutable state lives in the
/// [`Classification`] it returns.
pub struct SeriesClassifier {
    matcher: PatternMatcher,
}

/// The complete result of one classification run.
pub struct Classification {
    store: BucketStore,
}

impl SeriesClassifier {
    /// Create a classifier over the builtin template catalog.
    pub fn new() -> Self {
        Self::with_catalog(&TemplateCatalog::builtin())
    }

    /// Create a classifier over a custom catalog.
    pub fn with_catalog(catalog: &TemplateCatalog) -> Self {
        Self {
            matcher: PatternMatcher::from_catalog(catalog),
        }
    }

    /// The compiled templates in matching order.
    pub fn matcher(&self) -> &PatternMatcher {
        &self.matcher
    }

    /// Classify a batch of raw document numbers.
    ///
    /// Entries are trimmed first; empty and literal `"NAN"` entries are
    /// dropped. Every surviving entry lands in exactly one bucket,
    /// including the reserved `unmatched|NOPFX` pool.
    pub fn classify<S: AsRef<str>>(&self, rows: &[S]) -> Classification {
        let entries = preprocess(rows);
        let mut store = BucketStore::new();

        if entries.is_empty() {
            return Classification { store };
        }

        info!("classifying {} document numbers", entries.len());

        let mut template_groups: Vec<Vec<(String, String)>> =
            (0..self.matcher.templates().len()).map(|_| Vec::new()).collect();
        let mut unmatched: Vec<String> = Vec::new();

        for (original, clean) in entries {
            match self.matcher.first_match_index(&clean) {
                Some(idx) => template_groups[idx].push((original, clean)),
                None => unmatched.push(original),
            }
        }

        for (idx, members) in template_groups.into_iter().enumerate() {
            if members.is_empty() {
                continue;
            }
            let compiled = &self.matcher.templates()[idx];
            debug!(
                "template '{}' matched {} numbers",
                compiled.template.name,
                members.len()
            );

            for (group, numbers) in split_into_groups(compiled, members) {
                let bucket = build_group_bucket(compiled, &group, &numbers);
                store.insert(
                    BucketKey::new(compiled.template.name.clone(), group),
                    bucket,
                );
            }
        }

        if !unmatched.is_empty() {
            debug!("{} numbers matched no template", unmatched.len());
            store.insert(BucketKey::unmatched(), build_unmatched_bucket(&unmatched));
        }

        info!("classification produced {} buckets", store.len());
        Classification { store }
    }

    /// Name of the first template matching `number`, if any.
    pub fn identify(&self, number: &str) -> Option<&str> {
        let clean = number.trim().to_uppercase();
        self.matcher
            .first_match(&clean)
            .map(|t| t.template.name.as_str())
    }

    /// Full bucket key `number` would classify under, for ad-hoc lookups.
    pub fn bucket_key_for(&self, number: &str) -> Option<BucketKey> {
        let clean = number.trim().to_uppercase();
        let (compiled, caps) = self.matcher.first_captures(&clean)?;
        Some(BucketKey::new(
            compiled.template.name.clone(),
            resolve_group_key(&caps, &compiled.template),
        ))
    }

    /// Check `number` against the ranges established by `classification`.
    ///
    /// Never fails: every outcome, including "no template matched", is an
    /// ordinary report.
    pub fn validate(&self, classification: &Classification, number: &str) -> ValidationReport {
        let clean = number.trim().to_uppercase();

        let Some((compiled, caps)) = self.matcher.first_captures(&clean) else {
            return ValidationReport {
                is_valid: false,
                template: None,
                message: "No matching template found".to_string(),
            };
        };
        let template = compiled.template.name.clone();

        let key = BucketKey::new(
            template.clone(),
            resolve_group_key(&caps, &compiled.template),
        );
        let Some(bucket) = classification.get(&key) else {
            return ValidationReport {
                is_valid: true,
                template: Some(template),
                message: "Template matched but no range data available".to_string(),
            };
        };

        let sequence_numbers = sequence_numbers_in(&clean);
        let Some(sequence) = sequence_numbers.first() else {
            return ValidationReport {
                is_valid: true,
                template: Some(template),
                message: "Template matched but no sequence number found".to_string(),
            };
        };

        let value = run_value(sequence);
        let from = run_value(&bucket.from_value);
        let to = run_value(&bucket.to_value);

        if value >= from && value <= to {
            ValidationReport {
                is_valid: true,
                template: Some(template),
                message: format!(
                    "Valid - sequence {} within range [{}-{}]",
                    sequence, bucket.from_value, bucket.to_value
                ),
            }
        } else {
            ValidationReport {
                is_valid: false,
                template: Some(template),
                message: format!(
                    "Invalid - sequence {} outside range [{}-{}]",
                    sequence, bucket.from_value, bucket.to_value
                ),
            }
        }
    }
}

impl Default for SeriesClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Classification {
    /// Buckets in creation order.
    pub fn buckets(&self) -> impl Iterator<Item = (&BucketKey, &Bucket)> {
        self.store.iter()
    }

    pub fn get(&self, key: &BucketKey) -> Option<&Bucket> {
        self.store.get(key)
    }

    /// Look a bucket up by its rendered `"template|group"` key.
    pub fn get_rendered(&self, rendered: &str) -> Option<(&BucketKey, &Bucket)> {
        self.store.get_rendered(rendered)
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Total members across all buckets.
    pub fn total_count(&self) -> usize {
        self.store.iter().map(|(_, b)| b.count).sum()
    }

    /// Ranked summary rows (count descending, stable).
    pub fn summary(&self) -> Vec<crate::models::bucket::SummaryRow> {
        self.store.summary()
    }
}

/// Trim entries and drop blanks and literal `"NAN"` placeholders, keeping
/// the original text alongside the cleaned form used for matching.
fn preprocess<S: AsRef<str>>(rows: &[S]) -> Vec<(String, String)> {
    rows.iter()
        .filter_map(|row| {
            let original = row.as_ref();
            let clean = original.trim();
            if clean.is_empty() || clean == "NAN" {
                None
            } else {
                Some((original.to_string(), clean.to_string()))
            }
        })
        .collect()
}

/// Split one template's members into per-group-key partitions, preserving
/// first-seen group order.
fn split_into_groups(
    compiled: &CompiledTemplate,
    members: Vec<(String, String)>,
) -> Vec<(GroupKey, Vec<String>)> {
    let mut order: Vec<GroupKey> = Vec::new();
    let mut groups: HashMap<GroupKey, Vec<String>> = HashMap::new();

    for (original, clean) in members {
        let Some(caps) = compiled.regex.captures(&clean) else {
            continue;
        };
        let key = resolve_group_key(&caps, &compiled.template);
        if !groups.contains_key(&key) {
            order.push(key.clone());
        }
        groups.entry(key).or_default().push(original);
    }

    order
        .into_iter()
        .map(|key| {
            let numbers = groups.remove(&key).unwrap_or_default();
            (key, numbers)
        })
        .collect()
}

fn build_group_bucket(
    compiled: &CompiledTemplate,
    group: &GroupKey,
    numbers: &[String],
) -> Bucket {
    let years = infer_confirmed_years(numbers);
    let processed: Vec<String> = numbers
        .iter()
        .map(|number| split_concatenated_numbers(number, &years))
        .collect();

    let sequence_numbers = collect_sequence_numbers(&processed);
    let (from_value, to_value) = calculate_range(&sequence_numbers);

    let smart_pattern = processed
        .first()
        .map(|first| build_smart_pattern(first, &scan_number_tokens(first)))
        .unwrap_or_default();

    let mut prefixes_found = BTreeSet::new();
    let rendered = group.to_string();
    if rendered != NOPFX {
        prefixes_found.insert(rendered);
    }

    Bucket {
        pattern: compiled.template.pattern.clone(),
        smart_pattern,
        from_value,
        to_value,
        alpha_from_value: String::new(),
        alpha_to_value: String::new(),
        count: numbers.len(),
        sample_invoices: numbers.iter().take(MAX_SAMPLES).cloned().collect(),
        years_found: years.into_set(),
        prefixes_found,
    }
}

/// The global pool for numbers no template matched. The "prefix" heuristic
/// runs the smart-pattern builder on each member and takes the literal text
/// before the first placeholder; the bucket's alphabetic range is the
/// lexicographic min/max of those pseudo-prefixes.
fn build_unmatched_bucket(unmatched: &[String]) -> Bucket {
    let mut prefixes: Vec<String> = Vec::new();

    for number in unmatched {
        let tokens = scan_number_tokens(number);
        let smart = build_smart_pattern(number, &tokens);
        match SMART_PREFIX.captures(&smart) {
            Some(caps) => {
                let prefix = caps[1].trim();
                if !prefix.is_empty() {
                    prefixes.push(prefix.to_string());
                }
            }
            None => prefixes.push(smart),
        }
    }

    let alpha_from_value = prefixes
        .iter()
        .min()
        .cloned()
        .unwrap_or_else(|| NOPFX.to_string());
    let alpha_to_value = prefixes
        .iter()
        .max()
        .cloned()
        .unwrap_or_else(|| NOPFX.to_string());

    Bucket {
        pattern: ".*".to_string(),
        smart_pattern: "[UNMATCHED]".to_string(),
        from_value: "0".to_string(),
        to_value: "0".to_string(),
        alpha_from_value,
        alpha_to_value,
        count: unmatched.len(),
        sample_invoices: unmatched.iter().take(MAX_SAMPLES).cloned().collect(),
        years_found: BTreeSet::new(),
        prefixes_found: prefixes.into_iter().collect(),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn classify(rows: &[&str]) -> (SeriesClassifier, Classification) {
        let classifier = SeriesClassifier::new();
        let classification = classifier.classify(rows);
        (classifier, classification)
    }

    #[test]
    fn prefix_year_group_with_padded_range() {
        let (_, result) = classify(&["ABC-2024-0001", "ABC-2024-0002", "ABC-2024-0050"]);

        assert_eq!(result.len(), 1);
        let (key, bucket) = result.get_rendered("prefix_year_seq_dash|ABC|2024").unwrap();
        assert_eq!(key.template, "prefix_year_seq_dash");
        assert_eq!(bucket.count, 3);
        assert_eq!(bucket.from_value, "0001");
        assert_eq!(bucket.to_value, "0050");
        assert_eq!(bucket.smart_pattern, "ABC-[YEAR]-[SEQ]");
        assert_eq!(
            bucket.sample_invoices,
            vec!["ABC-2024-0001", "ABC-2024-0002", "ABC-2024-0050"]
        );
        // Three members are far below the confirmation threshold.
        assert!(bucket.years_found.is_empty());
        assert!(bucket.prefixes_found.contains("ABC|2024"));
    }

    #[test]
    fn unmatched_numbers_pool_globally() {
        let (_, result) = classify(&["XYZ9999"]);

        let (_, bucket) = result.get_rendered("unmatched|NOPFX").unwrap();
        assert_eq!(bucket.count, 1);
        assert_eq!(bucket.alpha_from_value, "XYZ");
        assert_eq!(bucket.alpha_to_value, "XYZ");
        assert_eq!(bucket.smart_pattern, "[UNMATCHED]");
        assert_eq!(bucket.pattern, ".*");
        assert_eq!(bucket.from_value, "0");
        assert!(bucket.prefixes_found.contains("XYZ"));
    }

    #[test]
    fn unmatched_alpha_range_spans_pseudo_prefixes() {
        let (_, result) = classify(&["XYZ9999?", "ABC1234?"]);
        let (_, bucket) = result.get_rendered("unmatched|NOPFX").unwrap();
        assert_eq!(bucket.count, 2);
        assert_eq!(bucket.alpha_from_value, "ABC");
        assert_eq!(bucket.alpha_to_value, "XYZ");
    }

    #[test]
    fn suffix_template_groups_by_suffix() {
        let (_, result) = classify(&["001-aa", "500-aa", "002-bb"]);

        let (_, aa) = result.get_rendered("numseq-suffix|aa").unwrap();
        assert_eq!(aa.count, 2);
        assert_eq!(aa.from_value, "001");
        assert_eq!(aa.to_value, "500");

        let (_, bb) = result.get_rendered("numseq-suffix|bb").unwrap();
        assert_eq!(bb.count, 1);
    }

    #[test]
    fn minority_four_digit_year_loses_to_frequent_two_digit() {
        // One group ("INV" under prefix-dash-seq): 9 members carry 2024 in
        // a long run, 11 carry 24. The 4-digit candidate misses the minimum
        // count; the 2-digit one passes and has no confirmed conflict.
        let mut rows: Vec<String> = (1..=9).map(|i| format!("INV-2024{i:04}")).collect();
        rows.extend((1..=11).map(|i| format!("INV-24{i:04}")));
        let rows: Vec<&str> = rows.iter().map(|s| s.as_str()).collect();

        let (_, result) = classify(&rows);
        let (_, bucket) = result.get_rendered("prefix-dash-seq|INV").unwrap();
        assert_eq!(bucket.count, 20);
        assert!(!bucket.years_found.contains(&2024));
        assert!(bucket.years_found.contains(&24));
    }

    #[test]
    fn confirmed_year_drives_segmentation_and_range() {
        // Twelve members of the shape INV-24NNNN: 24 confirms, runs split
        // into 24-NNNN, and the range covers the NNNN parts.
        let rows: Vec<String> = (1..=12).map(|i| format!("INV-24{i:04}")).collect();
        let rows: Vec<&str> = rows.iter().map(|s| s.as_str()).collect();

        let (_, result) = classify(&rows);
        let (_, bucket) = result.get_rendered("prefix-dash-seq|INV").unwrap();
        assert!(bucket.years_found.contains(&24));
        assert_eq!(bucket.from_value, "0001");
        assert_eq!(bucket.to_value, "0012");
        assert_eq!(bucket.smart_pattern, "INV-[YEAR]-[SEQ]");
    }

    #[test]
    fn every_cleaned_row_lands_in_exactly_one_bucket() {
        let rows = [
            "ABC-2024-0001",
            "  BILL-24-0042  ",
            "001-aa",
            "XYZ9999",
            "",
            "NAN",
            "RCP20240001",
        ];
        let (_, result) = classify(&rows);
        // 5 usable rows after cleaning.
        assert_eq!(result.total_count(), 5);
    }

    #[test]
    fn sample_cap_is_five_in_arrival_order() {
        let rows: Vec<String> = (1..=8).map(|i| format!("ABC-2024-{i:04}")).collect();
        let rows: Vec<&str> = rows.iter().map(|s| s.as_str()).collect();
        let (_, result) = classify(&rows);
        let (_, bucket) = result.get_rendered("prefix_year_seq_dash|ABC|2024").unwrap();
        assert_eq!(bucket.count, 8);
        assert_eq!(bucket.sample_invoices.len(), 5);
        assert_eq!(bucket.sample_invoices[0], "ABC-2024-0001");
        assert_eq!(bucket.sample_invoices[4], "ABC-2024-0005");
    }

    #[test]
    fn classification_is_idempotent() {
        let rows = ["ABC-2024-0001", "ABC-2024-0050", "XYZ9999", "001-aa"];
        let classifier = SeriesClassifier::new();
        let first = classifier.classify(&rows);
        let second = classifier.classify(&rows);

        let snapshot = |c: &Classification| -> Vec<(String, usize, String, String)> {
            c.buckets()
                .map(|(k, b)| {
                    (
                        k.to_string(),
                        b.count,
                        b.from_value.clone(),
                        b.to_value.clone(),
                    )
                })
                .collect()
        };
        assert_eq!(snapshot(&first), snapshot(&second));
    }

    #[test]
    fn empty_input_short_circuits() {
        let (_, result) = classify(&[]);
        assert!(result.is_empty());
        assert!(result.summary().is_empty());
    }

    #[test]
    fn summary_ranks_by_count() {
        let rows = ["ABC-2024-0001", "ABC-2024-0002", "XYZ9999", "001-aa"];
        let (_, result) = classify(&rows);
        let summary = result.summary();
        assert_eq!(summary[0].template, "prefix_year_seq_dash");
        assert_eq!(summary[0].count, 2);
        assert_eq!(summary[0].min_value, "0001");
        assert_eq!(summary[0].max_value, "0002");
        // Unmatched rows report the alphabetic range.
        let unmatched = summary.iter().find(|r| r.template == "unmatched").unwrap();
        assert_eq!(unmatched.min_value, "XYZ");
    }

    #[test]
    fn identify_is_case_insensitive() {
        let classifier = SeriesClassifier::new();
        assert_eq!(
            classifier.identify("abc-2024-0001"),
            Some("prefix_year_seq_dash")
        );
        assert_eq!(classifier.identify("???"), None);
    }

    #[test]
    fn bucket_key_for_renders_full_key() {
        let classifier = SeriesClassifier::new();
        let key = classifier.bucket_key_for("ABC-2024-0001").unwrap();
        assert_eq!(key.to_string(), "prefix_year_seq_dash|ABC|2024");
        assert!(classifier.bucket_key_for("???").is_none());
    }

    #[test]
    fn validate_flags_out_of_range_sequence() {
        let (classifier, result) =
            classify(&["ABC-2024-0001", "ABC-2024-0002", "ABC-2024-0050"]);

        let report = classifier.validate(&result, "ABC-2024-9999");
        assert!(!report.is_valid);
        assert_eq!(report.template.as_deref(), Some("prefix_year_seq_dash"));
        assert!(report.message.contains("9999"));
        assert!(report.message.contains("[0001-0050]"));

        let report = classifier.validate(&result, "ABC-2024-0025");
        assert!(report.is_valid);
        assert!(report.message.contains("within range"));
    }

    #[test]
    fn validate_handles_missing_template_and_bucket() {
        let (classifier, result) = classify(&["ABC-2024-0001"]);

        let report = classifier.validate(&result, "???");
        assert!(!report.is_valid);
        assert!(report.template.is_none());

        // Template matches but this group never classified.
        let report = classifier.validate(&result, "ZZZ-2024-0001");
        assert!(report.is_valid);
        assert!(report.message.contains("no range data"));
    }
}
