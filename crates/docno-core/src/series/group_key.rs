//! Group-key resolution: derives the bucketing key from a template match.

use regex::Captures;

use super::rules::{is_full_year, is_short_year};
use crate::models::bucket::GroupKey;
use crate::models::template::Template;

/// Derive the group key from a match's captures and the template's
/// capture-group roles.
///
/// The year marker is the first year-group capture that is purely numeric
/// with 2 digits in [20, 30] or 4 digits in [2000, 2030], kept as captured
/// text. The prefix is the first non-empty prefix-group capture, falling
/// back to the first non-empty sequence-group capture. A purely numeric
/// prefix combined with a year marker collapses to the year alone, so that
/// year-valued "prefixes" do not fragment the template's buckets.
pub fn resolve_group_key(caps: &Captures<'_>, template: &Template) -> GroupKey {
    let year = extract_year_marker(caps, template);
    let prefix = extract_prefix(caps, template);

    match (prefix, year) {
        (Some(prefix), Some(year)) if is_purely_numeric(&prefix) => GroupKey::YearOnly(year),
        (Some(prefix), year) => GroupKey::Prefixed { prefix, year },
        (None, year) => GroupKey::Unprefixed { year },
    }
}

fn extract_year_marker(caps: &Captures<'_>, template: &Template) -> Option<String> {
    for &idx in &template.year_groups {
        let Some(m) = caps.get(idx) else { continue };
        let text = m.as_str();
        if !is_purely_numeric(text) {
            continue;
        }
        let accepted = match text.len() {
            2 => text.parse::<u32>().is_ok_and(is_short_year),
            4 => text.parse::<u32>().is_ok_and(is_full_year),
            _ => false,
        };
        if accepted {
            return Some(text.to_string());
        }
    }
    None
}

fn extract_prefix(caps: &Captures<'_>, template: &Template) -> Option<String> {
    let first_present = |indices: &[usize]| {
        indices
            .iter()
            .find_map(|&idx| caps.get(idx))
            .map(|m| m.as_str().to_string())
            .filter(|s| !s.is_empty())
    };

    first_present(&template.prefix_groups).or_else(|| first_present(&template.sequence_groups))
}

fn is_purely_numeric(text: &str) -> bool {
    !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::models::template::TemplateCatalog;
    use crate::series::matcher::PatternMatcher;

    fn resolve(input: &str) -> GroupKey {
        let matcher = PatternMatcher::from_catalog(&TemplateCatalog::builtin());
        let (compiled, caps) = matcher.first_captures(input).unwrap();
        resolve_group_key(&caps, &compiled.template)
    }

    #[test]
    fn prefix_and_year() {
        assert_eq!(resolve("ABC-2024-0001").to_string(), "ABC|2024");
    }

    #[test]
    fn prefix_only() {
        assert_eq!(resolve("INV-778899").to_string(), "INV");
    }

    #[test]
    fn sequence_group_fallback_as_prefix() {
        // finyear-dash has no prefix group and its year capture "24-25" is
        // not purely numeric, so the sequence capture becomes the key.
        assert_eq!(resolve("001-aa").to_string(), "aa");
        assert_eq!(resolve("4711-24-25").to_string(), "4711");
    }

    #[test]
    fn numeric_prefix_collapses_into_year() {
        // bill-2digit-year-seq has no prefix group; the sequence capture is
        // numeric and a year marker exists, so the key is the year alone.
        assert_eq!(resolve("BILL-24-0042").to_string(), "24");
    }

    #[test]
    fn out_of_window_year_capture_is_ignored() {
        // prefix_year_seq_dash year group "1999" fails the window test.
        assert_eq!(resolve("ABC-1999-0001").to_string(), "ABC");
    }
}
