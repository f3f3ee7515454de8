//! Bucket data model: structured bucket keys and per-group aggregates.

use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

/// Sentinel used when a group has no resolvable prefix.
pub const NOPFX: &str = "NOPFX";

/// Template name reserved for the global pool of unmatched numbers.
pub const UNMATCHED_TEMPLATE: &str = "unmatched";

/// The prefix/year combination that subdivides one template's matches.
///
/// This is a proper structured key; the `"prefix|year"`-joined string is
/// produced by `Display` and serves only as the external identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GroupKey {
    /// A textual prefix, optionally qualified by a year marker.
    Prefixed {
        prefix: String,
        year: Option<String>,
    },
    /// A purely numeric prefix collapsed into its year marker, so that
    /// year-valued prefixes do not fragment buckets.
    YearOnly(String),
    /// No prefix could be resolved.
    Unprefixed { year: Option<String> },
}

impl GroupKey {
    /// Whether this is the bare `NOPFX` sentinel (no prefix, no year).
    pub fn is_nopfx(&self) -> bool {
        matches!(self, GroupKey::Unprefixed { year: None })
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupKey::Prefixed { prefix, year: None } => write!(f, "{prefix}"),
            GroupKey::Prefixed {
                prefix,
                year: Some(year),
            } => write!(f, "{prefix}|{year}"),
            GroupKey::YearOnly(year) => write!(f, "{year}"),
            GroupKey::Unprefixed { year: None } => write!(f, "{NOPFX}"),
            GroupKey::Unprefixed { year: Some(year) } => write!(f, "{NOPFX}|{year}"),
        }
    }
}

/// Full bucket identity: template name plus group key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BucketKey {
    pub template: String,
    pub group: GroupKey,
}

impl BucketKey {
    pub fn new(template: impl Into<String>, group: GroupKey) -> Self {
        Self {
            template: template.into(),
            group,
        }
    }

    /// The reserved key for the global unmatched pool.
    pub fn unmatched() -> Self {
        Self {
            template: UNMATCHED_TEMPLATE.to_string(),
            group: GroupKey::Unprefixed { year: None },
        }
    }
}

impl fmt::Display for BucketKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}", self.template, self.group)
    }
}

/// Aggregated statistics for one group of document numbers.
#[derive(Debug, Clone, Serialize)]
pub struct Bucket {
    /// The matched template's regex pattern (`".*"` for the unmatched pool).
    pub pattern: String,

    /// Display pattern with numeric tokens replaced by `[YEAR]`/`[SEQ]`.
    pub smart_pattern: String,

    /// Original substring of the numerically smallest sequence number.
    /// `"0"` when no sequence numbers were extracted.
    pub from_value: String,

    /// Original substring of the numerically largest sequence number.
    pub to_value: String,

    /// Lexicographic minimum pseudo-prefix (unmatched pool only).
    pub alpha_from_value: String,

    /// Lexicographic maximum pseudo-prefix (unmatched pool only).
    pub alpha_to_value: String,

    /// Number of members classified into this bucket.
    pub count: usize,

    /// Up to the first 5 members, in arrival order.
    pub sample_invoices: Vec<String>,

    /// Years confirmed by the frequency heuristic for this group.
    pub years_found: BTreeSet<u32>,

    /// Rendered group keys observed for this bucket.
    pub prefixes_found: BTreeSet<String>,
}

impl Bucket {
    /// Gap analysis over the numeric sequence range.
    ///
    /// Reports how many sequence values inside `[from, to]` are unaccounted
    /// for when the member count is smaller than the span. `None` when the
    /// range is empty or dense.
    pub fn sequence_gaps(&self) -> Option<SequenceGaps> {
        let from: u64 = self.from_value.parse().ok()?;
        let to: u64 = self.to_value.parse().ok()?;
        if to < from {
            return None;
        }
        let expected = to - from + 1;
        if expected > self.count as u64 {
            Some(SequenceGaps {
                expected,
                missing: expected - self.count as u64,
            })
        } else {
            None
        }
    }
}

/// Result of [`Bucket::sequence_gaps`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SequenceGaps {
    /// Number of sequence values the range would hold if dense.
    pub expected: u64,
    /// How many of those are missing from the bucket.
    pub missing: u64,
}

/// One row of the classification summary.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryRow {
    /// Template name (the part of the bucket key before the first `|`).
    pub template: String,
    /// First sample member, or empty when the bucket has no samples.
    pub sample_invoice: String,
    /// Lower bound shown to the user (alpha range for the unmatched pool).
    pub min_value: String,
    /// Upper bound shown to the user.
    pub max_value: String,
    /// Member count.
    pub count: usize,
}

/// Outcome of validating a single document number against a classification.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    /// Whether the number is considered plausible.
    pub is_valid: bool,
    /// The matched template, if any.
    pub template: Option<String>,
    /// Human-readable explanation, quoting the relevant range when known.
    pub message: String,
}
