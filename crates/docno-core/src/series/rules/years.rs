//! Frequency-based year inference for one group of document numbers.
//!
//! A group's numbers often embed the issuing year, but so do sequence
//! numbers that merely look year-like. A value only counts as a year for the
//! group when enough of the group's members carry it; minority patterns must
//! not leak year classifications into the whole group.

use std::collections::{BTreeSet, HashMap};

use super::patterns::{DIGIT_RUN, FIN_YEAR};
use super::{is_full_year, is_short_year, run_value};

/// A candidate must appear in more than this share of the group's members.
pub const CONFIRM_RATIO: f64 = 0.4;

/// ...and at least this many times, to guard against small-sample noise.
pub const CONFIRM_MIN_COUNT: usize = 10;

/// The set of year values (2- or 4-digit) confirmed for one
/// (template, group-key) partition. Recomputed per partition, never merged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfirmedYears(BTreeSet<u32>);

impl ConfirmedYears {
    pub fn contains(&self, year: u32) -> bool {
        self.0.contains(&year)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.0.iter().copied()
    }

    /// The underlying set, for storage in a bucket.
    pub fn into_set(self) -> BTreeSet<u32> {
        self.0
    }
}

/// Infer the confirmed years for one partition's member strings.
pub fn infer_confirmed_years<S: AsRef<str>>(members: &[S]) -> ConfirmedYears {
    let mut candidates: HashMap<u32, usize> = HashMap::new();

    for member in members {
        let member = member.as_ref();

        // A DD-DD shape anywhere marks a financial-year style number; the
        // run scan is skipped for this member even when the halves fall
        // outside the window.
        if let Some(caps) = FIN_YEAR.captures(member) {
            let first: u32 = caps[1].parse().unwrap_or(0);
            let second: u32 = caps[2].parse().unwrap_or(0);
            if is_short_year(first) && is_short_year(second) {
                *candidates.entry(2000 + first).or_insert(0) += 1;
                *candidates.entry(2000 + second).or_insert(0) += 1;
            }
            continue;
        }

        for run in DIGIT_RUN.find_iter(member) {
            collect_run_candidates(run.as_str(), &mut candidates);
        }
    }

    confirm_candidates(&candidates, members.len())
}

fn collect_run_candidates(run: &str, candidates: &mut HashMap<u32, usize>) {
    if run.len() == 4 {
        if let Ok(value) = run.parse::<u32>() {
            if is_full_year(value) {
                *candidates.entry(value).or_insert(0) += 1;
                return;
            }
        }
    }

    // Long concatenated runs may hide a year at either edge.
    if run.len() >= 5 && run_value(run) >= 10_000 {
        if run.len() >= 6 {
            let head4: u32 = run[..4].parse().unwrap_or(0);
            if is_full_year(head4) {
                *candidates.entry(head4).or_insert(0) += 1;
            }
            let tail4: u32 = run[run.len() - 4..].parse().unwrap_or(0);
            if is_full_year(tail4) {
                *candidates.entry(tail4).or_insert(0) += 1;
            }
        }

        let head2: u32 = run[..2].parse().unwrap_or(0);
        if is_short_year(head2) {
            *candidates.entry(head2).or_insert(0) += 1;
        }
        let tail2: u32 = run[run.len() - 2..].parse().unwrap_or(0);
        if is_short_year(tail2) {
            *candidates.entry(tail2).or_insert(0) += 1;
        }
    }
}

fn confirm_candidates(candidates: &HashMap<u32, usize>, total: usize) -> ConfirmedYears {
    let mut confirmed = BTreeSet::new();

    // 4-digit years first.
    for (&year, &count) in candidates {
        if passes_threshold(count, total) && is_full_year(year) {
            confirmed.insert(year);
        }
    }

    // 2-digit years only where no confirmed 4-digit year shares the same
    // last two digits, so e.g. 2024 and 24 never double-count.
    for (&year, &count) in candidates {
        if passes_threshold(count, total)
            && is_short_year(year)
            && !conflicts_with_full_year(&confirmed, year)
        {
            confirmed.insert(year);
        }
    }

    ConfirmedYears(confirmed)
}

fn passes_threshold(count: usize, total: usize) -> bool {
    total > 0 && count as f64 / total as f64 > CONFIRM_RATIO && count >= CONFIRM_MIN_COUNT
}

fn conflicts_with_full_year(confirmed: &BTreeSet<u32>, short_year: u32) -> bool {
    confirmed
        .iter()
        .any(|&year| year >= 2000 && year % 100 == short_year)
}
