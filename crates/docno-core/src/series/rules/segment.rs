//! Segmentation of concatenated digit runs.
//!
//! Numbering schemes like `SEQ+YYYY` with no separator produce one long
//! digit run. Once a group's years are confirmed, runs carrying a confirmed
//! year at either edge are rewritten into `<part>-<part>` form so that later
//! stages see the year and the sequence as separate runs.

use super::patterns::DIGIT_RUN;
use super::run_value;
use super::years::ConfirmedYears;

/// Rewrite every splittable digit run in `input`.
///
/// A run qualifies when it has at least 4 digits and value >= 1000. Rules
/// are tried in order; only the first applicable one fires:
/// 2-digit year at start, 4-digit year at start, 2-digit year at end,
/// 4-digit year at end. A rule applies only when the year part is in
/// `years` and the remainder keeps at least 2 digits. Unmatched runs pass
/// through unchanged.
pub fn split_concatenated_numbers(input: &str, years: &ConfirmedYears) -> String {
    let mut output = String::with_capacity(input.len() + 2);
    let mut last_end = 0;

    for run in DIGIT_RUN.find_iter(input) {
        output.push_str(&input[last_end..run.start()]);
        match split_run(run.as_str(), years) {
            Some(rewritten) => output.push_str(&rewritten),
            None => output.push_str(run.as_str()),
        }
        last_end = run.end();
    }

    output.push_str(&input[last_end..]);
    output
}

fn split_run(run: &str, years: &ConfirmedYears) -> Option<String> {
    if run.len() < 4 || run_value(run) < 1000 {
        return None;
    }

    // 2-digit year at start
    let head2: u32 = run[..2].parse().ok()?;
    let rest = &run[2..];
    if years.contains(head2) && rest.len() >= 2 {
        return Some(format!("{head2}-{rest}"));
    }

    // 4-digit year at start
    if run.len() >= 6 {
        let head4: u32 = run[..4].parse().ok()?;
        let rest = &run[4..];
        if years.contains(head4) && rest.len() >= 2 {
            return Some(format!("{head4}-{rest}"));
        }
    }

    // 2-digit year at end
    let tail2: u32 = run[run.len() - 2..].parse().ok()?;
    let rest = &run[..run.len() - 2];
    if years.contains(tail2) && rest.len() >= 2 {
        return Some(format!("{rest}-{tail2}"));
    }

    // 4-digit year at end
    if run.len() >= 6 {
        let tail4: u32 = run[run.len() - 4..].parse().ok()?;
        let rest = &run[..run.len() - 4];
        if years.contains(tail4) && rest.len() >= 2 {
            return Some(format!("{rest}-{tail4}"));
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::super::years::infer_confirmed_years;
    use super::*;

    /// Confirmed set {2024, 25} built from enough synthetic members.
    fn years_2024_and_25() -> ConfirmedYears {
        let members: Vec<String> = (100..112)
            .map(|i| format!("INV/2024/{i}"))
            .chain((500..512).map(|i| format!("X25{i}")))
            .collect();
        infer_confirmed_years(&members)
    }

    fn years_24() -> ConfirmedYears {
        let members: Vec<String> = (500..512).map(|i| format!("X24{i}")).collect();
        infer_confirmed_years(&members)
    }

    #[test]
    fn two_digit_year_at_start_splits_first() {
        let years = years_24();
        assert_eq!(split_concatenated_numbers("INV-240015", &years), "INV-24-0015");
    }

    #[test]
    fn four_digit_year_at_end_splits() {
        let years = years_2024_and_25();
        assert!(years.contains(2024));
        // 0012024: head2 "00" and head4 "0012" unconfirmed, tail2 "24" not
        // in this set, so the 4-digit year at the end wins.
        assert_eq!(split_concatenated_numbers("A0012024", &years), "A001-2024");
    }

    #[test]
    fn short_or_small_runs_pass_through() {
        let years = years_24();
        assert_eq!(split_concatenated_numbers("X-240", &years), "X-240");
        assert_eq!(split_concatenated_numbers("X-0999", &years), "X-0999");
    }

    #[test]
    fn unconfirmed_years_leave_runs_unchanged() {
        let years = ConfirmedYears::default();
        assert_eq!(
            split_concatenated_numbers("RCP20240001", &years),
            "RCP20240001"
        );
    }

    #[test]
    fn remainder_must_keep_two_digits() {
        let years = years_24();
        // "245" -> value 245 < 1000; "2451" -> head 24 leaves "51" (ok);
        // "240" is too small, "2400" head 24 leaves "00" which is allowed.
        assert_eq!(split_concatenated_numbers("B-2451", &years), "B-24-51");
        assert_eq!(split_concatenated_numbers("B-2400", &years), "B-24-00");
    }

    #[test]
    fn non_digit_text_is_preserved_verbatim() {
        let years = years_24();
        assert_eq!(
            split_concatenated_numbers("A/241234/B? ok", &years),
            "A/24-1234/B? ok"
        );
    }
}
