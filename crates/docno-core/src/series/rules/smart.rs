//! Smart pattern builder: renders a document number as a display template
//! with numeric tokens replaced by `[YEAR]` / `[SEQ]` placeholders.
//!
//! The year decision here intentionally differs from the tokenizer's
//! provisional flag: it honors that flag when set, but extends the year
//! window for separated 4-digit tokens (already-segmented financial-year
//! halves like `2526-3940`) and refuses the year label for any token whose
//! literal text carries a leading zero, since zero-padded sequence numbers
//! must never read as years. The two rules serve different consumers
//! (segmentation vs. display) and are kept distinct.

use super::tokens::NumberToken;

/// Inclusive window for separated 4-digit year-like tokens.
pub const SEPARATED_YEAR_MIN: u32 = 2526;
/// Inclusive upper bound for separated 4-digit year-like tokens.
pub const SEPARATED_YEAR_MAX: u32 = 3940;

/// Inclusive window for plain year-valued tokens in display position.
pub const DISPLAY_YEAR_MIN: u64 = 2020;
/// Inclusive upper bound for plain year-valued tokens in display position.
pub const DISPLAY_YEAR_MAX: u64 = 2030;

/// Build the smart pattern for `input` given its scanned tokens.
///
/// Non-token bytes are preserved verbatim; offsets shift by each
/// replacement's length delta. With no tokens the input is returned as-is.
pub fn build_smart_pattern(input: &str, tokens: &[NumberToken]) -> String {
    if tokens.is_empty() {
        return input.to_string();
    }

    let mut output = String::with_capacity(input.len());
    let mut last_end = 0;

    for token in tokens {
        output.push_str(&input[last_end..token.start]);
        output.push_str(if is_year_token(input, token) {
            "[YEAR]"
        } else {
            "[SEQ]"
        });
        last_end = token.end;
    }

    output.push_str(&input[last_end..]);
    output
}

fn is_year_token(input: &str, token: &NumberToken) -> bool {
    if token.is_year_range {
        return true;
    }

    let text = token.text(input);
    let has_leading_zero = text.len() > 1 && text.starts_with('0');
    if has_leading_zero {
        return false;
    }

    // Separated token: not at either string boundary, non-digit neighbors.
    let between_separators = token.start > 0
        && token.end < input.len()
        && !input.as_bytes()[token.start - 1].is_ascii_digit()
        && !input.as_bytes()[token.end].is_ascii_digit();

    if between_separators
        && token.length == 4
        && u32::try_from(token.value)
            .map(|v| (SEPARATED_YEAR_MIN..=SEPARATED_YEAR_MAX).contains(&v))
            .unwrap_or(false)
    {
        return true;
    }

    (DISPLAY_YEAR_MIN..=DISPLAY_YEAR_MAX).contains(&token.value)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::super::tokens::scan_number_tokens;
    use super::*;

    fn smart(input: &str) -> String {
        build_smart_pattern(input, &scan_number_tokens(input))
    }

    #[test]
    fn year_and_sequence_placeholders() {
        assert_eq!(smart("ABC-2024-0001"), "ABC-[YEAR]-[SEQ]");
    }

    #[test]
    fn plain_sequence_only() {
        assert_eq!(smart("XYZ9999"), "XYZ[SEQ]");
    }

    #[test]
    fn leading_zero_never_reads_as_year() {
        // 0024 has year-like value but the zero-padded literal is a
        // sequence number.
        assert_eq!(smart("A-0024-B"), "A-[SEQ]-B");
    }

    #[test]
    fn provisional_flag_wins() {
        // 2005 is outside the display window but inside the tokenizer's
        // provisional window.
        assert_eq!(smart("A-2005-77"), "A-[YEAR]-[SEQ]");
        assert_eq!(smart("N/25/X"), "N/[YEAR]/X");
    }

    #[test]
    fn separated_financial_year_halves() {
        // 3940 only reads as a year between separators.
        assert_eq!(smart("Q-3940-55"), "Q-[YEAR]-[SEQ]");
        assert_eq!(smart("3940-55"), "[SEQ]-[SEQ]");
    }

    #[test]
    fn no_tokens_returns_input() {
        assert_eq!(smart("NOPFX"), "NOPFX");
    }

    #[test]
    fn text_outside_tokens_is_verbatim() {
        assert_eq!(smart("a1b22c333d"), "a[SEQ]b[YEAR]c[SEQ]d");
    }
}
