//! Common regex patterns for document-number analysis.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// A maximal run of decimal digits.
    pub static ref DIGIT_RUN: Regex = Regex::new(r"\d+").unwrap();

    /// Financial-year shape `DD-DD` (e.g. the `24-25` in `4711/24-25`).
    pub static ref FIN_YEAR: Regex = Regex::new(r"(\d{2})-(\d{2})").unwrap();

    /// Leading literal text of a smart pattern, up to the first placeholder.
    pub static ref SMART_PREFIX: Regex =
        Regex::new(r"^([^\[\]]+)(?:\[SEQ\]|\[YEAR\])").unwrap();

    /// Leading uppercase-alphabetic prefix of a document number.
    pub static ref ALPHA_PREFIX: Regex = Regex::new(r"^[A-Z]+").unwrap();
}
