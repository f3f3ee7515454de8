//! Core library for document-number series analysis.
//!
//! This crate provides:
//! - Template matching over an ordered, role-annotated regex catalog
//! - Frequency-based year inference per series group
//! - Segmentation of concatenated `SEQ+YEAR` digit runs
//! - Bucket aggregation: counts, leading-zero-aware sequence ranges,
//!   samples, confirmed years and prefixes
//! - Plausibility checks for individual document numbers

pub mod error;
pub mod models;
pub mod series;

pub use error::{CatalogError, DocnoError, Result};
pub use models::bucket::{
    Bucket, BucketKey, GroupKey, SequenceGaps, SummaryRow, ValidationReport, NOPFX,
    UNMATCHED_TEMPLATE,
};
pub use models::config::{DocnoConfig, InputConfig};
pub use models::template::{Template, TemplateCatalog};
pub use series::{Classification, CompiledTemplate, PatternMatcher, SeriesClassifier};
