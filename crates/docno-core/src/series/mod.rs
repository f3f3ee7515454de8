//! Document-number series classification.
//!
//! The pipeline stages live in [`rules`] (tokenizing, year inference,
//! segmentation, smart patterns); [`classifier`] wires them into the
//! end-to-end flow and [`store`] holds the per-run aggregates.

pub mod classifier;
pub mod group_key;
pub mod matcher;
pub mod rules;
pub mod store;

pub use classifier::{Classification, SeriesClassifier};
pub use matcher::{CompiledTemplate, PatternMatcher};
