//! Data models: templates, configuration, and bucket aggregates.

pub mod bucket;
pub mod config;
pub mod template;
