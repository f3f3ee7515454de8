//! Configuration structures for the analysis pipeline.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration for the docno pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DocnoConfig {
    /// Input file configuration.
    pub input: InputConfig,

    /// Path to a custom template catalog (JSON). Falls back to the builtin
    /// catalog when unset.
    pub catalog_file: Option<PathBuf>,
}

impl Default for DocnoConfig {
    fn default() -> Self {
        Self {
            input: InputConfig::default(),
            catalog_file: None,
        }
    }
}

/// How to read document numbers out of a tabular input file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// 1-based column index holding the document numbers.
    pub column: usize,

    /// Maximum number of data rows to read (0 = unlimited).
    pub max_rows: usize,

    /// Whether the first row is a header and should be skipped.
    pub has_header: bool,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            column: 1,
            max_rows: 0,
            has_header: true,
        }
    }
}

impl DocnoConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))?;
        std::fs::write(path, content)
    }
}
