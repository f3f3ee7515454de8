//! Template catalog: named regex patterns with capture-group role metadata.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CatalogError, Result};

/// A single numbering template: a regex plus metadata marking which capture
/// groups carry the year, the sequence number, and the prefix.
///
/// Group indices are 1-based, matching regex capture numbering. The order of
/// templates in the catalog defines match priority: the first enabled
/// template whose pattern matches wins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Template {
    /// Unique template name, used as the first component of bucket keys.
    pub name: String,

    /// Regex pattern. Compiled once at catalog load time.
    pub pattern: String,

    /// Human-readable description of the format.
    #[serde(default)]
    pub description: String,

    /// Capture groups that may carry a year marker.
    #[serde(default)]
    pub year_groups: Vec<usize>,

    /// Capture groups that carry the sequence number.
    #[serde(default)]
    pub sequence_groups: Vec<usize>,

    /// Capture groups that carry the series prefix.
    #[serde(default)]
    pub prefix_groups: Vec<usize>,

    /// Disabled templates are kept in the catalog but never matched.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl Template {
    fn new(
        name: &str,
        pattern: &str,
        description: &str,
        year_groups: &[usize],
        sequence_groups: &[usize],
        prefix_groups: &[usize],
    ) -> Self {
        Self {
            name: name.to_string(),
            pattern: pattern.to_string(),
            description: description.to_string(),
            year_groups: year_groups.to_vec(),
            sequence_groups: sequence_groups.to_vec(),
            prefix_groups: prefix_groups.to_vec(),
            enabled: true,
        }
    }
}

/// An ordered collection of templates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateCatalog {
    /// Catalog description.
    #[serde(default)]
    pub description: String,

    /// Catalog format version.
    #[serde(default)]
    pub version: String,

    /// Templates in priority order.
    pub templates: Vec<Template>,
}

impl TemplateCatalog {
    /// Load a catalog from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let catalog: TemplateCatalog = serde_json::from_str(&content)
            .map_err(|e| CatalogError::Parse(e.to_string()))?;
        Ok(catalog)
    }

    /// Save the catalog to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| CatalogError::Parse(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Templates that participate in matching, in priority order.
    pub fn enabled_templates(&self) -> impl Iterator<Item = &Template> {
        self.templates.iter().filter(|t| t.enabled)
    }

    /// The compiled-in default catalog covering the known numbering formats.
    pub fn builtin() -> Self {
        let templates = vec![
            Template::new(
                "prefix_year_seq_dash",
                r"^([A-Za-z]+)-(\d{4})-(\d+)$",
                "PREFIX-YYYY-NNNN format with dashes (e.g., ABC-2024-048)",
                &[2],
                &[3],
                &[1],
            ),
            Template::new(
                "bill-2digit-year-seq",
                r"^BILL-(\d{2})-(\d+)$",
                "BILL-YY-NNNN format",
                &[1],
                &[2],
                &[],
            ),
            Template::new(
                "prefix-year-concatenated",
                r"^([A-Z]+)(\d{2}|\d{4})-(\d+)$",
                "PREFIX-YY/YYYY-NNNN concatenated format (e.g., ABC24-001 or ABC2024-001)",
                &[2],
                &[3],
                &[1],
            ),
            Template::new(
                "doc-prefix-year-seq",
                r"^DOC-([A-Z]+)-(\d{4})-(\d+)$",
                "DOC-PREFIX-YYYY-NNNN format",
                &[2],
                &[3],
                &[1],
            ),
            Template::new(
                "prefix-slash-year-seq",
                r"^([A-Z]+)/(\d{4})/(\d+)$",
                "PREFIX/YYYY/NNNN format",
                &[2],
                &[3],
                &[1],
            ),
            Template::new(
                "receipt-year-seq",
                r"^RCP(\d{4})(\d+)$",
                "RCPYYYYNNNN format",
                &[1],
                &[2],
                &[],
            ),
            Template::new(
                "prefix-dash-seq",
                r"^([A-Z]+)-(\d+)$",
                "PREFIX-NNNN format",
                &[],
                &[2],
                &[1],
            ),
            Template::new(
                "prefix-dash-seq-lower",
                r"^([a-z]+)-(\d+)$",
                "prefix-NNNN format (lowercase prefix)",
                &[],
                &[2],
                &[1],
            ),
            Template::new(
                "prefix-slash-seq",
                r"^([A-Z]+)/(\d+)$",
                "PREFIX/NNNN format",
                &[],
                &[2],
                &[1],
            ),
            Template::new(
                "finyear-slash",
                r"^(\d+)[/](\d{2}-\d{2})$",
                "NNNN/YY-YY format",
                &[2],
                &[1],
                &[],
            ),
            Template::new(
                "finyear-dash",
                r"^(\d+)-(\d{2}-\d{2})$",
                "NNNN-YY-YY format",
                &[2],
                &[1],
                &[],
            ),
            Template::new(
                "prefix-seq-finyear",
                r"^([A-Z]+)/(\d+)/(\d{4}-\d{2})$",
                "PREFIX/SEQ/YYYY-YY format",
                &[3],
                &[2],
                &[1],
            ),
            Template::new(
                "prefix-alphanumseq",
                r"^([A-Z]+)-(\d+[A-Z])$",
                "PREFIX-NNNNA format",
                &[],
                &[2],
                &[1],
            ),
            Template::new(
                "numseq-suffix",
                r"^(\d+)-([a-z]{2})$",
                "Numeric sequence with 2-letter lowercase suffix for quarterly patterns (e.g., 001-aa, 500-bb)",
                &[],
                &[1],
                &[2],
            ),
            Template::new(
                "numseq-suffix-upper",
                r"^(\d+)-([A-Z]{2})$",
                "Numeric sequence with 2-letter uppercase suffix for quarterly patterns (e.g., 001-AA, 500-BB)",
                &[],
                &[1],
                &[2],
            ),
            Template::new(
                "numseq-alphacode-year",
                r"^(\d+)-([A-Za-z]+)-(\d{4})$",
                "Numeric sequence, mixed-case alphabetic code, and 4-digit year (e.g., 001-AbC-2024)",
                &[3],
                &[1],
                &[2],
            ),
            Template::new(
                "prefix-year-seq",
                r"^([A-Za-z]+)-(\d{2})-(\d+)$",
                "PREFIX-YY-NNNN format (e.g., ABC-24-001)",
                &[2],
                &[3],
                &[1],
            ),
            Template::new(
                "prefix_seq_year_slash",
                r"^([A-Za-z]+)/(\d+)/(\d{4})$",
                "PREFIX/SEQ/YYYY format (e.g., ABC/001/2024)",
                &[3],
                &[2],
                &[1],
            ),
            Template::new(
                "prefix_2digityear_seq_slash",
                r"^([A-Za-z]+)/(\d{2})/(\d+)$",
                "PREFIX/YY/NNN format (e.g., ABC/24/001)",
                &[2],
                &[3],
                &[1],
            ),
            Template::new(
                "seq_prefix_year_slash",
                r"^(\d+)/([A-Za-z]+)/(\d{4})$",
                "SEQ/PREFIX/YYYY format (e.g., 001/ABC/2024)",
                &[3],
                &[1],
                &[2],
            ),
            Template::new(
                "seq_prefix_year_concatenated",
                r"^(\d+)([A-Za-z]+)(\d{4})$",
                "SEQ + PREFIX + YYYY with no separators (e.g., 001ABC2024)",
                &[3],
                &[1],
                &[2],
            ),
            Template::new(
                "prefix_seq_year_dash",
                r"^([A-Za-z]+)-(\d+)-(\d{4})$",
                "PREFIX-SEQ-YYYY format (e.g., ABC-001-2024)",
                &[3],
                &[2],
                &[1],
            ),
            Template::new(
                "prefix_seq_year_concatenated",
                r"^([A-Za-z]+)(\d+)(\d{4})$",
                "PREFIX + SEQ + YYYY with no separators (e.g., ABC0012024)",
                &[3],
                &[2],
                &[1],
            ),
            Template::new(
                "varprefix_2digityear_region_seq",
                r"^([A-Za-z]+)(\d{2})([A-Z]{3})(\d+)$",
                "Variable prefix + 2-digit year + 3-letter region + numeric sequence (e.g., Af25KAR150780751)",
                &[2],
                &[4],
                &[1, 3],
            ),
            Template::new(
                "varprefix_2digityear_region_seq_slash",
                r"^([A-Za-z]+)/(\d{2})/([A-Z]{3})/(\d+)$",
                "Variable prefix / 2-digit year / 3-letter region / numeric sequence (e.g., AF/25/KAR/150780751)",
                &[2],
                &[4],
                &[1, 3],
            ),
            Template::new(
                "varprefix_2digityear_region_seq_dash",
                r"^([A-Za-z]+)-(\d{2})-([A-Z]{3})-(\d+)$",
                "Variable prefix - 2-digit year - 3-letter region - numeric sequence (e.g., AF-25-KAR-150780752)",
                &[2],
                &[4],
                &[1, 3],
            ),
        ];

        Self {
            description: "Document number regex templates configuration".to_string(),
            version: "1.0".to_string(),
            templates,
        }
    }
}

impl Default for TemplateCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_is_nonempty_and_enabled() {
        let catalog = TemplateCatalog::builtin();
        assert!(!catalog.templates.is_empty());
        assert_eq!(
            catalog.enabled_templates().count(),
            catalog.templates.len()
        );
    }

    #[test]
    fn builtin_patterns_all_compile() {
        for template in TemplateCatalog::builtin().templates {
            assert!(
                regex::Regex::new(&template.pattern).is_ok(),
                "template {} has an invalid pattern",
                template.name
            );
        }
    }

    #[test]
    fn catalog_round_trips_through_json() {
        let catalog = TemplateCatalog::builtin();
        let json = serde_json::to_string(&catalog).unwrap();
        let parsed: TemplateCatalog = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.templates.len(), catalog.templates.len());
        assert_eq!(parsed.templates[0].name, "prefix_year_seq_dash");
        assert_eq!(parsed.templates[0].year_groups, vec![2]);
    }

    #[test]
    fn missing_optional_fields_default() {
        let json = r#"{"templates":[{"name":"t","pattern":"^X-(\\d+)$","sequence_groups":[1]}]}"#;
        let catalog: TemplateCatalog = serde_json::from_str(json).unwrap();
        assert!(catalog.templates[0].enabled);
        assert!(catalog.templates[0].prefix_groups.is_empty());
    }
}
