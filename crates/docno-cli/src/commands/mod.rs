//! CLI subcommands.

pub mod analyze;
pub mod check;
pub mod config;
pub mod templates;

use std::path::Path;

use docno_core::{DocnoConfig, SeriesClassifier, TemplateCatalog};

/// Load the pipeline configuration, falling back to defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<DocnoConfig> {
    match config_path {
        Some(path) => Ok(DocnoConfig::from_file(Path::new(path))?),
        None => Ok(DocnoConfig::default()),
    }
}

/// Build a classifier from an explicit catalog file, the configured one,
/// or the builtin catalog.
pub fn build_classifier(
    catalog_file: Option<&Path>,
    config: &DocnoConfig,
) -> anyhow::Result<SeriesClassifier> {
    let catalog = match catalog_file.or(config.catalog_file.as_deref()) {
        Some(path) => TemplateCatalog::from_file(path)?,
        None => TemplateCatalog::builtin(),
    };
    Ok(SeriesClassifier::with_catalog(&catalog))
}

/// Read the configured column of a CSV file into raw document numbers.
///
/// `column` is 1-based; rows shorter than the column are skipped. A
/// `max_rows` of 0 reads the whole file.
pub fn read_number_column(
    path: &Path,
    column: usize,
    max_rows: usize,
    has_header: bool,
) -> anyhow::Result<Vec<String>> {
    if column == 0 {
        anyhow::bail!("column index is 1-based; got 0");
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(has_header)
        .flexible(true)
        .from_path(path)?;

    let mut numbers = Vec::new();
    for record in reader.records() {
        let record = record?;
        if let Some(field) = record.get(column - 1) {
            numbers.push(field.to_string());
        }
        if max_rows > 0 && numbers.len() >= max_rows {
            break;
        }
    }

    Ok(numbers)
}
