//! Check command - identify and validate a single document number.

use std::path::PathBuf;

use clap::Args;
use console::style;

use super::{build_classifier, load_config, read_number_column};

/// Arguments for the check command.
#[derive(Args)]
pub struct CheckArgs {
    /// The document number to check
    #[arg(required = true)]
    number: String,

    /// Reference CSV file used to establish series ranges
    #[arg(short = 'f', long)]
    file: Option<PathBuf>,

    /// 1-based column index in the reference file (overrides config)
    #[arg(long)]
    column: Option<usize>,

    /// Treat the reference file's first row as data, not a header
    #[arg(long)]
    no_header: bool,

    /// Custom template catalog (JSON)
    #[arg(short, long)]
    templates: Option<PathBuf>,
}

pub async fn run(args: CheckArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let classifier = build_classifier(args.templates.as_deref(), &config)?;

    match classifier.identify(&args.number) {
        Some(template) => {
            println!("{} Template: {}", style("✓").green(), template);
        }
        None => {
            println!("{} No matching template found", style("✗").red());
            return Ok(());
        }
    }

    if let Some(key) = classifier.bucket_key_for(&args.number) {
        println!("Bucket key: {}", key);
    }

    // Without reference data only identification is possible.
    let Some(file) = &args.file else {
        println!();
        println!("Pass --file <CSV> to validate against a series' observed range.");
        return Ok(());
    };

    if !file.exists() {
        anyhow::bail!("Reference file not found: {}", file.display());
    }

    let column = args.column.unwrap_or(config.input.column);
    let has_header = if args.no_header {
        false
    } else {
        config.input.has_header
    };

    let numbers = read_number_column(file, column, config.input.max_rows, has_header)?;
    let classification = classifier.classify(&numbers);

    let report = classifier.validate(&classification, &args.number);
    let glyph = if report.is_valid {
        style("✓").green()
    } else {
        style("✗").red()
    };
    println!("{} {}", glyph, report.message);

    Ok(())
}
