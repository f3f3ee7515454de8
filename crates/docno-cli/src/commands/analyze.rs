//! Analyze command - classify a file of document numbers into buckets.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::debug;

use docno_core::{Bucket, Classification};

use super::{build_classifier, load_config, read_number_column};

/// Arguments for the analyze command.
#[derive(Args)]
pub struct AnalyzeArgs {
    /// Input CSV file with one document number per row
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// 1-based column index holding the numbers (overrides config)
    #[arg(long)]
    column: Option<usize>,

    /// Maximum number of rows to read (overrides config, 0 = unlimited)
    #[arg(long)]
    max_rows: Option<usize>,

    /// Treat the first row as data, not a header
    #[arg(long)]
    no_header: bool,

    /// Custom template catalog (JSON)
    #[arg(short, long)]
    templates: Option<PathBuf>,

    /// Print a detailed drill-down for one bucket key after the summary
    #[arg(long)]
    bucket: Option<String>,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// Plain text summary
    Text,
    /// JSON bucket map
    Json,
    /// CSV summary rows
    Csv,
}

pub async fn run(args: AnalyzeArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let column = args.column.unwrap_or(config.input.column);
    let max_rows = args.max_rows.unwrap_or(config.input.max_rows);
    let has_header = if args.no_header {
        false
    } else {
        config.input.has_header
    };

    let pb = ProgressBar::new(100);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {msg}")
            .unwrap()
            .progress_chars("##-"),
    );

    pb.set_message("Reading input...");
    pb.set_position(10);
    let numbers = read_number_column(&args.input, column, max_rows, has_header)?;
    debug!("read {} rows from {}", numbers.len(), args.input.display());

    pb.set_message("Loading templates...");
    pb.set_position(30);
    let classifier = build_classifier(args.templates.as_deref(), &config)?;

    pb.set_message("Classifying...");
    pb.set_position(50);
    let classification = classifier.classify(&numbers);

    pb.set_position(100);
    pb.finish_with_message("Done");

    let output = format_classification(&classification, args.format)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    if let Some(bucket_key) = &args.bucket {
        print_bucket_detail(&classification, bucket_key);
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

fn format_classification(
    classification: &Classification,
    format: OutputFormat,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Text => Ok(format_text(classification)),
        OutputFormat::Json => format_json(classification),
        OutputFormat::Csv => format_csv(classification),
    }
}

fn format_text(classification: &Classification) -> String {
    let mut output = String::new();

    output.push_str("=== Document Number Analysis Summary ===\n");

    let summary = classification.summary();
    if summary.is_empty() {
        output.push_str("No analysis results found!\n");
        return output;
    }

    for row in &summary {
        output.push_str(&format!("\nTemplate: {}\n", row.template));
        output.push_str(&format!("Sample: {}\n", row.sample_invoice));
        output.push_str(&format!("Range: {} to {}\n", row.min_value, row.max_value));
        output.push_str(&format!("Count: {}\n", row.count));
        output.push_str(&"-".repeat(60));
        output.push('\n');
    }

    output.push_str(&format!("\nTotal templates matched: {}\n", summary.len()));
    output.push_str(&format!(
        "Total numbers processed: {}\n",
        classification.total_count()
    ));

    output
}

#[derive(Serialize)]
struct BucketRecord<'a> {
    key: String,
    #[serde(flatten)]
    bucket: &'a Bucket,
}

fn format_json(classification: &Classification) -> anyhow::Result<String> {
    let records: Vec<BucketRecord<'_>> = classification
        .buckets()
        .map(|(key, bucket)| BucketRecord {
            key: key.to_string(),
            bucket,
        })
        .collect();
    Ok(serde_json::to_string_pretty(&records)?)
}

fn format_csv(classification: &Classification) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(["template", "sample_invoice", "min_value", "max_value", "count"])?;

    for row in classification.summary() {
        wtr.write_record([
            &row.template,
            &row.sample_invoice,
            &row.min_value,
            &row.max_value,
            &row.count.to_string(),
        ])?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn print_bucket_detail(classification: &Classification, rendered_key: &str) {
    let Some((key, bucket)) = classification.get_rendered(rendered_key) else {
        eprintln!("{} Bucket not found: {}", style("✗").red(), rendered_key);
        return;
    };

    println!();
    println!("=== Detailed Analysis for Bucket: {} ===", key);
    println!("Template: {}", key.template);
    println!("Pattern: {}", bucket.pattern);
    println!("Smart Pattern: {}", bucket.smart_pattern);
    println!("Count: {}", bucket.count);
    println!("Range: {} to {}", bucket.from_value, bucket.to_value);

    println!();
    println!("Years Found:");
    if bucket.years_found.is_empty() {
        println!("- None");
    } else {
        for year in &bucket.years_found {
            println!("- {}", year);
        }
    }

    println!();
    println!("Prefixes Found:");
    if bucket.prefixes_found.is_empty() {
        println!("- None");
    } else {
        for prefix in &bucket.prefixes_found {
            println!("- {}", prefix);
        }
    }

    println!();
    println!("Sample Invoices:");
    if bucket.sample_invoices.is_empty() {
        println!("- None");
    } else {
        for sample in &bucket.sample_invoices {
            println!("- {}", sample);
        }
    }

    if let Some(gaps) = bucket.sequence_gaps() {
        println!();
        println!("{} There are gaps in the sequence", style("ℹ").blue());
        println!("Expected count: {}", gaps.expected);
        println!("Actual count: {}", bucket.count);
        println!("Missing numbers: {}", gaps.missing);
    }
}
