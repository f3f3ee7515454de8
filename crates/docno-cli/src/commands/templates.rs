//! Templates command - inspect and lint the template catalog.

use std::path::PathBuf;

use clap::{Args, Subcommand};
use console::style;

use docno_core::TemplateCatalog;

/// Arguments for the templates command.
#[derive(Args)]
pub struct TemplatesArgs {
    #[command(subcommand)]
    command: TemplatesCommand,
}

#[derive(Subcommand)]
enum TemplatesCommand {
    /// List the templates in matching priority order
    List {
        /// Catalog file (default: builtin catalog)
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Check a catalog file for invalid patterns
    Lint {
        /// Catalog file to check
        file: PathBuf,
    },
}

pub async fn run(args: TemplatesArgs) -> anyhow::Result<()> {
    match args.command {
        TemplatesCommand::List { file } => list_templates(file),
        TemplatesCommand::Lint { file } => lint_catalog(&file),
    }
}

fn list_templates(file: Option<PathBuf>) -> anyhow::Result<()> {
    let catalog = match file {
        Some(path) => TemplateCatalog::from_file(&path)?,
        None => TemplateCatalog::builtin(),
    };

    println!(
        "{} ({} templates)",
        if catalog.description.is_empty() {
            "Template catalog"
        } else {
            catalog.description.as_str()
        },
        catalog.templates.len()
    );
    println!();

    for (i, template) in catalog.templates.iter().enumerate() {
        let status = if template.enabled {
            style("enabled").green()
        } else {
            style("disabled").yellow()
        };
        println!("{:2}. {} [{}]", i + 1, style(&template.name).bold(), status);
        println!("    pattern: {}", template.pattern);
        if !template.description.is_empty() {
            println!("    {}", template.description);
        }
    }

    Ok(())
}

fn lint_catalog(file: &std::path::Path) -> anyhow::Result<()> {
    let catalog = TemplateCatalog::from_file(file)?;

    let mut invalid = 0;
    for template in &catalog.templates {
        match regex::Regex::new(&template.pattern) {
            Ok(_) => {}
            Err(e) => {
                invalid += 1;
                println!(
                    "{} template '{}': {}",
                    style("✗").red(),
                    template.name,
                    e
                );
            }
        }
    }

    if invalid == 0 {
        println!(
            "{} All {} patterns compile",
            style("✓").green(),
            catalog.templates.len()
        );
    } else {
        println!(
            "{} {} of {} patterns are invalid (they will be skipped at run time)",
            style("!").yellow(),
            invalid,
            catalog.templates.len()
        );
    }

    Ok(())
}
