//! Shared helper functions for CLI commands
//!
//! This module contains utility functions that are used across multiple
//! command modules to avoid code duplication.

use console::style;
use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tabled::{builder::Builder, settings::Style};

use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::import;
use crate::core::Config;
use crate::entities::BoxConfiguration;

/// Escape a string for CSV output
///
/// Handles commas, quotes, and newlines according to RFC 4180.
pub fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

/// Display name for a bundle, `-` when the box has none
pub fn bundle_label(bundle: &str) -> &str {
    if bundle.is_empty() {
        "-"
    } else {
        bundle
    }
}

/// Render rows as a markdown table, TSV or CSV.
///
/// JSON and YAML serialize `data` instead of the rows.
pub fn render<T: Serialize + ?Sized>(
    format: OutputFormat,
    data: &T,
    header: &[&str],
    rows: &[Vec<String>],
) -> Result<String> {
    let output = match format {
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(data).into_diagnostic()?;
            json.push('\n');
            json
        }
        OutputFormat::Yaml => serde_yml::to_string(data).into_diagnostic()?,
        OutputFormat::Csv => delimited(header, rows, ",", escape_csv),
        OutputFormat::Tsv => delimited(header, rows, "\t", |s| s.replace('\t', " ")),
        OutputFormat::Md | OutputFormat::Auto => markdown_table(header, rows),
    };
    Ok(output)
}

/// Markdown table via tabled
pub fn markdown_table(header: &[&str], rows: &[Vec<String>]) -> String {
    let mut builder = Builder::default();
    builder.push_record(header.iter().copied());
    for row in rows {
        builder.push_record(row.iter().map(String::as_str));
    }
    let mut table = builder.build().with(Style::markdown()).to_string();
    table.push('\n');
    table
}

fn delimited(
    header: &[&str],
    rows: &[Vec<String>],
    sep: &str,
    escape: impl Fn(&str) -> String,
) -> String {
    let mut output = header.join(sep);
    output.push('\n');
    for row in rows {
        let cells: Vec<String> = row.iter().map(|c| escape(c)).collect();
        output.push_str(&cells.join(sep));
        output.push('\n');
    }
    output
}

/// Write output to a file or stdout
pub fn write_output(
    content: &str,
    output_path: Option<PathBuf>,
    global: &GlobalOpts,
) -> Result<()> {
    match output_path {
        Some(path) => {
            let file = File::create(&path).into_diagnostic()?;
            let mut writer = BufWriter::new(file);
            writer.write_all(content.as_bytes()).into_diagnostic()?;
            writer.flush().into_diagnostic()?;
            if !global.quiet {
                eprintln!(
                    "{} Written to {}",
                    style("✓").green(),
                    style(path.display()).yellow()
                );
            }
        }
        None => {
            print!("{}", content);
        }
    }
    Ok(())
}

/// Read box records from a CSV file, reporting rejected rows on stderr
pub fn load_boxes(
    path: &Path,
    config: &Config,
    global: &GlobalOpts,
) -> Result<Vec<BoxConfiguration>> {
    let imported = import::read_csv_file(path, config.bundle_column())?;

    if !global.quiet {
        for err in &imported.rejected {
            eprintln!("{} {}", style("✗").red(), err);
        }
        if !imported.rejected.is_empty() {
            eprintln!(
                "{} row(s) rejected from {}",
                style(imported.rejected.len()).red(),
                style(path.display()).yellow()
            );
        }
    }

    Ok(imported.records)
}
