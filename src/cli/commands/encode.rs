//! `inwall encode` - device code and shorthand per box

use console::style;
use miette::Result;
use std::path::PathBuf;

use crate::cli::helpers::{bundle_label, load_boxes, render, write_output};
use crate::cli::GlobalOpts;
use crate::core::expansion::{process_boxes, BatchReport};
use crate::core::Config;

#[derive(clap::Args, Debug)]
pub struct EncodeArgs {
    /// CSV file of box markups
    pub input: PathBuf,

    /// Show each distinct code with its box count instead of one row per box
    #[arg(long)]
    pub counts: bool,

    /// Output to file instead of stdout
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

pub fn run(args: EncodeArgs, global: &GlobalOpts, config: &Config) -> Result<()> {
    let boxes = load_boxes(&args.input, config, global)?;
    let report = process_boxes(&boxes);
    let format = global.format.resolve(config.default_format.as_deref());

    let output = if args.counts {
        let counts = report.device_counts();
        let rows: Vec<Vec<String>> = counts
            .iter()
            .map(|(code, n)| vec![code.clone(), n.to_string()])
            .collect();
        render(format, &counts, &["Device Code", "Count"], &rows)?
    } else {
        let rows: Vec<Vec<String>> = report
            .boxes
            .iter()
            .map(|b| {
                vec![
                    (b.index + 1).to_string(),
                    bundle_label(&b.bundle).to_string(),
                    b.device_code.clone(),
                    b.shorthand.clone(),
                ]
            })
            .collect();
        render(
            format,
            &report.boxes,
            &["Box", "Bundle", "Device Code", "Short"],
            &rows,
        )?
    };

    write_output(&output, args.output, global)?;
    print_skipped(&report, global);
    Ok(())
}

/// Report records left out of the run on stderr
pub(crate) fn print_skipped(report: &BatchReport, global: &GlobalOpts) {
    if global.quiet || report.skipped.is_empty() {
        return;
    }
    for skipped in &report.skipped {
        eprintln!(
            "{} Box {} ({}): {}",
            style("✗").red(),
            skipped.index + 1,
            style(&skipped.label).cyan(),
            skipped.error
        );
    }
    eprintln!(
        "{} box(es) skipped",
        style(report.skipped.len()).red()
    );
}
