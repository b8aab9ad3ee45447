//! `inwall legend` - shorthand aliases for a drawing legend

use miette::Result;
use std::path::PathBuf;

use crate::cli::helpers::{load_boxes, render, write_output};
use crate::cli::GlobalOpts;
use crate::core::expansion::process_boxes;
use crate::core::Config;

#[derive(clap::Args, Debug)]
pub struct LegendArgs {
    /// CSV file of box markups
    pub input: PathBuf,

    /// Output to file instead of stdout
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

pub fn run(args: LegendArgs, global: &GlobalOpts, config: &Config) -> Result<()> {
    let boxes = load_boxes(&args.input, config, global)?;
    let report = process_boxes(&boxes);

    let pairs: Vec<_> = report.shorthand.iter().collect();
    let rows: Vec<Vec<String>> = pairs
        .iter()
        .map(|p| vec![p.short.to_string(), p.long_code.clone()])
        .collect();

    let format = global.format.resolve(config.default_format.as_deref());
    let output = render(format, &pairs, &["Short", "Device Code"], &rows)?;
    write_output(&output, args.output, global)
}
