//! `inwall bom` - merged parts list for a box CSV

use miette::{miette, Result};
use std::path::PathBuf;

use crate::cli::helpers::{bundle_label, load_boxes, markdown_table, render, write_output};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::expansion::process_boxes;
use crate::core::Config;
use crate::entities::{Part, PartCategory, PartCollection, PartTotal};

use super::encode::print_skipped;

#[derive(clap::Args, Debug)]
pub struct BomArgs {
    /// CSV file of box markups
    pub input: PathBuf,

    /// Only include these categories (repeatable; default: all)
    #[arg(long, short = 'c', value_delimiter = ',')]
    pub category: Vec<PartCategory>,

    /// Group device codes under their bundle
    #[arg(long, conflicts_with = "totals")]
    pub by_bundle: bool,

    /// One merged total across every box
    #[arg(long)]
    pub totals: bool,

    /// Output to file instead of stdout
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

const PART_HEADER: [&str; 3] = ["Part", "Category", "Qty"];

fn part_cells(part: &Part) -> Vec<String> {
    vec![
        part.name.clone(),
        part.category.to_string(),
        part.quantity.to_string(),
    ]
}

/// Categories from the flag, else from config, else all
fn resolve_categories(args: &BomArgs, config: &Config) -> Result<Vec<PartCategory>> {
    if !args.category.is_empty() {
        return Ok(args.category.clone());
    }
    match &config.categories {
        Some(names) if !names.is_empty() => names
            .iter()
            .map(|n| {
                n.parse::<PartCategory>()
                    .map_err(|e| miette!("invalid category in config: {}", e))
            })
            .collect(),
        _ => Ok(PartCategory::all().to_vec()),
    }
}

pub fn run(args: BomArgs, global: &GlobalOpts, config: &Config) -> Result<()> {
    let categories = resolve_categories(&args, config)?;
    let boxes = load_boxes(&args.input, config, global)?;
    let report = process_boxes(&boxes);
    let format = global.format.resolve(config.default_format.as_deref());

    let output = if args.totals {
        let total = PartTotal::from_collections(&report.collections, &categories);
        let rows: Vec<Vec<String>> = total.parts().map(part_cells).collect();
        match format {
            OutputFormat::Md | OutputFormat::Auto => {
                let mut out = String::from("# Parts Total\n\n");
                out.push_str(&markdown_table(&PART_HEADER, &rows));
                out
            }
            _ => render(format, &total, &PART_HEADER, &rows)?,
        }
    } else if args.by_bundle {
        let groups =
            PartCollection::totals_by_bundle_then_category(&report.collections, &categories);
        match format {
            OutputFormat::Md | OutputFormat::Auto => {
                let mut out = String::new();
                for (bundle, collections) in &groups {
                    out.push_str(&format!("# Bundle: {}\n\n", bundle_label(bundle)));
                    for coll in collections {
                        push_collection_md(&mut out, coll);
                    }
                }
                out
            }
            _ => {
                let rows: Vec<Vec<String>> = groups
                    .values()
                    .flatten()
                    .flat_map(collection_rows)
                    .collect();
                render(format, &groups, &ROW_HEADER, &rows)?
            }
        }
    } else {
        let collections = PartCollection::totals_by_category(&report.collections, &categories);
        match format {
            OutputFormat::Md | OutputFormat::Auto => {
                let mut out = String::new();
                for coll in &collections {
                    push_collection_md(&mut out, coll);
                }
                out
            }
            _ => {
                let rows: Vec<Vec<String>> = collections.iter().flat_map(collection_rows).collect();
                render(format, &collections, &ROW_HEADER, &rows)?
            }
        }
    };

    write_output(&output, args.output, global)?;
    print_skipped(&report, global);
    Ok(())
}

const ROW_HEADER: [&str; 5] = ["Bundle", "Device Code", "Part", "Category", "Qty"];

/// Flat rows for one collection, for TSV and CSV
fn collection_rows(coll: &PartCollection) -> Vec<Vec<String>> {
    coll.parts()
        .map(|p| {
            let mut row = vec![coll.bundle_name.clone(), coll.device_code.clone()];
            row.extend(part_cells(p));
            row
        })
        .collect()
}

fn push_collection_md(out: &mut String, coll: &PartCollection) {
    out.push_str(&format!(
        "## {} ({})\n\n",
        coll.device_code,
        bundle_label(&coll.bundle_name)
    ));
    let rows: Vec<Vec<String>> = coll.parts().map(part_cells).collect();
    out.push_str(&markdown_table(&PART_HEADER, &rows));
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(category: Vec<PartCategory>) -> BomArgs {
        BomArgs {
            input: PathBuf::from("boxes.csv"),
            category,
            by_bundle: false,
            totals: false,
            output: None,
        }
    }

    #[test]
    fn test_categories_default_to_all() {
        let cats = resolve_categories(&args(vec![]), &Config::default()).unwrap();
        assert_eq!(cats, PartCategory::all().to_vec());
    }

    #[test]
    fn test_categories_flag_beats_config() {
        let config = Config {
            categories: Some(vec!["clip".to_string()]),
            ..Config::default()
        };
        let cats = resolve_categories(&args(vec![PartCategory::Box]), &config).unwrap();
        assert_eq!(cats, vec![PartCategory::Box]);

        let cats = resolve_categories(&args(vec![]), &config).unwrap();
        assert_eq!(cats, vec![PartCategory::Clip]);
    }

    #[test]
    fn test_bad_config_category() {
        let config = Config {
            categories: Some(vec!["widgets".to_string()]),
            ..Config::default()
        };
        assert!(resolve_categories(&args(vec![]), &config).is_err());
    }
}
