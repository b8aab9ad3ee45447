//! `inwall template` - header row for a new box CSV

use miette::Result;

use crate::core::import::csv_template_header;
use crate::core::Config;

pub fn run(config: &Config) -> Result<()> {
    println!("{}", csv_template_header(config.bundle_column()));
    Ok(())
}
