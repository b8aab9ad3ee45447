//! `inwall decode` - break device codes into their segments

use miette::Result;
use serde::Serialize;

use crate::cli::helpers::{render, write_output};
use crate::cli::GlobalOpts;
use crate::core::device_code::{decode, DecodedCode};
use crate::core::Config;

#[derive(clap::Args, Debug)]
pub struct DecodeArgs {
    /// Device codes to decode, e.g. SP23C-1/2-CT
    #[arg(required = true)]
    pub codes: Vec<String>,
}

/// One decoded code, or why it could not be decoded
#[derive(Debug, Serialize)]
struct DecodeRow {
    code: String,
    valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    box_size_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    gang_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    connector_code: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    extra_connectors: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    box_part: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip)]
    cells: Vec<String>,
}

impl DecodeRow {
    fn valid(code: &str, decoded: &DecodedCode) -> Self {
        let extra_connectors: Vec<String> = decoded
            .extra_connectors
            .iter()
            .map(|c| c.to_string())
            .collect();
        let cells = vec![
            code.to_string(),
            decoded.box_code.clone(),
            decoded.size.to_string(),
            decoded.connector.to_string(),
            decoded.gang.to_string(),
            decoded.width.to_string(),
            decoded.ring.clone(),
            if extra_connectors.is_empty() {
                "-".to_string()
            } else {
                extra_connectors.join(" ")
            },
            decoded.box_part.clone(),
        ];

        Self {
            code: code.to_string(),
            valid: true,
            size: Some(decoded.size.to_string()),
            box_size_code: Some(decoded.box_size_code()),
            gang_code: Some(decoded.gang_code()),
            connector_code: Some(decoded.connector_code.clone()),
            extra_connectors,
            box_part: Some(decoded.box_part.clone()),
            error: None,
            cells,
        }
    }

    fn invalid(code: &str, error: String) -> Self {
        let mut cells = vec![code.to_string()];
        cells.extend(std::iter::repeat("-".to_string()).take(7));
        cells.push(error.clone());

        Self {
            code: code.to_string(),
            valid: false,
            size: None,
            box_size_code: None,
            gang_code: None,
            connector_code: None,
            extra_connectors: Vec::new(),
            box_part: None,
            error: Some(error),
            cells,
        }
    }
}

pub fn run(args: DecodeArgs, global: &GlobalOpts, config: &Config) -> Result<()> {
    let rows: Vec<DecodeRow> = args
        .codes
        .iter()
        .map(|code| match decode(code) {
            Ok(decoded) => DecodeRow::valid(code, &decoded),
            Err(e) => DecodeRow::invalid(code, e.to_string()),
        })
        .collect();

    let cells: Vec<Vec<String>> = rows.iter().map(|r| r.cells.clone()).collect();
    let format = global.format.resolve(config.default_format.as_deref());
    let output = render(
        format,
        &rows,
        &[
            "Code",
            "Box",
            "Size",
            "Connector",
            "Gang",
            "Width",
            "Ring",
            "Extras",
            "Box Part",
        ],
        &cells,
    )?;

    write_output(&output, None, global)
}
