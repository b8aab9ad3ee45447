//! Box record sources - CSV rows and markup field maps
//!
//! Both adapters produce [`BoxConfiguration`] records in input order. Column
//! and field names are matched case-insensitively.

use csv::{ReaderBuilder, StringRecord};
use miette::Diagnostic;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, warn};

use crate::entities::box_config::{BoxConfiguration, ConnectorCounts};

/// Most connectors one box position can take; larger counts are rejected
pub const MAX_CONNECTORS: u32 = 16;

/// Default column holding the bundle name
pub const DEFAULT_BUNDLE_COLUMN: &str = "Bundle";

/// CSV columns every box export must carry
pub const CSV_COLUMNS: [&str; 13] = [
    "Subject",
    "Box Type",
    "Box Size",
    "Gang",
    "Plaster Ring Depth",
    "Entry Connector Type",
    "Connector Size",
    "Top Connectors - EMT",
    "Bottom Connectors - EMT",
    "Top Connectors - PVC",
    "Bottom Connectors - PVC",
    "Top Connectors - MC",
    "Bottom Connectors - MC",
];

/// Field names of one exported markup annotation
const MARKUP_FIELDS: [&str; 13] = [
    "Subject",
    "Box Type",
    "Box Size",
    "Gang",
    "Plaster Ring",
    "Conduit Entry Connector",
    "Connector Size",
    "Top EMT Connectors",
    "Bottom EMT Connectors",
    "Top PVC Connectors",
    "Bottom PVC Connectors",
    "Top MC Connectors",
    "Bottom MC Connectors",
];

#[derive(Debug, Error, Diagnostic)]
pub enum ImportError {
    #[error("failed to read {path}: {message}")]
    #[diagnostic(code(inwall::import::io))]
    Io { path: String, message: String },

    #[error("CSV error: {0}")]
    #[diagnostic(code(inwall::import::csv))]
    Csv(#[from] csv::Error),

    #[error("missing required column '{0}'")]
    #[diagnostic(
        code(inwall::import::column),
        help("run `inwall template` for the expected header row")
    )]
    MissingColumn(String),

    #[error("row {row}: missing field '{field}'")]
    #[diagnostic(code(inwall::import::field))]
    MissingField { row: usize, field: String },

    #[error("row {row}: '{value}' is not a valid count for '{field}'")]
    #[diagnostic(
        code(inwall::import::count),
        help("counts are whole numbers from 0 to 16")
    )]
    InvalidCount {
        row: usize,
        field: String,
        value: String,
    },
}

/// Records read from a CSV file plus the rows that were rejected
#[derive(Debug, Default)]
pub struct CsvImport {
    pub records: Vec<BoxConfiguration>,
    pub rejected: Vec<ImportError>,
}

/// Build a map from lowercased header name to column index
fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(i, h)| (h.trim().to_lowercase(), i))
        .collect()
}

fn get_field(record: &StringRecord, header_map: &HashMap<String, usize>, field: &str) -> String {
    header_map
        .get(&field.to_lowercase())
        .and_then(|&idx| record.get(idx))
        .map(|s| s.trim().to_string())
        .unwrap_or_default()
}

/// Parse a connector count; blank reads as zero
fn parse_count(value: &str, row: usize, field: &str) -> Result<u32, ImportError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(0);
    }
    value
        .parse::<u32>()
        .ok()
        .filter(|&n| n <= MAX_CONNECTORS)
        .ok_or_else(|| ImportError::InvalidCount {
            row,
            field: field.to_string(),
            value: value.to_string(),
        })
}

/// Build a configuration from the 13 box fields in canonical order
fn configuration_from_fields(
    fields: [String; 13],
    bundle: String,
    names: &[&str; 13],
    row: usize,
) -> Result<BoxConfiguration, ImportError> {
    let [
        subject,
        box_type,
        box_size,
        gang,
        plaster_ring,
        entry_connector_type,
        connector_size,
        top_emt,
        bottom_emt,
        top_pvc,
        bottom_pvc,
        top_mc,
        bottom_mc,
    ] = fields;

    let connectors = ConnectorCounts {
        top_emt: parse_count(&top_emt, row, names[7])?,
        bottom_emt: parse_count(&bottom_emt, row, names[8])?,
        top_pvc: parse_count(&top_pvc, row, names[9])?,
        bottom_pvc: parse_count(&bottom_pvc, row, names[10])?,
        top_mc: parse_count(&top_mc, row, names[11])?,
        bottom_mc: parse_count(&bottom_mc, row, names[12])?,
    };

    Ok(BoxConfiguration {
        subject,
        box_type,
        box_size,
        gang,
        plaster_ring,
        entry_connector_type,
        connector_size,
        connectors,
        bundle,
    })
}

/// Read box records from CSV.
///
/// A missing required column fails the whole import. A bad row is rejected
/// on its own and reading carries on; row numbers count the header as row 1.
pub fn read_csv<R: Read>(reader: R, bundle_column: &str) -> Result<CsvImport, ImportError> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let header_map = build_header_map(&headers);

    for column in CSV_COLUMNS {
        if !header_map.contains_key(&column.to_lowercase()) {
            return Err(ImportError::MissingColumn(column.to_string()));
        }
    }

    let mut import = CsvImport::default();
    for (row_idx, result) in rdr.records().enumerate() {
        let row = row_idx + 2;
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                warn!(row, error = %e, "rejecting CSV row");
                import.rejected.push(ImportError::Csv(e));
                continue;
            }
        };

        let fields = CSV_COLUMNS.map(|c| get_field(&record, &header_map, c));
        let bundle = get_field(&record, &header_map, bundle_column);
        match configuration_from_fields(fields, bundle, &CSV_COLUMNS, row) {
            Ok(cfg) => import.records.push(cfg),
            Err(e) => {
                warn!(row, error = %e, "rejecting CSV row");
                import.rejected.push(e);
            }
        }
    }

    debug!(
        records = import.records.len(),
        rejected = import.rejected.len(),
        "read box CSV"
    );
    Ok(import)
}

/// Read box records from a CSV file on disk
pub fn read_csv_file(path: &Path, bundle_column: &str) -> Result<CsvImport, ImportError> {
    let file = File::open(path).map_err(|e| ImportError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    read_csv(BufReader::new(file), bundle_column)
}

/// Build a record from the key/value fields of one exported markup.
///
/// `bundle` is the name of the bundle region the markup sits in, if any.
pub fn from_markup_fields(
    fields: &HashMap<String, String>,
    bundle: Option<&str>,
) -> Result<BoxConfiguration, ImportError> {
    let lowered: HashMap<String, &str> = fields
        .iter()
        .map(|(k, v)| (k.trim().to_lowercase(), v.trim()))
        .collect();

    let mut values: [String; 13] = Default::default();
    for (slot, name) in values.iter_mut().zip(MARKUP_FIELDS) {
        *slot = lowered
            .get(&name.to_lowercase())
            .map(|v| v.to_string())
            .ok_or_else(|| ImportError::MissingField {
                row: 1,
                field: name.to_string(),
            })?;
    }

    configuration_from_fields(
        values,
        bundle.unwrap_or_default().to_string(),
        &MARKUP_FIELDS,
        1,
    )
}

/// Header row for a blank box CSV, bundle column last
pub fn csv_template_header(bundle_column: &str) -> String {
    let mut columns: Vec<&str> = CSV_COLUMNS.to_vec();
    columns.push(bundle_column);
    columns.join(",")
}
