//! Parts expansion - device codes to merged parts lists
//!
//! Each `(device code, bundle)` item is decoded, its box, plaster ring and
//! derived hardware are looked up in the catalog, and the result is folded
//! into one [`PartCollection`] per distinct `(code, bundle)` pair. Items
//! that cannot be decoded or resolved are skipped; a batch never aborts on
//! a single bad record.

use std::collections::HashMap;
use tracing::{debug, info, warn};

use crate::core::catalog::{ConnectorSize, PartsCatalog, GROUND_STINGER, LONG_SCREW, TEK_SCREW};
use crate::core::device_code::{self, BoxKind, CodeError, DecodedCode};
use crate::core::shorthand::ShorthandResolver;
use crate::entities::box_config::BoxConfiguration;
use crate::entities::part::{Part, PartCategory, PartCollection};

/// Mounting screws per box
const SCREWS_PER_BOX: u32 = 4;
/// Conduit or cable run allowed per powered box
const POWERED_RUN: u32 = 15;
/// Conduit or cable run allowed per non-powered or fire alarm box
const LOW_VOLTAGE_RUN: u32 = 10;
/// Straps per conduit run
const CONDUIT_STRAPS: u32 = 3;
/// Run length covered by one cable strap
const CABLE_STRAP_SPACING: u32 = 4;

/// Every part one box needs: body, plaster ring and derived hardware.
///
/// Pure apart from catalog reads, so it can run for many boxes at once; the
/// merge into collections is what has to stay ordered.
pub fn box_parts(decoded: &DecodedCode, catalog: &PartsCatalog) -> Result<Vec<Part>, CodeError> {
    let missing = |key: String| CodeError::UnresolvableCatalogEntry {
        code: decoded.raw.clone(),
        key,
    };

    let box_part = catalog
        .box_part(&decoded.box_code, decoded.connector)
        .ok_or_else(|| missing(decoded.box_size_code()))?;
    // required for the code to be buildable even though the entry connector
    // itself is not listed on the parts list
    catalog
        .connector_part(decoded.connector)
        .ok_or_else(|| missing(decoded.connector.as_str().to_string()))?;
    let ring = catalog
        .plaster_ring(decoded.width, &decoded.gang.to_string(), &decoded.ring)
        .ok_or_else(|| missing(decoded.gang_code()))?;
    let conduit = catalog
        .conduit(decoded.connector)
        .ok_or_else(|| missing(decoded.connector.as_str().to_string()))?;

    let mut parts = Vec::new();

    if let ConnectorSize::Conduit(size) = decoded.connector {
        if let Some(clip) = catalog.conduit_clip(size, decoded.metal_clad_body()) {
            parts.push(Part::new(clip, 1, PartCategory::Clip));
        }
    }

    let run = match decoded.kind {
        BoxKind::Powered => {
            parts.push(Part::new(GROUND_STINGER, 1, PartCategory::Stinger));
            POWERED_RUN
        }
        BoxKind::NonPowered | BoxKind::FireAlarm => LOW_VOLTAGE_RUN,
    };
    parts.push(Part::new(TEK_SCREW, SCREWS_PER_BOX, PartCategory::Hardware));
    parts.push(Part::new(conduit, run, PartCategory::Hardware));
    let straps = if decoded.connector.is_metal_clad() {
        run.div_ceil(CABLE_STRAP_SPACING)
    } else {
        CONDUIT_STRAPS
    };
    parts.push(Part::new(catalog.strap(decoded.connector), straps, PartCategory::Hardware));

    // extra connectors are only fitted to conduit entries
    if !decoded.connector.is_metal_clad() {
        for tag in &decoded.extra_connectors {
            match catalog.extra_connector(tag.as_str(), decoded.connector) {
                Some(name) => parts.push(Part::new(name, 1, PartCategory::Connector)),
                None => debug!(code = %decoded.raw, tag = %tag, "no extra connector part"),
            }
        }
    }

    if decoded.squared {
        parts.push(Part::new(LONG_SCREW, 1, PartCategory::Hardware));
    }

    parts.push(Part::new(box_part, 1, PartCategory::Box));
    parts.push(Part::new(ring, 1, PartCategory::PlasterRing));

    Ok(parts)
}

/// Folds expanded boxes into collections keyed by `(device code, bundle)`
#[derive(Debug)]
pub struct ExpansionEngine {
    catalog: &'static PartsCatalog,
    /// Collections in first-seen order
    collections: Vec<PartCollection>,
    index: HashMap<(String, String), usize>,
}

impl Default for ExpansionEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ExpansionEngine {
    pub fn new() -> Self {
        Self {
            catalog: PartsCatalog::global(),
            collections: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Expand one box and merge it in. On error nothing is merged.
    pub fn add(&mut self, raw_code: &str, bundle: &str) -> Result<(), CodeError> {
        let decoded = device_code::decode(raw_code)?;
        let parts = box_parts(&decoded, self.catalog)?;

        let key = (raw_code.to_string(), bundle.to_string());
        match self.index.get(&key) {
            Some(&idx) => {
                let coll = &mut self.collections[idx];
                for part in parts {
                    coll.add_part(part);
                }
            }
            None => {
                self.index.insert(key, self.collections.len());
                self.collections
                    .push(PartCollection::with_parts(raw_code, bundle, parts));
            }
        }
        Ok(())
    }

    pub fn collections(&self) -> &[PartCollection] {
        &self.collections
    }

    pub fn into_collections(self) -> Vec<PartCollection> {
        self.collections
    }
}

/// Expand `(device code, bundle)` items in order, skipping the ones that fail
pub fn expand<I, C, B>(items: I) -> Vec<PartCollection>
where
    I: IntoIterator<Item = (C, B)>,
    C: AsRef<str>,
    B: AsRef<str>,
{
    let mut engine = ExpansionEngine::new();
    for (code, bundle) in items {
        if let Err(e) = engine.add(code.as_ref(), bundle.as_ref()) {
            warn!(code = code.as_ref(), error = %e, "skipping device code");
        }
    }
    engine.into_collections()
}

/// A record that made it through encoding
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct EncodedBox {
    /// Position in the input, from 0
    pub index: usize,
    pub device_code: String,
    pub shorthand: String,
    pub bundle: String,
}

/// A record left out of the parts list and why
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRecord {
    /// Position in the input, from 0
    pub index: usize,
    /// Device code if one was built, else the record subject
    pub label: String,
    pub error: CodeError,
}

/// Everything one processing run produces
#[derive(Debug, Default)]
pub struct BatchReport {
    pub boxes: Vec<EncodedBox>,
    pub collections: Vec<PartCollection>,
    pub shorthand: ShorthandResolver,
    pub skipped: Vec<SkippedRecord>,
}

impl BatchReport {
    /// Each distinct device code with how many boxes carry it, first-seen order
    pub fn device_counts(&self) -> Vec<(String, usize)> {
        let mut counts: Vec<(String, usize)> = Vec::new();
        let mut index: HashMap<&str, usize> = HashMap::new();
        for b in &self.boxes {
            match index.get(b.device_code.as_str()) {
                Some(&i) => counts[i].1 += 1,
                None => {
                    index.insert(b.device_code.as_str(), counts.len());
                    counts.push((b.device_code.clone(), 1));
                }
            }
        }
        counts
    }
}

/// Run the whole pipeline over box records in input order: encode, assign
/// shorthand aliases, expand and merge.
pub fn process_boxes(records: &[BoxConfiguration]) -> BatchReport {
    let mut report = BatchReport::default();
    let mut engine = ExpansionEngine::new();

    for (index, record) in records.iter().enumerate() {
        let code = match device_code::encode(record) {
            Ok(code) => code,
            Err(error) => {
                warn!(index, subject = %record.subject, error = %error, "skipping box");
                report.skipped.push(SkippedRecord {
                    index,
                    label: record.subject.clone(),
                    error,
                });
                continue;
            }
        };

        let shorthand = report.shorthand.store(&code);
        report.boxes.push(EncodedBox {
            index,
            device_code: code.clone(),
            shorthand,
            bundle: record.bundle.clone(),
        });

        if let Err(error) = engine.add(&code, &record.bundle) {
            warn!(index, code = %code, error = %error, "skipping box");
            report.skipped.push(SkippedRecord {
                index,
                label: code,
                error,
            });
        }
    }

    report.collections = engine.into_collections();
    info!(
        boxes = records.len(),
        collections = report.collections.len(),
        skipped = report.skipped.len(),
        "expanded boxes"
    );
    report
}
