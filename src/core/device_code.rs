//! Device codes - the canonical string encoding of a box configuration
//!
//! A device code such as `SP23C-1/2-CT-CT` packs the box body, gang and
//! entry connector into its first segment, the plaster ring depth into the
//! second, and one token per extra connector after that.
//!
//! First segment layout, by length:
//!
//! | len | layout                                   | example  |
//! |-----|------------------------------------------|----------|
//! | 3   | box, gang, connector                     | `P2M`    |
//! | 4   | box, gang, connector(2) or box(2), gang, connector | `P23C`, `SP2M` |
//! | 5   | box(2), gang, connector(2)               | `SP23C`  |
//! | 6   | box(2), gang, marker, connector(2)       | `SP2²3C` |

use miette::Diagnostic;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

use crate::core::catalog::{BoxWidth, ConnectorSize, PartsCatalog};
use crate::entities::box_config::BoxConfiguration;

/// Marker for a doubled ("squared") box
pub const SQUARED_MARKER: char = '\u{00B2}';

/// Errors raised while encoding or decoding device codes
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum CodeError {
    #[error("connector size '{0}' could not be resolved")]
    #[diagnostic(
        code(inwall::code::connector_size),
        help("valid sizes are 1/2\", 3/4\", 1\", 1 1/4\", 1 1/2\" and 2\"")
    )]
    UnresolvableConnectorSize(String),

    #[error("device code '{code}' has no catalog entry for '{key}'")]
    #[diagnostic(code(inwall::code::catalog))]
    UnresolvableCatalogEntry { code: String, key: String },

    #[error("malformed device code '{0}'")]
    #[diagnostic(
        code(inwall::code::malformed),
        help("a device code needs a box segment and a plaster ring segment, e.g. SP23C-1/2")
    )]
    MalformedCode(String),
}

/// Electrical role of the box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoxKind {
    Powered,
    NonPowered,
    FireAlarm,
}

impl BoxKind {
    pub fn letter(&self) -> char {
        match self {
            BoxKind::Powered => 'P',
            BoxKind::NonPowered => 'N',
            BoxKind::FireAlarm => 'F',
        }
    }
}

/// Body size variant of the box
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum BoxSize {
    #[default]
    Standard,
    Small,
    Extended,
}

impl BoxSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            BoxSize::Standard => "standard",
            BoxSize::Small => "small",
            BoxSize::Extended => "extended",
        }
    }
}

impl fmt::Display for BoxSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Extra connector position and material
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExtraConnector {
    /// EMT, top
    Ct,
    /// EMT, bottom
    Cb,
    /// PVC, top
    Pt,
    /// PVC, bottom
    Pb,
    /// MC, top
    Mt,
    /// MC, bottom
    Mb,
}

impl ExtraConnector {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExtraConnector::Ct => "CT",
            ExtraConnector::Cb => "CB",
            ExtraConnector::Pt => "PT",
            ExtraConnector::Pb => "PB",
            ExtraConnector::Mt => "MT",
            ExtraConnector::Mb => "MB",
        }
    }
}

impl fmt::Display for ExtraConnector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ExtraConnector {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "CT" => Ok(ExtraConnector::Ct),
            "CB" => Ok(ExtraConnector::Cb),
            "PT" => Ok(ExtraConnector::Pt),
            "PB" => Ok(ExtraConnector::Pb),
            "MT" => Ok(ExtraConnector::Mt),
            "MB" => Ok(ExtraConnector::Mb),
            _ => Err(format!("not an extra connector token: {}", s)),
        }
    }
}

/// Build the device code for a box configuration
pub fn encode(config: &BoxConfiguration) -> Result<String, CodeError> {
    let mut code = String::new();

    if config.box_size.eq_ignore_ascii_case("small") {
        code.push('S');
    } else if config.box_size.eq_ignore_ascii_case("extended") {
        code.push('X');
    }

    if config.is_fire_alarm() {
        code.push(BoxKind::FireAlarm.letter());
    } else if config.box_type.eq_ignore_ascii_case("powered") {
        code.push(BoxKind::Powered.letter());
    } else if config.box_type.eq_ignore_ascii_case("non-powered") {
        code.push(BoxKind::NonPowered.letter());
    }

    let gang = config.gang.trim();
    match gang {
        "1" | "2" | "3" | "4" => code.push_str(gang),
        g if g.eq_ignore_ascii_case("round") => code.push('R'),
        g if g.eq_ignore_ascii_case("e") || g.eq_ignore_ascii_case("extended") => code.push('E'),
        _ => {}
    }

    let entry = config.entry_connector_type.trim();
    if entry.eq_ignore_ascii_case("mc") {
        code.push('M');
    } else if entry.eq_ignore_ascii_case("emt") || entry.eq_ignore_ascii_case("pvc") {
        let size = strip_unit(&config.connector_size);
        let token = PartsCatalog::size_token(size)
            .ok_or_else(|| CodeError::UnresolvableConnectorSize(config.connector_size.clone()))?;
        code.push_str(token);
        code.push('C');
    }

    if config.plaster_ring.trim().eq_ignore_ascii_case("adjustable") {
        code.push_str("-A");
    } else {
        code.push('-');
        code.push_str(strip_unit(&config.plaster_ring));
    }

    let counts = &config.connectors;
    let runs = [
        (counts.top_emt, ExtraConnector::Ct),
        (counts.bottom_emt, ExtraConnector::Cb),
        (counts.top_pvc, ExtraConnector::Pt),
        (counts.bottom_pvc, ExtraConnector::Pb),
        (counts.top_mc, ExtraConnector::Mt),
        (counts.bottom_mc, ExtraConnector::Mb),
    ];
    for (count, tag) in runs {
        for _ in 0..count {
            code.push('-');
            code.push_str(tag.as_str());
        }
    }

    debug!(subject = %config.subject, code = %code, "encoded box");
    Ok(code)
}

/// Drop a trailing inch mark from an authored size
fn strip_unit(value: &str) -> &str {
    value.trim().trim_end_matches('"').trim_end()
}

/// A device code split into its segments and resolved against the catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedCode {
    /// The code as given
    pub raw: String,
    /// Box body letters (`"SP"`, `"F"` ...)
    pub box_code: String,
    pub size: BoxSize,
    pub kind: BoxKind,
    /// Gang character (`'1'`..`'4'`, `'R'`, `'E'`)
    pub gang: char,
    /// Connector token as written (`"3C"`, `"M"`)
    pub connector_code: String,
    pub connector: ConnectorSize,
    pub width: BoxWidth,
    /// Plaster ring designator (`"1/2"`, `"A"` ...)
    pub ring: String,
    pub extra_connectors: Vec<ExtraConnector>,
    /// Whether the code carries the doubled-box marker
    pub squared: bool,
    /// Catalog name of the box body
    pub box_part: String,
}

impl DecodedCode {
    /// Box table key, e.g. `SP|3/4`
    pub fn box_size_code(&self) -> String {
        format!("{}|{}", self.box_code, self.connector.as_str())
    }

    /// Plaster ring table key, e.g. `4|2|1/2`
    pub fn gang_code(&self) -> String {
        format!("{}|{}|{}", self.width.as_str(), self.gang, self.ring)
    }

    /// Whether the body itself is the metal-clad variant
    pub fn metal_clad_body(&self) -> bool {
        self.box_code.contains('M')
    }
}

/// First-segment slices before catalog resolution
struct Segments {
    box_code: String,
    gang: char,
    connector_code: String,
}

fn slice_first_segment(first: &str) -> Option<Segments> {
    let c: Vec<char> = first.chars().collect();
    let s = |chars: &[char]| chars.iter().collect::<String>();

    let (box_code, gang, connector_code) = match c.len() {
        3 => (s(&c[0..1]), c[1], s(&c[2..3])),
        4 => {
            if c[1].is_ascii_digit() || c[1] == 'R' || c[1] == 'E' {
                (s(&c[0..1]), c[1], s(&c[2..4]))
            } else {
                (s(&c[0..2]), c[2], s(&c[3..4]))
            }
        }
        5 => (s(&c[0..2]), c[2], s(&c[3..5])),
        // char 3 is the doubled-box marker
        6 => (s(&c[0..2]), c[2], s(&c[4..6])),
        _ => return None,
    };

    Some(Segments {
        box_code,
        gang,
        connector_code,
    })
}

fn classify(box_code: &str) -> Option<(BoxSize, BoxKind)> {
    let mut chars = box_code.chars();
    let (size, kind_letter) = match (chars.next(), chars.next(), chars.next()) {
        (Some('S'), Some(k), None) => (BoxSize::Small, k),
        (Some('X'), Some(k), None) => (BoxSize::Extended, k),
        (Some(k), None, None) => (BoxSize::Standard, k),
        _ => return None,
    };
    let kind = match kind_letter {
        'P' => BoxKind::Powered,
        'N' => BoxKind::NonPowered,
        'F' => BoxKind::FireAlarm,
        _ => return None,
    };
    Some((size, kind))
}

/// Split a device code into its segments and resolve them against the catalog.
///
/// Never panics; any code that cannot be fully resolved comes back as an
/// error so batch callers can skip it and carry on.
pub fn decode(raw: &str) -> Result<DecodedCode, CodeError> {
    let catalog = PartsCatalog::global();
    let malformed = || CodeError::MalformedCode(raw.to_string());

    let parts: Vec<&str> = raw.split('-').collect();
    if parts.len() < 2 {
        return Err(malformed());
    }
    let first = parts[0].trim();
    let rest: Vec<&str> = parts[1..].iter().map(|p| p.trim()).collect();

    let segments = slice_first_segment(first).ok_or_else(malformed)?;

    let connector = catalog
        .connector_size(&segments.connector_code)
        .ok_or_else(|| CodeError::UnresolvableCatalogEntry {
            code: raw.to_string(),
            key: segments.connector_code.clone(),
        })?;

    let box_key = format!("{}|{}", segments.box_code, connector.as_str());
    let box_part = catalog
        .box_part(&segments.box_code, connector)
        .ok_or_else(|| CodeError::UnresolvableCatalogEntry {
            code: raw.to_string(),
            key: box_key.clone(),
        })?;

    let (size, kind) = classify(&segments.box_code).ok_or_else(|| {
        CodeError::UnresolvableCatalogEntry {
            code: raw.to_string(),
            key: box_key,
        }
    })?;

    let squared = raw.contains(SQUARED_MARKER);
    let width = if squared {
        BoxWidth::Four
    } else {
        BoxWidth::from_part_name(box_part)
    };

    let extra_connectors = rest
        .iter()
        .filter_map(|token| token.parse::<ExtraConnector>().ok())
        .collect();

    let decoded = DecodedCode {
        raw: raw.to_string(),
        box_code: segments.box_code,
        size,
        kind,
        gang: segments.gang,
        connector_code: segments.connector_code,
        connector,
        width,
        ring: rest[0].to_string(),
        extra_connectors,
        squared,
        box_part: box_part.to_string(),
    };
    debug!(code = raw, gang_code = %decoded.gang_code(), "decoded device code");
    Ok(decoded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::box_config::ConnectorCounts;

    fn small_non_powered() -> BoxConfiguration {
        BoxConfiguration {
            subject: "P3 Box".to_string(),
            box_type: "non-powered".to_string(),
            box_size: "small".to_string(),
            gang: "2".to_string(),
            plaster_ring: "1/2\"".to_string(),
            entry_connector_type: "EMT".to_string(),
            connector_size: "3/4\"".to_string(),
            connectors: ConnectorCounts {
                top_emt: 1,
                ..Default::default()
            },
            bundle: String::new(),
        }
    }

    #[test]
    fn test_encode_small_non_powered() {
        assert_eq!(encode(&small_non_powered()).unwrap(), "SN23C-1/2-CT");
    }

    #[test]
    fn test_encode_decode_roundtrip() {
        let code = encode(&small_non_powered()).unwrap();
        let decoded = decode(&code).unwrap();

        assert_eq!(decoded.box_code, "SN");
        assert_eq!(decoded.size, BoxSize::Small);
        assert_eq!(decoded.kind, BoxKind::NonPowered);
        assert_eq!(decoded.box_size_code(), "SN|3/4");
        assert_eq!(decoded.connector_code, "3C");
        assert_eq!(decoded.connector, ConnectorSize::Conduit("3/4"));
        assert_eq!(decoded.gang_code(), "4|2|1/2");
        assert!(decoded.gang_code().starts_with("4|2"));
        assert_eq!(decoded.extra_connectors, vec![ExtraConnector::Ct]);
        assert!(!decoded.squared);
    }

    #[test]
    fn test_encode_fire_alarm_takes_precedence() {
        let cfg = BoxConfiguration {
            subject: "Fire Alarm Box".to_string(),
            box_type: "powered".to_string(),
            box_size: "extended".to_string(),
            gang: "E".to_string(),
            plaster_ring: "5/8\"".to_string(),
            entry_connector_type: "MC".to_string(),
            connector_size: String::new(),
            ..Default::default()
        };
        assert_eq!(encode(&cfg).unwrap(), "XFEM-5/8");
    }

    #[test]
    fn test_encode_adjustable_ring_and_connector_order() {
        let cfg = BoxConfiguration {
            box_type: "powered".to_string(),
            gang: "round".to_string(),
            plaster_ring: "adjustable".to_string(),
            entry_connector_type: "PVC".to_string(),
            connector_size: "1\"".to_string(),
            connectors: ConnectorCounts {
                top_emt: 1,
                bottom_emt: 1,
                top_pvc: 1,
                bottom_pvc: 1,
                top_mc: 1,
                bottom_mc: 2,
            },
            ..Default::default()
        };
        assert_eq!(encode(&cfg).unwrap(), "PR4C-A-CT-CB-PT-PB-MT-MB-MB");
    }

    #[test]
    fn test_encode_unresolvable_connector_size() {
        let mut cfg = small_non_powered();
        cfg.connector_size = "2 1/2\"".to_string();
        assert_eq!(
            encode(&cfg),
            Err(CodeError::UnresolvableConnectorSize("2 1/2\"".to_string()))
        );
    }

    #[test]
    fn test_decode_length_three() {
        let decoded = decode("P2M-1/2").unwrap();
        assert_eq!(decoded.box_code, "P");
        assert_eq!(decoded.gang, '2');
        assert_eq!(decoded.connector, ConnectorSize::MetalClad);
        assert!(decoded.extra_connectors.is_empty());
    }

    #[test]
    fn test_decode_length_four_disambiguation() {
        let one_letter_box = decode("P23C-1/2").unwrap();
        assert_eq!(one_letter_box.box_code, "P");
        assert_eq!(one_letter_box.gang, '2');
        assert_eq!(one_letter_box.connector_code, "3C");

        let round = decode("NR2C-A").unwrap();
        assert_eq!(round.box_code, "N");
        assert_eq!(round.gang, 'R');
        assert_eq!(round.gang_code(), "4|R|A");

        let two_letter_box = decode("SP2M-1/2").unwrap();
        assert_eq!(two_letter_box.box_code, "SP");
        assert_eq!(two_letter_box.gang, '2');
        assert_eq!(two_letter_box.connector, ConnectorSize::MetalClad);
    }

    #[test]
    fn test_decode_extended_box_width() {
        let decoded = decode("XP44C-1").unwrap();
        assert_eq!(decoded.size, BoxSize::Extended);
        assert_eq!(decoded.width, BoxWidth::FourElevenSixteenths);
        assert_eq!(decoded.gang_code(), "4 11/16|4|1");
    }

    #[test]
    fn test_decode_extended_box_width_follows_part_name() {
        // the 3/4" & 1/2" KO bodies carry a 4" mark in their names
        for (code, gang_code) in [
            ("XP23C-1/2", "4|2|1/2"),
            ("XN22C-1/2", "4|2|1/2"),
            ("XFE3C-5/8", "4|E|5/8"),
            ("XP2M-1/2", "4|2|1/2"),
            ("XP24C-1/2", "4 11/16|2|1/2"),
        ] {
            assert_eq!(decode(code).unwrap().gang_code(), gang_code, "{}", code);
        }
    }

    #[test]
    fn test_decode_squared_marker() {
        let decoded = decode("XP2\u{00B2}3C-1/2").unwrap();
        assert!(decoded.squared);
        assert_eq!(decoded.box_code, "XP");
        assert_eq!(decoded.connector_code, "3C");
        assert_eq!(decoded.width, BoxWidth::Four);
    }

    #[test]
    fn test_decode_extra_connectors_case_insensitive() {
        let decoded = decode("SP23C-1/2-ct-Pb-xx-MB").unwrap();
        assert_eq!(
            decoded.extra_connectors,
            vec![ExtraConnector::Ct, ExtraConnector::Pb, ExtraConnector::Mb]
        );
    }

    #[test]
    fn test_decode_too_few_segments() {
        assert_eq!(
            decode("SP23C"),
            Err(CodeError::MalformedCode("SP23C".to_string()))
        );
        assert!(decode("").is_err());
    }

    #[test]
    fn test_decode_bad_first_segment_length() {
        assert!(matches!(decode("SPXX23C-1/2"), Err(CodeError::MalformedCode(_))));
        assert!(matches!(decode("P2-1/2"), Err(CodeError::MalformedCode(_))));
    }

    #[test]
    fn test_decode_unresolvable_entries() {
        // unknown connector token
        assert!(matches!(
            decode("SP27C-1/2"),
            Err(CodeError::UnresolvableCatalogEntry { .. })
        ));
        // no box body for 1 1/4" entries
        assert!(matches!(
            decode("SP25C-1/2"),
            Err(CodeError::UnresolvableCatalogEntry { ref key, .. }) if key == "SP|1 1/4"
        ));
    }
}
