//! Parts catalog - lookup tables from code segments to catalog part names
//!
//! The tables are built once on first use and never change afterwards, so
//! every lookup hands back `'static` borrows into the shared catalog.

use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::fmt;

/// Trade sizes for conduit entries and the digit that stands for each in a device code
pub const CONDUIT_SIZES: [(&str, &str); 6] = [
    ("1/2", "2"),
    ("3/4", "3"),
    ("1", "4"),
    ("1 1/4", "5"),
    ("1 1/2", "6"),
    ("2", "8"),
];

/// Plaster ring depths carried for every gang
const RING_DEPTHS: [&str; 8] = ["1/4", "1/2", "5/8", "3/4", "1", "1 1/4", "1 1/2", "2"];

/// Depths stocked for the red life-safety ring
const LIFE_SAFETY_RING_DEPTHS: [&str; 2] = ["5/8", "1 1/4"];

pub const GROUND_STINGER: &str = "Ground Stinger #12 Copper";
pub const TEK_SCREW: &str = "Wafer Head Tek Screw";
pub const LONG_SCREW: &str = "1/4\"x20 - 1/2\" Long Screw";
pub const MC_STRAP: &str = "Conduit Strap - 1/2\"";

/// Entry connector size decoded from a device code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectorSize {
    /// Conduit entry with its trade size (`"3/4"`, `"1 1/4"` ...)
    Conduit(&'static str),
    /// Metal-clad cable entry
    MetalClad,
}

impl ConnectorSize {
    /// Catalog key: the trade size, or `"M"` for metal-clad
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectorSize::Conduit(size) => *size,
            ConnectorSize::MetalClad => "M",
        }
    }

    pub fn is_metal_clad(&self) -> bool {
        matches!(self, ConnectorSize::MetalClad)
    }
}

impl fmt::Display for ConnectorSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectorSize::Conduit(size) => write!(f, "{}\"", size),
            ConnectorSize::MetalClad => write!(f, "MC"),
        }
    }
}

/// Nominal width of a square box body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoxWidth {
    Four,
    FourElevenSixteenths,
}

impl BoxWidth {
    /// Width implied by a box body name: any `4"` in the name reads as a 4"
    /// box. The knockout text `3/4"` matches too, so only the `1" KO`
    /// extended bodies come out as 4 11/16.
    pub fn from_part_name(name: &str) -> Self {
        if name.contains("4\"") {
            BoxWidth::Four
        } else {
            BoxWidth::FourElevenSixteenths
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BoxWidth::Four => "4",
            BoxWidth::FourElevenSixteenths => "4 11/16",
        }
    }
}

impl fmt::Display for BoxWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Immutable lookup tables for every part the expansion can emit
#[derive(Debug)]
pub struct PartsCatalog {
    /// `"<box code>|<size>"` -> box body
    boxes: HashMap<String, String>,
    /// Connector token (`"3C"`, `"M"`) -> entry size
    connector_sizes: HashMap<String, ConnectorSize>,
    /// Size key -> entry connector part
    connectors: HashMap<&'static str, String>,
    /// Size key -> conduit or cable material
    conduits: HashMap<&'static str, String>,
    /// `"<width>|<gang>|<depth>"` -> plaster ring
    plaster_rings: HashMap<String, String>,
    /// `"<position tag>|<size>"` -> extra connector part
    extra_connectors: HashMap<String, String>,
}

static CATALOG: Lazy<PartsCatalog> = Lazy::new(PartsCatalog::build);

impl PartsCatalog {
    /// The process-wide catalog
    pub fn global() -> &'static PartsCatalog {
        &CATALOG
    }

    fn build() -> Self {
        let mut boxes = HashMap::new();
        let bodies = [
            ("SP", "4\" Square Box - 1-1/2\" Deep"),
            ("SN", "4\" Square Box - 1-1/2\" Deep"),
            ("XP", "4-11/16\" Square Box - 2-1/8\" Deep"),
            ("XN", "4-11/16\" Square Box - 2-1/8\" Deep"),
            ("XF", "4-11/16\" Red Life Saftey Square Box - 2-1/8\" Deep"),
            ("F", "4\" Red Life Saftey Square Box - 3-1/2\" Deep"),
            ("P", "4\" Square Box - 2-1/8\" Deep"),
            ("N", "4\" Square Box - 2-1/8\" Deep"),
        ];
        for (code, body) in bodies {
            for size in ["1/2", "3/4", "1", "M"] {
                let knockouts = if size == "1" { "1\" KO" } else { "3/4\" & 1/2\" KO" };
                boxes.insert(
                    format!("{}|{}", code, size),
                    format!("{} - {}", body, knockouts),
                );
            }
        }

        let mut connector_sizes: HashMap<String, ConnectorSize> = CONDUIT_SIZES
            .iter()
            .map(|(size, digit)| (format!("{}C", digit), ConnectorSize::Conduit(*size)))
            .collect();
        connector_sizes.insert("M".to_string(), ConnectorSize::MetalClad);

        let mut connectors: HashMap<&'static str, String> = CONDUIT_SIZES
            .iter()
            .map(|(size, _)| (*size, format!("Connector - Set Screw Steel - EMT - {}\"", size)))
            .collect();
        connectors.insert("M", "Connector - Metal Clad Cable - 3/8\"".to_string());

        let mut conduits: HashMap<&'static str, String> = CONDUIT_SIZES
            .iter()
            .map(|(size, _)| (*size, format!("Conduit - EMT - {}\"", size)))
            .collect();
        conduits.insert("M", "Conduit - MC Cable - #12/2C".to_string());

        let mut plaster_rings = HashMap::new();
        for width in [BoxWidth::Four, BoxWidth::FourElevenSixteenths] {
            let w = width.as_str();
            for depth in RING_DEPTHS.iter().copied().chain(std::iter::once("A")) {
                let depth_label = if depth == "A" {
                    "Adjustable".to_string()
                } else {
                    format!("{}\" Deep", depth)
                };
                for gang in ["1", "2", "3", "4"] {
                    plaster_rings.insert(
                        format!("{}|{}|{}", w, gang, depth),
                        format!(
                            "{}\" Square Plaster Ring - Steel - {}-Gang - {}",
                            w, gang, depth_label
                        ),
                    );
                }
                plaster_rings.insert(
                    format!("{}|R|{}", w, depth),
                    format!("{}\" Round Plaster Ring - Steel - {}", w, depth_label),
                );
            }
            for depth in LIFE_SAFETY_RING_DEPTHS {
                plaster_rings.insert(
                    format!("{}|E|{}", w, depth),
                    format!(
                        "{}\" Red Life Safety Square Plaster Ring - Steel - {}\" Deep",
                        w, depth
                    ),
                );
            }
        }

        let mut extra_connectors = HashMap::new();
        for (size, _) in CONDUIT_SIZES {
            let set_screw = format!("Connector - Set Screw Steel - EMT - {}\"", size);
            let male_adapter = format!("Connector - Male Adapter - PVC - {}\"", size);
            for tag in ["CT", "CB"] {
                extra_connectors.insert(format!("{}|{}", tag, size), set_screw.clone());
            }
            for tag in ["PT", "PB", "MT", "MB"] {
                extra_connectors.insert(format!("{}|{}", tag, size), male_adapter.clone());
            }
        }

        Self {
            boxes,
            connector_sizes,
            connectors,
            conduits,
            plaster_rings,
            extra_connectors,
        }
    }

    /// Device code digit for a trade size (`"3/4"` -> `"3"`)
    pub fn size_token(trade_size: &str) -> Option<&'static str> {
        CONDUIT_SIZES
            .iter()
            .find(|(size, _)| *size == trade_size)
            .map(|(_, digit)| *digit)
    }

    /// Entry size for a connector token (`"3C"`, `"M"`)
    pub fn connector_size(&self, token: &str) -> Option<ConnectorSize> {
        self.connector_sizes.get(token).copied()
    }

    pub fn box_part(&self, box_code: &str, size: ConnectorSize) -> Option<&str> {
        self.boxes
            .get(&format!("{}|{}", box_code, size.as_str()))
            .map(String::as_str)
    }

    pub fn connector_part(&self, size: ConnectorSize) -> Option<&str> {
        self.connectors.get(size.as_str()).map(String::as_str)
    }

    pub fn conduit(&self, size: ConnectorSize) -> Option<&str> {
        self.conduits.get(size.as_str()).map(String::as_str)
    }

    pub fn plaster_ring(&self, width: BoxWidth, gang: &str, depth: &str) -> Option<&str> {
        self.plaster_rings
            .get(&format!("{}|{}|{}", width.as_str(), gang, depth))
            .map(String::as_str)
    }

    pub fn extra_connector(&self, tag: &str, size: ConnectorSize) -> Option<&str> {
        self.extra_connectors
            .get(&format!("{}|{}", tag, size.as_str()))
            .map(String::as_str)
    }

    /// Strap matching the entry; metal-clad cable always uses the 1/2" strap
    pub fn strap(&self, size: ConnectorSize) -> String {
        match size {
            ConnectorSize::Conduit(s) => format!("Conduit Strap - {}\"", s),
            ConnectorSize::MetalClad => MC_STRAP.to_string(),
        }
    }

    /// Conduit clip for a trade size: 1/2", 3/4", or the large clip for
    /// anything from 1" up. Sizes under 1/2" have no clip.
    pub fn conduit_clip(&self, trade_size: &str, metal_clad_body: bool) -> Option<String> {
        let inches = parse_inches(trade_size)?;
        let clip_size = if inches == 0.5 {
            "1/2"
        } else if inches == 0.75 {
            "3/4"
        } else if inches >= 1.0 {
            if metal_clad_body { "3/4" } else { "1" }
        } else {
            return None;
        };

        let prefix = if metal_clad_body { "Metal Clad " } else { "" };
        Some(format!(
            "{}Conduit Clip Snap Close Flange Hanger Side Mount - {}\"",
            prefix, clip_size
        ))
    }
}

/// Parse a fractional inch length such as `1 1/4`, `3/4"` or `2`
pub fn parse_inches(text: &str) -> Option<f64> {
    let text = text.trim().trim_end_matches('"').trim();
    if text.is_empty() {
        return None;
    }

    let mut total = 0.0;
    for token in text.split_whitespace() {
        total += match token.split_once('/') {
            Some((num, den)) => {
                let num: f64 = num.parse().ok()?;
                let den: f64 = den.parse().ok()?;
                if den == 0.0 {
                    return None;
                }
                num / den
            }
            None => token.parse::<f64>().ok()?,
        };
    }
    Some(total)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_inches() {
        assert_eq!(parse_inches("1/2"), Some(0.5));
        assert_eq!(parse_inches("3/4\""), Some(0.75));
        assert_eq!(parse_inches("1 1/4"), Some(1.25));
        assert_eq!(parse_inches("2"), Some(2.0));
        assert_eq!(parse_inches(""), None);
        assert_eq!(parse_inches("1/0"), None);
        assert_eq!(parse_inches("M"), None);
    }

    #[test]
    fn test_connector_size_tokens() {
        let catalog = PartsCatalog::global();
        assert_eq!(catalog.connector_size("3C"), Some(ConnectorSize::Conduit("3/4")));
        assert_eq!(catalog.connector_size("5C"), Some(ConnectorSize::Conduit("1 1/4")));
        assert_eq!(catalog.connector_size("M"), Some(ConnectorSize::MetalClad));
        assert_eq!(catalog.connector_size("7C"), None);
        assert_eq!(PartsCatalog::size_token("1 1/2"), Some("6"));
        assert_eq!(PartsCatalog::size_token("2 1/2"), None);
    }

    #[test]
    fn test_box_part_names() {
        let catalog = PartsCatalog::global();
        assert_eq!(
            catalog.box_part("SN", ConnectorSize::Conduit("3/4")),
            Some("4\" Square Box - 1-1/2\" Deep - 3/4\" & 1/2\" KO")
        );
        assert_eq!(
            catalog.box_part("XF", ConnectorSize::Conduit("1")),
            Some("4-11/16\" Red Life Saftey Square Box - 2-1/8\" Deep - 1\" KO")
        );
        assert_eq!(
            catalog.box_part("F", ConnectorSize::MetalClad),
            Some("4\" Red Life Saftey Square Box - 3-1/2\" Deep - 3/4\" & 1/2\" KO")
        );

        // no box body is stocked for entries over 1"
        assert!(catalog.box_part("P", ConnectorSize::Conduit("1 1/4")).is_none());
        assert!(catalog.box_part("SF", ConnectorSize::Conduit("1/2")).is_none());
    }

    #[test]
    fn test_width_from_part_name() {
        let catalog = PartsCatalog::global();
        let width = |code: &str, size: ConnectorSize| {
            BoxWidth::from_part_name(catalog.box_part(code, size).unwrap())
        };

        assert_eq!(width("SP", ConnectorSize::Conduit("1/2")), BoxWidth::Four);
        assert_eq!(width("F", ConnectorSize::Conduit("1")), BoxWidth::Four);
        // `3/4"` in the knockout text reads as a 4" box
        assert_eq!(width("XP", ConnectorSize::Conduit("3/4")), BoxWidth::Four);
        assert_eq!(width("XN", ConnectorSize::MetalClad), BoxWidth::Four);
        assert_eq!(
            width("XP", ConnectorSize::Conduit("1")),
            BoxWidth::FourElevenSixteenths
        );
        assert_eq!(
            width("XF", ConnectorSize::Conduit("1")),
            BoxWidth::FourElevenSixteenths
        );
    }

    #[test]
    fn test_plaster_rings() {
        let catalog = PartsCatalog::global();
        assert_eq!(
            catalog.plaster_ring(BoxWidth::Four, "2", "1/2"),
            Some("4\" Square Plaster Ring - Steel - 2-Gang - 1/2\" Deep")
        );
        assert_eq!(
            catalog.plaster_ring(BoxWidth::FourElevenSixteenths, "R", "A"),
            Some("4 11/16\" Round Plaster Ring - Steel - Adjustable")
        );
        assert!(catalog.plaster_ring(BoxWidth::Four, "E", "5/8").is_some());
        assert!(catalog.plaster_ring(BoxWidth::Four, "E", "1/2").is_none());
        assert!(catalog.plaster_ring(BoxWidth::Four, "E", "A").is_none());
    }

    #[test]
    fn test_extra_connectors() {
        let catalog = PartsCatalog::global();
        let size = ConnectorSize::Conduit("1/2");
        assert_eq!(
            catalog.extra_connector("CT", size),
            Some("Connector - Set Screw Steel - EMT - 1/2\"")
        );
        assert_eq!(
            catalog.extra_connector("PB", size),
            Some("Connector - Male Adapter - PVC - 1/2\"")
        );
        assert_eq!(catalog.extra_connector("CT", ConnectorSize::MetalClad), None);
    }

    #[test]
    fn test_conduit_clip_boundaries() {
        let catalog = PartsCatalog::global();
        assert_eq!(
            catalog.conduit_clip("1/2", false).as_deref(),
            Some("Conduit Clip Snap Close Flange Hanger Side Mount - 1/2\"")
        );
        assert_eq!(
            catalog.conduit_clip("3/4\"", false).as_deref(),
            Some("Conduit Clip Snap Close Flange Hanger Side Mount - 3/4\"")
        );
        assert_eq!(
            catalog.conduit_clip("1\"", false).as_deref(),
            Some("Conduit Clip Snap Close Flange Hanger Side Mount - 1\"")
        );
        assert_eq!(
            catalog.conduit_clip("2", false).as_deref(),
            Some("Conduit Clip Snap Close Flange Hanger Side Mount - 1\"")
        );
        assert_eq!(catalog.conduit_clip("3/8", false), None);
    }

    #[test]
    fn test_metal_clad_body_clip_names() {
        let catalog = PartsCatalog::global();
        assert_eq!(
            catalog.conduit_clip("1 1/4", true).as_deref(),
            Some("Metal Clad Conduit Clip Snap Close Flange Hanger Side Mount - 3/4\"")
        );
    }

    #[test]
    fn test_straps() {
        let catalog = PartsCatalog::global();
        assert_eq!(catalog.strap(ConnectorSize::Conduit("3/4")), "Conduit Strap - 3/4\"");
        assert_eq!(catalog.strap(ConnectorSize::MetalClad), MC_STRAP);
    }
}
