//! Parts and the per-code collections they are merged into

use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// What a part is used for on a box assembly
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartCategory {
    Box,
    PlasterRing,
    Bracket,
    Hardware,
    Connector,
    Stinger,
    Clip,
}

impl PartCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            PartCategory::Box => "box",
            PartCategory::PlasterRing => "plaster_ring",
            PartCategory::Bracket => "bracket",
            PartCategory::Hardware => "hardware",
            PartCategory::Connector => "connector",
            PartCategory::Stinger => "stinger",
            PartCategory::Clip => "clip",
        }
    }

    /// Every category, in display order
    pub fn all() -> &'static [PartCategory] {
        &[
            PartCategory::Box,
            PartCategory::PlasterRing,
            PartCategory::Bracket,
            PartCategory::Hardware,
            PartCategory::Connector,
            PartCategory::Stinger,
            PartCategory::Clip,
        ]
    }
}

impl fmt::Display for PartCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PartCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace(['-', ' '], "_").as_str() {
            "box" => Ok(PartCategory::Box),
            "plaster_ring" | "ring" => Ok(PartCategory::PlasterRing),
            "bracket" => Ok(PartCategory::Bracket),
            "hardware" => Ok(PartCategory::Hardware),
            "connector" => Ok(PartCategory::Connector),
            "stinger" => Ok(PartCategory::Stinger),
            "clip" => Ok(PartCategory::Clip),
            _ => Err(format!(
                "Invalid part category: {}. Use box, plaster_ring, bracket, hardware, connector, stinger or clip",
                s
            )),
        }
    }
}

/// A catalog part and how many of it are needed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Part {
    pub name: String,
    pub quantity: u32,
    pub category: PartCategory,
}

impl Part {
    pub fn new(name: impl Into<String>, quantity: u32, category: PartCategory) -> Self {
        Self {
            name: name.into(),
            quantity,
            category,
        }
    }

    pub fn add_quantity(&mut self, quantity: u32) {
        self.quantity += quantity;
    }
}

impl fmt::Display for Part {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.name, self.quantity)
    }
}

/// Merge `part` into a name-keyed map, summing quantities on a name match.
/// The category of the first occurrence wins.
fn merge_into(parts: &mut BTreeMap<String, Part>, part: Part) {
    match parts.get_mut(&part.name) {
        Some(existing) => existing.add_quantity(part.quantity),
        None => {
            parts.insert(part.name.clone(), part);
        }
    }
}

fn serialize_parts<S: Serializer>(
    parts: &BTreeMap<String, Part>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(parts.values())
}

/// All parts for one device code within one bundle
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PartCollection {
    pub device_code: String,
    pub bundle_name: String,
    #[serde(serialize_with = "serialize_parts")]
    parts: BTreeMap<String, Part>,
}

impl PartCollection {
    pub fn new(device_code: impl Into<String>, bundle_name: impl Into<String>) -> Self {
        Self {
            device_code: device_code.into(),
            bundle_name: bundle_name.into(),
            parts: BTreeMap::new(),
        }
    }

    /// Create a collection seeded with `parts`, merging duplicates by name
    pub fn with_parts(
        device_code: impl Into<String>,
        bundle_name: impl Into<String>,
        parts: impl IntoIterator<Item = Part>,
    ) -> Self {
        let mut coll = Self::new(device_code, bundle_name);
        for part in parts {
            coll.add_part(part);
        }
        coll
    }

    /// Add a part, summing the quantity into an existing entry with the same name
    pub fn add_part(&mut self, part: Part) {
        merge_into(&mut self.parts, part);
    }

    /// Parts sorted by name
    pub fn parts(&self) -> impl Iterator<Item = &Part> {
        self.parts.values()
    }

    /// Parts of one category, sorted by name
    pub fn parts_in(&self, category: PartCategory) -> impl Iterator<Item = &Part> {
        self.parts.values().filter(move |p| p.category == category)
    }

    pub fn part(&self, name: &str) -> Option<&Part> {
        self.parts.get(name)
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Copy of this collection keeping only parts in `categories`
    pub fn filtered(&self, categories: &[PartCategory]) -> Self {
        Self {
            device_code: self.device_code.clone(),
            bundle_name: self.bundle_name.clone(),
            parts: self
                .parts
                .iter()
                .filter(|(_, p)| categories.contains(&p.category))
                .map(|(k, p)| (k.clone(), p.clone()))
                .collect(),
        }
    }

    /// Category-filtered copies of `collections`, sorted by device code
    pub fn totals_by_category(
        collections: &[PartCollection],
        categories: &[PartCategory],
    ) -> Vec<PartCollection> {
        let mut copies: Vec<PartCollection> =
            collections.iter().map(|c| c.filtered(categories)).collect();
        copies.sort_by(|a, b| a.device_code.cmp(&b.device_code));
        copies
    }

    /// Category-filtered copies grouped by bundle name.
    ///
    /// The empty bundle name holds boxes without a bundle. Keys iterate in
    /// bundle-name order and each bucket is sorted by device code.
    pub fn totals_by_bundle_then_category(
        collections: &[PartCollection],
        categories: &[PartCategory],
    ) -> BTreeMap<String, Vec<PartCollection>> {
        let mut groups: BTreeMap<String, Vec<PartCollection>> = BTreeMap::new();
        for coll in collections {
            groups
                .entry(coll.bundle_name.clone())
                .or_default()
                .push(coll.filtered(categories));
        }
        for bucket in groups.values_mut() {
            bucket.sort_by(|a, b| a.device_code.cmp(&b.device_code));
        }
        groups
    }
}

impl fmt::Display for PartCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} {{", self.device_code)?;
        for part in self.parts() {
            writeln!(f, "  {}", part)?;
        }
        write!(f, "}}")
    }
}

/// Parts merged across every collection, ignoring device code and bundle
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PartTotal {
    #[serde(serialize_with = "serialize_parts")]
    parts: BTreeMap<String, Part>,
}

impl PartTotal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_part(&mut self, part: Part) {
        merge_into(&mut self.parts, part);
    }

    /// Flatten the parts in `categories` from all collections into one total
    pub fn from_collections(collections: &[PartCollection], categories: &[PartCategory]) -> Self {
        let mut total = Self::new();
        for part in collections.iter().flat_map(|c| c.parts()) {
            if categories.contains(&part.category) {
                total.add_part(part.clone());
            }
        }
        total
    }

    pub fn parts(&self) -> impl Iterator<Item = &Part> {
        self.parts.values()
    }

    pub fn part(&self, name: &str) -> Option<&Part> {
        self.parts.get(name)
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn screw(qty: u32) -> Part {
        Part::new("Wafer Head Tek Screw", qty, PartCategory::Hardware)
    }

    #[test]
    fn test_add_part_merges_by_name() {
        let mut coll = PartCollection::new("SN23C-1/2", "");
        coll.add_part(screw(2));
        coll.add_part(screw(3));

        assert_eq!(coll.len(), 1);
        assert_eq!(coll.part("Wafer Head Tek Screw").unwrap().quantity, 5);
    }

    #[test]
    fn test_parts_are_name_sorted() {
        let coll = PartCollection::with_parts(
            "P23C-1/2",
            "",
            vec![
                Part::new("Zeta", 1, PartCategory::Hardware),
                Part::new("Alpha", 1, PartCategory::Box),
                Part::new("Mid", 1, PartCategory::Clip),
            ],
        );
        let names: Vec<&str> = coll.parts().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Alpha", "Mid", "Zeta"]);
    }

    #[test]
    fn test_totals_by_category_filters_and_sorts() {
        let a = PartCollection::with_parts(
            "XP23C-1/2",
            "A",
            vec![
                Part::new("Box", 1, PartCategory::Box),
                screw(4),
            ],
        );
        let b = PartCollection::with_parts("N23C-1/2", "", vec![screw(4)]);

        let totals = PartCollection::totals_by_category(&[a.clone(), b], &[PartCategory::Box]);
        assert_eq!(totals.len(), 2);
        assert_eq!(totals[0].device_code, "N23C-1/2");
        assert!(totals[0].is_empty());
        assert_eq!(totals[1].len(), 1);
        assert_eq!(totals[1].bundle_name, "A");
        // the source is untouched
        assert_eq!(a.len(), 2);
    }

    #[test]
    fn test_totals_by_bundle_then_category_groups() {
        let colls = vec![
            PartCollection::with_parts("SP23C-1/2", "A", vec![screw(4)]),
            PartCollection::with_parts("P23C-1/2", "", vec![screw(4)]),
            PartCollection::with_parts("N23C-1/2", "A", vec![screw(4)]),
        ];

        let groups =
            PartCollection::totals_by_bundle_then_category(&colls, &[PartCategory::Hardware]);
        let keys: Vec<&str> = groups.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["", "A"]);

        let a_codes: Vec<&str> = groups["A"].iter().map(|c| c.device_code.as_str()).collect();
        assert_eq!(a_codes, vec!["N23C-1/2", "SP23C-1/2"]);
        assert_eq!(groups[""].len(), 1);
    }

    #[test]
    fn test_part_total_flattens_matching_categories() {
        let colls = vec![
            PartCollection::with_parts(
                "P23C-1/2",
                "",
                vec![screw(4), Part::new("Ground Stinger #12 Copper", 1, PartCategory::Stinger)],
            ),
            PartCollection::with_parts("N23C-1/2", "B", vec![screw(4)]),
        ];

        let total = PartTotal::from_collections(&colls, &[PartCategory::Hardware]);
        assert_eq!(total.len(), 1);
        assert_eq!(total.part("Wafer Head Tek Screw").unwrap().quantity, 8);
        assert!(total.part("Ground Stinger #12 Copper").is_none());
    }

    #[test]
    fn test_category_parse() {
        assert_eq!("Plaster Ring".parse::<PartCategory>(), Ok(PartCategory::PlasterRing));
        assert_eq!("CLIP".parse::<PartCategory>(), Ok(PartCategory::Clip));
        assert!("widget".parse::<PartCategory>().is_err());
    }

    #[test]
    fn test_collection_serializes_parts_as_list() {
        let coll = PartCollection::with_parts("P23C-1/2", "A", vec![screw(4)]);
        let json = serde_json::to_value(&coll).unwrap();
        assert_eq!(json["device_code"], "P23C-1/2");
        assert_eq!(json["parts"][0]["quantity"], 4);
        assert_eq!(json["parts"][0]["category"], "hardware");
    }
}
