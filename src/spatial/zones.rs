//! Map zone tables and coordinate classification
//!
//! Each map carries an ordered table of named axis-aligned boxes in the
//! game's coordinate space. Boxes may overlap; a point resolves to the
//! first zone in declaration order that contains it. That order is part of
//! the contract, so the tables below are slices rather than hash maps.

/// Zone name returned for unknown maps and unmatched points.
pub const UNKNOWN_ZONE: &str = "Unknown";

/// A named axis-aligned region of a map, bounds inclusive.
#[derive(Debug, Clone, Copy)]
pub struct ZoneBox {
    pub name: &'static str,
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl ZoneBox {
    const fn new(name: &'static str, min_x: f64, max_x: f64, min_y: f64, max_y: f64) -> Self {
        ZoneBox {
            name,
            min_x,
            max_x,
            min_y,
            max_y,
        }
    }

    /// Inclusive containment test.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        self.min_x <= x && x <= self.max_x && self.min_y <= y && y <= self.max_y
    }
}

static HAVEN: [ZoneBox; 9] = [
    ZoneBox::new("A Site", -4000.0, -1500.0, 2000.0, 5000.0),
    ZoneBox::new("B Site", -500.0, 1500.0, 3500.0, 5500.0),
    ZoneBox::new("C Site", 1500.0, 4500.0, 2000.0, 5000.0),
    ZoneBox::new("A Long", -5000.0, -3500.0, -500.0, 2000.0),
    ZoneBox::new("C Long", 3000.0, 5500.0, -500.0, 2000.0),
    ZoneBox::new("Mid", -1500.0, 1500.0, 0.0, 3500.0),
    ZoneBox::new("Garage", -500.0, 1500.0, -2000.0, 500.0),
    ZoneBox::new("CT Spawn", -1000.0, 1000.0, 4500.0, 6500.0),
    ZoneBox::new("T Spawn", -1000.0, 1000.0, -4000.0, -2000.0),
];

static ASCENT: [ZoneBox; 8] = [
    ZoneBox::new("A Site", -3500.0, -1000.0, 2000.0, 4500.0),
    ZoneBox::new("B Site", 1000.0, 4000.0, 2000.0, 5000.0),
    ZoneBox::new("A Main", -4500.0, -2500.0, -1000.0, 2000.0),
    ZoneBox::new("B Main", 2000.0, 4500.0, -1000.0, 2000.0),
    ZoneBox::new("Mid", -1500.0, 1500.0, -500.0, 3000.0),
    ZoneBox::new("Catwalk", -500.0, 500.0, 2500.0, 4000.0),
    ZoneBox::new("CT Spawn", -500.0, 500.0, 4000.0, 6000.0),
    ZoneBox::new("T Spawn", -500.0, 500.0, -4000.0, -2000.0),
];

static LOTUS: [ZoneBox; 9] = [
    ZoneBox::new("A Site", -4500.0, -2000.0, 2500.0, 5500.0),
    ZoneBox::new("B Site", -1500.0, 1500.0, 3000.0, 6000.0),
    ZoneBox::new("C Site", 2000.0, 5000.0, 2500.0, 5500.0),
    ZoneBox::new("A Main", -5000.0, -3000.0, 0.0, 2500.0),
    ZoneBox::new("B Main", -1000.0, 1000.0, 0.0, 3000.0),
    ZoneBox::new("C Main", 3000.0, 5000.0, 0.0, 2500.0),
    ZoneBox::new("Mid", -1500.0, 1500.0, 1000.0, 3000.0),
    ZoneBox::new("CT Spawn", -500.0, 500.0, 5500.0, 7000.0),
    ZoneBox::new("T Spawn", -500.0, 500.0, -3000.0, -1000.0),
];

static SPLIT: [ZoneBox; 8] = [
    ZoneBox::new("A Site", -3500.0, -1000.0, 2000.0, 4500.0),
    ZoneBox::new("B Site", 1000.0, 3500.0, 2000.0, 4500.0),
    ZoneBox::new("A Main", -4000.0, -2000.0, -500.0, 2000.0),
    ZoneBox::new("B Main", 2000.0, 4000.0, -500.0, 2000.0),
    ZoneBox::new("Mid", -1500.0, 1500.0, 0.0, 2500.0),
    ZoneBox::new("Vent", -500.0, 500.0, 1500.0, 3000.0),
    ZoneBox::new("CT Spawn", -500.0, 500.0, 4000.0, 5500.0),
    ZoneBox::new("T Spawn", -500.0, 500.0, -3500.0, -1500.0),
];

static BIND: [ZoneBox; 8] = [
    ZoneBox::new("A Site", -4000.0, -1500.0, 1500.0, 4000.0),
    ZoneBox::new("B Site", 1500.0, 4500.0, 1500.0, 4000.0),
    ZoneBox::new("A Short", -4500.0, -2500.0, -500.0, 1500.0),
    ZoneBox::new("A Bath", -3000.0, -1500.0, 500.0, 2000.0),
    ZoneBox::new("B Long", 2500.0, 5000.0, -500.0, 1500.0),
    ZoneBox::new("B Hookah", 1000.0, 2500.0, 500.0, 2000.0),
    ZoneBox::new("CT Spawn", -500.0, 500.0, 3500.0, 5000.0),
    ZoneBox::new("T Spawn", -500.0, 500.0, -3000.0, -1000.0),
];

static PEARL: [ZoneBox; 8] = [
    ZoneBox::new("A Site", -4000.0, -1500.0, 2000.0, 4500.0),
    ZoneBox::new("B Site", 1500.0, 4000.0, 2000.0, 4500.0),
    ZoneBox::new("A Main", -4500.0, -2500.0, -500.0, 2000.0),
    ZoneBox::new("B Main", 2500.0, 4500.0, -500.0, 2000.0),
    ZoneBox::new("Mid", -1500.0, 1500.0, 0.0, 2500.0),
    ZoneBox::new("Plaza", -500.0, 500.0, 1500.0, 3000.0),
    ZoneBox::new("CT Spawn", -500.0, 500.0, 4000.0, 5500.0),
    ZoneBox::new("T Spawn", -500.0, 500.0, -3500.0, -1500.0),
];

static ICEBOX: [ZoneBox; 8] = [
    ZoneBox::new("A Site", -3500.0, -1000.0, 2500.0, 5000.0),
    ZoneBox::new("B Site", 1000.0, 4000.0, 2500.0, 5000.0),
    ZoneBox::new("A Main", -4000.0, -2000.0, 0.0, 2500.0),
    ZoneBox::new("B Main", 2000.0, 4500.0, 0.0, 2500.0),
    ZoneBox::new("Mid", -1500.0, 1500.0, 500.0, 3000.0),
    ZoneBox::new("Kitchen", 500.0, 2000.0, 1500.0, 3000.0),
    ZoneBox::new("CT Spawn", -500.0, 500.0, 4500.0, 6000.0),
    ZoneBox::new("T Spawn", -500.0, 500.0, -3000.0, -1000.0),
];

static FRACTURE: [ZoneBox; 9] = [
    ZoneBox::new("A Site", -4000.0, -1500.0, 2000.0, 4500.0),
    ZoneBox::new("B Site", 1500.0, 4000.0, 2000.0, 4500.0),
    ZoneBox::new("A Main", -4500.0, -2500.0, -500.0, 2000.0),
    ZoneBox::new("A Dish", -3000.0, -1500.0, 1000.0, 2500.0),
    ZoneBox::new("B Main", 2500.0, 4500.0, -500.0, 2000.0),
    ZoneBox::new("B Arcade", 1500.0, 3000.0, 1000.0, 2500.0),
    ZoneBox::new("Mid", -1500.0, 1500.0, 0.0, 2000.0),
    ZoneBox::new("CT Spawn", -500.0, 500.0, 3500.0, 5000.0),
    ZoneBox::new("T Spawn", -500.0, 500.0, -500.0, 500.0),
];

static SUNSET: [ZoneBox; 8] = [
    ZoneBox::new("A Site", -4000.0, -1500.0, 2000.0, 4500.0),
    ZoneBox::new("B Site", 1500.0, 4000.0, 2000.0, 4500.0),
    ZoneBox::new("A Main", -4500.0, -2500.0, -500.0, 2000.0),
    ZoneBox::new("B Main", 2500.0, 4500.0, -500.0, 2000.0),
    ZoneBox::new("Mid", -1500.0, 1500.0, 0.0, 3000.0),
    ZoneBox::new("Market", 500.0, 2000.0, 1000.0, 2500.0),
    ZoneBox::new("CT Spawn", -500.0, 500.0, 4000.0, 5500.0),
    ZoneBox::new("T Spawn", -500.0, 500.0, -3000.0, -1000.0),
];

static ABYSS: [ZoneBox; 7] = [
    ZoneBox::new("A Site", -4000.0, -1500.0, 2000.0, 4500.0),
    ZoneBox::new("B Site", 1500.0, 4000.0, 2000.0, 4500.0),
    ZoneBox::new("A Main", -4500.0, -2500.0, -500.0, 2000.0),
    ZoneBox::new("B Main", 2500.0, 4500.0, -500.0, 2000.0),
    ZoneBox::new("Mid", -1500.0, 1500.0, 0.0, 3000.0),
    ZoneBox::new("CT Spawn", -500.0, 500.0, 4000.0, 5500.0),
    ZoneBox::new("T Spawn", -500.0, 500.0, -3000.0, -1000.0),
];

static MAP_TABLES: [(&str, &[ZoneBox]); 10] = [
    ("Haven", &HAVEN),
    ("Ascent", &ASCENT),
    ("Lotus", &LOTUS),
    ("Split", &SPLIT),
    ("Bind", &BIND),
    ("Pearl", &PEARL),
    ("Icebox", &ICEBOX),
    ("Fracture", &FRACTURE),
    ("Sunset", &SUNSET),
    ("Abyss", &ABYSS),
];

/// Normalize a provider map identifier to a table key.
///
/// Full asset paths like `/Game/Maps/Ascent/Ascent` reduce to their last
/// segment; capitalization is canonicalized to leading-uppercase.
pub fn normalize_map_name(raw: &str) -> String {
    let last = raw.rsplit('/').next().unwrap_or(raw).trim();
    if last.is_empty() {
        return UNKNOWN_ZONE.to_string();
    }
    let mut chars = last.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
        None => UNKNOWN_ZONE.to_string(),
    }
}

/// The ordered zone table for a map, if known. Takes raw or normalized
/// identifiers.
pub fn zone_table(map_name: &str) -> Option<&'static [ZoneBox]> {
    let key = normalize_map_name(map_name);
    MAP_TABLES
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, zones)| *zones)
}

/// Names of all maps with zone tables, in declaration order.
pub fn known_maps() -> impl Iterator<Item = &'static str> {
    MAP_TABLES.iter().map(|(name, _)| *name)
}

/// Classify a coordinate into a named zone.
///
/// Returns the first containing zone in the map's declared order, or
/// [`UNKNOWN_ZONE`] for unknown maps and unmatched points.
pub fn zone_for_coordinates(x: f64, y: f64, map_name: &str) -> &'static str {
    let Some(zones) = zone_table(map_name) else {
        return UNKNOWN_ZONE;
    };
    zones
        .iter()
        .find(|zone| zone.contains(x, y))
        .map(|zone| zone.name)
        .unwrap_or(UNKNOWN_ZONE)
}
