// Core data structures for the surfatlas crawler

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;

use crate::error::ErrorCategory;

// ============================================================================
// Seasons
// ============================================================================

/// One of the six canonical two-month periods
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SeasonBucket {
    JanFeb,
    MarApr,
    MayJun,
    JulAug,
    SepOct,
    NovDec,
}

const MONTHS: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

impl SeasonBucket {
    pub const ALL: [SeasonBucket; 6] = [
        Self::JanFeb,
        Self::MarApr,
        Self::MayJun,
        Self::JulAug,
        Self::SepOct,
        Self::NovDec,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Display label, also used as column header
    pub fn label(self) -> &'static str {
        match self {
            Self::JanFeb => "Jan/Feb",
            Self::MarApr => "Mar/Apr",
            Self::MayJun => "May/Jun",
            Self::JulAug => "Jul/Aug",
            Self::SepOct => "Sep/Oct",
            Self::NovDec => "Nov/Dec",
        }
    }

    /// Bucket for a zero-based month index
    pub fn from_month(month: usize) -> Option<Self> {
        Self::ALL.get(month / 2).copied().filter(|_| month < 12)
    }

    /// Map a free-text month label onto a bucket
    ///
    /// Accepts month pairs ("Jan/Feb", "jan_feb", "Jan-Feb"), single months
    /// ("Jan") and full names ("January"). Returns `None` when no month is
    /// recognized or when the months span more than one bucket.
    pub fn from_label(label: &str) -> Option<Self> {
        let lowered = label.to_lowercase();
        let mut bucket = None;

        for token in lowered
            .split(|c: char| !c.is_ascii_alphabetic())
            .filter(|t| t.len() >= 3)
        {
            let month = MONTHS.iter().position(|m| token.starts_with(m))?;
            let this = Self::from_month(month)?;
            match bucket {
                None => bucket = Some(this),
                Some(prev) if prev == this => {}
                Some(_) => return None,
            }
        }

        bucket
    }
}

impl std::fmt::Display for SeasonBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Six optional values, one per season bucket
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeasonRow([Option<String>; 6]);

impl SeasonRow {
    pub fn get(&self, bucket: SeasonBucket) -> Option<&str> {
        self.0[bucket.index()].as_deref()
    }

    /// Store a value; a second distinct value in the same bucket is appended
    pub fn merge(&mut self, bucket: SeasonBucket, value: impl Into<String>) {
        let value = value.into();
        if value.is_empty() {
            return;
        }
        let slot = &mut self.0[bucket.index()];
        match slot {
            Some(existing) if existing.split(" / ").any(|v| v == value) => {}
            Some(existing) => {
                existing.push_str(" / ");
                existing.push_str(&value);
            }
            None => *slot = Some(value),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.iter().all(Option::is_none)
    }

    pub fn iter(&self) -> impl Iterator<Item = (SeasonBucket, Option<&str>)> {
        SeasonBucket::ALL.into_iter().map(move |b| (b, self.get(b)))
    }
}

/// Metric rows found in season tables
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SeasonMetric {
    BestSurfingSeason,
    TypicalSwellSize,
    SurfEquipment,
    WaterTemp,
    AirTemp,
    Other(String),
}

impl SeasonMetric {
    /// Metrics exported as dedicated workbook columns, in column order
    pub const KNOWN: [SeasonMetric; 5] = [
        Self::BestSurfingSeason,
        Self::TypicalSwellSize,
        Self::SurfEquipment,
        Self::WaterTemp,
        Self::AirTemp,
    ];

    /// Classify a row heading such as "Best Surfing Season" or "Water temp."
    pub fn from_label(label: &str) -> Self {
        let key: String = label
            .to_lowercase()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || c.is_whitespace())
            .collect::<String>()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("_");

        match key.as_str() {
            "best_surfing_season" | "best_season" | "best_surfing" => Self::BestSurfingSeason,
            "typical_swell_size" | "swell_size" => Self::TypicalSwellSize,
            "surf_equipment" | "equipment" => Self::SurfEquipment,
            "water_temp" | "water_temperature" => Self::WaterTemp,
            "air_temp" | "air_temperature" => Self::AirTemp,
            _ => Self::Other(key),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::BestSurfingSeason => "Best surfing season",
            Self::TypicalSwellSize => "Typical swell size",
            Self::SurfEquipment => "Surf equipment",
            Self::WaterTemp => "Water temp",
            Self::AirTemp => "Air temp",
            Self::Other(key) => key,
        }
    }
}

/// Seasonal table keyed by metric
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeasonTable {
    rows: BTreeMap<SeasonMetric, SeasonRow>,
}

impl SeasonTable {
    pub fn get(&self, metric: &SeasonMetric) -> Option<&SeasonRow> {
        self.rows.get(metric)
    }

    pub fn insert(&mut self, metric: SeasonMetric, row: SeasonRow) {
        self.rows.insert(metric, row);
    }

    pub fn is_empty(&self) -> bool {
        self.rows.values().all(SeasonRow::is_empty)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn metrics(&self) -> impl Iterator<Item = &SeasonMetric> {
        self.rows.keys()
    }

    /// Row summarizing surf conditions: swell size, then best season, then any
    pub fn primary(&self) -> Option<&SeasonRow> {
        self.rows
            .get(&SeasonMetric::TypicalSwellSize)
            .or_else(|| self.rows.get(&SeasonMetric::BestSurfingSeason))
            .or_else(|| self.rows.values().next())
    }
}

// ============================================================================
// Coordinates
// ============================================================================

static COORD_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"^([NSEWnsew])?\s*(-?\d+(?:[.,]\d+)?)\s*°?\s*(?:(\d+(?:[.,]\d+)?)\s*['′]?)?\s*(?:(\d+(?:[.,]\d+)?)\s*(?:"|″|'')?)?\s*([NSEWnsew])?$"#,
    )
    .expect("Invalid regex pattern")
});

/// Validated geographic position
///
/// Fields are private: the only way in is through [`Coordinates::new`] or
/// [`Coordinates::parse`], which reject out-of-range values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinates {
    latitude: f64,
    longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Option<Self> {
        let valid = latitude.is_finite()
            && longitude.is_finite()
            && (-90.0..=90.0).contains(&latitude)
            && (-180.0..=180.0).contains(&longitude);
        valid.then_some(Self {
            latitude,
            longitude,
        })
    }

    /// Parse latitude/longitude texts in decimal or degree-minute-second form
    pub fn parse(latitude: &str, longitude: &str) -> Option<Self> {
        Self::new(parse_degrees(latitude)?, parse_degrees(longitude)?)
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

fn parse_degrees(text: &str) -> Option<f64> {
    let caps = COORD_REGEX.captures(text.trim())?;
    let number = |i: usize| -> Option<f64> {
        caps.get(i)
            .map(|m| m.as_str().replace(',', ".").parse::<f64>())
            .transpose()
            .ok()
            .flatten()
    };

    let degrees = number(2)?;
    let minutes = number(3).unwrap_or(0.0);
    let seconds = number(4).unwrap_or(0.0);
    if minutes >= 60.0 || seconds >= 60.0 {
        return None;
    }

    let magnitude = degrees.abs() + minutes / 60.0 + seconds / 3600.0;
    let hemisphere = caps
        .get(5)
        .or_else(|| caps.get(1))
        .map(|m| m.as_str().to_ascii_uppercase());
    let negative = degrees.is_sign_negative() || matches!(hemisphere.as_deref(), Some("S" | "W"));

    Some(if negative { -magnitude } else { magnitude })
}

/// Min/max coordinate range
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl Bounds {
    pub fn from_point(point: &Coordinates) -> Self {
        Self {
            min_lat: point.latitude(),
            max_lat: point.latitude(),
            min_lon: point.longitude(),
            max_lon: point.longitude(),
        }
    }

    #[must_use]
    pub fn merge(self, other: &Bounds) -> Self {
        Self {
            min_lat: self.min_lat.min(other.min_lat),
            max_lat: self.max_lat.max(other.max_lat),
            min_lon: self.min_lon.min(other.min_lon),
            max_lon: self.max_lon.max(other.max_lon),
        }
    }

    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.min_lat)
            && (-90.0..=90.0).contains(&self.max_lat)
            && (-180.0..=180.0).contains(&self.min_lon)
            && (-180.0..=180.0).contains(&self.max_lon)
            && self.min_lat <= self.max_lat
            && self.min_lon <= self.max_lon
    }
}

// ============================================================================
// Spots
// ============================================================================

/// Labelled spot attributes, in export column order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpotField {
    Distance,
    Walk,
    EasyToFind,
    PublicAccess,
    AccessType,
    WaveQuality,
    Experience,
    Frequency,
    WaveType,
    Direction,
    Bottom,
    Power,
    NormalLength,
    GoodDayLength,
    SwellDirection,
    WindDirection,
    SwellSize,
    BestTidePosition,
    BestTideMovement,
}

impl SpotField {
    pub const ALL: [SpotField; 19] = [
        Self::Distance,
        Self::Walk,
        Self::EasyToFind,
        Self::PublicAccess,
        Self::AccessType,
        Self::WaveQuality,
        Self::Experience,
        Self::Frequency,
        Self::WaveType,
        Self::Direction,
        Self::Bottom,
        Self::Power,
        Self::NormalLength,
        Self::GoodDayLength,
        Self::SwellDirection,
        Self::WindDirection,
        Self::SwellSize,
        Self::BestTidePosition,
        Self::BestTideMovement,
    ];

    pub fn header(self) -> &'static str {
        match self {
            Self::Distance => "Distance",
            Self::Walk => "Walk",
            Self::EasyToFind => "Easy to find?",
            Self::PublicAccess => "Public access?",
            Self::AccessType => "Access type",
            Self::WaveQuality => "Wave quality",
            Self::Experience => "Experience",
            Self::Frequency => "Frequency",
            Self::WaveType => "Type",
            Self::Direction => "Direction",
            Self::Bottom => "Bottom",
            Self::Power => "Power",
            Self::NormalLength => "Normal length",
            Self::GoodDayLength => "Good day length",
            Self::SwellDirection => "Good swell direction",
            Self::WindDirection => "Good wind direction",
            Self::SwellSize => "Swell size",
            Self::BestTidePosition => "Best tide position",
            Self::BestTideMovement => "Best tide movement",
        }
    }

    /// Match a page label ("Easy to find?", "Special access:") to a field
    pub fn from_label(label: &str) -> Option<Self> {
        let key = label
            .trim()
            .trim_end_matches(':')
            .trim_end_matches('?')
            .trim()
            .to_lowercase();

        let field = match key.as_str() {
            "distance" => Self::Distance,
            "walk" => Self::Walk,
            "easy to find" => Self::EasyToFind,
            "public access" => Self::PublicAccess,
            "special access" | "access type" | "access" => Self::AccessType,
            "wave quality" | "quality" => Self::WaveQuality,
            "experience" => Self::Experience,
            "frequency" => Self::Frequency,
            "type" | "wave type" => Self::WaveType,
            "direction" => Self::Direction,
            "bottom" => Self::Bottom,
            "power" => Self::Power,
            "normal length" => Self::NormalLength,
            "good day length" => Self::GoodDayLength,
            "good swell direction" | "swell direction" => Self::SwellDirection,
            "good wind direction" | "wind direction" => Self::WindDirection,
            "swell size" => Self::SwellSize,
            "best tide position" => Self::BestTidePosition,
            "best tide movement" => Self::BestTideMovement,
            _ => return None,
        };
        Some(field)
    }
}

/// A single surf spot, the leaf of the catalog
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Spot {
    pub name: String,
    pub url: String,
    pub coordinates: Option<Coordinates>,
    pub distance: Option<String>,
    pub walk: Option<String>,
    pub easy_to_find: Option<String>,
    pub public_access: Option<String>,
    pub access_type: Option<String>,
    pub wave_quality: Option<String>,
    pub experience: Option<String>,
    pub frequency: Option<String>,
    pub wave_type: Option<String>,
    pub direction: Option<String>,
    pub bottom: Option<String>,
    pub power: Option<String>,
    pub normal_length: Option<String>,
    pub good_day_length: Option<String>,
    pub swell_direction: Option<String>,
    pub wind_direction: Option<String>,
    pub swell_size: Option<String>,
    pub best_tide_position: Option<String>,
    pub best_tide_movement: Option<String>,
    pub seasons: SeasonTable,
    pub water_temperature: Option<String>,
    pub air_temperature: Option<String>,
    pub additional_information: Option<String>,
    /// Labels the parser found but does not model
    pub extra: BTreeMap<String, String>,
}

impl Spot {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn field(&self, field: SpotField) -> Option<&str> {
        self.slot(field).as_deref()
    }

    pub fn set_field(&mut self, field: SpotField, value: impl Into<String>) {
        *self.slot_mut(field) = Some(value.into());
    }

    /// Primary seasonal row, empty when the page had no season table
    pub fn season(&self) -> SeasonRow {
        self.seasons.primary().cloned().unwrap_or_default()
    }

    /// Whether any detail beyond the name was extracted
    pub fn has_details(&self) -> bool {
        self.coordinates.is_some()
            || SpotField::ALL.iter().any(|f| self.field(*f).is_some())
            || !self.seasons.is_empty()
            || self.water_temperature.is_some()
            || self.air_temperature.is_some()
            || self.additional_information.is_some()
            || !self.extra.is_empty()
    }

    fn slot(&self, field: SpotField) -> &Option<String> {
        match field {
            SpotField::Distance => &self.distance,
            SpotField::Walk => &self.walk,
            SpotField::EasyToFind => &self.easy_to_find,
            SpotField::PublicAccess => &self.public_access,
            SpotField::AccessType => &self.access_type,
            SpotField::WaveQuality => &self.wave_quality,
            SpotField::Experience => &self.experience,
            SpotField::Frequency => &self.frequency,
            SpotField::WaveType => &self.wave_type,
            SpotField::Direction => &self.direction,
            SpotField::Bottom => &self.bottom,
            SpotField::Power => &self.power,
            SpotField::NormalLength => &self.normal_length,
            SpotField::GoodDayLength => &self.good_day_length,
            SpotField::SwellDirection => &self.swell_direction,
            SpotField::WindDirection => &self.wind_direction,
            SpotField::SwellSize => &self.swell_size,
            SpotField::BestTidePosition => &self.best_tide_position,
            SpotField::BestTideMovement => &self.best_tide_movement,
        }
    }

    fn slot_mut(&mut self, field: SpotField) -> &mut Option<String> {
        match field {
            SpotField::Distance => &mut self.distance,
            SpotField::Walk => &mut self.walk,
            SpotField::EasyToFind => &mut self.easy_to_find,
            SpotField::PublicAccess => &mut self.public_access,
            SpotField::AccessType => &mut self.access_type,
            SpotField::WaveQuality => &mut self.wave_quality,
            SpotField::Experience => &mut self.experience,
            SpotField::Frequency => &mut self.frequency,
            SpotField::WaveType => &mut self.wave_type,
            SpotField::Direction => &mut self.direction,
            SpotField::Bottom => &mut self.bottom,
            SpotField::Power => &mut self.power,
            SpotField::NormalLength => &mut self.normal_length,
            SpotField::GoodDayLength => &mut self.good_day_length,
            SpotField::SwellDirection => &mut self.swell_direction,
            SpotField::WindDirection => &mut self.wind_direction,
            SpotField::SwellSize => &mut self.swell_size,
            SpotField::BestTidePosition => &mut self.best_tide_position,
            SpotField::BestTideMovement => &mut self.best_tide_movement,
        }
    }
}

// ============================================================================
// Areas and the catalog tree
// ============================================================================

/// Per-bucket union of distinct seasonal values
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeasonUnion([BTreeSet<String>; 6]);

impl SeasonUnion {
    pub fn add_row(&mut self, row: &SeasonRow) {
        for (bucket, value) in row.iter() {
            if let Some(value) = value {
                for part in value.split(" / ") {
                    self.0[bucket.index()].insert(part.to_string());
                }
            }
        }
    }

    pub fn absorb(&mut self, other: &SeasonUnion) {
        for (mine, theirs) in self.0.iter_mut().zip(other.0.iter()) {
            mine.extend(theirs.iter().cloned());
        }
    }

    pub fn values(&self, bucket: SeasonBucket) -> &BTreeSet<String> {
        &self.0[bucket.index()]
    }

    pub fn is_empty(&self) -> bool {
        self.0.iter().all(BTreeSet::is_empty)
    }
}

/// Derived figures for a country or zone
///
/// Always recomputed by the aggregator from the current children.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Summary {
    /// All spots below this area
    pub spot_count: usize,
    /// Direct sub-zones
    pub zone_count: usize,
    pub seasons: SeasonUnion,
    pub bounds: Option<Bounds>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AreaKind {
    Country,
    Zone,
}

/// Descriptive content of a country or zone page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AreaInfo {
    pub about: Option<String>,
    /// Only present on country pages
    pub at_a_glance: Option<String>,
    pub seasons: SeasonTable,
    pub map_url: Option<String>,
}

impl AreaInfo {
    pub fn is_empty(&self) -> bool {
        self.about.is_none()
            && self.at_a_glance.is_none()
            && self.seasons.is_empty()
            && self.map_url.is_none()
    }
}

/// A country or a (sub-)zone
#[derive(Debug, Clone, PartialEq)]
pub struct Area {
    pub name: String,
    pub url: String,
    pub kind: AreaKind,
    pub info: AreaInfo,
    pub children: Vec<Node>,
    pub summary: Summary,
}

/// Child of an area: either a nested zone or a spot
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Zone(Area),
    Spot(Spot),
}

impl Area {
    pub fn new(name: impl Into<String>, url: impl Into<String>, kind: AreaKind) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            kind,
            info: AreaInfo::default(),
            children: Vec::new(),
            summary: Summary::default(),
        }
    }

    #[must_use]
    pub fn with_info(mut self, info: AreaInfo) -> Self {
        self.info = info;
        self
    }

    pub fn push_spot(&mut self, spot: Spot) {
        self.children.push(Node::Spot(spot));
    }

    pub fn push_zone(&mut self, zone: Area) {
        self.children.push(Node::Zone(zone));
    }

    /// Spots attached directly to this area
    pub fn spots(&self) -> impl Iterator<Item = &Spot> {
        self.children.iter().filter_map(|c| match c {
            Node::Spot(s) => Some(s),
            Node::Zone(_) => None,
        })
    }

    /// Direct sub-zones
    pub fn zones(&self) -> impl Iterator<Item = &Area> {
        self.children.iter().filter_map(|c| match c {
            Node::Zone(z) => Some(z),
            Node::Spot(_) => None,
        })
    }

    pub fn is_leaf(&self) -> bool {
        self.zones().next().is_none()
    }

    /// Remove a direct child by position, returning it
    pub fn remove_child(&mut self, index: usize) -> Option<Node> {
        (index < self.children.len()).then(|| self.children.remove(index))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Continent {
    pub name: String,
    pub countries: Vec<Area>,
}

impl Continent {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            countries: Vec::new(),
        }
    }
}

/// Which part of the hierarchy a node belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Continent,
    Country,
    Zone,
    Spot,
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Continent => "continent",
            Self::Country => "country",
            Self::Zone => "zone",
            Self::Spot => "spot",
        };
        f.write_str(s)
    }
}

/// A node that was skipped because it could not be fetched or parsed
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeFailure {
    pub path: String,
    pub url: String,
    pub kind: NodeKind,
    pub category: ErrorCategory,
    pub error: String,
}

/// Result of one crawl
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScrapeTree {
    pub continents: Vec<Continent>,
    pub failures: Vec<NodeFailure>,
}

impl ScrapeTree {
    pub fn country_count(&self) -> usize {
        self.continents.iter().map(|c| c.countries.len()).sum()
    }

    /// All zones at any depth
    pub fn zone_count(&self) -> usize {
        fn count(area: &Area) -> usize {
            area.zones().map(|z| 1 + count(z)).sum()
        }
        self.continents
            .iter()
            .flat_map(|c| c.countries.iter())
            .map(count)
            .sum()
    }

    /// Spots at any depth, counted from the tree itself
    pub fn spot_count(&self) -> usize {
        fn count(area: &Area) -> usize {
            area.children
                .iter()
                .map(|c| match c {
                    Node::Spot(_) => 1,
                    Node::Zone(z) => count(z),
                })
                .sum()
        }
        self.continents
            .iter()
            .flat_map(|c| c.countries.iter())
            .map(count)
            .sum()
    }
}

/// Traversal breadth
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrapeMode {
    /// Visit at most a fixed number of children per level
    Sample,
    /// Visit every discovered child
    Full,
}

impl ScrapeMode {
    pub fn from_sample_flag(sample: bool) -> Self {
        if sample {
            Self::Sample
        } else {
            Self::Full
        }
    }
}

impl std::fmt::Display for ScrapeMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sample => f.write_str("sample"),
            Self::Full => f.write_str("full"),
        }
    }
}
