//! CSV and workbook output
//!
//! Column order and header names are fixed here and shared by both writers.
//! Absent values are written as [`ABSENT`] so that a blank cell never has to
//! be told apart from a value that was not scraped.

pub mod csv;
pub mod workbook;

pub use self::csv::CsvExporter;
pub use self::workbook::WorkbookExporter;

use std::collections::HashSet;
use std::path::Path;

use crate::models::{Area, Bounds, SeasonBucket, SeasonMetric, SeasonRow, SeasonUnion, Spot, SpotField};
use crate::utils::error::ExportError;

/// Marker written for every absent value
pub const ABSENT: &str = "empty";

/// Spot rows, shared by the CSV files and the `Spots` sheet
pub const SPOT_COLUMNS: [&str; 36] = [
    "Continent",
    "Country",
    "Zone",
    "Spot",
    "URL",
    "Latitude",
    "Longitude",
    "Distance",
    "Walk",
    "Easy to find?",
    "Public access?",
    "Access type",
    "Wave quality",
    "Experience",
    "Frequency",
    "Type",
    "Direction",
    "Bottom",
    "Power",
    "Normal length",
    "Good day length",
    "Good swell direction",
    "Good wind direction",
    "Swell size",
    "Best tide position",
    "Best tide movement",
    "Jan/Feb",
    "Mar/Apr",
    "May/Jun",
    "Jul/Aug",
    "Sep/Oct",
    "Nov/Dec",
    "Water temp",
    "Air temp",
    "Additional information",
    "Other details",
];

/// `Country` sheet
pub const COUNTRY_COLUMNS: [&str; 17] = [
    "Country",
    "Continent",
    "URL",
    "About",
    "At a glance",
    "Spot count",
    "Zone count",
    "Min latitude",
    "Max latitude",
    "Min longitude",
    "Max longitude",
    "Best surfing season",
    "Typical swell size",
    "Surf equipment",
    "Water temp",
    "Air temp",
    "Spot seasons",
];

/// `Zones` sheet
pub const ZONE_COLUMNS: [&str; 19] = [
    "Continent",
    "Country",
    "Parent",
    "Zone",
    "URL",
    "Spot count",
    "Sub zones",
    "About",
    "Map",
    "Min latitude",
    "Max latitude",
    "Min longitude",
    "Max longitude",
    "Best surfing season",
    "Typical swell size",
    "Surf equipment",
    "Water temp",
    "Air temp",
    "Spot seasons",
];

/// One cell of an exported row
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
}

impl Cell {
    fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    fn optional(value: Option<&str>) -> Self {
        Self::Text(value.unwrap_or(ABSENT).to_string())
    }

    fn count(value: usize) -> Self {
        Self::Number(value as f64)
    }

    /// Text form, as written to CSV
    pub fn as_text(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Number(n) => n.to_string(),
        }
    }
}

/// Ancestor names of a spot, carried down while walking the tree
#[derive(Debug, Clone, PartialEq)]
pub struct SpotContext<'a> {
    pub continent: &'a str,
    pub country: &'a str,
    /// Zone names from the country down, empty for spots on the country itself
    pub zones: Vec<&'a str>,
}

impl<'a> SpotContext<'a> {
    pub fn new(continent: &'a str, country: &'a str) -> Self {
        Self {
            continent,
            country,
            zones: Vec::new(),
        }
    }

    #[must_use]
    pub fn child(&self, zone: &'a str) -> Self {
        let mut next = self.clone();
        next.zones.push(zone);
        next
    }

    /// "Basque > North", or `None` directly under the country
    pub fn zone_path(&self) -> Option<String> {
        (!self.zones.is_empty()).then(|| self.zones.join(" > "))
    }
}

/// Row for [`SPOT_COLUMNS`]
pub fn spot_row(ctx: &SpotContext<'_>, spot: &Spot) -> Vec<Cell> {
    let mut row = Vec::with_capacity(SPOT_COLUMNS.len());
    row.push(Cell::text(ctx.continent));
    row.push(Cell::text(ctx.country));
    row.push(Cell::optional(ctx.zone_path().as_deref()));
    row.push(Cell::text(spot.name.as_str()));
    row.push(Cell::text(spot.url.as_str()));

    match &spot.coordinates {
        Some(c) => {
            row.push(Cell::Number(c.latitude()));
            row.push(Cell::Number(c.longitude()));
        }
        None => {
            row.push(Cell::text(ABSENT));
            row.push(Cell::text(ABSENT));
        }
    }

    for field in SpotField::ALL {
        row.push(Cell::optional(spot.field(field)));
    }

    let season = spot.season();
    for bucket in SeasonBucket::ALL {
        row.push(Cell::optional(season.get(bucket)));
    }

    row.push(Cell::optional(spot.water_temperature.as_deref()));
    row.push(Cell::optional(spot.air_temperature.as_deref()));
    row.push(Cell::optional(spot.additional_information.as_deref()));

    let other = spot
        .extra
        .iter()
        .map(|(label, value)| format!("{label}: {value}"))
        .collect::<Vec<_>>()
        .join("; ");
    row.push(Cell::optional((!other.is_empty()).then_some(other.as_str())));

    row
}

/// Row for [`COUNTRY_COLUMNS`]
pub fn country_row(continent: &str, country: &Area) -> Vec<Cell> {
    let mut row = vec![
        Cell::text(country.name.as_str()),
        Cell::text(continent),
        Cell::text(country.url.as_str()),
        Cell::optional(country.info.about.as_deref()),
        Cell::optional(country.info.at_a_glance.as_deref()),
        Cell::count(country.summary.spot_count),
        Cell::count(country.summary.zone_count),
    ];
    row.extend(bounds_cells(country.summary.bounds.as_ref()));
    row.extend(area_season_cells(country));
    row
}

/// Row for [`ZONE_COLUMNS`]
pub fn zone_row(continent: &str, country: &str, parent: &str, zone: &Area) -> Vec<Cell> {
    let mut row = vec![
        Cell::text(continent),
        Cell::text(country),
        Cell::text(parent),
        Cell::text(zone.name.as_str()),
        Cell::text(zone.url.as_str()),
        Cell::count(zone.summary.spot_count),
        Cell::count(zone.summary.zone_count),
        Cell::optional(zone.info.about.as_deref()),
        Cell::optional(zone.info.map_url.as_deref()),
    ];
    row.extend(bounds_cells(zone.summary.bounds.as_ref()));
    row.extend(area_season_cells(zone));
    row
}

fn bounds_cells(bounds: Option<&Bounds>) -> Vec<Cell> {
    match bounds {
        Some(b) => vec![
            Cell::Number(b.min_lat),
            Cell::Number(b.max_lat),
            Cell::Number(b.min_lon),
            Cell::Number(b.max_lon),
        ],
        None => vec![Cell::text(ABSENT); 4],
    }
}

/// The area's own season metrics, then the union over its spots
fn area_season_cells(area: &Area) -> Vec<Cell> {
    let mut cells: Vec<Cell> = SeasonMetric::KNOWN
        .iter()
        .map(|metric| Cell::Text(format_season_row(area.info.seasons.get(metric))))
        .collect();
    cells.push(Cell::Text(format_season_union(&area.summary.seasons)));
    cells
}

/// One "Jan/Feb - value" line per bucket
pub fn format_season_row(row: Option<&SeasonRow>) -> String {
    SeasonBucket::ALL
        .iter()
        .map(|bucket| {
            let value = row.and_then(|r| r.get(*bucket)).unwrap_or(ABSENT);
            format!("{bucket} - {value}")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// One "Jan/Feb - a, b" line per bucket
pub fn format_season_union(union: &SeasonUnion) -> String {
    SeasonBucket::ALL
        .iter()
        .map(|bucket| {
            let values = union.values(*bucket);
            if values.is_empty() {
                format!("{bucket} - {ABSENT}")
            } else {
                let joined = values.iter().map(String::as_str).collect::<Vec<_>>().join(", ");
                format!("{bucket} - {joined}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Create an output directory, accepting one that already exists
pub(crate) fn ensure_dir(dir: &Path) -> Result<(), ExportError> {
    std::fs::create_dir_all(dir).map_err(|source| ExportError::Io {
        path: dir.display().to_string(),
        source,
    })
}

/// Suffix `_2`, `_3` and so on when two names sanitize to the same stem
pub(crate) fn unique_stem(used: &mut HashSet<String>, stem: String) -> String {
    if used.insert(stem.clone()) {
        return stem;
    }
    let mut n = 2;
    loop {
        let candidate = format!("{stem}_{n}");
        if used.insert(candidate.clone()) {
            return candidate;
        }
        n += 1;
    }
}
