//! Per-region CSV files
//!
//! With [`CsvLayout::PerRegion`] a country that has at most one leaf region
//! gets a single `{Country}.csv`. Otherwise every leaf zone, and every zone
//! holding spots of its own, gets `{Country}_{Zone}.csv`, while spots hanging
//! directly off the country go to `{Country}.csv`. [`CsvLayout::PerCountry`]
//! always writes one file per country.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::config::CsvLayout;
use crate::export::{ensure_dir, spot_row, unique_stem, Cell, SpotContext, SPOT_COLUMNS};
use crate::models::{Area, Continent, ScrapeTree};
use crate::utils::error::ExportError;
use crate::utils::sanitize_filename;

/// Rows destined for one file
struct CsvFile {
    stem: String,
    rows: Vec<Vec<Cell>>,
}

/// Writes spot rows into a directory of CSV files
pub struct CsvExporter {
    dir: PathBuf,
    layout: CsvLayout,
}

impl CsvExporter {
    pub fn new(dir: impl Into<PathBuf>, layout: CsvLayout) -> Self {
        Self {
            dir: dir.into(),
            layout,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write every country of the tree
    ///
    /// Returns the written paths in tree order.
    ///
    /// # Errors
    ///
    /// Fails on the first file that cannot be created or written
    pub fn export(&self, tree: &ScrapeTree) -> Result<Vec<PathBuf>, ExportError> {
        ensure_dir(&self.dir)?;

        let mut used = HashSet::new();
        let mut written = Vec::new();
        for continent in &tree.continents {
            for file in self.plan_continent(continent) {
                let path = self.dir.join(format!("{}.csv", unique_stem(&mut used, file.stem)));
                write_file(&path, &file.rows)?;
                tracing::debug!(path = %path.display(), rows = file.rows.len(), "Wrote CSV");
                written.push(path);
            }
        }

        tracing::info!(dir = %self.dir.display(), files = written.len(), "CSV export finished");
        Ok(written)
    }

    fn plan_continent(&self, continent: &Continent) -> Vec<CsvFile> {
        let mut files = Vec::new();
        for country in &continent.countries {
            let ctx = SpotContext::new(&continent.name, &country.name);
            let single = match self.layout {
                CsvLayout::PerCountry => true,
                CsvLayout::PerRegion => leaf_regions(country) <= 1,
            };

            if single {
                let mut rows = Vec::new();
                collect_all(country, &ctx, &mut rows);
                files.push(CsvFile {
                    stem: sanitize_filename(&country.name),
                    rows,
                });
                continue;
            }

            let direct: Vec<_> = country.spots().map(|s| spot_row(&ctx, s)).collect();
            if !direct.is_empty() {
                files.push(CsvFile {
                    stem: sanitize_filename(&country.name),
                    rows: direct,
                });
            }
            for zone in country.zones() {
                plan_regions(zone, &ctx.child(&zone.name), &country.name, &mut files);
            }
        }
        files
    }
}

/// Zones with no sub-zones, at any depth
fn leaf_regions(area: &Area) -> usize {
    area.zones()
        .map(|z| if z.is_leaf() { 1 } else { leaf_regions(z) })
        .sum()
}

fn collect_all(area: &Area, ctx: &SpotContext<'_>, rows: &mut Vec<Vec<Cell>>) {
    rows.extend(area.spots().map(|s| spot_row(ctx, s)));
    for zone in area.zones() {
        collect_all(zone, &ctx.child(&zone.name), rows);
    }
}

fn plan_regions(zone: &Area, ctx: &SpotContext<'_>, country: &str, files: &mut Vec<CsvFile>) {
    let rows: Vec<_> = zone.spots().map(|s| spot_row(ctx, s)).collect();
    if zone.is_leaf() || !rows.is_empty() {
        files.push(CsvFile {
            stem: format!(
                "{}_{}",
                sanitize_filename(country),
                sanitize_filename(&zone.name)
            ),
            rows,
        });
    }
    for sub in zone.zones() {
        plan_regions(sub, &ctx.child(&sub.name), country, files);
    }
}

fn write_file(path: &Path, rows: &[Vec<Cell>]) -> Result<(), ExportError> {
    let csv_err = |source| ExportError::Csv {
        path: path.display().to_string(),
        source,
    };

    let mut writer = ::csv::Writer::from_path(path).map_err(csv_err)?;
    writer.write_record(SPOT_COLUMNS).map_err(csv_err)?;
    for row in rows {
        writer
            .write_record(row.iter().map(Cell::as_text))
            .map_err(csv_err)?;
    }
    writer.flush().map_err(|source| ExportError::Io {
        path: path.display().to_string(),
        source,
    })
}
