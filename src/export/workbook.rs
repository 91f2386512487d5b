//! Per-continent workbooks with `Country`, `Zones` and `Spots` sheets

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};

use crate::export::{
    country_row, ensure_dir, spot_row, unique_stem, zone_row, Cell, SpotContext, COUNTRY_COLUMNS,
    SPOT_COLUMNS, ZONE_COLUMNS,
};
use crate::models::{Area, Continent};
use crate::utils::error::ExportError;
use crate::utils::sanitize_filename;

pub const COUNTRY_SHEET: &str = "Country";
pub const ZONES_SHEET: &str = "Zones";
pub const SPOTS_SHEET: &str = "Spots";

/// Writes one `.xlsx` file per continent
pub struct WorkbookExporter {
    dir: PathBuf,
}

impl WorkbookExporter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write `{Continent}.xlsx`
    ///
    /// A continent without countries still yields the three sheets, each
    /// holding only its header row.
    ///
    /// # Errors
    ///
    /// Returns `ExportError::Io` if the directory cannot be created and
    /// `ExportError::Workbook` if the workbook cannot be built or saved
    pub fn export(&self, continent: &Continent) -> Result<PathBuf, ExportError> {
        self.write(continent, &sanitize_filename(&continent.name))
    }

    /// Write one workbook per continent
    ///
    /// Continents whose names sanitize to the same stem get `_2`, `_3`
    /// suffixes instead of overwriting each other.
    ///
    /// # Errors
    ///
    /// Stops at the first continent that fails
    pub fn export_all(&self, continents: &[Continent]) -> Result<Vec<PathBuf>, ExportError> {
        let mut used = HashSet::new();
        continents
            .iter()
            .map(|c| {
                let stem = unique_stem(&mut used, sanitize_filename(&c.name));
                self.write(c, &stem)
            })
            .collect()
    }

    fn write(&self, continent: &Continent, stem: &str) -> Result<PathBuf, ExportError> {
        ensure_dir(&self.dir)?;

        let path = self.dir.join(format!("{stem}.xlsx"));
        let workbook_err = |source| ExportError::Workbook {
            path: path.display().to_string(),
            source,
        };

        let mut workbook = Workbook::new();
        fill_workbook(&mut workbook, continent).map_err(workbook_err)?;
        workbook.save(&path).map_err(workbook_err)?;

        tracing::info!(
            continent = %continent.name,
            path = %path.display(),
            countries = continent.countries.len(),
            "Wrote workbook"
        );
        Ok(path)
    }
}

/// Rows of the three sheets, in sheet order
pub struct SheetRows {
    pub countries: Vec<Vec<Cell>>,
    pub zones: Vec<Vec<Cell>>,
    pub spots: Vec<Vec<Cell>>,
}

impl SheetRows {
    pub fn for_continent(continent: &Continent) -> Self {
        let mut rows = Self {
            countries: Vec::new(),
            zones: Vec::new(),
            spots: Vec::new(),
        };

        for country in &continent.countries {
            rows.countries.push(country_row(&continent.name, country));

            let ctx = SpotContext::new(&continent.name, &country.name);
            rows.collect(&continent.name, country, &country.name, &ctx);
        }
        rows
    }

    /// Zones are listed depth-first with their parent; spots follow tree order
    fn collect(&mut self, continent: &str, area: &Area, country: &str, ctx: &SpotContext<'_>) {
        self.spots.extend(area.spots().map(|s| spot_row(ctx, s)));
        for zone in area.zones() {
            self.zones.push(zone_row(continent, country, &area.name, zone));
            self.collect(continent, zone, country, &ctx.child(&zone.name));
        }
    }
}

fn fill_workbook(workbook: &mut Workbook, continent: &Continent) -> Result<(), XlsxError> {
    let rows = SheetRows::for_continent(continent);
    let header = Format::new().set_bold();
    let wrap = Format::new().set_text_wrap();

    write_sheet(
        workbook.add_worksheet(),
        COUNTRY_SHEET,
        &COUNTRY_COLUMNS,
        &rows.countries,
        &header,
        &wrap,
    )?;
    write_sheet(
        workbook.add_worksheet(),
        ZONES_SHEET,
        &ZONE_COLUMNS,
        &rows.zones,
        &header,
        &wrap,
    )?;
    write_sheet(
        workbook.add_worksheet(),
        SPOTS_SHEET,
        &SPOT_COLUMNS,
        &rows.spots,
        &header,
        &wrap,
    )?;
    Ok(())
}

fn write_sheet(
    sheet: &mut Worksheet,
    name: &str,
    columns: &[&str],
    rows: &[Vec<Cell>],
    header: &Format,
    wrap: &Format,
) -> Result<(), XlsxError> {
    sheet.set_name(name)?;

    for (col, title) in (0u16..).zip(columns) {
        sheet.write_string_with_format(0, col, *title, header)?;
    }
    sheet.set_freeze_panes(1, 0)?;

    for (row, cells) in (1u32..).zip(rows) {
        for (col, cell) in (0u16..).zip(cells) {
            match cell {
                Cell::Number(n) => {
                    sheet.write_number(row, col, *n)?;
                }
                Cell::Text(s) if s.contains('\n') => {
                    sheet.write_string_with_format(row, col, s, wrap)?;
                }
                Cell::Text(s) => {
                    sheet.write_string(row, col, s)?;
                }
            }
        }
    }
    Ok(())
}
