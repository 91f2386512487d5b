//! Page parser for the catalog's index and spot pages
//!
//! One parser handles every page kind. The kind is always given by the caller
//! (the walker knows what it asked for), so there is no format detection; the
//! only fallback logic is inside each page kind, where the site's markup varies.

use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::models::{AreaInfo, Coordinates, SeasonMetric, SeasonRow, Spot, SpotField};
use crate::parser::sanitize::{clean_text, is_about_placeholder, is_glance_placeholder, non_empty};
use crate::parser::seasons::SeasonTableParser;
use crate::parser::selectors::{AreaSelectors, IndexSelectors, SpotSelectors};
use crate::parser::{ChildKind, ChildLink, IndexPage, PageKind, ParsedPage};
use crate::utils::error::ParseError;
use crate::utils::{last_path_segment, resolve_url};

/// Parser for every page kind of the catalog
pub struct PageParser {
    index: IndexSelectors,
    area: AreaSelectors,
    spot: SpotSelectors,
    seasons: SeasonTableParser,
}

impl PageParser {
    #[must_use]
    pub fn new() -> Self {
        Self {
            index: IndexSelectors::new(),
            area: AreaSelectors::new(),
            spot: SpotSelectors::new(),
            seasons: SeasonTableParser::new(),
        }
    }

    /// Parse a page of the given kind
    ///
    /// # Arguments
    /// * `html` - Raw markup
    /// * `url` - Absolute URL the markup was fetched from; relative links are
    ///   resolved against it
    /// * `kind` - What the caller expects the page to be
    ///
    /// # Errors
    /// Returns `ParseError::Malformed` when the markup has neither a
    /// recognizable child list nor any record fields. Missing optional
    /// fields never fail the parse.
    pub fn parse(&self, html: &str, url: &str, kind: PageKind) -> Result<ParsedPage, ParseError> {
        let base = Url::parse(url)
            .map_err(|e| ParseError::malformed(kind, format!("invalid page URL '{url}': {e}")))?;
        let document = Html::parse_document(html);

        match kind {
            PageKind::ContinentIndex => self
                .parse_continent_index(&document, &base)
                .map(ParsedPage::Index),
            PageKind::CountryIndex => self
                .parse_area(&document, &base, kind)
                .map(ParsedPage::Index),
            PageKind::RegionIndex => self
                .parse_area(&document, &base, kind)
                .map(ParsedPage::Index),
            PageKind::SpotDetail => self
                .parse_spot(&document, &base)
                .map(|spot| ParsedPage::SpotDetail(Box::new(spot))),
        }
    }

    /// Home page: continent headings, each followed by a table of countries
    fn parse_continent_index(&self, document: &Html, base: &Url) -> Result<IndexPage, ParseError> {
        let mut page = IndexPage {
            title: self.page_title(document),
            ..Default::default()
        };

        for heading in document.select(self.index.continent_heading) {
            let name = heading
                .select(self.index.anchor)
                .next()
                .map(|a| clean_text(&element_text(a)))
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| clean_text(&element_text(heading)));
            if name.is_empty() {
                tracing::debug!("Skipping continent heading without text");
                continue;
            }

            // A heading without its own table is an empty continent; the search
            // stops at the next heading so it cannot borrow a neighbour's table
            let table = next_after(document, heading, self.index.table, self.index.continent_heading);
            if let Some(table) = table {
                for link in table.select(self.index.country_link) {
                    if let Some(child) = child_link(link, base, ChildKind::Country, Some(&name)) {
                        page.children.push(child);
                    }
                }
            }

            tracing::debug!(continent = %name, "Found continent");
            page.groups.push(name);
        }

        if page.groups.is_empty() {
            return Err(ParseError::malformed(
                PageKind::ContinentIndex,
                "no continent headings found",
            ));
        }

        Ok(page)
    }

    /// Country or zone page: descriptive tabs plus zone and spot tables
    fn parse_area(&self, document: &Html, base: &Url, kind: PageKind) -> Result<IndexPage, ParseError> {
        let about_tab = document.select(self.area.about_tab).next();
        let infos_tab = document.select(self.area.infos_tab).next();
        let season_table = document.select(self.area.season_table).next();

        let about = about_tab.and_then(|tab| {
            tab.select(self.area.inline_paragraph)
                .next()
                .or_else(|| tab.select(self.area.paragraph).next())
                .and_then(|p| non_empty(&element_text(p)))
                .filter(|text| !is_about_placeholder(text))
        });

        let at_a_glance = if kind == PageKind::CountryIndex {
            infos_tab
                .and_then(|tab| non_empty(&element_text(tab)))
                .filter(|text| !is_glance_placeholder(text))
        } else {
            None
        };

        let map_url = document
            .select(self.area.map_image)
            .next()
            .and_then(|img| img.value().attr("src"))
            .and_then(|src| resolve_url(base, src))
            .map(String::from);

        let info = AreaInfo {
            about,
            at_a_glance,
            seasons: season_table
                .map(|table| self.seasons.parse(table))
                .unwrap_or_default(),
            map_url,
        };

        let mut children = Vec::new();
        let mut has_sections = false;
        for heading in document.select(self.area.section_heading) {
            has_sections = true;
            let text = clean_text(&element_text(heading)).to_lowercase();
            let child_kind = if text.contains("surf spots") {
                ChildKind::Spot
            } else if text.contains("zones") {
                ChildKind::Zone
            } else {
                continue;
            };

            let Some(table) = next_after(document, heading, self.area.table, self.area.section_heading)
            else {
                continue;
            };

            for row in table.select(self.area.row) {
                let Some(first_cell) = row.select(self.area.data_cell).next() else {
                    continue;
                };
                let Some(link) = first_cell.select(self.area.anchor).next() else {
                    continue;
                };
                if let Some(child) = child_link(link, base, child_kind, None) {
                    children.push(child);
                }
            }
        }

        let recognizable = has_sections || about_tab.is_some() || season_table.is_some();
        if children.is_empty() && info.is_empty() && !recognizable {
            return Err(ParseError::malformed(kind, "no child list or area content found"));
        }

        let title = self
            .page_title(document)
            .or_else(|| last_path_segment(base.as_str()));

        tracing::debug!(
            title = ?title,
            children = children.len(),
            "Parsed {kind} page"
        );

        Ok(IndexPage {
            title,
            info,
            groups: Vec::new(),
            children,
        })
    }

    /// Spot page: labelled paragraphs, GPS position, season table, free text
    fn parse_spot(&self, document: &Html, base: &Url) -> Result<Spot, ParseError> {
        let name = self
            .page_title(document)
            .or_else(|| last_path_segment(base.as_str()))
            .unwrap_or_default();
        let mut spot = Spot::new(name, base.as_str());

        for paragraph in document.select(self.spot.label_paragraph) {
            let Some(label_span) = paragraph.select(self.spot.item_label).next() else {
                continue;
            };
            let label = clean_text(&element_text(label_span))
                .trim_end_matches(':')
                .trim()
                .to_string();
            let Some(value) = non_empty(&text_outside_spans(paragraph)) else {
                continue;
            };

            if let Some(field) = SpotField::from_label(&label) {
                spot.set_field(field, value);
                continue;
            }

            match SeasonMetric::from_label(&label) {
                SeasonMetric::WaterTemp => spot.water_temperature = Some(value),
                SeasonMetric::AirTemp => spot.air_temperature = Some(value),
                _ if label.is_empty() => {}
                _ => {
                    tracing::trace!(label = %label, "Unmodelled spot label");
                    spot.extra.insert(label, value);
                }
            }
        }

        let mut has_sections = false;
        for heading in document.select(self.spot.section_heading) {
            has_sections = true;
            let text = clean_text(&element_text(heading)).to_lowercase();
            if !text.starts_with("additional information") {
                continue;
            }
            spot.additional_information = next_after(
                document,
                heading,
                self.spot.inline_paragraph,
                self.spot.section_heading,
            )
            .and_then(|p| non_empty(&element_text(p)));
            break;
        }

        spot.coordinates = self.parse_coordinates(document, &spot.name);

        if let Some(table) = document.select(self.spot.season_table).next() {
            spot.seasons = self.seasons.parse(table);
        }
        if spot.water_temperature.is_none() {
            spot.water_temperature = spot
                .seasons
                .get(&SeasonMetric::WaterTemp)
                .and_then(season_summary);
        }
        if spot.air_temperature.is_none() {
            spot.air_temperature = spot
                .seasons
                .get(&SeasonMetric::AirTemp)
                .and_then(season_summary);
        }

        if !has_sections && !spot.has_details() {
            return Err(ParseError::malformed(
                PageKind::SpotDetail,
                "no spot sections or fields found",
            ));
        }

        tracing::debug!(spot = %spot.name, located = spot.coordinates.is_some(), "Parsed spot");
        Ok(spot)
    }

    /// Latitude/longitude from the GPS label spans
    fn parse_coordinates(&self, document: &Html, spot_name: &str) -> Option<Coordinates> {
        let mut latitude = None;
        let mut longitude = None;

        for span in document.select(self.spot.gps_label) {
            let label = clean_text(&element_text(span)).to_lowercase();
            if label.contains("latitude") {
                latitude = gps_value(span);
            } else if label.contains("longitude") {
                longitude = gps_value(span);
            }
        }

        let (latitude, longitude) = (latitude?, longitude?);
        let coordinates = Coordinates::parse(&latitude, &longitude);
        if coordinates.is_none() {
            tracing::warn!(
                spot = %spot_name,
                latitude = %latitude,
                longitude = %longitude,
                "Unusable GPS position, leaving coordinates absent"
            );
        }
        coordinates
    }

    /// Name part of `<title>`, before the " - Site" suffix
    fn page_title(&self, document: &Html) -> Option<String> {
        let title = document.select(self.area.title).next()?;
        let text = clean_text(&title.text().collect::<String>());
        let name = text.split(" - ").next().unwrap_or_default();
        non_empty(name)
    }
}

impl Default for PageParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Text of an element with its text nodes separated by spaces
fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<Vec<_>>().join(" ")
}

/// Text of a paragraph without the text of its label spans
fn text_outside_spans(paragraph: ElementRef<'_>) -> String {
    let mut out = String::new();
    for node in paragraph.descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };
        let in_span = node
            .ancestors()
            .take_while(|a| *a != *paragraph)
            .any(|a| a.value().as_element().is_some_and(|e| e.name() == "span"));
        if !in_span {
            out.push_str(text);
            out.push(' ');
        }
    }
    out
}

/// First text after a GPS label span, stopping at the next span
fn gps_value(span: ElementRef<'_>) -> Option<String> {
    for sibling in span.next_siblings() {
        if let Some(element) = ElementRef::wrap(sibling) {
            if element.value().name() == "span" {
                break;
            }
            if let Some(value) = non_empty(&element_text(element)) {
                return Some(value);
            }
        } else if let Some(text) = sibling.value().as_text() {
            if let Some(value) = non_empty(text) {
                return Some(value);
            }
        }
    }
    None
}

/// First element after `anchor` in document order matching `target`
///
/// The search ends at the next element matching `stop`.
fn next_after<'a>(
    document: &'a Html,
    anchor: ElementRef<'a>,
    target: &Selector,
    stop: &Selector,
) -> Option<ElementRef<'a>> {
    document
        .root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
        .skip_while(|el| *el != anchor)
        .skip(1)
        .take_while(|el| !stop.matches(el))
        .find(|el| target.matches(el))
}

fn child_link(
    anchor: ElementRef<'_>,
    base: &Url,
    kind: ChildKind,
    group: Option<&str>,
) -> Option<ChildLink> {
    let href = anchor.value().attr("href")?;
    let name = clean_text(&element_text(anchor));
    if name.is_empty() {
        return None;
    }
    let url = resolve_url(base, href)?;
    Some(ChildLink {
        name,
        url: url.into(),
        kind,
        group: group.map(String::from),
    })
}

/// "Jan/Feb: 12; Mar/Apr: 13" for the present values of a row
fn season_summary(row: &SeasonRow) -> Option<String> {
    let parts: Vec<String> = row
        .iter()
        .filter_map(|(bucket, value)| value.map(|v| format!("{bucket}: {v}")))
        .collect();
    (!parts.is_empty()).then(|| parts.join("; "))
}
