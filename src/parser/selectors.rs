//! CSS selectors for the catalog page layouts
//!
//! The site uses the same tab identifiers on country and zone pages, so one
//! selector set covers both; spot pages and the home page get their own.

use lazy_static::lazy_static;
use scraper::Selector;

// Helper macro to parse selectors safely at compile time
macro_rules! parse_selector {
    ($s:expr) => {
        Selector::parse($s).expect(concat!("Invalid CSS selector: ", $s))
    };
}

lazy_static! {
    static ref TITLE: Selector = parse_selector!("title");

    // Home page
    static ref CONTINENT_HEADING: Selector = parse_selector!("h2[class*='wanna-title-continent']");
    static ref COUNTRY_LINK: Selector =
        parse_selector!("a[class*='wanna-main-menu-static-tabbar-submenu']");
    static ref ANCHOR: Selector = parse_selector!("a");
    static ref TABLE: Selector = parse_selector!("table");

    // Country and zone pages
    static ref ABOUT_TAB: Selector = parse_selector!("#wanna-country-tab-about");
    static ref INFOS_TAB: Selector = parse_selector!("#wanna-country-tab-infos");
    static ref SEASON_TABLE: Selector = parse_selector!("#wanna-season-table");
    static ref MAP_IMAGE: Selector = parse_selector!("#wanna-item-tab-additional-map img[src]");
    static ref INLINE_PARAGRAPH: Selector = parse_selector!("p[style*='display:inline']");
    static ref PARAGRAPH: Selector = parse_selector!("p");
    static ref SECTION_HEADING: Selector = parse_selector!("h3.wanna-item");
    static ref TABLE_ROW: Selector = parse_selector!("tr");
    static ref TABLE_DATA: Selector = parse_selector!("td");

    // Season tables
    static ref THEAD_ROW: Selector = parse_selector!("thead tr");
    static ref TBODY_ROW: Selector = parse_selector!("tbody tr");
    static ref HEADER_CELL: Selector = parse_selector!("th");
    static ref ROW_CELL: Selector = parse_selector!("td, th");
    static ref IMAGE: Selector = parse_selector!("img");

    // Spot pages
    static ref LABEL_PARAGRAPH: Selector = parse_selector!("p");
    static ref ITEM_LABEL: Selector = parse_selector!("span.wanna-item-label");
    static ref GPS_LABEL: Selector = parse_selector!("span.wanna-item-label-gps");
}

/// Selectors for the continent index (home page)
pub struct IndexSelectors {
    pub continent_heading: &'static Selector,
    pub country_link: &'static Selector,
    pub anchor: &'static Selector,
    pub table: &'static Selector,
}

impl IndexSelectors {
    #[must_use]
    pub fn new() -> Self {
        Self {
            continent_heading: &CONTINENT_HEADING,
            country_link: &COUNTRY_LINK,
            anchor: &ANCHOR,
            table: &TABLE,
        }
    }
}

impl Default for IndexSelectors {
    fn default() -> Self {
        Self::new()
    }
}

/// Selectors for country and zone pages
pub struct AreaSelectors {
    pub title: &'static Selector,
    pub about_tab: &'static Selector,
    pub infos_tab: &'static Selector,
    pub season_table: &'static Selector,
    pub map_image: &'static Selector,
    pub inline_paragraph: &'static Selector,
    pub paragraph: &'static Selector,
    pub section_heading: &'static Selector,
    pub table: &'static Selector,
    pub row: &'static Selector,
    pub data_cell: &'static Selector,
    pub anchor: &'static Selector,
}

impl AreaSelectors {
    #[must_use]
    pub fn new() -> Self {
        Self {
            title: &TITLE,
            about_tab: &ABOUT_TAB,
            infos_tab: &INFOS_TAB,
            season_table: &SEASON_TABLE,
            map_image: &MAP_IMAGE,
            inline_paragraph: &INLINE_PARAGRAPH,
            paragraph: &PARAGRAPH,
            section_heading: &SECTION_HEADING,
            table: &TABLE,
            row: &TABLE_ROW,
            data_cell: &TABLE_DATA,
            anchor: &ANCHOR,
        }
    }
}

impl Default for AreaSelectors {
    fn default() -> Self {
        Self::new()
    }
}

/// Selectors for the season table found on country, zone and spot pages
pub struct SeasonSelectors {
    pub head_row: &'static Selector,
    pub body_row: &'static Selector,
    pub header_cell: &'static Selector,
    pub cell: &'static Selector,
    pub image: &'static Selector,
}

impl SeasonSelectors {
    #[must_use]
    pub fn new() -> Self {
        Self {
            head_row: &THEAD_ROW,
            body_row: &TBODY_ROW,
            header_cell: &HEADER_CELL,
            cell: &ROW_CELL,
            image: &IMAGE,
        }
    }
}

impl Default for SeasonSelectors {
    fn default() -> Self {
        Self::new()
    }
}

/// Selectors for spot detail pages
pub struct SpotSelectors {
    pub title: &'static Selector,
    pub label_paragraph: &'static Selector,
    pub item_label: &'static Selector,
    pub gps_label: &'static Selector,
    pub section_heading: &'static Selector,
    pub inline_paragraph: &'static Selector,
    pub season_table: &'static Selector,
}

impl SpotSelectors {
    #[must_use]
    pub fn new() -> Self {
        Self {
            title: &TITLE,
            label_paragraph: &LABEL_PARAGRAPH,
            item_label: &ITEM_LABEL,
            gps_label: &GPS_LABEL,
            section_heading: &SECTION_HEADING,
            inline_paragraph: &INLINE_PARAGRAPH,
            season_table: &SEASON_TABLE,
        }
    }
}

impl Default for SpotSelectors {
    fn default() -> Self {
        Self::new()
    }
}
