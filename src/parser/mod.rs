//! HTML parsing and data extraction
//!
//! Every page the crawler touches is parsed through [`PageParser::parse`]
//! with an explicit [`PageKind`]. Index pages yield child links plus the
//! descriptive content of the area; spot pages yield a full [`Spot`].
//!
//! [`Spot`]: crate::models::Spot

pub mod html;
pub mod sanitize;
pub mod seasons;
pub mod selectors;

pub use html::PageParser;
pub use seasons::SeasonTableParser;

use serde::Serialize;

use crate::models::{AreaInfo, Spot};

/// Kind of page being parsed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PageKind {
    /// Home page listing continents and their countries
    ContinentIndex,
    /// Country page listing zones and/or spots
    CountryIndex,
    /// Zone or sub-zone page listing sub-zones and/or spots
    RegionIndex,
    /// Single surf spot
    SpotDetail,
}

impl PageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ContinentIndex => "continent index",
            Self::CountryIndex => "country index",
            Self::RegionIndex => "region index",
            Self::SpotDetail => "spot detail",
        }
    }
}

impl std::fmt::Display for PageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a child link points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChildKind {
    Country,
    Zone,
    Spot,
}

/// A link to a child page, in document order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildLink {
    pub name: String,
    /// Absolute URL
    pub url: String,
    pub kind: ChildKind,
    /// Enclosing group on the page (the continent on the home page)
    pub group: Option<String>,
}

/// Parsed index page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndexPage {
    /// Name taken from the page title
    pub title: Option<String>,
    pub info: AreaInfo,
    /// Group headings in document order, including groups without links
    pub groups: Vec<String>,
    pub children: Vec<ChildLink>,
}

impl IndexPage {
    pub fn children_of(&self, kind: ChildKind) -> impl Iterator<Item = &ChildLink> {
        self.children.iter().filter(move |c| c.kind == kind)
    }

    /// Links listed under one group heading
    pub fn children_in<'a>(&'a self, group: &'a str) -> impl Iterator<Item = &'a ChildLink> {
        self.children
            .iter()
            .filter(move |c| c.group.as_deref() == Some(group))
    }
}

/// Result of parsing one page
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedPage {
    Index(IndexPage),
    SpotDetail(Box<Spot>),
}

impl ParsedPage {
    pub fn into_index(self) -> Option<IndexPage> {
        match self {
            Self::Index(page) => Some(page),
            Self::SpotDetail(_) => None,
        }
    }

    pub fn into_spot(self) -> Option<Spot> {
        match self {
            Self::SpotDetail(spot) => Some(*spot),
            Self::Index(_) => None,
        }
    }
}
