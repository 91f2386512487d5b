//! Hierarchy traversal
//!
//! The walker fetches the home page, then resolves each country depth first:
//! its zones (recursively) and spots, in document order. Any failure below the
//! root is recorded as a [`NodeFailure`] and the node is left out of the tree;
//! only the home page is allowed to abort the run.

use futures::future::LocalBoxFuture;
use std::collections::HashSet;
use std::time::Duration;

use crate::config::Config;
use crate::crawler::PageSource;
use crate::error::{Error, ScrapeErrorTrait};
use crate::models::{
    Area, AreaKind, Continent, NodeFailure, NodeKind, ScrapeMode, ScrapeTree, Spot,
};
use crate::parser::{ChildKind, ChildLink, IndexPage, PageKind, PageParser, ParsedPage};
use crate::utils::error::ParseError;

/// Traversal settings
#[derive(Debug, Clone, PartialEq)]
pub struct WalkOptions {
    pub mode: ScrapeMode,
    /// Children visited per level in sample mode
    pub sample_limit: usize,
    /// Extra attempts for recoverable fetch errors
    pub max_retries: u32,
    /// First backoff delay, doubled on every retry
    pub retry_base_delay: Duration,
    /// Deepest zone nesting below a country
    pub max_depth: usize,
}

impl WalkOptions {
    pub fn from_config(config: &Config, mode: ScrapeMode) -> Self {
        Self {
            mode,
            sample_limit: config.crawler.sample_limit,
            max_retries: config.crawler.max_retries,
            retry_base_delay: config.retry_base_delay(),
            max_depth: config.crawler.max_depth,
        }
    }

    /// Children of one kind visited per level
    fn limit(&self) -> usize {
        match self.mode {
            ScrapeMode::Sample => self.sample_limit,
            ScrapeMode::Full => usize::MAX,
        }
    }
}

impl Default for WalkOptions {
    fn default() -> Self {
        Self::from_config(&Config::default(), ScrapeMode::Sample)
    }
}

/// Mutable bookkeeping for one walk
#[derive(Default)]
struct WalkState {
    visited: HashSet<String>,
    failures: Vec<NodeFailure>,
}

impl WalkState {
    /// Mark a URL as visited; false if it was seen before
    fn first_visit(&mut self, url: &str) -> bool {
        self.visited.insert(url.trim_end_matches('/').to_string())
    }

    fn record(&mut self, path: &str, url: &str, kind: NodeKind, err: &Error) {
        tracing::warn!(
            path = %path,
            url = %url,
            kind = %kind,
            error = %err,
            "Skipping node"
        );
        self.failures.push(NodeFailure {
            path: path.to_string(),
            url: url.to_string(),
            kind,
            category: err.category(),
            error: err.to_string(),
        });
    }
}

/// Walks the catalog through a [`PageSource`]
pub struct HierarchyWalker<S> {
    source: S,
    parser: PageParser,
    options: WalkOptions,
}

impl<S: PageSource> HierarchyWalker<S> {
    pub fn new(source: S, options: WalkOptions) -> Self {
        Self {
            source,
            parser: PageParser::new(),
            options,
        }
    }

    pub fn options(&self) -> &WalkOptions {
        &self.options
    }

    /// Crawl everything reachable from the home page
    ///
    /// # Errors
    ///
    /// Returns `Error::RootUnavailable` if the home page cannot be fetched or
    /// parsed. Failures below the root never surface here; they are listed in
    /// [`ScrapeTree::failures`].
    pub async fn walk(&self, root_url: &str) -> Result<ScrapeTree, Error> {
        let mut state = WalkState::default();
        state.first_visit(root_url);

        tracing::info!(url = %root_url, mode = %self.options.mode, "Starting walk");

        let index = self
            .load_index(root_url, PageKind::ContinentIndex)
            .await
            .map_err(|e| Error::root_unavailable(root_url, e))?;

        let limit = self.options.limit();
        let mut tree = ScrapeTree::default();

        for group in &index.groups {
            let mut continent = Continent::new(group.as_str());
            tracing::info!(continent = %group, "Walking continent");

            for link in index.children_in(group).take(limit) {
                let path = format!("{group} > {}", link.name);
                if let Some(country) = self
                    .walk_area(&mut state, link, AreaKind::Country, path, 0)
                    .await
                {
                    continent.countries.push(country);
                }
            }

            tree.continents.push(continent);
        }

        tree.failures = state.failures;

        tracing::info!(
            continents = tree.continents.len(),
            countries = tree.country_count(),
            spots = tree.spot_count(),
            failures = tree.failures.len(),
            "Walk finished"
        );

        Ok(tree)
    }

    /// Country or zone with all its descendants
    ///
    /// Boxed because zones nest recursively.
    fn walk_area<'a>(
        &'a self,
        state: &'a mut WalkState,
        link: &'a ChildLink,
        kind: AreaKind,
        path: String,
        depth: usize,
    ) -> LocalBoxFuture<'a, Option<Area>> {
        Box::pin(async move {
            let (node_kind, page_kind) = match kind {
                AreaKind::Country => (NodeKind::Country, PageKind::CountryIndex),
                AreaKind::Zone => (NodeKind::Zone, PageKind::RegionIndex),
            };

            if !state.first_visit(&link.url) {
                tracing::debug!(path = %path, url = %link.url, "Already visited, skipping");
                return None;
            }

            let page = match self.load_index(&link.url, page_kind).await {
                Ok(page) => page,
                Err(err) => {
                    state.record(&path, &link.url, node_kind, &err);
                    return None;
                }
            };

            let name = page.title.clone().unwrap_or_else(|| link.name.clone());
            let mut area = Area::new(name, link.url.as_str(), kind).with_info(page.info);

            // Zones and spots share one budget, counted in document order
            let limit = self.options.limit();
            let mut taken = 0;

            for child in &page.children {
                let child_path = format!("{path} > {}", child.name);
                match child.kind {
                    ChildKind::Zone => {
                        if taken >= limit {
                            continue;
                        }
                        if depth + 1 > self.options.max_depth {
                            tracing::warn!(
                                path = %child_path,
                                max_depth = self.options.max_depth,
                                "Zone nesting too deep, not following"
                            );
                            continue;
                        }
                        taken += 1;
                        if let Some(zone) = self
                            .walk_area(state, child, AreaKind::Zone, child_path, depth + 1)
                            .await
                        {
                            area.push_zone(zone);
                        }
                    }
                    ChildKind::Spot => {
                        if taken >= limit {
                            continue;
                        }
                        taken += 1;
                        if let Some(spot) = self.walk_spot(state, child, &child_path).await {
                            area.push_spot(spot);
                        }
                    }
                    ChildKind::Country => {
                        tracing::debug!(path = %child_path, "Ignoring country link below the root");
                    }
                }
            }

            tracing::debug!(
                path = %path,
                zones = area.zones().count(),
                spots = area.spots().count(),
                "Area resolved"
            );

            Some(area)
        })
    }

    async fn walk_spot(&self, state: &mut WalkState, link: &ChildLink, path: &str) -> Option<Spot> {
        if !state.first_visit(&link.url) {
            tracing::debug!(path = %path, url = %link.url, "Already visited, skipping");
            return None;
        }

        match self.load(&link.url, PageKind::SpotDetail).await {
            Ok(ParsedPage::SpotDetail(spot)) => {
                let mut spot = *spot;
                if spot.name.is_empty() {
                    spot.name = link.name.clone();
                }
                Some(spot)
            }
            Ok(ParsedPage::Index(_)) => {
                let err = unexpected_variant(PageKind::SpotDetail);
                state.record(path, &link.url, NodeKind::Spot, &err);
                None
            }
            Err(err) => {
                state.record(path, &link.url, NodeKind::Spot, &err);
                None
            }
        }
    }

    async fn load_index(&self, url: &str, kind: PageKind) -> Result<IndexPage, Error> {
        self.load(url, kind)
            .await?
            .into_index()
            .ok_or_else(|| unexpected_variant(kind))
    }

    /// Fetch with retries, then parse
    async fn load(&self, url: &str, kind: PageKind) -> Result<ParsedPage, Error> {
        let mut attempt: u32 = 0;

        let page = loop {
            match self.source.fetch(url).await {
                Ok(page) => break page,
                Err(err) if err.is_recoverable() && attempt < self.options.max_retries => {
                    let backoff = self
                        .options
                        .retry_base_delay
                        .saturating_mul(2_u32.saturating_pow(attempt));
                    attempt += 1;
                    tracing::warn!(
                        url = %url,
                        attempt,
                        backoff_ms = backoff.as_millis() as u64,
                        error = %err,
                        "Recoverable fetch error, retrying"
                    );
                    tokio::time::sleep(backoff).await;
                }
                Err(err) => return Err(err.into()),
            }
        };

        Ok(self.parser.parse(&page.body, &page.url, kind)?)
    }
}

fn unexpected_variant(kind: PageKind) -> Error {
    ParseError::malformed(kind, "parser returned a different page variant").into()
}
