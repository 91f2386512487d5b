//! Bottom-up summaries for countries and zones
//!
//! Summaries are derived data: [`aggregate`] throws away whatever an area held
//! before and recomputes it from the current children, so running it twice
//! gives the same result as running it once.

use crate::models::{Area, Bounds, Node, ScrapeTree, Summary};
use crate::utils::error::AggregationError;

/// Recompute the summary of `area` and every zone below it (post-order)
pub fn aggregate(area: &mut Area) {
    let mut summary = Summary::default();

    for child in &mut area.children {
        match child {
            Node::Spot(spot) => {
                summary.spot_count += 1;
                summary.seasons.add_row(&spot.season());
                if let Some(point) = &spot.coordinates {
                    summary.bounds = Some(merge_bounds(summary.bounds, Bounds::from_point(point)));
                }
            }
            Node::Zone(zone) => {
                aggregate(zone);
                summary.zone_count += 1;
                summary.spot_count += zone.summary.spot_count;
                summary.seasons.absorb(&zone.summary.seasons);
                if let Some(bounds) = zone.summary.bounds {
                    summary.bounds = Some(merge_bounds(summary.bounds, bounds));
                }
            }
        }
    }

    area.summary = summary;
}

/// Aggregate every country of every continent
pub fn aggregate_tree(tree: &mut ScrapeTree) {
    for continent in &mut tree.continents {
        for country in &mut continent.countries {
            aggregate(country);
        }
    }
}

/// Check the summaries of `area` and its zones against the children
///
/// # Errors
///
/// A mismatch means the aggregator has a bug; callers treat it as fatal.
pub fn verify(area: &Area) -> Result<(), AggregationError> {
    let counted = count_spots(area);
    if area.summary.spot_count != counted {
        return Err(AggregationError::SpotCountMismatch {
            area: area.name.clone(),
            stored: area.summary.spot_count,
            counted,
        });
    }

    if area.summary.bounds.is_some_and(|b| !b.is_valid()) {
        return Err(AggregationError::BoundsOutOfRange {
            area: area.name.clone(),
        });
    }

    area.zones().try_for_each(verify)
}

/// Verify every country of the tree
///
/// # Errors
///
/// Returns the first invariant violation found
pub fn verify_tree(tree: &ScrapeTree) -> Result<(), AggregationError> {
    tree.continents
        .iter()
        .flat_map(|c| c.countries.iter())
        .try_for_each(verify)
}

fn merge_bounds(current: Option<Bounds>, next: Bounds) -> Bounds {
    match current {
        Some(bounds) => bounds.merge(&next),
        None => next,
    }
}

fn count_spots(area: &Area) -> usize {
    area.children
        .iter()
        .map(|child| match child {
            Node::Spot(_) => 1,
            Node::Zone(zone) => count_spots(zone),
        })
        .sum()
}
