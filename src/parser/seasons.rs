//! Season table extraction
//!
//! Country pages group months in pairs (`Jan/Feb`), zone pages sometimes list
//! single months. Either way each column is folded onto one of the six
//! canonical buckets; columns whose heading names no month, or straddles two
//! buckets, are skipped with a warning.

use scraper::ElementRef;

use crate::models::{SeasonBucket, SeasonMetric, SeasonRow, SeasonTable};
use crate::parser::sanitize::{clean_text, non_empty};
use crate::parser::selectors::SeasonSelectors;

/// Image name prefix the site uses for "no data" cells
const EMPTY_IMAGE_PREFIX: &str = "wanna-empty";

/// Cell text the site uses for "no data" in numeric rows
const EMPTY_VALUE: &str = "0";

/// Parser for `#wanna-season-table` elements
pub struct SeasonTableParser {
    selectors: SeasonSelectors,
}

impl SeasonTableParser {
    #[must_use]
    pub fn new() -> Self {
        Self {
            selectors: SeasonSelectors::new(),
        }
    }

    /// Extract all metric rows of a season table
    pub fn parse(&self, table: ElementRef<'_>) -> SeasonTable {
        let mut result = SeasonTable::default();

        let head_rows: Vec<ElementRef<'_>> = table.select(self.selectors.head_row).collect();
        let mut body_rows: Vec<ElementRef<'_>> = table.select(self.selectors.body_row).collect();

        // Tables without <thead> carry their headings in the first row
        let header_row = if head_rows.is_empty() {
            if body_rows.is_empty() {
                return result;
            }
            Some(body_rows.remove(0))
        } else {
            head_rows
                .iter()
                .rev()
                .find(|row| {
                    self.header_labels(**row)
                        .iter()
                        .any(|l| SeasonBucket::from_label(l).is_some())
                })
                .copied()
        };

        let Some(header_row) = header_row else {
            tracing::warn!("Season table has no month headings");
            return result;
        };

        let columns = self.column_buckets(header_row);
        if columns.iter().all(Option::is_none) {
            tracing::warn!("Season table has no recognizable month columns");
            return result;
        }

        for row in body_rows {
            let cells: Vec<ElementRef<'_>> = row.select(self.selectors.cell).collect();
            let Some((label_cell, value_cells)) = cells.split_first() else {
                continue;
            };

            let label = clean_text(&label_cell.text().collect::<String>());
            if label.is_empty() {
                continue;
            }

            let mut values = SeasonRow::default();
            for (bucket, cell) in columns.iter().zip(value_cells.iter()) {
                if let (Some(bucket), Some(value)) = (bucket, self.cell_value(*cell)) {
                    values.merge(*bucket, value);
                }
            }

            let metric = SeasonMetric::from_label(&label);
            tracing::trace!(metric = ?metric, "Parsed season row");
            result.insert(metric, values);
        }

        result
    }

    fn header_labels(&self, row: ElementRef<'_>) -> Vec<String> {
        row.select(self.selectors.header_cell)
            .map(|cell| clean_text(&cell.text().collect::<String>()))
            .collect()
    }

    /// Bucket for each value column, `None` for skipped columns
    fn column_buckets(&self, header_row: ElementRef<'_>) -> Vec<Option<SeasonBucket>> {
        let mut labels = self.header_labels(header_row);

        // Drop the corner cell above the metric names
        if labels
            .first()
            .is_some_and(|l| SeasonBucket::from_label(l).is_none())
        {
            labels.remove(0);
        }

        labels
            .iter()
            .map(|label| {
                let bucket = SeasonBucket::from_label(label);
                if bucket.is_none() {
                    tracing::warn!(label = %label, "Unrecognized season column, skipping");
                }
                bucket
            })
            .collect()
    }

    /// Text of a cell, or the rating encoded in its image
    fn cell_value(&self, cell: ElementRef<'_>) -> Option<String> {
        self.raw_cell_value(cell).filter(|value| value != EMPTY_VALUE)
    }

    fn raw_cell_value(&self, cell: ElementRef<'_>) -> Option<String> {
        if let Some(img) = cell.select(self.selectors.image).next() {
            let src = img.value().attr("src").unwrap_or_default();
            let file = src
                .rsplit('/')
                .next()
                .unwrap_or_default()
                .split(['?', '#'])
                .next()
                .unwrap_or_default();
            if file.to_lowercase().starts_with(EMPTY_IMAGE_PREFIX) {
                return None;
            }

            return img
                .value()
                .attr("alt")
                .and_then(non_empty)
                .or_else(|| img.value().attr("title").and_then(non_empty))
                .or_else(|| {
                    let stem = file.rsplit_once('.').map_or(file, |(stem, _)| stem);
                    non_empty(stem)
                });
        }

        non_empty(&cell.text().collect::<String>())
    }
}

impl Default for SeasonTableParser {
    fn default() -> Self {
        Self::new()
    }
}
