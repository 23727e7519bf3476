//! Selecting N records by count instead of by checkbox.
//!
//! Two strategies exist and a session uses exactly one of them:
//!
//! - [`BulkStrategy::FetchAhead`] walks pages 1, 2, … until N records are
//!   collected and *merges* them into the selection.
//! - [`BulkStrategy::VisitedOnly`] draws the first N records the user has
//!   already browsed and *replaces* the selection with them, refusing when
//!   fewer than N have been seen.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::catalog::CatalogSource;
use crate::visited::VisitedCache;
use crate::{PAGE_SIZE, Page, Record};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BulkStrategy {
    #[default]
    FetchAhead,
    VisitedOnly,
}

impl BulkStrategy {
    pub fn label(self) -> &'static str {
        match self {
            Self::FetchAhead => "fetch-ahead",
            Self::VisitedOnly => "visited-only",
        }
    }

    /// One-line description shown in the help overlay and the count popover.
    pub fn description(self) -> &'static str {
        match self {
            Self::FetchAhead => {
                "fetches pages from the start and adds the first N artworks to the selection"
            }
            Self::VisitedOnly => {
                "replaces the selection with the first N artworks you have browsed"
            }
        }
    }
}

impl fmt::Display for BulkStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for BulkStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fetch-ahead" | "fetch_ahead" | "a" => Ok(Self::FetchAhead),
            "visited-only" | "visited_only" | "b" => Ok(Self::VisitedOnly),
            other => Err(format!(
                "unknown bulk strategy {other:?} (expected fetch-ahead or visited-only)"
            )),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BulkSelectError {
    #[error("count must be at least 1")]
    InvalidCount,
    #[error("only {available} artworks browsed so far, cannot select {requested}")]
    Insufficient { requested: usize, available: usize },
}

/// What a fetch-ahead run produced.
#[derive(Debug, Clone, Default)]
pub struct FetchAheadOutcome {
    /// The first `target` records in page order (fewer if the catalog ran out
    /// or a fetch failed).
    pub records: Vec<Record>,
    /// Pages that had to be fetched from the source (cached pages excluded).
    pub fetched: Vec<Page>,
    /// Page number whose fetch failed and ended the run, if any.
    pub failed_page: Option<u32>,
    /// Whether the run was cancelled before completing.
    pub cancelled: bool,
}

/// Collect the first `target` records of the catalog, page by page.
///
/// Pages present in `known` are used as-is; every other page is fetched
/// sequentially. The run stops at the first failed fetch, an empty page, the
/// end of the declared total, or once `target` records are collected. The
/// result is truncated to `target` in page order.
pub async fn fetch_ahead(
    source: &dyn CatalogSource,
    target: usize,
    known: &HashMap<u32, Page>,
    cancel: &CancellationToken,
) -> FetchAheadOutcome {
    let mut outcome = FetchAheadOutcome::default();
    let mut page_no: u32 = 1;

    while outcome.records.len() < target {
        if cancel.is_cancelled() {
            outcome.cancelled = true;
            break;
        }

        let page = match known.get(&page_no) {
            Some(page) => page.clone(),
            None => {
                let result = tokio::select! {
                    _ = cancel.cancelled() => {
                        outcome.cancelled = true;
                        break;
                    }
                    r = source.fetch_page(page_no) => r,
                };
                match result {
                    Ok(page) => {
                        outcome.fetched.push(page.clone());
                        page
                    }
                    Err(e) => {
                        tracing::warn!(source = source.name(), page = page_no, error = %e, "fetch-ahead stopped");
                        outcome.failed_page = Some(page_no);
                        break;
                    }
                }
            }
        };

        if page.is_empty() {
            break;
        }
        let total = page.total;
        outcome.records.extend(page.records);
        if total > 0 && (page_no as usize) * PAGE_SIZE >= total {
            break;
        }
        page_no += 1;
    }

    outcome.records.truncate(target);
    tracing::info!(
        requested = target,
        selected = outcome.records.len(),
        fetched_pages = outcome.fetched.len(),
        cancelled = outcome.cancelled,
        "fetch-ahead complete"
    );
    outcome
}

/// The first `count` records of the visited cache, in first-seen order.
pub fn select_from_visited(
    visited: &VisitedCache,
    count: usize,
) -> Result<Vec<Record>, BulkSelectError> {
    if count == 0 {
        return Err(BulkSelectError::InvalidCount);
    }
    visited
        .first(count)
        .map(<[Record]>::to_vec)
        .ok_or(BulkSelectError::Insufficient {
            requested: count,
            available: visited.len(),
        })
}
