//! Paged catalog sources.

pub mod http;
pub mod mock;

use std::future::Future;
use std::pin::Pin;

use thiserror::Error;

use crate::{PAGE_SIZE, Page};

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("HTTP {0}")]
    Status(u16),
    #[error("malformed catalog response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("catalog unavailable: {0}")]
    Unavailable(String),
}

/// A remote catalog that serves fixed-size, 1-indexed pages of records.
pub trait CatalogSource: Send + Sync {
    /// Human-readable name used in logs.
    fn name(&self) -> &str;

    /// Fetch one page. A single attempt: no retry, no timeout.
    fn fetch_page<'a>(
        &'a self,
        page: u32,
    ) -> Pin<Box<dyn Future<Output = Result<Page, CatalogError>> + Send + 'a>>;
}

/// Fetch a page, degrading any failure to an empty page.
///
/// The failure is logged; callers only ever see a (possibly empty) page.
pub async fn fetch_page_or_empty(source: &dyn CatalogSource, page: u32) -> Page {
    let page = page.max(1);
    match source.fetch_page(page).await {
        Ok(p) => {
            tracing::debug!(source = source.name(), page, records = p.records.len(), total = p.total, "page fetched");
            p
        }
        Err(e) => {
            tracing::warn!(source = source.name(), page, error = %e, "page fetch failed");
            Page::failed(page)
        }
    }
}

/// Convert a widget page-change event (first row index, rows per page) into
/// a 1-indexed page number.
pub fn page_from_offset(first: usize, rows: usize) -> u32 {
    if rows == 0 {
        return 1;
    }
    u32::try_from(first / rows + 1).unwrap_or(u32::MAX)
}

/// Number of pages needed to show `total` records.
pub fn page_count(total: usize) -> u32 {
    u32::try_from(total.div_ceil(PAGE_SIZE)).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::mock::MockCatalog;
    use super::*;

    #[test]
    fn offset_to_page_number() {
        assert_eq!(page_from_offset(0, 12), 1);
        assert_eq!(page_from_offset(12, 12), 2);
        assert_eq!(page_from_offset(13, 12), 2);
        assert_eq!(page_from_offset(120, 12), 11);
        assert_eq!(page_from_offset(5, 0), 1);
    }

    #[test]
    fn page_count_rounds_up() {
        assert_eq!(page_count(0), 0);
        assert_eq!(page_count(1), 1);
        assert_eq!(page_count(12), 1);
        assert_eq!(page_count(13), 2);
        assert_eq!(page_count(50), 5);
    }

    #[tokio::test]
    async fn failed_fetch_degrades_to_empty_page() {
        let catalog = MockCatalog::with_total(30).fail_page(2, "connection reset");
        let page = fetch_page_or_empty(&catalog, 2).await;
        assert_eq!(page, Page::failed(2));

        let first = fetch_page_or_empty(&catalog, 1).await;
        assert_eq!(first.records.len(), PAGE_SIZE);
        assert_eq!(first.total, 30);
        assert!(!first.failed);
    }

    #[tokio::test]
    async fn page_zero_is_clamped_to_first_page() {
        let catalog = MockCatalog::with_total(5);
        let page = fetch_page_or_empty(&catalog, 0).await;
        assert_eq!(page.number, 1);
        assert_eq!(page.records.len(), 5);
    }
}
