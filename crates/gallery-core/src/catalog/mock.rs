//! Mock catalog for testing.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use super::{CatalogError, CatalogSource};
use crate::{PAGE_SIZE, Page, Record, RecordId};

/// A hand-rolled in-memory catalog implementing [`CatalogSource`].
///
/// Records are `id = 1..=total`, titled `Artwork <id>`, split into pages of
/// [`PAGE_SIZE`]. Supports:
/// - forced failures for chosen pages,
/// - a per-call latency, globally or for one page,
/// - call counting and a log of requested page numbers.
pub struct MockCatalog {
    records: Vec<Record>,
    failing: HashMap<u32, String>,
    delay: Option<Duration>,
    page_delays: HashMap<u32, Duration>,
    call_count: AtomicUsize,
    requested: Mutex<Vec<u32>>,
}

impl MockCatalog {
    /// A catalog of `total` synthetic records.
    pub fn with_total(total: usize) -> Self {
        let records = (1..=total as RecordId)
            .map(|id| Record::new(id, format!("Artwork {id}")))
            .collect();
        Self::with_records(records)
    }

    /// A catalog serving exactly `records`, in order.
    pub fn with_records(records: Vec<Record>) -> Self {
        Self {
            records,
            failing: HashMap::new(),
            delay: None,
            page_delays: HashMap::new(),
            call_count: AtomicUsize::new(0),
            requested: Mutex::new(Vec::new()),
        }
    }

    /// Make every fetch of `page` fail with `message`.
    pub fn fail_page(mut self, page: u32, message: &str) -> Self {
        self.failing.insert(page, message.to_string());
        self
    }

    /// Set simulated network latency per call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Set simulated latency for one page only (overrides the global delay).
    pub fn with_page_delay(mut self, page: u32, delay: Duration) -> Self {
        self.page_delays.insert(page, delay);
        self
    }

    /// How many times `fetch_page()` has been called.
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Page numbers requested so far, in call order.
    pub fn requested_pages(&self) -> Vec<u32> {
        self.requested.lock().map(|r| r.clone()).unwrap_or_default()
    }

    /// The records the catalog serves for `page`.
    pub fn expected_page(&self, page: u32) -> Vec<Record> {
        let start = (page.max(1) as usize - 1) * PAGE_SIZE;
        self.records
            .iter()
            .skip(start)
            .take(PAGE_SIZE)
            .cloned()
            .collect()
    }
}

impl CatalogSource for MockCatalog {
    fn name(&self) -> &str {
        "mock"
    }

    fn fetch_page<'a>(
        &'a self,
        page: u32,
    ) -> Pin<Box<dyn Future<Output = Result<Page, CatalogError>> + Send + 'a>> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut requested) = self.requested.lock() {
            requested.push(page);
        }
        let delay = self.page_delays.get(&page).copied().or(self.delay);

        Box::pin(async move {
            if let Some(d) = delay {
                tokio::time::sleep(d).await;
            }
            if let Some(msg) = self.failing.get(&page) {
                return Err(CatalogError::Unavailable(msg.clone()));
            }
            Ok(Page {
                number: page,
                records: self.expected_page(page),
                total: self.records.len(),
                failed: false,
            })
        })
    }
}
