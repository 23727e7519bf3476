use gallery_core::{FetchAheadOutcome, Page};

use super::{App, StatusLevel};
use crate::tui_event::BackendEvent;

impl App {
    /// Apply an event from the backend.
    pub fn handle_backend_event(&mut self, event: BackendEvent) {
        match event {
            BackendEvent::PageLoaded { generation, page } => self.on_page_loaded(generation, page),
            BackendEvent::BulkSelected { count, outcome } => self.on_bulk_selected(count, outcome),
        }
    }

    fn on_page_loaded(&mut self, generation: u64, page: Page) {
        if !self.pager.is_current(generation) {
            tracing::debug!(
                page = page.number,
                generation,
                current = self.pager.generation,
                "discarding stale page"
            );
            return;
        }

        self.pager.loading = false;
        self.visited.record_page(&page);

        if page.failed {
            // A failed fetch leaves the last known total alone.
            self.set_status(
                format!("Could not load page {}", page.number),
                StatusLevel::Warning,
            );
        } else {
            self.pager.total = page.total;
        }

        self.rows = page.records;
        if self.table_cursor >= self.rows.len() {
            self.table_cursor = self.rows.len().saturating_sub(1);
        }
    }

    fn on_bulk_selected(&mut self, count: usize, outcome: FetchAheadOutcome) {
        self.bulk_in_flight = None;
        for page in &outcome.fetched {
            self.visited.record_page(page);
        }

        if outcome.cancelled {
            self.set_status("Bulk selection cancelled", StatusLevel::Warning);
            return;
        }

        let selected = outcome.records.len();
        if selected > 0 {
            self.selection.bulk_replace(&outcome.records);
            self.clamp_panel_cursor();
        }

        match outcome.failed_page {
            Some(page) => self.set_status(
                format!("Selected {selected} of {count}: fetching page {page} failed"),
                StatusLevel::Error,
            ),
            None if selected < count => self.set_status(
                format!("Selected {selected} of {count}: the catalog has no more artworks"),
                StatusLevel::Warning,
            ),
            None => self.set_status(format!("Selected {selected} artworks"), StatusLevel::Info),
        }
    }
}
