use std::collections::HashMap;

use gallery_core::{FetchAheadOutcome, Page};

/// Commands sent from the TUI to the backend.
#[derive(Debug)]
pub enum BackendCommand {
    /// Load one page. Supersedes any page load still in flight.
    LoadPage { page: u32, generation: u64 },
    /// Collect the first `count` records of the catalog, reusing `known` pages.
    BulkSelect {
        count: usize,
        known: HashMap<u32, Page>,
    },
    /// Abandon the running bulk selection, if any.
    CancelBulk,
}

/// Events flowing from the backend tasks to the TUI.
#[derive(Debug, Clone)]
pub enum BackendEvent {
    /// A page load finished. Failed loads arrive as an empty page.
    PageLoaded { generation: u64, page: Page },
    /// A fetch-ahead bulk selection finished (possibly short or cancelled).
    BulkSelected {
        count: usize,
        outcome: FetchAheadOutcome,
    },
}
