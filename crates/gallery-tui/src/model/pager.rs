use gallery_core::{PAGE_SIZE, page_count, page_from_offset};

/// Which page is showing and which load is the one that counts.
#[derive(Debug, Clone)]
pub struct PagerState {
    /// 1-indexed page currently requested/shown.
    pub page: u32,
    /// Catalog-wide total from the last successful load.
    pub total: usize,
    /// Bumped on every page request; only a result carrying the latest value
    /// may be applied.
    pub generation: u64,
    pub loading: bool,
}

impl Default for PagerState {
    fn default() -> Self {
        Self {
            page: 1,
            total: 0,
            generation: 0,
            loading: false,
        }
    }
}

impl PagerState {
    /// Number of pages, at least 1 so the indicator never reads "1 / 0".
    pub fn page_count(&self) -> u32 {
        page_count(self.total).max(1)
    }

    /// First row index of the current page, as the table widget reports it.
    pub fn first_row(&self) -> usize {
        (self.page.max(1) as usize - 1) * PAGE_SIZE
    }

    /// Resolve a table page-change event `(first, rows)` to a page number and
    /// start a new load generation for it.
    pub fn begin_load(&mut self, first: usize, rows: usize) -> (u32, u64) {
        self.page = page_from_offset(first, rows);
        self.generation = self.generation.wrapping_add(1);
        self.loading = true;
        (self.page, self.generation)
    }

    pub fn is_current(&self, generation: u64) -> bool {
        generation == self.generation
    }

    /// First-row offset of `page`, clamped to the known page range.
    pub fn offset_for(&self, page: u32) -> usize {
        let last = if self.total == 0 {
            // Total unknown until the first load: allow moving forward freely.
            page.max(1)
        } else {
            self.page_count()
        };
        (page.clamp(1, last) as usize - 1) * PAGE_SIZE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn begin_load_bumps_generation() {
        let mut pager = PagerState::default();
        let (page, generation) = pager.begin_load(24, PAGE_SIZE);
        assert_eq!(page, 3);
        assert_eq!(generation, 1);
        assert!(pager.loading);
        let (_, next) = pager.begin_load(0, PAGE_SIZE);
        assert!(pager.is_current(next));
        assert!(!pager.is_current(generation));
    }

    #[test]
    fn offsets_clamp_to_catalog() {
        let pager = PagerState {
            total: 50,
            ..PagerState::default()
        };
        assert_eq!(pager.page_count(), 5);
        assert_eq!(pager.offset_for(0), 0);
        assert_eq!(pager.offset_for(9), 48);
    }

    #[test]
    fn unknown_total_shows_single_page() {
        let pager = PagerState::default();
        assert_eq!(pager.page_count(), 1);
        assert_eq!(pager.first_row(), 0);
    }
}
