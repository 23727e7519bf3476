//! Records seen so far, across every page fetched in this session.

use std::collections::{HashMap, HashSet};

use crate::{Page, Record, RecordId};

/// Accumulates every record returned by a page fetch, deduplicated by id in
/// first-seen order, and remembers the last non-empty result per page number.
///
/// Grows monotonically and is never persisted.
#[derive(Debug, Clone, Default)]
pub struct VisitedCache {
    records: Vec<Record>,
    seen: HashSet<RecordId>,
    pages: HashMap<u32, Page>,
}

impl VisitedCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Absorb a fetched page. Empty pages (failed fetches) are not remembered
    /// as pages, so a later fetch of the same number is not short-circuited.
    pub fn record_page(&mut self, page: &Page) {
        if page.is_empty() {
            return;
        }
        self.absorb(&page.records);
        self.pages.insert(page.number, page.clone());
    }

    /// Append records not seen before, keeping first-seen order.
    pub fn absorb(&mut self, records: &[Record]) {
        for record in records {
            if self.seen.insert(record.id) {
                self.records.push(record.clone());
            }
        }
    }

    pub fn page(&self, number: u32) -> Option<&Page> {
        self.pages.get(&number)
    }

    /// Clones of all remembered pages, for handing to a background task.
    pub fn pages_snapshot(&self) -> HashMap<u32, Page> {
        self.pages.clone()
    }

    /// The first `count` records in first-seen order, or `None` if fewer
    /// than `count` have been seen.
    pub fn first(&self, count: usize) -> Option<&[Record]> {
        self.records.get(..count)
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(number: u32, ids: &[RecordId]) -> Page {
        Page {
            number,
            records: ids.iter().map(|&id| Record::new(id, format!("r{id}"))).collect(),
            total: 100,
            failed: false,
        }
    }

    #[test]
    fn keeps_first_seen_order_without_duplicates() {
        let mut cache = VisitedCache::new();
        cache.record_page(&page(2, &[13, 14, 15]));
        cache.record_page(&page(1, &[1, 2, 13]));
        let ids: Vec<_> = cache.records().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![13, 14, 15, 1, 2]);
    }

    #[test]
    fn revisiting_a_page_does_not_grow_the_cache() {
        let mut cache = VisitedCache::new();
        cache.record_page(&page(1, &[1, 2, 3]));
        cache.record_page(&page(1, &[1, 2, 3]));
        assert_eq!(cache.len(), 3);
    }

    #[test]
    fn first_seen_record_wins() {
        let mut cache = VisitedCache::new();
        cache.absorb(&[Record::new(7, "old")]);
        cache.absorb(&[Record::new(7, "new")]);
        assert_eq!(cache.records()[0].title, "old");
    }

    #[test]
    fn empty_pages_are_not_remembered() {
        let mut cache = VisitedCache::new();
        cache.record_page(&Page::empty(3));
        assert!(cache.page(3).is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn first_requires_enough_records() {
        let mut cache = VisitedCache::new();
        cache.record_page(&page(1, &[1, 2, 3]));
        assert_eq!(cache.first(2).map(|r| r.len()), Some(2));
        assert_eq!(cache.first(3).map(|r| r.len()), Some(3));
        assert!(cache.first(4).is_none());
    }
}
