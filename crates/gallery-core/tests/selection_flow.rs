//! End-to-end selection flows over the mock catalog.
//!
//! These tests browse pages, toggle rows, run both bulk strategies and
//! round-trip the selection through file storage, without any network.

use std::collections::HashMap;
use std::sync::Arc;

use gallery_core::catalog::mock::MockCatalog;
use gallery_core::{
    BulkSelectError, FileStorage, MemoryStorage, PAGE_SIZE, Record, RecordId, SelectionStore,
    VisitedCache, fetch_ahead, fetch_page_or_empty, select_from_visited,
};
use tokio_util::sync::CancellationToken;

fn ids(records: &[Record]) -> Vec<RecordId> {
    records.iter().map(|r| r.id).collect()
}

#[tokio::test]
async fn pages_show_exactly_what_the_catalog_returned() {
    let catalog = MockCatalog::with_total(40);
    for number in [1, 3, 2, 4, 1] {
        let page = fetch_page_or_empty(&catalog, number).await;
        assert_eq!(page.records, catalog.expected_page(number));
    }
    let last = fetch_page_or_empty(&catalog, 4).await;
    assert_eq!(last.records.len(), 40 - 3 * PAGE_SIZE);
}

#[tokio::test]
async fn selection_survives_navigating_away_and_back() {
    let catalog = MockCatalog::with_total(50);
    let mut selection = SelectionStore::new(Arc::new(MemoryStorage::new()));

    let page1 = fetch_page_or_empty(&catalog, 1).await;
    let checked = vec![page1.records[4].clone()];
    selection.toggle_current_page_selection(&page1.records, &checked);

    let page2 = fetch_page_or_empty(&catalog, 2).await;
    // Nothing checked on page 2: must not disturb page 1.
    selection.toggle_current_page_selection(&page2.records, &[]);

    let back = fetch_page_or_empty(&catalog, 1).await;
    let visible = selection.visible_selection(&back.records);
    assert_eq!(ids(&visible), vec![page1.records[4].id]);
}

#[tokio::test]
async fn fetch_ahead_merges_into_existing_selection() {
    let catalog = MockCatalog::with_total(50);
    let mut selection = SelectionStore::new(Arc::new(MemoryStorage::new()));
    selection.bulk_replace(&[Record::new(48, "Artwork 48")]);

    let outcome = fetch_ahead(&catalog, 10, &HashMap::new(), &CancellationToken::new()).await;
    selection.bulk_replace(&outcome.records);

    assert_eq!(selection.len(), 11);
    assert!(selection.contains(48));
    assert!((1..=10).all(|id| selection.contains(id)));
    assert!(!selection.contains(11));
}

#[tokio::test]
async fn fetch_ahead_larger_than_catalog_selects_catalog_size() {
    let catalog = MockCatalog::with_total(17);
    let mut selection = SelectionStore::new(Arc::new(MemoryStorage::new()));
    let outcome = fetch_ahead(&catalog, 500, &HashMap::new(), &CancellationToken::new()).await;
    selection.bulk_replace(&outcome.records);
    assert_eq!(selection.len(), 17);
}

#[tokio::test]
async fn visited_only_replaces_selection_with_first_seen() {
    let catalog = MockCatalog::with_total(50);
    let mut visited = VisitedCache::new();
    for number in [3, 1] {
        visited.record_page(&fetch_page_or_empty(&catalog, number).await);
    }
    assert_eq!(visited.len(), 24);

    let mut selection = SelectionStore::new(Arc::new(MemoryStorage::new()));
    selection.bulk_replace(&[Record::new(49, "Artwork 49")]);

    let picked = select_from_visited(&visited, 14).unwrap();
    selection.replace_all(&picked);

    let expected: Vec<RecordId> = (25..=36).chain(1..=2).collect();
    assert_eq!(ids(selection.items()), expected);
    assert!(!selection.contains(49));

    let err = select_from_visited(&visited, 25).unwrap_err();
    assert_eq!(
        err,
        BulkSelectError::Insufficient {
            requested: 25,
            available: 24
        }
    );
}

#[tokio::test]
async fn failed_pages_do_not_enter_the_visited_cache() {
    let catalog = MockCatalog::with_total(50).fail_page(2, "timeout");
    let mut visited = VisitedCache::new();
    visited.record_page(&fetch_page_or_empty(&catalog, 2).await);
    assert!(visited.is_empty());
    assert!(visited.page(2).is_none());
}

#[test]
fn file_storage_round_trip_restores_identical_state() {
    let dir = tempfile::tempdir().unwrap();
    let storage = Arc::new(FileStorage::new(dir.path()));

    let mut selection = SelectionStore::new(storage.clone());
    let mut rich = Record::new(27992, "A Sunday on La Grande Jatte");
    rich.artist_display = "Georges Seurat".into();
    rich.date_start = Some(1884);
    rich.date_end = Some(1886);
    selection.bulk_replace(&[Record::new(1, "one"), rich, Record::new(2, "two")]);
    selection.remove(1);

    let ids_before = selection.ids().clone();
    let items_before = selection.items().to_vec();
    drop(selection);

    let restored = SelectionStore::restore(storage);
    assert_eq!(restored.ids(), &ids_before);
    assert_eq!(restored.items(), items_before.as_slice());
}

#[test]
fn corrupt_file_restores_empty() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("selectedArtworks.json"), "\u{0}\u{1}garbage").unwrap();
    let restored = SelectionStore::restore(Arc::new(FileStorage::new(dir.path())));
    assert!(restored.is_empty());
}
