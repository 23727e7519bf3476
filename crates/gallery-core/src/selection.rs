//! The user's cross-page selection of records.
//!
//! The table only ever reports which rows of the *visible* page are checked,
//! so every update is a diff scoped to the displayed ids: rows on other pages
//! are never touched by a page-level selection change.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::storage::SelectionStorage;
use crate::{Record, RecordId};

/// Storage key holding the JSON array of selected records.
pub const SELECTION_KEY: &str = "selectedArtworks";

/// Selected ids plus the last-seen record for each, in display order.
///
/// Every mutation is written through to the injected storage. Write failures
/// are logged and otherwise ignored.
pub struct SelectionStore {
    ids: HashSet<RecordId>,
    items: Vec<Record>,
    storage: Arc<dyn SelectionStorage>,
}

impl SelectionStore {
    /// An empty selection backed by `storage`. Nothing is read.
    pub fn new(storage: Arc<dyn SelectionStorage>) -> Self {
        Self {
            ids: HashSet::new(),
            items: Vec::new(),
            storage,
        }
    }

    /// Rebuild the selection from `storage`.
    ///
    /// A missing blob, an unreadable blob or a blob that is not a JSON array
    /// yields an empty selection. Array entries that do not parse as records
    /// are dropped individually.
    pub fn restore(storage: Arc<dyn SelectionStorage>) -> Self {
        let mut store = Self::new(storage);
        let blob = match store.storage.get(SELECTION_KEY) {
            Ok(Some(blob)) => blob,
            Ok(None) => return store,
            Err(e) => {
                tracing::warn!(error = %e, "failed to read persisted selection");
                return store;
            }
        };

        let entries: Vec<serde_json::Value> = match serde_json::from_str(&blob) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(error = %e, "persisted selection is corrupt, starting empty");
                return store;
            }
        };

        let total = entries.len();
        let records: Vec<Record> = entries
            .into_iter()
            .filter_map(|v| serde_json::from_value(v).ok())
            .collect();
        if records.len() < total {
            tracing::warn!(
                dropped = total - records.len(),
                kept = records.len(),
                "discarded unparseable persisted selection entries"
            );
        }

        store.set_items(dedup_last_wins(records));
        tracing::info!(count = store.len(), "restored selection");
        store
    }

    /// Apply a selection-change event from the visible page.
    ///
    /// Afterwards every id in `checked` is selected, every displayed id not in
    /// `checked` is deselected, and ids not displayed are left as they were.
    pub fn toggle_current_page_selection(&mut self, displayed: &[Record], checked: &[Record]) {
        let displayed_ids: HashSet<RecordId> = displayed.iter().map(|r| r.id).collect();
        let items = merge(&self.items, &displayed_ids, checked);
        self.set_items(items);
        self.persist();
    }

    /// Deselect `id`. Returns whether it was selected.
    pub fn remove(&mut self, id: RecordId) -> bool {
        if !self.ids.contains(&id) {
            return false;
        }
        self.items.retain(|r| r.id != id);
        self.ids.remove(&id);
        self.persist();
        true
    }

    /// Merge `records` into the selection: records already selected but not in
    /// the batch stay, batch records are added or overwrite their previous
    /// version. Applying the same batch twice is the same as applying it once.
    pub fn bulk_replace(&mut self, records: &[Record]) {
        let batch_ids: HashSet<RecordId> = records.iter().map(|r| r.id).collect();
        let items = merge(&self.items, &batch_ids, records);
        self.set_items(items);
        self.persist();
    }

    /// Replace the whole selection with exactly `records`.
    pub fn replace_all(&mut self, records: &[Record]) {
        self.set_items(dedup_last_wins(records.to_vec()));
        self.persist();
    }

    pub fn clear(&mut self) {
        self.set_items(Vec::new());
        self.persist();
    }

    pub fn contains(&self, id: RecordId) -> bool {
        self.ids.contains(&id)
    }

    pub fn get(&self, id: RecordId) -> Option<&Record> {
        if !self.ids.contains(&id) {
            return None;
        }
        self.items.iter().find(|r| r.id == id)
    }

    /// Selected records in display order.
    pub fn items(&self) -> &[Record] {
        &self.items
    }

    pub fn ids(&self) -> &HashSet<RecordId> {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// The displayed records that are selected, in display order. This is what
    /// the table is told to show as checked.
    pub fn visible_selection(&self, displayed: &[Record]) -> Vec<Record> {
        displayed
            .iter()
            .filter(|r| self.ids.contains(&r.id))
            .cloned()
            .collect()
    }

    fn set_items(&mut self, items: Vec<Record>) {
        self.ids = items.iter().map(|r| r.id).collect();
        self.items = items;
    }

    fn persist(&self) {
        let blob = match serde_json::to_string(&self.items) {
            Ok(blob) => blob,
            Err(e) => {
                tracing::warn!(error = %e, "failed to serialize selection");
                return;
            }
        };
        if let Err(e) = self.storage.set(SELECTION_KEY, &blob) {
            tracing::warn!(error = %e, "failed to persist selection");
        }
    }
}

/// Previous items minus those whose id is in `replaced`, followed by `batch`,
/// deduplicated with the last write winning.
fn merge(previous: &[Record], replaced: &HashSet<RecordId>, batch: &[Record]) -> Vec<Record> {
    let combined: Vec<Record> = previous
        .iter()
        .filter(|r| !replaced.contains(&r.id))
        .chain(batch.iter())
        .cloned()
        .collect();
    dedup_last_wins(combined)
}

/// Keep one record per id: the position of its first occurrence, the value of
/// its last.
fn dedup_last_wins(records: Vec<Record>) -> Vec<Record> {
    let mut positions: HashMap<RecordId, usize> = HashMap::with_capacity(records.len());
    let mut out: Vec<Record> = Vec::with_capacity(records.len());
    for record in records {
        match positions.get(&record.id) {
            Some(&pos) => out[pos] = record,
            None => {
                positions.insert(record.id, out.len());
                out.push(record);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn rec(id: RecordId) -> Record {
        Record::new(id, format!("Artwork {id}"))
    }

    fn recs(ids: &[RecordId]) -> Vec<Record> {
        ids.iter().copied().map(rec).collect()
    }

    fn store() -> (SelectionStore, Arc<MemoryStorage>) {
        let storage = Arc::new(MemoryStorage::new());
        (SelectionStore::new(storage.clone()), storage)
    }

    fn item_ids(store: &SelectionStore) -> Vec<RecordId> {
        store.items().iter().map(|r| r.id).collect()
    }

    #[test]
    fn toggle_adds_checked_rows() {
        let (mut s, _) = store();
        let page = recs(&[1, 2, 3]);
        s.toggle_current_page_selection(&page, &recs(&[1, 3]));
        assert_eq!(item_ids(&s), vec![1, 3]);
        assert!(s.contains(1) && s.contains(3) && !s.contains(2));
    }

    #[test]
    fn toggle_removes_unchecked_displayed_rows_only() {
        let (mut s, _) = store();
        s.toggle_current_page_selection(&recs(&[1, 2, 3]), &recs(&[1, 2]));
        // Page 2 selection must not disturb page 1.
        s.toggle_current_page_selection(&recs(&[13, 14]), &recs(&[14]));
        assert_eq!(item_ids(&s), vec![1, 2, 14]);

        // Back on page 1, uncheck 2.
        s.toggle_current_page_selection(&recs(&[1, 2, 3]), &recs(&[1]));
        assert_eq!(item_ids(&s), vec![14, 1]);
        assert!(!s.contains(2));
        assert!(s.contains(14));
    }

    #[test]
    fn toggle_with_nothing_checked_clears_only_the_page() {
        let (mut s, _) = store();
        s.bulk_replace(&recs(&[1, 2, 13]));
        s.toggle_current_page_selection(&recs(&[1, 2, 3]), &[]);
        assert_eq!(item_ids(&s), vec![13]);
    }

    #[test]
    fn toggle_refreshes_record_contents() {
        let (mut s, _) = store();
        s.toggle_current_page_selection(&recs(&[1]), &recs(&[1]));
        let updated = Record::new(1, "Renamed");
        s.toggle_current_page_selection(&[updated.clone()], &[updated]);
        assert_eq!(s.get(1).map(|r| r.title.as_str()), Some("Renamed"));
    }

    #[test]
    fn remove_is_idempotent() {
        let (mut s, _) = store();
        s.bulk_replace(&recs(&[1, 2]));
        assert!(s.remove(1));
        assert!(!s.remove(1));
        assert_eq!(item_ids(&s), vec![2]);
        assert!(s.get(1).is_none());
    }

    #[test]
    fn remove_of_absent_id_does_not_write() {
        let (mut s, storage) = store();
        assert!(!s.remove(99));
        assert!(storage.get(SELECTION_KEY).unwrap().is_none());
    }

    #[test]
    fn bulk_replace_preserves_existing_and_overwrites_batch() {
        let (mut s, _) = store();
        s.bulk_replace(&recs(&[20, 1]));
        let mut batch = recs(&[1, 2, 3]);
        batch[0].title = "fresh".into();
        s.bulk_replace(&batch);
        assert_eq!(item_ids(&s), vec![20, 1, 2, 3]);
        assert_eq!(s.get(1).map(|r| r.title.as_str()), Some("fresh"));
    }

    #[test]
    fn bulk_replace_is_idempotent() {
        let (mut s, _) = store();
        s.bulk_replace(&recs(&[7, 8]));
        let batch = recs(&[1, 2, 8]);
        s.bulk_replace(&batch);
        let once = s.items().to_vec();
        s.bulk_replace(&batch);
        assert_eq!(s.items(), once.as_slice());
    }

    #[test]
    fn duplicate_ids_in_batch_last_write_wins() {
        let (mut s, _) = store();
        let batch = vec![Record::new(1, "a"), Record::new(2, "b"), Record::new(1, "c")];
        s.bulk_replace(&batch);
        assert_eq!(item_ids(&s), vec![1, 2]);
        assert_eq!(s.get(1).map(|r| r.title.as_str()), Some("c"));
    }

    #[test]
    fn replace_all_discards_previous_selection() {
        let (mut s, _) = store();
        s.bulk_replace(&recs(&[1, 2, 3]));
        s.replace_all(&recs(&[4, 5]));
        assert_eq!(item_ids(&s), vec![4, 5]);
        assert!(!s.contains(1));
    }

    #[test]
    fn visible_selection_is_scoped_to_displayed_rows() {
        let (mut s, _) = store();
        s.bulk_replace(&recs(&[2, 13]));
        let visible = s.visible_selection(&recs(&[1, 2, 3]));
        assert_eq!(visible, recs(&[2]));
    }

    #[test]
    fn every_mutation_is_persisted() {
        let (mut s, storage) = store();
        s.bulk_replace(&recs(&[1, 2]));
        let blob = storage.get(SELECTION_KEY).unwrap().unwrap();
        let saved: Vec<Record> = serde_json::from_str(&blob).unwrap();
        assert_eq!(saved, recs(&[1, 2]));

        s.clear();
        let blob = storage.get(SELECTION_KEY).unwrap().unwrap();
        assert_eq!(blob, "[]");
    }

    #[test]
    fn restore_round_trips() {
        let (mut s, storage) = store();
        s.bulk_replace(&recs(&[5, 3, 9]));
        s.remove(3);
        let ids_before = s.ids().clone();
        let items_before = s.items().to_vec();
        drop(s);

        let restored = SelectionStore::restore(storage);
        assert_eq!(restored.ids(), &ids_before);
        assert_eq!(restored.items(), items_before.as_slice());
    }

    #[test]
    fn restore_from_missing_storage_is_empty() {
        let restored = SelectionStore::restore(Arc::new(MemoryStorage::new()));
        assert!(restored.is_empty());
    }

    #[test]
    fn restore_from_corrupt_storage_is_empty() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set(SELECTION_KEY, "{not json").unwrap();
        assert!(SelectionStore::restore(storage.clone()).is_empty());

        storage.set(SELECTION_KEY, r#"{"id": 1}"#).unwrap();
        assert!(SelectionStore::restore(storage).is_empty());
    }

    #[test]
    fn restore_skips_bad_entries() {
        let storage = Arc::new(MemoryStorage::new());
        storage
            .set(
                SELECTION_KEY,
                r#"[{"id": 1, "title": "ok"}, {"title": "no id"}, 42, {"id": 2, "title": null}]"#,
            )
            .unwrap();
        let restored = SelectionStore::restore(storage);
        let ids: Vec<_> = restored.items().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(restored.len(), 2);
    }
}
