use serde::{Deserialize, Deserializer, Serialize};

pub mod bulk;
pub mod catalog;
pub mod config_file;
pub mod selection;
pub mod storage;
pub mod visited;

// Re-export for convenience
pub use bulk::{BulkSelectError, BulkStrategy, FetchAheadOutcome, fetch_ahead, select_from_visited};
pub use catalog::{CatalogError, CatalogSource, fetch_page_or_empty, page_count, page_from_offset};
pub use catalog::http::HttpCatalog;
pub use selection::{SELECTION_KEY, SelectionStore};
pub use storage::{ChannelStorage, FileStorage, MemoryStorage, SelectionStorage, StorageError};
pub use visited::VisitedCache;

/// Number of records the remote catalog returns per page. Fixed server-side.
pub const PAGE_SIZE: usize = 12;

/// Stable identifier of a catalog record.
pub type RecordId = u64;

/// One artwork as returned by the catalog.
///
/// Descriptive fields arrive as `null` for many artworks; those decode to an
/// empty string (text) or `None` (dates) instead of failing the whole page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub place_of_origin: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub artist_display: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub inscriptions: String,
    #[serde(default)]
    pub date_start: Option<i64>,
    #[serde(default)]
    pub date_end: Option<i64>,
}

impl Record {
    /// Minimal record with only an id and a title set.
    pub fn new(id: RecordId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            place_of_origin: String::new(),
            artist_display: String::new(),
            inscriptions: String::new(),
            date_start: None,
            date_end: None,
        }
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// One server page: its records in server order plus the catalog-wide total.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Page {
    /// 1-indexed page number this page was requested as.
    pub number: u32,
    pub records: Vec<Record>,
    /// Total records in the whole catalog, as declared by the server.
    pub total: usize,
    /// Set when the fetch failed and this page stands in for the result.
    pub failed: bool,
}

impl Page {
    /// A successful page with no records.
    pub fn empty(number: u32) -> Self {
        Self {
            number,
            ..Self::default()
        }
    }

    /// The empty page a failed fetch degrades to.
    pub fn failed(number: u32) -> Self {
        Self {
            number,
            failed: true,
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn ids(&self) -> Vec<RecordId> {
        self.records.iter().map(|r| r.id).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_tolerates_nulls_and_unknown_fields() {
        let json = r#"{
            "id": 27992,
            "title": "A Sunday on La Grande Jatte",
            "place_of_origin": null,
            "artist_display": "Georges Seurat\nFrench, 1859-1891",
            "inscriptions": null,
            "date_start": 1884,
            "date_end": null,
            "image_id": "abc"
        }"#;
        let record: Record = serde_json::from_str(json).unwrap();
        assert_eq!(record.id, 27992);
        assert_eq!(record.place_of_origin, "");
        assert_eq!(record.inscriptions, "");
        assert_eq!(record.date_start, Some(1884));
        assert_eq!(record.date_end, None);
    }

    #[test]
    fn record_missing_id_is_rejected() {
        let json = r#"{"title": "Untitled"}"#;
        assert!(serde_json::from_str::<Record>(json).is_err());
    }

    #[test]
    fn empty_page_keeps_number() {
        let page = Page::empty(4);
        assert_eq!(page.number, 4);
        assert!(page.is_empty());
        assert_eq!(page.total, 0);
        assert!(!page.failed);
        assert!(Page::failed(4).failed);
    }
}
