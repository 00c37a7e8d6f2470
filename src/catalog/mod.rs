/// Data structures and traits for the Stillness catalog.
///
/// This module provides the records served by the remote table store (series,
/// short films and episodes), the tagged `CatalogItem` used by the browsing
/// views, and the `TableStore` trait implemented by the concrete backends.
mod loader;
mod memory;
mod supabase;
mod supabase_types;

pub use loader::{Catalog, CatalogLoad, fetch_episodes, load_catalog};
pub use memory::MemoryStore;
pub use supabase::SupabaseStore;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::path::PathBuf;
use thiserror::Error;

/// Collection holding every series.
pub const SERIES_TABLE: &str = "series";
/// Collection holding every short film.
pub const SHORTS_TABLE: &str = "short_films";
/// Collection holding the episodes of all series.
pub const EPISODES_TABLE: &str = "episodes";

/// Errors that can occur while reading from a table store.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Request to the table store failed before a response arrived
    #[error("Request failed: {0}")]
    RequestError(String),

    /// The table store answered with a non-success status
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// Failed to parse the store's JSON response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// The requested collection does not exist
    #[error("Table not found: {0}")]
    TableNotFound(String),

    /// Failed to read a local catalog document
    #[error("Failed to read catalog file {path}: {source}")]
    FileReadFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The load task died before it could report a result
    #[error("Catalog load aborted: {0}")]
    Aborted(String),
}

/// A short film, played directly from its detail screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShortFilm {
    pub id: String,
    pub name: String,
    pub genre: String,
    /// Display string such as "3+"
    pub recommended_age: String,
    pub youtube_video_id: String,
    pub description: String,
}

/// A multi-episode show.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub id: String,
    pub name: String,
    pub genre: String,
    /// Display string such as "5+"
    pub recommended_age: String,
    /// Video used for previews only; episodes carry their own video ids
    pub featured_video_id: String,
    pub description: String,
}

/// A single episode of a series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Episode {
    pub id: String,
    /// The series this episode belongs to
    pub series_id: String,
    /// The season number this episode belongs to
    pub season_number: u32,
    /// The episode number within the season
    pub episode_number: u32,
    /// The episode title
    pub name: String,
    pub youtube_video_id: String,
    /// Display string, not parsed
    pub duration: String,
}

/// Represents a season of a series with its episodes in playing order.
#[derive(Debug, Clone, PartialEq)]
pub struct Season {
    /// The season number
    pub season_number: u32,
    /// Episodes of this season, ascending by episode number
    pub episodes: Vec<Episode>,
}

/// Records that can be looked up by their `id`.
pub trait Record {
    fn id(&self) -> &str;
}

impl Record for Series {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Record for ShortFilm {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Record for Episode {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Finds the record with the given id, returning `None` when it is absent.
pub fn find_by_id<'a, T: Record>(collection: &'a [T], id: &str) -> Option<&'a T> {
    collection.iter().find(|record| record.id() == id)
}

/// A browsable entry: either a series or a short film.
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogItem {
    Series(Series),
    Short(ShortFilm),
}

impl CatalogItem {
    pub fn id(&self) -> &str {
        match self {
            CatalogItem::Series(series) => &series.id,
            CatalogItem::Short(film) => &film.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            CatalogItem::Series(series) => &series.name,
            CatalogItem::Short(film) => &film.name,
        }
    }

    pub fn recommended_age(&self) -> &str {
        match self {
            CatalogItem::Series(series) => &series.recommended_age,
            CatalogItem::Short(film) => &film.recommended_age,
        }
    }

    /// Video used for thumbnails and the featured carousel.
    pub fn preview_video_id(&self) -> &str {
        match self {
            CatalogItem::Series(series) => &series.featured_video_id,
            CatalogItem::Short(film) => &film.youtube_video_id,
        }
    }
}

/// A read-only query against one collection of the table store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableQuery {
    pub table: String,
    /// Field to sort ascending by
    pub order_by: Option<String>,
    /// Equality filter as `(field, value)`
    pub filter: Option<(String, String)>,
}

impl TableQuery {
    /// Selects every record of `table`.
    pub fn new(table: &str) -> Self {
        Self {
            table: table.to_string(),
            order_by: None,
            filter: None,
        }
    }

    /// Orders the result ascending by `field`.
    pub fn order_by(mut self, field: &str) -> Self {
        self.order_by = Some(field.to_string());
        self
    }

    /// Keeps only records whose `field` equals `value`.
    pub fn where_eq(mut self, field: &str, value: &str) -> Self {
        self.filter = Some((field.to_string(), value.to_string()));
        self
    }
}

/// Trait for read-only table stores serving the catalog collections.
///
/// Implementors return every record of a collection matching the query. The
/// returned future must be `Send` so fetches can run as spawned tasks.
pub trait TableStore: Send + Sync + 'static {
    /// Fetches all records matching `query`.
    ///
    /// # Arguments
    ///
    /// * `query` - Collection, optional ascending order and optional equality filter
    ///
    /// # Returns
    ///
    /// A Result containing the decoded records, or a CatalogError
    fn select<T>(
        &self,
        query: &TableQuery,
    ) -> impl Future<Output = Result<Vec<T>, CatalogError>> + Send
    where
        T: DeserializeOwned + Send + 'static;
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn test_find_by_id() {
        let shorts = vec![short("a", "Acorn"), short("b", "Brook")];
        assert_eq!(find_by_id(&shorts, "b").map(|s| s.name.as_str()), Some("Brook"));
        assert!(find_by_id(&shorts, "missing").is_none());
        assert!(find_by_id::<ShortFilm>(&[], "a").is_none());
    }

    #[test]
    fn test_preview_video_id_dispatches_on_variant() {
        let series_item = CatalogItem::Series(series("s1", "Tides"));
        let short_item = CatalogItem::Short(short("f1", "Moss"));
        assert_eq!(series_item.preview_video_id(), "vid-s1");
        assert_eq!(short_item.preview_video_id(), "yt-f1");
        assert_eq!(series_item.name(), "Tides");
        assert_eq!(short_item.recommended_age(), "4+");
    }

    #[test]
    fn test_query_builder() {
        let query = TableQuery::new(EPISODES_TABLE).where_eq("series_id", "s1");
        assert_eq!(query.table, "episodes");
        assert_eq!(query.order_by, None);
        assert_eq!(query.filter, Some(("series_id".to_string(), "s1".to_string())));

        let query = TableQuery::new(SERIES_TABLE).order_by("name");
        assert_eq!(query.order_by.as_deref(), Some("name"));
    }

    #[test]
    fn test_records_deserialize_from_store_json() {
        let json = r#"{"id":"e1","series_id":"s1","season_number":2,"episode_number":3,
            "name":"Rain","youtube_video_id":"abc","duration":"6:12"}"#;
        let episode: Episode = serde_json::from_str(json).unwrap();
        assert_eq!(episode.season_number, 2);
        assert_eq!(episode.episode_number, 3);
        assert_eq!(episode.duration, "6:12");
    }
}
