//! One-shot catalog loading
//!
//! Series and short films are fetched once per session, concurrently and
//! independently. A failed collection is logged and replaced by an empty
//! one so browsing is never blocked.

use super::{
    CatalogError, CatalogItem, EPISODES_TABLE, Episode, SERIES_TABLE, SHORTS_TABLE, Series,
    ShortFilm, TableQuery, TableStore, find_by_id,
};
use crate::navigation::Tab;

/// Outcome of the initial catalog load, one result per collection.
#[derive(Debug)]
pub struct CatalogLoad {
    pub series: Result<Vec<Series>, CatalogError>,
    pub shorts: Result<Vec<ShortFilm>, CatalogError>,
}

impl CatalogLoad {
    /// A load that never produced results, e.g. because its task panicked.
    pub fn aborted(reason: &str) -> Self {
        Self {
            series: Err(CatalogError::Aborted(reason.to_string())),
            shorts: Err(CatalogError::Aborted(reason.to_string())),
        }
    }
}

/// Fetches all series and all short films, both ordered by name.
///
/// The two requests run concurrently; neither waits on or invalidates the
/// other.
pub async fn load_catalog<S: TableStore>(store: &S) -> CatalogLoad {
    let series_query = TableQuery::new(SERIES_TABLE).order_by("name");
    let shorts_query = TableQuery::new(SHORTS_TABLE).order_by("name");

    let (series, shorts) = tokio::join!(
        store.select::<Series>(&series_query),
        store.select::<ShortFilm>(&shorts_query),
    );

    CatalogLoad { series, shorts }
}

/// Fetches every episode of the given series, in backend order.
pub async fn fetch_episodes<S: TableStore>(
    store: &S,
    series_id: &str,
) -> Result<Vec<Episode>, CatalogError> {
    let query = TableQuery::new(EPISODES_TABLE).where_eq("series_id", series_id);
    store.select::<Episode>(&query).await
}

/// The in-memory catalog for the session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    series: Vec<Series>,
    shorts: Vec<ShortFilm>,
}

impl Catalog {
    pub fn new(series: Vec<Series>, shorts: Vec<ShortFilm>) -> Self {
        Self { series, shorts }
    }

    /// Settles a load into a catalog, substituting empty collections for failures.
    pub fn from_load(load: CatalogLoad) -> Self {
        let series = load.series.unwrap_or_else(|e| {
            tracing::error!(error = %e, "error fetching series");
            Vec::new()
        });
        let shorts = load.shorts.unwrap_or_else(|e| {
            tracing::error!(error = %e, "error fetching short films");
            Vec::new()
        });

        tracing::info!(
            series = series.len(),
            shorts = shorts.len(),
            "catalog ready"
        );

        Self::new(series, shorts)
    }

    pub fn series(&self) -> &[Series] {
        &self.series
    }

    pub fn shorts(&self) -> &[ShortFilm] {
        &self.shorts
    }

    pub fn find_series(&self, id: &str) -> Option<&Series> {
        find_by_id(&self.series, id)
    }

    pub fn find_short(&self, id: &str) -> Option<&ShortFilm> {
        find_by_id(&self.shorts, id)
    }

    /// The browsable items backing a Home tab. The Why tab has none.
    pub fn items_for(&self, tab: Tab) -> Vec<CatalogItem> {
        match tab {
            Tab::Series => self.series.iter().cloned().map(CatalogItem::Series).collect(),
            Tab::Shorts => self.shorts.iter().cloned().map(CatalogItem::Short).collect(),
            Tab::Why => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::MemoryStore;
    use crate::catalog::fixtures::{episode, series, short};
    use assert_matches::assert_matches;

    fn shorts(count: usize) -> Vec<ShortFilm> {
        (0..count)
            .map(|i| short(&format!("f{i}"), &format!("Film {i}")))
            .collect()
    }

    #[tokio::test]
    async fn test_load_catalog_orders_by_name() {
        let store = MemoryStore::new()
            .with_table(SERIES_TABLE, &[series("2", "Puddles"), series("1", "Clouds")])
            .unwrap()
            .with_table(SHORTS_TABLE, &shorts(2))
            .unwrap();

        let catalog = Catalog::from_load(load_catalog(&store).await);
        let names: Vec<&str> = catalog.series().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Clouds", "Puddles"]);
        assert_eq!(catalog.shorts().len(), 2);
    }

    #[tokio::test]
    async fn test_series_failure_does_not_affect_shorts() {
        let store = MemoryStore::new()
            .with_table(SERIES_TABLE, &[series("1", "Clouds")])
            .unwrap()
            .with_failing_table(SERIES_TABLE)
            .with_table(SHORTS_TABLE, &shorts(3))
            .unwrap();

        let load = load_catalog(&store).await;
        assert_matches!(load.series, Err(CatalogError::RequestError(_)));
        assert_matches!(&load.shorts, Ok(films) if films.len() == 3);

        let catalog = Catalog::from_load(load);
        assert!(catalog.series().is_empty());
        assert_eq!(catalog.shorts().len(), 3);
    }

    #[test]
    fn test_aborted_load_yields_empty_catalog() {
        let catalog = Catalog::from_load(CatalogLoad::aborted("task panicked"));
        assert_eq!(catalog, Catalog::default());
    }

    #[tokio::test]
    async fn test_fetch_episodes_filters_by_series() {
        let store = MemoryStore::new()
            .with_table(
                EPISODES_TABLE,
                &[episode("a", "s1", 1, 2), episode("b", "s2", 1, 1), episode("c", "s1", 1, 1)],
            )
            .unwrap();

        let episodes = fetch_episodes(&store, "s1").await.unwrap();
        assert_eq!(episodes.len(), 2);
        assert!(episodes.iter().all(|e| e.series_id == "s1"));
    }

    #[test]
    fn test_items_for_tab() {
        let catalog = Catalog::new(vec![series("s1", "Clouds")], shorts(2));
        assert_matches!(catalog.items_for(Tab::Series).as_slice(), [CatalogItem::Series(_)]);
        assert_eq!(catalog.items_for(Tab::Shorts).len(), 2);
        assert!(catalog.items_for(Tab::Why).is_empty());
        assert!(catalog.find_short("f1").is_some());
        assert!(catalog.find_series("nope").is_none());
    }
}
