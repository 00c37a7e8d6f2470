//! Series detail state
//!
//! Holds the episodes of the series currently on screen, grouped into seasons,
//! together with the selected season and episode.

use crate::catalog::{CatalogError, Episode, Season};
use std::collections::HashMap;

/// Groups episodes by season.
///
/// Seasons come out ascending by season number and episodes within a season
/// ascending by episode number. Episodes sharing a number keep their input
/// order.
pub fn group_into_seasons(episodes: &[Episode]) -> Vec<Season> {
    let mut seasons_map: HashMap<u32, Vec<Episode>> = HashMap::new();

    for episode in episodes {
        seasons_map
            .entry(episode.season_number)
            .or_default()
            .push(episode.clone());
    }

    let mut seasons: Vec<Season> = seasons_map
        .into_iter()
        .map(|(season_number, mut episodes)| {
            episodes.sort_by_key(|e| e.episode_number);
            Season {
                season_number,
                episodes,
            }
        })
        .collect();

    seasons.sort_by_key(|s| s.season_number);
    seasons
}

/// Loading phase of the episode list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EpisodesState {
    /// The fetch for the current series is outstanding
    Loading,
    /// Episodes arrived (possibly none)
    Loaded,
}

/// Selection state of a series detail screen.
#[derive(Debug, Clone)]
pub struct SeriesDetail {
    series_id: String,
    state: EpisodesState,
    seasons: Vec<Season>,
    /// Selected season number; survives a series change so it can be reused
    /// when the new series has the same season
    active_season: Option<u32>,
    /// Index into the active season's episodes
    active_episode: usize,
}

impl SeriesDetail {
    /// Creates the state for `series_id`, waiting for its episodes.
    pub fn new(series_id: &str) -> Self {
        Self {
            series_id: series_id.to_string(),
            state: EpisodesState::Loading,
            seasons: Vec::new(),
            active_season: None,
            active_episode: 0,
        }
    }

    pub fn series_id(&self) -> &str {
        &self.series_id
    }

    pub fn state(&self) -> EpisodesState {
        self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state == EpisodesState::Loading
    }

    /// Loaded and without a single episode.
    pub fn has_no_episodes(&self) -> bool {
        self.state == EpisodesState::Loaded && self.seasons.is_empty()
    }

    /// Points the state at another series, discarding the old episodes.
    ///
    /// Returns true when the series actually changed and a new fetch is needed.
    pub fn retarget(&mut self, series_id: &str) -> bool {
        if self.series_id == series_id {
            return false;
        }

        self.series_id = series_id.to_string();
        self.state = EpisodesState::Loading;
        self.seasons.clear();
        self.active_episode = 0;
        true
    }

    /// Commits a finished episode fetch.
    ///
    /// Results for any series other than the current one are stale and
    /// dropped; the return value tells whether the result was applied. A
    /// failed fetch is logged and shown as an empty series.
    pub fn apply_episodes(
        &mut self,
        series_id: &str,
        result: Result<Vec<Episode>, CatalogError>,
    ) -> bool {
        if series_id != self.series_id {
            tracing::debug!(
                stale = series_id,
                current = %self.series_id,
                "dropping episodes of a series no longer shown"
            );
            return false;
        }

        let episodes = result.unwrap_or_else(|e| {
            tracing::error!(series_id, error = %e, "error fetching episodes");
            Vec::new()
        });

        self.seasons = group_into_seasons(&episodes);
        self.state = EpisodesState::Loaded;

        // Keep the previous season when the new list still has it
        let keep = self
            .active_season
            .is_some_and(|season| self.season_numbers().contains(&season));
        if !keep {
            self.active_season = self.seasons.first().map(|s| s.season_number);
        }
        self.active_episode = 0;

        true
    }

    /// The distinct season numbers, ascending.
    pub fn season_numbers(&self) -> Vec<u32> {
        self.seasons.iter().map(|s| s.season_number).collect()
    }

    pub fn seasons(&self) -> &[Season] {
        &self.seasons
    }

    pub fn active_season(&self) -> Option<u32> {
        // Before any episodes arrive there is nothing to select
        if self.seasons.is_empty() {
            return None;
        }
        self.active_season
    }

    /// Episodes of the active season in playing order.
    pub fn episodes_in_active_season(&self) -> &[Episode] {
        self.active_season()
            .and_then(|number| self.seasons.iter().find(|s| s.season_number == number))
            .map(|season| season.episodes.as_slice())
            .unwrap_or(&[])
    }

    pub fn active_episode(&self) -> Option<&Episode> {
        self.episodes_in_active_season().get(self.active_episode)
    }

    /// Switches season and resets the episode to the season's first one.
    ///
    /// Returns false for a season the series does not have.
    pub fn select_season(&mut self, season_number: u32) -> bool {
        if !self.season_numbers().contains(&season_number) {
            return false;
        }

        self.active_season = Some(season_number);
        self.active_episode = 0;
        true
    }

    /// Selects an episode of the active season by its episode number.
    ///
    /// The season never changes. Returns false when the active season has no
    /// such episode.
    pub fn select_episode(&mut self, episode_number: u32) -> bool {
        match self
            .episodes_in_active_season()
            .iter()
            .position(|e| e.episode_number == episode_number)
        {
            Some(index) => {
                self.active_episode = index;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::fixtures::episode;
    use assert_matches::assert_matches;

    fn loaded(episodes: Vec<Episode>) -> SeriesDetail {
        let mut detail = SeriesDetail::new("s1");
        assert!(detail.apply_episodes("s1", Ok(episodes)));
        detail
    }

    fn mixed_episodes() -> Vec<Episode> {
        vec![
            episode("e5", "s1", 3, 2),
            episode("e1", "s1", 1, 2),
            episode("e2", "s1", 1, 1),
            episode("e4", "s1", 3, 1),
            episode("e3", "s1", 1, 3),
        ]
    }

    #[test]
    fn test_seasons_are_strictly_ascending() {
        let seasons = group_into_seasons(&mixed_episodes());
        let numbers: Vec<u32> = seasons.iter().map(|s| s.season_number).collect();
        assert_eq!(numbers, vec![1, 3]);
        assert!(numbers.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_episode_sort_is_idempotent() {
        let seasons = group_into_seasons(&mixed_episodes());
        let first: Vec<Episode> = seasons[0].episodes.clone();
        let again = group_into_seasons(&first);
        assert_eq!(again[0].episodes, first);

        let numbers: Vec<u32> = first.iter().map(|e| e.episode_number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
    }

    #[test]
    fn test_defaults_to_first_episode_of_first_season() {
        let detail = loaded(mixed_episodes());
        assert_eq!(detail.active_season(), Some(1));
        assert_eq!(detail.active_episode().map(|e| e.id.as_str()), Some("e2"));
    }

    #[test]
    fn test_defaults_to_first_existing_season() {
        let detail = loaded(vec![episode("a", "s1", 2, 2), episode("b", "s1", 2, 1)]);
        assert_eq!(detail.active_season(), Some(2));
        assert_eq!(detail.active_episode().map(|e| e.episode_number), Some(1));
    }

    #[test]
    fn test_switching_season_resets_episode() {
        let mut detail = loaded(mixed_episodes());
        assert!(detail.select_episode(3));
        assert_eq!(detail.active_episode().map(|e| e.id.as_str()), Some("e3"));

        assert!(detail.select_season(3));
        assert_eq!(detail.active_episode().map(|e| e.id.as_str()), Some("e4"));

        assert!(detail.select_season(1));
        assert_eq!(detail.active_episode().map(|e| e.episode_number), Some(1));

        assert!(!detail.select_season(2));
        assert_eq!(detail.active_season(), Some(1));
    }

    #[test]
    fn test_selecting_episode_keeps_season() {
        let mut detail = loaded(mixed_episodes());
        assert!(detail.select_season(3));
        assert!(detail.select_episode(2));
        assert_eq!(detail.active_season(), Some(3));
        assert_eq!(detail.active_episode().map(|e| e.id.as_str()), Some("e5"));

        // Episode 3 only exists in season 1
        assert!(!detail.select_episode(3));
        assert_eq!(detail.active_episode().map(|e| e.id.as_str()), Some("e5"));
    }

    #[test]
    fn test_empty_and_failed_results() {
        let detail = loaded(Vec::new());
        assert!(detail.has_no_episodes());
        assert!(detail.active_episode().is_none());
        assert_eq!(detail.active_season(), None);

        let mut detail = SeriesDetail::new("s1");
        assert!(detail.is_loading());
        assert!(!detail.has_no_episodes());
        detail.apply_episodes("s1", Err(CatalogError::RequestError("offline".to_string())));
        assert_matches!(detail.state(), EpisodesState::Loaded);
        assert!(detail.has_no_episodes());
    }

    #[test]
    fn test_stale_results_are_dropped() {
        let mut detail = SeriesDetail::new("s1");
        assert!(detail.retarget("s2"));
        assert!(!detail.apply_episodes("s1", Ok(vec![episode("x", "s1", 1, 1)])));
        assert!(detail.is_loading());

        assert!(detail.apply_episodes("s2", Ok(vec![episode("y", "s2", 1, 1)])));
        assert_eq!(detail.active_episode().map(|e| e.id.as_str()), Some("y"));
    }

    #[test]
    fn test_retarget_keeps_season_only_when_present() {
        let mut detail = loaded(mixed_episodes());
        detail.select_season(3);

        assert!(!detail.retarget("s1"));
        assert!(detail.retarget("s2"));
        assert!(detail.seasons().is_empty());
        detail.apply_episodes(
            "s2",
            Ok(vec![episode("a", "s2", 1, 1), episode("b", "s2", 3, 4)]),
        );
        assert_eq!(detail.active_season(), Some(3));
        assert_eq!(detail.active_episode().map(|e| e.id.as_str()), Some("b"));

        assert!(detail.retarget("s3"));
        detail.apply_episodes("s3", Ok(vec![episode("c", "s3", 5, 1)]));
        assert_eq!(detail.active_season(), Some(5));
    }
}
