//! Stillness - browse a curated catalog of calm children's videos
//!
//! This library provides the browsing logic behind the Stillness front-end:
//! loading the catalog of series and short films from a table store,
//! navigating between screens, the self-advancing featured carousel, and
//! season/episode selection on a series' detail screen.

mod app;
mod carousel;
mod catalog;
mod command;
mod config;
mod navigation;
mod player;
mod series_detail;
mod views;

// Re-export error types
pub use catalog::CatalogError;
pub use config::ConfigError;
pub use navigation::LocationError;

pub use app::{App, AppEvent, Update};
pub use carousel::{AUTOPLAY_INTERVAL, CarouselController, CarouselTick, MAX_SLIDES};
pub use catalog::{
    Catalog, CatalogItem, CatalogLoad, Episode, MemoryStore, Season, Series, ShortFilm,
    SupabaseStore, TableQuery, TableStore, fetch_episodes, find_by_id, load_catalog,
};
pub use command::Command;
pub use config::{Backend, Settings};
pub use navigation::{Navigator, Screen, Tab, Transition};
pub use player::{VideoEmbed, thumbnail_url};
pub use series_detail::{EpisodesState, SeriesDetail, group_into_seasons};

use std::io;
use thiserror::Error;

/// Top-level error type for Stillness operations
#[derive(Debug, Error)]
pub enum StillnessError {
    /// Error while reading the catalog
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}
