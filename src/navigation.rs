//! Screen navigation
//!
//! The navigator decides which screen is visible. Every screen can be written
//! as a location string (`/`, `/?tab=SERIES`, `/series/:id`, `/film/:id`) and
//! parsed back, so a session can start on any screen.

use crate::catalog::CatalogItem;
use clap::ValueEnum;
use percent_encoding::{AsciiSet, CONTROLS, percent_decode_str, utf8_percent_encode};
use std::fmt;
use thiserror::Error;
use url::Url;

/// Locations are resolved against this root
const LOCATION_BASE: &str = "stillness:///";

/// Characters escaped when an id is written as a path segment
const ID_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'\\')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Errors that can occur while parsing a location
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LocationError {
    /// The path does not name any screen
    #[error("No screen at location: {0}")]
    UnknownRoute(String),

    /// A detail path without an id
    #[error("Missing id in location: {0}")]
    MissingId(String),

    /// Not a valid location at all
    #[error("Malformed location {location}: {reason}")]
    Malformed { location: String, reason: String },
}

/// One of the three mutually exclusive Home sub-views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum Tab {
    Series,
    #[value(alias = "films")]
    Shorts,
    /// Static informational page without backing data
    Why,
}

impl Tab {
    /// The value used for the `tab` query parameter.
    pub fn as_param(self) -> &'static str {
        match self {
            Tab::Series => "SERIES",
            Tab::Shorts => "SHORTS",
            Tab::Why => "WHY",
        }
    }

    /// Parses a `tab` parameter. Unknown values fall back to Shorts.
    pub fn from_param(value: &str) -> Self {
        match value.to_ascii_uppercase().as_str() {
            "SERIES" => Tab::Series,
            "WHY" => Tab::Why,
            _ => Tab::Shorts,
        }
    }

    /// Label shown in the bottom navigation bar.
    pub fn label(self) -> &'static str {
        match self {
            Tab::Series => "Series",
            Tab::Shorts => "Films",
            Tab::Why => "Why?",
        }
    }
}

/// The visible top-level screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    Home(Tab),
    SeriesDetail(String),
    ShortDetail(String),
}

impl Screen {
    /// Parses a location such as `/series/abc` or `/?tab=WHY`.
    ///
    /// Relative locations resolve against the root. Ids are percent-decoded
    /// and any fragment is ignored.
    pub fn from_location(location: &str) -> Result<Self, LocationError> {
        let malformed = |reason: String| LocationError::Malformed {
            location: location.to_string(),
            reason,
        };

        let url = Url::parse(LOCATION_BASE)
            .and_then(|base| base.join(location))
            .map_err(|e| malformed(e.to_string()))?;

        let segments = url
            .path_segments()
            .into_iter()
            .flatten()
            .filter(|s| !s.is_empty())
            .map(|s| {
                percent_decode_str(s)
                    .decode_utf8()
                    .map(|decoded| decoded.into_owned())
                    .map_err(|e| malformed(e.to_string()))
            })
            .collect::<Result<Vec<String>, _>>()?;

        let segments: Vec<&str> = segments.iter().map(String::as_str).collect();
        match segments.as_slice() {
            [] => {
                let tab = url
                    .query_pairs()
                    .find(|(key, _)| key == "tab")
                    .map(|(_, value)| Tab::from_param(&value))
                    .unwrap_or(Tab::Shorts);
                Ok(Screen::Home(tab))
            }
            ["series"] | ["film"] => Err(LocationError::MissingId(location.to_string())),
            ["series", id] => Ok(Screen::SeriesDetail(id.to_string())),
            ["film", id] => Ok(Screen::ShortDetail(id.to_string())),
            _ => Err(LocationError::UnknownRoute(location.to_string())),
        }
    }

    /// The location string for this screen. Ids are percent-encoded.
    pub fn to_location(&self) -> String {
        match self {
            Screen::Home(tab) => format!("/?tab={}", tab.as_param()),
            Screen::SeriesDetail(id) => format!("/series/{}", utf8_percent_encode(id, ID_SEGMENT)),
            Screen::ShortDetail(id) => format!("/film/{}", utf8_percent_encode(id, ID_SEGMENT)),
        }
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_location())
    }
}

/// Result of a navigation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub from: Screen,
    pub to: Screen,
    /// Set whenever the visible screen changed; the view returns to the top
    pub reset_scroll: bool,
}

impl Transition {
    fn between(from: Screen, to: Screen) -> Self {
        let reset_scroll = from != to;
        Self {
            from,
            to,
            reset_scroll,
        }
    }

    pub fn changed(&self) -> bool {
        self.from != self.to
    }
}

/// The navigation state machine. Starts on `Home(Shorts)` and never terminates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigator {
    screen: Screen,
}

impl Default for Navigator {
    fn default() -> Self {
        Self {
            screen: Screen::Home(Tab::Shorts),
        }
    }
}

impl Navigator {
    /// Starts on an arbitrary screen, e.g. one parsed from a location.
    pub fn at(screen: Screen) -> Self {
        Self { screen }
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn location(&self) -> String {
        self.screen.to_location()
    }

    fn go(&mut self, to: Screen) -> Transition {
        let from = std::mem::replace(&mut self.screen, to.clone());
        let transition = Transition::between(from, to);
        if transition.changed() {
            tracing::debug!(from = %transition.from, to = %transition.to, "navigated");
        }
        transition
    }

    /// Switches the Home tab. Ignored outside of Home.
    pub fn select_tab(&mut self, tab: Tab) -> Transition {
        match self.screen {
            Screen::Home(_) => self.go(Screen::Home(tab)),
            _ => self.go(self.screen.clone()),
        }
    }

    /// Opens the detail screen of a selected item. Only valid from Home.
    pub fn open(&mut self, item: &CatalogItem) -> Transition {
        if !matches!(self.screen, Screen::Home(_)) {
            return self.go(self.screen.clone());
        }

        match item {
            CatalogItem::Series(series) => self.go(Screen::SeriesDetail(series.id.clone())),
            CatalogItem::Short(film) => self.go(Screen::ShortDetail(film.id.clone())),
        }
    }

    /// Leaves a detail screen for the tab matching its type.
    pub fn back(&mut self) -> Transition {
        match self.screen {
            Screen::SeriesDetail(_) => self.go(Screen::Home(Tab::Series)),
            Screen::ShortDetail(_) => self.go(Screen::Home(Tab::Shorts)),
            Screen::Home(_) => self.go(self.screen.clone()),
        }
    }

    /// Jumps to any screen, as when a location is entered directly.
    pub fn goto(&mut self, screen: Screen) -> Transition {
        self.go(screen)
    }
}
