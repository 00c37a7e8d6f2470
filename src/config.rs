//! Session configuration
//!
//! The binary collects its options from the command line and the environment;
//! this module validates them into the settings the library works with.

use crate::navigation::{LocationError, Screen};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while validating the configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Neither a backend URL nor a catalog file was given
    #[error("No catalog source: set --supabase-url and --supabase-key, or pass --catalog-file")]
    MissingBackend,

    /// A backend URL was given without its key
    #[error("Missing Supabase key for {0}")]
    MissingKey(String),

    #[error("Invalid Supabase URL '{0}': expected http:// or https://")]
    InvalidUrl(String),

    #[error("Autoplay interval must be greater than zero")]
    InvalidInterval,

    #[error("Invalid start location: {0}")]
    InvalidStart(#[from] LocationError),
}

/// Where the catalog is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Backend {
    /// A Supabase project reached over its REST API
    Supabase { url: String, key: String },
    /// A local JSON catalog document
    File(PathBuf),
}

/// Validated settings for a browsing session.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub backend: Backend,
    /// Screen shown once the catalog is ready
    pub start: Screen,
    pub autoplay_interval: Duration,
}

impl Settings {
    /// Validates raw option values.
    ///
    /// A catalog file takes precedence over a configured backend URL.
    ///
    /// # Arguments
    ///
    /// * `supabase_url` / `supabase_key` - Remote backend, if any
    /// * `catalog_file` - Local catalog document, if any
    /// * `start` - Start location such as `/` or `/series/abc`
    /// * `autoplay_ms` - Carousel interval in milliseconds
    pub fn from_options(
        supabase_url: Option<String>,
        supabase_key: Option<String>,
        catalog_file: Option<PathBuf>,
        start: &str,
        autoplay_ms: u64,
    ) -> Result<Self, ConfigError> {
        let backend = match (catalog_file, supabase_url) {
            (Some(path), _) => Backend::File(path),
            (None, Some(url)) => {
                if !(url.starts_with("https://") || url.starts_with("http://")) {
                    return Err(ConfigError::InvalidUrl(url));
                }
                let key = supabase_key
                    .filter(|k| !k.trim().is_empty())
                    .ok_or_else(|| ConfigError::MissingKey(url.clone()))?;
                Backend::Supabase { url, key }
            }
            (None, None) => return Err(ConfigError::MissingBackend),
        };

        if autoplay_ms == 0 {
            return Err(ConfigError::InvalidInterval);
        }

        Ok(Self {
            backend,
            start: Screen::from_location(start)?,
            autoplay_interval: Duration::from_millis(autoplay_ms),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigation::Tab;
    use assert_matches::assert_matches;

    #[test]
    fn test_supabase_backend() {
        let settings = Settings::from_options(
            Some("https://demo.supabase.co".to_string()),
            Some("anon".to_string()),
            None,
            "/?tab=SERIES",
            5000,
        )
        .unwrap();
        assert_eq!(
            settings.backend,
            Backend::Supabase {
                url: "https://demo.supabase.co".to_string(),
                key: "anon".to_string()
            }
        );
        assert_eq!(settings.start, Screen::Home(Tab::Series));
        assert_eq!(settings.autoplay_interval, Duration::from_millis(5000));
    }

    #[test]
    fn test_catalog_file_wins() {
        let settings = Settings::from_options(
            Some("https://demo.supabase.co".to_string()),
            None,
            Some(PathBuf::from("demo.json")),
            "/film/f1",
            1000,
        )
        .unwrap();
        assert_eq!(settings.backend, Backend::File(PathBuf::from("demo.json")));
        assert_eq!(settings.start, Screen::ShortDetail("f1".to_string()));
    }

    #[test]
    fn test_invalid_options() {
        assert_matches!(
            Settings::from_options(None, None, None, "/", 5000),
            Err(ConfigError::MissingBackend)
        );
        assert_matches!(
            Settings::from_options(Some("https://x.co".into()), Some(" ".into()), None, "/", 5000),
            Err(ConfigError::MissingKey(_))
        );
        assert_matches!(
            Settings::from_options(Some("x.co".into()), Some("k".into()), None, "/", 5000),
            Err(ConfigError::InvalidUrl(_))
        );
        assert_matches!(
            Settings::from_options(None, None, Some("c.json".into()), "/", 0),
            Err(ConfigError::InvalidInterval)
        );
        assert_matches!(
            Settings::from_options(None, None, Some("c.json".into()), "/nowhere/1", 5000),
            Err(ConfigError::InvalidStart(_))
        );
    }
}
