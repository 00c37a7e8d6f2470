//! Embedded video player references
//!
//! Playback is handled entirely by the YouTube embed. This module only builds
//! the URLs handed to it.

/// Base URL of the YouTube embed player
const EMBED_BASE_URL: &str = "https://www.youtube.com/embed";

/// Base URL of YouTube video thumbnails
const THUMBNAIL_BASE_URL: &str = "https://img.youtube.com/vi";

/// What the embedded player is asked to show.
///
/// A new video id means a fresh embed; nothing carries over between two
/// embeds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoEmbed {
    pub video_id: String,
    pub autoplay: bool,
    /// Accessible title of the player frame
    pub title: String,
}

impl VideoEmbed {
    pub fn new(video_id: &str, autoplay: bool, title: &str) -> Self {
        Self {
            video_id: video_id.to_string(),
            autoplay,
            title: title.to_string(),
        }
    }

    /// The URL loaded by the player frame.
    pub fn embed_url(&self) -> String {
        format!(
            "{}/{}?autoplay={}&rel=0&playsinline=1&modestbranding=1",
            EMBED_BASE_URL,
            self.video_id,
            if self.autoplay { 1 } else { 0 }
        )
    }
}

/// Thumbnail image for a video.
pub fn thumbnail_url(video_id: &str) -> String {
    format!("{}/{}/hqdefault.jpg", THUMBNAIL_BASE_URL, video_id)
}
