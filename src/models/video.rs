use chrono::{DateTime, Utc};

/// Metadata for a single music video, combined from the search and videos
/// endpoints of the YouTube Data API.
#[derive(Debug, Clone)]
pub struct Video {
    pub id: String,
    pub title: String,
    pub description: String,
    pub channel_title: String,
    pub published_at: Option<DateTime<Utc>>,
    pub thumbnail: String,
    pub view_count: u64,
    pub like_count: u64,
    pub duration: String,
    pub category_id: String,

    /// Language inferred from the video metadata, not the search query.
    pub language: String,

    /// Language keyword the search that surfaced this video was built from.
    pub searched_language: String,
}

impl Video {
    #[must_use]
    pub fn watch_url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.id)
    }

    #[must_use]
    pub fn embed_url(&self) -> String {
        format!("https://www.youtube.com/embed/{}", self.id)
    }
}
