use chrono::{DateTime, Utc};
use dashmap::DashMap;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashSet;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::YoutubeConfig;
use crate::models::video::Video;

/// YouTube category id for music videos.
const MUSIC_CATEGORY_ID: &str = "10";

/// The videos endpoint accepts at most 50 ids per request.
const MAX_IDS_PER_REQUEST: usize = 50;

/// Errors from the YouTube Data API.
#[derive(Debug, Error)]
pub enum YouTubeError {
    /// Error during HTTP request communication.
    #[error("API communication failure: {0}")]
    Api(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("YouTube API error: {status} - {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: SearchItemId,
}

#[derive(Debug, Deserialize)]
struct SearchItemId {
    #[serde(rename = "videoId")]
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct VideosResponse {
    #[serde(default)]
    items: Vec<VideoItem>,
}

#[derive(Debug, Deserialize)]
struct VideoItem {
    id: String,
    snippet: Snippet,
    #[serde(default)]
    statistics: Statistics,
    #[serde(rename = "contentDetails", default)]
    content_details: ContentDetails,
}

#[derive(Debug, Deserialize)]
struct Snippet {
    title: String,
    #[serde(default)]
    description: String,
    #[serde(rename = "channelTitle", default)]
    channel_title: String,
    #[serde(rename = "publishedAt")]
    published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    thumbnails: Thumbnails,
    #[serde(rename = "categoryId", default)]
    category_id: String,
}

#[derive(Debug, Default, Deserialize)]
struct Thumbnails {
    high: Option<Thumbnail>,
    medium: Option<Thumbnail>,
    #[serde(rename = "default")]
    fallback: Option<Thumbnail>,
}

impl Thumbnails {
    fn best_url(self) -> String {
        self.high
            .or(self.medium)
            .or(self.fallback)
            .map(|t| t.url)
            .unwrap_or_default()
    }
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
    url: String,
}

/// Statistics counts are strings on the wire.
#[derive(Debug, Default, Deserialize)]
struct Statistics {
    #[serde(rename = "viewCount")]
    view_count: Option<String>,
    #[serde(rename = "likeCount")]
    like_count: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ContentDetails {
    #[serde(default)]
    duration: String,
}

impl VideoItem {
    fn into_video(self) -> Video {
        Video {
            title: self.snippet.title,
            description: self.snippet.description,
            channel_title: self.snippet.channel_title,
            published_at: self.snippet.published_at,
            thumbnail: self.snippet.thumbnails.best_url(),
            view_count: parse_count(self.statistics.view_count.as_deref()),
            like_count: parse_count(self.statistics.like_count.as_deref()),
            duration: self.content_details.duration,
            category_id: self.snippet.category_id,
            language: String::new(),
            searched_language: String::new(),
            id: self.id,
        }
    }
}

fn parse_count(raw: Option<&str>) -> u64 {
    raw.and_then(|s| s.parse().ok()).unwrap_or(0)
}

#[derive(Debug, Clone, Hash, PartialEq, Eq)]
struct CacheKey {
    mood: String,
    language: String,
}

struct CacheEntry {
    videos: Vec<Video>,
    fetched_at: Instant,
}

/// Process-lifetime cache of search results keyed by (mood, language).
/// Entries past the TTL are treated as absent and dropped on read; there is
/// no other eviction.
struct SearchCache {
    entries: DashMap<CacheKey, CacheEntry>,
    ttl: Duration,
}

impl SearchCache {
    fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
        }
    }

    fn get(&self, mood: &str, language: &str) -> Option<Vec<Video>> {
        let key = CacheKey {
            mood: mood.to_string(),
            language: language.to_string(),
        };

        let expired = match self.entries.get(&key) {
            Some(entry) => {
                if entry.fetched_at.elapsed() < self.ttl {
                    return Some(entry.videos.clone());
                }
                true
            }
            None => false,
        };

        if expired {
            self.entries.remove(&key);
        }
        None
    }

    fn insert(&self, mood: &str, language: &str, videos: Vec<Video>) {
        self.entries.insert(
            CacheKey {
                mood: mood.to_string(),
                language: language.to_string(),
            },
            CacheEntry {
                videos,
                fetched_at: Instant::now(),
            },
        );
    }
}

/// YouTube Data API v3 client with caching and error handling.
pub struct YouTubeClient {
    client: Client,
    base_url: String,
    api_key: String,
    timeout: Duration,
    cache: SearchCache,
    max_per_language: usize,
    search_delay: Duration,
}

impl YouTubeClient {
    #[must_use]
    pub fn with_shared_client(config: &YoutubeConfig, api_key: String, client: Client) -> Self {
        Self {
            client,
            base_url: config.base_url.clone(),
            api_key,
            timeout: Duration::from_secs(config.request_timeout_seconds),
            cache: SearchCache::new(Duration::from_secs(config.cache_ttl_seconds)),
            max_per_language: config.max_results_per_language,
            search_delay: Duration::from_millis(config.search_delay_ms),
        }
    }

    /// Search for music videos matching a mood and language keyword.
    ///
    /// Results are restricted to the music category and served from the
    /// cache when a fresh entry for the same (mood, language) exists.
    pub async fn search_music_videos(
        &self,
        mood: &str,
        language: &str,
        max_results: usize,
    ) -> Result<Vec<Video>, YouTubeError> {
        if let Some(cached) = self.cache.get(mood, language) {
            debug!("Using cached results for {} {}", mood, language);
            return Ok(cached.into_iter().take(max_results).collect());
        }

        let query = format!("{} {} song", mood, language.to_lowercase());
        let url = format!("{}/search", self.base_url);
        let max_results_param = max_results.min(MAX_IDS_PER_REQUEST).to_string();

        let response = self
            .client
            .get(&url)
            .timeout(self.timeout)
            .query(&[
                ("part", "snippet"),
                ("q", query.as_str()),
                ("type", "video"),
                ("videoCategoryId", MUSIC_CATEGORY_ID),
                ("maxResults", max_results_param.as_str()),
                ("order", "relevance"),
                ("safeSearch", "none"),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(YouTubeError::Status { status, body });
        }

        let response: SearchResponse = response.json().await?;
        let video_ids: Vec<String> = response
            .items
            .into_iter()
            .filter_map(|item| item.id.video_id)
            .collect();

        if video_ids.is_empty() {
            warn!("No search results for query: {}", query);
            return Ok(vec![]);
        }

        let videos = self.video_details(&video_ids).await?;

        let music_videos: Vec<Video> = videos
            .into_iter()
            .filter(|v| v.category_id == MUSIC_CATEGORY_ID)
            .collect();

        self.cache.insert(mood, language, music_videos.clone());

        Ok(music_videos.into_iter().take(max_results).collect())
    }

    /// Fetch full metadata for a list of video ids, batching to respect the
    /// per-request id limit.
    pub async fn video_details(&self, video_ids: &[String]) -> Result<Vec<Video>, YouTubeError> {
        let url = format!("{}/videos", self.base_url);
        let mut all_videos = Vec::with_capacity(video_ids.len());

        for batch in video_ids.chunks(MAX_IDS_PER_REQUEST) {
            let ids = batch.join(",");

            let response = self
                .client
                .get(&url)
                .timeout(self.timeout)
                .query(&[
                    ("part", "snippet,statistics,contentDetails"),
                    ("id", ids.as_str()),
                    ("key", self.api_key.as_str()),
                ])
                .send()
                .await?;

            if !response.status().is_success() {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                return Err(YouTubeError::Status { status, body });
            }

            let response: VideosResponse = response.json().await?;
            all_videos.extend(response.items.into_iter().map(VideoItem::into_video));
        }

        Ok(all_videos)
    }

    /// Collect music videos across several languages for one mood.
    ///
    /// A failing language is logged and skipped; duplicates are removed and
    /// the combined list is sorted by view count.
    pub async fn multilingual_search(&self, mood: &str, languages: &[String]) -> Vec<Video> {
        let mut all_videos: Vec<Video> = Vec::new();

        for language in languages {
            match self
                .search_music_videos(mood, language, self.max_per_language)
                .await
            {
                Ok(videos) => {
                    for mut video in videos {
                        video.searched_language = language.clone();
                        video.language = infer_language(&video).to_string();
                        all_videos.push(video);
                    }
                }
                Err(e) => {
                    warn!("Error searching {} videos: {}", language, e);
                    continue;
                }
            }

            tokio::time::sleep(self.search_delay).await;
        }

        let mut seen_ids = HashSet::new();
        all_videos.retain(|v| seen_ids.insert(v.id.clone()));

        all_videos.sort_by(|a, b| b.view_count.cmp(&a.view_count));

        all_videos
    }
}

/// Best-effort language classification from title, description and channel
/// keywords. Defaults to English.
#[must_use]
pub fn infer_language(video: &Video) -> &'static str {
    let text = format!(
        "{} {} {}",
        video.title, video.description, video.channel_title
    )
    .to_lowercase();

    if ["hindi", "bollywood"].iter().any(|k| text.contains(k)) {
        "Hindi"
    } else if ["punjabi", "punjab", "bhangra"]
        .iter()
        .any(|k| text.contains(k))
    {
        "Punjabi"
    } else if ["tamil", "kollywood"].iter().any(|k| text.contains(k)) {
        "Tamil"
    } else if ["telugu", "tollywood"].iter().any(|k| text.contains(k)) {
        "Telugu"
    } else if ["korean", "k-pop", "kpop"].iter().any(|k| text.contains(k)) {
        "Korean"
    } else if ["spanish", "español", "latino"]
        .iter()
        .any(|k| text.contains(k))
    {
        "Spanish"
    } else {
        "English"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_video(id: &str, title: &str, channel: &str) -> Video {
        Video {
            id: id.to_string(),
            title: title.to_string(),
            description: String::new(),
            channel_title: channel.to_string(),
            published_at: None,
            thumbnail: String::new(),
            view_count: 0,
            like_count: 0,
            duration: String::new(),
            category_id: MUSIC_CATEGORY_ID.to_string(),
            language: String::new(),
            searched_language: String::new(),
        }
    }

    fn test_client(base_url: &str, cache_ttl: Duration) -> YouTubeClient {
        let config = YoutubeConfig {
            base_url: base_url.to_string(),
            cache_ttl_seconds: cache_ttl.as_secs(),
            search_delay_ms: 0,
            ..YoutubeConfig::default()
        };
        let mut client = YouTubeClient::with_shared_client(
            &config,
            "test-api-key".to_string(),
            Client::new(),
        );
        // Sub-second TTLs get truncated by as_secs above
        client.cache.ttl = cache_ttl;
        client
    }

    #[test]
    fn test_infer_language_keywords() {
        let cases = [
            ("Latest Bollywood Hits", "T-Series", "Hindi"),
            ("Bhangra Mix 2024", "Speed Records", "Punjabi"),
            ("Kollywood Melodies", "Think Music", "Tamil"),
            ("Tollywood Beats", "Aditya Music", "Telugu"),
            ("K-Pop Dance Practice", "HYBE LABELS", "Korean"),
            ("Éxitos Latino", "Musica Urbana", "Spanish"),
            ("Summer Pop Playlist", "Vevo", "English"),
        ];

        for (title, channel, expected) in cases {
            let video = test_video("abc", title, channel);
            assert_eq!(infer_language(&video), expected, "title: {title}");
        }
    }

    #[test]
    fn test_cache_hit_within_ttl() {
        let cache = SearchCache::new(Duration::from_secs(3600));
        cache.insert("happy", "English", vec![test_video("a", "Song", "Artist")]);

        let cached = cache.get("happy", "English").expect("fresh entry");
        assert_eq!(cached.len(), 1);
        assert_eq!(cached[0].id, "a");

        assert!(cache.get("happy", "Hindi").is_none());
        assert!(cache.get("sad", "English").is_none());
    }

    #[test]
    fn test_cache_expiry() {
        let cache = SearchCache::new(Duration::ZERO);
        cache.insert("happy", "English", vec![test_video("a", "Song", "Artist")]);

        assert!(cache.get("happy", "English").is_none());
        // The expired entry is removed, not just skipped
        assert!(cache.entries.is_empty());
    }

    #[test]
    fn test_parse_count() {
        assert_eq!(parse_count(Some("12345")), 12345);
        assert_eq!(parse_count(Some("not-a-number")), 0);
        assert_eq!(parse_count(None), 0);
    }

    fn search_body(ids: &[&str]) -> serde_json::Value {
        json!({
            "items": ids
                .iter()
                .map(|id| json!({"id": {"videoId": id}}))
                .collect::<Vec<_>>()
        })
    }

    fn videos_body(videos: &[(&str, &str, u64)]) -> serde_json::Value {
        json!({
            "items": videos
                .iter()
                .map(|(id, category, views)| json!({
                    "id": id,
                    "snippet": {
                        "title": format!("Track {id}"),
                        "description": "",
                        "channelTitle": "Test Channel",
                        "publishedAt": "2024-06-01T00:00:00Z",
                        "thumbnails": {"high": {"url": format!("https://i.ytimg.com/vi/{id}/hq.jpg")}},
                        "categoryId": category,
                    },
                    "statistics": {"viewCount": views.to_string(), "likeCount": "10"},
                    "contentDetails": {"duration": "PT3M30S"},
                }))
                .collect::<Vec<_>>()
        })
    }

    #[tokio::test]
    async fn test_search_filters_non_music_and_caches() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("key", "test-api-key"))
            .and(query_param("videoCategoryId", "10"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(search_body(&["aaa", "bbb", "ccc"])),
            )
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/videos"))
            .and(query_param("id", "aaa,bbb,ccc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(videos_body(&[
                ("aaa", "10", 5000),
                ("bbb", "22", 9000),
                ("ccc", "10", 100),
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server.uri(), Duration::from_secs(3600));

        let videos = client
            .search_music_videos("happy", "English", 10)
            .await
            .expect("search failed");

        // "bbb" is not in the music category
        assert_eq!(videos.len(), 2);
        assert!(videos.iter().all(|v| v.category_id == "10"));

        // Second identical search must be served from the cache; the
        // .expect(1) mocks verify no further upstream calls happen.
        let cached = client
            .search_music_videos("happy", "English", 10)
            .await
            .expect("cached search failed");
        assert_eq!(cached.len(), 2);
    }

    #[tokio::test]
    async fn test_search_api_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(403).set_body_string("quota exceeded"))
            .mount(&server)
            .await;

        let client = test_client(&server.uri(), Duration::from_secs(3600));

        let err = client
            .search_music_videos("happy", "English", 10)
            .await
            .expect_err("expected API error");

        match err {
            YouTubeError::Status { status, body } => {
                assert_eq!(status, reqwest::StatusCode::FORBIDDEN);
                assert!(body.contains("quota exceeded"));
            }
            e => panic!("Expected Status error, got {:?}", e),
        }
    }

    #[tokio::test]
    async fn test_multilingual_search_dedups_and_sorts() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(search_body(&["aaa", "bbb"])))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/videos"))
            .respond_with(ResponseTemplate::new(200).set_body_json(videos_body(&[
                ("aaa", "10", 100),
                ("bbb", "10", 900_000),
            ])))
            .mount(&server)
            .await;

        let client = test_client(&server.uri(), Duration::ZERO);

        let languages = vec!["English".to_string(), "Hindi".to_string()];
        let videos = client.multilingual_search("calm", &languages).await;

        // Both languages return the same two ids; duplicates collapse.
        assert_eq!(videos.len(), 2);
        assert_eq!(videos[0].id, "bbb");
        assert_eq!(videos[0].searched_language, "English");
        assert!(videos[0].view_count >= videos[1].view_count);
    }
}
