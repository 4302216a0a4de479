use serde::Serialize;
use std::collections::HashMap;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::warn;

use crate::clients::youtube::YouTubeClient;
use crate::models::video::Video;

/// Languages searched for recommendations. Order matters: when a caller
/// requests one language, the first two *other* entries are added for
/// diversity.
pub const SUPPORTED_LANGUAGES: [&str; 7] = [
    "English", "Hindi", "Punjabi", "Tamil", "Telugu", "Korean", "Spanish",
];

/// The seven emotion classes produced by the inference service.
pub const EMOTION_LABELS: [&str; 7] = [
    "Happy", "Sad", "Angry", "Neutral", "Surprise", "Fear", "Disgust",
];

/// Minimum number of distinct languages a full result set should span.
const LANGUAGE_DIVERSITY_TARGET: usize = 3;

/// When a language is requested, at most this many results are reserved
/// for it before diversity takes over.
const REQUESTED_LANGUAGE_QUOTA: usize = 2;

/// Mood keyword substituted for a detected emotion when building the
/// search query. Unknown labels fall back to `happy`.
#[must_use]
pub fn mood_for_emotion(emotion: &str) -> &'static str {
    match emotion.to_lowercase().as_str() {
        "sad" => "sad",
        "angry" => "energetic",
        "neutral" => "calm",
        "surprise" => "exciting",
        "fear" => "dark",
        "disgust" => "intense",
        _ => "happy",
    }
}

#[must_use]
pub fn supported_languages() -> Vec<String> {
    SUPPORTED_LANGUAGES.iter().map(ToString::to_string).collect()
}

/// Estimated per-emotion catalogue sizes surfaced by the stats endpoint.
/// YouTube does not expose real totals, so these are fixed estimates.
#[must_use]
pub fn song_count_by_emotion() -> HashMap<String, u64> {
    EMOTION_LABELS
        .iter()
        .map(|label| ((*label).to_string(), 10_000_000))
        .collect()
}

/// A single recommendation as returned to the browser.
#[derive(Debug, Clone, Serialize)]
pub struct Recommendation {
    pub song_name: String,
    pub artist: String,
    pub language: String,
    pub emotion: String,
    pub genre: String,
    pub youtube_id: String,
    pub youtube_url: String,
    pub embed_url: String,
    pub thumbnail: String,
    pub view_count: u64,
    pub like_count: u64,
    pub recommendation_score: f64,
    pub channel_title: String,
}

/// Matches music videos to detected emotions via the mood keyword table
/// and a multi-language YouTube search.
pub struct Recommender {
    youtube: Arc<YouTubeClient>,
}

impl Recommender {
    #[must_use]
    pub const fn new(youtube: Arc<YouTubeClient>) -> Self {
        Self { youtube }
    }

    /// Recommend up to `top_n` music videos for a detected emotion.
    ///
    /// An optional language is preferred, not strictly enforced: the result
    /// still spans several languages when the candidate pool allows it.
    pub async fn recommendations(
        &self,
        emotion: &str,
        confidence: f64,
        top_n: usize,
        language: Option<&str>,
    ) -> Vec<Recommendation> {
        let mood = mood_for_emotion(emotion);
        let languages = languages_to_search(language);

        let mut videos = self.youtube.multilingual_search(mood, &languages).await;

        if videos.is_empty() {
            warn!("No videos found for emotion: {}, mood: {}", emotion, mood);
            return vec![];
        }

        if let Some(requested) = language {
            videos = prefer_language(videos, requested, top_n);
        }

        let mut selected = ensure_language_diversity(videos, top_n);

        selected.sort_by(|a, b| {
            rank_score(b, confidence).total_cmp(&rank_score(a, confidence))
        });
        selected.truncate(top_n);

        selected
            .into_iter()
            .map(|video| format_recommendation(video, emotion, confidence))
            .collect()
    }
}

/// Ranking weight: popularity scaled by how confident the detection was.
fn rank_score(video: &Video, mood_match_score: f64) -> f64 {
    video.view_count as f64 * mood_match_score
}

/// Which languages to search: the requested one plus two others, or the
/// whole supported list when none was requested.
fn languages_to_search(language: Option<&str>) -> Vec<String> {
    match language {
        Some(requested) => {
            let mut languages = vec![requested.to_string()];
            languages.extend(
                SUPPORTED_LANGUAGES
                    .iter()
                    .filter(|l| !l.eq_ignore_ascii_case(requested))
                    .take(2)
                    .map(ToString::to_string),
            );
            languages
        }
        None => supported_languages(),
    }
}

/// Reserve up to two slots for the requested language and fill the rest
/// from the other languages, keeping the overall pool diverse.
fn prefer_language(videos: Vec<Video>, requested: &str, top_n: usize) -> Vec<Video> {
    let (matching, other): (Vec<Video>, Vec<Video>) = videos
        .into_iter()
        .partition(|v| v.language.eq_ignore_ascii_case(requested));

    let reserved = matching.len().min(REQUESTED_LANGUAGE_QUOTA);
    let mut selected: Vec<Video> = matching.into_iter().take(reserved).collect();
    selected.extend(other.into_iter().take(top_n.saturating_sub(reserved)));
    selected
}

/// Re-shuffle a candidate pool so the result spans at least three languages
/// where possible: one video per available language first, remaining slots
/// by view count.
fn ensure_language_diversity(videos: Vec<Video>, target_count: usize) -> Vec<Video> {
    if videos.len() < LANGUAGE_DIVERSITY_TARGET {
        let mut videos = videos;
        videos.truncate(target_count);
        return videos;
    }

    let distinct: HashSet<&str> = videos.iter().map(|v| v.language.as_str()).collect();
    if distinct.len() >= LANGUAGE_DIVERSITY_TARGET {
        let mut videos = videos;
        videos.truncate(target_count);
        return videos;
    }

    let mut by_language: HashMap<String, Vec<Video>> = HashMap::new();
    for video in videos {
        by_language
            .entry(video.language.clone())
            .or_default()
            .push(video);
    }

    let mut groups: Vec<(String, Vec<Video>)> = by_language.into_iter().collect();
    groups.sort_by(|a, b| b.1.len().cmp(&a.1.len()));

    let mut selected = Vec::new();
    let mut remaining = Vec::new();
    for (_, mut group) in groups {
        if !group.is_empty() {
            selected.push(group.remove(0));
        }
        remaining.extend(group);
    }

    remaining.sort_by(|a, b| b.view_count.cmp(&a.view_count));
    let open_slots = target_count.saturating_sub(selected.len());
    selected.extend(remaining.into_iter().take(open_slots));

    selected.truncate(target_count);
    selected
}

/// Channel titles usually carry the artist; auto-generated channels get a
/// ` - Topic` suffix and label channels a `VEVO` one.
fn extract_artist(video: &Video) -> String {
    let cleaned = video
        .channel_title
        .replace(" - Topic", "")
        .replace("VEVO", "");
    let cleaned = cleaned.trim();
    if !cleaned.is_empty() {
        return cleaned.to_string();
    }

    // "Song Name - Artist Name"
    if let Some((_, artist)) = video.title.split_once(" - ") {
        let artist = artist.trim();
        if !artist.is_empty() {
            return artist.to_string();
        }
    }

    if video.channel_title.is_empty() {
        "Unknown Artist".to_string()
    } else {
        video.channel_title.clone()
    }
}

fn format_recommendation(video: Video, emotion: &str, mood_match_score: f64) -> Recommendation {
    let artist = extract_artist(&video);
    let youtube_url = video.watch_url();
    let embed_url = video.embed_url();
    let recommendation_score = mood_match_score * (video.view_count as f64 / 1_000_000.0);

    Recommendation {
        song_name: video.title,
        artist,
        language: video.language,
        emotion: emotion.to_string(),
        genre: "Music".to_string(),
        youtube_id: video.id,
        youtube_url,
        embed_url,
        thumbnail: video.thumbnail,
        view_count: video.view_count,
        like_count: video.like_count,
        recommendation_score,
        channel_title: video.channel_title,
    }
}
