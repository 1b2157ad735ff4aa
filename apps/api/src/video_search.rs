//! Pluggable, trait-based lookup of lesson videos.
//!
//! Default: `YouTubeSearch` (YouTube Data API v3) when `YOUTUBE_API_KEY` is set,
//! otherwise `DisabledVideoSearch`.
//!
//! `AppState` holds an `Arc<dyn VideoSearch>`, chosen at startup from config.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

const YOUTUBE_SEARCH_URL: &str = "https://www.googleapis.com/youtube/v3/search";
const YOUTUBE_WATCH_URL: &str = "https://www.youtube.com/watch?v=";

#[derive(Debug, Error)]
pub enum VideoSearchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },
}

/// A video suggested for a lesson.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoRef {
    pub video_id: String,
    pub title: String,
    pub channel_title: String,
    pub url: String,
    pub thumbnail_url: Option<String>,
}

/// Implement this to swap video backends without touching the course generator.
#[async_trait]
pub trait VideoSearch: Send + Sync {
    async fn search(
        &self,
        query: &str,
        max_results: u8,
    ) -> Result<Vec<VideoRef>, VideoSearchError>;
}

// ────────────────────────────────────────────────────────────────────────────
// YouTube Data API v3
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct SearchListResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: SearchItemId,
    snippet: Option<Snippet>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchItemId {
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Snippet {
    title: String,
    channel_title: String,
    thumbnails: Option<Thumbnails>,
}

#[derive(Debug, Deserialize)]
struct Thumbnails {
    medium: Option<Thumbnail>,
    default: Option<Thumbnail>,
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
    url: String,
}

pub struct YouTubeSearch {
    client: Client,
    api_key: String,
}

impl YouTubeSearch {
    pub fn new(api_key: String) -> Result<Self, VideoSearchError> {
        Ok(Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(15))
                .build()?,
            api_key,
        })
    }
}

#[async_trait]
impl VideoSearch for YouTubeSearch {
    async fn search(
        &self,
        query: &str,
        max_results: u8,
    ) -> Result<Vec<VideoRef>, VideoSearchError> {
        let max_results = max_results.to_string();
        let response = self
            .client
            .get(YOUTUBE_SEARCH_URL)
            .query(&[
                ("part", "snippet"),
                ("type", "video"),
                ("videoEmbeddable", "true"),
                ("safeSearch", "strict"),
                ("maxResults", max_results.as_str()),
                ("q", query),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(VideoSearchError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: SearchListResponse = response.json().await?;
        let videos = into_video_refs(body);
        debug!("Video search for '{query}' returned {} results", videos.len());
        Ok(videos)
    }
}

/// Keeps only items that are actual videos with a snippet.
fn into_video_refs(body: SearchListResponse) -> Vec<VideoRef> {
    body.items
        .into_iter()
        .filter_map(|item| {
            let video_id = item.id.video_id?;
            let snippet = item.snippet?;
            let thumbnail_url = snippet
                .thumbnails
                .and_then(|t| t.medium.or(t.default))
                .map(|t| t.url);
            Some(VideoRef {
                url: format!("{YOUTUBE_WATCH_URL}{video_id}"),
                video_id,
                title: snippet.title,
                channel_title: snippet.channel_title,
                thumbnail_url,
            })
        })
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Disabled backend
// ────────────────────────────────────────────────────────────────────────────

/// Used when no video API key is configured. Always returns no videos.
pub struct DisabledVideoSearch;

#[async_trait]
impl VideoSearch for DisabledVideoSearch {
    async fn search(
        &self,
        _query: &str,
        _max_results: u8,
    ) -> Result<Vec<VideoRef>, VideoSearchError> {
        Ok(vec![])
    }
}
