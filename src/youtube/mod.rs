//! Comment ingestion from the paginated commentThreads API
//!
//! Pages are requested strictly one after another: each request carries the
//! continuation token of the previous response.

mod api;

pub use api::{ApiErrorEnvelope, CommentThreadListResponse};

use crate::analysis::RawComment;
use crate::config::Config;
use crate::error::{Result, SentimError};
use crate::http::{build_client, endpoint, transport_error};
use async_trait::async_trait;
use reqwest::Client;
use std::collections::HashSet;
use std::time::Instant;
use tracing::{debug, info};

const SERVICE: &str = "comment API";

/// One page of top-level comments
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommentPage {
    pub comments: Vec<RawComment>,
    pub next_page_token: Option<String>,
}

/// Source of comment pages for a video
#[async_trait]
pub trait CommentSource: Send + Sync {
    /// Fetch one page; `page_token` is `None` for the first page
    async fn fetch_page(&self, video_id: &str, page_token: Option<&str>) -> Result<CommentPage>;
}

/// Fetch every top-level comment of a video, in the order the API delivers them
///
/// A failure on any page fails the whole fetch; pages already received are
/// dropped. Zero comments is a valid result.
pub async fn fetch_all_comments<S>(source: &S, video_id: &str) -> Result<Vec<RawComment>>
where
    S: CommentSource + ?Sized,
{
    let start = Instant::now();
    let mut comments: Vec<RawComment> = Vec::new();
    let mut seen_tokens: HashSet<String> = HashSet::new();
    let mut page_token: Option<String> = None;
    let mut pages = 0usize;

    loop {
        let page = source.fetch_page(video_id, page_token.as_deref()).await?;
        pages += 1;
        debug!(
            "Comment page fetched - video={}, page={}, items={}",
            video_id,
            pages,
            page.comments.len()
        );
        comments.extend(page.comments);

        match page.next_page_token.filter(|t| !t.is_empty()) {
            Some(token) => {
                if !seen_tokens.insert(token.clone()) {
                    return Err(SentimError::upstream(
                        SERVICE,
                        format!("continuation token '{}' repeated", token),
                    ));
                }
                page_token = Some(token);
            }
            None => break,
        }
    }

    info!(
        "Comment fetch completed - video={}, pages={}, comments={}, duration={:.2}s",
        video_id,
        pages,
        comments.len(),
        start.elapsed().as_secs_f32()
    );
    Ok(comments)
}

/// HTTP client for the commentThreads endpoint
pub struct YouTubeClient {
    client: Client,
    api_base: String,
    api_key: String,
    page_size: u32,
}

impl YouTubeClient {
    pub fn new(client: Client, api_base: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client,
            api_base: api_base.into(),
            api_key: api_key.into(),
            page_size: 100,
        }
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Build a client from configuration; fails when the credential is missing
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = build_client(config.request_timeout()?)?;
        Ok(Self::new(client, &config.youtube.api_base, config.api_key()?)
            .with_page_size(config.youtube.page_size))
    }
}

#[async_trait]
impl CommentSource for YouTubeClient {
    async fn fetch_page(&self, video_id: &str, page_token: Option<&str>) -> Result<CommentPage> {
        let url = endpoint(&self.api_base, "commentThreads");

        let mut query: Vec<(&str, String)> = vec![
            ("part", "snippet".to_string()),
            ("videoId", video_id.to_string()),
            ("key", self.api_key.clone()),
            ("maxResults", self.page_size.to_string()),
            ("textFormat", "plainText".to_string()),
        ];
        if let Some(token) = page_token {
            query.push(("pageToken", token.to_string()));
        }

        let resp = self
            .client
            .get(&url)
            .query(&query)
            .send()
            .await
            .map_err(|e| transport_error(SERVICE, e))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let message = match serde_json::from_str::<ApiErrorEnvelope>(&body) {
                Ok(envelope) if !envelope.error.message.is_empty() => {
                    format!("HTTP {}: {}", status, envelope.error.message)
                }
                _ => format!("HTTP {}", status),
            };
            return Err(SentimError::upstream(SERVICE, message));
        }

        let page: CommentThreadListResponse =
            resp.json().await.map_err(|e| transport_error(SERVICE, e))?;

        Ok(CommentPage {
            comments: page.items.into_iter().map(RawComment::from).collect(),
            next_page_token: page.next_page_token,
        })
    }
}
