// Wire types of the commentThreads listing endpoint

use crate::analysis::RawComment;
use chrono::{DateTime, Utc};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentThreadListResponse {
    #[serde(default)]
    pub items: Vec<CommentThread>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommentThread {
    pub snippet: CommentThreadSnippet,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentThreadSnippet {
    pub top_level_comment: TopLevelComment,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TopLevelComment {
    pub snippet: CommentSnippet,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentSnippet {
    pub text_display: String,
    pub published_at: DateTime<Utc>,
    #[serde(default)]
    pub author_display_name: String,
    #[serde(default)]
    pub like_count: u64,
}

/// `{"error": {"code": 403, "message": "..."}}`
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorEnvelope {
    pub error: ApiErrorBody,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub code: u16,
    #[serde(default)]
    pub message: String,
}

impl From<CommentThread> for RawComment {
    fn from(thread: CommentThread) -> Self {
        let s = thread.snippet.top_level_comment.snippet;
        RawComment {
            text: s.text_display,
            timestamp: s.published_at,
            author: s.author_display_name,
            like_count: s.like_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_page() {
        let body = r#"{
            "kind": "youtube#commentThreadListResponse",
            "nextPageToken": "QURTSl9p",
            "items": [{
                "id": "Ugx1",
                "snippet": {
                    "videoId": "dQw4w9WgXcQ",
                    "topLevelComment": {
                        "snippet": {
                            "textDisplay": "never gonna give you up",
                            "authorDisplayName": "@rick",
                            "likeCount": 12,
                            "publishedAt": "2024-01-02T03:04:05Z"
                        }
                    },
                    "totalReplyCount": 3
                }
            }]
        }"#;

        let page: CommentThreadListResponse = serde_json::from_str(body).unwrap();
        assert_eq!(page.next_page_token.as_deref(), Some("QURTSl9p"));

        let comments: Vec<RawComment> = page.items.into_iter().map(RawComment::from).collect();
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].text, "never gonna give you up");
        assert_eq!(comments[0].author, "@rick");
        assert_eq!(comments[0].like_count, 12);
    }

    #[test]
    fn test_decode_last_page_without_items() {
        let page: CommentThreadListResponse = serde_json::from_str("{}").unwrap();
        assert!(page.items.is_empty());
        assert!(page.next_page_token.is_none());
    }
}
