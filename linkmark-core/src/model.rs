use chrono::{DateTime, Utc};
use linkmark_scanner::Metadata;
use serde::{Deserialize, Serialize};

/// A stored bookmark row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bookmark {
    pub id: i64,
    pub url: String,
    pub title: String,
    pub description: String,
    pub favicon_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields supplied when inserting a bookmark; the database assigns the rest.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewBookmark {
    pub url: String,
    pub title: String,
    pub description: String,
    pub favicon_url: String,
}

impl NewBookmark {
    pub fn from_metadata(url: &str, metadata: &Metadata) -> Self {
        Self {
            url: url.to_string(),
            title: metadata.title.clone().unwrap_or_default(),
            description: metadata.description.clone().unwrap_or_default(),
            favicon_url: metadata.favicon_url.clone().unwrap_or_default(),
        }
    }
}

// JSON envelopes

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBookmarkRequest {
    pub url: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookmarkResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bookmark: Option<Bookmark>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BookmarkResponse {
    pub fn ok(bookmark: Bookmark) -> Self {
        Self {
            bookmark: Some(bookmark),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            bookmark: None,
            error: Some(message.into()),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookmarksResponse {
    pub bookmarks: Vec<Bookmark>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
