//! Wire payloads for the resource client.

use serde::Deserialize;

/// Basic profile fields of an Instagram business account.
#[derive(Debug, Clone, Deserialize)]
pub struct AccountProfile {
    pub id: String,
    pub username: Option<String>,
    pub profile_picture_url: Option<String>,
    pub followers_count: Option<u64>,
    pub media_count: Option<u64>,
}

/// A published media object (post) on the account.
///
/// Timestamps are kept in the provider's own ISO-8601 string form.
#[derive(Debug, Clone, Deserialize)]
pub struct MediaItem {
    pub id: String,
    pub caption: Option<String>,
    pub media_type: Option<String>,
    pub media_url: Option<String>,
    pub permalink: Option<String>,
    pub thumbnail_url: Option<String>,
    pub timestamp: Option<String>,
    pub like_count: Option<u64>,
    pub comments_count: Option<u64>,
}

/// A comment on a media object.
#[derive(Debug, Clone, Deserialize)]
pub struct Comment {
    pub id: String,
    pub text: Option<String>,
    pub username: Option<String>,
    pub timestamp: Option<String>,
    pub like_count: Option<u64>,
}

/// One account-level insight metric.
#[derive(Debug, Clone, Deserialize)]
pub struct Insight {
    pub name: String,
    pub period: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub values: Vec<InsightValue>,
}

/// A single value of an insight metric. The provider reports plain numbers
/// for most metrics and keyed maps for breakdowns, so the value stays a raw
/// JSON value.
#[derive(Debug, Clone, Deserialize)]
pub struct InsightValue {
    pub value: Option<serde_json::Value>,
    pub end_time: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DataEnvelope<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ObjectId {
    pub id: String,
}
