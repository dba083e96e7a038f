//! Stateless resource client for an Instagram business account.

pub mod types;

use serde::Deserialize;
use tracing::{debug, error, info};

use crate::error::{GraphError, Result};

pub use types::{AccountProfile, Comment, Insight, InsightValue, MediaItem};

use types::{DataEnvelope, ObjectId};

const DEFAULT_GRAPH_URL: &str = "https://graph.facebook.com/v18.0";

const MEDIA_FIELDS: &str =
    "id,caption,media_type,media_url,permalink,thumbnail_url,timestamp,like_count,comments_count";
const COMMENT_FIELDS: &str = "id,text,username,timestamp,like_count";
const PROFILE_FIELDS: &str = "id,username,profile_picture_url,followers_count,media_count";

/// Client for one Instagram business account, holding the long-lived access
/// token and the resolved account id. Every operation is a single Graph API
/// call; parameters travel as URL query parameters, including on POSTs
/// (provider convention).
///
/// # Example
/// ```no_run
/// use instagraph::client::AccountClient;
///
/// # async fn example() -> instagraph::error::Result<()> {
/// let client = AccountClient::new("long-lived-token", "17841400000000000");
/// let profile = client.profile().await?;
/// println!("{:?} has {:?} posts", profile.username, profile.media_count);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct AccountClient {
    client: reqwest::Client,
    graph_url: String,
    access_token: String,
    account_id: String,
}

impl AccountClient {
    pub fn new(access_token: impl Into<String>, account_id: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            graph_url: DEFAULT_GRAPH_URL.to_string(),
            access_token: access_token.into(),
            account_id: account_id.into(),
        }
    }

    pub fn with_graph_url(mut self, url: impl Into<String>) -> Self {
        self.graph_url = url.into();
        self
    }

    /// Build a client by resolving the Instagram business account connected
    /// to a Facebook page.
    pub async fn for_page(access_token: &str, page_id: &str) -> Result<Self> {
        Self::for_page_with_graph_url(DEFAULT_GRAPH_URL, access_token, page_id).await
    }

    /// Same as [`for_page`], against a non-default Graph endpoint.
    ///
    /// [`for_page`]: AccountClient::for_page
    pub async fn for_page_with_graph_url(
        graph_url: &str,
        access_token: &str,
        page_id: &str,
    ) -> Result<Self> {
        let client = reqwest::Client::new();
        let resp = client
            .get(format!("{graph_url}/{page_id}"))
            .query(&[
                ("fields", "instagram_business_account"),
                ("access_token", access_token),
            ])
            .send()
            .await?;
        let resp = require_success(resp).await?;
        let payload: PageDetails = resp.json().await?;
        let account = payload
            .instagram_business_account
            .ok_or_else(|| GraphError::NoLinkedAccount(page_id.to_string()))?;
        info!(page_id, account_id = %account.id, "resolved Instagram business account");
        Ok(Self {
            client,
            graph_url: graph_url.to_string(),
            access_token: access_token.to_string(),
            account_id: account.id,
        })
    }

    pub fn account_id(&self) -> &str {
        &self.account_id
    }

    /// Fetch the account's profile fields.
    pub async fn profile(&self) -> Result<AccountProfile> {
        debug!(account_id = %self.account_id, "fetching profile");
        let resp = self
            .client
            .get(format!("{}/{}", self.graph_url, self.account_id))
            .query(&[
                ("fields", PROFILE_FIELDS),
                ("access_token", self.access_token.as_str()),
            ])
            .send()
            .await?;
        let resp = require_success(resp).await?;
        Ok(resp.json().await?)
    }

    /// List the account's most recent media, newest first, bounded by
    /// `limit`.
    pub async fn recent_media(&self, limit: u32) -> Result<Vec<MediaItem>> {
        debug!(account_id = %self.account_id, limit, "fetching recent media");
        let resp = self
            .client
            .get(format!("{}/{}/media", self.graph_url, self.account_id))
            .query(&[
                ("fields", MEDIA_FIELDS),
                ("access_token", self.access_token.as_str()),
            ])
            .query(&[("limit", limit)])
            .send()
            .await?;
        let resp = require_success(resp).await?;
        let payload: DataEnvelope<MediaItem> = resp.json().await?;
        Ok(payload.data)
    }

    /// Create an unpublished media container for an image URL; returns the
    /// container id to pass to [`publish_media`].
    ///
    /// [`publish_media`]: AccountClient::publish_media
    pub async fn create_media(&self, image_url: &str, caption: &str) -> Result<String> {
        debug!(account_id = %self.account_id, image_url, "creating media container");
        let resp = self
            .client
            .post(format!("{}/{}/media", self.graph_url, self.account_id))
            .query(&[
                ("image_url", image_url),
                ("caption", caption),
                ("access_token", self.access_token.as_str()),
            ])
            .send()
            .await?;
        let resp = require_success(resp).await?;
        let payload: ObjectId = resp.json().await?;
        Ok(payload.id)
    }

    /// Publish a previously created media container; returns the published
    /// media id.
    pub async fn publish_media(&self, creation_id: &str) -> Result<String> {
        debug!(account_id = %self.account_id, creation_id, "publishing media container");
        let resp = self
            .client
            .post(format!("{}/{}/media_publish", self.graph_url, self.account_id))
            .query(&[
                ("creation_id", creation_id),
                ("access_token", self.access_token.as_str()),
            ])
            .send()
            .await?;
        let resp = require_success(resp).await?;
        let payload: ObjectId = resp.json().await?;
        Ok(payload.id)
    }

    /// Fetch account insights for one metric over one period.
    pub async fn insights(&self, metric: &str, period: &str) -> Result<Vec<Insight>> {
        debug!(account_id = %self.account_id, metric, period, "fetching insights");
        let resp = self
            .client
            .get(format!("{}/{}/insights", self.graph_url, self.account_id))
            .query(&[
                ("metric", metric),
                ("period", period),
                ("access_token", self.access_token.as_str()),
            ])
            .send()
            .await?;
        let resp = require_success(resp).await?;
        let payload: DataEnvelope<Insight> = resp.json().await?;
        Ok(payload.data)
    }

    /// List the comments on a media object.
    pub async fn comments(&self, media_id: &str) -> Result<Vec<Comment>> {
        debug!(media_id, "fetching comments");
        let resp = self
            .client
            .get(format!("{}/{}/comments", self.graph_url, media_id))
            .query(&[
                ("fields", COMMENT_FIELDS),
                ("access_token", self.access_token.as_str()),
            ])
            .send()
            .await?;
        let resp = require_success(resp).await?;
        let payload: DataEnvelope<Comment> = resp.json().await?;
        Ok(payload.data)
    }

    /// Reply to a comment; returns the reply's id.
    pub async fn reply_to_comment(&self, comment_id: &str, message: &str) -> Result<String> {
        debug!(comment_id, "replying to comment");
        let resp = self
            .client
            .post(format!("{}/{}/replies", self.graph_url, comment_id))
            .query(&[
                ("message", message),
                ("access_token", self.access_token.as_str()),
            ])
            .send()
            .await?;
        let resp = require_success(resp).await?;
        let payload: ObjectId = resp.json().await?;
        Ok(payload.id)
    }
}

async fn require_success(resp: reqwest::Response) -> Result<reqwest::Response> {
    if resp.status().is_success() {
        return Ok(resp);
    }
    let status = resp.status().as_u16();
    let body = resp.text().await.unwrap_or_default();
    error!(status, "Graph API error: {body}");
    Err(GraphError::Api { status, body })
}

#[derive(Debug, Deserialize)]
struct PageDetails {
    instagram_business_account: Option<AccountRef>,
}

#[derive(Debug, Deserialize)]
struct AccountRef {
    id: String,
}
