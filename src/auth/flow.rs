use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::{debug, info, warn};

use super::callback::CallbackServer;
use super::credentials::AppCredentials;
use super::error::AuthError;
use super::token::{AccountResolution, LinkedAccount, Login, PageFailure, TokenInfo};

const DEFAULT_GRAPH_URL: &str = "https://graph.facebook.com/v18.0";
const DEFAULT_DIALOG_URL: &str = "https://www.facebook.com/dialog/oauth";
const DEFAULT_DEBUG_TOKEN_URL: &str = "https://graph.facebook.com/debug_token";

/// Options for a full [`LoginFlow::login`] run.
#[derive(Debug, Clone)]
pub struct LoginOptions {
    /// Local port for the callback listener; must match the port in the
    /// registered redirect URI.
    pub port: u16,
    /// Ceiling on the wait for the authorization code.
    pub timeout: Duration,
}

impl Default for LoginOptions {
    fn default() -> Self {
        Self {
            port: 8000,
            timeout: Duration::from_secs(120),
        }
    }
}

/// Three-legged OAuth login against the Facebook dialog and Graph API
/// endpoints: authorization code → short-lived token → long-lived token →
/// linked Instagram business accounts.
///
/// # Example
/// ```no_run
/// use instagraph::auth::{AppCredentials, LoginFlow, LoginOptions};
///
/// # async fn example() -> Result<(), instagraph::auth::AuthError> {
/// let creds = AppCredentials::new("app-id", "app-secret", "http://localhost:8000/callback");
/// let flow = LoginFlow::new(creds);
/// println!("Visit: {}", flow.authorization_url());
/// let login = flow.login(LoginOptions::default()).await?;
/// println!("long-lived token: {}", login.long_lived_token);
/// # Ok(())
/// # }
/// ```
pub struct LoginFlow {
    client: reqwest::Client,
    credentials: AppCredentials,
    graph_url: String,
    dialog_url: String,
    debug_token_url: String,
}

impl LoginFlow {
    pub fn new(credentials: AppCredentials) -> Self {
        Self {
            client: reqwest::Client::new(),
            credentials,
            graph_url: DEFAULT_GRAPH_URL.to_string(),
            dialog_url: DEFAULT_DIALOG_URL.to_string(),
            debug_token_url: DEFAULT_DEBUG_TOKEN_URL.to_string(),
        }
    }

    pub fn with_graph_url(mut self, url: impl Into<String>) -> Self {
        self.graph_url = url.into();
        self
    }

    pub fn with_dialog_url(mut self, url: impl Into<String>) -> Self {
        self.dialog_url = url.into();
        self
    }

    pub fn with_debug_token_url(mut self, url: impl Into<String>) -> Self {
        self.debug_token_url = url.into();
        self
    }

    /// The URL the user must visit to grant the requested scopes.
    pub fn authorization_url(&self) -> String {
        let scope = self.credentials.scopes.join(",");
        reqwest::Url::parse_with_params(
            &self.dialog_url,
            &[
                ("client_id", self.credentials.app_id.as_str()),
                ("redirect_uri", self.credentials.redirect_uri.as_str()),
                ("scope", scope.as_str()),
                ("response_type", "code"),
            ],
        )
        .expect("dialog URL is a valid base")
        .to_string()
    }

    /// Exchange the captured authorization code for a short-lived access
    /// token.
    pub async fn exchange_code(&self, code: &str) -> Result<String, AuthError> {
        if code.is_empty() {
            return Err(AuthError::MissingAuthCode);
        }
        let resp = self
            .client
            .get(format!("{}/oauth/access_token", self.graph_url))
            .query(&[
                ("client_id", self.credentials.app_id.as_str()),
                ("client_secret", self.credentials.app_secret.as_str()),
                ("redirect_uri", self.credentials.redirect_uri.as_str()),
                ("code", code),
            ])
            .send()
            .await?;
        let resp = require_success(resp).await?;
        let payload: AccessTokenResponse = resp.json().await?;
        Ok(payload.access_token)
    }

    /// Exchange a short-lived token for a long-lived one (valid ~60 days).
    pub async fn exchange_long_lived(&self, short_lived: &str) -> Result<String, AuthError> {
        if short_lived.is_empty() {
            return Err(AuthError::MissingAccessToken);
        }
        let resp = self
            .client
            .get(format!("{}/oauth/access_token", self.graph_url))
            .query(&[
                ("grant_type", "fb_exchange_token"),
                ("client_id", self.credentials.app_id.as_str()),
                ("client_secret", self.credentials.app_secret.as_str()),
                ("fb_exchange_token", short_lived),
            ])
            .send()
            .await?;
        let resp = require_success(resp).await?;
        let payload: AccessTokenResponse = resp.json().await?;
        Ok(payload.access_token)
    }

    /// Introspect a token with the `{app_id}|{app_secret}` app credential.
    pub async fn inspect_token(&self, token: &str) -> Result<TokenInfo, AuthError> {
        if token.is_empty() {
            return Err(AuthError::MissingAccessToken);
        }
        let resp = self
            .client
            .get(&self.debug_token_url)
            .query(&[
                ("input_token", token),
                ("access_token", self.credentials.app_token().as_str()),
            ])
            .send()
            .await?;
        let resp = require_success(resp).await?;
        let payload: DebugTokenResponse = resp.json().await?;
        let data = payload.data.ok_or_else(|| {
            AuthError::InvalidResponse("debug_token response missing data".to_string())
        })?;
        Ok(data.into_token_info())
    }

    /// Resolve the token to the Instagram business accounts reachable
    /// through the user's managed pages.
    ///
    /// One call lists the pages, then one call per page checks for a linked
    /// account using that page's own token. A failing page lookup is
    /// recorded in the resolution and skipped; the rest of the pages are
    /// still resolved.
    pub async fn linked_accounts(&self, token: &str) -> Result<AccountResolution, AuthError> {
        if token.is_empty() {
            return Err(AuthError::MissingAccessToken);
        }
        let resp = self
            .client
            .get(format!("{}/me/accounts", self.graph_url))
            .query(&[("access_token", token)])
            .send()
            .await?;
        let resp = require_success(resp).await?;
        let payload: PageList = resp.json().await?;

        let mut resolution = AccountResolution::default();
        for page in payload.data {
            match self.instagram_account_for_page(&page).await {
                Ok(Some(instagram_account_id)) => {
                    debug!(page_id = %page.id, %instagram_account_id, "linked account found");
                    resolution.accounts.push(LinkedAccount {
                        page_id: page.id,
                        page_name: page.name,
                        page_token: page.access_token,
                        instagram_account_id,
                    });
                }
                Ok(None) => {
                    debug!(page_id = %page.id, "page has no linked Instagram account");
                }
                Err(error) => {
                    warn!(page_id = %page.id, %error, "skipping page, lookup failed");
                    resolution.failures.push(PageFailure {
                        page_id: page.id,
                        page_name: page.name,
                        error,
                    });
                }
            }
        }
        Ok(resolution)
    }

    async fn instagram_account_for_page(&self, page: &Page) -> Result<Option<String>, AuthError> {
        let resp = self
            .client
            .get(format!("{}/{}", self.graph_url, page.id))
            .query(&[
                ("fields", "instagram_business_account"),
                ("access_token", page.access_token.as_str()),
            ])
            .send()
            .await?;
        let resp = require_success(resp).await?;
        let payload: PageDetails = resp.json().await?;
        Ok(payload.instagram_business_account.map(|account| account.id))
    }

    /// Run the whole flow: bind the callback listener, wait for the code,
    /// perform both token exchanges, introspect the result, and resolve the
    /// linked accounts. The listener is shut down on every exit path.
    pub async fn login(&self, options: LoginOptions) -> Result<Login, AuthError> {
        let server = CallbackServer::bind(options.port).await?;
        let result = self.login_with(&server, options.timeout).await;
        server.shutdown().await;
        result
    }

    /// The flow pipeline against a caller-owned listener. The listener is
    /// left running; the caller shuts it down.
    pub async fn login_with(
        &self,
        server: &CallbackServer,
        timeout: Duration,
    ) -> Result<Login, AuthError> {
        info!(url = %self.authorization_url(), "waiting for authorization");
        let code = server.wait_for_code(timeout).await?;
        debug!("authorization code received");

        let short_lived = self.exchange_code(&code).await?;
        debug!("short-lived token issued");
        let long_lived = self.exchange_long_lived(&short_lived).await?;
        info!("long-lived token issued");

        let token_info = match self.inspect_token(&long_lived).await {
            Ok(info) => {
                if let Some(expires_at) = info.expires_at {
                    info!(%expires_at, "token expires");
                }
                Some(info)
            }
            Err(error) => {
                warn!(%error, "token introspection failed");
                None
            }
        };

        let resolution = self.linked_accounts(&long_lived).await?;
        if resolution.accounts.is_empty() {
            warn!("no linked Instagram business accounts found");
        }
        Ok(Login {
            long_lived_token: long_lived,
            token_info,
            accounts: resolution.accounts,
            failures: resolution.failures,
        })
    }
}

async fn require_success(resp: reqwest::Response) -> Result<reqwest::Response, AuthError> {
    if resp.status().is_success() {
        return Ok(resp);
    }
    let status = resp.status().as_u16();
    let body = resp.text().await.unwrap_or_default();
    Err(AuthError::Provider { status, body })
}

#[derive(Debug, Deserialize)]
struct AccessTokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct DebugTokenResponse {
    data: Option<DebugTokenData>,
}

#[derive(Debug, Deserialize)]
struct DebugTokenData {
    app_id: Option<String>,
    application: Option<String>,
    user_id: Option<String>,
    #[serde(rename = "type")]
    token_type: Option<String>,
    #[serde(default)]
    is_valid: bool,
    expires_at: Option<i64>,
    data_access_expires_at: Option<i64>,
    issued_at: Option<i64>,
    #[serde(default)]
    scopes: Vec<String>,
}

impl DebugTokenData {
    fn into_token_info(self) -> TokenInfo {
        TokenInfo {
            app_id: self.app_id,
            application: self.application,
            user_id: self.user_id,
            token_type: self.token_type,
            is_valid: self.is_valid,
            expires_at: epoch_seconds(self.expires_at),
            data_access_expires_at: epoch_seconds(self.data_access_expires_at),
            issued_at: epoch_seconds(self.issued_at),
            scopes: self.scopes,
        }
    }
}

// Zero means the token never expires.
fn epoch_seconds(secs: Option<i64>) -> Option<DateTime<Utc>> {
    match secs {
        Some(secs) if secs > 0 => Some(DateTime::<Utc>::from(
            std::time::UNIX_EPOCH + std::time::Duration::from_secs(secs as u64),
        )),
        _ => None,
    }
}

#[derive(Debug, Deserialize)]
struct PageList {
    #[serde(default)]
    data: Vec<Page>,
}

#[derive(Debug, Deserialize)]
struct Page {
    id: String,
    #[serde(default)]
    name: String,
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct PageDetails {
    instagram_business_account: Option<AccountRef>,
}

#[derive(Debug, Deserialize)]
struct AccountRef {
    id: String,
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn flow() -> LoginFlow {
        LoginFlow::new(AppCredentials::new(
            "my-app",
            "my-secret",
            "http://localhost:8000/callback",
        ))
    }

    fn query_pairs(url: &str) -> HashMap<String, String> {
        reqwest::Url::parse(url)
            .unwrap()
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }

    #[test]
    fn authorization_url_carries_exact_parameter_set() {
        let url = flow().authorization_url();
        let params = query_pairs(&url);

        assert_eq!(params.len(), 4);
        assert_eq!(params["client_id"], "my-app");
        assert_eq!(params["redirect_uri"], "http://localhost:8000/callback");
        assert_eq!(
            params["scope"],
            "instagram_basic,instagram_manage_comments,pages_read_engagement,pages_show_list"
        );
        assert_eq!(params["response_type"], "code");
    }

    #[test]
    fn authorization_url_is_deterministic() {
        assert_eq!(flow().authorization_url(), flow().authorization_url());
    }

    #[test]
    fn authorization_url_joins_custom_scopes_with_commas() {
        let creds = AppCredentials::new("my-app", "my-secret", "http://localhost:8000/callback")
            .with_scopes(vec!["a".to_string(), "b".to_string()]);
        let url = LoginFlow::new(creds).authorization_url();
        assert_eq!(query_pairs(&url)["scope"], "a,b");
    }

    #[test]
    fn epoch_seconds_maps_zero_to_none() {
        assert!(epoch_seconds(Some(0)).is_none());
        assert!(epoch_seconds(None).is_none());
        assert!(epoch_seconds(Some(1_700_000_000)).is_some());
    }

    #[tokio::test]
    async fn exchange_code_rejects_empty_code() {
        let result = flow().exchange_code("").await;
        assert!(matches!(result, Err(AuthError::MissingAuthCode)));
    }

    #[tokio::test]
    async fn exchange_long_lived_rejects_empty_token() {
        let result = flow().exchange_long_lived("").await;
        assert!(matches!(result, Err(AuthError::MissingAccessToken)));
    }
}
