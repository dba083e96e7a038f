/// Facebook app credentials for the OAuth login flow.
///
/// # Example
/// ```
/// use instagraph::auth::AppCredentials;
///
/// let creds = AppCredentials::new("app-id", "app-secret", "http://localhost:8000/callback");
/// assert!(creds.scopes.contains(&"instagram_basic".to_string()));
/// ```
#[derive(Debug, Clone)]
pub struct AppCredentials {
    pub app_id: String,
    pub app_secret: String,
    pub redirect_uri: String,
    pub scopes: Vec<String>,
}

impl AppCredentials {
    /// Create credentials with the default permission scopes.
    pub fn new(
        app_id: impl Into<String>,
        app_secret: impl Into<String>,
        redirect_uri: impl Into<String>,
    ) -> Self {
        Self {
            app_id: app_id.into(),
            app_secret: app_secret.into(),
            redirect_uri: redirect_uri.into(),
            scopes: default_scopes(),
        }
    }

    pub fn with_scopes(mut self, scopes: Vec<String>) -> Self {
        self.scopes = scopes;
        self
    }

    /// The inspecting credential used against the token-introspection
    /// endpoint (`{app_id}|{app_secret}`).
    pub fn app_token(&self) -> String {
        format!("{}|{}", self.app_id, self.app_secret)
    }
}

fn default_scopes() -> Vec<String> {
    [
        "instagram_basic",
        "instagram_manage_comments",
        "pages_read_engagement",
        "pages_show_list",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}
