use chrono::{DateTime, Utc};

use super::error::AuthError;

/// Token metadata returned by the provider's `debug_token` endpoint.
///
/// Epoch-second fields on the wire are mapped to [`DateTime<Utc>`]; a zero
/// `expires_at` (a token that never expires) maps to `None`.
#[derive(Debug, Clone)]
pub struct TokenInfo {
    pub app_id: Option<String>,
    pub application: Option<String>,
    pub user_id: Option<String>,
    pub token_type: Option<String>,
    pub is_valid: bool,
    pub expires_at: Option<DateTime<Utc>>,
    pub data_access_expires_at: Option<DateTime<Utc>>,
    pub issued_at: Option<DateTime<Utc>>,
    pub scopes: Vec<String>,
}

/// An Instagram business account reachable through a user-managed Facebook
/// page.
///
/// # Example
/// ```
/// use instagraph::auth::LinkedAccount;
///
/// let account = LinkedAccount {
///     page_id: "477006882171967".to_string(),
///     page_name: "My Page".to_string(),
///     page_token: "page-token".to_string(),
///     instagram_account_id: "17841400000000000".to_string(),
/// };
/// ```
#[derive(Debug, Clone)]
pub struct LinkedAccount {
    pub page_id: String,
    pub page_name: String,
    pub page_token: String,
    pub instagram_account_id: String,
}

/// A per-page lookup that failed during account resolution.
#[derive(Debug)]
pub struct PageFailure {
    pub page_id: String,
    pub page_name: String,
    pub error: AuthError,
}

/// Outcome of resolving a token to its linked business accounts: the
/// accounts that resolved plus the page lookups that failed along the way.
#[derive(Debug, Default)]
pub struct AccountResolution {
    pub accounts: Vec<LinkedAccount>,
    pub failures: Vec<PageFailure>,
}

/// Result of a completed login flow.
#[derive(Debug)]
pub struct Login {
    pub long_lived_token: String,
    /// Introspection of the long-lived token, when the lookup succeeded.
    pub token_info: Option<TokenInfo>,
    pub accounts: Vec<LinkedAccount>,
    pub failures: Vec<PageFailure>,
}
