//! instagraph — Instagram Graph API SDK
//!
//! Drives the Facebook three-legged OAuth exchange (authorization URL,
//! local callback listener, short- and long-lived token exchanges, linked
//! business-account discovery) and provides a thin resource client for an
//! Instagram business account: profile, recent media, insights, comments,
//! and the media container create/publish pair.
//!
//! # Quick Start
//!
//! ```no_run
//! use instagraph::auth::{AppCredentials, LoginFlow, LoginOptions};
//! use instagraph::client::AccountClient;
//!
//! # async fn example() -> instagraph::error::Result<()> {
//! let creds = AppCredentials::new("app-id", "app-secret", "http://localhost:8000/callback");
//! let flow = LoginFlow::new(creds);
//! println!("Visit: {}", flow.authorization_url());
//! let login = flow.login(LoginOptions::default()).await?;
//!
//! if let Some(account) = login.accounts.first() {
//!     let client = AccountClient::new(
//!         login.long_lived_token.clone(),
//!         account.instagram_account_id.clone(),
//!     );
//!     let posts = client.recent_media(5).await?;
//!     println!("{} recent posts", posts.len());
//! }
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod client;
pub mod error;

#[cfg(feature = "cli")]
pub mod cli;
