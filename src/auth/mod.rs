//! OAuth login flow and linked-account discovery.

pub mod callback;
pub mod credentials;
pub mod error;
pub mod flow;
pub mod token;

pub use callback::CallbackServer;
pub use credentials::AppCredentials;
pub use error::AuthError;
pub use flow::{LoginFlow, LoginOptions};
pub use token::{AccountResolution, LinkedAccount, Login, PageFailure, TokenInfo};
