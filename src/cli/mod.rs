//! CLI entry point for instagraph.

pub mod commands;

use clap::{Parser, Subcommand};

/// Instagram Graph API CLI
#[derive(Parser, Debug)]
#[command(name = "instagraph", version, about = "Instagram Graph API CLI")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the OAuth login flow and print the long-lived token
    Login(LoginArgs),
    /// Introspect the configured long-lived token
    InspectToken,
    /// List the Instagram business accounts linked to the configured token
    Accounts,
    /// List recent posts of the configured page's Instagram account
    RecentPosts(RecentPostsArgs),
    /// Create and publish an image post
    Publish(PublishArgs),
    /// List comments on a media object
    Comments(CommentsArgs),
    /// Reply to a comment
    Reply(ReplyArgs),
}

/// Arguments for `instagraph login`.
#[derive(Parser, Debug)]
pub struct LoginArgs {
    /// Local port for the OAuth callback listener
    #[arg(long, default_value_t = 8000)]
    pub port: u16,

    /// Seconds to wait for the authorization code
    #[arg(long, default_value_t = 120)]
    pub timeout_secs: u64,
}

/// Arguments for `instagraph recent-posts`.
#[derive(Parser, Debug)]
pub struct RecentPostsArgs {
    /// Maximum number of posts to fetch
    #[arg(short, long, default_value_t = 10)]
    pub limit: u32,
}

/// Arguments for `instagraph publish`.
#[derive(Parser, Debug)]
pub struct PublishArgs {
    /// Public URL of the image to post
    #[arg(long)]
    pub image_url: String,

    /// Caption for the post
    #[arg(long)]
    pub caption: String,
}

/// Arguments for `instagraph comments`.
#[derive(Parser, Debug)]
pub struct CommentsArgs {
    /// Media object id
    pub media_id: String,
}

/// Arguments for `instagraph reply`.
#[derive(Parser, Debug)]
pub struct ReplyArgs {
    /// Comment id to reply to
    pub comment_id: String,
    /// Reply text
    pub message: String,
}
