//! CLI command handlers.

use std::time::Duration;

use crate::auth::{AppCredentials, LoginFlow, LoginOptions};
use crate::client::AccountClient;
use crate::error::{GraphError, Result};

use super::{CommentsArgs, LoginArgs, PublishArgs, RecentPostsArgs, ReplyArgs};

/// Handle `instagraph login`.
pub async fn handle_login(args: &LoginArgs) -> Result<()> {
    let flow = flow_from_env(args.port)?;

    let url = flow.authorization_url();
    println!("Opening browser for authorization...");
    if open::that(&url).is_err() {
        println!("Could not open browser. Please visit:\n{url}");
    }
    println!(
        "Waiting for the callback on http://localhost:{}/callback ...",
        args.port
    );

    let login = flow
        .login(LoginOptions {
            port: args.port,
            timeout: Duration::from_secs(args.timeout_secs),
        })
        .await?;

    println!("\nLong-lived access token:\n{}", login.long_lived_token);
    if let Some(expires_at) = login.token_info.as_ref().and_then(|info| info.expires_at) {
        println!("Token expires at: {}", expires_at.format("%Y-%m-%d %H:%M:%S"));
    }

    if login.accounts.is_empty() {
        println!("\nNo Instagram business accounts found.");
    } else {
        println!("\nLinked Instagram business accounts:");
        for (i, account) in login.accounts.iter().enumerate() {
            println!(
                "{}. Page: {} (ID: {})",
                i + 1,
                account.page_name,
                account.page_id
            );
            println!("   Instagram account ID: {}", account.instagram_account_id);
            println!("   Page token: {}...", truncate(&account.page_token, 10));
        }
    }
    for failure in &login.failures {
        eprintln!(
            "Could not check page {} ({}): {}",
            failure.page_id, failure.page_name, failure.error
        );
    }
    Ok(())
}

/// Handle `instagraph inspect-token`.
pub async fn handle_inspect_token() -> Result<()> {
    let flow = flow_from_env(8000)?;
    let token = require_env("LONG_ACCESS_TOKEN")?;
    let info = flow.inspect_token(&token).await?;

    println!("Valid: {}", info.is_valid);
    if let Some(app_id) = &info.app_id {
        println!("App ID: {app_id}");
    }
    if let Some(application) = &info.application {
        println!("Application: {application}");
    }
    if let Some(user_id) = &info.user_id {
        println!("User ID: {user_id}");
    }
    if let Some(token_type) = &info.token_type {
        println!("Type: {token_type}");
    }
    match info.expires_at {
        Some(expires_at) => println!("Expires at: {}", expires_at.format("%Y-%m-%d %H:%M:%S")),
        None => println!("Expires at: never"),
    }
    if let Some(issued_at) = info.issued_at {
        println!("Issued at: {}", issued_at.format("%Y-%m-%d %H:%M:%S"));
    }
    println!("Scopes: {}", info.scopes.join(", "));
    Ok(())
}

/// Handle `instagraph accounts`.
pub async fn handle_accounts() -> Result<()> {
    let flow = flow_from_env(8000)?;
    let token = require_env("LONG_ACCESS_TOKEN")?;
    let resolution = flow.linked_accounts(&token).await?;

    if resolution.accounts.is_empty() {
        println!("No Instagram business accounts found.");
    }
    for (i, account) in resolution.accounts.iter().enumerate() {
        println!(
            "{}. Page: {} (ID: {})",
            i + 1,
            account.page_name,
            account.page_id
        );
        println!("   Instagram account ID: {}", account.instagram_account_id);
    }
    for failure in &resolution.failures {
        eprintln!(
            "Could not check page {} ({}): {}",
            failure.page_id, failure.page_name, failure.error
        );
    }
    Ok(())
}

/// Handle `instagraph recent-posts`.
pub async fn handle_recent_posts(args: &RecentPostsArgs) -> Result<()> {
    let client = client_from_env().await?;
    let posts = client.recent_media(args.limit).await?;

    if posts.is_empty() {
        println!("No posts found.");
        return Ok(());
    }
    println!("Found {} recent posts:\n", posts.len());
    for (i, post) in posts.iter().enumerate() {
        println!("Post {}:", i + 1);
        if let Some(timestamp) = &post.timestamp {
            println!("  Posted: {timestamp}");
        }
        if let Some(media_type) = &post.media_type {
            println!("  Type: {media_type}");
        }
        if let Some(caption) = &post.caption {
            println!("  Caption: {}", truncate(caption, 100));
        }
        println!("  Likes: {}", post.like_count.unwrap_or(0));
        println!("  Comments: {}", post.comments_count.unwrap_or(0));
        if let Some(permalink) = &post.permalink {
            println!("  Link: {permalink}");
        }
        println!();
    }
    Ok(())
}

/// Handle `instagraph publish`.
pub async fn handle_publish(args: &PublishArgs) -> Result<()> {
    let client = client_from_env().await?;
    let creation_id = client.create_media(&args.image_url, &args.caption).await?;
    println!("Created media container: {creation_id}");
    let media_id = client.publish_media(&creation_id).await?;
    println!("Published media: {media_id}");
    Ok(())
}

/// Handle `instagraph comments`.
pub async fn handle_comments(args: &CommentsArgs) -> Result<()> {
    let client = client_from_env().await?;
    let comments = client.comments(&args.media_id).await?;

    if comments.is_empty() {
        println!("No comments found.");
        return Ok(());
    }
    for comment in &comments {
        println!(
            "{} ({}): {}",
            comment.username.as_deref().unwrap_or("unknown"),
            comment.id,
            comment.text.as_deref().unwrap_or("")
        );
    }
    Ok(())
}

/// Handle `instagraph reply`.
pub async fn handle_reply(args: &ReplyArgs) -> Result<()> {
    let client = client_from_env().await?;
    let reply_id = client.reply_to_comment(&args.comment_id, &args.message).await?;
    println!("Posted reply: {reply_id}");
    Ok(())
}

fn flow_from_env(port: u16) -> Result<LoginFlow> {
    let app_id = require_env("APP_ID")?;
    let app_secret = require_env("APP_SECRET")?;
    let redirect_uri = format!("http://localhost:{port}/callback");
    Ok(LoginFlow::new(AppCredentials::new(
        app_id,
        app_secret,
        redirect_uri,
    )))
}

async fn client_from_env() -> Result<AccountClient> {
    let token = require_env("LONG_ACCESS_TOKEN")?;
    let page_id = require_env("FACEBOOK_PAGE_ID")?;
    AccountClient::for_page(&token, &page_id).await
}

fn require_env(name: &str) -> Result<String> {
    std::env::var(name)
        .map_err(|_| GraphError::Configuration(format!("{name} is not set in the environment")))
}

fn truncate(value: &str, max_chars: usize) -> &str {
    match value.char_indices().nth(max_chars) {
        Some((idx, _)) => &value[..idx],
        None => value,
    }
}
