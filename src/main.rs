//! instagraph CLI binary entry point.

use clap::Parser;
use instagraph::cli::{commands, Cli, Commands};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Login(args) => commands::handle_login(&args).await,
        Commands::InspectToken => commands::handle_inspect_token().await,
        Commands::Accounts => commands::handle_accounts().await,
        Commands::RecentPosts(args) => commands::handle_recent_posts(&args).await,
        Commands::Publish(args) => commands::handle_publish(&args).await,
        Commands::Comments(args) => commands::handle_comments(&args).await,
        Commands::Reply(args) => commands::handle_reply(&args).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
