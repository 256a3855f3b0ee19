//! postboard CLI - users/posts API server and client
//!
//! - `serve`: run the HTTP API (Postgres or in-memory)
//! - `migrate`: create the schema
//! - `users` / `posts`: CRUD against a running server

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod tracing_setup;

use commands::{MigrateArgs, PostsArgs, ServeArgs, UsersArgs};

#[derive(Parser, Debug)]
#[command(
    name = "postboard",
    author,
    version,
    about = "Users and posts CRUD API over Postgres"
)]
struct Cli {
    /// Enable debug logging (RUST_LOG overrides)
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API server
    Serve(ServeArgs),
    /// Create the users and posts tables
    Migrate(MigrateArgs),
    /// Manage users on a running server
    Users(UsersArgs),
    /// Manage posts on a running server
    Posts(PostsArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    tracing_setup::init(&tracing_setup::TracingConfig { debug: cli.debug }).ok();

    match cli.command {
        Commands::Serve(args) => commands::run_serve(args).await?,
        Commands::Migrate(args) => commands::run_migrate(args).await?,
        Commands::Users(args) => commands::run_users(args).await?,
        Commands::Posts(args) => commands::run_posts(args).await?,
    }

    Ok(())
}
