//! User commands - talk to a running postboard server
//!
//! ```bash
//! postboard users create --email ada@example.com --name Ada
//! postboard users list --json | jq '.[].email'
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use serde_json::{json, Map, Value};

use postboard_server::http::routes::common::MessageResponse;
use postboard_server::http::routes::users::{UserEnvelope, UserResponse, UsersEnvelope};

use super::client::{print_json, ApiClient, ClientArgs, OutputFormat};

#[derive(Parser, Debug)]
pub struct UsersArgs {
    #[command(flatten)]
    pub client: ClientArgs,

    #[command(subcommand)]
    pub command: UsersCommands,
}

#[derive(Subcommand, Debug)]
pub enum UsersCommands {
    /// List users with their posts
    List,
    /// Show one user
    Get {
        id: i32,
    },
    /// Create a user
    Create {
        #[arg(long)]
        email: String,
        #[arg(long)]
        name: Option<String>,
    },
    /// Change a user's email and/or name
    Update {
        id: i32,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        name: Option<String>,
    },
    /// Delete a user (their posts are kept without an author)
    Delete {
        id: i32,
    },
}

pub async fn run_users(args: UsersArgs) -> Result<()> {
    let client = ApiClient::new(&args.client.endpoint)?;
    let format = args.client.format();

    match args.command {
        UsersCommands::List => {
            let list: UsersEnvelope = client.get("/users").await?;
            match format {
                OutputFormat::Json => print_json(&list.users)?,
                OutputFormat::Human => print_user_list(&list.users),
            }
        }
        UsersCommands::Get { id } => {
            let env: UserEnvelope = client.get(&format!("/users/{}", id)).await?;
            show_user(format, &env.user)?;
        }
        UsersCommands::Create { email, name } => {
            let env: UserEnvelope = client
                .post("/users", &json!({ "email": email, "name": name }))
                .await?;
            if format == OutputFormat::Human {
                println!("✓ Created user {}", env.user.id);
            }
            show_user(format, &env.user)?;
        }
        UsersCommands::Update { id, email, name } => {
            let body = update_body(email, name);
            let env: UserEnvelope = client.put(&format!("/users/{}", id), &body).await?;
            show_user(format, &env.user)?;
        }
        UsersCommands::Delete { id } => {
            let msg: MessageResponse = client.delete(&format!("/users/{}", id)).await?;
            match format {
                OutputFormat::Json => print_json(&msg)?,
                OutputFormat::Human => println!("✓ {}", msg.message),
            }
        }
    }

    Ok(())
}

/// Only send fields that were given, so the server leaves the rest alone.
fn update_body(email: Option<String>, name: Option<String>) -> Value {
    let mut body = Map::new();
    if let Some(email) = email {
        body.insert("email".into(), Value::String(email));
    }
    if let Some(name) = name {
        body.insert("name".into(), Value::String(name));
    }
    Value::Object(body)
}

fn show_user(format: OutputFormat, user: &UserResponse) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(user)?,
        OutputFormat::Human => print_user(user),
    }
    Ok(())
}

fn print_user(user: &UserResponse) {
    println!(
        "┌─ #{} {} <{}>",
        user.id,
        user.name.as_deref().unwrap_or("(no name)"),
        user.email
    );
    if user.posts.is_empty() {
        println!("└─ (no posts)");
        return;
    }
    for (i, post) in user.posts.iter().enumerate() {
        let prefix = if i == user.posts.len() - 1 { "└─" } else { "├─" };
        let status = if post.published { "[published]" } else { "[draft]" };
        println!("{} #{} {} {}", prefix, post.id, status, post.title);
    }
}

fn print_user_list(users: &[UserResponse]) {
    if users.is_empty() {
        println!("(no users)");
        return;
    }
    for user in users {
        print_user(user);
    }
}
