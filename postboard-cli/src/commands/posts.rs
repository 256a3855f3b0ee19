//! Post commands - talk to a running postboard server
//!
//! ```bash
//! postboard posts create --title "Hello" --author-id 1 --published
//! postboard posts update 3 --published true
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use serde_json::{Map, Value};

use postboard_server::http::routes::common::MessageResponse;
use postboard_server::http::routes::posts::{PostEnvelope, PostResponse, PostsEnvelope};

use super::client::{print_json, ApiClient, ClientArgs, OutputFormat};

#[derive(Parser, Debug)]
pub struct PostsArgs {
    #[command(flatten)]
    pub client: ClientArgs,

    #[command(subcommand)]
    pub command: PostsCommands,
}

#[derive(Subcommand, Debug)]
pub enum PostsCommands {
    /// List posts with their authors
    List,
    /// Show one post
    Get {
        id: i32,
    },
    /// Create a post
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        content: Option<String>,
        /// Publish immediately (posts are drafts otherwise)
        #[arg(long)]
        published: bool,
        #[arg(long)]
        author_id: Option<i32>,
    },
    /// Change a post's title, content and/or published flag
    Update {
        id: i32,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        content: Option<String>,
        #[arg(long)]
        published: Option<bool>,
    },
    /// Delete a post
    Delete {
        id: i32,
    },
}

pub async fn run_posts(args: PostsArgs) -> Result<()> {
    let client = ApiClient::new(&args.client.endpoint)?;
    let format = args.client.format();

    match args.command {
        PostsCommands::List => {
            let list: PostsEnvelope = client.get("/posts").await?;
            match format {
                OutputFormat::Json => print_json(&list.posts)?,
                OutputFormat::Human => print_post_list(&list.posts),
            }
        }
        PostsCommands::Get { id } => {
            let env: PostEnvelope = client.get(&format!("/posts/{}", id)).await?;
            show_post(format, &env.post)?;
        }
        PostsCommands::Create {
            title,
            content,
            published,
            author_id,
        } => {
            let mut body = Map::new();
            body.insert("title".into(), Value::String(title));
            body.insert("published".into(), Value::Bool(published));
            if let Some(content) = content {
                body.insert("content".into(), Value::String(content));
            }
            if let Some(author_id) = author_id {
                body.insert("authorId".into(), Value::from(author_id));
            }

            let env: PostEnvelope = client.post("/posts", &Value::Object(body)).await?;
            if format == OutputFormat::Human {
                println!("✓ Created post {}", env.post.id);
            }
            show_post(format, &env.post)?;
        }
        PostsCommands::Update {
            id,
            title,
            content,
            published,
        } => {
            let body = update_body(title, content, published);
            let env: PostEnvelope = client.put(&format!("/posts/{}", id), &body).await?;
            show_post(format, &env.post)?;
        }
        PostsCommands::Delete { id } => {
            let msg: MessageResponse = client.delete(&format!("/posts/{}", id)).await?;
            match format {
                OutputFormat::Json => print_json(&msg)?,
                OutputFormat::Human => println!("✓ {}", msg.message),
            }
        }
    }

    Ok(())
}

fn update_body(title: Option<String>, content: Option<String>, published: Option<bool>) -> Value {
    let mut body = Map::new();
    if let Some(title) = title {
        body.insert("title".into(), Value::String(title));
    }
    if let Some(content) = content {
        body.insert("content".into(), Value::String(content));
    }
    if let Some(published) = published {
        body.insert("published".into(), Value::Bool(published));
    }
    Value::Object(body)
}

fn show_post(format: OutputFormat, post: &PostResponse) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(post)?,
        OutputFormat::Human => print_post(post),
    }
    Ok(())
}

fn print_post(post: &PostResponse) {
    let status = if post.published { "[published]" } else { "[draft]" };
    println!("┌─ #{} {} {}", post.id, status, post.title);
    match &post.author {
        Some(author) => println!(
            "│  by {} <{}>",
            author.name.as_deref().unwrap_or("(no name)"),
            author.email
        ),
        None => println!("│  (no author)"),
    }
    match &post.content {
        Some(content) => println!("└─ {}", content),
        None => println!("└─ (no content)"),
    }
}

fn print_post_list(posts: &[PostResponse]) {
    if posts.is_empty() {
        println!("(no posts)");
        return;
    }
    for post in posts {
        print_post(post);
    }
}
