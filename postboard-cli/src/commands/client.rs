//! Shared HTTP client plumbing for the `users` and `posts` commands

use anyhow::{anyhow, Context, Result};
use clap::{Args, ValueEnum};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;

use postboard_server::http::ErrorBody;

/// Default API endpoint, matching `serve`'s default bind address
pub const DEFAULT_ENDPOINT: &str = "http://localhost:8787";

/// Connection and output flags shared by every client command
#[derive(Args, Debug, Clone)]
pub struct ClientArgs {
    /// postboard API endpoint
    #[arg(long, env = "POSTBOARD_ENDPOINT", default_value = DEFAULT_ENDPOINT, global = true)]
    pub endpoint: String,

    /// Output format
    #[arg(long, short, value_enum, default_value = "human", global = true)]
    pub output: OutputFormat,

    /// Shorthand for --output json
    #[arg(long, global = true)]
    pub json: bool,
}

impl ClientArgs {
    pub fn format(&self) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else {
            self.output
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    #[default]
    Human,
    /// JSON output (for piping to jq)
    Json,
}

/// Thin wrapper over reqwest that knows the API's error envelope
pub struct ApiClient {
    http: Client,
    endpoint: String,
}

impl ApiClient {
    pub fn new(endpoint: &str) -> Result<Self> {
        let http = Client::builder()
            .user_agent(concat!("postboard/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            endpoint: endpoint.trim_end_matches('/').to_string(),
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.endpoint, path)
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.send(self.http.get(self.url(path))).await
    }

    pub async fn post<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T> {
        self.send(self.http.post(self.url(path)).json(body)).await
    }

    pub async fn put<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T> {
        self.send(self.http.put(self.url(path)).json(body)).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.send(self.http.delete(self.url(path))).await
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = request
            .send()
            .await
            .with_context(|| format!("Failed to connect to postboard API at {}", self.endpoint))?;

        let status = response.status();
        if status.is_success() {
            return response.json::<T>().await.context("Failed to parse response");
        }

        let text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        Err(describe_error(status, &text))
    }
}

/// Turn a failure body into an error, preferring the API's `{error, details}` shape.
fn describe_error(status: reqwest::StatusCode, text: &str) -> anyhow::Error {
    match serde_json::from_str::<ErrorBody>(text) {
        Ok(ErrorBody {
            error,
            details: Some(details),
        }) => anyhow!("{}: {} ({})", status, error, details),
        Ok(ErrorBody { error, .. }) => anyhow!("{}: {}", status, error),
        Err(_) => anyhow!("{}: {}", status, text),
    }
}

/// Print a payload as pretty JSON.
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn url_joins_without_double_slash() {
        let client = ApiClient::new("http://localhost:8787/").unwrap();
        assert_eq!(client.url("/users/1"), "http://localhost:8787/users/1");
    }

    #[test]
    fn error_envelope_is_unwrapped() {
        let err = describe_error(StatusCode::CONFLICT, r#"{"error":"Email already exists"}"#);
        assert_eq!(err.to_string(), "409 Conflict: Email already exists");
    }

    #[test]
    fn error_details_are_appended() {
        let err = describe_error(
            StatusCode::BAD_REQUEST,
            r#"{"error":"Invalid JSON body","details":"EOF"}"#,
        );
        assert_eq!(err.to_string(), "400 Bad Request: Invalid JSON body (EOF)");
    }

    #[test]
    fn non_json_error_is_passed_through() {
        let err = describe_error(StatusCode::BAD_GATEWAY, "upstream down");
        assert_eq!(err.to_string(), "502 Bad Gateway: upstream down");
    }
}
