//! jobctl HTTP Client
//!
//! A type-safe HTTP client for a Jenkins-compatible CI server's remote job
//! API. The server owns all job state; this crate only translates lifecycle
//! intents (create, build, stop, delete, stream console output) into HTTP
//! calls and never caches what the server reports.
//!
//! # Example
//!
//! ```no_run
//! use jobctl_client::{Credentials, JenkinsClient, JobApi};
//!
//! # async fn run() -> jobctl_client::Result<()> {
//! let client = JenkinsClient::new(Credentials {
//!     base_url: "http://ci.example.com:8080".to_string(),
//!     username: "admin".to_string(),
//!     password: "secret".to_string(),
//! });
//!
//! if client.job_exists("demo").await? {
//!     println!("status: {}", client.build_status("demo").await?);
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod console;
pub mod credentials;
pub mod error;
mod jobs;
pub mod xml;

// Re-export commonly used types
pub use api::JobApi;
pub use console::{ConsoleChunk, Sleep, TokioSleep, stream_console};
pub use credentials::{CredentialOverrides, Credentials, CredentialsError};
pub use error::{ClientError, Result};

use reqwest::Client;
use serde::de::DeserializeOwned;

/// HTTP client for the remote job API
///
/// Holds one authenticated connection handle for the process lifetime;
/// every request carries basic-auth credentials.
#[derive(Debug, Clone)]
pub struct JenkinsClient {
    /// Base URL of the server (e.g., "http://ci.example.com:8080")
    base_url: String,
    username: String,
    password: String,
    /// HTTP client instance
    client: Client,
}

impl JenkinsClient {
    /// Create a new client from resolved credentials
    pub fn new(credentials: Credentials) -> Self {
        Self::with_client(credentials, Client::new())
    }

    /// Create a new client with a custom HTTP client
    ///
    /// This allows configuring timeouts, proxies, TLS settings, etc.
    pub fn with_client(credentials: Credentials, client: Client) -> Self {
        Self {
            base_url: credentials.base_url.trim_end_matches('/').to_string(),
            username: credentials.username,
            password: credentials.password,
            client,
        }
    }

    /// Get the base URL of the server
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.client
            .get(format!("{}{}", self.base_url, path))
            .basic_auth(&self.username, Some(&self.password))
    }

    fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.client
            .post(format!("{}{}", self.base_url, path))
            .basic_auth(&self.username, Some(&self.password))
    }

    /// Handle an API response and deserialize JSON
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("failed to parse JSON response: {e}")))
    }

    /// Handle an API response whose body we do not care about
    async fn handle_empty_response(&self, response: reqwest::Response) -> Result<()> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        Ok(())
    }
}
