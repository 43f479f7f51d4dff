//! Credential resolution
//!
//! Credentials are looked up in a fixed order: explicit command-line flags,
//! then an explicitly named credentials file, then the default file in the
//! user's home directory. The chain is an explicit resolver that returns
//! either credentials or the reason none were found, so the caller can print
//! one diagnostic and exit.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default credentials file, relative to the user's home directory
pub const DEFAULT_CREDS_FILE: &str = ".jobctl/login.yml";

/// Port used when the server address has no explicit port
pub const DEFAULT_SERVER_PORT: u16 = 8080;

/// Errors produced while resolving credentials
#[derive(Debug, Error)]
pub enum CredentialsError {
    /// Credentials file could not be read
    #[error("failed to read credentials file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Credentials file is not valid YAML
    #[error("failed to parse credentials file '{path}': {source}")]
    Yaml {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    /// Credentials file parsed but is missing a required field
    #[error("credentials file '{path}' is incomplete: {problem}")]
    Incomplete { path: String, problem: String },

    /// Base64-encoded password could not be decoded
    #[error("base64 password could not be decoded: {0}")]
    BadBase64(String),

    /// No source in the chain produced credentials
    #[error("credentials are not set; pass them as flags or put them in '~/.jobctl/login.yml'")]
    NotFound,
}

/// Resolved credentials for the remote server
#[derive(Debug, Clone)]
pub struct Credentials {
    /// Base URL of the server, e.g. "http://ci.example.com:8080"
    pub base_url: String,
    pub username: String,
    pub password: String,
}

/// Credential fragments gathered from the command line
///
/// Every field is optional; the resolver decides which source wins.
#[derive(Debug, Clone, Default)]
pub struct CredentialOverrides {
    pub username: Option<String>,
    pub password: Option<String>,
    pub password_base64: Option<String>,
    pub server_ip: Option<String>,
    pub server_port: Option<u16>,
    pub creds_file: Option<PathBuf>,
}

/// On-disk shape of a credentials file
#[derive(Debug, Deserialize)]
struct CredsFile {
    server_ip: String,
    server_port: Option<u16>,
    username: String,
    password: Option<String>,
    password_base64: Option<String>,
}

impl Credentials {
    /// Resolve credentials from flags, an explicit file, or the default file
    pub fn resolve(overrides: &CredentialOverrides) -> Result<Self, CredentialsError> {
        let default_file = dirs::home_dir().map(|home| home.join(DEFAULT_CREDS_FILE));
        Self::resolve_with_default(overrides, default_file.as_deref())
    }

    /// Resolve with an injectable default-file location
    ///
    /// Split out from [`Credentials::resolve`] so tests can point the last
    /// step of the chain at a temporary directory.
    pub fn resolve_with_default(
        overrides: &CredentialOverrides,
        default_file: Option<&Path>,
    ) -> Result<Self, CredentialsError> {
        // 1. explicit flags: username + address + some form of password
        if let (Some(username), Some(server_ip)) = (&overrides.username, &overrides.server_ip) {
            if let Some(password) = decode_password(
                overrides.password.clone(),
                overrides.password_base64.as_deref(),
            )? {
                let port = overrides.server_port.unwrap_or(DEFAULT_SERVER_PORT);
                return Ok(Credentials {
                    base_url: format!("http://{server_ip}:{port}"),
                    username: username.clone(),
                    password,
                });
            }
        }

        // 2. explicitly named credentials file
        if let Some(path) = &overrides.creds_file {
            return Self::from_file(path);
        }

        // 3. default credentials file, only if it exists
        if let Some(path) = default_file {
            if path.exists() {
                return Self::from_file(path);
            }
        }

        Err(CredentialsError::NotFound)
    }

    /// Load credentials from a YAML file
    pub fn from_file(path: &Path) -> Result<Self, CredentialsError> {
        let display = path.display().to_string();
        let content = std::fs::read_to_string(path).map_err(|source| CredentialsError::Io {
            path: display.clone(),
            source,
        })?;
        let file: CredsFile =
            serde_yaml::from_str(&content).map_err(|source| CredentialsError::Yaml {
                path: display.clone(),
                source,
            })?;

        let password = decode_password(file.password, file.password_base64.as_deref())?.ok_or(
            CredentialsError::Incomplete {
                path: display,
                problem: "one of 'password' or 'password_base64' must be set".to_string(),
            },
        )?;

        let port = file.server_port.unwrap_or(DEFAULT_SERVER_PORT);
        Ok(Credentials {
            base_url: format!("http://{}:{port}", file.server_ip),
            username: file.username,
            password,
        })
    }
}

/// Pick the plain password, or decode the base64 one if that is all we have
fn decode_password(
    password: Option<String>,
    password_base64: Option<&str>,
) -> Result<Option<String>, CredentialsError> {
    if password.is_some() {
        return Ok(password);
    }
    match password_base64 {
        Some(encoded) => {
            let bytes = BASE64
                .decode(encoded.trim())
                .map_err(|e| CredentialsError::BadBase64(e.to_string()))?;
            let decoded = String::from_utf8(bytes)
                .map_err(|e| CredentialsError::BadBase64(e.to_string()))?;
            Ok(Some(decoded))
        }
        None => Ok(None),
    }
}
