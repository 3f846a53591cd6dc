//! Configuration management for Playlist Genius.
//!
//! This module handles loading and accessing configuration values from environment
//! variables and `.env` files. Endpoint URLs and tuning values fall back to sane
//! defaults; secrets such as the OpenAI API key have no default and are reported
//! through [`ConfigError`] when missing.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. `.env` file in the working directory
//! 4. Application defaults (where applicable)

use std::{env, path::PathBuf, time::Duration};

use thiserror::Error;

use crate::Res;

/// Raised when a required configuration value is absent.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
}

/// Loads environment variables from `.env` files.
///
/// Creates the local data directory if it doesn't exist and loads variables from
/// `playlist-genius/.env` inside it, then from a `.env` in the working directory.
/// Both files are optional; variables already present in the environment are
/// never overwritten.
///
/// # Directory Structure
///
/// - Linux: `~/.local/share/playlist-genius/.env`
/// - macOS: `~/Library/Application Support/playlist-genius/.env`
/// - Windows: `%LOCALAPPDATA%/playlist-genius/.env`
///
/// # Errors
///
/// Returns an error if the data directory cannot be created.
pub async fn load_env() -> Res<()> {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("playlist-genius/.env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent).await?;
    }

    dotenv::from_path(&path).ok();
    dotenv::dotenv().ok();
    Ok(())
}

fn var_or(key: &str, default: &str) -> String {
    env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn required(key: &'static str) -> Result<String, ConfigError> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or(ConfigError::Missing(key))
}

/// Address the HTTP server binds to, e.g. `127.0.0.1:5000`.
pub fn server_addr() -> String {
    var_or("SERVER_ADDRESS", "127.0.0.1:5000")
}

/// Returns the Spotify Web API base URL.
///
/// # Example
///
/// ```
/// let api_url = spotify_apiurl(); // e.g., "https://api.spotify.com/v1"
/// ```
pub fn spotify_apiurl() -> String {
    var_or("SPOTIFY_API_URL", "https://api.spotify.com/v1")
}

/// Returns the Spotify OAuth authorization URL used by the `auth` command.
pub fn spotify_apiauth_url() -> String {
    var_or("SPOTIFY_API_AUTH_URL", "https://accounts.spotify.com/authorize")
}

/// Returns the Spotify OAuth token exchange URL.
///
/// # Example
///
/// ```
/// let token_url = spotify_apitoken_url(); // e.g., "https://accounts.spotify.com/api/token"
/// ```
pub fn spotify_apitoken_url() -> String {
    var_or(
        "SPOTIFY_API_TOKEN_URL",
        "https://accounts.spotify.com/api/token",
    )
}

/// Returns the Spotify application client ID.
///
/// # Errors
///
/// Returns [`ConfigError::Missing`] if `SPOTIFY_CLIENT_ID` is not set.
pub fn spotify_client_id() -> Result<String, ConfigError> {
    required("SPOTIFY_CLIENT_ID")
}

/// Redirect URI registered for the local `auth` login flow.
pub fn spotify_redirect_uri() -> String {
    var_or(
        "SPOTIFY_API_REDIRECT_URI",
        "http://127.0.0.1:5000/callback",
    )
}

/// Scopes requested by the local `auth` login flow.
pub fn spotify_scope() -> String {
    var_or(
        "SPOTIFY_API_AUTH_SCOPE",
        "user-read-private user-read-recently-played user-top-read playlist-modify-public",
    )
}

/// Market passed to catalog searches.
pub fn spotify_market() -> String {
    var_or("SPOTIFY_MARKET", "US")
}

/// Timeout applied to every Spotify catalog call.
///
/// Reads `SPOTIFY_TIMEOUT_SECS`; unparsable values fall back to 3 seconds.
pub fn spotify_timeout() -> Duration {
    let secs = env::var("SPOTIFY_TIMEOUT_SECS")
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(3);
    Duration::from_secs(secs)
}

/// Returns the API key for the chat completion service.
///
/// # Errors
///
/// Returns [`ConfigError::Missing`] if `OPENAI_API_KEY` is not set.
///
/// # Security Note
///
/// The key should never be exposed in logs or version control.
pub fn openai_api_key() -> Result<String, ConfigError> {
    required("OPENAI_API_KEY")
}

/// Base URL of the OpenAI-compatible chat completion API.
pub fn openai_apiurl() -> String {
    var_or("OPENAI_API_URL", "https://api.openai.com/v1")
}

/// Model used for song suggestions.
pub fn openai_model() -> String {
    var_or("OPENAI_MODEL", "gpt-4o-mini")
}
