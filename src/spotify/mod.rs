//! # Spotify Integration Module
//!
//! This module is the integration layer between Playlist Genius and the Spotify
//! Web API. The request pipeline never talks to `reqwest` directly: it goes
//! through the [`Catalog`] trait, implemented here by [`SpotifyClient`] and by
//! in-memory fakes in the tests.
//!
//! ## Architecture
//!
//! ```text
//! Request pipeline (playlist module)
//!          ↓
//! Catalog trait
//!     ├── Search (tracks by free-text query)
//!     ├── User (profile, recently played, top tracks)
//!     └── Playlist (create, add tracks, follow)
//!          ↓
//! HTTP Layer (reqwest, JSON)
//!          ↓
//! Spotify Web API
//! ```
//!
//! ## Core Modules
//!
//! - [`auth`] - OAuth 2.0 authorization code exchange (PKCE) and the local
//!   interactive login flow used by the `auth` command
//! - [`search`] - `GET /search` for tracks
//! - [`user`] - `GET /me`, `GET /me/player/recently-played`, `GET /me/top/tracks`
//! - [`playlist`] - `POST /users/{id}/playlists`, `POST /playlists/{id}/tracks`,
//!   `PUT /playlists/{id}/followers`
//!
//! ## Error Handling
//!
//! Every call is attempted exactly once. Responses are classified into
//! [`CatalogError`]:
//! - **`Unauthorized`** - 401, the access token expired or lacks permission
//! - **`Status`** - any other non-2xx, with the upstream body attached
//! - **`Transport`** - network failures, timeouts and undecodable bodies
//!
//! Callers decide what is fatal. The pipeline treats all of them as a skipped
//! step; only the profile endpoint surfaces them to the user.
//!
//! ## Timeouts
//!
//! The HTTP client handed to [`SpotifyClient::new`] is expected to carry a short
//! timeout (see [`catalog_http_client`]), so a slow Spotify call cannot hold a
//! request for long.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde_json::Value;
use thiserror::Error;

use crate::types::{CatalogTrack, CreatePlaylistRequest, CreatePlaylistResponse, UserProfile};

pub mod auth;
pub mod playlist;
pub mod search;
pub mod user;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Spotify rejected the access token")]
    Unauthorized { details: Value },
    #[error("Spotify returned status {status}")]
    Status { status: u16, details: Value },
    #[error("request to Spotify failed: {0}")]
    Transport(#[from] reqwest::Error),
}

impl CatalogError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, CatalogError::Unauthorized { .. })
    }

    /// Upstream body (parsed JSON when possible) for error payloads.
    pub fn details(&self) -> Value {
        match self {
            CatalogError::Unauthorized { details } | CatalogError::Status { details, .. } => {
                details.clone()
            }
            CatalogError::Transport(e) => Value::String(e.to_string()),
        }
    }
}

/// Everything the request pipeline needs from the music catalog.
#[async_trait]
pub trait Catalog: Send + Sync {
    async fn profile(&self) -> Result<UserProfile, CatalogError>;

    /// Ids of recently played tracks.
    async fn recently_played(&self, limit: u32) -> Result<Vec<String>, CatalogError>;

    /// Ids of short-term top tracks.
    async fn top_tracks(&self, limit: u32) -> Result<Vec<String>, CatalogError>;

    async fn search_tracks(
        &self,
        query: &str,
        limit: u32,
    ) -> Result<Vec<CatalogTrack>, CatalogError>;

    async fn create_playlist(
        &self,
        user_id: &str,
        request: &CreatePlaylistRequest,
    ) -> Result<CreatePlaylistResponse, CatalogError>;

    async fn add_tracks(&self, playlist_id: &str, uris: &[String]) -> Result<(), CatalogError>;

    async fn follow_playlist(&self, playlist_id: &str) -> Result<(), CatalogError>;
}

/// Spotify Web API client bound to one caller's access token.
#[derive(Debug, Clone)]
pub struct SpotifyClient {
    http: Client,
    api_url: String,
    market: String,
    token: String,
}

impl SpotifyClient {
    pub fn new(http: Client, api_url: &str, market: &str, token: &str) -> Self {
        SpotifyClient {
            http,
            api_url: api_url.trim_end_matches('/').to_string(),
            market: market.to_string(),
            token: token.to_string(),
        }
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }
}

/// Builds the HTTP client used for catalog calls.
pub fn catalog_http_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder().timeout(timeout).build()
}

/// Passes 2xx responses through and turns everything else into a [`CatalogError`].
pub(crate) async fn check_status(response: Response) -> Result<Response, CatalogError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();
    let details = serde_json::from_str::<Value>(&text).unwrap_or(Value::String(text));

    if status == StatusCode::UNAUTHORIZED {
        Err(CatalogError::Unauthorized { details })
    } else {
        Err(CatalogError::Status {
            status: status.as_u16(),
            details,
        })
    }
}

#[async_trait]
impl Catalog for SpotifyClient {
    async fn profile(&self) -> Result<UserProfile, CatalogError> {
        self.get_profile().await
    }

    async fn recently_played(&self, limit: u32) -> Result<Vec<String>, CatalogError> {
        self.get_recently_played(limit).await
    }

    async fn top_tracks(&self, limit: u32) -> Result<Vec<String>, CatalogError> {
        self.get_top_tracks(limit).await
    }

    async fn search_tracks(
        &self,
        query: &str,
        limit: u32,
    ) -> Result<Vec<CatalogTrack>, CatalogError> {
        self.search(query, limit).await
    }

    async fn create_playlist(
        &self,
        user_id: &str,
        request: &CreatePlaylistRequest,
    ) -> Result<CreatePlaylistResponse, CatalogError> {
        self.create(user_id, request).await
    }

    async fn add_tracks(&self, playlist_id: &str, uris: &[String]) -> Result<(), CatalogError> {
        self.add(playlist_id, uris).await
    }

    async fn follow_playlist(&self, playlist_id: &str) -> Result<(), CatalogError> {
        self.follow(playlist_id).await
    }
}
