//! # API Module
//!
//! HTTP endpoints of the Playlist Genius backend.
//!
//! ## Endpoints
//!
//! - [`home`] - `GET /`, liveness text
//! - [`health`] - `GET /health`, status and version for monitoring
//! - [`generate_playlist`] - `POST /generate-playlist`, the main operation
//! - [`profile`] - `POST /me`, the caller's Spotify profile
//! - [`callback`] - `POST /callback`, OAuth authorization code exchange
//! - [`login_callback`] - `GET /callback`, only mounted by the local `auth`
//!   command's temporary server
//!
//! ## Error Responses
//!
//! Failures are returned as [`ApiError`], which renders a JSON body with an
//! `error` field and, where upstream information exists, a `details` field.
//! Missing request fields give 400. Upstream failures give 400 (profile) or 500
//! (token exchange). A generation that finds no tracks gives 400 with the
//! regular response shape and `success: false`.
//!
//! ## Shared State
//!
//! Handlers receive an immutable [`AppState`] through an axum `Extension`.
//! Per-request Spotify clients are built from it with the caller's token.

use std::sync::Arc;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use reqwest::Client;
use serde_json::{Value, json};
use thiserror::Error;

use crate::{
    config::{self, ConfigError},
    openai::{OpenAiClient, TextCompletion},
    spotify::{SpotifyClient, catalog_http_client},
};

mod callback;
mod generate;
mod health;
mod login;
mod profile;

pub use callback::callback;
pub use generate::generate_playlist;
pub use health::{health, home};
pub use login::login_callback;
pub use profile::profile;

/// Why the service state could not be built.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Process-wide, read-only dependencies of the handlers.
pub struct AppState {
    pub catalog_http: Client,
    pub auth_http: Client,
    pub oracle: Arc<dyn TextCompletion>,
    pub spotify_api_url: String,
    pub spotify_token_url: String,
    pub spotify_client_id: Option<String>,
    pub market: String,
}

impl AppState {
    /// Builds the state from the environment.
    ///
    /// # Errors
    ///
    /// Fails when `OPENAI_API_KEY` is missing or the HTTP client cannot be built.
    /// A missing `SPOTIFY_CLIENT_ID` only disables `POST /callback`.
    pub fn from_env() -> Result<Self, StartupError> {
        let oracle = OpenAiClient::from_env()?;
        let catalog_http = catalog_http_client(config::spotify_timeout())?;

        Ok(AppState {
            catalog_http,
            auth_http: Client::new(),
            oracle: Arc::new(oracle),
            spotify_api_url: config::spotify_apiurl(),
            spotify_token_url: config::spotify_apitoken_url(),
            spotify_client_id: config::spotify_client_id().ok(),
            market: config::spotify_market(),
        })
    }

    pub fn catalog_for(&self, access_token: &str) -> SpotifyClient {
        SpotifyClient::new(
            self.catalog_http.clone(),
            &self.spotify_api_url,
            &self.market,
            access_token,
        )
    }
}

#[derive(Debug)]
pub enum ApiError {
    /// Required request fields are missing or empty.
    MissingFields {
        message: &'static str,
        received: Option<Value>,
    },
    /// An upstream call failed in a way the caller must see.
    Upstream { status: StatusCode, body: Value },
    /// Anything unexpected; `details` carries the cause.
    Internal { details: String },
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::MissingFields { message, received } => {
                let mut body = json!({ "error": message, "success": false });
                if let Some(received) = received {
                    body["received"] = received;
                }
                (StatusCode::BAD_REQUEST, Json(body)).into_response()
            }
            ApiError::Upstream { status, body } => (status, Json(body)).into_response(),
            ApiError::Internal { details } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Internal server error", "details": details })),
            )
                .into_response(),
        }
    }
}

/// Trims a request field, treating blank as missing.
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
