#![allow(dead_code)]

use std::{
    collections::{HashMap, HashSet},
    net::SocketAddr,
    sync::Mutex,
};

use async_trait::async_trait;
use axum::{
    Json, Router,
    extract::Query,
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use playlist_genius::{
    openai::{CompletionError, TextCompletion},
    spotify::{Catalog, CatalogError},
    types::{
        CatalogTrack, CreatePlaylistRequest, CreatePlaylistResponse, ExternalUrls, TrackAlbum,
        TrackArtist, UserProfile,
    },
};
use serde_json::{Map, Value, json};

pub fn track(id: &str, name: &str, artist: &str, release_date: Option<&str>) -> CatalogTrack {
    CatalogTrack {
        id: id.to_string(),
        name: name.to_string(),
        artists: vec![TrackArtist {
            name: artist.to_string(),
        }],
        album: Some(TrackAlbum {
            release_date: release_date.map(str::to_string),
        }),
        popularity: Some(42),
        preview_url: None,
        external_urls: ExternalUrls {
            spotify: Some(format!("https://open.spotify.com/track/{}", id)),
        },
    }
}

pub fn profile(id: &str) -> UserProfile {
    let mut extra = Map::new();
    extra.insert("display_name".to_string(), json!("Test User"));
    UserProfile {
        id: id.to_string(),
        extra,
    }
}

fn unauthorized() -> CatalogError {
    CatalogError::Unauthorized {
        details: json!({"error": {"status": 401, "message": "The access token expired"}}),
    }
}

fn server_error() -> CatalogError {
    CatalogError::Status {
        status: 500,
        details: json!({"error": {"status": 500, "message": "Server error"}}),
    }
}

/// In-memory catalog. Searches are answered by exact query string.
#[derive(Default)]
pub struct FakeCatalog {
    pub user_id: Option<String>,
    pub token_expired: bool,
    pub recent: Vec<String>,
    pub top: Vec<String>,
    pub results: HashMap<String, Vec<CatalogTrack>>,
    pub unauthorized_queries: HashSet<String>,
    pub failing_queries: HashSet<String>,
    pub create_fails: bool,
    pub add_fails: bool,

    pub searches: Mutex<Vec<String>>,
    pub created: Mutex<Vec<(String, CreatePlaylistRequest)>>,
    pub added: Mutex<Vec<(String, Vec<String>)>>,
    pub followed: Mutex<Vec<String>>,
    pub recent_calls: Mutex<usize>,
}

impl FakeCatalog {
    pub fn for_user(user_id: &str) -> Self {
        FakeCatalog {
            user_id: Some(user_id.to_string()),
            ..Default::default()
        }
    }

    pub fn with_results(mut self, query: &str, tracks: Vec<CatalogTrack>) -> Self {
        self.results.insert(query.to_string(), tracks);
        self
    }

    pub fn searched(&self) -> Vec<String> {
        self.searches.lock().unwrap().clone()
    }

    pub fn created(&self) -> Vec<(String, CreatePlaylistRequest)> {
        self.created.lock().unwrap().clone()
    }

    pub fn added(&self) -> Vec<(String, Vec<String>)> {
        self.added.lock().unwrap().clone()
    }

    pub fn followed(&self) -> Vec<String> {
        self.followed.lock().unwrap().clone()
    }
}

#[async_trait]
impl Catalog for FakeCatalog {
    async fn profile(&self) -> Result<UserProfile, CatalogError> {
        if self.token_expired {
            return Err(unauthorized());
        }
        match &self.user_id {
            Some(id) => Ok(profile(id)),
            None => Err(server_error()),
        }
    }

    async fn recently_played(&self, _limit: u32) -> Result<Vec<String>, CatalogError> {
        *self.recent_calls.lock().unwrap() += 1;
        Ok(self.recent.clone())
    }

    async fn top_tracks(&self, _limit: u32) -> Result<Vec<String>, CatalogError> {
        if self.token_expired {
            return Err(unauthorized());
        }
        Ok(self.top.clone())
    }

    async fn search_tracks(
        &self,
        query: &str,
        _limit: u32,
    ) -> Result<Vec<CatalogTrack>, CatalogError> {
        self.searches.lock().unwrap().push(query.to_string());

        if self.unauthorized_queries.contains(query) {
            return Err(unauthorized());
        }
        if self.failing_queries.contains(query) {
            return Err(server_error());
        }
        Ok(self.results.get(query).cloned().unwrap_or_default())
    }

    async fn create_playlist(
        &self,
        user_id: &str,
        request: &CreatePlaylistRequest,
    ) -> Result<CreatePlaylistResponse, CatalogError> {
        if self.create_fails {
            return Err(server_error());
        }
        self.created
            .lock()
            .unwrap()
            .push((user_id.to_string(), request.clone()));

        Ok(CreatePlaylistResponse {
            id: "pl1".to_string(),
            name: request.name.clone(),
            external_urls: ExternalUrls {
                spotify: Some("https://open.spotify.com/playlist/pl1".to_string()),
            },
        })
    }

    async fn add_tracks(&self, playlist_id: &str, uris: &[String]) -> Result<(), CatalogError> {
        if self.add_fails {
            return Err(server_error());
        }
        self.added
            .lock()
            .unwrap()
            .push((playlist_id.to_string(), uris.to_vec()));
        Ok(())
    }

    async fn follow_playlist(&self, playlist_id: &str) -> Result<(), CatalogError> {
        self.followed.lock().unwrap().push(playlist_id.to_string());
        Ok(())
    }
}

/// Completion model returning a canned reply and recording what it was asked.
pub struct FakeOracle {
    pub reply: Option<String>,
    pub prompts: Mutex<Vec<String>>,
}

impl FakeOracle {
    pub fn replying(reply: &str) -> Self {
        FakeOracle {
            reply: Some(reply.to_string()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        FakeOracle {
            reply: None,
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.prompts.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl TextCompletion for FakeOracle {
    async fn complete(&self, _system: &str, user: &str) -> Result<String, CompletionError> {
        self.prompts.lock().unwrap().push(user.to_string());
        self.reply.clone().ok_or(CompletionError::EmptyReply)
    }
}

/// Serves `app` on an ephemeral local port and returns its address.
pub async fn serve_local(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind local port");
    let addr = listener.local_addr().expect("local address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("stub server");
    });
    addr
}

/// Minimal stand-in for the Spotify Web API and token endpoint.
///
/// `GET /v1/search` answers by query: `expired` gives 401, `broken` a JSON 500,
/// `gateway` a plain-text 502, anything else two tracks around a `null` item.
/// `GET /v1/me` rejects the token `expired`. `POST /api/token` always rejects.
pub fn spotify_stub() -> Router {
    Router::new()
        .route("/v1/search", get(stub_search))
        .route("/v1/me", get(stub_me))
        .route("/api/token", post(stub_token))
}

async fn stub_search(Query(params): Query<HashMap<String, String>>) -> Response {
    match params.get("q").map(String::as_str) {
        Some("expired") => (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": {"status": 401, "message": "The access token expired"}})),
        )
            .into_response(),
        Some("broken") => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": {"status": 500, "message": "boom"}})),
        )
            .into_response(),
        Some("gateway") => (StatusCode::BAD_GATEWAY, "Bad Gateway").into_response(),
        _ => Json(json!({
            "tracks": {
                "items": [
                    {
                        "id": "t1",
                        "name": "Let It Whip",
                        "artists": [{"name": "Dazz Band"}],
                        "album": {"release_date": "1982-03-01"},
                        "popularity": 51,
                        "external_urls": {"spotify": "https://open.spotify.com/track/t1"}
                    },
                    null,
                    {
                        "id": "t2",
                        "name": "Placeholder Date",
                        "artists": [{"name": "Somebody"}],
                        "album": {"release_date": "0000"}
                    }
                ]
            }
        }))
        .into_response(),
    }
}

async fn stub_me(headers: HeaderMap) -> Response {
    let auth = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    if auth == "Bearer expired" {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": {"status": 401, "message": "The access token expired"}})),
        )
            .into_response();
    }

    let profile: Value = json!({
        "id": "listener",
        "display_name": null,
        "country": "DE",
        "product": "premium"
    });
    Json(profile).into_response()
}

async fn stub_token() -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({"error": "invalid_grant", "error_description": "Invalid authorization code"})),
    )
        .into_response()
}
