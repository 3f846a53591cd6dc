use std::sync::Arc;

use axum::{Extension, Json, http::StatusCode};
use serde_json::json;

use crate::{
    spotify::CatalogError,
    types::{ProfileRequest, UserProfile},
    warning,
};

use super::{ApiError, AppState, non_empty};

/// `POST /me`
///
/// Returns the caller's Spotify profile unchanged. A rejected token or any other
/// Spotify error gives 400 with the upstream body under `details`.
pub async fn profile(
    Extension(state): Extension<Arc<AppState>>,
    Json(request): Json<ProfileRequest>,
) -> Result<Json<UserProfile>, ApiError> {
    let Some(access_token) = non_empty(request.access_token) else {
        return Err(ApiError::MissingFields {
            message: "Missing access token",
            received: None,
        });
    };

    let catalog = state.catalog_for(&access_token);
    match catalog.get_profile().await {
        Ok(profile) => Ok(Json(profile)),
        Err(CatalogError::Transport(e)) => {
            warning!("Error in me: {}", e);
            Err(ApiError::Internal {
                details: e.to_string(),
            })
        }
        Err(e) => {
            warning!("Failed to fetch user profile: {}", e);
            Err(ApiError::Upstream {
                status: StatusCode::BAD_REQUEST,
                body: json!({
                    "error": "Failed to fetch user profile",
                    "details": e.details(),
                }),
            })
        }
    }
}
