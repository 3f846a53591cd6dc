use std::sync::Arc;

use axum::{
    Extension, Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{info, playlist::PlaylistGenerator, types::GenerateRequest};

use super::{ApiError, AppState, non_empty};

/// `POST /generate-playlist`
///
/// Expects `{prompt, access_token}`. Answers 200 with the generated songs, 400
/// when a field is missing or when no track could be found at all.
pub async fn generate_playlist(
    Extension(state): Extension<Arc<AppState>>,
    Json(request): Json<GenerateRequest>,
) -> Response {
    let (Some(prompt), Some(access_token)) =
        (non_empty(request.prompt), non_empty(request.access_token))
    else {
        return ApiError::MissingFields {
            message: "Missing prompt or access token",
            received: None,
        }
        .into_response();
    };

    info!("Generating playlist for prompt: {}", prompt);

    let catalog = state.catalog_for(&access_token);
    let generator = PlaylistGenerator::new(&catalog, state.oracle.as_ref());

    match generator.generate(&prompt).await {
        Ok(response) => Json(response).into_response(),
        Err(no_tracks) => (StatusCode::BAD_REQUEST, Json(no_tracks.into_payload())).into_response(),
    }
}
