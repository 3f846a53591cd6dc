use std::sync::Arc;

use axum::{Extension, Json, http::StatusCode};
use serde_json::{Value, json};

use crate::{
    info,
    spotify::auth::{AuthError, CodeExchange, exchange_code},
    types::{CallbackRequest, Token},
    warning,
};

use super::{ApiError, AppState, non_empty};

/// `POST /callback`
///
/// Exchanges `{code, redirect_uri, code_verifier}` for Spotify tokens on behalf
/// of a browser client running the PKCE flow. All three fields are required.
pub async fn callback(
    Extension(state): Extension<Arc<AppState>>,
    Json(body): Json<Value>,
) -> Result<Json<Token>, ApiError> {
    let request: CallbackRequest = serde_json::from_value(body.clone()).unwrap_or_default();

    let (Some(code), Some(redirect_uri), Some(code_verifier)) = (
        non_empty(request.code),
        non_empty(request.redirect_uri),
        non_empty(request.code_verifier),
    ) else {
        warning!("Callback is missing required fields");
        return Err(ApiError::MissingFields {
            message: "Missing required fields",
            received: Some(body),
        });
    };

    let Some(client_id) = state.spotify_client_id.as_deref() else {
        return Err(ApiError::Internal {
            details: "SPOTIFY_CLIENT_ID must be set".to_string(),
        });
    };

    let exchange = CodeExchange {
        client_id,
        code: &code,
        redirect_uri: &redirect_uri,
        code_verifier: &code_verifier,
    };

    match exchange_code(&state.auth_http, &state.spotify_token_url, &exchange).await {
        Ok(token) => {
            info!("Token exchange succeeded");
            Ok(Json(token))
        }
        Err(AuthError::Rejected {
            status,
            response,
            details,
        }) => {
            warning!("Token exchange failed with status {}: {}", status, response);
            Err(ApiError::Upstream {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                body: json!({
                    "error": "Token exchange failed",
                    "status": status,
                    "response": response,
                    "details": details,
                }),
            })
        }
        Err(e) => {
            warning!("Error in callback: {}", e);
            Err(ApiError::Internal {
                details: e.to_string(),
            })
        }
    }
}
