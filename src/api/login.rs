use std::{collections::HashMap, sync::Arc};

use axum::{Extension, extract::Query, response::Html};
use reqwest::Client;
use tokio::sync::Mutex;

use crate::{
    config,
    spotify::auth::{CodeExchange, exchange_code},
    types::PkceToken,
    warning,
};

/// `GET /callback` of the local login server.
///
/// Spotify redirects the browser here after the user approved access. The code
/// is exchanged with the verifier kept in the shared state, and the token is
/// stored there for the waiting `auth` command.
pub async fn login_callback(
    Query(params): Query<HashMap<String, String>>,
    Extension(shared_state): Extension<Arc<Mutex<Option<PkceToken>>>>,
) -> Html<&'static str> {
    let Some(code) = params.get("code") else {
        return Html("<h4>Missing authorization code.</h4>");
    };

    let mut state = shared_state.lock().await;
    let Some(pkce_state) = state.as_mut() else {
        return Html("<h4>Missing PKCE code verifier.</h4>");
    };

    let client_id = match config::spotify_client_id() {
        Ok(id) => id,
        Err(e) => {
            warning!("{}", e);
            return Html("<h4>Login failed.</h4>");
        }
    };
    let redirect_uri = config::spotify_redirect_uri();

    let exchange = CodeExchange {
        client_id: &client_id,
        code,
        redirect_uri: &redirect_uri,
        code_verifier: &pkce_state.code_verifier,
    };

    match exchange_code(&Client::new(), &config::spotify_apitoken_url(), &exchange).await {
        Ok(token) => {
            pkce_state.token = Some(token);
            Html("<h2>Authentication successful.</h2><p>Close browser window.</p>")
        }
        Err(e) => {
            warning!("Token exchange failed: {}", e);
            Html("<h4>Login failed.</h4>")
        }
    }
}
