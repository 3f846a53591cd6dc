use std::{sync::Arc, time::Duration};

use reqwest::Client;
use serde_json::Value;
use thiserror::Error;
use tokio::sync::Mutex;

use crate::{
    config::{self, ConfigError},
    server::start_login_server,
    types::{PkceToken, Token},
    utils, warning,
};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("token exchange failed with status {status}")]
    Rejected {
        status: u16,
        response: String,
        details: Value,
    },
    #[error("token request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Authentication failed or timed out.")]
    TimedOut,
}

/// Parameters of an authorization code exchange.
#[derive(Debug, Clone)]
pub struct CodeExchange<'a> {
    pub client_id: &'a str,
    pub code: &'a str,
    pub redirect_uri: &'a str,
    pub code_verifier: &'a str,
}

/// Exchanges an authorization code for an access token using PKCE.
///
/// Completes the OAuth 2.0 PKCE flow by posting the code, the redirect URI it
/// was issued for and the original code verifier to the token endpoint. The
/// verifier proves that the same client that started the flow is finishing it.
///
/// # Returns
///
/// - `Ok(Token)` - access token, optional refresh token, scope and lifetime
/// - `Err(AuthError::Rejected)` - the token endpoint answered non-2xx; the raw
///   body and its parsed form are kept for the error payload
/// - `Err(AuthError::Transport)` - network failure or undecodable body
///
/// # Security Note
///
/// The authorization code is single-use and expires quickly (typically 10 minutes).
pub async fn exchange_code(
    http: &Client,
    token_url: &str,
    exchange: &CodeExchange<'_>,
) -> Result<Token, AuthError> {
    let res = http
        .post(token_url)
        .form(&[
            ("grant_type", "authorization_code"),
            ("client_id", exchange.client_id),
            ("code", exchange.code),
            ("code_verifier", exchange.code_verifier),
            ("redirect_uri", exchange.redirect_uri),
        ])
        .send()
        .await?;

    let status = res.status();
    if !status.is_success() {
        let response = res.text().await.unwrap_or_default();
        let details =
            serde_json::from_str::<Value>(&response).unwrap_or(Value::String(response.clone()));
        return Err(AuthError::Rejected {
            status: status.as_u16(),
            response,
            details,
        });
    }

    Ok(res.json::<Token>().await?)
}

/// Runs the interactive OAuth 2.0 PKCE login for local use.
///
/// 1. **PKCE Setup**: generates a code verifier and its S256 challenge
/// 2. **Server Start**: launches a temporary server answering `GET /callback`
/// 3. **Browser Launch**: opens the Spotify authorization URL
/// 4. **Callback Handling**: the server exchanges the returned code
/// 5. **Wait**: polls the shared state for the token for up to 60 seconds
///
/// The token is returned to the caller and never written to disk.
///
/// # Errors
///
/// - `AuthError::Config` when `SPOTIFY_CLIENT_ID` is not set
/// - `AuthError::TimedOut` when no token arrived within 60 seconds
pub async fn login(shared_state: Arc<Mutex<Option<PkceToken>>>) -> Result<Token, AuthError> {
    let client_id = config::spotify_client_id()?;

    let code_verifier = utils::generate_code_verifier();
    let code_challenge = utils::generate_code_challenge(&code_verifier);

    // Store verifier in shared state before the server can receive a callback
    {
        let mut lock = shared_state.lock().await;
        *lock = Some(PkceToken {
            code_verifier: code_verifier.clone(),
            token: None,
        });
    }

    let server_state = Arc::clone(&shared_state);
    tokio::spawn(async move {
        start_login_server(server_state).await;
    });

    let auth_url = format!(
        "{spotify_auth_url}?client_id={client_id}&response_type=code&redirect_uri={redirect_uri}&code_challenge={code_challenge}&code_challenge_method=S256&scope={scope}",
        spotify_auth_url = &config::spotify_apiauth_url(),
        client_id = client_id,
        redirect_uri = &config::spotify_redirect_uri(),
        code_challenge = code_challenge,
        scope = &config::spotify_scope().replace(' ', "%20")
    );

    if webbrowser::open(&auth_url).is_err() {
        warning!(
            "Failed to open browser. Please navigate to the following URL manually:\n{}",
            auth_url
        )
    }

    wait_for_token(shared_state).await.ok_or(AuthError::TimedOut)
}

/// Polls the shared state once per second for up to 60 seconds.
async fn wait_for_token(shared_state: Arc<Mutex<Option<PkceToken>>>) -> Option<Token> {
    use std::time::Instant;

    let max_wait = Duration::from_secs(60);
    let start = Instant::now();

    while start.elapsed() < max_wait {
        let lock = shared_state.lock().await;
        if let Some(pkce_token) = lock.as_ref() {
            if let Some(token) = &pkce_token.token {
                return Some(token.clone());
            }
        }
        drop(lock);
        tokio::time::sleep(Duration::from_secs(1)).await;
    }

    None
}
