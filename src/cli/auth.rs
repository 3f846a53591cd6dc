use std::sync::Arc;

use tokio::sync::Mutex;

use crate::{error, info, spotify, success, types::PkceToken};

/// Runs the browser login and prints the access token.
///
/// The token is not stored. Pass it to `generate --token` or to the HTTP API.
pub async fn auth(shared_state: Arc<Mutex<Option<PkceToken>>>) {
    info!("Waiting for Spotify authorization in the browser...");

    match spotify::auth::login(shared_state).await {
        Ok(token) => {
            success!("Authentication successful.");
            println!("{}", token.access_token);
            if let Some(refresh) = token.refresh_token {
                info!("Refresh token: {}", refresh);
            }
            info!("Token expires in {} seconds", token.expires_in);
        }
        Err(e) => error!("{}", e),
    }
}
