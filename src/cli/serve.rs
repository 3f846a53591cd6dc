use std::sync::Arc;

use crate::{api::AppState, config, error, info, server, warning};

pub async fn serve() {
    let state = match AppState::from_env() {
        Ok(state) => state,
        Err(e) => error!("Cannot start server. Err: {}", e),
    };

    if state.spotify_client_id.is_none() {
        warning!("SPOTIFY_CLIENT_ID is not set, POST /callback will answer with 500");
    }

    info!(
        "Starting Playlist Genius on {} (market {})",
        config::server_addr(),
        state.market
    );

    server::start_api_server(Arc::new(state)).await;
}
