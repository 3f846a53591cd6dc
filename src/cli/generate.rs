use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tabled::Table;

use crate::{
    config, error, info,
    openai::OpenAiClient,
    playlist::PlaylistGenerator,
    spotify::{SpotifyClient, catalog_http_client},
    success,
    types::{GenerateResponse, SongTableRow},
    utils, warning,
};

/// Generates and publishes a playlist from the terminal.
pub async fn generate(prompt: &str, access_token: &str) {
    let oracle = match OpenAiClient::from_env() {
        Ok(oracle) => oracle,
        Err(e) => error!("{}", e),
    };
    let http = match catalog_http_client(config::spotify_timeout()) {
        Ok(http) => http,
        Err(e) => error!("Failed to build HTTP client: {}", e),
    };
    let catalog = SpotifyClient::new(
        http,
        &config::spotify_apiurl(),
        &config::spotify_market(),
        access_token,
    );

    let pb = ProgressBar::new_spinner();
    pb.set_message(format!("Asking {} for songs...", oracle.model()));
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );

    let result = PlaylistGenerator::new(&catalog, &oracle)
        .generate(prompt)
        .await;
    pb.finish_and_clear();

    match result {
        Ok(response) => print_response(response),
        Err(e) => {
            warning!("{}", e);
            info!("Try a more specific prompt or check the access token.");
        }
    }
}

fn print_response(response: GenerateResponse) {
    success!("{}", response.message);

    let rows: Vec<SongTableRow> = response
        .songs
        .into_iter()
        .map(|s| SongTableRow {
            name: s.name,
            artist: s.artist,
            year: s.year.map(|y| y.to_string()).unwrap_or_default(),
            reason: s
                .chatgpt_reason
                .map(|r| utils::preview(&r, 60))
                .unwrap_or_default(),
        })
        .collect();

    println!("{}", Table::new(rows));

    match response.playlist_url {
        Some(url) => success!("Playlist: {}", url),
        None => warning!("Songs were found but the playlist could not be published."),
    }
}
