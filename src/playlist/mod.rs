//! # Playlist Generation Module
//!
//! The request pipeline behind `POST /generate-playlist` and the `generate`
//! command. One call to [`PlaylistGenerator::generate`] runs these steps, each
//! awaited before the next starts:
//!
//! ```text
//! listening history (best effort)
//!          ↓
//! era::parse_era_range            prompt → optional year range
//!          ↓
//! suggestions::request_suggestions  model → ordered song suggestions
//!          ↓
//! resolver::resolve_all           suggestions → catalog tracks
//!          ↓ (nothing resolved)
//! resolver::broad_search          genre terms → catalog tracks
//!          ↓
//! assembler::assemble / publish   tracks → songs + playlist
//! ```
//!
//! Nothing is kept between calls. Both upstream services are reached through
//! the trait objects handed to [`PlaylistGenerator::new`].

use std::collections::HashSet;

use thiserror::Error;

use crate::{
    info,
    openai::TextCompletion,
    spotify::Catalog,
    types::GenerateResponse,
    warning,
};

pub mod assembler;
pub mod era;
pub mod resolver;
pub mod suggestions;

pub use era::EraRange;

/// Page size used for both listening history endpoints.
const HISTORY_LIMIT: u32 = 50;

/// Neither the suggestions nor the broad search produced a single track.
#[derive(Debug, Clone, Error)]
#[error("No tracks found for ChatGPT suggestions")]
pub struct NoTracksFound {
    pub prompt: String,
}

impl NoTracksFound {
    /// Structured failure payload returned to HTTP callers.
    pub fn into_payload(self) -> GenerateResponse {
        let message = self.to_string();
        GenerateResponse {
            success: false,
            error: Some(message.clone()),
            message,
            prompt: self.prompt,
            songs: Vec::new(),
            playlist_id: None,
            playlist_url: None,
            used_chatgpt: false,
        }
    }
}

pub struct PlaylistGenerator<'a> {
    catalog: &'a dyn Catalog,
    oracle: &'a dyn TextCompletion,
}

impl<'a> PlaylistGenerator<'a> {
    pub fn new(catalog: &'a dyn Catalog, oracle: &'a dyn TextCompletion) -> Self {
        PlaylistGenerator { catalog, oracle }
    }

    /// Runs the whole pipeline for one prompt.
    ///
    /// # Returns
    ///
    /// - `Ok(GenerateResponse)` - songs found; `playlist_id` is `None` when the
    ///   playlist could not be created
    /// - `Err(NoTracksFound)` - nothing matched, not even the broad search
    pub async fn generate(&self, prompt: &str) -> Result<GenerateResponse, NoTracksFound> {
        let listened = self.listened_tracks().await;

        let era = era::parse_era_range(prompt);
        match era {
            Some(era) => info!("Detected era {}-{}", era.start, era.end),
            None => info!("No era detected in prompt"),
        }

        let suggestions =
            suggestions::request_suggestions(self.oracle, prompt, listened.len(), era).await;
        info!("Got {} song suggestions", suggestions.len());

        let mut tracks = resolver::resolve_all(self.catalog, &suggestions, era).await;
        let used_chatgpt = !tracks.is_empty();

        if tracks.is_empty() {
            info!("No matches found for suggestions, trying broader search...");
            tracks = resolver::broad_search(self.catalog, prompt, &listened).await;
        }

        if tracks.is_empty() {
            warning!("No tracks found for prompt: {}", prompt);
            return Err(NoTracksFound {
                prompt: prompt.to_string(),
            });
        }

        let songs = assembler::assemble(&tracks, &listened);
        info!("Found {} unique tracks user hasn't heard", songs.len());

        let playlist = assembler::publish(self.catalog, prompt, &songs).await;
        let message = if used_chatgpt {
            format!("Found {} songs from ChatGPT suggestions", songs.len())
        } else {
            format!("Found {} songs from a broader genre search", songs.len())
        };

        Ok(GenerateResponse {
            success: true,
            error: None,
            message,
            prompt: prompt.to_string(),
            songs,
            playlist_id: playlist.as_ref().map(|p| p.id.clone()),
            playlist_url: playlist.map(|p| p.url),
            used_chatgpt,
        })
    }

    /// Track ids the user played recently or plays most.
    ///
    /// Best effort: recently played is only asked for when the profile probe
    /// accepts the token; top tracks are always tried. Failures leave the set
    /// as it is.
    pub async fn listened_tracks(&self) -> HashSet<String> {
        let mut listened = HashSet::new();

        match self.catalog.profile().await {
            Ok(_) => match self.catalog.recently_played(HISTORY_LIMIT).await {
                Ok(ids) => {
                    listened.extend(ids);
                    info!("Found {} recently played tracks", listened.len());
                }
                Err(e) => warning!("Failed to get recently played: {}", e),
            },
            Err(e) if e.is_unauthorized() => {
                warning!("Access token expired, skipping user listening history")
            }
            Err(e) => warning!("Error testing token: {}", e),
        }

        match self.catalog.top_tracks(HISTORY_LIMIT).await {
            Ok(ids) => {
                listened.extend(ids);
                info!("Found {} total listened tracks", listened.len());
            }
            Err(e) => warning!("Failed to get top tracks: {}", e),
        }

        listened
    }
}
