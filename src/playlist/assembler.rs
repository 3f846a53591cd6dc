//! Turning resolved tracks into the song list and the published playlist.

use std::collections::HashSet;

use crate::{
    info,
    spotify::Catalog,
    success,
    types::{CreatePlaylistRequest, ResolvedTrack, Song},
    utils, warning,
};

pub const MAX_SONGS: usize = 15;
pub const PLAYLIST_NAME_PREFIX: &str = "Playlist Genius: ";
pub const MAX_PLAYLIST_NAME: usize = 100;

/// A playlist created for the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedPlaylist {
    pub id: String,
    pub url: String,
}

/// Deduplicates, drops listened tracks, keeps first-appearance order and caps
/// the list at [`MAX_SONGS`].
///
/// When the same track was matched by several suggestions, the first
/// suggestion's reason is kept.
pub fn assemble(tracks: &[ResolvedTrack], listened: &HashSet<String>) -> Vec<Song> {
    let mut seen = HashSet::new();

    tracks
        .iter()
        .filter(|rt| !listened.contains(&rt.track.id))
        .filter(|rt| seen.insert(rt.track.id.clone()))
        .take(MAX_SONGS)
        .map(to_song)
        .collect()
}

fn to_song(resolved: &ResolvedTrack) -> Song {
    let track = &resolved.track;
    Song {
        name: track.name.clone(),
        artist: track.artist_names(),
        spotify_id: track.id.clone(),
        preview_url: track.preview_url.clone(),
        external_url: track.external_urls.spotify.clone(),
        popularity: track.popularity.unwrap_or(0),
        year: track.release_year().or(resolved.suggested_year),
        chatgpt_reason: resolved.reason.clone(),
    }
}

/// `"Playlist Genius: {prompt}"`, cut to 100 characters with a trailing "...".
pub fn playlist_name(prompt: &str) -> String {
    let name = format!("{}{}", PLAYLIST_NAME_PREFIX, prompt.trim());
    utils::truncate_with_ellipsis(&name, MAX_PLAYLIST_NAME)
}

pub fn playlist_description(prompt: &str) -> String {
    format!("Generated by Playlist Genius based on: {}", prompt)
        .replace(['\r', '\n'], " ")
        .trim()
        .to_string()
}

/// Creates a public playlist for the caller, fills it and follows it.
///
/// Best effort: a missing profile or a failed creation gives `None`. Failing to
/// add tracks or to follow is logged but the playlist is still returned, since
/// it exists at that point.
pub async fn publish(
    catalog: &dyn Catalog,
    prompt: &str,
    songs: &[Song],
) -> Option<PublishedPlaylist> {
    let user_id = match catalog.profile().await {
        Ok(profile) => profile.id,
        Err(e) => {
            warning!("Failed to get user profile, skipping playlist creation: {}", e);
            return None;
        }
    };

    let request = CreatePlaylistRequest {
        name: playlist_name(prompt),
        description: playlist_description(prompt),
        public: true,
    };

    info!("Creating playlist \"{}\"", request.name);
    let created = match catalog.create_playlist(&user_id, &request).await {
        Ok(created) => created,
        Err(e) => {
            warning!("Failed to create playlist: {} {}", e, e.details());
            return None;
        }
    };
    success!("Playlist created with ID: {}", created.id);

    if !songs.is_empty() {
        let uris: Vec<String> = songs.iter().map(|s| utils::track_uri(&s.spotify_id)).collect();
        if let Err(e) = catalog.add_tracks(&created.id, &uris).await {
            warning!("Error adding tracks to playlist: {} {}", e, e.details());
        }

        if let Err(e) = catalog.follow_playlist(&created.id).await {
            warning!("Error following playlist: {} {}", e, e.details());
        }
    }

    let url = created
        .external_urls
        .spotify
        .clone()
        .unwrap_or_else(|| utils::playlist_url(&created.id));

    Some(PublishedPlaylist {
        id: created.id,
        url,
    })
}
