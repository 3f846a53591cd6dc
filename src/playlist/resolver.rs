//! Matching AI suggestions against the Spotify catalog.
//!
//! Every suggestion walks [`SearchStrategy::ORDER`], from the most specific
//! query to the loosest, and stops at the first search whose results contain an
//! acceptable track. Results are ranked by how well their release year fits the
//! requested era or the suggested year.

use std::collections::HashSet;

use crate::{
    info,
    spotify::Catalog,
    success,
    types::{CatalogTrack, ResolvedTrack, SongSuggestion},
    utils, warning,
};

use super::era::EraRange;

pub const SEARCH_LIMIT: u32 = 10;
pub const FALLBACK_SEARCH_LIMIT: u32 = 15;
pub const FALLBACK_TARGET: usize = 10;

/// Years a release may sit outside an explicit era and still be considered.
const ERA_TOLERANCE: i32 = 2;
const STRICT_YEAR_TOLERANCE: i32 = 1;
const LOOSE_YEAR_TOLERANCE: i32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStrategy {
    TitleArtist,
    Artist,
    Title,
    CleanTitleArtist,
}

impl SearchStrategy {
    pub const ORDER: [SearchStrategy; 4] = [
        SearchStrategy::TitleArtist,
        SearchStrategy::Artist,
        SearchStrategy::Title,
        SearchStrategy::CleanTitleArtist,
    ];

    /// Query for this strategy, or `None` when the suggestion lacks a needed field.
    pub fn query(self, suggestion: &SongSuggestion) -> Option<String> {
        let title = Some(suggestion.title.trim()).filter(|t| !t.is_empty());
        let artist = Some(suggestion.artist.trim()).filter(|a| !a.is_empty());

        match self {
            SearchStrategy::TitleArtist => Some(format!("{} {}", title?, artist?)),
            SearchStrategy::Artist => artist.map(str::to_string),
            SearchStrategy::Title => title.map(str::to_string),
            SearchStrategy::CleanTitleArtist => {
                let (title, artist) = (title?, artist?);
                Some(
                    format!("{} {}", utils::clean_title(title), artist)
                        .trim()
                        .to_string(),
                )
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucket {
    Strict,
    Loose,
    Rejected,
}

/// How a chosen track got picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confidence {
    Strict,
    Loose,
    /// Nothing fit the year rules; the first raw hit was taken.
    AnyMatch,
}

/// Sorts one search hit by release-year fit.
///
/// An explicit era takes priority over the suggested year. Without either, only
/// hits lacking a release year are kept.
pub fn classify(
    release_year: Option<i32>,
    suggested_year: Option<i32>,
    era: Option<EraRange>,
) -> Bucket {
    match (era, release_year, suggested_year) {
        (Some(era), Some(year), _) => {
            if era.contains(year) {
                Bucket::Strict
            } else if era.near_boundary(year, ERA_TOLERANCE) {
                Bucket::Loose
            } else {
                Bucket::Rejected
            }
        }
        (Some(_), None, _) => Bucket::Rejected,
        (None, Some(year), Some(suggested)) => match (year - suggested).abs() {
            d if d <= STRICT_YEAR_TOLERANCE => Bucket::Strict,
            d if d <= LOOSE_YEAR_TOLERANCE => Bucket::Loose,
            _ => Bucket::Rejected,
        },
        (None, None, _) => Bucket::Loose,
        (None, Some(_), None) => Bucket::Rejected,
    }
}

/// Picks the best hit: first strict, else first loose, else the first raw hit.
pub fn select<'a>(
    tracks: &'a [CatalogTrack],
    suggested_year: Option<i32>,
    era: Option<EraRange>,
) -> Option<(&'a CatalogTrack, Confidence)> {
    let bucket_of = |t: &CatalogTrack| classify(t.release_year(), suggested_year, era);

    tracks
        .iter()
        .find(|t| bucket_of(*t) == Bucket::Strict)
        .map(|t| (t, Confidence::Strict))
        .or_else(|| {
            tracks
                .iter()
                .find(|t| bucket_of(*t) == Bucket::Loose)
                .map(|t| (t, Confidence::Loose))
        })
        .or_else(|| tracks.first().map(|t| (t, Confidence::AnyMatch)))
}

/// Resolves one suggestion, trying each search strategy in order.
///
/// A rejected token ends the search for this suggestion only. Any other failed
/// search moves on to the next strategy.
pub async fn resolve_suggestion(
    catalog: &dyn Catalog,
    suggestion: &SongSuggestion,
    era: Option<EraRange>,
) -> Option<ResolvedTrack> {
    for strategy in SearchStrategy::ORDER {
        let Some(query) = strategy.query(suggestion) else {
            continue;
        };

        let tracks = match catalog.search_tracks(&query, SEARCH_LIMIT).await {
            Ok(tracks) => tracks,
            Err(e) if e.is_unauthorized() => {
                warning!(
                    "Token expired during search for: {} by {}",
                    suggestion.title,
                    suggestion.artist
                );
                return None;
            }
            Err(e) => {
                warning!("Search for \"{}\" failed: {}", query, e);
                continue;
            }
        };

        if let Some((track, confidence)) = select(&tracks, suggestion.year, era) {
            match confidence {
                Confidence::Strict => {}
                Confidence::Loose => info!(
                    "Using loose match for: {} by {}",
                    suggestion.title, suggestion.artist
                ),
                Confidence::AnyMatch => info!(
                    "Using any match for well-known track: {} by {}",
                    suggestion.title, suggestion.artist
                ),
            }

            return Some(ResolvedTrack {
                track: track.clone(),
                reason: suggestion.reason.clone(),
                suggested_year: suggestion.year,
            });
        }
    }

    None
}

/// Resolves every suggestion in order, dropping the ones without a match.
pub async fn resolve_all(
    catalog: &dyn Catalog,
    suggestions: &[SongSuggestion],
    era: Option<EraRange>,
) -> Vec<ResolvedTrack> {
    let mut resolved = Vec::new();

    for suggestion in suggestions {
        match resolve_suggestion(catalog, suggestion, era).await {
            Some(track) => {
                success!(
                    "Found match for: {} by {}",
                    suggestion.title,
                    suggestion.artist
                );
                resolved.push(track);
            }
            None => warning!(
                "No Spotify match found for: {} by {}",
                suggestion.title,
                suggestion.artist
            ),
        }
    }

    resolved
}

/// Genre terms for the broad search, picked from keywords in the prompt.
pub fn fallback_terms(prompt: &str) -> &'static [&'static str] {
    let text = prompt.to_lowercase();

    if text.contains("goth") || text.contains("dark") {
        &["goth", "darkwave", "post punk"]
    } else if text.contains("electronic") && text.contains("dance") {
        &["electronic", "synth pop", "new wave"]
    } else if text.contains("punk") {
        &["punk", "post punk", "new wave"]
    } else {
        &["alternative", "indie"]
    }
}

/// Suggestion-independent search used when no suggestion resolved.
///
/// Collects up to [`FALLBACK_TARGET`] tracks the user has not listened to.
/// Failed searches are skipped.
pub async fn broad_search(
    catalog: &dyn Catalog,
    prompt: &str,
    listened: &HashSet<String>,
) -> Vec<ResolvedTrack> {
    let mut found = Vec::new();

    for term in fallback_terms(prompt) {
        let query = format!("genre:{}", term);
        let tracks = match catalog.search_tracks(&query, FALLBACK_SEARCH_LIMIT).await {
            Ok(tracks) => tracks,
            Err(e) => {
                warning!("Broad search for \"{}\" failed: {}", query, e);
                continue;
            }
        };

        for track in tracks {
            if listened.contains(&track.id) {
                continue;
            }
            found.push(ResolvedTrack::unannotated(track));
            if found.len() >= FALLBACK_TARGET {
                return found;
            }
        }
    }

    found
}
