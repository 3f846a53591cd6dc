//! Asking the completion model for songs and reading its answer.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::{
    info,
    openai::TextCompletion,
    types::SongSuggestion,
    utils, warning,
};

use super::era::EraRange;

/// Number of songs requested from the model.
pub const SUGGESTION_COUNT: usize = 20;

/// Genre groups and the keywords that select them.
pub const GENRE_GROUPS: &[(&str, &[&str])] = &[
    ("disco", &["disco"]),
    ("funk", &["funk", "funky"]),
    ("r&b", &["r&b", "rnb", "rhythm and blues", "soul"]),
    ("electronic", &["electronic", "synth", "techno", "edm"]),
    ("dance", &["dance", "club"]),
    ("punk", &["punk"]),
    ("goth", &["goth", "gothic"]),
    ("rock", &["rock"]),
    ("pop", &["pop"]),
    ("jazz", &["jazz"]),
    ("blues", &["blues"]),
    ("reggae", &["reggae"]),
    ("hip hop", &["hip hop", "rap", "hip-hop"]),
];

pub const SYSTEM_PROMPT: &str = "You are a music obsessive with deep knowledge across every genre \
and decade. People come to you for recommendations because you always find the track that fits \
the moment, including the deep cuts nobody else knows. You talk casually and with passion. \
Always respond with valid JSON.";

static FENCE_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```(?:json)?\s*").expect("valid regex"));
static FENCE_CLOSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```\s*$").expect("valid regex"));
static JSON_ARRAY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\[.*\]").expect("valid regex"));

/// Why a model reply could not be read as a song list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseFailure {
    pub reason: String,
    pub preview: String,
}

/// Result of reading a model reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedSuggestions {
    Parsed(Vec<SongSuggestion>),
    Failed(ParseFailure),
}

impl ParsedSuggestions {
    pub fn into_suggestions(self) -> Vec<SongSuggestion> {
        match self {
            ParsedSuggestions::Parsed(s) => s,
            ParsedSuggestions::Failed(_) => Vec::new(),
        }
    }
}

/// Genre groups mentioned in the prompt, in table order.
pub fn detect_genres(prompt: &str) -> Vec<&'static str> {
    let text = prompt.to_lowercase();
    GENRE_GROUPS
        .iter()
        .filter(|(_, keywords)| keywords.iter().any(|k| text.contains(k)))
        .map(|(genre, _)| *genre)
        .collect()
}

/// Builds the user message sent to the model.
pub fn build_prompt(prompt: &str, listened_count: usize, era: Option<EraRange>) -> String {
    let mut sections = vec![format!(
        "Someone just told you what they want to hear: \"{prompt}\"\n\n\
They already have {listened_count} tracks in their recent listening history, so skip the \
obvious picks everyone knows. Find songs that capture the exact vibe they describe but that \
they have probably never heard."
    )];

    if let Some(era) = era {
        sections.push(format!(
            "ABSOLUTELY CRITICAL: ONLY choose songs released between {start} and {end} \
(inclusive). Do NOT suggest anything released outside that range.",
            start = era.start,
            end = era.end
        ));
        sections.push(format!(
            "Every song must come from {start}-{end}. Check each release year twice.",
            start = era.start,
            end = era.end
        ));
    }

    let genres = detect_genres(prompt);
    if genres.len() > 1 {
        sections.push(format!(
            "IMPORTANT: They mentioned {count} genres: {list}. Include roughly equal amounts \
from each genre (about {per} songs per genre).",
            count = genres.len(),
            list = genres.join(", "),
            per = SUGGESTION_COUNT / genres.len()
        ));
    }

    sections.push(format!(
        "Pick songs that actually sound like what they described, are overlooked or \
underrated, and would make them ask who the artist is. B-sides, album tracks, international \
hits and one-hit wonders are all fair game.\n\n\
Give exactly {count} tracks. For each one, say in a sentence why it fits, the way \
you would explain it to a friend.\n\n\
JSON format:\n\
[{{\"title\": \"song name\", \"artist\": \"artist name\", \"year\": release_year, \"reason\": \"why this song fits\"}}]",
        count = SUGGESTION_COUNT
    ));

    sections.join("\n\n")
}

/// Reads a model reply into suggestions.
///
/// Code fences are removed, then the whole body is parsed as a JSON array. If
/// that fails, the span from the first `[` to the last `]` is tried.
pub fn parse_suggestions(content: &str) -> ParsedSuggestions {
    let without_open = FENCE_OPEN.replace_all(content, "");
    let cleaned = FENCE_CLOSE.replace(without_open.trim(), "");
    let cleaned = cleaned.trim();

    if let Ok(Value::Array(entries)) = serde_json::from_str::<Value>(cleaned) {
        return ParsedSuggestions::Parsed(entries.iter().filter_map(suggestion_from).collect());
    }

    let Some(found) = JSON_ARRAY.find(cleaned) else {
        return ParsedSuggestions::Failed(ParseFailure {
            reason: "no JSON array in reply".to_string(),
            preview: utils::preview(cleaned, 500),
        });
    };

    match serde_json::from_str::<Value>(found.as_str()) {
        Ok(Value::Array(entries)) => {
            ParsedSuggestions::Parsed(entries.iter().filter_map(suggestion_from).collect())
        }
        Ok(_) => ParsedSuggestions::Failed(ParseFailure {
            reason: "extracted JSON is not an array".to_string(),
            preview: utils::preview(found.as_str(), 500),
        }),
        Err(e) => ParsedSuggestions::Failed(ParseFailure {
            reason: e.to_string(),
            preview: utils::preview(found.as_str(), 500),
        }),
    }
}

fn suggestion_from(entry: &Value) -> Option<SongSuggestion> {
    let obj = entry.as_object()?;
    let text = |key: &str| {
        obj.get(key)
            .and_then(Value::as_str)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    };

    Some(SongSuggestion {
        title: text("title").or_else(|| text("name")).unwrap_or_default(),
        artist: text("artist").unwrap_or_default(),
        year: obj.get("year").and_then(utils::parse_year_value),
        reason: text("reason"),
    })
}

/// Asks the model for suggestions.
///
/// Never fails: an unreachable model or an unreadable reply both give an empty
/// list, which the caller handles through the broad search fallback.
pub async fn request_suggestions(
    oracle: &dyn TextCompletion,
    prompt: &str,
    listened_count: usize,
    era: Option<EraRange>,
) -> Vec<SongSuggestion> {
    let user_prompt = build_prompt(prompt, listened_count, era);

    let reply = match oracle.complete(SYSTEM_PROMPT, &user_prompt).await {
        Ok(reply) => reply,
        Err(e) => {
            warning!("Error getting song suggestions: {}", e);
            return Vec::new();
        }
    };

    match parse_suggestions(&reply) {
        ParsedSuggestions::Parsed(suggestions) => {
            info!("Parsed {} song suggestions", suggestions.len());
            suggestions
        }
        ParsedSuggestions::Failed(failure) => {
            warning!(
                "Could not read suggestions ({}): {}...",
                failure.reason,
                failure.preview
            );
            Vec::new()
        }
    }
}
