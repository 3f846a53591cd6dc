use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::{Rng, distr::Alphanumeric};
use serde_json::Value;
use sha2::{Digest, Sha256};

pub fn generate_code_verifier() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(128)
        .map(char::from)
        .collect()
}

pub fn generate_code_challenge(verifier: &str) -> String {
    let hash = Sha256::digest(verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(hash)
}

/// Reads a year from the first four characters of a date-ish string.
///
/// `"1981-06-01"` and `"1981"` both give `Some(1981)`. Anything whose first four
/// characters are not a positive number gives `None`, including Spotify's
/// `"0000"` placeholder.
pub fn parse_year(s: &str) -> Option<i32> {
    let head: String = s.trim().chars().take(4).collect();
    head.parse::<i32>().ok().filter(|year| *year > 0)
}

/// Coerces a loosely typed JSON value into a year.
///
/// Numbers and strings are read through their first four characters, so
/// `1981`, `"1981"` and `"1981-03"` all give 1981. `null`, booleans and
/// anything unparsable give `None`.
pub fn parse_year_value(value: &Value) -> Option<i32> {
    match value {
        Value::Number(n) => parse_year(&n.to_string()),
        Value::String(s) => parse_year(s),
        _ => None,
    }
}

/// Strips noise from an AI-suggested title before searching.
///
/// Removes "(Extended Remix)" and "(Cover by", then drops everything from the
/// first remaining "(" onward.
pub fn clean_title(title: &str) -> String {
    let stripped = title.replace("(Extended Remix)", "").replace("(Cover by", "");
    stripped
        .split('(')
        .next()
        .unwrap_or_default()
        .trim()
        .to_string()
}

/// Truncates to at most `max` characters, ending with "..." when cut.
pub fn truncate_with_ellipsis(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }

    let keep = max.saturating_sub(3);
    let mut out: String = s.chars().take(keep).collect();
    out.push_str("...");
    out
}

pub fn track_uri(id: &str) -> String {
    format!("spotify:track:{}", id)
}

pub fn playlist_url(id: &str) -> String {
    format!("https://open.spotify.com/playlist/{}", id)
}

/// Returns at most `max` characters of `s`, for log previews.
pub fn preview(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}
