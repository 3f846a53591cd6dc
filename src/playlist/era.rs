//! Heuristic extraction of a release-year range from free text.
//!
//! Rules are tried in a fixed priority order and the first one that matches
//! wins; nothing is retried. See [`parse_era_range_at`] for the rules.

use std::sync::LazyLock;

use chrono::{Datelike, Utc};
use regex::Regex;

/// Inclusive range of release years, `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EraRange {
    pub start: i32,
    pub end: i32,
}

impl EraRange {
    pub fn new(start: i32, end: i32) -> Self {
        EraRange {
            start: start.min(end),
            end: start.max(end),
        }
    }

    pub fn contains(&self, year: i32) -> bool {
        self.start <= year && year <= self.end
    }

    /// True when `year` lies within `tolerance` years of either boundary.
    pub fn near_boundary(&self, year: i32, tolerance: i32) -> bool {
        (year - self.start).abs() <= tolerance || (year - self.end).abs() <= tolerance
    }
}

/// Narrows a decade to part of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Descriptor {
    Early,
    Mid,
    Late,
}

impl Descriptor {
    fn parse(word: &str) -> Option<Self> {
        match word {
            "early" => Some(Descriptor::Early),
            "mid" => Some(Descriptor::Mid),
            "late" => Some(Descriptor::Late),
            _ => None,
        }
    }
}

static YEAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:\b(?:from|in|around|circa)\s+)?\b((?:19|20)\d{2})\b").expect("valid regex")
});
static FULL_DECADE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b((?:19|20)\d{2})s\b").expect("valid regex"));
static SHORT_DECADE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{2})s\b").expect("valid regex"));
static MILLENNIUM_DECADE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(2000|2010|2020)s\b").expect("valid regex"));
static DESCRIPTOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(early|mid|late)[\s-]+$").expect("valid regex"));

/// Parses an era out of `prompt` relative to the current year.
pub fn parse_era_range(prompt: &str) -> Option<EraRange> {
    parse_era_range_at(prompt, Utc::now().year())
}

/// Parses an era out of `prompt`, treating `current_year` as the newest valid year.
///
/// Priority order, first match wins:
/// 1. the first 4-digit year (`19xx`/`20xx`), if it lies in `1900..=current_year`
/// 2. a 4-digit decade such as `1990s`
/// 3. a 2-digit decade such as `90s`: 20-99 are the 1900s, 00-19 the 2000s
/// 4. one of `2000s`, `2010s`, `2020s`
///
/// Decades are narrowed by an "early", "mid" or "late" directly in front of them.
pub fn parse_era_range_at(prompt: &str, current_year: i32) -> Option<EraRange> {
    let text = prompt.to_lowercase();

    if let Some(caps) = YEAR.captures(&text) {
        if let Ok(year) = caps[1].parse::<i32>() {
            if (1900..=current_year).contains(&year) {
                return Some(EraRange::new(year, year));
            }
        }
    }

    if let Some(caps) = FULL_DECADE.captures(&text) {
        let token = caps.get(1)?;
        let decade_start = token.as_str()[..3].parse::<i32>().ok()? * 10;
        return Some(decade_bounds(decade_start, descriptor_before(&text, token.start())));
    }

    if let Some(caps) = SHORT_DECADE.captures(&text) {
        let token = caps.get(1)?;
        let two = token.as_str().parse::<i32>().ok()?;
        // "00s".."19s" are read as this century; the cut-off is a guess
        let century = if two >= 20 { 1900 } else { 2000 };
        let decade_start = century + two / 10 * 10;
        return Some(decade_bounds(decade_start, descriptor_before(&text, token.start())));
    }

    if let Some(caps) = MILLENNIUM_DECADE.captures(&text) {
        let token = caps.get(1)?;
        let decade_start = token.as_str().parse::<i32>().ok()?;
        return Some(decade_bounds(decade_start, descriptor_before(&text, token.start())));
    }

    None
}

fn descriptor_before(text: &str, token_start: usize) -> Option<Descriptor> {
    DESCRIPTOR
        .captures(&text[..token_start])
        .and_then(|caps| Descriptor::parse(&caps[1]))
}

fn decade_bounds(start: i32, descriptor: Option<Descriptor>) -> EraRange {
    match descriptor {
        Some(Descriptor::Early) => EraRange::new(start, start + 3),
        Some(Descriptor::Mid) => EraRange::new(start + 4, start + 6),
        Some(Descriptor::Late) => EraRange::new(start + 7, start + 9),
        None => EraRange::new(start, start + 9),
    }
}
