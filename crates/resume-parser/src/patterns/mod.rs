//! Pattern library: stateless matchers shared by every extractor.
//!
//! Every regex is compiled once and only ever read, so the library is safe to
//! use from any number of concurrent parses.

pub mod dates;
pub mod vocab;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

pub use dates::{
    contains_date, find_date_range, find_date_tokens, is_date_line, pair_date_tokens,
    parse_date_point, strip_dates, DatePoint, DateRange, DateShape,
};

/// A matched substring and its byte span in the searched text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternMatch {
    pub text: String,
    pub start: usize,
    pub end: usize,
}

impl PatternMatch {
    fn from_regex(m: &regex::Match<'_>) -> Self {
        Self {
            text: m.as_str().to_string(),
            start: m.start(),
            end: m.end(),
        }
    }
}

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").unwrap());

static PHONE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?:\+\d{1,3}[\s.-]?)?(?:\(\d{1,4}\)[\s.-]?|\d{1,4}[\s.-])?\d{3,4}[\s.-]?\d{3,5}\b|\+?\d{10,13}\b",
    )
    .unwrap()
});

static URL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:https?://|www\.)[^\s,;|<>]+|\b(?:linkedin\.com|github\.com)/[^\s,;|<>]+")
        .unwrap()
});

static LINKEDIN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:https?://)?(?:[a-z]{2,3}\.)?linkedin\.com/(?:in|pub)/[A-Za-z0-9_%-]+/?")
        .unwrap()
});

static GITHUB_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:https?://)?(?:www\.)?github\.com/[A-Za-z0-9_-]+(?:/[A-Za-z0-9_.-]+)?/?")
        .unwrap()
});

/// A glyph (`•`, `-`, `→`, ...), a number (`1.`, `1)`) or a letter (`a.`,
/// `a)`) followed by whitespace and the bullet text.
static BULLET_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?:[•▪→○*+·▫◦‣⁃●■►✓✔–—-]\s*|(?:\d{1,2}|[a-z])[.)]\s+)(\S.*)$").unwrap()
});

static CITY_STATE_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Z][A-Za-z.'-]+(?:\s[A-Z][A-Za-z.'-]+){0,2},\s*[A-Z]{2}$").unwrap()
});

static CITY_STATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b[A-Z][A-Za-z.'-]+(?:\s[A-Z][A-Za-z.'-]+){0,2},\s*[A-Z]{2}\b").unwrap()
});

static CITY_COUNTRY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b([A-Z][A-Za-z.'-]+(?:\s[A-Z][A-Za-z.'-]+){0,2}),\s*([A-Z][A-Za-z]+(?:\s[A-Z][A-Za-z]+){0,2})\b")
        .unwrap()
});

static REMOTE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:remote|virtual|work from home|wfh|telecommute|fully distributed)\b")
        .unwrap()
});

static HYBRID_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bhybrid\b").unwrap());

static REMOTE_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^[(\[]?\s*(?:remote|virtual|work from home|wfh|telecommute)\s*[)\]]?$")
        .unwrap()
});

static HYBRID_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^[(\[]?\s*hybrid(?:\s*\(.*\))?\s*[)\]]?$").unwrap());

static TWO_PART_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(.+?)\s+[-–—|@•▪/]\s+(.+)$").unwrap());

static AT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^(.+?)\s+at\s+(.+)$").unwrap());

static PERCENT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+(?:\.\d+)?\s*%").unwrap());

static MONEY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[$€£]\s?\d[\d,.]*\s*(?:[kKmMbB]|million|billion)?").unwrap());

static COUNT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\d+[kKmM+x]?\b").unwrap());

pub fn find_email(text: &str) -> Option<PatternMatch> {
    EMAIL_RE.find(text).map(|m| PatternMatch::from_regex(&m))
}

/// First phone-shaped run with 7 to 15 digits that is not a year range.
pub fn find_phone(text: &str) -> Option<PatternMatch> {
    PHONE_RE
        .find_iter(text)
        .filter(|m| {
            let digits = m.as_str().chars().filter(char::is_ascii_digit).count();
            (7..=15).contains(&digits) && find_date_range(m.as_str()).is_none()
        })
        .map(|m| PatternMatch::from_regex(&m))
        .next()
}

pub fn find_urls(text: &str) -> Vec<PatternMatch> {
    URL_RE
        .find_iter(text)
        .map(|m| {
            let mut pm = PatternMatch::from_regex(&m);
            let trimmed = pm.text.trim_end_matches(['.', ')', ']']).len();
            pm.end = pm.start + trimmed;
            pm.text.truncate(trimmed);
            pm
        })
        .collect()
}

pub fn find_linkedin(text: &str) -> Option<PatternMatch> {
    LINKEDIN_RE.find(text).map(|m| PatternMatch::from_regex(&m))
}

pub fn find_github(text: &str) -> Option<PatternMatch> {
    GITHUB_RE.find(text).map(|m| PatternMatch::from_regex(&m))
}

/// True when the line is an email, phone number or URL and little else.
pub fn is_contact_line(line: &str) -> bool {
    let mut rest = line.to_string();
    for m in find_email(line)
        .into_iter()
        .chain(find_phone(line))
        .chain(find_urls(line))
    {
        rest = rest.replace(&m.text, " ");
    }
    rest.len() != line.len() && rest.chars().filter(|c| c.is_alphanumeric()).count() <= 3
}

/// Returns the text after a leading bullet glyph or list marker.
pub fn strip_bullet(line: &str) -> Option<&str> {
    BULLET_RE
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim_end())
}

pub fn is_bullet(line: &str) -> bool {
    strip_bullet(line).is_some()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationKind {
    CityState,
    CityCountry,
    Remote,
    Hybrid,
}

/// Classifies a whole line as a location: `City, ST`, a bare remote token or
/// a bare hybrid token.
pub fn location_line(line: &str) -> Option<LocationKind> {
    let line = line.trim();
    if CITY_STATE_LINE.is_match(line) {
        Some(LocationKind::CityState)
    } else if REMOTE_LINE.is_match(line) {
        Some(LocationKind::Remote)
    } else if HYBRID_LINE.is_match(line) {
        Some(LocationKind::Hybrid)
    } else {
        None
    }
}

/// Searches anywhere in `text` for a location, strongest shape first.
pub fn find_location(text: &str) -> Option<(PatternMatch, LocationKind)> {
    if let Some(m) = CITY_STATE_RE.find(text) {
        return Some((PatternMatch::from_regex(&m), LocationKind::CityState));
    }
    if let Some(m) = find_city_country(text) {
        return Some((m, LocationKind::CityCountry));
    }
    if let Some(m) = HYBRID_RE.find(text) {
        return Some((PatternMatch::from_regex(&m), LocationKind::Hybrid));
    }
    REMOTE_RE
        .find(text)
        .map(|m| (PatternMatch::from_regex(&m), LocationKind::Remote))
}

/// `City, Country` where the country is a known name.
fn find_city_country(text: &str) -> Option<PatternMatch> {
    // Candidates overlap ("Acme GmbH, Berlin, Germany"), so resume the search
    // at the rejected country rather than after the whole match.
    let mut from = 0;
    while let Some(caps) = CITY_COUNTRY_RE.captures_at(text, from) {
        let whole = caps.get(0)?;
        let country = caps.get(2)?;
        if vocab::COUNTRIES.contains(&country.as_str().to_lowercase().as_str()) {
            return Some(PatternMatch::from_regex(&whole));
        }
        from = country.start();
    }
    None
}

/// Splits `Position at Company` into its two halves.
pub fn split_at_construction(line: &str) -> Option<(&str, &str)> {
    let caps = AT_RE.captures(line)?;
    Some((caps.get(1)?.as_str().trim(), caps.get(2)?.as_str().trim()))
}

/// Splits a `first SEP second` line on a spaced separator.
pub fn split_two_part(line: &str) -> Option<(&str, &str)> {
    let caps = TWO_PART_RE.captures(line)?;
    Some((caps.get(1)?.as_str().trim(), caps.get(2)?.as_str().trim()))
}

pub fn is_two_part(line: &str) -> bool {
    TWO_PART_RE.is_match(line)
}

/// Quantified outcomes: a percentage, a currency amount or a bare count.
pub fn has_metric(text: &str) -> bool {
    PERCENT_RE.is_match(text) || MONEY_RE.is_match(text) || COUNT_RE.is_match(text)
}

/// Trims separator punctuation and whitespace from both ends.
pub fn trim_separators(text: &str) -> &str {
    text.trim_matches(|c: char| {
        c.is_whitespace() || matches!(c, '-' | '–' | '—' | '|' | ',' | ';' | ':' | '•' | '·' | '@' | '/')
    })
}
