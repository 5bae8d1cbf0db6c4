//! Date shapes: single-line ranges in priority order, isolated date tokens,
//! and conversion of a matched date into a sortable [`DatePoint`].

use std::str::FromStr;

use chrono::Month;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::PatternMatch;

const MONTH_FULL: &str =
    r"(?:january|february|march|april|may|june|july|august|september|october|november|december)";
const MONTH_ANY: &str = r"(?:jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?)\.?";
const YEAR: &str = r"(?:19|20)\d{2}";
const SEP: &str = r"\s*(?:-|–|—|to|until|through|thru)\s*";
const PRESENT: &str = r"(?:present|current(?:ly)?|ongoing|now|today)";
const SEASON: &str = r"(?:spring|summer|fall|autumn|winter)";

/// Which shape produced a [`DateRange`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateShape {
    FullMonthRange,
    QuarterRange,
    MonthToPresent,
    NumericRange,
    AbbreviatedMonthRange,
    SeasonRange,
    YearRange,
    /// Two isolated dates in the block, paired in document order.
    PairedTokens,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: String,
    pub end: String,
    pub raw: String,
    pub confidence: f32,
    pub shape: DateShape,
}

impl DateRange {
    /// True when the range ends in "Present", "Current", "Ongoing", "Now"...
    pub fn is_current(&self) -> bool {
        PRESENT_WORD.is_match(self.end.trim())
    }
}

struct DateMatcher {
    shape: DateShape,
    regex: Regex,
    confidence: f32,
}

/// Single-line range matchers, evaluated first-match-wins.
static DATE_RANGE_MATCHERS: Lazy<Vec<DateMatcher>> = Lazy::new(|| {
    let table = [
        (
            DateShape::FullMonthRange,
            format!(r"(?i)\b({MONTH_FULL},?\s+{YEAR}){SEP}({MONTH_FULL},?\s+{YEAR})\b"),
            0.9,
        ),
        (
            DateShape::QuarterRange,
            format!(r"(?i)\b(Q[1-4]\s*{YEAR}){SEP}(Q[1-4]\s*{YEAR}|{PRESENT})\b"),
            0.8,
        ),
        (
            DateShape::MonthToPresent,
            format!(r"(?i)\b({MONTH_ANY},?\s+{YEAR}){SEP}({PRESENT})\b"),
            0.85,
        ),
        (
            DateShape::NumericRange,
            format!(r"(?i)\b(\d{{1,2}}[/.]{YEAR}){SEP}(\d{{1,2}}[/.]{YEAR}|{PRESENT})\b"),
            0.8,
        ),
        (
            DateShape::AbbreviatedMonthRange,
            format!(r"(?i)\b({MONTH_ANY},?\s+{YEAR}){SEP}({MONTH_ANY},?\s+{YEAR})\b"),
            0.75,
        ),
        (
            DateShape::SeasonRange,
            format!(r"(?i)\b({SEASON},?\s+{YEAR}){SEP}({SEASON},?\s+{YEAR}|{PRESENT})\b"),
            0.7,
        ),
        (
            DateShape::YearRange,
            format!(r"(?i)\b({YEAR}){SEP}({YEAR}|{PRESENT})\b"),
            0.6,
        ),
    ];
    table
        .into_iter()
        .map(|(shape, pattern, confidence)| DateMatcher {
            shape,
            regex: Regex::new(&pattern).unwrap(),
            confidence,
        })
        .collect()
});

static EMPTY_BRACKETS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\(\s*[-–—,]?\s*\)|\[\s*[-–—,]?\s*\]").unwrap());

static DATE_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)\b(?:{MONTH_ANY},?\s+{YEAR}|\d{{1,2}}/{YEAR}|Q[1-4]\s*{YEAR}|{SEASON}\s+{YEAR}|{YEAR})\b"
    ))
    .unwrap()
});

static PRESENT_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(&format!(r"(?i)^{PRESENT}$")).unwrap());

static YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(&format!(r"\b({YEAR})\b")).unwrap());

static MONTH_WORD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\.?").unwrap()
});

static NUMERIC_MONTH: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"\b(\d{{1,2}})[/.]{YEAR}\b")).unwrap());

static QUARTER: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bq([1-4])").unwrap());

static SEASON_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(&format!(r"(?i)\b({SEASON})\b")).unwrap());

/// Finds the highest-priority date range on a single line.
pub fn find_date_range(line: &str) -> Option<DateRange> {
    DATE_RANGE_MATCHERS.iter().find_map(|m| {
        m.regex.captures(line).map(|caps| DateRange {
            start: caps[1].trim().to_string(),
            end: caps[2].trim().to_string(),
            raw: caps[0].trim().to_string(),
            confidence: m.confidence,
            shape: m.shape,
        })
    })
}

/// Isolated date tokens ("Jan 2020", "03/2019", "Q2 2021", "2018") in order.
pub fn find_date_tokens(text: &str) -> Vec<PatternMatch> {
    DATE_TOKEN
        .find_iter(text)
        .map(|m| PatternMatch::from_regex(&m))
        .collect()
}

/// Pairs the first two isolated date tokens of `lines` as start and end.
pub fn pair_date_tokens<'a>(lines: impl IntoIterator<Item = &'a str>) -> Option<DateRange> {
    let mut found = lines
        .into_iter()
        .flat_map(|line| find_date_tokens(line).into_iter().map(|m| m.text));
    let start = found.next()?;
    let end = found.next()?;
    Some(DateRange {
        raw: format!("{start} - {end}"),
        start,
        end,
        confidence: 0.5,
        shape: DateShape::PairedTokens,
    })
}

pub fn contains_date(text: &str) -> bool {
    DATE_TOKEN.is_match(text) || find_date_range(text).is_some()
}

/// Removes every range and date token from `line`, returning what is left
/// with surrounding separators trimmed. Brackets emptied by the removal go
/// too; a bracket at either end is trimmed only when its partner is missing.
pub fn strip_dates(line: &str) -> String {
    let mut out = line.to_string();
    for m in DATE_RANGE_MATCHERS.iter() {
        out = m.regex.replace_all(&out, " ").into_owned();
    }
    out = DATE_TOKEN.replace_all(&out, " ").into_owned();
    out = EMPTY_BRACKETS.replace_all(&out, " ").into_owned();
    let collapsed = out.split_whitespace().collect::<Vec<_>>().join(" ");
    trim_unbalanced_brackets(super::trim_separators(&collapsed)).to_string()
}

fn trim_unbalanced_brackets(mut text: &str) -> &str {
    loop {
        let before = text.len();
        for (open, close) in [('(', ')'), ('[', ']')] {
            let opens = text.matches(open).count();
            let closes = text.matches(close).count();
            if opens > closes && text.starts_with(open) {
                text = text[open.len_utf8()..].trim_start();
            } else if closes > opens && text.ends_with(close) {
                text = text[..text.len() - close.len_utf8()].trim_end();
            } else if opens > closes && text.ends_with(open) {
                text = text[..text.len() - open.len_utf8()].trim_end();
            } else if closes > opens && text.starts_with(close) {
                text = text[close.len_utf8()..].trim_start();
            }
        }
        text = super::trim_separators(text);
        if text.len() == before {
            return text;
        }
    }
}

/// A line that is nothing but dates (and separators or a few stray characters).
pub fn is_date_line(line: &str) -> bool {
    if !contains_date(line) {
        return false;
    }
    let rest = strip_dates(line);
    let rest = PRESENT_WORD.replace(rest.trim(), "");
    rest.chars().filter(|c| c.is_alphanumeric()).count() <= 3
}

/// Year and (when known) month of a date, used to order experience entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DatePoint {
    pub year: i32,
    pub month: Option<u32>,
}

/// Parses "Jan 2020", "January 2020", "03/2020", "Q2 2020", "Fall 2020" or "2020".
pub fn parse_date_point(text: &str) -> Option<DatePoint> {
    let year: i32 = YEAR_RE.captures(text)?[1].parse().ok()?;

    let month = if let Some(caps) = MONTH_WORD.captures(text) {
        Month::from_str(&caps[1].to_lowercase())
            .ok()
            .map(|m| m.number_from_month())
    } else if let Some(caps) = NUMERIC_MONTH.captures(text) {
        caps[1].parse::<u32>().ok().filter(|m| (1..=12).contains(m))
    } else if let Some(caps) = QUARTER.captures(text) {
        caps[1].parse::<u32>().ok().map(|q| (q - 1) * 3 + 1)
    } else if let Some(caps) = SEASON_WORD.captures(text) {
        match caps[1].to_lowercase().as_str() {
            "spring" => Some(3),
            "summer" => Some(6),
            "fall" | "autumn" => Some(9),
            _ => Some(12),
        }
    } else {
        None
    };

    Some(DatePoint { year, month })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_month_range_has_highest_priority() {
        let r = find_date_range("March 2019 - December 2021").unwrap();
        assert_eq!(r.shape, DateShape::FullMonthRange);
        assert_eq!(r.start, "March 2019");
        assert_eq!(r.end, "December 2021");
        assert!((r.confidence - 0.9).abs() < f32::EPSILON);
    }

    #[test]
    fn test_month_to_present() {
        let r = find_date_range("Jan 2020 - Present").unwrap();
        assert_eq!(r.shape, DateShape::MonthToPresent);
        assert_eq!(r.start, "Jan 2020");
        assert!(r.is_current());
    }

    #[test]
    fn test_present_synonyms_are_current() {
        for end in ["Current", "Ongoing", "Now", "present"] {
            let r = find_date_range(&format!("September 2021 – {end}")).unwrap();
            assert!(r.is_current(), "{end} should be current");
        }
    }

    #[test]
    fn test_quarter_range() {
        let r = find_date_range("Q1 2020 - Q3 2021").unwrap();
        assert_eq!(r.shape, DateShape::QuarterRange);
        assert_eq!(r.end, "Q3 2021");
    }

    #[test]
    fn test_numeric_range() {
        let r = find_date_range("Engineer | 01/2019 - 03/2021").unwrap();
        assert_eq!(r.shape, DateShape::NumericRange);
        assert_eq!(r.start, "01/2019");
        assert!(!r.is_current());
    }

    #[test]
    fn test_abbreviated_range() {
        let r = find_date_range("Sept. 2017 to Aug 2019").unwrap();
        assert_eq!(r.shape, DateShape::AbbreviatedMonthRange);
        assert_eq!(r.start, "Sept. 2017");
    }

    #[test]
    fn test_season_and_year_ranges() {
        assert_eq!(
            find_date_range("Summer 2019 - Fall 2020").unwrap().shape,
            DateShape::SeasonRange
        );
        let r = find_date_range("2016 – 2018").unwrap();
        assert_eq!(r.shape, DateShape::YearRange);
        assert!((r.confidence - 0.6).abs() < f32::EPSILON);
    }

    #[test]
    fn test_no_range_in_plain_text() {
        assert!(find_date_range("Built a payment gateway").is_none());
    }

    #[test]
    fn test_pair_isolated_tokens_in_order() {
        let r = pair_date_tokens(["Started Feb 2015", "left in 2017"]).unwrap();
        assert_eq!(r.start, "Feb 2015");
        assert_eq!(r.end, "2017");
        assert_eq!(r.shape, DateShape::PairedTokens);
        assert!((r.confidence - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn test_pair_needs_two_tokens() {
        assert!(pair_date_tokens(["Joined in 2019"]).is_none());
    }

    #[test]
    fn test_is_date_line() {
        assert!(is_date_line("Jan 2020 - Present"));
        assert!(is_date_line("(2018 - 2020)"));
        assert!(!is_date_line("Senior Engineer, 2019"));
        assert!(!is_date_line("Led team of 5"));
    }

    #[test]
    fn test_strip_dates_leaves_title() {
        assert_eq!(strip_dates("Software Engineer | Jan 2020 - Present"), "Software Engineer");
        assert_eq!(
            strip_dates("Engineering Manager, Payments (team of 12)"),
            "Engineering Manager, Payments (team of 12)"
        );
        assert_eq!(strip_dates("Acme Inc (Jan 2019 - Mar 2021)"), "Acme Inc");
        assert_eq!(strip_dates("(Jan 2019 - Present) Staff Engineer"), "Staff Engineer");
    }

    #[test]
    fn test_parse_date_point_variants() {
        assert_eq!(
            parse_date_point("Jan 2020"),
            Some(DatePoint { year: 2020, month: Some(1) })
        );
        assert_eq!(
            parse_date_point("December 2021"),
            Some(DatePoint { year: 2021, month: Some(12) })
        );
        assert_eq!(parse_date_point("03/2019").unwrap().month, Some(3));
        assert_eq!(parse_date_point("Q2 2021").unwrap().month, Some(4));
        assert_eq!(parse_date_point("Fall 2020").unwrap().month, Some(9));
        assert_eq!(parse_date_point("2018").unwrap().month, None);
        assert_eq!(parse_date_point("Present"), None);
    }

    #[test]
    fn test_date_points_order_by_year_then_month() {
        let a = parse_date_point("Mar 2020").unwrap();
        let b = parse_date_point("Jan 2021").unwrap();
        let c = parse_date_point("Nov 2020").unwrap();
        assert!(b > c && c > a);
    }
}
