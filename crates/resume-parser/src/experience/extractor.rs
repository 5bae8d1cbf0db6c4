//! Field extraction for a single job-entry block.
//!
//! Each sub-extraction (dates, company/position, location, bullets) runs on
//! its own and may come back empty; the block confidence only counts what was
//! found.

use serde::{Deserialize, Serialize};

use crate::classify::{company_likeness, disambiguate, title_likeness, FieldOrder};
use crate::config::ParserConfig;
use crate::patterns::vocab::{self, ACHIEVEMENT_VERBS};
use crate::patterns::{
    find_date_range, find_location, has_metric, is_bullet, is_contact_line, is_date_line,
    location_line, pair_date_tokens, split_at_construction, split_two_part, strip_bullet,
    strip_dates, trim_separators, DateRange, LocationKind,
};

/// At most this many lines above the first bullet are treated as the entry header.
const MAX_HEADER_LINES: usize = 3;
/// Longer lines above the bullets are description prose, not header fields.
const MAX_HEADER_TOKENS: usize = 10;
/// Implicit bullets must be longer than this.
const MIN_IMPLICIT_BULLET_LEN: usize = 10;

const DATE_WEIGHT: f32 = 0.3;
const COMPANY_POSITION_WEIGHT: f32 = 0.4;
const LOCATION_WEIGHT: f32 = 0.1;
const BULLET_WEIGHT: f32 = 0.1;
const MAX_BULLET_SCORE: f32 = 0.3;
/// Floor for blocks that yielded anything at all.
pub const MIN_BLOCK_CONFIDENCE: f32 = 0.1;

/// How company and position were laid out in the block header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutFormat {
    /// `Position at Company` or `Position @ Company`.
    AtSeparator,
    /// `first SEP second` on one line.
    Separated,
    TwoLine { company_first: bool },
    CompanyOnly,
    PositionOnly,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyPosition {
    pub company: String,
    pub position: String,
    pub format: LayoutFormat,
    pub confidence: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub value: String,
    pub kind: LocationKind,
    pub confidence: f32,
}

/// Everything recovered from one block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperienceBlock {
    pub lines: Vec<String>,
    pub date_range: Option<DateRange>,
    pub company_position: Option<CompanyPosition>,
    pub location: Option<Location>,
    pub bullet_points: Vec<String>,
    /// Prose lines that are neither header fields nor bullets.
    pub description: Vec<String>,
    pub confidence: f32,
}

impl ExperienceBlock {
    pub fn has_company_or_position(&self) -> bool {
        self.company_position
            .as_ref()
            .is_some_and(|cp| !cp.company.is_empty() || !cp.position.is_empty())
    }
}

pub fn extract_block(text: &str, config: &ParserConfig) -> ExperienceBlock {
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    let date_range = lines
        .iter()
        .find_map(|line| find_date_range(line))
        .or_else(|| pair_date_tokens(lines.iter().copied()));

    // An implicit bullet can only follow a header line.
    let first_header = lines
        .iter()
        .position(|l| !is_bullet(l) && !is_date_line(l) && location_line(l).is_none() && !is_contact_line(l))
        .unwrap_or(0);
    let first_bullet = lines
        .iter()
        .enumerate()
        .position(|(i, l)| is_bullet(l) || (i > first_header && is_implicit_bullet(l)))
        .unwrap_or(lines.len());

    let headers: Vec<(usize, String)> = lines[..first_bullet]
        .iter()
        .enumerate()
        .filter(|(_, l)| !is_date_line(l) && location_line(l).is_none() && !is_contact_line(l))
        .filter_map(|(i, l)| header_text(l).map(|t| (i, t)))
        .filter(|(_, t)| vocab::tokens(t).len() <= MAX_HEADER_TOKENS)
        .take(MAX_HEADER_LINES)
        .collect();
    let header_texts: Vec<&str> = headers.iter().map(|(_, t)| t.as_str()).collect();

    let company_position = extract_company_position(&header_texts);
    let location = extract_location(&lines, first_bullet);

    let mut bullet_points: Vec<String> = Vec::new();
    let mut description = Vec::new();
    let mut last_was_bullet = false;
    for (index, line) in lines.iter().enumerate() {
        if headers.iter().any(|(i, _)| *i == index)
            || is_date_line(line)
            || location_line(line).is_some()
        {
            last_was_bullet = false;
            continue;
        }

        if let Some(stripped) = strip_bullet(line) {
            let len = stripped.chars().count();
            last_was_bullet = (config.min_bullet_len..=config.max_bullet_len).contains(&len)
                && !is_contact_line(stripped)
                && !repeats_header(stripped, company_position.as_ref());
            if last_was_bullet {
                bullet_points.push(stripped.to_string());
            }
            continue;
        }

        // Wrapped PDF lines continue the previous bullet in lower case.
        if last_was_bullet && line.starts_with(char::is_lowercase) {
            if let Some(last) = bullet_points.last_mut() {
                last.push(' ');
                last.push_str(line);
            }
            continue;
        }

        if is_implicit_bullet(line) && line.chars().count() <= config.max_bullet_len {
            bullet_points.push(line.to_string());
            last_was_bullet = true;
            continue;
        }

        last_was_bullet = false;
        if !is_contact_line(line) {
            description.push(line.to_string());
        }
    }

    let confidence = block_confidence(
        date_range.as_ref(),
        company_position.as_ref(),
        location.as_ref(),
        bullet_points.len(),
    );

    ExperienceBlock {
        lines: lines.iter().map(|l| l.to_string()).collect(),
        date_range,
        company_position,
        location,
        bullet_points,
        description,
        confidence,
    }
}

/// Weighted sum of the sub-extractions that are present, capped at 1.0.
/// Absent parts contribute nothing, so a bare title stays low.
pub fn block_confidence(
    date_range: Option<&DateRange>,
    company_position: Option<&CompanyPosition>,
    location: Option<&Location>,
    bullet_count: usize,
) -> f32 {
    let parts = [
        date_range.map(|d| d.confidence * DATE_WEIGHT),
        company_position.map(|cp| cp.confidence * COMPANY_POSITION_WEIGHT),
        location.map(|l| l.confidence * LOCATION_WEIGHT),
        (bullet_count > 0).then(|| (bullet_count as f32 * BULLET_WEIGHT).min(MAX_BULLET_SCORE)),
    ];
    if parts.iter().all(Option::is_none) {
        return 0.0;
    }
    parts
        .iter()
        .flatten()
        .sum::<f32>()
        .clamp(MIN_BLOCK_CONFIDENCE, 1.0)
}

/// A line without a glyph that still reads as an achievement: achievement
/// vocabulary or a quantified outcome, and not itself a short title or
/// company line.
fn is_implicit_bullet(line: &str) -> bool {
    if line.chars().count() <= MIN_IMPLICIT_BULLET_LEN || is_bullet(line) || is_date_line(line) {
        return false;
    }
    let tokens = vocab::tokens(line);
    if tokens.len() <= 6
        && (title_likeness(line).is_title || company_likeness(line).has_legal_suffix())
    {
        return false;
    }
    if is_header_shaped(line, &tokens) {
        return false;
    }
    vocab::contains_any(&tokens, ACHIEVEMENT_VERBS) || has_metric(&strip_dates(line))
}

/// Company/position lines of any length, unless they open with an
/// achievement verb ("Launched the partner API at Acme").
fn is_header_shaped(line: &str, tokens: &[String]) -> bool {
    if tokens
        .first()
        .is_some_and(|t| ACHIEVEMENT_VERBS.contains(&t.as_str()))
    {
        return false;
    }
    let names_a_side =
        |side: &str| title_likeness(side).is_title || company_likeness(side).has_legal_suffix();
    at_split(line).is_some()
        || split_two_part(line).is_some_and(|(a, b)| names_a_side(a) || names_a_side(b))
        || names_a_side(line)
}

/// Header line text with dates and a trailing location removed.
fn header_text(line: &str) -> Option<String> {
    let mut text = strip_dates(line);
    if location_line(&text).is_some() {
        return None;
    }
    if let Some((m, _)) = find_location(&text) {
        let tail = text[m.end..].trim_matches(|c: char| c.is_whitespace() || matches!(c, ')' | ']'));
        let head = &text[..m.start];
        if tail.is_empty() && head.chars().any(char::is_alphanumeric) {
            text = head.trim_end_matches(|c: char| c.is_whitespace() || matches!(c, '(' | '[')).to_string();
        }
    }
    let text = trim_separators(&text).to_string();
    (!text.is_empty()).then_some(text)
}

fn at_split(line: &str) -> Option<(&str, &str)> {
    split_at_construction(line)
        .or_else(|| line.split_once(" @ ").map(|(a, b)| (a.trim(), b.trim())))
        .filter(|(a, b)| !a.is_empty() && !b.is_empty())
}

fn extract_company_position(headers: &[&str]) -> Option<CompanyPosition> {
    if let Some((position, company)) = headers.iter().find_map(|h| at_split(h)) {
        let confidence = if title_likeness(position).is_title {
            0.95
        } else {
            0.9
        };
        return Some(CompanyPosition {
            company: company.to_string(),
            position: position.to_string(),
            format: LayoutFormat::AtSeparator,
            confidence,
        });
    }

    if let Some((first, second)) = headers.iter().find_map(|h| split_two_part(h)) {
        let d = disambiguate(first, second);
        let (company, position) = match d.ordering {
            FieldOrder::CompanyFirst => (first, second),
            FieldOrder::TitleFirst => (second, first),
        };
        return Some(CompanyPosition {
            company: company.to_string(),
            position: position.to_string(),
            format: LayoutFormat::Separated,
            confidence: d.confidence,
        });
    }

    if let [first, second, ..] = headers {
        let (ordering, confidence) = if company_likeness(first).has_legal_suffix()
            && title_likeness(second).is_compound(second)
        {
            (FieldOrder::CompanyFirst, 1.0)
        } else {
            let d = disambiguate(first, second);
            (d.ordering, d.confidence)
        };
        let company_first = ordering == FieldOrder::CompanyFirst;
        let (company, position) = if company_first {
            (first, second)
        } else {
            (second, first)
        };
        return Some(CompanyPosition {
            company: company.to_string(),
            position: position.to_string(),
            format: LayoutFormat::TwoLine { company_first },
            confidence,
        });
    }

    headers.first().map(|line| {
        let line = line.to_string();
        if title_likeness(&line).is_title {
            CompanyPosition {
                company: String::new(),
                position: line,
                format: LayoutFormat::PositionOnly,
                confidence: 0.6,
            }
        } else if company_likeness(&line).is_company {
            CompanyPosition {
                company: line,
                position: String::new(),
                format: LayoutFormat::CompanyOnly,
                confidence: 0.6,
            }
        } else {
            CompanyPosition {
                company: String::new(),
                position: line,
                format: LayoutFormat::PositionOnly,
                confidence: 0.5,
            }
        }
    })
}

/// Whole-line locations win; otherwise the first pattern match above the
/// bullets.
fn extract_location(lines: &[&str], first_bullet: usize) -> Option<Location> {
    let exact = lines.iter().filter(|l| !is_bullet(l)).find_map(|line| {
        location_line(line).map(|kind| Location {
            value: line
                .trim_matches(|c: char| matches!(c, '(' | ')' | '[' | ']'))
                .trim()
                .to_string(),
            kind,
            confidence: if kind == LocationKind::CityState {
                0.95
            } else {
                0.9
            },
        })
    });
    if exact.is_some() {
        return exact;
    }

    lines[..first_bullet].iter().find_map(|line| {
        find_location(line).map(|(m, kind)| Location {
            value: m.text,
            kind,
            confidence: match kind {
                LocationKind::CityState => 0.8,
                LocationKind::CityCountry => 0.7,
                LocationKind::Remote | LocationKind::Hybrid => 0.6,
            },
        })
    })
}

fn repeats_header(text: &str, company_position: Option<&CompanyPosition>) -> bool {
    company_position.is_some_and(|cp| {
        (!cp.position.is_empty() && text.eq_ignore_ascii_case(&cp.position))
            || (!cp.company.is_empty() && text.eq_ignore_ascii_case(&cp.company))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patterns::DateShape;

    const GOOGLE: &str = "Senior Software Engineer at Google Inc.\nJan 2020 - Present\n• Led team of 5";
    const MICROSOFT: &str = "Microsoft Corporation - Principal Engineer\nMarch 2019 - December 2021";

    fn extract(text: &str) -> ExperienceBlock {
        extract_block(text, &ParserConfig::default())
    }

    #[test]
    fn test_at_construction_fixture() {
        let block = extract(GOOGLE);
        let cp = block.company_position.as_ref().unwrap();
        assert_eq!(cp.position, "Senior Software Engineer");
        assert_eq!(cp.company, "Google Inc.");
        assert_eq!(cp.format, LayoutFormat::AtSeparator);
        assert!((cp.confidence - 0.95).abs() < f32::EPSILON);

        let dates = block.date_range.as_ref().unwrap();
        assert_eq!(dates.start, "Jan 2020");
        assert!(dates.is_current());
        assert_eq!(block.bullet_points, vec!["Led team of 5"]);
    }

    #[test]
    fn test_suffix_side_wins_as_company() {
        let block = extract(MICROSOFT);
        let cp = block.company_position.unwrap();
        assert_eq!(cp.company, "Microsoft Corporation");
        assert_eq!(cp.position, "Principal Engineer");
        assert_eq!(cp.format, LayoutFormat::Separated);
        assert_eq!(block.date_range.unwrap().shape, DateShape::FullMonthRange);
    }

    #[test]
    fn test_two_line_suffix_then_compound_title_is_certain() {
        let block = extract("Initech LLC\nSenior Data Analyst\n2016 - 2019");
        let cp = block.company_position.unwrap();
        assert_eq!(cp.company, "Initech LLC");
        assert_eq!(cp.position, "Senior Data Analyst");
        assert_eq!(cp.format, LayoutFormat::TwoLine { company_first: true });
        assert!((cp.confidence - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_parenthetical_in_title_survives() {
        let cp = extract("Acme Inc\nEngineering Manager, Payments (team of 12)\n2019 - 2021")
            .company_position
            .unwrap();
        assert_eq!(cp.company, "Acme Inc");
        assert_eq!(cp.position, "Engineering Manager, Payments (team of 12)");

        let cp = extract("Staff Engineer at Initech LLC (Jan 2019 - Present)")
            .company_position
            .unwrap();
        assert_eq!(cp.company, "Initech LLC");
    }

    #[test]
    fn test_two_line_title_first() {
        let cp = extract("Backend Developer\nGlobex Corp\n2016 - 2019")
            .company_position
            .unwrap();
        assert_eq!(cp.company, "Globex Corp");
        assert_eq!(cp.position, "Backend Developer");
        assert_eq!(cp.format, LayoutFormat::TwoLine { company_first: false });
    }

    #[test]
    fn test_bare_title_scores_low() {
        let block = extract("Software Engineer");
        let cp = block.company_position.as_ref().unwrap();
        assert_eq!(cp.position, "Software Engineer");
        assert_eq!(cp.format, LayoutFormat::PositionOnly);
        assert!(block.confidence <= 0.3);
        assert!(block.confidence >= MIN_BLOCK_CONFIDENCE);
    }

    #[test]
    fn test_mixed_glyphs_in_order() {
        let block = extract(
            "Engineer at Acme Inc\n2019 - 2021\n• Shipped the API\n▪ Cut build times\n- Wrote the docs\n→ Ran the on-call\n○ Hired two people",
        );
        assert_eq!(
            block.bullet_points,
            vec![
                "Shipped the API",
                "Cut build times",
                "Wrote the docs",
                "Ran the on-call",
                "Hired two people"
            ]
        );
    }

    #[test]
    fn test_implicit_bullets_and_continuations() {
        let block = extract(
            "Engineer at Acme Inc\n2019 - 2021\nReduced cloud spend by 30% across\nthree regions\nImproved onboarding for new hires",
        );
        assert_eq!(
            block.bullet_points,
            vec![
                "Reduced cloud spend by 30% across three regions",
                "Improved onboarding for new hires"
            ]
        );
    }

    #[test]
    fn test_short_and_contact_bullets_are_rejected() {
        let block = extract("Engineer at Acme Inc\n2019 - 2021\n• ok\n• jane@example.com\n• Engineer\n• Built the ingest pipeline");
        assert_eq!(block.bullet_points, vec!["Built the ingest pipeline"]);
    }

    #[test]
    fn test_location_line_and_fallback() {
        let block = extract("Engineer at Acme Inc\nAustin, TX\n2019 - 2021");
        let loc = block.location.unwrap();
        assert_eq!(loc.value, "Austin, TX");
        assert!((loc.confidence - 0.95).abs() < f32::EPSILON);

        let block = extract("Engineer at Acme Inc (Remote)\n2019 - 2021");
        let loc = block.location.unwrap();
        assert_eq!(loc.kind, LocationKind::Remote);
        assert!((loc.confidence - 0.6).abs() < f32::EPSILON);
        assert_eq!(block.company_position.unwrap().company, "Acme Inc");

        let block = extract("Acme GmbH, Berlin, Germany\nSoftware Engineer\n2019 - 2021");
        let loc = block.location.unwrap();
        assert_eq!(loc.value, "Berlin, Germany");
        assert_eq!(loc.kind, LocationKind::CityCountry);
    }

    #[test]
    fn test_long_numbered_title_stays_a_header() {
        let block = extract(
            "Software Development Engineer 2 at Amazon Web Services\nJan 2020 - Present\n• Built the ingest pipeline",
        );
        let cp = block.company_position.unwrap();
        assert_eq!(cp.position, "Software Development Engineer 2");
        assert_eq!(cp.company, "Amazon Web Services");
        assert_eq!(cp.format, LayoutFormat::AtSeparator);
        assert_eq!(block.bullet_points, vec!["Built the ingest pipeline"]);
    }

    #[test]
    fn test_header_shaped_lines_are_not_implicit_bullets() {
        assert!(!is_implicit_bullet("Principal Engineer 3 - Platform Team of 40 at Initech LLC"));
        assert!(!is_implicit_bullet("Globex Corporation | Senior Data Engineer II, 2 teams"));
        assert!(is_implicit_bullet("Launched the partner API at Acme for 40 enterprise clients"));
        assert!(is_implicit_bullet("Reduced cloud spend by 30% across three regions"));
    }

    #[test]
    fn test_bare_remote_and_hybrid_lines() {
        let cases = [
            ("Remote", "Remote", LocationKind::Remote),
            ("WFH", "WFH", LocationKind::Remote),
            ("Virtual", "Virtual", LocationKind::Remote),
            ("(Remote)", "Remote", LocationKind::Remote),
            ("Hybrid", "Hybrid", LocationKind::Hybrid),
        ];
        for (line, value, kind) in cases {
            let block = extract(&format!("Engineer at Acme Inc\n{line}\n2019 - 2021"));
            let loc = block.location.unwrap();
            assert_eq!(loc.value, value);
            assert_eq!(loc.kind, kind);
            assert!((loc.confidence - 0.9).abs() < f32::EPSILON, "{line}");
            assert_eq!(block.company_position.unwrap().company, "Acme Inc");
        }
    }

    #[test]
    fn test_paired_date_tokens_fallback() {
        let block = extract("Engineer at Acme Inc\nStarted Jan 2019\nLeft Mar 2021");
        let dates = block.date_range.unwrap();
        assert_eq!(dates.start, "Jan 2019");
        assert_eq!(dates.end, "Mar 2021");
        assert_eq!(dates.shape, DateShape::PairedTokens);
    }

    #[test]
    fn test_block_confidence_weights() {
        assert_eq!(block_confidence(None, None, None, 0), 0.0);
        assert!((block_confidence(None, None, None, 5) - 0.3).abs() < 1e-6);
        let block = extract(GOOGLE);
        assert!((block.confidence - (0.85 * 0.3 + 0.95 * 0.4 + 0.1)).abs() < 1e-5);
    }
}
