//! Section segmenter. Splits a résumé into labeled sections.
//!
//! Lines are fed through a small state machine: `Idle` until the first
//! content or header line, then `InSection` until the next header. Content
//! seen before any header forms an implicit `Personal` section.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::classify::{company_likeness, title_likeness};
use crate::config::ParserConfig;
use crate::patterns::is_bullet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Personal,
    Experience,
    Education,
    Skills,
    Projects,
    Unknown,
}

impl SectionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SectionKind::Personal => "personal",
            SectionKind::Experience => "experience",
            SectionKind::Education => "education",
            SectionKind::Skills => "skills",
            SectionKind::Projects => "projects",
            SectionKind::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub kind: SectionKind,
    /// The header line that opened the section; `None` for the implicit
    /// leading `Personal` section.
    pub header: Option<String>,
    pub text: String,
    pub start_line: usize,
    pub end_line: usize,
    pub confidence: f32,
}

/// Confidence of the implicit leading section: résumés conventionally open
/// with contact details.
const IMPLICIT_PERSONAL_CONFIDENCE: f32 = 0.8;

/// Headers beyond the matched keyword may carry at most this many extra words
/// ("Relevant Work Experience").
const MAX_EXTRA_HEADER_TOKENS: usize = 2;

/// Header keywords per section kind. Unknown-kind headers are recognized only
/// so they terminate the section before them.
const HEADER_KEYWORDS: &[(SectionKind, &[&str])] = &[
    (
        SectionKind::Personal,
        &[
            "summary",
            "professional summary",
            "career summary",
            "profile",
            "professional profile",
            "objective",
            "career objective",
            "about me",
            "about",
            "overview",
            "contact",
            "contact information",
            "personal information",
            "personal details",
        ],
    ),
    (
        SectionKind::Experience,
        &[
            "experience",
            "work experience",
            "professional experience",
            "relevant experience",
            "employment",
            "employment history",
            "work history",
            "career history",
            "professional background",
            "positions held",
        ],
    ),
    (
        SectionKind::Education,
        &[
            "education",
            "academic background",
            "academics",
            "academic history",
            "educational background",
            "qualifications",
            "degrees",
        ],
    ),
    (
        SectionKind::Skills,
        &[
            "skills",
            "technical skills",
            "core skills",
            "key skills",
            "core competencies",
            "competencies",
            "expertise",
            "technologies",
            "proficiencies",
            "tools",
            "tech stack",
        ],
    ),
    (
        SectionKind::Projects,
        &[
            "projects",
            "personal projects",
            "key projects",
            "side projects",
            "selected projects",
            "portfolio",
            "open source",
        ],
    ),
    (
        SectionKind::Unknown,
        &[
            "certifications",
            "licenses",
            "awards",
            "honors",
            "achievements",
            "publications",
            "languages",
            "interests",
            "hobbies",
            "references",
            "volunteer experience",
            "volunteering",
            "activities",
            "affiliations",
            "memberships",
            "patents",
            "courses",
            "coursework",
            "training",
        ],
    ),
];

/// Simple suffix stripping so "Experience", "Experiences" and "Experienced"
/// collapse to one stem. Not linguistic stemming.
pub fn stem(word: &str) -> String {
    let mut w = word.to_lowercase();
    if w.len() > 5 && w.ends_with("ies") {
        w.truncate(w.len() - 3);
        w.push('y');
    } else {
        for suffix in ["ing", "ed", "es", "s"] {
            if w.len() > suffix.len() + 3 && w.ends_with(suffix) {
                w.truncate(w.len() - suffix.len());
                break;
            }
        }
    }
    if w.len() > 4 && w.ends_with('e') {
        w.pop();
    }
    w
}

fn stems(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric() && c != '\'')
        .filter(|w| !w.is_empty())
        .map(stem)
        .collect()
}

/// A line recognized as a section header.
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderMatch {
    pub kind: SectionKind,
    pub keyword: &'static str,
    pub confidence: f32,
}

/// Decides whether `line` is a section header and, if so, of which kind.
pub fn classify_header(line: &str, config: &ParserConfig) -> Option<HeaderMatch> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.chars().count() >= config.header_max_len {
        return None;
    }
    if is_bullet(trimmed) || trimmed.chars().any(|c| c.is_ascii_digit() || c == '@') {
        return None;
    }

    let trailing_marker = trimmed.ends_with([':', '-', '–', '—']);
    let core = trimmed
        .trim_start_matches(|c: char| !c.is_alphanumeric())
        .trim_end_matches(|c: char| !c.is_alphanumeric() && c != ')');
    // "Skills: Rust, Go" is a labeled content line, not a header.
    if core.is_empty() || core.contains([':', ',', '|', ';']) {
        return None;
    }

    let words = stems(core);
    let letters: Vec<char> = core.chars().filter(|c| c.is_alphabetic()).collect();
    let all_caps = !letters.is_empty() && letters.iter().all(|c| c.is_uppercase());
    if !(all_caps || words.len() <= config.header_max_tokens || trailing_marker) {
        return None;
    }
    if title_likeness(core).has_role_noun() || company_likeness(core).has_legal_suffix() {
        return None;
    }

    let mut best: Option<(SectionKind, &'static str, usize)> = None;
    for (kind, keywords) in HEADER_KEYWORDS {
        for &keyword in keywords.iter() {
            let needle = stems(keyword);
            let found = words
                .windows(needle.len())
                .any(|window| window == needle.as_slice());
            if found && best.map_or(true, |(_, _, len)| needle.len() > len) {
                best = Some((*kind, keyword, needle.len()));
            }
        }
    }
    let (kind, keyword, matched_len) = best?;
    if words.len() - matched_len > MAX_EXTRA_HEADER_TOKENS {
        return None;
    }

    let mut confidence = 0.5;
    if core.to_lowercase().contains(keyword) {
        confidence += 0.3;
    }
    if all_caps {
        confidence += 0.1;
    }
    if core.chars().count() <= 25 {
        confidence += 0.1;
    }

    Some(HeaderMatch {
        kind,
        keyword,
        confidence: f32::min(confidence, 1.0),
    })
}

struct OpenSection<'a> {
    kind: SectionKind,
    header: Option<String>,
    start_line: usize,
    end_line: usize,
    confidence: f32,
    lines: Vec<&'a str>,
}

impl<'a> OpenSection<'a> {
    fn close(self) -> Section {
        let text = self.lines.join("\n").trim_matches('\n').trim().to_string();
        Section {
            kind: self.kind,
            header: self.header,
            text,
            start_line: self.start_line,
            end_line: self.end_line,
            confidence: self.confidence,
        }
    }
}

enum SegmenterState<'a> {
    Idle,
    InSection(OpenSection<'a>),
}

/// Splits `text` into sections in document order.
pub fn segment(text: &str, config: &ParserConfig) -> Vec<Section> {
    let mut sections = Vec::new();
    let mut state = SegmenterState::Idle;

    for (index, line) in text.lines().enumerate() {
        let is_blank = line.trim().is_empty();
        let header = if is_blank {
            None
        } else {
            classify_header(line, config)
        };

        state = match (state, header) {
            (SegmenterState::Idle, None) if is_blank => SegmenterState::Idle,
            (SegmenterState::Idle, None) => SegmenterState::InSection(OpenSection {
                kind: SectionKind::Personal,
                header: None,
                start_line: index,
                end_line: index,
                confidence: IMPLICIT_PERSONAL_CONFIDENCE,
                lines: vec![line],
            }),
            (previous, Some(found)) => {
                if let SegmenterState::InSection(open) = previous {
                    sections.push(open.close());
                }
                SegmenterState::InSection(OpenSection {
                    kind: found.kind,
                    header: Some(line.trim().to_string()),
                    start_line: index,
                    end_line: index,
                    confidence: found.confidence,
                    lines: Vec::new(),
                })
            }
            (SegmenterState::InSection(mut open), None) => {
                open.lines.push(line);
                if !is_blank {
                    open.end_line = index;
                }
                SegmenterState::InSection(open)
            }
        };
    }

    if let SegmenterState::InSection(open) = state {
        sections.push(open.close());
    }

    debug!(
        sections = sections.len(),
        headers = sections.iter().filter(|s| s.header.is_some()).count(),
        "segmented document"
    );
    sections
}

/// True when no header was recognized, so the caller has to scan the full
/// text for experience and education.
pub fn is_degraded(sections: &[Section]) -> bool {
    sections.iter().all(|s| s.header.is_none())
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESUME: &str = "Jane Doe\njane@example.com\n\nEXPERIENCE\nEngineer at Acme Inc.\nJan 2020 - Present\n\nEducation:\nB.S. Computer Science, MIT, 2019\n\nTechnical Skills\nRust, Go";

    fn cfg() -> ParserConfig {
        ParserConfig::default()
    }

    #[test]
    fn test_stem_collapses_variants() {
        assert_eq!(stem("Experience"), stem("Experiences"));
        assert_eq!(stem("Experience"), stem("Experienced"));
        assert_eq!(stem("Technologies"), stem("technology"));
        assert_eq!(stem("skills"), "skill");
    }

    #[test]
    fn test_all_caps_exact_header_scores_full_confidence() {
        let h = classify_header("EXPERIENCE", &cfg()).unwrap();
        assert_eq!(h.kind, SectionKind::Experience);
        assert!((h.confidence - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_mixed_case_header_confidence() {
        let h = classify_header("Work Experience", &cfg()).unwrap();
        assert_eq!(h.kind, SectionKind::Experience);
        assert!((h.confidence - 0.9).abs() < 1e-6);
    }

    #[test]
    fn test_stemmed_header_without_exact_keyword() {
        let h = classify_header("Work Histories", &cfg()).unwrap();
        assert_eq!(h.kind, SectionKind::Experience);
        assert!((h.confidence - 0.6).abs() < 1e-6);
    }

    #[test]
    fn test_longest_keyword_wins() {
        let h = classify_header("Volunteer Experience", &cfg()).unwrap();
        assert_eq!(h.kind, SectionKind::Unknown);
        let h = classify_header("Professional Summary:", &cfg()).unwrap();
        assert_eq!(h.kind, SectionKind::Personal);
    }

    #[test]
    fn test_titles_and_sentences_are_not_headers() {
        assert!(classify_header("Project Manager", &cfg()).is_none());
        assert!(classify_header("Led projects across teams", &cfg()).is_none());
        assert!(classify_header("Skills: Rust, Go", &cfg()).is_none());
        assert!(classify_header("• Skills", &cfg()).is_none());
        assert!(classify_header("Pearson Education Inc", &cfg()).is_none());
        assert!(classify_header("Experience 2019", &cfg()).is_none());
    }

    #[test]
    fn test_long_lines_are_not_headers() {
        let long = format!("Experience {}", "word ".repeat(12));
        assert!(classify_header(&long, &cfg()).is_none());
    }

    #[test]
    fn test_segment_orders_sections_and_tracks_lines() {
        let sections = segment(RESUME, &cfg());
        let kinds: Vec<_> = sections.iter().map(|s| s.kind).collect();
        assert_eq!(
            kinds,
            vec![
                SectionKind::Personal,
                SectionKind::Experience,
                SectionKind::Education,
                SectionKind::Skills
            ]
        );
        assert_eq!(sections[0].header, None);
        assert!((sections[0].confidence - 0.8).abs() < f32::EPSILON);
        assert_eq!(sections[0].text, "Jane Doe\njane@example.com");
        assert_eq!(sections[1].start_line, 3);
        assert_eq!(sections[1].end_line, 5);
        assert_eq!(sections[1].text, "Engineer at Acme Inc.\nJan 2020 - Present");
        assert_eq!(sections[3].text, "Rust, Go");
    }

    #[test]
    fn test_no_headers_is_single_personal_section() {
        let sections = segment("Jane Doe\nEngineer at Acme Inc.\n2019 - 2021", &cfg());
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].kind, SectionKind::Personal);
        assert_eq!(sections[0].end_line, 2);
        assert!(is_degraded(&sections));
    }

    #[test]
    fn test_empty_text_has_no_sections() {
        assert!(segment("", &cfg()).is_empty());
        assert!(segment("\n\n   \n", &cfg()).is_empty());
    }
}
