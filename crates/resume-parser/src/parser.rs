//! The extraction pipeline: sanitize, segment, extract per section, score.

use tracing::{debug, warn};

use crate::config::ParserConfig;
use crate::confidence::{self, overall_confidence};
use crate::education::extract_education;
use crate::experience::{extract_experiences, first_entry_start};
use crate::layout::reflow;
use crate::models::{ParseOutcome, RawDocument, ResumeRecord};
use crate::personal::extract_personal;
use crate::projects::extract_projects;
use crate::segmenter::{is_degraded, segment, Section, SectionKind};
use crate::skills::extract_skills;

/// Header words that mark a `Personal` section as a summary rather than
/// contact details.
const SUMMARY_HEADER_WORDS: &[&str] = &["summary", "profile", "objective", "about", "overview"];

/// Without headers, the contact block is at most this many leading lines.
const DEGRADED_CONTACT_LINES: usize = 10;

/// Résumé extraction engine. Holds only configuration, so one instance can
/// be shared across threads and cloned freely.
#[derive(Debug, Clone, Default)]
pub struct ResumeParser {
    config: ParserConfig,
}

impl ResumeParser {
    pub fn new(config: ParserConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    pub fn parse(&self, text: &str) -> ParseOutcome {
        self.parse_document(&RawDocument::from_text(text))
    }

    /// Parses a decoded document. When layout hints are present, line
    /// structure is rebuilt from them instead of trusting `text`.
    pub fn parse_document(&self, document: &RawDocument) -> ParseOutcome {
        let source = match document.layout_hints.as_deref() {
            Some(hints) if !hints.is_empty() => {
                let reflowed = reflow(hints);
                if reflowed.trim().is_empty() {
                    document.text.clone()
                } else {
                    reflowed
                }
            }
            _ => document.text.clone(),
        };

        let text = sanitize(&source);
        if !text.chars().any(char::is_alphanumeric) {
            debug!("document holds no readable text");
            return ParseOutcome::unreadable();
        }

        let mut warnings = Vec::new();
        let text = self.truncate(text, &mut warnings);

        let sections = segment(&text, &self.config);
        let record = self.extract(&text, &sections);
        let confidence = overall_confidence(&sections, &record);
        warnings.extend(confidence::warnings(
            &sections,
            &record,
            self.config.low_confidence_threshold,
        ));

        debug!(
            confidence,
            experience = record.experience.len(),
            education = record.education.len(),
            skills = record.skills.len(),
            projects = record.projects.len(),
            warnings = warnings.len(),
            "parsed document"
        );

        ParseOutcome {
            success: true,
            record: Some(record),
            confidence,
            warnings,
            errors: Vec::new(),
        }
    }

    /// Caps input at the configured character and line budgets.
    fn truncate(&self, mut text: String, warnings: &mut Vec<String>) -> String {
        if let Some((cut, _)) = text.char_indices().nth(self.config.max_chars) {
            warn!(max_chars = self.config.max_chars, "truncating oversized input");
            warnings.push(format!(
                "input: truncated to the first {} characters",
                self.config.max_chars
            ));
            text.truncate(cut);
        }
        if text.lines().count() > self.config.max_lines {
            warn!(max_lines = self.config.max_lines, "truncating input with too many lines");
            warnings.push(format!(
                "input: truncated to the first {} lines",
                self.config.max_lines
            ));
            text = text
                .lines()
                .take(self.config.max_lines)
                .collect::<Vec<_>>()
                .join("\n");
        }
        text
    }

    fn extract(&self, text: &str, sections: &[Section]) -> ResumeRecord {
        let joined = |kind: SectionKind| {
            sections
                .iter()
                .filter(|s| s.kind == kind)
                .map(|s| s.text.as_str())
                .collect::<Vec<_>>()
                .join("\n\n")
        };

        let summaries: Vec<&str> = sections
            .iter()
            .filter(|s| s.kind == SectionKind::Personal && is_summary_header(s.header.as_deref()))
            .map(|s| s.text.as_str())
            .collect();

        if is_degraded(sections) {
            debug!("no section headers found, scanning full text");
            let entry_start = first_entry_start(text);
            let contact_lines = entry_start.unwrap_or(DEGRADED_CONTACT_LINES);
            let contact = text
                .lines()
                .take(contact_lines)
                .collect::<Vec<_>>()
                .join("\n");
            let experience = entry_start
                .map(|start| {
                    let rest = text.lines().skip(start).collect::<Vec<_>>().join("\n");
                    extract_experiences(&rest, &self.config)
                })
                .unwrap_or_default();

            return ResumeRecord {
                personal: extract_personal(&contact, &summaries),
                experience,
                education: extract_education(text, true),
                skills: Vec::new(),
                projects: Vec::new(),
            };
        }

        let contact = sections
            .iter()
            .filter(|s| s.kind == SectionKind::Personal && !is_summary_header(s.header.as_deref()))
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join("\n");

        ResumeRecord {
            personal: extract_personal(&contact, &summaries),
            experience: extract_experiences(&joined(SectionKind::Experience), &self.config),
            education: extract_education(&joined(SectionKind::Education), false),
            skills: extract_skills(&joined(SectionKind::Skills)),
            projects: extract_projects(&joined(SectionKind::Projects)),
        }
    }
}

fn is_summary_header(header: Option<&str>) -> bool {
    header.is_some_and(|h| {
        let lower = h.to_lowercase();
        SUMMARY_HEADER_WORDS.iter().any(|w| lower.contains(w))
    })
}

/// Normalizes line endings and whitespace and drops control and zero-width
/// characters. Tabs become a field separator.
pub fn sanitize(text: &str) -> String {
    let text = text.replace("\r\n", "\n").replace('\r', "\n");
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\n' => out.push('\n'),
            '\t' => out.push_str(" | "),
            '\u{a0}' | '\u{2007}' | '\u{202f}' => out.push(' '),
            '\u{200b}' | '\u{200c}' | '\u{200d}' | '\u{feff}' | '\u{fffd}' => {}
            c if c.is_control() => {}
            c => out.push(c),
        }
    }
    out
}
