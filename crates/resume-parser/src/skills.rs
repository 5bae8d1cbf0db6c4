use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;
use uuid::Uuid;

use crate::models::{Skill, SkillCategory};
use crate::patterns::vocab::{FILLER_PHRASES, PROGRAMMING_LANGUAGES, TECHNICAL_TERMS, TOOLS};
use crate::patterns::{strip_bullet, trim_separators};

const MAX_SKILL_LEN: usize = 50;
const MAX_UNKNOWN_SKILL_LEN: usize = 30;
const MAX_LABEL_LEN: usize = 30;

/// Vocabulary entries that are also common English words; they only count as
/// technologies inside a skills list, never when spotted in prose.
const AMBIGUOUS_IN_PROSE: &[&str] = &[
    "c", "r", "go", "rest", "express", "spring", "unity", "shell", "sketch", "excel", "node",
    "swift", "spark", "cargo", "vue",
];

static SKILL_SEPARATOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*[,;|•▪·●■►◦○→()]\s*|\s+[-–—]\s+|\s+and\s+").unwrap());

pub fn categorize(name: &str) -> SkillCategory {
    let lower = name.to_lowercase();
    let lower = lower.as_str();
    if PROGRAMMING_LANGUAGES.contains(&lower) {
        SkillCategory::Programming
    } else if TOOLS.contains(&lower) {
        SkillCategory::Tools
    } else if TECHNICAL_TERMS.contains(&lower) {
        SkillCategory::Technical
    } else {
        SkillCategory::General
    }
}

fn is_known(lower: &str) -> bool {
    PROGRAMMING_LANGUAGES.contains(&lower)
        || TOOLS.contains(&lower)
        || TECHNICAL_TERMS.contains(&lower)
}

/// Removes a short `Label:` prefix ("Languages: Rust, Go").
fn strip_label(line: &str) -> &str {
    match line.split_once(':') {
        Some((label, rest)) if label.chars().count() <= MAX_LABEL_LEN && !rest.trim().is_empty() => {
            rest
        }
        _ => line,
    }
}

fn keep(token: &str) -> bool {
    let len = token.chars().count();
    let lower = token.to_lowercase();
    if len == 0 || len >= MAX_SKILL_LEN {
        return false;
    }
    if FILLER_PHRASES.iter().any(|f| lower.contains(f)) {
        return false;
    }
    is_known(&lower) || ((2..=MAX_UNKNOWN_SKILL_LEN).contains(&len) && !token.contains("  "))
}

pub fn extract_skills(text: &str) -> Vec<Skill> {
    let mut seen = HashSet::new();
    let mut skills = Vec::new();

    for raw in text.lines() {
        let line = raw.trim();
        let line = strip_bullet(line).unwrap_or(line);
        for token in SKILL_SEPARATOR.split(strip_label(line)) {
            let token = trim_separators(token).trim_end_matches('.');
            if !keep(token) || !seen.insert(token.to_lowercase()) {
                continue;
            }
            skills.push(Skill {
                id: Uuid::new_v4(),
                name: token.to_string(),
                category: categorize(token),
            });
        }
    }

    debug!(skills = skills.len(), "extracted skills");
    skills
}

/// Known technologies mentioned in free text, in order of first mention and
/// with the source casing.
pub fn mentioned_technologies(text: &str) -> Vec<String> {
    let mut found: Vec<(usize, String)> = Vec::new();
    let mut seen = HashSet::new();

    let mut offset = 0;
    for word in text.split_inclusive(|c: char| c.is_whitespace() || matches!(c, ',' | ';' | '|' | '(' | ')')) {
        let start = offset;
        offset += word.len();
        let trimmed = word.trim_matches(|c: char| !c.is_alphanumeric() && c != '+' && c != '#');
        let lower = trimmed.to_lowercase();
        if lower.is_empty() || AMBIGUOUS_IN_PROSE.contains(&lower.as_str()) || !is_known(&lower) {
            continue;
        }
        if seen.insert(lower) {
            found.push((start, trimmed.to_string()));
        }
    }

    let folded = text.to_ascii_lowercase();
    for phrase in PROGRAMMING_LANGUAGES
        .iter()
        .chain(TOOLS)
        .chain(TECHNICAL_TERMS)
        .filter(|p| p.contains(' '))
    {
        if let Some(at) = folded.find(phrase) {
            if seen.insert(phrase.to_string()) {
                found.push((at, text[at..at + phrase.len()].to_string()));
            }
        }
    }

    found.sort_by_key(|(at, _)| *at);
    found.into_iter().map(|(_, name)| name).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SKILLS: &str = "Languages: Rust, Python; TypeScript | Go\n• Docker, Kubernetes\nFrameworks: React (Next.js, Django)\nMachine Learning - Public Speaking\nrust, years of experience in many areas";

    fn names(skills: &[Skill]) -> Vec<&str> {
        skills.iter().map(|s| s.name.as_str()).collect()
    }

    #[test]
    fn test_split_label_and_dedupe() {
        let skills = extract_skills(SKILLS);
        assert_eq!(
            names(&skills),
            vec![
                "Rust",
                "Python",
                "TypeScript",
                "Go",
                "Docker",
                "Kubernetes",
                "React",
                "Next.js",
                "Django",
                "Machine Learning",
                "Public Speaking"
            ]
        );
    }

    #[test]
    fn test_categories() {
        assert_eq!(categorize("Rust"), SkillCategory::Programming);
        assert_eq!(categorize("docker"), SkillCategory::Tools);
        assert_eq!(categorize("Machine Learning"), SkillCategory::Technical);
        assert_eq!(categorize("Public Speaking"), SkillCategory::General);
    }

    #[test]
    fn test_sentence_fragments_are_dropped() {
        let skills = extract_skills("Able to lead cross-functional initiatives end to end\nx");
        assert!(skills.is_empty());
    }

    #[test]
    fn test_mentioned_technologies_in_prose() {
        let techs = mentioned_technologies("A CLI in Rust that syncs Postgres to Redis; go build with machine learning ranking.");
        assert_eq!(techs, vec!["Rust", "Postgres", "Redis", "machine learning"]);
    }
}
