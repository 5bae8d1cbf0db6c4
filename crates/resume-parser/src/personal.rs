use tracing::debug;

use crate::classify::{company_likeness, title_likeness};
use crate::models::PersonalInfo;
use crate::patterns::{
    find_email, find_github, find_linkedin, find_location, find_phone, find_urls,
    is_contact_line, location_line, LocationKind,
};

/// The name is looked for among this many leading lines.
const NAME_SEARCH_LINES: usize = 5;
/// Lines with at least this many words in the contact block read as a summary.
const SUMMARY_MIN_WORDS: usize = 8;

const NOT_NAME_WORDS: &[&str] = &["resume", "résumé", "curriculum", "vitae", "cv", "profile"];

/// Splits a contact line on the separators résumés put between fields.
fn segments(line: &str) -> impl Iterator<Item = &str> {
    line.split(['|', '•', '·', '▪', '\t'])
        .flat_map(|s| s.split("  "))
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// Two to four capitalized alphabetic words that do not read as a title or
/// a company.
fn is_name_like(text: &str) -> bool {
    let words: Vec<&str> = text.split_whitespace().collect();
    if !(2..=4).contains(&words.len()) {
        return false;
    }
    let shaped = words.iter().all(|w| {
        w.starts_with(char::is_uppercase)
            && w.chars()
                .all(|c| c.is_alphabetic() || matches!(c, '.' | '-' | '\'' | '’'))
            && !NOT_NAME_WORDS.contains(&w.to_lowercase().as_str())
    });
    shaped
        && !title_likeness(text).is_title
        && !company_likeness(text).is_company
        && location_line(text).is_none()
}

fn find_name(lines: &[&str]) -> Option<String> {
    lines.iter().take(NAME_SEARCH_LINES).find_map(|line| {
        segments(line)
            .next()
            .filter(|first| is_name_like(first))
            .map(str::to_string)
    })
}

fn find_contact_location(lines: &[&str]) -> Option<String> {
    lines.iter().find_map(|line| {
        if location_line(line).is_some() {
            return Some(line.trim().to_string());
        }
        let on_contact_line = segments(line).count() > 1 || is_contact_line(line);
        if !on_contact_line {
            return None;
        }
        segments(line).find_map(|segment| match find_location(segment) {
            Some((m, LocationKind::CityState | LocationKind::CityCountry)) => Some(m.text),
            _ => None,
        })
    })
}

/// Extracts contact details from the leading block and a summary from
/// `summaries` (the text of summary-headed sections), falling back to prose
/// lines in the leading block.
pub fn extract_personal(contact_text: &str, summaries: &[&str]) -> PersonalInfo {
    let lines: Vec<&str> = contact_text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    let linkedin = find_linkedin(contact_text).map(|m| m.text).unwrap_or_default();
    let github = find_github(contact_text).map(|m| m.text).unwrap_or_default();
    let website = find_urls(contact_text)
        .into_iter()
        .map(|m| m.text)
        .find(|url| {
            let lower = url.to_lowercase();
            !lower.contains("linkedin.com") && !lower.contains("github.com")
        })
        .unwrap_or_default();

    let summary = if summaries.iter().any(|s| !s.trim().is_empty()) {
        summaries
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("\n\n")
    } else {
        lines
            .iter()
            .filter(|l| l.split_whitespace().count() >= SUMMARY_MIN_WORDS && !is_contact_line(l))
            .copied()
            .collect::<Vec<_>>()
            .join(" ")
    };

    let info = PersonalInfo {
        full_name: find_name(&lines).unwrap_or_default(),
        email: find_email(contact_text).map(|m| m.text).unwrap_or_default(),
        phone: find_phone(contact_text).map(|m| m.text).unwrap_or_default(),
        location: find_contact_location(&lines).unwrap_or_default(),
        linkedin,
        github,
        website,
        summary,
    };
    debug!(
        has_name = !info.full_name.is_empty(),
        has_email = !info.email.is_empty(),
        has_phone = !info.phone.is_empty(),
        "extracted personal info"
    );
    info
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "Jane Q. Doe\nAustin, TX | jane.doe@example.com | (512) 555-0199\nlinkedin.com/in/janedoe | github.com/janedoe | https://janedoe.dev";

    #[test]
    fn test_contact_block() {
        let info = extract_personal(HEADER, &[]);
        assert_eq!(info.full_name, "Jane Q. Doe");
        assert_eq!(info.email, "jane.doe@example.com");
        assert_eq!(info.phone, "(512) 555-0199");
        assert_eq!(info.location, "Austin, TX");
        assert_eq!(info.linkedin, "linkedin.com/in/janedoe");
        assert_eq!(info.github, "github.com/janedoe");
        assert_eq!(info.website, "https://janedoe.dev");
        assert!(info.summary.is_empty());
    }

    #[test]
    fn test_name_from_first_segment() {
        let info = extract_personal("RESUME\nJohn Smith | john@smith.io", &[]);
        assert_eq!(info.full_name, "John Smith");
    }

    #[test]
    fn test_titles_are_not_names() {
        let info = extract_personal("Senior Software Engineer\nAcme Inc", &[]);
        assert!(info.full_name.is_empty());
    }

    #[test]
    fn test_summary_sources() {
        let info = extract_personal("Jane Doe", &["Backend engineer who likes queues."]);
        assert_eq!(info.summary, "Backend engineer who likes queues.");

        let info = extract_personal(
            "Jane Doe\nBackend engineer with eight years building payment systems at scale",
            &[],
        );
        assert_eq!(
            info.summary,
            "Backend engineer with eight years building payment systems at scale"
        );
    }
}
