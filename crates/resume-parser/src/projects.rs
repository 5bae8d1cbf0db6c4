use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;
use uuid::Uuid;

use crate::models::Project;
use crate::patterns::{find_urls, is_bullet, strip_bullet, trim_separators};
use crate::skills::{extract_skills, mentioned_technologies};

/// `Name - what it is` or `Name: what it is` on the first line.
static HEAD_SPLIT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(.{2,60}?)(?:\s+[-–—|]\s+|:\s+)(.+)$").unwrap());

const STACK_LABELS: &[&str] = &["technologies", "tech stack", "stack", "tech", "built with", "tools"];

/// Groups lines into one paragraph per project. A blank line ends a
/// paragraph, and so does a plain line that follows bullet lines.
fn paragraphs(text: &str) -> Vec<Vec<&str>> {
    let mut out: Vec<Vec<&str>> = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut after_bullets = false;

    for raw in text.lines() {
        let line = raw.trim();
        if line.is_empty() {
            if !current.is_empty() {
                out.push(std::mem::take(&mut current));
            }
            after_bullets = false;
            continue;
        }
        let bullet = is_bullet(line);
        if !bullet && after_bullets && !current.is_empty() && !line.starts_with(char::is_lowercase) {
            out.push(std::mem::take(&mut current));
        }
        after_bullets = bullet;
        current.push(line);
    }
    if !current.is_empty() {
        out.push(current);
    }
    out
}

/// The value of a `Technologies: ...` style line.
fn stack_line(line: &str) -> Option<&str> {
    let (label, rest) = line.split_once(':')?;
    let label = label.trim().to_lowercase();
    STACK_LABELS.contains(&label.as_str()).then_some(rest)
}

fn build_project(lines: &[&str]) -> Option<Project> {
    let joined = lines.join("\n");
    let link = find_urls(&joined)
        .into_iter()
        .next()
        .map(|m| m.text)
        .unwrap_or_default();

    let head = lines.first().map(|l| strip_bullet(l).unwrap_or(*l))?;
    let head = if link.is_empty() {
        head.to_string()
    } else {
        head.replace(&link, "")
    };
    let head = head.replace("()", " ").replace("[]", " ");

    let (name, lead) = match HEAD_SPLIT.captures(head.trim()) {
        Some(caps) => (caps[1].to_string(), Some(caps[2].trim().to_string())),
        None => (head.trim().to_string(), None),
    };
    let name = trim_separators(&name).to_string();
    if name.is_empty() {
        return None;
    }

    let mut technologies: Vec<String> = Vec::new();
    let mut description: Vec<String> = lead.into_iter().filter(|l| !l.is_empty()).collect();
    for line in &lines[1..] {
        let text = strip_bullet(line).unwrap_or(*line);
        if let Some(stack) = stack_line(text) {
            technologies.extend(extract_skills(stack).into_iter().map(|s| s.name));
            continue;
        }
        let without_link = if link.is_empty() {
            text.to_string()
        } else {
            text.replace(&link, "")
        };
        if !without_link.chars().any(char::is_alphanumeric) {
            continue;
        }
        description.push(text.to_string());
    }

    for tech in mentioned_technologies(&joined) {
        if !technologies.iter().any(|t| t.eq_ignore_ascii_case(&tech)) {
            technologies.push(tech);
        }
    }

    Some(Project {
        id: Uuid::new_v4(),
        name,
        description: description.join("\n"),
        link,
        technologies,
    })
}

pub fn extract_projects(text: &str) -> Vec<Project> {
    let projects: Vec<Project> = paragraphs(text)
        .iter()
        .filter_map(|p| build_project(p))
        .collect();
    debug!(projects = projects.len(), "extracted projects");
    projects
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROJECTS: &str = "Ledger Sync - CLI that mirrors Postgres into Redis\nhttps://github.com/jane/ledger-sync\n• Handles 10k rows per second\n\nPortfolio Site: personal site built with React\nTech Stack: React, Tailwind, Vercel";

    #[test]
    fn test_paragraphs_become_projects() {
        let projects = extract_projects(PROJECTS);
        assert_eq!(projects.len(), 2);

        let first = &projects[0];
        assert_eq!(first.name, "Ledger Sync");
        assert_eq!(first.link, "https://github.com/jane/ledger-sync");
        assert_eq!(
            first.description,
            "CLI that mirrors Postgres into Redis\nHandles 10k rows per second"
        );
        assert_eq!(first.technologies, vec!["Postgres", "Redis"]);

        let second = &projects[1];
        assert_eq!(second.name, "Portfolio Site");
        assert_eq!(second.description, "personal site built with React");
        assert_eq!(second.technologies, vec!["React", "Tailwind", "Vercel"]);
        assert!(second.link.is_empty());
    }

    #[test]
    fn test_plain_line_after_bullets_starts_new_project() {
        let projects = extract_projects("Alpha\n• Built the parser\nBeta\n• Wrote the renderer");
        let names: Vec<_> = projects.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Alpha", "Beta"]);
    }

    #[test]
    fn test_link_in_head_line_is_removed_from_name() {
        let projects = extract_projects("Widget (github.com/jane/widget)\nA tiny widget");
        assert_eq!(projects[0].name, "Widget");
        assert_eq!(projects[0].link, "github.com/jane/widget");
    }
}
