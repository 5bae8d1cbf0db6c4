//! Splits an experience section into one raw block per job entry.

use crate::classify::{company_likeness, title_likeness};
use crate::patterns::vocab::{self, ACHIEVEMENT_VERBS, JOB_TERMS};
use crate::patterns::{
    contains_date, find_date_range, find_email, is_bullet, is_two_part, location_line,
    split_at_construction, LocationKind,
};

/// Job headers are short; anything longer is prose.
const MAX_START_LINE_TOKENS: usize = 12;

/// Whether `lines[index]` opens a new job entry.
///
/// The line must read as a title or a company, and the lines around it must
/// carry the shape of an entry header: a date below, a location below, an
/// `at` construction, a two-part `first - second` line, a date on the line
/// itself, or the company/title counterpart below followed by a date.
pub fn is_entry_start(lines: &[&str], index: usize) -> bool {
    let Some(line) = lines.get(index).map(|l| l.trim()) else {
        return false;
    };
    if line.is_empty() || is_bullet(line) || line.starts_with(char::is_lowercase) {
        return false;
    }
    let tokens = vocab::tokens(line);
    if tokens.len() > MAX_START_LINE_TOKENS
        || tokens
            .first()
            .is_some_and(|t| ACHIEVEMENT_VERBS.contains(&t.as_str()))
    {
        return false;
    }
    if !is_title_or_company(line) {
        return false;
    }

    let next = lines.get(index + 1).map(|l| l.trim());
    let after_next = lines.get(index + 2).map(|l| l.trim());

    next.is_some_and(contains_date)
        || next.and_then(location_line) == Some(LocationKind::CityState)
        || split_at_construction(line).is_some()
        || is_two_part(line)
        || find_date_range(line).is_some()
        || (next.is_some_and(|n| !is_bullet(n) && is_title_or_company(n))
            && after_next.is_some_and(contains_date))
}

fn is_title_or_company(line: &str) -> bool {
    title_likeness(line).is_title || company_likeness(line).is_company
}

/// Whether an accumulated block already holds enough to be a job entry, so
/// that the next start line may close it.
pub fn looks_like_experience(block: &[&str]) -> bool {
    if block.len() < 2 {
        return false;
    }
    let is_noise = |line: &&str| {
        let line = line.trim();
        line.eq_ignore_ascii_case("experience")
            || find_email(line).is_some_and(|m| m.text.len() + 2 >= line.len())
    };
    if block.iter().all(is_noise) {
        return false;
    }
    block.iter().any(|line| {
        let tokens = vocab::tokens(line);
        contains_date(line)
            || is_bullet(line)
            || vocab::contains_any(&tokens, JOB_TERMS)
            || vocab::contains_any(&tokens, ACHIEVEMENT_VERBS)
    })
}

/// Splits section text into blocks, one per tentative job entry. Blank lines
/// are ignored; entry boundaries come from header shapes only.
pub fn split_blocks(text: &str) -> Vec<String> {
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    let mut blocks = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    for index in 0..lines.len() {
        if !current.is_empty() && is_entry_start(&lines, index) && looks_like_experience(&current) {
            blocks.push(current.join("\n"));
            current.clear();
        }
        current.push(lines[index]);
    }
    if !current.is_empty() {
        blocks.push(current.join("\n"));
    }
    blocks
}

/// Index of the first non-empty line of `text` that opens a job entry. Used
/// when no section headers were found.
pub fn first_entry_start(text: &str) -> Option<usize> {
    let lines: Vec<&str> = text.lines().collect();
    let non_empty: Vec<(usize, &str)> = lines
        .iter()
        .enumerate()
        .filter(|(_, l)| !l.trim().is_empty())
        .map(|(i, l)| (i, *l))
        .collect();
    let compact: Vec<&str> = non_empty.iter().map(|(_, l)| *l).collect();
    (0..compact.len())
        .find(|&i| is_entry_start(&compact, i))
        .map(|i| non_empty[i].0)
}
