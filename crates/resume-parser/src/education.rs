use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;
use uuid::Uuid;

use crate::classify::title_likeness;
use crate::models::Education;
use crate::patterns::vocab::{normalize_degree_token, DEGREE_KEYWORDS, INSTITUTION_KEYWORDS};
use crate::patterns::{
    find_location, split_at_construction, strip_bullet, strip_dates, vocab, LocationKind,
};

static GPA_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\bGPA\b\s*[:\-]?\s*(\d(?:\.\d{1,2})?(?:\s*/\s*\d(?:\.\d{1,2})?)?)|\b(\d\.\d{1,2}(?:\s*/\s*\d(?:\.\d{1,2})?)?)\s*GPA\b",
    )
    .unwrap()
});

static YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(?:19|20)\d{2}\b").unwrap());

static PART_SEPARATOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*[,|;]\s*|\s+[-–—]\s+|\s+at\s+").unwrap());

static FIELD_SPLIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\s+(in|of)\s+").unwrap());

/// Words that complete a degree name after "of" ("Bachelor of Science")
/// rather than naming a field of study.
const DEGREE_COMPLEMENTS: &[&str] = &[
    "science",
    "sciences",
    "arts",
    "fine arts",
    "engineering",
    "business administration",
    "laws",
    "philosophy",
    "technology",
    "education",
    "medicine",
    "applied science",
];

/// Degree tokens that are also ordinary job-title words ("Associate Product
/// Manager", "Scrum Master").
const AMBIGUOUS_DEGREE_TOKENS: &[&str] = &[
    "associate",
    "associates",
    "master",
    "masters",
    "ma",
    "ms",
    "md",
    "ba",
    "bs",
    "jd",
];

#[derive(Debug, Default)]
struct Draft {
    degree: String,
    field: String,
    school: String,
    graduation_year: String,
    gpa: String,
}

impl Draft {
    fn finish(self) -> Option<Education> {
        if self.degree.is_empty() && self.school.is_empty() {
            return None;
        }
        Some(Education {
            id: Uuid::new_v4(),
            degree: self.degree,
            field: self.field,
            school: self.school,
            graduation_year: self.graduation_year,
            gpa: self.gpa,
        })
    }
}

fn has_degree(text: &str) -> bool {
    text.split_whitespace()
        .map(normalize_degree_token)
        .any(|t| DEGREE_KEYWORDS.contains(&t.as_str()))
}

fn has_institution(text: &str) -> bool {
    vocab::contains_any(&vocab::tokens(text), INSTITUTION_KEYWORDS)
}

/// A degree mention that cannot be a job title: an unambiguous degree token,
/// or an ambiguous one written as an abbreviation ("M.S.", "MS"), possessive
/// ("Master's") or followed by `of`/`in`/`degree`.
fn has_degree_phrase(text: &str) -> bool {
    let words: Vec<&str> = text.split_whitespace().collect();
    words.iter().enumerate().any(|(i, word)| {
        let token = normalize_degree_token(word);
        if !DEGREE_KEYWORDS.contains(&token.as_str()) {
            return false;
        }
        if !AMBIGUOUS_DEGREE_TOKENS.contains(&token.as_str()) {
            return true;
        }
        let bare = word.trim_matches(|c: char| !c.is_alphanumeric() && c != '.');
        bare.contains('.')
            || word.contains(['\'', '’'])
            || (bare.len() <= 2 && bare.chars().all(|c| c.is_ascii_uppercase()))
            || words.get(i + 1).is_some_and(|next| {
                matches!(next.to_lowercase().as_str(), "of" | "in" | "degree")
            })
    })
}

/// Work-history lines: `Position at Company` or a job title, with no school
/// or unmistakable degree on the line.
fn is_job_line(text: &str) -> bool {
    !has_institution(text)
        && !has_degree_phrase(text)
        && (split_at_construction(text).is_some() || title_likeness(text).is_title)
}

/// Scans `text` line by line for education entries.
///
/// With `strict` set (no section headers were found) the text is not known to
/// be about education: a bare year no longer opens an entry, ambiguous degree
/// words only count inside a degree phrase, and job lines close the open
/// entry without contributing to it.
pub fn extract_education(text: &str, strict: bool) -> Vec<Education> {
    let mut entries = Vec::new();
    let mut open: Option<Draft> = None;

    for raw in text.lines() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        let line = strip_bullet(line).unwrap_or(line);
        let work = without_location(&strip_dates(&GPA_RE.replace_all(line, " ")));

        if strict && is_job_line(&work) {
            if let Some(done) = open.take().and_then(Draft::finish) {
                entries.push(done);
            }
            continue;
        }

        let degree = if strict {
            has_degree_phrase(&work)
        } else {
            has_degree(&work)
        };
        let institution = has_institution(&work);
        let year = YEAR_RE.find_iter(line).last().map(|m| m.as_str().to_string());

        let opens = match &open {
            None => degree || institution || (!strict && year.is_some()),
            Some(d) => (degree && !d.degree.is_empty()) || (institution && !d.school.is_empty()),
        };
        if opens {
            if let Some(done) = open.take().and_then(Draft::finish) {
                entries.push(done);
            }
            open = Some(Draft::default());
        }
        let Some(draft) = open.as_mut() else {
            continue;
        };

        if let Some(caps) = GPA_RE.captures(line) {
            if let Some(gpa) = caps.get(1).or_else(|| caps.get(2)) {
                draft.gpa = gpa.as_str().to_string();
            }
        }
        if let Some(year) = year {
            if draft.graduation_year.is_empty() {
                draft.graduation_year = year;
            }
        }
        // "Coursework: Algorithms, Databases" annotates the entry.
        if !work.contains(':') {
            fill_parts(draft, &work);
        }
    }

    if let Some(done) = open.and_then(Draft::finish) {
        entries.push(done);
    }
    debug!(entries = entries.len(), strict, "extracted education");
    entries
}

/// Drops a city-state or city-country location from the line.
fn without_location(text: &str) -> String {
    match find_location(text) {
        Some((m, LocationKind::CityState | LocationKind::CityCountry)) => {
            format!("{} {}", &text[..m.start], &text[m.end..])
        }
        _ => text.to_string(),
    }
}

fn fill_parts(draft: &mut Draft, work: &str) {
    let mut unlabeled: Vec<&str> = Vec::new();
    for part in PART_SEPARATOR.split(work) {
        let part = part.trim();
        if !part.chars().any(char::is_alphanumeric) {
            continue;
        }
        if draft.degree.is_empty() && has_degree(part) {
            let (degree, field) = split_degree(part);
            draft.degree = degree;
            if draft.field.is_empty() {
                draft.field = field;
            }
        } else if draft.school.is_empty() && has_institution(part) {
            draft.school = part.to_string();
        } else {
            unlabeled.push(part);
        }
    }

    if draft.school.is_empty() {
        if let Some(idx) = unlabeled.iter().rposition(|p| is_school_like(p)) {
            draft.school = unlabeled.remove(idx).to_string();
        }
    }
    if draft.field.is_empty() && !draft.degree.is_empty() {
        if let Some(first) = unlabeled.first() {
            draft.field = first.to_string();
        }
    }
}

/// A short capitalized fragment that can stand as a school name.
fn is_school_like(part: &str) -> bool {
    part.starts_with(char::is_uppercase) && part.split_whitespace().count() <= 8
}

/// Splits "Bachelor of Science in Physics" into degree and field of study.
fn split_degree(part: &str) -> (String, String) {
    let splits: Vec<_> = FIELD_SPLIT.captures_iter(part).collect();
    let in_split = splits
        .iter()
        .rev()
        .find(|c| c[1].eq_ignore_ascii_case("in"));
    let of_split = splits.iter().find(|c| {
        c[1].eq_ignore_ascii_case("of") && {
            let rest = part[c.get(0).map_or(0, |m| m.end())..].to_lowercase();
            !DEGREE_COMPLEMENTS.contains(&rest.as_str())
        }
    });

    if let Some(sep) = in_split.or(of_split).and_then(|c| c.get(0)) {
        let degree = part[..sep.start()].trim();
        let field = part[sep.end()..].trim();
        if has_degree(degree) {
            return (degree.to_string(), field.to_string());
        }
    }

    // "B.S. Computer Science": a leading abbreviation followed by the field.
    let mut words = part.splitn(2, char::is_whitespace);
    if let (Some(head), Some(rest)) = (words.next(), words.next()) {
        let rest = rest.trim();
        let abbreviated = head.contains('.') || head.chars().all(|c| c.is_uppercase());
        if abbreviated
            && has_degree(head)
            && !has_degree(rest)
            && !rest.eq_ignore_ascii_case("degree")
        {
            return (head.to_string(), rest.to_string());
        }
    }
    (part.to_string(), String::new())
}
