//! Work history: block splitting, per-block extraction and post-processing.

pub mod extractor;
pub mod splitter;

use std::cmp::Ordering;

use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::ParserConfig;
use crate::models::Experience;
use crate::patterns::{parse_date_point, trim_separators, DatePoint};

pub use extractor::{extract_block, CompanyPosition, ExperienceBlock, LayoutFormat, Location};
pub use splitter::{first_entry_start, split_blocks};

/// Extracts, cleans and orders the experience entries of `text`.
///
/// Blocks are extracted independently; a block that yields no company and
/// no position is dropped without affecting the others.
pub fn extract_experiences(text: &str, config: &ParserConfig) -> Vec<Experience> {
    let blocks = split_blocks(text);
    let total = blocks.len();

    let mut dated: Vec<(Option<DatePoint>, Experience)> = blocks
        .iter()
        .map(|raw| extract_block(raw, config))
        .filter_map(|block| {
            let entry = into_experience(&block);
            if entry.is_none() {
                warn!(
                    confidence = block.confidence,
                    lines = block.lines.len(),
                    "dropping experience block without company or position"
                );
            }
            entry
        })
        .map(|entry| (parse_date_point(&entry.start_date), entry))
        .collect();

    sort_most_recent_first(&mut dated);
    debug!(blocks = total, entries = dated.len(), "extracted experience");
    dated.into_iter().map(|(_, entry)| entry).collect()
}

/// Most recent start first; entries without a parseable start go last.
/// The sort is stable, so ties keep document order.
fn sort_most_recent_first(entries: &mut [(Option<DatePoint>, Experience)]) {
    entries.sort_by(|(a, _), (b, _)| match (a, b) {
        (Some(a), Some(b)) => b.cmp(a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}

fn clean(text: &str) -> String {
    trim_separators(text).to_string()
}

fn into_experience(block: &ExperienceBlock) -> Option<Experience> {
    let cp = block.company_position.as_ref();
    let company = cp.map(|cp| clean(&cp.company)).unwrap_or_default();
    let position = cp.map(|cp| clean(&cp.position)).unwrap_or_default();
    if company.is_empty() && position.is_empty() {
        return None;
    }

    let (start_date, end_date, is_current) = match &block.date_range {
        Some(range) => (range.start.clone(), range.end.clone(), range.is_current()),
        None => (String::new(), String::new(), false),
    };

    Some(Experience {
        id: Uuid::new_v4(),
        company,
        position,
        location: block
            .location
            .as_ref()
            .map(|l| clean(&l.value))
            .unwrap_or_default(),
        start_date,
        end_date,
        is_current,
        description: block.description.join("\n"),
        bullet_points: block.bullet_points.clone(),
        confidence: block.confidence,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const OUT_OF_ORDER: &str = "Developer at Acme Inc\n2015 - 2018\n• Wrote tests\n\nStaff Engineer at Initech LLC\nJan 2021 - Present\n• Led platform work\n\nSenior Developer at Globex Corp\nMar 2018 - Dec 2020\n• Built billing";

    fn extract(text: &str) -> Vec<Experience> {
        extract_experiences(text, &ParserConfig::default())
    }

    #[test]
    fn test_sorted_most_recent_first() {
        let entries = extract(OUT_OF_ORDER);
        let companies: Vec<_> = entries.iter().map(|e| e.company.as_str()).collect();
        assert_eq!(companies, vec!["Initech LLC", "Globex Corp", "Acme Inc"]);
        assert!(entries[0].is_current);
        assert_eq!(entries[1].start_date, "Mar 2018");
    }

    #[test]
    fn test_undated_entries_sort_last() {
        let mut entries = vec![
            (None, sample("undated")),
            (Some(DatePoint { year: 2019, month: None }), sample("old")),
            (Some(DatePoint { year: 2021, month: Some(3) }), sample("new")),
        ];
        sort_most_recent_first(&mut entries);
        let order: Vec<_> = entries.iter().map(|(_, e)| e.company.as_str()).collect();
        assert_eq!(order, vec!["new", "old", "undated"]);
    }

    #[test]
    fn test_bare_title_survives_with_low_confidence() {
        let entries = extract("Software Engineer");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].position, "Software Engineer");
        assert!(entries[0].company.is_empty());
        assert!(entries[0].confidence <= 0.3);
    }

    #[test]
    fn test_block_without_company_or_position_is_dropped() {
        assert!(extract("2019 - 2021").is_empty());
        assert!(extract("").is_empty());
    }

    #[test]
    fn test_separators_are_trimmed() {
        let entries = extract("Engineer at Acme Inc |\n2019 - 2021");
        assert_eq!(entries[0].company, "Acme Inc");
    }

    fn sample(company: &str) -> Experience {
        Experience {
            id: Uuid::new_v4(),
            company: company.to_string(),
            position: String::new(),
            location: String::new(),
            start_date: String::new(),
            end_date: String::new(),
            is_current: false,
            description: String::new(),
            bullet_points: Vec::new(),
            confidence: 0.5,
        }
    }
}
