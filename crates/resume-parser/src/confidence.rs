//! Overall confidence and review warnings for an assembled record.

use crate::models::ResumeRecord;
use crate::segmenter::{Section, SectionKind};

const BASE_CONFIDENCE: f32 = 0.3;
const SECTION_SCALE: f32 = 0.3;
const COMPLETENESS_SCALE: f32 = 0.4;

// ──────────────────────────────────────────────────────────────
// Completeness points (out of 100)
// ──────────────────────────────────────────────────────────────

const EMAIL_POINTS: f32 = 15.0;
const PHONE_POINTS: f32 = 10.0;
const NAME_POINTS: f32 = 15.0;
const EXPERIENCE_POINTS: f32 = 25.0;
const WELL_STRUCTURED_POINTS: f32 = 20.0;
const EDUCATION_POINTS: f32 = 15.0;

fn kind_weight(kind: SectionKind) -> f32 {
    match kind {
        SectionKind::Personal | SectionKind::Experience => 0.3,
        SectionKind::Education => 0.2,
        SectionKind::Skills | SectionKind::Projects => 0.1,
        SectionKind::Unknown => 0.0,
    }
}

/// Σ kind weight × best confidence among the sections of that kind.
pub fn section_score(sections: &[Section]) -> f32 {
    [
        SectionKind::Personal,
        SectionKind::Experience,
        SectionKind::Education,
        SectionKind::Skills,
        SectionKind::Projects,
    ]
    .iter()
    .map(|&kind| {
        let best = sections
            .iter()
            .filter(|s| s.kind == kind)
            .map(|s| s.confidence)
            .fold(0.0_f32, f32::max);
        kind_weight(kind) * best
    })
    .sum()
}

/// Share of the high-value fields that were recovered, in [0, 1].
pub fn completeness(record: &ResumeRecord) -> f32 {
    let personal = &record.personal;
    let mut points = 0.0;
    if !personal.email.is_empty() {
        points += EMAIL_POINTS;
    }
    if !personal.phone.is_empty() {
        points += PHONE_POINTS;
    }
    if !personal.full_name.is_empty() {
        points += NAME_POINTS;
    }
    if !record.experience.is_empty() {
        points += EXPERIENCE_POINTS;
        let well_structured = record
            .experience
            .iter()
            .filter(|e| !e.company.is_empty() && !e.position.is_empty() && !e.start_date.is_empty())
            .count();
        points += WELL_STRUCTURED_POINTS * well_structured as f32 / record.experience.len() as f32;
    }
    if !record.education.is_empty() {
        points += EDUCATION_POINTS;
    }
    points / 100.0
}

/// Calibrated trust score in [0, 1].
pub fn overall_confidence(sections: &[Section], record: &ResumeRecord) -> f32 {
    let score = BASE_CONFIDENCE
        + SECTION_SCALE * section_score(sections)
        + COMPLETENESS_SCALE * completeness(record);
    score.clamp(0.0, 1.0)
}

/// Review warnings, each naming the affected area.
pub fn warnings(sections: &[Section], record: &ResumeRecord, threshold: f32) -> Vec<String> {
    let mut out = Vec::new();
    if record.personal.email.is_empty() {
        out.push("personal: no email address found".to_string());
    }
    if record.personal.full_name.is_empty() {
        out.push("personal: no full name found".to_string());
    }
    if record.experience.is_empty() {
        out.push("experience: no work experience entries found".to_string());
    }
    for section in sections.iter().filter(|s| s.confidence < threshold) {
        out.push(format!(
            "{}: low section confidence ({:.2}) at line {}",
            section.kind.as_str(),
            section.confidence,
            section.start_line + 1
        ));
    }
    for entry in record.experience.iter().filter(|e| e.confidence < threshold) {
        let label = if entry.position.is_empty() {
            &entry.company
        } else {
            &entry.position
        };
        out.push(format!(
            "experience: low confidence ({:.2}) for entry \"{}\"",
            entry.confidence, label
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Education, Experience, PersonalInfo};
    use uuid::Uuid;

    fn section(kind: SectionKind, confidence: f32) -> Section {
        Section {
            kind,
            header: None,
            text: String::new(),
            start_line: 0,
            end_line: 0,
            confidence,
        }
    }

    fn complete_record() -> ResumeRecord {
        ResumeRecord {
            personal: PersonalInfo {
                full_name: "Jane Doe".into(),
                email: "jane@example.com".into(),
                ..Default::default()
            },
            experience: vec![Experience {
                id: Uuid::new_v4(),
                company: "Acme Inc".into(),
                position: "Engineer".into(),
                location: String::new(),
                start_date: "Jan 2020".into(),
                end_date: "Present".into(),
                is_current: true,
                description: String::new(),
                bullet_points: vec![],
                confidence: 0.8,
            }],
            education: vec![Education {
                id: Uuid::new_v4(),
                degree: "B.S.".into(),
                field: String::new(),
                school: "MIT".into(),
                graduation_year: "2019".into(),
                gpa: String::new(),
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_record_sits_at_base() {
        let record = ResumeRecord::default();
        assert!((overall_confidence(&[], &record) - BASE_CONFIDENCE).abs() < f32::EPSILON);
    }

    #[test]
    fn test_complete_record_is_high_confidence() {
        let record = complete_record();
        assert!((completeness(&record) - 0.9).abs() < 1e-6);
        let sections = [section(SectionKind::Personal, 0.8)];
        assert!(overall_confidence(&sections, &record) >= 0.7);
    }

    #[test]
    fn test_best_section_per_kind_counts_once() {
        let sections = [
            section(SectionKind::Skills, 0.6),
            section(SectionKind::Skills, 1.0),
            section(SectionKind::Unknown, 1.0),
        ];
        assert!((section_score(&sections) - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_confidence_is_capped() {
        let mut record = complete_record();
        record.personal.phone = "555 0100 200".into();
        let sections: Vec<_> = [
            SectionKind::Personal,
            SectionKind::Experience,
            SectionKind::Education,
            SectionKind::Skills,
            SectionKind::Projects,
        ]
        .into_iter()
        .map(|k| section(k, 1.0))
        .collect();
        assert!((overall_confidence(&sections, &record) - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_warnings_name_the_area() {
        let sections = [section(SectionKind::Skills, 0.5)];
        let warnings = warnings(&sections, &ResumeRecord::default(), 0.6);
        assert_eq!(warnings.len(), 4);
        assert!(warnings[0].starts_with("personal:"));
        assert!(warnings[2].starts_with("experience:"));
        assert!(warnings[3].starts_with("skills:"));
    }
}
