use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Decoded document text as handed over by a format decoder.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawDocument {
    pub text: String,
    /// Text fragments with their vertical position, for formats (PDF) where
    /// line breaks have to be inferred.
    #[serde(default)]
    pub layout_hints: Option<Vec<LayoutHint>>,
}

impl RawDocument {
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            layout_hints: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutHint {
    pub value: String,
    pub y: f32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersonalInfo {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub linkedin: String,
    pub github: String,
    pub website: String,
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Experience {
    pub id: Uuid,
    pub company: String,
    pub position: String,
    pub location: String,
    pub start_date: String,
    pub end_date: String,
    pub is_current: bool,
    pub description: String,
    pub bullet_points: Vec<String>,
    pub confidence: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Education {
    pub id: Uuid,
    pub degree: String,
    pub field: String,
    pub school: String,
    pub graduation_year: String,
    pub gpa: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillCategory {
    Programming,
    Tools,
    Technical,
    General,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skill {
    pub id: Uuid,
    pub name: String,
    pub category: SkillCategory,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub link: String,
    pub technologies: Vec<String>,
}

/// The structured résumé handed back to the caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResumeRecord {
    pub personal: PersonalInfo,
    pub experience: Vec<Experience>,
    pub education: Vec<Education>,
    pub skills: Vec<Skill>,
    pub projects: Vec<Project>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Error,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
    pub severity: Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

/// Result of one parse. `confidence` is a calibrated trust score in [0, 1],
/// not a probability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseOutcome {
    pub success: bool,
    pub record: Option<ResumeRecord>,
    pub confidence: f32,
    pub warnings: Vec<String>,
    pub errors: Vec<FieldError>,
}

impl ParseOutcome {
    /// Terminal outcome for input that holds nothing to parse.
    pub fn unreadable() -> Self {
        Self {
            success: false,
            record: None,
            confidence: 0.0,
            warnings: Vec::new(),
            errors: vec![FieldError {
                field: "content".to_string(),
                message: "empty or unreadable".to_string(),
                severity: Severity::Error,
                suggestion: Some(
                    "The document contained no readable text. Try exporting it as PDF or plain text and importing again."
                        .to_string(),
                ),
            }],
        }
    }
}
