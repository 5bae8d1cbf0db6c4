//! Résumé text to structured record extraction.
//!
//! The engine takes decoded résumé text (and optional layout hints), splits
//! it into sections, extracts contact details, work history, education,
//! skills and projects with heuristics, and scores how much of the result
//! can be trusted. It performs no I/O and never fails on malformed input:
//! problems are reported in the returned [`ParseOutcome`].
//!
//! ```no_run
//! let outcome = resume_parser::parse("Senior Software Engineer at Google Inc.\nJan 2020 - Present");
//! assert!(outcome.success);
//! ```

pub mod classify;
pub mod confidence;
pub mod config;
pub mod education;
pub mod experience;
pub mod layout;
pub mod models;
pub mod parser;
pub mod patterns;
pub mod personal;
pub mod projects;
pub mod segmenter;
pub mod skills;

pub use config::ParserConfig;
pub use models::{
    Education, Experience, FieldError, LayoutHint, ParseOutcome, PersonalInfo, Project,
    RawDocument, ResumeRecord, Severity, Skill, SkillCategory,
};
pub use parser::ResumeParser;
pub use segmenter::{Section, SectionKind};

/// Parses `text` with the default configuration.
pub fn parse(text: &str) -> ParseOutcome {
    ResumeParser::default().parse(text)
}
