//! Title and company classifiers.
//!
//! Both return the full set of signals that fired rather than a bare boolean,
//! so disambiguation can weigh several weak signals and tests can assert on
//! exactly which ones agreed.

use serde::{Deserialize, Serialize};

use crate::patterns::vocab::{
    self, first_in, INDUSTRY_WORDS, LEGAL_SUFFIXES, ROLE_NOUNS, SENIORITY_PREFIXES,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "signal", content = "word", rename_all = "snake_case")]
pub enum TitleSignal {
    RoleNoun(String),
    SeniorityPrefix(String),
    /// "X at Y" or "X @ Y".
    AtConstruction,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitleLikeness {
    pub is_title: bool,
    pub signals: Vec<TitleSignal>,
}

impl TitleLikeness {
    pub fn has_role_noun(&self) -> bool {
        self.signals
            .iter()
            .any(|s| matches!(s, TitleSignal::RoleNoun(_)))
    }

    /// A multi-word title built around a role noun ("Senior Data Engineer").
    pub fn is_compound(&self, text: &str) -> bool {
        self.has_role_noun() && text.split_whitespace().count() >= 2
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "signal", content = "word", rename_all = "snake_case")]
pub enum CompanySignal {
    LegalSuffix(String),
    IndustryWord(String),
    NoTitleVocabulary,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyLikeness {
    pub is_company: bool,
    pub signals: Vec<CompanySignal>,
}

impl CompanyLikeness {
    pub fn has_legal_suffix(&self) -> bool {
        self.signals
            .iter()
            .any(|s| matches!(s, CompanySignal::LegalSuffix(_)))
    }
}

pub fn title_likeness(text: &str) -> TitleLikeness {
    let tokens = vocab::tokens(text);
    let mut signals = Vec::new();

    if let Some(noun) = first_in(&tokens, ROLE_NOUNS) {
        signals.push(TitleSignal::RoleNoun(noun.to_string()));
    }
    if let Some(prefix) = tokens
        .first()
        .and_then(|t| SENIORITY_PREFIXES.iter().find(|&&p| p == t.as_str()))
    {
        signals.push(TitleSignal::SeniorityPrefix(prefix.to_string()));
    }
    let lower = text.to_lowercase();
    if lower.contains(" at ") || lower.contains(" @ ") {
        signals.push(TitleSignal::AtConstruction);
    }

    let is_title = signals.iter().any(|s| match s {
        TitleSignal::RoleNoun(_) | TitleSignal::AtConstruction => true,
        TitleSignal::SeniorityPrefix(_) => tokens.len() <= 6,
    });

    TitleLikeness { is_title, signals }
}

pub fn company_likeness(text: &str) -> CompanyLikeness {
    let tokens = vocab::tokens(text);
    let mut signals = Vec::new();

    if let Some(suffix) = first_in(&tokens, LEGAL_SUFFIXES) {
        signals.push(CompanySignal::LegalSuffix(suffix.to_string()));
    }
    let has_role_noun = first_in(&tokens, ROLE_NOUNS).is_some();
    if let Some(word) = first_in(&tokens, INDUSTRY_WORDS) {
        signals.push(CompanySignal::IndustryWord(word.to_string()));
    }
    if !has_role_noun {
        signals.push(CompanySignal::NoTitleVocabulary);
    }

    let is_company = signals.iter().any(|s| match s {
        CompanySignal::LegalSuffix(_) => true,
        CompanySignal::IndustryWord(_) => !has_role_noun,
        CompanySignal::NoTitleVocabulary => false,
    });

    CompanyLikeness {
        is_company,
        signals,
    }
}

/// Which side of a two-part header holds the company.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldOrder {
    CompanyFirst,
    TitleFirst,
}

/// The outcome of weighing two header fragments against each other.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Disambiguation {
    pub ordering: FieldOrder,
    /// How many of {company side is company-like, title side is title-like} hold.
    pub strong_signals: u8,
    pub confidence: f32,
}

/// Decides which of `first` / `second` is the company and which the title.
///
/// Each ordering collects votes from both classifiers on both sides; the
/// ordering with more votes wins and ties fall back to title-first. The
/// confidence reflects how many strong signals agree with the winner.
pub fn disambiguate(first: &str, second: &str) -> Disambiguation {
    let (t1, c1) = (title_likeness(first), company_likeness(first));
    let (t2, c2) = (title_likeness(second), company_likeness(second));

    let votes = |company: &CompanyLikeness,
                 company_side_title: &TitleLikeness,
                 title: &TitleLikeness,
                 title_side_company: &CompanyLikeness| {
        [
            company.is_company,
            title.is_title,
            !company_side_title.is_title,
            !title_side_company.is_company,
        ]
        .iter()
        .filter(|&&v| v)
        .count()
    };

    let company_first = votes(&c1, &t1, &t2, &c2);
    let title_first = votes(&c2, &t2, &t1, &c1);

    let (ordering, company, title) = if company_first > title_first {
        (FieldOrder::CompanyFirst, &c1, &t2)
    } else {
        (FieldOrder::TitleFirst, &c2, &t1)
    };

    let strong_signals = u8::from(company.is_company) + u8::from(title.is_title);
    let confidence = match strong_signals {
        2 => 0.9,
        1 => 0.75,
        _ => 0.6,
    };

    Disambiguation {
        ordering,
        strong_signals,
        confidence,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_signals_for_senior_engineer() {
        let t = title_likeness("Senior Software Engineer");
        assert!(t.is_title);
        assert_eq!(
            t.signals,
            vec![
                TitleSignal::RoleNoun("engineer".to_string()),
                TitleSignal::SeniorityPrefix("senior".to_string()),
            ]
        );
    }

    #[test]
    fn test_at_construction_is_title_signal() {
        let t = title_likeness("Consultant at Deloitte");
        assert!(t.signals.contains(&TitleSignal::AtConstruction));
    }

    #[test]
    fn test_plain_company_is_not_title() {
        assert!(!title_likeness("Google Inc.").is_title);
    }

    #[test]
    fn test_legal_suffix_is_company() {
        let c = company_likeness("Microsoft Corporation");
        assert!(c.is_company);
        assert!(c.has_legal_suffix());
        assert!(c.signals.contains(&CompanySignal::NoTitleVocabulary));
    }

    #[test]
    fn test_industry_word_needs_absence_of_title_vocabulary() {
        assert!(company_likeness("Acme Software").is_company);
        assert!(!company_likeness("Software Engineer").is_company);
    }

    #[test]
    fn test_disambiguate_company_first() {
        let d = disambiguate("Microsoft Corporation", "Principal Engineer");
        assert_eq!(d.ordering, FieldOrder::CompanyFirst);
        assert_eq!(d.strong_signals, 2);
        assert!((d.confidence - 0.9).abs() < f32::EPSILON);
    }

    #[test]
    fn test_disambiguate_title_first() {
        let d = disambiguate("Data Analyst", "Initech LLC");
        assert_eq!(d.ordering, FieldOrder::TitleFirst);
        assert_eq!(d.strong_signals, 2);
    }

    #[test]
    fn test_disambiguate_without_signals_defaults_to_title_first() {
        let d = disambiguate("Foo", "Bar");
        assert_eq!(d.ordering, FieldOrder::TitleFirst);
        assert_eq!(d.strong_signals, 0);
        assert!((d.confidence - 0.6).abs() < f32::EPSILON);
    }

    #[test]
    fn test_compound_title() {
        let text = "Staff Platform Engineer";
        assert!(title_likeness(text).is_compound(text));
        assert!(!title_likeness("Engineer").is_compound("Engineer"));
    }
}
