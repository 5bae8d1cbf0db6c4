use serde::{Deserialize, Serialize};

/// Tunables for a [`ResumeParser`](crate::ResumeParser). Every field has a
/// default, so a partial config deserializes cleanly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Lines at least this long are never section headers.
    pub header_max_len: usize,
    /// Mixed-case headers without a trailing colon may have at most this many tokens.
    pub header_max_tokens: usize,
    /// Sections scoring below this get a warning.
    pub low_confidence_threshold: f32,
    pub min_bullet_len: usize,
    pub max_bullet_len: usize,
    /// Input beyond these bounds is truncated (with a warning).
    pub max_lines: usize,
    pub max_chars: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            header_max_len: 50,
            header_max_tokens: 4,
            low_confidence_threshold: 0.6,
            min_bullet_len: 5,
            max_bullet_len: 500,
            max_lines: 2000,
            max_chars: 200_000,
        }
    }
}
