use anyhow::{Context, Result};
use resume_parser::ParserConfig;

const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Application configuration loaded from environment variables.
/// Every variable is optional; unparseable values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub max_upload_bytes: usize,
    pub parser: ParserConfig,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut parser = ParserConfig::default();
        if let Some(threshold) = parse_var(&lookup, "PARSER_LOW_CONFIDENCE_THRESHOLD")? {
            anyhow::ensure!(
                (0.0..=1.0).contains(&threshold),
                "PARSER_LOW_CONFIDENCE_THRESHOLD must be between 0 and 1"
            );
            parser.low_confidence_threshold = threshold;
        }
        if let Some(max_lines) = parse_var(&lookup, "PARSER_MAX_LINES")? {
            parser.max_lines = max_lines;
        }
        if let Some(max_chars) = parse_var(&lookup, "PARSER_MAX_CHARS")? {
            parser.max_chars = max_chars;
        }

        Ok(Config {
            port: parse_var(&lookup, "PORT")?.unwrap_or(8080),
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            max_upload_bytes: parse_var(&lookup, "MAX_UPLOAD_BYTES")?
                .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES),
            parser,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: 8080,
            rust_log: "info".to_string(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            parser: ParserConfig::default(),
        }
    }
}

fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    lookup(key)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .with_context(|| format!("Environment variable '{key}' has an invalid value: {raw}"))
        })
        .transpose()
}
