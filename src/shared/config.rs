//! Application configuration. Input/output paths, calendar metadata, parsing knobs.

use crate::domain::document::{DEFAULT_CALENDAR_NAME, DEFAULT_PRODUCT_ID};
use crate::domain::{AnchorStrategy, CalendarHeader, CompileOptions, DomainError};
use crate::domain::date::DEFAULT_DATE_FORMAT;
use serde::Deserialize;

#[derive(Debug, Deserialize, Default)]
pub struct AppConfig {
    /// Schedule file (.html/.csv/.json). Read from QUEST_ICS_INPUT_PATH.
    #[serde(default)]
    pub input_path: Option<String>,

    /// Directory for the exported .ics (default "."). Read from QUEST_ICS_OUTPUT_DIR.
    #[serde(default)]
    pub output_dir: Option<String>,

    /// Display name used for the file name when the source has none. Read from QUEST_ICS_STUDENT_NAME.
    #[serde(default)]
    pub student_name: Option<String>,

    // ─────────────────────────────────────────────────────────────────────────
    // Calendar Metadata
    // ─────────────────────────────────────────────────────────────────────────
    /// X-WR-CALNAME. Read from QUEST_ICS_CALENDAR_NAME.
    #[serde(default)]
    pub calendar_name: Option<String>,

    /// PRODID. Read from QUEST_ICS_PRODUCT_ID.
    #[serde(default)]
    pub product_id: Option<String>,

    // ─────────────────────────────────────────────────────────────────────────
    // Parsing
    // ─────────────────────────────────────────────────────────────────────────
    /// chrono format of each date in the range text, e.g. "%d/%m/%Y". Read from QUEST_ICS_DATE_FORMAT.
    #[serde(default)]
    pub date_format: Option<String>,

    /// "advance" or "exclude". Read from QUEST_ICS_ANCHOR_STRATEGY.
    #[serde(default)]
    pub anchor_strategy: Option<String>,

    /// Overwrite existing output without asking. Read from QUEST_ICS_ASSUME_YES.
    #[serde(default)]
    pub assume_yes: Option<bool>,
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenv::dotenv().ok();
        let mut c = config::Config::builder();
        c = c.add_source(config::Environment::with_prefix("QUEST_ICS"));
        if let Ok(path) = std::env::var("QUEST_ICS_CONFIG") {
            c = c.add_source(config::File::with_name(&path));
        }
        c.build()?.try_deserialize()
    }

    /// Returns the output directory. Defaults to the current directory.
    pub fn output_dir_or_default(&self) -> String {
        self.output_dir.clone().unwrap_or_else(|| ".".to_string())
    }

    pub fn assume_yes_or_default(&self) -> bool {
        self.assume_yes.unwrap_or(false)
    }

    /// Calendar header, falling back to the built-in metadata.
    pub fn calendar_header(&self) -> CalendarHeader {
        CalendarHeader {
            product_id: self
                .product_id
                .clone()
                .unwrap_or_else(|| DEFAULT_PRODUCT_ID.to_string()),
            calendar_name: self
                .calendar_name
                .clone()
                .unwrap_or_else(|| DEFAULT_CALENDAR_NAME.to_string()),
        }
    }

    /// Compiler options. Fails on an unknown anchor strategy.
    pub fn compile_options(&self) -> Result<CompileOptions, DomainError> {
        let anchor_strategy = match self.anchor_strategy.as_deref() {
            Some(s) => s.parse()?,
            None => AnchorStrategy::default(),
        };
        Ok(CompileOptions {
            date_format: self
                .date_format
                .clone()
                .unwrap_or_else(|| DEFAULT_DATE_FORMAT.to_string()),
            anchor_strategy,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.output_dir_or_default(), ".");
        assert!(!cfg.assume_yes_or_default());
        assert_eq!(cfg.calendar_header(), CalendarHeader::default());
        assert_eq!(cfg.compile_options().unwrap(), CompileOptions::default());
    }

    #[test]
    fn test_overrides() {
        let cfg = AppConfig {
            calendar_name: Some("Winter 2015".into()),
            date_format: Some("%d/%m/%Y".into()),
            anchor_strategy: Some("exclude".into()),
            ..AppConfig::default()
        };
        assert_eq!(cfg.calendar_header().calendar_name, "Winter 2015");
        let options = cfg.compile_options().unwrap();
        assert_eq!(options.date_format, "%d/%m/%Y");
        assert_eq!(options.anchor_strategy, AnchorStrategy::Exclude);
    }

    #[test]
    fn test_bad_anchor_strategy() {
        let cfg = AppConfig {
            anchor_strategy: Some("sometimes".into()),
            ..AppConfig::default()
        };
        assert!(matches!(cfg.compile_options(), Err(DomainError::Config(_))));
    }
}
