//! Application configuration value object

use serde::{Deserialize, Serialize};

use crate::domain::classifier::{
    ClassifierConfig, DEFAULT_AUDIO_EMPHASIS_THRESHOLD, DEFAULT_MAX_KEYWORDS,
    DEFAULT_SUMMARY_MAX_LENGTH,
};

/// Default spoken language for transcription
pub const DEFAULT_LANGUAGE: &str = "ko-KR";

/// Default transcription window length in seconds
pub const DEFAULT_CHUNK_SECONDS: u64 = 5;

/// Application configuration.
/// All fields are optional to support partial configs and merging.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub api_key: Option<String>,
    pub language: Option<String>,
    pub chunk_seconds: Option<u64>,
    pub store_dir: Option<String>,
    pub highlight_keywords: Option<Vec<String>>,
    pub audio_emphasis_threshold: Option<u8>,
    pub max_keywords: Option<usize>,
    pub summary_max_length: Option<usize>,
}

impl AppConfig {
    /// Create config with default values
    pub fn defaults() -> Self {
        let classifier = ClassifierConfig::default();
        Self {
            api_key: None,
            language: Some(DEFAULT_LANGUAGE.to_string()),
            chunk_seconds: Some(DEFAULT_CHUNK_SECONDS),
            store_dir: None,
            highlight_keywords: Some(classifier.highlight_keywords),
            audio_emphasis_threshold: Some(DEFAULT_AUDIO_EMPHASIS_THRESHOLD),
            max_keywords: Some(DEFAULT_MAX_KEYWORDS),
            summary_max_length: Some(DEFAULT_SUMMARY_MAX_LENGTH),
        }
    }

    /// Create an empty config (all None)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Merge this config with another, where other takes precedence.
    /// Only non-None values from other will override this.
    pub fn merge(self, other: Self) -> Self {
        Self {
            api_key: other.api_key.or(self.api_key),
            language: other.language.or(self.language),
            chunk_seconds: other.chunk_seconds.or(self.chunk_seconds),
            store_dir: other.store_dir.or(self.store_dir),
            highlight_keywords: other.highlight_keywords.or(self.highlight_keywords),
            audio_emphasis_threshold: other
                .audio_emphasis_threshold
                .or(self.audio_emphasis_threshold),
            max_keywords: other.max_keywords.or(self.max_keywords),
            summary_max_length: other.summary_max_length.or(self.summary_max_length),
        }
    }

    /// Get language code, or "ko-KR" if not set
    pub fn language_or_default(&self) -> &str {
        self.language.as_deref().unwrap_or(DEFAULT_LANGUAGE)
    }

    /// Get transcription window length, or 5s if not set. Zero-length
    /// windows are treated as unset.
    pub fn chunk_seconds_or_default(&self) -> u64 {
        match self.chunk_seconds {
            Some(secs) if secs > 0 => secs,
            _ => DEFAULT_CHUNK_SECONDS,
        }
    }

    /// Build the classifier configuration, overriding built-in heuristics
    /// with any configured values
    pub fn classifier_config(&self) -> ClassifierConfig {
        let defaults = ClassifierConfig::default();
        ClassifierConfig {
            highlight_keywords: self
                .highlight_keywords
                .clone()
                .filter(|keywords| !keywords.is_empty())
                .unwrap_or(defaults.highlight_keywords),
            audio_emphasis_threshold: self
                .audio_emphasis_threshold
                .unwrap_or(defaults.audio_emphasis_threshold),
            max_keywords: self.max_keywords.unwrap_or(defaults.max_keywords),
            summary_max_length: self
                .summary_max_length
                .unwrap_or(defaults.summary_max_length),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_have_expected_values() {
        let config = AppConfig::defaults();
        assert!(config.api_key.is_none());
        assert_eq!(config.language, Some("ko-KR".to_string()));
        assert_eq!(config.chunk_seconds, Some(5));
        assert_eq!(config.audio_emphasis_threshold, Some(80));
        assert_eq!(config.max_keywords, Some(5));
        assert_eq!(config.summary_max_length, Some(100));
        assert!(config
            .highlight_keywords
            .as_ref()
            .unwrap()
            .contains(&"중요".to_string()));
    }

    #[test]
    fn empty_has_all_none() {
        let config = AppConfig::empty();
        assert!(config.api_key.is_none());
        assert!(config.language.is_none());
        assert!(config.chunk_seconds.is_none());
        assert!(config.highlight_keywords.is_none());
    }

    #[test]
    fn merge_other_takes_precedence() {
        let base = AppConfig {
            api_key: Some("base_key".to_string()),
            language: Some("ko-KR".to_string()),
            chunk_seconds: Some(5),
            ..Default::default()
        };

        let other = AppConfig {
            api_key: Some("other_key".to_string()),
            language: None, // Should not override
            chunk_seconds: Some(10),
            ..Default::default()
        };

        let merged = base.merge(other);

        assert_eq!(merged.api_key, Some("other_key".to_string()));
        assert_eq!(merged.language, Some("ko-KR".to_string())); // Kept from base
        assert_eq!(merged.chunk_seconds, Some(10));
    }

    #[test]
    fn merge_preserves_base_when_other_is_none() {
        let base = AppConfig {
            api_key: Some("key".to_string()),
            audio_emphasis_threshold: Some(70),
            ..Default::default()
        };

        let merged = base.merge(AppConfig::empty());

        assert_eq!(merged.api_key, Some("key".to_string()));
        assert_eq!(merged.audio_emphasis_threshold, Some(70));
    }

    #[test]
    fn language_or_default() {
        assert_eq!(AppConfig::empty().language_or_default(), "ko-KR");
        let config = AppConfig {
            language: Some("en-US".to_string()),
            ..Default::default()
        };
        assert_eq!(config.language_or_default(), "en-US");
    }

    #[test]
    fn chunk_seconds_or_default_rejects_zero() {
        let config = AppConfig {
            chunk_seconds: Some(0),
            ..Default::default()
        };
        assert_eq!(config.chunk_seconds_or_default(), 5);
        assert_eq!(AppConfig::empty().chunk_seconds_or_default(), 5);
    }

    #[test]
    fn classifier_config_uses_built_ins_when_unset() {
        let classifier = AppConfig::empty().classifier_config();
        assert_eq!(classifier.audio_emphasis_threshold, 80);
        assert_eq!(classifier.max_keywords, 5);
        assert!(classifier.highlight_keywords.contains(&"핵심".to_string()));
    }

    #[test]
    fn classifier_config_honors_overrides() {
        let config = AppConfig {
            highlight_keywords: Some(vec!["important".to_string()]),
            audio_emphasis_threshold: Some(60),
            max_keywords: Some(3),
            summary_max_length: Some(50),
            ..Default::default()
        };
        let classifier = config.classifier_config();
        assert_eq!(classifier.highlight_keywords, vec!["important"]);
        assert_eq!(classifier.audio_emphasis_threshold, 60);
        assert_eq!(classifier.max_keywords, 3);
        assert_eq!(classifier.summary_max_length, 50);
    }

    #[test]
    fn classifier_config_ignores_empty_keyword_list() {
        let config = AppConfig {
            highlight_keywords: Some(vec![]),
            ..Default::default()
        };
        assert!(!config.classifier_config().highlight_keywords.is_empty());
    }

    #[test]
    fn toml_round_trip() {
        let config = AppConfig {
            api_key: Some("key".to_string()),
            language: Some("ko-KR".to_string()),
            chunk_seconds: Some(8),
            highlight_keywords: Some(vec!["중요".to_string(), "시험".to_string()]),
            ..Default::default()
        };

        let serialized = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&serialized).unwrap();

        assert_eq!(parsed.api_key, config.api_key);
        assert_eq!(parsed.chunk_seconds, config.chunk_seconds);
        assert_eq!(parsed.highlight_keywords, config.highlight_keywords);
    }
}
