//! Config command handler

use crate::application::ports::ConfigStore;
use crate::domain::config::AppConfig;
use crate::domain::error::ConfigError;

use super::args::{is_valid_config_key, ConfigAction, VALID_CONFIG_KEYS};
use super::presenter::Presenter;

/// Handle config subcommand
pub async fn handle_config_command<S: ConfigStore>(
    action: ConfigAction,
    store: &S,
    presenter: &Presenter,
) -> Result<(), ConfigError> {
    match action {
        ConfigAction::Init => handle_init(store, presenter).await,
        ConfigAction::Set { key, value } => handle_set(store, presenter, &key, &value).await,
        ConfigAction::Get { key } => handle_get(store, presenter, &key).await,
        ConfigAction::List => handle_list(store, presenter).await,
        ConfigAction::Path => handle_path(store, presenter),
    }
}

async fn handle_init<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    store.init().await?;
    presenter.success(&format!(
        "Config file created at: {}",
        store.path().display()
    ));
    Ok(())
}

async fn handle_set<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
    value: &str,
) -> Result<(), ConfigError> {
    if !is_valid_config_key(key) {
        return Err(ConfigError::ValidationError {
            key: key.to_string(),
            message: format!("Unknown key. Valid keys: {}", VALID_CONFIG_KEYS.join(", ")),
        });
    }

    let mut config = store.load().await?;
    apply_value(&mut config, key, value)?;
    store.save(&config).await?;
    presenter.success(&format!("{} = {}", key, value));

    Ok(())
}

fn apply_value(config: &mut AppConfig, key: &str, value: &str) -> Result<(), ConfigError> {
    match key {
        "api_key" => config.api_key = Some(value.to_string()),
        "language" => config.language = Some(value.to_string()),
        "store_dir" => config.store_dir = Some(value.to_string()),
        "chunk_seconds" => {
            config.chunk_seconds = Some(parse_number(key, value)?);
        }
        "audio_emphasis_threshold" => {
            let threshold: u8 = parse_number(key, value)?;
            if threshold > 100 {
                return Err(ConfigError::ValidationError {
                    key: key.to_string(),
                    message: "Value must be between 0 and 100".to_string(),
                });
            }
            config.audio_emphasis_threshold = Some(threshold);
        }
        "max_keywords" => {
            config.max_keywords = Some(parse_number(key, value)?);
        }
        "summary_max_length" => {
            config.summary_max_length = Some(parse_number(key, value)?);
        }
        "highlight_keywords" => {
            let keywords: Vec<String> = value
                .split(',')
                .map(str::trim)
                .filter(|k| !k.is_empty())
                .map(str::to_string)
                .collect();
            if keywords.is_empty() {
                return Err(ConfigError::ValidationError {
                    key: key.to_string(),
                    message: "Value must be a comma-separated keyword list".to_string(),
                });
            }
            config.highlight_keywords = Some(keywords);
        }
        _ => unreachable!(), // Already validated
    }
    Ok(())
}

fn parse_number<N: std::str::FromStr>(key: &str, value: &str) -> Result<N, ConfigError> {
    value.parse().map_err(|_| ConfigError::ValidationError {
        key: key.to_string(),
        message: "Value must be a number".to_string(),
    })
}

async fn handle_get<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
) -> Result<(), ConfigError> {
    if !is_valid_config_key(key) {
        return Err(ConfigError::UnknownKey(key.to_string()));
    }

    let config = store.load().await?;
    presenter.key_value(key, &display_value(&config, key));
    Ok(())
}

async fn handle_list<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    let config = store.load().await?;
    for key in VALID_CONFIG_KEYS {
        presenter.key_value(key, &display_value(&config, key));
    }
    Ok(())
}

fn handle_path<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    presenter.output(&store.path().display().to_string());
    Ok(())
}

fn display_value(config: &AppConfig, key: &str) -> String {
    const UNSET: &str = "(not set)";
    match key {
        "api_key" => config
            .api_key
            .as_ref()
            .map(|_| "(set)".to_string())
            .unwrap_or_else(|| UNSET.to_string()),
        "language" => config.language.clone().unwrap_or_else(|| UNSET.to_string()),
        "store_dir" => config.store_dir.clone().unwrap_or_else(|| UNSET.to_string()),
        "chunk_seconds" => display_option(&config.chunk_seconds),
        "audio_emphasis_threshold" => display_option(&config.audio_emphasis_threshold),
        "max_keywords" => display_option(&config.max_keywords),
        "summary_max_length" => display_option(&config.summary_max_length),
        "highlight_keywords" => config
            .highlight_keywords
            .as_ref()
            .map(|keywords| keywords.join(", "))
            .unwrap_or_else(|| UNSET.to_string()),
        _ => UNSET.to_string(),
    }
}

fn display_option<T: std::fmt::Display>(value: &Option<T>) -> String {
    value
        .as_ref()
        .map(|v| v.to_string())
        .unwrap_or_else(|| "(not set)".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_string_values() {
        let mut config = AppConfig::empty();
        apply_value(&mut config, "api_key", "secret").unwrap();
        apply_value(&mut config, "language", "en-US").unwrap();
        assert_eq!(config.api_key, Some("secret".to_string()));
        assert_eq!(config.language, Some("en-US".to_string()));
    }

    #[test]
    fn apply_numeric_values() {
        let mut config = AppConfig::empty();
        apply_value(&mut config, "chunk_seconds", "8").unwrap();
        apply_value(&mut config, "max_keywords", "3").unwrap();
        assert_eq!(config.chunk_seconds, Some(8));
        assert_eq!(config.max_keywords, Some(3));
    }

    #[test]
    fn apply_rejects_bad_number() {
        let mut config = AppConfig::empty();
        let err = apply_value(&mut config, "chunk_seconds", "soon").unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError { .. }));
    }

    #[test]
    fn threshold_must_stay_on_scale() {
        let mut config = AppConfig::empty();
        apply_value(&mut config, "audio_emphasis_threshold", "85").unwrap();
        assert_eq!(config.audio_emphasis_threshold, Some(85));

        let err = apply_value(&mut config, "audio_emphasis_threshold", "120").unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError { .. }));
    }

    #[test]
    fn keyword_list_splits_on_commas() {
        let mut config = AppConfig::empty();
        apply_value(&mut config, "highlight_keywords", "중요, 시험 ,핵심").unwrap();
        assert_eq!(
            config.highlight_keywords,
            Some(vec![
                "중요".to_string(),
                "시험".to_string(),
                "핵심".to_string()
            ])
        );
    }

    #[test]
    fn empty_keyword_list_is_rejected() {
        let mut config = AppConfig::empty();
        let err = apply_value(&mut config, "highlight_keywords", " , ").unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError { .. }));
    }

    #[test]
    fn api_key_is_masked_in_display() {
        let config = AppConfig {
            api_key: Some("secret".to_string()),
            ..Default::default()
        };
        assert_eq!(display_value(&config, "api_key"), "(set)");
        assert_eq!(display_value(&AppConfig::empty(), "api_key"), "(not set)");
    }
}
