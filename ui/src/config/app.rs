use super::keys::KeyBindingsConfig;
use super::validation::ConfigValidationError;
use runtime::error::Reporter;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

const MIN_PALETTE_LOAD_TIMEOUT_MS: u64 = 100;
const MAX_PALETTE_LOAD_TIMEOUT_MS: u64 = 120_000;
const MAX_CONCURRENT_TASKS_LIMIT: usize = 64;

/// Top-level application configuration.
///
/// Every field is optional in the file; accessors supply the defaults, so a
/// missing or partial config.toml always yields a working setup.
#[derive(Debug, Deserialize, Default, Clone)]
pub struct AppConfig {
    crossterm_input_listener_interval_ms: Option<u64>,
    crossterm_input_listener_retries: Option<usize>,
    poll_timeout_ms: Option<u64>,
    tick_interval_millis: Option<u64>,
    palette_load_timeout_ms: Option<u64>,
    max_concurrent_tasks: Option<usize>,
    spinner_frame_ms: Option<u64>,

    #[serde(default)]
    sources: SourcesConfig,
    #[serde(default)]
    logging: LoggingConfig,
    #[serde(default)]
    keys: KeyBindingsConfig,
}

impl AppConfig {
    pub fn crossterm_input_listener_interval(&self) -> Duration {
        Duration::from_millis(self.crossterm_input_listener_interval_ms.unwrap_or(10))
    }

    pub fn crossterm_input_listener_retries(&self) -> usize {
        self.crossterm_input_listener_retries.unwrap_or(10)
    }

    pub fn poll_timeout(&self) -> Duration {
        Duration::from_millis(self.poll_timeout_ms.unwrap_or(50))
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_millis.unwrap_or(50))
    }

    /// How long one palette fetch may run before it is abandoned.
    pub fn palette_load_timeout(&self) -> Duration {
        Duration::from_millis(
            self.palette_load_timeout_ms
                .unwrap_or(runtime::loader::DEFAULT_LOAD_TIMEOUT.as_millis() as u64),
        )
    }

    pub fn max_concurrent_tasks(&self) -> usize {
        self.max_concurrent_tasks.unwrap_or(4)
    }

    /// Duration of one busy-spinner animation frame.
    pub fn spinner_frame(&self) -> Duration {
        Duration::from_millis(self.spinner_frame_ms.unwrap_or(120))
    }

    pub fn sources(&self) -> &SourcesConfig {
        &self.sources
    }

    pub fn logging(&self) -> &LoggingConfig {
        &self.logging
    }

    pub fn keys(&self) -> &KeyBindingsConfig {
        &self.keys
    }

    /// Validate the loaded configuration, collecting every problem instead
    /// of stopping at the first.
    pub fn validate(&self) -> Result<(), Vec<ConfigValidationError>> {
        let mut errors = Vec::new();

        if let Some(timeout) = self.palette_load_timeout_ms {
            if !(MIN_PALETTE_LOAD_TIMEOUT_MS..=MAX_PALETTE_LOAD_TIMEOUT_MS).contains(&timeout) {
                errors.push(ConfigValidationError::PaletteLoadTimeout {
                    configured: timeout,
                    min_limit: MIN_PALETTE_LOAD_TIMEOUT_MS,
                    max_limit: MAX_PALETTE_LOAD_TIMEOUT_MS,
                });
            }
        }

        if let Some(tasks) = self.max_concurrent_tasks {
            if tasks == 0 || tasks > MAX_CONCURRENT_TASKS_LIMIT {
                errors.push(ConfigValidationError::MaxConcurrentTasks {
                    configured: tasks,
                    limit: MAX_CONCURRENT_TASKS_LIMIT,
                });
            }
        }

        if let Some(tick) = self.tick_interval_millis {
            if tick == 0 {
                errors.push(ConfigValidationError::TickInterval { configured: tick });
            }
        }

        if let Some(raw) = self.sources.registry_url() {
            if runtime::assets::parse_trusted_origin(raw, &Reporter::log_only()).is_none() {
                errors.push(ConfigValidationError::RegistryUrl {
                    configured: raw.to_string(),
                });
            }
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

/// Where palettes come from.
///
/// `registry_url` names the one remote origin this installation trusts.
/// A workspace override pointing anywhere else is rejected.
#[derive(Debug, Deserialize, Default, Clone)]
pub struct SourcesConfig {
    registry_url: Option<String>,
    themes_dir: Option<String>,
}

impl SourcesConfig {
    pub fn registry_url(&self) -> Option<&str> {
        self.registry_url.as_deref().filter(|url| !url.is_empty())
    }

    pub fn themes_dir(&self) -> Option<PathBuf> {
        self.themes_dir
            .as_deref()
            .filter(|dir| !dir.is_empty())
            .map(PathBuf::from)
    }
}

/// Logging configuration
#[derive(Debug, Deserialize, Default, Clone)]
pub struct LoggingConfig {
    level: Option<String>,
    file: Option<String>,
}

impl LoggingConfig {
    pub fn level(&self) -> String {
        self.level.clone().unwrap_or_else(|| "info".to_string())
    }

    pub fn file(&self) -> Option<String> {
        self.file.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use claims::{assert_err, assert_ok};

    #[test]
    fn empty_config_gets_defaults_from_accessors() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.crossterm_input_listener_retries(), 10);
        assert_eq!(config.poll_timeout(), Duration::from_millis(50));
        assert_eq!(config.tick_interval(), Duration::from_millis(50));
        assert_eq!(config.palette_load_timeout(), Duration::from_millis(10_000));
        assert_eq!(config.max_concurrent_tasks(), 4);
        assert!(config.sources().registry_url().is_none());
        assert!(config.sources().themes_dir().is_none());
        assert_eq!(config.logging().level(), "info");
    }

    #[test]
    fn empty_config_validates_clean() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_ok!(config.validate());
    }

    #[test]
    fn out_of_range_values_collect_into_errors() {
        let config: AppConfig = toml::from_str(
            r#"
tick_interval_millis = 0
palette_load_timeout_ms = 5
max_concurrent_tasks = 0
"#,
        )
        .unwrap();
        let errors = assert_err!(config.validate());
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn bad_registry_url_is_a_validation_error() {
        let config: AppConfig = toml::from_str(
            r#"
[sources]
registry_url = "http://themes.example.org/"
"#,
        )
        .unwrap();
        let errors = assert_err!(config.validate());
        assert!(matches!(
            errors.as_slice(),
            [ConfigValidationError::RegistryUrl { .. }]
        ));
    }

    #[test]
    fn loopback_http_registry_url_is_accepted() {
        let config: AppConfig = toml::from_str(
            r#"
[sources]
registry_url = "http://localhost:8080/palettes/"
"#,
        )
        .unwrap();
        assert_ok!(config.validate());
    }

    #[test]
    fn empty_registry_url_reads_as_unset() {
        let config: AppConfig = toml::from_str(
            r#"
[sources]
registry_url = ""
"#,
        )
        .unwrap();
        assert!(config.sources().registry_url().is_none());
        assert_ok!(config.validate());
    }
}
