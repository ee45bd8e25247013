use std::path::PathBuf;
use std::time::Duration;

use skinwise_analysis::api::AnalysisConfig;
use skinwise_core::catalog::Catalog;
use skinwise_core::error::CoreError;

/// Default pause between entering the recommendations step and showing
/// results.
pub const DEFAULT_RECOMMENDATION_DELAY_MS: u64 = 1500;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} must be {expected}, got '{value}'")]
    Invalid {
        var: &'static str,
        expected: &'static str,
        value: String,
    },

    #[error("Failed to read catalog {path}: {source}")]
    CatalogIo {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Catalog(#[from] CoreError),
}

/// Wizard configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development.
#[derive(Debug, Clone)]
pub struct WizardConfig {
    pub analysis: AnalysisConfig,
    /// Pacing delay before recommendations are shown.
    pub recommendation_delay: Duration,
    /// Catalog file replacing the embedded one.
    pub catalog_path: Option<PathBuf>,
}

impl Default for WizardConfig {
    fn default() -> Self {
        Self {
            analysis: AnalysisConfig::default(),
            recommendation_delay: Duration::from_millis(DEFAULT_RECOMMENDATION_DELAY_MS),
            catalog_path: None,
        }
    }
}

impl WizardConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                   | Default                 |
    /// |---------------------------|-------------------------|
    /// | `ANALYSIS_API_URL`        | `http://localhost:8000` |
    /// | `ANALYSIS_TIMEOUT_SECS`   | `30`                    |
    /// | `RECOMMENDATION_DELAY_MS` | `1500`                  |
    /// | `CATALOG_PATH`            | embedded catalog        |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let api_url = lookup("ANALYSIS_API_URL")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.analysis.api_url);

        let timeout = match lookup("ANALYSIS_TIMEOUT_SECS") {
            Some(value) => {
                let secs = parse_u64("ANALYSIS_TIMEOUT_SECS", &value)?;
                if secs == 0 {
                    return Err(ConfigError::Invalid {
                        var: "ANALYSIS_TIMEOUT_SECS",
                        expected: "a positive number of seconds",
                        value,
                    });
                }
                Duration::from_secs(secs)
            }
            None => defaults.analysis.timeout,
        };

        let recommendation_delay = match lookup("RECOMMENDATION_DELAY_MS") {
            Some(value) => Duration::from_millis(parse_u64("RECOMMENDATION_DELAY_MS", &value)?),
            None => defaults.recommendation_delay,
        };

        let catalog_path = lookup("CATALOG_PATH")
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            analysis: AnalysisConfig { api_url, timeout },
            recommendation_delay,
            catalog_path,
        })
    }

    /// Load the configured catalog, or the embedded one.
    pub fn load_catalog(&self) -> Result<Catalog, ConfigError> {
        match &self.catalog_path {
            Some(path) => {
                let json = std::fs::read_to_string(path).map_err(|source| ConfigError::CatalogIo {
                    path: path.clone(),
                    source,
                })?;
                Ok(Catalog::from_json(&json)?)
            }
            None => Ok(Catalog::builtin()?),
        }
    }
}

fn parse_u64(var: &'static str, value: &str) -> Result<u64, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Invalid {
        var,
        expected: "a non-negative integer",
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use assert_matches::assert_matches;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = WizardConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.analysis.api_url, "http://localhost:8000");
        assert_eq!(config.analysis.timeout, Duration::from_secs(30));
        assert_eq!(config.recommendation_delay, Duration::from_millis(1500));
        assert!(config.catalog_path.is_none());
    }

    #[test]
    fn overrides_are_parsed() {
        let config = WizardConfig::from_lookup(lookup(&[
            ("ANALYSIS_API_URL", " http://analysis:9000 "),
            ("ANALYSIS_TIMEOUT_SECS", "5"),
            ("RECOMMENDATION_DELAY_MS", "0"),
            ("CATALOG_PATH", "/etc/skinwise/catalog.json"),
        ]))
        .unwrap();
        assert_eq!(config.analysis.api_url, "http://analysis:9000");
        assert_eq!(config.analysis.timeout, Duration::from_secs(5));
        assert_eq!(config.recommendation_delay, Duration::ZERO);
        assert_eq!(
            config.catalog_path,
            Some(PathBuf::from("/etc/skinwise/catalog.json"))
        );
    }

    #[test]
    fn invalid_numbers_are_rejected() {
        assert_matches!(
            WizardConfig::from_lookup(lookup(&[("ANALYSIS_TIMEOUT_SECS", "soon")])),
            Err(ConfigError::Invalid { var: "ANALYSIS_TIMEOUT_SECS", .. })
        );
        assert_matches!(
            WizardConfig::from_lookup(lookup(&[("ANALYSIS_TIMEOUT_SECS", "0")])),
            Err(ConfigError::Invalid { .. })
        );
        assert_matches!(
            WizardConfig::from_lookup(lookup(&[("RECOMMENDATION_DELAY_MS", "-1")])),
            Err(ConfigError::Invalid { var: "RECOMMENDATION_DELAY_MS", .. })
        );
    }

    #[test]
    fn embedded_catalog_is_the_default() {
        let catalog = WizardConfig::default().load_catalog().unwrap();
        assert!(!catalog.is_empty());
    }

    #[test]
    fn missing_catalog_file_is_reported() {
        let config = WizardConfig {
            catalog_path: Some(PathBuf::from("/nonexistent/skinwise/catalog.json")),
            ..Default::default()
        };
        assert_matches!(config.load_catalog(), Err(ConfigError::CatalogIo { .. }));
    }
}
