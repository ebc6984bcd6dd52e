pub mod init;
mod schema;
mod validation;

pub use schema::{Config, HttpMethod, InferenceConfig, SourceEndpoint, SourcesConfig};
pub use validation::validate_config;

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::scoring::WeightMap;

pub const ENV_THERMAL_ENABLED: &str = "WELLSCAN_THERMAL_ENABLED";
pub const ENV_INFERENCE_HOST: &str = "WELLSCAN_INFERENCE_HOST";

/// Get the config directory path (~/.config/wellscan/)
pub fn get_config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("wellscan")
}

/// Get the default config file path (~/.config/wellscan/config.yaml)
pub fn get_config_path() -> PathBuf {
    get_config_dir().join("config.yaml")
}

/// Load configuration from a YAML file, then apply environment overrides.
///
/// A missing file is not an error: the built-in defaults point at a local
/// inference host. A file that exists but cannot be read or parsed is.
pub fn load_config(path: Option<PathBuf>) -> Result<Config> {
    let config_path = path.unwrap_or_else(get_config_path);

    let mut config = if config_path.exists() {
        let config_content = fs::read_to_string(&config_path).with_context(|| {
            format!("Failed to read config file at {}", config_path.display())
        })?;
        parse_config(&config_content).with_context(|| {
            format!(
                "Failed to parse config: invalid YAML in {}",
                config_path.display()
            )
        })?
    } else {
        tracing::debug!(path = %config_path.display(), "No config file, using defaults");
        Config::default()
    };

    apply_env_overrides(&mut config, |key| std::env::var(key).ok())?;
    Ok(config)
}

pub fn parse_config(content: &str) -> Result<Config> {
    let config: Config = serde_saphyr::from_str(content)?;
    Ok(config)
}

/// Apply environment overrides. `lookup` is `std::env::var` in production.
pub fn apply_env_overrides<F>(config: &mut Config, lookup: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(raw) = lookup(ENV_THERMAL_ENABLED) {
        config.thermal_enabled = parse_bool(&raw)
            .with_context(|| format!("{}: expected true/false, got '{}'", ENV_THERMAL_ENABLED, raw))?;
    }
    if let Some(host) = lookup(ENV_INFERENCE_HOST) {
        if !host.trim().is_empty() {
            config.inference.host = host.trim().to_string();
        }
    }
    Ok(())
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

impl Config {
    /// The active weight policy. Derived once and treated as constant.
    pub fn weights(&self) -> WeightMap {
        WeightMap::for_hardware(self.thermal_enabled)
    }
}

impl InferenceConfig {
    pub fn timeout(&self) -> Result<Duration> {
        humantime::parse_duration(self.timeout.trim())
            .with_context(|| format!("Invalid inference.timeout '{}'", self.timeout))
    }

    pub fn health_timeout(&self) -> Result<Duration> {
        humantime::parse_duration(self.health_timeout.trim()).with_context(|| {
            format!("Invalid inference.health_timeout '{}'", self.health_timeout)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::Category;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(!config.thermal_enabled);
        assert_eq!(config.inference.host, "http://127.0.0.1");
        assert_eq!(config.inference.timeout().unwrap(), Duration::from_secs(10));
        assert_eq!(config.inference.sources.get(Category::Skin).port, 8003);
        assert_eq!(config.inference.sources.get(Category::Thermal).path, "/read");
        assert_eq!(
            config.inference.sources.get(Category::Thermal).method,
            HttpMethod::Get
        );
        assert_eq!(config.weights(), WeightMap::THERMAL_DISABLED);
    }

    #[test]
    fn test_empty_config_parse() {
        let config = parse_config("{}").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_config_parse() {
        let yaml = r#"
thermal_enabled: true
inference:
  host: "http://10.0.0.5"
  timeout: "3s"
  sources:
    eyes:
      port: 9005
      path: "/eyes"
"#;
        let config = parse_config(yaml).unwrap();
        assert!(config.thermal_enabled);
        assert_eq!(config.weights(), WeightMap::THERMAL_ENABLED);
        assert_eq!(config.inference.host, "http://10.0.0.5");
        assert_eq!(config.inference.timeout().unwrap(), Duration::from_secs(3));
        assert_eq!(config.inference.sources.eyes.port, 9005);
        assert_eq!(config.inference.sources.eyes.method, HttpMethod::Post);
        // Untouched sources keep their defaults
        assert_eq!(config.inference.sources.skin.port, 8003);
        assert_eq!(config.inference.health_timeout, "2s");
    }

    #[test]
    fn test_unknown_field_rejected() {
        assert!(parse_config("thermal: true").is_err());
    }

    #[test]
    fn test_config_serde_roundtrip() {
        let mut config = Config::default();
        config.thermal_enabled = true;
        config.inference.retries = 2;
        let yaml = serde_saphyr::to_string(&config).unwrap();
        let parsed = parse_config(&yaml).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_env_overrides_thermal() {
        let mut config = Config::default();
        apply_env_overrides(&mut config, env(&[(ENV_THERMAL_ENABLED, "TRUE")])).unwrap();
        assert!(config.thermal_enabled);

        apply_env_overrides(&mut config, env(&[(ENV_THERMAL_ENABLED, "0")])).unwrap();
        assert!(!config.thermal_enabled);
    }

    #[test]
    fn test_env_override_invalid_bool() {
        let mut config = Config::default();
        let result = apply_env_overrides(&mut config, env(&[(ENV_THERMAL_ENABLED, "maybe")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_env_override_host() {
        let mut config = Config::default();
        apply_env_overrides(&mut config, env(&[(ENV_INFERENCE_HOST, "http://jetson.local")]))
            .unwrap();
        assert_eq!(config.inference.host, "http://jetson.local");
    }

    #[test]
    fn test_env_without_overrides_is_noop() {
        let mut config = Config::default();
        apply_env_overrides(&mut config, env(&[])).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(Some(dir.path().join("nope.yaml"))).unwrap();
        assert_eq!(config.inference.sources, SourcesConfig::default());
    }

    #[test]
    fn test_load_config_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "inference:\n  retries: 3\n").unwrap();
        let config = load_config(Some(path)).unwrap();
        assert_eq!(config.inference.retries, 3);
    }

    #[test]
    fn test_load_invalid_yaml_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "inference: [not, a, map").unwrap();
        let err = load_config(Some(path)).unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to parse config"));
    }
}
