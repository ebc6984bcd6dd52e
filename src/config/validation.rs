use std::collections::HashMap;

use super::schema::Config;
use crate::scoring::Category;

/// Validate configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_config(config: &Config) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();
    let inference = &config.inference;

    let host = inference.host.trim();
    if !(host.starts_with("http://") || host.starts_with("https://")) {
        errors.push(format!(
            "inference.host: must start with http:// or https:// (got '{}')",
            inference.host
        ));
    }

    match humantime::parse_duration(inference.timeout.trim()) {
        Ok(d) if d.is_zero() => errors.push("inference.timeout: must be greater than zero".to_string()),
        Ok(_) => {}
        Err(e) => errors.push(format!(
            "inference.timeout: invalid duration '{}' - {}",
            inference.timeout, e
        )),
    }

    match humantime::parse_duration(inference.health_timeout.trim()) {
        Ok(d) if d.is_zero() => {
            errors.push("inference.health_timeout: must be greater than zero".to_string())
        }
        Ok(_) => {}
        Err(e) => errors.push(format!(
            "inference.health_timeout: invalid duration '{}' - {}",
            inference.health_timeout, e
        )),
    }

    // Thermal settings are irrelevant while the sensor is absent
    let mut seen_ports: HashMap<u16, Category> = HashMap::new();
    for category in Category::ALL {
        if category == Category::Thermal && !config.thermal_enabled {
            continue;
        }
        let endpoint = inference.sources.get(category);
        let key = category.key();

        if endpoint.port == 0 {
            errors.push(format!("inference.sources.{}.port: must be non-zero", key));
        } else if let Some(other) = seen_ports.insert(endpoint.port, category) {
            errors.push(format!(
                "inference.sources.{}.port: {} is already used by {}",
                key,
                endpoint.port,
                other.key()
            ));
        }

        if !endpoint.path.starts_with('/') {
            errors.push(format!(
                "inference.sources.{}.path: must start with '/' (got '{}')",
                key, endpoint.path
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
