use anyhow::{Context, Result};
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use crate::config::{get_config_path, validate_config, Config, InferenceConfig};
use crate::scoring::WeightMap;

/// Prompt user with a message and return their trimmed input.
fn prompt(message: &str) -> Result<String> {
    print!("{}", message);
    std::io::stdout()
        .flush()
        .context("Failed to flush stdout")?;
    let mut input = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut input)
        .context("Failed to read input")?;
    Ok(input.trim().to_string())
}

/// Prompt user with a message and a default value. Returns default if input is empty.
fn prompt_with_default(message: &str, default: &str) -> Result<String> {
    let input = prompt(&format!("{} [{}]: ", message, default))?;
    if input.is_empty() {
        Ok(default.to_string())
    } else {
        Ok(input)
    }
}

/// Prompt user with a yes/no question. Returns bool based on input and default.
fn prompt_yes_no(message: &str, default_yes: bool) -> Result<bool> {
    let hint = if default_yes { "Y/n" } else { "y/N" };
    let input = prompt(&format!("{} [{}]: ", message, hint))?;
    let input = input.to_lowercase();
    if input.is_empty() {
        Ok(default_yes)
    } else {
        Ok(input == "y" || input == "yes")
    }
}

/// Serialize `config` as YAML at `path`, creating parent directories.
pub fn write_config(config: &Config, path: &Path) -> Result<()> {
    let yaml = serde_saphyr::to_string(config)
        .map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    std::fs::write(path, &yaml)
        .with_context(|| format!("Failed to write config to {}", path.display()))
}

/// Run the interactive init wizard to create a config file.
///
/// If `default_path` is Some, uses that as the config file path.
/// Otherwise, prompts the user with the default config path.
pub fn run_init_wizard(default_path: Option<PathBuf>) -> Result<()> {
    println!();
    println!("wellscan configuration");
    println!("======================");
    println!();

    let defaults = InferenceConfig::default();

    println!("All inference services share one host; each listens on its own port.");
    let host = loop {
        let input = prompt_with_default("Inference host", &defaults.host)?;
        if input.starts_with("http://") || input.starts_with("https://") {
            break input;
        }
        println!("  Invalid: must start with http:// or https://. Try again.");
    };

    println!();
    println!("Without a thermal sensor its 20% share moves to skin and posture.");
    let thermal_enabled = prompt_yes_no("Is a thermal sensor connected?", false)?;
    let weights = WeightMap::for_hardware(thermal_enabled);
    println!(
        "  Weights: skin {:.2}, posture {:.2}, eyes {:.2}, thermal {:.2}",
        weights.skin, weights.posture, weights.eyes, weights.thermal
    );

    println!();
    println!("Each service gets this long to answer before it is reported as timed out.");
    let timeout = loop {
        let input = prompt_with_default("Per-service timeout", &defaults.timeout)?;
        match humantime::parse_duration(&input) {
            Ok(d) if !d.is_zero() => break input,
            Ok(_) => println!("  Invalid: must be greater than zero. Try again."),
            Err(e) => println!("  Invalid: {}. Try again.", e),
        }
    };

    let config = Config {
        thermal_enabled,
        inference: InferenceConfig {
            host,
            timeout,
            ..defaults
        },
    };

    if let Err(errors) = validate_config(&config) {
        anyhow::bail!("Generated config is invalid: {}", errors.join("; "));
    }

    let default_config_path = default_path.unwrap_or_else(get_config_path);
    println!();
    let path_str = prompt_with_default(
        "Where should the config be saved?",
        &default_config_path.display().to_string(),
    )?;
    let config_path = PathBuf::from(&path_str);

    if config_path.exists() {
        let overwrite = prompt_yes_no(
            &format!(
                "Config already exists at {}. Overwrite?",
                config_path.display()
            ),
            false,
        )?;
        if !overwrite {
            println!("Aborted.");
            return Ok(());
        }
    }

    write_config(&config, &config_path)?;

    println!();
    println!("Config written to {}", config_path.display());
    println!("Ports and paths per service can be edited in the file directly.");
    println!("Run `wellscan health` to check the services, then `wellscan` to analyze.");

    Ok(())
}
