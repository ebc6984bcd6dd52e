use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Instant;

use wellscan::analysis::Analyzer;
use wellscan::config::Config;

const EXIT_SUCCESS: i32 = 0;
const EXIT_NO_DATA: i32 = 2;
const EXIT_CONFIG: i32 = 4;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Query every inference service and print the wellness score (default if no subcommand)
    Analyze,
    /// Check the /health endpoint of each inference service
    Health,
    /// Print the active category weights
    Weights,
    /// Create a config file interactively
    Init,
}

#[derive(Parser, Debug)]
#[command(name = "wellscan")]
#[command(about = "Wellness scan gateway: fans out to inference services and aggregates a score", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/wellscan/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Print machine-readable JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Analyze);
    wellscan::logging::init_tracing(cli.verbose);

    let config_path = cli.config.map(PathBuf::from);

    let code = match command {
        Commands::Init => run_init(config_path),
        Commands::Weights => run_weights(config_path, cli.json),
        Commands::Health => run_health(config_path, cli.json).await,
        Commands::Analyze => run_analyze(config_path, cli.json, cli.verbose).await,
    };

    std::process::exit(code);
}

/// Load and validate config, printing problems. Err carries the exit code.
fn load_validated_config(path: Option<PathBuf>) -> Result<Config, i32> {
    let config = match wellscan::config::load_config(path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            return Err(EXIT_CONFIG);
        }
    };

    if let Err(errors) = wellscan::config::validate_config(&config) {
        eprintln!("Config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        return Err(EXIT_CONFIG);
    }

    tracing::debug!(
        host = %config.inference.host,
        thermal_enabled = config.thermal_enabled,
        timeout = %config.inference.timeout,
        "Loaded config"
    );
    Ok(config)
}

fn run_init(config_path: Option<PathBuf>) -> i32 {
    match wellscan::config::init::run_init_wizard(config_path) {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            eprintln!("Init failed: {:#}", e);
            EXIT_CONFIG
        }
    }
}

fn run_weights(config_path: Option<PathBuf>, json: bool) -> i32 {
    let config = match load_validated_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let weights = config.weights();
    if json {
        match serde_json::to_string_pretty(&weights) {
            Ok(s) => println!("{}", s),
            Err(e) => {
                eprintln!("Failed to serialize weights: {}", e);
                return EXIT_CONFIG;
            }
        }
    } else {
        println!("{}", wellscan::output::format_weights(&weights));
    }
    EXIT_SUCCESS
}

async fn run_health(config_path: Option<PathBuf>, json: bool) -> i32 {
    let config = match load_validated_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let client = match wellscan::inference::create_client(&config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{:#}", e);
            return EXIT_CONFIG;
        }
    };

    let results = match wellscan::inference::health_check(&config, &client).await {
        Ok(r) => r,
        Err(e) => {
            eprintln!("{:#}", e);
            return EXIT_CONFIG;
        }
    };

    if json {
        match serde_json::to_string_pretty(&results) {
            Ok(s) => println!("{}", s),
            Err(e) => eprintln!("Failed to serialize health results: {}", e),
        }
    } else {
        let use_colors = wellscan::output::should_use_colors();
        println!("{}", wellscan::output::format_health(&results, use_colors));
    }

    if !results.is_empty() && results.iter().all(|r| !r.healthy) {
        EXIT_NO_DATA
    } else {
        EXIT_SUCCESS
    }
}

async fn run_analyze(config_path: Option<PathBuf>, json: bool, verbose: bool) -> i32 {
    let start_time = Instant::now();
    let config = match load_validated_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let client = match wellscan::inference::create_client(&config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{:#}", e);
            return EXIT_CONFIG;
        }
    };

    let analyzer = match Analyzer::from_config(&config, &client) {
        Ok(a) => a,
        Err(e) => {
            eprintln!("{:#}", e);
            return EXIT_CONFIG;
        }
    };

    let outcome = analyzer.run().await;

    if json {
        match serde_json::to_string_pretty(&outcome) {
            Ok(s) => println!("{}", s),
            Err(e) => eprintln!("Failed to serialize outcome: {}", e),
        }
    } else {
        let use_colors = wellscan::output::should_use_colors();
        println!("{}", wellscan::output::format_outcome(&outcome, use_colors));
    }

    if verbose {
        for c in &outcome.breakdown {
            eprintln!(
                "  {}: {:.2} x {:.2} = {:.2}",
                c.category, c.score, c.weight, c.contribution
            );
        }
        eprintln!("Analysis took {:?}", start_time.elapsed());
    }

    if outcome.has_data() {
        EXIT_SUCCESS
    } else {
        EXIT_NO_DATA
    }
}
