//! Post-Pulse CLI
//!
//! One-shot batch analysis of a social-post dataset in cloud storage.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use post_pulse::{build_runtime, preview_dataset, run_pipeline, Config};

#[derive(Parser)]
#[command(name = "post-pulse")]
#[command(about = "Analyze a social-post dataset: hashtags, sentiment, hourly activity", long_about = None)]
struct Cli {
    /// Path to configuration file (built-in defaults are used if absent)
    #[arg(short, long, default_value = "config.yaml", global = true)]
    config: PathBuf,

    /// Override the number of rows in the hashtag table
    #[arg(long, global = true)]
    top_hashtags: Option<usize>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the analysis pipeline (default if no command specified)
    Run,

    /// Print the first rows of the dataset without running the analysis
    Preview {
        /// Number of rows to print
        #[arg(short, long)]
        rows: Option<usize>,
    },

    /// Validate configuration
    Validate,

    /// Generate a sample configuration file
    GenerateConfig {
        /// Output path for configuration file
        #[arg(short, long, default_value = "config.yaml")]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let cli = Cli::parse();

    match cli.command {
        None | Some(Commands::Run) => {
            run_command(cli.config, cli.top_hashtags)?;
        }

        Some(Commands::Preview { rows }) => {
            preview_command(cli.config, rows)?;
        }

        Some(Commands::Validate) => {
            validate_command(cli.config)?;
        }

        Some(Commands::GenerateConfig { output }) => {
            generate_config_command(output)?;
        }
    }

    Ok(())
}

fn run_command(config_path: PathBuf, top_hashtags: Option<usize>) -> Result<()> {
    let mut config = Config::load_or_default(&config_path)?;

    // Apply overrides
    if let Some(limit) = top_hashtags {
        config.analysis.top_hashtag_limit = limit;
    }

    config.validate()?;

    let runtime = build_runtime(None)?;
    runtime.block_on(async { run_pipeline(config).await })?;

    Ok(())
}

fn preview_command(config_path: PathBuf, rows: Option<usize>) -> Result<()> {
    let config = Config::load_or_default(&config_path)?;
    config.validate()?;

    let rows = rows.unwrap_or(config.analysis.preview_rows);

    let runtime = build_runtime(None)?;
    runtime.block_on(async { preview_dataset(&config, rows).await })
}

fn validate_command(config_path: PathBuf) -> Result<()> {
    let config = Config::from_file(&config_path)?;
    config.validate()?;
    println!("Configuration is valid");
    Ok(())
}

fn generate_config_command(output: PathBuf) -> Result<()> {
    // Generate a commented YAML config
    let yaml = r#"# Post-Pulse Batch Analysis Configuration

# === INPUT: Where to read the post dataset from ===
input:
  # Headerless CSV (gs:// URI or local path). Columns are positional:
  # 0 = sentiment label, 2 = creation timestamp, 3 = post text.
  dataset_url: "gs://macro-nuance-210216/enlarged_sentiment140.csv"

# === OUTPUT: Where results land ===
output:
  # Base location for the three result tables. Each table becomes a
  # directory of CSV part files with a header row; re-runs overwrite.
  tables_url: "gs://macro-nuance-210216/output_proyect/"

  # Destination for the uploaded chart images (handed to gsutil)
  charts_url: "gs://macro-nuance-210216/output/"

# === ANALYSIS ===
analysis:
  # Rows kept in the hashtag frequency table
  top_hashtag_limit: 10

  # Rows printed by the preview command
  preview_rows: 5

# === CHARTS: Local rendering before upload ===
charts:
  # Directory for the intermediate PNG files
  local_dir: "/tmp"

  # Image size in pixels
  width: 800
  height: 500

# === UPLOAD ===
upload:
  # Binary used to copy chart images to object storage
  gsutil_bin: "gsutil"

# === GCS: Connection settings ===
gcs:
  # Skip request signing (for public buckets)
  anonymous: false

  # Path to a service account key JSON file (optional; environment
  # credentials are used when unset)
  # service_account_key_path: "/path/to/key.json"
"#;

    std::fs::write(&output, yaml)?;
    println!("Generated sample configuration at: {}", output.display());

    Ok(())
}
