//! Post-Pulse Batch Analysis Pipeline
//!
//! One-shot batch analysis of a social-post dataset in cloud object storage:
//! hashtag frequency, sentiment distribution, and hourly posting activity,
//! with CSV results written back to storage and chart images rendered and
//! uploaded.
//!
//! # Architecture
//!
//! The pipeline runs strictly in sequence on top of DataFusion:
//!
//! - **I/O**: GCS-backed dataset loading and CSV table persistence using object_store
//! - **Analysis**: the three aggregation queries plus the scalar UDFs they use
//! - **Charts**: static PNG rendering of each result table
//! - **Upload**: chart delivery to object storage through the gsutil CLI
//!
//! # Usage
//!
//! ```no_run
//! use post_pulse::{run_pipeline, Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::default();
//!     run_pipeline(config).await?;
//!     Ok(())
//! }
//! ```

pub mod analysis;
pub mod charts;
pub mod config;
pub mod io;
pub mod stats;
pub mod upload;

pub use analysis::{collect_label_counts, LabelCount};
pub use config::Config;
pub use stats::RunStats;

use anyhow::{Context, Result};
use datafusion::prelude::SessionContext;
use std::time::Instant;

/// Run the full batch analysis with the given configuration.
pub async fn run_pipeline(config: Config) -> Result<RunStats> {
    config.validate()?;

    let run_start = Instant::now();
    let mut run_stats = RunStats::default();

    tracing::info!("Starting post-pulse batch analysis");

    let ctx = SessionContext::new();
    io::store::register_gcs_stores(&ctx, &config)?;

    // Load the dataset
    tracing::info!("Loading post dataset from {}", config.input.dataset_url);
    let stage = Instant::now();
    let posts = io::load_posts(&ctx, &config.input.dataset_url).await?;
    tracing::info!("Dataset schema: {}", posts.schema());
    run_stats.load_time = stage.elapsed();

    // Build the three aggregation plans
    tracing::info!("Analyzing hashtags...");
    let top_hashtags =
        analysis::top_hashtags(posts.clone(), config.analysis.top_hashtag_limit)?;

    tracing::info!("Analyzing sentiment distribution...");
    let sentiment = analysis::sentiment_distribution(posts.clone())?;

    tracing::info!("Analyzing activity over time...");
    let hourly = analysis::hourly_activity(posts)?;

    // Persist each result table
    let base = &config.output.tables_url;
    tracing::info!("Saving results to {}", base);
    let stage = Instant::now();
    for (df, table) in [
        (top_hashtags.clone(), io::tables::TOP_HASHTAGS_TABLE),
        (sentiment.clone(), io::tables::SENTIMENT_TABLE),
        (hourly.clone(), io::tables::HOURLY_TABLE),
    ] {
        io::write_table(df, &io::tables::table_url(base, table), &config.gcs).await?;
        run_stats.tables_written += 1;
    }
    run_stats.write_time = stage.elapsed();

    // Pull the results into local memory for charting
    let stage = Instant::now();
    let hashtag_rows = collect_label_counts(top_hashtags).await?;
    let sentiment_rows = collect_label_counts(sentiment).await?;
    let hourly_rows = collect_label_counts(hourly).await?;
    run_stats.collect_time = stage.elapsed();

    // Render the charts
    tracing::info!("Generating visualizations...");
    let stage = Instant::now();
    let chart_paths = charts::render_all(
        &hashtag_rows,
        &sentiment_rows,
        &hourly_rows,
        &config.charts,
    )?;
    run_stats.charts_rendered = chart_paths.len();
    run_stats.render_time = stage.elapsed();

    // Upload the charts
    let stage = Instant::now();
    for path in &chart_paths {
        if upload::upload_file(&config.upload.gsutil_bin, path, &config.output.charts_url).await {
            run_stats.uploads_completed += 1;
        } else {
            run_stats.uploads_failed += 1;
        }
    }
    run_stats.upload_time = stage.elapsed();

    run_stats.total_time = run_start.elapsed();
    tracing::info!("Batch analysis complete: {}", run_stats);

    Ok(run_stats)
}

/// Print the first rows of the configured dataset to standard output.
pub async fn preview_dataset(config: &Config, rows: usize) -> Result<()> {
    config.validate()?;

    let ctx = SessionContext::new();
    io::store::register_gcs_stores(&ctx, config)?;

    let posts = io::load_posts(&ctx, &config.input.dataset_url).await?;
    println!("Dataset schema: {}", posts.schema());

    posts
        .show_limit(rows)
        .await
        .context("Failed to print dataset preview")?;

    Ok(())
}

/// Build a Tokio runtime with the specified configuration.
pub fn build_runtime(worker_threads: Option<usize>) -> Result<tokio::runtime::Runtime> {
    let mut builder = tokio::runtime::Builder::new_multi_thread();

    if let Some(threads) = worker_threads {
        builder.worker_threads(threads);
    }

    builder.enable_all();

    Ok(builder.build()?)
}
