//! Persist aggregation results as CSV tables.
//!
//! Each table is written as a directory of CSV part files with a header row,
//! mirroring how the engine partitions its output. Re-running the pipeline
//! overwrites the destination: existing objects under the prefix are removed
//! before the new part files land.

use anyhow::{Context, Result};
use datafusion::config::CsvOptions;
use datafusion::dataframe::DataFrameWriteOptions;
use datafusion::prelude::DataFrame;
use futures::TryStreamExt;
use object_store::path::Path as ObjectPath;

use crate::config::GcsConfig;
use crate::io::store;

/// Hashtag frequency table name.
pub const TOP_HASHTAGS_TABLE: &str = "top_hashtags.csv";

/// Sentiment distribution table name.
pub const SENTIMENT_TABLE: &str = "sentiment_count.csv";

/// Hourly activity table name.
pub const HOURLY_TABLE: &str = "activity_by_hour.csv";

/// Build the destination URL for a named table under the output base.
///
/// The trailing slash makes the engine treat the destination as a directory
/// of part files rather than a single object.
pub fn table_url(base: &str, table: &str) -> String {
    format!("{}/{}/", base.trim_end_matches('/'), table)
}

/// Write a result dataframe as CSV (with header) to `dest`, replacing any
/// prior contents at that location.
pub async fn write_table(df: DataFrame, dest: &str, gcs: &GcsConfig) -> Result<()> {
    clear_destination(dest, gcs)
        .await
        .with_context(|| format!("Failed to clear prior output at {}", dest))?;

    let mut csv_options = CsvOptions::default();
    csv_options.has_header = Some(true);

    df.write_csv(dest, DataFrameWriteOptions::new(), Some(csv_options))
        .await
        .with_context(|| format!("Failed to write table to {}", dest))?;

    tracing::info!("Wrote table to {}", dest);
    Ok(())
}

/// Remove everything under the destination prefix so a re-run overwrites
/// rather than appends.
async fn clear_destination(dest: &str, gcs: &GcsConfig) -> Result<()> {
    if store::is_gcs_uri(dest) {
        let (bucket, key) = store::parse_gs_uri(dest)?;
        let object_store = store::create_gcs_store(bucket, gcs)?;
        let prefix = ObjectPath::from(key);

        let objects: Vec<_> = object_store
            .list(Some(&prefix))
            .try_collect()
            .await
            .with_context(|| format!("Failed to list objects under {}", dest))?;

        for meta in &objects {
            object_store.delete(&meta.location).await?;
        }
        if !objects.is_empty() {
            tracing::info!("Removed {} stale objects under {}", objects.len(), dest);
        }
    } else {
        let path = std::path::Path::new(dest.trim_end_matches('/'));
        if path.exists() {
            std::fs::remove_dir_all(path)?;
            tracing::info!("Removed stale output directory {}", path.display());
        }
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}
