//! Pull aggregation results out of the engine into plain row vectors.
//!
//! All three result tables share the same shape: a label column followed by
//! an Int64 count column.

use anyhow::{Context, Result};
use datafusion::arrow::array::{Array, Int64Array, StringArray};
use datafusion::arrow::record_batch::RecordBatch;
use datafusion::prelude::DataFrame;

/// One row of a (label, count) result table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelCount {
    /// Group label: hashtag token, sentiment label, or hour of day
    pub label: String,

    /// Number of posts in the group
    pub count: u64,
}

/// Execute a result dataframe and materialize it as label/count rows,
/// preserving the engine's row order.
pub async fn collect_label_counts(df: DataFrame) -> Result<Vec<LabelCount>> {
    let batches = df.collect().await.context("Failed to collect result rows")?;
    rows_from_batches(&batches)
}

fn rows_from_batches(batches: &[RecordBatch]) -> Result<Vec<LabelCount>> {
    let mut rows = Vec::new();

    for batch in batches {
        if batch.num_columns() < 2 {
            anyhow::bail!(
                "Result batch has {} columns, expected label and count",
                batch.num_columns()
            );
        }

        let labels = batch
            .column(0)
            .as_any()
            .downcast_ref::<StringArray>()
            .context("Label column must be a string array")?;
        let counts = batch
            .column(1)
            .as_any()
            .downcast_ref::<Int64Array>()
            .context("Count column must be an int64 array")?;

        for i in 0..batch.num_rows() {
            if labels.is_null(i) {
                continue;
            }
            rows.push(LabelCount {
                label: labels.value(i).to_string(),
                count: counts.value(i).max(0) as u64,
            });
        }
    }

    Ok(rows)
}
