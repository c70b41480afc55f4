//! Load the post dataset CSV into a dataframe.
//!
//! The dataset is headerless and consumed positionally: column 0 is the
//! sentiment label, column 2 the creation timestamp, column 3 the post text.
//! The schema is inferred by the CSV reader; the projection below names the
//! columns and normalizes their types.

use anyhow::{Context, Result};
use datafusion::arrow::datatypes::DataType;
use datafusion::prelude::{cast, col, CsvReadOptions, DataFrame, SessionContext};

/// Load the dataset from `location` (gs:// URI or local path) and project it
/// to the `(sentiment, created_at, text)` columns the analyses consume.
///
/// The sentiment label is cast to a string so integer-encoded polarities
/// group the same way as text labels. The timestamp is cast to a string as
/// well: when the reader infers a timestamp column, the cast yields the
/// ISO `YYYY-MM-DDTHH:MM:SS` form, which the hour extraction accepts.
pub async fn load_posts(ctx: &SessionContext, location: &str) -> Result<DataFrame> {
    let df = ctx
        .read_csv(location, CsvReadOptions::new().has_header(false))
        .await
        .with_context(|| format!("Failed to load post dataset from {}", location))?;

    // Headerless columns are named column_1..column_N by the reader.
    let df = df
        .select(vec![
            cast(col("column_1"), DataType::Utf8).alias("sentiment"),
            cast(col("column_3"), DataType::Utf8).alias("created_at"),
            cast(col("column_4"), DataType::Utf8).alias("text"),
        ])
        .context("Post dataset has fewer than four columns")?;

    Ok(df)
}
