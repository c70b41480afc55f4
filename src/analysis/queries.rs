//! The three aggregation queries over the post dataframe.
//!
//! Each query is a lazy plan; nothing executes until the result is written
//! or collected.

use anyhow::Result;
use datafusion::functions::expr_fn::lower;
use datafusion::functions_aggregate::expr_fn::count;
use datafusion::prelude::{col, lit, DataFrame};

use crate::analysis::functions;

/// Hashtag frequency: first hashtag per post, grouped and counted, empty
/// tokens excluded, top `limit` rows by count descending.
pub fn top_hashtags(posts: DataFrame, limit: usize) -> Result<DataFrame> {
    let hashtag = functions::first_hashtag().call(vec![lower(col("text"))]);

    let df = posts
        .select(vec![hashtag.alias("hashtag")])?
        .aggregate(vec![col("hashtag")], vec![count(lit(1)).alias("count")])?
        .filter(col("hashtag").not_eq(lit("")))?
        .sort(vec![col("count").sort(false, false)])?
        .limit(0, Some(limit))?;

    Ok(df)
}

/// Sentiment distribution: one row per distinct sentiment label with its
/// post count. Row order is left to the engine.
pub fn sentiment_distribution(posts: DataFrame) -> Result<DataFrame> {
    let df = posts.aggregate(vec![col("sentiment")], vec![count(lit(1)).alias("count")])?;

    Ok(df)
}

/// Hourly activity: post count per hour of day ("00".."23"), ascending.
/// Rows whose timestamp does not parse have no hour and are excluded.
pub fn hourly_activity(posts: DataFrame) -> Result<DataFrame> {
    let hour = functions::hour_of_day().call(vec![col("created_at")]);

    let df = posts
        .select(vec![hour.alias("hour")])?
        .filter(col("hour").is_not_null())?
        .aggregate(vec![col("hour")], vec![count(lit(1)).alias("count")])?
        .sort(vec![col("hour").sort(true, false)])?;

    Ok(df)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::collect::collect_label_counts;
    use crate::io::dataset::load_posts;
    use datafusion::prelude::SessionContext;
    use std::io::Write;

    /// The three-row fixture from the pipeline's acceptance checklist.
    const FIXTURE: &[&str] = &[
        r#"0,1001,2009-01-01 00:00:00,no hashtags here"#,
        r#"4,1002,2009-01-01 13:00:00,loving #sun today"#,
        r#"0,1003,2009-01-01 13:05:00,#sun is great"#,
    ];

    async fn fixture_posts(rows: &[&str]) -> (SessionContext, DataFrame, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("posts.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        for row in rows {
            writeln!(file, "{}", row).unwrap();
        }

        let ctx = SessionContext::new();
        let posts = load_posts(&ctx, path.to_string_lossy().as_ref())
            .await
            .unwrap();
        (ctx, posts, dir)
    }

    #[tokio::test]
    async fn test_top_hashtags_counts_first_match_and_drops_empty() {
        let (_ctx, posts, _dir) = fixture_posts(FIXTURE).await;

        let rows = collect_label_counts(top_hashtags(posts, 10).unwrap())
            .await
            .unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].label, "sun");
        assert_eq!(rows[0].count, 2);
        assert!(rows.iter().all(|row| !row.label.is_empty()));
    }

    #[tokio::test]
    async fn test_top_hashtags_is_capped_and_sorted_descending() {
        // 12 distinct hashtags with distinct counts: row i appears i+1 times
        let mut lines = Vec::new();
        for tag in 0..12 {
            for occurrence in 0..=tag {
                lines.push(format!(
                    "0,{},2009-01-01 10:00:00,post #tag{} here",
                    tag * 100 + occurrence,
                    tag
                ));
            }
        }
        let lines: Vec<&str> = lines.iter().map(String::as_str).collect();
        let (_ctx, posts, _dir) = fixture_posts(&lines).await;

        let rows = collect_label_counts(top_hashtags(posts, 10).unwrap())
            .await
            .unwrap();

        assert_eq!(rows.len(), 10);
        assert!(rows.windows(2).all(|pair| pair[0].count >= pair[1].count));
        // The two least frequent tags fell off the end
        assert_eq!(rows[0].label, "tag11");
        assert_eq!(rows[0].count, 12);
        assert!(!rows.iter().any(|row| row.label == "tag0"));
        assert!(!rows.iter().any(|row| row.label == "tag1"));
    }

    #[tokio::test]
    async fn test_hashtags_are_lowercased_before_counting() {
        let rows_input = &[
            r#"0,1,2009-01-01 10:00:00,good morning #Sun"#,
            r#"0,2,2009-01-01 11:00:00,hello #SUN"#,
        ];
        let (_ctx, posts, _dir) = fixture_posts(rows_input).await;

        let rows = collect_label_counts(top_hashtags(posts, 10).unwrap())
            .await
            .unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].label, "sun");
        assert_eq!(rows[0].count, 2);
    }

    #[tokio::test]
    async fn test_sentiment_distribution_sums_to_total() {
        let (_ctx, posts, _dir) = fixture_posts(FIXTURE).await;

        let mut rows = collect_label_counts(sentiment_distribution(posts).unwrap())
            .await
            .unwrap();
        rows.sort_by(|a, b| a.label.cmp(&b.label));

        assert_eq!(rows.len(), 2);
        assert_eq!((rows[0].label.as_str(), rows[0].count), ("0", 2));
        assert_eq!((rows[1].label.as_str(), rows[1].count), ("4", 1));
        assert_eq!(rows.iter().map(|row| row.count).sum::<u64>(), 3);
    }

    #[tokio::test]
    async fn test_hourly_activity_is_ordered_ascending() {
        let (_ctx, posts, _dir) = fixture_posts(FIXTURE).await;

        let rows = collect_label_counts(hourly_activity(posts).unwrap())
            .await
            .unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!((rows[0].label.as_str(), rows[0].count), ("00", 1));
        assert_eq!((rows[1].label.as_str(), rows[1].count), ("13", 2));
    }

    #[tokio::test]
    async fn test_hourly_activity_excludes_malformed_timestamps() {
        let rows_input = &[
            r#"0,1,2009-01-01 08:00:00,morning post"#,
            r#"0,2,not a timestamp,mystery post"#,
        ];
        let (_ctx, posts, _dir) = fixture_posts(rows_input).await;

        let rows = collect_label_counts(hourly_activity(posts).unwrap())
            .await
            .unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!((rows[0].label.as_str(), rows[0].count), ("08", 1));
    }
}
