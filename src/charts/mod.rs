//! Static chart rendering for the three result tables.
//!
//! Charts are drawn to local PNG files and uploaded separately: bar charts
//! for hashtags and sentiment, a marked line for hourly activity.

use anyhow::{Context, Result};
use plotters::prelude::*;
use plotters::style::full_palette::GREY;
use std::path::{Path, PathBuf};

use crate::analysis::LabelCount;
use crate::config::ChartsConfig;

/// Hashtag frequency chart file name.
pub const TOP_HASHTAGS_CHART: &str = "top_hashtags.png";

/// Sentiment distribution chart file name.
pub const SENTIMENT_CHART: &str = "sentiment_distribution.png";

/// Hourly activity chart file name.
pub const HOURLY_CHART: &str = "activity_by_hour.png";

/// Bar colors cycled across sentiment labels.
const SENTIMENT_PALETTE: [RGBColor; 3] = [GREEN, GREY, RED];

/// Render all three charts into the configured local directory.
/// Returns the paths of the written images, in upload order.
pub fn render_all(
    hashtags: &[LabelCount],
    sentiment: &[LabelCount],
    hourly: &[LabelCount],
    config: &ChartsConfig,
) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(&config.local_dir).with_context(|| {
        format!(
            "Failed to create chart directory {}",
            config.local_dir.display()
        )
    })?;

    let size = (config.width, config.height);
    let paths = vec![
        config.local_dir.join(TOP_HASHTAGS_CHART),
        config.local_dir.join(SENTIMENT_CHART),
        config.local_dir.join(HOURLY_CHART),
    ];

    render_top_hashtags(hashtags, &paths[0], size)?;
    render_sentiment_distribution(sentiment, &paths[1], size)?;
    render_hourly_activity(hourly, &paths[2], size)?;

    Ok(paths)
}

/// Bar chart of the most frequent hashtags, in table order (count descending).
pub fn render_top_hashtags(rows: &[LabelCount], path: &Path, size: (u32, u32)) -> Result<()> {
    let root = BitMapBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE)?;

    let bars = rows.len() as u32;
    let mut chart = ChartBuilder::on(&root)
        .caption(format!("Top {} Hashtags", rows.len()), ("sans-serif", 24))
        .margin(10)
        .x_label_area_size(70)
        .y_label_area_size(60)
        .build_cartesian_2d((0u32..bars).into_segmented(), 0u64..axis_max(rows))?;

    chart
        .configure_mesh()
        .x_labels(rows.len().max(1))
        .x_label_formatter(&|segment| match segment {
            SegmentValue::CenterOf(i) | SegmentValue::Exact(i) => rows
                .get(*i as usize)
                .map(|row| format!("#{}", row.label))
                .unwrap_or_default(),
            SegmentValue::Last => String::new(),
        })
        .x_desc("Hashtag")
        .y_desc("Count")
        .draw()?;

    chart.draw_series(
        Histogram::vertical(&chart)
            .style(BLUE.filled())
            .margin(6)
            .data(
                rows.iter()
                    .enumerate()
                    .map(|(i, row)| (i as u32, row.count)),
            ),
    )?;

    root.present()
        .with_context(|| format!("Failed to write chart image {}", path.display()))?;
    Ok(())
}

/// Bar chart of post counts per sentiment label, one colored bar per label.
pub fn render_sentiment_distribution(
    rows: &[LabelCount],
    path: &Path,
    size: (u32, u32),
) -> Result<()> {
    let root = BitMapBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE)?;

    let bars = rows.len() as u32;
    let mut chart = ChartBuilder::on(&root)
        .caption("Sentiment Distribution", ("sans-serif", 24))
        .margin(10)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d((0u32..bars).into_segmented(), 0u64..axis_max(rows))?;

    chart
        .configure_mesh()
        .x_labels(rows.len().max(1))
        .x_label_formatter(&|segment| match segment {
            SegmentValue::CenterOf(i) | SegmentValue::Exact(i) => rows
                .get(*i as usize)
                .map(|row| row.label.clone())
                .unwrap_or_default(),
            SegmentValue::Last => String::new(),
        })
        .x_desc("Sentiment")
        .y_desc("Count")
        .draw()?;

    for (i, row) in rows.iter().enumerate() {
        let color = SENTIMENT_PALETTE[i % SENTIMENT_PALETTE.len()];
        chart.draw_series(
            Histogram::vertical(&chart)
                .style(color.filled())
                .margin(10)
                .data(std::iter::once((i as u32, row.count))),
        )?;
    }

    root.present()
        .with_context(|| format!("Failed to write chart image {}", path.display()))?;
    Ok(())
}

/// Line chart of post counts across the hours of the day, with point markers.
pub fn render_hourly_activity(rows: &[LabelCount], path: &Path, size: (u32, u32)) -> Result<()> {
    let root = BitMapBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE)?;

    let points = hour_points(rows);
    let mut chart = ChartBuilder::on(&root)
        .caption("Post Activity by Hour", ("sans-serif", 24))
        .margin(10)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(0u32..23u32, 0u64..axis_max(rows))?;

    chart
        .configure_mesh()
        .x_labels(24)
        .x_label_formatter(&|hour| format!("{:02}", hour))
        .x_desc("Hour of the Day")
        .y_desc("Post Count")
        .draw()?;

    chart.draw_series(LineSeries::new(points.iter().copied(), &BLUE))?;
    chart.draw_series(
        points
            .iter()
            .map(|&(hour, count)| Circle::new((hour, count), 3, BLUE.filled())),
    )?;

    root.present()
        .with_context(|| format!("Failed to write chart image {}", path.display()))?;
    Ok(())
}

/// Upper bound for the count axis; at least 1 so an empty table still
/// produces a valid chart.
fn axis_max(rows: &[LabelCount]) -> u64 {
    rows.iter().map(|row| row.count).max().unwrap_or(0).max(1)
}

/// Map hour labels to numeric plot coordinates, dropping any label that is
/// not a valid hour.
fn hour_points(rows: &[LabelCount]) -> Vec<(u32, u64)> {
    rows.iter()
        .filter_map(|row| {
            row.label
                .parse::<u32>()
                .ok()
                .filter(|hour| *hour < 24)
                .map(|hour| (hour, row.count))
        })
        .collect()
}
