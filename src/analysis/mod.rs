//! Aggregation queries, scalar functions, and result collection.

pub mod collect;
pub mod functions;
pub mod queries;

pub use collect::{collect_label_counts, LabelCount};
pub use queries::{hourly_activity, sentiment_distribution, top_hashtags};
