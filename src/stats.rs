//! Run statistics for the batch pipeline.

use std::time::Duration;

/// Counters and stage timings from a pipeline run.
#[derive(Debug, Default)]
pub struct RunStats {
    /// Result tables written to the output location
    pub tables_written: usize,

    /// Chart images rendered to local disk
    pub charts_rendered: usize,

    /// Chart images successfully copied to object storage
    pub uploads_completed: usize,

    /// Chart uploads that failed (logged, not fatal)
    pub uploads_failed: usize,

    /// Time spent loading and projecting the dataset
    pub load_time: Duration,

    /// Time spent executing and writing the result tables
    pub write_time: Duration,

    /// Time spent collecting results into local memory
    pub collect_time: Duration,

    /// Time spent rendering chart images
    pub render_time: Duration,

    /// Time spent uploading chart images
    pub upload_time: Duration,

    /// Wall-clock time for the whole run
    pub total_time: Duration,
}

impl std::fmt::Display for RunStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Tables: {}, Charts: {}, Uploads: {} ok / {} failed, Total: {:.1}s \
             (load {:.1}s, write {:.1}s, collect {:.1}s, render {:.1}s, upload {:.1}s)",
            self.tables_written,
            self.charts_rendered,
            self.uploads_completed,
            self.uploads_failed,
            self.total_time.as_secs_f64(),
            self.load_time.as_secs_f64(),
            self.write_time.as_secs_f64(),
            self.collect_time.as_secs_f64(),
            self.render_time.as_secs_f64(),
            self.upload_time.as_secs_f64(),
        )
    }
}
