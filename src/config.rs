//! Configuration for the batch analysis pipeline.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration for the analysis pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Input configuration
    #[serde(default)]
    pub input: InputConfig,

    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,

    /// Analysis configuration
    #[serde(default)]
    pub analysis: AnalysisConfig,

    /// Chart rendering configuration
    #[serde(default)]
    pub charts: ChartsConfig,

    /// Chart upload configuration
    #[serde(default)]
    pub upload: UploadConfig,

    /// Google Cloud Storage connection settings
    #[serde(default)]
    pub gcs: GcsConfig,
}

/// Input data configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    /// Location of the post dataset CSV (gs:// URI or local path).
    /// Headerless, comma-delimited; columns are consumed positionally.
    #[serde(default = "default_dataset_url")]
    pub dataset_url: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            dataset_url: default_dataset_url(),
        }
    }
}

fn default_dataset_url() -> String {
    "gs://macro-nuance-210216/enlarged_sentiment140.csv".to_string()
}

/// Output locations for result tables and chart images.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Base location for the three result tables (gs:// URI or local path).
    /// Each table is written as a directory of CSV part files with a header.
    #[serde(default = "default_tables_url")]
    pub tables_url: String,

    /// Destination for the uploaded chart images (passed to gsutil as-is)
    #[serde(default = "default_charts_url")]
    pub charts_url: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            tables_url: default_tables_url(),
            charts_url: default_charts_url(),
        }
    }
}

fn default_tables_url() -> String {
    "gs://macro-nuance-210216/output_proyect/".to_string()
}

fn default_charts_url() -> String {
    "gs://macro-nuance-210216/output/".to_string()
}

/// Analysis tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Number of rows kept in the hashtag frequency table
    #[serde(default = "default_top_hashtag_limit")]
    pub top_hashtag_limit: usize,

    /// Number of rows printed by the preview command
    #[serde(default = "default_preview_rows")]
    pub preview_rows: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            top_hashtag_limit: default_top_hashtag_limit(),
            preview_rows: default_preview_rows(),
        }
    }
}

fn default_top_hashtag_limit() -> usize {
    10
}

fn default_preview_rows() -> usize {
    5
}

/// Chart rendering configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartsConfig {
    /// Local directory where chart PNGs are written before upload
    #[serde(default = "default_chart_dir")]
    pub local_dir: PathBuf,

    /// Chart width in pixels
    #[serde(default = "default_chart_width")]
    pub width: u32,

    /// Chart height in pixels
    #[serde(default = "default_chart_height")]
    pub height: u32,
}

impl Default for ChartsConfig {
    fn default() -> Self {
        Self {
            local_dir: default_chart_dir(),
            width: default_chart_width(),
            height: default_chart_height(),
        }
    }
}

fn default_chart_dir() -> PathBuf {
    PathBuf::from("/tmp")
}

fn default_chart_width() -> u32 {
    800
}

fn default_chart_height() -> u32 {
    500
}

/// Chart upload configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Binary used to copy chart images to object storage
    #[serde(default = "default_gsutil_bin")]
    pub gsutil_bin: String,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            gsutil_bin: default_gsutil_bin(),
        }
    }
}

fn default_gsutil_bin() -> String {
    "gsutil".to_string()
}

/// Google Cloud Storage connection settings.
///
/// Credentials are resolved from the environment (GOOGLE_SERVICE_ACCOUNT,
/// application default credentials) unless a key path is given here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GcsConfig {
    /// Skip request signing (for public buckets)
    #[serde(default)]
    pub anonymous: bool,

    /// Path to a service account key JSON file
    #[serde(default)]
    pub service_account_key_path: Option<String>,
}

impl Config {
    /// Load configuration from a YAML or JSON file.
    /// Format is auto-detected from file extension (.yaml, .yml, or .json).
    pub fn from_file(path: &PathBuf) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

        let config: Config = match ext {
            "yaml" | "yml" => serde_yaml::from_str(&contents)?,
            "json" => serde_json::from_str(&contents)?,
            _ => {
                // YAML is a superset of JSON
                serde_yaml::from_str(&contents)?
            }
        };
        Ok(config)
    }

    /// Load configuration from a file, falling back to built-in defaults
    /// when the file does not exist.
    pub fn load_or_default(path: &PathBuf) -> anyhow::Result<Self> {
        if path.exists() {
            Self::from_file(path)
        } else {
            tracing::info!(
                "No configuration file at {}, using built-in defaults",
                path.display()
            );
            Ok(Self::default())
        }
    }

    /// Load configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> anyhow::Result<Self> {
        let config: Config = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Serialize configuration to YAML.
    pub fn to_yaml(&self) -> anyhow::Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.input.dataset_url.is_empty() {
            anyhow::bail!("input.dataset_url must not be empty");
        }
        if self.output.tables_url.is_empty() {
            anyhow::bail!("output.tables_url must not be empty");
        }
        if self.output.charts_url.is_empty() {
            anyhow::bail!("output.charts_url must not be empty");
        }
        if self.analysis.top_hashtag_limit == 0 {
            anyhow::bail!("analysis.top_hashtag_limit must be > 0");
        }
        if self.analysis.preview_rows == 0 {
            anyhow::bail!("analysis.preview_rows must be > 0");
        }
        if self.charts.width == 0 || self.charts.height == 0 {
            anyhow::bail!("Chart dimensions must be > 0");
        }
        if self.upload.gsutil_bin.is_empty() {
            anyhow::bail!("upload.gsutil_bin must not be empty");
        }
        Ok(())
    }
}
