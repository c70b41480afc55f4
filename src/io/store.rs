//! Object store configuration for Google Cloud Storage and local filesystem access.
//!
//! GCS clients are registered on the DataFusion session so gs:// URIs resolve
//! directly in read and write plans.

use anyhow::{Context, Result};
use datafusion::prelude::SessionContext;
use object_store::gcp::GoogleCloudStorageBuilder;
use object_store::{BackoffConfig, ClientOptions, ObjectStore, RetryConfig};
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

use crate::config::{Config, GcsConfig};

/// Parse a GCS URI into bucket and key components.
///
/// Accepts URIs in the format `gs://bucket/key/path`.
///
/// # Returns
/// A tuple of (bucket, key) on success.
///
/// # Errors
/// Returns an error if the URI is malformed (missing scheme, bucket, or key).
pub fn parse_gs_uri(uri: &str) -> Result<(&str, &str)> {
    let without_scheme = uri
        .strip_prefix("gs://")
        .with_context(|| format!("Invalid GCS URI: expected 'gs://' prefix in '{}'", uri))?;

    without_scheme
        .split_once('/')
        .with_context(|| format!("Invalid GCS URI: expected 'gs://bucket/key' format in '{}'", uri))
}

/// Check whether a location string refers to Google Cloud Storage.
pub fn is_gcs_uri(location: &str) -> bool {
    location.starts_with("gs://")
}

/// Client options for batch reads of a single large object.
fn create_client_options() -> ClientOptions {
    ClientOptions::new()
        // Connection timeout: how long to wait for a connection to be established
        .with_connect_timeout(Duration::from_secs(5))
        // Request timeout: total time allowed for a request including retries
        .with_timeout(Duration::from_secs(60))
        // Pool idle timeout: how long to keep idle connections in the pool
        .with_pool_idle_timeout(Duration::from_secs(90))
}

/// Retry configuration for transient failures.
fn create_retry_config() -> RetryConfig {
    RetryConfig {
        // Maximum number of retries per request
        max_retries: 3,
        // Initial backoff (doubles each retry)
        backoff: BackoffConfig {
            init_backoff: Duration::from_millis(100),
            max_backoff: Duration::from_secs(10),
            base: 2.0,
        },
        // Retry on 429 (rate limiting) and 5xx (server errors)
        retry_timeout: Duration::from_secs(120),
    }
}

/// Create a GCS client for the given bucket.
///
/// Credentials are loaded from (in order):
/// - `gcs.service_account_key_path` from the configuration, if set
/// - Environment variables (GOOGLE_SERVICE_ACCOUNT, GOOGLE_SERVICE_ACCOUNT_KEY)
/// - Application default credentials
///
/// With `gcs.anonymous` set, request signing is skipped entirely (public buckets).
pub fn create_gcs_store(bucket: &str, gcs: &GcsConfig) -> Result<Arc<dyn ObjectStore>> {
    tracing::info!("Creating GCS client for bucket: {}", bucket);

    let mut builder = GoogleCloudStorageBuilder::from_env()
        .with_bucket_name(bucket)
        .with_client_options(create_client_options())
        .with_retry(create_retry_config());

    if gcs.anonymous {
        builder = builder.with_skip_signature(true);
    }
    if let Some(key_path) = &gcs.service_account_key_path {
        builder = builder.with_service_account_path(key_path);
    }

    Ok(Arc::new(builder.build()?))
}

/// Register a GCS store for every bucket the configuration touches through
/// the dataframe engine (dataset input and table output).
///
/// Chart uploads go through gsutil and need no registered store.
pub fn register_gcs_stores(ctx: &SessionContext, config: &Config) -> Result<()> {
    let mut buckets = BTreeSet::new();
    for location in [&config.input.dataset_url, &config.output.tables_url] {
        if is_gcs_uri(location) {
            let (bucket, _) = parse_gs_uri(location)?;
            buckets.insert(bucket.to_string());
        }
    }

    for bucket in buckets {
        let store = create_gcs_store(&bucket, &config.gcs)?;
        let url = Url::parse(&format!("gs://{}", bucket))
            .with_context(|| format!("Invalid bucket name: {}", bucket))?;
        ctx.register_object_store(&url, store);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_gs_uri() {
        let (bucket, key) = parse_gs_uri("gs://my-bucket/path/to/file.csv").unwrap();
        assert_eq!(bucket, "my-bucket");
        assert_eq!(key, "path/to/file.csv");

        let (bucket, key) =
            parse_gs_uri("gs://macro-nuance-210216/enlarged_sentiment140.csv").unwrap();
        assert_eq!(bucket, "macro-nuance-210216");
        assert_eq!(key, "enlarged_sentiment140.csv");

        // Trailing-slash prefix
        let (bucket, key) = parse_gs_uri("gs://macro-nuance-210216/output_proyect/").unwrap();
        assert_eq!(bucket, "macro-nuance-210216");
        assert_eq!(key, "output_proyect/");
    }

    #[test]
    fn test_parse_gs_uri_invalid() {
        // Missing scheme
        assert!(parse_gs_uri("bucket/key").is_err());

        // Wrong scheme
        assert!(parse_gs_uri("s3://bucket/key").is_err());

        // Missing key (bucket only)
        assert!(parse_gs_uri("gs://bucket").is_err());
    }

    #[test]
    fn test_is_gcs_uri() {
        assert!(is_gcs_uri("gs://bucket/key"));
        assert!(!is_gcs_uri("/tmp/local/path"));
        assert!(!is_gcs_uri("s3://bucket/key"));
    }

    #[test]
    fn test_create_gcs_store_anonymous() {
        let gcs = GcsConfig {
            anonymous: true,
            service_account_key_path: None,
        };
        let result = create_gcs_store("test-bucket", &gcs);
        assert!(result.is_ok());
    }

    #[test]
    fn test_register_stores_skips_local_paths() {
        let mut config = Config::default();
        config.input.dataset_url = "/tmp/posts.csv".to_string();
        config.output.tables_url = "/tmp/out/".to_string();

        let ctx = SessionContext::new();
        assert!(register_gcs_stores(&ctx, &config).is_ok());
    }
}
