//! Copy chart images to object storage through the gsutil CLI.
//!
//! Uploads are fire-and-forget: a failed copy is logged and counted but
//! never aborts the run.

use std::path::Path;
use tokio::process::Command;

/// Copy a local file to `dest` with `<gsutil_bin> cp <local> <dest>`.
///
/// Returns whether the copy succeeded. Spawn failures and non-zero exit
/// codes are logged as warnings.
pub async fn upload_file(gsutil_bin: &str, local: &Path, dest: &str) -> bool {
    tracing::info!("Uploading {} to {}", local.display(), dest);

    match Command::new(gsutil_bin)
        .arg("cp")
        .arg(local)
        .arg(dest)
        .status()
        .await
    {
        Ok(status) if status.success() => true,
        Ok(status) => {
            tracing::warn!(
                "{} cp {} exited with {}; destination may be stale",
                gsutil_bin,
                local.display(),
                status
            );
            false
        }
        Err(err) => {
            tracing::warn!("Failed to spawn {}: {}", gsutil_bin, err);
            false
        }
    }
}
