// Removal of intermediate files after muxing

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::models::LinkJob;

/// Files removed for `job`; the titled output only when the mux failed.
pub fn cleanup_targets(job: &LinkJob, mux_failure: bool) -> Vec<PathBuf> {
    let mut targets = vec![job.single_file(), job.unmuxed_video(), job.unmuxed_audio()];
    if mux_failure {
        targets.push(job.muxed_output());
    }
    targets
}

/// Remove intermediate files of `job`. Absent files are ignored; other
/// removal failures are logged and do not fail the link.
pub async fn cleanup(job: &LinkJob, mux_failure: bool) -> Vec<PathBuf> {
    println!("Cleaning up");
    let mut removed = Vec::new();
    for path in cleanup_targets(job, mux_failure) {
        if remove_if_present(&path).await {
            removed.push(path);
        }
    }
    removed
}

async fn remove_if_present(path: &Path) -> bool {
    match tokio::fs::remove_file(path).await {
        Ok(()) => {
            debug!(path = %path.display(), "removed");
            true
        }
        Err(e) if e.kind() == ErrorKind::NotFound => false,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "could not remove file");
            false
        }
    }
}
