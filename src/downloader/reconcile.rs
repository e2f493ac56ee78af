// Existing-file reconciliation: skip downloads whose result is already on disk

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::errors::RipError;

/// Lower bound of the muxed size ratio test (inclusive)
pub const MUX_RATIO_MIN: f64 = 0.9;
/// Upper bound of the muxed size ratio test (inclusive)
pub const MUX_RATIO_MAX: f64 = 1.1;

/// State of a candidate output path before downloading
#[derive(Debug, Clone, PartialEq)]
pub enum FileCheck {
    Missing,
    /// Existing file satisfies the request
    Matches { path: PathBuf, size: u64 },
    /// Existing file will be overwritten
    Mismatch {
        path: PathBuf,
        existing: u64,
        expected: u64,
    },
}

impl FileCheck {
    pub fn should_skip(&self) -> bool {
        matches!(self, Self::Matches { .. })
    }
}

/// Exact size match for single progressive files
pub fn sizes_match(existing: u64, expected: u64) -> bool {
    existing == expected
}

/// Ratio test for muxed outputs; container overhead shifts the total size.
pub fn within_mux_tolerance(existing: u64, expected_sum: u64) -> bool {
    if expected_sum == 0 {
        return false;
    }
    let ratio = existing as f64 / expected_sum as f64;
    (MUX_RATIO_MIN..=MUX_RATIO_MAX).contains(&ratio)
}

async fn existing_size(path: &Path) -> Result<Option<u64>, RipError> {
    match tokio::fs::metadata(path).await {
        Ok(meta) if meta.is_file() => Ok(Some(meta.len())),
        Ok(_) => Ok(None),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Single-file case: skip only on an exact size match.
pub async fn check_single(path: &Path, expected: u64) -> Result<FileCheck, RipError> {
    let Some(existing) = existing_size(path).await? else {
        return Ok(FileCheck::Missing);
    };

    println!("File already exists!");
    let check = if sizes_match(existing, expected) {
        println!("And it is the same filesize as the stream\nSkipping download");
        FileCheck::Matches {
            path: path.to_path_buf(),
            size: existing,
        }
    } else {
        println!(
            "But our copy is {} kB while the stream is {} kB",
            kb(existing),
            kb(expected)
        );
        FileCheck::Mismatch {
            path: path.to_path_buf(),
            existing,
            expected,
        }
    };
    debug!(path = %path.display(), ?check, "single-file check");
    Ok(check)
}

/// Mux case: compare the final output against the sum of both stream sizes.
pub async fn check_muxed(
    path: &Path,
    audio_size: u64,
    video_size: u64,
) -> Result<FileCheck, RipError> {
    let Some(existing) = existing_size(path).await? else {
        return Ok(FileCheck::Missing);
    };

    let expected = audio_size.saturating_add(video_size);
    println!("File might already exist!");
    let check = if within_mux_tolerance(existing, expected) {
        println!("and it is roughly same filesize as the stream\nSkipping download");
        FileCheck::Matches {
            path: path.to_path_buf(),
            size: existing,
        }
    } else {
        println!(
            "But our copy is {} kB while the stream is {} kB",
            kb(existing),
            kb(expected)
        );
        FileCheck::Mismatch {
            path: path.to_path_buf(),
            existing,
            expected,
        }
    };
    debug!(path = %path.display(), ?check, "muxed-output check");
    Ok(check)
}

fn kb(bytes: u64) -> f64 {
    bytes as f64 / 1024.0
}
