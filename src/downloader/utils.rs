// Helper functions shared by the pipeline and its collaborators

use std::process::Stdio;

use regex::Regex;
use tokio::process::Command as TokioCommand;
use tokio::time::{timeout, Duration};

/// Characters kept in a filename stem
const STEM_LENGTH: usize = 10;

lazy_static::lazy_static! {
    static ref NON_WORD_RE: Regex = Regex::new(r"\W+").unwrap();
}

/// Filesystem-safe stem: trimmed, lowercased, first 10 characters, with every
/// non-word character removed.
pub fn filename_stem(title: &str) -> String {
    let truncated: String = title
        .trim_matches(' ')
        .to_lowercase()
        .chars()
        .take(STEM_LENGTH)
        .collect();
    NON_WORD_RE.replace_all(&truncated, "").into_owned()
}

/// Size in MB (10^6 bytes) with two decimals, as printed before downloads
pub fn format_mb(bytes: u64) -> String {
    format!("{:.2}", bytes as f64 / 1_000_000.0)
}

/// Run a command to completion with stdout/stderr captured. No timeout.
pub async fn run_output(program: &str, args: &[String]) -> Result<std::process::Output, String> {
    TokioCommand::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await
        .map_err(|e| format!("Failed to start {}: {}", program, e))
}

/// Run a command with captured output, giving up after `timeout_secs`.
/// The child is spawned with `kill_on_drop`, so an elapsed timeout drops the
/// pending wait and kills it.
pub async fn run_output_with_timeout(
    program: &str,
    args: &[String],
    timeout_secs: u64,
) -> Result<std::process::Output, String> {
    let child = TokioCommand::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| format!("Failed to start {}: {}", program, e))?;

    timeout(Duration::from_secs(timeout_secs), child.wait_with_output())
        .await
        .map_err(|_| format!("{} timed out after {}s", program, timeout_secs))?
        .map_err(|e| format!("Failed to wait for {}: {}", program, e))
}
