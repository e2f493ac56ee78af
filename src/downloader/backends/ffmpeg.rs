use std::path::PathBuf;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::downloader::errors::RipError;
use crate::downloader::traits::Transcoder;
use crate::downloader::utils::run_output;

/// ffmpeg process runner. Waits for the process without a timeout.
pub struct FfmpegTranscoder {
    binary_path: PathBuf,
}

impl FfmpegTranscoder {
    pub fn new(binary_path: impl Into<PathBuf>) -> Self {
        Self {
            binary_path: binary_path.into(),
        }
    }
}

#[async_trait]
impl Transcoder for FfmpegTranscoder {
    fn name(&self) -> &'static str {
        "ffmpeg"
    }

    async fn run(&self, args: &[String]) -> Result<i32, RipError> {
        let program = self.binary_path.to_string_lossy().to_string();
        let output = run_output(&program, args).await.map_err(RipError::Mux)?;

        // Killed by a signal: no exit code
        let code = output.status.code().unwrap_or(-1);
        if code == 0 {
            debug!("ffmpeg finished");
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let tail: Vec<&str> = stderr.lines().rev().take(3).collect();
            warn!(code, stderr = %tail.into_iter().rev().collect::<Vec<_>>().join(" | "), "ffmpeg failed");
        }
        Ok(code)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[tokio::test]
    async fn reports_exit_code() {
        let ok = FfmpegTranscoder::new("true");
        assert_eq!(ok.run(&[]).await.unwrap(), 0);

        let failing = FfmpegTranscoder::new("false");
        assert_eq!(failing.run(&[]).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn launch_failure_is_mux_error() {
        let missing = FfmpegTranscoder::new("/nonexistent/ffmpeg");
        let err = missing.run(&["-version".to_string()]).await.unwrap_err();
        assert!(matches!(err, RipError::Mux(_)));
    }
}
