// Error types for the ripper pipeline

use thiserror::Error;

use super::extractors::BlockingReason;

#[derive(Debug, Error)]
pub enum RipError {
    /// Required external binary (the transcoder) is missing
    #[error("{0} is missing! Need {0} in the same folder to work")]
    StartupFatal(String),

    /// The metadata collaborator could not resolve the link
    #[error("{message}")]
    Resolution {
        message: String,
        reason: Option<BlockingReason>,
    },

    /// Neither an adaptive nor a progressive video stream is available
    #[error("No video streams found for '{0}'")]
    NoStreamsFound(String),

    /// Transfer of a stream failed
    #[error("Download error: {0}")]
    Download(String),

    /// Transcoder exited non-zero or could not be launched
    #[error("Mux error: {0}")]
    Mux(String),

    /// Failed to parse extractor output
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl RipError {
    /// Build a resolution error, diagnosing known blocking causes from the
    /// extractor's stderr.
    pub fn resolution(message: impl Into<String>) -> Self {
        let message = message.into();
        let reason = BlockingReason::diagnose(&message);
        Self::Resolution { message, reason }
    }

    /// True for errors that abort the whole run rather than a single link
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::StartupFatal(_))
    }
}

impl From<reqwest::Error> for RipError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            return Self::Download(format!("network timeout: {}", e));
        }
        Self::Download(e.to_string())
    }
}

impl From<serde_json::Error> for RipError {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse(format!("Invalid JSON: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolution_error_carries_diagnosis() {
        let err = RipError::resolution("ERROR: HTTP Error 429: Too Many Requests");
        match err {
            RipError::Resolution { reason, .. } => {
                assert_eq!(reason, Some(BlockingReason::RateLimited));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn startup_message_names_the_binary() {
        let err = RipError::StartupFatal("ffmpeg".to_string());
        assert_eq!(
            err.to_string(),
            "ffmpeg is missing! Need ffmpeg in the same folder to work"
        );
        assert!(err.is_fatal());
        assert!(!RipError::Mux("exit 1".into()).is_fatal());
    }
}
