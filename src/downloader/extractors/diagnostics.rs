// Resolution diagnostics - classifies why the extractor could not resolve a link
//
// The extractor only reports free-form stderr; this maps the common causes to
// a reason so the per-link error can say more than "failed".

use std::fmt;

/// Known causes of a failed metadata resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockingReason {
    /// DRM-protected or paid content; cannot be downloaded at all
    DrmProtected,
    /// Age-restricted content requiring login
    AgeRestricted,
    /// Private video requiring authorization
    PrivateVideo,
    /// Video deleted or unavailable
    VideoUnavailable,
    /// Geographic restriction
    GeoBlocked,
    /// Rate limiting (429 or similar)
    RateLimited,
    /// Bot detection triggered
    BotDetection,
    /// HTTP 403 Forbidden
    Http403Forbidden,
    /// Network timeout or unreachable host
    NetworkTimeout,
    /// The extractor does not know the site
    UnsupportedUrl,
}

impl BlockingReason {
    /// Analyze an error message and return the blocking reason, if any
    pub fn diagnose(error: &str) -> Option<Self> {
        let lower = error.to_lowercase();
        let has = |patterns: &[&str]| patterns.iter().any(|p| lower.contains(p));

        // Patterns in order of specificity
        if has(&["drm", "widevine", "playready", "fairplay", "requires purchase", "rental"]) {
            return Some(Self::DrmProtected);
        }
        if has(&["age-restricted", "sign in to confirm your age", "age_verification"]) {
            return Some(Self::AgeRestricted);
        }
        if has(&["private video", "video is private"]) {
            return Some(Self::PrivateVideo);
        }
        if has(&[
            "video unavailable",
            "video has been removed",
            "no longer available",
            "video is unavailable",
        ]) {
            return Some(Self::VideoUnavailable);
        }
        if has(&["not available in your country", "blocked in your country", "geo restrict", "geo-restrict"]) {
            return Some(Self::GeoBlocked);
        }
        if has(&["429", "rate limit", "too many requests"]) {
            return Some(Self::RateLimited);
        }
        if has(&["not a bot", "captcha", "unusual traffic"]) {
            return Some(Self::BotDetection);
        }
        if has(&["403", "forbidden"]) {
            return Some(Self::Http403Forbidden);
        }
        if has(&["timeout", "timed out", "connection refused", "network unreachable"]) {
            return Some(Self::NetworkTimeout);
        }
        if has(&["unsupported url", "is not a valid url"]) {
            return Some(Self::UnsupportedUrl);
        }
        None
    }

    /// Retrying later or from another network may succeed
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::RateLimited | Self::BotDetection | Self::Http403Forbidden | Self::NetworkTimeout
        )
    }

    /// Human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            Self::DrmProtected => "DRM-protected content",
            Self::AgeRestricted => "Age-restricted content",
            Self::PrivateVideo => "Private video",
            Self::VideoUnavailable => "Video unavailable",
            Self::GeoBlocked => "Geographic restriction",
            Self::RateLimited => "Rate limited",
            Self::BotDetection => "Bot detection triggered",
            Self::Http403Forbidden => "Access denied (HTTP 403)",
            Self::NetworkTimeout => "Network timeout",
            Self::UnsupportedUrl => "Unsupported URL",
        }
    }
}

impl fmt::Display for BlockingReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_403_detection() {
        let error = "ERROR: HTTP Error 403: Forbidden";
        assert_eq!(BlockingReason::diagnose(error), Some(BlockingReason::Http403Forbidden));
    }

    #[test]
    fn test_age_restricted_detection() {
        let error = "Sign in to confirm your age";
        assert_eq!(BlockingReason::diagnose(error), Some(BlockingReason::AgeRestricted));
    }

    #[test]
    fn test_timeout_detection() {
        let error = "yt-dlp timed out after 30s";
        assert_eq!(BlockingReason::diagnose(error), Some(BlockingReason::NetworkTimeout));
        assert!(BlockingReason::NetworkTimeout.is_transient());
    }

    #[test]
    fn test_unavailable_detection() {
        let error = "ERROR: [youtube] abc: Video unavailable";
        assert_eq!(BlockingReason::diagnose(error), Some(BlockingReason::VideoUnavailable));
        assert!(!BlockingReason::VideoUnavailable.is_transient());
    }

    #[test]
    fn test_unsupported_url() {
        let error = "ERROR: Unsupported URL: https://example.com/";
        assert_eq!(BlockingReason::diagnose(error), Some(BlockingReason::UnsupportedUrl));
    }

    #[test]
    fn test_unknown_is_none() {
        assert_eq!(BlockingReason::diagnose("something odd happened"), None);
        assert_eq!(BlockingReason::diagnose(""), None);
    }
}
