// FormatSelector - picks the streams to download for one media item
//
// Policy:
// - Prefer a separate adaptive audio + video pair (muxed afterwards)
// - Only containers from the allowed set are considered for the pair
// - Otherwise fall back to the best progressive (already muxed) stream

use tracing::debug;

use super::errors::RipError;
use super::models::{MediaInfo, MediaKind, SelectionResult, StreamDescriptor};

/// Containers considered for adaptive streams
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorConfig {
    pub allowed_containers: Vec<String>,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            allowed_containers: vec!["mp4".to_string(), "webm".to_string()],
        }
    }
}

impl SelectorConfig {
    pub fn with_containers<I, S>(mut self, containers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_containers = containers.into_iter().map(Into::into).collect();
        self
    }

    pub fn allows(&self, container: &str) -> bool {
        self.allowed_containers
            .iter()
            .any(|c| c.eq_ignore_ascii_case(container))
    }
}

/// Running best of the ascending adaptive scan
#[derive(Default)]
struct AdaptiveBest<'a> {
    audio: Option<&'a StreamDescriptor>,
    video: Option<&'a StreamDescriptor>,
}

pub struct FormatSelector {
    config: SelectorConfig,
}

impl FormatSelector {
    pub fn new(config: SelectorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SelectorConfig {
        &self.config
    }

    /// Choose the streams to download for `info`.
    pub fn select(&self, info: &MediaInfo) -> Result<SelectionResult, RipError> {
        let best = self.best_adaptive(&info.streams);

        if let (Some(video), Some(audio)) = (best.video, best.audio) {
            debug!(
                video = %video.format_id,
                video_mime = %video.mime_type(),
                audio = %audio.format_id,
                audio_mime = %audio.mime_type(),
                "adaptive pair selected"
            );
            return Ok(SelectionResult {
                video: video.clone(),
                video_container: video.container.clone(),
                audio: Some(audio.clone()),
                audio_container: Some(audio.container.clone()),
                title: info.title.clone(),
                frame_rate: video.frame_rate,
            });
        }

        // Container bookkeeping comes from the fallback stream itself
        let fallback = Self::best_progressive(&info.streams).or(best.video);
        match fallback {
            Some(video) => {
                debug!(
                    video = %video.format_id,
                    mime = %video.mime_type(),
                    progressive = video.progressive,
                    "no adaptive pair, using single stream"
                );
                Ok(SelectionResult {
                    video: video.clone(),
                    video_container: video.container.clone(),
                    audio: None,
                    audio_container: None,
                    title: info.title.clone(),
                    frame_rate: video.frame_rate,
                })
            }
            None => Err(RipError::NoStreamsFound(info.title.clone())),
        }
    }

    /// Highest-bitrate allowed audio and video among adaptive streams.
    /// Streams are scanned ascending by bitrate; the last match per kind wins.
    fn best_adaptive<'a>(&self, streams: &'a [StreamDescriptor]) -> AdaptiveBest<'a> {
        let mut adaptive: Vec<&StreamDescriptor> =
            streams.iter().filter(|s| s.is_adaptive()).collect();
        adaptive.sort_by_key(|s| s.bitrate);

        adaptive
            .into_iter()
            .filter(|s| self.config.allows(&s.container))
            .fold(AdaptiveBest::default(), |mut best, stream| {
                match stream.kind {
                    MediaKind::Audio => best.audio = Some(stream),
                    MediaKind::Video => best.video = Some(stream),
                }
                best
            })
    }

    /// Highest-bitrate progressive video; the first one listed wins ties.
    fn best_progressive(streams: &[StreamDescriptor]) -> Option<&StreamDescriptor> {
        streams
            .iter()
            .filter(|s| s.progressive && s.kind == MediaKind::Video)
            .fold(None, |best: Option<&StreamDescriptor>, s| match best {
                Some(b) if b.bitrate >= s.bitrate => Some(b),
                _ => Some(s),
            })
    }
}

impl Default for FormatSelector {
    fn default() -> Self {
        Self::new(SelectorConfig::default())
    }
}
