// Common data models for the ripper

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Kind of elementary stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Audio,
    Video,
}

impl MediaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Audio => "audio",
            Self::Video => "video",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One downloadable stream of a media item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamDescriptor {
    /// Extractor format id (e.g., "137", "251")
    pub format_id: String,
    pub kind: MediaKind,
    /// Container extension (mp4, webm, ...)
    pub container: String,
    /// Bitrate in bits per second
    pub bitrate: u64,
    /// Declared size in bytes
    pub size: u64,
    /// Frames per second (video only)
    pub frame_rate: Option<f64>,
    /// Already-muxed audio+video stream
    pub progressive: bool,
    /// Direct media URL
    pub url: String,
    /// Request headers the host expects for `url`
    #[serde(default)]
    pub http_headers: Vec<(String, String)>,
}

impl StreamDescriptor {
    pub fn mime_type(&self) -> String {
        format!("{}/{}", self.kind, self.container)
    }

    pub fn is_adaptive(&self) -> bool {
        !self.progressive
    }
}

/// Title and streams returned by the metadata collaborator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaInfo {
    pub title: String,
    pub streams: Vec<StreamDescriptor>,
}

/// Coarse quality label of a selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    /// Separate adaptive audio and video, muxed afterwards
    High,
    /// Single progressive file
    Normal,
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::High => f.write_str("high"),
            Self::Normal => f.write_str("normal"),
        }
    }
}

/// Streams chosen for one link
#[derive(Debug, Clone)]
pub struct SelectionResult {
    pub video: StreamDescriptor,
    pub video_container: String,
    /// Absent when only a progressive stream is used
    pub audio: Option<StreamDescriptor>,
    pub audio_container: Option<String>,
    pub title: String,
    pub frame_rate: Option<f64>,
}

impl SelectionResult {
    pub fn quality(&self) -> Quality {
        if self.audio.is_some() {
            Quality::High
        } else {
            Quality::Normal
        }
    }
}

/// Fixed container of the muxed output
pub const MUXED_CONTAINER: &str = "mp4";
pub const UNMUXED_VIDEO_PREFIX: &str = "unmuxed-video-";
pub const UNMUXED_AUDIO_PREFIX: &str = "unmuxed-audio-";

/// One input link on its way through the pipeline
#[derive(Debug, Clone)]
pub struct LinkJob {
    pub link: String,
    /// 1-based position in the batch
    pub index: usize,
    /// Directory all files of the job live in
    pub dir: PathBuf,
    /// Filesystem-safe stem derived from the title
    pub stem: String,
    pub selection: SelectionResult,
}

impl LinkJob {
    /// `<stem>.<video container>`: target of a progressive download
    pub fn single_file(&self) -> PathBuf {
        self.dir
            .join(format!("{}.{}", self.stem, self.selection.video_container))
    }

    pub fn unmuxed_video(&self) -> PathBuf {
        self.dir.join(format!(
            "{}{}.{}",
            UNMUXED_VIDEO_PREFIX, self.stem, self.selection.video_container
        ))
    }

    /// Uses the video container when no audio was selected, so the path is
    /// always well defined for cleanup.
    pub fn unmuxed_audio(&self) -> PathBuf {
        let container = self
            .selection
            .audio_container
            .as_deref()
            .unwrap_or(&self.selection.video_container);
        self.dir
            .join(format!("{}{}.{}", UNMUXED_AUDIO_PREFIX, self.stem, container))
    }

    /// `<title>.mp4`: final muxed output
    pub fn muxed_output(&self) -> PathBuf {
        self.dir.join(format!(
            "{}.{}",
            output_title(&self.selection.title),
            MUXED_CONTAINER
        ))
    }
}

/// Title as used for the muxed output name. Only path separators are
/// replaced; everything else is kept as the platform reports it.
pub fn output_title(title: &str) -> String {
    title.replace(['/', '\\'], "_")
}

/// What happened to a link that went through the pipeline
#[derive(Debug, Clone, PartialEq)]
pub enum LinkOutcome {
    /// Existing file already matched, nothing downloaded
    AlreadyPresent(PathBuf),
    /// Progressive stream written as a single file
    Downloaded(PathBuf),
    /// Audio and video muxed into the titled output
    Muxed(PathBuf),
}

/// Per-link failure recorded in a batch
#[derive(Debug)]
pub struct LinkFailure {
    pub index: usize,
    pub link: String,
    pub error: super::errors::RipError,
}

/// Result of one pass over all links
#[derive(Debug, Default)]
pub struct BatchReport {
    pub outcomes: Vec<(usize, LinkOutcome)>,
    pub failures: Vec<LinkFailure>,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.outcomes.len()
    }

    pub fn failed(&self) -> usize {
        self.failures.len()
    }
}
