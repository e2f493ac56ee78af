// yt-dlp backed media source
//
// Metadata comes from `yt-dlp --dump-json`; the chosen formats are then
// fetched directly over HTTP so progress can be reported per chunk.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::downloader::backends::HttpFetcher;
use crate::downloader::errors::RipError;
use crate::downloader::models::{MediaInfo, MediaKind, StreamDescriptor};
use crate::downloader::traits::{MediaSource, ProgressFn};
use crate::downloader::utils::run_output_with_timeout;

/// Subset of the `--dump-json` document we read
#[derive(Debug, Deserialize)]
struct DumpInfo {
    title: Option<String>,
    #[serde(default)]
    formats: Vec<DumpFormat>,
}

#[derive(Debug, Deserialize)]
struct DumpFormat {
    format_id: Option<String>,
    ext: Option<String>,
    vcodec: Option<String>,
    acodec: Option<String>,
    /// Bitrates are in kbit/s
    tbr: Option<f64>,
    abr: Option<f64>,
    vbr: Option<f64>,
    filesize: Option<f64>,
    filesize_approx: Option<f64>,
    fps: Option<f64>,
    url: Option<String>,
    protocol: Option<String>,
    #[serde(default)]
    http_headers: BTreeMap<String, String>,
}

fn has_codec(codec: &Option<String>) -> bool {
    codec
        .as_deref()
        .is_some_and(|c| !c.is_empty() && c != "none")
}

impl DumpFormat {
    /// Convert into a descriptor; `None` for formats that cannot be fetched
    /// with a single HTTP request (manifests, storyboards).
    fn into_descriptor(self) -> Option<StreamDescriptor> {
        let protocol = self.protocol.as_deref().unwrap_or("https");
        if protocol != "https" && protocol != "http" {
            return None;
        }

        let has_video = has_codec(&self.vcodec);
        let has_audio = has_codec(&self.acodec);
        let kind = match (has_video, has_audio) {
            (true, _) => MediaKind::Video,
            (false, true) => MediaKind::Audio,
            (false, false) => return None,
        };

        let ext = self.ext?;
        // `m4a` is the mp4 container (audio/mp4)
        let container = match ext.as_str() {
            "m4a" => "mp4".to_string(),
            _ => ext,
        };

        let kbps = self.tbr.or(self.abr.zip(self.vbr).map(|(a, v)| a + v)).or(self.abr).or(self.vbr);
        let bitrate = kbps.map(|k| (k * 1000.0).round() as u64).unwrap_or(0);
        let size = self
            .filesize
            .or(self.filesize_approx)
            .map(|s| s.round() as u64)
            .unwrap_or(0);

        Some(StreamDescriptor {
            format_id: self.format_id.unwrap_or_default(),
            kind,
            container,
            bitrate,
            size,
            frame_rate: if has_video { self.fps } else { None },
            progressive: has_video && has_audio,
            url: self.url?,
            http_headers: self.http_headers.into_iter().collect(),
        })
    }
}

/// Parse `--dump-json` output into the title and fetchable streams
pub fn parse_dump_json(stdout: &[u8]) -> Result<MediaInfo, RipError> {
    let info: DumpInfo = serde_json::from_slice(stdout)?;
    let title = info
        .title
        .ok_or_else(|| RipError::Parse("No title in JSON".to_string()))?;
    let streams: Vec<StreamDescriptor> = info
        .formats
        .into_iter()
        .filter_map(DumpFormat::into_descriptor)
        .collect();
    Ok(MediaInfo { title, streams })
}

/// Configuration of the yt-dlp source
#[derive(Debug, Clone)]
pub struct YtDlpConfig {
    pub ytdlp_path: PathBuf,
    pub proxy: Option<String>,
    pub timeout_seconds: u64,
}

impl Default for YtDlpConfig {
    fn default() -> Self {
        Self {
            ytdlp_path: PathBuf::from("yt-dlp"),
            proxy: None,
            timeout_seconds: 60,
        }
    }
}

pub struct YtDlpSource {
    config: YtDlpConfig,
    fetcher: HttpFetcher,
}

impl YtDlpSource {
    pub fn new(config: YtDlpConfig) -> Result<Self, RipError> {
        let fetcher = HttpFetcher::new(config.proxy.as_deref(), config.timeout_seconds)?;
        Ok(Self { config, fetcher })
    }

    fn build_args(&self, link: &str) -> Vec<String> {
        let mut args = vec![
            "--dump-json".to_string(),
            "--no-playlist".to_string(),
            "--no-warnings".to_string(),
            "--socket-timeout".to_string(),
            self.config.timeout_seconds.to_string(),
        ];
        if let Some(proxy) = &self.config.proxy {
            args.push("--proxy".to_string());
            args.push(proxy.clone());
        }
        args.push(link.to_string());
        args
    }
}

/// Most useful line of extractor stderr
fn error_summary(stderr: &str) -> String {
    stderr
        .lines()
        .map(str::trim)
        .find(|l| l.starts_with("ERROR:"))
        .or_else(|| stderr.lines().map(str::trim).rev().find(|l| !l.is_empty()))
        .unwrap_or("yt-dlp failed without output")
        .to_string()
}

#[async_trait]
impl MediaSource for YtDlpSource {
    fn name(&self) -> &'static str {
        "yt-dlp"
    }

    async fn resolve(&self, link: &str) -> Result<MediaInfo, RipError> {
        let program = self.config.ytdlp_path.to_string_lossy().to_string();
        let args = self.build_args(link);
        debug!(program = %program, args = ?args, "resolving");

        let output = run_output_with_timeout(&program, &args, self.config.timeout_seconds)
            .await
            .map_err(RipError::resolution)?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            warn!(link, stderr = %stderr.trim(), "yt-dlp failed");
            return Err(RipError::resolution(error_summary(&stderr)));
        }

        let info = parse_dump_json(&output.stdout)?;
        debug!(title = %info.title, streams = info.streams.len(), "resolved");
        Ok(info)
    }

    async fn download(
        &self,
        stream: &StreamDescriptor,
        dest: &Path,
        on_progress: &mut ProgressFn<'_>,
    ) -> Result<(), RipError> {
        self.fetcher.fetch_to(stream, dest, on_progress).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DUMP: &str = r#"{
        "id": "abc",
        "title": "Some Title",
        "formats": [
            {"format_id": "sb0", "ext": "mhtml", "vcodec": "none", "acodec": "none",
             "protocol": "mhtml", "url": "https://i.example/sb"},
            {"format_id": "140", "ext": "m4a", "vcodec": "none", "acodec": "mp4a.40.2",
             "abr": 129.5, "filesize": 3000000, "protocol": "https",
             "url": "https://r.example/140", "http_headers": {"User-Agent": "UA"}},
            {"format_id": "251", "ext": "webm", "vcodec": "none", "acodec": "opus",
             "tbr": 140.1, "filesize_approx": 3100000.4, "protocol": "https",
             "url": "https://r.example/251"},
            {"format_id": "137", "ext": "mp4", "vcodec": "avc1.640028", "acodec": "none",
             "tbr": 4400.0, "fps": 30, "filesize": 90000000, "protocol": "https",
             "url": "https://r.example/137"},
            {"format_id": "18", "ext": "mp4", "vcodec": "avc1.42001E", "acodec": "mp4a.40.2",
             "tbr": 500.0, "fps": 25, "protocol": "https", "url": "https://r.example/18"},
            {"format_id": "96", "ext": "mp4", "vcodec": "avc1", "acodec": "mp4a",
             "tbr": 5000.0, "protocol": "m3u8_native", "url": "https://r.example/96.m3u8"}
        ]
    }"#;

    #[test]
    fn parses_fetchable_formats() {
        let info = parse_dump_json(DUMP.as_bytes()).unwrap();
        assert_eq!(info.title, "Some Title");
        let ids: Vec<&str> = info.streams.iter().map(|s| s.format_id.as_str()).collect();
        assert_eq!(ids, vec!["140", "251", "137", "18"]);

        let m4a = &info.streams[0];
        assert_eq!(m4a.kind, MediaKind::Audio);
        assert_eq!(m4a.container, "mp4");
        assert_eq!(m4a.mime_type(), "audio/mp4");
        assert_eq!(m4a.bitrate, 129_500);
        assert_eq!(m4a.frame_rate, None);
        assert_eq!(m4a.http_headers, vec![("User-Agent".to_string(), "UA".to_string())]);

        assert_eq!(info.streams[1].size, 3_100_000);

        let video = &info.streams[2];
        assert_eq!(video.kind, MediaKind::Video);
        assert!(video.is_adaptive());
        assert_eq!(video.frame_rate, Some(30.0));

        let progressive = &info.streams[3];
        assert!(progressive.progressive);
        assert_eq!(progressive.size, 0);
    }

    #[test]
    fn missing_title_is_a_parse_error() {
        let err = parse_dump_json(br#"{"formats": []}"#).unwrap_err();
        assert!(matches!(err, RipError::Parse(_)));
        assert!(matches!(parse_dump_json(b"not json").unwrap_err(), RipError::Parse(_)));
    }

    #[test]
    fn error_summary_prefers_error_lines() {
        let stderr = "WARNING: something\nERROR: [youtube] x: Private video\n";
        assert_eq!(error_summary(stderr), "ERROR: [youtube] x: Private video");
        assert_eq!(error_summary("last line\n\n"), "last line");
        assert_eq!(error_summary(""), "yt-dlp failed without output");
    }

    #[test]
    fn args_include_proxy_and_link() {
        let source = YtDlpSource::new(YtDlpConfig {
            proxy: Some("socks5://127.0.0.1:1080".to_string()),
            ..YtDlpConfig::default()
        })
        .unwrap();
        let args = source.build_args("https://youtu.be/abc");
        assert_eq!(args.first().map(String::as_str), Some("--dump-json"));
        assert_eq!(args.last().map(String::as_str), Some("https://youtu.be/abc"));
        assert!(args.windows(2).any(|w| w[0] == "--proxy" && w[1] == "socks5://127.0.0.1:1080"));
    }

    #[tokio::test]
    async fn missing_binary_is_a_resolution_error() {
        let source = YtDlpSource::new(YtDlpConfig {
            ytdlp_path: PathBuf::from("definitely-not-yt-dlp-xyz"),
            ..YtDlpConfig::default()
        })
        .unwrap();
        let err = source.resolve("https://youtu.be/abc").await.unwrap_err();
        assert!(matches!(err, RipError::Resolution { .. }));
    }
}
