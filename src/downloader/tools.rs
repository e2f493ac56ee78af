// External tool discovery (transcoder and extractor binaries)

use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::debug;

use super::errors::RipError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolType {
    Ffmpeg,
    YtDlp,
}

impl ToolType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolType::Ffmpeg => "ffmpeg",
            ToolType::YtDlp => "yt-dlp",
        }
    }

    /// Platform file name of the binary
    pub fn binary_name(&self) -> String {
        if cfg!(windows) {
            format!("{}.exe", self.as_str())
        } else {
            self.as_str().to_string()
        }
    }
}

#[derive(Debug, Clone)]
pub struct ToolInfo {
    pub tool_type: ToolType,
    pub path: Option<PathBuf>,
    pub version: Option<String>,
}

impl ToolInfo {
    pub fn is_available(&self) -> bool {
        self.path.is_some()
    }
}

pub struct ToolManager {
    work_dir: PathBuf,
}

impl ToolManager {
    pub fn new(work_dir: impl Into<PathBuf>) -> Self {
        Self {
            work_dir: work_dir.into(),
        }
    }

    /// The transcoder must sit in the working directory unless an explicit
    /// path is configured. Its absence is fatal for the run.
    pub fn require_transcoder(&self, configured: Option<&Path>) -> Result<PathBuf, RipError> {
        let candidate = match configured {
            Some(path) => path.to_path_buf(),
            None => self.work_dir.join(ToolType::Ffmpeg.binary_name()),
        };
        if candidate.is_file() {
            debug!(path = %candidate.display(), "transcoder found");
            Ok(candidate)
        } else {
            Err(RipError::StartupFatal(ToolType::Ffmpeg.as_str().to_string()))
        }
    }

    /// Extractor binary: working directory first, then common install
    /// locations, then whatever `PATH` resolves.
    pub fn find_ytdlp(&self) -> PathBuf {
        let name = ToolType::YtDlp.binary_name();
        let local = self.work_dir.join(&name);
        if local.is_file() {
            return local;
        }

        let common_paths = [
            "/opt/homebrew/bin/yt-dlp", // Homebrew on Apple Silicon
            "/usr/local/bin/yt-dlp",    // Homebrew on Intel Mac
            "/usr/bin/yt-dlp",          // System installation
        ];
        for path in common_paths {
            if Path::new(path).is_file() {
                return PathBuf::from(path);
            }
        }

        // Last resort: hope it's in PATH
        PathBuf::from(name)
    }

    pub fn get_tool_info(&self, tool_type: ToolType) -> ToolInfo {
        let path = match tool_type {
            ToolType::Ffmpeg => self.require_transcoder(None).ok(),
            ToolType::YtDlp => Some(self.find_ytdlp()),
        };
        let version = path.as_deref().and_then(Self::get_version);
        ToolInfo {
            tool_type,
            path: version.as_ref().and(path),
            version,
        }
    }

    /// First line of `<tool> -version` / `--version`, if it runs at all
    fn get_version(path: &Path) -> Option<String> {
        let arg = if path
            .file_stem()
            .is_some_and(|s| s.to_string_lossy().starts_with("ffmpeg"))
        {
            "-version"
        } else {
            "--version"
        };
        match Command::new(path).arg(arg).output() {
            Ok(output) if output.status.success() => String::from_utf8_lossy(&output.stdout)
                .lines()
                .next()
                .map(|l| l.trim().to_string()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_transcoder_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let err = ToolManager::new(dir.path())
            .require_transcoder(None)
            .unwrap_err();
        assert!(err.is_fatal());
        assert!(err.to_string().starts_with("ffmpeg is missing!"));
    }

    #[test]
    fn transcoder_in_working_directory() {
        let dir = tempfile::tempdir().unwrap();
        let bin = dir.path().join(ToolType::Ffmpeg.binary_name());
        std::fs::write(&bin, b"").unwrap();

        let found = ToolManager::new(dir.path()).require_transcoder(None).unwrap();
        assert_eq!(found, bin);
    }

    #[test]
    fn configured_transcoder_path_wins() {
        let dir = tempfile::tempdir().unwrap();
        let custom = dir.path().join("my-ffmpeg");
        std::fs::write(&custom, b"").unwrap();

        let manager = ToolManager::new(dir.path());
        assert_eq!(manager.require_transcoder(Some(&custom)).unwrap(), custom);
        assert!(manager
            .require_transcoder(Some(&dir.path().join("nope")))
            .is_err());
    }

    #[test]
    fn local_ytdlp_is_preferred() {
        let dir = tempfile::tempdir().unwrap();
        let bin = dir.path().join(ToolType::YtDlp.binary_name());
        std::fs::write(&bin, b"").unwrap();
        assert_eq!(ToolManager::new(dir.path()).find_ytdlp(), bin);
    }

    #[test]
    fn missing_tool_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let info = ToolManager::new(dir.path()).get_tool_info(ToolType::Ffmpeg);
        assert!(!info.is_available());
        assert_eq!(info.version, None);
    }
}
