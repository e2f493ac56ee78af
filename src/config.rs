// Run configuration

use std::path::PathBuf;

use crate::downloader::extractors::YtDlpConfig;
use crate::downloader::format_selector::SelectorConfig;

/// Default link list read from the working directory
pub const DEFAULT_INPUT_FILE: &str = "input.txt";

/// Everything a run needs, built from the command line or in code
#[derive(Debug, Clone)]
pub struct RipperConfig {
    /// Link list, one link per line
    pub input_file: PathBuf,
    /// Links given directly; take precedence over the list file
    pub links: Vec<String>,
    /// Directory searched for binaries and written to
    pub work_dir: PathBuf,
    pub ffmpeg_path: Option<PathBuf>,
    pub ytdlp_path: Option<PathBuf>,
    pub proxy: Option<String>,
    /// Extractor timeout in seconds
    pub timeout_seconds: u64,
    pub allowed_containers: Vec<String>,
    /// Wait for a key press before exiting
    pub wait_for_key: bool,
    pub verbose: bool,
}

impl Default for RipperConfig {
    fn default() -> Self {
        Self {
            input_file: PathBuf::from(DEFAULT_INPUT_FILE),
            links: Vec::new(),
            work_dir: PathBuf::from("."),
            ffmpeg_path: None,
            ytdlp_path: None,
            proxy: None,
            timeout_seconds: 60,
            allowed_containers: SelectorConfig::default().allowed_containers,
            wait_for_key: true,
            verbose: false,
        }
    }
}

impl RipperConfig {
    pub fn with_input_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.input_file = path.into();
        self
    }

    pub fn with_links(mut self, links: Vec<String>) -> Self {
        self.links = links;
        self
    }

    pub fn with_work_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.work_dir = dir.into();
        self
    }

    pub fn with_ffmpeg(mut self, path: Option<PathBuf>) -> Self {
        self.ffmpeg_path = path;
        self
    }

    pub fn with_ytdlp(mut self, path: Option<PathBuf>) -> Self {
        self.ytdlp_path = path;
        self
    }

    pub fn with_proxy(mut self, proxy: Option<String>) -> Self {
        self.proxy = proxy.filter(|p| !p.trim().is_empty());
        self
    }

    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    /// Ignored when empty; the selector always needs at least one container
    pub fn with_containers(mut self, containers: Vec<String>) -> Self {
        if !containers.is_empty() {
            self.allowed_containers = containers;
        }
        self
    }

    pub fn with_wait_for_key(mut self, wait: bool) -> Self {
        self.wait_for_key = wait;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn selector_config(&self) -> SelectorConfig {
        SelectorConfig::default().with_containers(self.allowed_containers.iter().cloned())
    }

    /// Extractor settings; `ytdlp_path` is the discovered binary when none
    /// was configured.
    pub fn ytdlp_config(&self, discovered: PathBuf) -> YtDlpConfig {
        YtDlpConfig {
            ytdlp_path: self.ytdlp_path.clone().unwrap_or(discovered),
            proxy: self.proxy.clone(),
            timeout_seconds: self.timeout_seconds,
        }
    }
}
