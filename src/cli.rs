use std::path::PathBuf;

use clap::Parser;

use crate::config::{RipperConfig, DEFAULT_INPUT_FILE};

#[derive(Parser, Debug)]
#[command(
    name = "stream-ripper",
    about = "Download the best audio and video streams of media links and mux them with ffmpeg",
    version
)]
pub struct CliArgs {
    /// Links to process; when omitted the link list file is read
    pub links: Vec<String>,

    /// Link list, one link per line
    #[arg(short, long, default_value = DEFAULT_INPUT_FILE)]
    pub input: PathBuf,

    /// Path to the ffmpeg binary (default: ffmpeg in the working directory)
    #[arg(long)]
    pub ffmpeg: Option<PathBuf>,

    /// Path to the yt-dlp binary
    #[arg(long)]
    pub ytdlp: Option<PathBuf>,

    /// Proxy URL (supports http, https, socks5)
    #[arg(long)]
    pub proxy: Option<String>,

    /// Metadata resolution timeout in seconds
    #[arg(long, default_value = "60")]
    pub timeout: u64,

    /// Containers allowed for adaptive streams
    #[arg(long, value_delimiter = ',', default_value = "mp4,webm")]
    pub containers: Vec<String>,

    /// Exit without waiting for a key press
    #[arg(long)]
    pub no_wait: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl CliArgs {
    pub fn into_config(self) -> RipperConfig {
        RipperConfig::default()
            .with_input_file(self.input)
            .with_links(self.links)
            .with_ffmpeg(self.ffmpeg)
            .with_ytdlp(self.ytdlp)
            .with_proxy(self.proxy)
            .with_timeout(self.timeout)
            .with_containers(self.containers)
            .with_wait_for_key(!self.no_wait)
            .with_verbose(self.verbose)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_config_defaults() {
        let config = CliArgs::parse_from(["stream-ripper"]).into_config();
        assert_eq!(config.input_file, PathBuf::from("input.txt"));
        assert!(config.links.is_empty());
        assert_eq!(config.timeout_seconds, 60);
        assert_eq!(config.allowed_containers, vec!["mp4", "webm"]);
        assert!(config.wait_for_key);
    }

    #[test]
    fn flags_are_mapped() {
        let config = CliArgs::parse_from([
            "stream-ripper",
            "--containers",
            "mkv,mp4",
            "--proxy",
            "socks5://127.0.0.1:1080",
            "--no-wait",
            "-v",
            "https://youtu.be/a",
            "https://youtu.be/b",
        ])
        .into_config();
        assert_eq!(config.links.len(), 2);
        assert_eq!(config.allowed_containers, vec!["mkv", "mp4"]);
        assert_eq!(config.proxy.as_deref(), Some("socks5://127.0.0.1:1080"));
        assert!(!config.wait_for_key);
        assert!(config.verbose);
    }
}
