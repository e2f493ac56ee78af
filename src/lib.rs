pub mod cli;
pub mod config;
pub mod downloader;
pub mod input;

use std::io::{self, BufRead, Write};

use tracing::{debug, error, info};

use config::RipperConfig;
use downloader::backends::FfmpegTranscoder;
use downloader::extractors::YtDlpSource;
use downloader::tools::{ToolManager, ToolType};
use downloader::{BatchReport, FormatSelector, Ripper, RipError};

/// Check the transcoder, collect the links and process them all.
///
/// Only a missing transcoder or unusable input fails the run; per-link
/// errors end up in the returned report.
pub async fn run(config: &RipperConfig) -> Result<BatchReport, RipError> {
    let tools = ToolManager::new(&config.work_dir);
    let ffmpeg = tools.require_transcoder(config.ffmpeg_path.as_deref())?;

    if config.verbose {
        for tool in [ToolType::Ffmpeg, ToolType::YtDlp] {
            let info = tools.get_tool_info(tool);
            debug!(
                tool = tool.as_str(),
                available = info.is_available(),
                path = ?info.path,
                version = ?info.version,
                "tool"
            );
        }
    }

    let links = input::collect_links(config, &mut io::stdin().lock(), &mut io::stdout())?;
    if links.is_empty() {
        info!("no links to process");
        return Ok(BatchReport::default());
    }

    let source = YtDlpSource::new(config.ytdlp_config(tools.find_ytdlp()))?;
    let ripper = Ripper::new(
        source,
        FfmpegTranscoder::new(ffmpeg),
        FormatSelector::new(config.selector_config()),
    )
    .with_work_dir(&config.work_dir);

    Ok(ripper.run_batch(&links).await)
}

/// Report a non-fatal run error, then wait for the exit key when asked.
/// Returns the process exit code.
pub fn finish<R: BufRead, W: Write>(
    result: &Result<BatchReport, RipError>,
    wait_for_key: bool,
    reader: &mut R,
    writer: &mut W,
) -> i32 {
    let code = match result {
        Ok(_) => 0,
        Err(e) => {
            error!("Application error: {}", e);
            eprintln!("Error: {}", e);
            1
        }
    };

    if wait_for_key {
        if let Err(e) = input::wait_for_key(reader, writer) {
            error!(error = %e, "could not read from stdin");
        }
    }
    code
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn error_still_waits_for_key() {
        let result = Err(RipError::Io(io::Error::new(
            io::ErrorKind::PermissionDenied,
            "input.txt",
        )));
        let mut out = Vec::new();
        let code = finish(&result, true, &mut Cursor::new("\n"), &mut out);
        assert_eq!(code, 1);
        assert_eq!(String::from_utf8(out).unwrap(), "Press the 'any' key to exit\n");
    }

    #[test]
    fn success_without_wait() {
        let mut out = Vec::new();
        let code = finish(&Ok(BatchReport::default()), false, &mut Cursor::new(""), &mut out);
        assert_eq!(code, 0);
        assert!(out.is_empty());
    }
}
