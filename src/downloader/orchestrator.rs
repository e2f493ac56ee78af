// Orchestrator: drives every link through resolve → select → reconcile → download → mux

use std::path::{Path, PathBuf};

use tracing::{error, info, warn};

use super::cleanup::cleanup;
use super::errors::RipError;
use super::format_selector::FormatSelector;
use super::models::{BatchReport, LinkFailure, LinkJob, LinkOutcome, StreamDescriptor};
use super::mux::mux;
use super::progress::ConsoleProgress;
use super::reconcile::{check_muxed, check_single};
use super::traits::{MediaSource, Transcoder};
use super::utils::{filename_stem, format_mb};

pub struct Ripper<S, T> {
    source: S,
    transcoder: T,
    selector: FormatSelector,
    work_dir: PathBuf,
}

impl<S: MediaSource, T: Transcoder> Ripper<S, T> {
    pub fn new(source: S, transcoder: T, selector: FormatSelector) -> Self {
        Self {
            source,
            transcoder,
            selector,
            work_dir: PathBuf::from("."),
        }
    }

    /// Directory downloads and muxed outputs are written to
    pub fn with_work_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.work_dir = dir.into();
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn transcoder(&self) -> &T {
        &self.transcoder
    }

    /// Process every link in order. A failing link is reported and recorded;
    /// it never stops the links after it.
    pub async fn run_batch(&self, links: &[String]) -> BatchReport {
        let mut report = BatchReport::default();

        for (i, link) in links.iter().enumerate() {
            let index = i + 1;
            info!(index, link = %link, source = self.source.name(), "processing link");

            match self.process_link(index, link).await {
                Ok(outcome) => report.outcomes.push((index, outcome)),
                Err(e) => {
                    println!("{}", failure_message(&e, index, link, links.len()));
                    error!(index, link = %link, error = %e, "link failed");
                    if let RipError::Resolution { reason: Some(reason), .. } = &e {
                        if reason.is_transient() {
                            warn!(index, %reason, "may succeed when retried later");
                        }
                    }
                    report.failures.push(LinkFailure {
                        index,
                        link: link.clone(),
                        error: e,
                    });
                }
            }
        }

        info!(
            succeeded = report.succeeded(),
            failed = report.failed(),
            "batch finished"
        );
        report
    }

    /// Run one link through the whole pipeline.
    pub async fn process_link(&self, index: usize, link: &str) -> Result<LinkOutcome, RipError> {
        let media = self.source.resolve(link).await?;
        let selection = self.selector.select(&media)?;
        println!(
            "Found {} quality stream for:\n{}",
            selection.quality(),
            selection.title
        );

        let job = LinkJob {
            link: link.to_string(),
            index,
            dir: self.work_dir.clone(),
            stem: filename_stem(&selection.title),
            selection,
        };
        let video = &job.selection.video;

        let Some(audio) = &job.selection.audio else {
            // Progressive stream only, no muxing required
            let target = job.single_file();
            if check_single(&target, video.size).await?.should_skip() {
                return Ok(LinkOutcome::AlreadyPresent(target));
            }
            println!("Downloading video ({}MB)", format_mb(video.size));
            self.fetch(&job, video, &target).await?;
            return Ok(LinkOutcome::Downloaded(target));
        };

        let output = job.muxed_output();
        if check_muxed(&output, audio.size, video.size)
            .await?
            .should_skip()
        {
            // Already muxed in an earlier run; never re-mux
            return Ok(LinkOutcome::AlreadyPresent(output));
        }

        println!("Downloading video ({}MB)", format_mb(video.size));
        self.fetch(&job, video, &job.unmuxed_video()).await?;
        println!("Downloading audio ({}MB)", format_mb(audio.size));
        self.fetch(&job, audio, &job.unmuxed_audio()).await?;

        let muxed = mux(&job, &self.transcoder).await?;
        Ok(LinkOutcome::Muxed(muxed))
    }

    /// Download one stream with a console progress bar. On failure the
    /// partially written files of the job are removed.
    async fn fetch(
        &self,
        job: &LinkJob,
        stream: &StreamDescriptor,
        dest: &Path,
    ) -> Result<(), RipError> {
        let mut progress = ConsoleProgress::new();
        let mut on_progress = |total: u64, remaining: u64| progress.report(total, remaining);

        match self.source.download(stream, dest, &mut on_progress).await {
            Ok(()) => Ok(()),
            Err(e) => {
                warn!(
                    index = job.index,
                    dest = %dest.display(),
                    error = %e,
                    "download failed, removing partial files"
                );
                cleanup(job, false).await;
                Err(match e {
                    RipError::Download(_) => e,
                    other => RipError::Download(other.to_string()),
                })
            }
        }
    }
}

/// Console message for a failed link. Batches name the link's position.
pub fn failure_message(error: &RipError, index: usize, link: &str, batch_len: usize) -> String {
    let in_batch = batch_len > 1;
    match error {
        RipError::Resolution { reason, .. } => {
            let mut msg = if in_batch {
                format!("Fatal error for video {} in list.\n({})\n{}", index, link, error)
            } else {
                format!("Fatal error: {}", error)
            };
            if let Some(reason) = reason {
                msg.push_str(&format!("\n[{}]", reason));
            }
            msg
        }
        RipError::Mux(_) if in_batch => {
            format!("Muxing failed for video {} in list.\n({})\n{}", index, link, error)
        }
        RipError::Mux(_) => format!("Muxing failed:\n{}", error),
        _ if in_batch => format!(
            "No streams found or downloading error for video\n{} in list.\n({})\n{}",
            index, link, error
        ),
        _ => format!("No streams found or downloading error:\n{}", error),
    }
}
