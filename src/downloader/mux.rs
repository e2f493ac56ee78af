// Mux coordination: combine the separately downloaded streams via the transcoder

use std::path::PathBuf;

use tracing::{error, info};

use super::cleanup::cleanup;
use super::errors::RipError;
use super::models::LinkJob;
use super::traits::Transcoder;

/// Transcoder arguments for `job`:
/// `-y -i <audio> [-r <fps>] -i <video> -c copy <title>.mp4`
///
/// `-r` sits before the video input so the video is read at its own frame
/// rate; streams are copied, never re-encoded.
pub fn mux_args(job: &LinkJob) -> Vec<String> {
    let mut args = vec![
        "-y".to_string(),
        "-i".to_string(),
        job.unmuxed_audio().to_string_lossy().to_string(),
    ];
    if let Some(fps) = job.selection.frame_rate.filter(|f| *f > 0.0) {
        args.push("-r".to_string());
        args.push(fps.to_string());
    }
    args.push("-i".to_string());
    args.push(job.unmuxed_video().to_string_lossy().to_string());
    args.push("-c".to_string());
    args.push("copy".to_string());
    args.push(job.muxed_output().to_string_lossy().to_string());
    args
}

/// Names the output file only, not the directory it was written to
pub fn success_message(job: &LinkJob) -> String {
    let output = job.muxed_output();
    let name = output
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| output.display().to_string());
    format!("Muxing successful! Output is:\n{}", name)
}

/// Run the transcoder for `job` and clean up after it.
///
/// On success the intermediates are removed and the output path returned.
/// On a non-zero exit or launch failure the partial output is removed too.
pub async fn mux(job: &LinkJob, transcoder: &dyn Transcoder) -> Result<PathBuf, RipError> {
    let args = mux_args(job);
    info!(index = job.index, transcoder = transcoder.name(), args = ?args, "muxing");

    let failure = match transcoder.run(&args).await {
        Ok(0) => None,
        Ok(code) => Some(RipError::Mux(format!(
            "{} exited with status {}",
            transcoder.name(),
            code
        ))),
        Err(e) => Some(e),
    };

    match failure {
        None => {
            let output = job.muxed_output();
            println!("{}", success_message(job));
            cleanup(job, false).await;
            Ok(output)
        }
        Some(e) => {
            println!("Something went wrong muxing!");
            error!(index = job.index, error = %e, "mux failed");
            cleanup(job, true).await;
            Err(e)
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::downloader::cleanup::tests::muxed_job;
    use async_trait::async_trait;
    use std::path::Path;
    use std::sync::Mutex;

    /// Transcoder double: records calls, optionally writes the output file
    pub(crate) struct FakeTranscoder {
        pub exit_code: Option<i32>,
        pub write_output: bool,
        pub calls: Mutex<Vec<Vec<String>>>,
    }

    impl FakeTranscoder {
        pub(crate) fn exiting(code: i32) -> Self {
            Self {
                exit_code: Some(code),
                write_output: true,
                calls: Mutex::new(Vec::new()),
            }
        }

        pub(crate) fn unlaunchable() -> Self {
            Self {
                exit_code: None,
                write_output: false,
                calls: Mutex::new(Vec::new()),
            }
        }

        pub(crate) fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl Transcoder for FakeTranscoder {
        fn name(&self) -> &'static str {
            "fake-ffmpeg"
        }

        async fn run(&self, args: &[String]) -> Result<i32, RipError> {
            self.calls.lock().unwrap().push(args.to_vec());
            let Some(code) = self.exit_code else {
                return Err(RipError::Mux("failed to start fake-ffmpeg".to_string()));
            };
            if self.write_output {
                if let Some(out) = args.last() {
                    std::fs::write(out, b"muxed")?;
                }
            }
            Ok(code)
        }
    }

    fn touch_inputs(job: &LinkJob) {
        std::fs::write(job.unmuxed_video(), b"v").unwrap();
        std::fs::write(job.unmuxed_audio(), b"a").unwrap();
    }

    #[test]
    fn argument_layout() {
        let dir = tempfile::tempdir().unwrap();
        let job = muxed_job(dir.path());
        let args = mux_args(&job);
        let p = |name: &str| dir.path().join(name).to_string_lossy().to_string();
        assert_eq!(
            args,
            vec![
                "-y".to_string(),
                "-i".to_string(),
                p("unmuxed-audio-sometitle.mp4"),
                "-r".to_string(),
                "30".to_string(),
                "-i".to_string(),
                p("unmuxed-video-sometitle.webm"),
                "-c".to_string(),
                "copy".to_string(),
                p("Some Title.mp4"),
            ]
        );
    }

    #[test]
    fn success_message_names_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let job = muxed_job(dir.path());
        assert_eq!(success_message(&job), "Muxing successful! Output is:\nSome Title.mp4");

        let mut job = muxed_job(Path::new("."));
        job.selection.title = "AC/DC".to_string();
        assert_eq!(success_message(&job), "Muxing successful! Output is:\nAC_DC.mp4");
    }

    #[test]
    fn frame_rate_is_optional() {
        let dir = tempfile::tempdir().unwrap();
        let mut job = muxed_job(dir.path());
        job.selection.frame_rate = None;
        assert!(!mux_args(&job).contains(&"-r".to_string()));

        job.selection.frame_rate = Some(29.97);
        assert!(mux_args(&job).contains(&"29.97".to_string()));
    }

    #[tokio::test]
    async fn success_cleans_intermediates() {
        let dir = tempfile::tempdir().unwrap();
        let job = muxed_job(dir.path());
        touch_inputs(&job);
        let transcoder = FakeTranscoder::exiting(0);

        let output = mux(&job, &transcoder).await.unwrap();
        assert_eq!(output, job.muxed_output());
        assert!(output.exists());
        assert!(!job.unmuxed_video().exists());
        assert!(!job.unmuxed_audio().exists());
        assert_eq!(transcoder.call_count(), 1);
    }

    #[tokio::test]
    async fn non_zero_exit_removes_partial_output() {
        let dir = tempfile::tempdir().unwrap();
        let job = muxed_job(dir.path());
        touch_inputs(&job);
        let transcoder = FakeTranscoder::exiting(1);

        let err = mux(&job, &transcoder).await.unwrap_err();
        assert!(matches!(err, RipError::Mux(_)));
        assert!(!job.muxed_output().exists());
        assert!(!job.unmuxed_video().exists());
    }

    #[tokio::test]
    async fn launch_failure_is_a_mux_error() {
        let dir = tempfile::tempdir().unwrap();
        let job = muxed_job(dir.path());
        touch_inputs(&job);
        std::fs::write(job.muxed_output(), b"stale").unwrap();

        let err = mux(&job, &FakeTranscoder::unlaunchable()).await.unwrap_err();
        assert!(matches!(err, RipError::Mux(_)));
        assert!(!job.muxed_output().exists());
    }
}
