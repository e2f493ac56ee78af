// Collaborator traits: metadata/download source and transcoder

use std::path::Path;

use async_trait::async_trait;

use super::errors::RipError;
use super::models::{MediaInfo, StreamDescriptor};

/// Progress callback: `(total_size, bytes_remaining)` per received chunk
pub type ProgressFn<'a> = dyn FnMut(u64, u64) + Send + 'a;

/// Source of media metadata and stream bytes
#[async_trait]
pub trait MediaSource: Send + Sync {
    /// Name of the source (for logging)
    fn name(&self) -> &'static str;

    /// Resolve a link into its title and available streams
    async fn resolve(&self, link: &str) -> Result<MediaInfo, RipError>;

    /// Write the stream's bytes to `dest`, calling `on_progress` as data arrives
    async fn download(
        &self,
        stream: &StreamDescriptor,
        dest: &Path,
        on_progress: &mut ProgressFn<'_>,
    ) -> Result<(), RipError>;
}

/// External transcoder process
#[async_trait]
pub trait Transcoder: Send + Sync {
    /// Name of the transcoder (for logging)
    fn name(&self) -> &'static str;

    /// Run one invocation to completion and return its exit code.
    /// Launch failures are returned as `RipError::Mux`.
    async fn run(&self, args: &[String]) -> Result<i32, RipError>;
}
