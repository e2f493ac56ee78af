// Downloader module - selection, reconciliation, download, mux and cleanup

pub mod backends;
pub mod cleanup;
pub mod errors;
pub mod extractors;
pub mod format_selector;
pub mod models;
pub mod mux;
pub mod orchestrator;
pub mod progress;
pub mod reconcile;
pub mod tools;
pub mod traits;
pub mod utils;

pub use errors::RipError;
pub use format_selector::{FormatSelector, SelectorConfig};
pub use models::{BatchReport, LinkOutcome, MediaInfo, SelectionResult, StreamDescriptor};
pub use orchestrator::Ripper;
pub use traits::{MediaSource, Transcoder};
