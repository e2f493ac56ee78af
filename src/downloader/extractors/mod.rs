// Metadata extraction
//
// `YtDlpSource` resolves links through the `yt-dlp` binary and implements
// `MediaSource`; `diagnostics` classifies its failures.

mod diagnostics;
mod ytdlp;

pub use diagnostics::BlockingReason;
pub use ytdlp::{parse_dump_json, YtDlpConfig, YtDlpSource};
