// Transfer and process backends

pub mod ffmpeg;
pub mod http;

pub use ffmpeg::FfmpegTranscoder;
pub use http::HttpFetcher;
