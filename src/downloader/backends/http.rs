// HTTP stream fetcher: writes a selected format's bytes to disk chunk by chunk

use std::path::Path;
use std::time::Duration;

use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use crate::downloader::errors::RipError;
use crate::downloader::models::StreamDescriptor;
use crate::downloader::traits::ProgressFn;

pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(proxy: Option<&str>, connect_timeout_secs: u64) -> Result<Self, RipError> {
        let mut builder =
            reqwest::Client::builder().connect_timeout(Duration::from_secs(connect_timeout_secs));

        if let Some(proxy_url) = proxy {
            let proxy = reqwest::Proxy::all(proxy_url)
                .map_err(|e| RipError::Download(format!("Invalid proxy URL {}: {}", proxy_url, e)))?;
            builder = builder.proxy(proxy);
        }

        Ok(Self {
            client: builder.build()?,
        })
    }

    /// Stream `stream.url` into `dest`, overwriting it.
    ///
    /// Progress is reported as `(total, remaining)` after every chunk and
    /// ends with `remaining == 0`. The server's Content-Length is the only
    /// length a short body is checked against; the declared stream size may
    /// be an estimate and only seeds the progress total.
    pub async fn fetch_to(
        &self,
        stream: &StreamDescriptor,
        dest: &Path,
        on_progress: &mut ProgressFn<'_>,
    ) -> Result<u64, RipError> {
        let mut request = self.client.get(&stream.url);
        for (name, value) in &stream.http_headers {
            request = request.header(name.as_str(), value.as_str());
        }

        let mut response = request.send().await?.error_for_status()?;
        let content_length = response.content_length();
        let mut total = content_length.unwrap_or(stream.size);
        debug!(url = %stream.url, total, ?content_length, dest = %dest.display(), "fetching stream");

        let mut file = tokio::fs::File::create(dest).await?;
        let mut written: u64 = 0;
        while let Some(chunk) = response.chunk().await? {
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
            total = total.max(written);
            on_progress(total, total - written);
        }
        file.flush().await?;

        if let Some(expected) = content_length {
            if written < expected {
                return Err(RipError::Download(format!(
                    "connection closed after {} of {} bytes",
                    written, expected
                )));
            }
        }
        if stream.size > 0 && written != stream.size {
            warn!(declared = stream.size, received = written, "stream size differs from declared size");
        }
        // Estimated totals end short of the bar; close it at what arrived
        if total != written {
            on_progress(written, 0);
        }
        Ok(written)
    }
}
