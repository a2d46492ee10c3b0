//! Package fetcher: single-stream HTTP GET to a local file, retried on
//! transient network failure.
//!
//! Each attempt truncates the destination and streams the body into it. No
//! checksum or signature is checked here.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::config::FetchConfig;
use crate::error::{InstallError, Result};
use crate::retry::{is_transient, run_with_retry, FetchFailure, RetryPolicy};

const USER_AGENT: &str = concat!("vscd/", env!("CARGO_PKG_VERSION"));

/// Timeouts and retry policy for one download.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchOptions {
    pub connect_timeout: Duration,
    /// A transfer that receives no data for this long is aborted as a timeout.
    pub read_timeout: Duration,
    pub retry: RetryPolicy,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self::from(&FetchConfig::default())
    }
}

impl From<&FetchConfig> for FetchOptions {
    fn from(cfg: &FetchConfig) -> Self {
        Self {
            connect_timeout: cfg.connect_timeout(),
            read_timeout: cfg.read_timeout(),
            retry: cfg.retry_policy(),
        }
    }
}

/// One download of `source_url` into `destination_path`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchJob {
    source_url: String,
    destination_path: PathBuf,
    attempt_count: u32,
}

impl FetchJob {
    pub fn new(source_url: impl Into<String>, destination_path: impl Into<PathBuf>) -> Self {
        Self {
            source_url: source_url.into(),
            destination_path: destination_path.into(),
            attempt_count: 0,
        }
    }

    pub fn source_url(&self) -> &str {
        &self.source_url
    }

    pub fn destination_path(&self) -> &Path {
        &self.destination_path
    }

    /// Number of HTTP attempts made so far.
    pub fn attempt_count(&self) -> u32 {
        self.attempt_count
    }

    /// Downloads the body, retrying per `opts.retry`. Returns the number of
    /// bytes written. On failure the destination may hold a partial body.
    pub fn run(&mut self, opts: &FetchOptions) -> Result<u64> {
        let url = self.source_url.as_str();
        let dest = self.destination_path.as_path();
        let attempts = &mut self.attempt_count;

        let result = run_with_retry(&opts.retry, is_transient, |attempt| {
            *attempts += 1;
            tracing::info!(
                "downloading {} (attempt {}/{})",
                url,
                attempt,
                opts.retry.max_attempts
            );
            download_once(url, dest, opts)
        });

        match result {
            Ok(bytes) => {
                tracing::info!("download complete: {} ({} bytes)", dest.display(), bytes);
                Ok(bytes)
            }
            Err(source) => {
                tracing::error!("download of {} failed: {}", url, source);
                Err(InstallError::Fetch {
                    url: url.to_string(),
                    attempts: self.attempt_count,
                    source,
                })
            }
        }
    }
}

/// Downloads `url` into `destination`, overwriting it.
pub fn fetch(url: &str, destination: &Path, opts: &FetchOptions) -> Result<FetchJob> {
    let mut job = FetchJob::new(url, destination);
    job.run(opts)?;
    Ok(job)
}

/// One GET with no retry. Returns the number of body bytes written.
fn download_once(url: &str, destination: &Path, opts: &FetchOptions) -> std::result::Result<u64, FetchFailure> {
    let mut file = File::create(destination).map_err(FetchFailure::Storage)?;

    let mut easy = curl::easy::Easy::new();
    easy.url(url).map_err(FetchFailure::Curl)?;
    easy.follow_location(true).map_err(FetchFailure::Curl)?;
    easy.max_redirections(10).map_err(FetchFailure::Curl)?;
    easy.useragent(USER_AGENT).map_err(FetchFailure::Curl)?;
    easy.connect_timeout(opts.connect_timeout)
        .map_err(FetchFailure::Curl)?;
    // Any progress at all within read_timeout keeps the transfer alive.
    easy.low_speed_limit(1).map_err(FetchFailure::Curl)?;
    easy.low_speed_time(opts.read_timeout)
        .map_err(FetchFailure::Curl)?;

    let mut written = 0u64;
    let mut write_error: Option<std::io::Error> = None;
    let performed = {
        let mut transfer = easy.transfer();
        transfer
            .write_function(|data| match file.write_all(data) {
                Ok(()) => {
                    written += data.len() as u64;
                    Ok(data.len())
                }
                Err(e) => {
                    write_error = Some(e);
                    Ok(0) // abort transfer
                }
            })
            .map_err(FetchFailure::Curl)?;
        transfer.perform()
    };

    if let Some(e) = write_error {
        return Err(FetchFailure::Storage(e));
    }
    performed.map_err(FetchFailure::Curl)?;

    let code = easy.response_code().map_err(FetchFailure::Curl)?;
    if !(200..300).contains(&code) {
        return Err(FetchFailure::Http(code));
    }

    file.flush().map_err(FetchFailure::Storage)?;
    Ok(written)
}
