//! Download error type for retry classification.

use std::fmt;

/// Error returned by a single download attempt (curl failure, HTTP error, or
/// local write failure). Kept separate from `InstallError` so attempts can be
/// classified before the retry loop gives up.
#[derive(Debug)]
pub enum FetchFailure {
    /// Curl reported an error (timeout, connection, malformed URL, etc.).
    Curl(curl::Error),
    /// HTTP response had a non-2xx status.
    Http(u32),
    /// Creating or writing the destination file failed. Not retried.
    Storage(std::io::Error),
}

impl fmt::Display for FetchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchFailure::Curl(e) => write!(f, "{}", e),
            FetchFailure::Http(code) => write!(f, "HTTP {}", code),
            FetchFailure::Storage(e) => write!(f, "storage: {}", e),
        }
    }
}

impl std::error::Error for FetchFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FetchFailure::Curl(e) => Some(e),
            FetchFailure::Storage(e) => Some(e),
            FetchFailure::Http(_) => None,
        }
    }
}
