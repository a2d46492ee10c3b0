//! Retry policy for downloads.
//!
//! Error classification (timeouts, connection failures, HTTP status) is kept
//! apart from the retry loop so the loop stays generic: it takes a policy and
//! a predicate over the error and knows nothing about HTTP.

mod classify;
mod error;
mod policy;
mod run;

pub use classify::{classify, classify_curl_error, classify_http_status, is_transient};
pub use error::FetchFailure;
pub use policy::{ErrorKind, RetryDecision, RetryPolicy};
pub use run::run_with_retry;
