//! Classify HTTP status and curl errors into retry policy error kinds.

use super::error::FetchFailure;
use super::policy::ErrorKind;

/// Classify an HTTP status code for retry decisions.
pub fn classify_http_status(code: u32) -> ErrorKind {
    match code {
        200..=299 => ErrorKind::Other,
        500..=599 => ErrorKind::Http5xx(code as u16),
        _ => ErrorKind::HttpStatus(code as u16),
    }
}

/// Classify a curl error for retry decisions.
///
/// Only errors in the request itself (unknown scheme, malformed URL, bad
/// option) are permanent. Everything else happened on the wire and counts as
/// a connection failure: refused or reset connections, TLS, HTTP/2 stream
/// resets, garbled replies, broken transfer encodings, redirect loops.
pub fn classify_curl_error(e: &curl::Error) -> ErrorKind {
    if e.is_operation_timedout() {
        return ErrorKind::Timeout;
    }
    if e.is_unsupported_protocol() || e.is_url_malformed() || e.is_bad_function_argument() {
        return ErrorKind::Other;
    }
    ErrorKind::Connection
}

/// Classify a download failure into an ErrorKind.
pub fn classify(e: &FetchFailure) -> ErrorKind {
    match e {
        FetchFailure::Curl(ce) => classify_curl_error(ce),
        FetchFailure::Http(code) => classify_http_status(*code),
        FetchFailure::Storage(_) => ErrorKind::Local,
    }
}

/// Retry predicate used by the package fetcher: transport failures and any
/// non-2xx status are worth another attempt, local and malformed-request
/// errors are not.
pub fn is_transient(e: &FetchFailure) -> bool {
    matches!(
        classify(e),
        ErrorKind::Timeout | ErrorKind::Connection | ErrorKind::Http5xx(_) | ErrorKind::HttpStatus(_)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_5xx_retryable() {
        assert!(matches!(classify_http_status(500), ErrorKind::Http5xx(500)));
        assert!(matches!(classify_http_status(503), ErrorKind::Http5xx(503)));
        assert!(is_transient(&FetchFailure::Http(502)));
    }

    #[test]
    fn http_4xx_is_status_and_still_transient() {
        assert_eq!(classify_http_status(404), ErrorKind::HttpStatus(404));
        assert!(is_transient(&FetchFailure::Http(404)));
    }

    #[test]
    fn storage_errors_are_not_retried() {
        let e = FetchFailure::Storage(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "denied",
        ));
        assert_eq!(classify(&e), ErrorKind::Local);
        assert!(!is_transient(&e));
    }

    #[test]
    fn malformed_url_is_not_retried() {
        // CURLE_URL_MALFORMAT
        let e = FetchFailure::Curl(curl::Error::new(3));
        assert_eq!(classify(&e), ErrorKind::Other);
        assert!(!is_transient(&e));
    }

    #[test]
    fn request_errors_are_not_retried() {
        // CURLE_UNSUPPORTED_PROTOCOL, CURLE_BAD_FUNCTION_ARGUMENT
        for code in [1, 43] {
            let e = FetchFailure::Curl(curl::Error::new(code));
            assert!(!is_transient(&e), "curl {code}");
        }
    }

    #[test]
    fn wire_errors_are_transient() {
        // weird reply, HTTP/2 framing, redirect loop, bad content encoding,
        // HTTP/2 stream reset, TLS connect
        for code in [8, 16, 47, 61, 92, 35] {
            let e = FetchFailure::Curl(curl::Error::new(code));
            assert_eq!(classify(&e), ErrorKind::Connection, "curl {code}");
            assert!(is_transient(&e), "curl {code}");
        }
    }

    #[test]
    fn connect_failure_is_transient() {
        // CURLE_COULDNT_CONNECT
        let e = FetchFailure::Curl(curl::Error::new(7));
        assert_eq!(classify(&e), ErrorKind::Connection);
        // CURLE_OPERATION_TIMEDOUT
        let t = FetchFailure::Curl(curl::Error::new(28));
        assert_eq!(classify(&t), ErrorKind::Timeout);
    }
}
