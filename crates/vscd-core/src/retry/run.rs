//! Retry loop: run a closure until success or policy says stop.

use super::policy::{RetryDecision, RetryPolicy};

/// Runs `op` until it succeeds or the retry policy says to stop.
///
/// `op` receives the 1-based attempt number. After a failure, `is_retryable`
/// decides whether the error is worth another attempt; if the policy agrees,
/// the thread sleeps for the policy delay and tries again. The last error is
/// returned unchanged once retries are exhausted.
pub fn run_with_retry<T, E, F, P>(policy: &RetryPolicy, is_retryable: P, mut op: F) -> Result<T, E>
where
    F: FnMut(u32) -> Result<T, E>,
    P: Fn(&E) -> bool,
    E: std::fmt::Display,
{
    let mut attempt = 1u32;
    loop {
        match op(attempt) {
            Ok(v) => return Ok(v),
            Err(e) => match policy.decide(attempt, is_retryable(&e)) {
                RetryDecision::NoRetry => return Err(e),
                RetryDecision::RetryAfter(d) => {
                    tracing::warn!(
                        attempt,
                        max_attempts = policy.max_attempts,
                        "attempt failed: {}; retrying in {:?}",
                        e,
                        d
                    );
                    std::thread::sleep(d);
                    attempt += 1;
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    fn quick(max_attempts: u32) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            delay: Duration::from_millis(20),
        }
    }

    #[test]
    fn returns_first_success() {
        let mut calls = 0;
        let r: Result<u32, String> = run_with_retry(&quick(3), |_| true, |n| {
            calls += 1;
            Ok(n)
        });
        assert_eq!(r, Ok(1));
        assert_eq!(calls, 1);
    }

    #[test]
    fn retries_until_success() {
        let r: Result<u32, String> = run_with_retry(&quick(3), |_| true, |n| {
            if n < 3 {
                Err(format!("fail {n}"))
            } else {
                Ok(n)
            }
        });
        assert_eq!(r, Ok(3));
    }

    #[test]
    fn gives_up_with_last_error() {
        let mut calls = 0;
        let r: Result<(), String> = run_with_retry(&quick(3), |_| true, |n| {
            calls += 1;
            Err(format!("fail {n}"))
        });
        assert_eq!(r, Err("fail 3".to_string()));
        assert_eq!(calls, 3);
    }

    #[test]
    fn permanent_error_stops_immediately() {
        let mut calls = 0;
        let r: Result<(), String> = run_with_retry(&quick(3), |e: &String| e != "permanent", |_| {
            calls += 1;
            Err("permanent".to_string())
        });
        assert!(r.is_err());
        assert_eq!(calls, 1);
    }

    #[test]
    fn sleeps_between_attempts() {
        let policy = quick(3);
        let start = Instant::now();
        let _: Result<(), &str> = run_with_retry(&policy, |_| true, |_| Err("x"));
        assert!(start.elapsed() >= policy.delay * 2);
    }
}
