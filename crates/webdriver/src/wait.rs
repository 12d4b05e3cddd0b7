//! Poll-with-deadline utility
//!
//! Browser rendering is asynchronous, so the harness never asserts on a
//! single read of page state; it re-runs a predicate against the live page
//! until the predicate holds or the deadline passes. Timeouts and poll
//! intervals are always supplied by the caller.

use std::future::Future;
use std::time::{Duration, Instant};

use tokio::time::sleep;

/// Repeatedly evaluate `predicate` until it returns `Ok(true)` or `timeout`
/// elapses.
///
/// Returns `Ok(true)` on success, `Ok(false)` if the deadline passed with
/// the predicate still false, and `Err` as soon as the predicate itself
/// fails. The predicate is always evaluated at least once, so a zero
/// timeout degenerates to a single check.
pub async fn wait_until<F, Fut, E>(
    timeout: Duration,
    interval: Duration,
    mut predicate: F,
) -> Result<bool, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<bool, E>>,
{
    let deadline = Instant::now() + timeout;
    loop {
        if predicate().await? {
            return Ok(true);
        }
        if Instant::now() >= deadline {
            return Ok(false);
        }
        sleep(interval).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn immediate_success() {
        let ok = wait_until(Duration::from_millis(50), Duration::from_millis(5), || async {
            Ok::<_, ()>(true)
        })
        .await
        .unwrap();
        assert!(ok);
    }

    #[tokio::test]
    async fn succeeds_after_a_few_polls() {
        let mut calls = 0;
        let ok = wait_until(Duration::from_secs(5), Duration::from_millis(1), || {
            calls += 1;
            let done = calls >= 3;
            async move { Ok::<_, ()>(done) }
        })
        .await
        .unwrap();
        assert!(ok);
        assert_eq!(calls, 3);
    }

    #[tokio::test]
    async fn times_out_when_never_true() {
        let ok = wait_until(Duration::from_millis(20), Duration::from_millis(5), || async {
            Ok::<_, ()>(false)
        })
        .await
        .unwrap();
        assert!(!ok);
    }

    #[tokio::test]
    async fn zero_timeout_still_checks_once() {
        let mut calls = 0;
        let ok = wait_until(Duration::ZERO, Duration::from_millis(1), || {
            calls += 1;
            async { Ok::<_, ()>(false) }
        })
        .await
        .unwrap();
        assert!(!ok);
        assert_eq!(calls, 1);
    }

    #[tokio::test]
    async fn predicate_error_propagates() {
        let res: Result<bool, &str> =
            wait_until(Duration::from_millis(20), Duration::from_millis(5), || async {
                Err("boom")
            })
            .await;
        assert_eq!(res.unwrap_err(), "boom");
    }
}
