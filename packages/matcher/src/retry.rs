//! Timeout and retry boundary for store calls.
//!
//! Every store lookup made by the engine goes through [`with_retry`]. Each
//! attempt runs under [`tokio::time::timeout`]; a timed-out attempt counts
//! as a transient failure. Transient failures are retried with exponential
//! backoff (`base_backoff_ms`, then doubled each time) up to
//! `max_retries` times. Permanent failures return immediately.

use std::future::Future;

use paf_match_address_models::StoreConfig;

use crate::{MatchError, StoreError};

/// Runs `call` until it succeeds, fails permanently, or runs out of retries.
///
/// `call` is invoked once per attempt to build a fresh future.
///
/// # Errors
///
/// * [`MatchError::StoreUnavailable`] if every attempt failed transiently
/// * [`MatchError::Store`] on the first non-transient failure
pub async fn with_retry<T, F, Fut>(
    operation: &str,
    config: &StoreConfig,
    mut call: F,
) -> Result<T, MatchError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, StoreError>>,
{
    let max_retries = config.max_retries;
    let timeout = config.query_timeout();
    let mut last_error: Option<StoreError> = None;

    for attempt in 0..=max_retries {
        if attempt > 0 {
            let delay = config.backoff(attempt);
            log::warn!("  retry {attempt}/{max_retries} of {operation} in {delay:?}...");
            tokio::time::sleep(delay).await;
        }

        let result = tokio::time::timeout(timeout, call())
            .await
            .unwrap_or(Err(StoreError::Timeout { after: timeout }));

        match result {
            Ok(value) => return Ok(value),
            Err(e) if !e.is_transient() => {
                return Err(MatchError::Store {
                    operation: operation.to_string(),
                    source: e,
                });
            }
            Err(e) => {
                log::warn!("  transient store error during {operation}: {e}");
                last_error = Some(e);
            }
        }
    }

    Err(MatchError::StoreUnavailable {
        operation: operation.to_string(),
        attempts: max_retries + 1,
        source: last_error.unwrap_or_else(|| StoreError::Unavailable {
            message: "store call failed after all retries".to_string(),
        }),
    })
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    use super::*;

    fn fast_config(max_retries: u32) -> StoreConfig {
        StoreConfig {
            query_timeout_ms: 50,
            max_retries,
            base_backoff_ms: 1,
        }
    }

    #[tokio::test]
    async fn returns_first_success() {
        let calls = &AtomicU32::new(0);
        let value = with_retry("lookup", &fast_config(3), || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok::<_, StoreError>(7)
        })
        .await
        .unwrap();
        assert_eq!(value, 7);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn retries_transient_then_succeeds() {
        let calls = &AtomicU32::new(0);
        let value = with_retry("lookup", &fast_config(3), || async move {
            if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                Err(StoreError::Unavailable {
                    message: "locked".to_string(),
                })
            } else {
                Ok("done")
            }
        })
        .await
        .unwrap();
        assert_eq!(value, "done");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn gives_up_after_max_retries() {
        let calls = &AtomicU32::new(0);
        let err = with_retry("lookup", &fast_config(2), || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Err::<(), _>(StoreError::Unavailable {
                message: "down".to_string(),
            })
        })
        .await
        .unwrap_err();

        assert_eq!(calls.load(Ordering::SeqCst), 3);
        match err {
            MatchError::StoreUnavailable {
                operation,
                attempts,
                source,
            } => {
                assert_eq!(operation, "lookup");
                assert_eq!(attempts, 3);
                assert!(matches!(source, StoreError::Unavailable { .. }));
            }
            MatchError::Store { .. } => panic!("expected StoreUnavailable, got {err:?}"),
        }
    }

    #[tokio::test]
    async fn does_not_retry_permanent_errors() {
        let calls = &AtomicU32::new(0);
        let err = with_retry("lookup", &fast_config(3), || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Err::<(), _>(StoreError::Backend("bad sql".into()))
        })
        .await
        .unwrap_err();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(matches!(err, MatchError::Store { .. }));
    }

    #[tokio::test]
    async fn times_out_slow_calls() {
        let err = with_retry("lookup", &fast_config(1), || async move {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok::<_, StoreError>(())
        })
        .await
        .unwrap_err();

        match err {
            MatchError::StoreUnavailable {
                attempts, source, ..
            } => {
                assert_eq!(attempts, 2);
                assert!(matches!(
                    source,
                    StoreError::Timeout { after } if after == Duration::from_millis(50)
                ));
            }
            MatchError::Store { .. } => panic!("expected StoreUnavailable, got {err:?}"),
        }
    }
}
