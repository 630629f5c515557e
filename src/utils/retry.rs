use std::future::Future;
use std::time::Duration;

use crate::error::{AppError, AppResult};

/// Bounded fixed-delay retry for state-committing backend mutations.
///
/// The draw ceremony shows an outcome to the audience before the write lands,
/// so commit/discard mutations must be driven until they succeed or the
/// budget is exhausted; exhaustion escalates to a session reset by the
/// caller. Read queries do not go through this.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
        }
    }

    pub async fn run<T, F, Fut>(&self, what: &str, mut op: F) -> AppResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = AppResult<T>>,
    {
        let mut attempt = 0u32;
        loop {
            attempt += 1;
            match op().await {
                Ok(value) => {
                    if attempt > 1 {
                        log::info!("{what} succeeded on attempt {attempt}");
                    }
                    return Ok(value);
                }
                Err(err) => {
                    if attempt >= self.max_attempts {
                        return Err(AppError::RetriesExhausted {
                            attempts: attempt,
                            message: format!("{what}: {err}"),
                        });
                    }
                    log::warn!(
                        "{what} failed on attempt {attempt}/{}: {err}, retrying",
                        self.max_attempts
                    );
                    tokio::time::sleep(self.delay).await;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn succeeds_after_transient_failures() {
        let policy = RetryPolicy::new(3, Duration::from_millis(0));
        let calls = AtomicU32::new(0);

        let result = policy
            .run("test mutation", || {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if n < 2 {
                        Err(AppError::BackendApiError("transient".into()))
                    } else {
                        Ok(42)
                    }
                }
            })
            .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn exhaustion_reports_attempt_count() {
        let policy = RetryPolicy::new(2, Duration::from_millis(0));
        let calls = AtomicU32::new(0);

        let result: AppResult<()> = policy
            .run("test mutation", || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(AppError::BackendApiError("down".into())) }
            })
            .await;

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        match result {
            Err(AppError::RetriesExhausted { attempts, message }) => {
                assert_eq!(attempts, 2);
                assert!(message.contains("down"));
            }
            other => panic!("expected RetriesExhausted, got {other:?}"),
        }
    }
}
