//! Bounded retry with exponential back-off for the sales API client.
//!
//! [`retry_with_backoff`] runs an attempt up to [`RetryPolicy::max_attempts`]
//! times. Every [`FetchError`] is treated as transient; there is no class of
//! failure that stops the loop early. The waits actually performed are kept
//! in a [`FetchReport`] so callers and tests can see the schedule.

use std::future::Future;
use std::time::Duration;

use crate::error::{FetchError, LoadFailure, LoaderError};

#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    max_attempts: u32,
    request_timeout: Duration,
    backoff_base: f64,
    backoff_unit: Duration,
}

impl Default for RetryPolicy {
    /// Three attempts, 10 s per request, waits of 2 s then 4 s.
    fn default() -> Self {
        Self {
            max_attempts: 3,
            request_timeout: Duration::from_secs(10),
            backoff_base: 2.0,
            backoff_unit: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Builds a policy with a one-second back-off unit.
    ///
    /// # Errors
    ///
    /// Returns [`LoaderError::InvalidPolicy`] unless `max_attempts >= 1`,
    /// `request_timeout > 0` and `backoff_base > 1`.
    pub fn new(
        max_attempts: u32,
        request_timeout: Duration,
        backoff_base: f64,
    ) -> Result<Self, LoaderError> {
        if max_attempts == 0 {
            return Err(LoaderError::InvalidPolicy(
                "max_attempts must be at least 1".to_owned(),
            ));
        }
        if request_timeout.is_zero() {
            return Err(LoaderError::InvalidPolicy(
                "request_timeout must be greater than zero".to_owned(),
            ));
        }
        if !backoff_base.is_finite() || backoff_base <= 1.0 {
            return Err(LoaderError::InvalidPolicy(format!(
                "backoff_base must be a finite number greater than 1, got {backoff_base}"
            )));
        }
        Ok(Self {
            max_attempts,
            request_timeout,
            backoff_base,
            backoff_unit: Duration::from_secs(1),
        })
    }

    /// Replaces the length of one back-off unit. A zero unit disables waiting.
    #[must_use]
    pub fn with_backoff_unit(mut self, unit: Duration) -> Self {
        self.backoff_unit = unit;
        self
    }

    #[must_use]
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    #[must_use]
    pub fn backoff_base(&self) -> f64 {
        self.backoff_base
    }

    #[must_use]
    pub fn backoff_unit(&self) -> Duration {
        self.backoff_unit
    }

    /// Wait after failed attempt number `attempt` (1-based):
    /// `backoff_unit × backoff_base^attempt`, uncapped. A product too large for
    /// a `Duration` saturates to `Duration::MAX`.
    ///
    /// | Failed attempt | Wait with unit 1 s, base 2 |
    /// |----------------|----------------------------|
    /// | 1              | 2 s                        |
    /// | 2              | 4 s                        |
    /// | 3              | 8 s                        |
    #[must_use]
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    pub fn delay_after(&self, attempt: u32) -> Duration {
        if self.backoff_unit.is_zero() {
            return Duration::ZERO;
        }
        let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);
        let nanos = self.backoff_unit.as_nanos() as f64 * self.backoff_base.powi(exponent);
        if !nanos.is_finite() || nanos >= u64::MAX as f64 {
            return Duration::MAX;
        }
        Duration::from_nanos(nanos as u64)
    }
}

/// What the retry loop did: how many attempts ran and which waits separated
/// them. `delays.len()` is always `attempts - 1`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchReport {
    pub attempts: u32,
    pub delays: Vec<Duration>,
}

/// Runs `operation` until it succeeds or `policy.max_attempts()` attempts
/// have failed. The operation receives the 1-based attempt number.
///
/// There is no wait after the final attempt.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    policy: &RetryPolicy,
    mut operation: F,
) -> Result<(T, FetchReport), LoadFailure>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, FetchError>>,
{
    let mut report = FetchReport::default();
    loop {
        report.attempts += 1;
        let attempt = report.attempts;
        match operation(attempt).await {
            Ok(value) => return Ok((value, report)),
            Err(err) => {
                if attempt >= policy.max_attempts {
                    tracing::warn!(
                        attempts = attempt,
                        error = %err,
                        "sales API attempts exhausted"
                    );
                    return Err(LoadFailure {
                        report,
                        last_error: err,
                    });
                }
                let delay = policy.delay_after(attempt);
                let delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
                tracing::warn!(
                    attempt,
                    max_attempts = policy.max_attempts,
                    delay_ms,
                    error = %err,
                    "sales API attempt failed; retrying after back-off"
                );
                tokio::time::sleep(delay).await;
                report.delays.push(delay);
            }
        }
    }
}
