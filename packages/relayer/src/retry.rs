//! Retry and error recovery for transaction submission
//!
//! Exponential backoff around chain calls. Only transient chain errors are
//! retried; a rejection is final.

use std::future::Future;
use std::time::Duration;

use tracing::{debug, warn};

use crate::chain::ChainError;

/// Submission retry configuration
#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    /// Maximum number of retries after the first attempt
    pub max_retries: u32,
    /// Initial backoff duration
    pub initial_backoff: Duration,
    /// Maximum backoff duration
    pub max_backoff: Duration,
    /// Backoff multiplier for exponential growth
    pub backoff_multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 5,
            initial_backoff: Duration::from_secs(2),
            max_backoff: Duration::from_secs(60),
            backoff_multiplier: 2.0,
        }
    }
}

impl RetryConfig {
    /// Calculate backoff duration for a given attempt (0-indexed)
    pub fn backoff_for_attempt(&self, attempt: u32) -> Duration {
        let backoff_secs =
            self.initial_backoff.as_secs_f64() * self.backoff_multiplier.powi(attempt as i32);
        let capped = backoff_secs.min(self.max_backoff.as_secs_f64());
        Duration::from_secs_f64(capped)
    }

    /// Check if we should retry based on attempt count
    pub fn should_retry(&self, attempt: u32) -> bool {
        attempt < self.max_retries
    }
}

/// Classifies errors for retry decisions
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorClass {
    /// Temporary failure (RPC timeout, node unavailable)
    Transient,
    /// Will fail the same way again (rejected transaction, bad query)
    Permanent,
}

pub fn classify_error(error: &ChainError) -> ErrorClass {
    if error.is_transient() {
        ErrorClass::Transient
    } else {
        ErrorClass::Permanent
    }
}

/// Action to take after a failed attempt
#[derive(Debug, Clone, PartialEq)]
pub enum RetryAction {
    RetryAfter(Duration),
    GiveUp,
}

/// Retry state for one operation
#[derive(Debug, Clone)]
pub struct RetryContext {
    pub config: RetryConfig,
    pub attempt: u32,
    pub last_error: Option<ChainError>,
}

impl RetryContext {
    pub fn with_config(config: RetryConfig) -> Self {
        Self {
            config,
            attempt: 0,
            last_error: None,
        }
    }

    pub fn record_failure(&mut self, error: ChainError) {
        self.attempt += 1;
        self.last_error = Some(error);
    }

    /// Decide what to do after the last recorded failure.
    pub fn next_action(&self) -> RetryAction {
        let Some(error) = &self.last_error else {
            return RetryAction::GiveUp;
        };

        match classify_error(error) {
            ErrorClass::Permanent => {
                debug!(error = %error, "Permanent error - not retrying");
                RetryAction::GiveUp
            }
            ErrorClass::Transient => {
                if !self.config.should_retry(self.attempt - 1) {
                    return RetryAction::GiveUp;
                }
                RetryAction::RetryAfter(self.config.backoff_for_attempt(self.attempt - 1))
            }
        }
    }
}

/// Run `operation` until it succeeds, fails permanently or runs out of retries.
///
/// The closure receives the 0-indexed attempt number.
pub async fn with_retry<F, T, Fut>(config: &RetryConfig, mut operation: F) -> Result<T, ChainError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, ChainError>>,
{
    let mut ctx = RetryContext::with_config(config.clone());

    loop {
        match operation(ctx.attempt).await {
            Ok(result) => return Ok(result),
            Err(err) => {
                ctx.record_failure(err.clone());

                match ctx.next_action() {
                    RetryAction::RetryAfter(backoff) => {
                        warn!(
                            attempt = ctx.attempt,
                            max = config.max_retries,
                            ?backoff,
                            error = %err,
                            "Retrying after backoff"
                        );
                        tokio::time::sleep(backoff).await;
                    }
                    RetryAction::GiveUp => return Err(err),
                }
            }
        }
    }
}
