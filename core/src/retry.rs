use std::time::Duration;

use crate::errors::QueryError;

pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(2000);

/// How many times a query is attempted and how long to wait in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            delay: DEFAULT_RETRY_DELAY,
        }
    }
}

impl RetryPolicy {
    /// A policy of zero attempts is treated as a single attempt.
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }

    /// Single attempt, no waiting.
    pub fn no_retry() -> Self {
        Self::new(1, Duration::ZERO)
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Whether another attempt is allowed after `attempt` (1-based) has failed.
    pub fn allows_retry_after(&self, attempt: u32) -> bool {
        attempt < self.max_attempts
    }
}

/// Outcome of one network attempt
#[derive(Debug)]
pub enum Attempt<T> {
    Success(T),
    Retryable(QueryError),
    Terminal(QueryError),
}

impl<T> Attempt<T> {
    /// Sorts an error into `Retryable` or `Terminal`.
    pub fn from_error(error: QueryError) -> Self {
        if error.is_transient() {
            Attempt::Retryable(error)
        } else {
            Attempt::Terminal(error)
        }
    }
}
