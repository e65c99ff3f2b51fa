//! Task status polling.

use crate::error::{Result, VidGenError};
use crate::video::types::Task;
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;

/// Shortest delay between two status queries.
pub const MIN_INTERVAL: Duration = Duration::from_millis(100);

/// Controls how a task is polled until it finishes.
#[derive(Debug, Clone, PartialEq)]
pub struct PollPolicy {
    /// Delay before the second query.
    pub interval: Duration,
    /// Multiplier applied to the delay after every query (>= 1.0).
    pub backoff_factor: f64,
    /// Upper bound for the delay between queries.
    pub max_interval: Duration,
    /// Overall time budget for the whole loop.
    pub deadline: Duration,
    /// Consecutive unrecognized statuses tolerated before failing.
    pub max_unknown_statuses: u32,
    /// Consecutive transient query errors tolerated before failing.
    pub max_transient_errors: u32,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            backoff_factor: 1.5,
            max_interval: Duration::from_secs(10),
            deadline: Duration::from_secs(600), // 10 minutes for video
            max_unknown_statuses: 5,
            max_transient_errors: 3,
        }
    }
}

impl PollPolicy {
    /// A policy that waits the same `interval` between every query.
    ///
    /// Intervals below [`MIN_INTERVAL`] are raised to it.
    pub fn fixed(interval: Duration) -> Self {
        let interval = interval.max(MIN_INTERVAL);
        Self {
            interval,
            backoff_factor: 1.0,
            max_interval: interval,
            ..Self::default()
        }
    }

    /// Sets the initial delay between queries, never below [`MIN_INTERVAL`].
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval.max(MIN_INTERVAL);
        self.max_interval = self.max_interval.max(self.interval);
        self
    }

    /// Sets exponential backoff parameters. Factors below 1.0 are clamped.
    pub fn with_backoff(mut self, factor: f64, max_interval: Duration) -> Self {
        self.backoff_factor = factor.max(1.0);
        self.max_interval = max_interval.max(self.interval);
        self
    }

    /// Sets the overall time budget.
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }

    /// Sets how many consecutive unrecognized statuses are tolerated.
    pub fn with_max_unknown_statuses(mut self, max: u32) -> Self {
        self.max_unknown_statuses = max;
        self
    }

    /// Sets how many consecutive transient errors are tolerated.
    pub fn with_max_transient_errors(mut self, max: u32) -> Self {
        self.max_transient_errors = max;
        self
    }

    fn first_delay(&self) -> Duration {
        self.interval.max(MIN_INTERVAL)
    }

    fn next_delay(&self, current: Duration) -> Duration {
        let cap = self.max_interval.max(MIN_INTERVAL);
        let scaled = current.as_secs_f64() * self.backoff_factor.max(1.0);
        Duration::try_from_secs_f64(scaled)
            .unwrap_or(cap)
            .clamp(MIN_INTERVAL, cap)
    }
}

/// Repeatedly calls `fetch` until the task reaches a terminal status.
///
/// Terminal tasks (`succeeded`, `failed`, `cancelled`) are returned as
/// `Ok`; the caller decides what a failed task means. Dropping the future
/// between queries abandons the loop with no side effects.
pub async fn poll_until_terminal<F, Fut>(
    task_id: &str,
    policy: &PollPolicy,
    mut fetch: F,
) -> Result<Task>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Task>>,
{
    let start = Instant::now();
    let mut delay = policy.first_delay();
    let mut attempts: u32 = 0;
    let mut unknown_streak: u32 = 0;
    let mut error_streak: u32 = 0;

    loop {
        attempts += 1;

        match fetch().await {
            Ok(task) if task.is_terminal() => {
                tracing::debug!(
                    task_id = %task_id,
                    status = %task.status,
                    attempts,
                    elapsed_secs = start.elapsed().as_secs(),
                    "task reached terminal status"
                );
                return Ok(task);
            }
            Ok(task) => {
                error_streak = 0;
                if !task.status.is_recognized() {
                    unknown_streak += 1;
                    if unknown_streak > policy.max_unknown_statuses {
                        return Err(VidGenError::GenerationFailure(format!(
                            "task {task_id} reported unrecognized status '{}' {unknown_streak} times in a row",
                            task.status
                        )));
                    }
                    tracing::warn!(
                        task_id = %task_id,
                        status = %task.status,
                        unknown_streak,
                        "unrecognized task status, treating as in progress"
                    );
                } else {
                    unknown_streak = 0;
                    tracing::debug!(
                        task_id = %task_id,
                        status = %task.status,
                        attempts,
                        elapsed_secs = start.elapsed().as_secs(),
                        "polling video generation task"
                    );
                }
            }
            Err(e) if e.is_retryable() && error_streak < policy.max_transient_errors => {
                error_streak += 1;
                tracing::warn!(
                    task_id = %task_id,
                    attempt = error_streak,
                    max_retries = policy.max_transient_errors,
                    "retrying status query after transient error: {e}"
                );
            }
            Err(e) => return Err(e),
        }

        let elapsed = start.elapsed();
        if elapsed >= policy.deadline {
            return Err(VidGenError::Timeout(policy.deadline));
        }
        tokio::time::sleep(delay.min(policy.deadline - elapsed)).await;
        delay = policy.next_delay(delay);
    }
}
