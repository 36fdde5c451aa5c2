//! Bounded polling for the pathway starter response.
//!
//! # Design
//! - Keep re-polling while the body is empty, but with exponential backoff and an attempt cap.
//! - HTTP errors and transport failures are retried like empty bodies; the last one is
//!   remembered so an exhausted loop can say why.
//! - Pure state machine: the caller performs the GET and the sleep.

use crate::core::starter::StarterResponse;

/// Limits for one polling run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PollPolicy {
    /// GET attempts before giving up (at least one).
    pub max_attempts: u32,
    /// Delay before the first retry.
    pub base_delay_ms: u32,
    /// Upper bound for any single delay.
    pub max_delay_ms: u32,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 40,
            base_delay_ms: 250,
            max_delay_ms: 4_000,
        }
    }
}

impl PollPolicy {
    /// Backoff before retry number `retry` (zero-based), doubling up to the cap.
    #[must_use]
    pub fn delay_ms(&self, retry: u32) -> u32 {
        let capped = retry.min(16);
        let delay = self.base_delay_ms.saturating_mul(2u32.saturating_pow(capped));
        delay.min(self.max_delay_ms).max(self.base_delay_ms.min(self.max_delay_ms))
    }
}

/// What one GET produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PollOutcome {
    /// 2xx with an empty body: the backend has nothing yet.
    Empty,
    /// 2xx with a body.
    Body(String),
    /// Non-2xx status.
    Status(u16),
    /// The request never completed.
    Transport(String),
}

/// What the caller should do next.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PollStep {
    /// Issue exactly one more GET after `delay_ms`.
    Retry {
        /// Attempts made so far.
        attempt: u32,
        /// Wait before the next GET.
        delay_ms: u32,
    },
    /// A response is ready to display.
    Ready(StarterResponse),
    /// Attempt budget spent without a response.
    Exhausted {
        /// Attempts made.
        attempts: u32,
        /// Description of the last failed attempt, if the last ones failed.
        last_failure: Option<String>,
    },
}

/// Counts attempts for a single polling run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Poller {
    policy: PollPolicy,
    attempts: u32,
    last_failure: Option<String>,
}

impl Poller {
    /// Fresh run under `policy`.
    #[must_use]
    pub const fn new(policy: PollPolicy) -> Self {
        Self {
            policy,
            attempts: 0,
            last_failure: None,
        }
    }

    /// Attempts observed so far.
    #[must_use]
    pub const fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Record the result of one GET and decide the next step.
    pub fn observe(&mut self, outcome: PollOutcome) -> PollStep {
        self.attempts = self.attempts.saturating_add(1);
        match outcome {
            PollOutcome::Body(body) => {
                if let Some(response) = StarterResponse::parse(&body) {
                    return PollStep::Ready(response);
                }
                self.last_failure = None;
            }
            PollOutcome::Empty => self.last_failure = None,
            PollOutcome::Status(code) => {
                self.last_failure = Some(format!("unexpected status {code}"));
            }
            PollOutcome::Transport(reason) => self.last_failure = Some(reason),
        }

        if self.attempts >= self.policy.max_attempts.max(1) {
            PollStep::Exhausted {
                attempts: self.attempts,
                last_failure: self.last_failure.clone(),
            }
        } else {
            PollStep::Retry {
                attempt: self.attempts,
                delay_ms: self.policy.delay_ms(self.attempts - 1),
            }
        }
    }
}
