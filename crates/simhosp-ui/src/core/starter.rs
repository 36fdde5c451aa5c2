//! Pathway starter panel state.
//!
//! # Design
//! - A response is newline-delimited text: the first line is the headline, the rest are items.
//! - Each submission gets a generation number; steps from older generations are dropped so a
//!   slow response can never overwrite a newer one.
//! - Clearing blanks the headline and drops the list before every new submission.
//! - [`SubmissionTracker`] hands out generations; a [`PollRun`] asks it before every GET and
//!   after every answer, so a superseded run neither fetches nor reports.

use crate::core::poll::{PollOutcome, PollPolicy, PollStep, Poller};

/// Headline prefix the backend uses when a pathway could not be started.
pub const START_ERROR_PREFIX: &str = "Cannot start pathway or send messages";

/// Parsed, displayable backend response.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StarterResponse {
    headline: String,
    items: Vec<String>,
}

impl StarterResponse {
    /// Split a non-empty body into headline and items. Returns `None` for an empty body.
    #[must_use]
    pub fn parse(body: &str) -> Option<Self> {
        if body.is_empty() {
            return None;
        }
        let mut lines = body
            .split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string());
        let headline = lines.next().unwrap_or_default();
        Some(Self {
            headline,
            items: lines.collect(),
        })
    }

    /// First line of the response.
    #[must_use]
    pub fn headline(&self) -> &str {
        &self.headline
    }

    /// Remaining lines, in order.
    #[must_use]
    pub fn items(&self) -> &[String] {
        &self.items
    }

    /// Whether the backend reported a failure.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.headline.starts_with(START_ERROR_PREFIX)
    }
}

/// Where the panel is in its request/response cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PanelPhase {
    /// Nothing submitted yet, or the last run was cancelled.
    #[default]
    Idle,
    /// Text posted; no GET answered yet.
    Submitted,
    /// Waiting on the backend.
    Polling {
        /// GET attempts made so far.
        attempt: u32,
    },
    /// A response is on screen.
    Displayed,
    /// Polling gave up.
    Abandoned {
        /// GET attempts made.
        attempts: u32,
    },
}

/// Input to [`StarterPanel::apply`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PanelAction {
    /// A new submission started with this generation.
    Submit {
        /// Generation of the submission.
        generation: u64,
    },
    /// A poll step for some generation.
    Step {
        /// Generation the step belongs to.
        generation: u64,
        /// Poller decision.
        step: PollStep,
    },
    /// Stop listening to the running submission and go idle.
    Cancel,
}

/// Panel view state.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StarterPanel {
    phase: PanelPhase,
    response: Option<StarterResponse>,
    notice: Option<String>,
    generation: u64,
}

impl StarterPanel {
    /// Fresh idle panel.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> PanelPhase {
        self.phase
    }

    /// Response on screen, if any.
    #[must_use]
    pub const fn response(&self) -> Option<&StarterResponse> {
        self.response.as_ref()
    }

    /// Headline text; empty when cleared.
    #[must_use]
    pub fn headline(&self) -> &str {
        self.response.as_ref().map_or("", StarterResponse::headline)
    }

    /// Status notice shown when polling gave up.
    #[must_use]
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// Generation of the active submission.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Blank the headline and drop the list.
    pub fn clear(&mut self) {
        self.response = None;
        self.notice = None;
    }

    /// Apply one action. Returns `false` when it was stale and ignored.
    pub fn apply(&mut self, action: PanelAction) -> bool {
        match action {
            PanelAction::Submit { generation } => {
                if generation <= self.generation {
                    return false;
                }
                self.generation = generation;
                self.clear();
                self.phase = PanelPhase::Submitted;
                true
            }
            PanelAction::Step { generation, step } => {
                if generation != self.generation || self.phase == PanelPhase::Idle {
                    return false;
                }
                self.apply_step(step);
                true
            }
            PanelAction::Cancel => {
                self.phase = PanelPhase::Idle;
                true
            }
        }
    }

    fn apply_step(&mut self, step: PollStep) {
        match step {
            PollStep::Retry { attempt, .. } => self.phase = PanelPhase::Polling { attempt },
            PollStep::Ready(response) => {
                self.clear();
                self.response = Some(response);
                self.phase = PanelPhase::Displayed;
            }
            PollStep::Exhausted {
                attempts,
                last_failure,
            } => {
                self.notice = Some(match last_failure {
                    Some(reason) => {
                        format!("No response after {attempts} attempts (last error: {reason}).")
                    }
                    None => format!("No response after {attempts} attempts."),
                });
                self.phase = PanelPhase::Abandoned { attempts };
            }
        }
    }
}

/// Hands out submission generations and knows which one is still live.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SubmissionTracker {
    latest: u64,
    closed: bool,
}

impl SubmissionTracker {
    /// Fresh tracker with no submission.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new submission, superseding the previous one. Returns `None` once closed.
    #[must_use]
    pub fn start(&mut self) -> Option<u64> {
        if self.closed {
            return None;
        }
        self.latest += 1;
        Some(self.latest)
    }

    /// Stop every submission for good (the panel went away).
    pub fn close(&mut self) {
        self.closed = true;
    }

    /// Whether `generation` is the newest submission and the panel is still open.
    #[must_use]
    pub const fn is_live(&self, generation: u64) -> bool {
        !self.closed && self.latest == generation
    }
}

/// What a polling task should do after an answer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RunStep {
    /// Show the action, wait `delay_ms`, then fetch again.
    Continue {
        /// Panel update to dispatch.
        action: PanelAction,
        /// Wait before the next GET.
        delay_ms: u32,
    },
    /// Show the action; the run is over.
    Finish(PanelAction),
    /// A newer submission (or teardown) took over; drop the answer and stop.
    Superseded,
}

/// Poll loop state for one submission.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PollRun {
    generation: u64,
    poller: Poller,
}

impl PollRun {
    /// Run for `generation` under `policy`.
    #[must_use]
    pub const fn new(generation: u64, policy: PollPolicy) -> Self {
        Self {
            generation,
            poller: Poller::new(policy),
        }
    }

    /// Generation this run belongs to.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether the next GET may be issued.
    #[must_use]
    pub const fn may_fetch(&self, tracker: &SubmissionTracker) -> bool {
        tracker.is_live(self.generation)
    }

    /// Feed one GET result, checking liveness again since the request was in flight.
    pub fn observe(&mut self, tracker: &SubmissionTracker, outcome: PollOutcome) -> RunStep {
        if !self.may_fetch(tracker) {
            return RunStep::Superseded;
        }
        let step = self.poller.observe(outcome);
        let delay_ms = match &step {
            PollStep::Retry { delay_ms, .. } => Some(*delay_ms),
            PollStep::Ready(_) | PollStep::Exhausted { .. } => None,
        };
        let action = PanelAction::Step {
            generation: self.generation,
            step,
        };
        match delay_ms {
            Some(delay_ms) => RunStep::Continue { action, delay_ms },
            None => RunStep::Finish(action),
        }
    }
}
