//! Polling driver.
//!
//! Sweeps every channel of every board once per cycle, invoking the state
//! machine for the selected direction, and sleeps a short fixed interval
//! between sweeps. The loop ends only when no channel reported in-progress
//! in the most recent sweep: one channel's failure never halts its siblings.
//!
//! Each channel's status change is reported exactly once through the
//! caller's notification sink; a channel sitting in the same terminal or
//! failed state across sweeps stays silent.

use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::channel::Board;
use crate::sequence::{FailureReason, StepOutcome, advance_power_down, advance_power_up};
use crate::signals::ChannelSignals;

/// Time source and suspension point for the poll loop.
///
/// Production uses [`MonotonicClock`]; driver tests substitute a simulated
/// clock whose `sleep` merely advances virtual time, so multi-second timer
/// windows elapse instantly.
pub trait Clock {
    /// Current monotonic instant.
    fn now(&self) -> Instant;

    /// Suspends between sweeps.
    fn sleep(&self, duration: Duration);
}

/// Real time: [`Instant::now`] and [`std::thread::sleep`].
#[derive(Debug, Default, Clone, Copy)]
pub struct MonotonicClock;

impl Clock for MonotonicClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Direction of travel for one sequencing invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Bring channels to `Enabled`.
    PowerUp,
    /// Bring channels to `Disabled`.
    PowerDown,
}

impl Direction {
    /// Human-readable label used in notifications and logs.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::PowerUp => "power up",
            Self::PowerDown => "power down",
        }
    }
}

/// Final outcome of one channel's sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The channel reached `Enabled` or `Disabled`.
    Done,
    /// The channel failed and will not be retried this invocation.
    Failed(FailureReason),
}

impl Outcome {
    /// Numeric code for the notification surface: `1` for done, the
    /// negative [`FailureReason::code`] otherwise.
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::Done => 1,
            Self::Failed(reason) => reason.code(),
        }
    }
}

/// One exactly-once status change record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Display name of the owning board.
    pub board: String,
    /// Channel position on that board.
    pub position: usize,
    /// Direction the channel was traveling.
    pub direction: Direction,
    /// What the channel settled on.
    pub outcome: Outcome,
}

/// Poll loop tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    /// Unconditional sleep between sweeps, bounding CPU usage.
    pub sweep_interval: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            sweep_interval: Duration::from_millis(1),
        }
    }
}

/// Aggregate result of a completed sequencing run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SequenceSummary {
    /// Channels that reached their terminal success state.
    pub succeeded: usize,
    /// Channels that failed.
    pub failed: usize,
    /// Sweeps performed.
    pub sweeps: usize,
}

impl SequenceSummary {
    /// Returns `true` if every channel succeeded.
    #[must_use]
    pub const fn all_succeeded(&self) -> bool {
        self.failed == 0
    }
}

/// Runs every channel of every board to a terminal state.
///
/// Restarts each channel from its initial state, then sweeps until no
/// channel reports in-progress, calling `notify` exactly once per channel
/// status change. Returns once all channels are terminal; failures are
/// local and never abort the loop early.
pub fn run_sequence<S, C, F>(
    boards: &mut [Board<S>],
    direction: Direction,
    config: PollConfig,
    clock: &C,
    mut notify: F,
) -> SequenceSummary
where
    S: ChannelSignals,
    C: Clock,
    F: FnMut(&Notification),
{
    for board in boards.iter_mut() {
        for channel in &mut board.channels {
            channel.begin(direction);
        }
    }

    let mut summary = SequenceSummary::default();
    let mut pending = true;
    while pending {
        pending = false;
        summary.sweeps += 1;
        let now = clock.now();

        for board in boards.iter_mut() {
            let signals = &board.signals;
            for channel in &mut board.channels {
                let step = match direction {
                    Direction::PowerUp => advance_power_up(channel, signals, now),
                    Direction::PowerDown => advance_power_down(channel, signals, now),
                };
                match step {
                    StepOutcome::InProgress => pending = true,
                    StepOutcome::Complete => {
                        report(&board.name, channel, direction, Outcome::Done, &mut notify);
                    }
                    StepOutcome::Failed(reason) => {
                        report(
                            &board.name,
                            channel,
                            direction,
                            Outcome::Failed(reason),
                            &mut notify,
                        );
                    }
                }
            }
        }

        clock.sleep(config.sweep_interval);
    }

    for board in boards.iter() {
        for channel in &board.channels {
            match channel.last_reported {
                Some(Outcome::Done) => summary.succeeded += 1,
                Some(Outcome::Failed(_)) => summary.failed += 1,
                // Unreachable once the loop has converged; counted as
                // neither rather than guessed at.
                None => {}
            }
        }
    }
    info!(
        direction = direction.label(),
        succeeded = summary.succeeded,
        failed = summary.failed,
        sweeps = summary.sweeps,
        "sequence finished"
    );
    summary
}

fn report<F: FnMut(&Notification)>(
    board: &str,
    channel: &mut crate::channel::Channel,
    direction: Direction,
    outcome: Outcome,
    notify: &mut F,
) {
    if channel.last_reported == Some(outcome) {
        return;
    }
    channel.last_reported = Some(outcome);
    debug!(
        board,
        position = channel.position(),
        code = outcome.code(),
        "channel status change"
    );
    notify(&Notification {
        board: board.to_string(),
        position: channel.position(),
        direction,
        outcome,
    });
}
