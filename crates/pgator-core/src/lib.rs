//! Power sequencing for radio module (GSM modem) channels on controller
//! boards.
//!
//! Each channel is brought up or down through an ordered sequence of
//! electrical operations - enabling a power rail, pulsing a power-key line,
//! waiting for a status signal - with module-specific timing. The sequencing
//! logic is a pair of non-blocking state machines ([`advance_power_up`] and
//! [`advance_power_down`]) driven by a polling loop ([`run_sequence`]) that
//! advances many channels concurrently without blocking on any single one.
//!
//! Hardware access goes through the [`ChannelSignals`] trait and time goes
//! through the [`Clock`] trait, so the whole crate runs deterministically
//! under test with scripted signals and a simulated clock.
//!
//! [`advance_power_up`]: sequence::advance_power_up
//! [`advance_power_down`]: sequence::advance_power_down
//! [`run_sequence`]: poll::run_sequence
//! [`ChannelSignals`]: signals::ChannelSignals
//! [`Clock`]: poll::Clock

pub mod channel;
pub mod poll;
pub mod sequence;
pub mod signals;
pub mod timer;

#[cfg(test)]
pub(crate) mod test_support;

pub use channel::{Board, Channel};
pub use poll::{
    Clock, Direction, MonotonicClock, Notification, Outcome, PollConfig, SequenceSummary,
    run_sequence,
};
pub use sequence::{FailureReason, StepOutcome};
pub use signals::{ChannelSignals, SignalError, SignalLevel};
pub use timer::Countdown;
