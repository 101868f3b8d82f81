//! Power sequencing state machines.
//!
//! Two explicit tagged-state machines share one structure: each invocation
//! performs at most one hardware access and at most one state transition,
//! never blocks, and returns a [`StepOutcome`]. Time-based waiting is
//! expressed entirely through the channel's [`Countdown`] timers against the
//! caller-supplied instant.
//!
//! The up and down machines handle an already-matching status differently on
//! purpose: power-up has a skip-ahead branch (status on while `status_wait`
//! is armed releases the key after a short hold instead of pulsing again),
//! power-down does not. Do not unify them.
//!
//! [`Countdown`]: crate::timer::Countdown

mod power_down;
mod power_up;

use std::time::Duration;

pub use power_down::advance_power_down;
pub use power_up::advance_power_up;

/// Result of one state machine invocation on one channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Not there yet; another sweep is required.
    InProgress,
    /// The channel reached its terminal state (`Enabled` or `Disabled`).
    Complete,
    /// The channel failed; no automatic retry.
    Failed(FailureReason),
}

/// Why a channel entered its `Failed` state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureReason {
    /// A hardware write or read failed outright, or the machine found itself
    /// in a timer-inconsistent or unrecognized state.
    Io,
    /// The module never reported the expected status within its wait window.
    StatusTimeout,
    /// The power rail never reported enabled within the tolerated settling
    /// delay (power-up only).
    PowerSupplyTimeout,
}

impl FailureReason {
    /// Stable numeric code reported to the notification surface.
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::Io => -1,
            Self::StatusTimeout => -2,
            Self::PowerSupplyTimeout => -3,
        }
    }
}

/// Node of the power-up machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerUpState {
    /// Defensive reset; releases the power key.
    Init,
    /// Polls module status; dispatches on whether `status_wait` is armed.
    CheckStatus,
    /// Polls the power rail, enabling it on first sight of it being off.
    CheckPowerSupply,
    /// Lets the rail settle before pressing the power key.
    HoldPowerSupply,
    /// Holds the key briefly before releasing it (skip-ahead path).
    HoldKey,
    /// Terminal success.
    Enabled,
    /// Terminal failure.
    Failed(FailureReason),
}

/// Node of the power-down machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerDownState {
    /// Defensive reset; releases the power key.
    Init,
    /// Polls module status; presses the key while the module still responds.
    CheckStatus,
    /// Holds the key for the module-specific pulse width.
    HoldKey,
    /// Terminal success.
    Disabled,
    /// Terminal failure.
    Failed(FailureReason),
}

/// Current node of whichever machine is sequencing the channel.
///
/// Mutated only by [`advance_power_up`] and [`advance_power_down`]; a
/// channel travels in one direction for the lifetime of an invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceState {
    /// Channel is on the power-up path.
    Up(PowerUpState),
    /// Channel is on the power-down path.
    Down(PowerDownState),
}

impl SequenceState {
    /// Returns `true` once the channel needs no further transitions.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Up(PowerUpState::Enabled | PowerUpState::Failed(_))
                | Self::Down(PowerDownState::Disabled | PowerDownState::Failed(_))
        )
    }
}

/// Rail settle time before the power key is pressed during power-up.
pub(crate) const POWER_HOLD: Duration = Duration::from_secs(1);

/// Status wait window after the power key is pressed during power-up.
pub(crate) const POWER_UP_STATUS_WAIT: Duration = Duration::from_secs(8);

/// Key hold before release on the power-up skip-ahead path.
pub(crate) const POWER_UP_KEY_HOLD: Duration = Duration::from_secs(1);

/// Per-module-type power-down timing.
///
/// Different module hardware needs different minimum key-pulse widths and
/// status-settle windows; this pair is the only per-type parameter in the
/// whole sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModuleTiming {
    /// How long the power key is held down.
    pub key_hold: Duration,
    /// How long to wait for the module to report off after key release.
    pub status_wait: Duration,
}

/// Looks up power-down timing by exact module type identifier.
#[must_use]
pub fn power_down_timing(module_type: &str) -> ModuleTiming {
    match module_type {
        "SIM5215" => ModuleTiming {
            key_hold: Duration::from_millis(2000),
            status_wait: Duration::from_secs(5),
        },
        "M10" => ModuleTiming {
            key_hold: Duration::from_millis(800),
            status_wait: Duration::from_secs(12),
        },
        _ => ModuleTiming {
            key_hold: Duration::from_secs(1),
            status_wait: Duration::from_secs(8),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_codes_are_stable() {
        assert_eq!(FailureReason::Io.code(), -1);
        assert_eq!(FailureReason::StatusTimeout.code(), -2);
        assert_eq!(FailureReason::PowerSupplyTimeout.code(), -3);
    }

    #[test]
    fn sim5215_timing() {
        let timing = power_down_timing("SIM5215");
        assert_eq!(timing.key_hold, Duration::from_millis(2000));
        assert_eq!(timing.status_wait, Duration::from_secs(5));
    }

    #[test]
    fn m10_timing() {
        let timing = power_down_timing("M10");
        assert_eq!(timing.key_hold, Duration::from_millis(800));
        assert_eq!(timing.status_wait, Duration::from_secs(12));
    }

    #[test]
    fn unknown_module_gets_default_timing() {
        for module in ["SIM300", "", "sim5215", "M10 "] {
            let timing = power_down_timing(module);
            assert_eq!(timing.key_hold, Duration::from_secs(1), "module {module:?}");
            assert_eq!(timing.status_wait, Duration::from_secs(8), "module {module:?}");
        }
    }

    #[test]
    fn terminal_states() {
        assert!(SequenceState::Up(PowerUpState::Enabled).is_terminal());
        assert!(SequenceState::Up(PowerUpState::Failed(FailureReason::Io)).is_terminal());
        assert!(SequenceState::Down(PowerDownState::Disabled).is_terminal());
        assert!(
            SequenceState::Down(PowerDownState::Failed(FailureReason::StatusTimeout))
                .is_terminal()
        );
        assert!(!SequenceState::Up(PowerUpState::Init).is_terminal());
        assert!(!SequenceState::Down(PowerDownState::HoldKey).is_terminal());
    }
}
