//! Power-up state machine.

use std::time::Instant;

use tracing::{debug, error, warn};

use super::{
    FailureReason, POWER_HOLD, POWER_UP_KEY_HOLD, POWER_UP_STATUS_WAIT, PowerUpState,
    SequenceState, StepOutcome,
};
use crate::channel::Channel;
use crate::signals::{ChannelSignals, SignalError, SignalLevel};

/// Advances `channel` one step toward `Enabled`.
///
/// Performs at most one hardware access and at most one state transition,
/// and never blocks; `now` is the caller's monotonic instant for this sweep.
/// Repeated invocation is idempotent once the channel reaches a terminal
/// state.
pub fn advance_power_up<S: ChannelSignals>(
    channel: &mut Channel,
    signals: &S,
    now: Instant,
) -> StepOutcome {
    let state = match channel.state {
        SequenceState::Up(state) => state,
        SequenceState::Down(_) => {
            return fail_invariant(channel, "power-up step on a power-down channel");
        }
    };

    match state {
        PowerUpState::Init => {
            channel.stop_all_timers();
            match signals.set_power_key(channel.position(), SignalLevel::Off) {
                Ok(()) => advance(channel, PowerUpState::CheckStatus),
                Err(err) => fail_io(channel, "releasing power key", &err),
            }
        }
        PowerUpState::CheckStatus => match signals.status(channel.position()) {
            Ok(SignalLevel::On) => {
                if channel.status_wait.is_armed() {
                    // Module answered within the wait window: hold the key
                    // briefly, then release it.
                    channel.status_wait.stop();
                    channel.key_hold.arm(now, POWER_UP_KEY_HOLD);
                    advance(channel, PowerUpState::HoldKey)
                } else {
                    // Already enabled externally; nothing to sequence.
                    complete(channel)
                }
            }
            Ok(SignalLevel::Off) => {
                if channel.status_wait.is_armed() {
                    if channel.status_wait.is_fired(now) {
                        channel.status_wait.stop();
                        fail_timeout(channel, FailureReason::StatusTimeout)
                    } else {
                        StepOutcome::InProgress
                    }
                } else {
                    advance(channel, PowerUpState::CheckPowerSupply)
                }
            }
            Err(err) => fail_io(channel, "reading module status", &err),
        },
        PowerUpState::CheckPowerSupply => match signals.power_supply(channel.position()) {
            Ok(SignalLevel::Off) => {
                if channel.power_wait.is_armed() {
                    if channel.power_wait.is_fired(now) {
                        channel.power_wait.stop();
                        fail_timeout(channel, FailureReason::PowerSupplyTimeout)
                    } else {
                        StepOutcome::InProgress
                    }
                } else {
                    let written =
                        signals.set_power_supply(channel.position(), SignalLevel::On);
                    channel.power_wait.arm(now, channel.max_power_supply_delay());
                    match written {
                        Ok(()) => StepOutcome::InProgress,
                        Err(err) => fail_io(channel, "enabling power supply", &err),
                    }
                }
            }
            Ok(SignalLevel::On) => {
                channel.power_wait.stop();
                channel.power_hold.arm(now, POWER_HOLD);
                advance(channel, PowerUpState::HoldPowerSupply)
            }
            Err(err) => fail_io(channel, "reading power supply", &err),
        },
        PowerUpState::HoldPowerSupply => {
            if !channel.power_hold.is_armed() {
                fail_invariant(channel, "power hold timer not armed in HoldPowerSupply")
            } else if channel.power_hold.is_fired(now) {
                channel.power_hold.stop();
                let written = signals.set_power_key(channel.position(), SignalLevel::On);
                channel.status_wait.arm(now, POWER_UP_STATUS_WAIT);
                match written {
                    Ok(()) => advance(channel, PowerUpState::CheckStatus),
                    Err(err) => fail_io(channel, "pressing power key", &err),
                }
            } else {
                StepOutcome::InProgress
            }
        }
        PowerUpState::HoldKey => {
            if !channel.key_hold.is_armed() {
                fail_invariant(channel, "key hold timer not armed in HoldKey")
            } else if channel.key_hold.is_fired(now) {
                match signals.set_power_key(channel.position(), SignalLevel::Off) {
                    Ok(()) => complete(channel),
                    Err(err) => fail_io(channel, "releasing power key", &err),
                }
            } else {
                StepOutcome::InProgress
            }
        }
        PowerUpState::Enabled => StepOutcome::Complete,
        PowerUpState::Failed(reason) => StepOutcome::Failed(reason),
    }
}

fn advance(channel: &mut Channel, next: PowerUpState) -> StepOutcome {
    debug!(position = channel.position(), state = ?next, "power-up transition");
    channel.state = SequenceState::Up(next);
    StepOutcome::InProgress
}

fn complete(channel: &mut Channel) -> StepOutcome {
    debug!(position = channel.position(), "power-up complete");
    channel.state = SequenceState::Up(PowerUpState::Enabled);
    StepOutcome::Complete
}

fn fail_io(channel: &mut Channel, action: &str, err: &SignalError) -> StepOutcome {
    warn!(position = channel.position(), %err, "power-up failed while {action}");
    channel.state = SequenceState::Up(PowerUpState::Failed(FailureReason::Io));
    StepOutcome::Failed(FailureReason::Io)
}

fn fail_timeout(channel: &mut Channel, reason: FailureReason) -> StepOutcome {
    warn!(position = channel.position(), code = reason.code(), "power-up timed out");
    channel.state = SequenceState::Up(PowerUpState::Failed(reason));
    StepOutcome::Failed(reason)
}

fn fail_invariant(channel: &mut Channel, detail: &str) -> StepOutcome {
    error!(position = channel.position(), invariant = true, detail, "power-up invariant violated");
    channel.state = SequenceState::Up(PowerUpState::Failed(FailureReason::Io));
    StepOutcome::Failed(FailureReason::Io)
}
