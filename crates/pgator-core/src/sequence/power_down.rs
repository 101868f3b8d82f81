//! Power-down state machine.

use std::time::Instant;

use tracing::{debug, error, warn};

use super::{FailureReason, PowerDownState, SequenceState, StepOutcome, power_down_timing};
use crate::channel::Channel;
use crate::signals::{ChannelSignals, SignalError, SignalLevel};

/// Advances `channel` one step toward `Disabled`.
///
/// Same contract as [`advance_power_up`]: at most one hardware access, at
/// most one transition, never blocks. The key-pulse width and the window
/// for the module to report off are module-type specific (see
/// [`power_down_timing`]).
///
/// [`advance_power_up`]: super::advance_power_up
pub fn advance_power_down<S: ChannelSignals>(
    channel: &mut Channel,
    signals: &S,
    now: Instant,
) -> StepOutcome {
    let state = match channel.state {
        SequenceState::Down(state) => state,
        SequenceState::Up(_) => {
            return fail_invariant(channel, "power-down step on a power-up channel");
        }
    };

    match state {
        PowerDownState::Init => {
            channel.stop_all_timers();
            match signals.set_power_key(channel.position(), SignalLevel::Off) {
                Ok(()) => advance(channel, PowerDownState::CheckStatus),
                Err(err) => fail_io(channel, "releasing power key", &err),
            }
        }
        PowerDownState::CheckStatus => match signals.status(channel.position()) {
            Ok(SignalLevel::On) => {
                if channel.status_wait.is_armed() {
                    if channel.status_wait.is_fired(now) {
                        channel.status_wait.stop();
                        fail_timeout(channel)
                    } else {
                        StepOutcome::InProgress
                    }
                } else {
                    // Module still responsive: press the key for the
                    // module-specific pulse width.
                    match signals.set_power_key(channel.position(), SignalLevel::On) {
                        Ok(()) => {
                            let timing = power_down_timing(channel.module_type());
                            channel.key_hold.arm(now, timing.key_hold);
                            advance(channel, PowerDownState::HoldKey)
                        }
                        Err(err) => fail_io(channel, "pressing power key", &err),
                    }
                }
            }
            Ok(SignalLevel::Off) => {
                channel.status_wait.stop();
                match signals.set_power_supply(channel.position(), SignalLevel::Off) {
                    Ok(()) => complete(channel),
                    Err(err) => fail_io(channel, "disabling power supply", &err),
                }
            }
            Err(err) => fail_io(channel, "reading module status", &err),
        },
        PowerDownState::HoldKey => {
            if !channel.key_hold.is_armed() {
                fail_invariant(channel, "key hold timer not armed in HoldKey")
            } else if channel.key_hold.is_fired(now) {
                channel.key_hold.stop();
                match signals.set_power_key(channel.position(), SignalLevel::Off) {
                    Ok(()) => {
                        let timing = power_down_timing(channel.module_type());
                        channel.status_wait.arm(now, timing.status_wait);
                        advance(channel, PowerDownState::CheckStatus)
                    }
                    Err(err) => fail_io(channel, "releasing power key", &err),
                }
            } else {
                StepOutcome::InProgress
            }
        }
        PowerDownState::Disabled => StepOutcome::Complete,
        PowerDownState::Failed(reason) => StepOutcome::Failed(reason),
    }
}

fn advance(channel: &mut Channel, next: PowerDownState) -> StepOutcome {
    debug!(position = channel.position(), state = ?next, "power-down transition");
    channel.state = SequenceState::Down(next);
    StepOutcome::InProgress
}

fn complete(channel: &mut Channel) -> StepOutcome {
    debug!(position = channel.position(), "power-down complete");
    channel.state = SequenceState::Down(PowerDownState::Disabled);
    StepOutcome::Complete
}

fn fail_io(channel: &mut Channel, action: &str, err: &SignalError) -> StepOutcome {
    warn!(position = channel.position(), %err, "power-down failed while {action}");
    channel.state = SequenceState::Down(PowerDownState::Failed(FailureReason::Io));
    StepOutcome::Failed(FailureReason::Io)
}

fn fail_timeout(channel: &mut Channel) -> StepOutcome {
    warn!(
        position = channel.position(),
        code = FailureReason::StatusTimeout.code(),
        "module still responsive after key pulse"
    );
    channel.state = SequenceState::Down(PowerDownState::Failed(FailureReason::StatusTimeout));
    StepOutcome::Failed(FailureReason::StatusTimeout)
}

fn fail_invariant(channel: &mut Channel, detail: &str) -> StepOutcome {
    error!(position = channel.position(), invariant = true, detail, "power-down invariant violated");
    channel.state = SequenceState::Down(PowerDownState::Failed(FailureReason::Io));
    StepOutcome::Failed(FailureReason::Io)
}
