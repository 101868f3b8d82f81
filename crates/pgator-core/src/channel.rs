//! Board and channel data model.
//!
//! A [`Board`] owns its channels in configuration order together with the
//! hardware signal implementation for its device path. Channels never point
//! back at their board; the polling driver walks board-then-channel and
//! hands each step the board's signals.

use std::time::Duration;

use crate::poll::{Direction, Outcome};
use crate::sequence::{PowerDownState, PowerUpState, SequenceState};
use crate::timer::Countdown;

/// One controller board and its ordered channels.
#[derive(Debug)]
pub struct Board<S> {
    /// Kernel driver identifier, for diagnostics only.
    pub driver: String,
    /// Display name used in notifications.
    pub name: String,
    /// Hardware signal primitives for this board's device path.
    pub signals: S,
    /// Channels in configuration order.
    pub channels: Vec<Channel>,
}

impl<S> Board<S> {
    /// Creates a board with no channels.
    pub fn new(driver: impl Into<String>, name: impl Into<String>, signals: S) -> Self {
        Self {
            driver: driver.into(),
            name: name.into(),
            signals,
            channels: Vec::new(),
        }
    }
}

/// One radio module slot, individually power-sequenced.
#[derive(Debug)]
pub struct Channel {
    position: usize,
    module_type: String,
    max_power_supply_delay: Duration,
    pub(crate) state: SequenceState,
    pub(crate) last_reported: Option<Outcome>,
    pub(crate) power_wait: Countdown,
    pub(crate) power_hold: Countdown,
    pub(crate) key_hold: Countdown,
    pub(crate) status_wait: Countdown,
}

impl Channel {
    /// Creates a channel at `position` carrying `module_type`.
    ///
    /// `max_power_supply_delay` bounds how long the channel waits for its
    /// power rail to energize. It is conventionally one second per channel
    /// system-wide: more channels sharing a power domain tolerate a longer
    /// settling delay.
    pub fn new(
        position: usize,
        module_type: impl Into<String>,
        max_power_supply_delay: Duration,
    ) -> Self {
        Self {
            position,
            module_type: module_type.into(),
            max_power_supply_delay,
            state: SequenceState::Up(PowerUpState::Init),
            last_reported: None,
            power_wait: Countdown::new(),
            power_hold: Countdown::new(),
            key_hold: Countdown::new(),
            status_wait: Countdown::new(),
        }
    }

    /// Zero-based index within the owning board, stable for the channel's
    /// lifetime.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Module type identifier selecting the timing profile.
    #[must_use]
    pub fn module_type(&self) -> &str {
        &self.module_type
    }

    /// Tolerated power rail settling delay.
    #[must_use]
    pub const fn max_power_supply_delay(&self) -> Duration {
        self.max_power_supply_delay
    }

    /// Current sequencing state.
    #[must_use]
    pub const fn state(&self) -> SequenceState {
        self.state
    }

    /// Puts the channel at the start of the sequence for `direction` and
    /// clears the recorded outcome.
    pub fn begin(&mut self, direction: Direction) {
        self.state = match direction {
            Direction::PowerUp => SequenceState::Up(PowerUpState::Init),
            Direction::PowerDown => SequenceState::Down(PowerDownState::Init),
        };
        self.last_reported = None;
    }

    /// Stops all four timers so no stale deadline leaks across a restart of
    /// the sequence.
    pub(crate) fn stop_all_timers(&mut self) {
        self.power_wait.stop();
        self.power_hold.stop();
        self.key_hold.stop();
        self.status_wait.stop();
    }
}
