//! Hardware signal interface.
//!
//! The sequencer treats the hardware boundary as four primitives scoped to
//! one board and addressed by channel position: write/read the power-supply
//! enable, write the power-key line, and read the module status. Production
//! code implements [`ChannelSignals`] against the board's device file; tests
//! script it in memory.

use thiserror::Error;

/// A two-valued digital signal level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalLevel {
    /// Signal deasserted.
    Off,
    /// Signal asserted.
    On,
}

impl SignalLevel {
    /// Command digit used by the device write format (`1` = on, `0` = off).
    #[must_use]
    pub const fn as_command_digit(self) -> u8 {
        match self {
            Self::Off => 0,
            Self::On => 1,
        }
    }
}

/// A failed hardware read or write.
///
/// Every variant is fatal for the affected channel; the state machines do
/// not retry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignalError {
    /// The device path could not be opened or accessed.
    #[error("device unavailable: {0}")]
    Unavailable(String),

    /// The device produced data the reader could not interpret.
    #[error("malformed device data: {0}")]
    Malformed(String),

    /// The device does not expose a channel at the given position.
    #[error("no channel at position {0}")]
    UnknownChannel(usize),
}

/// Per-board hardware signal primitives, addressed by channel position.
pub trait ChannelSignals {
    /// Switches the channel's power rail.
    ///
    /// # Errors
    ///
    /// Returns a [`SignalError`] if the control write fails.
    fn set_power_supply(&self, position: usize, level: SignalLevel) -> Result<(), SignalError>;

    /// Reads whether the channel's power rail is enabled.
    ///
    /// # Errors
    ///
    /// Returns a [`SignalError`] if the device cannot be read or parsed.
    fn power_supply(&self, position: usize) -> Result<SignalLevel, SignalError>;

    /// Drives the channel's momentary power-key line.
    ///
    /// # Errors
    ///
    /// Returns a [`SignalError`] if the control write fails.
    fn set_power_key(&self, position: usize, level: SignalLevel) -> Result<(), SignalError>;

    /// Reads the module's liveness status.
    ///
    /// # Errors
    ///
    /// Returns a [`SignalError`] if the device cannot be read or parsed.
    fn status(&self, position: usize) -> Result<SignalLevel, SignalError>;
}
