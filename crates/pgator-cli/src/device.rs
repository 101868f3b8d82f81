//! File-backed hardware signals.
//!
//! A Polygator board exposes one device file. Reading it yields a JSON
//! document with a `channels` array; each entry carries the module type and
//! the current `power`, `key` and `status` levels as the strings `"on"` /
//! `"off"`. Writing a line of the form `channel[N].power_supply(1)` or
//! `channel[N].power_key(0)` drives the corresponding signal.

use std::fmt;
use std::fs;
use std::io::Write as _;
use std::path::{Path, PathBuf};

use pgator_core::{ChannelSignals, SignalError, SignalLevel};
use serde::Deserialize;

/// Parsed contents of a board device file.
#[derive(Debug, Deserialize)]
pub struct DeviceFile {
    /// Channels in hardware order.
    #[serde(default)]
    pub channels: Vec<DeviceChannel>,
}

/// One channel entry of a board device file.
#[derive(Debug, Deserialize)]
pub struct DeviceChannel {
    /// Module type identifier (e.g. `SIM5215`).
    #[serde(default)]
    pub module: Option<String>,
    /// Power rail level, `"on"` or `"off"`.
    #[serde(default)]
    pub power: Option<String>,
    /// Power key level, `"on"` or `"off"`.
    #[serde(default)]
    pub key: Option<String>,
    /// Module status, `"on"` or `"off"`.
    #[serde(default)]
    pub status: Option<String>,
}

impl DeviceFile {
    /// Reads and parses the device file at `path`.
    ///
    /// # Errors
    ///
    /// [`SignalError::Unavailable`] if the file cannot be read,
    /// [`SignalError::Malformed`] if it is not the expected JSON.
    pub fn load(path: &Path) -> Result<Self, SignalError> {
        let text = fs::read_to_string(path)
            .map_err(|err| SignalError::Unavailable(format!("{}: {err}", path.display())))?;
        serde_json::from_str(&text)
            .map_err(|err| SignalError::Malformed(format!("{}: {err}", path.display())))
    }
}

/// Which per-channel field a read targets.
#[derive(Debug, Clone, Copy)]
enum Field {
    Power,
    Key,
    Status,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Power => "power",
            Self::Key => "key",
            Self::Status => "status",
        })
    }
}

/// [`ChannelSignals`] implementation against one board device path.
#[derive(Debug, Clone)]
pub struct DeviceSignals {
    path: PathBuf,
}

impl DeviceSignals {
    /// Creates signals bound to `path`.
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// The board device path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_command(&self, command: &str) -> Result<(), SignalError> {
        let mut file = fs::File::create(&self.path)
            .map_err(|err| SignalError::Unavailable(format!("{}: {err}", self.path.display())))?;
        write!(file, "{command}")
            .map_err(|err| SignalError::Unavailable(format!("{}: {err}", self.path.display())))
    }

    fn read_field(&self, position: usize, field: Field) -> Result<SignalLevel, SignalError> {
        let device = DeviceFile::load(&self.path)?;
        let channel = device
            .channels
            .get(position)
            .ok_or(SignalError::UnknownChannel(position))?;
        let value = match field {
            Field::Power => &channel.power,
            Field::Key => &channel.key,
            Field::Status => &channel.status,
        };
        let value = value.as_deref().ok_or_else(|| {
            SignalError::Malformed(format!(
                "{}: channel {position} has no '{field}' field",
                self.path.display()
            ))
        })?;
        // The driver reports "on"; anything else reads as off.
        Ok(if value == "on" {
            SignalLevel::On
        } else {
            SignalLevel::Off
        })
    }
}

impl ChannelSignals for DeviceSignals {
    fn set_power_supply(&self, position: usize, level: SignalLevel) -> Result<(), SignalError> {
        self.write_command(&format!(
            "channel[{position}].power_supply({})",
            level.as_command_digit()
        ))
    }

    fn power_supply(&self, position: usize) -> Result<SignalLevel, SignalError> {
        self.read_field(position, Field::Power)
    }

    fn set_power_key(&self, position: usize, level: SignalLevel) -> Result<(), SignalError> {
        self.write_command(&format!(
            "channel[{position}].power_key({})",
            level.as_command_digit()
        ))
    }

    fn status(&self, position: usize) -> Result<SignalLevel, SignalError> {
        self.read_field(position, Field::Status)
    }
}
