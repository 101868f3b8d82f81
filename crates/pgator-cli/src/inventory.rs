//! Subsystem inventory.
//!
//! The Polygator subsystem file (`/dev/polygator/subsystem`) describes the
//! installed boards as JSON: a `version` string and a `boards` array whose
//! entries carry a kernel `driver` name and a `path`. The path encodes the
//! device location with `!` as the directory separator, so
//! `polygator!board-g20` lives at `<dev root>/polygator/board-g20` and its
//! display name is the part after the last `!`.
//!
//! Loading reads each board's device file to enumerate channels, then fixes
//! every channel's tolerated power-rail settling delay at one second per
//! channel system-wide (more channels sharing a power domain tolerate a
//! longer settling delay).

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use pgator_core::{Board, Channel};
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::device::{DeviceFile, DeviceSignals};

/// Default location of the subsystem description file.
pub const DEFAULT_SUBSYSTEM_PATH: &str = "/dev/polygator/subsystem";

/// Root under which board device paths are resolved.
pub const DEFAULT_DEV_ROOT: &str = "/dev";

#[derive(Debug, Deserialize)]
struct SubsystemFile {
    version: Option<String>,
    #[serde(default)]
    boards: Vec<BoardEntry>,
}

#[derive(Debug, Deserialize)]
struct BoardEntry {
    #[serde(default)]
    driver: String,
    path: String,
}

/// A failed inventory load.
#[derive(Debug, Error)]
pub enum InventoryError {
    /// A subsystem or board device file could not be read.
    #[error("cannot read {path}: {source}")]
    Read {
        /// File that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A subsystem or board device file was not the expected JSON.
    #[error("malformed json in {path}: {source}")]
    Parse {
        /// File that failed.
        path: PathBuf,
        /// Underlying parse error.
        #[source]
        source: serde_json::Error,
    },
}

/// The boards and channels read once before sequencing begins.
#[derive(Debug)]
pub struct Inventory {
    /// Subsystem version string, if the driver reports one.
    pub version: Option<String>,
    /// Boards with their channels in configuration order.
    pub boards: Vec<Board<DeviceSignals>>,
    /// Channel count across all boards.
    pub total_channels: usize,
}

/// Loads the full inventory from `subsystem_path`, resolving board device
/// paths under `dev_root`.
///
/// # Errors
///
/// Returns an [`InventoryError`] if the subsystem file or any board device
/// file cannot be read or parsed.
pub fn load(subsystem_path: &Path, dev_root: &Path) -> Result<Inventory, InventoryError> {
    let subsystem: SubsystemFile = parse_file(subsystem_path)?;

    // Two passes: channel counts first, because every channel's settling
    // delay depends on the system-wide total.
    let mut loaded = Vec::with_capacity(subsystem.boards.len());
    let mut total_channels = 0;
    for entry in &subsystem.boards {
        let path = device_path(dev_root, &entry.path);
        let device: DeviceFile = parse_file(&path)?;
        let modules: Vec<String> = device
            .channels
            .into_iter()
            .map(|channel| channel.module.unwrap_or_default())
            .collect();
        total_channels += modules.len();
        loaded.push((entry, path, modules));
    }

    let max_power_supply_delay = Duration::from_secs(total_channels as u64);
    let boards = loaded
        .into_iter()
        .map(|(entry, path, modules)| {
            let name = board_name(&entry.path);
            debug!(board = name, path = %path.display(), channels = modules.len(), "board loaded");
            let mut board = Board::new(entry.driver.as_str(), name, DeviceSignals::new(path));
            board.channels = modules
                .into_iter()
                .enumerate()
                .map(|(position, module)| Channel::new(position, module, max_power_supply_delay))
                .collect();
            board
        })
        .collect();

    Ok(Inventory {
        version: subsystem.version,
        boards,
        total_channels,
    })
}

/// Display name of a board: the segment after the last `!` of its raw
/// subsystem path.
fn board_name(raw_path: &str) -> &str {
    raw_path.rsplit('!').next().unwrap_or(raw_path)
}

/// Filesystem path of a board device: the raw subsystem path with `!`
/// replaced by `/`, under `dev_root`.
fn device_path(dev_root: &Path, raw_path: &str) -> PathBuf {
    dev_root.join(raw_path.replace('!', "/"))
}

fn parse_file<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, InventoryError> {
    let text = fs::read_to_string(path).map_err(|source| InventoryError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| InventoryError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
