//! `pgator enable` / `pgator disable`.
//!
//! Builds the inventory, runs the polling driver for the requested
//! direction, and prints one line per channel outcome in the format scripts
//! have historically parsed: `<board>-radio<pos> power up done` or
//! `<board>-radio<pos> power down failed - <code>`.

use std::path::Path;

use pgator_core::{Direction, MonotonicClock, Outcome, PollConfig, run_sequence};
use tracing::info;

use crate::exit_codes::{codes, map_inventory_error};
use crate::inventory;

/// Runs one sequencing invocation and returns the process exit code.
#[must_use]
pub fn run(subsystem_path: &Path, dev_root: &Path, direction: Direction) -> u8 {
    let inventory = match inventory::load(subsystem_path, dev_root) {
        Ok(inventory) => inventory,
        Err(err) => {
            eprintln!("pgator: {err}");
            return map_inventory_error(&err);
        }
    };
    if let Some(version) = &inventory.version {
        println!("Polygator subsystem version={version}");
    }
    info!(
        boards = inventory.boards.len(),
        channels = inventory.total_channels,
        direction = direction.label(),
        "sequencing"
    );

    let mut boards = inventory.boards;
    let summary = run_sequence(
        &mut boards,
        direction,
        PollConfig::default(),
        &MonotonicClock,
        |notification| {
            let label = notification.direction.label();
            match notification.outcome {
                Outcome::Done => println!(
                    "{}-radio{} {label} done",
                    notification.board, notification.position
                ),
                Outcome::Failed(reason) => println!(
                    "{}-radio{} {label} failed - {}",
                    notification.board,
                    notification.position,
                    reason.code()
                ),
            }
        },
    );

    if summary.all_succeeded() {
        codes::SUCCESS
    } else {
        codes::SEQUENCE_FAILED
    }
}
