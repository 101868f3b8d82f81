//! Deterministic exit codes.
//!
//! Scripts drive this tool during board bring-up, so each failure class maps
//! to a stable code instead of a blanket `1`.

use crate::inventory::InventoryError;

/// Exit code constants.
pub mod codes {
    /// Every channel reached its terminal success state.
    pub const SUCCESS: u8 = 0;

    /// Sequencing ran to completion but at least one channel failed.
    pub const SEQUENCE_FAILED: u8 = 2;

    /// The command line did not parse.
    pub const VALIDATION_ERROR: u8 = 10;

    /// The subsystem file or a board device could not be read.
    pub const SUBSYSTEM_UNAVAILABLE: u8 = 20;

    /// The subsystem file or a board device held unparseable data.
    pub const SUBSYSTEM_MALFORMED: u8 = 21;
}

/// Maps an inventory load failure to its exit code.
#[must_use]
pub fn map_inventory_error(err: &InventoryError) -> u8 {
    match err {
        InventoryError::Read { .. } => codes::SUBSYSTEM_UNAVAILABLE,
        InventoryError::Parse { .. } => codes::SUBSYSTEM_MALFORMED,
    }
}

/// Maps an argument parsing failure to its exit code.
///
/// clap reports `--help` and `--version` through its error path too; those
/// are not validation failures and exit with [`codes::SUCCESS`].
#[must_use]
pub fn map_clap_error(err: &clap::Error) -> u8 {
    if err.use_stderr() {
        codes::VALIDATION_ERROR
    } else {
        codes::SUCCESS
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn read_errors_map_to_unavailable() {
        let err = InventoryError::Read {
            path: PathBuf::from("/dev/polygator/subsystem"),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        assert_eq!(map_inventory_error(&err), codes::SUBSYSTEM_UNAVAILABLE);
    }

    #[test]
    fn parse_errors_map_to_malformed() {
        let bad: Result<serde_json::Value, _> = serde_json::from_str("not json");
        let err = InventoryError::Parse {
            path: PathBuf::from("/dev/polygator/board"),
            source: bad.unwrap_err(),
        };
        assert_eq!(map_inventory_error(&err), codes::SUBSYSTEM_MALFORMED);
    }

    fn parse_err(args: &[&str]) -> clap::Error {
        clap::Command::new("pgator")
            .arg(clap::Arg::new("subsystem").long("subsystem"))
            .try_get_matches_from(args)
            .unwrap_err()
    }

    #[test]
    fn argument_errors_map_to_validation_not_sequence_failure() {
        let code = map_clap_error(&parse_err(&["pgator", "--no-such-flag"]));
        assert_eq!(code, codes::VALIDATION_ERROR);
        assert_ne!(code, codes::SEQUENCE_FAILED);
    }

    #[test]
    fn help_request_maps_to_success() {
        assert_eq!(
            map_clap_error(&parse_err(&["pgator", "--help"])),
            codes::SUCCESS
        );
    }
}
