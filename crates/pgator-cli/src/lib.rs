//! `pgator` command-line power sequencer.
//!
//! The library half of the binary: inventory loading, the file-backed
//! hardware signal implementation, command entry points, and exit-code
//! mapping. Kept as a library so the integration tests can exercise the
//! same code paths the binary runs.

pub mod commands;
pub mod device;
pub mod exit_codes;
pub mod inventory;
