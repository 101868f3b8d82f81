//! `pgator show` - diagnostic configuration tree.
//!
//! Prints the subsystem version and, per board, its identity followed by the
//! raw device JSON rendered as a tab-indented tree.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::exit_codes::{codes, map_inventory_error};
use crate::inventory::{self, InventoryError};

/// Prints the configuration tree and returns the process exit code.
#[must_use]
pub fn run(subsystem_path: &Path, dev_root: &Path) -> u8 {
    match render(subsystem_path, dev_root) {
        Ok(tree) => {
            print!("{tree}");
            codes::SUCCESS
        }
        Err(err) => {
            eprintln!("pgator: {err}");
            map_inventory_error(&err)
        }
    }
}

/// Renders the whole tree to a string.
///
/// # Errors
///
/// Returns an [`InventoryError`] if the subsystem or a board device file
/// cannot be read or parsed.
pub fn render(subsystem_path: &Path, dev_root: &Path) -> Result<String, InventoryError> {
    let inventory = inventory::load(subsystem_path, dev_root)?;

    let mut out = String::new();
    if let Some(version) = &inventory.version {
        let _ = writeln!(out, "Polygator subsystem version={version}");
    }
    for board in &inventory.boards {
        let _ = writeln!(
            out,
            "{} driver={} path={}",
            board.name,
            board.driver,
            board.signals.path().display()
        );
        let text =
            fs::read_to_string(board.signals.path()).map_err(|source| InventoryError::Read {
                path: board.signals.path().to_path_buf(),
                source,
            })?;
        let value: Value =
            serde_json::from_str(&text).map_err(|source| InventoryError::Parse {
                path: board.signals.path().to_path_buf(),
                source,
            })?;
        write_node(&mut out, 1, "", &value);
    }
    Ok(out)
}

/// Writes one JSON node as `<tabs><key>: <value>`, recursing into arrays
/// and objects.
fn write_node(out: &mut String, level: usize, key: &str, value: &Value) {
    let pfx = "\t".repeat(level);
    let heading = |open: char| {
        if key.is_empty() {
            format!("{pfx}{open}")
        } else {
            format!("{pfx}{key}: {open}")
        }
    };
    match value {
        Value::Null => {
            let _ = writeln!(out, "{pfx}{key}: null");
        }
        Value::Bool(flag) => {
            let _ = writeln!(out, "{pfx}{key}: {flag}");
        }
        Value::Number(number) => {
            let _ = writeln!(out, "{pfx}{key}: {number}");
        }
        Value::String(text) => {
            let _ = writeln!(out, "{pfx}{key}: \"{text}\"");
        }
        Value::Array(items) => {
            let _ = writeln!(out, "{}", heading('['));
            for item in items {
                write_node(out, level + 1, "", item);
            }
            let _ = writeln!(out, "{pfx}]");
        }
        Value::Object(entries) => {
            let _ = writeln!(out, "{}", heading('{'));
            for (entry_key, entry_value) in entries {
                write_node(out, level + 1, entry_key, entry_value);
            }
            let _ = writeln!(out, "{pfx}}}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalars_arrays_and_objects_render_with_tab_indentation() {
        let value: Value = serde_json::from_str(
            r#"{"version": "1.0.2", "count": 2, "channels": [{"module": "M10"}]}"#,
        )
        .unwrap();

        let mut out = String::new();
        write_node(&mut out, 0, "", &value);

        // serde_json orders object keys lexicographically.
        assert_eq!(
            out,
            "{\n\
             \tchannels: [\n\
             \t\t{\n\
             \t\t\tmodule: \"M10\"\n\
             \t\t}\n\
             \t]\n\
             \tcount: 2\n\
             \tversion: \"1.0.2\"\n\
             }\n"
        );
    }
}
