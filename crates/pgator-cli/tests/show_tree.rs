//! `show` rendering against real files on disk.

use std::fs;

use pgator_cli::commands::show;
use tempfile::TempDir;

fn fake_dev() -> (TempDir, std::path::PathBuf) {
    let dev = tempfile::tempdir().unwrap();
    fs::create_dir(dev.path().join("polygator")).unwrap();

    let subsystem = dev.path().join("polygator").join("subsystem");
    fs::write(
        &subsystem,
        r#"{"version": "1.0.2", "boards": [{"driver": "pg_g20", "path": "polygator!board-g20"}]}"#,
    )
    .unwrap();
    fs::write(
        dev.path().join("polygator").join("board-g20"),
        r#"{"channels": [{"module": "M10", "power": "off", "key": "off", "status": "off"}]}"#,
    )
    .unwrap();

    (dev, subsystem)
}

#[test]
fn renders_version_board_identity_and_device_tree() {
    let (dev, subsystem) = fake_dev();
    let tree = show::render(&subsystem, dev.path()).unwrap();

    let board_path = dev.path().join("polygator").join("board-g20");
    let expected_header = format!(
        "Polygator subsystem version=1.0.2\n\
         board-g20 driver=pg_g20 path={}\n",
        board_path.display()
    );
    assert!(tree.starts_with(&expected_header), "got:\n{tree}");

    // Device JSON as a tab-indented tree: object at level 1, `channels`
    // at level 2, the array item at level 3, its fields at level 4.
    assert!(tree.contains("\t{\n"), "got:\n{tree}");
    assert!(tree.contains("\t\tchannels: [\n"), "got:\n{tree}");
    assert!(tree.contains("\t\t\t\tmodule: \"M10\"\n"), "got:\n{tree}");
    assert!(tree.contains("\t\t\t\tstatus: \"off\"\n"), "got:\n{tree}");
}

#[test]
fn missing_board_device_is_an_error() {
    let (dev, subsystem) = fake_dev();
    fs::remove_file(dev.path().join("polygator").join("board-g20")).unwrap();

    assert!(show::render(&subsystem, dev.path()).is_err());
}
