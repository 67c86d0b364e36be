use std::{fs, path::Path};

use assert_cmd::Command;
use tempfile::TempDir;

/// Two Crystal sales on different days and one Bonafont sale, in the legacy field names.
pub const LEGACY_BLOB: &str = r#"[
  {"id": "1", "agua": "Crystal", "quantidade": 3, "valor": 10, "data": "05/09/2025"},
  {"id": "2", "agua": "Bonafont", "quantidade": 1, "valor": 2.5, "data": "05/09/2025"},
  {"id": "3", "agua": "Crystal", "quantidade": 2, "valor": 6, "data": "01/08/2025"}
]"#;

/// Fresh data home for one test run.
pub fn home() -> TempDir {
    TempDir::new().expect("create temp dir")
}

/// Writes the raw sale blob where the shell expects the default store.
pub fn seed_store(home: &Path, blob: &str) {
    let dir = home.join("data").join("store");
    fs::create_dir_all(&dir).expect("create store dir");
    fs::write(dir.join("vendas.json"), blob).expect("seed store");
}

pub fn stored_blob(home: &Path) -> Option<String> {
    fs::read_to_string(home.join("data").join("store").join("vendas.json")).ok()
}

/// The CLI in script mode, isolated under `home`.
pub fn cli(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("sales_tracker_cli").expect("binary");
    cmd.env("SALES_TRACKER_CLI_SCRIPT", "1")
        .env("SALES_TRACKER_HOME", home)
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG");
    cmd
}
