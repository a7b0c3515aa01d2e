//! End-to-end tests of the `ledger` binary

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::TempDir;

/// A ledger file location, receipts and search directories, and a settings
/// file that points the fuzzy selector at a program that does not exist
struct Workspace {
    _dir: TempDir,
    ledger: PathBuf,
    receipts: PathBuf,
    scans: PathBuf,
    config: PathBuf,
}

impl Workspace {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let receipts = dir.path().join("receipts");
        let scans = dir.path().join("scans");
        fs::create_dir(&receipts).unwrap();
        fs::create_dir(&scans).unwrap();

        let config = dir.path().join("settings.json");
        fs::write(
            &config,
            r#"{"selector_program": "no-such-selector-program"}"#,
        )
        .unwrap();

        Self {
            ledger: dir.path().join("ledger.json"),
            receipts,
            scans,
            config,
            _dir: dir,
        }
    }

    fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("ledger").unwrap();
        cmd.env_remove("PAGER")
            .env_remove("RUST_LOG")
            .arg("--config")
            .arg(&self.config)
            .arg("-s")
            .arg(&self.scans);
        cmd
    }

    fn run(&self, extra: &[&str], input: &str) -> assert_cmd::assert::Assert {
        self.command()
            .args(extra)
            .arg(&self.ledger)
            .arg(&self.receipts)
            .write_stdin(input)
            .assert()
    }

    fn ledger_json(&self) -> Value {
        serde_json::from_str(&fs::read_to_string(&self.ledger).unwrap()).unwrap()
    }
}

fn receipt_files(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn test_help_exits_successfully() {
    Command::cargo_bin("ledger")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("LEDGER_FILE"))
        .stdout(predicate::str::contains("--search-directory"));
}

#[test]
fn test_missing_arguments_exit_with_one() {
    Command::cargo_bin("ledger")
        .unwrap()
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_new_creates_empty_ledger() {
    let ws = Workspace::new();

    ws.run(&["-n"], "q\n")
        .success()
        .stdout(predicate::str::contains("Created new ledger"));

    assert_eq!(ws.ledger_json(), serde_json::json!({ "transactions": [] }));
}

#[test]
fn test_new_refuses_existing_file() {
    let ws = Workspace::new();
    fs::write(&ws.ledger, "precious").unwrap();

    ws.run(&["-n"], "q\n")
        .code(1)
        .stderr(predicate::str::contains("already exists"));

    assert_eq!(fs::read_to_string(&ws.ledger).unwrap(), "precious");
}

#[test]
fn test_missing_ledger_without_new_fails() {
    let ws = Workspace::new();

    ws.run(&[], "q\n")
        .code(1)
        .stderr(predicate::str::contains("Ledger file not found"));

    assert!(!ws.ledger.exists());
}

#[test]
fn test_missing_receipts_directory_fails() {
    let ws = Workspace::new();
    fs::remove_dir(&ws.receipts).unwrap();

    ws.run(&["-n"], "q\n")
        .code(1)
        .stderr(predicate::str::contains("Receipts directory"));

    assert!(!ws.ledger.exists());
}

#[test]
fn test_end_of_input_at_menu_exits_cleanly() {
    let ws = Workspace::new();

    ws.run(&["-n"], "")
        .success()
        .stdout(predicate::str::contains("Commands:"));
}

#[test]
fn test_add_with_receipt_then_list() {
    let ws = Workspace::new();
    fs::write(ws.scans.join("receipt-coffee.pdf"), b"%PDF").unwrap();
    fs::write(ws.scans.join("notes.txt"), b"ignored").unwrap();

    let script = concat!(
        "a\n",                // add
        "Coffee\n",           // description
        "Latte\n",            // item name
        "4.50\n",             // price
        "l\n",                // loss
        "\n",                 // quantity 1
        "\n",                 // no tags
        "\n",                 // no more items
        "\n",                 // no address
        "2024-01-05 08:30\n", // timestamp
        "\n",                 // no payment method
        "a\n",                // attach a receipt
        "coffee\n",           // search query
        "1\n",                // first match
        "y\n",                // save
        "l\n",                // list
        "q\n",
    );

    ws.run(&["-n"], script)
        .success()
        .stdout(predicate::str::contains("Transaction saved."))
        .stdout(predicate::str::contains("Coffee"))
        .stdout(predicate::str::contains("1 transaction(s)"));

    let json = ws.ledger_json();
    let txn = &json["transactions"][0];
    assert_eq!(txn["description"], "Coffee");
    assert_eq!(txn["items"][0]["name"], "Latte");
    assert_eq!(txn["items"][0]["price"], -450);

    let receipt = txn["receipt_path"].as_str().unwrap();
    assert!(receipt.ends_with(".pdf"));
    assert_eq!(receipt_files(&ws.receipts), vec![receipt.to_string()]);
    assert!(ws.scans.join("receipt-coffee.pdf").exists());
}

#[test]
fn test_delete_removes_transaction_and_receipt() {
    let ws = Workspace::new();
    let ledger = serde_json::json!({
        "transactions": [{
            "id": "5f0c7a52-3d43-4c4f-9a7e-1b2d3c4d5e6f",
            "description": "Groceries",
            "items": ["Bread", "Milk"],
            "address": "Main St",
            "timestamp": "2024-02-01T17:00:00",
            "payment_method": "Card",
            "receipt_path": "5f0c7a52-3d43-4c4f-9a7e-1b2d3c4d5e6f.jpg"
        }]
    });
    fs::write(&ws.ledger, ledger.to_string()).unwrap();
    fs::write(
        ws.receipts.join("5f0c7a52-3d43-4c4f-9a7e-1b2d3c4d5e6f.jpg"),
        b"jpg",
    )
    .unwrap();

    ws.run(&[], "r\n1\ny\nq\n")
        .success()
        .stdout(predicate::str::contains("Transaction removed."));

    assert_eq!(ws.ledger_json(), serde_json::json!({ "transactions": [] }));
    assert!(receipt_files(&ws.receipts).is_empty());
}

#[test]
fn test_dangling_receipt_is_reported_at_startup() {
    let ws = Workspace::new();
    let ledger = serde_json::json!({
        "transactions": [{
            "id": "5f0c7a52-3d43-4c4f-9a7e-1b2d3c4d5e6f",
            "description": "Groceries",
            "items": [],
            "timestamp": "2024-02-01T17:00:00",
            "receipt_path": "gone.jpg"
        }]
    });
    fs::write(&ws.ledger, ledger.to_string()).unwrap();

    ws.run(&[], "q\n")
        .success()
        .stderr(predicate::str::contains("missing receipt"));
}
