use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn stock_cli(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("stock-cli").unwrap();
    cmd.arg("--data")
        .arg(dir.join("Stock.txt"))
        .arg("--archive")
        .arg(dir.join("Archive.txt"));
    cmd
}

fn add(dir: &Path, name: &str, description: &str, price: &str, minutes: &str, procedure: bool) {
    let mut cmd = stock_cli(dir);
    cmd.args([
        "add",
        "--name",
        name,
        "--description",
        description,
        "--price",
        price,
        "--minutes",
        minutes,
    ]);
    if procedure {
        cmd.arg("--procedure");
    }
    cmd.assert().success();
}

fn seeded() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    add(dir.path(), "Consult", "30 min visit", "50.00", "30", true);
    add(dir.path(), "Bandage", "supply", "5.00", "0", false);
    dir
}

#[test]
fn add_assigns_sequential_ids() {
    let dir = tempfile::tempdir().unwrap();

    stock_cli(dir.path())
        .args(["add", "--name", "Consult", "--description", "30 min visit"])
        .args(["--price", "50", "--minutes", "30", "--procedure"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#1 Consult"));

    stock_cli(dir.path())
        .args(["add", "--name", "Bandage", "--description", "supply", "--price", "5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#2 Bandage"));

    let data = fs::read_to_string(dir.path().join("Stock.txt")).unwrap();
    assert_eq!(
        data,
        "1\tConsult\t30 min visit\t50\t30\tTrue\n2\tBandage\tsupply\t5\t0\tFalse\n"
    );
}

#[test]
fn list_by_id_and_search() {
    let dir = seeded();

    stock_cli(dir.path())
        .args(["list", "--by-id"])
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"(?s)1\s+Consult.*2\s+Bandage").unwrap());

    stock_cli(dir.path())
        .args(["search", "VISIT"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Consult").and(predicate::str::contains("Bandage").not()));
}

#[test]
fn update_changes_only_target_record() {
    let dir = seeded();

    stock_cli(dir.path())
        .args(["update", "1", "--name", "Consult", "--description", "45 min visit"])
        .args(["--price", "60", "--minutes", "45", "--procedure"])
        .assert()
        .success()
        .stdout(predicate::str::contains("The record has been updated"));

    stock_cli(dir.path())
        .args(["get", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("45 min visit").and(predicate::str::contains("60.00")));

    stock_cli(dir.path())
        .args(["get", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Name:         Bandage"));
}

#[test]
fn invalid_stock_is_rejected_with_all_messages() {
    let dir = seeded();

    stock_cli(dir.path())
        .args(["add", "--name", "consult", "--description", " ", "--price", "-1"])
        .assert()
        .failure()
        .stderr(
            predicate::str::contains("The Name entered is already on file")
                .and(predicate::str::contains("Please enter a Description"))
                .and(predicate::str::contains("Price cannot be less than zero")),
        );
}

#[test]
fn non_numeric_price_is_a_usage_error() {
    let dir = tempfile::tempdir().unwrap();

    stock_cli(dir.path())
        .args(["add", "--name", "X", "--description", "y", "--price", "cheap"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--price"));
}

#[test]
fn delete_then_get_fails_and_restore_brings_it_back() {
    let dir = seeded();

    stock_cli(dir.path())
        .args(["delete", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("The stock has been deleted"));

    stock_cli(dir.path())
        .args(["get", "2"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("stock not found: 2"));

    stock_cli(dir.path())
        .arg("restore")
        .assert()
        .success()
        .stdout(predicate::str::contains("canceled"));

    stock_cli(dir.path()).args(["get", "2"]).assert().success();
}

#[test]
fn missing_data_file_is_recovered_from_archive() {
    let dir = seeded();
    // архив = состояние до последнего add (только Consult)
    fs::remove_file(dir.path().join("Stock.txt")).unwrap();

    stock_cli(dir.path())
        .args(["list", "--by-id"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Consult").and(predicate::str::contains("Bandage").not()));

    assert!(dir.path().join("Stock.txt").exists());
}

#[test]
fn empty_store_lists_nothing() {
    let dir = tempfile::tempdir().unwrap();

    stock_cli(dir.path())
        .arg("list")
        .assert()
        .success()
        .stdout("The file is empty\n");
}
