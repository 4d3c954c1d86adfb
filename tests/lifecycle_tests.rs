use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;

mod common;
use common::{register_shop, scenario, sign_up};

#[test]
fn test_registered_shop_is_pending() {
    let file = scenario(&[
        &sign_up("Jane Smith", "jane@example.com"),
        &register_shop(1, "Fashion Hub", "Apparel"),
    ]);

    let mut cmd = Command::new(cargo_bin!("sokoo"));
    cmd.arg(file.path());

    cmd.assert().success().stdout(predicate::str::contains(
        "1,Fashion Hub,Jane Smith,Apparel,Nairobi,The Hub,B-12,pending",
    ));
}

#[test]
fn test_pending_shop_is_not_in_directory() {
    let file = scenario(&[
        &sign_up("Jane Smith", "jane@example.com"),
        &register_shop(1, "Fashion Hub", "Apparel"),
    ]);

    let mut cmd = Command::new(cargo_bin!("sokoo"));
    cmd.arg(file.path()).args(["--report", "directory"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Fashion Hub").not());
}

#[test]
fn test_approved_shop_enters_directory() {
    let file = scenario(&[
        &sign_up("Jane Smith", "jane@example.com"),
        &register_shop(1, "Fashion Hub", "Apparel"),
        r#"{"op":"approve_shop","shop":1}"#,
    ]);

    let mut cmd = Command::new(cargo_bin!("sokoo"));
    cmd.arg(file.path()).args(["--report", "directory"]);

    cmd.assert().success().stdout(predicate::str::contains(
        "1,Fashion Hub,Jane Smith,Apparel,Nairobi,The Hub,B-12,active",
    ));
}

#[test]
fn test_rejected_shop_is_terminal() {
    let file = scenario(&[
        &sign_up("Jane Smith", "jane@example.com"),
        &register_shop(1, "Fashion Hub", "Apparel"),
        r#"{"op":"reject_shop","shop":1}"#,
        // stale admin view tries to approve afterwards; refused, state keeps
        r#"{"op":"approve_shop","shop":1}"#,
    ]);

    let mut cmd = Command::new(cargo_bin!("sokoo"));
    cmd.arg(file.path());

    cmd.assert()
        .success()
        .stderr(predicate::str::contains("conflict"))
        .stdout(predicate::str::contains(",rejected"));
}

#[test]
fn test_one_shop_per_owner() {
    let file = scenario(&[
        &sign_up("Jane Smith", "jane@example.com"),
        &register_shop(1, "Fashion Hub", "Apparel"),
        &register_shop(1, "Second Attempt", "Shoes"),
    ]);

    let mut cmd = Command::new(cargo_bin!("sokoo"));
    cmd.arg(file.path());

    cmd.assert()
        .success()
        .stderr(predicate::str::contains("already owns shop"))
        .stdout(predicate::str::contains("Second Attempt").not());
}

#[test]
fn test_deleted_shop_leaves_every_report() {
    let file = scenario(&[
        &sign_up("Jane Smith", "jane@example.com"),
        &register_shop(1, "Fashion Hub", "Apparel"),
        r#"{"op":"approve_shop","shop":1}"#,
        r#"{"op":"delete_shop","shop":1}"#,
    ]);

    let mut cmd = Command::new(cargo_bin!("sokoo"));
    cmd.arg(file.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Fashion Hub").not());
}

#[test]
fn test_owner_edit_updates_listing() {
    let file = scenario(&[
        &sign_up("Jane Smith", "jane@example.com"),
        &register_shop(1, "Fashion Hub", "Apparel"),
        r#"{"op":"update_shop","shop":1,"name":"Fashion Hub Deluxe","industry":"Apparel","shop_number":"B-14","city":"Nairobi","mall":"Two Rivers Mall","whatsapp":"+254700000001"}"#,
    ]);

    let mut cmd = Command::new(cargo_bin!("sokoo"));
    cmd.arg(file.path());

    cmd.assert().success().stdout(predicate::str::contains(
        "1,Fashion Hub Deluxe,Jane Smith,Apparel,Nairobi,Two Rivers Mall,B-14,pending",
    ));
}

#[test]
fn test_users_report_tracks_promotion() {
    let file = scenario(&[
        &sign_up("Jane Smith", "jane@example.com"),
        &sign_up("John Doe", "john@example.com"),
        &register_shop(1, "Fashion Hub", "Apparel"),
    ]);

    let mut cmd = Command::new(cargo_bin!("sokoo"));
    cmd.arg(file.path()).args(["--report", "users"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(
            "1,Jane Smith,jane@example.com,shop-owner,active",
        ))
        .stdout(predicate::str::contains(
            "2,John Doe,john@example.com,customer,active",
        ));
}
