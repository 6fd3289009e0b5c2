use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;

mod common;

#[test]
fn test_cli_end_to_end() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin!("bikeledger"));
    cmd.arg("tests/fixtures/transactions.csv")
        .arg("--seed")
        .arg("tests/fixtures/registry.json");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("bike,status,provider,active_user"))
        .stdout(predicate::str::contains(
            "B1,INUSE,org.bikesharing.biznet.BikeProvider#P1,org.bikesharing.biznet.BikeUser#U1",
        ))
        .stdout(predicate::str::contains(
            "B2,AVAILABLE,org.bikesharing.biznet.BikeProvider#P1,",
        ))
        .stdout(predicate::str::contains(
            "B3,CALLBACK,org.bikesharing.biznet.BikeProvider#P2,",
        ))
        .stderr(predicate::str::contains("Error").not());

    Ok(())
}

#[test]
fn test_listen_prints_events() {
    let mut cmd = Command::new(cargo_bin!("bikeledger"));
    cmd.arg("tests/fixtures/transactions.csv")
        .arg("--seed")
        .arg("tests/fixtures/registry.json")
        .arg("--listen");

    cmd.assert()
        .success()
        .stderr(predicate::str::contains(
            "event org.bikesharing.biznet.BikeEvent#t1#0 bike=org.bikesharing.biznet.Bike#B1 \
             time=2024-05-01T08:00:00+00:00 tx=org.bikesharing.biznet.BikeReleaseTransaction#t1",
        ))
        .stderr(predicate::str::contains(
            "tx=org.bikesharing.biznet.BikeCallbackTransaction#t5",
        ));
}

#[test]
fn test_rejected_transaction_is_reported_and_skipped() {
    let registry = common::registry_json(
        r#"{
            "bikes": [{ "id": "B2", "status": "AVAILABLE", "provider": "BikeProvider#P1" }],
            "users": [{ "id": "U1" }, { "id": "U2" }]
        }"#,
    );
    let input = common::transactions_csv(&[
        "rent, t1, B2, BikeUser#U1,",
        "release, t2, B2, BikeProvider#P1,",
        "return, t3, B2, BikeUser#U2,",
        "return, t4, B2, BikeUser#U1,",
    ]);

    let mut cmd = Command::new(cargo_bin!("bikeledger"));
    cmd.arg(input.path()).arg("--seed").arg(registry.path());

    // Release while in use and return by the wrong user are both rejected;
    // the rightful return still goes through.
    cmd.assert()
        .success()
        .stderr(predicate::str::contains(
            "Error processing transaction: Illegal state",
        ))
        .stderr(predicate::str::contains(
            "Error processing transaction: Authorization error",
        ))
        .stdout(predicate::str::contains(
            "B2,AVAILABLE,org.bikesharing.biznet.BikeProvider#P1,",
        ));
}

#[test]
fn test_unknown_bike_is_reported() {
    let input = common::transactions_csv(&["release, t1, B9, BikeProvider#P1,"]);

    let mut cmd = Command::new(cargo_bin!("bikeledger"));
    cmd.arg(input.path());

    cmd.assert()
        .success()
        .stderr(predicate::str::contains("Bike not found: B9"))
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_invalid_seed_fails() {
    let registry = common::registry_json(r#"{ "bikes": [{ "id": "B1", "status": "INUSE" }] }"#);
    let input = common::transactions_csv(&[]);

    let mut cmd = Command::new(cargo_bin!("bikeledger"));
    cmd.arg(input.path()).arg("--seed").arg(registry.path());

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("INUSE without an active user"));
}

#[test]
fn test_missing_input_fails() {
    let mut cmd = Command::new(cargo_bin!("bikeledger"));
    cmd.arg("tests/fixtures/does_not_exist.csv");

    cmd.assert().failure();
}
