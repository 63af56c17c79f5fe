//! `casetree configure` and `casetree catalog` end to end.

use assert_cmd::cargo::cargo_bin_cmd;
use casetree_testing::{TestWorld, assertions, fixtures};
use predicates::prelude::*;
use serde_json::Value;

fn run_json(world: &TestWorld, args: &[&str]) -> anyhow::Result<(Value, String)> {
    let mut cmd = cargo_bin_cmd!("casetree");
    world.configure_command(&mut cmd).args(["--format", "json"]).args(args);
    let output = cmd.output()?;
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    assert!(output.status.success(), "stderr: {}", stderr);
    Ok((serde_json::from_slice(&output.stdout)?, stderr))
}

#[test]
fn test_configure_add_remove_rename() -> anyhow::Result<()> {
    let world = TestWorld::new().with_config("default_columns = [\"caseNumber\", \"status\"]\n");
    let payload = world.write_payload("cases.json", &fixtures::sample_payload())?;
    let payload = payload.to_string_lossy().into_owned();

    let (json, _) = run_json(
        &world,
        &[
            "configure",
            &payload,
            "--add",
            "ownerName",
            "--add",
            "workGroup=Team",
            "--remove",
            "2",
            "--rename",
            "1=Number",
            "--set-field",
            "2=origin",
        ],
    )?;

    assertions::assert_column_labels(&json, &["Number", "Owner", "Team"])?;
    assert_eq!(json["columns"][0]["fieldName"], "caseUrl");
    assert_eq!(json["columns"][1]["fieldName"], "origin");
    assert_eq!(json["columns"][2]["fieldName"], "workGroupUrl");
    assert_eq!(json["revision"], 2);
    assertions::assert_node_count(&json, 5)?;
    Ok(())
}

#[test]
fn test_configure_to_zero_columns_warns() -> anyhow::Result<()> {
    let world = TestWorld::new().with_config("default_columns = [\"caseNumber\", \"status\"]\n");
    let payload = world.write_payload("cases.json", &fixtures::sample_payload())?;
    let payload = payload.to_string_lossy().into_owned();

    let (json, stderr) = run_json(
        &world,
        &["configure", &payload, "--remove", "1", "--remove", "1"],
    )?;

    assert!(stderr.contains("no columns left after saving"));
    assert_eq!(json["columns"].as_array().map(Vec::len), Some(0));
    assert_eq!(json["configurationWarning"]["type"], "no_columns");
    Ok(())
}

#[test]
fn test_configure_unknown_field_is_discarded() -> anyhow::Result<()> {
    let world = TestWorld::new().with_config("default_columns = [\"status\"]\n");
    let payload = world.write_payload("cases.json", &fixtures::sample_payload())?;
    let payload = payload.to_string_lossy().into_owned();

    let (json, _) = run_json(&world, &["configure", &payload, "--add", "region__c"])?;
    assertions::assert_column_labels(&json, &["Status"])?;
    Ok(())
}

#[test]
fn test_configure_fetch_error_exits_2() -> anyhow::Result<()> {
    let world = TestWorld::new();
    let payload = world.write_payload("error.json", &fixtures::error_payload("Timed out"))?;

    let mut cmd = cargo_bin_cmd!("casetree");
    world
        .configure_command(&mut cmd)
        .arg("configure")
        .arg(&payload)
        .args(["--add", "origin"]);
    cmd.assert()
        .code(2)
        .stderr(predicate::str::contains("Timed out"));
    Ok(())
}

#[test]
fn test_catalog_lists_every_field() -> anyhow::Result<()> {
    let world = TestWorld::new();
    let (json, _) = run_json(&world, &["catalog"])?;

    let fields = json["fields"].as_array().cloned().unwrap_or_default();
    assert_eq!(fields.len(), 16);
    assert_eq!(fields[0]["fieldName"], "caseNumber");
    assert_eq!(fields[0]["linkField"], "caseUrl");

    let mut cmd = cargo_bin_cmd!("casetree");
    world.configure_command(&mut cmd).arg("catalog");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("lastModifiedDate"))
        .stdout(predicate::str::contains("workGroupUrl"));
    Ok(())
}
