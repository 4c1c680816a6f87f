//! Integration tests for CLI
//!
//! These tests run the built binary against a throwaway database.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::path::Path;
use std::process::{Command, Output};

fn station_walk(db: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_station-walk"))
        .args(args)
        .env("STATION_WALK_DATABASE__PATH", db)
        .env_remove("STATION_WALK_PLACES__API_KEY")
        .env_remove("STATION_WALK_CONFIG")
        .output()
        .expect("failed to run station-walk")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn help_lists_subcommands() {
    let dir = tempfile::tempdir().unwrap();
    let output = station_walk(&dir.path().join("walk.db"), &["--help"]);

    assert!(output.status.success());
    let help = stdout(&output);
    for command in ["resolve", "batch", "import-stations", "show", "stations"] {
        assert!(help.contains(command), "missing {command} in help");
    }
}

#[test]
fn import_then_list_stations() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("walk.db");
    let stations = dir.path().join("stations.json");
    std::fs::write(
        &stations,
        r#"[
            {"id": "ns1", "name": "Jurong East", "latitude": 1.333, "longitude": 103.742},
            {"id": "tbd", "name": "Future Station"}
        ]"#,
    )
    .unwrap();

    let output = station_walk(&db, &["import-stations", stations.to_str().unwrap()]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert!(stdout(&output).contains("Imported 2 stations (1 with coordinates)"));

    let output = station_walk(&db, &["stations", "--json"]);
    assert!(output.status.success(), "{}", stderr(&output));

    let listed: Vec<serde_json::Value> = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0]["name"], "Jurong East");
}

#[test]
fn import_rejects_half_coordinate() {
    let dir = tempfile::tempdir().unwrap();
    let stations = dir.path().join("stations.json");
    std::fs::write(&stations, r#"[{"id": "x", "name": "Half", "latitude": 1.3}]"#).unwrap();

    let output = station_walk(
        &dir.path().join("walk.db"),
        &["import-stations", stations.to_str().unwrap()],
    );

    assert!(!output.status.success());
}

#[test]
fn resolve_without_api_key_explains_setting() {
    let dir = tempfile::tempdir().unwrap();
    let output = station_walk(&dir.path().join("walk.db"), &["resolve", "Test Cafe"]);

    assert!(!output.status.success());
    assert!(stderr(&output).contains("STATION_WALK_PLACES__API_KEY"));
}

#[test]
fn batch_with_missing_input_fails() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.json");
    let output = station_walk(
        &dir.path().join("walk.db"),
        &["batch", missing.to_str().unwrap()],
    );

    assert!(!output.status.success());
    assert!(stderr(&output).contains("Failed to read"));
}

#[test]
fn known_coordinate_resolves_without_api_key_and_shows() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("walk.db");
    let stations = dir.path().join("stations.json");
    std::fs::write(
        &stations,
        r#"[{"id": "test-station", "name": "Test Station", "latitude": 1.301, "longitude": 103.801}]"#,
    )
    .unwrap();
    let output = station_walk(&db, &["import-stations", stations.to_str().unwrap()]);
    assert!(output.status.success(), "{}", stderr(&output));

    let output = station_walk(
        &db,
        &[
            "resolve",
            "Test Cafe",
            "--id",
            "p1",
            "--lat",
            "1.3",
            "--lon",
            "103.8",
            "--save",
        ],
    );
    assert!(output.status.success(), "{}", stderr(&output));

    let output = station_walk(&db, &["show", "p1", "--json"]);
    assert!(output.status.success(), "{}", stderr(&output));
    let row: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(row["station_id"], "test-station");
    assert_eq!(row["walking_distance_meters"], 204);
    assert!(row["resolved_at"].is_string());
}

#[test]
fn show_unknown_id_fails() {
    let dir = tempfile::tempdir().unwrap();
    let output = station_walk(&dir.path().join("walk.db"), &["show", "missing"]);

    assert!(!output.status.success());
    assert!(stderr(&output).contains("No stored result for missing"));
}
