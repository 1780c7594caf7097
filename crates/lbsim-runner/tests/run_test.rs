//! Integration tests for the `lbsim` binary.
//!
//! These tests run the CLI against the scenario files in `scenarios/` and
//! check the exported history, snapshots and jammer sets.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

use serde::Deserialize;

// ============================================================================
// JSON Deserialization Types
// ============================================================================

/// The subset of history columns checked here. NaN cells arrive as `null`.
#[derive(Debug, Deserialize)]
struct HistoryRow {
    time_s: f64,
    mode: String,
    visible: f64,
    dl_cn_db: Option<f64>,
    dl_cinr_db: Option<f64>,
    dl_degradation_db: Option<f64>,
    jamming_active: f64,
    dominant_jammer: String,
    modcod_name: String,
    validation_verdict: String,
}

// ============================================================================
// Test Helper Functions
// ============================================================================

/// Run `lbsim` from the workspace root so scenario paths resolve.
fn lbsim(args: &[&str]) -> Output {
    let output = Command::new(env!("CARGO_BIN_EXE_lbsim"))
        .current_dir(concat!(env!("CARGO_MANIFEST_DIR"), "/../.."))
        .args(args)
        .output()
        .expect("Failed to execute lbsim");

    if !output.status.success() {
        panic!(
            "lbsim {:?} failed:\nstdout: {}\nstderr: {}",
            args,
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
    }
    output
}

fn run_json(scenarios: &[&str], extra: &[&str]) -> Vec<HistoryRow> {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("history.json");
    let path_str = path.to_str().expect("Invalid temp path");

    let mut args = vec!["run"];
    args.extend_from_slice(scenarios);
    args.extend_from_slice(&["--format", "json", "--output", path_str]);
    args.extend_from_slice(extra);
    lbsim(&args);

    let content = fs::read_to_string(&path).expect("Failed to read history");
    serde_json::from_str(&content).expect("Failed to parse history JSON")
}

// ============================================================================
// Tests
// ============================================================================

#[test]
fn test_run_leo_pass_json() {
    let rows = run_json(
        &["scenarios/leo_spot_jamming.yaml"],
        &["--duration", "10m", "--step", "1m"],
    );

    assert_eq!(rows.len(), 11);
    for (i, row) in rows.iter().enumerate() {
        assert_eq!(row.time_s, 60.0 * i as f64);
        assert_eq!(row.mode, "LEO");
    }

    let visible: Vec<&HistoryRow> = rows.iter().filter(|r| r.visible == 1.0).collect();
    assert!(!visible.is_empty(), "satellite never rose during the pass");
    for row in &visible {
        let cn = row.dl_cn_db.expect("visible row has C/N");
        let cinr = row.dl_cinr_db.expect("visible row has CINR");
        assert!(cinr <= cn);
        assert!(row.dl_degradation_db.unwrap() >= 0.0);
        assert_eq!(row.jamming_active, 1.0);
        assert_eq!(row.dominant_jammer, "J1");
        assert!(!row.validation_verdict.is_empty());
        assert!(!row.modcod_name.is_empty());
    }
    for row in rows.iter().filter(|r| r.visible == 0.0) {
        assert!(row.dl_cn_db.is_none());
    }
}

#[test]
fn test_run_csv_to_stdout() {
    let output = lbsim(&[
        "run",
        "scenarios/geo_legacy_links.yaml",
        "--duration",
        "1h",
        "--step",
        "20m",
    ]);
    let stdout = String::from_utf8(output.stdout).expect("stdout is not UTF-8");
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 5);

    let header: Vec<&str> = lines[0].split(',').collect();
    let mode = header.iter().position(|&c| c == "mode").unwrap();
    let source = header.iter().position(|&c| c == "preset_source").unwrap();
    let modcod = header.iter().position(|&c| c == "modcod_name").unwrap();
    let rtt = header.iter().position(|&c| c == "rtt_ms").unwrap();

    for line in &lines[1..] {
        let cells: Vec<&str> = line.split(',').collect();
        assert_eq!(cells.len(), header.len());
        assert_eq!(cells[mode], "GEO");
        assert_eq!(cells[source], "legacy");
        assert!(!cells[modcod].is_empty());
        let rtt_ms: f64 = cells[rtt].parse().unwrap();
        assert!(rtt_ms > 250.0, "GEO RTT too short: {}", rtt_ms);
    }
    // A stationary satellite gives identical link figures every tick.
    let cn = header.iter().position(|&c| c == "dl_cn_db").unwrap();
    let first: Vec<&str> = lines[1].split(',').collect();
    let last: Vec<&str> = lines[4].split(',').collect();
    assert_eq!(first[cn], last[cn]);
}

#[test]
fn test_overlay_increases_degradation() {
    let base = run_json(
        &["scenarios/leo_spot_jamming.yaml"],
        &["--duration", "5m", "--step", "1m"],
    );
    let heavy = run_json(
        &["scenarios/leo_spot_jamming.yaml", "scenarios/heavy_jamming_overlay.yaml"],
        &["--duration", "5m", "--step", "1m"],
    );

    assert_eq!(base.len(), heavy.len());
    for (b, h) in base.iter().zip(&heavy) {
        if let (Some(base_cinr), Some(heavy_cinr)) = (b.dl_cinr_db, h.dl_cinr_db) {
            assert!(heavy_cinr < base_cinr);
        }
    }
}

#[test]
fn test_evaluate_snapshot() {
    let output = lbsim(&[
        "evaluate",
        "scenarios/leo_spot_jamming.yaml",
        "--orbit-angle",
        "0",
    ]);
    let snapshot: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("Failed to parse snapshot JSON");

    assert_eq!(snapshot["mode"], "LEO");
    assert_eq!(snapshot["geometry"]["visible"], true);
    let elevation = snapshot["geometry"]["elevation_deg"].as_f64().unwrap();
    assert!((elevation - 90.0).abs() < 1e-6);
    let results = snapshot["jamming"]["results"].as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["jammer_id"], "J1");
    assert_eq!(results[0]["target_link"], "DL");
    assert!(snapshot["modcod"]["selection"]["name"].is_string());
    assert!(snapshot["validation"]["verdict"].is_string());
}

#[test]
fn test_evaluate_below_horizon_is_null() {
    let output = lbsim(&[
        "evaluate",
        "scenarios/leo_spot_jamming.yaml",
        "--orbit-angle",
        "180",
    ]);
    let snapshot: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(snapshot["geometry"]["visible"], false);
    assert!(snapshot["downlink"]["outputs"]["cn_db"].is_null());
    assert!(snapshot["primary"]["outputs"]["fspl_db"].is_null());
}

#[test]
fn test_jammers_export_round_trip() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("jammers.json");

    lbsim(&[
        "jammers",
        "scenarios/leo_spot_jamming.yaml",
        "--export",
        path.to_str().unwrap(),
    ]);

    let exported: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    let jammers = exported["jammers"].as_object().expect("jammers map keyed by id");
    assert_eq!(jammers.len(), 2);
    assert_eq!(jammers["J1"]["name"], "Spot DL");
    assert_eq!(jammers["J2"]["active"], false);
    assert_eq!(jammers["J1"]["antenna_gain_dbi"], 3.0);
}

#[test]
fn test_jammers_listing() {
    let output = lbsim(&["jammers", "scenarios/leo_spot_jamming.yaml"]);
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("Spot DL"));
    assert!(stdout.contains("2 jammers (1 active)"));
}

#[test]
fn test_properties_lists_registry() {
    let output = lbsim(&["properties"]);
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("## Scenario Properties"));
    assert!(stdout.contains("## Jammer Properties"));
    assert!(stdout.contains("modcod/hysteresis_db"));
    assert!(stdout.contains("jammer/center_frequency_ghz"));
}

#[test]
fn test_missing_scenario_fails() {
    let output = Command::new(env!("CARGO_BIN_EXE_lbsim"))
        .current_dir(concat!(env!("CARGO_MANIFEST_DIR"), "/../.."))
        .args(["run", "scenarios/does_not_exist.yaml"])
        .output()
        .expect("Failed to execute lbsim");
    assert!(!output.status.success());
    assert!(Path::new(concat!(env!("CARGO_MANIFEST_DIR"), "/../../scenarios")).is_dir());
}
