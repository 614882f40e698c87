use std::fs;
use std::process::Command;

use serde_json::Value;

fn rex_sim() -> Command {
    Command::new(env!("CARGO_BIN_EXE_rex-sim"))
}

#[test]
fn analyze_writes_report_and_figure() {
    let dir = tempfile::tempdir().expect("tempdir");
    let out = dir.path().join("run");
    let status = rex_sim()
        .args(["--log-level", "warn", "analyze", "--out"])
        .arg(&out)
        .status()
        .expect("run rex-sim analyze");
    assert!(status.success());

    let report: Value =
        serde_json::from_slice(&fs::read(out.join("analysis_report.json")).expect("report"))
            .expect("json");
    assert!(report.get("analysis_hash").and_then(Value::as_str).is_some());
    assert_eq!(
        report.pointer("/provenance/engine").and_then(Value::as_str),
        Some("henon")
    );
    let svg = fs::read_to_string(out.join("phase_space.svg")).expect("figure");
    assert!(svg.starts_with("<svg"));

    let replot = dir.path().join("replot.svg");
    let status = rex_sim()
        .args(["plot", "--report"])
        .arg(out.join("analysis_report.json"))
        .arg("--out")
        .arg(&replot)
        .status()
        .expect("run rex-sim plot");
    assert!(status.success());
    assert_eq!(fs::read_to_string(replot).expect("replot"), svg);
}

#[test]
fn search_prints_the_interval() {
    let dir = tempfile::tempdir().expect("tempdir");
    let lattice = dir.path().join("lattice.yaml");
    fs::write(&lattice, "tune: 0.33\nk2l: 1.0\n").expect("write lattice");
    let output = rex_sim()
        .args(["--log-format", "json", "search", "--precision", "1e-5", "--lattice"])
        .arg(&lattice)
        .output()
        .expect("run rex-sim search");
    assert!(output.status.success());
    let interval: Value = serde_json::from_slice(&output.stdout).expect("json");
    let lo = interval["lo"].as_f64().expect("lo");
    let hi = interval["hi"].as_f64().expect("hi");
    assert!(hi - lo <= 1e-5);
    assert!(lo > 0.015 && hi < 0.018);
}

#[test]
fn invalid_lattice_fails() {
    let dir = tempfile::tempdir().expect("tempdir");
    let lattice = dir.path().join("lattice.json");
    fs::write(&lattice, r#"{"aperture": -1.0}"#).expect("write lattice");
    let output = rex_sim()
        .args(["search", "--lattice"])
        .arg(&lattice)
        .output()
        .expect("run rex-sim search");
    assert!(!output.status.success());
}

#[test]
fn version_reports_schema() {
    let output = rex_sim().arg("version").output().expect("run rex-sim version");
    assert!(output.status.success());
    let info: Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(info.pointer("/report_schema/major").and_then(Value::as_u64), Some(1));
}
