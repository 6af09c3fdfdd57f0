use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::process::Command;
use tempfile::tempdir;

#[test]
fn cli_shows_help() {
    let mut cmd = Command::cargo_bin("outage-calplot").unwrap();
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("outage-calplot"));
}

#[test]
fn render_from_csv_with_stats_and_grids() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("obs.csv");
    fs::write(
        &input,
        "date,facet,quantity\n2024-03-01,VPS,5\n2024-03-01,VPS,3\n2024-03-02,ESPBI,2\n",
    )
    .unwrap();
    let config = dir.path().join("config.json");
    fs::write(&config, r#"{"locale": "en_US"}"#).unwrap();
    let out = dir.path().join("out.svg");
    let grids = dir.path().join("grids");

    let mut cmd = Command::cargo_bin("outage-calplot").unwrap();
    cmd.arg("render")
        .arg("--input")
        .arg(&input)
        .arg("--config")
        .arg(&config)
        .arg("--out")
        .arg(&out)
        .args(["--today", "2024-03-01", "--stats"])
        .arg("--export-grids")
        .arg(&grids);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("VPS • 2024"))
        .stdout(predicate::str::contains("total=8"));

    assert!(fs::metadata(&out).unwrap().len() > 0);
    assert!(grids.join("VPS-2024.csv").exists());
    assert!(grids.join("Bendra-2024.csv").exists());
}

#[test]
fn unknown_locale_fails() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("obs.csv");
    fs::write(&input, "date,facet,quantity\n2024-03-01,VPS,5\n").unwrap();
    let mut cmd = Command::cargo_bin("outage-calplot").unwrap();
    cmd.arg("render")
        .arg("--input")
        .arg(&input)
        .arg("--out")
        .arg(dir.path().join("out.svg"))
        .args(["--locale", "xx_QQ", "--today", "2024-03-01"]);
    cmd.assert().failure();
}

#[test]
fn missing_source_fails() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("config.json");
    fs::write(&config, "{}").unwrap();
    let mut cmd = Command::cargo_bin("outage-calplot").unwrap();
    cmd.arg("render").arg("--config").arg(&config);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("no data source"));
}

#[test]
fn colliding_export_names_are_rejected() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("obs.csv");
    fs::write(
        &input,
        "date,facet,quantity\n2024-03-01,A B,1\n2024-03-01,A_B,2\n",
    )
    .unwrap();
    let out = dir.path().join("out.svg");
    let grids = dir.path().join("grids");
    let mut cmd = Command::cargo_bin("outage-calplot").unwrap();
    cmd.arg("render")
        .arg("--input")
        .arg(&input)
        .arg("--out")
        .arg(&out)
        .args(["--locale", "en_US", "--today", "2024-03-01"])
        .arg("--export-grids")
        .arg(&grids);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("would both be exported"));
    assert!(!grids.join("A_B-2024.csv").exists());
}

#[test]
fn other_year_needs_no_highlight() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("obs.csv");
    fs::write(&input, "date,facet,quantity\n2023-06-01,VPS,1\n").unwrap();
    let out = dir.path().join("out.svg");

    let mut cmd = Command::cargo_bin("outage-calplot").unwrap();
    cmd.arg("render")
        .arg("--input")
        .arg(&input)
        .arg("--out")
        .arg(&out)
        .args(["--locale", "en_US", "--year", "2023", "--today", "2024-03-01"]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("outside the grid year"));

    let mut cmd = Command::cargo_bin("outage-calplot").unwrap();
    cmd.arg("render")
        .arg("--input")
        .arg(&input)
        .arg("--out")
        .arg(&out)
        .args(["--locale", "en_US", "--year", "2023", "--no-highlight"]);
    cmd.assert().success();
}
