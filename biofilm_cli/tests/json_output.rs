use assert_cmd::prelude::*;
use rstest::rstest;
use serde_json::Value;
use std::fs;
use std::process::Command;
use tempfile::tempdir;

fn setup(dir: &tempfile::TempDir) -> (std::path::PathBuf, std::path::PathBuf) {
    let settings = dir.path().join("settings.toml");
    fs::write(&settings, "tank_volume_l = 2000\n").unwrap();
    let cfg = dir.path().join("cfg.toml");
    fs::write(
        &cfg,
        format!(
            "[feed]\nurl = \"https://example.invalid/feeds.json\"\n\n[settings]\npath = \"{}\"\n",
            settings.display().to_string().replace('\\', "\\\\")
        ),
    )
    .unwrap();
    let feed = dir.path().join("feed.json");
    fs::write(
        &feed,
        r#"[{"created_at":"2024-05-01T12:00:00Z","field1":"6.0","field2":"25","field4":"70","field5":"2","field6":"300","field8":"1"}]"#,
    )
    .unwrap();
    (cfg, feed)
}

/// Validate the JSON schema of a single monitor cycle.
#[rstest]
fn monitor_json_schema() {
    let dir = tempdir().unwrap();
    let (cfg, feed) = setup(&dir);

    let out = Command::cargo_bin("biofilm_cli")
        .unwrap()
        .arg("--json")
        .arg("--log-level")
        .arg("error")
        .arg("--config")
        .arg(&cfg)
        .args(["monitor", "--once", "--feed-file"])
        .arg(&feed)
        .output()
        .unwrap();
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));

    let stdout = String::from_utf8(out.stdout).unwrap();
    let line = stdout.lines().last().expect("one report line");
    let v: Value = serde_json::from_str(line).unwrap();

    assert_eq!(v["fetch"]["ok"], true);
    assert_eq!(v["fetch"]["new_readings"], 1);
    assert!(v["connectivity"].is_string());

    let ev = &v["evaluation"];
    // pH 6.0 is outside (6.5, 8.0): 10 + 20 for temperature only
    assert_eq!(ev["risk"]["score"], 30.0);
    assert_eq!(ev["risk"]["source"], "heuristic");
    assert_eq!(ev["risk"]["level"], "MEDIUM");
    assert_eq!(ev["risk"]["code"], 2);
    assert!(ev["trend"].is_null());
    assert_eq!(ev["dss"]["decision"], "Preventive Maintenance");
    assert_eq!(ev["dss"]["review"], "Within 12 hours");

    let treatments = ev["treatments"].as_array().unwrap();
    assert_eq!(treatments.len(), 2);
    assert_eq!(treatments[0]["chemical"], "Chlorine");
    assert_eq!(treatments[0]["amount"], 100);
    assert_eq!(treatments[1]["chemical"], "pH Plus");
    assert_eq!(treatments[1]["unit"], "g");

    assert_eq!(v["alert"], "below_threshold");
}

#[rstest]
fn json_errors_are_structured() {
    let dir = tempdir().unwrap();
    let out = Command::cargo_bin("biofilm_cli")
        .unwrap()
        .arg("--json")
        .arg("--config")
        .arg(dir.path().join("absent.toml"))
        .arg("health")
        .output()
        .unwrap();
    assert_eq!(out.status.code(), Some(3));
    let stderr = String::from_utf8(out.stderr).unwrap();
    let v: Value = serde_json::from_str(stderr.lines().last().unwrap()).unwrap();
    assert_eq!(v["reason"], "Config");
    assert_eq!(v["code"], 3);
    assert!(v["message"].as_str().unwrap().contains("What happened"));
}
