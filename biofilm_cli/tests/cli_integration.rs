use assert_cmd::prelude::*;
use predicates::prelude::*;
use rstest::rstest;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::tempdir;

const FEED: &str = r#"{
  "channel": {"id": 1, "name": "tower"},
  "feeds": [
    {"created_at": "2024-05-01T12:00:00Z", "entry_id": 1, "field1": "7.0", "field2": "25",
     "field3": "50", "field4": "70", "field5": "2", "field6": "300", "field7": null, "field8": "1"},
    {"created_at": "2024-05-01T12:00:15Z", "entry_id": 2, "field1": "7.2", "field2": "32.5",
     "field3": "55", "field4": "40", "field5": "8.5", "field6": "600", "field7": "75", "field8": "1"}
  ]
}"#;

// Minimal valid config; the feed URL is never contacted when --feed-file is used
fn write_config(dir: &Path) -> PathBuf {
    let settings = dir.join("settings.toml");
    let toml = format!(
        r#"
[feed]
url = "http://127.0.0.1:9/channels/1/feeds.json"

[settings]
path = "{}"
"#,
        settings.display().to_string().replace('\\', "\\\\")
    );
    let path = dir.join("cfg.toml");
    fs::write(&path, toml).unwrap();
    path
}

fn write_feed(dir: &Path) -> PathBuf {
    let path = dir.join("feed.json");
    fs::write(&path, FEED).unwrap();
    path
}

fn cmd(cfg: &Path) -> Command {
    let mut cmd = Command::cargo_bin("biofilm_cli").unwrap();
    cmd.arg("--config").arg(cfg).arg("--log-level").arg("warn");
    cmd
}

#[rstest]
#[case(&["--help"], 0, "Usage:", "stdout")]
#[case(&["health"], 0, "ok", "stdout")]
#[case(&["settings", "show"], 0, "tank volume: 0 L", "stdout")]
#[case(&["settings", "set-volume", "abc"], 4, "What happened", "stderr")]
#[case(&["settings", "set-offsets"], 4, "no offset given", "stderr")]
#[case(&["export"], 2, "--output", "stderr")]
fn cli_table_cases(
    #[case] args: &[&str],
    #[case] exit_code: i32,
    #[case] needle: &str,
    #[case] stream: &str,
) {
    let dir = tempdir().unwrap();
    let cfg = write_config(dir.path());

    let assert = cmd(&cfg).args(args).assert().code(exit_code);
    match stream {
        "stdout" => {
            assert.stdout(predicate::str::contains(needle));
        }
        "stderr" => {
            assert.stderr(predicate::str::contains(needle));
        }
        other => panic!("unknown stream: {other}"),
    }
}

#[rstest]
fn missing_config_is_a_config_error() {
    let dir = tempdir().unwrap();
    cmd(&dir.path().join("nope.toml"))
        .arg("health")
        .assert()
        .code(3)
        .stderr(predicate::str::contains("configuration could not be used"));
}

#[rstest]
fn invalid_config_is_rejected_with_its_key() {
    let dir = tempdir().unwrap();
    let cfg = dir.path().join("bad.toml");
    fs::write(&cfg, "[feed]\nurl = \"ftp://example\"\n").unwrap();
    cmd(&cfg)
        .arg("health")
        .assert()
        .code(3)
        .stderr(predicate::str::contains("feed.url"));
}

#[rstest]
fn monitor_once_prints_the_decision() {
    let dir = tempdir().unwrap();
    let cfg = write_config(dir.path());
    let feed = write_feed(dir.path());

    cmd(&cfg)
        .args(["settings", "set-volume", "1000"])
        .assert()
        .success();

    cmd(&cfg)
        .args(["monitor", "--once", "--feed-file"])
        .arg(&feed)
        .assert()
        .success()
        .stdout(predicate::str::contains("risk 75.0 (external, HIGH)"))
        .stdout(predicate::str::contains("trend up 25.0"))
        .stdout(predicate::str::contains("Corrective Action Required"))
        .stdout(predicate::str::contains("factors: turbidity, flow, tds, temperature"))
        .stdout(predicate::str::contains("dose Chlorine 50 ml"));
}

#[rstest]
fn monitor_once_without_feed_is_degraded_not_fatal() {
    let dir = tempdir().unwrap();
    let cfg = write_config(dir.path());

    cmd(&cfg)
        .args(["monitor", "--once", "--feed-file"])
        .arg(dir.path().join("missing.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains("disconnected"))
        .stdout(predicate::str::contains("no readings yet"));
}

#[rstest]
fn export_writes_csv() {
    let dir = tempdir().unwrap();
    let cfg = write_config(dir.path());
    let feed = write_feed(dir.path());
    let out = dir.path().join("history.csv");

    cmd(&cfg)
        .args(["export", "--output"])
        .arg(&out)
        .arg("--feed-file")
        .arg(&feed)
        .assert()
        .success()
        .stdout(predicate::str::contains("exported 2 rows"));

    let csv = fs::read_to_string(&out).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(
        lines[0],
        "created_at,ph,temp,humidity,flow,turbidity,tds,risk_score,status"
    );
    assert_eq!(lines[1], "2024-05-01T12:00:00Z,7,25,50,70,2,300,50,1");
    assert_eq!(lines[2], "2024-05-01T12:00:15Z,7.2,32.5,55,40,8.5,600,75,1");
}

#[rstest]
fn export_with_unreadable_feed_fails() {
    let dir = tempdir().unwrap();
    let cfg = write_config(dir.path());
    cmd(&cfg)
        .args(["export", "--output"])
        .arg(dir.path().join("out.csv"))
        .arg("--feed-file")
        .arg(dir.path().join("missing.json"))
        .assert()
        .code(5)
        .stderr(predicate::str::contains("Telemetry could not be fetched"));
}

#[rstest]
fn settings_round_trip_through_the_file() {
    let dir = tempdir().unwrap();
    let cfg = write_config(dir.path());

    cmd(&cfg)
        .args(["settings", "set-offsets", "--ph", "-0.2", "--tds", "5"])
        .assert()
        .success();
    cmd(&cfg)
        .args(["settings", "set-volume", "-50"])
        .assert()
        .success()
        .stdout(predicate::str::contains("tank volume: 0 L"));
    cmd(&cfg)
        .args(["settings", "log-maintenance"])
        .assert()
        .success();

    cmd(&cfg)
        .args(["settings", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ph -0.2"))
        .stdout(predicate::str::contains("tds +5"))
        .stdout(predicate::str::contains("last maintenance: 20"));

    let text = fs::read_to_string(dir.path().join("settings.toml")).unwrap();
    assert!(text.contains("last_maintenance"));
}

#[rstest]
fn corrupt_settings_file_fails_health() {
    let dir = tempdir().unwrap();
    let cfg = write_config(dir.path());
    fs::write(dir.path().join("settings.toml"), "tank_volume_l = \"lots\"\n").unwrap();
    cmd(&cfg)
        .arg("health")
        .assert()
        .code(4)
        .stderr(predicate::str::contains("Settings were rejected"));
}
