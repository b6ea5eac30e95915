use biofilm_core::error::Result;
use biofilm_core::mocks::{RecordingNotifier, ScriptedFeed};
use biofilm_core::{
    CalibrationOffsets, FileSettingsStore, Monitor, MonitorError, Settings, SettingsStore,
};
use biofilm_traits::clock::manual::ManualClock;
use chrono::{TimeZone, Utc};
use std::sync::{Arc, Mutex};

#[test]
fn file_store_round_trips_every_field() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = FileSettingsStore::new(dir.path().join("s.toml"));

    let mut s = store.load().expect("missing file yields defaults");
    assert_eq!(s, Settings::default());

    s.set_offsets(CalibrationOffsets {
        ph: -0.15,
        temperature: 0.5,
        tds: 12.0,
    })
    .unwrap();
    s.set_tank_volume_l(1499.6).unwrap();
    s.log_maintenance(Utc.with_ymd_and_hms(2024, 5, 1, 8, 30, 0).unwrap());
    s.alert.last_alert_ms = Some(1_714_552_200_000);
    store.save(&s).unwrap();

    let back = store.load().unwrap();
    assert_eq!(back, s);
    assert_eq!(back.tank_volume_l, 1500);
}

#[test]
fn invalid_user_input_never_reaches_settings() {
    let mut s = Settings::default();
    let err = s
        .set_offsets(CalibrationOffsets {
            ph: f64::NAN,
            temperature: 0.0,
            tds: 0.0,
        })
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<MonitorError>(),
        Some(MonitorError::Settings(_))
    ));
    assert_eq!(s.offsets, CalibrationOffsets::default());

    assert!(s.set_tank_volume_l(f64::INFINITY).is_err());
    s.set_tank_volume_l(-12.0).unwrap();
    assert_eq!(s.tank_volume_l, 0);
}

#[test]
fn corrupt_file_is_an_error_with_path_context() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("s.toml");
    std::fs::write(&path, "[offsets]\nph = \"high\"\n").unwrap();
    let err = FileSettingsStore::new(&path).load().unwrap_err();
    assert!(format!("{err:#}").contains("s.toml"), "{err:#}");
}

/// Store whose reads start failing after the first one, to exercise a failing
/// load in the middle of a run.
#[derive(Clone)]
struct FlakyStore {
    inner: Arc<Mutex<(usize, Settings)>>,
}

impl SettingsStore for FlakyStore {
    fn load(&self) -> Result<Settings> {
        let mut g = self.inner.lock().unwrap();
        g.0 += 1;
        if g.0 > 1 {
            return Err(MonitorError::Settings("disk unplugged".into()).into());
        }
        Ok(g.1.clone())
    }
    fn save(&mut self, settings: &Settings) -> Result<()> {
        self.inner.lock().unwrap().1 = settings.clone();
        Ok(())
    }
}

#[test]
fn failed_reload_keeps_previous_settings() {
    let mut initial = Settings::default();
    initial.tank_volume_l = 3000;
    let store = FlakyStore {
        inner: Arc::new(Mutex::new((0, initial))),
    };
    let feed = ScriptedFeed::new();
    feed.push_body(r#"[{"created_at":"2024-05-01T12:00:00Z","field7":"95"}]"#);

    let mut m = Monitor::builder()
        .with_source(feed)
        .with_settings_store(store)
        .with_notifier(RecordingNotifier::default())
        .with_clock(ManualClock::new(1_714_564_805_000))
        .build()
        .unwrap();

    let ev = m.run_cycle().evaluation.expect("reading");
    assert_eq!(m.settings().tank_volume_l, 3000);
    assert_eq!(ev.treatments[0].amount, 150);
}
