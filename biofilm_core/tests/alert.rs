use biofilm_core::mocks::{RecordingNotifier, SilentNotifier};
use biofilm_core::{AlertCfg, AlertOutcome, AlertState, AlertThrottle};
use biofilm_traits::Notifier;
use std::time::Duration;

const MIN: i64 = 60_000;

fn throttle() -> AlertThrottle {
    AlertThrottle::new(AlertCfg::default())
}

#[test]
fn threshold_is_strict() {
    let mut n = RecordingNotifier::default();
    let mut s = AlertState::default();
    assert_eq!(throttle().observe(80.0, 0, &mut s, &mut n), AlertOutcome::BelowThreshold);
    assert_eq!(n.count(), 0);
    assert_eq!(throttle().observe(80.1, 0, &mut s, &mut n), AlertOutcome::Fired);
}

#[test]
fn at_most_one_alert_per_cooldown() {
    let t = throttle();
    let mut n = RecordingNotifier::default();
    let mut s = AlertState::default();
    let mut fired_at = Vec::new();
    // A sustained high-risk stream, one tick every 10 minutes for two hours
    for tick in 0..=12 {
        let now = tick * 10 * MIN;
        if t.observe(85.0, now, &mut s, &mut n) == AlertOutcome::Fired {
            fired_at.push(now);
        }
    }
    assert_eq!(fired_at, vec![0, 70 * MIN]);
    assert_eq!(n.count(), 2);
}

#[test]
fn exact_cooldown_boundary_is_still_suppressed() {
    let t = throttle();
    let mut n = RecordingNotifier::default();
    let mut s = AlertState {
        last_alert_ms: Some(0),
    };
    assert_eq!(
        t.observe(90.0, 60 * MIN, &mut s, &mut n),
        AlertOutcome::Suppressed { remaining_ms: 1 }
    );
    assert_eq!(t.observe(90.0, 60 * MIN + 1, &mut s, &mut n), AlertOutcome::Fired);
}

#[test]
fn unavailable_channel_does_not_record() {
    let mut s = AlertState::default();
    let mut n = SilentNotifier;
    assert_eq!(throttle().observe(95.0, 0, &mut s, &mut n), AlertOutcome::Unavailable);
    assert_eq!(s.last_alert_ms, None);
}

struct Flaky;

impl Notifier for Flaky {
    fn is_available(&self) -> bool {
        true
    }
    fn notify(
        &mut self,
        _title: &str,
        _body: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        Err("permission revoked".into())
    }
}

#[test]
fn failed_delivery_leaves_state_untouched() {
    let mut s = AlertState::default();
    let out = throttle().observe(95.0, 0, &mut s, &mut Flaky);
    assert_eq!(out, AlertOutcome::Failed("permission revoked".to_string()));
    assert_eq!(s.last_alert_ms, None);
}

#[test]
fn custom_threshold_and_cooldown() {
    let t = AlertThrottle::new(AlertCfg {
        threshold: 50.0,
        cooldown: Duration::from_secs(60),
    });
    let mut n = RecordingNotifier::default();
    let mut s = AlertState::default();
    assert_eq!(t.observe(55.0, 0, &mut s, &mut n), AlertOutcome::Fired);
    assert_eq!(t.cooldown_remaining(&s, 30_000), 30_000);
    assert_eq!(t.observe(55.0, 61_000, &mut s, &mut n), AlertOutcome::Fired);
    assert!(n.sent()[0].contains("55%"));
}
