use biofilm_core::dss::{self, contributing_factors, decide};
use biofilm_core::{
    CalibrationOffsets, Decision, DssRules, Factor, RawReading, SensorReading, Urgency, normalize,
};
use chrono::{DateTime, Utc};
use rstest::rstest;
use std::time::Duration;

fn reading(flow: Option<f64>, turbidity: Option<f64>, tds: Option<f64>, temp: Option<f64>) -> SensorReading {
    let mut r = RawReading::empty(DateTime::<Utc>::UNIX_EPOCH);
    r.flow = flow;
    r.turbidity = turbidity;
    r.tds = tds;
    r.temperature = temp;
    normalize(&r, &CalibrationOffsets::default())
}

#[rstest]
#[case(0.0, 0, Decision::NormalOperation)]
#[case(29.9, 1, Decision::NormalOperation)]
#[case(29.9, 2, Decision::PreventiveMaintenance)]
// three factors at low risk is still preventive: risk < 60 wins
#[case(10.0, 3, Decision::PreventiveMaintenance)]
#[case(30.0, 0, Decision::PreventiveMaintenance)]
#[case(59.9, 4, Decision::PreventiveMaintenance)]
// exactly two factors keeps high risk at preventive
#[case(90.0, 2, Decision::PreventiveMaintenance)]
#[case(60.0, 0, Decision::CorrectiveAction)]
#[case(60.0, 1, Decision::CorrectiveAction)]
#[case(75.0, 3, Decision::CorrectiveAction)]
#[case(100.0, 4, Decision::CorrectiveAction)]
fn rule_table(#[case] risk: f64, #[case] factors: usize, #[case] expected: Decision) {
    assert_eq!(decide(risk, factors, &DssRules::default()), expected);
}

#[test]
fn factors_use_strict_comparisons() {
    let rules = DssRules::default();
    let at_limits = reading(Some(60.0), Some(5.0), Some(500.0), Some(30.0));
    assert!(contributing_factors(&at_limits, &rules).is_empty());

    let past = reading(Some(59.9), Some(5.1), Some(500.1), Some(30.1));
    assert_eq!(
        contributing_factors(&past, &rules),
        vec![Factor::Turbidity, Factor::Flow, Factor::Tds, Factor::Temperature]
    );
}

#[test]
fn unavailable_signals_never_contribute() {
    let r = reading(None, None, None, None);
    assert!(contributing_factors(&r, &DssRules::default()).is_empty());
}

#[test]
fn decision_carries_its_derived_fields() {
    let r = reading(Some(80.0), Some(1.0), None, None);
    let d = dss::evaluate(12.0, &r, &DssRules::default());
    assert_eq!(d.decision, Decision::NormalOperation);
    assert_eq!(d.action, "No maintenance required");
    assert_eq!(d.urgency, Urgency::Low);
    assert_eq!(d.review_window, Duration::from_secs(24 * 3600));
    assert_eq!(d.review_label, "After 24 hours");
    assert_eq!(d.factor_count(), 0);
}

#[test]
fn thresholds_come_from_rules() {
    let rules = DssRules {
        normal_below: 20.0,
        preventive_below: 40.0,
        ..DssRules::default()
    };
    assert_eq!(decide(25.0, 0, &rules), Decision::PreventiveMaintenance);
    assert_eq!(decide(45.0, 0, &rules), Decision::CorrectiveAction);
}
