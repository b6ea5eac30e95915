//! Rendering of cycle reports and settings for stdout.

use biofilm_core::{AlertOutcome, CycleReport, Evaluation, FetchStatus, Settings};
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Value, json};

fn rfc3339_ms(ms: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(ms)
        .map(|t| t.to_rfc3339_opts(SecondsFormat::Secs, true))
        .unwrap_or_else(|| ms.to_string())
}

pub fn alert_label(a: &AlertOutcome) -> &'static str {
    match a {
        AlertOutcome::BelowThreshold => "below_threshold",
        AlertOutcome::Suppressed { .. } => "suppressed",
        AlertOutcome::Unavailable => "unavailable",
        AlertOutcome::Failed(_) => "failed",
        AlertOutcome::Fired => "fired",
    }
}

fn evaluation_json(ev: &Evaluation) -> Value {
    json!({
        "timestamp": ev.reading.timestamp().to_rfc3339_opts(SecondsFormat::Secs, true),
        "risk": {
            "score": ev.risk.score,
            "source": ev.risk.source.as_str(),
            "level": ev.level.as_str(),
            "code": ev.level.code(),
        },
        "trend": ev.trend.map(|t| json!({
            "direction": t.direction.as_str(),
            "magnitude": t.magnitude,
        })),
        "stage": {
            "name": ev.stage.name(),
            "description": ev.stage.description(),
        },
        "dss": {
            "decision": ev.dss.decision.as_str(),
            "action": ev.dss.action,
            "urgency": ev.dss.urgency.as_str(),
            "review": ev.dss.review_label,
            "factors": ev.dss.contributing_factors.iter().map(|f| f.as_str()).collect::<Vec<_>>(),
        },
        "treatments": ev.treatments.iter().map(|t| json!({
            "chemical": t.chemical.name(),
            "amount": t.amount,
            "unit": t.unit(),
            "reason": t.reason,
        })).collect::<Vec<_>>(),
    })
}

pub fn cycle_json(r: &CycleReport) -> Value {
    let fetch = match &r.fetch {
        FetchStatus::Ok { new_readings } => json!({ "ok": true, "new_readings": new_readings }),
        FetchStatus::Failed(reason) => json!({ "ok": false, "error": reason }),
    };
    json!({
        "at": rfc3339_ms(r.at_ms),
        "connectivity": r.connectivity.as_str(),
        "fetch": fetch,
        "evaluation": r.evaluation.as_ref().map(evaluation_json),
        "alert": r.alert.as_ref().map(alert_label),
    })
}

pub fn cycle_text(r: &CycleReport) -> String {
    let mut out = format!("[{}] {}", rfc3339_ms(r.at_ms), r.connectivity.as_str());
    if let FetchStatus::Failed(reason) = &r.fetch {
        out.push_str(&format!(" (degraded: {reason})"));
    }
    let Some(ev) = &r.evaluation else {
        out.push_str("\n  no readings yet");
        return out;
    };
    out.push_str(&format!(
        "\n  risk {:.1} ({}, {})",
        ev.risk.score,
        ev.risk.source.as_str(),
        ev.level.as_str()
    ));
    if let Some(t) = ev.trend {
        out.push_str(&format!(" trend {} {:.1}", t.direction.as_str(), t.magnitude));
    }
    out.push_str(&format!("\n  stage {} ({})", ev.stage.name(), ev.stage.description()));
    out.push_str(&format!(
        "\n  {}: {} [urgency {}, review {}]",
        ev.dss.decision.as_str(),
        ev.dss.action,
        ev.dss.urgency.as_str(),
        ev.dss.review_label
    ));
    if !ev.dss.contributing_factors.is_empty() {
        let names: Vec<&str> = ev.dss.contributing_factors.iter().map(|f| f.as_str()).collect();
        out.push_str(&format!("\n  factors: {}", names.join(", ")));
    }
    for t in &ev.treatments {
        out.push_str(&format!(
            "\n  dose {} {} {} ({})",
            t.chemical.name(),
            t.amount,
            t.unit(),
            t.reason
        ));
    }
    if let Some(a) = &r.alert {
        out.push_str(&format!("\n  alert {}", alert_label(a)));
    }
    out
}

pub fn settings_json(s: &Settings) -> Value {
    json!({
        "offsets": {
            "ph": s.offsets.ph,
            "temperature": s.offsets.temperature,
            "tds": s.offsets.tds,
        },
        "tank_volume_l": s.tank_volume_l,
        "last_maintenance": s.last_maintenance.map(|t| t.to_rfc3339_opts(SecondsFormat::Secs, true)),
        "last_alert": s.alert.last_alert_ms.map(rfc3339_ms),
    })
}

pub fn settings_text(s: &Settings) -> String {
    let maint = s
        .last_maintenance
        .map_or_else(|| "never".to_string(), |t| t.to_rfc3339_opts(SecondsFormat::Secs, true));
    let alert = s
        .alert
        .last_alert_ms
        .map_or_else(|| "never".to_string(), rfc3339_ms);
    format!(
        "offsets: ph {:+} temperature {:+} tds {:+}\ntank volume: {} L\nlast maintenance: {maint}\nlast alert: {alert}",
        s.offsets.ph, s.offsets.temperature, s.offsets.tds, s.tank_volume_l
    )
}
