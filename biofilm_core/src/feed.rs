//! Telemetry feed schema.
//!
//! The store serves records with positional keys `field1`..`field8` plus a
//! `created_at` timestamp. `FIELD_MAP` names each position once; everything
//! downstream works with [`RawReading`] attributes only.
//!
//! Accepted shapes:
//! - channel envelope: `{"channel": {...}, "feeds": [ {...}, ... ]}`
//! - bare array: `[ {...}, ... ]`
//!
//! Values may be JSON numbers or numeric strings; null, empty and
//! non-numeric values become unavailable. Records without a valid RFC 3339
//! `created_at` cannot be ordered and are skipped.

use crate::error::{MonitorError, Result};
use crate::reading::RawReading;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

/// Named attribute behind a positional feed key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedField {
    Ph,
    Temperature,
    Humidity,
    Flow,
    Turbidity,
    Tds,
    ExternalRisk,
    StatusCode,
}

/// Position -> attribute table, validated once at ingestion.
pub const FIELD_MAP: [(&str, FeedField); 8] = [
    ("field1", FeedField::Ph),
    ("field2", FeedField::Temperature),
    ("field3", FeedField::Humidity),
    ("field4", FeedField::Flow),
    ("field5", FeedField::Turbidity),
    ("field6", FeedField::Tds),
    ("field7", FeedField::ExternalRisk),
    ("field8", FeedField::StatusCode),
];

pub const TIMESTAMP_KEY: &str = "created_at";

fn numeric(v: Option<&Value>) -> Option<f64> {
    match v? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|x| x.is_finite())
}

fn integral(v: Option<&Value>) -> Option<i64> {
    let x = numeric(v)?;
    // Status codes are small integers; "1.0" is fine, "0.5" is not a status.
    #[allow(clippy::cast_possible_truncation)]
    let code = x as i64;
    (x.fract() == 0.0).then_some(code)
}

fn parse_timestamp(v: Option<&Value>) -> Option<DateTime<Utc>> {
    let s = v?.as_str()?;
    DateTime::parse_from_rfc3339(s.trim())
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Map a single feed record onto a `RawReading`. Returns `None` when the
/// record has no usable timestamp.
pub fn parse_record(record: &Map<String, Value>) -> Option<RawReading> {
    let timestamp = parse_timestamp(record.get(TIMESTAMP_KEY))?;
    let mut raw = RawReading::empty(timestamp);
    for (key, field) in FIELD_MAP {
        let v = record.get(key);
        match field {
            FeedField::Ph => raw.ph = numeric(v),
            FeedField::Temperature => raw.temperature = numeric(v),
            FeedField::Humidity => raw.humidity = numeric(v),
            FeedField::Flow => raw.flow = numeric(v),
            FeedField::Turbidity => raw.turbidity = numeric(v),
            FeedField::Tds => raw.tds = numeric(v),
            FeedField::ExternalRisk => raw.external_risk = numeric(v),
            FeedField::StatusCode => raw.status_code = integral(v),
        }
    }
    Some(raw)
}

/// Parse a feed body into readings sorted oldest first.
pub fn parse_feed(body: &str) -> Result<Vec<RawReading>> {
    let doc: Value = serde_json::from_str(body)
        .map_err(|e| MonitorError::Feed(format!("invalid JSON: {e}")))?;
    let records = match &doc {
        Value::Array(items) => items,
        Value::Object(obj) => match obj.get("feeds") {
            Some(Value::Array(items)) => items,
            _ => {
                return Err(MonitorError::Feed("missing \"feeds\" array".to_string()).into());
            }
        },
        _ => {
            return Err(MonitorError::Feed("expected object or array".to_string()).into());
        }
    };

    let mut out = Vec::with_capacity(records.len());
    for (idx, rec) in records.iter().enumerate() {
        let Some(obj) = rec.as_object() else {
            tracing::warn!(index = idx, "feed record is not an object; skipped");
            continue;
        };
        match parse_record(obj) {
            Some(raw) => out.push(raw),
            None => tracing::warn!(index = idx, "feed record without valid created_at; skipped"),
        }
    }
    out.sort_by_key(|r| r.timestamp);
    Ok(out)
}
