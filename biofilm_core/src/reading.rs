//! Sensor readings and the normalizer.
//!
//! A `RawReading` is what the telemetry store hands us after schema mapping.
//! `normalize` applies the calibration offsets and produces a `SensorReading`,
//! which is immutable from then on. Any field that is missing, non-numeric or
//! non-finite is carried as `None` ("unavailable"); threshold checks treat an
//! unavailable value as compliant.

use chrono::{DateTime, Utc};

/// Additive calibration deltas applied at normalization time.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CalibrationOffsets {
    pub ph: f64,
    pub temperature: f64,
    pub tds: f64,
}

/// One record from the telemetry store, before calibration.
#[derive(Debug, Clone, PartialEq)]
pub struct RawReading {
    pub timestamp: DateTime<Utc>,
    pub ph: Option<f64>,
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
    pub flow: Option<f64>,
    pub turbidity: Option<f64>,
    pub tds: Option<f64>,
    /// Score computed upstream (heuristic or trained model), if any.
    pub external_risk: Option<f64>,
    /// 0 = manual shutdown, 1 = active.
    pub status_code: Option<i64>,
}

impl RawReading {
    /// Reading at `timestamp` with every measurement unavailable.
    pub fn empty(timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            ph: None,
            temperature: None,
            humidity: None,
            flow: None,
            turbidity: None,
            tds: None,
            external_risk: None,
            status_code: None,
        }
    }
}

/// Calibrated, canonical reading. Only constructed through [`normalize`].
#[derive(Debug, Clone, PartialEq)]
pub struct SensorReading {
    timestamp: DateTime<Utc>,
    ph: Option<f64>,
    temperature: Option<f64>,
    humidity: Option<f64>,
    flow: Option<f64>,
    turbidity: Option<f64>,
    tds: Option<f64>,
    external_risk: Option<f64>,
    status_code: Option<i64>,
}

impl SensorReading {
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
    pub fn timestamp_ms(&self) -> i64 {
        self.timestamp.timestamp_millis()
    }
    pub fn ph(&self) -> Option<f64> {
        self.ph
    }
    pub fn temperature(&self) -> Option<f64> {
        self.temperature
    }
    pub fn humidity(&self) -> Option<f64> {
        self.humidity
    }
    pub fn flow(&self) -> Option<f64> {
        self.flow
    }
    pub fn turbidity(&self) -> Option<f64> {
        self.turbidity
    }
    pub fn tds(&self) -> Option<f64> {
        self.tds
    }
    pub fn external_risk(&self) -> Option<f64> {
        self.external_risk
    }
    pub fn status_code(&self) -> Option<i64> {
        self.status_code
    }
}

#[inline]
fn finite(v: Option<f64>) -> Option<f64> {
    v.filter(|x| x.is_finite())
}

#[inline]
fn offset(v: Option<f64>, delta: f64) -> Option<f64> {
    finite(v).map(|x| x + delta).filter(|x| x.is_finite())
}

/// Apply calibration offsets to pH, temperature and TDS; pass the rest through.
pub fn normalize(raw: &RawReading, offsets: &CalibrationOffsets) -> SensorReading {
    SensorReading {
        timestamp: raw.timestamp,
        ph: offset(raw.ph, offsets.ph),
        temperature: offset(raw.temperature, offsets.temperature),
        humidity: finite(raw.humidity),
        flow: finite(raw.flow),
        turbidity: finite(raw.turbidity),
        tds: offset(raw.tds, offsets.tds),
        external_risk: finite(raw.external_risk),
        status_code: raw.status_code,
    }
}
