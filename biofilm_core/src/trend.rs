//! Risk trend between the two most recent readings.

use crate::reading::SensorReading;
use crate::risk::{self, RiskAssessment};

/// Changes smaller than this are reported as stable.
pub const STABLE_BAND: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrendDirection {
    Up,
    Down,
    Stable,
}

impl TrendDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrendDirection::Up => "up",
            TrendDirection::Down => "down",
            TrendDirection::Stable => "stable",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendResult {
    pub direction: TrendDirection,
    /// Absolute change in score points; 0 when stable.
    pub magnitude: f64,
}

/// Compare `current` with the resolved risk of `previous`. `None` without a previous reading.
pub fn analyze(current: &RiskAssessment, previous: Option<&SensorReading>) -> Option<TrendResult> {
    let prev = risk::resolve(previous?);
    Some(classify(current.score - prev.score))
}

/// Classify a score delta.
pub fn classify(diff: f64) -> TrendResult {
    if diff.is_nan() || diff.abs() < STABLE_BAND {
        return TrendResult {
            direction: TrendDirection::Stable,
            magnitude: 0.0,
        };
    }
    TrendResult {
        direction: if diff > 0.0 {
            TrendDirection::Up
        } else {
            TrendDirection::Down
        },
        magnitude: diff.abs(),
    }
}
