//! Risk resolution.
//!
//! An upstream score attached to the reading is authoritative. Without one,
//! the additive heuristic below is used. The heuristic must stay bit-for-bit
//! stable: historical data was labelled with it.
//!
//! ```text
//! score = 10
//!   + 20  if 20 < temperature < 35      (+10 if temperature >= 35)
//!   + 20  if 6.5 < pH < 8.0
//!   + 25  if turbidity > 5
//!   + 25  if flow < 10
//!   + 10  if tds > 500
//! clamped to [0, 100]
//! ```
//!
//! Unavailable measurements never add to the score.

use crate::reading::SensorReading;

pub const MIN_SCORE: f64 = 0.0;
pub const MAX_SCORE: f64 = 100.0;

const BASE: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskSource {
    External,
    Heuristic,
}

impl RiskSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskSource::External => "external",
            RiskSource::Heuristic => "heuristic",
        }
    }
}

/// Coarse label shared with the acquisition side (`LOW`/`MEDIUM`/`HIGH`, codes 1..=3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn from_score(score: f64) -> Self {
        if score < 30.0 {
            RiskLevel::Low
        } else if score < 60.0 {
            RiskLevel::Medium
        } else {
            RiskLevel::High
        }
    }

    pub fn code(&self) -> u8 {
        match self {
            RiskLevel::Low => 1,
            RiskLevel::Medium => 2,
            RiskLevel::High => 3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High => "HIGH",
        }
    }
}

/// Resolved risk for one cycle. `score` is always within [0, 100].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskAssessment {
    pub score: f64,
    pub source: RiskSource,
}

impl RiskAssessment {
    pub fn level(&self) -> RiskLevel {
        RiskLevel::from_score(self.score)
    }
}

/// Clamp into [0, 100]. NaN maps to 0.
#[inline]
pub fn clamp_score(x: f64) -> f64 {
    if x.is_nan() {
        return MIN_SCORE;
    }
    x.clamp(MIN_SCORE, MAX_SCORE)
}

#[inline]
fn is(v: Option<f64>, pred: impl Fn(f64) -> bool) -> bool {
    v.is_some_and(pred)
}

/// Local additive heuristic, already clamped.
pub fn heuristic_score(r: &SensorReading) -> f64 {
    let mut score = BASE;
    if is(r.temperature(), |t| t > 20.0 && t < 35.0) {
        score += 20.0;
    } else if is(r.temperature(), |t| t >= 35.0) {
        score += 10.0;
    }
    if is(r.ph(), |p| p > 6.5 && p < 8.0) {
        score += 20.0;
    }
    if is(r.turbidity(), |t| t > 5.0) {
        score += 25.0;
    }
    if is(r.flow(), |f| f < 10.0) {
        score += 25.0;
    }
    if is(r.tds(), |t| t > 500.0) {
        score += 10.0;
    }
    clamp_score(score)
}

/// Prefer the upstream score; fall back to the heuristic.
pub fn resolve(r: &SensorReading) -> RiskAssessment {
    match r.external_risk() {
        Some(ext) => RiskAssessment {
            score: clamp_score(ext),
            source: RiskSource::External,
        },
        None => RiskAssessment {
            score: heuristic_score(r),
            source: RiskSource::Heuristic,
        },
    }
}
