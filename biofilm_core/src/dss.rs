//! Decision support engine.
//!
//! Two independent signals are cross-checked: the continuous resolved risk
//! score and a discrete count of out-of-range physical factors. Rules are
//! evaluated in order, first match wins:
//!
//! 1. `risk < normal_below && factors <= 1`          -> Normal Operation
//! 2. `risk < preventive_below || factors == 2`      -> Preventive Maintenance
//! 3. otherwise                                      -> Corrective Action Required
//!
//! Unavailable measurements never count as a factor.

use crate::config::DssRules;
use crate::reading::SensorReading;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Factor {
    Turbidity,
    Flow,
    Tds,
    Temperature,
}

impl Factor {
    pub fn as_str(&self) -> &'static str {
        match self {
            Factor::Turbidity => "turbidity",
            Factor::Flow => "flow",
            Factor::Tds => "tds",
            Factor::Temperature => "temperature",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Urgency {
    Low,
    Medium,
    High,
}

impl Urgency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Urgency::Low => "Low",
            Urgency::Medium => "Medium",
            Urgency::High => "High",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    NormalOperation,
    PreventiveMaintenance,
    CorrectiveAction,
}

impl Decision {
    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::NormalOperation => "Normal Operation",
            Decision::PreventiveMaintenance => "Preventive Maintenance",
            Decision::CorrectiveAction => "Corrective Action Required",
        }
    }

    pub fn action(&self) -> &'static str {
        match self {
            Decision::NormalOperation => "No maintenance required",
            Decision::PreventiveMaintenance => "Schedule inspection & partial cleaning",
            Decision::CorrectiveAction => "Immediate cleaning & backwash",
        }
    }

    pub fn urgency(&self) -> Urgency {
        match self {
            Decision::NormalOperation => Urgency::Low,
            Decision::PreventiveMaintenance => Urgency::Medium,
            Decision::CorrectiveAction => Urgency::High,
        }
    }

    pub fn review_window(&self) -> Duration {
        const HOUR: u64 = 3_600;
        match self {
            Decision::NormalOperation => Duration::from_secs(24 * HOUR),
            Decision::PreventiveMaintenance => Duration::from_secs(12 * HOUR),
            Decision::CorrectiveAction => Duration::from_secs(HOUR),
        }
    }

    pub fn review_label(&self) -> &'static str {
        match self {
            Decision::NormalOperation => "After 24 hours",
            Decision::PreventiveMaintenance => "Within 12 hours",
            Decision::CorrectiveAction => "Within 1 hour",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DssDecision {
    pub decision: Decision,
    pub action: &'static str,
    pub urgency: Urgency,
    pub review_window: Duration,
    pub review_label: &'static str,
    /// Violated signals in evaluation order.
    pub contributing_factors: Vec<Factor>,
}

impl DssDecision {
    pub fn factor_count(&self) -> usize {
        self.contributing_factors.len()
    }
}

/// Out-of-range physical signals, in fixed order.
pub fn contributing_factors(r: &SensorReading, rules: &DssRules) -> Vec<Factor> {
    let lim = &rules.limits;
    let checks = [
        (Factor::Turbidity, r.turbidity().is_some_and(|v| v > lim.turbidity_max)),
        (Factor::Flow, r.flow().is_some_and(|v| v < lim.flow_min)),
        (Factor::Tds, r.tds().is_some_and(|v| v > lim.tds_max)),
        (Factor::Temperature, r.temperature().is_some_and(|v| v > lim.temperature_max)),
    ];
    checks
        .into_iter()
        .filter_map(|(f, hit)| hit.then_some(f))
        .collect()
}

/// Pure rule table over (risk, factor count).
pub fn decide(risk: f64, factor_count: usize, rules: &DssRules) -> Decision {
    if risk < rules.normal_below && factor_count <= rules.max_normal_factors {
        Decision::NormalOperation
    } else if risk < rules.preventive_below || factor_count == rules.preventive_factor_count {
        Decision::PreventiveMaintenance
    } else {
        Decision::CorrectiveAction
    }
}

pub fn evaluate(risk: f64, reading: &SensorReading, rules: &DssRules) -> DssDecision {
    let factors = contributing_factors(reading, rules);
    let decision = decide(risk, factors.len(), rules);
    tracing::debug!(
        risk,
        factors = factors.len(),
        decision = decision.as_str(),
        "dss evaluated"
    );
    DssDecision {
        decision,
        action: decision.action(),
        urgency: decision.urgency(),
        review_window: decision.review_window(),
        review_label: decision.review_label(),
        contributing_factors: factors,
    }
}
