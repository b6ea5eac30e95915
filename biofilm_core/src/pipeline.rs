//! Stateless derivation of every per-cycle entity from a reading.
//!
//! Given the current normalized reading, the one before it and the settings,
//! `evaluate` recomputes risk, trend, stage, DSS decision and treatments.
//! Nothing here carries state between cycles.

use crate::config::EngineCfg;
use crate::dosage::{self, Treatment};
use crate::dss::{self, DssDecision};
use crate::reading::SensorReading;
use crate::risk::{self, RiskAssessment, RiskLevel};
use crate::stage::BiofilmStage;
use crate::trend::{self, TrendResult};

#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub reading: SensorReading,
    pub risk: RiskAssessment,
    pub level: RiskLevel,
    /// `None` without a previous reading.
    pub trend: Option<TrendResult>,
    pub stage: BiofilmStage,
    pub dss: DssDecision,
    /// Empty when the system is nominal.
    pub treatments: Vec<Treatment>,
}

pub fn evaluate(
    current: &SensorReading,
    previous: Option<&SensorReading>,
    engine: &EngineCfg,
    tank_volume_l: u32,
) -> Evaluation {
    let risk = risk::resolve(current);
    let trend = trend::analyze(&risk, previous);
    let stage = engine.stages.classify(risk.score);
    let dss = dss::evaluate(risk.score, current, &engine.dss);
    let treatments = dosage::calculate(
        dss.decision,
        risk.score,
        current.ph(),
        tank_volume_l,
        &engine.dosage,
    );
    Evaluation {
        reading: current.clone(),
        level: risk.level(),
        risk,
        trend,
        stage,
        dss,
        treatments,
    }
}
