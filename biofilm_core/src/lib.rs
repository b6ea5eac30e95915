#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! Telemetry-to-decision pipeline for recirculating water systems (IO-agnostic).
//!
//! This crate turns periodic multi-sensor readings into a biofilm risk
//! classification and a treatment recommendation. All IO goes through the
//! `biofilm_traits::TelemetrySource`, `biofilm_traits::Notifier` and
//! [`settings::SettingsStore`] seams.
//!
//! ## Architecture
//!
//! - **Feed**: positional field mapping and JSON parsing (`feed`)
//! - **Normalizer**: calibration offsets, unavailable sentinel (`reading`)
//! - **History**: bounded FIFO of normalized readings (`history`)
//! - **Risk**: external score or additive heuristic (`risk`)
//! - **Trend / Stage**: direction of change, growth-stage band (`trend`, `stage`)
//! - **DSS**: risk x factor-count rule table (`dss`)
//! - **Dosage**: chemical quantities, rounded up (`dosage`)
//! - **Connectivity / Alert**: liveness and throttled notifications
//! - **Monitor / Scheduler**: the poll cycle and its cancelable timer
//!
//! Every per-cycle entity is recomputable from a reading by [`pipeline::evaluate`];
//! only the history window, calibration offsets and alert state carry over
//! between cycles.

pub mod alert;
pub mod builder;
pub mod config;
pub mod connectivity;
pub mod conversions;
pub mod dosage;
pub mod dss;
pub mod error;
pub mod export;
pub mod feed;
pub mod history;
pub mod mocks;
pub mod monitor;
pub mod pipeline;
pub mod reading;
pub mod risk;
pub mod scheduler;
pub mod settings;
pub mod stage;
pub mod trend;

pub use alert::{AlertOutcome, AlertState, AlertThrottle};
pub use builder::MonitorBuilder;
pub use config::{
    AlertCfg, ConnectivityPolicy, DosageRules, DssRules, EngineCfg, FactorLimits, MonitorCfg,
};
pub use connectivity::Connectivity;
pub use dosage::{Chemical, Treatment};
pub use dss::{Decision, DssDecision, Factor, Urgency};
pub use error::{BuildError, MonitorError};
pub use history::HistoryWindow;
pub use monitor::{CycleReport, FetchStatus, Monitor};
pub use pipeline::{Evaluation, evaluate};
pub use reading::{CalibrationOffsets, RawReading, SensorReading, normalize};
pub use risk::{RiskAssessment, RiskLevel, RiskSource};
pub use scheduler::{CancelHandle, Flow, PollScheduler};
pub use settings::{FileSettingsStore, Settings, SettingsStore};
pub use stage::{BiofilmStage, StageTable};
pub use trend::{TrendDirection, TrendResult};
