//! Runtime configuration for the decision pipeline.
//!
//! These are the structs the engine works with. They are separate from the
//! TOML-deserialized config in `biofilm_config`; see `conversions`.

use crate::stage::StageTable;
use std::time::Duration;

/// Thresholds that make a physical signal count as a DSS factor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FactorLimits {
    /// Turbidity above this (NTU) counts.
    pub turbidity_max: f64,
    /// Flow below this counts.
    pub flow_min: f64,
    /// TDS above this (ppm) counts.
    pub tds_max: f64,
    /// Temperature above this (°C) counts.
    pub temperature_max: f64,
}

impl Default for FactorLimits {
    fn default() -> Self {
        Self {
            turbidity_max: 5.0,
            flow_min: 60.0,
            tds_max: 500.0,
            temperature_max: 30.0,
        }
    }
}

/// DSS rule thresholds.
#[derive(Debug, Clone, PartialEq)]
pub struct DssRules {
    pub normal_below: f64,
    pub preventive_below: f64,
    /// Most factors tolerated under normal operation.
    pub max_normal_factors: usize,
    /// Exact factor count that forces preventive maintenance.
    pub preventive_factor_count: usize,
    pub limits: FactorLimits,
}

impl Default for DssRules {
    fn default() -> Self {
        Self {
            normal_below: 30.0,
            preventive_below: 60.0,
            max_normal_factors: 1,
            preventive_factor_count: 2,
            limits: FactorLimits::default(),
        }
    }
}

/// Dosage calculator parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DosageRules {
    /// Units of chemical per 1000 liters.
    pub dose_per_1000l: f64,
    pub ph_low: f64,
    pub ph_high: f64,
    pub risk_threshold: f64,
}

impl Default for DosageRules {
    fn default() -> Self {
        Self {
            dose_per_1000l: 50.0,
            ph_low: 6.5,
            ph_high: 8.5,
            risk_threshold: 60.0,
        }
    }
}

/// Everything the stateless evaluation needs.
#[derive(Debug, Clone, Default)]
pub struct EngineCfg {
    pub dss: DssRules,
    pub dosage: DosageRules,
    pub stages: StageTable,
}

/// Connectivity classification policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectivityPolicy {
    /// Connected while the latest reading is at most `stale_after` old.
    Binary { stale_after: Duration },
    /// Connected below `stale_after`, Stale below `offline_after`, else Disconnected.
    Tiered {
        stale_after: Duration,
        offline_after: Duration,
    },
}

impl Default for ConnectivityPolicy {
    fn default() -> Self {
        ConnectivityPolicy::Binary {
            stale_after: Duration::from_millis(60_000),
        }
    }
}

/// Alert throttle parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlertCfg {
    /// Fires only when risk is strictly above this.
    pub threshold: f64,
    pub cooldown: Duration,
}

impl Default for AlertCfg {
    fn default() -> Self {
        Self {
            threshold: 80.0,
            cooldown: Duration::from_millis(3_600_000),
        }
    }
}

/// Monitor (poll cycle) configuration.
#[derive(Debug, Clone)]
pub struct MonitorCfg {
    pub history_capacity: usize,
    /// Readings requested from the store per poll.
    pub results: usize,
    pub poll_interval: Duration,
    pub connectivity: ConnectivityPolicy,
    pub alert: AlertCfg,
    pub engine: EngineCfg,
}

impl Default for MonitorCfg {
    fn default() -> Self {
        Self {
            history_capacity: crate::history::DEFAULT_CAPACITY,
            results: 10,
            poll_interval: Duration::from_millis(5_000),
            connectivity: ConnectivityPolicy::default(),
            alert: AlertCfg::default(),
            engine: EngineCfg::default(),
        }
    }
}
