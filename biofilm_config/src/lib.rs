#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Config schemas and persisted settings for the biofilm monitor.
//!
//! - `Config` and sub-structs are deserialized from TOML and validated.
//! - `PersistedSettings` is the durable key-value state owned by the local
//!   settings store (calibration offsets, tank volume, maintenance and alert
//!   timestamps). It is read and written as TOML.
//! - `parse_offset` / `parse_volume` guard user input at the boundary so that
//!   nothing non-numeric ever reaches the pipeline.
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Deserialize)]
pub struct FeedCfg {
    /// Telemetry store endpoint serving the last N readings as JSON.
    pub url: String,
    /// Number of readings requested per poll.
    #[serde(default = "default_results")]
    pub results: usize,
    /// Optional read key appended as `api_key` query parameter.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Optional request timeout. Absent means the network stack default.
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

const fn default_results() -> usize {
    10
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct PollCfg {
    pub interval_ms: u64,
}

impl Default for PollCfg {
    fn default() -> Self {
        Self { interval_ms: 5_000 }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct HistoryCfg {
    pub capacity: usize,
}

impl Default for HistoryCfg {
    fn default() -> Self {
        Self { capacity: 10 }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ConnectivityPolicyKind {
    /// Connected / Disconnected on a single staleness threshold.
    #[default]
    Binary,
    /// Active / Stale / Offline on two thresholds.
    Tiered,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ConnectivityCfg {
    pub policy: ConnectivityPolicyKind,
    pub stale_after_ms: u64,
    /// Only used by the tiered policy.
    pub offline_after_ms: u64,
}

impl Default for ConnectivityCfg {
    fn default() -> Self {
        Self {
            policy: ConnectivityPolicyKind::Binary,
            stale_after_ms: 60_000,
            offline_after_ms: 300_000,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct AlertCfg {
    /// Risk strictly above this value is alert-worthy.
    pub threshold: f64,
    pub cooldown_ms: u64,
}

impl Default for AlertCfg {
    fn default() -> Self {
        Self {
            threshold: 80.0,
            cooldown_ms: 3_600_000,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StageScheme {
    #[default]
    FourBand,
    ThreeBand,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DssCfg {
    /// Risk below this (with at most one factor) is normal operation.
    pub normal_below: f64,
    /// Risk below this is at most preventive maintenance.
    pub preventive_below: f64,
    pub stage_scheme: StageScheme,
}

impl Default for DssCfg {
    fn default() -> Self {
        Self {
            normal_below: 30.0,
            preventive_below: 60.0,
            stage_scheme: StageScheme::FourBand,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DosageCfg {
    /// Dose per 1000 liters of tank volume (ml of chlorine, g of pH adjuster).
    pub dose_per_1000l: f64,
    pub ph_low: f64,
    pub ph_high: f64,
    /// Risk at or above this always triggers chlorination.
    pub risk_threshold: f64,
}

impl Default for DosageCfg {
    fn default() -> Self {
        Self {
            dose_per_1000l: 50.0,
            ph_low: 6.5,
            ph_high: 8.5,
            risk_threshold: 60.0,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SettingsCfg {
    /// Location of the persisted settings file.
    pub path: String,
}

impl Default for SettingsCfg {
    fn default() -> Self {
        Self {
            path: "biofilm_settings.toml".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Logging {
    pub file: Option<String>,  // path to .log (JSON lines)
    pub level: Option<String>, // "info","debug"
    /// Log rotation policy: "never" | "daily" | "hourly" (default: never)
    pub rotation: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Config {
    pub feed: FeedCfg,
    #[serde(default)]
    pub poll: PollCfg,
    #[serde(default)]
    pub history: HistoryCfg,
    #[serde(default)]
    pub connectivity: ConnectivityCfg,
    #[serde(default)]
    pub alert: AlertCfg,
    #[serde(default)]
    pub dss: DssCfg,
    #[serde(default)]
    pub dosage: DosageCfg,
    #[serde(default)]
    pub settings: SettingsCfg,
    #[serde(default)]
    pub logging: Logging,
}

pub fn load_toml(s: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(s)
}

impl Config {
    pub fn validate(&self) -> eyre::Result<()> {
        // Feed
        if !self.feed.url.starts_with("http://") && !self.feed.url.starts_with("https://") {
            eyre::bail!("feed.url must start with http:// or https://");
        }
        if self.feed.results == 0 || self.feed.results > 8000 {
            eyre::bail!("feed.results must be in [1, 8000]");
        }
        if self.feed.timeout_ms == Some(0) {
            eyre::bail!("feed.timeout_ms must be >= 1 when set");
        }

        // Poll
        if self.poll.interval_ms < 100 {
            eyre::bail!("poll.interval_ms must be >= 100");
        }
        if self.poll.interval_ms > 24 * 60 * 60 * 1000 {
            eyre::bail!("poll.interval_ms is unreasonably large (>24h)");
        }

        // History
        if self.history.capacity < 2 {
            eyre::bail!("history.capacity must be >= 2");
        }

        // Connectivity
        if self.connectivity.stale_after_ms == 0 {
            eyre::bail!("connectivity.stale_after_ms must be >= 1");
        }
        if self.connectivity.policy == ConnectivityPolicyKind::Tiered
            && self.connectivity.offline_after_ms <= self.connectivity.stale_after_ms
        {
            eyre::bail!("connectivity.offline_after_ms must be > stale_after_ms");
        }

        // Alert
        if !(0.0..=100.0).contains(&self.alert.threshold) {
            eyre::bail!("alert.threshold must be in [0, 100]");
        }
        if self.alert.cooldown_ms == 0 {
            eyre::bail!("alert.cooldown_ms must be >= 1");
        }

        // DSS
        if !(0.0..=100.0).contains(&self.dss.normal_below)
            || !(0.0..=100.0).contains(&self.dss.preventive_below)
        {
            eyre::bail!("dss thresholds must be in [0, 100]");
        }
        if self.dss.normal_below > self.dss.preventive_below {
            eyre::bail!("dss.normal_below must be <= dss.preventive_below");
        }

        // Dosage
        if !self.dosage.dose_per_1000l.is_finite() || self.dosage.dose_per_1000l < 0.0 {
            eyre::bail!("dosage.dose_per_1000l must be >= 0");
        }
        if !(0.0..=14.0).contains(&self.dosage.ph_low) || !(0.0..=14.0).contains(&self.dosage.ph_high)
        {
            eyre::bail!("dosage pH limits must be in [0, 14]");
        }
        if self.dosage.ph_low >= self.dosage.ph_high {
            eyre::bail!("dosage.ph_low must be < dosage.ph_high");
        }
        if !(0.0..=100.0).contains(&self.dosage.risk_threshold) {
            eyre::bail!("dosage.risk_threshold must be in [0, 100]");
        }

        // Settings
        if self.settings.path.trim().is_empty() {
            eyre::bail!("settings.path must not be empty");
        }

        // Logging
        if let Some(rot) = self.logging.rotation.as_deref()
            && !matches!(rot, "never" | "daily" | "hourly")
        {
            eyre::bail!("logging.rotation must be one of never|daily|hourly");
        }

        Ok(())
    }
}

/// Additive calibration deltas as stored on disk.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, Default, PartialEq)]
#[serde(default)]
pub struct PersistedOffsets {
    pub ph: f64,
    pub temperature: f64,
    pub tds: f64,
}

/// Durable settings file schema.
///
/// Example:
/// ```toml
/// tank_volume_l = 1000
/// last_maintenance = "2024-05-01T08:30:00Z"
/// last_alert_ms = 1714552200000
///
/// [offsets]
/// ph = -0.1
/// temperature = 0.5
/// tds = 0.0
/// ```
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct PersistedSettings {
    pub tank_volume_l: u32,
    pub last_maintenance: Option<String>,
    pub last_alert_ms: Option<i64>,
    pub offsets: PersistedOffsets,
}

impl PersistedSettings {
    pub fn validate(&self) -> eyre::Result<()> {
        let o = &self.offsets;
        if !(o.ph.is_finite() && o.temperature.is_finite() && o.tds.is_finite()) {
            eyre::bail!("offsets must be finite numbers");
        }
        if let Some(ts) = self.last_maintenance.as_deref()
            && chrono::DateTime::parse_from_rfc3339(ts).is_err()
        {
            eyre::bail!("last_maintenance must be an RFC 3339 timestamp, got {ts:?}");
        }
        Ok(())
    }
}

/// Load settings from `path`. A missing file yields defaults; an unreadable or
/// invalid file is an error for the caller to surface.
pub fn load_settings(path: &Path) -> eyre::Result<PersistedSettings> {
    if !path.exists() {
        return Ok(PersistedSettings::default());
    }
    let text = std::fs::read_to_string(path)
        .map_err(|e| eyre::eyre!("read settings file {:?}: {}", path, e))?;
    let settings: PersistedSettings = toml::from_str(&text)
        .map_err(|e| eyre::eyre!("parse settings file {:?}: {}", path, e))?;
    settings.validate()?;
    Ok(settings)
}

/// Write settings to `path` atomically (temp file + rename).
pub fn save_settings(path: &Path, settings: &PersistedSettings) -> eyre::Result<()> {
    settings.validate()?;
    let text = toml::to_string_pretty(settings)
        .map_err(|e| eyre::eyre!("serialize settings: {}", e))?;
    let tmp = path.with_extension("toml.tmp");
    std::fs::write(&tmp, text).map_err(|e| eyre::eyre!("write settings {:?}: {}", tmp, e))?;
    std::fs::rename(&tmp, path)
        .map_err(|e| eyre::eyre!("replace settings file {:?}: {}", path, e))?;
    Ok(())
}

/// Parse a user-entered calibration offset. Rejects non-numeric and non-finite input.
pub fn parse_offset(input: &str) -> eyre::Result<f64> {
    let v: f64 = input
        .trim()
        .parse()
        .map_err(|_| eyre::eyre!("offset must be a number, got {input:?}"))?;
    if !v.is_finite() {
        eyre::bail!("offset must be finite, got {input:?}");
    }
    Ok(v)
}

/// Parse a user-entered tank volume in liters. Negative values floor at 0;
/// fractional liters are rounded to the nearest liter.
pub fn parse_volume(input: &str) -> eyre::Result<u32> {
    let v: f64 = input
        .trim()
        .parse()
        .map_err(|_| eyre::eyre!("tank volume must be a number, got {input:?}"))?;
    if !v.is_finite() {
        eyre::bail!("tank volume must be finite, got {input:?}");
    }
    let clamped = v.round().clamp(0.0, f64::from(u32::MAX));
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let liters = clamped as u32;
    Ok(liters)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn volume_floors_negative_at_zero() {
        assert_eq!(parse_volume("-250").unwrap(), 0);
        assert_eq!(parse_volume(" 1000 ").unwrap(), 1000);
        assert_eq!(parse_volume("499.6").unwrap(), 500);
        assert!(parse_volume("lots").is_err());
        assert!(parse_volume("NaN").is_err());
    }

    #[test]
    fn offset_rejects_garbage() {
        assert!((parse_offset("-0.25").unwrap() + 0.25).abs() < 1e-12);
        assert!(parse_offset("abc").is_err());
        assert!(parse_offset("inf").is_err());
    }
}
