//! `From` implementations bridging `biofilm_config` types to `biofilm_core` types.

use crate::alert::AlertState;
use crate::config::{AlertCfg, ConnectivityPolicy, DosageRules, DssRules, EngineCfg, MonitorCfg};
use crate::reading::CalibrationOffsets;
use crate::settings::Settings;
use crate::stage::StageTable;
use biofilm_config::ConnectivityPolicyKind;
use chrono::{DateTime, SecondsFormat, Utc};
use std::time::Duration;

// ── Engine ───────────────────────────────────────────────────────────────────

impl From<&biofilm_config::DssCfg> for DssRules {
    fn from(c: &biofilm_config::DssCfg) -> Self {
        Self {
            normal_below: c.normal_below,
            preventive_below: c.preventive_below,
            ..DssRules::default()
        }
    }
}

impl From<&biofilm_config::DosageCfg> for DosageRules {
    fn from(c: &biofilm_config::DosageCfg) -> Self {
        Self {
            dose_per_1000l: c.dose_per_1000l,
            ph_low: c.ph_low,
            ph_high: c.ph_high,
            risk_threshold: c.risk_threshold,
        }
    }
}

// ── Connectivity / Alert ─────────────────────────────────────────────────────

impl From<&biofilm_config::ConnectivityCfg> for ConnectivityPolicy {
    fn from(c: &biofilm_config::ConnectivityCfg) -> Self {
        let stale_after = Duration::from_millis(c.stale_after_ms);
        match c.policy {
            ConnectivityPolicyKind::Binary => ConnectivityPolicy::Binary { stale_after },
            ConnectivityPolicyKind::Tiered => ConnectivityPolicy::Tiered {
                stale_after,
                offline_after: Duration::from_millis(c.offline_after_ms),
            },
        }
    }
}

impl From<&biofilm_config::AlertCfg> for AlertCfg {
    fn from(c: &biofilm_config::AlertCfg) -> Self {
        Self {
            threshold: c.threshold,
            cooldown: Duration::from_millis(c.cooldown_ms),
        }
    }
}

// ── Whole config ─────────────────────────────────────────────────────────────

impl From<&biofilm_config::Config> for MonitorCfg {
    fn from(c: &biofilm_config::Config) -> Self {
        Self {
            history_capacity: c.history.capacity,
            results: c.feed.results,
            poll_interval: Duration::from_millis(c.poll.interval_ms),
            connectivity: (&c.connectivity).into(),
            alert: (&c.alert).into(),
            engine: EngineCfg {
                dss: (&c.dss).into(),
                dosage: (&c.dosage).into(),
                stages: StageTable::from_scheme(c.dss.stage_scheme),
            },
        }
    }
}

// ── Settings ─────────────────────────────────────────────────────────────────

impl From<&biofilm_config::PersistedOffsets> for CalibrationOffsets {
    fn from(c: &biofilm_config::PersistedOffsets) -> Self {
        Self {
            ph: c.ph,
            temperature: c.temperature,
            tds: c.tds,
        }
    }
}

impl From<&biofilm_config::PersistedSettings> for Settings {
    fn from(c: &biofilm_config::PersistedSettings) -> Self {
        Self {
            offsets: (&c.offsets).into(),
            tank_volume_l: c.tank_volume_l,
            // Validated on load; anything unparsable is treated as never maintained.
            last_maintenance: c
                .last_maintenance
                .as_deref()
                .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
                .map(|dt| dt.with_timezone(&Utc)),
            alert: AlertState {
                last_alert_ms: c.last_alert_ms,
            },
        }
    }
}

impl From<&Settings> for biofilm_config::PersistedSettings {
    fn from(s: &Settings) -> Self {
        Self {
            tank_volume_l: s.tank_volume_l,
            last_maintenance: s
                .last_maintenance
                .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Secs, true)),
            last_alert_ms: s.alert.last_alert_ms,
            offsets: biofilm_config::PersistedOffsets {
                ph: s.offsets.ph,
                temperature: s.offsets.temperature,
                tds: s.offsets.tds,
            },
        }
    }
}
