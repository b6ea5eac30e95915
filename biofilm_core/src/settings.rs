//! Long-lived user settings and the store that persists them.
//!
//! Mutations are synchronous and validated at the boundary: offsets must be
//! finite and tank volume floors at 0, so nothing non-numeric ever reaches
//! the normalizer. The monitor reloads settings at the start of each cycle,
//! so a change becomes visible to the next cycle and never mid-cycle.

use crate::alert::AlertState;
use crate::error::{MonitorError, Result};
use crate::reading::CalibrationOffsets;
use chrono::{DateTime, Utc};
use eyre::WrapErr;
use std::path::PathBuf;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Settings {
    pub offsets: CalibrationOffsets,
    pub tank_volume_l: u32,
    pub last_maintenance: Option<DateTime<Utc>>,
    pub alert: AlertState,
}

impl Settings {
    pub fn set_offsets(&mut self, offsets: CalibrationOffsets) -> Result<()> {
        if !(offsets.ph.is_finite() && offsets.temperature.is_finite() && offsets.tds.is_finite()) {
            return Err(MonitorError::Settings("offsets must be finite".to_string()).into());
        }
        self.offsets = offsets;
        Ok(())
    }

    /// Negative volumes floor at 0; non-finite input is rejected.
    pub fn set_tank_volume_l(&mut self, liters: f64) -> Result<()> {
        if !liters.is_finite() {
            return Err(MonitorError::Settings("tank volume must be finite".to_string()).into());
        }
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let v = liters.round().clamp(0.0, f64::from(u32::MAX)) as u32;
        self.tank_volume_l = v;
        Ok(())
    }

    pub fn log_maintenance(&mut self, at: DateTime<Utc>) {
        self.last_maintenance = Some(at);
    }
}

/// Durable key-value storage for `Settings`.
pub trait SettingsStore {
    fn load(&self) -> Result<Settings>;
    fn save(&mut self, settings: &Settings) -> Result<()>;
}

/// TOML file store backed by `biofilm_config::{load_settings, save_settings}`.
#[derive(Debug, Clone)]
pub struct FileSettingsStore {
    path: PathBuf,
}

impl FileSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl SettingsStore for FileSettingsStore {
    fn load(&self) -> Result<Settings> {
        let persisted = biofilm_config::load_settings(&self.path)
            .wrap_err_with(|| format!("load settings from {}", self.path.display()))?;
        Ok(Settings::from(&persisted))
    }

    fn save(&mut self, settings: &Settings) -> Result<()> {
        let persisted = biofilm_config::PersistedSettings::from(settings);
        biofilm_config::save_settings(&self.path, &persisted)
            .wrap_err_with(|| format!("save settings to {}", self.path.display()))
    }
}
