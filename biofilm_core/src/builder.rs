//! Type-state builder for `Monitor`.
//!
//! The builder enforces at compile time that a telemetry source and a settings
//! store are provided before `build()` is available. `try_build()` is always
//! available for dynamic checks.

use std::marker::PhantomData;
use std::sync::Arc;

use biofilm_traits::clock::{Clock, SystemClock};
use biofilm_traits::{Notifier, TelemetrySource};

use crate::alert::AlertThrottle;
use crate::config::{ConnectivityPolicy, MonitorCfg};
use crate::error::{BuildError, Result};
use crate::history::HistoryWindow;
use crate::mocks::SilentNotifier;
use crate::monitor::Monitor;
use crate::settings::SettingsStore;

impl Monitor {
    /// Start building a Monitor.
    pub fn builder() -> MonitorBuilder<Missing, Missing> {
        MonitorBuilder::default()
    }
}

// ── Type-state markers ───────────────────────────────────────────────────────

pub struct Missing;
pub struct Set;

/// Builder for `Monitor`. All fields are validated on `build()`.
pub struct MonitorBuilder<S, St> {
    source: Option<Box<dyn TelemetrySource>>,
    store: Option<Box<dyn SettingsStore>>,
    notifier: Option<Box<dyn Notifier>>,
    clock: Option<Box<dyn Clock + Send + Sync>>,
    cfg: Option<MonitorCfg>,
    _s: PhantomData<S>,
    _st: PhantomData<St>,
}

impl Default for MonitorBuilder<Missing, Missing> {
    fn default() -> Self {
        Self {
            source: None,
            store: None,
            notifier: None,
            clock: None,
            cfg: None,
            _s: PhantomData,
            _st: PhantomData,
        }
    }
}

/// Validate configuration and construct a `Monitor`, loading initial settings.
///
/// A settings store that cannot be read at startup does not stop the monitor;
/// it starts from defaults and the failure is logged.
fn validate_and_build(
    source: Box<dyn TelemetrySource>,
    store: Box<dyn SettingsStore>,
    notifier: Box<dyn Notifier>,
    clock: Option<Box<dyn Clock + Send + Sync>>,
    cfg: MonitorCfg,
) -> Result<Monitor> {
    // ── Validation ───────────────────────────────────────────────────────────
    if cfg.history_capacity < 2 {
        return Err(eyre::Report::new(BuildError::InvalidConfig(
            "history capacity must be >= 2",
        )));
    }
    if cfg.results == 0 {
        return Err(eyre::Report::new(BuildError::InvalidConfig(
            "results must be >= 1",
        )));
    }
    if cfg.poll_interval.is_zero() {
        return Err(eyre::Report::new(BuildError::InvalidConfig(
            "poll interval must be > 0",
        )));
    }
    if let ConnectivityPolicy::Tiered {
        stale_after,
        offline_after,
    } = cfg.connectivity
        && offline_after <= stale_after
    {
        return Err(eyre::Report::new(BuildError::InvalidConfig(
            "offline threshold must exceed stale threshold",
        )));
    }
    if !cfg.alert.threshold.is_finite() || cfg.alert.cooldown.is_zero() {
        return Err(eyre::Report::new(BuildError::InvalidConfig(
            "alert threshold must be finite and cooldown > 0",
        )));
    }
    let dss = &cfg.engine.dss;
    if dss.normal_below > dss.preventive_below {
        return Err(eyre::Report::new(BuildError::InvalidConfig(
            "normal threshold must not exceed preventive threshold",
        )));
    }
    let dosage = &cfg.engine.dosage;
    if dosage.ph_low >= dosage.ph_high {
        return Err(eyre::Report::new(BuildError::InvalidConfig(
            "pH low limit must be below high limit",
        )));
    }

    // ── Assemble ─────────────────────────────────────────────────────────────
    let clock: Arc<dyn Clock + Send + Sync> = match clock {
        Some(b) => Arc::from(b),
        None => Arc::new(SystemClock::new()),
    };

    let settings = match store.load() {
        Ok(s) => s,
        Err(e) => {
            tracing::warn!(error = %e, "settings unavailable at startup; using defaults");
            crate::settings::Settings::default()
        }
    };

    Ok(Monitor {
        source,
        notifier,
        store,
        clock,
        throttle: AlertThrottle::new(cfg.alert),
        window: HistoryWindow::new(cfg.history_capacity),
        settings,
        cfg,
    })
}

impl<S, St> MonitorBuilder<S, St> {
    /// Fallible build available in any type-state; returns detailed error for missing pieces.
    pub fn try_build(self) -> Result<Monitor> {
        let source = self
            .source
            .ok_or_else(|| eyre::Report::new(BuildError::MissingSource))?;
        let store = self
            .store
            .ok_or_else(|| eyre::Report::new(BuildError::MissingSettings))?;
        validate_and_build(
            source,
            store,
            self.notifier
                .unwrap_or_else(|| Box::new(SilentNotifier) as Box<dyn Notifier>),
            self.clock,
            self.cfg.unwrap_or_default(),
        )
    }

    fn retype<S2, St2>(self) -> MonitorBuilder<S2, St2> {
        MonitorBuilder {
            source: self.source,
            store: self.store,
            notifier: self.notifier,
            clock: self.clock,
            cfg: self.cfg,
            _s: PhantomData,
            _st: PhantomData,
        }
    }

    pub fn with_source(mut self, source: impl TelemetrySource + 'static) -> MonitorBuilder<Set, St> {
        self.source = Some(Box::new(source));
        self.retype()
    }

    pub fn with_settings_store(
        mut self,
        store: impl SettingsStore + 'static,
    ) -> MonitorBuilder<S, Set> {
        self.store = Some(Box::new(store));
        self.retype()
    }

    /// Defaults to a notifier that reports itself unavailable.
    pub fn with_notifier(mut self, notifier: impl Notifier + 'static) -> Self {
        self.notifier = Some(Box::new(notifier));
        self
    }

    /// Defaults to the system clock.
    pub fn with_clock(mut self, clock: impl Clock + Send + Sync + 'static) -> Self {
        self.clock = Some(Box::new(clock));
        self
    }

    pub fn with_config(mut self, cfg: MonitorCfg) -> Self {
        self.cfg = Some(cfg);
        self
    }
}

impl MonitorBuilder<Set, Set> {
    pub fn build(self) -> Result<Monitor> {
        self.try_build()
    }
}
