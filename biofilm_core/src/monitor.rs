//! The poll cycle.
//!
//! One call to [`Monitor::run_cycle`] performs a full pass:
//! reload settings -> fetch -> parse -> normalize -> append -> evaluate ->
//! connectivity -> alert throttle (only when new readings arrived). Nothing escapes the cycle boundary as an
//! error: a failed fetch or parse reuses the last known-good reading and
//! reports `Disconnected`; a failed settings load keeps the previous settings.

use crate::alert::{AlertOutcome, AlertThrottle};
use crate::config::MonitorCfg;
use crate::connectivity::{self, Connectivity};
use crate::feed;
use crate::history::HistoryWindow;
use crate::pipeline::{self, Evaluation};
use crate::reading::{self, RawReading};
use crate::settings::{Settings, SettingsStore};
use biofilm_traits::{Clock, Notifier, TelemetrySource};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchStatus {
    /// Feed fetched and parsed; `new_readings` were appended to the window.
    Ok { new_readings: usize },
    /// Fetch or parse failed; the previous reading was reused.
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct CycleReport {
    pub at_ms: i64,
    pub fetch: FetchStatus,
    pub connectivity: Connectivity,
    /// `None` until the first good reading arrives.
    pub evaluation: Option<Evaluation>,
    /// `None` when the throttle was not consulted (degraded cycle or no new reading).
    pub alert: Option<AlertOutcome>,
}

impl CycleReport {
    pub fn is_degraded(&self) -> bool {
        matches!(self.fetch, FetchStatus::Failed(_))
    }
}

pub struct Monitor {
    pub(crate) source: Box<dyn TelemetrySource>,
    pub(crate) notifier: Box<dyn Notifier>,
    pub(crate) store: Box<dyn SettingsStore>,
    pub(crate) clock: Arc<dyn Clock + Send + Sync>,
    pub(crate) cfg: MonitorCfg,
    pub(crate) throttle: AlertThrottle,
    pub(crate) window: HistoryWindow,
    pub(crate) settings: Settings,
}

impl core::fmt::Debug for Monitor {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Monitor")
            .field("window_len", &self.window.len())
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl Monitor {
    pub fn window(&self) -> &HistoryWindow {
        &self.window
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn config(&self) -> &MonitorCfg {
        &self.cfg
    }

    /// Replace settings and persist them. Takes effect from the next cycle's normalization.
    pub fn apply_settings(&mut self, settings: Settings) -> crate::error::Result<()> {
        self.store.save(&settings)?;
        self.settings = settings;
        Ok(())
    }

    /// Normalize and append readings strictly newer than the window's latest,
    /// oldest first. Returns how many were appended.
    pub fn ingest(&mut self, batch: &[RawReading]) -> usize {
        let mut appended = 0usize;
        for raw in batch {
            let newer = self
                .window
                .latest()
                .is_none_or(|last| raw.timestamp > last.timestamp());
            if !newer {
                continue;
            }
            self.window
                .append(reading::normalize(raw, &self.settings.offsets));
            appended += 1;
        }
        appended
    }

    fn reload_settings(&mut self) {
        match self.store.load() {
            Ok(mut s) => {
                // an alert that fired but failed to persist still holds its cooldown
                s.alert.last_alert_ms = s
                    .alert
                    .last_alert_ms
                    .max(self.settings.alert.last_alert_ms);
                self.settings = s;
            }
            Err(e) => {
                tracing::warn!(error = %e, "settings reload failed; keeping previous settings");
            }
        }
    }

    fn fetch(&mut self) -> FetchStatus {
        let body = match self.source.fetch(self.cfg.results) {
            Ok(b) => b,
            Err(e) => return FetchStatus::Failed(format!("fetch: {e}")),
        };
        match feed::parse_feed(&body) {
            Ok(batch) => FetchStatus::Ok {
                new_readings: self.ingest(&batch),
            },
            Err(e) => FetchStatus::Failed(format!("parse: {e}")),
        }
    }

    /// Run one complete cycle.
    pub fn run_cycle(&mut self) -> CycleReport {
        self.reload_settings();
        let fetch = self.fetch();
        let now_ms = self.clock.now_ms();

        let evaluation = self.window.latest().map(|current| {
            pipeline::evaluate(
                current,
                self.window.previous(),
                &self.cfg.engine,
                self.settings.tank_volume_l,
            )
        });

        let connectivity = match &fetch {
            FetchStatus::Failed(reason) => {
                tracing::warn!(reason = %reason, "telemetry unavailable; reusing last reading");
                Connectivity::Disconnected
            }
            FetchStatus::Ok { .. } => {
                let latest = self.window.latest();
                connectivity::classify(
                    &self.cfg.connectivity,
                    latest.map(|r| r.timestamp_ms()),
                    latest.and_then(|r| r.status_code()),
                    now_ms,
                )
            }
        };

        let alert = match (&fetch, &evaluation) {
            (FetchStatus::Ok { new_readings }, Some(ev)) if *new_readings > 0 => {
                let before = self.settings.alert;
                let outcome = self.throttle.observe(
                    ev.risk.score,
                    now_ms,
                    &mut self.settings.alert,
                    self.notifier.as_mut(),
                );
                if self.settings.alert != before
                    && let Err(e) = self.store.save(&self.settings)
                {
                    tracing::warn!(error = %e, "failed to persist alert timestamp");
                }
                Some(outcome)
            }
            _ => None,
        };

        if let Some(ev) = &evaluation {
            tracing::info!(
                risk = ev.risk.score,
                source = ev.risk.source.as_str(),
                stage = ev.stage.name(),
                decision = ev.dss.decision.as_str(),
                treatments = ev.treatments.len(),
                connectivity = connectivity.as_str(),
                "cycle complete"
            );
        } else {
            tracing::info!(connectivity = connectivity.as_str(), "cycle complete; no readings yet");
        }

        CycleReport {
            at_ms: now_ms,
            fetch,
            connectivity,
            evaluation,
            alert,
        }
    }
}
