//! Rate-limited high-risk notifications.
//!
//! Fires when the resolved risk is strictly above the threshold, the notifier
//! is available, and more than `cooldown` has passed since the last alert.
//! Only this module mutates `AlertState`.

use crate::config::AlertCfg;
use biofilm_traits::Notifier;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AlertState {
    /// Epoch milliseconds of the last delivered alert.
    pub last_alert_ms: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlertOutcome {
    /// Risk at or below threshold.
    BelowThreshold,
    /// Within cooldown of the previous alert.
    Suppressed { remaining_ms: u64 },
    /// No notification channel available.
    Unavailable,
    /// Notifier returned an error; state untouched so the next cycle retries.
    Failed(String),
    Fired,
}

#[derive(Debug, Clone, Copy)]
pub struct AlertThrottle {
    cfg: AlertCfg,
}

impl AlertThrottle {
    pub fn new(cfg: AlertCfg) -> Self {
        Self { cfg }
    }

    /// Milliseconds of cooldown left at `now_ms`; 0 when an alert may fire.
    pub fn cooldown_remaining(&self, state: &AlertState, now_ms: i64) -> u64 {
        let Some(last) = state.last_alert_ms else {
            return 0;
        };
        let elapsed = u64::try_from(now_ms.saturating_sub(last)).unwrap_or(0);
        let cooldown = u64::try_from(self.cfg.cooldown.as_millis()).unwrap_or(u64::MAX);
        if elapsed > cooldown {
            0
        } else {
            // Strictly greater is required to fire, so at least 1 ms remains at the boundary.
            (cooldown - elapsed).max(1)
        }
    }

    pub fn observe<N: Notifier + ?Sized>(
        &self,
        risk: f64,
        now_ms: i64,
        state: &mut AlertState,
        notifier: &mut N,
    ) -> AlertOutcome {
        if risk.is_nan() || risk <= self.cfg.threshold {
            return AlertOutcome::BelowThreshold;
        }
        if !notifier.is_available() {
            return AlertOutcome::Unavailable;
        }
        let remaining_ms = self.cooldown_remaining(state, now_ms);
        if remaining_ms > 0 {
            tracing::debug!(risk, remaining_ms, "alert suppressed by cooldown");
            return AlertOutcome::Suppressed { remaining_ms };
        }
        let body = format!("Biofilm risk is {risk:.0}%. Immediate inspection recommended.");
        match notifier.notify("High biofilm risk", &body) {
            Ok(()) => {
                state.last_alert_ms = Some(now_ms);
                tracing::info!(risk, now_ms, "high-risk alert sent");
                AlertOutcome::Fired
            }
            Err(e) => {
                tracing::warn!(error = %e, "alert delivery failed");
                AlertOutcome::Failed(e.to_string())
            }
        }
    }
}
