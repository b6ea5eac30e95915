//! Liveness of the acquisition path.
//!
//! A reading is trusted as live only if it is recent and the device did not
//! report a manual shutdown (status code 0). A fresh timestamp cannot rescue a
//! shut-down device, and an "active" status cannot rescue a stale reading.

use crate::config::ConnectivityPolicy;

/// Status code the device sends after a manual shutdown.
pub const STATUS_SHUTDOWN: i64 = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connectivity {
    Connected,
    /// Only produced by the tiered policy.
    Stale,
    Disconnected,
}

impl Connectivity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Connectivity::Connected => "connected",
            Connectivity::Stale => "stale",
            Connectivity::Disconnected => "disconnected",
        }
    }

    pub fn is_connected(&self) -> bool {
        matches!(self, Connectivity::Connected)
    }
}

/// Classify from the latest reading's timestamp and status code.
/// `latest_ms = None` (no reading yet) is Disconnected.
pub fn classify(
    policy: &ConnectivityPolicy,
    latest_ms: Option<i64>,
    status_code: Option<i64>,
    now_ms: i64,
) -> Connectivity {
    let Some(ts) = latest_ms else {
        return Connectivity::Disconnected;
    };
    if status_code == Some(STATUS_SHUTDOWN) {
        return Connectivity::Disconnected;
    }
    let age_ms = u128::try_from(now_ms.saturating_sub(ts)).unwrap_or(0);
    match *policy {
        ConnectivityPolicy::Binary { stale_after } => {
            if age_ms > stale_after.as_millis() {
                Connectivity::Disconnected
            } else {
                Connectivity::Connected
            }
        }
        ConnectivityPolicy::Tiered {
            stale_after,
            offline_after,
        } => {
            if age_ms < stale_after.as_millis() {
                Connectivity::Connected
            } else if age_ms < offline_after.as_millis() {
                Connectivity::Stale
            } else {
                Connectivity::Disconnected
            }
        }
    }
}
