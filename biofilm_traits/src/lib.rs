pub mod clock;

pub use clock::{Clock, SystemClock};

/// Upstream telemetry store. Returns the raw JSON body of the last `results` readings.
pub trait TelemetrySource {
    fn fetch(&mut self, results: usize) -> Result<String, Box<dyn std::error::Error + Send + Sync>>;
}

/// Out-of-band notification channel used by the alert throttle.
pub trait Notifier {
    /// Whether notifications can be delivered at all (permission granted, channel configured).
    fn is_available(&self) -> bool;
    fn notify(
        &mut self,
        title: &str,
        body: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}
