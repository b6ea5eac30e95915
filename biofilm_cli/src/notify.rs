//! Notification channel for headless deployments.

use biofilm_traits::Notifier;

/// Emits alerts as `warn` events on the `alert` target, so they land in the
/// console and in the JSON log file alike.
#[derive(Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn is_available(&self) -> bool {
        true
    }

    fn notify(
        &mut self,
        title: &str,
        body: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        tracing::warn!(target: "alert", title, body, "ALERT");
        Ok(())
    }
}
