//! Cancelable fixed-interval poll scheduler.
//!
//! Cycles run on the caller's thread, back to back, separated by the poll
//! interval; a cycle always completes before the next is scheduled. The wait
//! between cycles blocks on a cancellation channel, so a [`CancelHandle`]
//! (for example from a Ctrl-C handler) stops the loop without waiting out the
//! interval and no further cycle runs after cancellation.
use crossbeam_channel as xch;
use std::time::Duration;

pub struct PollScheduler {
    interval: Duration,
    cancel_tx: xch::Sender<()>,
    cancel_rx: xch::Receiver<()>,
}

/// Cloneable stop signal for a running [`PollScheduler`].
#[derive(Clone)]
pub struct CancelHandle {
    tx: xch::Sender<()>,
}

impl CancelHandle {
    /// Request the scheduler to stop. Idempotent; safe after the scheduler is gone.
    pub fn cancel(&self) {
        let _ = self.tx.try_send(());
    }
}

/// Whether the cycle body wants the loop to continue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Stop,
}

impl PollScheduler {
    pub fn new(interval: Duration) -> Self {
        let (cancel_tx, cancel_rx) = xch::bounded(1);
        Self {
            interval,
            cancel_tx,
            cancel_rx,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        CancelHandle {
            tx: self.cancel_tx.clone(),
        }
    }

    /// Run `cycle` until it returns `Flow::Stop` or the scheduler is canceled.
    /// Returns the number of cycles executed.
    pub fn run<F>(&self, mut cycle: F) -> u64
    where
        F: FnMut() -> Flow,
    {
        let mut count = 0u64;
        loop {
            // A cancel issued before or during the previous wait wins over the next cycle.
            if self.cancel_rx.try_recv().is_ok() {
                tracing::debug!(cycles = count, "poll scheduler canceled");
                break;
            }
            count += 1;
            if cycle() == Flow::Stop {
                tracing::debug!(cycles = count, "poll loop stopped by cycle");
                break;
            }
            match self.cancel_rx.recv_timeout(self.interval) {
                Err(xch::RecvTimeoutError::Timeout) => continue,
                // Disconnected cannot happen while we hold the sender.
                Ok(()) | Err(xch::RecvTimeoutError::Disconnected) => {
                    tracing::debug!(cycles = count, "poll scheduler canceled");
                    break;
                }
            }
        }
        count
    }
}
