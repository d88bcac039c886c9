//! Polling for external location changes.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time;

use crate::navigation::controller::Router;

/// Shortest accepted polling period.
pub const MIN_POLL_PERIOD: Duration = Duration::from_millis(1);

/// Handle to a running location poller. Dropping it stops polling.
#[derive(Debug)]
pub struct Listener {
    handle: JoinHandle<()>,
}

impl Listener {
    /// Stop polling.
    pub fn stop(self) {
        self.handle.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

impl Router {
    /// Poll the location every `period` and `check` the fragment whenever it
    /// changes. Replaces any poller started earlier on this router. Periods
    /// below [`MIN_POLL_PERIOD`] are raised to it.
    ///
    /// Must be called from within a Tokio runtime.
    #[must_use = "dropping the listener stops polling"]
    pub fn listen(&self, period: Duration) -> Listener {
        let period = period.max(MIN_POLL_PERIOD);
        let router = self.clone();
        let handle = tokio::spawn(async move {
            let mut current = router.current();
            let mut ticker = time::interval(period);
            tracing::info!(period_ms = period.as_millis() as u64, current = %current, "Location listener started");

            loop {
                ticker.tick().await;
                let location = router.current();
                if location != current {
                    tracing::debug!(from = %current, to = %location, "Location changed");
                    current = location;
                    router.check(&current);
                }
            }
        });

        self.replace_poller(Some(handle.abort_handle()));
        Listener { handle }
    }
}
