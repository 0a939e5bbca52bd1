use chrono::{DateTime, Duration, Utc};
use tokio::task::JoinHandle;

/// Time left until `deadline`, clamped at zero once it has passed.
#[must_use]
pub fn remaining(deadline: DateTime<Utc>, now: DateTime<Utc>) -> Duration {
    (deadline - now).max(Duration::zero())
}

/// One-second countdown ticker for the trial-expiry banner.
///
/// Ticks once per second with the remaining duration and stops on its own
/// when the deadline passes. Dropping the handle aborts the task, so a
/// countdown scoped to a view is cancelled on teardown.
pub struct Countdown {
    handle: JoinHandle<()>,
}

impl Countdown {
    /// Spawns the ticker. `on_tick` receives the remaining duration, starting
    /// immediately and then once per second; the final tick delivers zero.
    pub fn start<F>(deadline: DateTime<Utc>, mut on_tick: F) -> Self
    where
        F: FnMut(Duration) + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(std::time::Duration::from_secs(1));
            loop {
                interval.tick().await;
                let left = remaining(deadline, Utc::now());
                on_tick(left);
                if left.is_zero() {
                    break;
                }
            }
        });
        Self { handle }
    }

    /// True once the deadline has passed and the ticker has stopped.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for Countdown {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
