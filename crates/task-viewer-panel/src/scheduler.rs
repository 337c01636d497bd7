/*
[INPUT]:  Refresh interval in seconds, async refresh action
[OUTPUT]: Background timer invoking the action once per period
[POS]:    Panel core - auto refresh scheduling
[UPDATE]: When changing timer semantics or shutdown behaviour
*/

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

const STOP_TIMEOUT: Duration = Duration::from_secs(5);

struct RunningTimer {
    shutdown: CancellationToken,
    handle: JoinHandle<()>,
    interval: Duration,
}

/// Periodic refresh trigger.
///
/// Callers stop the timer before starting it with a new interval; a second
/// `start` stops the previous timer rather than stacking another one.
#[derive(Default)]
pub struct AutoRefreshScheduler {
    running: Option<RunningTimer>,
}

impl std::fmt::Debug for AutoRefreshScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AutoRefreshScheduler")
            .field("interval", &self.interval())
            .finish()
    }
}

impl AutoRefreshScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `action` every `interval_seconds`, first run one period from now.
    ///
    /// Returns false (and schedules nothing) for a zero interval.
    pub fn start<F, Fut>(&mut self, interval_seconds: u64, mut action: F) -> bool
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        if interval_seconds == 0 {
            return false;
        }

        if self.running.is_some() {
            tracing::warn!("auto refresh already running; stopping previous timer");
            self.stop();
        }

        let period = Duration::from_secs(interval_seconds);
        let shutdown = CancellationToken::new();
        let token = shutdown.clone();

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => {
                        tracing::debug!("auto refresh tick");
                        action().await;
                    }
                }
            }
        });

        tracing::info!(interval_seconds, "auto refresh started");
        self.running = Some(RunningTimer {
            shutdown,
            handle,
            interval: period,
        });
        true
    }

    /// Cancel future ticks. A refresh already running is left to finish.
    pub fn stop(&mut self) {
        if let Some(timer) = self.running.take() {
            timer.shutdown.cancel();
            tracing::info!("auto refresh stopped");
        }
    }

    /// Cancel and wait for the timer task to exit, aborting it after a bounded wait
    pub async fn stop_and_wait(&mut self) {
        let Some(timer) = self.running.take() else {
            return;
        };
        timer.shutdown.cancel();

        let mut handle = timer.handle;
        let sleep = tokio::time::sleep_until(Instant::now() + STOP_TIMEOUT);

        tokio::select! {
            res = &mut handle => {
                if let Err(join_err) = res {
                    if join_err.is_panic() {
                        tracing::error!("auto refresh task panicked: {join_err}");
                    }
                }
            }
            _ = sleep => {
                handle.abort();
                tracing::warn!("auto refresh stop timed out after {STOP_TIMEOUT:?}");
            }
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }

    pub fn interval(&self) -> Option<Duration> {
        self.running.as_ref().map(|timer| timer.interval)
    }
}

impl Drop for AutoRefreshScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}
