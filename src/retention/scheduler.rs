//! Run/stop lifecycle and the recurring sweep timer.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use parking_lot::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::error::ConfigError;

use super::policy::{validate_retention_period, validate_sweep_interval};
use super::{Clock, GcEngine, RetentionPolicy, SweepStats};

/// Timer bookkeeping guarded by the state mutex. The scheduler is running
/// exactly when a timer task is armed.
struct TimerState {
    timer: Option<JoinHandle<()>>,
    next_sweep_at: Option<DateTime<Utc>>,
}

struct SchedulerInner {
    engine: Arc<GcEngine>,
    clock: Arc<dyn Clock>,
    policy: RwLock<RetentionPolicy>,
    state: Mutex<TimerState>,
    /// Serializes sweep executions. A trigger that arrives while a sweep is
    /// in flight blocks here until that sweep completes.
    sweep_gate: tokio::sync::Mutex<()>,
}

/// Owns the sweep lifecycle: the recurring timer, manual triggering, and
/// live policy updates. Cheap to clone; all clones share one timer.
#[derive(Clone)]
pub struct RetentionScheduler {
    inner: Arc<SchedulerInner>,
}

impl RetentionScheduler {
    pub fn new(engine: Arc<GcEngine>, clock: Arc<dyn Clock>, policy: RetentionPolicy) -> Self {
        Self {
            inner: Arc::new(SchedulerInner {
                engine,
                clock,
                policy: RwLock::new(policy),
                state: Mutex::new(TimerState {
                    timer: None,
                    next_sweep_at: None,
                }),
                sweep_gate: tokio::sync::Mutex::new(()),
            }),
        }
    }

    pub fn is_running(&self) -> bool {
        self.inner.state.lock().timer.is_some()
    }

    /// Estimated time of the next scheduled sweep; `None` while stopped.
    pub fn next_sweep_at(&self) -> Option<DateTime<Utc>> {
        self.inner.state.lock().next_sweep_at
    }

    pub fn policy(&self) -> RetentionPolicy {
        *self.inner.policy.read()
    }

    /// Starts the scheduler: one immediate sweep, then a sweep every
    /// interval. No-op when already running.
    pub fn start(&self) {
        let mut state = self.inner.state.lock();
        if state.timer.is_some() {
            debug!("retention scheduler already running");
            return;
        }
        info!("starting retention scheduler");
        self.spawn_sweep();
        self.arm_timer(&mut state);
    }

    /// Stops the recurring timer. An in-flight sweep runs to completion.
    /// No-op when already stopped.
    pub fn stop(&self) {
        let mut state = self.inner.state.lock();
        match state.timer.take() {
            Some(timer) => {
                timer.abort();
                state.next_sweep_at = None;
                info!("retention scheduler stopped");
            }
            None => debug!("retention scheduler already stopped"),
        }
    }

    /// Runs a sweep immediately and returns its stats. Permitted whether or
    /// not the scheduler is running; blocks while another sweep is in
    /// flight.
    pub async fn trigger(&self) -> SweepStats {
        self.inner.run_sweep().await
    }

    /// Updates the grace period, effective on the next cutoff computation.
    pub fn set_retention_period(&self, period: Duration) -> Result<(), ConfigError> {
        validate_retention_period(period)?;
        self.inner.policy.write().retention_period = period;
        info!(hours = period.num_hours(), "retention period updated");
        Ok(())
    }

    /// Applies the provided policy fields together. Both values are
    /// validated before either is applied, so a rejected update retains the
    /// previous policy in full.
    pub fn update_policy(
        &self,
        retention_period: Option<Duration>,
        sweep_interval: Option<Duration>,
    ) -> Result<(), ConfigError> {
        if let Some(period) = retention_period {
            validate_retention_period(period)?;
        }
        if let Some(interval) = sweep_interval {
            validate_sweep_interval(interval)?;
        }
        if let Some(period) = retention_period {
            self.set_retention_period(period)?;
        }
        if let Some(interval) = sweep_interval {
            self.set_sweep_interval(interval)?;
        }
        Ok(())
    }

    /// Updates the sweep interval. While running, the timer is re-armed so
    /// the next sweep fires a full new interval from now.
    pub fn set_sweep_interval(&self, interval: Duration) -> Result<(), ConfigError> {
        validate_sweep_interval(interval)?;
        self.inner.policy.write().sweep_interval = interval;
        let mut state = self.inner.state.lock();
        if let Some(timer) = state.timer.take() {
            timer.abort();
            self.arm_timer(&mut state);
        }
        info!(hours = interval.num_hours(), "sweep interval updated");
        Ok(())
    }

    /// Arms the recurring timer task. Sweeps run in their own task so that
    /// aborting the timer never interrupts a sweep in flight.
    fn arm_timer(&self, state: &mut TimerState) {
        let interval = self.inner.policy.read().sweep_interval;
        state.next_sweep_at = Some(self.inner.clock.now() + interval);

        let scheduler = self.clone();
        state.timer = Some(tokio::spawn(async move {
            loop {
                let interval = scheduler.inner.policy.read().sweep_interval;
                let sleep_for = interval.to_std().unwrap_or_default();
                tokio::time::sleep(sleep_for).await;

                {
                    let interval = scheduler.inner.policy.read().sweep_interval;
                    let mut state = scheduler.inner.state.lock();
                    state.next_sweep_at = Some(scheduler.inner.clock.now() + interval);
                }
                scheduler.spawn_sweep();
            }
        }));
    }

    /// Fires one sweep as a fire-and-forget task and logs its outcome. A
    /// panic inside the sweep is contained here so the timer loop survives.
    fn spawn_sweep(&self) {
        let scheduler = self.clone();
        tokio::spawn(async move {
            let sweep = tokio::spawn({
                let scheduler = scheduler.clone();
                async move { scheduler.inner.run_sweep().await }
            });
            match sweep.await {
                Ok(stats) => {
                    if stats.has_errors() {
                        warn!(
                            total = stats.total_deleted,
                            errors = stats.errors.len(),
                            "scheduled sweep finished with errors"
                        );
                    } else if stats.has_deletions() {
                        info!(total = stats.total_deleted, "scheduled sweep finished");
                    } else {
                        debug!("scheduled sweep finished, nothing to erase");
                    }
                }
                Err(err) => error!(error = %err, "scheduled sweep aborted"),
            }
        });
    }
}

impl SchedulerInner {
    async fn run_sweep(&self) -> SweepStats {
        let _gate = self.sweep_gate.lock().await;
        let policy = *self.policy.read();
        self.engine.sweep(&policy).await
    }
}
