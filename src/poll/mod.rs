//! Cancellable fixed-interval polling for the read-mostly views.
//!
//! Each poller is a tokio task that fetches its target, takes the state lock,
//! and applies the result only while its captured epoch is still current.
//! Awaiting the fetch inside the tick loop serializes polls, so a slow
//! response never overlaps the next one; missed ticks are delayed, not
//! bursted. Stopping a poller aborts the task, and a bumped epoch makes any
//! response already in flight land on the floor instead of in state.

use crate::api::{ApiError, Backend};
use crate::state::State;
use log::*;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// How often each view refreshes.
pub const CAMPAIGN_POLL_PERIOD: Duration = Duration::from_secs(5);
pub const SCHEDULED_JOB_POLL_PERIOD: Duration = Duration::from_secs(10);
pub const INBOX_POLL_PERIOD: Duration = Duration::from_secs(5);

/// Epoch bucket a poll target belongs to.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PollKind {
    Campaigns = 0,
    ScheduledJobs = 1,
    Inbox = 2,
}

impl PollKind {
    pub const COUNT: usize = 3;
}

/// What a poller fetches and where it lands in state.
///
#[derive(Clone, Debug)]
pub enum PollTarget {
    Campaigns,
    ScheduledJobs,
    Messages { account_id: i64, peer_id: i64 },
}

impl PollTarget {
    pub fn kind(&self) -> PollKind {
        match self {
            PollTarget::Campaigns => PollKind::Campaigns,
            PollTarget::ScheduledJobs => PollKind::ScheduledJobs,
            PollTarget::Messages { .. } => PollKind::Inbox,
        }
    }

    fn default_period(&self) -> Duration {
        match self {
            PollTarget::Campaigns => CAMPAIGN_POLL_PERIOD,
            PollTarget::ScheduledJobs => SCHEDULED_JOB_POLL_PERIOD,
            PollTarget::Messages { .. } => INBOX_POLL_PERIOD,
        }
    }
}

/// Handle to a running poll task. Dropping the handle cancels the task.
///
pub struct Poller {
    handle: JoinHandle<()>,
}

impl Poller {
    /// Spawn a poller for the target at its default period. Must be called
    /// from within a tokio runtime.
    ///
    pub fn spawn(state: Arc<Mutex<State>>, backend: Backend, target: PollTarget) -> Poller {
        let period = target.default_period();
        Self::spawn_with_period(state, backend, target, period)
    }

    /// Spawn with an explicit period.
    ///
    pub fn spawn_with_period(
        state: Arc<Mutex<State>>,
        backend: Backend,
        target: PollTarget,
        period: Duration,
    ) -> Poller {
        debug!("Starting poller for {:?} every {:?}...", target, period);
        let handle = tokio::spawn(async move {
            // The epoch this poller belongs to; once it moves on, every
            // later response is stale by definition.
            let epoch = state.lock().await.poll_epoch(target.kind());
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                match Self::fetch_and_apply(&state, &backend, &target, epoch).await {
                    Ok(true) => {}
                    Ok(false) => {
                        debug!("Poller for {:?} superseded, exiting.", target);
                        break;
                    }
                    // Background fetch failures are logged only; passive
                    // monitoring views should not raise notifications.
                    Err(e) => warn!("Poll for {:?} failed: {}", target, e),
                }
            }
        });
        Poller { handle }
    }

    /// Cancel the poll task.
    ///
    pub fn stop(&self) {
        self.handle.abort();
    }

    /// Fetch the target and apply it to state. Returns `Ok(false)` when the
    /// epoch has moved on and the poller should exit without applying.
    ///
    async fn fetch_and_apply(
        state: &Arc<Mutex<State>>,
        backend: &Backend,
        target: &PollTarget,
        epoch: u64,
    ) -> Result<bool, ApiError> {
        match target {
            PollTarget::Campaigns => {
                let campaigns = backend.campaigns().await?;
                let mut state = state.lock().await;
                if state.poll_epoch(PollKind::Campaigns) != epoch {
                    return Ok(false);
                }
                state.set_campaigns(campaigns);
            }
            PollTarget::ScheduledJobs => {
                let jobs = backend.scheduled_jobs().await?;
                let mut state = state.lock().await;
                if state.poll_epoch(PollKind::ScheduledJobs) != epoch {
                    return Ok(false);
                }
                state.set_scheduled_jobs(jobs);
            }
            PollTarget::Messages {
                account_id,
                peer_id,
            } => {
                let messages = backend.messages(*account_id, *peer_id).await?;
                let mut state = state.lock().await;
                if state.poll_epoch(PollKind::Inbox) != epoch {
                    return Ok(false);
                }
                state.set_messages(messages);
            }
        }
        Ok(true)
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
