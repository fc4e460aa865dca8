use std::{future::Future, time::Duration};

use tokio::{
    task::JoinHandle,
    time::{Instant, sleep_until},
};

/// Refreshes are due this many seconds before the provider-declared expiry.
pub const REFRESH_MARGIN_SECS: u64 = 60;

/// Delay until the refresh of a freshly issued token.
pub fn refresh_delay(expires_in: u64) -> Duration {
    Duration::from_secs(expires_in.saturating_sub(REFRESH_MARGIN_SECS))
}

/// Delay until the refresh of a token restored from storage.
///
/// When the issue time is known the delay is measured from it, so a TTL that
/// elapsed between runs yields a zero delay. Without it the TTL is taken at
/// face value from `now`.
pub fn restored_refresh_delay(expires_in: u64, obtained_at: Option<i64>, now: i64) -> Duration {
    let Some(obtained_at) = obtained_at else {
        return refresh_delay(expires_in);
    };
    let due = obtained_at
        .saturating_add(i64::try_from(expires_in).unwrap_or(i64::MAX))
        .saturating_sub(REFRESH_MARGIN_SECS as i64);
    Duration::from_secs(due.saturating_sub(now).max(0) as u64)
}

/// A single pending refresh, owned by the session manager.
///
/// Dropping the task aborts it unless it was detached first. A task detaches
/// itself once it starts running so that arming its successor does not abort
/// the refresh in flight.
pub struct RefreshTask {
    due_at: Instant,
    handle: Option<JoinHandle<()>>,
}

impl RefreshTask {
    pub fn spawn<F>(delay: Duration, job: F) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let due_at = Instant::now() + delay;
        let handle = tokio::spawn(async move {
            sleep_until(due_at).await;
            job.await;
        });
        Self {
            due_at,
            handle: Some(handle),
        }
    }

    pub fn remaining(&self) -> Duration {
        self.due_at.saturating_duration_since(Instant::now())
    }

    pub fn cancel(mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }

    pub fn detach(mut self) {
        self.handle.take();
    }
}

impl Drop for RefreshTask {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}
