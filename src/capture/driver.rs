use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Notify;

use crate::booth::Booth;
use crate::capture::camera::VideoSource;
use crate::capture::sequencer::{RequestOutcome, TickOutcome};
use crate::foundation::error::SnapResult;

/// Cloneable handle that aborts a running countdown.
///
/// Only a countdown already in flight is affected; a cancel with nothing running is dropped.
#[derive(Clone, Debug, Default)]
pub struct CancelHandle {
    notify: Arc<Notify>,
}

impl CancelHandle {
    /// Fresh handle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.notify.notify_waiters();
    }
}

/// How a driven countdown ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CountdownOutcome {
    /// The countdown elapsed and the shot was attempted.
    Finished(TickOutcome),
    /// The countdown was cancelled; no slot was written.
    Cancelled,
    /// The request did not start a countdown.
    NotStarted(RequestOutcome),
}

/// Drives a booth countdown with a real timer.
#[derive(Clone, Copy, Debug)]
pub struct CountdownDriver {
    tick: Duration,
}

impl Default for CountdownDriver {
    fn default() -> Self {
        Self {
            tick: Duration::from_secs(1),
        }
    }
}

impl CountdownDriver {
    /// Driver ticking every `tick` instead of every second.
    pub fn with_tick(tick: Duration) -> Self {
        Self { tick }
    }

    /// Request a capture on `booth` and tick it until the shot is taken or `cancel` fires.
    pub async fn run<V: VideoSource>(
        &self,
        booth: &mut Booth<V>,
        cancel: &CancelHandle,
    ) -> SnapResult<CountdownOutcome> {
        match booth.request_capture() {
            RequestOutcome::Started { .. } => {}
            other => return Ok(CountdownOutcome::NotStarted(other)),
        }

        let cancelled = cancel.notify.notified();
        tokio::pin!(cancelled);
        cancelled.as_mut().enable();

        loop {
            tokio::select! {
                biased;

                _ = &mut cancelled => {
                    booth.cancel_countdown();
                    return Ok(CountdownOutcome::Cancelled);
                }

                _ = tokio::time::sleep(self.tick) => {
                    match booth.tick()? {
                        TickOutcome::Counting { .. } => continue,
                        other => return Ok(CountdownOutcome::Finished(other)),
                    }
                }
            }
        }
    }
}
