use crate::assets::encoded::ImageEncoding;
use crate::capture::frame::{FrameSource, capture_frame};
use crate::collage::config::{CountdownSecs, FacingMode};
use crate::collage::model::CollageModel;
use crate::foundation::error::{SnapError, SnapResult};

/// Progress of a timed multi-shot capture.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub enum SequencerState {
    /// Waiting for a capture request.
    Idle,
    /// Counting down towards the next shot.
    CountingDown {
        /// Seconds left before the shot.
        remaining: u32,
        /// Slot the shot will be written to.
        target: usize,
    },
    /// Taking the shot.
    Capturing {
        /// Slot the shot will be written to.
        target: usize,
    },
    /// Every slot holds a photo.
    Complete,
}

/// Result of [`CaptureSequencer::request_capture`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RequestOutcome {
    /// A countdown started for `target`.
    Started {
        /// Slot the shot will be written to.
        target: usize,
        /// Countdown length in seconds.
        countdown: u32,
    },
    /// A countdown or capture is already running.
    Ignored,
    /// The collage was complete; every slot was cleared.
    Reset,
}

/// Result of one [`CaptureSequencer::tick`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// Nothing is running.
    Idle,
    /// The countdown advanced.
    Counting {
        /// Seconds left before the shot.
        remaining: u32,
        /// Slot the shot will be written to.
        target: usize,
    },
    /// A photo was written to `slot`.
    Captured {
        /// Slot that received the photo.
        slot: usize,
        /// Whether the collage is now full.
        complete: bool,
    },
    /// No frame was available; the sequencer is idle again and no slot changed.
    CaptureFailed {
        /// Slot the shot was meant for.
        target: usize,
    },
}

/// Tick-driven state machine writing one photo per countdown into the lowest empty slot.
#[derive(Clone, Debug)]
pub struct CaptureSequencer {
    state: SequencerState,
    countdown: CountdownSecs,
}

impl CaptureSequencer {
    /// Idle sequencer using `countdown` before each shot.
    pub fn new(countdown: CountdownSecs) -> Self {
        Self {
            state: SequencerState::Idle,
            countdown,
        }
    }

    /// Current state.
    pub fn state(&self) -> SequencerState {
        self.state
    }

    /// Countdown used for the next request.
    pub fn countdown(&self) -> CountdownSecs {
        self.countdown
    }

    /// Change the countdown; a running countdown keeps its remaining time.
    pub fn set_countdown(&mut self, countdown: CountdownSecs) {
        self.countdown = countdown;
    }

    /// Return `true` while a countdown or capture is in flight.
    pub fn is_busy(&self) -> bool {
        matches!(
            self.state,
            SequencerState::CountingDown { .. } | SequencerState::Capturing { .. }
        )
    }

    /// Start a countdown towards the lowest empty slot.
    ///
    /// Requests while busy are ignored. A request on a full collage clears it instead.
    pub fn request_capture(&mut self, collage: &mut CollageModel) -> RequestOutcome {
        if self.is_busy() {
            tracing::debug!(state = ?self.state, "capture request ignored");
            return RequestOutcome::Ignored;
        }

        match (self.state, collage.lowest_empty()) {
            (SequencerState::Idle, Some(target)) => {
                let countdown = self.countdown.get();
                self.state = SequencerState::CountingDown {
                    remaining: countdown,
                    target,
                };
                tracing::debug!(target, countdown, "countdown started");
                RequestOutcome::Started { target, countdown }
            }
            _ => {
                collage.reset(collage.slot_count());
                self.state = SequencerState::Idle;
                tracing::debug!("collage cleared for a new session");
                RequestOutcome::Reset
            }
        }
    }

    /// Advance one second.
    ///
    /// When the countdown reaches zero the shot is taken synchronously from `source`. A missing
    /// source or frame returns the sequencer to idle without touching the collage. Slot faults
    /// are returned as errors after going idle.
    pub fn tick(
        &mut self,
        collage: &mut CollageModel,
        source: Option<&mut dyn FrameSource>,
        facing: FacingMode,
        encoding: ImageEncoding,
    ) -> SnapResult<TickOutcome> {
        let SequencerState::CountingDown { remaining, target } = self.state else {
            return Ok(TickOutcome::Idle);
        };

        if remaining > 1 {
            let remaining = remaining - 1;
            self.state = SequencerState::CountingDown { remaining, target };
            return Ok(TickOutcome::Counting { remaining, target });
        }

        self.state = SequencerState::Capturing { target };
        let shot = match source {
            Some(source) => capture_frame(source, facing, encoding),
            None => Err(SnapError::NoFrameAvailable),
        };

        let image = match shot {
            Ok(image) => image,
            Err(SnapError::NoFrameAvailable) => {
                tracing::warn!(target, "no frame available, capture skipped");
                self.state = SequencerState::Idle;
                return Ok(TickOutcome::CaptureFailed { target });
            }
            Err(e) => {
                self.state = SequencerState::Idle;
                return Err(e);
            }
        };

        if let Err(e) = collage.write_slot(target, image) {
            self.state = SequencerState::Idle;
            return Err(e);
        }

        let complete = collage.is_complete();
        self.state = if complete {
            SequencerState::Complete
        } else {
            SequencerState::Idle
        };
        tracing::debug!(slot = target, complete, "slot captured");
        Ok(TickOutcome::Captured {
            slot: target,
            complete,
        })
    }

    /// Abandon a running countdown without writing anything.
    ///
    /// Returns `true` when a countdown was discarded.
    pub fn cancel(&mut self) -> bool {
        if let SequencerState::CountingDown { target, .. } = self.state {
            tracing::debug!(target, "countdown cancelled");
            self.state = SequencerState::Idle;
            true
        } else {
            false
        }
    }

    /// Return to idle, forgetting a completed run.
    pub fn reset(&mut self) {
        self.state = SequencerState::Idle;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/capture/sequencer.rs"]
mod tests;
