use std::collections::VecDeque;

use crate::assets::encoded::{EncodedImage, ImageEncoding};
use crate::assets::source::AssetSource;
use crate::capture::camera::{Camera, VideoSource};
use crate::capture::sequencer::{CaptureSequencer, RequestOutcome, SequencerState, TickOutcome};
use crate::collage::config::{CollageConfig, CountdownSecs, FacingMode, SlotCount};
use crate::collage::model::CollageModel;
use crate::collage::sheet::{SheetOptions, export_collage_sheet};
use crate::editor::session::EditorSession;
use crate::export::{ExportSink, collage_file_name, slot_file_name};
use crate::foundation::error::{CameraError, SnapError, SnapResult};

/// Something the UI should react to, in the order it happened.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BoothEvent {
    /// A camera stream opened.
    CameraStarted {
        /// Camera in use.
        facing: FacingMode,
    },
    /// The camera could not be opened.
    CameraFailed(CameraError),
    /// A countdown started.
    CountdownStarted {
        /// Slot the shot will be written to.
        target: usize,
        /// Countdown length in seconds.
        seconds: u32,
    },
    /// One second of the countdown elapsed.
    CountdownTick {
        /// Seconds left.
        remaining: u32,
    },
    /// The running countdown was discarded.
    CountdownCancelled,
    /// A photo was taken; show the shutter flash.
    Flash {
        /// Slot that received the photo.
        slot: usize,
    },
    /// No frame was available when the countdown ended.
    CaptureFailed {
        /// Slot the shot was meant for.
        target: usize,
    },
    /// Every slot holds a photo.
    Complete,
    /// All slots were cleared.
    SessionReset,
    /// An edited photo replaced a slot.
    EditCommitted {
        /// Slot that was replaced.
        slot: usize,
    },
}

/// One photobooth session: camera, collage, capture sequence and the open editor.
pub struct Booth<V: VideoSource> {
    config: CollageConfig,
    collage: CollageModel,
    sequencer: CaptureSequencer,
    camera: Camera<V>,
    capture_encoding: ImageEncoding,
    editor: Option<(usize, EditorSession)>,
    events: VecDeque<BoothEvent>,
}

impl<V: VideoSource> Booth<V> {
    /// New session over `source`; the camera is not opened until [`Booth::start`].
    pub fn new(source: V, config: CollageConfig) -> SnapResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            collage: CollageModel::new(config.slot_count),
            sequencer: CaptureSequencer::new(config.countdown),
            camera: Camera::new(source, config.facing),
            capture_encoding: ImageEncoding::default(),
            editor: None,
            events: VecDeque::new(),
        })
    }

    /// Codec for captured photos.
    pub fn set_capture_encoding(&mut self, encoding: ImageEncoding) {
        self.capture_encoding = encoding;
    }

    /// Open the camera.
    pub fn start(&mut self) -> SnapResult<()> {
        let res = self.camera.start();
        self.push_camera_event(&res);
        res
    }

    /// Current settings.
    pub fn config(&self) -> CollageConfig {
        self.config
    }

    /// Captured photos.
    pub fn collage(&self) -> &CollageModel {
        &self.collage
    }

    /// Capture progress.
    pub fn state(&self) -> SequencerState {
        self.sequencer.state()
    }

    /// Whether a camera stream is open.
    pub fn camera_ready(&self) -> bool {
        self.camera.is_ready()
    }

    /// The camera collaborator.
    pub fn video_source(&self) -> &V {
        self.camera.source()
    }

    /// Take all pending events.
    pub fn drain_events(&mut self) -> Vec<BoothEvent> {
        self.events.drain(..).collect()
    }

    /// Start a countdown, or clear a completed collage.
    ///
    /// Without an open camera a new countdown is not started.
    pub fn request_capture(&mut self) -> RequestOutcome {
        let starting = self.sequencer.state() == SequencerState::Idle;
        if starting && !self.camera.is_ready() {
            tracing::warn!("capture requested without an open camera");
            return RequestOutcome::Ignored;
        }

        let outcome = self.sequencer.request_capture(&mut self.collage);
        match outcome {
            RequestOutcome::Started { target, countdown } => {
                self.events.push_back(BoothEvent::CountdownStarted {
                    target,
                    seconds: countdown,
                })
            }
            RequestOutcome::Reset => {
                self.editor = None;
                self.events.push_back(BoothEvent::SessionReset);
            }
            RequestOutcome::Ignored => {}
        }
        outcome
    }

    /// Advance the countdown by one second, taking the shot when it runs out.
    ///
    /// Slot faults reset the whole session before the error is returned.
    pub fn tick(&mut self) -> SnapResult<TickOutcome> {
        let facing = self.camera.facing();
        let res = self.sequencer.tick(
            &mut self.collage,
            self.camera.frame_source(),
            facing,
            self.capture_encoding,
        );

        match res {
            Ok(outcome) => {
                match outcome {
                    TickOutcome::Idle => {}
                    TickOutcome::Counting { remaining, .. } => {
                        self.events.push_back(BoothEvent::CountdownTick { remaining })
                    }
                    TickOutcome::Captured { slot, complete } => {
                        self.events.push_back(BoothEvent::Flash { slot });
                        if complete {
                            self.events.push_back(BoothEvent::Complete);
                        }
                    }
                    TickOutcome::CaptureFailed { target } => {
                        self.events.push_back(BoothEvent::CaptureFailed { target })
                    }
                }
                Ok(outcome)
            }
            Err(e) if e.is_sequencing_fault() => {
                tracing::warn!(error = %e, "slot fault, resetting session");
                self.reset_session();
                Err(e)
            }
            Err(e) => Err(e),
        }
    }

    /// Discard a running countdown. Returns `true` when one was running.
    pub fn cancel_countdown(&mut self) -> bool {
        let cancelled = self.sequencer.cancel();
        if cancelled {
            self.events.push_back(BoothEvent::CountdownCancelled);
        }
        cancelled
    }

    /// Change the slot count; every captured photo is discarded.
    pub fn set_slot_count(&mut self, slot_count: SlotCount) {
        self.cancel_countdown();
        self.config.slot_count = slot_count;
        self.reset_session();
    }

    /// Change the countdown used from the next request on.
    pub fn set_countdown(&mut self, countdown: CountdownSecs) {
        self.config.countdown = countdown;
        self.sequencer.set_countdown(countdown);
    }

    /// Switch cameras; a running countdown is cancelled first.
    pub fn set_facing(&mut self, facing: FacingMode) -> SnapResult<()> {
        self.cancel_countdown();
        self.config.facing = facing;
        let res = self.camera.set_facing(facing);
        self.push_camera_event(&res);
        res
    }

    /// Switch to the other camera.
    pub fn toggle_facing(&mut self) -> SnapResult<()> {
        self.set_facing(self.config.facing.toggled())
    }

    /// Open the editor on a captured photo, replacing any open editor.
    pub fn open_editor(&mut self, slot: usize) -> SnapResult<&mut EditorSession> {
        let count = self.collage.slot_count().get();
        let image = match self.collage.image(slot) {
            Some(image) => image.clone(),
            None if slot >= count => {
                return Err(SnapError::SlotIndexOutOfRange { index: slot, count });
            }
            None => return Err(SnapError::validation(format!("slot {slot} is empty"))),
        };
        let (_, editor) = self.editor.insert((slot, EditorSession::new(image)));
        Ok(editor)
    }

    /// The open editor and the slot it edits.
    pub fn editor(&mut self) -> Option<(usize, &mut EditorSession)> {
        self.editor.as_mut().map(|(slot, e)| (*slot, e))
    }

    /// Close the editor without saving.
    pub fn close_editor(&mut self) {
        self.editor = None;
    }

    /// Flatten the open edit, write it back to its slot and close the editor.
    pub fn commit_edit(&mut self, assets: &dyn AssetSource) -> SnapResult<EncodedImage> {
        let Some((slot, editor)) = self.editor.as_mut() else {
            return Err(SnapError::validation("no photo is being edited"));
        };
        let slot = *slot;
        let image = editor.commit(assets)?;
        self.collage.replace_slot(slot, image.clone())?;
        self.editor = None;
        self.events.push_back(BoothEvent::EditCommitted { slot });
        Ok(image)
    }

    /// Save one captured photo. Returns `false` when the slot is empty.
    pub fn export_slot(&self, slot: usize, sink: &mut dyn ExportSink, timestamp_ms: u64) -> bool {
        match self.collage.image(slot) {
            Some(image) => {
                sink.save(image, &slot_file_name(slot + 1, timestamp_ms, image.encoding()));
                true
            }
            None => false,
        }
    }

    /// Save every captured photo; returns how many were saved.
    pub fn export_all(&self, sink: &mut dyn ExportSink, timestamp_ms: u64) -> usize {
        (0..self.collage.slots().len())
            .filter(|&slot| self.export_slot(slot, sink, timestamp_ms))
            .count()
    }

    /// Render the collage sheet and save it.
    pub fn export_sheet(
        &self,
        opts: &SheetOptions,
        sink: &mut dyn ExportSink,
        timestamp_ms: u64,
    ) -> SnapResult<EncodedImage> {
        let sheet = export_collage_sheet(&self.collage, opts)?;
        sink.save(&sheet, &collage_file_name(timestamp_ms, sheet.encoding()));
        Ok(sheet)
    }

    fn reset_session(&mut self) {
        self.collage.reset(self.config.slot_count);
        self.sequencer.reset();
        self.editor = None;
        self.events.push_back(BoothEvent::SessionReset);
    }

    fn push_camera_event(&mut self, res: &SnapResult<()>) {
        match res {
            Ok(()) => self.events.push_back(BoothEvent::CameraStarted {
                facing: self.camera.facing(),
            }),
            Err(SnapError::Camera(e)) => self.events.push_back(BoothEvent::CameraFailed(*e)),
            Err(_) => {}
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/booth.rs"]
mod tests;
