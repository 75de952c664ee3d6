use super::*;
use crate::assets::source::MemoryAssetSource;
use crate::capture::frame::{FrameSource, VideoFrame};
use crate::export::MemorySink;
use crate::foundation::core::Canvas;

struct Stream {
    blank: bool,
}

impl FrameSource for Stream {
    fn frame_size(&self) -> (u32, u32) {
        if self.blank { (0, 0) } else { (8, 6) }
    }

    fn grab_frame(&mut self) -> SnapResult<VideoFrame> {
        if self.blank {
            return Err(SnapError::NoFrameAvailable);
        }
        Ok(VideoFrame::solid(8, 6, [10, 200, 30, 255]))
    }
}

#[derive(Default)]
struct Cam {
    deny: Option<CameraError>,
    blank: bool,
    opened: u32,
    released: u32,
}

impl VideoSource for Cam {
    type Stream = Stream;

    fn get_stream(&mut self, _facing: FacingMode) -> Result<Stream, CameraError> {
        if let Some(e) = self.deny {
            return Err(e);
        }
        self.opened += 1;
        Ok(Stream { blank: self.blank })
    }

    fn release_stream(&mut self, _stream: Stream) {
        self.released += 1;
    }
}

fn booth(slots: SlotCount, countdown: u32) -> Booth<Cam> {
    let config = CollageConfig {
        slot_count: slots,
        countdown: CountdownSecs::new(countdown).unwrap(),
        facing: FacingMode::Front,
    };
    let mut b = Booth::new(Cam::default(), config).unwrap();
    b.set_capture_encoding(ImageEncoding::Png);
    b.start().unwrap();
    b
}

fn shoot(b: &mut Booth<Cam>) -> TickOutcome {
    assert!(matches!(b.request_capture(), RequestOutcome::Started { .. }));
    loop {
        match b.tick().unwrap() {
            TickOutcome::Counting { .. } => continue,
            other => return other,
        }
    }
}

#[test]
fn full_cycle_emits_events_in_order() {
    let mut b = booth(SlotCount::Three, 2);
    assert_eq!(
        b.drain_events(),
        [BoothEvent::CameraStarted {
            facing: FacingMode::Front
        }]
    );

    assert_eq!(
        shoot(&mut b),
        TickOutcome::Captured {
            slot: 0,
            complete: false
        }
    );
    assert_eq!(
        b.drain_events(),
        [
            BoothEvent::CountdownStarted {
                target: 0,
                seconds: 2
            },
            BoothEvent::CountdownTick { remaining: 1 },
            BoothEvent::Flash { slot: 0 },
        ]
    );

    shoot(&mut b);
    shoot(&mut b);
    assert_eq!(b.state(), SequencerState::Complete);
    assert!(b.drain_events().ends_with(&[BoothEvent::Flash { slot: 2 }, BoothEvent::Complete]));

    assert_eq!(b.request_capture(), RequestOutcome::Reset);
    assert_eq!(b.collage().filled(), 0);
    assert_eq!(b.drain_events(), [BoothEvent::SessionReset]);
}

#[test]
fn denied_camera_blocks_capture() {
    let cam = Cam {
        deny: Some(CameraError::PermissionDenied),
        ..Cam::default()
    };
    let mut b = Booth::new(cam, CollageConfig::default()).unwrap();
    assert!(b.start().is_err());
    assert_eq!(
        b.drain_events(),
        [BoothEvent::CameraFailed(CameraError::PermissionDenied)]
    );
    assert_eq!(b.request_capture(), RequestOutcome::Ignored);
    assert_eq!(b.state(), SequencerState::Idle);
}

#[test]
fn missing_frame_is_soft() {
    let cam = Cam {
        blank: true,
        ..Cam::default()
    };
    let mut b = Booth::new(cam, CollageConfig::default()).unwrap();
    b.start().unwrap();
    assert_eq!(shoot(&mut b), TickOutcome::CaptureFailed { target: 0 });
    assert_eq!(b.state(), SequencerState::Idle);
    assert_eq!(b.collage().filled(), 0);
    assert!(b.drain_events().contains(&BoothEvent::CaptureFailed { target: 0 }));
}

#[test]
fn slot_count_change_clears_photos() {
    let mut b = booth(SlotCount::Three, 2);
    shoot(&mut b);
    b.request_capture();
    b.drain_events();

    b.set_slot_count(SlotCount::Six);
    assert_eq!(b.state(), SequencerState::Idle);
    assert_eq!(b.collage().slots().len(), 6);
    assert_eq!(b.collage().filled(), 0);
    assert_eq!(b.config().slot_count, SlotCount::Six);
    assert_eq!(
        b.drain_events(),
        [BoothEvent::CountdownCancelled, BoothEvent::SessionReset]
    );
}

#[test]
fn facing_change_cancels_countdown_and_swaps_stream() {
    let mut b = booth(SlotCount::Four, 3);
    b.request_capture();
    b.toggle_facing().unwrap();
    assert_eq!(b.state(), SequencerState::Idle);
    assert_eq!(b.config().facing, FacingMode::Back);
    assert_eq!((b.video_source().opened, b.video_source().released), (2, 1));
    assert!(b.drain_events().ends_with(&[
        BoothEvent::CountdownCancelled,
        BoothEvent::CameraStarted {
            facing: FacingMode::Back
        }
    ]));
}

#[test]
fn edit_round_trip_replaces_slot() {
    let mut b = booth(SlotCount::Three, 2);
    shoot(&mut b);

    assert!(matches!(b.open_editor(1), Err(SnapError::Validation(_))));
    assert!(matches!(
        b.open_editor(7),
        Err(SnapError::SlotIndexOutOfRange { index: 7, count: 3 })
    ));
    assert!(b.commit_edit(&MemoryAssetSource::new()).is_err());

    let editor = b.open_editor(0).unwrap();
    editor.set_frame("Gold").unwrap();
    assert_eq!(b.editor().map(|(slot, _)| slot), Some(0));

    let edited = b.commit_edit(&MemoryAssetSource::new()).unwrap();
    assert_eq!(b.collage().image(0), Some(&edited));
    assert_eq!(edited.width(), Canvas::EXPORT.width);
    assert!(b.editor().is_none());
    assert!(b.drain_events().contains(&BoothEvent::EditCommitted { slot: 0 }));
}

#[test]
fn exports_use_slot_names() {
    let mut b = booth(SlotCount::Three, 2);
    shoot(&mut b);
    shoot(&mut b);

    let mut sink = MemorySink::new();
    assert_eq!(b.export_all(&mut sink, 99), 2);
    assert!(!b.export_slot(2, &mut sink, 99));
    let names: Vec<_> = sink.saved.iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(names, ["snapjoy-1-99.png", "snapjoy-2-99.png"]);

    let opts = SheetOptions {
        canvas: Canvas::square(60),
        output: ImageEncoding::Png,
        ..SheetOptions::default()
    };
    let sheet = b.export_sheet(&opts, &mut sink, 99).unwrap();
    assert_eq!(sheet.width(), 60);
    assert_eq!(sink.saved[2].0, "snapjoy-collage-99.png");
}
