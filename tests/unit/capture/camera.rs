use std::cell::RefCell;
use std::rc::Rc;

use super::*;
use crate::capture::frame::VideoFrame;

#[derive(Default)]
struct Log {
    opened: Vec<FacingMode>,
    released: Vec<FacingMode>,
}

struct FakeStream(FacingMode);

impl FrameSource for FakeStream {
    fn frame_size(&self) -> (u32, u32) {
        (4, 4)
    }

    fn grab_frame(&mut self) -> SnapResult<VideoFrame> {
        Ok(VideoFrame::solid(4, 4, [0, 0, 0, 255]))
    }
}

struct FakeSource {
    log: Rc<RefCell<Log>>,
    deny: Option<CameraError>,
}

impl VideoSource for FakeSource {
    type Stream = FakeStream;

    fn get_stream(&mut self, facing: FacingMode) -> Result<FakeStream, CameraError> {
        if let Some(e) = self.deny {
            return Err(e);
        }
        self.log.borrow_mut().opened.push(facing);
        Ok(FakeStream(facing))
    }

    fn release_stream(&mut self, stream: FakeStream) {
        self.log.borrow_mut().released.push(stream.0);
    }
}

#[test]
fn facing_change_releases_then_reacquires() {
    let log = Rc::new(RefCell::new(Log::default()));
    let mut cam = Camera::new(
        FakeSource {
            log: log.clone(),
            deny: None,
        },
        FacingMode::Front,
    );
    cam.start().unwrap();
    cam.start().unwrap();
    assert!(cam.is_ready());
    cam.set_facing(FacingMode::Back).unwrap();
    assert_eq!(cam.facing(), FacingMode::Back);
    assert!(cam.frame_source().is_some());

    drop(cam);
    let log = log.borrow();
    assert_eq!(log.opened, vec![FacingMode::Front, FacingMode::Back]);
    assert_eq!(log.released, vec![FacingMode::Front, FacingMode::Back]);
}

#[test]
fn denied_camera_reports_error_and_stays_closed() {
    let log = Rc::new(RefCell::new(Log::default()));
    let mut cam = Camera::new(
        FakeSource {
            log,
            deny: Some(CameraError::PermissionDenied),
        },
        FacingMode::Front,
    );
    assert!(matches!(
        cam.start(),
        Err(crate::SnapError::Camera(CameraError::PermissionDenied))
    ));
    assert!(!cam.is_ready());
    assert!(cam.frame_source().is_none());
}
