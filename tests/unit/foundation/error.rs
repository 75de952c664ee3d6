use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        SnapError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(SnapError::asset("x").to_string().contains("asset error:"));
    assert!(SnapError::render("x").to_string().contains("render error:"));
    assert!(
        SnapError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn camera_errors_convert_and_display() {
    let err: SnapError = CameraError::PermissionDenied.into();
    assert!(matches!(
        err,
        SnapError::Camera(CameraError::PermissionDenied)
    ));
    assert!(err.to_string().contains("permission denied"));
}

#[test]
fn slot_errors_are_sequencing_faults() {
    assert!(SnapError::SlotIndexOutOfRange { index: 3, count: 3 }.is_sequencing_fault());
    assert!(SnapError::SlotAlreadyFilled { index: 0 }.is_sequencing_fault());
    assert!(!SnapError::NoFrameAvailable.is_sequencing_fault());
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = SnapError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
