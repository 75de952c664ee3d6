pub(crate) mod camera;
pub(crate) mod driver;
pub(crate) mod frame;
pub(crate) mod sequencer;
