pub(crate) mod filter;
pub(crate) mod frame_style;
pub(crate) mod plan;
pub(crate) mod spec;
