pub(crate) mod catalog;
pub(crate) mod session;
pub(crate) mod viewport;
