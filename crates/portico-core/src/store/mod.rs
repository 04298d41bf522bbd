//! Project registry with `watch`-based change notification.

pub(crate) mod registry;

pub use registry::{ProjectSnapshot, Registry};
