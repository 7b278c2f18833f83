//! Multi-step operations built on the store and blob store.

mod attachment;

pub use attachment::{attach_image, AttachError, Upload};
