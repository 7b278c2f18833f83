//! Request extractors that reject with [`crate::error::AppError`].

mod id;
mod json;

pub use id::EntityId;
pub use json::ValidJson;
