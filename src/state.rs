//! Shared application state for all routes. Collaborators are injected as trait objects.

use crate::blob::BlobStore;
use crate::store::EventStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn EventStore>,
    pub blobs: Arc<dyn BlobStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn EventStore>, blobs: Arc<dyn BlobStore>) -> Self {
        Self { store, blobs }
    }
}
