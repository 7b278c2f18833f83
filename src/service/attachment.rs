//! Image attachment: upload the file, then point the entity row at its URL.
//! If the row update fails or matches nothing, the uploaded object is deleted again.

use crate::blob::{object_key, BlobError, BlobStore};
use crate::error::{Classify, ErrorKind};
use crate::models::ImageTarget;
use crate::store::{EventStore, StoreError};
use axum::body::Bytes;
use thiserror::Error;

/// A single file received from a multipart form.
#[derive(Clone, Debug)]
pub struct Upload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub body: Bytes,
}

#[derive(Error, Debug)]
pub enum AttachError {
    #[error(transparent)]
    Upload(#[from] BlobError),
    #[error("saving url for {table} {id}: {source}")]
    Persist {
        table: &'static str,
        id: i64,
        #[source]
        source: StoreError,
    },
    #[error("{table} {id} does not exist")]
    Missing { table: &'static str, id: i64 },
}

impl Classify for AttachError {
    fn kind(&self) -> ErrorKind {
        match self {
            AttachError::Upload(e) => e.kind(),
            AttachError::Persist { source, .. } => source.kind(),
            AttachError::Missing { .. } => ErrorKind::NotFound,
        }
    }
}

/// Upload `upload` for the row `id` of `target` and store its URL there. Returns the URL.
pub async fn attach_image(
    store: &dyn EventStore,
    blobs: &dyn BlobStore,
    target: ImageTarget,
    id: i64,
    upload: Upload,
) -> Result<String, AttachError> {
    let key = object_key(
        target.key_prefix(),
        chrono::Utc::now().timestamp_millis(),
        &upload.file_name,
    );
    let url = blobs
        .put(&key, upload.content_type.as_deref(), upload.body)
        .await?;

    let outcome = match store.set_image_url(target, id, &url).await {
        Ok(0) => Err(AttachError::Missing {
            table: target.table(),
            id,
        }),
        Ok(_) => Ok(url),
        Err(source) => Err(AttachError::Persist {
            table: target.table(),
            id,
            source,
        }),
    };

    if outcome.is_err() {
        if let Err(e) = blobs.delete(&key).await {
            tracing::warn!(error = %e, key = %key, "could not remove orphaned upload");
        }
    }
    outcome
}
