//! Blob store client: uploads a file under a key and returns its public URL.

mod s3;

pub use s3::S3BlobStore;

use crate::error::{Classify, ErrorKind};
use async_trait::async_trait;
use axum::body::Bytes;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BlobError {
    #[error("upload of '{key}' failed: {message}")]
    Upload { key: String, message: String },
    #[error("delete of '{key}' failed: {message}")]
    Delete { key: String, message: String },
}

impl Classify for BlobError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::UpstreamUnavailable
    }
}

#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store `body` under `key`; returns the publicly resolvable URL.
    async fn put(&self, key: &str, content_type: Option<&str>, body: Bytes) -> Result<String, BlobError>;

    async fn delete(&self, key: &str) -> Result<(), BlobError>;
}

/// `<prefix>/<millis>_<basename>`. Directory parts of the client filename are dropped.
pub fn object_key(prefix: &str, millis: i64, file_name: &str) -> String {
    let base = file_name
        .rsplit(['/', '\\'])
        .next()
        .map(str::trim)
        .filter(|s| !s.is_empty() && *s != "." && *s != "..")
        .unwrap_or("upload");
    format!("{}/{}_{}", prefix, millis, base)
}

/// Where an uploaded object can be fetched from.
#[derive(Clone, Debug)]
pub enum PublicUrlBase {
    /// Explicit base (CDN or website endpoint); the key is appended.
    Custom(String),
    /// Path-style custom endpoint: `<endpoint>/<bucket>/<key>`.
    PathStyle { endpoint: String, bucket: String },
    /// AWS virtual-hosted style: `https://<bucket>.s3.<region>.amazonaws.com/<key>`.
    VirtualHosted { bucket: String, region: String },
}

impl PublicUrlBase {
    pub fn url_for(&self, key: &str) -> String {
        let key = encode_key(key);
        match self {
            PublicUrlBase::Custom(base) => format!("{}/{}", base.trim_end_matches('/'), key),
            PublicUrlBase::PathStyle { endpoint, bucket } => {
                format!("{}/{}/{}", endpoint.trim_end_matches('/'), bucket, key)
            }
            PublicUrlBase::VirtualHosted { bucket, region } => {
                format!("https://{}.s3.{}.amazonaws.com/{}", bucket, region, key)
            }
        }
    }
}

fn encode_key(key: &str) -> String {
    key.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}
