//! S3 (or S3-compatible) implementation of [`BlobStore`].

use super::{BlobError, BlobStore, PublicUrlBase};
use crate::settings::StorageSettings;
use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use axum::body::Bytes;

const FALLBACK_REGION: &str = "us-east-1";

#[derive(Clone, Debug)]
pub struct S3BlobStore {
    client: Client,
    bucket: String,
    public_base: PublicUrlBase,
}

impl S3BlobStore {
    /// Client from the AWS default credential/region chain, with overrides from settings.
    pub async fn from_settings(settings: &StorageSettings) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = &settings.region {
            loader = loader.region(Region::new(region.clone()));
        }
        let sdk_config = loader.load().await;

        let mut builder = aws_sdk_s3::config::Builder::from(&sdk_config);
        if let Some(endpoint) = &settings.endpoint {
            builder = builder.endpoint_url(endpoint).force_path_style(true);
        }
        let client = Client::from_conf(builder.build());

        let region = sdk_config
            .region()
            .map(|r| r.as_ref().to_string())
            .unwrap_or_else(|| FALLBACK_REGION.to_string());
        let public_base = match (&settings.public_base_url, &settings.endpoint) {
            (Some(base), _) => PublicUrlBase::Custom(base.clone()),
            (None, Some(endpoint)) => PublicUrlBase::PathStyle {
                endpoint: endpoint.clone(),
                bucket: settings.bucket.clone(),
            },
            (None, None) => PublicUrlBase::VirtualHosted {
                bucket: settings.bucket.clone(),
                region,
            },
        };
        tracing::info!(bucket = %settings.bucket, "blob store configured");

        Self::new(client, settings.bucket.clone(), public_base)
    }

    pub fn new(client: Client, bucket: String, public_base: PublicUrlBase) -> Self {
        Self {
            client,
            bucket,
            public_base,
        }
    }
}

#[async_trait]
impl BlobStore for S3BlobStore {
    async fn put(&self, key: &str, content_type: Option<&str>, body: Bytes) -> Result<String, BlobError> {
        let size = body.len();
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .set_content_type(content_type.map(String::from))
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(|e| BlobError::Upload {
                key: key.to_string(),
                message: DisplayErrorContext(&e).to_string(),
            })?;
        tracing::info!(bucket = %self.bucket, key = %key, size, "uploaded object");
        Ok(self.public_base.url_for(key))
    }

    async fn delete(&self, key: &str) -> Result<(), BlobError> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| BlobError::Delete {
                key: key.to_string(),
                message: DisplayErrorContext(&e).to_string(),
            })?;
        tracing::info!(bucket = %self.bucket, key = %key, "deleted object");
        Ok(())
    }
}
