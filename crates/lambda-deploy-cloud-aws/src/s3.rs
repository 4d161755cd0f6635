//! S3 artifact storage

use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::error::ProvideErrorMetadata;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{BucketCannedAcl, BucketLocationConstraint, CreateBucketConfiguration};
use lambda_deploy_cloud::{ArtifactStream, BlobStore, CloudError, ErrorKind, Result};
use tracing::debug;

use crate::error::{is_missing_bucket_code, remote_error};

/// Region with no location constraint on CreateBucket
const DEFAULT_REGION: &str = "us-east-1";

/// `BlobStore` backed by one regional S3 client
#[derive(Debug, Clone)]
pub struct S3BlobStore {
    client: Client,
    region: String,
}

impl S3BlobStore {
    pub fn new(client: Client, region: impl Into<String>) -> Self {
        Self {
            client,
            region: region.into(),
        }
    }

    fn location_constraint(&self) -> Option<CreateBucketConfiguration> {
        if self.region == DEFAULT_REGION {
            return None;
        }
        Some(
            CreateBucketConfiguration::builder()
                .location_constraint(BucketLocationConstraint::from(self.region.as_str()))
                .build(),
        )
    }
}

#[async_trait]
impl BlobStore for S3BlobStore {
    async fn head_bucket(&self, bucket: &str) -> Result<()> {
        debug!(bucket = %bucket, "HeadBucket");
        match self.client.head_bucket().bucket(bucket).send().await {
            Ok(_) => Ok(()),
            Err(err) => {
                let missing = err
                    .as_service_error()
                    .map(|e| e.is_not_found())
                    .unwrap_or(false)
                    || is_missing_bucket_code(err.code());
                let kind = if missing {
                    ErrorKind::NotFound
                } else {
                    ErrorKind::Other
                };
                Err(remote_error("HeadBucket", kind, &err))
            }
        }
    }

    async fn create_bucket(&self, bucket: &str) -> Result<()> {
        debug!(bucket = %bucket, region = %self.region, "CreateBucket");
        self.client
            .create_bucket()
            .bucket(bucket)
            .acl(BucketCannedAcl::Private)
            .set_create_bucket_configuration(self.location_constraint())
            .send()
            .await
            .map_err(|err| remote_error("CreateBucket", ErrorKind::Other, &err))?;
        Ok(())
    }

    async fn put_object(&self, bucket: &str, key: &str, body: ArtifactStream) -> Result<()> {
        debug!(bucket = %bucket, key = %key, size = body.len(), "PutObject");
        let len = body.len();
        let stream = ByteStream::read_from()
            .file(body.into_file())
            .build()
            .await
            .map_err(|e| CloudError::other("PutObject", e.to_string()))?;

        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .content_length(len as i64)
            .body(stream)
            .send()
            .await
            .map_err(|err| remote_error("PutObject", ErrorKind::Other, &err))?;
        Ok(())
    }
}
