//! Single-region deployment pipeline

use crate::error::{DeployError, Result};
use crate::poller::PollConfig;
use crate::progress::{Progress, Reporter};
use crate::stack::converge_stack;
use crate::target::DeployTarget;
use lambda_deploy_cloud::{ActionType, ArtifactStream, BlobStore, FunctionUpdate, RegionClients};
use lambda_deploy_config::DeployConfig;
use std::path::Path;

/// Outcome of one region's deployment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionReport {
    pub target: DeployTarget,

    /// Whether the code bucket had to be created
    pub bucket_created: bool,

    /// What convergence did to the stack
    pub stack_action: ActionType,

    pub function_name: String,

    /// Version published by the function update, if the provider returned one
    pub version: Option<String>,
}

/// Make sure `bucket` exists; returns true if it was created
///
/// Only a `NotFound` probe result leads to creation. Any other probe failure
/// (e.g. the bucket exists under another owner) is returned as is.
pub async fn ensure_bucket(
    blobs: &dyn BlobStore,
    bucket: &str,
    reporter: &dyn Reporter,
) -> Result<bool> {
    match blobs.head_bucket(bucket).await {
        Ok(()) => {
            tracing::debug!("Bucket {} exists", bucket);
            Ok(false)
        }
        Err(e) if e.is_not_found() => {
            reporter.report(&Progress::BucketCreating {
                bucket: bucket.to_string(),
            });
            blobs.create_bucket(bucket).await?;
            Ok(true)
        }
        Err(e) => Err(e.into()),
    }
}

/// Run ensure-bucket → upload → converge-stack → update-function-code
///
/// Each step needs the previous one to have succeeded; the first failure
/// ends the region.
pub async fn deploy_region(
    clients: &RegionClients,
    config: &DeployConfig,
    target: &DeployTarget,
    artifact: &Path,
    poll: &PollConfig,
    reporter: &dyn Reporter,
) -> Result<RegionReport> {
    reporter.report(&Progress::RegionStarted {
        region: target.region.clone(),
    });

    let bucket_created = ensure_bucket(clients.blobs.as_ref(), &target.bucket, reporter).await?;

    // Each region gets its own stream; an upload consumes it.
    let body = ArtifactStream::open(artifact)
        .await
        .map_err(|source| DeployError::Artifact {
            path: artifact.to_path_buf(),
            source,
        })?;
    reporter.report(&Progress::Uploading {
        bucket: target.bucket.clone(),
        key: target.key.clone(),
    });
    clients
        .blobs
        .put_object(&target.bucket, &target.key, body)
        .await?;

    let convergence = converge_stack(
        clients.stacks.as_ref(),
        target,
        &config.cloud_formation,
        poll,
        reporter,
    )
    .await?;

    reporter.report(&Progress::FunctionUpdating {
        function: convergence.function_name.clone(),
        bucket: target.bucket.clone(),
        key: target.key.clone(),
    });
    let version = clients
        .functions
        .update_function_code(&FunctionUpdate {
            function_name: convergence.function_name.clone(),
            s3_bucket: target.bucket.clone(),
            s3_key: target.key.clone(),
            publish: true,
        })
        .await?;

    reporter.report(&Progress::RegionFinished {
        region: target.region.clone(),
        version: version.clone(),
    });

    Ok(RegionReport {
        target: target.clone(),
        bucket_created,
        stack_action: convergence.action,
        function_name: convergence.function_name,
        version,
    })
}
