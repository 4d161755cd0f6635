//! Region connector for AWS

use std::sync::Arc;

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::config::Region;
use lambda_deploy_cloud::{CloudConnector, RegionClients, Result};
use tracing::debug;

use crate::cloudformation::CloudFormationStacks;
use crate::lambda::LambdaFunctions;
use crate::s3::S3BlobStore;

/// Builds S3, CloudFormation and Lambda clients for one region at a time
#[derive(Debug, Clone, Default)]
pub struct AwsConnector {
    profile: Option<String>,
}

impl AwsConnector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a named profile from the shared AWS config instead of the default chain
    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = Some(profile.into());
        self
    }
}

#[async_trait]
impl CloudConnector for AwsConnector {
    fn name(&self) -> &str {
        "aws"
    }

    async fn connect(&self, region: &str) -> Result<RegionClients> {
        debug!(region = %region, profile = ?self.profile, "Loading AWS config");

        let mut loader =
            aws_config::defaults(BehaviorVersion::latest()).region(Region::new(region.to_string()));
        if let Some(profile) = &self.profile {
            loader = loader.profile_name(profile);
        }
        let sdk_config = loader.load().await;

        Ok(RegionClients {
            region: region.to_string(),
            blobs: Arc::new(S3BlobStore::new(aws_sdk_s3::Client::new(&sdk_config), region)),
            stacks: Arc::new(CloudFormationStacks::new(
                aws_sdk_cloudformation::Client::new(&sdk_config),
            )),
            functions: Arc::new(LambdaFunctions::new(aws_sdk_lambda::Client::new(&sdk_config))),
        })
    }
}
