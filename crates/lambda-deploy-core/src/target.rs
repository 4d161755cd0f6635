//! Per-region deployment targets

use lambda_deploy_cloud::StackParameter;
use serde::Serialize;

const ARTIFACT_EXTENSION: &str = "jar";

/// Everything region-specific about one deployment
///
/// All names are pure functions of (app name, environment, region).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeployTarget {
    pub region: String,
    pub environment: String,

    /// `{app}-{env}-{region}`
    pub bucket: String,

    /// `{app}-{env}.jar`
    pub key: String,

    /// `{app}-{region}-{env}`
    pub stack_name: String,
}

impl DeployTarget {
    pub fn new(app_name: &str, environment: &str, region: &str) -> Self {
        Self {
            region: region.to_string(),
            environment: environment.to_string(),
            bucket: format!("{}-{}-{}", app_name, environment, region),
            key: format!("{}-{}.{}", app_name, environment, ARTIFACT_EXTENSION),
            stack_name: format!("{}-{}-{}", app_name, region, environment),
        }
    }

    /// Stack parameters passed on create and update
    pub fn parameters(&self) -> Vec<StackParameter> {
        vec![
            StackParameter::new("Environment", &self.environment),
            StackParameter::new("Region", &self.region),
            StackParameter::new("S3Bucket", &self.bucket),
            StackParameter::new("S3Key", &self.key),
        ]
    }

    /// `s3://bucket/key`
    pub fn object_url(&self) -> String {
        format!("s3://{}/{}", self.bucket, self.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_names() {
        let target = DeployTarget::new("svc", "prod", "us-east-1");
        assert_eq!(target.bucket, "svc-prod-us-east-1");
        assert_eq!(target.key, "svc-prod.jar");
        assert_eq!(target.stack_name, "svc-us-east-1-prod");
        assert_eq!(target.object_url(), "s3://svc-prod-us-east-1/svc-prod.jar");
    }

    #[test]
    fn test_names_are_deterministic() {
        assert_eq!(
            DeployTarget::new("svc", "dev", "eu-west-1"),
            DeployTarget::new("svc", "dev", "eu-west-1")
        );
    }

    #[test]
    fn test_names_distinct_across_regions_and_envs() {
        let mut buckets = HashSet::new();
        let mut stacks = HashSet::new();
        for env in ["dev", "stg", "prod"] {
            for region in ["us-east-1", "eu-west-1", "ap-northeast-1"] {
                let target = DeployTarget::new("svc", env, region);
                assert!(buckets.insert(target.bucket));
                assert!(stacks.insert(target.stack_name));
            }
        }
        // keys only vary by environment
        assert_eq!(
            DeployTarget::new("svc", "prod", "us-east-1").key,
            DeployTarget::new("svc", "prod", "eu-west-1").key
        );
        assert_ne!(
            DeployTarget::new("svc", "prod", "us-east-1").key,
            DeployTarget::new("svc", "dev", "us-east-1").key
        );
    }

    #[test]
    fn test_parameters() {
        let target = DeployTarget::new("svc", "prod", "us-east-1");
        let params = target.parameters();
        let keys: Vec<_> = params.iter().map(|p| p.key.as_str()).collect();
        assert_eq!(keys, vec!["Environment", "Region", "S3Bucket", "S3Key"]);
        assert_eq!(params[2].value, "svc-prod-us-east-1");
    }
}
