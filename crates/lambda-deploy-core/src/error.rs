//! Deployment error types

use lambda_deploy_cloud::{CloudError, StackStatus};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeployError {
    #[error(
        "No deploy regions given\n\nHint: pass regions on the command line or configure the default deploy regions in lambda.json"
    )]
    NoRegions,

    #[error("Template rejected by the stack provider: {0}")]
    Validation(#[source] CloudError),

    #[error("CloudFormation failed: stack {stack} reached {status}: {reason}")]
    Provisioning {
        stack: String,
        status: StackStatus,
        reason: String,
    },

    #[error("Stack {stack} has no `{output}` output")]
    MissingOutput { stack: String, output: String },

    #[error("Stack {0} could not be described after convergence")]
    StackNotFound(String),

    #[error("Timed out after {elapsed:?} waiting for stack {stack} to reach {expected}")]
    Timeout {
        stack: String,
        expected: StackStatus,
        elapsed: Duration,
    },

    #[error("Failed to open artifact {path}: {source}")]
    Artifact {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Remote(#[from] CloudError),

    #[error("Deployment to {region} failed")]
    Region {
        region: String,
        #[source]
        source: Box<DeployError>,
    },
}

impl DeployError {
    pub fn in_region(self, region: impl Into<String>) -> Self {
        DeployError::Region {
            region: region.into(),
            source: Box::new(self),
        }
    }

    /// The region a failure happened in, if any
    pub fn region(&self) -> Option<&str> {
        match self {
            DeployError::Region { region, .. } => Some(region),
            _ => None,
        }
    }

    /// The error beneath any region wrapper
    pub fn root(&self) -> &DeployError {
        match self {
            DeployError::Region { source, .. } => source.root(),
            other => other,
        }
    }
}

pub type Result<T> = std::result::Result<T, DeployError>;
