//! Operator-facing progress reporting

use lambda_deploy_cloud::StackEvent;
use std::path::PathBuf;

/// A milestone worth telling the operator about
#[derive(Debug, Clone, PartialEq)]
pub enum Progress {
    DeployStarted {
        artifact: PathBuf,
        app: String,
        environment: String,
        regions: Vec<String>,
    },
    RegionStarted {
        region: String,
    },
    BucketCreating {
        bucket: String,
    },
    Uploading {
        bucket: String,
        key: String,
    },
    StackCreating {
        stack: String,
    },
    StackUpdating {
        stack: String,
    },
    StackUnchanged {
        stack: String,
    },
    /// A stack event not yet seen during the current wait
    StackEvent {
        stack: String,
        event: StackEvent,
    },
    FunctionUpdating {
        function: String,
        bucket: String,
        key: String,
    },
    RegionFinished {
        region: String,
        version: Option<String>,
    },
    Finished {
        regions: usize,
    },
}

impl std::fmt::Display for Progress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Progress::DeployStarted {
                artifact,
                app,
                environment,
                regions,
            } => write!(
                f,
                "Deploying {} as {} to {} in regions {}",
                artifact.display(),
                app,
                environment,
                regions.join(", ")
            ),
            Progress::RegionStarted { region } => write!(f, "Deploying to {}", region),
            Progress::BucketCreating { bucket } => {
                write!(f, "Bucket {} does not exist. Creating it.", bucket)
            }
            Progress::Uploading { bucket, key } => write!(f, "Uploading to {}/{}", bucket, key),
            Progress::StackCreating { stack } => {
                write!(f, "Creating CloudFormation stack {}", stack)
            }
            Progress::StackUpdating { stack } => write!(
                f,
                "CloudFormation template changed. Updating stack {}.",
                stack
            ),
            Progress::StackUnchanged { stack } => {
                write!(f, "CloudFormation stack {} is up to date", stack)
            }
            Progress::StackEvent { event, .. } => write!(f, "{}", event),
            Progress::FunctionUpdating {
                function,
                bucket,
                key,
            } => write!(
                f,
                "Updating lambda function {} code to: s3://{}/{}",
                function, bucket, key
            ),
            Progress::RegionFinished { region, version } => match version {
                Some(v) => write!(f, "Deployed {} (version {})", region, v),
                None => write!(f, "Deployed {}", region),
            },
            Progress::Finished { .. } => write!(f, "Finished"),
        }
    }
}

/// Sink for progress lines, in the order they happen
pub trait Reporter: Send + Sync {
    fn report(&self, progress: &Progress);
}

/// Writes progress through `tracing` at info level
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn report(&self, progress: &Progress) {
        match progress {
            Progress::StackEvent { stack, event } => {
                tracing::info!(stack = %stack, event_id = %event.event_id, "{}", progress)
            }
            _ => tracing::info!("{}", progress),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deploy_started_line() {
        let line = Progress::DeployStarted {
            artifact: PathBuf::from("build/svc.jar"),
            app: "svc".to_string(),
            environment: "prod".to_string(),
            regions: vec!["us-east-1".to_string(), "eu-west-1".to_string()],
        }
        .to_string();
        assert_eq!(
            line,
            "Deploying build/svc.jar as svc to prod in regions us-east-1, eu-west-1"
        );
    }

    #[test]
    fn test_region_finished_line() {
        let with_version = Progress::RegionFinished {
            region: "us-east-1".to_string(),
            version: Some("7".to_string()),
        };
        assert_eq!(with_version.to_string(), "Deployed us-east-1 (version 7)");

        let without = Progress::RegionFinished {
            region: "us-east-1".to_string(),
            version: None,
        };
        assert_eq!(without.to_string(), "Deployed us-east-1");
    }
}
