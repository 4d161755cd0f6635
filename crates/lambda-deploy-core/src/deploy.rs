//! Multi-region orchestration
//!
//! Regions are deployed one after another, never concurrently: a failure in
//! region N leaves regions N+1.. untouched, so "deployed up through N" is
//! always a clean boundary.

use crate::error::{DeployError, Result};
use crate::pipeline::{RegionReport, deploy_region};
use crate::poller::PollConfig;
use crate::progress::{Progress, Reporter};
use crate::target::DeployTarget;
use lambda_deploy_cloud::CloudConnector;
use lambda_deploy_config::DeployConfig;
use std::path::PathBuf;

/// What the operator asked for
#[derive(Debug, Clone)]
pub struct DeployRequest {
    pub artifact: PathBuf,
    pub environment: String,

    /// Explicit region list; empty means the configured default
    pub regions: Vec<String>,

    pub poll: PollConfig,
}

impl DeployRequest {
    pub fn new(artifact: impl Into<PathBuf>, environment: impl Into<String>) -> Self {
        Self {
            artifact: artifact.into(),
            environment: environment.into(),
            regions: Vec::new(),
            poll: PollConfig::default(),
        }
    }

    pub fn with_regions(mut self, regions: Vec<String>) -> Self {
        self.regions = regions;
        self
    }

    pub fn with_poll(mut self, poll: PollConfig) -> Self {
        self.poll = poll;
        self
    }
}

/// Regions that completed, in deployment order
#[derive(Debug, Clone, Default)]
pub struct DeployReport {
    pub regions: Vec<RegionReport>,
}

/// The explicit list if given, else the configured default. Never empty.
pub fn resolve_regions(config: &DeployConfig, explicit: &[String]) -> Result<Vec<String>> {
    let regions = if explicit.is_empty() {
        config.regions.clone()
    } else {
        explicit.to_vec()
    };

    if regions.is_empty() {
        return Err(DeployError::NoRegions);
    }
    Ok(regions)
}

/// Compute the targets a deployment would touch, without any remote call
pub fn plan(
    config: &DeployConfig,
    environment: &str,
    explicit: &[String],
) -> Result<Vec<DeployTarget>> {
    Ok(resolve_regions(config, explicit)?
        .iter()
        .map(|region| DeployTarget::new(&config.name, environment, region))
        .collect())
}

/// Deploy the artifact to every region in order, stopping at the first failure
pub async fn deploy(
    connector: &dyn CloudConnector,
    config: &DeployConfig,
    request: &DeployRequest,
    reporter: &dyn Reporter,
) -> Result<DeployReport> {
    let regions = resolve_regions(config, &request.regions)?;

    reporter.report(&Progress::DeployStarted {
        artifact: request.artifact.clone(),
        app: config.name.clone(),
        environment: request.environment.clone(),
        regions: regions.clone(),
    });

    let mut report = DeployReport::default();

    for region in &regions {
        let target = DeployTarget::new(&config.name, &request.environment, region);

        let clients = connector
            .connect(region)
            .await
            .map_err(|e| DeployError::from(e).in_region(region))?;

        let region_report = deploy_region(
            &clients,
            config,
            &target,
            &request.artifact,
            &request.poll,
            reporter,
        )
        .await
        .map_err(|e| e.in_region(region))?;

        tracing::debug!(
            "Region {} done ({} of {})",
            region,
            report.regions.len() + 1,
            regions.len()
        );
        report.regions.push(region_report);
    }

    reporter.report(&Progress::Finished {
        regions: report.regions.len(),
    });
    Ok(report)
}
