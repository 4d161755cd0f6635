use anyhow::Context;
use lambda_deploy_cloud::CloudConnector;
use lambda_deploy_cloud_aws::AwsConnector;
use lambda_deploy_core::{DeployRequest, PollConfig};
use std::path::PathBuf;
use std::time::Duration;

use crate::console::ConsoleReporter;

pub struct DeployArgs {
    pub artifact: PathBuf,
    pub environment: String,
    pub regions: Vec<String>,
    pub config: Option<PathBuf>,
    pub timeout: Option<u64>,
    pub profile: Option<String>,
}

pub async fn handle(args: DeployArgs) -> anyhow::Result<()> {
    let (config_path, config) = lambda_deploy_config::discover(args.config.as_deref())
        .context("Failed to load the deploy configuration")?;
    tracing::debug!("Loaded {} from {}", config.name, config_path.display());

    if !args.artifact.is_file() {
        anyhow::bail!("Artifact {} does not exist", args.artifact.display());
    }

    let mut poll = PollConfig::default();
    if let Some(secs) = args.timeout {
        poll = poll.with_timeout(Duration::from_secs(secs));
    }

    let request = DeployRequest::new(args.artifact, args.environment)
        .with_regions(args.regions)
        .with_poll(poll);

    let mut connector = AwsConnector::new();
    if let Some(profile) = args.profile {
        connector = connector.with_profile(profile);
    }
    tracing::debug!("Using {} connector", connector.name());

    let report = lambda_deploy_core::deploy(&connector, &config, &request, &ConsoleReporter).await?;
    tracing::info!("Deployed to {} regions", report.regions.len());

    Ok(())
}
