use anyhow::Context;
use colored::Colorize;
use std::path::Path;

pub fn handle(environment: &str, regions: &[String], config: Option<&Path>) -> anyhow::Result<()> {
    let (config_path, config) = lambda_deploy_config::discover(config)
        .context("Failed to load the deploy configuration")?;

    println!("Config: {}", config_path.display().to_string().cyan());
    println!("Application: {}", config.name.cyan());
    println!("Environment: {}", environment.cyan());

    let targets = lambda_deploy_core::plan(&config, environment, regions)?;

    println!();
    println!("{}", format!("Targets ({} regions):", targets.len()).bold());
    for target in &targets {
        println!("  {}", target.region.green().bold());
        println!("    bucket: {}", target.bucket);
        println!("    key:    {}", target.key);
        println!("    stack:  {}", target.stack_name);
    }

    Ok(())
}
