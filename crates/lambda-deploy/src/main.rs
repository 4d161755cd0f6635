mod commands;
mod console;

use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "lambda-deploy")]
#[command(
    about = "Deploy a packaged function to AWS Lambda in one or more regions",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload the artifact, converge the stack and update the function in each region
    Deploy {
        /// Packaged function code (e.g. build/libs/app.jar)
        artifact: PathBuf,
        /// Environment name (dev, stg, prod)
        #[arg(env = "LAMBDA_DEPLOY_ENV")]
        environment: String,
        /// Regions to deploy to, in order (default: `regions` from the config)
        regions: Vec<String>,
        /// Configuration file (default: lambda.json / lambda.yaml in the current directory)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Give up waiting for a stack after this many seconds
        #[arg(short, long, value_name = "SECS")]
        timeout: Option<u64>,
        /// Named AWS profile to use instead of the default credential chain
        #[arg(short, long)]
        profile: Option<String>,
    },
    /// Show the bucket, key and stack each region would use, without touching AWS
    Plan {
        /// Environment name (dev, stg, prod)
        #[arg(env = "LAMBDA_DEPLOY_ENV")]
        environment: String,
        /// Regions to plan for (default: `regions` from the config)
        regions: Vec<String>,
        /// Configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Show version information
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries the progress lines.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    match cli.command {
        Commands::Version => {
            println!("lambda-deploy {}", env!("CARGO_PKG_VERSION"));
        }
        Commands::Plan {
            environment,
            regions,
            config,
        } => {
            commands::plan::handle(&environment, &regions, config.as_deref())?;
        }
        Commands::Deploy {
            artifact,
            environment,
            regions,
            config,
            timeout,
            profile,
        } => {
            let args = commands::deploy::DeployArgs {
                artifact,
                environment,
                regions,
                config,
                timeout,
                profile,
            };
            if let Err(e) = commands::deploy::handle(args).await {
                eprintln!("{}", "Unexpected error".red().bold());
                return Err(e);
            }
        }
    }

    Ok(())
}
