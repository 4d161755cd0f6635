//! lambda-deploy engine
//!
//! Drives one artifact through every requested region, strictly in order:
//!
//! 1. ensure the code bucket exists
//! 2. upload the artifact
//! 3. converge the CloudFormation stack (create, update or leave alone)
//! 4. point the function at the uploaded code and publish a version
//!
//! The first failure stops the run; later regions are never touched.
//!
//! # Example
//!
//! ```ignore
//! use lambda_deploy_core::{deploy, DeployRequest, TracingReporter};
//!
//! let request = DeployRequest::new("target/svc.jar", "prod");
//! let report = deploy(&connector, &config, &request, &TracingReporter).await?;
//! for region in &report.regions {
//!     println!("{} -> {}", region.target.region, region.function_name);
//! }
//! ```

pub mod deploy;
pub mod error;
pub mod events;
pub mod pipeline;
pub mod poller;
pub mod progress;
pub mod stack;
pub mod target;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use deploy::{DeployReport, DeployRequest, deploy, plan, resolve_regions};
pub use error::{DeployError, Result};
pub use events::SeenEvents;
pub use pipeline::{RegionReport, deploy_region, ensure_bucket};
pub use poller::{Completion, PollConfig, wait_for_stack};
pub use progress::{Progress, Reporter, TracingReporter};
pub use stack::{Convergence, converge_stack, templates_equal};
pub use target::DeployTarget;
