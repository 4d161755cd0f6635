//! AWS provider for lambda-deploy
//!
//! Implements the remote operation traits on top of the AWS SDK:
//!
//! - `BlobStore` → S3
//! - `StackProvider` → CloudFormation
//! - `FunctionProvider` → Lambda
//!
//! # Requirements
//!
//! - Credentials come from the default AWS provider chain (environment,
//!   shared config/profile, instance or task role)
//!
//! # Example
//!
//! ```ignore
//! use lambda_deploy_cloud::CloudConnector;
//! use lambda_deploy_cloud_aws::AwsConnector;
//!
//! let connector = AwsConnector::new().with_profile("deploy");
//! let clients = connector.connect("us-east-1").await?;
//! clients.blobs.head_bucket("svc-prod-us-east-1").await?;
//! ```

pub mod cloudformation;
mod error;
pub mod lambda;
pub mod provider;
pub mod s3;

pub use cloudformation::CloudFormationStacks;
pub use lambda::LambdaFunctions;
pub use provider::AwsConnector;
pub use s3::S3BlobStore;
