//! Remote service traits
//!
//! One trait per remote service. Implementations issue exactly the mutation
//! requested and never retry; idempotency is the caller's job (e.g. the
//! bucket is only created after a `NotFound` probe).

use crate::artifact::ArtifactStream;
use crate::error::Result;
use crate::state::{EventPage, StackDescription, StackParameter};
use async_trait::async_trait;
use std::sync::Arc;

/// Object storage operations
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Probe for a bucket. A missing bucket is an `ErrorKind::NotFound` error.
    async fn head_bucket(&self, bucket: &str) -> Result<()>;

    /// Create a private bucket
    async fn create_bucket(&self, bucket: &str) -> Result<()>;

    /// Upload `body` to `bucket/key`, consuming the stream
    async fn put_object(&self, bucket: &str, key: &str, body: ArtifactStream) -> Result<()>;
}

/// Infrastructure stack operations
#[async_trait]
pub trait StackProvider: Send + Sync {
    async fn validate_template(&self, template_body: &str) -> Result<()>;

    /// Describe a stack. A missing stack is an error, not `Ok(None)`.
    async fn describe_stack(&self, stack_name: &str) -> Result<StackDescription>;

    async fn create_stack(&self, request: &StackRequest) -> Result<()>;

    async fn update_stack(&self, request: &StackRequest) -> Result<()>;

    /// Fetch the template body currently deployed for a stack
    async fn get_template(&self, stack_name: &str) -> Result<String>;

    async fn describe_stack_events(
        &self,
        stack_name: &str,
        next_token: Option<&str>,
    ) -> Result<EventPage>;
}

/// Serverless function operations
#[async_trait]
pub trait FunctionProvider: Send + Sync {
    /// Point a function at new code in object storage
    async fn update_function_code(&self, update: &FunctionUpdate) -> Result<Option<String>>;
}

/// Builds the per-region clients
#[async_trait]
pub trait CloudConnector: Send + Sync {
    /// Returns the provider name (e.g. "aws")
    fn name(&self) -> &str;

    async fn connect(&self, region: &str) -> Result<RegionClients>;
}

/// Clients bound to one region
#[derive(Clone)]
pub struct RegionClients {
    pub region: String,
    pub blobs: Arc<dyn BlobStore>,
    pub stacks: Arc<dyn StackProvider>,
    pub functions: Arc<dyn FunctionProvider>,
}

impl std::fmt::Debug for RegionClients {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegionClients")
            .field("region", &self.region)
            .finish_non_exhaustive()
    }
}

/// Parameters shared by stack create and update
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackRequest {
    pub stack_name: String,

    /// Serialized template document
    pub template_body: String,

    /// Declared capabilities (e.g. "CAPABILITY_IAM")
    pub capabilities: Vec<String>,

    pub parameters: Vec<StackParameter>,
}

impl StackRequest {
    pub fn parameter(&self, key: &str) -> Option<&str> {
        self.parameters
            .iter()
            .find(|p| p.key == key)
            .map(|p| p.value.as_str())
    }
}

/// Arguments to `update_function_code`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionUpdate {
    pub function_name: String,
    pub s3_bucket: String,
    pub s3_key: String,

    /// Publish a new version
    pub publish: bool,
}
