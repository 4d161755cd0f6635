//! lambda-deploy remote operations
//!
//! This crate defines the contract between the deployment engine and the
//! three remote services it drives in every region:
//!
//! - **Blob storage**: bucket existence probe, bucket creation, object upload
//! - **Stack provider**: template validation, stack describe/create/update,
//!   deployed template retrieval, paginated stack events
//! - **Function provider**: function code update
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │                 lambda-deploy CLI               │
//! └─────────────────┬───────────────────────────────┘
//!                   │
//! ┌─────────────────▼───────────────────────────────┐
//! │               lambda-deploy-core                │
//! │   orchestrator → pipeline → stack → poller      │
//! └─────────────────┬───────────────────────────────┘
//!                   │
//! ┌─────────────────▼───────────────────────────────┐
//! │              lambda-deploy-cloud                │
//! │  trait BlobStore / StackProvider /              │
//! │        FunctionProvider / CloudConnector        │
//! └───────┬─────────────────────────┬───────────────┘
//!         │                         │
//! ┌───────▼───────┐         ┌───────▼───────┐
//! │   AWS (SDK)   │         │  test doubles │
//! └───────────────┘         └───────────────┘
//! ```
//!
//! Operations never retry. Callers decide what an error means.

pub mod action;
pub mod artifact;
pub mod error;
pub mod provider;
pub mod state;

// Re-exports
pub use action::ActionType;
pub use artifact::ArtifactStream;
pub use error::{CloudError, ErrorKind, Result};
pub use provider::{
    BlobStore, CloudConnector, FunctionProvider, FunctionUpdate, RegionClients, StackProvider,
    StackRequest,
};
pub use state::{EventPage, StackDescription, StackEvent, StackParameter, StackStatus};
