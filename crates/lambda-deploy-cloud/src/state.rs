//! Provider-side stack state
//!
//! Wire-neutral views of what the stack provider reports. Nothing here is
//! cached; callers re-describe whenever they need fresh state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Lifecycle status of a stack
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StackStatus {
    CreateInProgress,
    CreateFailed,
    CreateComplete,
    RollbackInProgress,
    RollbackFailed,
    RollbackComplete,
    DeleteInProgress,
    DeleteFailed,
    DeleteComplete,
    UpdateInProgress,
    UpdateCompleteCleanupInProgress,
    UpdateComplete,
    UpdateFailed,
    UpdateRollbackInProgress,
    UpdateRollbackFailed,
    UpdateRollbackCompleteCleanupInProgress,
    UpdateRollbackComplete,
    ReviewInProgress,
    /// A status this build does not know about
    Other(String),
}

impl StackStatus {
    pub fn as_str(&self) -> &str {
        match self {
            StackStatus::CreateInProgress => "CREATE_IN_PROGRESS",
            StackStatus::CreateFailed => "CREATE_FAILED",
            StackStatus::CreateComplete => "CREATE_COMPLETE",
            StackStatus::RollbackInProgress => "ROLLBACK_IN_PROGRESS",
            StackStatus::RollbackFailed => "ROLLBACK_FAILED",
            StackStatus::RollbackComplete => "ROLLBACK_COMPLETE",
            StackStatus::DeleteInProgress => "DELETE_IN_PROGRESS",
            StackStatus::DeleteFailed => "DELETE_FAILED",
            StackStatus::DeleteComplete => "DELETE_COMPLETE",
            StackStatus::UpdateInProgress => "UPDATE_IN_PROGRESS",
            StackStatus::UpdateCompleteCleanupInProgress => "UPDATE_COMPLETE_CLEANUP_IN_PROGRESS",
            StackStatus::UpdateComplete => "UPDATE_COMPLETE",
            StackStatus::UpdateFailed => "UPDATE_FAILED",
            StackStatus::UpdateRollbackInProgress => "UPDATE_ROLLBACK_IN_PROGRESS",
            StackStatus::UpdateRollbackFailed => "UPDATE_ROLLBACK_FAILED",
            StackStatus::UpdateRollbackCompleteCleanupInProgress => {
                "UPDATE_ROLLBACK_COMPLETE_CLEANUP_IN_PROGRESS"
            }
            StackStatus::UpdateRollbackComplete => "UPDATE_ROLLBACK_COMPLETE",
            StackStatus::ReviewInProgress => "REVIEW_IN_PROGRESS",
            StackStatus::Other(s) => s,
        }
    }
}

impl From<&str> for StackStatus {
    fn from(s: &str) -> Self {
        match s {
            "CREATE_IN_PROGRESS" => StackStatus::CreateInProgress,
            "CREATE_FAILED" => StackStatus::CreateFailed,
            "CREATE_COMPLETE" => StackStatus::CreateComplete,
            "ROLLBACK_IN_PROGRESS" => StackStatus::RollbackInProgress,
            "ROLLBACK_FAILED" => StackStatus::RollbackFailed,
            "ROLLBACK_COMPLETE" => StackStatus::RollbackComplete,
            "DELETE_IN_PROGRESS" => StackStatus::DeleteInProgress,
            "DELETE_FAILED" => StackStatus::DeleteFailed,
            "DELETE_COMPLETE" => StackStatus::DeleteComplete,
            "UPDATE_IN_PROGRESS" => StackStatus::UpdateInProgress,
            "UPDATE_COMPLETE_CLEANUP_IN_PROGRESS" => StackStatus::UpdateCompleteCleanupInProgress,
            "UPDATE_COMPLETE" => StackStatus::UpdateComplete,
            "UPDATE_FAILED" => StackStatus::UpdateFailed,
            "UPDATE_ROLLBACK_IN_PROGRESS" => StackStatus::UpdateRollbackInProgress,
            "UPDATE_ROLLBACK_FAILED" => StackStatus::UpdateRollbackFailed,
            "UPDATE_ROLLBACK_COMPLETE_CLEANUP_IN_PROGRESS" => {
                StackStatus::UpdateRollbackCompleteCleanupInProgress
            }
            "UPDATE_ROLLBACK_COMPLETE" => StackStatus::UpdateRollbackComplete,
            "REVIEW_IN_PROGRESS" => StackStatus::ReviewInProgress,
            other => StackStatus::Other(other.to_string()),
        }
    }
}

impl std::fmt::Display for StackStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The provider's current record for a stack
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StackDescription {
    pub stack_name: String,

    pub status: StackStatus,

    /// Provider-supplied explanation of the current status
    pub status_reason: Option<String>,

    /// Stack outputs indexed by output key
    pub outputs: HashMap<String, String>,
}

impl StackDescription {
    pub fn new(stack_name: impl Into<String>, status: StackStatus) -> Self {
        Self {
            stack_name: stack_name.into(),
            status,
            status_reason: None,
            outputs: HashMap::new(),
        }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.status_reason = Some(reason.into());
        self
    }

    pub fn with_output(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.outputs.insert(key.into(), value.into());
        self
    }

    pub fn output(&self, key: &str) -> Option<&str> {
        self.outputs.get(key).map(|v| v.as_str())
    }
}

/// A single entry of a stack's event stream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StackEvent {
    /// Unique only within one provider event stream
    pub event_id: String,

    pub timestamp: Option<DateTime<Utc>>,

    pub logical_resource_id: Option<String>,

    pub resource_status: Option<String>,

    pub resource_status_reason: Option<String>,
}

impl StackEvent {
    pub fn new(event_id: impl Into<String>) -> Self {
        Self {
            event_id: event_id.into(),
            timestamp: None,
            logical_resource_id: None,
            resource_status: None,
            resource_status_reason: None,
        }
    }
}

impl std::fmt::Display for StackEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let timestamp = self
            .timestamp
            .map(|t| t.to_rfc3339())
            .unwrap_or_else(|| "-".to_string());
        write!(
            f,
            "{} - {} - {} - {}",
            timestamp,
            self.logical_resource_id.as_deref().unwrap_or("-"),
            self.resource_status.as_deref().unwrap_or("-"),
            self.resource_status_reason.as_deref().unwrap_or("-"),
        )
    }
}

/// One page of `DescribeStackEvents`
#[derive(Debug, Clone, Default)]
pub struct EventPage {
    pub events: Vec<StackEvent>,

    /// Continuation token for the next page, if any
    pub next_token: Option<String>,
}

/// A `ParameterKey`/`ParameterValue` pair passed to create/update
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackParameter {
    pub key: String,
    pub value: String,
}

impl StackParameter {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip_known() {
        for s in [
            "CREATE_COMPLETE",
            "ROLLBACK_COMPLETE",
            "UPDATE_ROLLBACK_COMPLETE_CLEANUP_IN_PROGRESS",
        ] {
            assert_eq!(StackStatus::from(s).as_str(), s);
        }
        assert_eq!(StackStatus::from("CREATE_FAILED"), StackStatus::CreateFailed);
    }

    #[test]
    fn test_status_unknown_is_preserved() {
        let status = StackStatus::from("IMPORT_IN_PROGRESS");
        assert_eq!(status, StackStatus::Other("IMPORT_IN_PROGRESS".to_string()));
        assert_eq!(status.to_string(), "IMPORT_IN_PROGRESS");
    }

    #[test]
    fn test_event_display() {
        let mut event = StackEvent::new("e-1");
        event.timestamp = DateTime::from_timestamp(0, 0);
        event.logical_resource_id = Some("Function".to_string());
        event.resource_status = Some("CREATE_IN_PROGRESS".to_string());

        assert_eq!(
            event.to_string(),
            "1970-01-01T00:00:00+00:00 - Function - CREATE_IN_PROGRESS - -"
        );
    }

    #[test]
    fn test_description_output() {
        let desc = StackDescription::new("svc-us-east-1-prod", StackStatus::CreateComplete)
            .with_output("FunctionName", "svc-prod-fn");
        assert_eq!(desc.output("FunctionName"), Some("svc-prod-fn"));
        assert_eq!(desc.output("Missing"), None);
        assert_eq!(desc.status_reason, None);
    }

    #[test]
    fn test_description_reason() {
        let desc = StackDescription::new("svc-us-east-1-prod", StackStatus::RollbackComplete)
            .with_reason("The following resource(s) failed to create: [Function]");
        assert_eq!(
            desc.status_reason.as_deref(),
            Some("The following resource(s) failed to create: [Function]")
        );
    }
}
