//! Convergence action types

use serde::{Deserialize, Serialize};

/// What the convergence engine did to a stack
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    /// The stack did not exist and was created
    Create,
    /// The deployed template differed and the stack was updated
    Update,
    /// The deployed template already matched
    NoOp,
}

impl std::fmt::Display for ActionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActionType::Create => write!(f, "create"),
            ActionType::Update => write!(f, "update"),
            ActionType::NoOp => write!(f, "no-op"),
        }
    }
}
