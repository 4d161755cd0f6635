//! Stack convergence
//!
//! Brings a named stack to the desired template and returns the function
//! name it exports. The create-vs-update decision is the only state kept:
//!
//! ```text
//! validate ─▶ describe ─┬─ error ─▶ create ─▶ wait CREATE_COMPLETE ─┐
//!                       └─ ok ────▶ get template ─┬─ changed ─▶ update ─▶ wait UPDATE_COMPLETE ─┤
//!                                                 └─ equal ──────────────────────────────────────┤
//!                                                                                                ▼
//!                                                                   describe ─▶ FunctionName output
//! ```

use crate::error::{DeployError, Result};
use crate::poller::{Completion, PollConfig, wait_for_stack};
use crate::progress::{Progress, Reporter};
use crate::target::DeployTarget;
use lambda_deploy_cloud::{ActionType, StackProvider, StackRequest};

/// Output the template must export
pub const FUNCTION_NAME_OUTPUT: &str = "FunctionName";

/// Capability declared on create and update
pub const CAPABILITY_IAM: &str = "CAPABILITY_IAM";

/// Result of converging one stack
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Convergence {
    pub action: ActionType,
    pub function_name: String,
}

/// Converge the stack for `target` to `template`
pub async fn converge_stack(
    stacks: &dyn StackProvider,
    target: &DeployTarget,
    template: &serde_json::Value,
    poll: &PollConfig,
    reporter: &dyn Reporter,
) -> Result<Convergence> {
    let stack_name = target.stack_name.as_str();
    let template_body = template.to_string();

    stacks
        .validate_template(&template_body)
        .await
        .map_err(DeployError::Validation)?;

    let request = StackRequest {
        stack_name: stack_name.to_string(),
        template_body,
        capabilities: vec![CAPABILITY_IAM.to_string()],
        parameters: target.parameters(),
    };

    let action = match stacks.describe_stack(stack_name).await {
        Err(e) => {
            tracing::debug!("Treating stack {} as absent: {}", stack_name, e);
            create_stack(stacks, &request, poll, reporter).await?
        }
        Ok(_) => update_stack(stacks, &request, template, poll, reporter).await?,
    };

    let description = stacks.describe_stack(stack_name).await.map_err(|e| {
        if e.is_not_found() {
            DeployError::StackNotFound(stack_name.to_string())
        } else {
            DeployError::Remote(e)
        }
    })?;

    let function_name = description
        .output(FUNCTION_NAME_OUTPUT)
        .ok_or_else(|| DeployError::MissingOutput {
            stack: stack_name.to_string(),
            output: FUNCTION_NAME_OUTPUT.to_string(),
        })?
        .to_string();

    Ok(Convergence {
        action,
        function_name,
    })
}

async fn create_stack(
    stacks: &dyn StackProvider,
    request: &StackRequest,
    poll: &PollConfig,
    reporter: &dyn Reporter,
) -> Result<ActionType> {
    reporter.report(&Progress::StackCreating {
        stack: request.stack_name.clone(),
    });

    stacks.create_stack(request).await?;
    wait_for_stack(
        stacks,
        &request.stack_name,
        &Completion::create(),
        poll,
        reporter,
    )
    .await?;

    Ok(ActionType::Create)
}

async fn update_stack(
    stacks: &dyn StackProvider,
    request: &StackRequest,
    desired: &serde_json::Value,
    poll: &PollConfig,
    reporter: &dyn Reporter,
) -> Result<ActionType> {
    let stack_name = request.stack_name.clone();
    let deployed = stacks.get_template(&stack_name).await?;

    if templates_equal(desired, &deployed) {
        reporter.report(&Progress::StackUnchanged { stack: stack_name });
        return Ok(ActionType::NoOp);
    }

    reporter.report(&Progress::StackUpdating {
        stack: stack_name.clone(),
    });

    match stacks.update_stack(request).await {
        Ok(()) => {}
        Err(e) if e.is_no_changes() => {
            tracing::warn!(
                "Template of {} differs textually but the provider reports no changes",
                stack_name
            );
            return Ok(ActionType::NoOp);
        }
        Err(e) => return Err(e.into()),
    }

    wait_for_stack(stacks, &stack_name, &Completion::update(), poll, reporter).await?;
    Ok(ActionType::Update)
}

/// Deep structural equality between the desired template and a deployed body
///
/// Mapping key order never matters. A deployed body that is neither JSON nor
/// YAML counts as changed.
pub fn templates_equal(desired: &serde_json::Value, deployed_body: &str) -> bool {
    let deployed = serde_json::from_str::<serde_json::Value>(deployed_body)
        .ok()
        .or_else(|| serde_yaml::from_str::<serde_json::Value>(deployed_body).ok());

    match deployed {
        Some(deployed) => *desired == deployed,
        None => {
            tracing::warn!("Deployed template could not be parsed; treating it as changed");
            false
        }
    }
}
