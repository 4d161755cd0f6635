//! Stack operation poller
//!
//! Waits for a stack to reach a success status, failing fast on the
//! operation's terminal-failure statuses and reporting stack events as
//! they appear.

use crate::error::{DeployError, Result};
use crate::events::SeenEvents;
use crate::progress::{Progress, Reporter};
use lambda_deploy_cloud::{EventPage, StackDescription, StackProvider, StackStatus};
use std::time::Duration;
use tokio::time::{Instant, sleep};

/// Default delay between status queries
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Terminal statuses of one stack operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub success: StackStatus,
    pub failures: Vec<StackStatus>,
}

impl Completion {
    /// Stack creation: `CREATE_COMPLETE`, fails on `CREATE_FAILED` / `ROLLBACK_COMPLETE`
    pub fn create() -> Self {
        Self {
            success: StackStatus::CreateComplete,
            failures: vec![StackStatus::CreateFailed, StackStatus::RollbackComplete],
        }
    }

    /// Stack update: `UPDATE_COMPLETE`, fails on `UPDATE_ROLLBACK_FAILED` / `UPDATE_ROLLBACK_COMPLETE`
    pub fn update() -> Self {
        Self {
            success: StackStatus::UpdateComplete,
            failures: vec![
                StackStatus::UpdateRollbackFailed,
                StackStatus::UpdateRollbackComplete,
            ],
        }
    }

    pub fn is_failure(&self, status: &StackStatus) -> bool {
        self.failures.contains(status)
    }
}

/// Poll loop settings
#[derive(Debug, Clone)]
pub struct PollConfig {
    /// Delay between status queries
    pub interval: Duration,

    /// Give up after this long. `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            timeout: None,
        }
    }
}

impl PollConfig {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Block until `stack_name` reaches `completion.success`
///
/// Each iteration queries the status, then fetches one page of events using
/// the continuation token from the previous page and reports the ones not yet
/// seen during this wait. Reaching success on the first query performs no
/// event fetch at all.
pub async fn wait_for_stack(
    stacks: &dyn StackProvider,
    stack_name: &str,
    completion: &Completion,
    config: &PollConfig,
    reporter: &dyn Reporter,
) -> Result<StackDescription> {
    let mut seen = SeenEvents::new();
    let mut next_token: Option<String> = None;
    let started = Instant::now();

    loop {
        let description = stacks.describe_stack(stack_name).await?;
        let status = &description.status;

        if *status == completion.success {
            tracing::debug!("Stack {} reached {}", stack_name, status);
            return Ok(description);
        }

        if completion.is_failure(status) {
            return Err(DeployError::Provisioning {
                stack: stack_name.to_string(),
                status: status.clone(),
                reason: description
                    .status_reason
                    .clone()
                    .unwrap_or_else(|| "no reason given".to_string()),
            });
        }

        tracing::debug!(
            "Stack {} is {}, waiting for {}",
            stack_name,
            status,
            completion.success
        );

        let page = stacks
            .describe_stack_events(stack_name, next_token.as_deref())
            .await?;
        next_token = report_new_events(stack_name, page, &mut seen, reporter);

        if let Some(timeout) = config.timeout {
            let elapsed = started.elapsed();
            if elapsed >= timeout {
                return Err(DeployError::Timeout {
                    stack: stack_name.to_string(),
                    expected: completion.success.clone(),
                    elapsed,
                });
            }
        }

        sleep(config.interval).await;
    }
}

/// Report unseen events of a page; returns the page's continuation token
fn report_new_events(
    stack_name: &str,
    page: EventPage,
    seen: &mut SeenEvents,
    reporter: &dyn Reporter,
) -> Option<String> {
    for event in page.events {
        if seen.should_log(&event.event_id) {
            reporter.report(&Progress::StackEvent {
                stack: stack_name.to_string(),
                event,
            });
        }
    }
    page.next_token
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Call, FakeRegion, RecordingReporter, event_page};
    use lambda_deploy_cloud::StackDescription;

    const STACK: &str = "svc-us-east-1-prod";

    fn stack(status: StackStatus) -> StackDescription {
        StackDescription::new(STACK, status)
    }

    #[tokio::test(start_paused = true)]
    async fn test_immediate_success_fetches_no_events() {
        let region = FakeRegion::new().with_stack(stack(StackStatus::CreateComplete), "{}");
        let reporter = RecordingReporter::new();

        let desc = wait_for_stack(
            &region,
            STACK,
            &Completion::create(),
            &PollConfig::default(),
            &reporter,
        )
        .await
        .unwrap();

        assert_eq!(desc.status, StackStatus::CreateComplete);
        assert_eq!(region.count(|c| matches!(c, Call::DescribeStackEvents { .. })), 0);
        assert!(reporter.event_ids().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_polls_until_success_and_dedups_events() {
        let region = FakeRegion::new()
            .with_stack(stack(StackStatus::CreateInProgress), "{}")
            .with_status_script([
                StackStatus::CreateInProgress,
                StackStatus::CreateInProgress,
                StackStatus::CreateInProgress,
                StackStatus::CreateComplete,
            ])
            .with_event_pages([
                event_page(&["e-2", "e-1"], None),
                event_page(&["e-3", "e-2", "e-1"], None),
                event_page(&["e-4", "e-3"], None),
            ]);
        let reporter = RecordingReporter::new();

        wait_for_stack(
            &region,
            STACK,
            &Completion::create(),
            &PollConfig::default(),
            &reporter,
        )
        .await
        .unwrap();

        assert_eq!(reporter.event_ids(), vec!["e-2", "e-1", "e-3", "e-4"]);
        assert_eq!(region.count(|c| matches!(c, Call::DescribeStack(_))), 4);
        assert_eq!(region.count(|c| matches!(c, Call::DescribeStackEvents { .. })), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_threads_continuation_token() {
        let region = FakeRegion::new()
            .with_stack(stack(StackStatus::UpdateInProgress), "{}")
            .with_status_script([
                StackStatus::UpdateInProgress,
                StackStatus::UpdateInProgress,
                StackStatus::UpdateInProgress,
                StackStatus::UpdateComplete,
            ])
            .with_event_pages([
                event_page(&["e-2"], Some("page-2")),
                event_page(&["e-1"], None),
                event_page(&["e-2", "e-3"], None),
            ]);
        let reporter = RecordingReporter::new();

        wait_for_stack(
            &region,
            STACK,
            &Completion::update(),
            &PollConfig::default(),
            &reporter,
        )
        .await
        .unwrap();

        let tokens: Vec<Option<String>> = region
            .calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::DescribeStackEvents { token, .. } => Some(token),
                _ => None,
            })
            .collect();
        assert_eq!(tokens, vec![None, Some("page-2".to_string()), None]);
        assert_eq!(reporter.event_ids(), vec!["e-2", "e-1", "e-3"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_exit_status_carries_reason() {
        let region = FakeRegion::new()
            .with_stack(stack(StackStatus::CreateInProgress), "{}")
            .with_status_script([StackStatus::CreateInProgress, StackStatus::RollbackComplete])
            .with_status_reason("The following resource(s) failed to create: [Function].");
        let reporter = RecordingReporter::new();

        let err = wait_for_stack(
            &region,
            STACK,
            &Completion::create(),
            &PollConfig::default(),
            &reporter,
        )
        .await
        .unwrap_err();

        match &err {
            DeployError::Provisioning { status, reason, .. } => {
                assert_eq!(*status, StackStatus::RollbackComplete);
                assert!(reason.contains("failed to create: [Function]"));
            }
            other => panic!("Expected Provisioning error, got {:?}", other),
        }
        assert!(err.to_string().contains("failed to create: [Function]"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_update_exit_statuses_do_not_apply_to_create() {
        // UPDATE_ROLLBACK_COMPLETE is not terminal for a create wait
        let region = FakeRegion::new()
            .with_stack(stack(StackStatus::CreateInProgress), "{}")
            .with_status_script([
                StackStatus::UpdateRollbackComplete,
                StackStatus::CreateComplete,
            ]);
        let reporter = RecordingReporter::new();

        let result = wait_for_stack(
            &region,
            STACK,
            &Completion::create(),
            &PollConfig::default(),
            &reporter,
        )
        .await;
        assert!(result.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout() {
        let region = FakeRegion::new().with_stack(stack(StackStatus::UpdateInProgress), "{}");
        let reporter = RecordingReporter::new();
        let config = PollConfig::default().with_timeout(Duration::from_secs(5));

        let err = wait_for_stack(&region, STACK, &Completion::update(), &config, &reporter)
            .await
            .unwrap_err();

        assert!(matches!(err, DeployError::Timeout { .. }));
        // queries at t=0s through t=5s
        assert_eq!(region.count(|c| matches!(c, Call::DescribeStack(_))), 6);
    }

    #[tokio::test(start_paused = true)]
    async fn test_describe_failure_propagates() {
        let region = FakeRegion::new();
        let reporter = RecordingReporter::new();

        let err = wait_for_stack(
            &region,
            STACK,
            &Completion::create(),
            &PollConfig::default(),
            &reporter,
        )
        .await
        .unwrap_err();

        match err {
            DeployError::Remote(e) => assert!(e.is_not_found()),
            other => panic!("Expected Remote error, got {:?}", other),
        }
    }
}
