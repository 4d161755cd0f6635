//! In-memory provider and recording reporter for tests
//!
//! `FakeRegion` implements every remote trait against local state and
//! records each call. `FakeCloud` hands out one `FakeRegion` per region name.

use crate::progress::{Progress, Reporter};
use async_trait::async_trait;
use lambda_deploy_cloud::{
    ArtifactStream, BlobStore, CloudConnector, CloudError, EventPage, FunctionProvider,
    FunctionUpdate, RegionClients, Result, StackDescription, StackEvent, StackProvider,
    StackRequest, StackStatus,
};
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};

/// A recorded remote call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    HeadBucket(String),
    CreateBucket(String),
    PutObject {
        bucket: String,
        key: String,
        size: usize,
    },
    ValidateTemplate,
    DescribeStack(String),
    CreateStack(StackRequest),
    UpdateStack(StackRequest),
    GetTemplate(String),
    DescribeStackEvents {
        stack: String,
        token: Option<String>,
    },
    UpdateFunctionCode(FunctionUpdate),
}

struct FakeStack {
    description: StackDescription,
    template_body: String,
}

#[derive(Default)]
struct FakeState {
    buckets: HashSet<String>,
    stack: Option<FakeStack>,
    status_script: VecDeque<StackStatus>,
    status_reason: Option<String>,
    function_name: Option<String>,
    event_pages: VecDeque<EventPage>,
    published_version: Option<String>,

    head_error: Option<CloudError>,
    put_error: Option<CloudError>,
    validation_error: Option<CloudError>,
    /// Fails the describe made after this many have succeeded
    describe_error: Option<(usize, CloudError)>,
    update_error: Option<CloudError>,

    calls: Vec<Call>,
}

/// One region's worth of remote state
///
/// Stacks created or updated through the fake settle immediately unless a
/// status script says otherwise.
#[derive(Default)]
pub struct FakeRegion {
    state: Mutex<FakeState>,
}

impl FakeRegion {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().expect("fake region state poisoned")
    }

    fn configure(self, f: impl FnOnce(&mut FakeState)) -> Self {
        f(&mut self.state());
        self
    }

    pub fn with_bucket(self, bucket: &str) -> Self {
        self.configure(|s| {
            s.buckets.insert(bucket.to_string());
        })
    }

    /// An existing stack with its deployed template body
    pub fn with_stack(self, description: StackDescription, template_body: &str) -> Self {
        self.configure(|s| {
            s.stack = Some(FakeStack {
                description,
                template_body: template_body.to_string(),
            })
        })
    }

    /// Statuses returned by successive describes of an existing stack;
    /// the last one sticks
    pub fn with_status_script(self, statuses: impl IntoIterator<Item = StackStatus>) -> Self {
        self.configure(|s| s.status_script = statuses.into_iter().collect())
    }

    pub fn with_status_reason(self, reason: &str) -> Self {
        self.configure(|s| s.status_reason = Some(reason.to_string()))
    }

    /// `FunctionName` output given to stacks created by `create_stack`
    pub fn with_function_name(self, name: &str) -> Self {
        self.configure(|s| s.function_name = Some(name.to_string()))
    }

    /// Pages served by successive event fetches; empty pages afterwards
    pub fn with_event_pages(self, pages: impl IntoIterator<Item = EventPage>) -> Self {
        self.configure(|s| s.event_pages = pages.into_iter().collect())
    }

    pub fn with_published_version(self, version: &str) -> Self {
        self.configure(|s| s.published_version = Some(version.to_string()))
    }

    pub fn fail_head_bucket(self, err: CloudError) -> Self {
        self.configure(|s| s.head_error = Some(err))
    }

    pub fn fail_put_object(self, err: CloudError) -> Self {
        self.configure(|s| s.put_error = Some(err))
    }

    pub fn reject_template(self, err: CloudError) -> Self {
        self.configure(|s| s.validation_error = Some(err))
    }

    /// The next describe fails with `err`, whatever the stack state
    pub fn fail_first_describe(self, err: CloudError) -> Self {
        self.fail_describe_after(0, err)
    }

    /// Let `succeeded` describes through, then fail the next one with `err`
    pub fn fail_describe_after(self, succeeded: usize, err: CloudError) -> Self {
        self.configure(|s| s.describe_error = Some((succeeded, err)))
    }

    pub fn reject_update(self, err: CloudError) -> Self {
        self.configure(|s| s.update_error = Some(err))
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state().calls.clone()
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.state().calls.iter().filter(|c| pred(c)).count()
    }

    /// Clients for `region`, all backed by this fake
    pub fn clients(self: &Arc<Self>, region: &str) -> RegionClients {
        RegionClients {
            region: region.to_string(),
            blobs: self.clone(),
            stacks: self.clone(),
            functions: self.clone(),
        }
    }
}

#[async_trait]
impl BlobStore for FakeRegion {
    async fn head_bucket(&self, bucket: &str) -> Result<()> {
        let mut state = self.state();
        state.calls.push(Call::HeadBucket(bucket.to_string()));
        if let Some(err) = state.head_error.clone() {
            return Err(err);
        }
        if state.buckets.contains(bucket) {
            Ok(())
        } else {
            Err(CloudError::not_found("HeadBucket", format!("{} not found", bucket))
                .with_code("NotFound"))
        }
    }

    async fn create_bucket(&self, bucket: &str) -> Result<()> {
        let mut state = self.state();
        state.calls.push(Call::CreateBucket(bucket.to_string()));
        state.buckets.insert(bucket.to_string());
        Ok(())
    }

    async fn put_object(&self, bucket: &str, key: &str, body: ArtifactStream) -> Result<()> {
        let bytes = body
            .read_all()
            .await
            .map_err(|e| CloudError::other("PutObject", e.to_string()))?;

        let mut state = self.state();
        state.calls.push(Call::PutObject {
            bucket: bucket.to_string(),
            key: key.to_string(),
            size: bytes.len(),
        });
        if let Some(err) = state.put_error.clone() {
            return Err(err);
        }
        Ok(())
    }
}

#[async_trait]
impl StackProvider for FakeRegion {
    async fn validate_template(&self, _template_body: &str) -> Result<()> {
        let mut state = self.state();
        state.calls.push(Call::ValidateTemplate);
        match state.validation_error.clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    async fn describe_stack(&self, stack_name: &str) -> Result<StackDescription> {
        let mut state = self.state();
        let previous = state
            .calls
            .iter()
            .filter(|c| matches!(c, Call::DescribeStack(_)))
            .count();
        state.calls.push(Call::DescribeStack(stack_name.to_string()));
        match state.describe_error.take() {
            Some((after, err)) if after == previous => return Err(err),
            pending => state.describe_error = pending,
        }

        let next_status = state.status_script.front().cloned();
        let reason = state.status_reason.clone();
        let has_more = state.status_script.len() > 1;
        let stack = state.stack.as_mut().ok_or_else(|| {
            CloudError::not_found(
                "DescribeStacks",
                format!("Stack with id {} does not exist", stack_name),
            )
            .with_code("ValidationError")
        })?;

        if let Some(status) = next_status {
            stack.description.status = status;
        }
        if reason.is_some() {
            stack.description.status_reason = reason;
        }
        let description = stack.description.clone();

        if has_more {
            state.status_script.pop_front();
        }
        Ok(description)
    }

    async fn create_stack(&self, request: &StackRequest) -> Result<()> {
        let mut state = self.state();
        state.calls.push(Call::CreateStack(request.clone()));

        let mut description =
            StackDescription::new(&request.stack_name, StackStatus::CreateComplete);
        if let Some(name) = &state.function_name {
            description = description.with_output("FunctionName", name);
        }
        state.stack = Some(FakeStack {
            description,
            template_body: request.template_body.clone(),
        });
        Ok(())
    }

    async fn update_stack(&self, request: &StackRequest) -> Result<()> {
        let mut state = self.state();
        state.calls.push(Call::UpdateStack(request.clone()));
        if let Some(err) = state.update_error.clone() {
            return Err(err);
        }

        let stack = state.stack.as_mut().ok_or_else(|| {
            CloudError::not_found("UpdateStack", format!("{} does not exist", request.stack_name))
        })?;
        stack.template_body = request.template_body.clone();
        stack.description.status = StackStatus::UpdateComplete;
        Ok(())
    }

    async fn get_template(&self, stack_name: &str) -> Result<String> {
        let mut state = self.state();
        state.calls.push(Call::GetTemplate(stack_name.to_string()));
        state
            .stack
            .as_ref()
            .map(|s| s.template_body.clone())
            .ok_or_else(|| CloudError::not_found("GetTemplate", stack_name.to_string()))
    }

    async fn describe_stack_events(
        &self,
        stack_name: &str,
        next_token: Option<&str>,
    ) -> Result<EventPage> {
        let mut state = self.state();
        state.calls.push(Call::DescribeStackEvents {
            stack: stack_name.to_string(),
            token: next_token.map(str::to_string),
        });
        Ok(state.event_pages.pop_front().unwrap_or_default())
    }
}

#[async_trait]
impl FunctionProvider for FakeRegion {
    async fn update_function_code(&self, update: &FunctionUpdate) -> Result<Option<String>> {
        let mut state = self.state();
        state.calls.push(Call::UpdateFunctionCode(update.clone()));
        Ok(state.published_version.clone())
    }
}

/// Connector over a fixed set of fake regions
#[derive(Default)]
pub struct FakeCloud {
    regions: HashMap<String, Arc<FakeRegion>>,
    connected: Mutex<Vec<String>>,
}

impl FakeCloud {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_region(mut self, region: &str, fake: FakeRegion) -> Self {
        self.regions.insert(region.to_string(), Arc::new(fake));
        self
    }

    pub fn region(&self, region: &str) -> Option<Arc<FakeRegion>> {
        self.regions.get(region).cloned()
    }

    /// Regions `connect` was called for, in order
    pub fn connected(&self) -> Vec<String> {
        self.connected
            .lock()
            .expect("fake cloud state poisoned")
            .clone()
    }
}

#[async_trait]
impl CloudConnector for FakeCloud {
    fn name(&self) -> &str {
        "fake"
    }

    async fn connect(&self, region: &str) -> Result<RegionClients> {
        self.connected
            .lock()
            .expect("fake cloud state poisoned")
            .push(region.to_string());

        let fake = self
            .regions
            .get(region)
            .ok_or_else(|| CloudError::other("Connect", format!("unknown region {}", region)))?;
        Ok(fake.clients(region))
    }
}

/// Build an event page from bare ids
pub fn event_page(ids: &[&str], next_token: Option<&str>) -> EventPage {
    EventPage {
        events: ids.iter().map(|id| StackEvent::new(*id)).collect(),
        next_token: next_token.map(str::to_string),
    }
}

/// Reporter that keeps everything it is told
#[derive(Default)]
pub struct RecordingReporter {
    progress: Mutex<Vec<Progress>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn progress(&self) -> Vec<Progress> {
        self.progress.lock().expect("reporter poisoned").clone()
    }

    pub fn lines(&self) -> Vec<String> {
        self.progress().iter().map(|p| p.to_string()).collect()
    }

    /// Ids of the stack events reported, in order
    pub fn event_ids(&self) -> Vec<String> {
        self.progress()
            .into_iter()
            .filter_map(|p| match p {
                Progress::StackEvent { event, .. } => Some(event.event_id),
                _ => None,
            })
            .collect()
    }
}

impl Reporter for RecordingReporter {
    fn report(&self, progress: &Progress) {
        self.progress
            .lock()
            .expect("reporter poisoned")
            .push(progress.clone());
    }
}
