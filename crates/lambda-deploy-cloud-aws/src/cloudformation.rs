//! CloudFormation stack operations

use async_trait::async_trait;
use aws_sdk_cloudformation::Client;
use aws_sdk_cloudformation::error::{ProvideErrorMetadata, SdkError};
use aws_sdk_cloudformation::primitives::DateTime as AwsDateTime;
use aws_sdk_cloudformation::types::{Capability, Parameter, Stack};
use chrono::{DateTime, Utc};
use lambda_deploy_cloud::{
    CloudError, ErrorKind, EventPage, Result, StackDescription, StackEvent, StackProvider,
    StackRequest, StackStatus,
};
use tracing::debug;

use crate::error::{classify_cloudformation, remote_error};

#[derive(Debug, Clone)]
pub struct CloudFormationStacks {
    client: Client,
}

impl CloudFormationStacks {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

fn stack_error<E, R>(operation: &'static str, err: &SdkError<E, R>) -> CloudError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug,
{
    let kind = classify_cloudformation(err.code(), err.message());
    remote_error(operation, kind, err)
}

fn capabilities(request: &StackRequest) -> Vec<Capability> {
    request
        .capabilities
        .iter()
        .map(|c| Capability::from(c.as_str()))
        .collect()
}

fn parameters(request: &StackRequest) -> Vec<Parameter> {
    request
        .parameters
        .iter()
        .map(|p| {
            Parameter::builder()
                .parameter_key(&p.key)
                .parameter_value(&p.value)
                .build()
        })
        .collect()
}

fn describe(stack: &Stack) -> StackDescription {
    let status = stack
        .stack_status()
        .map(|s| StackStatus::from(s.as_str()))
        .unwrap_or_else(|| StackStatus::Other("UNKNOWN".to_string()));

    let mut description = StackDescription::new(stack.stack_name().unwrap_or_default(), status);
    if let Some(reason) = stack.stack_status_reason() {
        description = description.with_reason(reason);
    }
    description.outputs = stack
        .outputs()
        .iter()
        .filter_map(|o| Some((o.output_key()?.to_string(), o.output_value()?.to_string())))
        .collect();
    description
}

fn to_utc(timestamp: &AwsDateTime) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(timestamp.secs(), timestamp.subsec_nanos())
}

fn to_event(event: &aws_sdk_cloudformation::types::StackEvent) -> StackEvent {
    let mut out = StackEvent::new(event.event_id().unwrap_or_default());
    out.timestamp = event.timestamp().and_then(to_utc);
    out.logical_resource_id = event.logical_resource_id().map(str::to_string);
    out.resource_status = event.resource_status().map(|s| s.as_str().to_string());
    out.resource_status_reason = event.resource_status_reason().map(str::to_string);
    out
}

#[async_trait]
impl StackProvider for CloudFormationStacks {
    async fn validate_template(&self, template_body: &str) -> Result<()> {
        self.client
            .validate_template()
            .template_body(template_body)
            .send()
            .await
            .map_err(|err| remote_error("ValidateTemplate", ErrorKind::Validation, &err))?;
        Ok(())
    }

    async fn describe_stack(&self, stack_name: &str) -> Result<StackDescription> {
        let output = self
            .client
            .describe_stacks()
            .stack_name(stack_name)
            .send()
            .await
            .map_err(|err| stack_error("DescribeStacks", &err))?;

        output.stacks().first().map(describe).ok_or_else(|| {
            CloudError::not_found("DescribeStacks", format!("Stack {stack_name} does not exist"))
        })
    }

    async fn create_stack(&self, request: &StackRequest) -> Result<()> {
        debug!(stack = %request.stack_name, "CreateStack");
        self.client
            .create_stack()
            .stack_name(&request.stack_name)
            .template_body(&request.template_body)
            .set_capabilities(Some(capabilities(request)))
            .set_parameters(Some(parameters(request)))
            .send()
            .await
            .map_err(|err| stack_error("CreateStack", &err))?;
        Ok(())
    }

    async fn update_stack(&self, request: &StackRequest) -> Result<()> {
        debug!(stack = %request.stack_name, "UpdateStack");
        self.client
            .update_stack()
            .stack_name(&request.stack_name)
            .template_body(&request.template_body)
            .set_capabilities(Some(capabilities(request)))
            .set_parameters(Some(parameters(request)))
            .send()
            .await
            .map_err(|err| stack_error("UpdateStack", &err))?;
        Ok(())
    }

    async fn get_template(&self, stack_name: &str) -> Result<String> {
        let output = self
            .client
            .get_template()
            .stack_name(stack_name)
            .send()
            .await
            .map_err(|err| stack_error("GetTemplate", &err))?;

        output
            .template_body()
            .map(str::to_string)
            .ok_or_else(|| CloudError::other("GetTemplate", "no template body returned"))
    }

    async fn describe_stack_events(
        &self,
        stack_name: &str,
        next_token: Option<&str>,
    ) -> Result<EventPage> {
        let output = self
            .client
            .describe_stack_events()
            .stack_name(stack_name)
            .set_next_token(next_token.map(str::to_string))
            .send()
            .await
            .map_err(|err| stack_error("DescribeStackEvents", &err))?;

        Ok(EventPage {
            events: output.stack_events().iter().map(to_event).collect(),
            next_token: output.next_token().map(str::to_string),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lambda_deploy_cloud::StackParameter;

    #[test]
    fn test_timestamp_conversion() {
        let ts = AwsDateTime::from_secs(1_700_000_000);
        let utc = to_utc(&ts).unwrap();
        assert_eq!(utc.to_rfc3339(), "2023-11-14T22:13:20+00:00");
    }

    #[test]
    fn test_request_mapping() {
        let request = StackRequest {
            stack_name: "svc-us-east-1-prod".into(),
            template_body: "{}".into(),
            capabilities: vec!["CAPABILITY_IAM".into()],
            parameters: vec![
                StackParameter::new("Environment", "prod"),
                StackParameter::new("Region", "us-east-1"),
            ],
        };

        assert_eq!(capabilities(&request), vec![Capability::CapabilityIam]);

        let params = parameters(&request);
        assert_eq!(params.len(), 2);
        assert_eq!(params[0].parameter_key(), Some("Environment"));
        assert_eq!(params[1].parameter_value(), Some("us-east-1"));
    }
}
