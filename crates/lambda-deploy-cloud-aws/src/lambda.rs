//! Lambda function code updates

use async_trait::async_trait;
use aws_sdk_lambda::Client;
use lambda_deploy_cloud::{ErrorKind, FunctionProvider, FunctionUpdate, Result};
use tracing::debug;

use crate::error::remote_error;

#[derive(Debug, Clone)]
pub struct LambdaFunctions {
    client: Client,
}

impl LambdaFunctions {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl FunctionProvider for LambdaFunctions {
    async fn update_function_code(&self, update: &FunctionUpdate) -> Result<Option<String>> {
        debug!(function = %update.function_name, "UpdateFunctionCode");
        let output = self
            .client
            .update_function_code()
            .function_name(&update.function_name)
            .s3_bucket(&update.s3_bucket)
            .s3_key(&update.s3_key)
            .publish(update.publish)
            .send()
            .await
            .map_err(|err| {
                let kind = if err
                    .as_service_error()
                    .map(|e| e.is_resource_not_found_exception())
                    .unwrap_or(false)
                {
                    ErrorKind::NotFound
                } else {
                    ErrorKind::Other
                };
                remote_error("UpdateFunctionCode", kind, &err)
            })?;

        Ok(output.version().map(str::to_string))
    }
}
