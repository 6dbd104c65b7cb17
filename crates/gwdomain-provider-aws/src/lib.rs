// # AWS API Gateway Client
//
// This crate provides the control plane clients for gwdomain: one
// `GatewayClient` per API Gateway generation, backed by
// `aws-sdk-apigateway` (v1) and `aws-sdk-apigatewayv2` (v2).
//
// ## Architectural Constraints
//
// ### Trust Level: Untrusted (control plane client)
//
// Clients are **untrusted** components with strict limitations:
//
// **Allowed Capabilities**:
// - ✅ Call the configured API Gateway endpoint through the SDK
// - ✅ Turn the dispatcher's parameter objects into SDK inputs, and SDK
//   outputs back into the dispatcher's field names
// - ✅ Report the service's own error code
//
// **Forbidden Capabilities**:
// - ❌ Retry or back off (SDK retries are disabled; owned by
//   `gwdomain_core::throttle::Throttled`)
// - ❌ Classify errors beyond the service's error code
// - ❌ Acquire credentials (static credentials from `ClientConfig` only)
//
// ## Security Requirements
//
// - The secret access key and session token NEVER appear in logs
//
// ## Field Names
//
// - v1: camelCase (`domainName`, `items`, `position`)
// - v2: PascalCase (`DomainName`, `Items`, `NextToken`)

mod fields;
pub mod v1;
pub mod v2;

use async_trait::async_trait;
use aws_config::retry::RetryConfig;
use aws_config::timeout::TimeoutConfig;
use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_credential_types::Credentials as StaticCredentials;
use aws_credential_types::provider::SharedCredentialsProvider;
use aws_sdk_apigateway::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use gwdomain_core::Result;
use gwdomain_core::config::ClientConfig;
use gwdomain_core::error::ProviderError;
use gwdomain_core::operation::{Generation, Operation};
use gwdomain_core::traits::{GatewayClient, GatewayClientFactory};
use serde_json::Value;
use std::time::Duration;

pub use fields::PARAM_VALIDATION_CODE;

/// Default timeout for one control plane call (30 seconds)
const DEFAULT_OPERATION_TIMEOUT: Duration = Duration::from_secs(30);

/// Name the static credentials are registered under in the SDK
const CREDENTIALS_PROVIDER_NAME: &str = "gwdomain";

/// Error code for calls that ended without a service error code
/// (dispatch failures, timeouts, unreadable responses)
pub const NETWORK_ERROR_CODE: &str = "NetworkError";

enum SdkClient {
    V1(aws_sdk_apigateway::Client),
    V2(aws_sdk_apigatewayv2::Client),
}

/// API Gateway client for one generation
///
/// # Trust Level: Untrusted
///
/// Single-shot: exactly one SDK call per `send`, with SDK retries disabled.
pub struct AwsGatewayClient {
    client: SdkClient,

    region: String,

    endpoint: Option<String>,
}

// Custom Debug implementation; the SDK config holds the credentials
impl std::fmt::Debug for AwsGatewayClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AwsGatewayClient")
            .field("generation", &self.generation())
            .field("region", &self.region)
            .field("endpoint", &self.endpoint)
            .field("credentials", &"<REDACTED>")
            .finish()
    }
}

impl AwsGatewayClient {
    /// Create a client for `generation`
    ///
    /// # Parameters
    ///
    /// - `config`: Region, optional endpoint override and static credentials
    /// - `generation`: The API generation this client serves
    pub fn new(config: &ClientConfig, generation: Generation) -> Self {
        let sdk_config = sdk_config(config);
        let client = match generation {
            Generation::V1 => SdkClient::V1(aws_sdk_apigateway::Client::new(&sdk_config)),
            Generation::V2 => SdkClient::V2(aws_sdk_apigatewayv2::Client::new(&sdk_config)),
        };

        Self {
            client,
            region: config.region.clone(),
            endpoint: config.endpoint.clone(),
        }
    }
}

/// Shared SDK configuration for both generations
///
/// Static credentials only, SDK retries disabled and a per-call timeout.
pub fn sdk_config(config: &ClientConfig) -> SdkConfig {
    let credentials = StaticCredentials::new(
        config.credentials.access_key_id.clone(),
        config.credentials.secret_access_key.clone(),
        config.credentials.session_token.clone(),
        None,
        CREDENTIALS_PROVIDER_NAME,
    );

    let mut builder = SdkConfig::builder()
        .behavior_version(BehaviorVersion::latest())
        .region(Region::new(config.region.clone()))
        .credentials_provider(SharedCredentialsProvider::new(credentials))
        .retry_config(RetryConfig::disabled())
        .timeout_config(
            TimeoutConfig::builder()
                .operation_timeout(DEFAULT_OPERATION_TIMEOUT)
                .build(),
        );

    if let Some(ref endpoint) = config.endpoint {
        tracing::info!("The API Gateway endpoint is {}", endpoint);
        builder = builder.endpoint_url(endpoint);
    }

    builder.build()
}

#[async_trait]
impl GatewayClient for AwsGatewayClient {
    async fn send(&self, operation: Operation, params: &Value) -> std::result::Result<Value, ProviderError> {
        if operation.generation() != self.generation() {
            return Err(ProviderError::new(
                PARAM_VALIDATION_CODE,
                format!("{} cannot be sent by a {} client", operation, self.generation()),
            ));
        }

        tracing::debug!("Sending {}", operation);
        match &self.client {
            SdkClient::V1(client) => v1::send(client, operation, params).await,
            SdkClient::V2(client) => v2::send(client, operation, params).await,
        }
    }

    fn generation(&self) -> Generation {
        match self.client {
            SdkClient::V1(_) => Generation::V1,
            SdkClient::V2(_) => Generation::V2,
        }
    }
}

/// Convert an SDK failure of either generation into a [`ProviderError`]
pub(crate) fn sdk_error<E, R>(operation: Operation, error: SdkError<E, R>) -> ProviderError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug,
{
    let converted = provider_error(error.code(), error.message(), || {
        DisplayErrorContext(&error).to_string()
    });
    tracing::debug!("{} failed: {}", operation, converted);
    converted
}

/// Build a [`ProviderError`] from the service's error metadata
///
/// The code is the service's own (`NotFoundException`,
/// `TooManyRequestsException`, ...). Without one the call never got a
/// service answer and the code is [`NETWORK_ERROR_CODE`]. `describe`
/// supplies the message when the service sent none.
pub fn provider_error(
    code: Option<&str>,
    message: Option<&str>,
    describe: impl FnOnce() -> String,
) -> ProviderError {
    let code = code.filter(|c| !c.is_empty()).unwrap_or(NETWORK_ERROR_CODE);
    let message = message
        .filter(|m| !m.is_empty())
        .map(str::to_string)
        .unwrap_or_else(describe);
    ProviderError::new(code, message)
}

/// Factory for API Gateway clients
pub struct AwsClientFactory;

impl GatewayClientFactory for AwsClientFactory {
    fn create(&self, config: &ClientConfig, generation: Generation) -> Result<Box<dyn GatewayClient>> {
        config.validate()?;
        tracing::debug!(
            "Creating API Gateway {} client for region {}",
            generation,
            config.region
        );
        Ok(Box::new(AwsGatewayClient::new(config, generation)))
    }
}
