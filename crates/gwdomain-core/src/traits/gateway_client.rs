// # Gateway Client Traits
//
// Interfaces between the dispatcher and the control plane.
//
// ## Layers
//
// - `GatewayClient`: one generation's client. Makes exactly one provider
//   call per invocation and reports the provider's native error.
// - `Invoker`: the rate-limited call primitive. Routes an operation to
//   the right generation's client and applies throttling/backoff.
//
// The dispatcher only ever talks to an `Invoker`.
//
// ## Implementations
//
// - AWS API Gateway: `gwdomain-provider-aws` crate
// - Throttling: `gwdomain_core::throttle::Throttled`

use crate::config::ClientConfig;
use crate::error::ProviderError;
use crate::operation::{Generation, Operation};
use async_trait::async_trait;
use serde_json::Value;

/// One API generation's client
///
/// # Trust Level: Untrusted
///
/// Clients are single-shot: one HTTP request per `send`, no retries, no
/// backoff, no caching. Throttling is owned by the [`Invoker`].
#[async_trait]
pub trait GatewayClient: Send + Sync {
    /// Execute one provider operation
    ///
    /// # Parameters
    ///
    /// - `operation`: The operation to run; must belong to [`Self::generation`]
    /// - `params`: The operation's parameter object, in the generation's own
    ///   field names
    ///
    /// # Returns
    ///
    /// - `Ok(Value)`: The raw provider response
    /// - `Err(ProviderError)`: The provider's error code and message
    async fn send(&self, operation: Operation, params: &Value) -> Result<Value, ProviderError>;

    /// The generation this client speaks
    fn generation(&self) -> Generation;
}

/// The rate-limited call primitive
///
/// Implementations apply the provider's rate limiting/backoff and return
/// either the raw response or the provider's native error.
#[async_trait]
pub trait Invoker: Send + Sync {
    /// Invoke `operation` on the client of its generation
    async fn call(&self, operation: Operation, params: &Value) -> Result<Value, ProviderError>;
}

/// Helper trait for constructing clients from configuration
pub trait GatewayClientFactory: Send + Sync {
    /// Create a client for one generation
    fn create(
        &self,
        config: &ClientConfig,
        generation: Generation,
    ) -> Result<Box<dyn GatewayClient>, crate::Error>;
}
