//! Rate-limited invocation
//!
//! [`Throttled`] is the call primitive the dispatcher goes through. It owns
//! the immutable pair of generation clients and the only retry policy in
//! the system: a provider throttling response is retried with exponential
//! backoff, every other outcome is handed back untouched.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────┐  call(op, params)  ┌───────────┐  send  ┌──────────────┐
//! │ Dispatcher │ ─────────────────▶ │ Throttled │ ─────▶ │ v1 / v2      │
//! └────────────┘                    │ (backoff) │        │ GatewayClient│
//!                                   └───────────┘        └──────────────┘
//! ```

use crate::config::{ClientConfig, ThrottleConfig};
use crate::error::{Error, ProviderError, Result};
use crate::operation::{Generation, Operation};
use crate::traits::{GatewayClient, GatewayClientFactory, Invoker};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// One client per API generation, built once per credential set
#[derive(Clone)]
pub struct ClientPair {
    v1: Arc<dyn GatewayClient>,
    v2: Arc<dyn GatewayClient>,
}

impl ClientPair {
    /// Pair two clients, checking each speaks the expected generation
    pub fn new(v1: Arc<dyn GatewayClient>, v2: Arc<dyn GatewayClient>) -> Result<Self> {
        if v1.generation() != Generation::V1 || v2.generation() != Generation::V2 {
            return Err(Error::config(
                "Client pair must hold a v1 client and a v2 client",
            ));
        }
        Ok(Self { v1, v2 })
    }

    /// Build both clients from one configuration
    pub fn from_factory(factory: &dyn GatewayClientFactory, config: &ClientConfig) -> Result<Self> {
        config.validate()?;
        let v1 = factory.create(config, Generation::V1)?;
        let v2 = factory.create(config, Generation::V2)?;
        Self::new(Arc::from(v1), Arc::from(v2))
    }

    /// The client serving `generation`
    pub fn client(&self, generation: Generation) -> &dyn GatewayClient {
        match generation {
            Generation::V1 => self.v1.as_ref(),
            Generation::V2 => self.v2.as_ref(),
        }
    }
}

/// Throttling wrapper implementing [`Invoker`]
#[derive(Clone)]
pub struct Throttled {
    clients: ClientPair,
    config: ThrottleConfig,
}

impl Throttled {
    pub fn new(clients: ClientPair, config: ThrottleConfig) -> Self {
        Self { clients, config }
    }

    /// Backoff before retry number `attempt` (zero based)
    fn delay_for(&self, attempt: usize) -> Duration {
        let factor = 1u64.checked_shl(attempt as u32).unwrap_or(u64::MAX);
        let delay = self.config.base_delay_ms.saturating_mul(factor);
        Duration::from_millis(delay.min(self.config.max_delay_ms))
    }
}

#[async_trait]
impl Invoker for Throttled {
    async fn call(
        &self,
        operation: Operation,
        params: &Value,
    ) -> std::result::Result<Value, ProviderError> {
        let client = self.clients.client(operation.generation());
        let mut attempt = 0;

        loop {
            match client.send(operation, params).await {
                Err(e) if e.is_throttling() && attempt < self.config.max_retries => {
                    let delay = self.delay_for(attempt);
                    debug!(
                        "{} throttled (attempt {}), retrying in {:?}",
                        operation, attempt, delay
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => {
                    if e.is_throttling() {
                        warn!("{} still throttled after {} retries", operation, attempt);
                    }
                    return Err(e);
                }
                Ok(response) => return Ok(response),
            }
        }
    }
}
