//! Collaborator traits for the gwdomain system
//!
//! - [`GatewayClient`]: one API generation's single-shot client
//! - [`Invoker`]: rate-limited call primitive used by the dispatcher
//! - [`LogSink`]: operator-facing log entries

pub mod gateway_client;
pub mod log_sink;

pub use gateway_client::{GatewayClient, GatewayClientFactory, Invoker};
pub use log_sink::{LogSink, TracingLogSink};
