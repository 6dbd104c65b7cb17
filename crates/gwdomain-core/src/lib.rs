// # gwdomain-core
//
// Core library for managing API Gateway custom domains across the two
// incompatible API generations of the control plane.
//
// ## Architecture Overview
//
// - **DomainRecord**: One configured custom domain plus resolved remote state
// - **selector**: Pure choice of API generation per record
// - **Dispatcher**: Builds generation-specific requests, calls the control
//   plane through an `Invoker`, normalizes responses, classifies errors
// - **Throttled**: The rate-limited call primitive over a v1/v2 client pair
// - **DomainManager**: Composes dispatcher calls into lifecycle commands
//
// ## Design Principles
//
// 1. **One tag resolution**: The generation is resolved once per call by the
//    selector; request builders are plain functions per generation
// 2. **No hidden globals**: Tags and the log sink travel in a `DispatchContext`
// 3. **Retry lives in one place**: Only `Throttled` retries, and only on
//    throttling responses
// 4. **"Not found" is state**: A missing domain is an absent result, not a
//    failure

pub mod config;
pub mod dispatcher;
pub mod error;
pub mod manager;
pub mod model;
pub mod operation;
pub mod selector;
pub mod throttle;
pub mod traits;

// Re-export core types for convenience
pub use config::{ClientConfig, Credentials, DomainConfig, ManagerConfig, ThrottleConfig};
pub use dispatcher::{DispatchContext, Dispatcher};
pub use error::{Error, ProviderError, Result};
pub use manager::{Command, DomainManager, Outcome, summary_lines};
pub use model::{ApiMapping, ApiType, DomainInfo, DomainRecord, EndpointType, SecurityPolicy};
pub use operation::{Generation, Operation};
pub use throttle::{ClientPair, Throttled};
pub use traits::{GatewayClient, GatewayClientFactory, Invoker, LogSink, TracingLogSink};
