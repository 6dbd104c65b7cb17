//! Logging collaborator
//!
//! Audit entries for successful mutations, warnings about configuration the
//! control plane will quietly override, and "does not exist" notices all go
//! through a [`LogSink`]. The sink is fire-and-forget.

use tracing::{error, info, warn};

/// Destination for operator-facing log entries
pub trait LogSink: Send + Sync {
    fn info(&self, message: &str);
    fn warning(&self, message: &str);
    fn error(&self, message: &str);
}

/// Default sink forwarding to `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogSink;

impl LogSink for TracingLogSink {
    fn info(&self, message: &str) {
        info!(target: "gwdomain", "{}", message);
    }

    fn warning(&self, message: &str) {
        warn!(target: "gwdomain", "{}", message);
    }

    fn error(&self, message: &str) {
        error!(target: "gwdomain", "{}", message);
    }
}
