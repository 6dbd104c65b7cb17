//! Error types for the gwdomain system
//!
//! Two layers live here:
//!
//! - [`ProviderError`]: the control plane's native error as surfaced by the
//!   call primitive (an error code plus a message).
//! - [`Error`]: the classified failures the dispatcher hands back to callers.
//!   Every lifecycle variant carries the domain name, the attempted
//!   [`Operation`] and the upstream message.

use crate::operation::Operation;
use thiserror::Error;

/// Result type alias for gwdomain operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error code the control plane uses for missing resources
pub const NOT_FOUND_CODE: &str = "NotFoundException";

/// Error code the control plane uses when a caller is being rate limited
pub const THROTTLING_CODE: &str = "TooManyRequestsException";

/// Native error raised by a provider call
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{code}: {message}")]
pub struct ProviderError {
    /// Provider error code (e.g. `NotFoundException`)
    pub code: String,
    /// Human-readable message from the provider
    pub message: String,
}

impl ProviderError {
    /// Create a provider error
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Create a `NotFoundException` error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(NOT_FOUND_CODE, message)
    }

    /// Create a `TooManyRequestsException` error
    pub fn throttled(message: impl Into<String>) -> Self {
        Self::new(THROTTLING_CODE, message)
    }

    /// Whether the provider reported the resource as missing
    pub fn is_not_found(&self) -> bool {
        self.code == NOT_FOUND_CODE
    }

    /// Whether the provider asked the caller to slow down
    pub fn is_throttling(&self) -> bool {
        self.code == THROTTLING_CODE
    }
}

/// Core error type for the gwdomain system
#[derive(Error, Debug)]
pub enum Error {
    /// Custom domain creation failed
    #[error("API Gateway {} failed to create custom domain '{domain}':\n{message}", .operation.generation())]
    DomainCreate {
        domain: String,
        operation: Operation,
        message: String,
    },

    /// Custom domain lookup failed for a reason other than "not found"
    #[error("Unable to fetch information about '{domain}':\n{message}")]
    DomainLookup {
        domain: String,
        operation: Operation,
        message: String,
    },

    /// Custom domain deletion failed
    #[error("Failed to delete custom domain '{domain}':\n{message}")]
    DomainDelete {
        domain: String,
        operation: Operation,
        message: String,
    },

    /// Base path / API mapping creation failed
    #[error("Make sure the '{domain}' exists. Unable to create base path mapping for '{domain}':\n{message}")]
    MappingCreate {
        domain: String,
        operation: Operation,
        message: String,
    },

    /// Base path / API mapping update failed
    #[error("Unable to update base path mapping for '{domain}':\n{message}")]
    MappingUpdate {
        domain: String,
        operation: Operation,
        message: String,
    },

    /// Base path / API mapping removal failed
    #[error("Unable to remove base path mapping for '{domain}':\n{message}")]
    MappingDelete {
        domain: String,
        operation: Operation,
        message: String,
    },

    /// Listing mappings failed
    #[error("Make sure the '{domain}' exists. Unable to get API mappings ({}):\n{message}", .operation.generation())]
    MappingList {
        domain: String,
        operation: Operation,
        message: String,
    },

    /// A lifecycle call was made before the state it depends on was resolved
    #[error("Cannot run {operation} for '{domain}': {message}")]
    Precondition {
        domain: String,
        operation: Operation,
        message: String,
    },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// A unit of work ended without producing a result (panicked or
    /// cancelled task)
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a precondition violation
    pub fn precondition(
        domain: impl Into<String>,
        operation: Operation,
        message: impl Into<String>,
    ) -> Self {
        Self::Precondition {
            domain: domain.into(),
            operation,
            message: message.into(),
        }
    }

    /// The domain this error refers to, if it is a lifecycle error
    pub fn domain(&self) -> Option<&str> {
        match self {
            Self::DomainCreate { domain, .. }
            | Self::DomainLookup { domain, .. }
            | Self::DomainDelete { domain, .. }
            | Self::MappingCreate { domain, .. }
            | Self::MappingUpdate { domain, .. }
            | Self::MappingDelete { domain, .. }
            | Self::MappingList { domain, .. }
            | Self::Precondition { domain, .. } => Some(domain),
            _ => None,
        }
    }

    /// The provider operation that was attempted, if any
    pub fn operation(&self) -> Option<Operation> {
        match self {
            Self::DomainCreate { operation, .. }
            | Self::DomainLookup { operation, .. }
            | Self::DomainDelete { operation, .. }
            | Self::MappingCreate { operation, .. }
            | Self::MappingUpdate { operation, .. }
            | Self::MappingDelete { operation, .. }
            | Self::MappingList { operation, .. }
            | Self::Precondition { operation, .. } => Some(*operation),
            _ => None,
        }
    }
}
