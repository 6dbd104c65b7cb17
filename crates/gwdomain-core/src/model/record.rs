// # Domain Record
//
// In-memory configuration + state for one custom domain across a single
// invocation.
//
// ## Lifecycle
//
// 1. Built once per configured domain (see `config::DomainConfig::to_record`)
// 2. `domain_info` is filled by a domain lookup
// 3. `api_mapping` is filled by a mapping lookup
// 4. Mutation calls consume both within the same invocation
//
// Nothing here is persisted across invocations.

use super::{ApiMapping, DomainInfo};
use crate::operation::Generation;
use serde::{Deserialize, Serialize};

/// Marker used when no explicit base path is configured
pub const DEFAULT_BASE_PATH: &str = "(none)";

/// The platform default stage for HTTP APIs
pub const DEFAULT_STAGE: &str = "$default";

/// Base paths the control plane reserves for itself
pub const RESERVED_BASE_PATHS: &[&str] = &["ping", "sping"];

/// Network placement of a custom domain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EndpointType {
    #[default]
    Edge,
    Regional,
}

impl EndpointType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EndpointType::Edge => "EDGE",
            EndpointType::Regional => "REGIONAL",
        }
    }
}

/// TLS policy of a custom domain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SecurityPolicy {
    #[serde(rename = "TLS_1_0")]
    Tls10,
    #[default]
    #[serde(rename = "TLS_1_2")]
    Tls12,
}

impl SecurityPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            SecurityPolicy::Tls10 => "TLS_1_0",
            SecurityPolicy::Tls12 => "TLS_1_2",
        }
    }

    /// Parse the provider's string form; unknown policies yield `None`
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "TLS_1_0" => Some(SecurityPolicy::Tls10),
            "TLS_1_2" => Some(SecurityPolicy::Tls12),
            _ => None,
        }
    }
}

/// Kind of API a domain maps to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ApiType {
    Http,
    #[default]
    Rest,
    Websocket,
}

/// One custom-domain intent plus what the control plane reported about it
#[derive(Debug, Clone, PartialEq)]
pub struct DomainRecord {
    given_domain_name: String,

    /// Network placement; EDGE is only served by v1
    pub endpoint_type: EndpointType,

    /// Desired TLS policy; TLS_1_0 is only served by v1
    pub security_policy: SecurityPolicy,

    /// Explicit generation pin, authoritative when set
    pub api_gateway_version: Option<Generation>,

    /// TLS certificate reference
    pub certificate_arn: Option<String>,

    /// Mutual TLS truststore (non-edge domains only)
    pub tls_truststore_uri: Option<String>,
    pub tls_truststore_version: Option<String>,

    pub api_type: ApiType,
    pub api_id: Option<String>,

    /// Base path, `(none)` when not configured
    pub base_path: String,

    /// Effective stage for mappings
    pub stage: String,

    /// Stage explicitly set by configuration, if any
    config_stage: Option<String>,

    /// Most recently resolved mapping for `api_id`
    pub api_mapping: Option<ApiMapping>,

    /// Result of the most recent domain lookup
    pub domain_info: Option<DomainInfo>,
}

impl DomainRecord {
    /// Create a record with defaults for everything but the domain name
    pub fn new(given_domain_name: impl Into<String>) -> Self {
        Self {
            given_domain_name: given_domain_name.into(),
            endpoint_type: EndpointType::default(),
            security_policy: SecurityPolicy::default(),
            api_gateway_version: None,
            certificate_arn: None,
            tls_truststore_uri: None,
            tls_truststore_version: None,
            api_type: ApiType::default(),
            api_id: None,
            base_path: DEFAULT_BASE_PATH.to_string(),
            stage: DEFAULT_STAGE.to_string(),
            config_stage: None,
            api_mapping: None,
            domain_info: None,
        }
    }

    /// The user-facing custom domain name
    pub fn given_domain_name(&self) -> &str {
        &self.given_domain_name
    }

    /// The stage explicitly configured for this domain, if any
    pub fn config_stage(&self) -> Option<&str> {
        self.config_stage.as_deref()
    }

    pub fn is_edge(&self) -> bool {
        self.endpoint_type == EndpointType::Edge
    }

    pub fn with_endpoint_type(mut self, endpoint_type: EndpointType) -> Self {
        self.endpoint_type = endpoint_type;
        self
    }

    pub fn with_security_policy(mut self, security_policy: SecurityPolicy) -> Self {
        self.security_policy = security_policy;
        self
    }

    pub fn with_api_gateway_version(mut self, version: Generation) -> Self {
        self.api_gateway_version = Some(version);
        self
    }

    pub fn with_certificate_arn(mut self, arn: impl Into<String>) -> Self {
        self.certificate_arn = Some(arn.into());
        self
    }

    pub fn with_truststore(mut self, uri: impl Into<String>, version: Option<String>) -> Self {
        self.tls_truststore_uri = Some(uri.into());
        self.tls_truststore_version = version;
        self
    }

    pub fn with_api_type(mut self, api_type: ApiType) -> Self {
        self.api_type = api_type;
        self
    }

    pub fn with_api_id(mut self, api_id: impl Into<String>) -> Self {
        self.api_id = Some(api_id.into());
        self
    }

    /// Set the base path; blank values fall back to `(none)`
    pub fn with_base_path(mut self, base_path: impl Into<String>) -> Self {
        let base_path = base_path.into();
        self.base_path = if base_path.trim().is_empty() {
            DEFAULT_BASE_PATH.to_string()
        } else {
            base_path
        };
        self
    }

    /// Explicitly configure the stage
    pub fn with_stage(mut self, stage: impl Into<String>) -> Self {
        let stage = stage.into();
        self.stage = stage.clone();
        self.config_stage = Some(stage);
        self
    }

    /// Stage of the deployed service, used when no stage is configured
    pub fn with_service_stage(mut self, stage: impl Into<String>) -> Self {
        if self.config_stage.is_none() {
            self.stage = stage.into();
        }
        self
    }

    /// Whether the base path is one the control plane reserves
    pub fn has_reserved_base_path(&self) -> bool {
        RESERVED_BASE_PATHS.contains(&self.base_path.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let record = DomainRecord::new("api.example.com");
        assert_eq!(record.given_domain_name(), "api.example.com");
        assert_eq!(record.endpoint_type, EndpointType::Edge);
        assert_eq!(record.security_policy, SecurityPolicy::Tls12);
        assert_eq!(record.base_path, DEFAULT_BASE_PATH);
        assert!(record.config_stage().is_none());
        assert!(record.domain_info.is_none());
        assert!(record.api_mapping.is_none());
    }

    #[test]
    fn test_blank_base_path_uses_marker() {
        let record = DomainRecord::new("api.example.com").with_base_path("   ");
        assert_eq!(record.base_path, "(none)");

        let record = DomainRecord::new("api.example.com").with_base_path("v1");
        assert_eq!(record.base_path, "v1");
    }

    #[test]
    fn test_configured_stage_wins_over_service_stage() {
        let record = DomainRecord::new("api.example.com")
            .with_stage("prod")
            .with_service_stage("dev");
        assert_eq!(record.stage, "prod");
        assert_eq!(record.config_stage(), Some("prod"));

        let record = DomainRecord::new("api.example.com").with_service_stage("dev");
        assert_eq!(record.stage, "dev");
        assert_eq!(record.config_stage(), None);
    }

    #[test]
    fn test_reserved_base_path() {
        assert!(DomainRecord::new("a.example.com").with_base_path("ping").has_reserved_base_path());
        assert!(!DomainRecord::new("a.example.com").with_base_path("api").has_reserved_base_path());
    }

    #[test]
    fn test_enum_wire_names() {
        assert_eq!(serde_json::to_string(&SecurityPolicy::Tls10).unwrap(), "\"TLS_1_0\"");
        assert_eq!(serde_json::to_string(&EndpointType::Regional).unwrap(), "\"REGIONAL\"");
        assert_eq!(serde_json::to_string(&ApiType::Websocket).unwrap(), "\"WEBSOCKET\"");
        assert_eq!(SecurityPolicy::parse("TLS_1_3"), None);
    }
}
