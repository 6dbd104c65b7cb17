//! Configuration types for the gwdomain system
//!
//! This module defines all configuration structures used throughout the crate.
//! Parsing configuration files is left to the host; these types only derive
//! `serde` so hosts can embed them in whatever format they read.

use crate::model::{ApiType, DomainRecord, EndpointType, SecurityPolicy};
use crate::operation::Generation;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::warn;

/// Default AWS region for the control plane clients
pub const DEFAULT_REGION: &str = "us-east-1";

/// Top-level configuration for a [`crate::DomainManager`]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagerConfig {
    /// Custom domains to manage
    pub domains: Vec<DomainConfig>,

    /// Tags attached to every domain the manager creates
    #[serde(default)]
    pub tags: BTreeMap<String, String>,

    /// Stage of the deployed service, used when a domain sets no stage
    #[serde(default)]
    pub service_stage: Option<String>,

    /// Throttling behaviour of the call primitive
    #[serde(default)]
    pub throttle: ThrottleConfig,
}

impl ManagerConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.domains.is_empty() {
            return Err(crate::Error::config("No domains configured"));
        }

        let mut seen = std::collections::HashSet::new();
        for domain in &self.domains {
            domain.validate()?;
            if !seen.insert(domain.domain_name.as_str()) {
                return Err(crate::Error::config(format!(
                    "Domain '{}' is configured more than once",
                    domain.domain_name
                )));
            }
        }

        self.throttle.validate()?;
        Ok(())
    }

    /// Build one record per enabled domain
    pub fn records(&self) -> Result<Vec<DomainRecord>, crate::Error> {
        self.domains
            .iter()
            .filter(|d| d.enabled)
            .map(|d| d.to_record(self.service_stage.as_deref()))
            .collect()
    }
}

/// Configuration of one custom domain
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainConfig {
    /// The custom domain name (e.g. "api.example.com")
    pub domain_name: String,

    #[serde(default)]
    pub endpoint_type: EndpointType,

    #[serde(default)]
    pub security_policy: SecurityPolicy,

    /// Pin a generation instead of deriving it
    #[serde(default)]
    pub api_gateway_version: Option<Generation>,

    #[serde(default)]
    pub certificate_arn: Option<String>,

    /// `s3://` URI of the mutual TLS truststore
    #[serde(default)]
    pub tls_truststore_uri: Option<String>,

    #[serde(default)]
    pub tls_truststore_version: Option<String>,

    #[serde(default)]
    pub api_type: ApiType,

    #[serde(default)]
    pub api_id: Option<String>,

    #[serde(default)]
    pub base_path: Option<String>,

    #[serde(default)]
    pub stage: Option<String>,

    /// Whether this domain is managed at all
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

impl DomainConfig {
    /// Create a configuration with defaults
    pub fn new(domain_name: impl Into<String>) -> Self {
        Self {
            domain_name: domain_name.into(),
            endpoint_type: EndpointType::default(),
            security_policy: SecurityPolicy::default(),
            api_gateway_version: None,
            certificate_arn: None,
            tls_truststore_uri: None,
            tls_truststore_version: None,
            api_type: ApiType::default(),
            api_id: None,
            base_path: None,
            stage: None,
            enabled: true,
        }
    }

    /// Validate the domain configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.domain_name.trim().is_empty() {
            return Err(crate::Error::config("Domain name cannot be empty"));
        }

        if self.endpoint_type == EndpointType::Edge
            && self.api_gateway_version == Some(Generation::V2)
        {
            return Err(crate::Error::config(format!(
                "'{}': EDGE domains are only supported by API Gateway v1",
                self.domain_name
            )));
        }

        match (&self.tls_truststore_uri, &self.tls_truststore_version) {
            (None, Some(_)) => {
                return Err(crate::Error::config(format!(
                    "'{}': tlsTruststoreVersion requires tlsTruststoreUri",
                    self.domain_name
                )));
            }
            (Some(uri), _) => {
                if self.endpoint_type == EndpointType::Edge {
                    return Err(crate::Error::config(format!(
                        "'{}': EDGE domains do not support mutual TLS",
                        self.domain_name
                    )));
                }
                if !uri.starts_with("s3://") {
                    return Err(crate::Error::config(format!(
                        "'{}': tlsTruststoreUri must be an s3:// URI. Got: {}",
                        self.domain_name, uri
                    )));
                }
            }
            (None, None) => {}
        }

        Ok(())
    }

    /// Validate and build the in-memory record
    ///
    /// # Parameters
    ///
    /// - `service_stage`: Stage of the deployed service, used when no stage
    ///   is configured for this domain
    pub fn to_record(&self, service_stage: Option<&str>) -> Result<DomainRecord, crate::Error> {
        self.validate()?;

        let mut record = DomainRecord::new(self.domain_name.trim())
            .with_endpoint_type(self.endpoint_type)
            .with_security_policy(self.security_policy)
            .with_api_type(self.api_type)
            .with_base_path(self.base_path.clone().unwrap_or_default());

        record.api_gateway_version = self.api_gateway_version;
        record.certificate_arn = self.certificate_arn.clone();
        record.api_id = self.api_id.clone();

        if let Some(ref uri) = self.tls_truststore_uri {
            record = record.with_truststore(uri.clone(), self.tls_truststore_version.clone());
        }

        if let Some(ref stage) = self.stage {
            record = record.with_stage(stage.clone());
        } else if let Some(stage) = service_stage {
            record = record.with_service_stage(stage);
        }

        if record.has_reserved_base_path() {
            warn!(
                "The base path '{}' of '{}' is reserved by API Gateway and may not route as expected",
                record.base_path,
                record.given_domain_name()
            );
        }

        Ok(record)
    }
}

/// Connection settings for the control plane clients
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfig {
    #[serde(default = "default_region")]
    pub region: String,

    /// Override of the control plane endpoint (e.g. a local emulator)
    #[serde(default)]
    pub endpoint: Option<String>,

    pub credentials: Credentials,
}

impl ClientConfig {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            region: default_region(),
            endpoint: None,
            credentials,
        }
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    /// Validate the client configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.region.is_empty() {
            return Err(crate::Error::config("Region cannot be empty"));
        }
        if self.credentials.access_key_id.is_empty() || self.credentials.secret_access_key.is_empty()
        {
            return Err(crate::Error::config("AWS credentials are required"));
        }
        if let Some(ref endpoint) = self.endpoint
            && !endpoint.starts_with("https://")
            && !endpoint.starts_with("http://")
        {
            return Err(crate::Error::config(format!(
                "Endpoint must use HTTP or HTTPS scheme. Got: {}",
                endpoint
            )));
        }
        Ok(())
    }
}

// Custom Debug implementation that keeps the secret out of logs
impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("region", &self.region)
            .field("endpoint", &self.endpoint)
            .field("credentials", &self.credentials)
            .finish()
    }
}

/// Static AWS credentials, supplied by the host
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    pub access_key_id: String,
    /// ⚠️ NEVER log this value
    pub secret_access_key: String,
    #[serde(default)]
    pub session_token: Option<String>,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<REDACTED>")
            .field(
                "session_token",
                &self.session_token.as_ref().map(|_| "<REDACTED>"),
            )
            .finish()
    }
}

/// Throttling behaviour of the rate-limited call primitive
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThrottleConfig {
    /// Retries after a throttling response before giving up
    #[serde(default = "default_max_retries")]
    pub max_retries: usize,

    /// Delay before the first retry, doubled on every further retry
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,

    /// Upper bound of a single retry delay
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
}

impl ThrottleConfig {
    /// Validate the throttle configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.max_retries > 20 {
            return Err(crate::Error::config(format!(
                "Throttle max retries must be at most 20. Got: {}",
                self.max_retries
            )));
        }
        if self.base_delay_ms > self.max_delay_ms {
            return Err(crate::Error::config(
                "Throttle base delay cannot exceed the max delay",
            ));
        }
        Ok(())
    }
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            base_delay_ms: default_base_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
        }
    }
}

fn default_region() -> String {
    DEFAULT_REGION.to_string()
}

fn default_enabled() -> bool {
    true
}

fn default_max_retries() -> usize {
    5
}

fn default_base_delay_ms() -> u64 {
    500
}

fn default_max_delay_ms() -> u64 {
    8_000
}
