//! Canonical view of a custom domain as reported by either generation

use super::SecurityPolicy;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Normalized result of a domain create or lookup
///
/// v1 reports `distributionDomainName`/`distributionHostedZoneId` for EDGE
/// domains and `regionalDomainName`/`regionalHostedZoneId` otherwise; v2
/// nests the same facts in `DomainNameConfigurations[0]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainInfo {
    /// Target domain name the custom domain should alias to
    pub domain_name: String,
    /// Hosted zone of the target domain
    pub hosted_zone_id: String,
    /// Security policy actually deployed on the remote side
    pub security_policy: Option<SecurityPolicy>,
}

impl DomainInfo {
    /// Build from a raw provider response of either generation
    ///
    /// Returns `None` when the response carries no target domain name.
    pub fn from_response(data: &Value) -> Option<Self> {
        let v2_config = data
            .get("DomainNameConfigurations")
            .and_then(|configs| configs.get(0));

        let domain_name = str_field(data, "distributionDomainName")
            .or_else(|| str_field(data, "regionalDomainName"))
            .or_else(|| v2_config.and_then(|c| str_field(c, "ApiGatewayDomainName")))?;

        let hosted_zone_id = str_field(data, "distributionHostedZoneId")
            .or_else(|| str_field(data, "regionalHostedZoneId"))
            .or_else(|| v2_config.and_then(|c| str_field(c, "HostedZoneId")))
            .unwrap_or_default();

        let security_policy = str_field(data, "securityPolicy")
            .or_else(|| v2_config.and_then(|c| str_field(c, "SecurityPolicy")))
            .and_then(|p| SecurityPolicy::parse(&p));

        Some(Self {
            domain_name,
            hosted_zone_id,
            security_policy,
        })
    }
}

fn str_field(value: &Value, field: &str) -> Option<String> {
    value
        .get(field)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
