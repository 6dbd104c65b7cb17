//! Generation selection
//!
//! Pure decision functions choosing which API generation serves a domain.
//!
//! Priority:
//!
//! 1. EDGE endpoints -> v1, whatever the pin (v2 has no edge support)
//! 2. An explicit `api_gateway_version` pin
//! 3. TLS_1_0 -> v1 (v2 lacks the legacy policy)
//! 4. Otherwise v2

use crate::model::{DomainRecord, EndpointType, SecurityPolicy};
use crate::operation::Generation;

/// Select the generation for the given domain attributes
pub fn select_generation(
    endpoint_type: EndpointType,
    security_policy: SecurityPolicy,
    pinned: Option<Generation>,
) -> Generation {
    if endpoint_type == EndpointType::Edge {
        return Generation::V1;
    }
    if let Some(generation) = pinned {
        return generation;
    }
    if security_policy == SecurityPolicy::Tls10 {
        return Generation::V1;
    }
    Generation::V2
}

/// Generation for create, lookup, delete, mapping create/list/delete
pub fn generation_for(record: &DomainRecord) -> Generation {
    select_generation(
        record.endpoint_type,
        record.security_policy,
        record.api_gateway_version,
    )
}

/// Generation for a mapping update
///
/// A domain cannot change generation in place, so the security policy
/// consulted is the one currently deployed (from `domain_info`), not the
/// configured one. Returns `None` when the domain has not been looked up.
pub fn generation_for_update(record: &DomainRecord) -> Option<Generation> {
    let deployed = record.domain_info.as_ref()?;
    // A deployed policy we cannot parse is newer than TLS_1_0
    let policy = deployed.security_policy.unwrap_or(SecurityPolicy::Tls12);
    Some(select_generation(
        record.endpoint_type,
        policy,
        record.api_gateway_version,
    ))
}
