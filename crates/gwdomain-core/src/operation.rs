//! API generations and the provider operations the dispatcher issues
//!
//! The control plane exposes the same resources through two incompatible
//! API generations. Every call the dispatcher makes is named by an
//! [`Operation`], and every operation belongs to exactly one [`Generation`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the two API generations of the control plane
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Generation {
    /// API Gateway (v1): supports EDGE endpoints and TLS_1_0
    V1,
    /// ApiGatewayV2: REGIONAL endpoints with TLS_1_2 only
    V2,
}

impl Generation {
    /// Short label used in logs and error messages
    pub fn as_str(&self) -> &'static str {
        match self {
            Generation::V1 => "v1",
            Generation::V2 => "v2",
        }
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named provider operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    CreateDomainNameV1,
    GetDomainNameV1,
    DeleteDomainNameV1,
    CreateBasePathMapping,
    GetBasePathMappings,
    UpdateBasePathMapping,
    DeleteBasePathMapping,
    CreateDomainNameV2,
    GetDomainNameV2,
    DeleteDomainNameV2,
    CreateApiMapping,
    GetApiMappings,
    UpdateApiMapping,
    DeleteApiMapping,
}

impl Operation {
    /// The generation whose client serves this operation
    pub fn generation(&self) -> Generation {
        match self {
            Operation::CreateDomainNameV1
            | Operation::GetDomainNameV1
            | Operation::DeleteDomainNameV1
            | Operation::CreateBasePathMapping
            | Operation::GetBasePathMappings
            | Operation::UpdateBasePathMapping
            | Operation::DeleteBasePathMapping => Generation::V1,
            Operation::CreateDomainNameV2
            | Operation::GetDomainNameV2
            | Operation::DeleteDomainNameV2
            | Operation::CreateApiMapping
            | Operation::GetApiMappings
            | Operation::UpdateApiMapping
            | Operation::DeleteApiMapping => Generation::V2,
        }
    }

    /// The provider's own name for the operation
    pub fn name(&self) -> &'static str {
        match self {
            Operation::CreateDomainNameV1 => "createDomainName",
            Operation::GetDomainNameV1 => "getDomainName",
            Operation::DeleteDomainNameV1 => "deleteDomainName",
            Operation::CreateBasePathMapping => "createBasePathMapping",
            Operation::GetBasePathMappings => "getBasePathMappings",
            Operation::UpdateBasePathMapping => "updateBasePathMapping",
            Operation::DeleteBasePathMapping => "deleteBasePathMapping",
            Operation::CreateDomainNameV2 => "CreateDomainName",
            Operation::GetDomainNameV2 => "GetDomainName",
            Operation::DeleteDomainNameV2 => "DeleteDomainName",
            Operation::CreateApiMapping => "CreateApiMapping",
            Operation::GetApiMappings => "GetApiMappings",
            Operation::UpdateApiMapping => "UpdateApiMapping",
            Operation::DeleteApiMapping => "DeleteApiMapping",
        }
    }

    pub fn create_domain_name(generation: Generation) -> Self {
        match generation {
            Generation::V1 => Operation::CreateDomainNameV1,
            Generation::V2 => Operation::CreateDomainNameV2,
        }
    }

    pub fn get_domain_name(generation: Generation) -> Self {
        match generation {
            Generation::V1 => Operation::GetDomainNameV1,
            Generation::V2 => Operation::GetDomainNameV2,
        }
    }

    pub fn delete_domain_name(generation: Generation) -> Self {
        match generation {
            Generation::V1 => Operation::DeleteDomainNameV1,
            Generation::V2 => Operation::DeleteDomainNameV2,
        }
    }

    pub fn create_mapping(generation: Generation) -> Self {
        match generation {
            Generation::V1 => Operation::CreateBasePathMapping,
            Generation::V2 => Operation::CreateApiMapping,
        }
    }

    pub fn list_mappings(generation: Generation) -> Self {
        match generation {
            Generation::V1 => Operation::GetBasePathMappings,
            Generation::V2 => Operation::GetApiMappings,
        }
    }

    pub fn update_mapping(generation: Generation) -> Self {
        match generation {
            Generation::V1 => Operation::UpdateBasePathMapping,
            Generation::V2 => Operation::UpdateApiMapping,
        }
    }

    pub fn delete_mapping(generation: Generation) -> Self {
        match generation {
            Generation::V1 => Operation::DeleteBasePathMapping,
            Generation::V2 => Operation::DeleteApiMapping,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.generation())
    }
}
