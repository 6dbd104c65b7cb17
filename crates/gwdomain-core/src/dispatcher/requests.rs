//! Generation-specific request builders
//!
//! Pure functions turning a [`DomainRecord`] into the parameter object of
//! one provider operation. v1 uses camelCase field names, v2 PascalCase.

use crate::model::{ApiType, DEFAULT_BASE_PATH, DEFAULT_STAGE, DomainRecord};
use crate::operation::Generation;
use serde_json::{Map, Value, json};
use std::collections::BTreeMap;

/// Where HTTP API stages are documented; quoted in stage warnings
pub const HTTP_STAGES_DOC: &str =
    "https://docs.aws.amazon.com/apigateway/latest/developerguide/http-api-stages.html";

/// Stage chosen for a v2 mapping
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageChoice {
    pub stage: String,
    /// An HTTP API is being mapped to something other than `$default`
    pub overrides_default: bool,
}

/// Stage for a v2 mapping
///
/// HTTP APIs only deploy the `$default` stage, so it is used unless a stage
/// was explicitly configured. Other API types use the record's stage.
pub fn v2_stage(record: &DomainRecord) -> StageChoice {
    if record.api_type == ApiType::Http {
        let stage = record.config_stage().unwrap_or(DEFAULT_STAGE).to_string();
        let overrides_default = stage != DEFAULT_STAGE;
        StageChoice {
            stage,
            overrides_default,
        }
    } else {
        StageChoice {
            stage: record.stage.clone(),
            overrides_default: false,
        }
    }
}

/// Warning emitted when an HTTP API is mapped to a non-default stage
pub fn http_stage_warning(stage: &str) -> String {
    format!(
        "Using the stage '{}' for the HTTP gateway type. Make sure the '{}' is set.\n{}",
        stage, DEFAULT_STAGE, HTTP_STAGES_DOC
    )
}

/// v2 mapping key for the record's base path; the `(none)` marker maps to ""
pub fn v2_mapping_key(record: &DomainRecord) -> &str {
    if record.base_path == DEFAULT_BASE_PATH {
        ""
    } else {
        &record.base_path
    }
}

/// Key of the currently resolved mapping in v1 terms
pub fn current_base_path(record: &DomainRecord) -> String {
    record
        .api_mapping
        .as_ref()
        .map(|m| m.base_path().to_string())
        .unwrap_or_else(|| DEFAULT_BASE_PATH.to_string())
}

/// `createDomainName` (v1)
pub fn create_domain_v1(record: &DomainRecord, tags: &BTreeMap<String, String>) -> Value {
    let mut params = Map::new();
    params.insert("domainName".into(), json!(record.given_domain_name()));
    params.insert(
        "endpointConfiguration".into(),
        json!({ "types": [record.endpoint_type.as_str()] }),
    );
    params.insert(
        "securityPolicy".into(),
        json!(record.security_policy.as_str()),
    );
    params.insert("tags".into(), json!(tags));

    if record.is_edge() {
        if let Some(ref arn) = record.certificate_arn {
            params.insert("certificateArn".into(), json!(arn));
        }
    } else {
        if let Some(ref arn) = record.certificate_arn {
            params.insert("regionalCertificateArn".into(), json!(arn));
        }
        if let Some(ref uri) = record.tls_truststore_uri {
            let mut mtls = Map::new();
            mtls.insert("truststoreUri".into(), json!(uri));
            if let Some(ref version) = record.tls_truststore_version {
                mtls.insert("truststoreVersion".into(), json!(version));
            }
            params.insert("mutualTlsAuthentication".into(), Value::Object(mtls));
        }
    }

    Value::Object(params)
}

/// `CreateDomainName` (v2)
pub fn create_domain_v2(record: &DomainRecord, tags: &BTreeMap<String, String>) -> Value {
    let mut config = Map::new();
    if let Some(ref arn) = record.certificate_arn {
        config.insert("CertificateArn".into(), json!(arn));
    }
    config.insert("EndpointType".into(), json!(record.endpoint_type.as_str()));
    config.insert(
        "SecurityPolicy".into(),
        json!(record.security_policy.as_str()),
    );

    let mut params = Map::new();
    params.insert("DomainName".into(), json!(record.given_domain_name()));
    params.insert(
        "DomainNameConfigurations".into(),
        Value::Array(vec![Value::Object(config)]),
    );
    params.insert("Tags".into(), json!(tags));

    if !record.is_edge()
        && let Some(ref uri) = record.tls_truststore_uri
    {
        let mut mtls = Map::new();
        mtls.insert("TruststoreUri".into(), json!(uri));
        if let Some(ref version) = record.tls_truststore_version {
            mtls.insert("TruststoreVersion".into(), json!(version));
        }
        params.insert("MutualTlsAuthentication".into(), Value::Object(mtls));
    }

    Value::Object(params)
}

/// Parameters naming only the domain (get/delete domain, list mappings)
pub fn domain_params(generation: Generation, record: &DomainRecord) -> Value {
    match generation {
        Generation::V1 => json!({ "domainName": record.given_domain_name() }),
        Generation::V2 => json!({ "DomainName": record.given_domain_name() }),
    }
}

/// `createBasePathMapping` (v1)
pub fn create_mapping_v1(record: &DomainRecord, api_id: &str) -> Value {
    json!({
        "basePath": record.base_path,
        "domainName": record.given_domain_name(),
        "restApiId": api_id,
        "stage": record.stage,
    })
}

/// `CreateApiMapping` (v2)
pub fn create_mapping_v2(record: &DomainRecord, api_id: &str, stage: &str) -> Value {
    json!({
        "ApiId": api_id,
        "ApiMappingKey": v2_mapping_key(record),
        "DomainName": record.given_domain_name(),
        "Stage": stage,
    })
}

/// `updateBasePathMapping` (v1): patch the base path of the current mapping
pub fn update_mapping_v1(record: &DomainRecord) -> Value {
    json!({
        "basePath": current_base_path(record),
        "domainName": record.given_domain_name(),
        "patchOperations": [{
            "op": "replace",
            "path": "/basePath",
            "value": record.base_path,
        }],
    })
}

/// `UpdateApiMapping` (v2): full update by mapping id
pub fn update_mapping_v2(record: &DomainRecord, api_id: &str, mapping_id: &str, stage: &str) -> Value {
    json!({
        "ApiId": api_id,
        "ApiMappingId": mapping_id,
        "ApiMappingKey": v2_mapping_key(record),
        "DomainName": record.given_domain_name(),
        "Stage": stage,
    })
}

/// `deleteBasePathMapping` (v1)
pub fn delete_mapping_v1(record: &DomainRecord) -> Value {
    json!({
        "basePath": current_base_path(record),
        "domainName": record.given_domain_name(),
    })
}

/// `DeleteApiMapping` (v2)
pub fn delete_mapping_v2(record: &DomainRecord, mapping_id: &str) -> Value {
    json!({
        "ApiMappingId": mapping_id,
        "DomainName": record.given_domain_name(),
    })
}
