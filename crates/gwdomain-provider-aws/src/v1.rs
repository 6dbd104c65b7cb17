//! API Gateway (v1) over `aws-sdk-apigateway`
//!
//! Parameters and responses use the v1 field names (camelCase). List
//! responses carry their page under `items` and the continuation token under
//! `position`.

use crate::fields::{invalid, object, optional, required, string_map, tags, text};
use crate::sdk_error;
use aws_sdk_apigateway::Client;
use aws_sdk_apigateway::types::{
    EndpointConfiguration, EndpointType, MutualTlsAuthenticationInput, Op, PatchOperation,
    SecurityPolicy,
};
use gwdomain_core::error::ProviderError;
use gwdomain_core::operation::Operation;
use serde_json::Value;

/// Page size requested from `getBasePathMappings` (the service maximum)
pub const PAGE_LIMIT: i32 = 500;

// Create and get return different output types with the same accessors
macro_rules! domain_json {
    ($output:expr) => {{
        let output = &$output;
        object(vec![
            ("domainName", text(output.domain_name())),
            ("certificateArn", text(output.certificate_arn())),
            ("regionalCertificateArn", text(output.regional_certificate_arn())),
            ("regionalDomainName", text(output.regional_domain_name())),
            ("regionalHostedZoneId", text(output.regional_hosted_zone_id())),
            ("distributionDomainName", text(output.distribution_domain_name())),
            ("distributionHostedZoneId", text(output.distribution_hosted_zone_id())),
            (
                "securityPolicy",
                text(output.security_policy().map(SecurityPolicy::as_str)),
            ),
            ("tags", string_map(output.tags())),
        ])
    }};
}

macro_rules! mapping_json {
    ($mapping:expr) => {{
        let mapping = &$mapping;
        object(vec![
            ("basePath", text(mapping.base_path())),
            ("restApiId", text(mapping.rest_api_id())),
            ("stage", text(mapping.stage())),
        ])
    }};
}

/// Run one v1 operation
pub async fn send(client: &Client, operation: Operation, params: &Value) -> Result<Value, ProviderError> {
    let domain = required(params, operation, "domainName")?;

    match operation {
        Operation::CreateDomainNameV1 => {
            let output = client
                .create_domain_name()
                .domain_name(domain)
                .endpoint_configuration(endpoint_configuration(params))
                .set_security_policy(
                    optional(params, "securityPolicy").map(|p| SecurityPolicy::from(p.as_str())),
                )
                .set_certificate_arn(optional(params, "certificateArn"))
                .set_regional_certificate_arn(optional(params, "regionalCertificateArn"))
                .set_mutual_tls_authentication(mutual_tls(params))
                .set_tags(tags(params, "tags"))
                .send()
                .await
                .map_err(|e| sdk_error(operation, e))?;
            Ok(domain_json!(output))
        }
        Operation::GetDomainNameV1 => {
            let output = client
                .get_domain_name()
                .domain_name(domain)
                .send()
                .await
                .map_err(|e| sdk_error(operation, e))?;
            Ok(domain_json!(output))
        }
        Operation::DeleteDomainNameV1 => {
            client
                .delete_domain_name()
                .domain_name(domain)
                .send()
                .await
                .map_err(|e| sdk_error(operation, e))?;
            Ok(object(Vec::new()))
        }
        Operation::CreateBasePathMapping => {
            let output = client
                .create_base_path_mapping()
                .domain_name(domain)
                .rest_api_id(required(params, operation, "restApiId")?)
                .set_base_path(optional(params, "basePath"))
                .set_stage(optional(params, "stage"))
                .send()
                .await
                .map_err(|e| sdk_error(operation, e))?;
            Ok(mapping_json!(output))
        }
        Operation::GetBasePathMappings => {
            let output = client
                .get_base_path_mappings()
                .domain_name(domain)
                .limit(PAGE_LIMIT)
                .set_position(optional(params, "position"))
                .send()
                .await
                .map_err(|e| sdk_error(operation, e))?;
            let items = output.items().iter().map(|m| mapping_json!(m)).collect();
            Ok(object(vec![
                ("items", Value::Array(items)),
                ("position", text(output.position())),
            ]))
        }
        Operation::UpdateBasePathMapping => {
            let output = client
                .update_base_path_mapping()
                .domain_name(domain)
                .base_path(required(params, operation, "basePath")?)
                .set_patch_operations(Some(patch_operations(params)))
                .send()
                .await
                .map_err(|e| sdk_error(operation, e))?;
            Ok(mapping_json!(output))
        }
        Operation::DeleteBasePathMapping => {
            client
                .delete_base_path_mapping()
                .domain_name(domain)
                .base_path(required(params, operation, "basePath")?)
                .send()
                .await
                .map_err(|e| sdk_error(operation, e))?;
            Ok(object(Vec::new()))
        }
        _ => Err(invalid(operation, "not an API Gateway v1 operation")),
    }
}

fn endpoint_configuration(params: &Value) -> EndpointConfiguration {
    let types = params
        .pointer("/endpointConfiguration/types")
        .and_then(Value::as_array)
        .map(|types| {
            types
                .iter()
                .filter_map(Value::as_str)
                .map(EndpointType::from)
                .collect::<Vec<_>>()
        });
    EndpointConfiguration::builder().set_types(types).build()
}

fn mutual_tls(params: &Value) -> Option<MutualTlsAuthenticationInput> {
    let mtls = params.get("mutualTlsAuthentication")?;
    Some(
        MutualTlsAuthenticationInput::builder()
            .set_truststore_uri(optional(mtls, "truststoreUri"))
            .set_truststore_version(optional(mtls, "truststoreVersion"))
            .build(),
    )
}

fn patch_operations(params: &Value) -> Vec<PatchOperation> {
    params
        .get("patchOperations")
        .and_then(Value::as_array)
        .map(|patches| {
            patches
                .iter()
                .map(|patch| {
                    PatchOperation::builder()
                        .set_op(optional(patch, "op").map(|op| Op::from(op.as_str())))
                        .set_path(optional(patch, "path"))
                        .set_value(optional(patch, "value"))
                        .build()
                })
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_apigateway::operation::get_domain_name::GetDomainNameOutput;
    use aws_sdk_apigateway::types::BasePathMapping;
    use gwdomain_core::model::{ApiMapping, DomainInfo};
    use serde_json::json;

    #[test]
    fn test_domain_output_reads_as_domain_info() {
        let output = GetDomainNameOutput::builder()
            .domain_name("api.example.com")
            .regional_domain_name("d-abc123.execute-api.us-east-1.amazonaws.com")
            .regional_hosted_zone_id("Z1UJRXOUMOOFQ8")
            .security_policy(SecurityPolicy::Tls10)
            .tags("team", "payments")
            .build();

        let json = domain_json!(output);

        assert_eq!(json["securityPolicy"], "TLS_1_0");
        assert_eq!(json["tags"]["team"], "payments");
        assert!(json.get("distributionDomainName").is_none());

        let info = DomainInfo::from_response(&json).unwrap();
        assert_eq!(info.domain_name, "d-abc123.execute-api.us-east-1.amazonaws.com");
        assert_eq!(info.hosted_zone_id, "Z1UJRXOUMOOFQ8");
    }

    #[test]
    fn test_edge_domain_output() {
        let output = GetDomainNameOutput::builder()
            .domain_name("api.example.com")
            .distribution_domain_name("d111111abcdef8.cloudfront.net")
            .distribution_hosted_zone_id("Z2FDTNDATAQYW2")
            .build();

        let info = DomainInfo::from_response(&domain_json!(output)).unwrap();
        assert_eq!(info.domain_name, "d111111abcdef8.cloudfront.net");
        assert_eq!(info.security_policy, None);
    }

    #[test]
    fn test_mapping_item_reads_as_api_mapping() {
        let item = BasePathMapping::builder()
            .base_path("(none)")
            .rest_api_id("rest123")
            .stage("prod")
            .build();

        let mapping = ApiMapping::from_v1(&mapping_json!(item));
        assert_eq!(mapping.api_id, "rest123");
        assert_eq!(mapping.base_path(), "(none)");
        assert_eq!(mapping.stage, "prod");
    }

    #[test]
    fn test_patch_operations() {
        let patches = patch_operations(&json!({
            "patchOperations": [{ "op": "replace", "path": "/basePath", "value": "v2" }],
        }));

        assert_eq!(patches.len(), 1);
        assert_eq!(patches[0].op(), Some(&Op::Replace));
        assert_eq!(patches[0].path(), Some("/basePath"));
        assert_eq!(patches[0].value(), Some("v2"));

        assert!(patch_operations(&json!({})).is_empty());
    }

    #[test]
    fn test_mutual_tls_only_when_configured() {
        assert!(mutual_tls(&json!({ "domainName": "api.example.com" })).is_none());

        let mtls = mutual_tls(&json!({
            "mutualTlsAuthentication": { "truststoreUri": "s3://bucket/truststore.pem" },
        }))
        .unwrap();
        assert_eq!(mtls.truststore_uri(), Some("s3://bucket/truststore.pem"));
        assert_eq!(mtls.truststore_version(), None);
    }
}
