//! ApiGatewayV2 over `aws-sdk-apigatewayv2`
//!
//! Parameters and responses use the v2 field names (PascalCase). List
//! responses carry their page under `Items` and the continuation token under
//! `NextToken`.

use crate::fields::{invalid, object, optional, required, string_map, tags, text};
use crate::sdk_error;
use aws_sdk_apigatewayv2::Client;
use aws_sdk_apigatewayv2::types::{
    DomainNameConfiguration, EndpointType, MutualTlsAuthenticationInput, SecurityPolicy,
};
use gwdomain_core::error::ProviderError;
use gwdomain_core::operation::Operation;
use serde_json::Value;

/// Page size requested from `GetApiMappings` (the API takes it as a string)
pub const PAGE_SIZE: &str = "100";

// Create and get return different output types with the same accessors
macro_rules! domain_json {
    ($output:expr) => {{
        let output = &$output;
        let configurations = output
            .domain_name_configurations()
            .iter()
            .map(configuration_json)
            .collect();
        object(vec![
            ("DomainName", text(output.domain_name())),
            ("DomainNameConfigurations", Value::Array(configurations)),
            ("Tags", string_map(output.tags())),
        ])
    }};
}

// Create, update and list items share accessors but not a type
macro_rules! mapping_json {
    ($mapping:expr) => {{
        let mapping = &$mapping;
        object(vec![
            ("ApiId", text(mapping.api_id())),
            ("ApiMappingId", text(mapping.api_mapping_id())),
            ("ApiMappingKey", text(mapping.api_mapping_key())),
            ("Stage", text(mapping.stage())),
        ])
    }};
}

/// Run one v2 operation
pub async fn send(client: &Client, operation: Operation, params: &Value) -> Result<Value, ProviderError> {
    let domain = required(params, operation, "DomainName")?;

    match operation {
        Operation::CreateDomainNameV2 => {
            let output = client
                .create_domain_name()
                .domain_name(domain)
                .set_domain_name_configurations(domain_name_configurations(params))
                .set_mutual_tls_authentication(mutual_tls(params))
                .set_tags(tags(params, "Tags"))
                .send()
                .await
                .map_err(|e| sdk_error(operation, e))?;
            Ok(domain_json!(output))
        }
        Operation::GetDomainNameV2 => {
            let output = client
                .get_domain_name()
                .domain_name(domain)
                .send()
                .await
                .map_err(|e| sdk_error(operation, e))?;
            Ok(domain_json!(output))
        }
        Operation::DeleteDomainNameV2 => {
            client
                .delete_domain_name()
                .domain_name(domain)
                .send()
                .await
                .map_err(|e| sdk_error(operation, e))?;
            Ok(object(Vec::new()))
        }
        Operation::CreateApiMapping => {
            let output = client
                .create_api_mapping()
                .domain_name(domain)
                .api_id(required(params, operation, "ApiId")?)
                .stage(required(params, operation, "Stage")?)
                .set_api_mapping_key(optional(params, "ApiMappingKey"))
                .send()
                .await
                .map_err(|e| sdk_error(operation, e))?;
            Ok(mapping_json!(output))
        }
        Operation::GetApiMappings => {
            let output = client
                .get_api_mappings()
                .domain_name(domain)
                .max_results(PAGE_SIZE)
                .set_next_token(optional(params, "NextToken"))
                .send()
                .await
                .map_err(|e| sdk_error(operation, e))?;
            let items = output.items().iter().map(|m| mapping_json!(m)).collect();
            Ok(object(vec![
                ("Items", Value::Array(items)),
                ("NextToken", text(output.next_token())),
            ]))
        }
        Operation::UpdateApiMapping => {
            let output = client
                .update_api_mapping()
                .domain_name(domain)
                .api_mapping_id(required(params, operation, "ApiMappingId")?)
                .api_id(required(params, operation, "ApiId")?)
                .set_api_mapping_key(optional(params, "ApiMappingKey"))
                .set_stage(optional(params, "Stage"))
                .send()
                .await
                .map_err(|e| sdk_error(operation, e))?;
            Ok(mapping_json!(output))
        }
        Operation::DeleteApiMapping => {
            client
                .delete_api_mapping()
                .domain_name(domain)
                .api_mapping_id(required(params, operation, "ApiMappingId")?)
                .send()
                .await
                .map_err(|e| sdk_error(operation, e))?;
            Ok(object(Vec::new()))
        }
        _ => Err(invalid(operation, "not an ApiGatewayV2 operation")),
    }
}

fn domain_name_configurations(params: &Value) -> Option<Vec<DomainNameConfiguration>> {
    let configurations = params
        .get("DomainNameConfigurations")
        .and_then(Value::as_array)?
        .iter()
        .map(|config| {
            DomainNameConfiguration::builder()
                .set_certificate_arn(optional(config, "CertificateArn"))
                .set_endpoint_type(
                    optional(config, "EndpointType").map(|t| EndpointType::from(t.as_str())),
                )
                .set_security_policy(
                    optional(config, "SecurityPolicy").map(|p| SecurityPolicy::from(p.as_str())),
                )
                .build()
        })
        .collect();
    Some(configurations)
}

fn configuration_json(config: &DomainNameConfiguration) -> Value {
    object(vec![
        ("ApiGatewayDomainName", text(config.api_gateway_domain_name())),
        ("CertificateArn", text(config.certificate_arn())),
        (
            "EndpointType",
            text(config.endpoint_type().map(EndpointType::as_str)),
        ),
        ("HostedZoneId", text(config.hosted_zone_id())),
        (
            "SecurityPolicy",
            text(config.security_policy().map(SecurityPolicy::as_str)),
        ),
    ])
}

fn mutual_tls(params: &Value) -> Option<MutualTlsAuthenticationInput> {
    let mtls = params.get("MutualTlsAuthentication")?;
    Some(
        MutualTlsAuthenticationInput::builder()
            .set_truststore_uri(optional(mtls, "TruststoreUri"))
            .set_truststore_version(optional(mtls, "TruststoreVersion"))
            .build(),
    )
}
