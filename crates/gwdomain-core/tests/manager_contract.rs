//! Architectural Contract Test: Lifecycle Manager
//!
//! Constraints verified:
//! - Lookup always precedes mutation on a record
//! - Deploy creates, updates or leaves a mapping alone depending on
//!   remote state
//! - Commands on a missing domain skip instead of failing (except deploy)
//! - Deploy lists mappings through the generation the update will use
//! - run_all reports exactly one result per record, in input order, even
//!   when a record's task dies

mod common;

use common::*;
use gwdomain_core::dispatcher::{DispatchContext, Dispatcher};
use gwdomain_core::error::ProviderError;
use gwdomain_core::manager::{Command, DomainManager, Outcome};
use gwdomain_core::model::SecurityPolicy;
use gwdomain_core::operation::Operation;
use gwdomain_core::traits::Invoker;
use gwdomain_core::{Error, summary_lines};
use serde_json::{Value, json};
use std::collections::BTreeMap;
use std::sync::Arc;

fn manager() -> (
    DomainManager,
    std::sync::Arc<MockInvoker>,
    std::sync::Arc<RecordingLogSink>,
) {
    let (dispatcher, invoker, sink) = dispatcher();
    (DomainManager::new(dispatcher), invoker, sink)
}

fn missing() -> Result<serde_json::Value, ProviderError> {
    Err(ProviderError::not_found("Invalid domain name identifier specified"))
}

#[tokio::test]
async fn create_skips_existing_domain() {
    let (manager, invoker, sink) = manager();
    let mut record = regional_record("api.example.com");
    invoker.respond(Operation::GetDomainNameV2, Ok(v2_domain()));

    let outcome = manager.run(Command::Create, &mut record).await.unwrap();

    assert_eq!(outcome, Outcome::Unchanged);
    assert_eq!(invoker.operations(), vec![Operation::GetDomainNameV2]);
    assert_eq!(
        sink.at(Level::Info),
        vec!["Custom domain 'api.example.com' already exists."]
    );
    assert!(record.domain_info.is_some());
}

#[tokio::test]
async fn create_new_domain_stores_info() {
    let (manager, invoker, _) = manager();
    let mut record = regional_record("api.example.com");
    invoker.respond(Operation::GetDomainNameV2, missing());
    invoker.respond(Operation::CreateDomainNameV2, Ok(v2_domain()));

    let outcome = manager.run(Command::Create, &mut record).await.unwrap();

    assert_eq!(outcome, Outcome::Created);
    assert_eq!(
        invoker.operations(),
        vec![Operation::GetDomainNameV2, Operation::CreateDomainNameV2]
    );
    assert_eq!(
        record.domain_info.as_ref().map(|i| i.hosted_zone_id.as_str()),
        Some("Z1UJRXOUMOOFQ8")
    );
}

#[tokio::test]
async fn deploy_creates_missing_mapping() {
    let (manager, invoker, _) = manager();
    let mut record = regional_record("api.example.com").with_base_path("orders");
    invoker.respond(Operation::GetDomainNameV2, Ok(v2_domain()));
    invoker.respond(Operation::GetApiMappings, Ok(json!({ "Items": [] })));

    let outcome = manager.run(Command::Deploy, &mut record).await.unwrap();

    assert_eq!(outcome, Outcome::Created);
    assert_eq!(
        invoker.operations(),
        vec![
            Operation::GetDomainNameV2,
            Operation::GetApiMappings,
            Operation::CreateApiMapping,
        ]
    );
}

#[tokio::test]
async fn deploy_moves_changed_base_path() {
    let (manager, invoker, _) = manager();
    let mut record = regional_record("api.example.com").with_base_path("orders");
    invoker.respond(Operation::GetDomainNameV2, Ok(v2_domain()));
    invoker.respond(
        Operation::GetApiMappings,
        Ok(json!({ "Items": [
            { "ApiId": "api123", "ApiMappingId": "m-1", "ApiMappingKey": "legacy", "Stage": "dev" }
        ] })),
    );

    let outcome = manager.run(Command::Deploy, &mut record).await.unwrap();

    assert_eq!(outcome, Outcome::Updated);
    let calls = invoker.calls();
    assert_eq!(calls[2].0, Operation::UpdateApiMapping);
    assert_eq!(calls[2].1["ApiMappingId"], "m-1");
    assert_eq!(calls[2].1["ApiMappingKey"], "orders");
}

#[tokio::test]
async fn deploy_leaves_matching_mapping_alone() {
    let (manager, invoker, _) = manager();
    let mut record = regional_record("api.example.com");
    invoker.respond(Operation::GetDomainNameV2, Ok(v2_domain()));
    invoker.respond(
        Operation::GetApiMappings,
        Ok(json!({ "Items": [
            { "ApiId": "api123", "ApiMappingId": "m-1", "ApiMappingKey": "", "Stage": "dev" }
        ] })),
    );

    let outcome = manager.run(Command::Deploy, &mut record).await.unwrap();

    assert_eq!(outcome, Outcome::Unchanged);
    assert_eq!(invoker.call_count(), 2);
}

#[tokio::test]
async fn deploy_follows_deployed_policy_when_listing_mappings() {
    let (manager, invoker, _) = manager();
    // Configured TLS_1_0 (looked up through v1), deployed as TLS_1_2 (updated through v2)
    let mut record = regional_record("api.example.com")
        .with_security_policy(SecurityPolicy::Tls10)
        .with_base_path("orders");
    invoker.respond(Operation::GetDomainNameV1, Ok(v1_regional_domain("TLS_1_2")));
    invoker.respond(
        Operation::GetApiMappings,
        Ok(json!({ "Items": [
            { "ApiId": "api123", "ApiMappingId": "m-7", "ApiMappingKey": "legacy", "Stage": "dev" }
        ] })),
    );

    let outcome = manager.run(Command::Deploy, &mut record).await.unwrap();

    assert_eq!(outcome, Outcome::Updated);
    assert_eq!(
        invoker.operations(),
        vec![
            Operation::GetDomainNameV1,
            Operation::GetApiMappings,
            Operation::UpdateApiMapping,
        ]
    );
    let calls = invoker.calls();
    assert_eq!(calls[2].1["ApiMappingId"], "m-7");
    assert_eq!(calls[2].1["ApiMappingKey"], "orders");
}

#[tokio::test]
async fn deploy_to_missing_domain_fails() {
    let (manager, invoker, _) = manager();
    let mut record = regional_record("api.example.com");
    invoker.respond(Operation::GetDomainNameV2, missing());

    let err = manager.run(Command::Deploy, &mut record).await.unwrap_err();

    assert!(matches!(err, Error::Precondition { .. }));
    assert_eq!(invoker.call_count(), 1);
}

#[tokio::test]
async fn undeploy_without_mapping_is_skipped() {
    let (manager, invoker, _) = manager();
    let mut record = edge_record("api.example.com");
    invoker.respond(
        Operation::GetBasePathMappings,
        Ok(json!({ "items": [{ "restApiId": "someone-else", "basePath": "x", "stage": "dev" }] })),
    );

    let outcome = manager.run(Command::Undeploy, &mut record).await.unwrap();

    assert!(matches!(outcome, Outcome::Skipped { .. }));
    assert_eq!(invoker.operations(), vec![Operation::GetBasePathMappings]);
}

#[tokio::test]
async fn undeploy_removes_resolved_mapping() {
    let (manager, invoker, _) = manager();
    let mut record = edge_record("api.example.com");
    invoker.respond(
        Operation::GetBasePathMappings,
        Ok(json!({ "items": [{ "restApiId": "rest123", "basePath": "v1", "stage": "dev" }] })),
    );

    let outcome = manager.run(Command::Undeploy, &mut record).await.unwrap();

    assert_eq!(outcome, Outcome::Deleted);
    let calls = invoker.calls();
    assert_eq!(calls[1].0, Operation::DeleteBasePathMapping);
    assert_eq!(calls[1].1["basePath"], "v1");
    assert!(record.api_mapping.is_none());
}

#[tokio::test]
async fn delete_of_missing_domain_is_skipped() {
    let (manager, invoker, _) = manager();
    let mut record = regional_record("api.example.com");
    invoker.respond(Operation::GetDomainNameV2, missing());

    let outcome = manager.run(Command::Delete, &mut record).await.unwrap();

    assert!(matches!(outcome, Outcome::Skipped { .. }));
    assert_eq!(invoker.call_count(), 1);
}

#[tokio::test]
async fn delete_existing_domain_clears_state() {
    let (manager, invoker, _) = manager();
    let mut record = regional_record("api.example.com");
    invoker.respond(Operation::GetDomainNameV2, Ok(v2_domain()));

    let outcome = manager.run(Command::Delete, &mut record).await.unwrap();

    assert_eq!(outcome, Outcome::Deleted);
    assert_eq!(
        invoker.operations(),
        vec![Operation::GetDomainNameV2, Operation::DeleteDomainNameV2]
    );
    assert!(record.domain_info.is_none());
}

#[tokio::test]
async fn run_all_keeps_input_order() {
    let (manager, invoker, _) = manager();
    // Different generations so each record reads its own response queue
    invoker.respond(Operation::GetDomainNameV2, missing());
    invoker.respond(Operation::GetDomainNameV1, Ok(v1_regional_domain("TLS_1_2")));
    let records = vec![
        regional_record("missing.example.com"),
        edge_record("api.example.com"),
    ];

    let results = manager.run_all(records, Command::Info).await;

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].0.given_domain_name(), "missing.example.com");
    assert!(matches!(results[0].1, Ok(Outcome::Skipped { .. })));
    assert_eq!(results[1].0.given_domain_name(), "api.example.com");
    assert!(matches!(results[1].1, Ok(Outcome::Unchanged)));

    let resolved: Vec<_> = results.into_iter().map(|(record, _)| record).collect();
    assert_eq!(
        summary_lines(&resolved),
        vec![
            "Domain Name: api.example.com",
            "Target Domain: d-abc123.execute-api.us-east-1.amazonaws.com",
            "Hosted Zone Id: Z1UJRXOUMOOFQ8",
        ]
    );
}

/// Panics on every call for one domain; every other domain is missing
struct PanicsFor(&'static str);

#[async_trait::async_trait]
impl Invoker for PanicsFor {
    async fn call(&self, _operation: Operation, params: &Value) -> Result<Value, ProviderError> {
        if params["DomainName"] == self.0 {
            panic!("lost connection while talking about {}", self.0);
        }
        missing()
    }
}

#[tokio::test]
async fn run_all_reports_task_that_died() {
    let context = DispatchContext::new(BTreeMap::new(), Arc::new(RecordingLogSink::default()));
    let manager = DomainManager::new(Dispatcher::new(Arc::new(PanicsFor("b.example.com")), context));
    let records = vec![
        regional_record("a.example.com"),
        regional_record("b.example.com"),
        regional_record("c.example.com"),
    ];

    let results = manager.run_all(records, Command::Info).await;

    let names: Vec<_> = results
        .iter()
        .map(|(record, _)| record.given_domain_name().to_string())
        .collect();
    assert_eq!(names, vec!["a.example.com", "b.example.com", "c.example.com"]);
    assert!(matches!(results[0].1, Ok(Outcome::Skipped { .. })));
    assert!(matches!(results[2].1, Ok(Outcome::Skipped { .. })));
    match &results[1].1 {
        Err(Error::Other(message)) => assert!(message.contains("b.example.com")),
        other => panic!("expected the dead task to be reported, got {:?}", other),
    }
}
