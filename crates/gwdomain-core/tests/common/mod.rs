//! Test doubles and common utilities for dispatcher contract tests
//!
//! This module provides a scripted call primitive and a recording log sink
//! so tests can observe exactly which provider operations were issued and
//! what the operator would have seen.

#![allow(dead_code)]

use gwdomain_core::dispatcher::{DispatchContext, Dispatcher};
use gwdomain_core::error::ProviderError;
use gwdomain_core::model::{DomainInfo, DomainRecord, EndpointType, SecurityPolicy};
use gwdomain_core::operation::Operation;
use gwdomain_core::traits::{Invoker, LogSink};
use serde_json::{Value, json};
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// A scripted Invoker that records every call
///
/// Responses are queued per operation; an operation with nothing queued
/// answers with an empty object.
#[derive(Default)]
pub struct MockInvoker {
    responses: Mutex<HashMap<Operation, VecDeque<Result<Value, ProviderError>>>>,
    calls: Mutex<Vec<(Operation, Value)>>,
    call_count: AtomicUsize,
}

impl MockInvoker {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Queue the next response for `operation`
    pub fn respond(&self, operation: Operation, result: Result<Value, ProviderError>) {
        self.responses
            .lock()
            .unwrap()
            .entry(operation)
            .or_default()
            .push_back(result);
    }

    /// Every call made so far, in order
    pub fn calls(&self) -> Vec<(Operation, Value)> {
        self.calls.lock().unwrap().clone()
    }

    /// Operations called so far, in order
    pub fn operations(&self) -> Vec<Operation> {
        self.calls().into_iter().map(|(op, _)| op).collect()
    }

    /// Parameters of the only call made
    pub fn single_call(&self) -> (Operation, Value) {
        let calls = self.calls();
        assert_eq!(calls.len(), 1, "expected exactly one call, got {:?}", calls);
        calls.into_iter().next().unwrap()
    }

    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl Invoker for MockInvoker {
    async fn call(&self, operation: Operation, params: &Value) -> Result<Value, ProviderError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        self.calls.lock().unwrap().push((operation, params.clone()));

        self.responses
            .lock()
            .unwrap()
            .get_mut(&operation)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| Ok(json!({})))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Warning,
    Error,
}

/// A LogSink that keeps every entry
#[derive(Default)]
pub struct RecordingLogSink {
    entries: Mutex<Vec<(Level, String)>>,
}

impl RecordingLogSink {
    pub fn entries(&self) -> Vec<(Level, String)> {
        self.entries.lock().unwrap().clone()
    }

    pub fn at(&self, level: Level) -> Vec<String> {
        self.entries()
            .into_iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, message)| message)
            .collect()
    }
}

impl LogSink for RecordingLogSink {
    fn info(&self, message: &str) {
        self.entries.lock().unwrap().push((Level::Info, message.to_string()));
    }

    fn warning(&self, message: &str) {
        self.entries
            .lock()
            .unwrap()
            .push((Level::Warning, message.to_string()));
    }

    fn error(&self, message: &str) {
        self.entries.lock().unwrap().push((Level::Error, message.to_string()));
    }
}

/// Build a dispatcher over a fresh mock invoker and recording sink
pub fn dispatcher() -> (Dispatcher, Arc<MockInvoker>, Arc<RecordingLogSink>) {
    dispatcher_with_tags(BTreeMap::new())
}

pub fn dispatcher_with_tags(
    tags: BTreeMap<String, String>,
) -> (Dispatcher, Arc<MockInvoker>, Arc<RecordingLogSink>) {
    let invoker = MockInvoker::new();
    let sink = Arc::new(RecordingLogSink::default());
    let context = DispatchContext::new(tags, sink.clone());
    let dispatcher = Dispatcher::new(invoker.clone(), context);
    (dispatcher, invoker, sink)
}

/// A REGIONAL TLS_1_2 record served by v2
pub fn regional_record(name: &str) -> DomainRecord {
    DomainRecord::new(name)
        .with_endpoint_type(EndpointType::Regional)
        .with_security_policy(SecurityPolicy::Tls12)
        .with_certificate_arn("arn:aws:acm:us-east-1:123456789012:certificate/abc")
        .with_api_id("api123")
        .with_service_stage("dev")
}

/// An EDGE record served by v1
pub fn edge_record(name: &str) -> DomainRecord {
    DomainRecord::new(name)
        .with_endpoint_type(EndpointType::Edge)
        .with_certificate_arn("arn:aws:acm:us-east-1:123456789012:certificate/abc")
        .with_api_id("rest123")
        .with_service_stage("dev")
}

/// Deployed state as a prior lookup would have stored it
pub fn deployed(policy: SecurityPolicy) -> DomainInfo {
    DomainInfo {
        domain_name: "d-abc123.execute-api.us-east-1.amazonaws.com".to_string(),
        hosted_zone_id: "Z1UJRXOUMOOFQ8".to_string(),
        security_policy: Some(policy),
    }
}

/// Raw v1 domain response for a regional domain
pub fn v1_regional_domain(policy: &str) -> Value {
    json!({
        "domainName": "api.example.com",
        "regionalDomainName": "d-abc123.execute-api.us-east-1.amazonaws.com",
        "regionalHostedZoneId": "Z1UJRXOUMOOFQ8",
        "securityPolicy": policy,
    })
}

/// Raw v2 domain response
pub fn v2_domain() -> Value {
    json!({
        "DomainName": "api.example.com",
        "DomainNameConfigurations": [{
            "ApiGatewayDomainName": "d-xyz789.execute-api.us-east-1.amazonaws.com",
            "HostedZoneId": "Z1UJRXOUMOOFQ8",
            "SecurityPolicy": "TLS_1_2",
            "EndpointType": "REGIONAL",
        }],
    })
}
