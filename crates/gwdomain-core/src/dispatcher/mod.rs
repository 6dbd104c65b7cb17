//! Gateway dispatcher
//!
//! The Dispatcher is responsible for:
//! - Selecting the API generation for each domain record
//! - Building the generation-specific request for each lifecycle operation
//! - Invoking the rate-limited call primitive
//! - Normalizing responses and classifying errors
//!
//! ## Event Flow
//!
//! 1. Caller builds a [`DomainRecord`]
//! 2. Lookup fills `domain_info` (absent domain is a valid outcome)
//! 3. Mapping lookup fills `api_mapping`
//! 4. Mutations consume both and emit an audit log entry on success
//!
//! The dispatcher holds no mutable state; clones share the same invoker and
//! context and may run concurrently on independent records.

pub mod pagination;
pub mod requests;

use crate::config::ThrottleConfig;
use crate::error::{Error, ProviderError, Result};
use crate::model::{ApiMapping, DomainInfo, DomainRecord};
use crate::operation::{Generation, Operation};
use crate::selector::{generation_for, generation_for_update};
use crate::throttle::{ClientPair, Throttled};
use crate::traits::{Invoker, LogSink, TracingLogSink};
use pagination::{PageFields, paged_results};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

/// Explicit per-invocation context handed to the dispatcher
#[derive(Clone)]
pub struct DispatchContext {
    /// Tags attached to created domains
    pub tags: BTreeMap<String, String>,
    /// Operator-facing log entries
    pub log: Arc<dyn LogSink>,
}

impl DispatchContext {
    pub fn new(tags: BTreeMap<String, String>, log: Arc<dyn LogSink>) -> Self {
        Self { tags, log }
    }
}

impl Default for DispatchContext {
    fn default() -> Self {
        Self {
            tags: BTreeMap::new(),
            log: Arc::new(TracingLogSink),
        }
    }
}

/// Generation-aware lifecycle operations on custom domains
#[derive(Clone)]
pub struct Dispatcher {
    invoker: Arc<dyn Invoker>,
    context: DispatchContext,
}

impl Dispatcher {
    /// Create a dispatcher over an existing call primitive
    pub fn new(invoker: Arc<dyn Invoker>, context: DispatchContext) -> Self {
        Self { invoker, context }
    }

    /// Create a dispatcher throttling calls to the given client pair
    pub fn with_clients(clients: ClientPair, throttle: ThrottleConfig, context: DispatchContext) -> Self {
        Self::new(Arc::new(Throttled::new(clients, throttle)), context)
    }

    /// The log sink this dispatcher reports to
    pub fn log(&self) -> &dyn LogSink {
        self.context.log.as_ref()
    }

    async fn call(&self, operation: Operation, params: &serde_json::Value) -> std::result::Result<serde_json::Value, ProviderError> {
        debug!("Invoking {}", operation);
        self.invoker.call(operation, params).await
    }

    /// Create the custom domain
    ///
    /// # Returns
    ///
    /// - `Ok(DomainInfo)`: Normalized result, whichever generation served it
    /// - `Err(Error::DomainCreate)`: Always fatal
    pub async fn create_custom_domain(&self, record: &DomainRecord) -> Result<DomainInfo> {
        let generation = generation_for(record);
        let operation = Operation::create_domain_name(generation);
        let params = match generation {
            Generation::V1 => requests::create_domain_v1(record, &self.context.tags),
            Generation::V2 => requests::create_domain_v2(record, &self.context.tags),
        };

        let domain = record.given_domain_name();
        let create_error = |message: String| Error::DomainCreate {
            domain: domain.to_string(),
            operation,
            message,
        };

        let response = self
            .call(operation, &params)
            .await
            .map_err(|e| create_error(e.message))?;

        let info = DomainInfo::from_response(&response)
            .ok_or_else(|| create_error("response did not include a target domain name".to_string()))?;

        self.context.log.info(&format!(
            "Created custom domain '{}' ({})",
            domain, generation
        ));
        Ok(info)
    }

    /// Fetch the current state of the custom domain
    ///
    /// # Returns
    ///
    /// - `Ok(Some(DomainInfo))`: The domain exists
    /// - `Ok(None)`: The domain does not exist yet (logged, not an error)
    /// - `Err(Error::DomainLookup)`: Any other upstream failure
    pub async fn get_custom_domain_info(&self, record: &DomainRecord) -> Result<Option<DomainInfo>> {
        let generation = generation_for(record);
        let operation = Operation::get_domain_name(generation);
        let params = requests::domain_params(generation, record);
        let domain = record.given_domain_name();

        let response = match self.call(operation, &params).await {
            Ok(response) => response,
            Err(e) if e.is_not_found() => {
                self.context
                    .log
                    .info(&format!("'{}' does not exist.", domain));
                return Ok(None);
            }
            Err(e) => {
                return Err(Error::DomainLookup {
                    domain: domain.to_string(),
                    operation,
                    message: e.message,
                });
            }
        };

        DomainInfo::from_response(&response)
            .map(Some)
            .ok_or_else(|| Error::DomainLookup {
                domain: domain.to_string(),
                operation,
                message: "response did not include a target domain name".to_string(),
            })
    }

    /// Look the domain up and store the result in `record.domain_info`
    ///
    /// Returns whether the domain exists.
    pub async fn resolve_domain_info(&self, record: &mut DomainRecord) -> Result<bool> {
        record.domain_info = self.get_custom_domain_info(record).await?;
        Ok(record.domain_info.is_some())
    }

    /// Delete the custom domain
    pub async fn delete_custom_domain(&self, record: &DomainRecord) -> Result<()> {
        let generation = generation_for(record);
        let operation = Operation::delete_domain_name(generation);
        let params = requests::domain_params(generation, record);
        let domain = record.given_domain_name();

        self.call(operation, &params)
            .await
            .map_err(|e| Error::DomainDelete {
                domain: domain.to_string(),
                operation,
                message: e.message,
            })?;

        self.context
            .log
            .info(&format!("Deleted custom domain '{}'", domain));
        Ok(())
    }

    /// Map the record's base path to its API and stage
    pub async fn create_base_path_mapping(&self, record: &DomainRecord) -> Result<()> {
        let generation = generation_for(record);
        let operation = Operation::create_mapping(generation);
        let domain = record.given_domain_name();
        let api_id = require_api_id(record, operation)?;

        let params = match generation {
            Generation::V1 => requests::create_mapping_v1(record, api_id),
            Generation::V2 => {
                let choice = requests::v2_stage(record);
                if choice.overrides_default {
                    self.context
                        .log
                        .warning(&requests::http_stage_warning(&choice.stage));
                }
                requests::create_mapping_v2(record, api_id, &choice.stage)
            }
        };

        self.call(operation, &params)
            .await
            .map_err(|e| Error::MappingCreate {
                domain: domain.to_string(),
                operation,
                message: e.message,
            })?;

        self.context.log.info(&format!(
            "Created API mapping '{}' for '{}'",
            record.base_path, domain
        ));
        Ok(())
    }

    /// Point the resolved mapping at the record's base path (and stage, on v2)
    ///
    /// Requires a prior domain lookup: the generation is chosen from the
    /// security policy currently deployed, since a domain cannot switch
    /// generation in place.
    pub async fn update_base_path_mapping(&self, record: &DomainRecord) -> Result<()> {
        let domain = record.given_domain_name();
        let generation = generation_for_update(record).ok_or_else(|| {
            Error::precondition(
                domain,
                Operation::update_mapping(generation_for(record)),
                "the domain must be looked up before its mappings can be updated",
            )
        })?;
        let operation = Operation::update_mapping(generation);

        let params = match generation {
            Generation::V1 => requests::update_mapping_v1(record),
            Generation::V2 => {
                let mapping_id = require_mapping_id(record, operation)?;
                let api_id = require_api_id(record, operation)?;
                let choice = requests::v2_stage(record);
                if choice.overrides_default {
                    self.context
                        .log
                        .warning(&requests::http_stage_warning(&choice.stage));
                }
                requests::update_mapping_v2(record, api_id, mapping_id, &choice.stage)
            }
        };

        self.call(operation, &params)
            .await
            .map_err(|e| Error::MappingUpdate {
                domain: domain.to_string(),
                operation,
                message: e.message,
            })?;

        match generation {
            Generation::V1 => self.context.log.info(&format!(
                "Updated API mapping from '{}' to '{}' for '{}'",
                requests::current_base_path(record),
                record.base_path,
                domain
            )),
            Generation::V2 => self.context.log.info(&format!(
                "Updated API mapping to '{}' for '{}'",
                record.base_path, domain
            )),
        }
        Ok(())
    }

    /// Remove the resolved mapping
    ///
    /// v1 keys by base path and falls back to `(none)`; v2 keys by mapping id
    /// and rejects a record whose mapping was never resolved.
    pub async fn delete_base_path_mapping(&self, record: &DomainRecord) -> Result<()> {
        let generation = generation_for(record);
        let operation = Operation::delete_mapping(generation);
        let domain = record.given_domain_name();

        let (params, removed) = match generation {
            Generation::V1 => (
                requests::delete_mapping_v1(record),
                requests::current_base_path(record),
            ),
            Generation::V2 => {
                let mapping_id = require_mapping_id(record, operation)?;
                (
                    requests::delete_mapping_v2(record, mapping_id),
                    mapping_id.to_string(),
                )
            }
        };

        self.call(operation, &params)
            .await
            .map_err(|e| Error::MappingDelete {
                domain: domain.to_string(),
                operation,
                message: e.message,
            })?;

        self.context.log.info(&format!(
            "Removed API mapping '{}' from '{}'",
            removed, domain
        ));
        Ok(())
    }

    /// List every mapping on the domain, normalized across generations
    pub async fn get_api_mappings(&self, record: &DomainRecord) -> Result<Vec<ApiMapping>> {
        self.list_mappings(record, generation_for(record)).await
    }

    /// Find the mapping targeting `record.api_id` and store it in
    /// `record.api_mapping`
    pub async fn find_api_mapping(&self, record: &mut DomainRecord) -> Result<Option<ApiMapping>> {
        self.find_mapping_in(record, generation_for(record)).await
    }

    /// Like [`Self::find_api_mapping`], but listed through the generation a
    /// mapping update would be sent to
    ///
    /// The deployed security policy can route an update to a different
    /// generation than the configured one, and only v2 listings carry the
    /// `ApiMappingId` a v2 update needs. Falls back to the configured
    /// generation when the domain has not been looked up.
    pub async fn find_api_mapping_for_update(
        &self,
        record: &mut DomainRecord,
    ) -> Result<Option<ApiMapping>> {
        let generation = generation_for_update(record).unwrap_or_else(|| generation_for(record));
        self.find_mapping_in(record, generation).await
    }

    async fn find_mapping_in(
        &self,
        record: &mut DomainRecord,
        generation: Generation,
    ) -> Result<Option<ApiMapping>> {
        let operation = Operation::list_mappings(generation);
        let api_id = require_api_id(record, operation)?.to_string();

        let mapping = self
            .list_mappings(record, generation)
            .await?
            .into_iter()
            .find(|m| m.api_id == api_id);

        record.api_mapping = mapping.clone();
        Ok(mapping)
    }

    async fn list_mappings(&self, record: &DomainRecord, generation: Generation) -> Result<Vec<ApiMapping>> {
        let operation = Operation::list_mappings(generation);
        let params = requests::domain_params(generation, record);

        let items = paged_results(
            self.invoker.as_ref(),
            operation,
            PageFields::for_generation(generation),
            params,
        )
        .await
        .map_err(|e| Error::MappingList {
            domain: record.given_domain_name().to_string(),
            operation,
            message: e.message,
        })?;

        Ok(items
            .iter()
            .map(|item| match generation {
                Generation::V1 => ApiMapping::from_v1(item),
                Generation::V2 => ApiMapping::from_v2(item),
            })
            .collect())
    }
}

fn require_api_id(record: &DomainRecord, operation: Operation) -> Result<&str> {
    record.api_id.as_deref().ok_or_else(|| {
        Error::precondition(
            record.given_domain_name(),
            operation,
            "no API id is configured for this domain",
        )
    })
}

fn require_mapping_id(record: &DomainRecord, operation: Operation) -> Result<&str> {
    record
        .api_mapping
        .as_ref()
        .and_then(|m| m.api_mapping_id.as_deref())
        .ok_or_else(|| {
            Error::precondition(
                record.given_domain_name(),
                operation,
                "the API mapping must be looked up first",
            )
        })
}
