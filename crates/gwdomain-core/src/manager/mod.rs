//! Domain lifecycle manager
//!
//! The DomainManager composes dispatcher calls into whole lifecycle steps:
//! - Create a domain unless it already exists
//! - Deploy a mapping (create, or update when the base path moved)
//! - Remove a mapping
//! - Delete a domain
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────┐   per record    ┌──────────────┐
//! │ DomainManager │ ──────────────▶ │  Dispatcher  │
//! │   (run_all)   │   JoinSet task  │ (stateless)  │
//! └───────────────┘                 └──────────────┘
//! ```
//!
//! Operations on one record run in order (lookup before mutation).
//! Independent records run concurrently.

pub mod summary;

pub use summary::summary_lines;

use crate::dispatcher::Dispatcher;
use crate::error::{Error, Result};
use crate::model::DomainRecord;
use crate::operation::Operation;
use crate::selector::generation_for;
use tokio::task::JoinSet;
use tracing::{debug, error};

/// A lifecycle step the manager can run on a record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Create the domain if it does not exist
    Create,
    /// Look the domain up
    Info,
    /// Create or update the mapping for the record's API
    Deploy,
    /// Remove the mapping for the record's API
    Undeploy,
    /// Delete the domain if it exists
    Delete,
}

/// What a command did to a record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Created,
    Updated,
    Deleted,
    /// Remote state already matched the configuration
    Unchanged,
    /// Nothing to act on
    Skipped { reason: String },
}

/// Runs lifecycle commands against domain records
#[derive(Clone)]
pub struct DomainManager {
    dispatcher: Dispatcher,
}

impl DomainManager {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self { dispatcher }
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Run one command on one record
    pub async fn run(&self, command: Command, record: &mut DomainRecord) -> Result<Outcome> {
        debug!("Running {:?} for '{}'", command, record.given_domain_name());
        match command {
            Command::Create => self.create_domain(record).await,
            Command::Info => self.domain_info(record).await,
            Command::Deploy => self.deploy_mapping(record).await,
            Command::Undeploy => self.remove_mapping(record).await,
            Command::Delete => self.delete_domain(record).await,
        }
    }

    /// Run one command on every record concurrently
    ///
    /// Returns exactly one entry per input record, in input order, each
    /// paired with its record so resolved state (e.g. `domain_info`) is
    /// available for reporting. A task that panics or is cancelled is
    /// reported as `Error::Other` next to the record as it was passed in.
    pub async fn run_all(
        &self,
        records: Vec<DomainRecord>,
        command: Command,
    ) -> Vec<(DomainRecord, Result<Outcome>)> {
        let originals = records.clone();
        let mut tasks = JoinSet::new();
        for (index, mut record) in records.into_iter().enumerate() {
            let manager = self.clone();
            tasks.spawn(async move {
                let result = manager.run(command, &mut record).await;
                (index, record, result)
            });
        }

        let mut slots: Vec<Option<(DomainRecord, Result<Outcome>)>> =
            originals.iter().map(|_| None).collect();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, record, result)) => {
                    if let Some(slot) = slots.get_mut(index) {
                        *slot = Some((record, result));
                    }
                }
                Err(e) => error!("Domain task failed to complete: {}", e),
            }
        }

        originals
            .into_iter()
            .zip(slots)
            .map(|(original, slot)| {
                slot.unwrap_or_else(|| {
                    let message = format!(
                        "{:?} for '{}' did not complete",
                        command,
                        original.given_domain_name()
                    );
                    (original, Err(Error::Other(message)))
                })
            })
            .collect()
    }

    /// Create the domain unless it already exists
    pub async fn create_domain(&self, record: &mut DomainRecord) -> Result<Outcome> {
        if self.dispatcher.resolve_domain_info(record).await? {
            self.dispatcher.log().info(&format!(
                "Custom domain '{}' already exists.",
                record.given_domain_name()
            ));
            return Ok(Outcome::Unchanged);
        }

        let info = self.dispatcher.create_custom_domain(record).await?;
        record.domain_info = Some(info);
        Ok(Outcome::Created)
    }

    /// Look the domain up
    pub async fn domain_info(&self, record: &mut DomainRecord) -> Result<Outcome> {
        if self.dispatcher.resolve_domain_info(record).await? {
            Ok(Outcome::Unchanged)
        } else {
            Ok(Outcome::Skipped {
                reason: "domain does not exist".to_string(),
            })
        }
    }

    /// Create the mapping, or move it when the base path changed
    pub async fn deploy_mapping(&self, record: &mut DomainRecord) -> Result<Outcome> {
        if !self.dispatcher.resolve_domain_info(record).await? {
            return Err(Error::precondition(
                record.given_domain_name(),
                Operation::create_mapping(generation_for(record)),
                "the domain does not exist; create it first",
            ));
        }

        let Some(mapping) = self.dispatcher.find_api_mapping_for_update(record).await? else {
            self.dispatcher.create_base_path_mapping(record).await?;
            return Ok(Outcome::Created);
        };

        if mapping.base_path() == record.base_path {
            debug!(
                "Mapping '{}' of '{}' is up to date",
                record.base_path,
                record.given_domain_name()
            );
            return Ok(Outcome::Unchanged);
        }

        self.dispatcher.update_base_path_mapping(record).await?;
        Ok(Outcome::Updated)
    }

    /// Remove the mapping targeting the record's API, if any
    pub async fn remove_mapping(&self, record: &mut DomainRecord) -> Result<Outcome> {
        if self.dispatcher.find_api_mapping(record).await?.is_none() {
            return Ok(Outcome::Skipped {
                reason: "no API mapping targets this API".to_string(),
            });
        }

        self.dispatcher.delete_base_path_mapping(record).await?;
        record.api_mapping = None;
        Ok(Outcome::Deleted)
    }

    /// Delete the domain if it exists
    pub async fn delete_domain(&self, record: &mut DomainRecord) -> Result<Outcome> {
        if !self.dispatcher.resolve_domain_info(record).await? {
            return Ok(Outcome::Skipped {
                reason: "domain does not exist".to_string(),
            });
        }

        self.dispatcher.delete_custom_domain(record).await?;
        record.domain_info = None;
        record.api_mapping = None;
        Ok(Outcome::Deleted)
    }
}
