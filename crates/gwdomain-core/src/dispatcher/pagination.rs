//! Paged list results
//!
//! List endpoints return one page of items plus a continuation token, under
//! field names that differ per generation. [`paged_results`] follows the
//! tokens until the provider stops returning one.

use crate::error::ProviderError;
use crate::operation::{Generation, Operation};
use crate::traits::Invoker;
use serde_json::{Map, Value, json};
use tracing::debug;

/// Field names of one generation's paging protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageFields {
    /// Response field holding the page's items
    pub items: &'static str,
    /// Request field carrying the continuation token
    pub request_token: &'static str,
    /// Response field holding the next continuation token
    pub response_token: &'static str,
}

/// v1: `items` / `position`
pub const V1_PAGE_FIELDS: PageFields = PageFields {
    items: "items",
    request_token: "position",
    response_token: "position",
};

/// v2: `Items` / `NextToken`
pub const V2_PAGE_FIELDS: PageFields = PageFields {
    items: "Items",
    request_token: "NextToken",
    response_token: "NextToken",
};

impl PageFields {
    pub fn for_generation(generation: Generation) -> Self {
        match generation {
            Generation::V1 => V1_PAGE_FIELDS,
            Generation::V2 => V2_PAGE_FIELDS,
        }
    }
}

/// Collect every item of a paged list operation
///
/// Every page goes through `invoker`, so throttling applies to each fetch.
/// Items keep page arrival order, and provider order within a page.
///
/// # Parameters
///
/// - `invoker`: Rate-limited call primitive
/// - `operation`: The list operation
/// - `fields`: Paging field names for the operation's generation
/// - `params`: Parameters of the first request
pub async fn paged_results(
    invoker: &dyn Invoker,
    operation: Operation,
    fields: PageFields,
    params: Value,
) -> Result<Vec<Value>, ProviderError> {
    let mut items = Vec::new();
    let mut request = params;
    let mut pages = 0usize;

    loop {
        let response = invoker.call(operation, &request).await?;
        pages += 1;

        if let Some(page) = response.get(fields.items).and_then(Value::as_array) {
            items.extend(page.iter().cloned());
        }

        let token = response
            .get(fields.response_token)
            .and_then(Value::as_str)
            .filter(|t| !t.is_empty());

        match token {
            Some(token) => {
                if !request.is_object() {
                    request = Value::Object(Map::new());
                }
                if let Some(obj) = request.as_object_mut() {
                    obj.insert(fields.request_token.to_string(), json!(token));
                }
            }
            None => break,
        }
    }

    debug!("{}: {} item(s) over {} page(s)", operation, items.len(), pages);
    Ok(items)
}
