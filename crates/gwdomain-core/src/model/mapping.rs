//! Normalized API mapping entries
//!
//! v1 calls these "base path mappings" (`basePath`, `restApiId`, `stage`);
//! v2 calls them "API mappings" (`ApiMappingKey`, `ApiId`, `ApiMappingId`,
//! `Stage`). [`ApiMapping`] reads either shape and serializes in the v2
//! field names.

use super::DEFAULT_BASE_PATH;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One mapping of a base path on a domain to an API stage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ApiMapping {
    pub api_id: String,
    /// Present for v2 mappings only; v1 mappings are keyed by base path
    pub api_mapping_id: Option<String>,
    /// Base path, empty when the mapping has none
    pub api_mapping_key: String,
    pub stage: String,
}

impl ApiMapping {
    /// Read a v1 `BasePathMapping` item
    pub fn from_v1(item: &Value) -> Self {
        let base_path = field(item, "basePath");
        Self {
            api_id: field(item, "restApiId"),
            api_mapping_id: None,
            api_mapping_key: if base_path == DEFAULT_BASE_PATH {
                String::new()
            } else {
                base_path
            },
            stage: field(item, "stage"),
        }
    }

    /// Read a v2 `ApiMapping` item
    pub fn from_v2(item: &Value) -> Self {
        Self {
            api_id: field(item, "ApiId"),
            api_mapping_id: item
                .get("ApiMappingId")
                .and_then(Value::as_str)
                .map(str::to_string),
            api_mapping_key: field(item, "ApiMappingKey"),
            stage: field(item, "Stage"),
        }
    }

    /// Read an item of either generation
    pub fn from_item(item: &Value) -> Self {
        if item.get("ApiId").is_some() || item.get("ApiMappingId").is_some() {
            Self::from_v2(item)
        } else {
            Self::from_v1(item)
        }
    }

    /// The base path in v1 terms, `(none)` when the key is empty
    pub fn base_path(&self) -> &str {
        if self.api_mapping_key.is_empty() {
            DEFAULT_BASE_PATH
        } else {
            &self.api_mapping_key
        }
    }
}

fn field(item: &Value, name: &str) -> String {
    item.get(name)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}
