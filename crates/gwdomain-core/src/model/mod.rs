//! Domain data model
//!
//! - [`DomainRecord`]: one configured custom domain plus resolved state
//! - [`DomainInfo`]: normalized domain lookup/create result
//! - [`ApiMapping`]: normalized mapping entry of either generation

pub mod info;
pub mod mapping;
pub mod record;

pub use info::DomainInfo;
pub use mapping::ApiMapping;
pub use record::{
    ApiType, DEFAULT_BASE_PATH, DEFAULT_STAGE, DomainRecord, EndpointType, RESERVED_BASE_PATHS,
    SecurityPolicy,
};
