//! NannyML Cloud core library.
//!
//! This crate provides the core functionality of the NannyML Cloud SDK:
//! - GraphQL transport and error mapping
//! - Configuration handling
//! - The monitoring runtime configuration model and its conversion to
//!   mutation input
//! - API clients for runtime configurations and data sources

pub mod api;
pub mod config;
pub mod errors;
pub mod graphql;
pub mod http;
pub mod monitoring;
pub mod urls;

// Re-export core types at crate root for convenience
pub use config::CoreConfig;
pub use errors::{ApiErrorInfo, CoreError, CoreResult, LicenseErrorInfo};

// Re-export API types for convenience
pub use api::{
    DataSourceFilter, DataSourceSummary, DefaultRuntimeConfigRequest, ModelDetails, ModelFilter,
    ModelSummary, NannyClient, RunSummary, SchemaColumn,
};

// Re-export the runtime configuration model
pub use monitoring::{
    Chunking, ColumnFacet, ColumnToggle, ColumnType, EstimationToggle, MetricCategory,
    MetricEntryMut, ProblemType, RuntimeConfigSnapshot, RuntimeConfiguration, SupportState,
    Threshold, Thresholded, Toggle, ValueLimited,
};
