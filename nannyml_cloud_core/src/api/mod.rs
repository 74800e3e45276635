//! NannyML Cloud API client.
//!
//! # Example
//!
//! ```ignore
//! use nannyml_cloud_core::api::NannyClient;
//! use nannyml_cloud_core::monitoring::{ColumnToggle, UnivariateDriftMethod};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = NannyClient::from_env()?;
//!
//!     let mut rc = client.runtime_config().fetch_current(42).await?;
//!     rc.univariate_drift_method(UnivariateDriftMethod::KolmogorovSmirnov)?
//!         .enable_categorical();
//!     client.runtime_config().persist(42, &rc).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod data_sources;
pub mod models;
pub mod runs;
pub mod runtime_config;

pub use client::{NannyClient, DATA_SOURCE_CACHE_CAPACITY};
pub use data_sources::{DataSourceCacheKey, DataSourceFilter, DataSourceSummary, DataSourcesClient};
pub use models::{ModelDetails, ModelFilter, ModelSummary, ModelsClient};
pub use runs::{RunSummary, RunsClient};
pub use runtime_config::{DefaultRuntimeConfigRequest, RuntimeConfigClient, SchemaColumn};
