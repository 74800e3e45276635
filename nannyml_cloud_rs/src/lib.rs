//! # NannyML Cloud SDK
//!
//! Rust SDK for configuring monitoring on a NannyML Cloud instance.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use nannyml_cloud::{NannyMl, ColumnToggle, UnivariateDriftMethod};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), nannyml_cloud::Error> {
//!     // Create client from NML_CLOUD_URL / NML_CLOUD_API_TOKEN
//!     let nml = NannyMl::from_env()?;
//!
//!     nml.edit_runtime_config(42, |rc| {
//!         rc.univariate_drift_method(UnivariateDriftMethod::KolmogorovSmirnov)?
//!             .enable_categorical();
//!         Ok(())
//!     })
//!     .await?;
//!     Ok(())
//! }
//! ```

use std::env;
use std::path::Path;
use thiserror::Error;

// Re-export core for advanced usage
pub use nannyml_cloud_core as core;
pub use nannyml_cloud_core_types as types;

// Re-export commonly used core types
pub use nannyml_cloud_core::{
    api::{
        DataSourceFilter, DataSourceSummary, DefaultRuntimeConfigRequest, ModelDetails, ModelFilter,
        ModelSummary, RunSummary, SchemaColumn,
    },
    monitoring::{
        Chunking, ColumnFacet, ColumnToggle, ColumnType, ConceptShiftMetric, DataQualityMetric,
        EstimationToggle, MetricCategory, MetricEntryMut, MultivariateDriftMethod,
        PerformanceMetric, PerformanceType, ProblemType, RuntimeConfigSnapshot,
        RuntimeConfiguration, SummaryStatsMetric, SupportState, Threshold, Thresholded, Toggle,
        UnivariateDriftMethod, ValueLimited,
    },
    // Errors
    ApiErrorInfo,
    CoreConfig,
    CoreError,
    LicenseErrorInfo,
    // API types
    NannyClient as CoreClient,
};

/// SDK version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Environment variable for the instance URL.
pub const URL_ENV: &str = nannyml_cloud_core::config::ENV_URL;

// =============================================================================
// Error Types
// =============================================================================

/// SDK error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Missing instance URL.
    #[error("NannyML Cloud url not found. Set {URL_ENV} or provide explicitly.")]
    MissingUrl,

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Core error passthrough.
    #[error(transparent)]
    Core(#[from] nannyml_cloud_core::CoreError),
}

impl Error {
    /// True when the server rejected the request.
    pub fn is_api_error(&self) -> bool {
        matches!(self, Error::Core(e) if e.is_api_error())
    }

    /// True when the request was denied by licensing.
    pub fn is_license_error(&self) -> bool {
        matches!(self, Error::Core(e) if e.is_license_error())
    }
}

/// Result type alias.
pub type Result<T> = std::result::Result<T, Error>;

// =============================================================================
// Main Client
// =============================================================================

/// Main NannyML Cloud client.
///
/// # Example
///
/// ```rust,ignore
/// use nannyml_cloud::NannyMl;
///
/// let nml = NannyMl::from_env()?;
///
/// // Or with explicit credentials
/// let nml = NannyMl::new("https://nannyml.example.com", "token")?;
/// ```
pub struct NannyMl {
    client: nannyml_cloud_core::NannyClient,
}

impl NannyMl {
    /// Create a new client with explicit credentials.
    ///
    /// # Arguments
    ///
    /// * `url` - Instance URL
    /// * `api_token` - API token; empty for unauthenticated instances
    pub fn new(url: impl AsRef<str>, api_token: impl AsRef<str>) -> Result<Self> {
        let url = url.as_ref();
        if url.trim().is_empty() {
            return Err(Error::MissingUrl);
        }
        Self::from_config(&CoreConfig::new(url, api_token.as_ref()))
    }

    /// Create a client from a full configuration.
    pub fn from_config(config: &CoreConfig) -> Result<Self> {
        if !config.has_url() {
            return Err(Error::MissingUrl);
        }
        let client = nannyml_cloud_core::NannyClient::from_config(config)?;
        Ok(Self { client })
    }

    /// Create a client from the `NML_CLOUD_*` environment variables.
    pub fn from_env() -> Result<Self> {
        if env::var(URL_ENV).map(|v| v.trim().is_empty()).unwrap_or(true) {
            return Err(Error::MissingUrl);
        }
        Self::from_config(&CoreConfig::from_env()?)
    }

    /// Create a client from a TOML file with a `[cloud]` table.
    ///
    /// Environment variables override values from the file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let config = nannyml_cloud_core::config::load_toml(path.as_ref())?;
        Self::from_config(&config)
    }

    /// Get the normalized base URL.
    pub fn base_url(&self) -> &str {
        self.client.base_url()
    }

    /// Access the underlying core client.
    pub fn core(&self) -> &nannyml_cloud_core::NannyClient {
        &self.client
    }

    // -------------------------------------------------------------------------
    // Runtime configuration
    // -------------------------------------------------------------------------

    /// Default runtime configuration for a model that does not exist yet.
    pub async fn default_runtime_config(
        &self,
        request: &DefaultRuntimeConfigRequest,
    ) -> Result<RuntimeConfiguration> {
        Ok(self.client.runtime_config().fetch_default(request).await?)
    }

    /// Current runtime configuration of a model.
    pub async fn runtime_config(&self, model_id: i64) -> Result<RuntimeConfiguration> {
        Ok(self.client.runtime_config().fetch_current(model_id).await?)
    }

    /// Replace a model's runtime configuration.
    pub async fn persist_runtime_config(
        &self,
        model_id: i64,
        config: &RuntimeConfiguration,
    ) -> Result<()> {
        Ok(self.client.runtime_config().persist(model_id, config).await?)
    }

    /// Fetch, edit and persist a model's runtime configuration.
    ///
    /// Nothing is sent when `edit` fails. Returns the configuration as it was
    /// persisted.
    pub async fn edit_runtime_config<F>(
        &self,
        model_id: i64,
        edit: F,
    ) -> Result<RuntimeConfiguration>
    where
        F: FnOnce(&mut RuntimeConfiguration) -> std::result::Result<(), CoreError>,
    {
        let mut config = self.runtime_config(model_id).await?;
        edit(&mut config)?;
        self.persist_runtime_config(model_id, &config).await?;
        tracing::info!(model_id, "runtime configuration updated");
        Ok(config)
    }

    // -------------------------------------------------------------------------
    // Data sources
    // -------------------------------------------------------------------------

    /// Data sources of a model, memoized per client.
    pub async fn data_sources(
        &self,
        model_id: i64,
        filter: &DataSourceFilter,
    ) -> Result<Vec<DataSourceSummary>> {
        Ok(self
            .client
            .data_sources()
            .model_data_sources(model_id, filter)
            .await?)
    }

    /// Forget memoized data sources of a model.
    pub fn invalidate_data_sources(&self, model_id: i64) {
        self.client.data_sources().invalidate(model_id);
    }

    // -------------------------------------------------------------------------
    // Models and runs
    // -------------------------------------------------------------------------

    /// Monitoring models matching `filter`.
    pub async fn list_models(&self, filter: &ModelFilter) -> Result<Vec<ModelSummary>> {
        Ok(self.client.models().list(filter).await?)
    }

    /// Details of one monitoring model.
    pub async fn model(&self, model_id: i64) -> Result<ModelDetails> {
        Ok(self.client.models().get(model_id).await?)
    }

    /// Delete a monitoring model.
    pub async fn delete_model(&self, model_id: i64) -> Result<()> {
        Ok(self.client.models().delete(model_id).await?)
    }

    /// Start a run analysing new data for a model. Returns the run id.
    pub async fn trigger_run(&self, model_id: i64) -> Result<String> {
        let run_id = self.client.runs().trigger(model_id).await?;
        tracing::info!(model_id, run_id = %run_id, "model run started");
        Ok(run_id)
    }
}

impl std::fmt::Debug for NannyMl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NannyMl")
            .field("base_url", &self.base_url())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn ks_config() -> serde_json::Value {
        json!({"univariateDriftMethods": [{
            "__typename": "UnivariateDriftMethodConfig",
            "method": "KOLMOGOROV_SMIRNOV",
            "lowerValueLimit": null,
            "upperValueLimit": null,
            "threshold": null,
            "segmentThresholds": [],
            "categorical": {"enabled": false, "isSupported": true, "supportReason": null},
            "continuous": {"enabled": false, "isSupported": true, "supportReason": null},
            "targets": {"enabled": false, "isSupported": true, "supportReason": null},
            "predictions": {"enabled": false, "isSupported": true, "supportReason": null},
            "predictedProbabilities": {"enabled": false, "isSupported": true, "supportReason": null}
        }]})
    }

    #[test]
    fn test_empty_url_is_missing() {
        assert!(matches!(NannyMl::new("", "t"), Err(Error::MissingUrl)));
        assert!(matches!(
            NannyMl::from_config(&CoreConfig::default()),
            Err(Error::MissingUrl)
        ));
    }

    #[test]
    fn test_unreadable_toml_file_keeps_core_error() {
        let path = std::env::temp_dir().join(format!("nannyml-cloud-absent-{}.toml", std::process::id()));
        let err = NannyMl::from_toml_file(&path).unwrap_err();
        assert!(matches!(err, Error::Core(CoreError::Config(_))));
    }

    #[tokio::test]
    async fn test_edit_runtime_config_fetches_then_persists() {
        let server = MockServer::start_async().await;
        let fetch = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/api/graphql")
                    .json_body_partial(r#"{"operationName": "getModelMonitoringRuntimeConfiguration"}"#);
                then.status(200)
                    .json_body(json!({"data": {"monitoring_model": {"runtimeConfig": ks_config()}}}));
            })
            .await;
        let persist = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/api/graphql")
                    .json_body_partial(r#"{"operationName": "setRuntimeConfiguration", "variables": {"modelId": 3}}"#)
                    .body_contains(r#""enabledCategorical":true"#);
                then.status(200)
                    .json_body(json!({"data": {"edit_monitoring_model": {"__typename": "Model"}}}));
            })
            .await;

        let nml = NannyMl::new(server.base_url(), "t").unwrap();
        let rc = nml
            .edit_runtime_config(3, |rc| {
                rc.univariate_drift_method(UnivariateDriftMethod::KolmogorovSmirnov)?
                    .enable_categorical();
                Ok(())
            })
            .await
            .unwrap();

        assert!(rc.univariate_drift_methods()[0]
            .facet(ColumnFacet::Categorical)
            .enabled());
        fetch.assert_hits_async(1).await;
        persist.assert_hits_async(1).await;
    }

    #[tokio::test]
    async fn test_failed_edit_sends_nothing() {
        let server = MockServer::start_async().await;
        let fetch = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/api/graphql")
                    .json_body_partial(r#"{"operationName": "getModelMonitoringRuntimeConfiguration"}"#);
                then.status(200)
                    .json_body(json!({"data": {"monitoring_model": {"runtimeConfig": ks_config()}}}));
            })
            .await;
        let persist = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/api/graphql")
                    .json_body_partial(r#"{"operationName": "setRuntimeConfiguration"}"#);
                then.status(200).json_body(json!({"data": {}}));
            })
            .await;

        let nml = NannyMl::new(server.base_url(), "t").unwrap();
        let err = nml
            .edit_runtime_config(3, |rc| {
                rc.univariate_drift_method(UnivariateDriftMethod::Hellinger)?
                    .enable_categorical();
                Ok(())
            })
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Core(CoreError::NotFound(_))));
        assert!(!err.is_api_error());
        fetch.assert_hits_async(1).await;
        persist.assert_hits_async(0).await;
    }

    #[tokio::test]
    async fn test_trigger_run_then_read_latest_run() {
        let server = MockServer::start_async().await;
        let start = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/api/graphql")
                    .json_body_partial(r#"{"operationName": "startRun", "variables": {"modelId": 7}}"#);
                then.status(200)
                    .json_body(json!({"data": {"start_model_run": {"id": 51}}}));
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/api/graphql")
                    .json_body_partial(r#"{"operationName": "readModel", "variables": {"id": 7}}"#);
                then.status(200).json_body(json!({"data": {"monitoring_model": {
                    "id": 7,
                    "name": "churn",
                    "problemType": "BINARY_CLASSIFICATION",
                    "createdAt": "2024-01-02T03:04:05Z",
                    "latestRun": {"id": 51, "state": "SCHEDULED", "scheduledFor": "2024-06-01T00:00:00Z"}
                }}}));
            })
            .await;

        let nml = NannyMl::new(server.base_url(), "t").unwrap();
        let run_id = nml.trigger_run(7).await.unwrap();
        let model = nml.model(7).await.unwrap();

        assert_eq!(run_id, "51");
        assert_eq!(model.latest_run.map(|r| r.id), Some(run_id));
        start.assert_hits_async(1).await;
    }
}
