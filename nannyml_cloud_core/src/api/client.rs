//! Main NannyML Cloud API client.
//!
//! The `NannyClient` is the primary entry point for interacting with a
//! NannyML Cloud instance. It is built once by the caller and borrowed by
//! every sub-client; there is no process-wide client.

use lru::LruCache;
use parking_lot::Mutex;
use std::num::NonZeroUsize;

use crate::config::CoreConfig;
use crate::graphql::GraphqlClient;
use crate::http::HttpClient;
use crate::urls;
use crate::CoreError;

use super::data_sources::{DataSourceCacheKey, DataSourceSummary, DataSourcesClient};
use super::models::ModelsClient;
use super::runs::RunsClient;
use super::runtime_config::RuntimeConfigClient;

/// Number of data-source lookups kept in memory.
pub const DATA_SOURCE_CACHE_CAPACITY: usize = 128;

/// NannyML Cloud API client.
///
/// # Example
///
/// ```ignore
/// use nannyml_cloud_core::api::NannyClient;
///
/// // Create from NML_CLOUD_URL / NML_CLOUD_API_TOKEN
/// let client = NannyClient::from_env()?;
///
/// // Or explicitly
/// let client = NannyClient::new("https://nannyml.example.com", "token")?;
///
/// let rc = client.runtime_config().fetch_current(42).await?;
/// ```
pub struct NannyClient {
    pub(crate) graphql: GraphqlClient,
    pub(crate) base_url: String,
    pub(crate) data_source_cache: Mutex<LruCache<DataSourceCacheKey, Vec<DataSourceSummary>>>,
}

impl NannyClient {
    /// Create a new client for an instance URL and API token.
    ///
    /// # Arguments
    ///
    /// * `url` - Instance URL; `/api` and `/api/graphql` suffixes are accepted
    /// * `api_token` - API token; empty for unauthenticated instances
    pub fn new(url: &str, api_token: &str) -> Result<Self, CoreError> {
        Self::from_config(&CoreConfig::new(url, api_token))
    }

    /// Create a client from a full configuration.
    pub fn from_config(config: &CoreConfig) -> Result<Self, CoreError> {
        if !config.has_url() {
            return Err(CoreError::config("no NannyML Cloud url configured"));
        }
        let base = urls::normalize_cloud_base(config.url.trim())?;
        let base_url = base.as_str().trim_end_matches('/').to_string();
        let http = HttpClient::new(
            &base_url,
            config.api_token.as_deref().unwrap_or(""),
            config.timeout_secs,
            &config.user_agent,
        )?;

        tracing::debug!(base_url = %base_url, "created NannyML Cloud client");

        Ok(Self {
            graphql: GraphqlClient::new(http),
            base_url,
            data_source_cache: Mutex::new(LruCache::new(
                NonZeroUsize::new(DATA_SOURCE_CACHE_CAPACITY).unwrap_or(NonZeroUsize::MIN),
            )),
        })
    }

    /// Create a client from `NML_CLOUD_*` environment variables.
    pub fn from_env() -> Result<Self, CoreError> {
        Self::from_config(&CoreConfig::from_env()?)
    }

    /// Get the normalized base URL for this client.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Get a reference to the GraphQL transport.
    pub fn graphql(&self) -> &GraphqlClient {
        &self.graphql
    }

    /// Get a runtime configuration client.
    ///
    /// Use this to fetch, edit and persist monitoring runtime configurations.
    pub fn runtime_config(&self) -> RuntimeConfigClient<'_> {
        RuntimeConfigClient::new(self)
    }

    /// Get a data sources client.
    ///
    /// Lookups are memoized per client; see [`DataSourcesClient`].
    pub fn data_sources(&self) -> DataSourcesClient<'_> {
        DataSourcesClient::new(self)
    }

    /// Get a monitoring models client.
    pub fn models(&self) -> ModelsClient<'_> {
        ModelsClient::new(self)
    }

    /// Get a runs client.
    pub fn runs(&self) -> RunsClient<'_> {
        RunsClient::new(self)
    }
}

impl std::fmt::Debug for NannyClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NannyClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}
