//! Data source lookups for monitoring models.
//!
//! Results are memoized in the owning [`NannyClient`]'s LRU cache. Only
//! successful reads are stored; an error is never cached.

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::errors::{CoreError, CoreResult};
use crate::graphql::field;
use crate::monitoring::threshold::deserialize_id;

use super::client::NannyClient;

const GET_MODEL_DATA_SOURCES: &str = r#"query getModelDataSources($modelId: Int!, $filter: DataSourceFilter) {
  monitoring_model(id: $modelId) {
    dataSources(filter: $filter) {
      id
      name
      hasReferenceData
      hasAnalysisData
      nrRows
    }
  }
}"#;

/// Narrows which data sources of a model are returned.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DataSourceFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_reference_data: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_analysis_data: Option<bool>,
}

impl DataSourceFilter {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DataSourceCacheKey {
    pub model_id: i64,
    pub filter: DataSourceFilter,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataSourceSummary {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub has_reference_data: bool,
    #[serde(default)]
    pub has_analysis_data: bool,
    #[serde(default)]
    pub nr_rows: Option<i64>,
}

/// Data sources API client.
pub struct DataSourcesClient<'a> {
    client: &'a NannyClient,
}

impl<'a> DataSourcesClient<'a> {
    pub(crate) fn new(client: &'a NannyClient) -> Self {
        Self { client }
    }

    /// Data sources of a model matching `filter`.
    ///
    /// Served from the cache when the same model and filter were read before.
    pub async fn model_data_sources(
        &self,
        model_id: i64,
        filter: &DataSourceFilter,
    ) -> CoreResult<Vec<DataSourceSummary>> {
        let key = DataSourceCacheKey {
            model_id,
            filter: filter.clone(),
        };
        if let Some(hit) = self.client.data_source_cache.lock().get(&key) {
            tracing::debug!(model_id, "data source cache hit");
            return Ok(hit.clone());
        }
        tracing::debug!(model_id, "data source cache miss");

        let data = self
            .client
            .graphql
            .execute(
                GET_MODEL_DATA_SOURCES,
                json!({ "modelId": model_id, "filter": filter }),
                Some("getModelDataSources"),
            )
            .await?;
        let model = field(&data, &["monitoring_model"])?;
        if model.is_null() {
            return Err(CoreError::not_found(format!("monitoring model {}", model_id)));
        }
        let sources: Vec<DataSourceSummary> =
            serde_json::from_value(field(model, &["dataSources"])?.clone()).map_err(|e| {
                CoreError::Protocol(format!("malformed data sources response: {}", e))
            })?;

        self.client
            .data_source_cache
            .lock()
            .put(key, sources.clone());
        Ok(sources)
    }

    /// Drop every cached lookup for one model.
    pub fn invalidate(&self, model_id: i64) {
        let mut cache = self.client.data_source_cache.lock();
        let stale: Vec<DataSourceCacheKey> = cache
            .iter()
            .filter(|(k, _)| k.model_id == model_id)
            .map(|(k, _)| k.clone())
            .collect();
        for key in &stale {
            cache.pop(key);
        }
    }

    pub fn clear_cache(&self) {
        self.client.data_source_cache.lock().clear();
    }

    pub fn cached_len(&self) -> usize {
        self.client.data_source_cache.lock().len()
    }
}
