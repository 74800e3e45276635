//! Monitoring models API client.
//!
//! Creating a model needs uploaded datasets and is not offered here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::errors::{CoreError, CoreResult};
use crate::graphql::field;
use crate::monitoring::threshold::deserialize_id;
use crate::monitoring::ProblemType;

use super::client::NannyClient;
use super::runs::{RunSummary, RUN_SUMMARY_FRAGMENT};

const MODEL_SUMMARY_FRAGMENT: &str = r#"
fragment ModelSummary on Model {
  id
  name
  problemType
  createdAt
}
"#;

const LIST_MODELS: &str = r#"query listModels($filter: ModelsFilter) {
  monitoring_models(filter: $filter) {
    ...ModelSummary
  }
}"#;

const READ_MODEL: &str = r#"query readModel($id: Int!) {
  monitoring_model(id: $id) {
    ...ModelSummary
    latestRun {
      ...RunSummary
    }
  }
}"#;

const DELETE_MODEL: &str = r#"mutation deleteModel($id: Int!) {
  delete_monitoring_model(id: $id) {
    id
  }
}"#;

/// Narrows [`ModelsClient::list`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub problem_type: Option<ProblemType>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelSummary {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub name: String,
    pub problem_type: ProblemType,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelDetails {
    #[serde(flatten)]
    pub summary: ModelSummary,
    /// Active or most recent run; `None` before the first run.
    #[serde(default)]
    pub latest_run: Option<RunSummary>,
}

/// Monitoring models API client.
pub struct ModelsClient<'a> {
    client: &'a NannyClient,
}

impl<'a> ModelsClient<'a> {
    pub(crate) fn new(client: &'a NannyClient) -> Self {
        Self { client }
    }

    /// Models matching `filter`.
    pub async fn list(&self, filter: &ModelFilter) -> CoreResult<Vec<ModelSummary>> {
        let data = self
            .client
            .graphql
            .execute(
                &format!("{}\n{}", LIST_MODELS, MODEL_SUMMARY_FRAGMENT),
                json!({ "filter": filter }),
                Some("listModels"),
            )
            .await?;
        let models = field(&data, &["monitoring_models"])?;
        serde_json::from_value(models.clone())
            .map_err(|e| CoreError::Protocol(format!("malformed model list: {}", e)))
    }

    /// Details of one model. Fails with `NotFound` when it does not exist.
    pub async fn get(&self, model_id: i64) -> CoreResult<ModelDetails> {
        let data = self
            .client
            .graphql
            .execute(
                &format!("{}\n{}\n{}", READ_MODEL, MODEL_SUMMARY_FRAGMENT, RUN_SUMMARY_FRAGMENT),
                json!({ "id": model_id }),
                Some("readModel"),
            )
            .await?;
        let model = field(&data, &["monitoring_model"])?;
        if model.is_null() {
            return Err(CoreError::not_found(format!("monitoring model {}", model_id)));
        }
        serde_json::from_value(model.clone())
            .map_err(|e| CoreError::Protocol(format!("malformed model {}: {}", model_id, e)))
    }

    /// Delete a model and forget its cached data sources.
    pub async fn delete(&self, model_id: i64) -> CoreResult<()> {
        tracing::debug!(model_id, "deleting monitoring model");
        self.client
            .graphql
            .execute(DELETE_MODEL, json!({ "id": model_id }), Some("deleteModel"))
            .await?;
        self.client.data_sources().invalidate(model_id);
        Ok(())
    }
}
