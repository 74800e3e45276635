//! Model runs API client.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;

use crate::errors::{CoreError, CoreResult};
use crate::graphql::field;
use crate::monitoring::threshold::deserialize_id;

use super::client::NannyClient;

pub(crate) const RUN_SUMMARY_FRAGMENT: &str = r#"
fragment RunSummary on Run {
  id
  state
  scheduledFor
  startedAt
  completedAt
  ranSuccessfully
}
"#;

const START_RUN: &str = r#"mutation startRun($modelId: Int!) {
  start_model_run(modelId: $modelId) {
    id
  }
}"#;

/// One analysis run of a model.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub state: String,
    #[serde(default)]
    pub scheduled_for: Option<DateTime<Utc>>,
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    /// `None` while the run has not finished.
    #[serde(default)]
    pub ran_successfully: Option<bool>,
}

/// Runs API client.
pub struct RunsClient<'a> {
    client: &'a NannyClient,
}

impl<'a> RunsClient<'a> {
    pub(crate) fn new(client: &'a NannyClient) -> Self {
        Self { client }
    }

    /// Trigger analysis of new data for a model.
    ///
    /// Returns the id of the started run.
    pub async fn trigger(&self, model_id: i64) -> CoreResult<String> {
        tracing::debug!(model_id, "starting model run");
        let data = self
            .client
            .graphql
            .execute(START_RUN, json!({ "modelId": model_id }), Some("startRun"))
            .await?;
        let run = field(&data, &["start_model_run"])?;
        if run.is_null() {
            return Err(CoreError::not_found(format!("monitoring model {}", model_id)));
        }
        match field(run, &["id"])? {
            serde_json::Value::String(id) => Ok(id.clone()),
            serde_json::Value::Number(id) => Ok(id.to_string()),
            other => Err(CoreError::Protocol(format!("unexpected run id {}", other))),
        }
    }
}
