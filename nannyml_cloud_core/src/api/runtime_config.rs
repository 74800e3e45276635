//! Runtime configuration API client.
//!
//! Fetches default and current monitoring runtime configurations and
//! persists edited ones. Persisting always sends the whole configuration;
//! there are no revision tokens, so the last writer wins.

use serde_json::{json, Value};

use nannyml_cloud_core_types::EditRuntimeConfigInput;

use crate::errors::{CoreError, CoreResult};
use crate::graphql::field;
use crate::monitoring::{Chunking, ColumnType, ProblemType, RuntimeConfiguration};

use super::client::NannyClient;

const THRESHOLD_FRAGMENTS: &str = r#"
fragment ThresholdDetails on Threshold {
  __typename
  ... on ConstantThreshold { lower upper }
  ... on StandardDeviationThreshold { stdLowerMultiplier stdUpperMultiplier }
}

fragment MetricThresholdConfig on MetricConfig {
  __typename
  threshold { ...ThresholdDetails }
  segmentThresholds {
    segment { id }
    threshold { ...ThresholdDetails }
  }
}
"#;

const SUPPORT: &str = "{ enabled isSupported supportReason }";

/// Selection set of a full runtime configuration.
fn runtime_config_fragment() -> String {
    let column_facets = format!(
        "categorical {s} continuous {s} targets {s} predictions {s} predictedProbabilities {s}",
        s = SUPPORT
    );
    format!(
        r#"
fragment RuntimeConfigDetails on RuntimeConfig {{
  dataChunking {{ chunking enabled nrOfRows }}
  performanceTypes {{ type enabled isSupported supportReason }}
  performanceMetrics {{
    lowerValueLimit upperValueLimit ...MetricThresholdConfig
    metric
    estimated {s}
    realized {s}
    ... on BusinessValueMetricConfig {{
      truePositiveWeight falsePositiveWeight trueNegativeWeight falseNegativeWeight
      rules {{ trueClass trueClassName predictedClass predictedClassName weight isDefaultRule }}
    }}
  }}
  univariateDriftMethods {{
    lowerValueLimit upperValueLimit ...MetricThresholdConfig
    method
    {facets}
  }}
  multivariateDriftMethods {{
    lowerValueLimit upperValueLimit ...MetricThresholdConfig
    method enabled isSupported supportReason
  }}
  dataQualityMetrics {{
    lowerValueLimit upperValueLimit ...MetricThresholdConfig
    metric normalize
    {facets}
  }}
  conceptShiftMetrics {{
    lowerValueLimit upperValueLimit ...MetricThresholdConfig
    metric enabled isSupported supportReason
  }}
  summaryStatsMetrics {{
    lowerValueLimit upperValueLimit ...MetricThresholdConfig
    metric
    ... on SummaryStatsSimpleMetricConfig {{ enabled }}
    ... on SummaryStatsColumnMetricConfig {{
      categorical {{ enabled }} continuous {{ enabled }} targets {{ enabled }}
      predictions {{ enabled }} predictedProbabilities {{ enabled }}
    }}
  }}
  customMetrics {{
    ...MetricThresholdConfig
    metric {{ id name description }}
    estimated {{ enabled }}
    realized {{ enabled }}
  }}
}}
{thresholds}"#,
        s = SUPPORT,
        facets = column_facets,
        thresholds = THRESHOLD_FRAGMENTS,
    )
}

fn get_default_document() -> String {
    format!(
        r#"query getDefaultMonitoringRuntimeConfiguration($input: GetDefaultMonitoringRuntimeConfigInput!) {{
  get_default_monitoring_runtime_config(input: $input) {{ ...RuntimeConfigDetails }}
}}
{}"#,
        runtime_config_fragment()
    )
}

fn get_model_document() -> String {
    format!(
        r#"query getModelMonitoringRuntimeConfiguration($modelId: Int!) {{
  monitoring_model(id: $modelId) {{
    runtimeConfig {{ ...RuntimeConfigDetails }}
  }}
}}
{}"#,
        runtime_config_fragment()
    )
}

const SET_RUNTIME_CONFIGURATION: &str = r#"mutation setRuntimeConfiguration($modelId: Int!, $runtimeConfig: EditRuntimeConfigInput) {
  edit_monitoring_model(input: {
    modelId: $modelId
    runtimeConfig: $runtimeConfig
    allowInvalidatingResults: true
  }) {
    __typename
  }
}"#;

/// One column of the schema a default configuration is computed for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaColumn {
    pub name: String,
    pub column_type: ColumnType,
}

impl SchemaColumn {
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
        }
    }
}

/// Inputs of [`RuntimeConfigClient::fetch_default`].
#[derive(Debug, Clone, PartialEq)]
pub struct DefaultRuntimeConfigRequest {
    pub problem_type: ProblemType,
    pub chunking: Chunking,
    /// Chunk size when `chunking` is `NUMBER_OF_ROWS`.
    pub nr_of_rows: Option<i64>,
    pub columns: Vec<SchemaColumn>,
    pub has_analysis_targets: bool,
}

impl DefaultRuntimeConfigRequest {
    fn validate(&self) -> CoreResult<()> {
        if self.chunking == Chunking::NumberOfRows && self.nr_of_rows.is_none() {
            return Err(CoreError::invalid_argument(
                "nr_of_rows is required when chunking is NUMBER_OF_ROWS",
            ));
        }
        if let Some(rows) = self.nr_of_rows {
            if rows <= 0 {
                return Err(CoreError::invalid_argument(format!(
                    "nr_of_rows must be positive, got {}",
                    rows
                )));
            }
        }
        Ok(())
    }

    fn to_variables(&self) -> Value {
        let columns: Vec<Value> = self
            .columns
            .iter()
            .map(|c| json!({"name": c.name, "columnType": c.column_type}))
            .collect();
        json!({
            "input": {
                "problemType": self.problem_type,
                "chunking": self.chunking,
                "nrOfRows": self.nr_of_rows,
                "schema": {
                    "columns": columns,
                    "hasAnalysisTargets": self.has_analysis_targets,
                },
            }
        })
    }
}

/// Runtime configuration API client.
pub struct RuntimeConfigClient<'a> {
    client: &'a NannyClient,
}

impl<'a> RuntimeConfigClient<'a> {
    /// Create a new runtime configuration client.
    pub(crate) fn new(client: &'a NannyClient) -> Self {
        Self { client }
    }

    /// Default runtime configuration the server proposes for a schema.
    pub async fn fetch_default(
        &self,
        request: &DefaultRuntimeConfigRequest,
    ) -> CoreResult<RuntimeConfiguration> {
        request.validate()?;
        tracing::debug!(
            problem_type = %request.problem_type,
            chunking = %request.chunking,
            columns = request.columns.len(),
            "fetching default runtime configuration"
        );
        let data = self
            .client
            .graphql
            .execute(
                &get_default_document(),
                request.to_variables(),
                Some("getDefaultMonitoringRuntimeConfiguration"),
            )
            .await?;
        let config = field(&data, &["get_default_monitoring_runtime_config"])?;
        RuntimeConfiguration::from_value(config.clone())
    }

    /// Default configuration converted to mutation input, for inspection
    /// or for persisting onto an existing model.
    pub async fn default_input(
        &self,
        request: &DefaultRuntimeConfigRequest,
    ) -> CoreResult<EditRuntimeConfigInput> {
        self.fetch_default(request).await?.to_input()
    }

    /// Current runtime configuration of a model.
    ///
    /// Fails with `NotFound` when the model does not exist.
    pub async fn fetch_current(&self, model_id: i64) -> CoreResult<RuntimeConfiguration> {
        tracing::debug!(model_id, "fetching runtime configuration");
        let data = self
            .client
            .graphql
            .execute(
                &get_model_document(),
                json!({ "modelId": model_id }),
                Some("getModelMonitoringRuntimeConfiguration"),
            )
            .await?;
        let model = field(&data, &["monitoring_model"])?;
        if model.is_null() {
            return Err(CoreError::not_found(format!("monitoring model {}", model_id)));
        }
        let config = field(model, &["runtimeConfig"])?;
        RuntimeConfiguration::from_value(config.clone())
    }

    /// Replace the model's runtime configuration with `config`.
    ///
    /// The configuration is converted before anything is sent, so conversion
    /// failures never reach the network.
    pub async fn persist(&self, model_id: i64, config: &RuntimeConfiguration) -> CoreResult<()> {
        let input = config.to_input()?;
        let runtime_config = serde_json::to_value(&input)
            .map_err(|e| CoreError::Protocol(format!("failed to serialize runtime configuration: {}", e)))?;

        tracing::debug!(model_id, "persisting runtime configuration");
        self.client
            .graphql
            .execute(
                SET_RUNTIME_CONFIGURATION,
                json!({ "modelId": model_id, "runtimeConfig": runtime_config }),
                Some("setRuntimeConfiguration"),
            )
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monitoring::runtime_config::tests::fixture;
    use crate::monitoring::{ColumnToggle, Thresholded, UnivariateDriftMethod};
    use httpmock::prelude::*;

    fn client_for(server: &MockServer) -> NannyClient {
        NannyClient::new(&server.base_url(), "token").unwrap()
    }

    fn request() -> DefaultRuntimeConfigRequest {
        DefaultRuntimeConfigRequest {
            problem_type: ProblemType::BinaryClassification,
            chunking: Chunking::Monthly,
            nr_of_rows: None,
            columns: vec![
                SchemaColumn::new("timestamp", ColumnType::Timestamp),
                SchemaColumn::new("age", ColumnType::ContinuousFeature),
                SchemaColumn::new("churned", ColumnType::Target),
            ],
            has_analysis_targets: false,
        }
    }

    #[test]
    fn test_documents_reference_every_fragment() {
        let doc = get_model_document();
        for fragment in ["RuntimeConfigDetails", "MetricThresholdConfig", "ThresholdDetails"] {
            assert!(doc.contains(&format!("fragment {fragment} on")), "missing {fragment}");
        }
        assert!(get_default_document().contains("get_default_monitoring_runtime_config"));
        assert!(SET_RUNTIME_CONFIGURATION.contains("allowInvalidatingResults: true"));
    }

    #[test]
    fn test_number_of_rows_requires_row_count() {
        let mut req = request();
        req.chunking = Chunking::NumberOfRows;
        assert!(matches!(req.validate(), Err(CoreError::InvalidArgument(_))));
        req.nr_of_rows = Some(0);
        assert!(matches!(req.validate(), Err(CoreError::InvalidArgument(_))));
        req.nr_of_rows = Some(10_000);
        assert!(req.validate().is_ok());
    }

    #[tokio::test]
    async fn test_fetch_default_sends_schema() {
        let server = MockServer::start_async().await;
        let m = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/api/graphql")
                    .header("authorization", "ApiToken token")
                    .json_body_partial(
                        json!({
                            "operationName": "getDefaultMonitoringRuntimeConfiguration",
                            "variables": {"input": {
                                "problemType": "BINARY_CLASSIFICATION",
                                "chunking": "MONTHLY",
                                "nrOfRows": null,
                                "schema": {
                                    "columns": [
                                        {"name": "timestamp", "columnType": "TIMESTAMP"},
                                        {"name": "age", "columnType": "CONTINUOUS_FEATURE"},
                                        {"name": "churned", "columnType": "TARGET"}
                                    ],
                                    "hasAnalysisTargets": false
                                }
                            }}
                        })
                        .to_string(),
                    );
                then.status(200)
                    .json_body(json!({"data": {"get_default_monitoring_runtime_config": fixture()}}));
            })
            .await;

        let rc = client_for(&server)
            .runtime_config()
            .fetch_default(&request())
            .await
            .unwrap();
        assert_eq!(rc.univariate_drift_methods().len(), 2);
        m.assert_hits_async(1).await;
    }

    #[tokio::test]
    async fn test_fetch_current_missing_model_is_not_found() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/graphql");
                then.status(200).json_body(json!({"data": {"monitoring_model": null}}));
            })
            .await;

        let err = client_for(&server)
            .runtime_config()
            .fetch_current(404)
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_fetch_edit_persist() {
        let server = MockServer::start_async().await;
        let fetch = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/api/graphql")
                    .json_body_partial(r#"{"operationName": "getModelMonitoringRuntimeConfiguration", "variables": {"modelId": 7}}"#);
                then.status(200)
                    .json_body(json!({"data": {"monitoring_model": {"runtimeConfig": fixture()}}}));
            })
            .await;
        let persist = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/api/graphql")
                    .json_body_partial(r#"{"operationName": "setRuntimeConfiguration", "variables": {"modelId": 7}}"#)
                    .body_contains("runtimeConfig")
                    .body_contains("stdLowerMultiplier");
                then.status(200)
                    .json_body(json!({"data": {"edit_monitoring_model": {"__typename": "Model"}}}));
            })
            .await;

        let client = client_for(&server);
        let mut rc = client.runtime_config().fetch_current(7).await.unwrap();
        let ks = rc
            .univariate_drift_method(UnivariateDriftMethod::KolmogorovSmirnov)
            .unwrap();
        ks.enable_categorical();
        assert!(ks.threshold().is_some());

        client.runtime_config().persist(7, &rc).await.unwrap();
        fetch.assert_hits_async(1).await;
        persist.assert_hits_async(1).await;
    }

    #[tokio::test]
    async fn test_persist_rejected_by_server_is_api_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/graphql");
                then.status(200).json_body(json!({
                    "data": null,
                    "errors": [{"message": "Invalid combination of enabled metrics"}]
                }));
            })
            .await;

        let rc = RuntimeConfiguration::from_value(fixture()).unwrap();
        let err = client_for(&server)
            .runtime_config()
            .persist(7, &rc)
            .await
            .unwrap_err();
        assert!(err.is_api_error());
        assert!(!err.is_license_error());
        assert!(err.to_string().contains("Invalid combination"));
    }

    #[tokio::test]
    async fn test_persist_license_denial() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/graphql");
                then.status(403)
                    .json_body(json!({"type": "LicenseError", "detail": "Monitoring license expired"}));
            })
            .await;

        let rc = RuntimeConfiguration::from_value(fixture()).unwrap();
        let err = client_for(&server)
            .runtime_config()
            .persist(7, &rc)
            .await
            .unwrap_err();
        match err {
            CoreError::License(info) => assert_eq!(info.detail, "Monitoring license expired"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_persist_unrecognized_summary_stats_never_sent() {
        let server = MockServer::start_async().await;
        let m = server
            .mock_async(|when, then| {
                when.method(POST).path("/api/graphql");
                then.status(200).json_body(json!({"data": {}}));
            })
            .await;

        let mut value = fixture();
        value["summaryStatsMetrics"][0]["__typename"] = json!("SummaryStatsFutureMetricConfig");
        let rc = RuntimeConfiguration::from_value(value).unwrap();
        let err = client_for(&server)
            .runtime_config()
            .persist(7, &rc)
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::InvalidState(_)));
        m.assert_hits_async(0).await;
    }
}
