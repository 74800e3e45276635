//! Shared DTOs for the NannyML Cloud core and SDK crates.
//!
//! Two families live here:
//! - the GraphQL envelope (`GraphqlRequest`, `GraphqlResponse`) used by the
//!   transport,
//! - the input objects of the `edit_monitoring_model` mutation. Field names
//!   and nesting must match the server's input types exactly; tagged unions
//!   are expressed as single-key objects.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// =============================================================================
// GraphQL envelope
// =============================================================================

/// Body of a GraphQL HTTP request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphqlRequest {
    pub query: String,
    pub variables: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation_name: Option<String>,
}

/// Body of a GraphQL HTTP response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphqlResponse {
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub errors: Option<Vec<GraphqlErrorEntry>>,
}

/// One entry of the `errors` array of a GraphQL response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphqlErrorEntry {
    pub message: String,
    #[serde(default)]
    pub path: Option<Vec<Value>>,
    #[serde(default)]
    pub extensions: Option<Map<String, Value>>,
}

impl GraphqlErrorEntry {
    /// Server-provided error code (`extensions.code`), if any.
    pub fn code(&self) -> Option<&str> {
        self.extensions
            .as_ref()
            .and_then(|ext| ext.get("code"))
            .and_then(|v| v.as_str())
    }
}

// =============================================================================
// Runtime configuration input
// =============================================================================

/// `EditRuntimeConfigInput`: the full runtime configuration as sent back to
/// the server. Always complete; the server has no partial update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditRuntimeConfigInput {
    pub data_chunking: Vec<ChunkingInput>,
    pub performance_types: Vec<PerformanceTypeInput>,
    pub performance_metrics: Vec<PerformanceMetricInput>,
    pub univariate_drift_methods: Vec<UnivariateDriftMethodInput>,
    pub multivariate_drift_methods: Vec<MultivariateDriftMethodInput>,
    pub data_quality_metrics: Vec<DataQualityMetricInput>,
    pub concept_shift_metrics: Vec<ConceptShiftMetricInput>,
    pub summary_stats_metrics: Vec<SummaryStatsMetricInput>,
    pub custom_metrics: Vec<CustomMetricInput>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChunkingInput {
    pub chunking: String,
    pub nr_of_rows: Option<i64>,
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceTypeInput {
    #[serde(rename = "type")]
    pub performance_type: String,
    pub enabled: bool,
}

/// Threshold as a single-key tagged object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ThresholdInput {
    Constant(ConstantThresholdInput),
    StandardDeviation(StandardDeviationThresholdInput),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstantThresholdInput {
    pub lower: Option<f64>,
    pub upper: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StandardDeviationThresholdInput {
    pub std_lower_multiplier: f64,
    pub std_upper_multiplier: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentThresholdInput {
    pub segment_id: String,
    pub threshold: Option<ThresholdInput>,
}

/// Fields every metric input carries.
///
/// Value limits are not part of the mutation input.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricInputCommon {
    pub threshold: Option<ThresholdInput>,
    pub segment_thresholds: Vec<SegmentThresholdInput>,
}

/// Per-column-facet enable flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnFlagsInput {
    pub enabled_categorical: bool,
    pub enabled_continuous: bool,
    pub enabled_targets: bool,
    pub enabled_predictions: bool,
    pub enabled_predicted_probabilities: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceMetricInput {
    pub metric: String,
    pub enabled_estimated: bool,
    pub enabled_realized: bool,
    pub business_value: Option<BusinessValueInput>,
    #[serde(flatten)]
    pub common: MetricInputCommon,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessValueInput {
    pub true_positive_weight: f64,
    pub false_positive_weight: f64,
    pub true_negative_weight: f64,
    pub false_negative_weight: f64,
    pub rules: Vec<BusinessValueRuleInput>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessValueRuleInput {
    pub true_class: String,
    pub true_class_name: Option<String>,
    pub predicted_class: String,
    pub predicted_class_name: Option<String>,
    pub weight: f64,
    pub is_default_rule: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnivariateDriftMethodInput {
    pub method: String,
    #[serde(flatten)]
    pub flags: ColumnFlagsInput,
    #[serde(flatten)]
    pub common: MetricInputCommon,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultivariateDriftMethodInput {
    pub method: String,
    pub enabled: bool,
    #[serde(flatten)]
    pub common: MetricInputCommon,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataQualityMetricInput {
    pub metric: String,
    pub normalize: bool,
    #[serde(flatten)]
    pub flags: ColumnFlagsInput,
    #[serde(flatten)]
    pub common: MetricInputCommon,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConceptShiftMetricInput {
    pub metric: String,
    pub enabled: bool,
    #[serde(flatten)]
    pub common: MetricInputCommon,
}

/// Summary statistics come in two shapes; the wire object carries either a
/// single `enabled` flag or the five column flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SummaryStatsMetricInput {
    Simple(SummaryStatsSimpleInput),
    Column(SummaryStatsColumnInput),
}

impl SummaryStatsMetricInput {
    pub fn metric(&self) -> &str {
        match self {
            Self::Simple(input) => &input.metric,
            Self::Column(input) => &input.metric,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryStatsSimpleInput {
    pub metric: String,
    pub enabled: bool,
    #[serde(flatten)]
    pub common: MetricInputCommon,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryStatsColumnInput {
    pub metric: String,
    #[serde(flatten)]
    pub flags: ColumnFlagsInput,
    #[serde(flatten)]
    pub common: MetricInputCommon,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomMetricInput {
    pub metric_id: String,
    pub enabled_estimated: bool,
    pub enabled_realized: bool,
    #[serde(flatten)]
    pub common: MetricInputCommon,
}
