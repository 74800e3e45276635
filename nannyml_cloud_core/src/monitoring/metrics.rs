//! Entries of a runtime configuration.
//!
//! Every type deserializes from the `RuntimeConfigDetails` query shape.
//! Fields are private: the server-reported support facts can be read but
//! never written, and all mutation goes through the capability traits.

use serde::Deserialize;

use super::capabilities::{
    ColumnFacet, ColumnToggle, EstimationToggle, Thresholded, Toggle, ValueLimited,
};
use super::enums::{
    Chunking, ClassificationRuleType, ConceptShiftMetric, DataQualityMetric,
    MultivariateDriftMethod, PerformanceMetric, PerformanceType, SummaryStatsMetric,
    UnivariateDriftMethod,
};
use super::support::SupportState;
use super::threshold::{deserialize_id, SegmentThreshold, Threshold};
use crate::errors::{CoreError, CoreResult};

/// `__typename` of performance metrics that carry a business-value block.
const BUSINESS_VALUE_TYPENAME: &str = "BusinessValueMetricConfig";
const SUMMARY_STATS_SIMPLE_TYPENAME: &str = "SummaryStatsSimpleMetricConfig";
const SUMMARY_STATS_COLUMN_TYPENAME: &str = "SummaryStatsColumnMetricConfig";

// =============================================================================
// Shared parts
// =============================================================================

/// Fields every metric entry carries.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricCommon {
    #[serde(default)]
    lower_value_limit: Option<f64>,
    #[serde(default)]
    upper_value_limit: Option<f64>,
    #[serde(default)]
    threshold: Option<Threshold>,
    #[serde(default)]
    segment_thresholds: Vec<SegmentThreshold>,
}

impl MetricCommon {
    pub fn lower_value_limit(&self) -> Option<f64> {
        self.lower_value_limit
    }

    pub fn upper_value_limit(&self) -> Option<f64> {
        self.upper_value_limit
    }

    pub fn threshold(&self) -> Option<&Threshold> {
        self.threshold.as_ref()
    }

    pub fn segment_thresholds(&self) -> &[SegmentThreshold] {
        &self.segment_thresholds
    }
}

/// Support state per column facet.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnFacets {
    categorical: SupportState,
    continuous: SupportState,
    targets: SupportState,
    predictions: SupportState,
    predicted_probabilities: SupportState,
}

impl ColumnFacets {
    pub fn get(&self, facet: ColumnFacet) -> &SupportState {
        match facet {
            ColumnFacet::Categorical => &self.categorical,
            ColumnFacet::Continuous => &self.continuous,
            ColumnFacet::Targets => &self.targets,
            ColumnFacet::Predictions => &self.predictions,
            ColumnFacet::PredictedProbabilities => &self.predicted_probabilities,
        }
    }

    fn get_mut(&mut self, facet: ColumnFacet) -> &mut SupportState {
        match facet {
            ColumnFacet::Categorical => &mut self.categorical,
            ColumnFacet::Continuous => &mut self.continuous,
            ColumnFacet::Targets => &mut self.targets,
            ColumnFacet::Predictions => &mut self.predictions,
            ColumnFacet::PredictedProbabilities => &mut self.predicted_probabilities,
        }
    }

    /// Facets in wire order.
    pub fn iter(&self) -> impl Iterator<Item = (ColumnFacet, &SupportState)> + '_ {
        ColumnFacet::ALL.into_iter().map(move |facet| (facet, self.get(facet)))
    }
}

// =============================================================================
// Capability impls
// =============================================================================

macro_rules! impl_thresholded {
    ($($ty:ty),+ $(,)?) => {$(
        impl Thresholded for $ty {
            fn threshold(&self) -> Option<&Threshold> {
                self.common.threshold.as_ref()
            }

            fn segment_thresholds(&self) -> &[SegmentThreshold] {
                &self.common.segment_thresholds
            }

            fn set_threshold(&mut self, threshold: Threshold) {
                self.common.threshold = Some(threshold);
            }
        }

        impl $ty {
            pub fn common(&self) -> &MetricCommon {
                &self.common
            }
        }
    )+};
}

macro_rules! impl_value_limited {
    ($($ty:ty),+ $(,)?) => {$(
        impl ValueLimited for $ty {
            fn lower_value_limit(&self) -> Option<f64> {
                self.common.lower_value_limit
            }

            fn upper_value_limit(&self) -> Option<f64> {
                self.common.upper_value_limit
            }

            fn set_lower_value_limit(&mut self, value: Option<f64>) {
                self.common.lower_value_limit = value;
            }

            fn set_upper_value_limit(&mut self, value: Option<f64>) {
                self.common.upper_value_limit = value;
            }
        }
    )+};
}

macro_rules! impl_toggle {
    ($($ty:ty),+ $(,)?) => {$(
        impl Toggle for $ty {
            fn support(&self) -> &SupportState {
                &self.support
            }

            fn enable(&mut self) {
                self.support.set_enabled(true);
                self.apply_default_threshold();
            }

            fn disable(&mut self) {
                self.support.set_enabled(false);
            }
        }
    )+};
}

macro_rules! impl_column_toggle {
    ($($ty:ty),+ $(,)?) => {$(
        impl ColumnToggle for $ty {
            fn facet(&self, facet: ColumnFacet) -> &SupportState {
                self.facets.get(facet)
            }

            fn enable_facet(&mut self, facet: ColumnFacet) {
                self.facets.get_mut(facet).set_enabled(true);
                self.apply_default_threshold();
            }

            fn disable_facet(&mut self, facet: ColumnFacet) {
                self.facets.get_mut(facet).set_enabled(false);
            }
        }

        impl $ty {
            pub fn facets(&self) -> &ColumnFacets {
                &self.facets
            }
        }
    )+};
}

macro_rules! impl_estimation_toggle {
    ($($ty:ty),+ $(,)?) => {$(
        impl EstimationToggle for $ty {
            fn estimated(&self) -> &SupportState {
                &self.estimated
            }

            fn realized(&self) -> &SupportState {
                &self.realized
            }

            fn enable_estimated(&mut self) {
                self.estimated.set_enabled(true);
                self.apply_default_threshold();
            }

            fn disable_estimated(&mut self) {
                self.estimated.set_enabled(false);
            }

            fn enable_realized(&mut self) {
                self.realized.set_enabled(true);
                self.apply_default_threshold();
            }

            fn disable_realized(&mut self) {
                self.realized.set_enabled(false);
            }
        }
    )+};
}

impl_thresholded!(
    PerformanceMetricConfig,
    UnivariateDriftConfig,
    MultivariateDriftConfig,
    DataQualityConfig,
    ConceptShiftConfig,
    SummaryStatsSimpleConfig,
    SummaryStatsColumnConfig,
    CustomMetricConfig,
);

// Custom metrics have no value limits.
impl_value_limited!(
    PerformanceMetricConfig,
    UnivariateDriftConfig,
    MultivariateDriftConfig,
    DataQualityConfig,
    ConceptShiftConfig,
    SummaryStatsSimpleConfig,
    SummaryStatsColumnConfig,
);

impl_toggle!(MultivariateDriftConfig, ConceptShiftConfig, SummaryStatsSimpleConfig);
impl_column_toggle!(UnivariateDriftConfig, DataQualityConfig, SummaryStatsColumnConfig);
impl_estimation_toggle!(PerformanceMetricConfig, CustomMetricConfig);

// =============================================================================
// Performance metrics
// =============================================================================

/// Cost/benefit weighting attached to the `BUSINESS_VALUE` metric.
#[derive(Debug, Clone, PartialEq)]
pub struct BusinessValue {
    pub true_positive_weight: f64,
    pub false_positive_weight: f64,
    pub true_negative_weight: f64,
    pub false_negative_weight: f64,
    pub rules: Vec<BusinessValueRule>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessValueRule {
    pub true_class: ClassificationRuleType,
    #[serde(default)]
    pub true_class_name: Option<String>,
    pub predicted_class: ClassificationRuleType,
    #[serde(default)]
    pub predicted_class_name: Option<String>,
    pub weight: f64,
    pub is_default_rule: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawPerformanceMetricConfig")]
pub struct PerformanceMetricConfig {
    metric: PerformanceMetric,
    estimated: SupportState,
    realized: SupportState,
    business_value: Option<BusinessValue>,
    common: MetricCommon,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPerformanceMetricConfig {
    #[serde(rename = "__typename", default)]
    typename: Option<String>,
    metric: PerformanceMetric,
    estimated: SupportState,
    realized: SupportState,
    #[serde(default)]
    true_positive_weight: Option<f64>,
    #[serde(default)]
    false_positive_weight: Option<f64>,
    #[serde(default)]
    true_negative_weight: Option<f64>,
    #[serde(default)]
    false_negative_weight: Option<f64>,
    #[serde(default)]
    rules: Vec<BusinessValueRule>,
    #[serde(flatten)]
    common: MetricCommon,
}

impl TryFrom<RawPerformanceMetricConfig> for PerformanceMetricConfig {
    type Error = String;

    fn try_from(raw: RawPerformanceMetricConfig) -> Result<Self, Self::Error> {
        let business_value = if raw.typename.as_deref() == Some(BUSINESS_VALUE_TYPENAME) {
            let weight = |value: Option<f64>, name: &str| {
                value.ok_or_else(|| format!("{} for metric {} is missing {}", BUSINESS_VALUE_TYPENAME, raw.metric, name))
            };
            Some(BusinessValue {
                true_positive_weight: weight(raw.true_positive_weight, "truePositiveWeight")?,
                false_positive_weight: weight(raw.false_positive_weight, "falsePositiveWeight")?,
                true_negative_weight: weight(raw.true_negative_weight, "trueNegativeWeight")?,
                false_negative_weight: weight(raw.false_negative_weight, "falseNegativeWeight")?,
                rules: raw.rules,
            })
        } else {
            None
        };
        Ok(PerformanceMetricConfig {
            metric: raw.metric,
            estimated: raw.estimated,
            realized: raw.realized,
            business_value,
            common: raw.common,
        })
    }
}

impl PerformanceMetricConfig {
    pub fn metric(&self) -> PerformanceMetric {
        self.metric
    }

    pub fn business_value(&self) -> Option<&BusinessValue> {
        self.business_value.as_ref()
    }
}

// =============================================================================
// Drift, data quality and concept shift
// =============================================================================

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UnivariateDriftConfig {
    method: UnivariateDriftMethod,
    #[serde(flatten)]
    facets: ColumnFacets,
    #[serde(flatten)]
    common: MetricCommon,
}

impl UnivariateDriftConfig {
    pub fn method(&self) -> UnivariateDriftMethod {
        self.method
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MultivariateDriftConfig {
    method: MultivariateDriftMethod,
    #[serde(flatten)]
    support: SupportState,
    #[serde(flatten)]
    common: MetricCommon,
}

impl MultivariateDriftConfig {
    pub fn method(&self) -> MultivariateDriftMethod {
        self.method
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DataQualityConfig {
    metric: DataQualityMetric,
    #[serde(default)]
    normalize: bool,
    #[serde(flatten)]
    facets: ColumnFacets,
    #[serde(flatten)]
    common: MetricCommon,
}

impl DataQualityConfig {
    pub fn metric(&self) -> DataQualityMetric {
        self.metric
    }

    /// Whether values are reported as a fraction of the chunk size.
    pub fn normalize(&self) -> bool {
        self.normalize
    }

    pub fn enable_normalization(&mut self) {
        self.normalize = true;
    }

    pub fn disable_normalization(&mut self) {
        self.normalize = false;
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ConceptShiftConfig {
    metric: ConceptShiftMetric,
    #[serde(flatten)]
    support: SupportState,
    #[serde(flatten)]
    common: MetricCommon,
}

impl ConceptShiftConfig {
    pub fn metric(&self) -> ConceptShiftMetric {
        self.metric
    }
}

// =============================================================================
// Summary statistics
// =============================================================================

/// Summary statistic reported for the whole dataset (e.g. `ROWS_COUNT`).
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryStatsSimpleConfig {
    metric: SummaryStatsMetric,
    support: SupportState,
    common: MetricCommon,
}

impl SummaryStatsSimpleConfig {
    pub fn metric(&self) -> SummaryStatsMetric {
        self.metric
    }
}

/// Summary statistic reported per column.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryStatsColumnConfig {
    metric: SummaryStatsMetric,
    facets: ColumnFacets,
    common: MetricCommon,
}

impl SummaryStatsColumnConfig {
    pub fn metric(&self) -> SummaryStatsMetric {
        self.metric
    }
}

/// Summary statistic entry whose `__typename` this client does not know.
///
/// Kept so a fetched configuration still loads; it cannot be mutated or sent
/// back.
#[derive(Debug, Clone, PartialEq)]
pub struct UnrecognizedSummaryStats {
    metric: SummaryStatsMetric,
    typename: String,
    common: MetricCommon,
}

impl UnrecognizedSummaryStats {
    pub fn metric(&self) -> SummaryStatsMetric {
        self.metric
    }

    pub fn typename(&self) -> &str {
        &self.typename
    }

    pub fn common(&self) -> &MetricCommon {
        &self.common
    }
}

/// Summary statistics come in two shapes, told apart by `__typename`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawSummaryStatsConfig")]
pub enum SummaryStatsConfig {
    Simple(SummaryStatsSimpleConfig),
    Column(SummaryStatsColumnConfig),
    Unrecognized(UnrecognizedSummaryStats),
}

impl SummaryStatsConfig {
    pub fn metric(&self) -> SummaryStatsMetric {
        match self {
            SummaryStatsConfig::Simple(config) => config.metric,
            SummaryStatsConfig::Column(config) => config.metric,
            SummaryStatsConfig::Unrecognized(config) => config.metric,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSummaryStatsConfig {
    #[serde(rename = "__typename", default)]
    typename: Option<String>,
    metric: SummaryStatsMetric,
    #[serde(default)]
    enabled: Option<bool>,
    #[serde(default)]
    categorical: Option<SupportState>,
    #[serde(default)]
    continuous: Option<SupportState>,
    #[serde(default)]
    targets: Option<SupportState>,
    #[serde(default)]
    predictions: Option<SupportState>,
    #[serde(default)]
    predicted_probabilities: Option<SupportState>,
    #[serde(flatten)]
    common: MetricCommon,
}

impl TryFrom<RawSummaryStatsConfig> for SummaryStatsConfig {
    type Error = String;

    fn try_from(raw: RawSummaryStatsConfig) -> Result<Self, Self::Error> {
        let typename = match raw.typename {
            Some(typename) => typename,
            None if raw.enabled.is_some() => SUMMARY_STATS_SIMPLE_TYPENAME.to_string(),
            None if raw.categorical.is_some() => SUMMARY_STATS_COLUMN_TYPENAME.to_string(),
            None => String::new(),
        };

        match typename.as_str() {
            SUMMARY_STATS_SIMPLE_TYPENAME => Ok(SummaryStatsConfig::Simple(SummaryStatsSimpleConfig {
                metric: raw.metric,
                support: SupportState::from_enabled(raw.enabled.unwrap_or(false)),
                common: raw.common,
            })),
            SUMMARY_STATS_COLUMN_TYPENAME => {
                let metric = raw.metric;
                let facet = |state: Option<SupportState>, name: &str| {
                    state.ok_or_else(|| format!("summary stats metric {} is missing facet {}", metric, name))
                };
                Ok(SummaryStatsConfig::Column(SummaryStatsColumnConfig {
                    metric,
                    facets: ColumnFacets {
                        categorical: facet(raw.categorical, "categorical")?,
                        continuous: facet(raw.continuous, "continuous")?,
                        targets: facet(raw.targets, "targets")?,
                        predictions: facet(raw.predictions, "predictions")?,
                        predicted_probabilities: facet(
                            raw.predicted_probabilities,
                            "predictedProbabilities",
                        )?,
                    },
                    common: raw.common,
                }))
            }
            _ => Ok(SummaryStatsConfig::Unrecognized(UnrecognizedSummaryStats {
                metric: raw.metric,
                typename,
                common: raw.common,
            })),
        }
    }
}

// =============================================================================
// Custom metrics
// =============================================================================

/// Identity of a user-defined metric.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CustomMetricSummary {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CustomMetricConfig {
    metric: CustomMetricSummary,
    estimated: SupportState,
    realized: SupportState,
    #[serde(flatten)]
    common: MetricCommon,
}

impl CustomMetricConfig {
    pub fn metric(&self) -> &CustomMetricSummary {
        &self.metric
    }

    pub fn name(&self) -> &str {
        &self.metric.name
    }
}

// =============================================================================
// Chunking and performance types
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChunkingConfig {
    chunking: Chunking,
    #[serde(default)]
    nr_of_rows: Option<i64>,
    #[serde(default)]
    enabled: bool,
}

impl ChunkingConfig {
    pub fn chunking(&self) -> Chunking {
        self.chunking
    }

    pub fn nr_of_rows(&self) -> Option<i64> {
        self.nr_of_rows
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn enable(&mut self) {
        self.enabled = true;
    }

    pub fn disable(&mut self) {
        self.enabled = false;
    }

    /// Set the chunk size in rows. `None` clears it.
    pub fn set_nr_of_rows(&mut self, nr_of_rows: Option<i64>) -> CoreResult<()> {
        if let Some(rows) = nr_of_rows {
            if rows <= 0 {
                return Err(CoreError::invalid_argument(format!(
                    "nr_of_rows must be positive, got {}",
                    rows
                )));
            }
        }
        self.nr_of_rows = nr_of_rows;
        Ok(())
    }
}

/// Whether an estimator family runs for the model.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PerformanceTypeConfig {
    #[serde(rename = "type")]
    performance_type: PerformanceType,
    #[serde(flatten)]
    support: SupportState,
}

impl PerformanceTypeConfig {
    pub fn performance_type(&self) -> PerformanceType {
        self.performance_type
    }

    pub fn support(&self) -> &SupportState {
        &self.support
    }

    pub fn is_enabled(&self) -> bool {
        self.support.enabled()
    }

    pub fn enable(&mut self) {
        self.support.set_enabled(true);
    }

    pub fn disable(&mut self) {
        self.support.set_enabled(false);
    }
}
