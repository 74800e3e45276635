//! The runtime configuration aggregate.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use std::ops::Deref;

use nannyml_cloud_core_types::EditRuntimeConfigInput;

use super::capabilities::{ColumnToggle, EstimationToggle, Thresholded, Toggle, ValueLimited};
use super::convert;
use super::enums::{
    Chunking, ConceptShiftMetric, DataQualityMetric, MultivariateDriftMethod, PerformanceMetric,
    PerformanceType, SummaryStatsMetric, UnivariateDriftMethod,
};
use super::metrics::{
    ChunkingConfig, ConceptShiftConfig, CustomMetricConfig, DataQualityConfig,
    MultivariateDriftConfig, PerformanceMetricConfig, PerformanceTypeConfig, SummaryStatsColumnConfig,
    SummaryStatsConfig, SummaryStatsSimpleConfig, UnivariateDriftConfig,
};
use crate::errors::{CoreError, CoreResult};

/// Full monitoring runtime configuration of a model.
///
/// Built from a server response, edited in place, and always persisted
/// whole. Entries cannot be added or removed; the server fixes the catalog
/// for the model's schema.
///
/// Entries keyed by a metric or method name this client does not know are
/// kept aside as [`UnrecognizedEntry`] instead of failing the whole parse.
/// Such a configuration can be read and edited but not persisted.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(try_from = "RawRuntimeConfiguration")]
pub struct RuntimeConfiguration {
    data_chunking: Vec<ChunkingConfig>,
    performance_types: Vec<PerformanceTypeConfig>,
    performance_metrics: Vec<PerformanceMetricConfig>,
    univariate_drift_methods: Vec<UnivariateDriftConfig>,
    multivariate_drift_methods: Vec<MultivariateDriftConfig>,
    data_quality_metrics: Vec<DataQualityConfig>,
    concept_shift_metrics: Vec<ConceptShiftConfig>,
    summary_stats_metrics: Vec<SummaryStatsConfig>,
    custom_metrics: Vec<CustomMetricConfig>,
    unrecognized: Vec<UnrecognizedEntry>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRuntimeConfiguration {
    #[serde(default)]
    data_chunking: Vec<Value>,
    #[serde(default)]
    performance_types: Vec<Value>,
    #[serde(default)]
    performance_metrics: Vec<Value>,
    #[serde(default)]
    univariate_drift_methods: Vec<Value>,
    #[serde(default)]
    multivariate_drift_methods: Vec<Value>,
    #[serde(default)]
    data_quality_metrics: Vec<Value>,
    #[serde(default)]
    concept_shift_metrics: Vec<Value>,
    #[serde(default)]
    summary_stats_metrics: Vec<Value>,
    #[serde(default)]
    custom_metrics: Vec<Value>,
}

/// A configuration entry whose key is not one of the client's known values.
#[derive(Debug, Clone, PartialEq)]
pub struct UnrecognizedEntry {
    section: &'static str,
    key: String,
    raw: Value,
}

impl UnrecognizedEntry {
    /// Wire name of the section the entry came from, e.g. `univariateDriftMethods`.
    pub fn section(&self) -> &'static str {
        self.section
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// The entry exactly as the server reported it.
    pub fn raw(&self) -> &Value {
        &self.raw
    }
}

/// Splits one section into typed entries and entries with an unknown key.
///
/// Only an unknown string under `key_field` sets an entry aside; any other
/// malformation still fails the parse.
fn split_section<T: DeserializeOwned>(
    section: &'static str,
    key_field: &str,
    known: &[&str],
    values: Vec<Value>,
    unrecognized: &mut Vec<UnrecognizedEntry>,
) -> Result<Vec<T>, String> {
    let mut entries = Vec::with_capacity(values.len());
    for value in values {
        let unknown_key = value
            .get(key_field)
            .and_then(Value::as_str)
            .filter(|key| !known.contains(key))
            .map(String::from);
        if let Some(key) = unknown_key {
            unrecognized.push(UnrecognizedEntry { section, key, raw: value });
            continue;
        }
        entries.push(serde_json::from_value(value).map_err(|e| format!("{}: {}", section, e))?);
    }
    Ok(entries)
}

macro_rules! wire_names {
    ($enum:ty) => {
        <$enum>::ALL.iter().map(|v| v.as_str()).collect::<Vec<_>>()
    };
}

impl TryFrom<RawRuntimeConfiguration> for RuntimeConfiguration {
    type Error = String;

    fn try_from(raw: RawRuntimeConfiguration) -> Result<Self, String> {
        let mut unrecognized = Vec::new();
        let u = &mut unrecognized;
        Ok(Self {
            data_chunking: split_section("dataChunking", "chunking", &wire_names!(Chunking), raw.data_chunking, u)?,
            performance_types: split_section("performanceTypes", "type", &wire_names!(PerformanceType), raw.performance_types, u)?,
            performance_metrics: split_section(
                "performanceMetrics",
                "metric",
                &wire_names!(PerformanceMetric),
                raw.performance_metrics,
                u,
            )?,
            univariate_drift_methods: split_section(
                "univariateDriftMethods",
                "method",
                &wire_names!(UnivariateDriftMethod),
                raw.univariate_drift_methods,
                u,
            )?,
            multivariate_drift_methods: split_section(
                "multivariateDriftMethods",
                "method",
                &wire_names!(MultivariateDriftMethod),
                raw.multivariate_drift_methods,
                u,
            )?,
            data_quality_metrics: split_section(
                "dataQualityMetrics",
                "metric",
                &wire_names!(DataQualityMetric),
                raw.data_quality_metrics,
                u,
            )?,
            concept_shift_metrics: split_section(
                "conceptShiftMetrics",
                "metric",
                &wire_names!(ConceptShiftMetric),
                raw.concept_shift_metrics,
                u,
            )?,
            summary_stats_metrics: split_section(
                "summaryStatsMetrics",
                "metric",
                &wire_names!(SummaryStatsMetric),
                raw.summary_stats_metrics,
                u,
            )?,
            // keyed by an object, not a closed name
            custom_metrics: raw
                .custom_metrics
                .into_iter()
                .map(|v| serde_json::from_value(v).map_err(|e| format!("customMetrics: {}", e)))
                .collect::<Result<_, _>>()?,
            unrecognized,
        })
    }
}

/// Metric families addressable through [`RuntimeConfiguration::lookup`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricCategory {
    PerformanceMetric,
    UnivariateDrift,
    MultivariateDrift,
    DataQuality,
    ConceptShift,
    SummaryStats,
    CustomMetric,
}

impl MetricCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricCategory::PerformanceMetric => "performance metric",
            MetricCategory::UnivariateDrift => "univariate drift method",
            MetricCategory::MultivariateDrift => "multivariate drift method",
            MetricCategory::DataQuality => "data quality metric",
            MetricCategory::ConceptShift => "concept shift metric",
            MetricCategory::SummaryStats => "summary stats metric",
            MetricCategory::CustomMetric => "custom metric",
        }
    }
}

impl MetricCategory {
    fn section(&self) -> &'static str {
        match self {
            MetricCategory::PerformanceMetric => "performanceMetrics",
            MetricCategory::UnivariateDrift => "univariateDriftMethods",
            MetricCategory::MultivariateDrift => "multivariateDriftMethods",
            MetricCategory::DataQuality => "dataQualityMetrics",
            MetricCategory::ConceptShift => "conceptShiftMetrics",
            MetricCategory::SummaryStats => "summaryStatsMetrics",
            MetricCategory::CustomMetric => "customMetrics",
        }
    }
}

impl fmt::Display for MetricCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mutable handle to one entry found by [`RuntimeConfiguration::lookup`].
#[derive(Debug)]
pub enum MetricEntryMut<'a> {
    PerformanceMetric(&'a mut PerformanceMetricConfig),
    UnivariateDrift(&'a mut UnivariateDriftConfig),
    MultivariateDrift(&'a mut MultivariateDriftConfig),
    DataQuality(&'a mut DataQualityConfig),
    ConceptShift(&'a mut ConceptShiftConfig),
    SummaryStatsSimple(&'a mut SummaryStatsSimpleConfig),
    SummaryStatsColumn(&'a mut SummaryStatsColumnConfig),
    CustomMetric(&'a mut CustomMetricConfig),
}

impl<'a> MetricEntryMut<'a> {
    pub fn category(&self) -> MetricCategory {
        match self {
            MetricEntryMut::PerformanceMetric(_) => MetricCategory::PerformanceMetric,
            MetricEntryMut::UnivariateDrift(_) => MetricCategory::UnivariateDrift,
            MetricEntryMut::MultivariateDrift(_) => MetricCategory::MultivariateDrift,
            MetricEntryMut::DataQuality(_) => MetricCategory::DataQuality,
            MetricEntryMut::ConceptShift(_) => MetricCategory::ConceptShift,
            MetricEntryMut::SummaryStatsSimple(_) | MetricEntryMut::SummaryStatsColumn(_) => {
                MetricCategory::SummaryStats
            }
            MetricEntryMut::CustomMetric(_) => MetricCategory::CustomMetric,
        }
    }

    pub fn thresholded(&mut self) -> &mut dyn Thresholded {
        match self {
            MetricEntryMut::PerformanceMetric(c) => &mut **c,
            MetricEntryMut::UnivariateDrift(c) => &mut **c,
            MetricEntryMut::MultivariateDrift(c) => &mut **c,
            MetricEntryMut::DataQuality(c) => &mut **c,
            MetricEntryMut::ConceptShift(c) => &mut **c,
            MetricEntryMut::SummaryStatsSimple(c) => &mut **c,
            MetricEntryMut::SummaryStatsColumn(c) => &mut **c,
            MetricEntryMut::CustomMetric(c) => &mut **c,
        }
    }

    /// `None` for custom metrics, which have no value limits.
    pub fn value_limited(&mut self) -> Option<&mut dyn ValueLimited> {
        match self {
            MetricEntryMut::PerformanceMetric(c) => Some(&mut **c),
            MetricEntryMut::UnivariateDrift(c) => Some(&mut **c),
            MetricEntryMut::MultivariateDrift(c) => Some(&mut **c),
            MetricEntryMut::DataQuality(c) => Some(&mut **c),
            MetricEntryMut::ConceptShift(c) => Some(&mut **c),
            MetricEntryMut::SummaryStatsSimple(c) => Some(&mut **c),
            MetricEntryMut::SummaryStatsColumn(c) => Some(&mut **c),
            MetricEntryMut::CustomMetric(_) => None,
        }
    }

    pub fn toggle(&mut self) -> Option<&mut dyn Toggle> {
        match self {
            MetricEntryMut::MultivariateDrift(c) => Some(&mut **c),
            MetricEntryMut::ConceptShift(c) => Some(&mut **c),
            MetricEntryMut::SummaryStatsSimple(c) => Some(&mut **c),
            _ => None,
        }
    }

    pub fn column_toggle(&mut self) -> Option<&mut dyn ColumnToggle> {
        match self {
            MetricEntryMut::UnivariateDrift(c) => Some(&mut **c),
            MetricEntryMut::DataQuality(c) => Some(&mut **c),
            MetricEntryMut::SummaryStatsColumn(c) => Some(&mut **c),
            _ => None,
        }
    }

    pub fn estimation_toggle(&mut self) -> Option<&mut dyn EstimationToggle> {
        match self {
            MetricEntryMut::PerformanceMetric(c) => Some(&mut **c),
            MetricEntryMut::CustomMetric(c) => Some(&mut **c),
            _ => None,
        }
    }
}

/// Mutable handle to a summary statistics entry of a known shape.
#[derive(Debug)]
pub enum SummaryStatsMut<'a> {
    Simple(&'a mut SummaryStatsSimpleConfig),
    Column(&'a mut SummaryStatsColumnConfig),
}

impl<'a> SummaryStatsMut<'a> {
    pub fn into_simple(self) -> CoreResult<&'a mut SummaryStatsSimpleConfig> {
        match self {
            SummaryStatsMut::Simple(config) => Ok(config),
            SummaryStatsMut::Column(config) => Err(CoreError::invalid_argument(format!(
                "summary stats metric {} is configured per column",
                config.metric()
            ))),
        }
    }

    pub fn into_column(self) -> CoreResult<&'a mut SummaryStatsColumnConfig> {
        match self {
            SummaryStatsMut::Column(config) => Ok(config),
            SummaryStatsMut::Simple(config) => Err(CoreError::invalid_argument(format!(
                "summary stats metric {} is not configured per column",
                config.metric()
            ))),
        }
    }
}

impl<'a> From<SummaryStatsMut<'a>> for MetricEntryMut<'a> {
    fn from(entry: SummaryStatsMut<'a>) -> Self {
        match entry {
            SummaryStatsMut::Simple(config) => MetricEntryMut::SummaryStatsSimple(config),
            SummaryStatsMut::Column(config) => MetricEntryMut::SummaryStatsColumn(config),
        }
    }
}

fn not_found(category: MetricCategory, key: impl fmt::Display) -> CoreError {
    CoreError::not_found(format!("{} {} is not part of this configuration", category, key))
}

impl RuntimeConfiguration {
    /// Parse the `RuntimeConfigDetails` object of a query response.
    pub fn from_value(value: Value) -> CoreResult<Self> {
        serde_json::from_value(value)
            .map_err(|e| CoreError::Protocol(format!("failed to parse runtime configuration: {}", e)))
    }

    // -------------------------------------------------------------------------
    // read access
    // -------------------------------------------------------------------------

    pub fn data_chunkings(&self) -> &[ChunkingConfig] {
        &self.data_chunking
    }

    pub fn performance_types(&self) -> &[PerformanceTypeConfig] {
        &self.performance_types
    }

    pub fn performance_metrics(&self) -> &[PerformanceMetricConfig] {
        &self.performance_metrics
    }

    pub fn univariate_drift_methods(&self) -> &[UnivariateDriftConfig] {
        &self.univariate_drift_methods
    }

    pub fn multivariate_drift_methods(&self) -> &[MultivariateDriftConfig] {
        &self.multivariate_drift_methods
    }

    pub fn data_quality_metrics(&self) -> &[DataQualityConfig] {
        &self.data_quality_metrics
    }

    pub fn concept_shift_metrics(&self) -> &[ConceptShiftConfig] {
        &self.concept_shift_metrics
    }

    pub fn summary_stats_metrics(&self) -> &[SummaryStatsConfig] {
        &self.summary_stats_metrics
    }

    pub fn custom_metrics(&self) -> &[CustomMetricConfig] {
        &self.custom_metrics
    }

    /// Entries whose key this client does not know.
    pub fn unrecognized_entries(&self) -> &[UnrecognizedEntry] {
        &self.unrecognized
    }

    /// Immutable deep copy for inspection.
    pub fn to_snapshot(&self) -> RuntimeConfigSnapshot {
        RuntimeConfigSnapshot {
            config: self.clone(),
        }
    }

    /// Wire input for the `edit_monitoring_model` mutation.
    pub fn to_input(&self) -> CoreResult<EditRuntimeConfigInput> {
        convert::to_input(self)
    }

    // -------------------------------------------------------------------------
    // mutable access
    // -------------------------------------------------------------------------

    pub fn data_chunking(&mut self, chunking: Chunking) -> CoreResult<&mut ChunkingConfig> {
        self.data_chunking
            .iter_mut()
            .find(|c| c.chunking() == chunking)
            .ok_or_else(|| CoreError::not_found(format!("chunking {} is not part of this configuration", chunking)))
    }

    pub fn performance_type(
        &mut self,
        performance_type: PerformanceType,
    ) -> CoreResult<&mut PerformanceTypeConfig> {
        self.performance_types
            .iter_mut()
            .find(|c| c.performance_type() == performance_type)
            .ok_or_else(|| {
                CoreError::not_found(format!(
                    "performance type {} is not part of this configuration",
                    performance_type
                ))
            })
    }

    pub fn performance_metric(
        &mut self,
        metric: PerformanceMetric,
    ) -> CoreResult<&mut PerformanceMetricConfig> {
        self.performance_metrics
            .iter_mut()
            .find(|c| c.metric() == metric)
            .ok_or_else(|| not_found(MetricCategory::PerformanceMetric, metric))
    }

    pub fn univariate_drift_method(
        &mut self,
        method: UnivariateDriftMethod,
    ) -> CoreResult<&mut UnivariateDriftConfig> {
        self.univariate_drift_methods
            .iter_mut()
            .find(|c| c.method() == method)
            .ok_or_else(|| not_found(MetricCategory::UnivariateDrift, method))
    }

    pub fn multivariate_drift_method(
        &mut self,
        method: MultivariateDriftMethod,
    ) -> CoreResult<&mut MultivariateDriftConfig> {
        self.multivariate_drift_methods
            .iter_mut()
            .find(|c| c.method() == method)
            .ok_or_else(|| not_found(MetricCategory::MultivariateDrift, method))
    }

    pub fn data_quality_metric(
        &mut self,
        metric: DataQualityMetric,
    ) -> CoreResult<&mut DataQualityConfig> {
        self.data_quality_metrics
            .iter_mut()
            .find(|c| c.metric() == metric)
            .ok_or_else(|| not_found(MetricCategory::DataQuality, metric))
    }

    pub fn concept_shift_metric(
        &mut self,
        metric: ConceptShiftMetric,
    ) -> CoreResult<&mut ConceptShiftConfig> {
        self.concept_shift_metrics
            .iter_mut()
            .find(|c| c.metric() == metric)
            .ok_or_else(|| not_found(MetricCategory::ConceptShift, metric))
    }

    /// Fails with `InvalidState` when the entry has an unrecognized shape.
    pub fn summary_stats_metric(
        &mut self,
        metric: SummaryStatsMetric,
    ) -> CoreResult<SummaryStatsMut<'_>> {
        let entry = self
            .summary_stats_metrics
            .iter_mut()
            .find(|c| c.metric() == metric)
            .ok_or_else(|| not_found(MetricCategory::SummaryStats, metric))?;
        match entry {
            SummaryStatsConfig::Simple(config) => Ok(SummaryStatsMut::Simple(config)),
            SummaryStatsConfig::Column(config) => Ok(SummaryStatsMut::Column(config)),
            SummaryStatsConfig::Unrecognized(config) => Err(CoreError::invalid_state(format!(
                "summary stats metric {} has unrecognized type {:?}",
                metric,
                config.typename()
            ))),
        }
    }

    /// Custom metrics are addressed by the metric's name.
    pub fn custom_metric(&mut self, name: &str) -> CoreResult<&mut CustomMetricConfig> {
        self.custom_metrics
            .iter_mut()
            .find(|c| c.name() == name)
            .ok_or_else(|| not_found(MetricCategory::CustomMetric, name))
    }

    fn unknown_key(&self, category: MetricCategory, key: &str) -> CoreError {
        let reported = self
            .unrecognized
            .iter()
            .any(|e| e.section == category.section() && e.key.eq_ignore_ascii_case(key.trim()));
        if reported {
            CoreError::invalid_state(format!(
                "{} {} is not known to this client and cannot be edited",
                category, key
            ))
        } else {
            not_found(category, key)
        }
    }

    /// Find an entry by category and key.
    ///
    /// The key is the wire name of the metric or method (`"KOLMOGOROV_SMIRNOV"`),
    /// or the name of a custom metric. Keys that do not name a known value fail
    /// with `NotFound`, like keys that are simply absent, unless the server
    /// reported an entry under that key; that fails with `InvalidState`.
    pub fn lookup(&mut self, category: MetricCategory, key: &str) -> CoreResult<MetricEntryMut<'_>> {
        match category {
            MetricCategory::PerformanceMetric => {
                let metric = PerformanceMetric::from_str(key).ok_or_else(|| self.unknown_key(category, key))?;
                self.performance_metric(metric).map(MetricEntryMut::PerformanceMetric)
            }
            MetricCategory::UnivariateDrift => {
                let method = UnivariateDriftMethod::from_str(key).ok_or_else(|| self.unknown_key(category, key))?;
                self.univariate_drift_method(method).map(MetricEntryMut::UnivariateDrift)
            }
            MetricCategory::MultivariateDrift => {
                let method = MultivariateDriftMethod::from_str(key).ok_or_else(|| self.unknown_key(category, key))?;
                self.multivariate_drift_method(method).map(MetricEntryMut::MultivariateDrift)
            }
            MetricCategory::DataQuality => {
                let metric = DataQualityMetric::from_str(key).ok_or_else(|| self.unknown_key(category, key))?;
                self.data_quality_metric(metric).map(MetricEntryMut::DataQuality)
            }
            MetricCategory::ConceptShift => {
                let metric = ConceptShiftMetric::from_str(key).ok_or_else(|| self.unknown_key(category, key))?;
                self.concept_shift_metric(metric).map(MetricEntryMut::ConceptShift)
            }
            MetricCategory::SummaryStats => {
                let metric = SummaryStatsMetric::from_str(key).ok_or_else(|| self.unknown_key(category, key))?;
                self.summary_stats_metric(metric).map(MetricEntryMut::from)
            }
            MetricCategory::CustomMetric => self.custom_metric(key).map(MetricEntryMut::CustomMetric),
        }
    }
}

/// Read-only copy of a [`RuntimeConfiguration`].
#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeConfigSnapshot {
    config: RuntimeConfiguration,
}

impl Deref for RuntimeConfigSnapshot {
    type Target = RuntimeConfiguration;

    fn deref(&self) -> &RuntimeConfiguration {
        &self.config
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::monitoring::threshold::Threshold;
    use serde_json::json;

    fn support(enabled: bool) -> Value {
        json!({"enabled": enabled, "isSupported": true, "supportReason": null})
    }

    fn unsupported(reason: &str) -> Value {
        json!({"enabled": false, "isSupported": false, "supportReason": reason})
    }

    /// A `RuntimeConfigDetails` response covering every entry type.
    pub(crate) fn fixture() -> Value {
        json!({
            "dataChunking": [
                {"chunking": "MONTHLY", "enabled": true, "nrOfRows": null},
                {"chunking": "NUMBER_OF_ROWS", "enabled": false, "nrOfRows": 1000}
            ],
            "performanceTypes": [
                {"type": "CBPE", "enabled": true, "isSupported": true, "supportReason": null},
                {"type": "REALIZED", "enabled": true, "isSupported": true, "supportReason": null}
            ],
            "performanceMetrics": [
                {
                    "__typename": "PerformanceMetricConfig",
                    "metric": "ROC_AUC",
                    "lowerValueLimit": 0.0,
                    "upperValueLimit": 1.0,
                    "estimated": support(true),
                    "realized": support(true),
                    "threshold": {"__typename": "ConstantThreshold", "lower": 0.7, "upper": null},
                    "segmentThresholds": [
                        {"segment": {"id": 3}, "threshold": {
                            "__typename": "StandardDeviationThreshold",
                            "stdLowerMultiplier": 2.0,
                            "stdUpperMultiplier": 2.0
                        }}
                    ]
                },
                {
                    "__typename": "BusinessValueMetricConfig",
                    "metric": "BUSINESS_VALUE",
                    "lowerValueLimit": null,
                    "upperValueLimit": null,
                    "estimated": support(false),
                    "realized": support(false),
                    "threshold": null,
                    "segmentThresholds": [],
                    "truePositiveWeight": 2.0,
                    "falsePositiveWeight": -1.0,
                    "trueNegativeWeight": 0.0,
                    "falseNegativeWeight": -4.0,
                    "rules": [{
                        "trueClass": "CLASS",
                        "trueClassName": "fraud",
                        "predictedClass": "ANY",
                        "predictedClassName": null,
                        "weight": 1.5,
                        "isDefaultRule": false
                    }]
                }
            ],
            "univariateDriftMethods": [
                {
                    "__typename": "UnivariateDriftMethodConfig",
                    "method": "KOLMOGOROV_SMIRNOV",
                    "lowerValueLimit": null,
                    "upperValueLimit": null,
                    "threshold": null,
                    "segmentThresholds": [],
                    "categorical": support(false),
                    "continuous": support(false),
                    "targets": support(false),
                    "predictions": support(false),
                    "predictedProbabilities": support(false)
                },
                {
                    "__typename": "UnivariateDriftMethodConfig",
                    "method": "JENSEN_SHANNON",
                    "lowerValueLimit": 0.0,
                    "upperValueLimit": null,
                    "threshold": {"__typename": "ConstantThreshold", "lower": null, "upper": 0.1},
                    "segmentThresholds": [],
                    "categorical": support(true),
                    "continuous": support(true),
                    "targets": support(false),
                    "predictions": support(true),
                    "predictedProbabilities": unsupported("regression model")
                }
            ],
            "multivariateDriftMethods": [{
                "__typename": "MultivariateDriftMethodConfig",
                "method": "PCA_RECONSTRUCTION_ERROR",
                "lowerValueLimit": 0.0,
                "upperValueLimit": null,
                "threshold": null,
                "segmentThresholds": [],
                "enabled": false,
                "isSupported": true,
                "supportReason": null
            }],
            "dataQualityMetrics": [{
                "__typename": "DataQualityMetricConfig",
                "metric": "MISSING_VALUES",
                "normalize": true,
                "lowerValueLimit": 0.0,
                "upperValueLimit": null,
                "threshold": null,
                "segmentThresholds": [],
                "categorical": support(true),
                "continuous": support(true),
                "targets": support(false),
                "predictions": support(false),
                "predictedProbabilities": support(false)
            }],
            "conceptShiftMetrics": [{
                "__typename": "ConceptShiftMetricConfig",
                "metric": "MAGNITUDE",
                "lowerValueLimit": null,
                "upperValueLimit": null,
                "threshold": null,
                "segmentThresholds": [],
                "enabled": false,
                "isSupported": false,
                "supportReason": "no targets in analysis data"
            }],
            "summaryStatsMetrics": [
                {
                    "__typename": "SummaryStatsSimpleMetricConfig",
                    "metric": "ROWS_COUNT",
                    "lowerValueLimit": null,
                    "upperValueLimit": null,
                    "threshold": null,
                    "segmentThresholds": [],
                    "enabled": true
                },
                {
                    "__typename": "SummaryStatsColumnMetricConfig",
                    "metric": "SUMMARY_STATS_AVG",
                    "lowerValueLimit": null,
                    "upperValueLimit": null,
                    "threshold": null,
                    "segmentThresholds": [],
                    "categorical": {"enabled": false},
                    "continuous": {"enabled": true},
                    "targets": {"enabled": false},
                    "predictions": {"enabled": false},
                    "predictedProbabilities": {"enabled": false}
                }
            ],
            "customMetrics": [{
                "__typename": "CustomMetricConfig",
                "metric": {"id": "41", "name": "churn_cost", "description": "Cost of churned users"},
                "estimated": {"enabled": false},
                "realized": {"enabled": true},
                "threshold": null,
                "segmentThresholds": []
            }]
        })
    }

    pub(crate) fn config() -> RuntimeConfiguration {
        RuntimeConfiguration::from_value(fixture()).unwrap()
    }

    #[test]
    fn test_parses_every_category() {
        let rc = config();
        assert_eq!(rc.data_chunkings().len(), 2);
        assert_eq!(rc.performance_types().len(), 2);
        assert_eq!(rc.performance_metrics().len(), 2);
        assert_eq!(rc.univariate_drift_methods().len(), 2);
        assert_eq!(rc.multivariate_drift_methods().len(), 1);
        assert_eq!(rc.data_quality_metrics().len(), 1);
        assert_eq!(rc.concept_shift_metrics().len(), 1);
        assert_eq!(rc.summary_stats_metrics().len(), 2);
        assert_eq!(rc.custom_metrics().len(), 1);
    }

    #[test]
    fn test_lookup_returns_same_entry() {
        let mut rc = config();
        let first: *const UnivariateDriftConfig = match rc
            .lookup(MetricCategory::UnivariateDrift, "JENSEN_SHANNON")
            .unwrap()
        {
            MetricEntryMut::UnivariateDrift(c) => c,
            other => panic!("unexpected entry: {other:?}"),
        };
        let second: *const UnivariateDriftConfig = rc.univariate_drift_method(UnivariateDriftMethod::JensenShannon).unwrap();
        assert!(std::ptr::eq(first, second));
    }

    #[test]
    fn test_lookup_absent_or_unknown_key_is_not_found() {
        let mut rc = config();
        // known value, absent from this catalog
        assert!(matches!(
            rc.lookup(MetricCategory::UnivariateDrift, "HELLINGER"),
            Err(CoreError::NotFound(_))
        ));
        // not a value of the enum at all
        assert!(matches!(
            rc.lookup(MetricCategory::PerformanceMetric, "LOG_LOSS"),
            Err(CoreError::NotFound(_))
        ));
        assert!(matches!(
            rc.lookup(MetricCategory::CustomMetric, "does_not_exist"),
            Err(CoreError::NotFound(_))
        ));
        assert!(matches!(
            rc.performance_type(PerformanceType::Dle),
            Err(CoreError::NotFound(_))
        ));
    }

    #[test]
    fn test_mutation_through_lookup_is_visible() {
        let mut rc = config();
        {
            let mut entry = rc.lookup(MetricCategory::ConceptShift, "MAGNITUDE").unwrap();
            assert_eq!(entry.category(), MetricCategory::ConceptShift);
            assert!(entry.column_toggle().is_none());
            entry.toggle().unwrap().enable();
            entry.value_limited().unwrap().set_upper_value_limit(Some(10.0));
        }
        let magnitude = &rc.concept_shift_metrics()[0];
        assert!(magnitude.is_enabled());
        assert_eq!(magnitude.upper_value_limit(), Some(10.0));
        assert_eq!(magnitude.threshold(), Some(&Threshold::DEFAULT));
        // enabling an unsupported metric never flips the server's verdict
        assert!(!magnitude.support().is_supported());
        assert_eq!(
            magnitude.support().unsupported_reason(),
            Some("no targets in analysis data")
        );
    }

    #[test]
    fn test_custom_metric_has_no_value_limits() {
        let mut rc = config();
        let mut entry = rc.lookup(MetricCategory::CustomMetric, "churn_cost").unwrap();
        assert!(entry.value_limited().is_none());
        entry.estimation_toggle().unwrap().enable_estimated();
        assert_eq!(entry.thresholded().threshold(), Some(&Threshold::DEFAULT));
    }

    #[test]
    fn test_summary_stats_shapes_through_accessor() {
        let mut rc = config();
        let rows = rc
            .summary_stats_metric(SummaryStatsMetric::RowsCount)
            .unwrap()
            .into_simple()
            .unwrap();
        rows.disable();
        assert!(rc
            .summary_stats_metric(SummaryStatsMetric::SummaryStatsAvg)
            .unwrap()
            .into_simple()
            .is_err());
        let avg = rc
            .summary_stats_metric(SummaryStatsMetric::SummaryStatsAvg)
            .unwrap()
            .into_column()
            .unwrap();
        avg.enable_targets();
        assert_eq!(avg.threshold(), Some(&Threshold::DEFAULT));
    }

    #[test]
    fn test_unrecognized_summary_stats_is_invalid_state() {
        let mut value = fixture();
        value["summaryStatsMetrics"][0]["__typename"] = json!("SummaryStatsHistogramMetricConfig");
        let mut rc = RuntimeConfiguration::from_value(value).unwrap();
        assert!(matches!(
            rc.lookup(MetricCategory::SummaryStats, "ROWS_COUNT"),
            Err(CoreError::InvalidState(_))
        ));
    }

    #[test]
    fn test_snapshot_is_detached_copy() {
        let mut rc = config();
        let snapshot = rc.to_snapshot();
        rc.data_quality_metric(DataQualityMetric::MissingValues)
            .unwrap()
            .disable_normalization();
        assert!(snapshot.data_quality_metrics()[0].normalize());
        assert!(!rc.data_quality_metrics()[0].normalize());
        assert_ne!(*snapshot, rc);
    }

    #[test]
    fn test_from_value_rejects_malformed() {
        let err = RuntimeConfiguration::from_value(json!({"performanceMetrics": [{"metric": 42}]}))
            .unwrap_err();
        assert!(matches!(err, CoreError::Protocol(_)));

        let mut value = fixture();
        value["univariateDriftMethods"][0]["categorical"] = json!("yes");
        assert!(matches!(
            RuntimeConfiguration::from_value(value),
            Err(CoreError::Protocol(_))
        ));
    }

    #[test]
    fn test_unknown_method_is_set_aside() {
        let mut value = fixture();
        value["univariateDriftMethods"][1]["method"] = json!("WASSERSTEIN_V2");
        value["dataChunking"][1]["chunking"] = json!("FORTNIGHTLY");

        let mut rc = RuntimeConfiguration::from_value(value).unwrap();
        assert_eq!(rc.univariate_drift_methods().len(), 1);
        assert_eq!(rc.data_chunkings().len(), 1);

        let unknown = rc.unrecognized_entries();
        assert_eq!(unknown.len(), 2);
        assert_eq!(unknown[0].section(), "dataChunking");
        assert_eq!(unknown[0].key(), "FORTNIGHTLY");
        assert_eq!(unknown[1].section(), "univariateDriftMethods");
        assert_eq!(unknown[1].raw()["lowerValueLimit"], json!(0.0));

        // known entries stay editable
        rc.univariate_drift_method(UnivariateDriftMethod::KolmogorovSmirnov)
            .unwrap()
            .enable_categorical();

        assert!(matches!(
            rc.lookup(MetricCategory::UnivariateDrift, "wasserstein_v2"),
            Err(CoreError::InvalidState(_))
        ));
        assert!(matches!(
            rc.lookup(MetricCategory::DataQuality, "WASSERSTEIN_V2"),
            Err(CoreError::NotFound(_))
        ));
    }
}
