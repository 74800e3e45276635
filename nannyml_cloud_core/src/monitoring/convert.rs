//! Conversion of a [`RuntimeConfiguration`] into the mutation input.
//!
//! Support facts are dropped: only `enabled` flags go back to the server.

use nannyml_cloud_core_types::{
    BusinessValueInput, BusinessValueRuleInput, ChunkingInput, ColumnFlagsInput,
    ConceptShiftMetricInput, ConstantThresholdInput, CustomMetricInput, DataQualityMetricInput,
    EditRuntimeConfigInput, MetricInputCommon, MultivariateDriftMethodInput,
    PerformanceMetricInput, PerformanceTypeInput, SegmentThresholdInput,
    StandardDeviationThresholdInput, SummaryStatsColumnInput, SummaryStatsMetricInput,
    SummaryStatsSimpleInput, ThresholdInput, UnivariateDriftMethodInput,
};

use super::capabilities::{ColumnFacet, EstimationToggle, Toggle};
use super::metrics::{
    BusinessValue, ChunkingConfig, ColumnFacets, ConceptShiftConfig, CustomMetricConfig,
    DataQualityConfig, MetricCommon, MultivariateDriftConfig, PerformanceMetricConfig,
    PerformanceTypeConfig, SummaryStatsConfig, UnivariateDriftConfig,
};
use super::runtime_config::RuntimeConfiguration;
use super::threshold::{SegmentThreshold, Threshold};
use crate::errors::{CoreError, CoreResult};

/// Map the whole aggregate to `EditRuntimeConfigInput`.
///
/// Fails with `InvalidState` for summary statistics of an unrecognized shape
/// and for entries whose key the client does not know.
pub fn to_input(config: &RuntimeConfiguration) -> CoreResult<EditRuntimeConfigInput> {
    if let Some(entry) = config.unrecognized_entries().first() {
        return Err(CoreError::invalid_state(format!(
            "{} entry {} is not known to this client and cannot be persisted",
            entry.section(),
            entry.key()
        )));
    }
    Ok(EditRuntimeConfigInput {
        data_chunking: config.data_chunkings().iter().map(chunking_input).collect(),
        performance_types: config
            .performance_types()
            .iter()
            .map(performance_type_input)
            .collect(),
        performance_metrics: config
            .performance_metrics()
            .iter()
            .map(performance_metric_input)
            .collect(),
        univariate_drift_methods: config
            .univariate_drift_methods()
            .iter()
            .map(univariate_drift_input)
            .collect(),
        multivariate_drift_methods: config
            .multivariate_drift_methods()
            .iter()
            .map(multivariate_drift_input)
            .collect(),
        data_quality_metrics: config
            .data_quality_metrics()
            .iter()
            .map(data_quality_input)
            .collect(),
        concept_shift_metrics: config
            .concept_shift_metrics()
            .iter()
            .map(concept_shift_input)
            .collect(),
        summary_stats_metrics: config
            .summary_stats_metrics()
            .iter()
            .map(summary_stats_input)
            .collect::<CoreResult<Vec<_>>>()?,
        custom_metrics: config.custom_metrics().iter().map(custom_metric_input).collect(),
    })
}

pub fn threshold_input(threshold: &Threshold) -> ThresholdInput {
    match *threshold {
        Threshold::Constant { lower, upper } => {
            ThresholdInput::Constant(ConstantThresholdInput { lower, upper })
        }
        Threshold::StandardDeviation {
            lower_multiplier,
            upper_multiplier,
        } => ThresholdInput::StandardDeviation(StandardDeviationThresholdInput {
            std_lower_multiplier: lower_multiplier,
            std_upper_multiplier: upper_multiplier,
        }),
    }
}

fn segment_threshold_input(segment: &SegmentThreshold) -> SegmentThresholdInput {
    SegmentThresholdInput {
        segment_id: segment.segment_id.clone(),
        threshold: segment.threshold.as_ref().map(threshold_input),
    }
}

fn common_input(common: &MetricCommon) -> MetricInputCommon {
    MetricInputCommon {
        threshold: common.threshold().map(threshold_input),
        segment_thresholds: common
            .segment_thresholds()
            .iter()
            .map(segment_threshold_input)
            .collect(),
    }
}

fn column_flags(facets: &ColumnFacets) -> ColumnFlagsInput {
    ColumnFlagsInput {
        enabled_categorical: facets.get(ColumnFacet::Categorical).enabled(),
        enabled_continuous: facets.get(ColumnFacet::Continuous).enabled(),
        enabled_targets: facets.get(ColumnFacet::Targets).enabled(),
        enabled_predictions: facets.get(ColumnFacet::Predictions).enabled(),
        enabled_predicted_probabilities: facets.get(ColumnFacet::PredictedProbabilities).enabled(),
    }
}

fn chunking_input(config: &ChunkingConfig) -> ChunkingInput {
    ChunkingInput {
        chunking: config.chunking().as_str().to_string(),
        nr_of_rows: config.nr_of_rows(),
        enabled: config.enabled(),
    }
}

fn performance_type_input(config: &PerformanceTypeConfig) -> PerformanceTypeInput {
    PerformanceTypeInput {
        performance_type: config.performance_type().as_str().to_string(),
        enabled: config.is_enabled(),
    }
}

fn business_value_input(business_value: &BusinessValue) -> BusinessValueInput {
    BusinessValueInput {
        true_positive_weight: business_value.true_positive_weight,
        false_positive_weight: business_value.false_positive_weight,
        true_negative_weight: business_value.true_negative_weight,
        false_negative_weight: business_value.false_negative_weight,
        rules: business_value
            .rules
            .iter()
            .map(|rule| BusinessValueRuleInput {
                true_class: rule.true_class.as_str().to_string(),
                true_class_name: rule.true_class_name.clone(),
                predicted_class: rule.predicted_class.as_str().to_string(),
                predicted_class_name: rule.predicted_class_name.clone(),
                weight: rule.weight,
                is_default_rule: rule.is_default_rule,
            })
            .collect(),
    }
}

fn performance_metric_input(config: &PerformanceMetricConfig) -> PerformanceMetricInput {
    PerformanceMetricInput {
        metric: config.metric().as_str().to_string(),
        enabled_estimated: config.estimated().enabled(),
        enabled_realized: config.realized().enabled(),
        business_value: config.business_value().map(business_value_input),
        common: common_input(config.common()),
    }
}

fn univariate_drift_input(config: &UnivariateDriftConfig) -> UnivariateDriftMethodInput {
    UnivariateDriftMethodInput {
        method: config.method().as_str().to_string(),
        flags: column_flags(config.facets()),
        common: common_input(config.common()),
    }
}

fn multivariate_drift_input(config: &MultivariateDriftConfig) -> MultivariateDriftMethodInput {
    MultivariateDriftMethodInput {
        method: config.method().as_str().to_string(),
        enabled: config.is_enabled(),
        common: common_input(config.common()),
    }
}

fn data_quality_input(config: &DataQualityConfig) -> DataQualityMetricInput {
    DataQualityMetricInput {
        metric: config.metric().as_str().to_string(),
        normalize: config.normalize(),
        flags: column_flags(config.facets()),
        common: common_input(config.common()),
    }
}

fn concept_shift_input(config: &ConceptShiftConfig) -> ConceptShiftMetricInput {
    ConceptShiftMetricInput {
        metric: config.metric().as_str().to_string(),
        enabled: config.is_enabled(),
        common: common_input(config.common()),
    }
}

fn summary_stats_input(config: &SummaryStatsConfig) -> CoreResult<SummaryStatsMetricInput> {
    match config {
        SummaryStatsConfig::Simple(simple) => {
            Ok(SummaryStatsMetricInput::Simple(SummaryStatsSimpleInput {
                metric: simple.metric().as_str().to_string(),
                enabled: simple.is_enabled(),
                common: common_input(simple.common()),
            }))
        }
        SummaryStatsConfig::Column(column) => {
            Ok(SummaryStatsMetricInput::Column(SummaryStatsColumnInput {
                metric: column.metric().as_str().to_string(),
                flags: column_flags(column.facets()),
                common: common_input(column.common()),
            }))
        }
        SummaryStatsConfig::Unrecognized(unknown) => Err(CoreError::invalid_state(format!(
            "cannot convert summary stats metric {}: unrecognized type {:?}",
            unknown.metric(),
            unknown.typename()
        ))),
    }
}

fn custom_metric_input(config: &CustomMetricConfig) -> CustomMetricInput {
    CustomMetricInput {
        metric_id: config.metric().id.clone(),
        enabled_estimated: config.estimated().enabled(),
        enabled_realized: config.realized().enabled(),
        common: common_input(config.common()),
    }
}
