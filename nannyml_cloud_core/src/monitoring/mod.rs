//! Monitoring runtime configuration.
//!
//! # Example
//!
//! ```ignore
//! use nannyml_cloud_core::monitoring::{ColumnToggle, UnivariateDriftMethod};
//!
//! let mut rc = client.runtime_config().fetch_current(42).await?;
//! rc.univariate_drift_method(UnivariateDriftMethod::KolmogorovSmirnov)?
//!     .enable_categorical();
//! client.runtime_config().persist(42, &rc).await?;
//! ```

pub mod capabilities;
pub mod convert;
pub mod enums;
pub mod metrics;
pub mod runtime_config;
pub mod support;
pub mod threshold;

pub use capabilities::{
    ColumnFacet, ColumnToggle, EstimationToggle, Thresholded, Toggle, ValueLimited,
};
pub use convert::to_input;
pub use enums::{
    Chunking, ClassificationRuleType, ColumnType, ConceptShiftMetric, DataQualityMetric,
    MultivariateDriftMethod, PerformanceMetric, PerformanceType, ProblemType, SummaryStatsMetric,
    ThresholdType, UnivariateDriftMethod,
};
pub use metrics::{
    BusinessValue, BusinessValueRule, ChunkingConfig, ColumnFacets, ConceptShiftConfig,
    CustomMetricConfig, CustomMetricSummary, DataQualityConfig, MetricCommon,
    MultivariateDriftConfig, PerformanceMetricConfig, PerformanceTypeConfig,
    SummaryStatsColumnConfig, SummaryStatsConfig, SummaryStatsSimpleConfig,
    UnivariateDriftConfig, UnrecognizedSummaryStats,
};
pub use runtime_config::{
    MetricCategory, MetricEntryMut, RuntimeConfigSnapshot, RuntimeConfiguration, SummaryStatsMut,
    UnrecognizedEntry,
};
pub use support::SupportState;
pub use threshold::{SegmentThreshold, Threshold, ThresholdParts};
