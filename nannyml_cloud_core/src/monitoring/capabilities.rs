//! Mutation capabilities of runtime configuration entries.
//!
//! Each config type implements only the traits that make sense for it. The
//! `&mut` borrow handed out by [`RuntimeConfiguration`](super::RuntimeConfiguration)
//! is the builder: every call writes straight into the aggregate.
//!
//! Enabling anything applies [`Threshold::DEFAULT`] when no threshold is set.
//! Disabling never touches the threshold.

use std::fmt;
use std::str::FromStr;

use super::support::SupportState;
use super::threshold::{SegmentThreshold, Threshold};
use crate::errors::CoreError;

/// Entries that carry an alert threshold and segment overrides.
pub trait Thresholded {
    fn threshold(&self) -> Option<&Threshold>;

    fn segment_thresholds(&self) -> &[SegmentThreshold];

    /// Replace the threshold in place.
    fn set_threshold(&mut self, threshold: Threshold);

    /// Set `StandardDeviation{3, 3}` unless a threshold is already configured.
    fn apply_default_threshold(&mut self) {
        if self.threshold().is_none() {
            self.set_threshold(Threshold::DEFAULT);
        }
    }
}

/// Entries with optional value limits.
///
/// Limits are reported by the server but not part of the mutation input, so
/// edits here are visible locally only.
pub trait ValueLimited {
    fn lower_value_limit(&self) -> Option<f64>;
    fn upper_value_limit(&self) -> Option<f64>;
    fn set_lower_value_limit(&mut self, value: Option<f64>);
    fn set_upper_value_limit(&mut self, value: Option<f64>);
}

/// Entries with a single enable flag.
pub trait Toggle: Thresholded {
    fn support(&self) -> &SupportState;

    fn enable(&mut self);

    fn disable(&mut self);

    fn is_enabled(&self) -> bool {
        self.support().enabled()
    }
}

/// Entries with estimated and realized variants.
pub trait EstimationToggle: Thresholded {
    fn estimated(&self) -> &SupportState;
    fn realized(&self) -> &SupportState;
    fn enable_estimated(&mut self);
    fn disable_estimated(&mut self);
    fn enable_realized(&mut self);
    fn disable_realized(&mut self);
}

/// The five column kinds a column-level metric can be enabled for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnFacet {
    Categorical,
    Continuous,
    Targets,
    Predictions,
    PredictedProbabilities,
}

impl ColumnFacet {
    pub const ALL: [ColumnFacet; 5] = [
        ColumnFacet::Categorical,
        ColumnFacet::Continuous,
        ColumnFacet::Targets,
        ColumnFacet::Predictions,
        ColumnFacet::PredictedProbabilities,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnFacet::Categorical => "categorical",
            ColumnFacet::Continuous => "continuous",
            ColumnFacet::Targets => "targets",
            ColumnFacet::Predictions => "predictions",
            ColumnFacet::PredictedProbabilities => "predictedProbabilities",
        }
    }
}

impl fmt::Display for ColumnFacet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColumnFacet {
    type Err = CoreError;

    /// Accepts the camelCase wire name or its snake_case spelling.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "categorical" => Ok(ColumnFacet::Categorical),
            "continuous" => Ok(ColumnFacet::Continuous),
            "targets" => Ok(ColumnFacet::Targets),
            "predictions" => Ok(ColumnFacet::Predictions),
            "predictedProbabilities" | "predicted_probabilities" => {
                Ok(ColumnFacet::PredictedProbabilities)
            }
            other => Err(CoreError::invalid_argument(format!(
                "unknown column facet {:?}; expected one of categorical, continuous, targets, predictions, predictedProbabilities",
                other
            ))),
        }
    }
}

/// Entries enabled per column facet.
pub trait ColumnToggle: Thresholded {
    fn facet(&self, facet: ColumnFacet) -> &SupportState;

    fn enable_facet(&mut self, facet: ColumnFacet);

    fn disable_facet(&mut self, facet: ColumnFacet);

    /// Enable a facet by name; unknown names fail with `InvalidArgument`.
    fn enable_facet_named(&mut self, name: &str) -> Result<(), CoreError> {
        let facet: ColumnFacet = name.parse()?;
        self.enable_facet(facet);
        Ok(())
    }

    fn disable_facet_named(&mut self, name: &str) -> Result<(), CoreError> {
        let facet: ColumnFacet = name.parse()?;
        self.disable_facet(facet);
        Ok(())
    }

    fn enable_categorical(&mut self) {
        self.enable_facet(ColumnFacet::Categorical)
    }

    fn disable_categorical(&mut self) {
        self.disable_facet(ColumnFacet::Categorical)
    }

    fn enable_continuous(&mut self) {
        self.enable_facet(ColumnFacet::Continuous)
    }

    fn disable_continuous(&mut self) {
        self.disable_facet(ColumnFacet::Continuous)
    }

    fn enable_targets(&mut self) {
        self.enable_facet(ColumnFacet::Targets)
    }

    fn disable_targets(&mut self) {
        self.disable_facet(ColumnFacet::Targets)
    }

    fn enable_predictions(&mut self) {
        self.enable_facet(ColumnFacet::Predictions)
    }

    fn disable_predictions(&mut self) {
        self.disable_facet(ColumnFacet::Predictions)
    }

    fn enable_predicted_probabilities(&mut self) {
        self.enable_facet(ColumnFacet::PredictedProbabilities)
    }

    fn disable_predicted_probabilities(&mut self) {
        self.disable_facet(ColumnFacet::PredictedProbabilities)
    }
}
