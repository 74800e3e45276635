//! Alert thresholds and per-segment overrides.

use serde::{Deserialize, Deserializer, Serialize};

use super::enums::ThresholdType;
use crate::errors::{CoreError, CoreResult};

/// Multiplier applied on both sides when a metric is enabled without a threshold.
pub const DEFAULT_STD_MULTIPLIER: f64 = 3.0;

/// Alert threshold of a metric.
///
/// Deserializes from the query shape, which is tagged by `__typename`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "__typename")]
pub enum Threshold {
    /// Fixed bounds. At least one side is set.
    #[serde(rename = "ConstantThreshold")]
    Constant {
        #[serde(default)]
        lower: Option<f64>,
        #[serde(default)]
        upper: Option<f64>,
    },
    /// Bounds derived from the reference period's standard deviation.
    #[serde(rename = "StandardDeviationThreshold")]
    StandardDeviation {
        #[serde(rename = "stdLowerMultiplier")]
        lower_multiplier: f64,
        #[serde(rename = "stdUpperMultiplier")]
        upper_multiplier: f64,
    },
}

/// Loose threshold arguments, validated by [`Threshold::from_parts`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ThresholdParts {
    pub lower: Option<f64>,
    pub upper: Option<f64>,
    pub std_lower_multiplier: Option<f64>,
    pub std_upper_multiplier: Option<f64>,
}

impl Threshold {
    /// `StandardDeviation{3, 3}`.
    pub const DEFAULT: Threshold = Threshold::StandardDeviation {
        lower_multiplier: DEFAULT_STD_MULTIPLIER,
        upper_multiplier: DEFAULT_STD_MULTIPLIER,
    };

    /// Build a threshold for `mode` from whichever parts are given.
    ///
    /// CONSTANT needs at least one of `lower`/`upper`; STANDARD_DEVIATION
    /// needs both multipliers. Parts belonging to the other mode are ignored.
    pub fn from_parts(mode: ThresholdType, parts: ThresholdParts) -> CoreResult<Self> {
        match mode {
            ThresholdType::Constant => Self::constant(parts.lower, parts.upper),
            ThresholdType::StandardDeviation => {
                match (parts.std_lower_multiplier, parts.std_upper_multiplier) {
                    (Some(lower), Some(upper)) => Ok(Self::standard_deviation(lower, upper)),
                    _ => Err(CoreError::invalid_argument(
                        "STANDARD_DEVIATION threshold requires both std_lower_multiplier and std_upper_multiplier",
                    )),
                }
            }
        }
    }

    /// Constant bounds; fails when both sides are missing.
    pub fn constant(lower: Option<f64>, upper: Option<f64>) -> CoreResult<Self> {
        if lower.is_none() && upper.is_none() {
            return Err(CoreError::invalid_argument(
                "CONSTANT threshold requires a lower or an upper bound",
            ));
        }
        Ok(Threshold::Constant { lower, upper })
    }

    pub fn standard_deviation(lower_multiplier: f64, upper_multiplier: f64) -> Self {
        Threshold::StandardDeviation {
            lower_multiplier,
            upper_multiplier,
        }
    }

    pub fn threshold_type(&self) -> ThresholdType {
        match self {
            Threshold::Constant { .. } => ThresholdType::Constant,
            Threshold::StandardDeviation { .. } => ThresholdType::StandardDeviation,
        }
    }
}

/// Threshold override for one segment of the data.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RawSegmentThreshold")]
pub struct SegmentThreshold {
    pub segment_id: String,
    pub threshold: Option<Threshold>,
}

#[derive(Deserialize)]
struct RawSegmentThreshold {
    segment: RawSegment,
    #[serde(default)]
    threshold: Option<Threshold>,
}

#[derive(Deserialize)]
struct RawSegment {
    #[serde(deserialize_with = "deserialize_id")]
    id: String,
}

impl From<RawSegmentThreshold> for SegmentThreshold {
    fn from(raw: RawSegmentThreshold) -> Self {
        SegmentThreshold {
            segment_id: raw.segment.id,
            threshold: raw.threshold,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum IdRepr {
    Text(String),
    Number(i64),
}

/// Ids arrive as strings or integers depending on the server version.
pub(crate) fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match IdRepr::deserialize(deserializer)? {
        IdRepr::Text(id) => id,
        IdRepr::Number(id) => id.to_string(),
    })
}
