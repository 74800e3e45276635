//! Closed value sets of the monitoring schema.
//!
//! Every enum serializes to the server's SCREAMING_SNAKE_CASE name and parses
//! back case-insensitively.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! schema_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $($variant:ident => $wire:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $wire)]
                $variant,
            )+
        }

        impl $name {
            /// Every value, in schema order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Parse from the wire name (case-insensitive).
            #[allow(clippy::should_implement_trait)]
            pub fn from_str(s: &str) -> Option<Self> {
                match s.trim().to_ascii_uppercase().as_str() {
                    $($wire => Some(Self::$variant),)+
                    _ => None,
                }
            }

            /// Convert to the wire name.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $wire,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

schema_enum! {
    /// Chunk granularity for monitoring results.
    pub enum Chunking {
        Yearly => "YEARLY",
        Quarterly => "QUARTERLY",
        Monthly => "MONTHLY",
        Weekly => "WEEKLY",
        Daily => "DAILY",
        Hourly => "HOURLY",
        NumberOfRows => "NUMBER_OF_ROWS",
    }
}

schema_enum! {
    /// Performance estimator families.
    pub enum PerformanceType {
        Cbpe => "CBPE",
        Mcbpe => "MCBPE",
        Dle => "DLE",
        Realized => "REALIZED",
    }
}

schema_enum! {
    pub enum PerformanceMetric {
        RocAuc => "ROC_AUC",
        F1 => "F1",
        Precision => "PRECISION",
        Recall => "RECALL",
        Specificity => "SPECIFICITY",
        Accuracy => "ACCURACY",
        ConfusionMatrix => "CONFUSION_MATRIX",
        BusinessValue => "BUSINESS_VALUE",
        Mae => "MAE",
        Mape => "MAPE",
        Mse => "MSE",
        Rmse => "RMSE",
        Msle => "MSLE",
        Rmsle => "RMSLE",
    }
}

schema_enum! {
    pub enum UnivariateDriftMethod {
        KolmogorovSmirnov => "KOLMOGOROV_SMIRNOV",
        JensenShannon => "JENSEN_SHANNON",
        Wasserstein => "WASSERSTEIN",
        Hellinger => "HELLINGER",
        LInfinity => "L_INFINITY",
        Chi2 => "CHI2",
    }
}

schema_enum! {
    pub enum MultivariateDriftMethod {
        PcaReconstructionError => "PCA_RECONSTRUCTION_ERROR",
        DomainClassifierAuroc => "DOMAIN_CLASSIFIER_AUROC",
    }
}

schema_enum! {
    pub enum DataQualityMetric {
        MissingValues => "MISSING_VALUES",
        UnseenValues => "UNSEEN_VALUES",
    }
}

schema_enum! {
    pub enum ConceptShiftMetric {
        RocAuc => "ROC_AUC",
        F1 => "F1",
        AveragePrecision => "AVERAGE_PRECISION",
        Precision => "PRECISION",
        Recall => "RECALL",
        Specificity => "SPECIFICITY",
        Accuracy => "ACCURACY",
        Magnitude => "MAGNITUDE",
    }
}

schema_enum! {
    pub enum SummaryStatsMetric {
        RowsCount => "ROWS_COUNT",
        SummaryStatsAvg => "SUMMARY_STATS_AVG",
        SummaryStatsMedian => "SUMMARY_STATS_MEDIAN",
        SummaryStatsStd => "SUMMARY_STATS_STD",
        SummaryStatsSum => "SUMMARY_STATS_SUM",
    }
}

schema_enum! {
    /// Class selector of a business-value rule.
    pub enum ClassificationRuleType {
        Any => "ANY",
        Equals => "EQUALS",
        NotEquals => "NOT_EQUALS",
        Class => "CLASS",
    }
}

schema_enum! {
    pub enum ProblemType {
        BinaryClassification => "BINARY_CLASSIFICATION",
        MulticlassClassification => "MULTICLASS_CLASSIFICATION",
        Regression => "REGRESSION",
    }
}

schema_enum! {
    /// Role of a column in a model schema.
    pub enum ColumnType {
        Target => "TARGET",
        PredictionScore => "PREDICTION_SCORE",
        Prediction => "PREDICTION",
        Timestamp => "TIMESTAMP",
        CategoricalFeature => "CATEGORICAL_FEATURE",
        ContinuousFeature => "CONTINUOUS_FEATURE",
        Ignored => "IGNORED",
        Identifier => "IDENTIFIER",
    }
}

schema_enum! {
    pub enum ThresholdType {
        Constant => "CONSTANT",
        StandardDeviation => "STANDARD_DEVIATION",
    }
}
