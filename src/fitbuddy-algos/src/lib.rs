pub(crate) mod metrics;
pub use metrics::{DEFAULT_MET, MetTable, MetricCalculator, Pace, pace_min_per_km};

pub(crate) mod sampling;
pub use sampling::{SamplingError, WeightedTable};

pub(crate) mod generator;
pub use generator::{
    DayProbabilities, DistanceProfile, GeneratorConfig, GeneratorError, SessionGenerator,
    SpeedTable,
};

pub(crate) mod aggregate;
pub use aggregate::{
    Aggregation, BreakdownMetric, PACE_TREND_WINDOW, PacePoint, Reduction, TypeBucket,
    WeeklyBucket, aggregate, breakdown_by_activity, moving_average_pace, weekly_totals,
};

pub(crate) mod summary;
pub use summary::CardioMetrics;

pub mod helpers;
