use std::fmt::Display;

use chrono::TimeDelta;
use fitbuddy_types::Session;

use crate::{
    helpers::{
        format_hm::FormatHM,
        time_math::{mean_deltas, round_float, std_dev_delta},
    },
    metrics::Pace,
};

#[derive(Debug, Default, PartialEq)]
pub struct CardioMetrics {
    pub count: u64,
    pub total_duration: TimeDelta,
    pub mean_duration: TimeDelta,
    pub duration_std: TimeDelta,
    pub total_calories: u64,
    pub total_distance_km: f64,
    /// Total time over total distance, counting only sessions with a distance.
    pub average_pace: Option<f64>,
}

impl CardioMetrics {
    pub fn new(sessions: &[Session]) -> Self {
        if sessions.is_empty() {
            return Self::default();
        }

        let count = sessions.len().try_into().unwrap_or(u64::MAX);
        let durations = sessions
            .iter()
            .map(|s| TimeDelta::minutes(i64::from(s.duration_minutes)))
            .collect::<Vec<_>>();
        let mean_duration = mean_deltas(&durations);

        let (distance_minutes, total_distance_km) = sessions
            .iter()
            .filter_map(|s| s.distance_km.filter(|d| *d > 0.0).map(|d| (s.duration_minutes, d)))
            .fold((0_u64, 0_f64), |(minutes, km), (m, d)| {
                (minutes + u64::from(m), km + d)
            });

        Self {
            count,
            duration_std: std_dev_delta(&durations, mean_duration),
            mean_duration,
            total_duration: durations.into_iter().sum(),
            total_calories: sessions.iter().map(|s| u64::from(s.calories_burned)).sum(),
            total_distance_km: round_float(total_distance_km),
            average_pace: (total_distance_km > 0.0)
                .then(|| distance_minutes as f64 / total_distance_km),
        }
    }
}

impl Display for CardioMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!(
            "Sessions: {}\nDuration: {}\nMean duration: {}\nDuration std: {}\nCalories: {} kcal\nDistance: {:.2} km",
            self.count,
            self.total_duration.format_hm(),
            self.mean_duration.format_hm(),
            self.duration_std.format_hm(),
            self.total_calories,
            self.total_distance_km,
        ))?;
        match self.average_pace {
            Some(pace) => write!(f, "\nAverage pace: {} /km", Pace(pace)),
            None => write!(f, "\nAverage pace: -"),
        }
    }
}
