use std::{collections::HashMap, fmt::Display};

use chrono::NaiveDate;
use fitbuddy_types::{ActivityType, DerivedMetrics, IntensityLevel, Session, SessionInput};

/// MET used when an (activity, intensity) pair has no table entry.
pub const DEFAULT_MET: f64 = 8.0;

/// Minutes per kilometre. `None` unless both distance and duration are positive.
pub fn pace_min_per_km(duration_minutes: u32, distance_km: Option<f64>) -> Option<f64> {
    let distance = distance_km.filter(|d| d.is_finite() && *d > 0.0)?;
    if duration_minutes == 0 {
        return None;
    }
    Some(f64::from(duration_minutes) / distance)
}

/// Pace rendered as `m:ss`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pace(pub f64);

impl Pace {
    pub fn minutes_seconds(self) -> (u64, u64) {
        let minutes = self.0.trunc();
        let seconds = ((self.0 - minutes) * 60.0).round() as u64;
        let minutes = minutes as u64;
        if seconds >= 60 {
            (minutes + 1, seconds - 60)
        } else {
            (minutes, seconds)
        }
    }
}

impl Display for Pace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (minutes, seconds) = self.minutes_seconds();
        write!(f, "{}:{:02}", minutes, seconds)
    }
}

/// MET values per activity and intensity.
#[derive(Debug, Clone)]
pub struct MetTable {
    values: HashMap<(ActivityType, IntensityLevel), f64>,
}

impl MetTable {
    pub fn new<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = ((ActivityType, IntensityLevel), f64)>,
    {
        Self {
            values: entries.into_iter().collect(),
        }
    }

    pub fn get(&self, activity: ActivityType, intensity: IntensityLevel) -> f64 {
        self.values
            .get(&(activity, intensity))
            .copied()
            .unwrap_or(DEFAULT_MET)
    }
}

impl Default for MetTable {
    fn default() -> Self {
        use ActivityType::*;
        use IntensityLevel::*;

        const ROWS: [(ActivityType, [f64; 4]); 8] = [
            (Running, [7.0, 9.8, 11.5, 14.5]),
            (Cycling, [4.0, 6.8, 10.0, 12.0]),
            (Walking, [2.5, 3.5, 4.3, 5.0]),
            (Swimming, [5.8, 7.0, 9.8, 11.0]),
            (Rowing, [4.8, 7.0, 8.5, 12.0]),
            (Elliptical, [4.6, 5.0, 5.7, 7.5]),
            (Hiking, [5.3, 6.0, 7.8, 9.0]),
            (StairClimbing, [4.0, 6.8, 8.8, 9.5]),
        ];

        Self::new(ROWS.into_iter().flat_map(|(activity, mets)| {
            [Low, Moderate, High, VeryHigh]
                .into_iter()
                .zip(mets)
                .map(move |(intensity, met)| ((activity, intensity), met))
        }))
    }
}

/// Derives calories and pace for a session.
///
/// Calories follow `MET x body weight (kg) x hours`. Running sessions with
/// a usable distance take their MET from the average speed instead of the
/// intensity table.
#[derive(Debug, Clone)]
pub struct MetricCalculator {
    pub met_table: MetTable,
    pub body_weight_kg: f64,
}

impl Default for MetricCalculator {
    fn default() -> Self {
        Self {
            met_table: MetTable::default(),
            body_weight_kg: Self::DEFAULT_BODY_WEIGHT_KG,
        }
    }
}

impl MetricCalculator {
    pub const DEFAULT_BODY_WEIGHT_KG: f64 = 70.0;

    /// Upper speed edge (km/h, inclusive) and MET for running.
    const RUNNING_SPEED_BANDS: [(f64, f64); 7] = [
        (8.0, 6.0),
        (9.0, 8.3),
        (10.0, 9.8),
        (11.0, 10.5),
        (12.0, 11.5),
        (13.0, 12.5),
        (14.0, 13.5),
    ];
    const RUNNING_TOP_MET: f64 = 14.5;

    pub fn new(met_table: MetTable, body_weight_kg: f64) -> Self {
        Self {
            met_table,
            body_weight_kg,
        }
    }

    pub fn met_value(&self, input: &SessionInput) -> f64 {
        if input.activity_type == ActivityType::Running {
            if let Some(speed) = Self::average_speed_kmh(input) {
                return Self::running_met(speed);
            }
        }

        self.met_table
            .get(input.activity_type, input.intensity_level)
    }

    pub fn calories_burned(&self, input: &SessionInput) -> u32 {
        let hours = f64::from(input.duration_minutes) / 60.0;
        let kcal = self.met_value(input) * self.body_weight_kg * hours;
        kcal.max(0.0).round() as u32
    }

    pub fn derive(&self, input: &SessionInput) -> DerivedMetrics {
        DerivedMetrics {
            calories_burned: self.calories_burned(input),
            pace_min_per_km: pace_min_per_km(input.duration_minutes, input.distance_km),
        }
    }

    /// Refreshes the derived fields after any of the inputs changed.
    pub fn recompute(&self, session: &mut Session) {
        session.set_metrics(self.derive(&session.input()));
    }

    pub fn build_session(
        &self,
        session_date: NaiveDate,
        input: SessionInput,
        location: Option<String>,
        notes: Option<String>,
    ) -> Session {
        Session::from_parts(session_date, input, self.derive(&input), location, notes)
    }

    fn average_speed_kmh(input: &SessionInput) -> Option<f64> {
        let distance = input.distance_km.filter(|d| d.is_finite() && *d > 0.0)?;
        if input.duration_minutes == 0 {
            return None;
        }
        Some(distance * 60.0 / f64::from(input.duration_minutes))
    }

    fn running_met(speed_kmh: f64) -> f64 {
        Self::RUNNING_SPEED_BANDS
            .iter()
            .find(|(max_speed, _)| speed_kmh <= *max_speed)
            .map_or(Self::RUNNING_TOP_MET, |(_, met)| *met)
    }
}
