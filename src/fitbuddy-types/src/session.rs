use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{ActivityType, IntensityLevel, SessionError};

pub const MIN_DURATION_MINUTES: u32 = 5;

/// The values every derived metric is computed from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionInput {
    pub activity_type: ActivityType,
    pub duration_minutes: u32,
    pub intensity_level: IntensityLevel,
    pub distance_km: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DerivedMetrics {
    pub calories_burned: u32,
    pub pace_min_per_km: Option<f64>,
}

/// A logged cardio session.
///
/// `calories_burned` and `pace_min_per_km` are derived from the other
/// fields and have to be recomputed whenever those change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub activity_type: ActivityType,
    pub session_date: NaiveDate,
    pub duration_minutes: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
    pub intensity_level: IntensityLevel,
    pub calories_burned: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pace_min_per_km: Option<f64>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl SessionInput {
    pub fn new(
        activity_type: ActivityType,
        intensity_level: IntensityLevel,
        duration_minutes: u32,
        distance_km: Option<f64>,
    ) -> Self {
        Self {
            activity_type,
            duration_minutes,
            intensity_level,
            distance_km,
        }
    }

    pub fn validate(&self) -> Result<(), SessionError> {
        if self.duration_minutes < MIN_DURATION_MINUTES {
            return Err(SessionError::DurationTooShort(self.duration_minutes));
        }

        match self.distance_km {
            Some(distance) if !distance.is_finite() || distance < 0.0 => {
                Err(SessionError::InvalidDistance(distance))
            }
            _ => Ok(()),
        }
    }
}

impl Session {
    pub fn from_parts(
        session_date: NaiveDate,
        input: SessionInput,
        metrics: DerivedMetrics,
        location: Option<String>,
        notes: Option<String>,
    ) -> Self {
        Self {
            activity_type: input.activity_type,
            session_date,
            duration_minutes: input.duration_minutes,
            distance_km: input.distance_km,
            intensity_level: input.intensity_level,
            calories_burned: metrics.calories_burned,
            pace_min_per_km: metrics.pace_min_per_km,
            location,
            notes,
        }
    }

    pub fn input(&self) -> SessionInput {
        SessionInput {
            activity_type: self.activity_type,
            duration_minutes: self.duration_minutes,
            intensity_level: self.intensity_level,
            distance_km: self.distance_km,
        }
    }

    pub fn metrics(&self) -> DerivedMetrics {
        DerivedMetrics {
            calories_burned: self.calories_burned,
            pace_min_per_km: self.pace_min_per_km,
        }
    }

    pub fn set_metrics(&mut self, metrics: DerivedMetrics) {
        self.calories_burned = metrics.calories_burned;
        self.pace_min_per_km = metrics.pace_min_per_km;
    }
}
