use std::{collections::BTreeMap, fmt::Display};

use chrono::NaiveDate;
use fitbuddy_types::{ActivityType, Session};
use strum::{Display as StrumDisplay, EnumString};

use crate::{
    helpers::time_math::{moving_average, week_start},
    metrics::Pace,
};

/// Window cap for the pace trend.
pub const PACE_TREND_WINDOW: usize = 7;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
struct Totals {
    session_count: u32,
    total_calories: u64,
    total_duration_minutes: u64,
    total_distance_km: f64,
}

impl Totals {
    fn add(&mut self, session: &Session) {
        self.session_count += 1;
        self.total_calories += u64::from(session.calories_burned);
        self.total_duration_minutes += u64::from(session.duration_minutes);
        self.total_distance_km += session.distance_km.unwrap_or_default();
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeeklyBucket {
    pub week_start: NaiveDate,
    pub session_count: u32,
    pub total_calories: u64,
    pub total_duration_minutes: u64,
    pub total_distance_km: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TypeBucket {
    pub activity_type: ActivityType,
    pub session_count: u32,
    pub total_calories: u64,
    pub total_duration_minutes: u64,
    pub total_distance_km: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PacePoint {
    pub session_date: NaiveDate,
    pub pace_min_per_km: f64,
    pub moving_average: f64,
}

/// Which total orders the activity breakdown.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, EnumString, StrumDisplay)]
#[strum(serialize_all = "snake_case")]
pub enum BreakdownMetric {
    #[default]
    Calories,
    Duration,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Reduction {
    Weekly,
    MovingAveragePace,
    ByActivityType(BreakdownMetric),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Aggregation {
    Weekly(Vec<WeeklyBucket>),
    PaceTrend(Vec<PacePoint>),
    ByActivityType(Vec<TypeBucket>),
}

impl Aggregation {
    pub fn len(&self) -> usize {
        match self {
            Aggregation::Weekly(buckets) => buckets.len(),
            Aggregation::PaceTrend(points) => points.len(),
            Aggregation::ByActivityType(buckets) => buckets.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub fn aggregate(sessions: &[Session], reduction: Reduction) -> Aggregation {
    match reduction {
        Reduction::Weekly => Aggregation::Weekly(weekly_totals(sessions)),
        Reduction::MovingAveragePace => Aggregation::PaceTrend(moving_average_pace(sessions)),
        Reduction::ByActivityType(metric) => {
            Aggregation::ByActivityType(breakdown_by_activity(sessions, metric))
        }
    }
}

/// Totals per Monday-starting week, oldest week first.
pub fn weekly_totals(sessions: &[Session]) -> Vec<WeeklyBucket> {
    let mut weeks = BTreeMap::<NaiveDate, Totals>::new();
    for session in sessions {
        weeks
            .entry(week_start(session.session_date))
            .or_default()
            .add(session);
    }

    weeks
        .into_iter()
        .map(|(week_start, t)| WeeklyBucket {
            week_start,
            session_count: t.session_count,
            total_calories: t.total_calories,
            total_duration_minutes: t.total_duration_minutes,
            total_distance_km: t.total_distance_km,
        })
        .collect()
}

/// Trailing average of pace over sessions that have one.
///
/// Sessions without a pace are dropped before windowing, so they never
/// occupy a slot in the window.
pub fn moving_average_pace(sessions: &[Session]) -> Vec<PacePoint> {
    let mut paced = sessions
        .iter()
        .filter_map(|s| {
            s.pace_min_per_km
                .filter(|p| p.is_finite() && *p > 0.0)
                .map(|p| (s.session_date, p))
        })
        .collect::<Vec<_>>();
    paced.sort_by_key(|(date, _)| *date);

    let paces = paced.iter().map(|(_, p)| *p).collect::<Vec<_>>();
    let averages = moving_average(&paces, PACE_TREND_WINDOW);

    paced
        .into_iter()
        .zip(averages)
        .map(|((session_date, pace_min_per_km), moving_average)| PacePoint {
            session_date,
            pace_min_per_km,
            moving_average,
        })
        .collect()
}

/// Totals per activity type, largest first by `metric`.
pub fn breakdown_by_activity(sessions: &[Session], metric: BreakdownMetric) -> Vec<TypeBucket> {
    let mut groups = BTreeMap::<ActivityType, Totals>::new();
    for session in sessions {
        groups.entry(session.activity_type).or_default().add(session);
    }

    let mut buckets = groups
        .into_iter()
        .map(|(activity_type, t)| TypeBucket {
            activity_type,
            session_count: t.session_count,
            total_calories: t.total_calories,
            total_duration_minutes: t.total_duration_minutes,
            total_distance_km: t.total_distance_km,
        })
        .collect::<Vec<_>>();

    // stable, so equal totals keep activity order
    match metric {
        BreakdownMetric::Calories => {
            buckets.sort_by(|a, b| b.total_calories.cmp(&a.total_calories))
        }
        BreakdownMetric::Duration => {
            buckets.sort_by(|a, b| b.total_duration_minutes.cmp(&a.total_duration_minutes))
        }
    }
    buckets
}

impl Display for WeeklyBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {} sessions, {} kcal, {} min, {:.2} km",
            self.week_start,
            self.session_count,
            self.total_calories,
            self.total_duration_minutes,
            self.total_distance_km
        )
    }
}

impl Display for TypeBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {} sessions, {} kcal, {} min, {:.2} km",
            self.activity_type,
            self.session_count,
            self.total_calories,
            self.total_duration_minutes,
            self.total_distance_km
        )
    }
}

impl Display for PacePoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {} /km (avg {} /km)",
            self.session_date,
            Pace(self.pace_min_per_km),
            Pace(self.moving_average)
        )
    }
}
