use std::{collections::HashMap, ops::RangeInclusive};

use chrono::{Datelike as _, Days, Local, NaiveDate, Weekday};
use fitbuddy_types::{ActivityType, IntensityLevel, MIN_DURATION_MINUTES, Session, SessionInput};
use rand::{Rng, seq::IndexedRandom as _};
use thiserror::Error;

use crate::{
    helpers::time_math::round_float,
    metrics::MetricCalculator,
    sampling::{SamplingError, WeightedTable},
};

#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("activity weights: {0}")]
    ActivityWeights(#[source] SamplingError),
    #[error("intensity weights for {table}: {source}")]
    IntensityWeights {
        table: String,
        #[source]
        source: SamplingError,
    },
    #[error("day probability {0} is outside [0, 1]")]
    Probability(f64),
    #[error("invalid distance profile for {0}")]
    DistanceProfile(ActivityType),
    #[error("invalid speed for {0} at {1} intensity")]
    Speed(ActivityType, IntensityLevel),
    #[error("duration-only range {0}..={1} is empty or below the minimum duration")]
    DurationRange(u32, u32),
}

/// Chance that a given day has a session.
#[derive(Debug, Clone, Copy)]
pub struct DayProbabilities {
    pub weekend: f64,
    pub wednesday: f64,
    pub weekday: f64,
}

impl Default for DayProbabilities {
    fn default() -> Self {
        Self {
            weekend: 0.5,
            wednesday: 0.4,
            weekday: 0.3,
        }
    }
}

impl DayProbabilities {
    pub fn for_weekday(&self, weekday: Weekday) -> f64 {
        match weekday {
            Weekday::Sat | Weekday::Sun => self.weekend,
            Weekday::Wed => self.wednesday,
            _ => self.weekday,
        }
    }

    fn validate(&self) -> Result<(), GeneratorError> {
        [self.weekend, self.wednesday, self.weekday]
            .into_iter()
            .find(|p| !(0.0..=1.0).contains(p))
            .map_or(Ok(()), |p| Err(GeneratorError::Probability(p)))
    }
}

/// Mean distance and the maximum deviation from it, in km.
/// An `average_km` of zero means the activity is logged without distance.
#[derive(Debug, Clone, Copy)]
pub struct DistanceProfile {
    pub average_km: f64,
    pub variance_km: f64,
}

impl DistanceProfile {
    pub const fn new(average_km: f64, variance_km: f64) -> Self {
        Self {
            average_km,
            variance_km,
        }
    }

    fn is_valid(&self) -> bool {
        self.average_km.is_finite()
            && self.variance_km.is_finite()
            && self.average_km >= 0.0
            && self.variance_km >= 0.0
    }
}

/// Typical speed in km/h used to turn a generated distance into a duration.
#[derive(Debug, Clone)]
pub struct SpeedTable {
    values: HashMap<(ActivityType, IntensityLevel), f64>,
}

impl SpeedTable {
    pub const FALLBACK_KMH: f64 = 8.0;

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
            .unwrap_or(Self::FALLBACK_KMH)
    }

    fn validate(&self) -> Result<(), GeneratorError> {
        match self
            .values
            .iter()
            .find(|(_, speed)| !speed.is_finite() || **speed <= 0.0)
        {
            Some(((activity, intensity), _)) => Err(GeneratorError::Speed(*activity, *intensity)),
            None => Ok(()),
        }
    }
}

impl Default for SpeedTable {
    fn default() -> Self {
        use ActivityType::*;
        use IntensityLevel::*;

        const ROWS: [(ActivityType, [f64; 4]); 7] = [
            (Running, [8.0, 10.0, 12.0, 14.0]),
            (Cycling, [15.0, 20.0, 25.0, 30.0]),
            (Walking, [4.0, 5.0, 6.0, 6.5]),
            (Swimming, [2.0, 2.5, 3.0, 3.5]),
            (Rowing, [7.0, 9.0, 11.0, 13.0]),
            (Elliptical, [6.0, 8.0, 10.0, 12.0]),
            (Hiking, [3.0, 4.0, 5.0, 6.0]),
        ];

        Self::new(ROWS.into_iter().flat_map(|(activity, speeds)| {
            [Low, Moderate, High, VeryHigh]
                .into_iter()
                .zip(speeds)
                .map(move |(intensity, speed)| ((activity, intensity), speed))
        }))
    }
}

/// Every table the generator draws from.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub day_probabilities: DayProbabilities,
    pub activity_weights: Vec<(ActivityType, u32)>,
    pub intensity_weights: HashMap<ActivityType, Vec<(IntensityLevel, u32)>>,
    pub default_intensity_weights: Vec<(IntensityLevel, u32)>,
    pub distances: HashMap<ActivityType, DistanceProfile>,
    pub speeds: SpeedTable,
    pub duration_only_minutes: RangeInclusive<u32>,
    pub locations: HashMap<ActivityType, Vec<String>>,
    pub notes: Vec<Option<String>>,
    pub calculator: MetricCalculator,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        use ActivityType::*;
        use IntensityLevel::*;

        let skew_hard = vec![(Low, 10), (Moderate, 40), (High, 40), (VeryHigh, 10)];
        let intensity_weights = HashMap::from([
            (Running, skew_hard.clone()),
            (Rowing, skew_hard),
            (Walking, vec![(Low, 40), (Moderate, 45), (High, 15)]),
        ]);

        let distances = HashMap::from([
            (Running, DistanceProfile::new(6.0, 3.0)),
            (Cycling, DistanceProfile::new(20.0, 10.0)),
            (Walking, DistanceProfile::new(4.0, 2.0)),
            (Swimming, DistanceProfile::new(1.5, 0.75)),
            (Rowing, DistanceProfile::new(5.0, 2.5)),
            (Elliptical, DistanceProfile::new(5.0, 2.0)),
            (Hiking, DistanceProfile::new(8.0, 4.0)),
            (StairClimbing, DistanceProfile::new(0.0, 0.0)),
        ]);

        let locations = [
            (
                Running,
                &[
                    "Riverside Trail",
                    "City Park Loop",
                    "Neighborhood Streets",
                    "High School Track",
                    "Treadmill",
                ][..],
            ),
            (
                Cycling,
                &[
                    "Lakeshore Bike Path",
                    "Hill Country Roads",
                    "Spin Studio",
                    "Greenway Trail",
                ][..],
            ),
            (
                Walking,
                &[
                    "Downtown",
                    "Botanical Garden",
                    "Neighborhood Streets",
                    "Beach Boardwalk",
                ][..],
            ),
            (
                Swimming,
                &["Community Pool", "Aquatic Center", "Open Water Lake"][..],
            ),
            (Rowing, &["Rowing Machine", "River Boathouse"][..]),
            (Elliptical, &["Gym Cardio Floor", "Home Gym"][..]),
            (
                Hiking,
                &["Mountain Ridge Trail", "State Park", "Canyon Loop"][..],
            ),
            (
                StairClimbing,
                &["StairMaster", "Stadium Steps", "Office Stairwell"][..],
            ),
        ]
        .into_iter()
        .map(|(activity, names)| (activity, names.iter().map(|n| n.to_string()).collect()))
        .collect();

        let notes = [
            Some("Felt great today!"),
            Some("Tough session but pushed through"),
            None,
            Some("Easy recovery effort"),
            None,
            Some("New personal best!"),
            Some("Legs felt heavy"),
            None,
            Some("Perfect weather"),
            None,
        ]
        .into_iter()
        .map(|n| n.map(str::to_string))
        .collect();

        Self {
            day_probabilities: DayProbabilities::default(),
            activity_weights: vec![
                (Running, 40),
                (Cycling, 25),
                (Walking, 15),
                (Swimming, 10),
                (Rowing, 5),
                (Elliptical, 3),
                (Hiking, 1),
                (StairClimbing, 1),
            ],
            intensity_weights,
            default_intensity_weights: vec![(Low, 15), (Moderate, 50), (High, 30), (VeryHigh, 5)],
            distances,
            speeds: SpeedTable::default(),
            duration_only_minutes: 15..=45,
            locations,
            notes,
            calculator: MetricCalculator::default(),
        }
    }
}

/// Produces plausible historical sessions for demo data.
pub struct SessionGenerator<R> {
    config: GeneratorConfig,
    activities: WeightedTable<ActivityType>,
    intensities: HashMap<ActivityType, WeightedTable<IntensityLevel>>,
    default_intensities: WeightedTable<IntensityLevel>,
    rng: R,
}

impl<R: Rng> SessionGenerator<R> {
    /// Relative jitter applied to the table speed.
    const SPEED_JITTER: f64 = 0.15;
    const MIN_DISTANCE_KM: f64 = 0.5;

    pub fn new(config: GeneratorConfig, rng: R) -> Result<Self, GeneratorError> {
        config.day_probabilities.validate()?;
        config.speeds.validate()?;

        if let Some((activity, _)) = config.distances.iter().find(|(_, p)| !p.is_valid()) {
            return Err(GeneratorError::DistanceProfile(*activity));
        }

        let (min, max) = config.duration_only_minutes.clone().into_inner();
        if min > max || min < MIN_DURATION_MINUTES {
            return Err(GeneratorError::DurationRange(min, max));
        }

        let activities = WeightedTable::new(config.activity_weights.iter().copied())
            .map_err(GeneratorError::ActivityWeights)?;

        let default_intensities =
            WeightedTable::new(config.default_intensity_weights.iter().copied()).map_err(
                |source| GeneratorError::IntensityWeights {
                    table: "default".to_string(),
                    source,
                },
            )?;

        let intensities = config
            .intensity_weights
            .iter()
            .map(|(activity, weights)| {
                WeightedTable::new(weights.iter().copied())
                    .map(|table| (*activity, table))
                    .map_err(|source| GeneratorError::IntensityWeights {
                        table: activity.to_string(),
                        source,
                    })
            })
            .collect::<Result<HashMap<_, _>, _>>()?;

        Ok(Self {
            config,
            activities,
            intensities,
            default_intensities,
            rng,
        })
    }

    pub fn inclusion_probability(&self, weekday: Weekday) -> f64 {
        self.config.day_probabilities.for_weekday(weekday)
    }

    /// Sessions for the `days_back` days ending today (local time).
    pub fn generate(&mut self, days_back: u32) -> Vec<Session> {
        self.generate_from(Local::now().date_naive(), days_back)
    }

    /// Sessions for the `days_back` days ending on `today`, sorted by date.
    pub fn generate_from(&mut self, today: NaiveDate, days_back: u32) -> Vec<Session> {
        let mut sessions = Vec::new();

        for offset in 0..days_back {
            let Some(date) = today.checked_sub_days(Days::new(u64::from(offset))) else {
                break;
            };

            let p = self.inclusion_probability(date.weekday());
            if self.rng.random::<f64>() >= p {
                continue;
            }

            let session = self.session_on(date);
            log::trace!(
                "{}: {} {} {}min",
                date,
                session.activity_type,
                session.intensity_level,
                session.duration_minutes
            );
            sessions.push(session);
        }

        sessions.sort_by_key(|s| s.session_date);
        log::debug!(
            "generated {} sessions over {} days",
            sessions.len(),
            days_back
        );
        sessions
    }

    fn session_on(&mut self, date: NaiveDate) -> Session {
        let activity = self.activities.sample(&mut self.rng);
        let intensity = self.intensity_for(activity);
        let distance_km = self.distance_for(activity);
        let duration_minutes = self.duration_for(activity, intensity, distance_km);

        let location = self
            .config
            .locations
            .get(&activity)
            .and_then(|names| names.choose(&mut self.rng))
            .cloned();
        let notes = self.config.notes.choose(&mut self.rng).cloned().flatten();

        let input = SessionInput::new(activity, intensity, duration_minutes, distance_km);
        self.config
            .calculator
            .build_session(date, input, location, notes)
    }

    fn intensity_for(&mut self, activity: ActivityType) -> IntensityLevel {
        self.intensities
            .get(&activity)
            .unwrap_or(&self.default_intensities)
            .sample(&mut self.rng)
    }

    fn distance_for(&mut self, activity: ActivityType) -> Option<f64> {
        let profile = self.config.distances.get(&activity)?;
        if profile.average_km <= 0.0 {
            return None;
        }

        let spread = (self.rng.random::<f64>() - 0.5) * 2.0 * profile.variance_km;
        let distance = (profile.average_km + spread).max(Self::MIN_DISTANCE_KM);
        Some(round_float(distance))
    }

    fn duration_for(
        &mut self,
        activity: ActivityType,
        intensity: IntensityLevel,
        distance_km: Option<f64>,
    ) -> u32 {
        let Some(distance) = distance_km else {
            return self
                .rng
                .random_range(self.config.duration_only_minutes.clone());
        };

        let jitter = self
            .rng
            .random_range(1.0 - Self::SPEED_JITTER..1.0 + Self::SPEED_JITTER);
        let speed = self.config.speeds.get(activity, intensity) * jitter;
        let minutes = (distance / speed * 60.0).round() as u32;
        minutes.max(MIN_DURATION_MINUTES)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use rand::{SeedableRng, rngs::StdRng};
    use strum::IntoEnumIterator;

    use super::*;

    fn today() -> NaiveDate {
        // a Sunday
        NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
    }

    fn generator(config: GeneratorConfig, seed: u64) -> SessionGenerator<StdRng> {
        SessionGenerator::new(config, StdRng::seed_from_u64(seed)).unwrap()
    }

    fn every_day() -> GeneratorConfig {
        GeneratorConfig {
            day_probabilities: DayProbabilities {
                weekend: 1.0,
                wednesday: 1.0,
                weekday: 1.0,
            },
            ..Default::default()
        }
    }

    #[test]
    fn inclusion_probability_by_weekday() {
        let g = generator(GeneratorConfig::default(), 1);
        assert_eq!(g.inclusion_probability(Weekday::Sat), 0.5);
        assert_eq!(g.inclusion_probability(Weekday::Sun), 0.5);
        assert_eq!(g.inclusion_probability(Weekday::Wed), 0.4);
        assert_eq!(g.inclusion_probability(Weekday::Mon), 0.3);
        assert_eq!(g.inclusion_probability(Weekday::Fri), 0.3);
    }

    #[test]
    fn invalid_configs_rejected() {
        let rng = || StdRng::seed_from_u64(0);

        let config = GeneratorConfig {
            activity_weights: vec![],
            ..Default::default()
        };
        assert!(matches!(
            SessionGenerator::new(config, rng()),
            Err(GeneratorError::ActivityWeights(SamplingError::Empty))
        ));

        let mut config = GeneratorConfig::default();
        config.day_probabilities.wednesday = 1.5;
        assert!(matches!(
            SessionGenerator::new(config, rng()),
            Err(GeneratorError::Probability(_))
        ));

        let config = GeneratorConfig {
            duration_only_minutes: 45..=15,
            ..Default::default()
        };
        assert!(matches!(
            SessionGenerator::new(config, rng()),
            Err(GeneratorError::DurationRange(45, 15))
        ));

        let mut config = GeneratorConfig::default();
        config
            .intensity_weights
            .insert(ActivityType::Hiking, vec![(IntensityLevel::Low, 0)]);
        assert!(matches!(
            SessionGenerator::new(config, rng()),
            Err(GeneratorError::IntensityWeights { .. })
        ));

        let mut config = GeneratorConfig::default();
        config.distances.insert(
            ActivityType::Cycling,
            DistanceProfile::new(-1.0, 2.0),
        );
        assert!(matches!(
            SessionGenerator::new(config, rng()),
            Err(GeneratorError::DistanceProfile(ActivityType::Cycling))
        ));
    }

    #[test]
    fn zero_days_is_empty() {
        let mut g = generator(every_day(), 3);
        assert!(g.generate_from(today(), 0).is_empty());
    }

    #[test]
    fn every_day_included_when_certain() {
        let mut g = generator(every_day(), 3);
        let sessions = g.generate_from(today(), 30);
        assert_eq!(sessions.len(), 30);
    }

    #[test]
    fn no_days_included_when_impossible() {
        let config = GeneratorConfig {
            day_probabilities: DayProbabilities {
                weekend: 0.0,
                wednesday: 0.0,
                weekday: 0.0,
            },
            ..Default::default()
        };
        let mut g = generator(config, 3);
        assert!(g.generate_from(today(), 60).is_empty());
    }

    #[test]
    fn sessions_sorted_and_in_window() {
        let mut g = generator(GeneratorConfig::default(), 7);
        let sessions = g.generate_from(today(), 60);
        assert!(!sessions.is_empty());

        let first_day = today() - Days::new(59);
        for pair in sessions.windows(2) {
            assert!(pair[0].session_date <= pair[1].session_date);
        }
        for session in &sessions {
            assert!(session.session_date >= first_day);
            assert!(session.session_date <= today());
        }
    }

    #[test]
    fn derived_fields_match_calculator() {
        let mut g = generator(every_day(), 11);
        let calc = MetricCalculator::default();
        for session in g.generate_from(today(), 200) {
            assert!(session.duration_minutes >= MIN_DURATION_MINUTES);
            assert_eq!(session.metrics(), calc.derive(&session.input()));
            match session.distance_km {
                Some(d) => {
                    assert!(d >= 0.5);
                    assert!(session.pace_min_per_km.is_some());
                }
                None => assert!(session.pace_min_per_km.is_none()),
            }
        }
    }

    #[test]
    fn distance_stays_within_variance() {
        let config = GeneratorConfig::default();
        let profiles = config.distances.clone();
        let mut g = generator(every_day(), 5);
        for session in g.generate_from(today(), 300) {
            let Some(distance) = session.distance_km else {
                continue;
            };
            let profile = profiles[&session.activity_type];
            let low = (profile.average_km - profile.variance_km).max(0.5);
            let high = profile.average_km + profile.variance_km;
            assert!(
                distance >= low - 0.01 && distance <= high + 0.01,
                "{} km outside {low}..{high}",
                distance
            );
        }
    }

    #[test]
    fn stair_climbing_has_no_distance() {
        let config = GeneratorConfig {
            activity_weights: vec![(ActivityType::StairClimbing, 1)],
            ..every_day()
        };
        let mut g = generator(config, 9);
        let sessions = g.generate_from(today(), 100);
        assert_eq!(sessions.len(), 100);
        for session in sessions {
            assert_eq!(session.activity_type, ActivityType::StairClimbing);
            assert_eq!(session.distance_km, None);
            assert_eq!(session.pace_min_per_km, None);
            assert!((15..=45).contains(&session.duration_minutes));
        }
    }

    #[test]
    fn locations_come_from_activity_list() {
        let config = GeneratorConfig::default();
        let locations = config.locations.clone();
        let mut g = generator(every_day(), 21);
        let sessions = g.generate_from(today(), 100);

        for session in &sessions {
            let location = session.location.as_ref().unwrap();
            assert!(locations[&session.activity_type].contains(location));
        }
        assert!(sessions.iter().any(|s| s.notes.is_none()));
        assert!(sessions.iter().any(|s| s.notes.is_some()));
    }

    #[test]
    fn walking_never_very_high() {
        let config = GeneratorConfig {
            activity_weights: vec![(ActivityType::Walking, 1)],
            ..every_day()
        };
        let mut g = generator(config, 13);
        for session in g.generate_from(today(), 500) {
            assert_ne!(session.intensity_level, IntensityLevel::VeryHigh);
        }
    }

    #[test]
    fn activity_draws_follow_weights() {
        let mut g = generator(GeneratorConfig::default(), 99);
        let draws: u32 = 100_000;
        let mut counts = HashMap::new();
        for _ in 0..draws {
            *counts.entry(g.activities.sample(&mut g.rng)).or_insert(0_u32) += 1;
        }

        let total = g.activities.total_weight() as f64;
        for (activity, weight) in GeneratorConfig::default().activity_weights {
            let expected = f64::from(weight) / total;
            let observed = f64::from(counts.get(&activity).copied().unwrap_or(0)) / f64::from(draws);
            assert!(
                (observed - expected).abs() < 0.02,
                "{activity}: expected {expected}, observed {observed}"
            );
        }
        assert_eq!(counts.len(), ActivityType::iter().count());
    }

    fn assert_intensity_draws(
        config: GeneratorConfig,
        activity: ActivityType,
        weights: &[(IntensityLevel, u32)],
    ) {
        let mut g = generator(config, 42);
        let draws: u32 = 100_000;
        let mut counts = HashMap::new();
        for _ in 0..draws {
            *counts.entry(g.intensity_for(activity)).or_insert(0_u32) += 1;
        }

        let total = f64::from(weights.iter().map(|(_, w)| w).sum::<u32>());
        for (intensity, weight) in weights {
            let expected = f64::from(*weight) / total;
            let observed = f64::from(counts.get(intensity).copied().unwrap_or(0)) / f64::from(draws);
            assert!(
                (observed - expected).abs() < 0.02,
                "{activity} {intensity}: expected {expected}, observed {observed}"
            );
        }
        assert_eq!(counts.len(), weights.len());
    }

    #[test]
    fn running_intensity_follows_weights() {
        let config = GeneratorConfig {
            activity_weights: vec![(ActivityType::Running, 1)],
            ..every_day()
        };
        let weights = config.intensity_weights[&ActivityType::Running].clone();
        assert_eq!(
            weights,
            vec![
                (IntensityLevel::Low, 10),
                (IntensityLevel::Moderate, 40),
                (IntensityLevel::High, 40),
                (IntensityLevel::VeryHigh, 10),
            ]
        );
        assert_intensity_draws(config, ActivityType::Running, &weights);
    }

    #[test]
    fn cycling_intensity_uses_default_weights() {
        let config = GeneratorConfig {
            activity_weights: vec![(ActivityType::Cycling, 1)],
            ..every_day()
        };
        assert!(!config.intensity_weights.contains_key(&ActivityType::Cycling));
        let weights = config.default_intensity_weights.clone();
        assert_eq!(
            weights,
            vec![
                (IntensityLevel::Low, 15),
                (IntensityLevel::Moderate, 50),
                (IntensityLevel::High, 30),
                (IntensityLevel::VeryHigh, 5),
            ]
        );
        assert_intensity_draws(config, ActivityType::Cycling, &weights);
    }

    #[test]
    fn duration_follows_speed_table() {
        let config = every_day();
        let speeds = config.speeds.clone();
        let jitter = SessionGenerator::<StdRng>::SPEED_JITTER;
        let mut g = generator(config, 17);

        let mut checked = 0;
        for session in g.generate_from(today(), 500) {
            let Some(distance) = session.distance_km else {
                continue;
            };
            let base = speeds.get(session.activity_type, session.intensity_level);
            let bound = |speed: f64| ((distance / speed * 60.0).round() as u32).max(MIN_DURATION_MINUTES);
            let low = bound(base * (1.0 + jitter));
            let high = bound(base * (1.0 - jitter));
            assert!(
                (low..=high).contains(&session.duration_minutes),
                "{} {} {distance} km in {} min, expected {low}..={high}",
                session.activity_type,
                session.intensity_level,
                session.duration_minutes
            );
            checked += 1;
        }
        assert!(checked > 400);
    }

    #[test]
    fn duration_only_activity_uses_configured_range() {
        let mut config = GeneratorConfig {
            activity_weights: vec![(ActivityType::Hiking, 1)],
            duration_only_minutes: 20..=25,
            ..every_day()
        };
        config.distances.remove(&ActivityType::Hiking);
        let mut g = generator(config, 23);

        let sessions = g.generate_from(today(), 200);
        assert_eq!(sessions.len(), 200);
        for session in sessions {
            assert_eq!(session.activity_type, ActivityType::Hiking);
            assert_eq!(session.distance_km, None);
            assert_eq!(session.pace_min_per_km, None);
            assert!((20..=25).contains(&session.duration_minutes));
        }
    }

    #[test]
    fn same_seed_same_sessions() {
        let a = generator(GeneratorConfig::default(), 1234).generate_from(today(), 90);
        let b = generator(GeneratorConfig::default(), 1234).generate_from(today(), 90);
        assert_eq!(a, b);
    }
}
