#[macro_use]
extern crate log;

use std::{io, path::PathBuf};

use chrono::Days;
use clap::{CommandFactory, Parser, Subcommand};
use dotenv::dotenv;
use fitbuddy::{
    SessionStore,
    algo::{
        BreakdownMetric, CardioMetrics, GeneratorConfig, MetricCalculator, Pace, SessionGenerator,
        breakdown_by_activity, moving_average_pace, weekly_totals,
    },
    types::{ActivityType, IntensityLevel, Session, SessionInput},
};
use rand::{SeedableRng, rngs::StdRng};

#[derive(Parser)]
pub struct FitBuddyCli {
    #[arg(env = "FITBUDDY_SESSIONS_FILE", long, default_value = "sessions.json")]
    pub sessions_file: PathBuf,
    #[clap(subcommand)]
    pub subcommand: FitBuddyCommand,
}

#[derive(Subcommand)]
pub enum FitBuddyCommand {
    ///
    /// Generate demo sessions for the past days and store them
    ///
    Generate {
        #[arg(long, default_value_t = 60)]
        days_back: u32,
        #[arg(long, env = "FITBUDDY_SEED")]
        seed: Option<u64>,
        /// Keep stored sessions and add the generated ones
        #[arg(long)]
        append: bool,
    },
    ///
    /// Calculate calories and pace for a single session
    ///
    Metrics {
        activity: ActivityType,
        intensity: IntensityLevel,
        duration_minutes: u32,
        #[arg(long)]
        distance: Option<f64>,
    },
    ///
    /// Recalculate calories and pace for every stored session
    ///
    Recompute,
    ///
    /// Print weekly totals
    ///
    Weekly,
    ///
    /// Print the moving average pace trend
    ///
    PaceTrend,
    ///
    /// Print totals per activity type
    ///
    Breakdown {
        #[arg(long, default_value_t = BreakdownMetric::Calories)]
        by: BreakdownMetric,
    },
    ///
    /// Print session statistics for all time and the last week
    ///
    Summary,
    ///
    /// Print shell completions
    ///
    Completions { shell: clap_complete::Shell },
}

fn main() -> anyhow::Result<()> {
    if let Err(error) = dotenv() {
        println!("{}", error);
    }

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = FitBuddyCli::parse();
    let store = SessionStore::new(cli.sessions_file);

    match cli.subcommand {
        FitBuddyCommand::Generate {
            days_back,
            seed,
            append,
        } => {
            let rng = match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_os_rng(),
            };
            let mut generator = SessionGenerator::new(GeneratorConfig::default(), rng)?;
            let sessions = generator.generate(days_back);

            let calories = sessions
                .iter()
                .map(|s| u64::from(s.calories_burned))
                .sum::<u64>();
            info!(
                "generated {} sessions over {} days ({} kcal)",
                sessions.len(),
                days_back,
                calories
            );

            if append {
                let total = store.append(sessions)?;
                info!("{} now holds {} sessions", store.path().display(), total);
            } else {
                store.save(&sessions)?;
            }
            Ok(())
        }
        FitBuddyCommand::Metrics {
            activity,
            intensity,
            duration_minutes,
            distance,
        } => {
            let input = SessionInput::new(activity, intensity, duration_minutes, distance);
            input.validate()?;

            let calculator = MetricCalculator::default();
            let metrics = calculator.derive(&input);
            println!("MET: {}", calculator.met_value(&input));
            println!("Calories: {} kcal", metrics.calories_burned);
            match metrics.pace_min_per_km {
                Some(pace) => println!("Pace: {} /km", Pace(pace)),
                None => println!("Pace: -"),
            }
            Ok(())
        }
        FitBuddyCommand::Recompute => {
            let calculator = MetricCalculator::default();
            let mut sessions = store.load()?;
            let mut changed = 0;
            for session in &mut sessions {
                let before = session.metrics();
                calculator.recompute(session);
                if session.metrics() != before {
                    changed += 1;
                }
            }

            info!("{} of {} sessions changed", changed, sessions.len());
            store.save(&sessions)?;
            Ok(())
        }
        FitBuddyCommand::Weekly => {
            let sessions = store.load()?;
            for week in weekly_totals(&sessions) {
                println!("{}", week);
            }
            Ok(())
        }
        FitBuddyCommand::PaceTrend => {
            let sessions = store.load()?;
            for point in moving_average_pace(&sessions) {
                println!("{}", point);
            }
            Ok(())
        }
        FitBuddyCommand::Breakdown { by } => {
            let sessions = store.load()?;
            for bucket in breakdown_by_activity(&sessions, by) {
                println!("{}", bucket);
            }
            Ok(())
        }
        FitBuddyCommand::Summary => {
            let sessions = store.load()?;
            let last_week = last_week(&sessions);

            println!("All time: \n{}", CardioMetrics::new(&sessions));
            println!("\nLast week: \n{}", CardioMetrics::new(&last_week));
            Ok(())
        }
        FitBuddyCommand::Completions { shell } => {
            let mut command = FitBuddyCli::command();
            let name = command.get_name().to_string();
            clap_complete::generate(shell, &mut command, name, &mut io::stdout());
            Ok(())
        }
    }
}

/// Sessions in the seven days ending on the most recent session.
fn last_week(sessions: &[Session]) -> Vec<Session> {
    let Some(latest) = sessions.iter().map(|s| s.session_date).max() else {
        return Vec::new();
    };
    let Some(cutoff) = latest.checked_sub_days(Days::new(6)) else {
        return sessions.to_vec();
    };

    sessions
        .iter()
        .filter(|s| s.session_date >= cutoff)
        .cloned()
        .collect()
}
