use chrono::{Datelike as _, Days, NaiveDate, TimeDelta};

/// Monday on or before `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    // num_days_from_sunday maps Sunday to 0, so Sunday goes back 6 days
    let offset = (date.weekday().num_days_from_sunday() + 6) % 7;
    date - Days::new(u64::from(offset))
}

pub fn mean_deltas(durations: &[TimeDelta]) -> TimeDelta {
    if durations.is_empty() {
        TimeDelta::default()
    } else {
        durations.iter().sum::<TimeDelta>() / durations.len() as i32
    }
}

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0_f64
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

pub fn std_dev_delta(durations: &[TimeDelta], mean: TimeDelta) -> TimeDelta {
    if durations.is_empty() {
        TimeDelta::default()
    } else {
        let variance = durations
            .iter()
            .map(|x| (*x - mean).num_seconds().pow(2))
            .sum::<i64>()
            / durations.len() as i64;

        TimeDelta::seconds(variance.isqrt())
    }
}

/// Trailing moving average; point `i` averages `values[i + 1 - w..=i]`
/// where `w = min(window, i + 1)`.
pub fn moving_average(values: &[f64], window: usize) -> Vec<f64> {
    let window = window.max(1);
    (0..values.len())
        .map(|i| {
            let start = (i + 1).saturating_sub(window);
            mean(&values[start..=i])
        })
        .collect()
}

pub fn round_float(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use chrono::{Datelike as _, Weekday};

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn week_start_monday_is_itself() {
        // 2025-03-03 is a Monday
        assert_eq!(week_start(date(2025, 3, 3)), date(2025, 3, 3));
    }

    #[test]
    fn week_start_midweek() {
        assert_eq!(week_start(date(2025, 3, 5)), date(2025, 3, 3));
        assert_eq!(week_start(date(2025, 3, 8)), date(2025, 3, 3));
    }

    #[test]
    fn week_start_sunday_belongs_to_previous_monday() {
        assert_eq!(date(2025, 3, 9).weekday(), Weekday::Sun);
        assert_eq!(week_start(date(2025, 3, 9)), date(2025, 3, 3));
    }

    #[test]
    fn week_start_crosses_year() {
        // 2025-01-01 is a Wednesday
        assert_eq!(week_start(date(2025, 1, 1)), date(2024, 12, 30));
    }

    #[test]
    fn moving_average_grows_window() {
        assert_eq!(moving_average(&[6.0, 5.5, 5.0], 7), vec![6.0, 5.75, 5.5]);
    }

    #[test]
    fn moving_average_caps_window() {
        let avg = moving_average(&[1.0, 2.0, 3.0, 4.0, 5.0], 2);
        assert_eq!(avg, vec![1.0, 1.5, 2.5, 3.5, 4.5]);
    }

    #[test]
    fn moving_average_empty() {
        assert!(moving_average(&[], 7).is_empty());
    }

    #[test]
    fn mean_deltas_empty() {
        assert_eq!(mean_deltas(&[]), TimeDelta::default());
    }

    #[test]
    fn mean_deltas_basic() {
        let durations = vec![TimeDelta::minutes(30), TimeDelta::minutes(50)];
        assert_eq!(mean_deltas(&durations), TimeDelta::minutes(40));
    }

    #[test]
    fn mean_basic() {
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(mean(&[2.0, 4.0, 6.0]), 4.0);
    }

    #[test]
    fn std_dev_delta_zero_variance() {
        let d = TimeDelta::minutes(45);
        assert_eq!(std_dev_delta(&[d, d, d], d), TimeDelta::seconds(0));
    }

    #[test]
    fn std_dev_delta_spread() {
        let durations = [TimeDelta::minutes(20), TimeDelta::minutes(40)];
        let mean = mean_deltas(&durations);
        assert_eq!(std_dev_delta(&durations, mean), TimeDelta::minutes(10));
    }

    #[test]
    fn round_float_basic() {
        assert_eq!(round_float(3.14159), 3.14);
        assert_eq!(round_float(1.999), 2.0);
        assert_eq!(round_float(0.0), 0.0);
    }
}
