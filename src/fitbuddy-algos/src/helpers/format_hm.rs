use chrono::TimeDelta;

pub trait FormatHM {
    fn format_hm(&self) -> String;
}

impl FormatHM for TimeDelta {
    fn format_hm(&self) -> String {
        let total = self.num_seconds() as f64 / 60.0;
        total.format_hm()
    }
}

/// Minutes, rendered as `HH:MM`. Durations are not wrapped at 24h.
impl FormatHM for f64 {
    fn format_hm(&self) -> String {
        let h = (self / 60.0) as i64;
        let m = (self % 60.0) as i64;
        format!("{:02}:{:02}", h, m)
    }
}
