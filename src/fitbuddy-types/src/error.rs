use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum SessionError {
    #[error("duration of {0} minutes is below the 5 minute minimum")]
    DurationTooShort(u32),
    #[error("distance must be a non-negative number, got {0}")]
    InvalidDistance(f64),
}
